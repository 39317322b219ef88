use super::SettingsStore;
use std::cell::RefCell;
use std::collections::HashMap;

/// Process-local store; values vanish with it.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: RefCell<HashMap<String, i64>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.values.borrow().get(key).copied().unwrap_or(default)
    }

    fn set_int(&self, key: &str, value: i64) {
        self.values.borrow_mut().insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::MemorySettingsStore;
    use crate::settings::SettingsStore;

    #[test]
    fn absent_key_returns_default_and_set_overwrites() {
        let store = MemorySettingsStore::new();
        assert_eq!(store.get_int("ClickerGold", 7), 7);

        store.set_int("ClickerGold", 10);
        store.set_int("ClickerGold", 25);
        assert_eq!(store.get_int("ClickerGold", 7), 25);
        assert_eq!(store.len(), 1);
    }
}
