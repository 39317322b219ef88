//! Clicker model: gold economy, upgrades and persistence.
//!
//! # Invariants
//! - A rejected upgrade leaves gold and levels untouched.
//! - Levels restored from settings are clamped into the table range.
//! - Values are saved on teardown, and the per-second income task stops there.

use super::keys::{ClickerField, ClickerMethod, ClickerQuery, PlayerField};
use crate::config::{UpgradeCatalog, UpgradeTable};
use crate::presenter::{Model, PresenterContext};
use crate::record::{ChangeNotifier, FieldKey, ObservableRecord};
use crate::registry::MethodRegistry;
use crate::schedule::{Periodic, Scheduler, TaskGroup};
use crate::settings::SettingsStore;
use crate::MvpResult;
use log::{error, info, warn};
use std::cell::RefCell;
use std::fmt::{Display, Formatter};
use std::rc::{Rc, Weak};
use std::time::Duration;

pub const GOLD_KEY: &str = "ClickerGold";
pub const GOLD_PER_CLICK_LEVEL_KEY: &str = "ClickerGoldPerClickLevel";
pub const GOLD_PER_SEC_LEVEL_KEY: &str = "ClickerGoldPerSecLevel";

const GOLD_PER_SEC_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeKind {
    GoldPerClick,
    GoldPerSec,
}

impl UpgradeKind {
    /// Table name in the upgrade catalog.
    pub fn table_name(self) -> &'static str {
        match self {
            Self::GoldPerClick => "GoldPerClick",
            Self::GoldPerSec => "GoldPerSec",
        }
    }

    pub fn level_field(self) -> PlayerField {
        match self {
            Self::GoldPerClick => PlayerField::GoldPerClickLevel,
            Self::GoldPerSec => PlayerField::GoldPerSecLevel,
        }
    }
}

/// Why an upgrade was not bought.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeRejection {
    InsufficientGold { cost: i64, gold: i64 },
    MaxLevel { level: i64 },
    MissingConfig,
}

impl UpgradeRejection {
    pub fn code(self) -> &'static str {
        match self {
            Self::InsufficientGold { .. } => "insufficient_gold",
            Self::MaxLevel { .. } => "max_level",
            Self::MissingConfig => "missing_config",
        }
    }
}

impl Display for UpgradeRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientGold { cost, gold } => {
                write!(f, "upgrade costs {cost} gold but only {gold} is available")
            }
            Self::MaxLevel { level } => write!(f, "level {level} is already the maximum"),
            Self::MissingConfig => write!(f, "upgrade table is not loaded"),
        }
    }
}

/// Game rules over the player record, shared with the registered handlers.
#[derive(Debug, Default)]
struct Economy {
    data: ObservableRecord<PlayerField>,
    per_click: RefCell<Option<UpgradeTable>>,
    per_sec: RefCell<Option<UpgradeTable>>,
}

impl Economy {
    fn table(&self, kind: UpgradeKind) -> &RefCell<Option<UpgradeTable>> {
        match kind {
            UpgradeKind::GoldPerClick => &self.per_click,
            UpgradeKind::GoldPerSec => &self.per_sec,
        }
    }

    fn gold(&self) -> i64 {
        self.data.get(PlayerField::Gold)
    }

    fn level(&self, kind: UpgradeKind) -> i64 {
        self.data.get(kind.level_field())
    }

    fn current_value(&self, kind: UpgradeKind) -> i64 {
        self.table(kind)
            .borrow()
            .as_ref()
            .and_then(|table| table.value_at(self.level(kind)))
            .unwrap_or(0)
    }

    fn next_cost(&self, kind: UpgradeKind) -> Option<i64> {
        self.table(kind)
            .borrow()
            .as_ref()
            .and_then(|table| table.next_cost(self.level(kind)))
    }

    fn add_gold(&self, amount: i64) -> bool {
        self.data
            .update(PlayerField::Gold, |gold: i64| gold.saturating_add(amount))
    }

    fn upgrade(&self, kind: UpgradeKind) -> Result<i64, UpgradeRejection> {
        let level = self.level(kind);
        let cost = {
            let table = self.table(kind).borrow();
            let table = table.as_ref().ok_or(UpgradeRejection::MissingConfig)?;
            if table.is_max_level(level) {
                return Err(UpgradeRejection::MaxLevel { level });
            }
            table
                .next_cost(level)
                .ok_or(UpgradeRejection::MaxLevel { level })?
        };

        let gold = self.gold();
        if cost > gold {
            return Err(UpgradeRejection::InsufficientGold { cost, gold });
        }

        self.data.set(PlayerField::Gold, gold.saturating_sub(cost));
        self.data.set(kind.level_field(), level + 1);
        Ok(level + 1)
    }

    fn run_upgrade(&self, kind: UpgradeKind) {
        match self.upgrade(kind) {
            Ok(level) => info!(
                "event=clicker_upgrade module=clicker status=ok kind={} level={}",
                kind.table_name(),
                level
            ),
            Err(rejection) => info!(
                "event=clicker_upgrade module=clicker status=skip kind={} reason={}",
                kind.table_name(),
                rejection.code()
            ),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Restored {
    gold: i64,
    gold_per_click_level: i64,
    gold_per_sec_level: i64,
}

/// Data holder of the clicker screen.
pub struct ClickerModel {
    record: ObservableRecord<ClickerField>,
    economy: Rc<Economy>,
    settings: Rc<dyn SettingsStore>,
    scheduler: Scheduler,
    catalog: Option<UpgradeCatalog>,
    restored: Restored,
    registry: Weak<MethodRegistry>,
    income: Option<TaskGroup>,
}

impl ClickerModel {
    /// Uses the bundled upgrade catalog unless `with_catalog` overrides it.
    pub fn new(settings: Rc<dyn SettingsStore>, scheduler: Scheduler) -> Self {
        Self {
            record: ObservableRecord::new(),
            economy: Rc::new(Economy::default()),
            settings,
            scheduler,
            catalog: None,
            restored: Restored::default(),
            registry: Weak::new(),
            income: None,
        }
    }

    pub fn with_catalog(mut self, catalog: UpgradeCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Outer record; its `Data` field holds the player record.
    pub fn record(&self) -> &ObservableRecord<ClickerField> {
        &self.record
    }

    pub fn player(&self) -> &ObservableRecord<PlayerField> {
        &self.economy.data
    }

    /// Whether the per-second income task is scheduled.
    pub fn is_earning(&self) -> bool {
        self.income.is_some()
    }

    /// Direct form of the upgrade intents, reporting why one was refused.
    pub fn upgrade(&self, kind: UpgradeKind) -> Result<i64, UpgradeRejection> {
        self.economy.upgrade(kind)
    }

    fn load_tables(&mut self) {
        let catalog = match self.catalog.take() {
            Some(catalog) => catalog.validate().map(|()| catalog),
            None => UpgradeCatalog::builtin_clicker(),
        };
        let catalog = match catalog {
            Ok(catalog) => catalog,
            Err(err) => {
                error!(
                    "event=clicker_setup module=clicker status=error error_code=config_load_failed error={}",
                    err
                );
                return;
            }
        };

        for kind in [UpgradeKind::GoldPerClick, UpgradeKind::GoldPerSec] {
            match catalog.require(kind.table_name()) {
                Ok(table) => {
                    self.economy.table(kind).replace(Some(table.clone()));
                }
                Err(err) => error!(
                    "event=clicker_setup module=clicker status=error error_code=missing_table error={}",
                    err
                ),
            }
        }
        self.catalog = Some(catalog);
    }

    fn restore(&mut self) {
        let clamp_level = |kind: UpgradeKind, level: i64| {
            let max = self
                .economy
                .table(kind)
                .borrow()
                .as_ref()
                .map_or(0, UpgradeTable::max_level);
            level.clamp(0, max)
        };

        let restored = Restored {
            gold: self.settings.get_int(GOLD_KEY, 0).max(0),
            gold_per_click_level: clamp_level(
                UpgradeKind::GoldPerClick,
                self.settings.get_int(GOLD_PER_CLICK_LEVEL_KEY, 0),
            ),
            gold_per_sec_level: clamp_level(
                UpgradeKind::GoldPerSec,
                self.settings.get_int(GOLD_PER_SEC_LEVEL_KEY, 0),
            ),
        };
        self.restored = restored;
    }

    fn save(&self) {
        self.settings.set_int(GOLD_KEY, self.economy.gold());
        self.settings.set_int(
            GOLD_PER_CLICK_LEVEL_KEY,
            self.economy.level(UpgradeKind::GoldPerClick),
        );
        self.settings.set_int(
            GOLD_PER_SEC_LEVEL_KEY,
            self.economy.level(UpgradeKind::GoldPerSec),
        );
    }

    fn register_intents(&self, registry: &MethodRegistry) -> MvpResult<()> {
        let economy = Rc::clone(&self.economy);
        registry.register0(ClickerMethod::ClickAddGold, move || {
            economy.add_gold(economy.current_value(UpgradeKind::GoldPerClick));
        })?;
        let economy = Rc::clone(&self.economy);
        registry.register0(ClickerMethod::SecAddGold, move || {
            economy.add_gold(economy.current_value(UpgradeKind::GoldPerSec));
        })?;
        let economy = Rc::clone(&self.economy);
        registry.register0(ClickerMethod::UpgradeGoldPerClick, move || {
            economy.run_upgrade(UpgradeKind::GoldPerClick)
        })?;
        let economy = Rc::clone(&self.economy);
        registry.register0(ClickerMethod::UpgradeGoldPerSec, move || {
            economy.run_upgrade(UpgradeKind::GoldPerSec)
        })
    }

    fn register_queries(&self, registry: &MethodRegistry) -> MvpResult<()> {
        let economy = Rc::clone(&self.economy);
        registry.register0(ClickerQuery::Gold, move || economy.gold())?;
        let economy = Rc::clone(&self.economy);
        registry.register0(ClickerQuery::GoldPerClick, move || {
            economy.current_value(UpgradeKind::GoldPerClick)
        })?;
        let economy = Rc::clone(&self.economy);
        registry.register0(ClickerQuery::GoldPerSec, move || {
            economy.current_value(UpgradeKind::GoldPerSec)
        })?;
        let economy = Rc::clone(&self.economy);
        registry.register0(ClickerQuery::GoldPerClickLevel, move || {
            economy.level(UpgradeKind::GoldPerClick)
        })?;
        let economy = Rc::clone(&self.economy);
        registry.register0(ClickerQuery::GoldPerSecLevel, move || {
            economy.level(UpgradeKind::GoldPerSec)
        })?;
        let economy = Rc::clone(&self.economy);
        registry.register0(ClickerQuery::NextGoldPerClickCost, move || {
            economy.next_cost(UpgradeKind::GoldPerClick)
        })?;
        let economy = Rc::clone(&self.economy);
        registry.register0(ClickerQuery::NextGoldPerSecCost, move || {
            economy.next_cost(UpgradeKind::GoldPerSec)
        })
    }
}

impl Model for ClickerModel {
    fn notifier(&self) -> ChangeNotifier {
        self.record.notifier()
    }

    fn register_methods(&mut self, ctx: &PresenterContext) {
        self.registry = ctx.weak_registry();
        let registry = ctx.registry();
        if let Err(err) = self
            .register_intents(registry)
            .and_then(|()| self.register_queries(registry))
        {
            warn!(
                "event=clicker_register module=clicker status=error presenter={} error_code={}",
                ctx.presenter_name(),
                err.code()
            );
        }
    }

    fn setup(&mut self, _ctx: &PresenterContext) {
        self.load_tables();
        self.restore();
        info!(
            "event=clicker_setup module=clicker status=ok gold={} gold_per_click_level={} gold_per_sec_level={}",
            self.restored.gold,
            self.restored.gold_per_click_level,
            self.restored.gold_per_sec_level
        );
    }

    fn initialize_nested_properties(&mut self) {
        self.record
            .set(ClickerField::Data, self.economy.data.clone());
    }

    fn initialize_properties(&mut self) {
        let data = &self.economy.data;
        data.set(PlayerField::Gold, self.restored.gold);
        data.set(
            PlayerField::GoldPerClickLevel,
            self.restored.gold_per_click_level,
        );
        data.set(
            PlayerField::GoldPerSecLevel,
            self.restored.gold_per_sec_level,
        );
    }

    fn post_setup(&mut self) {
        let group = TaskGroup::new(self.scheduler.clone());
        let registry = self.registry.clone();
        group.spawn(Periodic::new(GOLD_PER_SEC_INTERVAL, move || {
            if let Some(registry) = registry.upgrade() {
                registry.invoke0(ClickerMethod::SecAddGold);
            }
        }));
        self.income = Some(group);
    }

    fn teardown(&mut self) {
        self.save();
        if let Some(group) = self.income.take() {
            group.cancel_all();
        }
        info!(
            "event=clicker_teardown module=clicker status=ok gold={}",
            self.economy.gold()
        );
    }

    fn initial_view_fields(&self) -> Vec<&'static str> {
        [
            PlayerField::Gold,
            PlayerField::GoldPerClickLevel,
            PlayerField::GoldPerSecLevel,
        ]
        .into_iter()
        .map(|field| field.name())
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{ClickerModel, UpgradeKind, UpgradeRejection};
    use crate::config::{UpgradeCatalog, UpgradeTable};
    use crate::presenter::Model;
    use crate::samples::clicker::PlayerField;
    use crate::schedule::Scheduler;
    use crate::settings::{MemorySettingsStore, SettingsStore};
    use std::rc::Rc;

    fn catalog() -> UpgradeCatalog {
        UpgradeCatalog::from_json_str(
            r#"{"name":"test","tables":{
                "GoldPerClick":{"values":[1,3],"costs":[0,20]},
                "GoldPerSec":{"values":[0,2],"costs":[0,50]}}}"#,
        )
        .expect("test catalog should parse")
    }

    fn prepared_model(store: Rc<MemorySettingsStore>) -> ClickerModel {
        let mut model = ClickerModel::new(store, Scheduler::new()).with_catalog(catalog());
        model.load_tables();
        model.restore();
        model.initialize_properties();
        model
    }

    #[test]
    fn upgrade_rejects_without_mutation_then_succeeds() {
        let store = Rc::new(MemorySettingsStore::new());
        store.set_int(super::GOLD_KEY, 15);
        let model = prepared_model(store);

        assert_eq!(
            model.upgrade(UpgradeKind::GoldPerClick),
            Err(UpgradeRejection::InsufficientGold { cost: 20, gold: 15 })
        );
        assert_eq!(model.player().get::<i64>(PlayerField::Gold), 15);

        model.player().set(PlayerField::Gold, 25_i64);
        assert_eq!(model.upgrade(UpgradeKind::GoldPerClick), Ok(1));
        assert_eq!(model.player().get::<i64>(PlayerField::Gold), 5);
        assert_eq!(
            model.upgrade(UpgradeKind::GoldPerClick),
            Err(UpgradeRejection::MaxLevel { level: 1 })
        );
    }

    #[test]
    fn injected_catalog_with_negative_cost_is_not_loaded() {
        let catalog = UpgradeCatalog {
            name: "broken".to_string(),
            tables: [(
                "GoldPerClick".to_string(),
                UpgradeTable {
                    values: vec![1, 2],
                    costs: vec![0, -10],
                },
            )]
            .into_iter()
            .collect(),
        };
        let store = Rc::new(MemorySettingsStore::new());
        store.set_int(super::GOLD_KEY, i64::MAX);
        let mut model = ClickerModel::new(store, Scheduler::new()).with_catalog(catalog);
        model.load_tables();
        model.restore();
        model.initialize_properties();

        assert_eq!(
            model.upgrade(UpgradeKind::GoldPerClick),
            Err(UpgradeRejection::MissingConfig)
        );
        assert_eq!(model.player().get::<i64>(PlayerField::Gold), i64::MAX);
    }

    #[test]
    fn restored_levels_are_clamped_into_table_range() {
        let store = Rc::new(MemorySettingsStore::new());
        store.set_int(super::GOLD_PER_CLICK_LEVEL_KEY, 9);
        store.set_int(super::GOLD_PER_SEC_LEVEL_KEY, -3);
        let model = prepared_model(store);

        assert_eq!(model.player().get::<i64>(PlayerField::GoldPerClickLevel), 1);
        assert_eq!(model.player().get::<i64>(PlayerField::GoldPerSecLevel), 0);
    }

    #[test]
    fn teardown_saves_progress() {
        let store = Rc::new(MemorySettingsStore::new());
        let mut model = prepared_model(Rc::clone(&store));
        model.player().set(PlayerField::Gold, 77_i64);

        model.teardown();

        assert_eq!(store.get_int(super::GOLD_KEY, 0), 77);
        assert_eq!(store.get_int(super::GOLD_PER_SEC_LEVEL_KEY, -1), 0);
    }
}
