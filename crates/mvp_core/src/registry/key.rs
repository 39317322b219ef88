//! Opaque registry keys.

use std::any::{type_name, TypeId};
use std::fmt::Debug;

/// Owner-defined enumerated key for one registry entry.
///
/// Declare implementors with [`method_keys!`](crate::method_keys). Keys of
/// different enum types never collide, even with equal ordinals.
pub trait MethodKey: Copy + Debug + 'static {
    fn ordinal(self) -> u32;

    fn label(self) -> &'static str;
}

/// Type-erased table key: the key's enum type plus its ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct RegistryKey {
    owner: TypeId,
    ordinal: u32,
}

impl RegistryKey {
    pub(crate) fn of<K: MethodKey>(key: K) -> Self {
        Self {
            owner: TypeId::of::<K>(),
            ordinal: key.ordinal(),
        }
    }
}

/// Human-readable `Enum::Variant` form used in logs and errors.
pub(crate) fn describe_key<K: MethodKey>(key: K) -> String {
    let full = type_name::<K>();
    let owner = full.rsplit("::").next().unwrap_or(full);
    format!("{owner}::{}", key.label())
}
