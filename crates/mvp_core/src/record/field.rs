//! Field identifiers and storable field values.

use super::notifier::ChangeNotifier;
use std::fmt::Debug;
use std::hash::Hash;

/// Closed enumeration of the fields one record exposes.
///
/// Declare implementors with [`record_fields!`](crate::record_fields).
pub trait FieldKey: Copy + Eq + Hash + Debug + 'static {
    /// Stable name delivered to subscribers when this field changes.
    fn name(self) -> &'static str;
}

/// A value that can live in an [`ObservableRecord`](super::ObservableRecord).
///
/// Equality decides whether a `set` is a real change; `Default` is what a
/// `get` of an absent field returns.
pub trait FieldValue: Clone + PartialEq + Default + 'static {
    /// Notifier to relay from when this value is itself observable.
    fn relay_source(&self) -> Option<ChangeNotifier> {
        None
    }
}

macro_rules! plain_field_values {
    ($($ty:ty),+ $(,)?) => {
        $(impl FieldValue for $ty {})+
    };
}

plain_field_values!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    String,
);

impl<T: FieldValue> FieldValue for Option<T> {
    fn relay_source(&self) -> Option<ChangeNotifier> {
        self.as_ref().and_then(FieldValue::relay_source)
    }
}

impl<T: Clone + PartialEq + 'static> FieldValue for Vec<T> {}
