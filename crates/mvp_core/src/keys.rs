//! Declaration macros for closed key enumerations.
//!
//! Field identifiers, method keys and bound-element names are all plain
//! fieldless enums with a stable name per variant and a declaration-ordered
//! `ALL` table. The macros below generate that boilerplate and the matching
//! trait impl.

#[doc(hidden)]
#[macro_export]
macro_rules! __named_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stable variant name.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),+
                }
            }

            /// Parses a variant from its stable name.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $(stringify!($variant) => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

/// Declares a closed set of record fields implementing `FieldKey`.
///
/// ```ignore
/// record_fields! {
///     pub enum PlayerField { Gold, GoldPerClickLevel }
/// }
/// ```
#[macro_export]
macro_rules! record_fields {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident { $($(#[$vmeta:meta])* $variant:ident),+ $(,)? }
    ) => {
        $crate::__named_enum! {
            $(#[$meta])*
            $vis enum $name { $($(#[$vmeta])* $variant),+ }
        }

        impl $crate::record::FieldKey for $name {
            fn name(self) -> &'static str {
                self.as_str()
            }
        }
    };
}

/// Declares a closed set of registry keys implementing `MethodKey`.
#[macro_export]
macro_rules! method_keys {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident { $($(#[$vmeta:meta])* $variant:ident),+ $(,)? }
    ) => {
        $crate::__named_enum! {
            $(#[$meta])*
            $vis enum $name { $($(#[$vmeta])* $variant),+ }
        }

        impl $crate::registry::MethodKey for $name {
            fn ordinal(self) -> u32 {
                self as u32
            }

            fn label(self) -> &'static str {
                self.as_str()
            }
        }
    };
}

/// Declares the element names a view binds, in slot order.
#[macro_export]
macro_rules! element_keys {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident { $($(#[$vmeta:meta])* $variant:ident),+ $(,)? }
    ) => {
        $crate::__named_enum! {
            $(#[$meta])*
            $vis enum $name { $($(#[$vmeta])* $variant),+ }
        }

        impl $crate::view::ElementKey for $name {
            fn all() -> &'static [Self] {
                Self::ALL
            }

            fn name(self) -> &'static str {
                self.as_str()
            }

            fn index(self) -> usize {
                self as usize
            }
        }
    };
}
