//! Model-view-presenter runtime for loosely coupled UI components.
//!
//! A [`Presenter`] owns one [`Model`] and one [`View`]. They never hold each
//! other; the model's [`ObservableRecord`] notifies the presenter, the
//! presenter forwards field names to the view, and both sides call each
//! other only through the presenter's [`MethodRegistry`].
//!
//! Wiring faults never panic. They are logged and kept in the presenter's
//! [`Diagnostics`].

pub mod config;
pub mod db;
pub mod diagnostics;
pub mod keys;
pub mod logging;
pub mod presenter;
pub mod record;
pub mod registry;
pub mod samples;
pub mod schedule;
pub mod settings;
pub mod view;

pub use config::{ConfigError, ConfigResult, UpgradeCatalog, UpgradeTable};
pub use diagnostics::{Diagnostics, MvpError, MvpResult, Report, Role};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig};
pub use presenter::{
    HostLifecycle, Model, ModelHook, Presenter, PresenterContext, PresenterState, View, ViewHook,
};
pub use record::{ChangeNotifier, FieldKey, FieldValue, ObservableRecord, SubscriptionId};
pub use registry::{MethodKey, MethodRegistry};
pub use schedule::{
    CooperativeTask, Periodic, Scheduler, TaskGroup, TaskHandle, TaskId, TaskStatus, Tween,
};
pub use settings::{MemorySettingsStore, SettingsStore, SqliteSettingsStore};
pub use view::{
    ButtonElement, ElementKey, ElementTable, PanelElement, TextElement, TransformElement, UiNode,
    UiTree,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
