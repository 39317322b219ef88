//! Clicker sample: tap for gold, buy per-click and per-second upgrades.
//!
//! The model owns a nested `PlayerField` record under `ClickerField::Data`;
//! the view only talks to it through `ClickerMethod` intents and
//! `ClickerQuery` reads in the presenter's registry.

mod keys;
mod model;
mod view;

pub use keys::{
    ClickerButton, ClickerField, ClickerMethod, ClickerPanel, ClickerQuery, ClickerText,
    ClickerTransform, PlayerField,
};
pub use model::{
    ClickerModel, UpgradeKind, UpgradeRejection, GOLD_KEY, GOLD_PER_CLICK_LEVEL_KEY,
    GOLD_PER_SEC_LEVEL_KEY,
};
pub use view::{build_clicker_tree, circle_target_scale, ClickerView};

use crate::presenter::Presenter;

pub type ClickerPresenter = Presenter<ClickerModel, ClickerView>;
