//! Clicker view: header texts, upgrade buttons, the tap area and the
//! growing circle.

use super::keys::{
    ClickerButton, ClickerMethod, ClickerPanel, ClickerQuery, ClickerText, ClickerTransform,
    PlayerField,
};
use crate::presenter::{PresenterContext, View};
use crate::registry::MethodRegistry;
use crate::schedule::{Scheduler, TaskHandle, Tween};
use crate::view::{
    ButtonElement, ElementKey, ElementTable, PanelElement, TextElement, TransformElement, UiNode,
    UiTree,
};
use log::debug;
use std::any::Any;
use std::rc::{Rc, Weak};
use std::time::Duration;

const CIRCLE_SCALE_UP_TIME: Duration = Duration::from_millis(100);
const CIRCLE_SCALE_PER_GOLD: f32 = 0.00001;
const CIRCLE_MIN_SCALE: f32 = 0.01;
const CIRCLE_MAX_SCALE: f32 = 6.5;

/// Circle scale the view grows toward for `gold`.
pub fn circle_target_scale(gold: i64) -> f32 {
    (gold as f32 * CIRCLE_SCALE_PER_GOLD).clamp(CIRCLE_MIN_SCALE, CIRCLE_MAX_SCALE)
}

/// Presentation unit of the clicker screen.
pub struct ClickerView {
    tree: Rc<UiTree>,
    scheduler: Scheduler,
    elements: Option<ElementTable>,
    registry: Weak<MethodRegistry>,
    circle_tween: Option<TaskHandle>,
}

impl ClickerView {
    /// `tree` is searched once at bind; `scheduler` drives the circle tween.
    pub fn new(tree: Rc<UiTree>, scheduler: Scheduler) -> Self {
        Self {
            tree,
            scheduler,
            elements: None,
            registry: Weak::new(),
            circle_tween: None,
        }
    }

    pub fn text(&self, key: ClickerText) -> Option<Rc<TextElement>> {
        self.element(key)
    }

    pub fn button(&self, key: ClickerButton) -> Option<Rc<ButtonElement>> {
        self.element(key)
    }

    fn element<E: Any, K: ElementKey>(&self, key: K) -> Option<Rc<E>> {
        self.elements.as_ref()?.get_by_key::<E, K>(key)
    }

    fn set_text(&self, key: ClickerText, text: impl Into<String>) {
        if let Some(element) = self.text(key) {
            element.set_text(text);
        }
    }

    fn query<R: 'static>(&self, key: ClickerQuery) -> Option<R> {
        self.registry.upgrade()?.call0::<_, R>(key)
    }

    fn wire(&self, key: ClickerButton, intent: ClickerMethod) {
        let Some(button) = self.button(key) else {
            return;
        };
        let registry = self.registry.clone();
        button.add_listener(move || {
            if let Some(registry) = registry.upgrade() {
                registry.invoke0(intent);
            }
        });
    }

    fn refresh_gold(&mut self) {
        let gold = self.query::<i64>(ClickerQuery::Gold).unwrap_or(0);
        self.set_text(ClickerText::CurrentGoldText, gold.to_string());
        self.refresh_affordability(gold);
        self.grow_circle(gold);
    }

    fn refresh_upgrade(
        &self,
        value_query: ClickerQuery,
        level_query: ClickerQuery,
        cost_query: ClickerQuery,
        texts: [ClickerText; 3],
        unit: &str,
    ) {
        let [value_text, level_text, cost_text] = texts;
        let value = self.query::<i64>(value_query).unwrap_or(0);
        let level = self.query::<i64>(level_query).unwrap_or(0);
        let cost = self.query::<Option<i64>>(cost_query).flatten();

        self.set_text(value_text, format!("+{value} {unit}"));
        match cost {
            Some(cost) => {
                self.set_text(level_text, format!("Lv.{}", level + 1));
                self.set_text(cost_text, cost.to_string());
            }
            None => {
                self.set_text(level_text, "MAX");
                self.set_text(cost_text, "-");
            }
        }
        let gold = self.query::<i64>(ClickerQuery::Gold).unwrap_or(0);
        self.refresh_affordability(gold);
    }

    fn refresh_affordability(&self, gold: i64) {
        let pairs = [
            (
                ClickerButton::GoldPerClickUpgradeButton,
                ClickerQuery::NextGoldPerClickCost,
            ),
            (
                ClickerButton::GoldPerSecUpgradeButton,
                ClickerQuery::NextGoldPerSecCost,
            ),
        ];
        for (button, cost_query) in pairs {
            let affordable = self
                .query::<Option<i64>>(cost_query)
                .flatten()
                .is_some_and(|cost| cost <= gold);
            if let Some(button) = self.button(button) {
                button.set_interactable(affordable);
            }
        }
    }

    fn grow_circle(&mut self, gold: i64) {
        let Some(circle) = self.element::<TransformElement, _>(ClickerTransform::Circle) else {
            return;
        };
        let start = circle.scale();
        let target = circle_target_scale(gold);
        // Replacing the handle cancels a tween still in flight.
        self.circle_tween = Some(self.scheduler.spawn(Tween::new(
            start,
            target,
            CIRCLE_SCALE_UP_TIME,
            move |scale| circle.set_uniform_scale(scale),
        )));
    }

    fn set_visible(&self, visible: bool) {
        if let Some(panel) = self.element::<PanelElement, _>(ClickerPanel::ClickerRoot) {
            panel.set_visible(visible);
        }
    }
}

impl View for ClickerView {
    fn bind(&mut self, ctx: &PresenterContext) {
        let mut table = ElementTable::new("ClickerView", ctx.diagnostics().clone());
        let tree = &self.tree;
        table.bind::<TextElement, ClickerText>(|name| tree.find(name));
        table.bind::<ButtonElement, ClickerButton>(|name| tree.find(name));
        table.bind::<TransformElement, ClickerTransform>(|name| tree.find(name));
        table.bind::<PanelElement, ClickerPanel>(|name| tree.find(name));
        self.elements = Some(table);
        self.registry = ctx.weak_registry();
    }

    fn on_listeners_complete(&mut self) {
        self.wire(ClickerButton::ScreenButton, ClickerMethod::ClickAddGold);
        self.wire(
            ClickerButton::GoldPerClickUpgradeButton,
            ClickerMethod::UpgradeGoldPerClick,
        );
        self.wire(
            ClickerButton::GoldPerSecUpgradeButton,
            ClickerMethod::UpgradeGoldPerSec,
        );
    }

    fn update_view(&mut self, field: &str) {
        match PlayerField::from_name(field) {
            Some(PlayerField::Gold) => self.refresh_gold(),
            Some(PlayerField::GoldPerClickLevel) => self.refresh_upgrade(
                ClickerQuery::GoldPerClick,
                ClickerQuery::GoldPerClickLevel,
                ClickerQuery::NextGoldPerClickCost,
                [
                    ClickerText::GoldPerClickText,
                    ClickerText::NextGoldPerClickLevelText,
                    ClickerText::NextGoldPerClickCostText,
                ],
                "/ click",
            ),
            Some(PlayerField::GoldPerSecLevel) => self.refresh_upgrade(
                ClickerQuery::GoldPerSec,
                ClickerQuery::GoldPerSecLevel,
                ClickerQuery::NextGoldPerSecCost,
                [
                    ClickerText::GoldPerSecText,
                    ClickerText::NextGoldPerSecLevelText,
                    ClickerText::NextGoldPerSecCostText,
                ],
                "/ sec",
            ),
            None => debug!(
                "event=view_update module=clicker status=skip field={}",
                field
            ),
        }
    }

    fn show_view(&mut self) {
        self.set_visible(true);
    }

    fn hide_view(&mut self) {
        self.set_visible(false);
    }
}

/// Builds the element hierarchy the clicker view binds against.
pub fn build_clicker_tree() -> UiTree {
    fn texts<'a>(keys: impl IntoIterator<Item = &'a ClickerText>) -> Vec<UiNode> {
        keys.into_iter()
            .map(|key| UiNode::with_element(key.name(), Rc::new(TextElement::new(key.name()))))
            .collect()
    }

    let mut header = UiNode::group("Header");
    for node in texts(&[
        ClickerText::GoldPerClickText,
        ClickerText::GoldPerSecText,
        ClickerText::CurrentGoldText,
    ]) {
        header.push(node);
    }

    let mut upgrades = UiNode::group("Upgrades");
    for button in [
        ClickerButton::GoldPerClickUpgradeButton,
        ClickerButton::GoldPerSecUpgradeButton,
    ] {
        upgrades.push(UiNode::with_element(
            button.name(),
            Rc::new(ButtonElement::new(button.name())),
        ));
    }
    for node in texts(&[
        ClickerText::NextGoldPerClickLevelText,
        ClickerText::NextGoldPerSecLevelText,
        ClickerText::NextGoldPerClickCostText,
        ClickerText::NextGoldPerSecCostText,
    ]) {
        upgrades.push(node);
    }

    let screen = ClickerButton::ScreenButton.name();
    let circle = ClickerTransform::Circle.name();
    let root = ClickerPanel::ClickerRoot.name();
    UiTree::new(
        UiNode::with_element(root, Rc::new(PanelElement::new(root)))
            .child(header)
            .child(upgrades)
            .child(UiNode::with_element(screen, Rc::new(ButtonElement::new(screen))))
            .child(UiNode::with_element(
                circle,
                Rc::new(TransformElement::new(circle)),
            )),
    )
}

#[cfg(test)]
mod tests {
    use super::{build_clicker_tree, circle_target_scale};
    use crate::samples::clicker::{ClickerButton, ClickerText};
    use crate::view::{ButtonElement, ElementKey, TextElement};

    #[test]
    fn circle_target_scale_is_clamped() {
        assert_eq!(circle_target_scale(0), 0.01);
        assert_eq!(circle_target_scale(10_000_000), 6.5);
        assert!((circle_target_scale(100_000) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn built_tree_contains_every_bound_name() {
        let tree = build_clicker_tree();
        for key in ClickerText::ALL {
            assert!(tree.find::<TextElement>(key.name()).is_some(), "{key:?}");
        }
        for key in ClickerButton::ALL {
            assert!(tree.find::<ButtonElement>(key.name()).is_some(), "{key:?}");
        }
    }
}
