use mvp_core::{
    element_keys, method_keys, record_fields, ElementTable, HostLifecycle, MethodRegistry, Model,
    ObservableRecord, PanelElement, Presenter, PresenterContext, PresenterState, TextElement,
    UiNode, UiTree, View, ViewHook,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

record_fields! {
    enum Wallet { Gold }
}

method_keys! {
    enum WalletMethod { AddGold }
}

method_keys! {
    enum WalletQuery { Gold }
}

element_keys! {
    enum WalletText { GoldText }
}

element_keys! {
    enum WalletPanel { Root }
}

type Journal = Rc<RefCell<Vec<String>>>;

/// What `WalletView::show_view` does through the registry before showing.
#[derive(Clone, Copy, PartialEq, Eq)]
enum OnShow {
    Nothing,
    HideAgain,
    AddGold,
}

fn note(journal: &Journal, entry: &str) {
    journal.borrow_mut().push(entry.to_string());
}

struct WalletModel {
    record: ObservableRecord<Wallet>,
    journal: Journal,
}

impl Model for WalletModel {
    fn notifier(&self) -> mvp_core::ChangeNotifier {
        self.record.notifier()
    }

    fn register_methods(&mut self, ctx: &PresenterContext) {
        note(&self.journal, "model.register_methods");
        let record = self.record.clone();
        ctx.registry()
            .register0(WalletMethod::AddGold, move || {
                record.update(Wallet::Gold, |gold: i64| gold + 10);
            })
            .unwrap();
        let record = self.record.clone();
        ctx.registry()
            .register0(WalletQuery::Gold, move || record.get::<i64>(Wallet::Gold))
            .unwrap();
    }

    fn setup(&mut self, _ctx: &PresenterContext) {
        note(&self.journal, "model.setup");
    }

    fn initialize_nested_properties(&mut self) {
        note(&self.journal, "model.initialize_nested_properties");
    }

    fn initialize_properties(&mut self) {
        note(&self.journal, "model.initialize_properties");
        self.record.set(Wallet::Gold, 0_i64);
    }

    fn post_setup(&mut self) {
        note(&self.journal, "model.post_setup");
    }

    fn teardown(&mut self) {
        note(&self.journal, "model.teardown");
    }
}

struct WalletView {
    tree: Rc<UiTree>,
    elements: Option<ElementTable>,
    registry: Weak<MethodRegistry>,
    journal: Journal,
    updates: Journal,
    on_show: OnShow,
}

impl View for WalletView {
    fn bind(&mut self, ctx: &PresenterContext) {
        note(&self.journal, "view.bind");
        let mut table = ElementTable::new("WalletView", ctx.diagnostics().clone());
        let tree = Rc::clone(&self.tree);
        table.bind::<TextElement, WalletText>(|name| tree.find(name));
        table.bind::<PanelElement, WalletPanel>(|name| tree.find(name));
        self.elements = Some(table);
        self.registry = ctx.weak_registry();
    }

    fn register_methods(&mut self, _ctx: &PresenterContext) {
        note(&self.journal, "view.register_methods");
    }

    fn on_bind_complete(&mut self) {
        note(&self.journal, "view.bind_complete");
    }

    fn on_listeners_complete(&mut self) {
        note(&self.journal, "view.listeners_complete");
    }

    fn on_setup_complete(&mut self) {
        note(&self.journal, "view.setup_complete");
    }

    fn update_view(&mut self, field: &str) {
        note(&self.updates, field);
        if field == "Gold" {
            let gold = self
                .registry
                .upgrade()
                .and_then(|registry| registry.call0::<_, i64>(WalletQuery::Gold))
                .unwrap_or_default();
            if let Some(text) = self
                .elements
                .as_ref()
                .and_then(|table| table.get_by_key::<TextElement, _>(WalletText::GoldText))
            {
                text.set_text(gold.to_string());
            }
        }
    }

    fn show_view(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            match self.on_show {
                OnShow::Nothing => {}
                OnShow::HideAgain => {
                    registry.invoke0(ViewHook::HideView);
                }
                OnShow::AddGold => {
                    registry.invoke0(WalletMethod::AddGold);
                }
            }
        }
        self.set_visible(true);
    }

    fn hide_view(&mut self) {
        self.set_visible(false);
    }
}

impl WalletView {
    fn set_visible(&self, visible: bool) {
        if let Some(panel) = self
            .elements
            .as_ref()
            .and_then(|table| table.get_by_key::<PanelElement, _>(WalletPanel::Root))
        {
            panel.set_visible(visible);
        }
    }
}

struct Fixture {
    presenter: Presenter<WalletModel, WalletView>,
    journal: Journal,
    updates: Journal,
    gold_text: Rc<TextElement>,
    panel: Rc<PanelElement>,
}

fn fixture() -> Fixture {
    fixture_with(OnShow::Nothing)
}

fn fixture_with(on_show: OnShow) -> Fixture {
    let journal: Journal = Rc::default();
    let updates: Journal = Rc::default();
    let gold_text = Rc::new(TextElement::new("GoldText"));
    let panel = Rc::new(PanelElement::new("Root"));
    let tree = Rc::new(UiTree::new(
        UiNode::with_element("Root", Rc::clone(&panel))
            .child(UiNode::with_element("GoldText", Rc::clone(&gold_text))),
    ));

    let presenter = Presenter::new("WalletPresenter")
        .with_model(WalletModel {
            record: ObservableRecord::new(),
            journal: Rc::clone(&journal),
        })
        .with_view(WalletView {
            tree,
            elements: None,
            registry: Weak::new(),
            journal: Rc::clone(&journal),
            updates: Rc::clone(&updates),
            on_show,
        });

    Fixture {
        presenter,
        journal,
        updates,
        gold_text,
        panel,
    }
}

#[test]
fn add_gold_updates_view_exactly_once() {
    let mut fx = fixture();
    assert!(fx.presenter.initialize());
    assert!(fx.updates.borrow().is_empty());

    assert!(fx.presenter.registry().invoke0(WalletMethod::AddGold));

    assert_eq!(*fx.updates.borrow(), vec!["Gold"]);
    assert_eq!(fx.gold_text.text(), "10");
    assert!(fx.presenter.diagnostics().is_empty());
}

#[test]
fn init_runs_hooks_in_fixed_order() {
    let mut fx = fixture();
    fx.presenter.initialize();

    assert_eq!(
        *fx.journal.borrow(),
        vec![
            "model.register_methods",
            "model.setup",
            "view.bind",
            "view.register_methods",
            "view.bind_complete",
            "view.listeners_complete",
            "model.initialize_nested_properties",
            "model.initialize_properties",
            "view.setup_complete",
            "model.post_setup",
        ]
    );
    assert_eq!(fx.presenter.state(), PresenterState::Ready);
}

#[test]
fn second_initialize_is_a_no_op() {
    let mut fx = fixture();
    assert!(fx.presenter.initialize());
    assert!(!fx.presenter.initialize());
    fx.presenter.on_activate();

    let journal = fx.journal.borrow();
    let count = |entry: &str| journal.iter().filter(|seen| *seen == entry).count();
    assert_eq!(count("model.setup"), 1);
    assert_eq!(count("model.post_setup"), 1);
    assert_eq!(fx.presenter.diagnostics().count_code("duplicate_registration"), 0);
}

#[test]
fn missing_view_aborts_init_until_attached() {
    let journal: Journal = Rc::default();
    let mut presenter: Presenter<WalletModel, WalletView> = Presenter::new("Headless")
        .with_model(WalletModel {
            record: ObservableRecord::new(),
            journal: Rc::clone(&journal),
        });

    assert!(!presenter.initialize());
    assert_eq!(presenter.state(), PresenterState::Uninitialized);
    assert_eq!(presenter.diagnostics().count_code("missing_collaborator"), 1);
    assert!(journal.borrow().is_empty());
    assert!(!presenter.show_view());
    assert_eq!(presenter.diagnostics().count_code("missing_collaborator"), 2);

    presenter.attach_view(WalletView {
        tree: Rc::new(UiTree::new(UiNode::group("Empty"))),
        elements: None,
        registry: Weak::new(),
        journal: Rc::clone(&journal),
        updates: Rc::default(),
        on_show: OnShow::Nothing,
    });
    assert!(presenter.initialize());
    assert_eq!(presenter.state(), PresenterState::Ready);
}

#[test]
fn show_and_hide_toggle_visibility_repeatedly() {
    let mut fx = fixture();
    fx.presenter.initialize();

    assert!(fx.presenter.hide_view());
    assert!(fx.presenter.hide_view());
    assert!(!fx.panel.is_visible());
    assert!(fx.presenter.show_view());
    assert!(fx.panel.is_visible());
    assert_eq!(fx.panel.visibility_sets(), 3);
}

#[test]
fn reentrant_view_hook_is_reported_not_panicking() {
    let mut fx = fixture_with(OnShow::HideAgain);
    fx.presenter.initialize();

    assert!(fx.presenter.show_view());

    assert!(fx.panel.is_visible());
    assert_eq!(fx.presenter.diagnostics().count_code("reentrant_dispatch"), 1);
}

#[test]
fn destroy_tears_down_and_stops_forwarding() {
    let mut fx = fixture();
    fx.presenter.initialize();
    let record = fx
        .presenter
        .model()
        .map(|model| model.borrow().record.clone())
        .unwrap();

    fx.presenter.on_destroy();

    assert_eq!(fx.presenter.state(), PresenterState::Destroyed);
    assert!(fx.presenter.registry().is_empty());
    assert_eq!(fx.journal.borrow().last().unwrap(), "model.teardown");

    record.set(Wallet::Gold, 99_i64);
    assert!(fx.updates.borrow().is_empty());
    assert!(!fx.presenter.initialize());
}

#[test]
fn intent_raised_inside_a_view_hook_still_updates_the_view() {
    let mut fx = fixture_with(OnShow::AddGold);
    fx.presenter.initialize();

    assert!(fx.presenter.show_view());

    assert_eq!(*fx.updates.borrow(), vec!["Gold"]);
    assert_eq!(fx.gold_text.text(), "10");
    assert_eq!(fx.presenter.pending_view_updates(), 0);
    assert_eq!(fx.presenter.diagnostics().count_code("reentrant_dispatch"), 0);
}
