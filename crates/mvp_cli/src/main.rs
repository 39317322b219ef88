//! Headless clicker demo.
//!
//! Wires the clicker sample against an in-memory element tree, simulates a
//! few seconds of taps and ticks, and prints what the view rendered.
//!
//! Usage: `mvp_cli [log_dir]` (absolute path enables file logging).

use mvp_core::samples::clicker::{
    build_clicker_tree, ClickerButton, ClickerModel, ClickerPresenter, ClickerText,
    ClickerTransform, ClickerView, GOLD_KEY,
};
use mvp_core::{
    default_log_level, init_logging, ButtonElement, ElementKey, HostLifecycle,
    MemorySettingsStore, Scheduler, SettingsStore, SqliteSettingsStore, TextElement,
    TransformElement,
};
use log::info;
use std::rc::Rc;
use std::time::Duration;

const FRAME: Duration = Duration::from_millis(50);

fn main() {
    if let Some(log_dir) = std::env::args().nth(1) {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let settings: Rc<dyn SettingsStore> = match SqliteSettingsStore::open_in_memory() {
        Ok(store) => Rc::new(store),
        Err(err) => {
            eprintln!("sqlite settings unavailable ({err}); using memory store");
            Rc::new(MemorySettingsStore::new())
        }
    };

    let scheduler = Scheduler::new();
    let tree = Rc::new(build_clicker_tree());
    let mut presenter = ClickerPresenter::new("ClickerPresenter")
        .with_model(ClickerModel::new(Rc::clone(&settings), scheduler.clone()))
        .with_view(ClickerView::new(Rc::clone(&tree), scheduler.clone()));

    presenter.on_activate();
    presenter.show_view();
    println!(
        "mvp_core version={} presenter={} state={}",
        mvp_core::core_version(),
        presenter.id(),
        presenter.state().as_str()
    );

    let click = |key: ClickerButton| {
        tree.find::<ButtonElement>(key.name())
            .is_some_and(|button| button.click())
    };

    for _ in 0..30 {
        click(ClickerButton::ScreenButton);
        scheduler.tick(FRAME);
    }
    let bought = click(ClickerButton::GoldPerClickUpgradeButton);
    println!("bought gold-per-click upgrade: {bought}");

    for _ in 0..30 {
        click(ClickerButton::ScreenButton);
        scheduler.tick(FRAME);
    }
    click(ClickerButton::GoldPerSecUpgradeButton);
    for _ in 0..100 {
        scheduler.tick(FRAME);
    }

    for key in ClickerText::ALL {
        let text = tree
            .find::<TextElement>(key.name())
            .map(|element| element.text())
            .unwrap_or_default();
        println!("{:<28} {}", key.name(), text);
    }
    if let Some(circle) = tree.find::<TransformElement>(ClickerTransform::Circle.name()) {
        println!("{:<28} {:.5}", "Circle.scale", circle.scale());
    }

    presenter.on_destroy();
    info!(
        "event=demo_finish module=cli status=ok presenter={} ticks={}",
        presenter.id(),
        scheduler.elapsed().as_millis() / FRAME.as_millis()
    );
    println!(
        "saved {}={} faults={}",
        GOLD_KEY,
        settings.get_int(GOLD_KEY, 0),
        presenter.diagnostics().len()
    );
}
