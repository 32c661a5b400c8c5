use sketch_studio::app::StudioApp;
use sketch_studio::constant;
use sketch_studio::ui;

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let options = ui::viewport::build_viewport();

    eframe::run_native(
        constant::DEFAULT_WINDOW_TITLE,
        options,
        Box::new(|cc| Ok(Box::new(StudioApp::new(cc)))),
    )
}
