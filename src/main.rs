use std::path::Path;

use eframe::egui;
use tak_tools::executor::ProcessExecutor;
use tak_tools::gui::{ShelfApp, StartupErrorApp};
use tak_tools::logging;
use tak_tools::session::ToolSession;
use tak_tools::settings::{Settings, SETTINGS_FILE};
use tak_tools::store::ShelfStore;

fn native_options(settings: &Settings) -> eframe::NativeOptions {
    let (w, h) = settings.window_size.unwrap_or((640, 480));
    eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([w as f32, h as f32])
            .with_min_inner_size([320.0, 200.0]),
        ..Default::default()
    }
}

fn main() -> anyhow::Result<()> {
    let settings_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| SETTINGS_FILE.to_string());
    let first_run = !Path::new(&settings_path).exists();
    let settings = Settings::load(&settings_path)?;
    logging::init(settings.debug_logging, settings.log_file.as_deref().map(Path::new));

    let shelf_dir = settings.shelf_dir();
    if first_run {
        tracing::info!(dir = %shelf_dir.display(), "first run, creating shelf folder");
        ShelfStore::init(&shelf_dir)?;
        settings.save(&settings_path)?;
    }

    let executor = ProcessExecutor::new(settings.interpreters.clone());
    let failures = executor.failures();
    let options = native_options(&settings);
    let session = ToolSession::open(
        ShelfStore::new(&shelf_dir),
        Box::new(executor),
        settings.session_options(),
    );

    let result = match session {
        Ok(session) => {
            tracing::info!(
                shelves = session.registry().task_shelves().len() + 1,
                buttons = session.registry().button_count(),
                "shelves loaded"
            );
            let app = ShelfApp::new(session, &settings, failures);
            eframe::run_native("Tak Tools", options, Box::new(|_cc| Box::new(app)))
        }
        Err(e) if e.is_fatal() => {
            tracing::error!("{e}");
            let app = StartupErrorApp::new(&e);
            eframe::run_native("Tak Tools", options, Box::new(|_cc| Box::new(app)))
        }
        Err(e) => return Err(e.into()),
    };
    result.map_err(|e| anyhow::anyhow!("window error: {e}"))
}
