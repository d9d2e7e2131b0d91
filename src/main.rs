mod app;
mod assets;
mod config;
mod loader;
mod ui;

use config::app_config::AppConfig;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load();
    let title = config.window_title.clone();
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Box::new(app::PharaohsApp::new(cc, config))),
    );
}
