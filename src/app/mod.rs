use eframe::egui;
use log::info;

use crate::assets::BrandAssets;
use crate::config::app_config::AppConfig;
use crate::config::theme::ThemeConfig;
use crate::loader::script::ScriptedLoader;
use crate::loader::LoaderHandle;
use crate::ui::host::PlaceholderHost;
use crate::ui::screen::EntryScreen;

pub struct PharaohsApp {
    pub screen: EntryScreen,
    /// Demo driver standing in for the web loader.
    pub script: ScriptedLoader,
}

impl PharaohsApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let theme = ThemeConfig::load();
        let loader = LoaderHandle::default();
        let host = PlaceholderHost::new(config.content_url.clone(), &theme);
        let assets = BrandAssets::new(config.resolved_asset_dir());
        let screen = EntryScreen::new(&cc.egui_ctx, loader.clone(), Box::new(host), theme, assets);
        info!("Playing demo script with {} steps", config.demo_script.len());
        let script = ScriptedLoader::new(loader, config.demo_script);
        Self { screen, script }
    }
}

impl eframe::App for PharaohsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = ctx.input().time;
        self.script.advance(now);
        self.screen.show(ctx);
        if !self.script.is_done() {
            ctx.request_repaint();
        }
    }
}
