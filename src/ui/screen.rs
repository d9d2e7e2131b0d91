//! Entry screen: the content host with a state-selected overlay on top.

use eframe::egui;
use log::{info, warn};

use crate::assets::BrandAssets;
use crate::config::theme::ThemeConfig;
use crate::loader::{LoadState, LoaderHandle, Subscription};
use crate::ui::host::ContentHost;
use crate::ui::indicators::{show_error_indicator, show_offline_indicator};
use crate::ui::loading::LoadingOverlay;
use crate::ui::progress_bar::percentage;

/// Which overlay a state calls for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Overlay<'a> {
    Progress(f64),
    Error(&'a str),
    Offline,
    None,
}

pub fn overlay_for(state: &LoadState) -> Overlay<'_> {
    match state {
        LoadState::Progressing(progress) => Overlay::Progress(*progress),
        LoadState::Failure(message) => Overlay::Error(message),
        LoadState::NoConnection => Overlay::Offline,
        LoadState::Idle | LoadState::Finished => Overlay::None,
    }
}

/// Fully opaque once loading finished, dimmed otherwise.
pub fn content_opacity(state: &LoadState, theme: &ThemeConfig) -> f32 {
    match state {
        LoadState::Finished => 1.0,
        _ => theme.pending_host_opacity,
    }
}

pub struct EntryScreen {
    loader: LoaderHandle,
    _subscription: Subscription,
    host: Box<dyn ContentHost>,
    theme: ThemeConfig,
    assets: BrandAssets,
    state: LoadState,
    seen_revision: Option<u64>,
    progress_overlay: Option<LoadingOverlay>,
}

impl EntryScreen {
    /// Subscribes to `loader` so every published state schedules a repaint of
    /// `ctx`. The subscription ends when the screen is dropped.
    pub fn new(
        ctx: &egui::Context,
        loader: LoaderHandle,
        host: Box<dyn ContentHost>,
        theme: ThemeConfig,
        assets: BrandAssets,
    ) -> Self {
        let repaint = ctx.clone();
        let subscription = loader.subscribe(move |_| repaint.request_repaint());
        Self {
            loader,
            _subscription: subscription,
            host,
            theme,
            assets,
            state: LoadState::Idle,
            seen_revision: None,
            progress_overlay: None,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn progress_overlay(&self) -> Option<&LoadingOverlay> {
        self.progress_overlay.as_ref()
    }

    /// Take the loader's latest state if it changed since the last call.
    /// Returns whether anything changed.
    pub fn sync(&mut self, now: f64) -> bool {
        let revision = self.loader.revision();
        if self.seen_revision == Some(revision) {
            return false;
        }
        self.seen_revision = Some(revision);
        let state = self.loader.state();
        self.apply(state, now);
        true
    }

    fn apply(&mut self, state: LoadState, now: f64) {
        match overlay_for(&state) {
            Overlay::Progress(progress) => match &mut self.progress_overlay {
                Some(overlay) => overlay.set_progress(progress, now),
                None => {
                    info!("Showing progress overlay at {}%", percentage(progress));
                    self.progress_overlay = Some(LoadingOverlay::mount(progress, now, &self.theme));
                }
            },
            Overlay::Error(message) => {
                warn!("Load failed: {}", message);
                self.progress_overlay = None;
            }
            Overlay::Offline => {
                warn!("Loader reports no connection");
                self.progress_overlay = None;
            }
            Overlay::None => {
                if self.progress_overlay.take().is_some() {
                    info!("Progress overlay dismissed ({:?})", state);
                }
            }
        }
        self.state = state;
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        let now = ctx.input().time;
        self.sync(now);

        let opacity = content_opacity(&self.state, &self.theme);
        let host = &mut self.host;
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.palette.backdrop.color()))
            .show(ctx, |ui| host.show(ui, opacity));

        match overlay_for(&self.state) {
            Overlay::Progress(_) => {
                if let Some(overlay) = &self.progress_overlay {
                    overlay.show(ctx, &self.theme, &mut self.assets, now);
                    // The decorative animations never settle while mounted.
                    ctx.request_repaint();
                }
            }
            Overlay::Error(message) => show_error_indicator(ctx, message, &self.theme),
            Overlay::Offline => show_offline_indicator(ctx, &self.theme),
            Overlay::None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::indicators::{error_text, OFFLINE_TEXT};
    use crate::ui::loading::ProgressDisplayable;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    struct RecordingHost {
        opacities: Arc<Mutex<Vec<f32>>>,
    }

    impl ContentHost for RecordingHost {
        fn show(&mut self, _ui: &mut egui::Ui, opacity: f32) {
            self.opacities.lock().unwrap().push(opacity);
        }
    }

    fn screen_for(loader: &LoaderHandle) -> (EntryScreen, Arc<Mutex<Vec<f32>>>, egui::Context) {
        let ctx = egui::Context::default();
        let opacities = Arc::new(Mutex::new(Vec::new()));
        let host = RecordingHost {
            opacities: Arc::clone(&opacities),
        };
        let assets = BrandAssets::new(std::env::temp_dir().join("pharaohs_screen_tests_no_assets"));
        let screen = EntryScreen::new(&ctx, loader.clone(), Box::new(host), ThemeConfig::default(), assets);
        (screen, opacities, ctx)
    }

    /// Overlay content as the user sees it, without animation phases.
    #[derive(Clone, Debug, PartialEq)]
    enum OverlayView {
        None,
        Progress {
            label: String,
            percentage: u32,
            fill_fraction: f64,
            gem_count: usize,
            shimmer: bool,
        },
        Error {
            text: String,
        },
        Offline {
            text: String,
        },
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Presentation {
        host_opacity: f32,
        overlay: OverlayView,
    }

    /// Snapshot of what `show` paints at `now`, read back from the mounted
    /// overlay and the bar geometry it draws.
    fn presentation(screen: &EntryScreen, now: f64) -> Presentation {
        let overlay = match overlay_for(&screen.state) {
            Overlay::Progress(_) => {
                let overlay = screen.progress_overlay().expect("progress overlay mounted");
                let track = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(200.0, 10.0));
                let geometry = overlay.bar_geometry(track, now, &screen.theme);
                OverlayView::Progress {
                    label: overlay.label(),
                    percentage: overlay.progress_percentage(),
                    fill_fraction: overlay.progress(),
                    gem_count: geometry.gems.len(),
                    shimmer: geometry.shimmer.is_some(),
                }
            }
            Overlay::Error(message) => OverlayView::Error {
                text: error_text(message),
            },
            Overlay::Offline => OverlayView::Offline {
                text: OFFLINE_TEXT.to_string(),
            },
            Overlay::None => OverlayView::None,
        };
        Presentation {
            host_opacity: content_opacity(&screen.state, &screen.theme),
            overlay,
        }
    }

    fn progress_view(label: &str, percentage: u32, fill: f64, gems: usize, shimmer: bool) -> OverlayView {
        OverlayView::Progress {
            label: label.to_string(),
            percentage,
            fill_fraction: fill,
            gem_count: gems,
            shimmer,
        }
    }

    /// Run idle frames until egui stops asking for an immediate repaint.
    fn settle(ctx: &egui::Context, screen: &mut EntryScreen) {
        for _ in 0..4 {
            let output = ctx.run(egui::RawInput::default(), |ctx| screen.show(ctx));
            if output.repaint_after > Duration::ZERO {
                return;
            }
        }
        panic!("idle screen keeps requesting repaints");
    }

    fn next_frame_repaints_at_once(ctx: &egui::Context, screen: &mut EntryScreen) -> bool {
        let output = ctx.run(egui::RawInput::default(), |ctx| screen.show(ctx));
        output.repaint_after == Duration::ZERO
    }

    #[test]
    fn overlay_selection_covers_every_state() {
        assert_eq!(overlay_for(&LoadState::Idle), Overlay::None);
        assert_eq!(overlay_for(&LoadState::Finished), Overlay::None);
        assert_eq!(overlay_for(&LoadState::Progressing(0.4)), Overlay::Progress(0.4));
        assert_eq!(overlay_for(&LoadState::NoConnection), Overlay::Offline);
        let failure = LoadState::Failure("DNS lookup failed".to_string());
        assert_eq!(overlay_for(&failure), Overlay::Error("DNS lookup failed"));
    }

    #[test]
    fn host_is_opaque_only_when_finished() {
        let theme = ThemeConfig::default();
        assert_eq!(content_opacity(&LoadState::Finished, &theme), 1.0);
        for state in [
            LoadState::Idle,
            LoadState::Progressing(0.99),
            LoadState::Failure("x".to_string()),
            LoadState::NoConnection,
        ] {
            assert_eq!(content_opacity(&state, &theme), 0.5);
        }
    }

    #[test]
    fn idle_to_progress_to_finished() {
        let loader = LoaderHandle::default();
        let (mut screen, _, _ctx) = screen_for(&loader);

        screen.sync(0.0);
        assert_eq!(
            presentation(&screen, 1.0),
            Presentation {
                host_opacity: 0.5,
                overlay: OverlayView::None
            }
        );

        loader.publish(LoadState::Progressing(0.0));
        assert!(screen.sync(0.1));
        let view = presentation(&screen, 1.1);
        assert_eq!(view.host_opacity, 0.5);
        assert_eq!(view.overlay, progress_view("Loading 0%", 0, 0.0, 0, false));
        assert!(screen.progress_overlay().is_some());

        loader.publish(LoadState::Progressing(0.6));
        screen.sync(0.2);
        assert_eq!(presentation(&screen, 1.2).overlay, progress_view("Loading 60%", 60, 0.6, 3, true));

        loader.publish(LoadState::Finished);
        screen.sync(0.3);
        assert_eq!(
            presentation(&screen, 1.3),
            Presentation {
                host_opacity: 1.0,
                overlay: OverlayView::None
            }
        );
        assert!(screen.progress_overlay().is_none());
    }

    #[test]
    fn idle_to_offline() {
        let loader = LoaderHandle::default();
        let (mut screen, _, _ctx) = screen_for(&loader);
        screen.sync(0.0);

        loader.publish(LoadState::NoConnection);
        screen.sync(0.1);
        assert_eq!(
            presentation(&screen, 1.1),
            Presentation {
                host_opacity: 0.5,
                overlay: OverlayView::Offline {
                    text: "No connection".to_string()
                }
            }
        );
    }

    #[test]
    fn progress_replaced_by_failure() {
        let loader = LoaderHandle::new(LoadState::Progressing(0.3));
        let (mut screen, _, _ctx) = screen_for(&loader);
        screen.sync(0.0);
        assert_eq!(presentation(&screen, 1.0).overlay, progress_view("Loading 30%", 30, 0.3, 1, true));

        loader.publish(LoadState::Failure("timeout".to_string()));
        screen.sync(0.5);
        let view = presentation(&screen, 1.5);
        assert_eq!(view.host_opacity, 0.5);
        match view.overlay {
            OverlayView::Error { text } => assert!(text.contains("timeout")),
            other => panic!("expected error overlay, got {:?}", other),
        }
        assert!(screen.progress_overlay().is_none());
    }

    #[test]
    fn progress_updates_keep_the_mounted_overlay() {
        let loader = LoaderHandle::new(LoadState::Progressing(0.2));
        let (mut screen, _, _ctx) = screen_for(&loader);
        screen.sync(0.0);
        let first_scale = screen.progress_overlay().unwrap().logo_scale(0.55);

        loader.publish(LoadState::Progressing(0.5));
        screen.sync(0.4);
        let overlay = screen.progress_overlay().unwrap();
        // Animations keep their mount time across progress updates.
        assert_eq!(overlay.logo_scale(0.55), first_scale);
        assert_eq!(overlay.progress(), 0.5);
    }

    #[test]
    fn out_of_range_progress_is_clamped_for_display() {
        let loader = LoaderHandle::new(LoadState::Progressing(1.3));
        let (mut screen, _, _ctx) = screen_for(&loader);
        screen.sync(0.0);
        assert_eq!(presentation(&screen, 1.0).overlay, progress_view("Loading 100%", 100, 1.0, 5, true));

        loader.publish(LoadState::Progressing(-0.2));
        screen.sync(0.1);
        assert_eq!(presentation(&screen, 1.1).overlay, progress_view("Loading 0%", 0, 0.0, 0, false));
    }

    #[test]
    fn sync_without_new_state_is_a_no_op() {
        let loader = LoaderHandle::default();
        let (mut screen, _, _ctx) = screen_for(&loader);
        assert!(screen.sync(0.0));
        assert!(!screen.sync(1.0));
        loader.publish(LoadState::Idle);
        assert!(screen.sync(2.0));
    }

    #[test]
    fn dropping_the_screen_unsubscribes() {
        let loader = LoaderHandle::default();
        let (screen, _, _ctx) = screen_for(&loader);
        assert_eq!(loader.subscriber_count(), 1);
        drop(screen);
        assert_eq!(loader.subscriber_count(), 0);
    }

    #[test]
    fn publish_wakes_the_screen_without_polling() {
        let loader = LoaderHandle::default();
        let (mut screen, _, ctx) = screen_for(&loader);
        settle(&ctx, &mut screen);
        assert!(!next_frame_repaints_at_once(&ctx, &mut screen));

        loader.publish(LoadState::NoConnection);
        assert!(next_frame_repaints_at_once(&ctx, &mut screen));
        assert_eq!(screen.state(), &LoadState::NoConnection);
    }

    #[test]
    fn publish_from_another_thread_wakes_the_screen() {
        let loader = LoaderHandle::default();
        let (mut screen, _, ctx) = screen_for(&loader);
        settle(&ctx, &mut screen);

        let publisher = loader.clone();
        std::thread::spawn(move || publisher.publish(LoadState::Failure("timeout".to_string())))
            .join()
            .unwrap();

        assert!(next_frame_repaints_at_once(&ctx, &mut screen));
        assert_eq!(screen.state(), &LoadState::Failure("timeout".to_string()));
    }

    #[test]
    fn dropped_screen_no_longer_requests_repaints() {
        let loader = LoaderHandle::default();
        let (mut screen, _, ctx) = screen_for(&loader);
        settle(&ctx, &mut screen);
        drop(screen);

        loader.publish(LoadState::Finished);
        let output = ctx.run(egui::RawInput::default(), |_| {});
        assert!(output.repaint_after > Duration::ZERO);
    }

    #[test]
    fn show_passes_opacity_to_the_host() {
        let loader = LoaderHandle::default();
        let (mut screen, opacities, ctx) = screen_for(&loader);

        let _ = ctx.run(egui::RawInput::default(), |ctx| screen.show(ctx));
        loader.publish(LoadState::Progressing(0.45));
        let _ = ctx.run(egui::RawInput::default(), |ctx| screen.show(ctx));
        loader.publish(LoadState::Failure("timeout".to_string()));
        let _ = ctx.run(egui::RawInput::default(), |ctx| screen.show(ctx));
        loader.publish(LoadState::Finished);
        let _ = ctx.run(egui::RawInput::default(), |ctx| screen.show(ctx));

        assert_eq!(*opacities.lock().unwrap(), vec![0.5, 0.5, 0.5, 1.0]);
        assert_eq!(screen.state(), &LoadState::Finished);
    }
}
