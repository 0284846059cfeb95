//! Control surface
//!
//! One native window in three phases: a fullscreen translucent overlay for
//! selecting the button region, the same for the message region, then a
//! small always-on-top control panel over the log channel and signals.

pub mod panel;
pub mod select;

use crate::alarm::AlarmController;
use crate::core::context::AppContext;
use crate::core::region::{Region, SelectedRegions};
use crate::monitor::{self, SurfaceControl};
use anyhow::{anyhow, Result};
use std::sync::Arc;
use std::thread;
use tracing::info;

use panel::{ControlPanel, PanelAction};
use select::{RegionSelector, SelectorResult};

const PANEL_SIZE: egui::Vec2 = egui::vec2(720.0, 340.0);

/// Run the control surface on the calling thread until shutdown.
pub fn run(ctx: Arc<AppContext>) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Slotwatch")
            .with_fullscreen(true)
            .with_decorations(false)
            .with_transparent(true),
        ..Default::default()
    };

    eframe::run_native(
        "slotwatch",
        options,
        Box::new(move |_cc| Ok(Box::new(WatchApp::new(ctx)))),
    )
    .map_err(|err| anyhow!("window system error: {err}"))
}

/// Visibility handle handed to the polling loop so it can take the panel out
/// of the way around each simulated click.
pub struct PanelHandle {
    egui_ctx: egui::Context,
}

impl PanelHandle {
    pub fn new(egui_ctx: egui::Context) -> Self {
        Self { egui_ctx }
    }
}

impl SurfaceControl for PanelHandle {
    fn hide(&self) {
        self.egui_ctx
            .send_viewport_cmd(egui::ViewportCommand::Visible(false));
        self.egui_ctx.request_repaint();
    }

    fn show(&self) {
        self.egui_ctx
            .send_viewport_cmd(egui::ViewportCommand::Visible(true));
        self.egui_ctx.request_repaint();
    }
}

enum Phase {
    SelectButton,
    SelectMessage,
    Panel,
}

/// The application window, phase-switched from selection overlays to panel.
struct WatchApp {
    ctx: Arc<AppContext>,
    alarm: Arc<AlarmController>,
    phase: Phase,
    selector: RegionSelector,
    panel: ControlPanel,
    button_region: Option<Region>,
}

impl WatchApp {
    fn new(ctx: Arc<AppContext>) -> Self {
        ctx.log.post("Please select the button area");
        let alarm = Arc::new(AlarmController::new(Arc::clone(&ctx)));
        Self {
            ctx,
            alarm,
            phase: Phase::SelectButton,
            selector: RegionSelector::new("Select the button area to click"),
            panel: ControlPanel::new(),
            button_region: None,
        }
    }

    /// Both regions picked: record them, shrink the overlay into the panel,
    /// and start the polling loop.
    fn become_panel(&mut self, egui_ctx: &egui::Context, regions: SelectedRegions) {
        self.ctx.set_regions(regions);
        info!(
            "Regions selected: button {:?}, message {:?}",
            regions.button, regions.message
        );

        egui_ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(false));
        egui_ctx.send_viewport_cmd(egui::ViewportCommand::Decorations(true));
        egui_ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(PANEL_SIZE));
        egui_ctx.send_viewport_cmd(egui::ViewportCommand::WindowLevel(
            egui::WindowLevel::AlwaysOnTop,
        ));

        let ctx = Arc::clone(&self.ctx);
        let alarm = Arc::clone(&self.alarm);
        let surface = PanelHandle::new(egui_ctx.clone());
        thread::spawn(move || monitor::run(ctx, alarm, surface));

        self.phase = Phase::Panel;
    }

    /// Selection abandoned: nothing to monitor, shut the window down. main
    /// treats the missing regions as a fatal startup error.
    fn abort_selection(&mut self, egui_ctx: &egui::Context) {
        info!("Region selection aborted");
        self.ctx.signals.request_shutdown();
        egui_ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }
}

impl eframe::App for WatchApp {
    fn update(&mut self, egui_ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if egui_ctx.input(|i| i.viewport().close_requested()) {
            // Closing the window is equivalent to End Program
            self.ctx.signals.request_shutdown();
        }

        match self.phase {
            Phase::SelectButton => match self.selector.render(egui_ctx) {
                SelectorResult::Pending => {}
                SelectorResult::Selected(region) => {
                    info!("Button region selected: {:?}", region);
                    self.button_region = Some(region);
                    self.selector = RegionSelector::new("Select the message area to monitor");
                    self.ctx.log.post("Please select the message area");
                    self.phase = Phase::SelectMessage;
                }
                SelectorResult::Aborted => self.abort_selection(egui_ctx),
            },
            Phase::SelectMessage => match self.selector.render(egui_ctx) {
                SelectorResult::Pending => {}
                SelectorResult::Selected(message) => match self.button_region.take() {
                    Some(button) => self.become_panel(egui_ctx, SelectedRegions { button, message }),
                    None => self.abort_selection(egui_ctx),
                },
                SelectorResult::Aborted => self.abort_selection(egui_ctx),
            },
            Phase::Panel => {
                if let PanelAction::Quit = self.panel.render(egui_ctx, &self.ctx, &self.alarm) {
                    egui_ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            }
        }
    }

    fn clear_color(&self, visuals: &egui::Visuals) -> [f32; 4] {
        match self.phase {
            Phase::Panel => visuals.panel_fill.to_normalized_gamma_f32(),
            _ => egui::Rgba::TRANSPARENT.to_array(),
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Covers platform quit paths that skip the End Program button
        self.ctx.signals.request_shutdown();
    }
}
