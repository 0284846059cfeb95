//! Control panel
//!
//! Log view on the left, the three operator commands on the right. The
//! panel is the single consumer of the log channel and drains it on a
//! fixed repaint cadence.

use crate::alarm::AlarmController;
use crate::core::context::AppContext;
use crate::core::log::LogEntry;
use std::time::Duration;
use tracing::info;

const REFRESH_CADENCE: Duration = Duration::from_millis(200);
const MAX_LINES: usize = 1000;

/// Outcome of one panel frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    None,
    /// End Program was clicked
    Quit,
}

/// State for the control panel.
pub struct ControlPanel {
    lines: Vec<String>,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Append drained entries to the display, keeping a bounded tail.
    fn absorb(&mut self, entries: Vec<LogEntry>) {
        for entry in entries {
            self.lines.push(entry.display_line());
        }
        if self.lines.len() > MAX_LINES {
            let excess = self.lines.len() - MAX_LINES;
            self.lines.drain(..excess);
        }
    }

    /// Render the panel and report operator commands.
    pub fn render(
        &mut self,
        ctx: &egui::Context,
        app: &AppContext,
        alarm: &AlarmController,
    ) -> PanelAction {
        self.absorb(app.log.drain_all());

        let mut action = PanelAction::None;

        egui::SidePanel::right("controls")
            .resizable(false)
            .exact_width(170.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                if alarm.is_sounding() {
                    ui.colored_label(egui::Color32::RED, "🔔 ALARM");
                    ui.add_space(8.0);
                }

                let width = ui.available_width();
                if ui
                    .add_sized([width, 32.0], egui::Button::new("🔕 Stop Alarm"))
                    .clicked()
                {
                    info!("Alarm stopped");
                    app.log.post("🔕 Alarm stopped");
                    alarm.stop();
                }
                ui.add_space(4.0);
                if ui
                    .add_sized([width, 32.0], egui::Button::new("⚡ Wake Up"))
                    .clicked()
                {
                    info!("Wake-up requested by user");
                    app.log.post("⚡ Wake-up requested by user");
                    app.signals.wake.set();
                }
                ui.add_space(4.0);
                if ui
                    .add_sized([width, 32.0], egui::Button::new("🛑 End Program"))
                    .clicked()
                {
                    info!("Ending program");
                    app.log.post("🛑 Ending program...");
                    app.signals.request_shutdown();
                    action = PanelAction::Quit;
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for line in &self.lines {
                        ui.monospace(line.as_str());
                    }
                });
        });

        // Keep draining the log channel even when no input arrives
        ctx.request_repaint_after(REFRESH_CADENCE);

        action
    }
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn entry(message: &str) -> LogEntry {
        LogEntry {
            timestamp: Local::now(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_absorb_appends_in_order() {
        let mut panel = ControlPanel::new();
        panel.absorb(vec![entry("one"), entry("two")]);
        assert_eq!(panel.lines.len(), 2);
        assert!(panel.lines[0].ends_with("one"));
        assert!(panel.lines[1].ends_with("two"));
    }

    #[test]
    fn test_absorb_keeps_bounded_tail() {
        let mut panel = ControlPanel::new();
        let entries: Vec<_> = (0..MAX_LINES + 50).map(|i| entry(&format!("m{i}"))).collect();
        panel.absorb(entries);
        assert_eq!(panel.lines.len(), MAX_LINES);
        assert!(panel.lines[0].ends_with("m50"));
        assert!(panel.lines.last().unwrap().ends_with(&format!("m{}", MAX_LINES + 49)));
    }
}
