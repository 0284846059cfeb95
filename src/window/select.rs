//! Region-selection overlay
//!
//! A fullscreen translucent layer the operator drags a rectangle on. The
//! window is fullscreen and borderless, so pointer positions are screen
//! coordinates.

use crate::core::region::Region;
use egui::{Align2, Color32, CursorIcon, FontId, Pos2, Rect, Sense, Stroke};

/// Outcome of one overlay frame.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorResult {
    /// Still selecting
    Pending,
    /// A non-degenerate rectangle was released
    Selected(Region),
    /// The operator pressed Escape
    Aborted,
}

/// State for one region selection.
pub struct RegionSelector {
    prompt: String,
    drag_start: Option<Pos2>,
    drag_current: Option<Pos2>,
    /// Set after a zero-area release; adds a hint to the banner
    rejected_degenerate: bool,
}

impl RegionSelector {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            drag_start: None,
            drag_current: None,
            rejected_degenerate: false,
        }
    }

    /// Render the overlay and report whether a region was committed.
    pub fn render(&mut self, ctx: &egui::Context) -> SelectorResult {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            return SelectorResult::Aborted;
        }

        let mut result = SelectorResult::Pending;

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::from_black_alpha(80)))
            .show(ctx, |ui| {
                ctx.output_mut(|o| o.cursor_icon = CursorIcon::Crosshair);

                let response = ui.allocate_rect(ui.max_rect(), Sense::click_and_drag());

                if response.drag_started() {
                    self.drag_start = response.interact_pointer_pos();
                    self.drag_current = self.drag_start;
                }
                if response.dragged() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        self.drag_current = Some(pos);
                    }
                }

                if let (Some(start), Some(current)) = (self.drag_start, self.drag_current) {
                    let rect = Rect::from_two_pos(start, current);
                    ui.painter().rect_filled(
                        rect,
                        0.0,
                        Color32::from_rgba_unmultiplied(255, 64, 64, 24),
                    );
                    ui.painter()
                        .rect_stroke(rect, 0.0, Stroke::new(2.0, Color32::RED));
                }

                let banner = if self.rejected_degenerate {
                    format!(
                        "{} (drag a rectangle with some area, Esc aborts)",
                        self.prompt
                    )
                } else {
                    format!("{} (drag a rectangle, Esc aborts)", self.prompt)
                };
                let banner_pos = Pos2::new(ui.max_rect().center().x, 40.0);
                ui.painter().text(
                    banner_pos,
                    Align2::CENTER_TOP,
                    banner,
                    FontId::proportional(22.0),
                    Color32::WHITE,
                );

                if response.drag_stopped() {
                    if let (Some(start), Some(end)) = (self.drag_start, self.drag_current) {
                        match accept_drag(start, end) {
                            Some(region) => result = SelectorResult::Selected(region),
                            None => {
                                // Zero-area drag: keep the overlay open
                                self.rejected_degenerate = true;
                                self.drag_start = None;
                                self.drag_current = None;
                            }
                        }
                    }
                }
            });

        result
    }
}

/// Turn a completed drag into a region, refusing degenerate rectangles.
fn accept_drag(start: Pos2, end: Pos2) -> Option<Region> {
    let region = Region::from_points(start.x, start.y, end.x, end.y);
    if region.is_degenerate() {
        None
    } else {
        Some(region)
    }
}
