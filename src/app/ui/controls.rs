use eframe::egui::{self, Align2, Context, RichText, vec2};

use super::super::MapModel;

impl MapModel {
    /// Floating control cluster in the top-right corner: close button on
    /// top, then the depth stepper. Returns true when the close button was
    /// clicked this frame.
    pub(in crate::app) fn draw_map_controls(&mut self, ctx: &Context) -> bool {
        let mut close_requested = false;

        egui::Area::new(egui::Id::new("map_controls"))
            .anchor(Align2::RIGHT_TOP, vec2(-16.0, 48.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        if ui
                            .button(RichText::new("\u{2715}").size(16.0))
                            .on_hover_text("Close the map view.")
                            .clicked()
                        {
                            close_requested = true;
                        }

                        ui.add_space(6.0);

                        let increase = ui.add_enabled(
                            self.can_increase_depth(),
                            egui::Button::new(RichText::new("+").size(16.0)),
                        );
                        if increase
                            .on_hover_text("Show links one step further from the anchor.")
                            .clicked()
                        {
                            self.increase_depth();
                        }

                        ui.label(format!(
                            "{} / {}",
                            self.effective_depth(),
                            self.max_available_depth
                        ));

                        let decrease = ui.add_enabled(
                            self.can_decrease_depth(),
                            egui::Button::new(RichText::new("\u{2212}").size(16.0)),
                        );
                        if decrease
                            .on_hover_text("Narrow the map back toward the anchor.")
                            .clicked()
                        {
                            self.decrease_depth();
                        }
                    });
                });
            });

        close_requested
    }
}
