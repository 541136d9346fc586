//! Egui form, chart view and notification dialog.
//!
//! Components here only describe the interface; every action is reported
//! back through [`FormResponse`] and applied by the caller.

use crate::state::Notification;

/// What the user did this frame.
#[derive(Debug, Clone, Default)]
pub struct FormResponse {
    /// The Download Data button was pressed.
    pub download_clicked: bool,
    /// The notification dialog was dismissed.
    pub notification_dismissed: bool,
}

/// Draw the whole interface for one frame.
pub fn draw(
    ctx: &egui::Context,
    symbol_input: &mut String,
    symbols: &[String],
    fetching_symbol: Option<&str>,
    notification: Option<&Notification>,
    chart_texture: Option<&egui::TextureHandle>,
) -> FormResponse {
    let mut response = FormResponse::default();

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(12.0);
            ui.label("Select a Tech Stock:");
            ui.add_space(4.0);

            symbol_entry(ui, symbol_input, symbols);

            ui.add_space(8.0);
            let button = egui::Button::new("Download Data");
            if ui.add_enabled(fetching_symbol.is_none(), button).clicked() {
                response.download_clicked = true;
            }

            if let Some(symbol) = fetching_symbol {
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(format!("Fetching {}…", symbol));
                });
            }

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(4.0);

            if let Some(texture) = chart_texture {
                ui.add(egui::Image::new((texture.id(), texture.size_vec2())).shrink_to_fit());
            } else {
                ui.add_space(24.0);
                ui.weak("Download a ticker to see its price history.");
            }
        });
    });

    if let Some(n) = notification {
        egui::Window::new(n.title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_min_width(260.0);
                ui.vertical_centered(|ui| {
                    ui.add_space(8.0);
                    ui.label(&n.text);
                    ui.add_space(12.0);
                    if ui.button("OK").clicked() {
                        response.notification_dismissed = true;
                    }
                    ui.add_space(4.0);
                });
            });
    }

    response
}

fn symbol_entry(ui: &mut egui::Ui, symbol_input: &mut String, symbols: &[String]) {
    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(symbol_input)
                .desired_width(120.0)
                .hint_text("Ticker"),
        );
        egui::ComboBox::from_id_salt("ticker_list")
            .selected_text("")
            .width(24.0)
            .show_ui(ui, |ui| {
                for symbol in symbols {
                    ui.selectable_value(symbol_input, symbol.clone(), symbol);
                }
            });
    });
}
