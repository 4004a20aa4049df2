use eframe::egui::{
    self,
    containers,
};

use crate::gui::{
    theme::Theme,
    ActionQueue,
    UiAction,
};

pub struct TopBar;

impl TopBar {
    pub fn show(
        ctx: &egui::Context,
        theme: &Theme,
        username: &str,
        server: &str,
        busy: bool,
        actions: &mut ActionQueue,
    ) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            containers::menu::Bar::new().ui(ui, |ui| {
                let theme_icon = if ui.visuals().dark_mode { "☀" } else { "🌙" };
                if ui.button(theme_icon).on_hover_text("Switch theme").clicked() {
                    actions.push(UiAction::ToggleTheme);
                }

                ui.menu_button("Students", |ui| {
                    if ui.button("Add Student").clicked() {
                        actions.push(UiAction::OpenAddStudent);
                        ui.close();
                    }
                    if ui.add_enabled(!busy, egui::Button::new("Refresh")).clicked() {
                        actions.push(UiAction::Refresh);
                        ui.close();
                    }
                });

                ui.menu_button("Account", |ui| {
                    if ui.button("Settings").clicked() {
                        actions.push(UiAction::OpenSettings);
                        ui.close();
                    }
                    if ui.button("Sign Out").clicked() {
                        actions.push(UiAction::SignOut);
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    Self::show_session_status(ui, theme, username, server, busy);
                });
            });
        });
    }

    fn show_session_status(ui: &mut egui::Ui, theme: &Theme, username: &str, server: &str, busy: bool) {
        let tooltip = format!("Signed in to {}", server);
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 2.0;
            ui.small(egui::RichText::new("●").color(theme.green(ui.ctx())))
                .on_hover_text(&tooltip);
            ui.small(username).on_hover_text(&tooltip);
        });

        if busy {
            ui.add_space(3.0);
            ui.add(egui::Spinner::new().size(12.0));
        }
    }
}
