use eframe::egui;

use crate::core::{
    http::base_url,
    PortalError,
    PortalSettings,
};

pub struct SettingsModal {
    open: bool,
    draft: PortalSettings,
    original: PortalSettings,
    status: Option<String>,
}

impl SettingsModal {
    pub fn new() -> Self {
        Self {
            open: false,
            draft: PortalSettings::default(),
            original: PortalSettings::default(),
            status: None,
        }
    }

    pub fn open_settings(&mut self, current: PortalSettings) {
        self.draft = current.clone();
        self.original = current;
        self.status = None;
        self.open = true;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn draft_mut(&mut self) -> &mut PortalSettings {
        &mut self.draft
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.original
    }

    /// Checks the draft and returns the settings to persist. The server
    /// address is stored in its normalised form.
    pub fn commit(&mut self) -> Result<PortalSettings, PortalError> {
        let url = base_url(&self.draft.server_url)?;
        self.draft.server_url = url.to_string();
        self.original = self.draft.clone();
        Ok(self.draft.clone())
    }

    pub fn show(&mut self, ctx: &egui::Context) -> Option<PortalSettings> {
        if !self.open {
            return None;
        }

        let mut result = None;

        let modal = egui::Modal::new(egui::Id::new("portal_settings_modal")).show(ctx, |ui| {
            ui.set_min_width(360.0);
            ui.heading("Settings");
            ui.add_space(10.0);

            egui::Grid::new("portal_settings_grid").num_columns(2).spacing([12.0, 8.0]).show(
                ui,
                |ui| {
                    ui.label("Server address:");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.draft.server_url)
                            .desired_width(220.0),
                    );
                    ui.end_row();

                    ui.label("Notification time:");
                    ui.add(
                        egui::DragValue::new(&mut self.draft.toast_seconds)
                            .range(1..=30)
                            .suffix(" s"),
                    );
                    ui.end_row();

                    ui.label("Request timeout:");
                    ui.add(
                        egui::DragValue::new(&mut self.draft.request_timeout_secs)
                            .range(1..=300)
                            .suffix(" s"),
                    );
                    ui.end_row();
                },
            );

            ui.add_space(6.0);
            ui.small("A new server address applies at the next sign in.");

            if let Some(status) = &self.status {
                ui.add_space(5.0);
                ui.colored_label(egui::Color32::RED, format!("⚠ {}", status));
            }

            ui.separator();

            let is_dirty = self.is_dirty();
            ui.horizontal(|ui| {
                let save_clicked =
                    ui.add_enabled(is_dirty, egui::Button::new("Save Settings")).clicked();
                let close_clicked = ui.button("Close").clicked();

                let mut reset_clicked = false;
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    reset_clicked = ui.button("Restore Default").clicked();
                });

                if save_clicked {
                    match self.commit() {
                        Ok(settings) => {
                            self.status = None;
                            result = Some(settings);
                            ui.close();
                        }
                        Err(e) => self.status = Some(e.to_string()),
                    }
                } else if close_clicked {
                    self.draft = self.original.clone();
                    self.status = None;
                    ui.close();
                } else if reset_clicked {
                    let defaults = PortalSettings::default();
                    self.draft.server_url = defaults.server_url;
                    self.draft.toast_seconds = defaults.toast_seconds;
                    self.draft.request_timeout_secs = defaults.request_timeout_secs;
                    self.status = None;
                }
            });
        });

        if modal.should_close() {
            self.open = false;
        }

        result
    }
}

impl Default for SettingsModal {
    fn default() -> Self {
        Self::new()
    }
}
