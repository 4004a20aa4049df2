use eframe::egui;

use crate::{
    core::validation::{
        FieldKind,
        Form,
        FormField,
        FORM_ERROR_MESSAGE,
    },
    gui::{
        form_ui::form_field,
        theme::Theme,
        toast::ToastNotifier,
    },
};

const PASSWORD_FIELD: &str = "password";
const EYE: &str = "👁";
const EYE_SLASH: &str = "🔒";

/// Show/hide control for the password input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PasswordToggle {
    visible: bool,
}

impl PasswordToggle {
    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// How the password input currently behaves.
    pub fn field_kind(&self) -> FieldKind {
        if self.visible {
            FieldKind::Text
        } else {
            FieldKind::Password
        }
    }

    pub fn icon(&self) -> &'static str {
        if self.visible {
            EYE_SLASH
        } else {
            EYE
        }
    }
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub server_url: String,
    pub username: String,
    pub password: String,
}

pub struct LoginScreen {
    pub server_url: String,
    form: Form,
    toggle: PasswordToggle,
    busy: bool,
}

impl LoginScreen {
    pub fn new(server_url: impl Into<String>, username: impl Into<String>) -> Self {
        let mut form = Form::new(vec![
            FormField::required("username", "Username", FieldKind::Text),
            FormField::required(PASSWORD_FIELD, "Password", FieldKind::Password),
        ]);
        form.set_value("username", username);
        Self { server_url: server_url.into(), form, toggle: PasswordToggle::default(), busy: false }
    }

    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn password_icon(&self) -> &'static str {
        self.toggle.icon()
    }

    /// Flips the password input between masked and plain text.
    pub fn toggle_password(&mut self) {
        self.toggle.toggle();
        let kind = self.toggle.field_kind();
        if let Some(field) = self.form.field_mut(PASSWORD_FIELD) {
            field.kind = kind;
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    /// Clears the password after a sign-in attempt or sign-out.
    pub fn clear_password(&mut self) {
        if let Some(field) = self.form.field_mut(PASSWORD_FIELD) {
            field.reset();
        }
    }

    pub fn submit(&mut self, toasts: &mut ToastNotifier) -> Option<Credentials> {
        if self.busy {
            return None;
        }

        if !self.form.validate() {
            toasts.error(FORM_ERROR_MESSAGE);
            return None;
        }

        self.busy = true;
        Some(Credentials {
            server_url: self.server_url.trim().to_string(),
            username: self.form.value("username").trim().to_string(),
            password: self.form.value(PASSWORD_FIELD).to_string(),
        })
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        theme: &Theme,
        toasts: &mut ToastNotifier,
    ) -> Option<Credentials> {
        let mut submitted = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(60.0);
                ui.label(egui::RichText::new("Teacher Portal").size(32.0).color(theme.cyan(ctx)));
                ui.label(
                    egui::RichText::new("Sign in to manage your students")
                        .size(14.0)
                        .color(theme.comment(ctx)),
                );
                ui.add_space(24.0);
            });

            ui.vertical_centered(|ui| {
                ui.set_max_width(320.0);
                ui.add_enabled_ui(!self.busy, |ui| {
                    ui.label("Server");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.server_url)
                            .desired_width(f32::INFINITY),
                    );
                    ui.add_space(4.0);

                    let mut toggled = false;
                    for field in self.form.fields_mut() {
                        let response = form_field(ui, theme, field);
                        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                            submitted = true;
                        }
                        if field.name == PASSWORD_FIELD
                            && ui
                                .small_button(self.toggle.icon())
                                .on_hover_text("Show or hide password")
                                .clicked()
                        {
                            toggled = true;
                        }
                    }
                    if toggled {
                        self.toggle_password();
                    }

                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        let label = if self.busy { "Signing in..." } else { "Sign In" };
                        if ui.add_enabled(!self.busy, egui::Button::new(label)).clicked() {
                            submitted = true;
                        }
                        if self.busy {
                            ui.add(egui::Spinner::new());
                        }
                    });
                });
            });
        });

        if submitted {
            self.submit(toasts)
        } else {
            None
        }
    }
}
