use std::time::{
    Duration,
    Instant,
};

use eframe::egui;

use crate::{
    core::{
        validation::{
            parse_marks,
            FieldKind,
            Form,
            FormField,
            FORM_ERROR_MESSAGE,
            MARKS_FIELD,
        },
        NewStudent,
    },
    gui::{
        form_ui::form_field,
        modal::{
            Modal,
            ModalConfig,
            ModalResult,
        },
        theme::Theme,
        toast::ToastNotifier,
    },
};

pub const RELOAD_DELAY: Duration = Duration::from_secs(1);
pub const SUBMIT_LABEL: &str = "Add Student";
pub const BUSY_LABEL: &str = "Adding...";

#[derive(Debug, Clone)]
pub struct AddStudentForm {
    pub form: Form,
    pub busy: bool,
}

impl Default for AddStudentForm {
    fn default() -> Self {
        Self {
            form: Form::new(vec![
                FormField::required("name", "Student Name", FieldKind::Text),
                FormField::required("subject", "Subject", FieldKind::Text),
                FormField::required(MARKS_FIELD, "Marks", FieldKind::Number),
            ]),
            busy: false,
        }
    }
}

impl AddStudentForm {
    pub fn submit_label(&self) -> &'static str {
        if self.busy {
            BUSY_LABEL
        } else {
            SUBMIT_LABEL
        }
    }
}

pub struct AddStudentModal {
    modal: Modal<AddStudentForm>,
    reload_at: Option<Instant>,
}

impl AddStudentModal {
    pub fn new() -> Self {
        Self {
            modal: Modal::new("Add New Student")
                .with_config(ModalConfig { close_on_confirm: false, ..Default::default() }),
            reload_at: None,
        }
    }

    pub fn open(&mut self) {
        self.modal.open();
    }

    pub fn is_open(&self) -> bool {
        self.modal.is_open()
    }

    pub fn form(&self) -> &AddStudentForm {
        self.modal.data()
    }

    pub fn form_mut(&mut self) -> &mut AddStudentForm {
        self.modal.data_mut()
    }

    /// Validates the form and, if it passes, switches to the busy state and
    /// returns the payload to send.
    pub fn submit(&mut self, toasts: &mut ToastNotifier) -> Option<NewStudent> {
        let data = self.modal.data_mut();
        if data.busy {
            return None;
        }

        if !data.form.validate() {
            toasts.error(FORM_ERROR_MESSAGE);
            return None;
        }

        let marks = parse_marks(data.form.value(MARKS_FIELD))?;
        let request = NewStudent {
            name: data.form.value("name").trim().to_string(),
            subject: data.form.value("subject").trim().to_string(),
            marks,
        };

        data.busy = true;
        Some(request)
    }

    /// Settles the form after the server replied. The submit button is
    /// restored in every case. Success closes the dialog and schedules a
    /// reload; a closed dialog is left empty either way.
    pub fn finish(&mut self, succeeded: bool, now: Instant) {
        let closed = !self.modal.is_open();
        let data = self.modal.data_mut();
        data.busy = false;

        if succeeded || closed {
            data.form.reset();
        }
        if succeeded {
            self.modal.close();
            self.reload_at = Some(now + RELOAD_DELAY);
        }
    }

    pub fn reload_pending(&self) -> Option<Instant> {
        self.reload_at
    }

    /// Returns true once when the scheduled reload is due.
    pub fn take_due_reload(&mut self, now: Instant) -> bool {
        match self.reload_at {
            Some(at) if now >= at => {
                self.reload_at = None;
                true
            }
            _ => false,
        }
    }

    /// Closing the dialog clears what was typed, even with a request in
    /// flight. A late reply then only settles the button and the reload.
    pub fn dismiss(&mut self) {
        self.modal.close();
        self.modal.data_mut().form.reset();
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        theme: &Theme,
        toasts: &mut ToastNotifier,
    ) -> Option<NewStudent> {
        if let Some(at) = self.reload_at {
            ctx.request_repaint_after(at.saturating_duration_since(Instant::now()));
        }

        let result = self.modal.show(ctx, |ui, data| {
            let busy = data.busy;
            let mut submitted = false;

            ui.add_enabled_ui(!busy, |ui| {
                for field in data.form.fields_mut() {
                    if form_field(ui, theme, field).lost_focus()
                        && ui.input(|i| i.key_pressed(egui::Key::Enter))
                    {
                        submitted = true;
                    }
                }
            });

            ui.add_space(10.0);
            let mut cancelled = false;
            ui.horizontal(|ui| {
                if ui.add_enabled(!busy, egui::Button::new(data.submit_label())).clicked() {
                    submitted = true;
                }
                if busy {
                    ui.add(egui::Spinner::new());
                }
                if ui.button("Cancel").clicked() {
                    cancelled = true;
                }
            });

            if cancelled {
                Some(ModalResult::Cancelled)
            } else if submitted && !busy {
                Some(ModalResult::Confirmed(data.clone()))
            } else {
                None
            }
        });

        match result {
            Some(ModalResult::Confirmed(_)) => self.submit(toasts),
            Some(ModalResult::Cancelled) => {
                self.dismiss();
                None
            }
            None => None,
        }
    }
}

impl Default for AddStudentModal {
    fn default() -> Self {
        Self::new()
    }
}
