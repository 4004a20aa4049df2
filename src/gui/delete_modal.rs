use eframe::egui;

use crate::{
    core::StudentRef,
    gui::{
        modal::{
            action_buttons,
            Modal,
            ModalConfig,
            ModalResult,
        },
        theme::Theme,
    },
};

/// Asks before deleting a student. The student travels with the dialog; the
/// confirm button stays disabled while a delete is in flight.
pub struct DeleteConfirmModal {
    modal: Modal<StudentRef>,
    in_flight: Option<String>,
}

impl DeleteConfirmModal {
    pub fn new() -> Self {
        Self {
            modal: Modal::new("Confirm Delete")
                .with_config(ModalConfig { close_on_confirm: false, ..Default::default() }),
            in_flight: None,
        }
    }

    pub fn request(&mut self, target: StudentRef) {
        self.modal.open_with(target);
    }

    pub fn is_open(&self) -> bool {
        self.modal.is_open()
    }

    pub fn target(&self) -> &StudentRef {
        self.modal.data()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Marks the dialog busy and hands back the target to delete, unless a
    /// delete is already running.
    pub fn confirm(&mut self, target: StudentRef) -> Option<StudentRef> {
        if self.in_flight.is_some() {
            return None;
        }
        self.in_flight = Some(target.id.clone());
        Some(target)
    }

    /// Settles the dialog after the server replied for `student_id`.
    /// Success closes it; failure leaves it open for another attempt.
    pub fn finish(&mut self, student_id: &str, succeeded: bool) {
        if self.in_flight.as_deref() == Some(student_id) {
            self.in_flight = None;
        }
        if succeeded && self.modal.data().id == student_id {
            self.modal.close();
        }
    }

    pub fn show(&mut self, ctx: &egui::Context, theme: &Theme) -> Option<StudentRef> {
        let busy = self.is_busy();
        let result = self.modal.show(ctx, |ui, target| {
            ui.label("Are you sure you want to delete this student record?");
            ui.add_space(8.0);
            egui::Grid::new("delete_confirm_details").num_columns(2).show(ui, |ui| {
                ui.label(theme.heading(ui.ctx(), "Name"));
                ui.label(&target.name);
                ui.end_row();
                ui.label(theme.heading(ui.ctx(), "Subject"));
                ui.label(&target.subject);
                ui.end_row();
            });
            ui.add_space(6.0);
            ui.label(
                egui::RichText::new("This action cannot be undone.").color(theme.red(ui.ctx())),
            );
            ui.add_space(10.0);

            if busy {
                ui.horizontal(|ui| {
                    ui.add(egui::Spinner::new());
                    ui.label("Deleting...");
                });
            }

            let target = target.clone();
            action_buttons(ui, move || target, "Delete", "Cancel", !busy)
        });

        match result {
            Some(ModalResult::Confirmed(target)) => self.confirm(target),
            Some(ModalResult::Cancelled) | None => None,
        }
    }
}

impl Default for DeleteConfirmModal {
    fn default() -> Self {
        Self::new()
    }
}
