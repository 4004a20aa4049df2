use eframe::egui;

use crate::{
    core::validation::{
        FieldKind,
        FieldState,
        FormField,
    },
    gui::theme::Theme,
};

/// Draws a labelled input for `field`, applying the live validation rule
/// whenever the text changes. Password fields are masked.
pub fn form_field(ui: &mut egui::Ui, theme: &Theme, field: &mut FormField) -> egui::Response {
    ui.label(field.label);

    let stroke_color = match field.state {
        FieldState::Untouched => None,
        FieldState::Valid => Some(theme.green(ui.ctx())),
        FieldState::Invalid => Some(theme.red(ui.ctx())),
    };

    let response = ui
        .scope(|ui| {
            if let Some(color) = stroke_color {
                let visuals = &mut ui.style_mut().visuals;
                visuals.widgets.inactive.bg_stroke = egui::Stroke::new(1.5, color);
                visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.5, color);
                visuals.selection.stroke = egui::Stroke::new(1.5, color);
            }

            let mut edit = egui::TextEdit::singleline(&mut field.value)
                .id_salt(field.name)
                .desired_width(f32::INFINITY);
            if field.kind == FieldKind::Password {
                edit = edit.password(true);
            }
            if field.kind == FieldKind::Number {
                edit = edit.hint_text("0 - 100");
            }
            ui.add(edit)
        })
        .inner;

    if response.changed() {
        field.on_input();
    }

    if field.state == FieldState::Invalid {
        let hint = if field.kind == FieldKind::Number {
            "Enter a whole number between 0 and 100"
        } else {
            "This field is required"
        };
        ui.label(egui::RichText::new(hint).small().color(theme.red(ui.ctx())));
    }

    ui.add_space(4.0);
    response
}
