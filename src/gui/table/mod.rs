use eframe::egui::{
    self,
    text::{
        CCursor,
        CCursorRange,
    },
    RichText,
    Shape,
    Stroke,
    Ui,
};
use egui_extras::{
    Column,
    TableBuilder,
    TableRow,
};

use super::{
    theme::Theme,
    ActionQueue,
    UiAction,
};

mod state;

pub use state::{
    MarksRow,
    PendingSave,
    RowMode,
    SaveCompletion,
    TableState,
};

pub const EMPTY_ROSTER_MESSAGE: &str = "No students found. Add your first student!";

const ROW_HEIGHT: f32 = 32.0;
const MARKS_INPUT_WIDTH: f32 = 60.0;

/// Draws the roster table. Everything the user does is queued on `actions`.
pub fn students_table(
    ui: &mut Ui,
    table: &mut TableState,
    theme: &Theme,
    actions: &mut ActionQueue,
) {
    let ctx = ui.ctx().clone();

    egui::ScrollArea::vertical().show(ui, |ui| {
        let base_bg = ui.visuals().faint_bg_color;
        ui.style_mut().visuals.faint_bg_color = if ui.visuals().dark_mode {
            base_bg.linear_multiply(1.4)
        } else {
            base_bg.linear_multiply(0.75)
        };

        TableBuilder::new(ui)
            .striped(true)
            .resizable(false)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::remainder().at_least(160.0))
            .column(Column::auto().at_least(140.0))
            .column(Column::auto().at_least(90.0))
            .column(Column::auto().at_least(150.0))
            .header(25.0, |mut header| {
                for title in ["Name", "Subject", "Marks", "Actions"] {
                    header.col(|ui| {
                        ui.label(theme.heading(ui.ctx(), title));
                    });
                }
            })
            .body(|mut body| {
                if table.placeholder_rows() > 0 {
                    body.row(ROW_HEIGHT * 2.0, |mut row| {
                        row.col(|ui| {
                            ui.label(
                                RichText::new(EMPTY_ROSTER_MESSAGE)
                                    .italics()
                                    .color(theme.comment(ui.ctx())),
                            );
                        });
                        for _ in 0..3 {
                            row.col(|_| {});
                        }
                    });
                    return;
                }

                for marks_row in table.rows_mut() {
                    body.row(ROW_HEIGHT, |mut row| {
                        ui_col_text(&ctx, &mut row, theme, &marks_row.student.name);
                        ui_col_text(&ctx, &mut row, theme, &marks_row.student.subject);
                        ui_col_marks(&ctx, &mut row, theme, marks_row, actions);
                        ui_col_actions(&ctx, &mut row, theme, marks_row, actions);
                    });
                }
            });
    });
}

fn ui_col_text(ctx: &egui::Context, row: &mut TableRow, theme: &Theme, text: &str) {
    row.col(|ui| {
        ui_col_lines(ui, ctx, theme);
        ui.label(text);
    });
}

fn ui_col_marks(
    ctx: &egui::Context,
    row: &mut TableRow,
    theme: &Theme,
    marks_row: &mut MarksRow,
    actions: &mut ActionQueue,
) {
    row.col(|ui| {
        ui_col_lines(ui, ctx, theme);

        if !marks_row.is_editing() {
            ui.label(RichText::new(marks_row.display_text()).strong());
            return;
        }

        let student_id = marks_row.student.id.clone();
        let mut input = marks_row.input.clone();
        let response = ui.add(
            egui::TextEdit::singleline(&mut input)
                .id_salt(("marks_input", &student_id))
                .desired_width(MARKS_INPUT_WIDTH),
        );

        if marks_row.take_focus_request() {
            response.request_focus();
            select_all(ui, response.id, input.chars().count());
        }

        if response.changed() {
            actions.push(UiAction::SetInput { student_id: student_id.clone(), value: input });
        }

        if response.lost_focus() {
            let (enter, escape) =
                ui.input(|i| (i.key_pressed(egui::Key::Enter), i.key_pressed(egui::Key::Escape)));
            if enter {
                actions.push(UiAction::SaveMarks(student_id));
            } else if escape {
                actions.push(UiAction::CancelEdit(student_id));
            }
        }
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowButton {
    Edit,
    Save,
    Cancel,
    Delete,
}

/// Buttons shown in the actions column. Delete stays available while editing.
fn row_buttons(editing: bool) -> &'static [RowButton] {
    if editing {
        &[RowButton::Save, RowButton::Cancel, RowButton::Delete]
    } else {
        &[RowButton::Edit, RowButton::Delete]
    }
}

fn ui_col_actions(
    ctx: &egui::Context,
    row: &mut TableRow,
    theme: &Theme,
    marks_row: &MarksRow,
    actions: &mut ActionQueue,
) {
    row.col(|ui| {
        ui_col_lines(ui, ctx, theme);
        let student_id = &marks_row.student.id;

        for button in row_buttons(marks_row.is_editing()) {
            let (text, hover, action) = match button {
                RowButton::Save => (
                    RichText::new("✔ Save").color(theme.green(ctx)),
                    "Save marks (Enter)",
                    UiAction::SaveMarks(student_id.clone()),
                ),
                RowButton::Cancel => (
                    RichText::new("✖ Cancel"),
                    "Discard changes (Escape)",
                    UiAction::CancelEdit(student_id.clone()),
                ),
                RowButton::Edit => (
                    RichText::new("✏ Edit"),
                    "Edit marks",
                    UiAction::BeginEdit(student_id.clone()),
                ),
                RowButton::Delete => (
                    RichText::new("🗑 Delete").color(theme.red(ctx)),
                    "Delete student",
                    UiAction::RequestDelete(marks_row.student.reference()),
                ),
            };
            if ui.button(text).on_hover_text(hover).clicked() {
                actions.push(action);
            }
        }
    });
}

fn select_all(ui: &Ui, id: egui::Id, len: usize) {
    if let Some(mut state) = egui::TextEdit::load_state(ui.ctx(), id) {
        state
            .cursor
            .set_char_range(Some(CCursorRange::two(CCursor::new(0), CCursor::new(len))));
        state.store(ui.ctx(), id);
    }
}

pub(crate) fn ui_col_lines(ui: &mut Ui, ctx: &egui::Context, theme: &Theme) {
    let color = theme.comment(ctx).linear_multiply(0.55);
    let st = Stroke { width: 0.5, color };

    let rect = ui.max_rect();
    let xr = rect.x_range();
    let yr = rect.y_range();

    let shape = Shape::dashed_line(
        &[egui::pos2(xr.min, yr.min), egui::pos2(xr.max, yr.min)],
        st,
        5.0,
        2.5,
    );
    ui.painter().add(shape);
}
