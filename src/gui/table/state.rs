use crate::core::{
    validation::{
        parse_marks,
        MARKS_RANGE_MESSAGE,
    },
    PortalError,
    StudentRecord,
    UpdateMarks,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowMode {
    #[default]
    Viewing,
    Editing,
}

#[derive(Debug, Clone)]
pub struct MarksRow {
    pub student: StudentRecord,
    pub input: String,
    mode: RowMode,
    generation: u64,
    focus_requested: bool,
}

impl MarksRow {
    fn new(student: StudentRecord) -> Self {
        let input = student.marks.to_string();
        Self { student, input, mode: RowMode::Viewing, generation: 0, focus_requested: false }
    }

    pub fn mode(&self) -> RowMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == RowMode::Editing
    }

    pub fn display_text(&self) -> String {
        self.student.marks.to_string()
    }

    /// Returns true once after focus was requested for this row's input.
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveCompletion {
    Applied,
    Rejected,
    /// A newer save was issued for the row after this one.
    Stale,
    /// The row is gone, e.g. deleted while the save was in flight.
    Missing,
}

/// A save that passed validation and should be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSave {
    pub request: UpdateMarks,
    pub generation: u64,
}

/// Rows of the students table and their inline editing state.
///
/// Save generations come from one table-wide counter that only moves
/// forward, so a reply issued before a reload never matches a save issued
/// after it.
#[derive(Debug, Default)]
pub struct TableState {
    rows: Vec<MarksRow>,
    last_generation: u64,
}

impl TableState {
    pub fn new(students: Vec<StudentRecord>) -> Self {
        Self { rows: students.into_iter().map(MarksRow::new).collect(), last_generation: 0 }
    }

    /// Replaces every row, as a page reload would. The generation counter
    /// carries over.
    pub fn replace(&mut self, students: Vec<StudentRecord>) {
        self.rows = students.into_iter().map(MarksRow::new).collect();
    }

    pub fn rows(&self) -> &[MarksRow] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [MarksRow] {
        &mut self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of placeholder rows the table body shows.
    pub fn placeholder_rows(&self) -> usize {
        usize::from(self.rows.is_empty())
    }

    pub fn row(&self, student_id: &str) -> Option<&MarksRow> {
        self.rows.iter().find(|r| r.student.id == student_id)
    }

    fn row_mut(&mut self, student_id: &str) -> Option<&mut MarksRow> {
        self.rows.iter_mut().find(|r| r.student.id == student_id)
    }

    pub fn set_input(&mut self, student_id: &str, value: String) {
        if let Some(row) = self.row_mut(student_id) {
            row.input = value;
        }
    }

    pub fn begin_edit(&mut self, student_id: &str) {
        if let Some(row) = self.row_mut(student_id) {
            row.input = row.display_text();
            row.mode = RowMode::Editing;
            row.focus_requested = true;
        }
    }

    /// Validates the row's input and, when it is acceptable, returns the
    /// request to send. Invalid input keeps the row editing and asks for
    /// focus again.
    pub fn save(&mut self, student_id: &str) -> Result<Option<PendingSave>, PortalError> {
        let next = self.last_generation + 1;
        let Some(row) = self.row_mut(student_id) else {
            return Ok(None);
        };

        let Some(marks) = parse_marks(&row.input) else {
            row.focus_requested = true;
            return Err(PortalError::Validation(MARKS_RANGE_MESSAGE.to_string()));
        };

        row.generation = next;
        let pending = PendingSave {
            request: UpdateMarks { student_id: row.student.id.clone(), marks },
            generation: next,
        };
        self.last_generation = next;
        Ok(Some(pending))
    }

    pub fn cancel(&mut self, student_id: &str) {
        if let Some(row) = self.row_mut(student_id) {
            row.input = row.display_text();
            row.mode = RowMode::Viewing;
            row.focus_requested = false;
        }
    }

    /// Applies the reply to a save. Only the row's latest save may change
    /// it; earlier replies are dropped.
    pub fn complete_save(
        &mut self,
        student_id: &str,
        generation: u64,
        marks: u8,
        succeeded: bool,
    ) -> SaveCompletion {
        let Some(row) = self.row_mut(student_id) else {
            return SaveCompletion::Missing;
        };

        if row.generation != generation {
            tracing::debug!(
                "Ignoring stale save for {} (generation {} != {})",
                student_id,
                generation,
                row.generation
            );
            return SaveCompletion::Stale;
        }

        if !succeeded {
            return SaveCompletion::Rejected;
        }

        row.student.marks = i64::from(marks);
        row.input = row.display_text();
        row.mode = RowMode::Viewing;
        SaveCompletion::Applied
    }

    /// Removes the row for `student_id`, reporting whether it existed.
    pub fn remove(&mut self, student_id: &str) -> bool {
        let before = self.rows.len();
        self.rows.retain(|r| r.student.id != student_id);
        self.rows.len() != before
    }
}
