use crate::core::StudentRef;

// Widgets queue what the user asked for; the app applies it after drawing so
// nothing holds a borrow of the table across the frame.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    // Marks editing
    BeginEdit(String),
    SetInput { student_id: String, value: String },
    SaveMarks(String),
    CancelEdit(String),

    // Dialogs
    RequestDelete(StudentRef),
    OpenAddStudent,
    OpenSettings,

    // Session
    Refresh,
    SignOut,
    ToggleTheme,
}

pub struct ActionQueue {
    actions: Vec<UiAction>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self { actions: Vec::new() }
    }

    pub fn push(&mut self, action: UiAction) {
        self.actions.push(action);
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, UiAction> {
        self.actions.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl Default for ActionQueue {
    fn default() -> Self {
        Self::new()
    }
}
