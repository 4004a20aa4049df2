use crate::{
    core::{
        PortalError,
        Roster,
    },
    portal::ActionOutcome,
};

#[derive(Debug)]
pub enum TaskResult {
    SignedIn(Result<Roster, PortalError>),
    RosterLoaded(Result<Roster, PortalError>),
    SignedOut(Result<(), PortalError>),

    MarksSaved { student_id: String, generation: u64, marks: u8, outcome: ActionOutcome },
    StudentDeleted { student_id: String, outcome: ActionOutcome },
    StudentAdded(ActionOutcome),
}

impl TaskResult {
    pub fn task_type(&self) -> &'static str {
        match self {
            TaskResult::SignedIn(_) => "sign_in",
            TaskResult::RosterLoaded(_) => "roster",
            TaskResult::SignedOut(_) => "sign_out",
            TaskResult::MarksSaved { .. } => "update_marks",
            TaskResult::StudentDeleted { .. } => "delete_student",
            TaskResult::StudentAdded(_) => "add_student",
        }
    }
}
