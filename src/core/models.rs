use serde::{
    Deserialize,
    Serialize,
};

/// A row of the students table as rendered by the portal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub marks: i64,
}

impl StudentRecord {
    pub fn reference(&self) -> StudentRef {
        StudentRef { id: self.id.clone(), name: self.name.clone(), subject: self.subject.clone() }
    }
}

/// Identifies a student for confirmation prompts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentRef {
    pub id: String,
    pub name: String,
    pub subject: String,
}

/// Roster as read from one load of the home page, together with the CSRF
/// token that was current at the time.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub students: Vec<StudentRecord>,
    pub csrf_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UpdateMarks {
    pub student_id: String,
    pub marks: u8,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DeleteStudent {
    pub student_id: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub subject: String,
    pub marks: u8,
}

/// Envelope shared by every mutating endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiReply {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<String>,
}
