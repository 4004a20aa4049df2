pub mod cookies;
pub mod errors;
pub mod http;
pub mod models;
pub mod settings;
pub mod tasks;
pub mod validation;

pub use errors::PortalError;
pub use models::{
    ApiReply,
    DeleteStudent,
    NewStudent,
    Roster,
    StudentRecord,
    StudentRef,
    UpdateMarks,
};
pub use settings::PortalSettings;
