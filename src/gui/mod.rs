pub mod actions;
pub mod add_student_modal;
pub mod app;
pub mod delete_modal;
pub mod form_ui;
pub mod login;
pub mod modal;
pub mod settings_modal;
pub mod table;
pub mod theme;
pub mod toast;
pub mod top_bar;

pub use actions::{
    ActionQueue,
    UiAction,
};
pub use app::PortalApp;
