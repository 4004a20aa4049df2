use crate::gui::{
    add_student_modal::AddStudentModal,
    delete_modal::DeleteConfirmModal,
    settings_modal::SettingsModal,
};

pub struct Modals {
    pub delete: DeleteConfirmModal,
    pub add_student: AddStudentModal,
    pub settings: SettingsModal,
}

impl Default for Modals {
    fn default() -> Self {
        Self {
            delete: DeleteConfirmModal::new(),
            add_student: AddStudentModal::new(),
            settings: SettingsModal::new(),
        }
    }
}
