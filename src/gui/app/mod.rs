mod modals;

use std::time::Instant;

use eframe::egui;
use modals::Modals;

use super::{
    login::{
        Credentials,
        LoginScreen,
    },
    table::{
        students_table,
        SaveCompletion,
        TableState,
    },
    theme::{
        set_theme,
        Theme,
    },
    toast::ToastNotifier,
    top_bar::TopBar,
    ActionQueue,
    UiAction,
};
use crate::{
    core::{
        settings::SETTINGS_FILE,
        tasks::{
            TaskManager,
            TaskResult,
        },
        DeleteStudent,
        NewStudent,
        PortalError,
        PortalSettings,
        Roster,
        StudentRef,
    },
    persistence::save_json,
    portal::{
        ActionDispatcher,
        PortalAction,
        PortalClient,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Roster,
}

pub struct PortalApp {
    // Configuration
    pub settings: PortalSettings,

    // UI State
    pub screen: Screen,
    pub table: TableState,
    pub theme: Theme,
    pub toasts: ToastNotifier,
    pub login: LoginScreen,
    pub modals: Modals,

    // Session
    client: Option<PortalClient>,
    dispatcher: Option<ActionDispatcher>,
    username: String,
    loading: bool,
    persist_settings: bool,

    task_manager: TaskManager,
}

impl PortalApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: PortalSettings,
    ) -> Result<Self, PortalError> {
        let mut app = Self::with_settings(settings)?;
        app.task_manager.set_repaint_context(cc.egui_ctx.clone());

        set_theme(&cc.egui_ctx, &app.theme);
        apply_dark_mode(&cc.egui_ctx, app.settings.dark_mode);

        Ok(app)
    }

    /// Builds the app state without a window, starting at the login screen.
    pub fn with_settings(settings: PortalSettings) -> Result<Self, PortalError> {
        let task_manager = TaskManager::new()?;
        let login = LoginScreen::new(settings.server_url.clone(), settings.last_username.clone());
        let toasts = ToastNotifier::new(settings.toast_duration());

        Ok(Self {
            settings,
            screen: Screen::Login,
            table: TableState::default(),
            theme: Theme::default(),
            toasts,
            login,
            modals: Modals::default(),
            client: None,
            dispatcher: None,
            username: String::new(),
            loading: false,
            persist_settings: true,
            task_manager,
        })
    }

    pub fn dispatcher(&self) -> Option<&ActionDispatcher> {
        self.dispatcher.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

fn apply_dark_mode(ctx: &egui::Context, dark: bool) {
    ctx.set_theme(if dark { egui::Theme::Dark } else { egui::Theme::Light });
    ctx.options_mut(|o| {
        o.theme_preference =
            if dark { egui::ThemePreference::Dark } else { egui::ThemePreference::Light };
    });
}

impl eframe::App for PortalApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let task_results = self.task_manager.poll_results();

        for result in task_results {
            self.handle_task_result(result);
        }

        self.run_due_reload(Instant::now());

        match self.screen {
            Screen::Login => {
                if let Some(credentials) = self.login.show(ctx, &self.theme, &mut self.toasts) {
                    self.sign_in(credentials);
                }
            }
            Screen::Roster => self.show_roster(ctx),
        }

        if let Some(settings) = self.modals.settings.show(ctx) {
            self.apply_settings(settings);
        }

        self.toasts.show(ctx, &self.theme);
    }
}

impl PortalApp {
    fn show_roster(&mut self, ctx: &egui::Context) {
        let mut actions = ActionQueue::new();

        TopBar::show(
            ctx,
            &self.theme,
            &self.username,
            &self.settings.server_url,
            self.loading,
            &mut actions,
        );

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(egui::RichText::new("Students").color(self.theme.cyan(ui.ctx())).strong());
                ui.label(
                    egui::RichText::new(format!("({})", self.table.rows().len()))
                        .color(self.theme.comment(ui.ctx())),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("➕ Add Student").clicked() {
                        actions.push(UiAction::OpenAddStudent);
                    }
                });
            });
            ui.add_space(10.0);

            students_table(ui, &mut self.table, &self.theme, &mut actions);
        });

        if let Some(target) = self.modals.delete.show(ctx, &self.theme) {
            self.delete_student(target);
        }

        if let Some(request) = self.modals.add_student.show(ctx, &self.theme, &mut self.toasts) {
            self.add_student(request);
        }

        let had_actions = !actions.is_empty();
        self.execute_actions(ctx, &mut actions);

        if had_actions {
            ctx.request_repaint();
        }
    }

    fn execute_actions(&mut self, ctx: &egui::Context, actions: &mut ActionQueue) {
        for action in actions.drain() {
            self.apply_action(action, Some(ctx));
        }
    }

    /// Applies one queued action. `ctx` is only needed for theme switching.
    pub fn apply_action(&mut self, action: UiAction, ctx: Option<&egui::Context>) {
        match action {
            UiAction::BeginEdit(student_id) => self.table.begin_edit(&student_id),
            UiAction::SetInput { student_id, value } => self.table.set_input(&student_id, value),
            UiAction::SaveMarks(student_id) => self.save_marks(&student_id),
            UiAction::CancelEdit(student_id) => self.table.cancel(&student_id),
            UiAction::RequestDelete(target) => self.modals.delete.request(target),
            UiAction::OpenAddStudent => self.modals.add_student.open(),
            UiAction::OpenSettings => self.modals.settings.open_settings(self.settings.clone()),
            UiAction::Refresh => self.reload(),
            UiAction::SignOut => self.sign_out(),
            UiAction::ToggleTheme => {
                self.settings.dark_mode = !self.settings.dark_mode;
                if let Some(ctx) = ctx {
                    apply_dark_mode(ctx, self.settings.dark_mode);
                }
                self.save_settings();
            }
        }
    }

    fn sign_in(&mut self, credentials: Credentials) {
        match PortalClient::new(&credentials.server_url, self.settings.request_timeout()) {
            Ok(client) => {
                tracing::info!("Signing in to {} as {}", client.base_url(), credentials.username);
                self.settings.server_url = client.base_url().to_string();
                self.username = credentials.username.clone();
                self.task_manager.sign_in(
                    client.clone(),
                    credentials.username,
                    credentials.password,
                );
                self.client = Some(client);
            }
            Err(e) => {
                self.login.set_busy(false);
                self.toasts.error(e.to_string());
            }
        }
    }

    fn sign_out(&mut self) {
        if let Some(client) = self.client.take() {
            self.task_manager.sign_out(client);
        }
        self.end_session();
    }

    fn end_session(&mut self) {
        self.client = None;
        self.dispatcher = None;
        self.loading = false;
        self.table.replace(Vec::new());
        self.modals = Modals::default();
        self.login.set_busy(false);
        self.login.clear_password();
        self.screen = Screen::Login;
    }

    /// Starts the reload scheduled by a successful add once it is due.
    pub fn run_due_reload(&mut self, now: Instant) -> bool {
        let due = self.modals.add_student.take_due_reload(now);
        if due {
            self.reload();
        }
        due
    }

    /// Re-fetches the roster, the stand-in for a page reload.
    fn reload(&mut self) {
        if let Some(client) = &self.client {
            self.loading = true;
            self.task_manager.load_roster(client.clone());
        }
    }

    fn apply_roster(&mut self, roster: Roster) {
        if roster.csrf_token.is_none() {
            tracing::warn!("No CSRF token after page load; API calls will be sent without one");
        }
        if let Some(client) = &self.client {
            self.dispatcher = Some(client.dispatcher(roster.csrf_token));
        }
        self.table.replace(roster.students);
    }

    fn save_marks(&mut self, student_id: &str) {
        match self.table.save(student_id) {
            Ok(Some(pending)) => match &self.dispatcher {
                Some(dispatcher) => self.task_manager.update_marks(
                    dispatcher.clone(),
                    pending.request,
                    pending.generation,
                ),
                None => self.toasts.error(PortalAction::UpdateMarks.failure_message()),
            },
            Ok(None) => {}
            Err(e) => self.toasts.error(e.to_string()),
        }
    }

    fn delete_student(&mut self, target: StudentRef) {
        match &self.dispatcher {
            Some(dispatcher) => self
                .task_manager
                .delete_student(dispatcher.clone(), DeleteStudent { student_id: target.id }),
            None => {
                self.modals.delete.finish(&target.id, false);
                self.toasts.error(PortalAction::DeleteStudent.failure_message());
            }
        }
    }

    fn add_student(&mut self, request: NewStudent) {
        match &self.dispatcher {
            Some(dispatcher) => self.task_manager.add_student(dispatcher.clone(), request),
            None => {
                self.modals.add_student.finish(false, Instant::now());
                self.toasts.error(PortalAction::AddStudent.failure_message());
            }
        }
    }

    fn apply_settings(&mut self, settings: PortalSettings) {
        self.settings = settings;
        self.toasts.set_duration(self.settings.toast_duration());
        if self.screen == Screen::Login {
            self.login.server_url = self.settings.server_url.clone();
        }
        self.save_settings();
    }

    fn save_settings(&self) {
        if !self.persist_settings {
            return;
        }
        if let Err(e) = save_json(&self.settings, SETTINGS_FILE) {
            tracing::error!("Failed to save settings: {}", e);
        }
    }

    pub fn handle_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::SignedIn(result) => {
                self.login.set_busy(false);
                self.login.clear_password();
                match result {
                    Ok(roster) => {
                        self.apply_roster(roster);
                        self.screen = Screen::Roster;
                        self.settings.last_username = self.username.clone();
                        self.save_settings();
                        self.toasts.success(format!("Signed in as {}", self.username));
                    }
                    Err(e) => {
                        tracing::warn!("Sign in failed: {}", e);
                        self.client = None;
                        self.toasts.error(e.to_string());
                    }
                }
            }

            TaskResult::RosterLoaded(result) => {
                self.loading = false;
                match result {
                    Ok(roster) => self.apply_roster(roster),
                    Err(PortalError::SessionExpired) => {
                        self.end_session();
                        self.toasts.warning(PortalError::SessionExpired.to_string());
                    }
                    Err(e) => {
                        tracing::error!("Roster reload failed: {}", e);
                        self.toasts.error(format!("Could not load students: {}", e));
                    }
                }
            }

            TaskResult::SignedOut(result) => match result {
                Ok(()) => self.toasts.info("Signed out"),
                Err(e) => tracing::warn!("Sign out request failed: {}", e),
            },

            TaskResult::MarksSaved { student_id, generation, marks, outcome } => {
                match self.table.complete_save(&student_id, generation, marks, outcome.is_success()) {
                    SaveCompletion::Applied | SaveCompletion::Rejected => {
                        self.toasts.report(PortalAction::UpdateMarks, &outcome);
                    }
                    // Late successes are dropped; errors are always surfaced.
                    SaveCompletion::Stale | SaveCompletion::Missing if !outcome.is_success() => {
                        self.toasts.report(PortalAction::UpdateMarks, &outcome);
                    }
                    completion @ (SaveCompletion::Stale | SaveCompletion::Missing) => {
                        tracing::debug!("Dropped marks reply for {}: {:?}", student_id, completion);
                    }
                }
            }

            TaskResult::StudentDeleted { student_id, outcome } => {
                let succeeded = outcome.is_success();
                if succeeded {
                    self.table.remove(&student_id);
                }
                self.modals.delete.finish(&student_id, succeeded);
                self.toasts.report(PortalAction::DeleteStudent, &outcome);
            }

            TaskResult::StudentAdded(outcome) => {
                self.modals.add_student.finish(outcome.is_success(), Instant::now());
                self.toasts.report(PortalAction::AddStudent, &outcome);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{
            validation::MARKS_FIELD,
            StudentRecord,
        },
        gui::{
            add_student_modal::{
                RELOAD_DELAY,
                SUBMIT_LABEL,
            },
            toast::Severity,
        },
        portal::ActionOutcome,
    };

    fn student(id: &str, marks: i64) -> StudentRecord {
        StudentRecord {
            id: id.to_string(),
            name: format!("Student {id}"),
            subject: "Chemistry".to_string(),
            marks,
        }
    }

    fn detached_app() -> PortalApp {
        let mut app = PortalApp::with_settings(PortalSettings::default()).unwrap();
        app.persist_settings = false;
        app
    }

    fn signed_in_app() -> PortalApp {
        let mut app = detached_app();
        app.client = Some(
            PortalClient::new("http://127.0.0.1:9/", app.settings.request_timeout()).unwrap(),
        );
        app.username = "teacher1".to_string();
        app.handle_task_result(TaskResult::SignedIn(Ok(Roster {
            students: vec![student("1", 85), student("2", 92)],
            csrf_token: Some("tok".to_string()),
        })));
        app
    }

    fn toast(app: &PortalApp) -> (String, Severity) {
        let toast = app.toasts.current().unwrap();
        (toast.message.clone(), toast.severity)
    }

    #[test]
    fn sign_in_shows_roster_with_token_bound_dispatcher() {
        let app = signed_in_app();
        assert_eq!(app.screen, Screen::Roster);
        assert_eq!(app.table.rows().len(), 2);
        assert_eq!(app.dispatcher().and_then(|d| d.csrf_token()), Some("tok"));
        assert_eq!(app.settings.last_username, "teacher1");
    }

    #[test]
    fn failed_sign_in_stays_on_login() {
        let mut app = detached_app();
        app.handle_task_result(TaskResult::SignedIn(Err(PortalError::Application(
            "Invalid credentials".to_string(),
        ))));
        assert_eq!(app.screen, Screen::Login);
        assert!(!app.login.is_busy());
        assert_eq!(toast(&app), ("Invalid credentials".to_string(), Severity::Error));
    }

    #[test]
    fn invalid_marks_toast_without_request() {
        let mut app = signed_in_app();
        app.apply_action(UiAction::BeginEdit("1".to_string()), None);
        app.apply_action(
            UiAction::SetInput { student_id: "1".to_string(), value: "abc".to_string() },
            None,
        );
        app.apply_action(UiAction::SaveMarks("1".to_string()), None);

        assert_eq!(
            toast(&app),
            ("Marks must be between 0 and 100".to_string(), Severity::Error)
        );
        assert!(app.table.row("1").unwrap().is_editing());
    }

    #[test]
    fn rejected_marks_reply_shows_server_error_and_keeps_editing() {
        let mut app = signed_in_app();
        app.apply_action(UiAction::BeginEdit("2".to_string()), None);
        app.apply_action(
            UiAction::SetInput { student_id: "2".to_string(), value: "40".to_string() },
            None,
        );
        let pending = app.table.save("2").unwrap().unwrap();

        app.handle_task_result(TaskResult::MarksSaved {
            student_id: "2".to_string(),
            generation: pending.generation,
            marks: 40,
            outcome: ActionOutcome::Rejected("Student not found".to_string()),
        });

        assert_eq!(toast(&app), ("Student not found".to_string(), Severity::Error));
        let row = app.table.row("2").unwrap();
        assert!(row.is_editing());
        assert_eq!(row.input, "40");
    }

    #[test]
    fn transport_failure_uses_generic_message() {
        let mut app = signed_in_app();
        app.apply_action(UiAction::BeginEdit("1".to_string()), None);
        let pending = app.table.save("1").unwrap().unwrap();

        app.handle_task_result(TaskResult::MarksSaved {
            student_id: "1".to_string(),
            generation: pending.generation,
            marks: 85,
            outcome: ActionOutcome::Failed(PortalError::Custom("connection reset".to_string())),
        });

        assert_eq!(
            toast(&app),
            ("An error occurred while updating marks".to_string(), Severity::Error)
        );
    }

    #[test]
    fn deleting_every_row_leaves_placeholder() {
        let mut app = signed_in_app();
        for id in ["1", "2"] {
            app.apply_action(UiAction::RequestDelete(app.table.row(id).unwrap().student.reference()), None);
            let target = app.modals.delete.target().clone();
            assert!(app.modals.delete.confirm(target).is_some());
            app.handle_task_result(TaskResult::StudentDeleted {
                student_id: id.to_string(),
                outcome: ActionOutcome::Succeeded("Student deleted successfully".to_string()),
            });
            assert!(!app.modals.delete.is_open());
        }

        assert!(app.table.is_empty());
        assert_eq!(app.table.placeholder_rows(), 1);
        assert_eq!(toast(&app).1, Severity::Success);
    }

    #[test]
    fn failed_delete_keeps_dialog_open() {
        let mut app = signed_in_app();
        app.apply_action(UiAction::RequestDelete(app.table.row("1").unwrap().student.reference()), None);
        let target = app.modals.delete.target().clone();
        app.modals.delete.confirm(target);

        app.handle_task_result(TaskResult::StudentDeleted {
            student_id: "1".to_string(),
            outcome: ActionOutcome::Rejected("Student not found".to_string()),
        });

        assert!(app.modals.delete.is_open());
        assert!(!app.modals.delete.is_busy());
        assert_eq!(app.table.rows().len(), 2);
    }

    #[test]
    fn expired_session_returns_to_login() {
        let mut app = signed_in_app();
        app.handle_task_result(TaskResult::RosterLoaded(Err(PortalError::SessionExpired)));

        assert_eq!(app.screen, Screen::Login);
        assert!(app.dispatcher().is_none());
        assert!(app.table.is_empty());
        assert_eq!(toast(&app).1, Severity::Warning);
    }

    #[test]
    fn reload_replaces_rows_and_token() {
        let mut app = signed_in_app();
        app.handle_task_result(TaskResult::RosterLoaded(Ok(Roster {
            students: vec![student("3", 70)],
            csrf_token: Some("fresh".to_string()),
        })));

        assert_eq!(app.table.rows().len(), 1);
        assert_eq!(app.dispatcher().and_then(|d| d.csrf_token()), Some("fresh"));
        assert!(!app.is_loading());
    }

    fn reload_roster(app: &mut PortalApp) {
        app.handle_task_result(TaskResult::RosterLoaded(Ok(Roster {
            students: vec![student("1", 85), student("2", 92)],
            csrf_token: Some("tok".to_string()),
        })));
    }

    fn start_edit(app: &mut PortalApp, student_id: &str, value: &str) -> u64 {
        app.apply_action(UiAction::BeginEdit(student_id.to_string()), None);
        app.apply_action(
            UiAction::SetInput { student_id: student_id.to_string(), value: value.to_string() },
            None,
        );
        app.table.save(student_id).unwrap().unwrap().generation
    }

    #[test]
    fn success_from_before_reload_does_not_overwrite_new_edit() {
        let mut app = signed_in_app();
        let old = start_edit(&mut app, "1", "40");
        reload_roster(&mut app);
        let new = start_edit(&mut app, "1", "70");
        assert_ne!(old, new);

        app.toasts.dismiss();
        app.handle_task_result(TaskResult::MarksSaved {
            student_id: "1".to_string(),
            generation: old,
            marks: 40,
            outcome: ActionOutcome::Succeeded("Marks updated successfully".to_string()),
        });

        let row = app.table.row("1").unwrap();
        assert_eq!(row.student.marks, 85);
        assert!(row.is_editing());
        assert_eq!(row.input, "70");
        assert!(app.toasts.current().is_none());
    }

    #[test]
    fn rejection_from_before_reload_is_still_shown() {
        let mut app = signed_in_app();
        let old = start_edit(&mut app, "1", "40");
        reload_roster(&mut app);

        app.handle_task_result(TaskResult::MarksSaved {
            student_id: "1".to_string(),
            generation: old,
            marks: 40,
            outcome: ActionOutcome::Rejected("Student not found".to_string()),
        });

        assert_eq!(toast(&app), ("Student not found".to_string(), Severity::Error));
        assert_eq!(app.table.row("1").unwrap().student.marks, 85);
    }

    #[test]
    fn failure_for_removed_row_is_still_shown() {
        let mut app = signed_in_app();
        let old = start_edit(&mut app, "1", "40");
        app.handle_task_result(TaskResult::RosterLoaded(Ok(Roster {
            students: vec![student("2", 92)],
            csrf_token: Some("tok".to_string()),
        })));

        app.handle_task_result(TaskResult::MarksSaved {
            student_id: "1".to_string(),
            generation: old,
            marks: 40,
            outcome: ActionOutcome::Failed(PortalError::Custom("connection reset".to_string())),
        });

        assert_eq!(
            toast(&app),
            ("An error occurred while updating marks".to_string(), Severity::Error)
        );
    }

    fn submitted_add(app: &mut PortalApp) {
        app.apply_action(UiAction::OpenAddStudent, None);
        let form = &mut app.modals.add_student.form_mut().form;
        form.set_value("name", "Asha");
        form.set_value("subject", "Physics");
        form.set_value(MARKS_FIELD, "77");
        assert!(app.modals.add_student.submit(&mut app.toasts).is_some());
    }

    #[test]
    fn added_student_closes_dialog_and_reloads_after_delay() {
        let mut app = signed_in_app();
        submitted_add(&mut app);

        let before = Instant::now();
        app.handle_task_result(TaskResult::StudentAdded(ActionOutcome::Succeeded(
            "Student added successfully".to_string(),
        )));

        assert!(!app.modals.add_student.is_open());
        assert_eq!(toast(&app), ("Student added successfully".to_string(), Severity::Success));
        let due = app.modals.add_student.reload_pending().unwrap();
        assert!(due >= before + RELOAD_DELAY);

        assert!(!app.run_due_reload(before));
        assert!(!app.is_loading());
        assert!(app.run_due_reload(due));
        assert!(app.is_loading());
        assert!(!app.run_due_reload(due + RELOAD_DELAY));
    }

    #[test]
    fn failed_add_keeps_dialog_and_restores_button() {
        let mut app = signed_in_app();
        submitted_add(&mut app);

        app.handle_task_result(TaskResult::StudentAdded(ActionOutcome::Rejected(
            "Invalid marks".to_string(),
        )));

        let dialog = &app.modals.add_student;
        assert!(dialog.is_open());
        assert!(!dialog.form().busy);
        assert_eq!(dialog.form().submit_label(), SUBMIT_LABEL);
        assert_eq!(dialog.form().form.value("name"), "Asha");
        assert!(dialog.reload_pending().is_none());
        assert_eq!(toast(&app), ("Invalid marks".to_string(), Severity::Error));
        assert!(!app.run_due_reload(Instant::now() + RELOAD_DELAY));
    }
}
