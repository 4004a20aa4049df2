use std::{
    future::Future,
    sync::{
        mpsc,
        Arc,
    },
};

use eframe::egui;
use tokio::runtime::Runtime;

use super::TaskResult;
use crate::{
    core::{
        DeleteStudent,
        NewStudent,
        PortalError,
        UpdateMarks,
    },
    portal::{
        ActionDispatcher,
        PortalClient,
    },
};

/// Runs portal calls off the UI thread and hands their results back through
/// a channel drained once per frame.
pub struct TaskManager {
    runtime: Arc<Runtime>,
    receiver: mpsc::Receiver<TaskResult>,
    sender: mpsc::Sender<TaskResult>,
    repaint: Option<egui::Context>,
}

impl TaskManager {
    pub fn new() -> Result<Self, PortalError> {
        let runtime = Arc::new(Runtime::new()?);

        let (sender, receiver) = mpsc::channel();

        Ok(Self { runtime, receiver, sender, repaint: None })
    }

    /// Wakes the UI whenever a result arrives.
    pub fn set_repaint_context(&mut self, ctx: egui::Context) {
        self.repaint = Some(ctx);
    }

    pub fn poll_results(&mut self) -> Vec<TaskResult> {
        let mut results = Vec::new();

        while let Ok(result) = self.receiver.try_recv() {
            results.push(result);
        }

        results
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = TaskResult> + Send + 'static,
    {
        let sender = self.sender.clone();
        let repaint = self.repaint.clone();

        self.runtime.spawn(async move {
            let result = task.await;
            tracing::debug!("Task finished: {}", result.task_type());
            let _ = sender.send(result);
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }

    pub fn sign_in(&self, client: PortalClient, username: String, password: String) {
        self.spawn(async move { TaskResult::SignedIn(client.login(&username, &password).await) });
    }

    pub fn load_roster(&self, client: PortalClient) {
        self.spawn(async move { TaskResult::RosterLoaded(client.load_roster().await) });
    }

    pub fn sign_out(&self, client: PortalClient) {
        self.spawn(async move { TaskResult::SignedOut(client.logout().await) });
    }

    pub fn update_marks(&self, dispatcher: ActionDispatcher, request: UpdateMarks, generation: u64) {
        self.spawn(async move {
            let outcome = dispatcher.update_marks(&request).await;
            TaskResult::MarksSaved {
                student_id: request.student_id,
                generation,
                marks: request.marks,
                outcome,
            }
        });
    }

    pub fn delete_student(&self, dispatcher: ActionDispatcher, request: DeleteStudent) {
        self.spawn(async move {
            let outcome = dispatcher.delete_student(&request).await;
            TaskResult::StudentDeleted { student_id: request.student_id, outcome }
        });
    }

    pub fn add_student(&self, dispatcher: ActionDispatcher, request: NewStudent) {
        self.spawn(async move { TaskResult::StudentAdded(dispatcher.add_student(&request).await) });
    }
}
