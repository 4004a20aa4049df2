use std::time::{
    Duration,
    Instant,
};

use eframe::egui;

use crate::{
    gui::theme::Theme,
    portal::{
        ActionOutcome,
        PortalAction,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Info => "ℹ",
            Severity::Success => "✔",
            Severity::Warning => "⚠",
            Severity::Error => "❗",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Severity::Info => "Notice",
            Severity::Success => "Success",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }

    pub fn color(&self, theme: &Theme, ctx: &egui::Context) -> egui::Color32 {
        match self {
            Severity::Info => theme.blue(ctx),
            Severity::Success => theme.green(ctx),
            Severity::Warning => theme.yellow(ctx),
            Severity::Error => theme.red(ctx),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
    shown_at: Instant,
}

/// The single notification slot. A new notification replaces whatever is
/// showing and restarts the timer.
pub struct ToastNotifier {
    current: Option<Toast>,
    duration: Duration,
}

impl ToastNotifier {
    pub fn new(duration: Duration) -> Self {
        Self { current: None, duration }
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        let message = message.into();
        tracing::debug!("toast [{:?}] {}", severity, message);
        self.current = Some(Toast { message, severity, shown_at: Instant::now() });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.notify(message, Severity::Info);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.notify(message, Severity::Success);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.notify(message, Severity::Warning);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.notify(message, Severity::Error);
    }

    /// Surfaces a dispatcher outcome: the server's own text when it replied,
    /// the action's generic text when it did not.
    pub fn report(&mut self, action: PortalAction, outcome: &ActionOutcome) {
        match outcome {
            ActionOutcome::Succeeded(message) => self.success(message.as_str()),
            ActionOutcome::Rejected(error) => self.error(error.as_str()),
            ActionOutcome::Failed(_) => self.error(action.failure_message()),
        }
    }

    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Drops the toast once it has been visible for the configured duration.
    pub fn expire(&mut self, now: Instant) {
        if let Some(toast) = &self.current {
            if now.saturating_duration_since(toast.shown_at) >= self.duration {
                self.current = None;
            }
        }
    }

    fn remaining(&self, now: Instant) -> Option<Duration> {
        self.current
            .as_ref()
            .map(|toast| self.duration.saturating_sub(now.saturating_duration_since(toast.shown_at)))
    }

    pub fn show(&mut self, ctx: &egui::Context, theme: &Theme) {
        let now = Instant::now();
        self.expire(now);

        let Some(toast) = self.current.clone() else {
            return;
        };

        let accent = toast.severity.color(theme, ctx);
        let mut close_clicked = false;

        egui::Area::new(egui::Id::new("action_toast"))
            .order(egui::Order::Foreground)
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::Vec2::new(-16.0, -16.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style())
                    .stroke(egui::Stroke::new(1.5, accent))
                    .inner_margin(egui::Margin::same(10))
                    .show(ui, |ui| {
                        ui.set_max_width(320.0);
                        ui.horizontal(|ui| {
                            ui.label(
                                egui::RichText::new(toast.severity.icon()).size(18.0).color(accent),
                            );
                            ui.label(egui::RichText::new(toast.severity.title()).strong());
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    close_clicked = ui.small_button("✖").clicked();
                                },
                            );
                        });
                        ui.add_space(4.0);
                        ui.label(&toast.message);
                    });
            });

        if close_clicked {
            self.dismiss();
        } else if let Some(remaining) = self.remaining(now) {
            ctx.request_repaint_after(remaining);
        }
    }
}

impl Default for ToastNotifier {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}
