use eframe::egui;

/// A dialog that carries its own payload. Opening it with new data replaces
/// whatever the previous invocation held.
pub struct Modal<T> {
    pub open: bool,
    pub title: String,
    pub data: T,
    pub config: ModalConfig,
}

/// Configuration for modal appearance and behavior
#[derive(Clone)]
pub struct ModalConfig {
    /// Minimum size of the modal
    pub min_size: Option<egui::Vec2>,
    /// Whether to show a dark overlay behind the modal
    pub show_overlay: bool,
    /// Whether clicking outside the modal should close it
    pub close_on_outside_click: bool,
    /// Whether confirming closes the modal right away. Dialogs that wait for
    /// the server close themselves once the reply arrives.
    pub close_on_confirm: bool,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            min_size: Some(egui::Vec2::new(300.0, 120.0)),
            show_overlay: true,
            close_on_outside_click: true,
            close_on_confirm: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModalResult<T> {
    Confirmed(T),
    Cancelled,
}

impl<T: Default> Modal<T> {
    pub fn new(title: impl Into<String>) -> Self {
        Self::new_with_data(title, T::default())
    }
}

impl<T> Modal<T> {
    pub fn new_with_data(title: impl Into<String>, data: T) -> Self {
        Self { open: false, title: title.into(), data, config: ModalConfig::default() }
    }

    pub fn with_config(mut self, config: ModalConfig) -> Self {
        self.config = config;
        self
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn open_with(&mut self, data: T) {
        self.data = data;
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    /// Applies a result produced by the dialog's content, closing the modal
    /// where the configuration says so.
    pub fn resolve(&mut self, result: ModalResult<T>) -> ModalResult<T> {
        match &result {
            ModalResult::Confirmed(_) if self.config.close_on_confirm => self.open = false,
            ModalResult::Confirmed(_) => {}
            ModalResult::Cancelled => self.open = false,
        }
        result
    }

    pub fn show<F>(&mut self, ctx: &egui::Context, content: F) -> Option<ModalResult<T>>
    where
        F: FnOnce(&mut egui::Ui, &mut T) -> Option<ModalResult<T>>,
    {
        if !self.open {
            return None;
        }

        let mut result = None;
        let mut close_from_outside_click = false;

        if self.config.show_overlay {
            close_from_outside_click = self.show_overlay(ctx);
        }

        let mut window = egui::Window::new(&self.title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO);

        if let Some(min_size) = self.config.min_size {
            window = window.min_size(min_size);
        }

        let data = &mut self.data;
        window.show(ctx, |ui| {
            result = content(ui, data);
        });

        if result.is_none() && close_from_outside_click && self.config.close_on_outside_click {
            result = Some(ModalResult::Cancelled);
        }

        result.map(|r| self.resolve(r))
    }

    fn show_overlay(&self, ctx: &egui::Context) -> bool {
        let area_response = egui::Area::new(egui::Id::new("modal_overlay").with(&self.title))
            .order(egui::Order::Background)
            .fixed_pos(egui::Pos2::ZERO)
            .show(ctx, |ui| {
                let screen_rect = ctx.screen_rect();
                let (_rect, response) =
                    ui.allocate_exact_size(screen_rect.size(), egui::Sense::click());
                ui.painter().rect_filled(screen_rect, 0.0, egui::Color32::from_black_alpha(100));
                response.clicked()
            });

        area_response.inner
    }
}

pub fn action_buttons<T>(
    ui: &mut egui::Ui,
    confirm: impl FnOnce() -> T,
    confirm_text: &str,
    cancel_text: &str,
    confirm_enabled: bool,
) -> Option<ModalResult<T>> {
    ui.horizontal(|ui| {
        if ui.add_enabled(confirm_enabled, egui::Button::new(confirm_text)).clicked() {
            Some(ModalResult::Confirmed(confirm()))
        } else if ui.button(cancel_text).clicked() {
            Some(ModalResult::Cancelled)
        } else {
            None
        }
    })
    .inner
}
