use eframe::egui;
use teacher_portal::{
    core::{
        settings::{
            SERVER_URL_ENV,
            SETTINGS_FILE,
        },
        PortalSettings,
    },
    gui::PortalApp,
    persistence::load_json_or_default,
};

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("teacher_portal=info")),
        )
        .init();

    let settings = load_json_or_default::<PortalSettings>(SETTINGS_FILE)
        .with_env_override(std::env::var(SERVER_URL_ENV).ok());
    tracing::info!("Using portal at {}", settings.server_url);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Teacher Portal")
            .with_inner_size([960.0, 640.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Teacher Portal",
        native_options,
        Box::new(move |cc| Ok(Box::new(PortalApp::new(cc, settings)?))),
    )
}
