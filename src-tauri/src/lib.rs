pub mod auth;
pub mod catalog;
#[cfg(feature = "desktop")]
mod commands;
pub mod config;
mod error;
pub mod history;
pub mod inference;
pub mod recorder;
pub mod remote;
pub mod service;
pub mod session;
pub mod storage;

pub use config::AppConfig;
pub use error::{MediPredictError, Result};
pub use history::{HistoryEntry, HistoryStore};
pub use service::{PredictionOutcome, PredictionService, ServiceOptions};

use auth::Identity;
use storage::{Storage, HISTORY_KEY, USER_KEY};

/// Service type managed by the desktop app.
pub type AppService = PredictionService<Box<dyn Storage>>;

/// Install the global `tracing` subscriber (`RUST_LOG`, default `info`).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

/// Assemble the service described by `config`: storage, rules and the
/// optional remote client.
pub fn build_service(config: &AppConfig) -> anyhow::Result<AppService> {
    let engine = config.rule_engine()?;
    let history = HistoryStore::open(config.open_storage(HISTORY_KEY)?);
    let identity = Identity::open(config.open_storage(USER_KEY)?);

    let service = PredictionService::new(
        engine,
        history,
        identity,
        ServiceOptions {
            analysis_delay: config.analysis_delay(),
            analysis_jitter: config.analysis_jitter(),
        },
    );

    Ok(match config.remote_client()? {
        Some(client) => {
            tracing::info!("Using prediction service at {}", client.base_url());
            service.with_remote(client)
        }
        None => service,
    })
}

#[cfg(feature = "desktop")]
pub fn run() {
    init_tracing();

    let config = AppConfig::load_default();
    let service = match build_service(&config) {
        Ok(service) => service,
        Err(e) => {
            tracing::error!("Failed to start MediPredict: {:#}", e);
            std::process::exit(1);
        }
    };

    tauri::Builder::default()
        .plugin(tauri_plugin_store::Builder::new().build())
        .manage(service)
        .invoke_handler(tauri::generate_handler![
            commands::prediction::list_symptoms,
            commands::prediction::get_session,
            commands::prediction::toggle_symptom,
            commands::prediction::start_prediction,
            commands::prediction::reset_session,
            commands::history::list_history,
            commands::history::delete_history_entry,
            commands::history::clear_history,
            commands::health::check_service,
            commands::health::take_service_notice,
            commands::auth::login,
            commands::auth::login_with_google,
            commands::auth::logout,
            commands::auth::current_user,
            commands::config::get_preference,
            commands::config::set_preference,
        ])
        .setup(|app| {
            // Check the remote service once at startup
            use tauri::Manager;
            let handle = app.handle().clone();
            tauri::async_runtime::spawn(async move {
                let service = handle.state::<AppService>();
                let status = service.check_service().await;
                if status.configured {
                    tracing::info!("Prediction service available: {}", status.available);
                }
            });
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
