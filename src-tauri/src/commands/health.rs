use tauri::State;
use tracing::info;

use crate::service::ServiceStatus;
use crate::AppService;

/// Check the remote prediction service and report its state.
#[tauri::command]
pub async fn check_service(service: State<'_, AppService>) -> Result<ServiceStatus, String> {
    info!("Checking prediction service");
    Ok(service.check_service().await)
}

/// Pop the oldest pending notice for display.
#[tauri::command]
pub fn take_service_notice(service: State<'_, AppService>) -> Option<String> {
    service.take_notice()
}
