//! Tauri commands for the symptom check session.

use tauri::State;
use tracing::info;

use crate::catalog::Symptom;
use crate::service::PredictionOutcome;
use crate::session::SessionSnapshot;
use crate::AppService;

#[tauri::command]
pub fn list_symptoms(service: State<'_, AppService>) -> Vec<Symptom> {
    service.symptoms()
}

#[tauri::command]
pub fn get_session(service: State<'_, AppService>) -> SessionSnapshot {
    service.session_snapshot()
}

#[tauri::command]
pub fn toggle_symptom(
    service: State<'_, AppService>,
    symptom_id: String,
    selected: bool,
) -> Result<SessionSnapshot, String> {
    Ok(service.toggle_symptom(&symptom_id, selected)?)
}

/// Run the analysis for the current selection.
///
/// Resolves once results are ready (after the simulated analysis delay).
#[tauri::command]
pub async fn start_prediction(service: State<'_, AppService>) -> Result<PredictionOutcome, String> {
    let outcome = service.start_prediction().await?;
    info!(
        "Prediction complete via {:?}: {} conditions",
        outcome.backend,
        outcome.session.predictions.len()
    );
    Ok(outcome)
}

#[tauri::command]
pub fn reset_session(service: State<'_, AppService>) -> SessionSnapshot {
    service.reset_session()
}
