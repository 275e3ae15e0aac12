//! Tauri commands for the prediction history.

use tauri::State;
use tracing::info;

use crate::history::HistoryEntry;
use crate::AppService;

/// List all history entries, newest first.
#[tauri::command]
pub async fn list_history(service: State<'_, AppService>) -> Result<Vec<HistoryEntry>, String> {
    let entries = service.list_history().await?;
    info!("Listed {} history entries", entries.len());
    Ok(entries)
}

/// Delete one entry. Returns false when no entry had that id.
#[tauri::command]
pub async fn delete_history_entry(
    service: State<'_, AppService>,
    id: String,
) -> Result<bool, String> {
    Ok(service.delete_history_entry(&id).await?)
}

#[tauri::command]
pub async fn clear_history(service: State<'_, AppService>) -> Result<(), String> {
    Ok(service.clear_history().await?)
}
