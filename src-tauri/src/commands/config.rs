use tauri::AppHandle;
use tauri_plugin_store::StoreExt;
use tracing::{debug, warn};

const PREFERENCES_FILE: &str = "preferences.json";

/// UI preferences (theme, last page) live in the plugin store, separate from
/// prediction data.
#[tauri::command]
pub fn get_preference(app: AppHandle, key: &str) -> Result<Option<String>, String> {
    debug!("Getting preference: {}", key);
    let store = app.store(PREFERENCES_FILE).map_err(|e| {
        warn!("Failed to open preferences: {}", e);
        e.to_string()
    })?;
    Ok(store
        .get(key)
        .and_then(|v| v.as_str().map(|s| s.to_string())))
}

#[tauri::command]
pub fn set_preference(app: AppHandle, key: &str, value: &str) -> Result<(), String> {
    debug!("Setting preference: {} = {}", key, value);
    let store = app.store(PREFERENCES_FILE).map_err(|e| {
        warn!("Failed to open preferences: {}", e);
        e.to_string()
    })?;
    store.set(key, serde_json::json!(value));
    store.save().map_err(|e| {
        warn!("Failed to save preferences: {}", e);
        e.to_string()
    })
}
