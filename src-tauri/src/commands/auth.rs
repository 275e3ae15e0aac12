use tauri::State;

use crate::auth::User;
use crate::AppService;

#[tauri::command]
pub async fn login(
    service: State<'_, AppService>,
    email: String,
    password: String,
) -> Result<User, String> {
    Ok(service.login(&email, &password).await?)
}

#[tauri::command]
pub fn login_with_google(service: State<'_, AppService>) -> Result<User, String> {
    Ok(service.login_with_google()?)
}

#[tauri::command]
pub fn logout(service: State<'_, AppService>) -> Result<(), String> {
    Ok(service.logout()?)
}

#[tauri::command]
pub fn current_user(service: State<'_, AppService>) -> Option<User> {
    service.current_user()
}
