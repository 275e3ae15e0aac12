use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["window", "__TAURI__", "core"], catch)]
    async fn invoke(cmd: &str, args: JsValue) -> Result<JsValue, JsValue>;
}

// -- Arg structs for serialization --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToggleSymptomArgs<'a> {
    symptom_id: &'a str,
    selected: bool,
}

#[derive(Serialize)]
struct IdArgs<'a> {
    id: &'a str,
}

#[derive(Serialize)]
struct LoginArgs<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct GetPreferenceArgs<'a> {
    key: &'a str,
}

#[derive(Serialize)]
struct SetPreferenceArgs<'a> {
    key: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
struct NoArgs {}

// -- Types matching backend structs --

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Symptom {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Prediction {
    pub condition: String,
    pub probability: u8,
    pub description: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Selecting,
    Analyzing,
    ShowingResults,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub selected: Vec<String>,
    pub predictions: Vec<Prediction>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            phase: Phase::Selecting,
            selected: Vec::new(),
            predictions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HistoryEntry {
    pub id: String,
    /// RFC 3339 timestamp
    pub date: String,
    pub symptoms: Vec<String>,
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PredictionOutcome {
    pub session: SessionSnapshot,
    /// "local" or "remote"
    pub backend: String,
    pub history_entry: Option<HistoryEntry>,
    pub history_error: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceStatus {
    pub configured: bool,
    pub available: bool,
    pub base_url: Option<String>,
    pub last_error: Option<String>,
    pub checked_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
}

// -- Typed invoke helpers --

async fn call<A: Serialize, T: DeserializeOwned>(cmd: &str, args: &A) -> Result<T, String> {
    let args = serde_wasm_bindgen::to_value(args).map_err(|e| e.to_string())?;

    let result = invoke(cmd, args)
        .await
        .map_err(|e| e.as_string().unwrap_or_else(|| "Unknown error".to_string()))?;

    serde_wasm_bindgen::from_value(result).map_err(|e| e.to_string())
}

async fn call_unit<A: Serialize>(cmd: &str, args: &A) -> Result<(), String> {
    let args = serde_wasm_bindgen::to_value(args).map_err(|e| e.to_string())?;

    invoke(cmd, args)
        .await
        .map(|_| ())
        .map_err(|e| e.as_string().unwrap_or_else(|| "Unknown error".to_string()))
}

pub async fn list_symptoms() -> Result<Vec<Symptom>, String> {
    call("list_symptoms", &NoArgs {}).await
}

pub async fn get_session() -> Result<SessionSnapshot, String> {
    call("get_session", &NoArgs {}).await
}

pub async fn toggle_symptom(symptom_id: &str, selected: bool) -> Result<SessionSnapshot, String> {
    call(
        "toggle_symptom",
        &ToggleSymptomArgs {
            symptom_id,
            selected,
        },
    )
    .await
}

pub async fn start_prediction() -> Result<PredictionOutcome, String> {
    call("start_prediction", &NoArgs {}).await
}

pub async fn reset_session() -> Result<SessionSnapshot, String> {
    call("reset_session", &NoArgs {}).await
}

pub async fn list_history() -> Result<Vec<HistoryEntry>, String> {
    call("list_history", &NoArgs {}).await
}

pub async fn delete_history_entry(id: &str) -> Result<bool, String> {
    call("delete_history_entry", &IdArgs { id }).await
}

pub async fn clear_history() -> Result<(), String> {
    call_unit("clear_history", &NoArgs {}).await
}

pub async fn check_service() -> Result<ServiceStatus, String> {
    call("check_service", &NoArgs {}).await
}

pub async fn take_service_notice() -> Result<Option<String>, String> {
    call("take_service_notice", &NoArgs {}).await
}

pub async fn login(email: &str, password: &str) -> Result<User, String> {
    call("login", &LoginArgs { email, password }).await
}

pub async fn login_with_google() -> Result<User, String> {
    call("login_with_google", &NoArgs {}).await
}

pub async fn logout() -> Result<(), String> {
    call_unit("logout", &NoArgs {}).await
}

pub async fn current_user() -> Result<Option<User>, String> {
    call("current_user", &NoArgs {}).await
}

pub async fn get_preference(key: &str) -> Result<Option<String>, String> {
    call("get_preference", &GetPreferenceArgs { key }).await
}

pub async fn set_preference(key: &str, value: &str) -> Result<(), String> {
    call_unit("set_preference", &SetPreferenceArgs { key, value }).await
}
