//! Wire types for the remote prediction service.
//!
//! The service has shipped more than one response shape over time; these
//! types accept each of them and normalise to the local model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::User;
use crate::history::HistoryEntry;
use crate::inference::Prediction;

#[derive(Debug, Serialize)]
pub struct PredictRequest<'a> {
    pub symptoms: &'a [String],
}

/// Either `{"predictions": [...]}` or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PredictResponse {
    Wrapped { predictions: Vec<Prediction> },
    Bare(Vec<Prediction>),
}

impl PredictResponse {
    pub fn into_predictions(self) -> Vec<Prediction> {
        match self {
            PredictResponse::Wrapped { predictions } => predictions,
            PredictResponse::Bare(predictions) => predictions,
        }
    }
}

/// Ids arrive as database integers or as strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Number(i64),
    Text(String),
}

impl WireId {
    pub fn into_string(self) -> String {
        match self {
            WireId::Number(n) => n.to_string(),
            WireId::Text(s) => s,
        }
    }
}

/// Symptoms arrive as plain labels or as `{id, label}` objects.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireSymptom {
    Object { id: String, label: String },
    Label(String),
}

impl WireSymptom {
    pub fn into_label(self) -> String {
        match self {
            WireSymptom::Object { id, label } if label.is_empty() => id,
            WireSymptom::Object { label, .. } => label,
            WireSymptom::Label(label) => label,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteHistoryEntry {
    pub id: WireId,
    pub date: DateTime<Utc>,
    pub symptoms: Vec<WireSymptom>,
    pub predictions: Vec<Prediction>,
}

impl From<RemoteHistoryEntry> for HistoryEntry {
    fn from(remote: RemoteHistoryEntry) -> Self {
        HistoryEntry::new(
            remote.id.into_string(),
            remote.date,
            remote
                .symptoms
                .into_iter()
                .map(WireSymptom::into_label)
                .collect(),
            remote.predictions,
        )
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct RemoteUser {
    pub id: WireId,
    pub email: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: RemoteUser,
}

impl From<RemoteUser> for User {
    fn from(remote: RemoteUser) -> Self {
        User {
            id: remote.id.into_string(),
            email: remote.email,
            name: remote.name,
        }
    }
}

/// Error body used by the service: `{"error": "..."}`.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_response_wrapped() {
        let json = r#"{"predictions": [{"condition":"Flu","probability":40,"description":"d","recommendation":"r"}]}"#;
        let resp: PredictResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.into_predictions()[0].condition, "Flu");
    }

    #[test]
    fn test_predict_response_bare() {
        let json = r#"[{"condition":"Flu","probability":40,"description":"d","recommendation":"r"}]"#;
        let resp: PredictResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.into_predictions().len(), 1);
    }

    #[test]
    fn test_remote_history_with_symptom_objects() {
        let json = r#"{
            "id": 42,
            "date": "2024-03-01T10:15:30.123456Z",
            "symptoms": [{"id": "fever", "label": "Fever"}, {"id": "cough", "label": "Cough"}],
            "predictions": []
        }"#;
        let remote: RemoteHistoryEntry = serde_json::from_str(json).unwrap();
        let entry: HistoryEntry = remote.into();
        assert_eq!(entry.id(), "42");
        assert_eq!(entry.symptoms(), &["Fever", "Cough"]);
    }

    #[test]
    fn test_remote_history_with_label_strings() {
        let json = r#"{
            "id": "1700000000000",
            "date": "2023-11-14T22:13:20+00:00",
            "symptoms": ["Rash"],
            "predictions": []
        }"#;
        let remote: RemoteHistoryEntry = serde_json::from_str(json).unwrap();
        let entry: HistoryEntry = remote.into();
        assert_eq!(entry.id(), "1700000000000");
        assert_eq!(entry.symptoms(), &["Rash"]);
    }

    #[test]
    fn test_login_response_numeric_user_id() {
        let json = r#"{"token":"abc","user":{"id":7,"email":"a@b.c","name":"Ann Lee"}}"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        let user: User = resp.user.into();
        assert_eq!(user.id, "7");
        assert_eq!(user.name, "Ann Lee");
        assert_eq!(resp.token, "abc");
    }
}
