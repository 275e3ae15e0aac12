use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Fail,
    Unknown,
}

impl CheckStatus {
    pub fn from_bool(ok: bool) -> Self {
        if ok {
            CheckStatus::Pass
        } else {
            CheckStatus::Fail
        }
    }
}

#[component]
pub fn StatusBadge(
    /// The label text, e.g. "Prediction service"
    #[prop(into)]
    label: String,
    status: CheckStatus,
    /// Optional detail text, e.g. the service URL
    #[prop(optional, into)]
    detail: Option<String>,
) -> impl IntoView {
    let (icon, class) = match status {
        CheckStatus::Pass => ("\u{2713}", "status-badge status-pass"),
        CheckStatus::Fail => ("\u{2717}", "status-badge status-fail"),
        CheckStatus::Unknown => ("?", "status-badge status-unknown"),
    };

    view! {
        <div class="status-item">
            <span class=class>{icon}</span>
            <span class="status-name">{label}</span>
            <span class="status-detail">{detail.unwrap_or_default()}</span>
        </div>
    }
}
