use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::app::NoticeContext;
use crate::commands::{self, ServiceStatus};
use crate::components::status_badge::{CheckStatus, StatusBadge};
use crate::format::local_datetime;
use crate::theme::{ThemeContext, THEMES, THEME_PREFERENCE};

#[component]
pub fn StatusPage() -> impl IntoView {
    let theme_ctx = expect_context::<ThemeContext>();
    let notices = expect_context::<NoticeContext>();

    let (checking, set_checking) = signal(false);
    let (status, set_status) = signal::<Option<ServiceStatus>>(None);
    let (error, set_error) = signal::<Option<String>>(None);
    let (theme_status, set_theme_status) = signal::<Option<String>>(None);

    let do_check = move || {
        set_checking.set(true);
        set_error.set(None);
        spawn_local(async move {
            match commands::check_service().await {
                Ok(s) => set_status.set(Some(s)),
                Err(e) => set_error.set(Some(format!("Status check failed: {}", e))),
            }
            set_checking.set(false);
            notices.refresh();
        });
    };

    // Auto-run on mount
    Effect::new(move |_| {
        do_check();
    });

    let on_theme_change = move |ev: leptos::ev::Event| {
        let value = event_target_value(&ev);
        theme_ctx.set_theme.set(value.clone());
        spawn_local(async move {
            if let Err(e) = commands::set_preference(THEME_PREFERENCE, &value).await {
                set_theme_status.set(Some(format!("Failed to save: {}", e)));
            }
        });
    };

    view! {
        <div class="page status-page">
            <h2>"Status"</h2>
            <p class="page-description">
                "MediPredict works offline. When an online prediction service is configured, "
                "predictions and history are kept there while it is reachable."
            </p>

            <button class="btn btn-primary" on:click=move |_| do_check() disabled=move || checking.get()>
                {move || if checking.get() { "Checking..." } else { "Check Service" }}
            </button>

            {move || error.get().map(|e| view! { <p class="status-text status-error">{e}</p> })}

            {move || status.get().map(|s| {
                let (service_status, service_detail) = match (s.configured, s.available) {
                    (false, _) => (CheckStatus::Unknown, "Not configured, using local predictions".to_string()),
                    (true, available) => (
                        CheckStatus::from_bool(available),
                        s.base_url.clone().unwrap_or_default(),
                    ),
                };
                let checked = s
                    .checked_at
                    .as_deref()
                    .map(local_datetime)
                    .unwrap_or_else(|| "Never".to_string());

                view! {
                    <div class="status-results">
                        <StatusBadge label="Prediction service" status=service_status detail=service_detail />
                        <StatusBadge label="Local engine" status=CheckStatus::Pass detail="Always available" />
                        <p class="status-detail">{format!("Last checked: {}", checked)}</p>
                        {s.last_error.map(|e| view! { <p class="status-text status-error">{e}</p> })}
                    </div>
                }
            })}

            <section class="settings-section">
                <h3>"Appearance"</h3>
                <div class="form-group">
                    <label for="theme">"Theme"</label>
                    <select
                        id="theme"
                        class="input"
                        prop:value=move || theme_ctx.theme.get()
                        on:change=on_theme_change
                    >
                        {THEMES.iter().map(|(value, label)| view! {
                            <option value=*value>{*label}</option>
                        }).collect::<Vec<_>>()}
                    </select>
                    {move || theme_status.get().map(|s| view! { <span class="status-text">{s}</span> })}
                </div>
            </section>
        </div>
    }
}
