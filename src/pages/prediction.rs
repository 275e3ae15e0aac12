use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::app::{AuthContext, NoticeContext};
use crate::commands::{self, Phase, SessionSnapshot, Symptom};
use crate::components::prediction_card::PredictionCard;
use crate::components::symptom_picker::SymptomPicker;

#[component]
pub fn PredictionPage() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let notices = expect_context::<NoticeContext>();

    let (symptoms, set_symptoms) = signal::<Vec<Symptom>>(Vec::new());
    let (session, set_session) = signal(SessionSnapshot::default());
    let (error, set_error) = signal::<Option<String>>(None);
    let (saved_note, set_saved_note) = signal::<Option<String>>(None);

    // Load catalog and any session left over from a previous visit
    Effect::new(move |_| {
        spawn_local(async move {
            match commands::list_symptoms().await {
                Ok(list) => set_symptoms.set(list),
                Err(e) => set_error.set(Some(format!("Failed to load symptoms: {}", e))),
            }
            if let Ok(snapshot) = commands::get_session().await {
                set_session.set(snapshot);
            }
        });
    });

    let analyzing = Signal::derive(move || session.get().phase == Phase::Analyzing);
    let selected = Signal::derive(move || session.get().selected);

    let on_toggle = Callback::new(move |(id, on): (String, bool)| {
        spawn_local(async move {
            match commands::toggle_symptom(&id, on).await {
                Ok(snapshot) => {
                    set_session.set(snapshot);
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    });

    let analyze = move |_| {
        set_error.set(None);
        set_saved_note.set(None);
        set_session.update(|s| s.phase = Phase::Analyzing);
        spawn_local(async move {
            match commands::start_prediction().await {
                Ok(outcome) => {
                    set_session.set(outcome.session);
                    if let Some(e) = outcome.history_error {
                        set_saved_note.set(Some(format!("Results could not be saved to history: {}", e)));
                    } else if outcome.backend == "remote" {
                        set_saved_note.set(Some("Saved to your online history.".to_string()));
                    }
                }
                Err(e) => {
                    set_error.set(Some(e));
                    if let Ok(snapshot) = commands::get_session().await {
                        set_session.set(snapshot);
                    }
                }
            }
            notices.refresh();
        });
    };

    let start_over = move |_| {
        set_saved_note.set(None);
        spawn_local(async move {
            if let Ok(snapshot) = commands::reset_session().await {
                set_session.set(snapshot);
            }
        });
    };

    view! {
        <div class="page prediction-page">
            <style>{include_str!("prediction.css")}</style>
            <h2>"Check Symptoms"</h2>

            {move || if auth.user.get().is_none() {
                view! {
                    <div class="card">
                        <p>"Sign in to check your symptoms and save the results."</p>
                        <a href="/login" class="btn btn-primary">"Sign In"</a>
                    </div>
                }.into_any()
            } else if session.get().phase == Phase::ShowingResults {
                let predictions = session.get().predictions;
                view! {
                    <div class="results">
                        <h3>"Possible Conditions"</h3>
                        {saved_note.get().map(|n| view! { <p class="status-text">{n}</p> })}
                        <div class="prediction-list">
                            {predictions.into_iter().map(|p| view! { <PredictionCard prediction=p /> }).collect::<Vec<_>>()}
                        </div>
                        <p class="disclaimer">
                            "These results are not a diagnosis. Consult a healthcare professional."
                        </p>
                        <button class="btn btn-primary" on:click=start_over>"New Prediction"</button>
                    </div>
                }.into_any()
            } else {
                view! {
                    <div class="selection">
                        <p class="page-description">"Select all symptoms you are experiencing."</p>
                        <SymptomPicker
                            symptoms=symptoms
                            selected=selected
                            disabled=analyzing
                            on_toggle=on_toggle
                        />
                        <div class="selection-footer">
                            <span class="selection-count">
                                {move || format!("{} selected", selected.get().len())}
                            </span>
                            <button
                                class="btn btn-primary"
                                on:click=analyze
                                disabled=move || analyzing.get() || selected.get().is_empty()
                            >
                                {move || if analyzing.get() { "Analyzing..." } else { "Analyze Symptoms" }}
                            </button>
                        </div>
                    </div>
                }.into_any()
            }}

            {move || error.get().map(|e| view! { <p class="status-text status-error">{e}</p> })}
        </div>
    }
}
