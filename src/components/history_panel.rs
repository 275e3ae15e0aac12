//! History panel showing past predictions.
//!
//! Entries are listed newest first and expand to show the full prediction
//! list. Single entries can be deleted and the whole log cleared.

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::commands::{self, HistoryEntry};
use crate::components::prediction_card::PredictionCard;
use crate::format::{local_datetime, probability_class};

#[component]
pub fn HistoryPanel() -> impl IntoView {
    let (entries, set_entries) = signal::<Option<Vec<HistoryEntry>>>(None);
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal::<Option<String>>(None);
    let (expanded, set_expanded) = signal::<Option<String>>(None);
    let (confirm_clear, set_confirm_clear) = signal(false);

    let load = move || {
        set_loading.set(true);
        spawn_local(async move {
            match commands::list_history().await {
                Ok(list) => {
                    set_entries.set(Some(list));
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(e)),
            }
            set_loading.set(false);
        });
    };
    load();

    let delete_entry = move |id: String| {
        spawn_local(async move {
            match commands::delete_history_entry(&id).await {
                Ok(_) => {
                    set_entries.update(|list| {
                        if let Some(list) = list {
                            list.retain(|e| e.id != id);
                        }
                    });
                }
                Err(e) => set_error.set(Some(format!("Failed to delete entry: {}", e))),
            }
        });
    };

    let clear_all = move |_| {
        set_confirm_clear.set(false);
        spawn_local(async move {
            match commands::clear_history().await {
                Ok(()) => set_entries.set(Some(Vec::new())),
                Err(e) => set_error.set(Some(format!("Failed to clear history: {}", e))),
            }
        });
    };

    view! {
        <div class="history-panel">
            <style>{include_str!("history_panel.css")}</style>
            <div class="history-toolbar">
                <h3 class="history-title">"Prediction History"</h3>
                <Show when=move || entries.get().is_some_and(|l| !l.is_empty())>
                    {move || if confirm_clear.get() {
                        view! {
                            <span class="history-confirm">
                                "Delete all entries? "
                                <button class="btn btn-small btn-danger" on:click=clear_all>"Yes, clear"</button>
                                <button class="btn btn-small btn-secondary" on:click=move |_| set_confirm_clear.set(false)>"Cancel"</button>
                            </span>
                        }.into_any()
                    } else {
                        view! {
                            <button class="btn btn-small btn-secondary" on:click=move |_| set_confirm_clear.set(true)>
                                "Clear all"
                            </button>
                        }.into_any()
                    }}
                </Show>
            </div>

            {move || error.get().map(|e| view! { <p class="history-error">{e}</p> })}

            {move || {
                if loading.get() {
                    view! { <p class="history-loading">"Loading history..."</p> }.into_any()
                } else {
                    match entries.get() {
                        Some(list) if !list.is_empty() => view! {
                            <div class="history-list">
                                {list.into_iter().map(|entry| {
                                    let id = entry.id.clone();
                                    let id_toggle = id.clone();
                                    let id_delete = id.clone();
                                    let is_open = move || expanded.get().as_deref() == Some(id.as_str());
                                    let is_open_body = is_open.clone();
                                    let top = entry.predictions.first().cloned();
                                    let predictions = entry.predictions.clone();
                                    view! {
                                        <div class="history-item">
                                            <div
                                                class="history-item-header"
                                                on:click=move |_| {
                                                    let id = id_toggle.clone();
                                                    set_expanded.update(|open| {
                                                        *open = if open.as_deref() == Some(id.as_str()) { None } else { Some(id) };
                                                    });
                                                }
                                            >
                                                <div class="history-item-info">
                                                    <span class="history-date">{local_datetime(&entry.date)}</span>
                                                    <span class="history-symptoms">{entry.symptoms.join(", ")}</span>
                                                </div>
                                                {top.map(|p| view! {
                                                    <span class=format!("history-top {}", probability_class(p.probability))>
                                                        {format!("{} ({}%)", p.condition, p.probability)}
                                                    </span>
                                                })}
                                                <span class="history-chevron">{move || if is_open() { "\u{25B2}" } else { "\u{25BC}" }}</span>
                                            </div>
                                            <Show when=is_open_body.clone()>
                                                <div class="history-item-body">
                                                    {predictions.clone().into_iter().map(|p| view! { <PredictionCard prediction=p /> }).collect::<Vec<_>>()}
                                                    <button
                                                        class="btn btn-small btn-danger"
                                                        on:click={
                                                            let id = id_delete.clone();
                                                            move |_| delete_entry(id.clone())
                                                        }
                                                    >
                                                        "Delete"
                                                    </button>
                                                </div>
                                            </Show>
                                        </div>
                                    }
                                }).collect::<Vec<_>>()}
                            </div>
                        }.into_any(),
                        Some(_) => view! {
                            <p class="history-empty">"No predictions yet. Check your symptoms to get started."</p>
                        }.into_any(),
                        None => view! { <p class="history-empty">"No data"</p> }.into_any(),
                    }
                }
            }}
        </div>
    }
}
