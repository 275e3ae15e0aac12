use leptos::prelude::*;

use crate::commands::Symptom;

/// Grid of toggleable symptom chips.
#[component]
pub fn SymptomPicker(
    symptoms: ReadSignal<Vec<Symptom>>,
    /// Ids currently selected
    selected: Signal<Vec<String>>,
    #[prop(into)] disabled: Signal<bool>,
    /// Called with `(id, now_selected)`
    on_toggle: Callback<(String, bool)>,
) -> impl IntoView {
    view! {
        <div class="symptom-grid">
            <For
                each=move || symptoms.get()
                key=|s| s.id.clone()
                children=move |symptom| {
                    let id = symptom.id.clone();
                    let is_selected = {
                        let id = id.clone();
                        move || selected.get().contains(&id)
                    };
                    let is_selected_click = is_selected.clone();
                    view! {
                        <button
                            class=move || if is_selected() { "symptom-chip selected" } else { "symptom-chip" }
                            disabled=move || disabled.get()
                            on:click=move |_| on_toggle.run((id.clone(), !is_selected_click()))
                        >
                            {symptom.label.clone()}
                        </button>
                    }
                }
            />
        </div>
    }
}
