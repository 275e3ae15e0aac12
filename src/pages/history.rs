use leptos::prelude::*;

use crate::app::AuthContext;
use crate::components::history_panel::HistoryPanel;

#[component]
pub fn HistoryPage() -> impl IntoView {
    let auth = expect_context::<AuthContext>();

    view! {
        <div class="page history-page">
            <h2>"History"</h2>
            <p class="page-description">"Your past symptom checks, newest first."</p>
            {move || if auth.user.get().is_some() {
                view! { <HistoryPanel /> }.into_any()
            } else {
                view! {
                    <div class="card">
                        <p>"Sign in to see your prediction history."</p>
                        <a href="/login" class="btn btn-primary">"Sign In"</a>
                    </div>
                }.into_any()
            }}
        </div>
    }
}
