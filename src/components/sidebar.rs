use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::app::AuthContext;
use crate::commands;

#[component]
pub fn Sidebar() -> impl IntoView {
    let auth = expect_context::<AuthContext>();

    let sign_out = move |_| {
        spawn_local(async move {
            if commands::logout().await.is_ok() {
                auth.set_user.set(None);
            }
        });
    };

    view! {
        <nav class="sidebar">
            <div class="sidebar-header">
                <h1 class="sidebar-title">"MediPredict"</h1>
                <p class="sidebar-subtitle">"Symptom Checker"</p>
            </div>
            <ul class="nav-list">
                <li class="nav-item">
                    <a href="/" class="nav-link">"About"</a>
                </li>
                <li class="nav-item">
                    <a href="/predict" class="nav-link">"Check Symptoms"</a>
                </li>
                <li class="nav-item">
                    <a href="/history" class="nav-link">"History"</a>
                </li>
                <li class="nav-item">
                    <a href="/status" class="nav-link">"Status"</a>
                </li>
            </ul>
            <div class="sidebar-footer">
                {move || match auth.user.get() {
                    Some(user) => view! {
                        <div class="sidebar-user">
                            <span class="sidebar-user-name">{user.name}</span>
                            <button class="btn btn-small btn-secondary" on:click=sign_out>
                                "Sign out"
                            </button>
                        </div>
                    }.into_any(),
                    None => view! {
                        <a href="/login" class="btn btn-primary">"Sign in"</a>
                    }.into_any(),
                }}
            </div>
        </nav>
    }
}
