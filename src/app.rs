use leptos::prelude::*;
use leptos_router::components::*;
use leptos_router::path;
use wasm_bindgen_futures::spawn_local;

use crate::commands::{self, User};
use crate::components::sidebar::Sidebar;
use crate::pages::history::HistoryPage;
use crate::pages::home::HomePage;
use crate::pages::login::LoginPage;
use crate::pages::prediction::PredictionPage;
use crate::pages::status::StatusPage;
use crate::theme::{apply_theme, ThemeContext, THEME_PREFERENCE};

/// Signed-in user shared by every page.
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub user: ReadSignal<Option<User>>,
    pub set_user: WriteSignal<Option<User>>,
}

/// Pending message from the backend (service unavailable, history reset).
#[derive(Clone, Copy)]
pub struct NoticeContext {
    pub notice: ReadSignal<Option<String>>,
    pub set_notice: WriteSignal<Option<String>>,
}

impl NoticeContext {
    /// Pull the next queued notice, if any, into the banner.
    pub fn refresh(&self) {
        let set_notice = self.set_notice;
        spawn_local(async move {
            if let Ok(Some(notice)) = commands::take_service_notice().await {
                set_notice.set(Some(notice));
            }
        });
    }
}

#[component]
pub fn App() -> impl IntoView {
    let (theme, set_theme) = signal(String::from("system"));
    provide_context(ThemeContext { theme, set_theme });

    let (user, set_user) = signal::<Option<User>>(None);
    provide_context(AuthContext { user, set_user });

    let (notice, set_notice) = signal::<Option<String>>(None);
    let notices = NoticeContext { notice, set_notice };
    provide_context(notices);

    // Restore theme and signed-in user, then show any startup notice
    Effect::new(move |_| {
        spawn_local(async move {
            if let Ok(Some(saved)) = commands::get_preference(THEME_PREFERENCE).await {
                set_theme.set(saved);
            }
            if let Ok(current) = commands::current_user().await {
                set_user.set(current);
            }
        });
        notices.refresh();
    });

    Effect::new(move |_| {
        let t = theme.get();
        apply_theme(&t);
    });

    view! {
        <Router>
            <div class="app-layout">
                <Sidebar />
                <main class="content">
                    <Show when=move || notice.get().is_some()>
                        <div class="notice-banner">
                            <span>{move || notice.get().unwrap_or_default()}</span>
                            <button
                                class="btn btn-small btn-secondary"
                                on:click=move |_| {
                                    set_notice.set(None);
                                    notices.refresh();
                                }
                            >
                                "Dismiss"
                            </button>
                        </div>
                    </Show>
                    <Routes fallback=|| view! { <p>"Page not found"</p> }>
                        <Route path=path!("/") view=HomePage />
                        <Route path=path!("/predict") view=PredictionPage />
                        <Route path=path!("/history") view=HistoryPage />
                        <Route path=path!("/login") view=LoginPage />
                        <Route path=path!("/status") view=StatusPage />
                    </Routes>
                </main>
            </div>
        </Router>
    }
}
