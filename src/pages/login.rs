use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use wasm_bindgen_futures::spawn_local;

use crate::app::{AuthContext, NoticeContext};
use crate::commands::{self, User};

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let notices = expect_context::<NoticeContext>();
    let navigate = use_navigate();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (submitting, set_submitting) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);

    let signed_in = move |user: User| {
        auth.set_user.set(Some(user));
        notices.refresh();
        navigate("/predict", Default::default());
    };
    let google_signed_in = signed_in.clone();

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let (email, password) = (email.get(), password.get());
        set_submitting.set(true);
        set_error.set(None);
        let signed_in = signed_in.clone();
        spawn_local(async move {
            match commands::login(&email, &password).await {
                Ok(user) => signed_in(user),
                Err(e) => set_error.set(Some(e)),
            }
            set_submitting.set(false);
        });
    };

    let google = move |_| {
        set_submitting.set(true);
        set_error.set(None);
        let signed_in = google_signed_in.clone();
        spawn_local(async move {
            match commands::login_with_google().await {
                Ok(user) => signed_in(user),
                Err(e) => set_error.set(Some(e)),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="page login-page">
            <h2>"Sign In"</h2>
            <p class="page-description">"Sign in to check symptoms and keep your history."</p>

            <form class="login-form" on:submit=submit>
                <div class="form-group">
                    <label for="email">"Email"</label>
                    <input
                        id="email"
                        type="email"
                        class="input"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                </div>
                <div class="form-group">
                    <label for="password">"Password"</label>
                    <input
                        id="password"
                        type="password"
                        class="input"
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                </div>

                {move || error.get().map(|e| view! { <p class="status-text status-error">{e}</p> })}

                <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>
                    {move || if submitting.get() { "Signing in..." } else { "Sign In" }}
                </button>
            </form>

            <div class="login-divider">"or"</div>
            <button class="btn btn-secondary" on:click=google disabled=move || submitting.get()>
                "Continue with Google"
            </button>
        </div>
    }
}
