//! Login Form
//!
//! Credential form for the vendor account. Both fields are validated
//! locally before any network call; controls are disabled while the
//! exchange runs; entered values survive a failed attempt.

use leptos::*;

use crate::api::{storage, ApiClient};
use crate::state::global::{GlobalState, Phase};

/// Login form component. `on_authenticated` fires after a successful
/// credential exchange.
#[component]
pub fn LoginForm(#[prop(into)] on_authenticated: Callback<()>) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let client = use_context::<ApiClient>().expect("ApiClient not found");

    // Pre-populate from saved credentials so a remembered user only has
    // to press the button
    let saved = storage::load();
    let (username, set_username) = create_signal(
        saved.as_ref().map(|c| c.username.clone()).unwrap_or_default(),
    );
    let (password, set_password) = create_signal(
        saved.as_ref().map(|c| c.password.clone()).unwrap_or_default(),
    );
    let (remember, set_remember) = create_signal(saved.map(|c| c.remember).unwrap_or(false));
    let (field_error, set_field_error) = create_signal(None::<String>);

    let state_for_busy = state.clone();
    let busy = create_memo(move |_| state_for_busy.phase.get() == Phase::Authenticating);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let user = username.get().trim().to_string();
        let pass = password.get();

        if user.is_empty() || pass.is_empty() {
            set_field_error.set(Some("Please enter both email and password.".to_string()));
            return;
        }
        set_field_error.set(None);

        state.phase.set(Phase::Authenticating);

        let state = state.clone();
        let client = client.clone();
        spawn_local(async move {
            match client
                .authenticate(&user, &pass, remember.get_untracked())
                .await
            {
                Ok(()) => {
                    state.show_success("Connected");
                    on_authenticated.call(());
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("Login failed: {}", e).into());
                    state.phase.set(Phase::Unauthenticated);
                    state.show_error(&e.to_string());
                }
            }
        });
    };

    view! {
        <section class="bg-gray-800 rounded-xl p-6 max-w-md mx-auto">
            <h2 class="text-xl font-semibold mb-4">"Connect to Eversense"</h2>

            <form on:submit=on_submit class="space-y-4">
                <div>
                    <label class="block text-sm text-gray-400 mb-2">"Email"</label>
                    <input
                        type="email"
                        prop:value=move || username.get()
                        on:input=move |ev| set_username.set(event_target_value(&ev))
                        disabled=move || busy.get()
                        class="w-full bg-gray-700 rounded-lg px-4 py-3
                               border border-gray-600 focus:border-primary-500 focus:outline-none"
                    />
                </div>

                <div>
                    <label class="block text-sm text-gray-400 mb-2">"Password"</label>
                    <input
                        type="password"
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                        disabled=move || busy.get()
                        class="w-full bg-gray-700 rounded-lg px-4 py-3
                               border border-gray-600 focus:border-primary-500 focus:outline-none"
                    />
                </div>

                <label class="flex items-center space-x-2 text-sm text-gray-300">
                    <input
                        type="checkbox"
                        prop:checked=move || remember.get()
                        on:change=move |ev| set_remember.set(event_target_checked(&ev))
                        disabled=move || busy.get()
                    />
                    <span>"Remember me on this device"</span>
                </label>

                {move || {
                    field_error.get().map(|msg| view! {
                        <p class="text-sm text-red-400">{msg}</p>
                    })
                }}

                <button
                    type="submit"
                    disabled=move || busy.get()
                    class="w-full bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600
                           disabled:cursor-not-allowed rounded-lg py-3 font-semibold
                           transition-colors"
                >
                    {move || if busy.get() { "Connecting..." } else { "Connect" }}
                </button>
            </form>
        </section>
    }
}
