//! Dashboard Page
//!
//! Owns the session lifecycle for the page: restores a live session or
//! silently logs in from saved credentials, switches between the login
//! form and the chart, and tears the poll loop down on unmount.

use leptos::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::api::{storage, ApiClient};
use crate::components::{Chart, ChartSkeleton, LoginForm, StatusPanel};
use crate::state::global::{GlobalState, Phase};
use crate::state::poller::PollController;
use crate::state::window::ReadingWindow;

/// Dashboard page component
#[component]
pub fn Dashboard() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let client = use_context::<ApiClient>().expect("ApiClient not found");
    let poller = PollController::new();

    // Entering the running phase: one history fetch, then the repeating
    // timer. A start failure lands back on the login form with a banner.
    let start_session = {
        let state = state.clone();
        let client = client.clone();
        let poller = poller.clone();
        Callback::new(move |_: ()| {
            let state = state.clone();
            let client = client.clone();
            let poller = poller.clone();
            spawn_local(async move {
                if let Err(e) = poller.start(state.clone(), client).await {
                    web_sys::console::error_1(
                        &format!("Failed to start dashboard: {}", e).into(),
                    );
                    state.show_error(&format!("Failed to load glucose data: {}", e));
                    state.phase.set(Phase::Unauthenticated);
                }
            });
        })
    };

    // On load: resume a live session, else try a silent login from saved
    // credentials. Credentials that no longer work are cleared.
    {
        let state = state.clone();
        let client = client.clone();
        create_effect(move |_| {
            if client.is_authenticated() {
                start_session.call(());
                return;
            }

            match storage::load() {
                Some(saved) => {
                    web_sys::console::log_1(
                        &"Found saved credentials, attempting auto-login".into(),
                    );
                    state.phase.set(Phase::Authenticating);

                    let state = state.clone();
                    let client = client.clone();
                    spawn_local(async move {
                        match client
                            .authenticate(&saved.username, &saved.password, true)
                            .await
                        {
                            Ok(()) => start_session.call(()),
                            Err(e) => {
                                web_sys::console::log_1(
                                    &format!("Auto-login failed, showing login form: {}", e)
                                        .into(),
                                );
                                storage::clear();
                                state.phase.set(Phase::Unauthenticated);
                            }
                        }
                    });
                }
                None => state.phase.set(Phase::Unauthenticated),
            }
        });
    }

    // Explicit disconnect: stop polling and drop the session. Saved
    // credentials stay; forgetting them is the remember-me checkbox's job.
    let disconnect = {
        let state = state.clone();
        let client = client.clone();
        let poller = poller.clone();
        move |_| {
            poller.stop();
            client.logout();
            state.readings.set(ReadingWindow::new());
            state.last_updated.set(None);
            state.transmitter_connected.set(false);
            state.phase.set(Phase::Unauthenticated);
        }
    };

    // The browser unloads the page without unmounting the component, so
    // the same teardown also runs on beforeunload.
    {
        let poller = poller.clone();
        let client = client.clone();
        let on_unload = Closure::wrap(Box::new(move || {
            poller.stop();
            client.logout();
        }) as Box<dyn FnMut()>);
        if let Some(window) = web_sys::window() {
            let _ = window.add_event_listener_with_callback(
                "beforeunload",
                on_unload.as_ref().unchecked_ref(),
            );
        }
        on_unload.forget();
    }

    // Teardown on unmount: same as disconnect, without touching signals
    // that are about to be dropped with the page.
    {
        let poller = poller;
        let client = client;
        on_cleanup(move || {
            poller.stop();
            client.logout();
        });
    }

    let state_for_view = state.clone();
    let state_for_header = state;
    view! {
        <div class="space-y-8">
            // Page header
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold">"Glucose Dashboard"</h1>
                    <p class="text-gray-400 mt-1">"Live readings from your Eversense sensor"</p>
                </div>

                {move || {
                    if state_for_header.phase.get().is_active() {
                        let disconnect = disconnect.clone();
                        view! {
                            <button
                                on:click=disconnect
                                class="px-4 py-2 bg-gray-700 hover:bg-gray-600 rounded-lg
                                       text-sm font-medium transition-colors"
                            >
                                "Disconnect"
                            </button>
                        }
                        .into_view()
                    } else {
                        view! {}.into_view()
                    }
                }}
            </div>

            {move || {
                let phase = state_for_view.phase.get();
                if phase.is_active() {
                    let loading = state_for_view.loading;
                    view! {
                        <StatusPanel />

                        <section class="bg-gray-800 rounded-xl p-6">
                            <h2 class="text-xl font-semibold mb-4">"Last 24 Hours"</h2>
                            {move || {
                                if loading.get() {
                                    view! { <ChartSkeleton /> }.into_view()
                                } else {
                                    view! { <Chart /> }.into_view()
                                }
                            }}
                        </section>
                    }
                    .into_view()
                } else {
                    view! { <LoginForm on_authenticated=start_session /> }.into_view()
                }
            }}
        </div>
    }
}
