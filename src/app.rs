//! App Root Component
//!
//! Main application component with routing and global providers.

use leptos::*;
use leptos_router::*;

use crate::api::ApiClient;
use crate::components::Toast;
use crate::pages::Dashboard;
use crate::state::global::{provide_global_state, GlobalState};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    // Provide global state and the one API client to all components
    provide_global_state();
    provide_context(ApiClient::new());

    view! {
        <Router>
            <div class="min-h-screen bg-gray-900 text-white flex flex-col">
                // Brand header
                <header class="bg-gray-800 border-b border-gray-700">
                    <div class="container mx-auto px-4">
                        <div class="flex items-center h-16 space-x-3">
                            <span class="text-2xl">"🩸"</span>
                            <span class="text-xl font-bold text-white">"SenseView"</span>
                        </div>
                    </div>
                </header>

                // Main content area
                <main class="flex-1 container mx-auto px-4 py-8 pb-24">
                    <Routes>
                        <Route path="/" view=Dashboard />
                        <Route path="/*any" view=NotFound />
                    </Routes>
                </main>

                // Footer with sensor status
                <Footer />

                // Toast notifications
                <Toast />
            </div>
        </Router>
    }
}

/// Footer showing transmitter connectivity and the newest reading time
#[component]
fn Footer() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let state_for_status = state.clone();
    let state_for_updated = state.clone();
    let state_for_loading = state;

    view! {
        <footer class="fixed bottom-0 left-0 right-0 bg-gray-800 border-t border-gray-700 py-3 px-4">
            <div class="container mx-auto flex items-center justify-between text-sm">
                // Transmitter status
                <div class="flex items-center space-x-2">
                    {move || {
                        if !state_for_status.phase.get().is_active() {
                            view! {
                                <span class="text-gray-500">"Not connected"</span>
                            }.into_view()
                        } else if state_for_status.transmitter_connected.get() {
                            view! {
                                <span class="flex items-center space-x-1 text-green-400">
                                    <span class="w-2 h-2 bg-green-400 rounded-full pulse" />
                                    <span>"Transmitter connected"</span>
                                </span>
                            }.into_view()
                        } else {
                            view! {
                                <span class="flex items-center space-x-1 text-red-400">
                                    <span class="w-2 h-2 bg-red-400 rounded-full" />
                                    <span>"Transmitter disconnected"</span>
                                </span>
                            }.into_view()
                        }
                    }}
                </div>

                // Newest reading time
                <div class="text-gray-400">
                    {move || {
                        state_for_updated.last_updated.get()
                            .and_then(chrono::DateTime::from_timestamp_millis)
                            .map(|dt| format!("Last reading: {}", dt.format("%H:%M:%S")))
                            .unwrap_or_else(|| "No readings yet".to_string())
                    }}
                </div>

                // Loading indicator
                {move || {
                    if state_for_loading.loading.get() {
                        view! {
                            <div class="flex items-center space-x-2 text-primary-400">
                                <div class="loading-spinner w-4 h-4" />
                                <span>"Loading..."</span>
                            </div>
                        }.into_view()
                    } else {
                        view! {}.into_view()
                    }
                }}
            </div>
        </footer>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <div class="text-6xl mb-4">"🔍"</div>
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="text-gray-400 mb-6">"The page you're looking for doesn't exist."</p>
            <A
                href="/"
                class="px-6 py-3 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors"
            >
                "Go to Dashboard"
            </A>
        </div>
    }
}
