//! Toast Notification Component
//!
//! Shows success and error messages. Error toasts are dismissible; both
//! kinds also clear themselves after their display duration.

use leptos::*;

use crate::state::global::GlobalState;

/// Toast notification container
#[component]
pub fn Toast() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let state_for_success = state.clone();
    let state_for_error = state.clone();
    let state_for_dismiss = state;

    view! {
        <div class="fixed bottom-20 right-4 z-50 space-y-2">
            // Success toast
            {move || {
                state_for_success.success.get().map(|msg| view! {
                    <ToastMessage message=msg variant=ToastVariant::Success />
                })
            }}

            // Error toast
            {move || {
                state_for_error.error.get().map(|msg| {
                    let dismiss = state_for_dismiss.clone();
                    view! {
                        <ToastMessage
                            message=msg
                            variant=ToastVariant::Error
                            on_dismiss=Callback::new(move |_| dismiss.clear_error())
                        />
                    }
                })
            }}
        </div>
    }
}

#[derive(Clone, Copy)]
enum ToastVariant {
    Success,
    Error,
}

#[component]
fn ToastMessage(
    #[prop(into)]
    message: String,
    variant: ToastVariant,
    #[prop(optional)]
    on_dismiss: Option<Callback<()>>,
) -> impl IntoView {
    let (icon, bg_class) = match variant {
        ToastVariant::Success => ("✓", "bg-green-600"),
        ToastVariant::Error => ("✕", "bg-red-600"),
    };

    view! {
        <div class=format!(
            "flex items-center space-x-3 {} text-white px-4 py-3 rounded-lg shadow-lg \
             transform transition-all duration-300 ease-out animate-slide-in",
            bg_class
        )>
            <span class="text-lg">{icon}</span>
            <span class="text-sm font-medium">{message}</span>
            {on_dismiss.map(|dismiss| view! {
                <button
                    class="ml-2 text-lg font-bold opacity-70 hover:opacity-100"
                    on:click=move |_| dismiss.call(())
                >
                    "×"
                </button>
            })}
        </div>
    }
}
