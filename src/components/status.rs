//! Status Panel
//!
//! Current glucose value, zone label, trend arrow, and last-updated time.
//! Zone coloring uses the same categorization as the chart markers.

use leptos::*;

use crate::state::global::{categorize, GlobalState, Reading};

/// Status panel shown above the chart while the dashboard is running
#[component]
pub fn StatusPanel() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let state_for_latest = state.clone();
    let latest = create_memo(move |_| state_for_latest.latest_reading());

    let state_for_time = state;
    let last_updated = move || {
        state_for_time
            .last_updated
            .get()
            .and_then(chrono::DateTime::from_timestamp_millis)
            .map(|dt| dt.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "—".to_string())
    };

    view! {
        <section class="grid grid-cols-2 md:grid-cols-4 gap-4">
            <StatusCard label="Current Glucose">
                {move || match latest.get() {
                    Some(Reading { value, .. }) => {
                        let zone = categorize(value);
                        view! {
                            <span
                                class=format!("text-3xl font-bold {}", zone.css_class())
                                style=format!("color: {}", zone.color())
                            >
                                {format!("{} mg/dL", value)}
                            </span>
                        }
                        .into_view()
                    }
                    None => view! { <span class="text-3xl font-bold text-gray-500">"—"</span> }
                        .into_view(),
                }}
            </StatusCard>

            <StatusCard label="Status">
                {move || match latest.get() {
                    Some(Reading { value, .. }) => {
                        let zone = categorize(value);
                        view! {
                            <span
                                class="text-xl font-semibold"
                                style=format!("color: {}", zone.color())
                            >
                                {zone.label()}
                            </span>
                        }
                        .into_view()
                    }
                    None => view! { <span class="text-xl text-gray-500">"—"</span> }.into_view(),
                }}
            </StatusCard>

            <StatusCard label="Trend">
                {move || match latest.get() {
                    Some(reading) => view! {
                        <span class="text-xl font-semibold">
                            {format!("{} {}", reading.trend.arrow(), reading.trend.label())}
                        </span>
                    }
                    .into_view(),
                    None => view! { <span class="text-xl text-gray-500">"—"</span> }.into_view(),
                }}
            </StatusCard>

            <StatusCard label="Last Updated">
                <span class="text-xl font-semibold">{last_updated}</span>
            </StatusCard>
        </section>
    }
}

#[component]
fn StatusCard(label: &'static str, children: Children) -> impl IntoView {
    view! {
        <div class="bg-gray-800 rounded-lg p-4 border border-gray-700">
            <span class="text-gray-400 text-sm">{label}</span>
            <div class="mt-2">{children()}</div>
        </div>
    }
}
