//! Loading Component
//!
//! Skeleton state shown while the glucose history loads.

use leptos::*;

/// Skeleton loader for the chart area
#[component]
pub fn ChartSkeleton() -> impl IntoView {
    view! {
        <div class="bg-gray-800 rounded-lg p-6 animate-pulse">
            <div class="h-6 bg-gray-700 rounded w-1/4 mb-4" />
            <div class="h-64 bg-gray-700 rounded" />
        </div>
    }
}
