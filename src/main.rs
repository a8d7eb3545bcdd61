//! SenseView Dashboard
//!
//! CGM companion dashboard built with Leptos (WASM).
//!
//! # Features
//!
//! - Password-grant login against the Eversense DMS cloud API, with
//!   optional remember-me persistence and silent token refresh
//! - 24-hour glucose history with a once-a-minute live poll
//! - Threshold-zoned time-series chart (low / good / high)
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles
//! to WebAssembly and talks to the vendor API directly over HTTP. Served
//! from localhost it runs against generated data instead.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
