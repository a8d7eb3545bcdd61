//! Poll Controller
//!
//! Drives the fixed-interval refresh loop: exactly one latest-reading
//! fetch per tick, appended to the chart window. A failed tick raises the
//! error banner and polling continues; only teardown cancels the timer.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Interval;
use leptos::*;

use crate::api::{ApiClient, ApiError};
use crate::state::global::{GlobalState, Phase};
use crate::state::window::ReadingWindow;

/// Fixed refresh period
pub const POLL_INTERVAL_MS: u32 = 60_000;

/// Owns the repeating poll timer for one dashboard session
#[derive(Clone, Default)]
pub struct PollController {
    interval: Rc<RefCell<Option<Interval>>>,
    in_flight: Rc<Cell<bool>>,
}

impl PollController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `Running`: fetch the current user state and the 24-hour
    /// history, render them, and start the repeating timer. On failure the
    /// caller decides where the dashboard lands.
    pub async fn start(&self, state: GlobalState, client: ApiClient) -> Result<(), ApiError> {
        state.phase.set(Phase::Running);
        state.loading.set(true);

        let user = match client.fetch_user_state().await {
            Ok(user) => user,
            Err(e) => {
                state.loading.set(false);
                return Err(e);
            }
        };
        state.transmitter_connected.set(user.transmitter_connected);

        let history = match client.fetch_history().await {
            Ok(history) => history,
            Err(e) => {
                state.loading.set(false);
                return Err(e);
            }
        };

        web_sys::console::log_1(
            &format!("Loaded {} historical glucose readings", history.len()).into(),
        );

        let window = ReadingWindow::from_readings(history);
        state.last_updated.set(window.latest().map(|r| r.timestamp));
        state.readings.set(window);
        state.loading.set(false);

        let in_flight = Rc::clone(&self.in_flight);
        *self.interval.borrow_mut() = Some(Interval::new(POLL_INTERVAL_MS, move || {
            tick(state.clone(), client.clone(), Rc::clone(&in_flight));
        }));

        web_sys::console::log_1(&"Started periodic updates (every 60 seconds)".into());

        Ok(())
    }

    /// Cancel the repeating timer. An in-flight fetch is not cancelled;
    /// its result still lands on the signals after the fact.
    pub fn stop(&self) {
        if self.interval.borrow_mut().take().is_some() {
            web_sys::console::log_1(&"Stopped periodic updates".into());
        }
        self.in_flight.set(false);
    }
}

/// One poll tick. Ticks never overlap: if the previous fetch has not
/// resolved yet, this tick is skipped and the next one tries again.
fn tick(state: GlobalState, client: ApiClient, in_flight: Rc<Cell<bool>>) {
    if in_flight.get() {
        web_sys::console::warn_1(&"Previous poll still in flight, skipping tick".into());
        return;
    }
    in_flight.set(true);

    spawn_local(async move {
        match client.fetch_latest().await {
            Ok(Some(latest)) => {
                state.last_updated.set(Some(latest.reading.timestamp));
                state.transmitter_connected.set(latest.transmitter_connected);
                state.readings.update(|w| w.append(latest.reading));
            }
            Ok(None) => {
                web_sys::console::log_1(&"No current glucose reported this tick".into());
            }
            Err(e) => {
                web_sys::console::error_1(&format!("Poll tick failed: {}", e).into());
                state.show_tick_error(&format!("Failed to fetch latest glucose reading: {}", e));
            }
        }
        in_flight.set(false);
    });
}
