//! Global Application State
//!
//! Reactive state management using Leptos signals, plus the core glucose
//! domain types shared by the API client, the chart, and the status panel.

use leptos::*;

use crate::state::window::ReadingWindow;

/// Glucose value below which a reading is categorized low (mg/dL)
pub const LOW_THRESHOLD: i32 = 80;

/// Glucose value above which a reading is categorized high (mg/dL)
pub const HIGH_THRESHOLD: i32 = 130;

/// How long a poll-failure banner stays up before the dashboard returns to
/// its normal running display
pub const ERROR_DISPLAY_MS: u32 = 5_000;

/// A single glucose reading
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reading {
    /// Epoch milliseconds
    pub timestamp: i64,
    /// mg/dL
    pub value: i32,
    pub trend: Trend,
}

/// Qualitative direction of recent glucose change
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

impl Trend {
    pub fn arrow(self) -> &'static str {
        match self {
            Trend::Rising => "↗",
            Trend::Falling => "↘",
            Trend::Stable => "→",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Trend::Rising => "rising",
            Trend::Falling => "falling",
            Trend::Stable => "stable",
        }
    }
}

/// Trend states as the vendor reports them, decoded from the numeric
/// `GlucoseTrend` code (0-7). Codes outside the table decode to `Unknown`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolicTrend {
    Stale,
    FallingFast,
    Falling,
    Flat,
    Rising,
    RisingFast,
    FallingRapid,
    RisingRapid,
    Unknown,
}

impl SymbolicTrend {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => SymbolicTrend::Stale,
            1 => SymbolicTrend::FallingFast,
            2 => SymbolicTrend::Falling,
            3 => SymbolicTrend::Flat,
            4 => SymbolicTrend::Rising,
            5 => SymbolicTrend::RisingFast,
            6 => SymbolicTrend::FallingRapid,
            7 => SymbolicTrend::RisingRapid,
            _ => SymbolicTrend::Unknown,
        }
    }

    /// Collapse the eight vendor states into the three the UI shows.
    /// `Stale` and `Unknown` read as stable rather than alarming.
    pub fn collapse(self) -> Trend {
        match self {
            SymbolicTrend::FallingFast | SymbolicTrend::Falling | SymbolicTrend::FallingRapid => {
                Trend::Falling
            }
            SymbolicTrend::Rising | SymbolicTrend::RisingFast | SymbolicTrend::RisingRapid => {
                Trend::Rising
            }
            SymbolicTrend::Flat | SymbolicTrend::Stale | SymbolicTrend::Unknown => Trend::Stable,
        }
    }
}

/// Fixed value-range band used for both chart coloring and the status panel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Zone {
    Low,
    Good,
    High,
}

impl Zone {
    pub fn label(self) -> &'static str {
        match self {
            Zone::Low => "Too Low",
            Zone::Good => "Good",
            Zone::High => "Too High",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Zone::Low => "low",
            Zone::Good => "good",
            Zone::High => "high",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Zone::Low => "#f39c12",
            Zone::Good => "#27ae60",
            Zone::High => "#e74c3c",
        }
    }
}

/// Categorize a glucose value. Both band edges belong to the good zone:
/// 80 and 130 are good, 79 is low, 131 is high.
pub fn categorize(value: i32) -> Zone {
    if value < LOW_THRESHOLD {
        Zone::Low
    } else if value > HIGH_THRESHOLD {
        Zone::High
    } else {
        Zone::Good
    }
}

/// Dashboard lifecycle phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No live session; the login form is shown
    Unauthenticated,
    /// A credential exchange is in flight; form controls are disabled
    Authenticating,
    /// Polling and rendering
    Running,
    /// A poll tick failed; the banner is up but polling continues
    ErrorDisplayed,
}

impl Phase {
    /// True while the chart and status panel should be visible
    pub fn is_active(self) -> bool {
        matches!(self, Phase::Running | Phase::ErrorDisplayed)
    }
}

/// Global application state provided to all components
#[derive(Clone)]
pub struct GlobalState {
    pub phase: RwSignal<Phase>,
    /// Bounded window of readings backing the chart
    pub readings: RwSignal<ReadingWindow>,
    /// Timestamp of the newest reading shown (epoch ms)
    pub last_updated: RwSignal<Option<i64>>,
    /// Sensor transmitter connectivity as last reported by the vendor
    pub transmitter_connected: RwSignal<bool>,
    /// Global loading state (history fetch in progress)
    pub loading: RwSignal<bool>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        phase: create_rw_signal(Phase::Unauthenticated),
        readings: create_rw_signal(ReadingWindow::new()),
        last_updated: create_rw_signal(None),
        transmitter_connected: create_rw_signal(false),
        loading: create_rw_signal(false),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    };

    provide_context(state);
}

impl GlobalState {
    /// The newest reading in the window
    pub fn latest_reading(&self) -> Option<Reading> {
        self.readings.with(|w| w.latest().cloned())
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        })
        .forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(ERROR_DISPLAY_MS, move || {
            error_signal.set(None);
        })
        .forget();
    }

    /// Surface a failed poll tick: the dashboard drops into
    /// `ErrorDisplayed` for a fixed duration, then returns to `Running` on
    /// its own. The poll timer is not touched.
    pub fn show_tick_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        if self.phase.get_untracked() == Phase::Running {
            self.phase.set(Phase::ErrorDisplayed);
        }

        let phase = self.phase;
        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(ERROR_DISPLAY_MS, move || {
            error_signal.set(None);
            if phase.get_untracked() == Phase::ErrorDisplayed {
                phase.set(Phase::Running);
            }
        })
        .forget();
    }

    /// Clear error message
    pub fn clear_error(&self) {
        self.error.set(None);
        if self.phase.get_untracked() == Phase::ErrorDisplayed {
            self.phase.set(Phase::Running);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_boundaries() {
        assert_eq!(categorize(79), Zone::Low);
        assert_eq!(categorize(80), Zone::Good);
        assert_eq!(categorize(130), Zone::Good);
        assert_eq!(categorize(131), Zone::High);
    }

    #[test]
    fn test_categorize_extremes() {
        assert_eq!(categorize(0), Zone::Low);
        assert_eq!(categorize(400), Zone::High);
        assert_eq!(categorize(105), Zone::Good);
    }

    #[test]
    fn test_trend_code_table() {
        assert_eq!(SymbolicTrend::from_code(0), SymbolicTrend::Stale);
        assert_eq!(SymbolicTrend::from_code(3), SymbolicTrend::Flat);
        assert_eq!(SymbolicTrend::from_code(6), SymbolicTrend::FallingRapid);
        assert_eq!(SymbolicTrend::from_code(7), SymbolicTrend::RisingRapid);
        assert_eq!(SymbolicTrend::from_code(8), SymbolicTrend::Unknown);
        assert_eq!(SymbolicTrend::from_code(-1), SymbolicTrend::Unknown);
    }

    #[test]
    fn test_trend_collapse() {
        assert_eq!(SymbolicTrend::FallingRapid.collapse(), Trend::Falling);
        assert_eq!(SymbolicTrend::FallingFast.collapse(), Trend::Falling);
        assert_eq!(SymbolicTrend::RisingFast.collapse(), Trend::Rising);
        assert_eq!(SymbolicTrend::RisingRapid.collapse(), Trend::Rising);
        assert_eq!(SymbolicTrend::Flat.collapse(), Trend::Stable);
        assert_eq!(SymbolicTrend::Stale.collapse(), Trend::Stable);
        assert_eq!(SymbolicTrend::Unknown.collapse(), Trend::Stable);
    }

    #[test]
    fn test_falling_rapid_pipeline() {
        // numeric code 6 reported by the vendor reads as "falling" in the UI
        let trend = SymbolicTrend::from_code(6).collapse();
        assert_eq!(trend, Trend::Falling);
        assert_eq!(trend.arrow(), "↘");
    }

    #[test]
    fn test_phase_active() {
        assert!(Phase::Running.is_active());
        assert!(Phase::ErrorDisplayed.is_active());
        assert!(!Phase::Unauthenticated.is_active());
        assert!(!Phase::Authenticating.is_active());
    }
}
