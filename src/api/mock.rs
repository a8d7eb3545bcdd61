//! Development-mode fixtures
//!
//! When the dashboard is served from localhost the client skips the vendor
//! API and serves generated data, so the UI can be exercised without real
//! credentials or a CORS exception.

use crate::api::client::{PatientRecord, SensorEvent, TokenResponse, GLUCOSE_EVENT_TYPE};
use crate::api::session::DEFAULT_TOKEN_LIFETIME_SECS;

/// True when the page is served from a local host
pub fn is_dev_mode() -> bool {
    web_sys::window()
        .and_then(|w| w.location().hostname().ok())
        .map(|h| matches!(h.as_str(), "localhost" | "127.0.0.1" | "0.0.0.0"))
        .unwrap_or(false)
}

pub fn token_response() -> TokenResponse {
    TokenResponse {
        access_token: "dev_access_token".to_string(),
        expires_in: DEFAULT_TOKEN_LIFETIME_SECS,
    }
}

/// One followed patient with a plausible current value and a random trend
pub fn patient_records() -> Vec<PatientRecord> {
    vec![PatientRecord {
        user_id: "dev-user-1".to_string(),
        current_glucose: Some(85.0 + (js_sys::Math::random() * 60.0).floor()),
        glucose_trend: Some((js_sys::Math::random() * 8.0).floor() as i64),
        is_transmitter_connected: true,
    }]
}

/// A random walk over the last 24 hours at 5-minute spacing, clamped to a
/// realistic 70-200 mg/dL range
pub fn sensor_events() -> Vec<SensorEvent> {
    let now = chrono::Utc::now();
    let mut t = now - chrono::Duration::hours(24);
    let mut value = 95.0 + js_sys::Math::random() * 40.0;

    let mut events = Vec::new();
    while t < now {
        value = (value + (js_sys::Math::random() - 0.5) * 10.0).clamp(70.0, 200.0);
        events.push(SensorEvent {
            event_type_id: GLUCOSE_EVENT_TYPE,
            deleted: false,
            event_date: t.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            value: value.round(),
        });
        t += chrono::Duration::minutes(5);
    }
    events
}
