//! Eversense API Client
//!
//! Stateful HTTP client over the vendor's login, user-state, and history
//! endpoints. Owns the session (bearer token, expiry, cached user id,
//! in-memory credentials) and re-authenticates silently when the token
//! lapses. All reads are idempotent; only `authenticate` mutates remote
//! state (it establishes the session and may persist credentials).

use std::cell::RefCell;
use std::rc::Rc;

use gloo_net::http::Request;
use serde::{Deserialize, Serialize};
use urlencoding::encode;

use crate::api::error::ApiError;
use crate::api::mock;
use crate::api::session::{now_ms, Credentials, Session, DEFAULT_TOKEN_LIFETIME_SECS};
use crate::api::storage;
use crate::state::global::{Reading, SymbolicTrend, Trend};

/// Token endpoint (OAuth2 password grant)
pub const LOGIN_URL: &str = "https://usiamapi.eversensedms.com/connect/token";

/// Following-patients endpoint: current glucose, trend code, transmitter state
pub const USER_STATE_URL: &str =
    "https://usapialpha.eversensedms.com/api/care/GetFollowingPatientList";

/// Sensor event history endpoint
pub const HISTORY_URL: &str =
    "https://usapialpha.eversensedms.com/api/care/GetFollowingUserSensorGlucose";

const CLIENT_ID: &str = "eversenseMMAAndroid";
const CLIENT_SECRET: &str = "6ksPx#]~wQ3U";

/// Sensor event type that carries a glucose value
pub(crate) const GLUCOSE_EVENT_TYPE: i64 = 1;

/// Hours of history requested when the dashboard starts
const HISTORY_HOURS: i64 = 24;

// ============ Wire Types ============

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_lifetime")]
    pub expires_in: i64,
}

fn default_token_lifetime() -> i64 {
    DEFAULT_TOKEN_LIFETIME_SECS
}

/// One entry of the following-patients response
#[derive(Debug, Clone, Deserialize)]
pub struct PatientRecord {
    #[serde(rename = "UserID")]
    pub user_id: String,
    #[serde(rename = "CurrentGlucose", default)]
    pub current_glucose: Option<f64>,
    #[serde(rename = "GlucoseTrend", default)]
    pub glucose_trend: Option<i64>,
    #[serde(rename = "IsTransmitterConnected", default)]
    pub is_transmitter_connected: bool,
}

/// One sensor event from the history endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorEvent {
    #[serde(rename = "EventTypeID")]
    pub event_type_id: i64,
    #[serde(rename = "Deleted")]
    pub deleted: bool,
    #[serde(rename = "EventDate")]
    pub event_date: String,
    #[serde(rename = "Value")]
    pub value: f64,
}

#[derive(Debug, Serialize)]
struct HistoryRequest {
    #[serde(rename = "UserID")]
    user_id: String,
    #[serde(rename = "startDate")]
    start_date: String,
    #[serde(rename = "endDate")]
    end_date: String,
}

/// Decoded current state of the followed user
#[derive(Debug, Clone, PartialEq)]
pub struct UserState {
    pub user_id: String,
    pub current_glucose: Option<i32>,
    pub trend: SymbolicTrend,
    pub transmitter_connected: bool,
}

/// A current reading plus the transmitter state it arrived with
#[derive(Debug, Clone, PartialEq)]
pub struct LatestReading {
    pub reading: Reading,
    pub transmitter_connected: bool,
}

// ============ Response Mapping ============

/// Decode the first following-patients record, mapping the numeric trend
/// code through the fixed table (unmapped codes read as `Unknown`).
pub fn user_state_from_records(records: &[PatientRecord]) -> Option<UserState> {
    let first = records.first()?;
    Some(UserState {
        user_id: first.user_id.clone(),
        current_glucose: first.current_glucose.map(|v| v.round() as i32),
        trend: first
            .glucose_trend
            .map(SymbolicTrend::from_code)
            .unwrap_or(SymbolicTrend::Unknown),
        transmitter_connected: first.is_transmitter_connected,
    })
}

/// Keep glucose events (type 1, not deleted, parseable date), map them to
/// readings, and sort ascending by timestamp. The sort is stable, so events
/// sharing a timestamp keep their source order. The history endpoint does
/// not report per-point trends; every reading comes back `Stable`.
pub fn readings_from_events(events: &[SensorEvent]) -> Vec<Reading> {
    let mut readings: Vec<Reading> = events
        .iter()
        .filter(|e| e.event_type_id == GLUCOSE_EVENT_TYPE && !e.deleted)
        .filter_map(|e| {
            Some(Reading {
                timestamp: parse_event_date(&e.event_date)?,
                value: e.value.round() as i32,
                trend: Trend::Stable,
            })
        })
        .collect();
    readings.sort_by_key(|r| r.timestamp);
    readings
}

/// The vendor usually sends RFC 3339 dates but has been seen omitting the
/// offset, in which case the instant is read as UTC.
fn parse_event_date(raw: &str) -> Option<i64> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Build the poll-tick reading from a user state. Absent (not an error)
/// when no current glucose is reported.
pub fn latest_from_state(state: &UserState, now_ms: i64) -> Option<LatestReading> {
    let value = state.current_glucose?;
    Some(LatestReading {
        reading: Reading {
            timestamp: now_ms,
            value,
            trend: state.trend.collapse(),
        },
        transmitter_connected: state.transmitter_connected,
    })
}

// ============ Client ============

/// Stateful client for the vendor API
#[derive(Clone, Default)]
pub struct ApiClient {
    session: Rc<RefCell<Session>>,
}

impl ApiClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while the session holds an unexpired token
    pub fn is_authenticated(&self) -> bool {
        self.session.borrow().is_valid(now_ms())
    }

    /// Exchange credentials for a bearer token. On success the token and
    /// credentials are held in memory; the credentials are persisted iff
    /// `remember`, and any previously persisted pair is cleared otherwise.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
        remember: bool,
    ) -> Result<(), ApiError> {
        self.session.borrow_mut().set_credentials(username, password);

        let token = if mock::is_dev_mode() {
            web_sys::console::log_1(&"Development mode: skipping credential exchange".into());
            mock::token_response()
        } else {
            let body = format!(
                "grant_type=password&client_id={}&client_secret={}&username={}&password={}",
                encode(CLIENT_ID),
                encode(CLIENT_SECRET),
                encode(username),
                encode(password)
            );

            let response = Request::post(LOGIN_URL)
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(body)
                .map_err(|e| ApiError::Auth(format!("Request build error: {}", e)))?
                .send()
                .await
                .map_err(|e| ApiError::Auth(format!("Network error: {}", e)))?;

            if !response.ok() {
                return Err(ApiError::Auth(format!(
                    "{} {}",
                    response.status(),
                    response.status_text()
                )));
            }

            response
                .json::<TokenResponse>()
                .await
                .map_err(|e| ApiError::Auth(format!("Parse error: {}", e)))?
        };

        web_sys::console::log_1(
            &format!(
                "Authentication successful, token expires in {} seconds",
                token.expires_in
            )
            .into(),
        );

        self.session
            .borrow_mut()
            .set_token(token.access_token, token.expires_in, now_ms());

        if remember {
            storage::save(username, password);
        } else {
            storage::clear();
        }

        Ok(())
    }

    /// No-op while the token is live. Otherwise re-authenticates from
    /// in-memory credentials, falling back to the credential store. A
    /// silent refresh re-persists the credentials it used.
    pub async fn ensure_valid(&self) -> Result<(), ApiError> {
        if self.session.borrow().is_valid(now_ms()) {
            return Ok(());
        }

        web_sys::console::log_1(&"Token expired or missing, re-login needed".into());

        let creds = self
            .session
            .borrow()
            .credentials()
            .cloned()
            .or_else(|| {
                storage::load().map(|c| Credentials {
                    username: c.username,
                    password: c.password,
                })
            })
            .ok_or(ApiError::NoCredentials)?;

        self.authenticate(&creds.username, &creds.password, true).await
    }

    /// Query the following-patients endpoint and cache the user id
    pub async fn fetch_user_state(&self) -> Result<UserState, ApiError> {
        self.ensure_valid().await?;

        let records: Vec<PatientRecord> = if mock::is_dev_mode() {
            mock::patient_records()
        } else {
            let token = self.bearer();

            let response = Request::get(USER_STATE_URL)
                .header("Authorization", &format!("Bearer {}", token))
                .header("Content-Type", "application/json")
                .send()
                .await
                .map_err(|e| ApiError::Fetch(format!("Network error: {}", e)))?;

            if !response.ok() {
                return Err(ApiError::Fetch(format!(
                    "Failed to fetch user details: {} {}",
                    response.status(),
                    response.status_text()
                )));
            }

            response
                .json()
                .await
                .map_err(|e| ApiError::Fetch(format!("Parse error: {}", e)))?
        };

        let state = user_state_from_records(&records)
            .ok_or_else(|| ApiError::Fetch("No followed patients in response".to_string()))?;

        self.session.borrow_mut().set_user_id(state.user_id.clone());

        Ok(state)
    }

    /// Fetch the prior 24 hours of glucose readings, ascending by time
    pub async fn fetch_history(&self) -> Result<Vec<Reading>, ApiError> {
        self.ensure_valid().await?;

        if self.session.borrow().user_id().is_none() {
            self.fetch_user_state().await?;
        }

        let events: Vec<SensorEvent> = if mock::is_dev_mode() {
            mock::sensor_events()
        } else {
            let token = self.bearer();
            let user_id = self
                .session
                .borrow()
                .user_id()
                .unwrap_or_default()
                .to_string();

            let end = chrono::Utc::now();
            let start = end - chrono::Duration::hours(HISTORY_HOURS);
            let request = HistoryRequest {
                user_id,
                start_date: start.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
                end_date: end.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            };

            let response = Request::post(HISTORY_URL)
                .header("Authorization", &format!("Bearer {}", token))
                .json(&request)
                .map_err(|e| ApiError::Fetch(format!("Request build error: {}", e)))?
                .send()
                .await
                .map_err(|e| ApiError::Fetch(format!("Network error: {}", e)))?;

            if !response.ok() {
                return Err(ApiError::Fetch(format!(
                    "Failed to fetch glucose history: {} {}",
                    response.status(),
                    response.status_text()
                )));
            }

            response
                .json()
                .await
                .map_err(|e| ApiError::Fetch(format!("Parse error: {}", e)))?
        };

        Ok(readings_from_events(&events))
    }

    /// Fetch the current reading, absent when the vendor reports none
    pub async fn fetch_latest(&self) -> Result<Option<LatestReading>, ApiError> {
        let state = self.fetch_user_state().await?;
        Ok(latest_from_state(&state, now_ms()))
    }

    /// Drop the in-memory session. Persisted credentials are left alone;
    /// clearing those is the credential store's own operation.
    pub fn logout(&self) {
        self.session.borrow_mut().clear();
        web_sys::console::log_1(&"Session cleared".into());
    }

    fn bearer(&self) -> String {
        self.session
            .borrow()
            .token()
            .unwrap_or_default()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HISTORY_FIXTURE: &str = r#"[
        {"EventTypeID": 1, "Deleted": false, "EventDate": "2024-03-01T08:10:00.000Z", "Value": 112.4},
        {"EventTypeID": 2, "Deleted": false, "EventDate": "2024-03-01T08:05:00.000Z", "Value": 3.0},
        {"EventTypeID": 1, "Deleted": true,  "EventDate": "2024-03-01T08:00:00.000Z", "Value": 140.0},
        {"EventTypeID": 1, "Deleted": false, "EventDate": "2024-03-01T07:50:00.000Z", "Value": 98.0},
        {"EventTypeID": 1, "Deleted": false, "EventDate": "not-a-date", "Value": 120.0}
    ]"#;

    #[test]
    fn test_history_filter_and_sort() {
        let events: Vec<SensorEvent> = serde_json::from_str(HISTORY_FIXTURE).unwrap();
        let readings = readings_from_events(&events);

        assert_eq!(readings.len(), 2);
        assert!(readings[0].timestamp < readings[1].timestamp);
        assert_eq!(readings[0].value, 98);
        assert_eq!(readings[1].value, 112);
        assert!(readings.iter().all(|r| r.trend == Trend::Stable));
    }

    #[test]
    fn test_history_filter_is_idempotent() {
        let events: Vec<SensorEvent> = serde_json::from_str(HISTORY_FIXTURE).unwrap();
        let readings = readings_from_events(&events);

        let reencoded: Vec<SensorEvent> = readings
            .iter()
            .map(|r| SensorEvent {
                event_type_id: GLUCOSE_EVENT_TYPE,
                deleted: false,
                event_date: chrono::DateTime::from_timestamp_millis(r.timestamp)
                    .unwrap()
                    .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
                value: r.value as f64,
            })
            .collect();

        assert_eq!(readings_from_events(&reencoded), readings);
    }

    #[test]
    fn test_equal_timestamps_keep_source_order() {
        let make = |value: f64| SensorEvent {
            event_type_id: GLUCOSE_EVENT_TYPE,
            deleted: false,
            event_date: "2024-03-01T08:00:00.000Z".to_string(),
            value,
        };
        let readings = readings_from_events(&[make(101.0), make(102.0), make(103.0)]);
        let values: Vec<i32> = readings.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![101, 102, 103]);
    }

    #[test]
    fn test_event_date_without_offset_reads_as_utc() {
        assert_eq!(
            parse_event_date("2024-03-01T08:10:00"),
            parse_event_date("2024-03-01T08:10:00.000Z")
        );
        assert_eq!(parse_event_date("garbage"), None);
    }

    #[test]
    fn test_user_state_decoding() {
        let records: Vec<PatientRecord> = serde_json::from_str(
            r#"[{"UserID": "u-1", "CurrentGlucose": 104.6, "GlucoseTrend": 6, "IsTransmitterConnected": true}]"#,
        )
        .unwrap();

        let state = user_state_from_records(&records).unwrap();
        assert_eq!(state.user_id, "u-1");
        assert_eq!(state.current_glucose, Some(105));
        assert_eq!(state.trend, SymbolicTrend::FallingRapid);
        assert!(state.transmitter_connected);
    }

    #[test]
    fn test_user_state_with_null_glucose() {
        let records: Vec<PatientRecord> = serde_json::from_str(
            r#"[{"UserID": "u-1", "CurrentGlucose": null, "GlucoseTrend": null, "IsTransmitterConnected": false}]"#,
        )
        .unwrap();

        let state = user_state_from_records(&records).unwrap();
        assert_eq!(state.current_glucose, None);
        assert_eq!(state.trend, SymbolicTrend::Unknown);

        // no current value is an absent reading, not an error
        assert_eq!(latest_from_state(&state, 1_000), None);
    }

    #[test]
    fn test_empty_patient_list() {
        assert!(user_state_from_records(&[]).is_none());
    }

    #[test]
    fn test_latest_reading_collapses_trend() {
        let state = UserState {
            user_id: "u-1".to_string(),
            current_glucose: Some(88),
            trend: SymbolicTrend::FallingRapid,
            transmitter_connected: true,
        };

        let latest = latest_from_state(&state, 42).unwrap();
        assert_eq!(latest.reading.timestamp, 42);
        assert_eq!(latest.reading.value, 88);
        assert_eq!(latest.reading.trend, Trend::Falling);
        assert!(latest.transmitter_connected);
    }

    #[test]
    fn test_token_response_defaults_lifetime() {
        let token: TokenResponse = serde_json::from_str(r#"{"access_token": "abc"}"#).unwrap();
        assert_eq!(token.expires_in, DEFAULT_TOKEN_LIFETIME_SECS);

        let token: TokenResponse =
            serde_json::from_str(r#"{"access_token": "abc", "expires_in": 600}"#).unwrap();
        assert_eq!(token.expires_in, 600);
    }
}
