//! UI Components
//!
//! Reusable Leptos components for the dashboard.

pub mod chart;
pub mod loading;
pub mod login;
pub mod status;
pub mod toast;

pub use chart::Chart;
pub use loading::ChartSkeleton;
pub use login::LoginForm;
pub use status::StatusPanel;
pub use toast::Toast;
