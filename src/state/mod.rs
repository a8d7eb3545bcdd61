//! State Management
//!
//! Global application state, the bounded reading window, and the poll loop.

pub mod global;
pub mod poller;
pub mod window;

pub use global::{provide_global_state, GlobalState, Phase, Reading, Trend, Zone};
pub use poller::PollController;
pub use window::ReadingWindow;
