pub mod client;
pub mod input;
pub mod tracker;
pub mod types;

pub use client::run_client;
pub use input::{apply_gamepad_deadzone, normalize_gamepad_deadzone};
pub use tracker::SimTracker;
pub use types::{ClientConfig, LinkRuntimeStats, TrackingEvent};
