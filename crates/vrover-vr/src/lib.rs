#![forbid(unsafe_code)]

pub mod adapter;
pub mod types;

pub use adapter::{TrackingCallbacks, TrackingSource};
pub use types::{ControllerState, Handedness, JoystickAxes, Pose, RemoteButtons, TrackedRemote};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VrError {
    #[error("tracking source unavailable: {0}")]
    Unavailable(String),
    #[error("tracking source error: {0}")]
    Source(String),
}

pub type VrResult<T> = Result<T, VrError>;
