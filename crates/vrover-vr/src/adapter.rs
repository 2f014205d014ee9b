use std::sync::Arc;

use crate::{
    types::{ControllerState, Pose},
    VrResult,
};

/// Callbacks delivered by a tracking source.
///
/// The source owns device enumeration and connect/disconnect bookkeeping;
/// consumers only ever see complete per-frame snapshots.
pub trait TrackingCallbacks: Send + Sync {
    // runtime -> Vrover
    fn on_head_pose(&self, pose: Pose, timestamp_us: u64);
    fn on_controller_state(&self, state: ControllerState, timestamp_us: u64);
}

/// A source of head poses and controller snapshots.
///
/// Implemented over the vendor VR runtime in production and by a simulated
/// tracker for bench runs.
pub trait TrackingSource: Send {
    fn start(&mut self, cb: Arc<dyn TrackingCallbacks>) -> VrResult<()>;
    fn stop(&mut self);
}
