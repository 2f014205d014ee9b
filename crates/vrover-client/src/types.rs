use std::net::SocketAddr;
use std::sync::{atomic::AtomicU64, Arc, Mutex};

use vrover_common::Error;
use vrover_vr::{ControllerState, Pose, TrackingSource};

#[derive(Clone)]
pub struct ClientConfig {
    /// Control-link destination, resolved once at session start.
    pub target: SocketAddr,
    /// Control loop rate; normally slaved to the headset refresh.
    pub tick_hz: u32,
    /// Motor speed multiplier applied after mapping.
    pub speed_multiplier: f32,
    pub gamepad_enabled: bool,
    pub gamepad_deadzone: f32,
    pub tracking: Option<Arc<Mutex<dyn TrackingSource>>>,
    pub runtime_stats: Option<Arc<LinkRuntimeStats>>,
}

impl ClientConfig {
    /// Validate the session knobs before the control loop starts.
    pub fn validate(&self) -> vrover_common::Result<()> {
        if self.tick_hz == 0 {
            return Err(Error::config("tick rate must be at least 1 Hz"));
        }
        if !self.speed_multiplier.is_finite() || self.speed_multiplier < 0.0 {
            return Err(Error::config(
                "speed multiplier must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct LinkRuntimeStats {
    pub frames_sent: AtomicU64,
    pub send_failures: AtomicU64,
    pub dropped_pose_samples: AtomicU64,
    pub recenters: AtomicU64,
}

/// Events flowing from the capture threads into the control loop.
pub enum TrackingEvent {
    HeadPose(Pose, u64),
    Controllers(ControllerState, u64),
}
