//! Tracking sources for bench runs.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use glam::{EulerRot, Quat};
use vrover_common::now_us;
use vrover_vr::{Pose, TrackingCallbacks, TrackingSource, VrResult};

const SAMPLE_INTERVAL: Duration = Duration::from_millis(20);

/// Scripted head sweep for driving the control link without a headset:
/// a slow pan left-to-right with a periodic downward tilt.
pub struct SimTracker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SimTracker {
    pub fn new() -> Self {
        Self {
            stop: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }
}

impl Default for SimTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackingSource for SimTracker {
    fn start(&mut self, cb: Arc<dyn TrackingCallbacks>) -> VrResult<()> {
        self.stop.store(false, Ordering::Relaxed);
        let stop = self.stop.clone();
        let handle = thread::spawn(move || {
            let mut t = 0.0f32;
            while !stop.load(Ordering::Relaxed) {
                let yaw = (t * 0.4).sin() * 0.9;
                let pitch = (t * 0.9).sin().min(0.0) * 0.4;
                let q = Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0);
                cb.on_head_pose(Pose::from_orientation(q.to_array()), now_us());
                t += SAMPLE_INTERVAL.as_secs_f32();
                thread::sleep(SAMPLE_INTERVAL);
            }
        });
        self.handle = Some(handle);
        Ok(())
    }

    fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use vrover_vr::ControllerState;

    #[derive(Default)]
    struct Capture {
        poses: Mutex<Vec<Pose>>,
    }

    impl TrackingCallbacks for Capture {
        fn on_head_pose(&self, pose: Pose, _timestamp_us: u64) {
            self.poses.lock().unwrap().push(pose);
        }

        fn on_controller_state(&self, _state: ControllerState, _timestamp_us: u64) {}
    }

    #[test]
    fn sim_tracker_emits_unit_orientations() {
        let capture = Arc::new(Capture::default());
        let mut tracker = SimTracker::new();
        tracker.start(capture.clone()).unwrap();
        thread::sleep(Duration::from_millis(80));
        tracker.stop();

        let poses = capture.poses.lock().unwrap();
        assert!(!poses.is_empty());
        for pose in poses.iter() {
            let [x, y, z, w] = pose.orientation;
            let norm = (x * x + y * y + z * z + w * w).sqrt();
            assert!((norm - 1.0).abs() < 1e-3);
        }
    }
}
