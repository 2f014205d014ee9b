use std::net::SocketAddr;
use std::sync::{atomic::Ordering, Arc};
use std::time::Duration;

use anyhow::{anyhow, Result};
use glam::Quat;
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, watch};
use tokio::time;
use tracing::{debug, info, warn};

use helm_core::{
    map_to_actuators, scale_motors, ControlFrame, DriveSticks, RelativeAngles, StickAxes,
    ZeroReference,
};
use vrover_vr::{ControllerState, Pose, TrackingCallbacks};

use crate::input::spawn_gamepad_thread;
use crate::types::{ClientConfig, LinkRuntimeStats, TrackingEvent};

struct ClientTrackingCallbacks {
    tx: mpsc::Sender<TrackingEvent>,
}

impl TrackingCallbacks for ClientTrackingCallbacks {
    fn on_head_pose(&self, pose: Pose, timestamp_us: u64) {
        let _ = self.tx.try_send(TrackingEvent::HeadPose(pose, timestamp_us));
    }

    fn on_controller_state(&self, state: ControllerState, timestamp_us: u64) {
        let _ = self
            .tx
            .try_send(TrackingEvent::Controllers(state, timestamp_us));
    }
}

fn orientation_quat(pose: &Pose) -> Quat {
    Quat::from_xyzw(
        pose.orientation[0],
        pose.orientation[1],
        pose.orientation[2],
        pose.orientation[3],
    )
}

fn drive_sticks(state: &ControllerState) -> DriveSticks {
    DriveSticks {
        left: StickAxes {
            x: state.left.joystick.x,
            y: state.left.joystick.y,
        },
        right: StickAxes {
            x: state.right.joystick.x,
            y: state.right.joystick.y,
        },
    }
}

/// One control tick: refresh the zero reference, extract relative angles,
/// map to actuators. Returns `None` when the tick must be skipped (a
/// malformed pose sample never reaches the wire).
fn build_frame(
    zero: &mut ZeroReference,
    head: Option<Quat>,
    controllers: &ControllerState,
    recenter_held: &mut bool,
    speed_multiplier: f32,
    stats: &LinkRuntimeStats,
) -> Option<ControlFrame> {
    // Rising edge on the right primary button recenters the session
    // reference.
    let recenter_pressed = controllers.right.buttons.primary;
    let recenter = recenter_pressed && !*recenter_held;
    *recenter_held = recenter_pressed;

    let angles = match head {
        Some(current) => {
            if !zero.is_captured() || recenter {
                match zero.capture(current) {
                    Ok(()) => {
                        if recenter {
                            stats.recenters.fetch_add(1, Ordering::Relaxed);
                        }
                        info!("zero pose captured");
                    }
                    Err(err) => {
                        // The relative() path below counts the drop.
                        warn!("rejecting zero candidate: {}", err);
                    }
                }
            }
            match zero.relative(current) {
                Ok(Some(angles)) => angles,
                Ok(None) => RelativeAngles::default(),
                Err(err) => {
                    stats.dropped_pose_samples.fetch_add(1, Ordering::Relaxed);
                    warn!("dropping pose sample: {}", err);
                    return None;
                }
            }
        }
        // No tracking yet: hold the servos at neutral, motors stay live.
        None => RelativeAngles::default(),
    };

    let frame = map_to_actuators(angles, drive_sticks(controllers));
    Some(scale_motors(frame, speed_multiplier))
}

async fn send_frames(
    socket: UdpSocket,
    target: SocketAddr,
    mut frame_rx: watch::Receiver<Option<ControlFrame>>,
    stats: Arc<LinkRuntimeStats>,
) {
    while frame_rx.changed().await.is_ok() {
        let frame = *frame_rx.borrow_and_update();
        let Some(frame) = frame else { continue };
        let payload = frame.encode();
        match socket.send_to(&payload, target).await {
            Ok(_) => {
                stats.frames_sent.fetch_add(1, Ordering::Relaxed);
                debug!("sent frame: tilt {} pan {}", frame.tilt, frame.pan);
            }
            Err(err) => {
                // Fire and forget: the next tick supersedes this frame.
                stats.send_failures.fetch_add(1, Ordering::Relaxed);
                warn!("control-link send failed: {}", err);
            }
        }
    }
}

pub async fn run_client(config: ClientConfig) -> Result<()> {
    config.validate()?;

    let stats = config
        .runtime_stats
        .clone()
        .unwrap_or_else(|| Arc::new(LinkRuntimeStats::default()));

    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    info!("control link -> {}", config.target);

    // Latest-frame-wins handoff to the sender task; a stale frame is
    // superseded, never queued.
    let (frame_tx, frame_rx) = watch::channel::<Option<ControlFrame>>(None);
    let sender = tokio::spawn(send_frames(socket, config.target, frame_rx, stats.clone()));

    let (event_tx, mut event_rx) = mpsc::channel::<TrackingEvent>(128);

    if config.gamepad_enabled {
        spawn_gamepad_thread(event_tx.clone(), config.gamepad_deadzone)?;
    }

    if let Some(source) = config.tracking.as_ref() {
        let callbacks = Arc::new(ClientTrackingCallbacks {
            tx: event_tx.clone(),
        });
        let mut guard = source
            .lock()
            .map_err(|_| anyhow!("tracking source lock poisoned"))?;
        guard.start(callbacks)?;
    }

    let tick = Duration::from_micros(1_000_000 / config.tick_hz as u64);
    let mut ticker = time::interval(tick);
    let mut shutdown = Box::pin(tokio::signal::ctrl_c());

    let mut zero = ZeroReference::new();
    let mut head: Option<Quat> = None;
    let mut controllers = ControllerState::default();
    let mut recenter_held = false;

    info!("control loop at {} Hz", config.tick_hz);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown => {
                info!("shutting down");
                break;
            }
        }

        // Drain to the freshest snapshots; an intermediate sample is stale
        // the moment a newer one exists.
        while let Ok(event) = event_rx.try_recv() {
            match event {
                TrackingEvent::HeadPose(pose, _) => head = Some(orientation_quat(&pose)),
                TrackingEvent::Controllers(state, _) => controllers = state,
            }
        }

        let frame = match build_frame(
            &mut zero,
            head,
            &controllers,
            &mut recenter_held,
            config.speed_multiplier,
            &stats,
        ) {
            Some(frame) => frame,
            None => continue,
        };

        if frame_tx.send(Some(frame)).is_err() {
            warn!("sender task gone, stopping");
            break;
        }
    }

    if let Some(source) = config.tracking.as_ref() {
        if let Ok(mut guard) = source.lock() {
            guard.stop();
        }
    }
    drop(frame_tx);
    let _ = sender.await;

    info!(
        "session stats: {} frames sent, {} send failures, {} dropped pose samples",
        stats.frames_sent.load(Ordering::Relaxed),
        stats.send_failures.load(Ordering::Relaxed),
        stats.dropped_pose_samples.load(Ordering::Relaxed),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neutral() -> (ZeroReference, LinkRuntimeStats) {
        (ZeroReference::new(), LinkRuntimeStats::default())
    }

    #[test]
    fn no_tracking_holds_servos_at_neutral() {
        let (mut zero, stats) = neutral();
        let mut held = false;
        let mut controllers = ControllerState::default();
        controllers.left.joystick.y = -0.5;
        controllers.right.joystick.y = 0.25;

        let frame = build_frame(&mut zero, None, &controllers, &mut held, 1.0, &stats).unwrap();
        assert_eq!(frame.pan, 90);
        assert_eq!(frame.tilt, 0);
        assert_eq!(frame.left.magnitude, 500);
        assert!(!frame.left.forward);
        assert_eq!(frame.right.magnitude, 250);
        assert!(frame.right.forward);
    }

    #[test]
    fn first_valid_sample_becomes_the_zero_pose() {
        let (mut zero, stats) = neutral();
        let mut held = false;
        let controllers = ControllerState::default();
        let start = Quat::from_rotation_y(0.5);

        let frame = build_frame(
            &mut zero,
            Some(start),
            &controllers,
            &mut held,
            1.0,
            &stats,
        )
        .unwrap();
        assert!(zero.is_captured());
        // The capture tick itself reads as neutral.
        assert_eq!(frame.pan, 90);

        // A turn right past the pan stop from the captured reference.
        let turned = Quat::from_rotation_y(0.5 - 2.0);
        let frame = build_frame(
            &mut zero,
            Some(turned),
            &controllers,
            &mut held,
            1.0,
            &stats,
        )
        .unwrap();
        assert_eq!(frame.pan, 180);
        assert_eq!(frame.tilt, 0);
    }

    #[test]
    fn malformed_sample_skips_the_tick() {
        let (mut zero, stats) = neutral();
        let mut held = false;
        let controllers = ControllerState::default();
        zero.capture(Quat::IDENTITY).unwrap();

        let bad = Quat::from_xyzw(f32::NAN, 0.0, 0.0, 1.0);
        let frame = build_frame(&mut zero, Some(bad), &controllers, &mut held, 1.0, &stats);
        assert!(frame.is_none());
        assert_eq!(stats.dropped_pose_samples.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn recenter_button_recaptures_on_the_rising_edge() {
        let (mut zero, stats) = neutral();
        let mut held = false;
        let mut controllers = ControllerState::default();

        build_frame(
            &mut zero,
            Some(Quat::IDENTITY),
            &controllers,
            &mut held,
            1.0,
            &stats,
        )
        .unwrap();

        // Head turned; button held across two ticks recenters only once.
        controllers.right.buttons.primary = true;
        let turned = Quat::from_rotation_y(0.4);
        let frame = build_frame(
            &mut zero,
            Some(turned),
            &controllers,
            &mut held,
            1.0,
            &stats,
        )
        .unwrap();
        assert_eq!(frame.pan, 90);
        assert_eq!(stats.recenters.load(Ordering::Relaxed), 1);

        let frame = build_frame(
            &mut zero,
            Some(turned),
            &controllers,
            &mut held,
            1.0,
            &stats,
        )
        .unwrap();
        assert_eq!(frame.pan, 90);
        assert_eq!(stats.recenters.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn speed_multiplier_reaches_the_frame() {
        let (mut zero, stats) = neutral();
        let mut held = false;
        let mut controllers = ControllerState::default();
        controllers.left.joystick.y = 0.5;

        let frame = build_frame(&mut zero, None, &controllers, &mut held, 4.0, &stats).unwrap();
        assert_eq!(frame.left.magnitude, 2000);
    }
}
