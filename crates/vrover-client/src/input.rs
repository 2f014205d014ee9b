use std::thread;
use std::time::Duration;

use anyhow::Result;
use gilrs::{Axis, Button, Event, EventType as GilrsEventType, Gilrs};
use tokio::sync::mpsc;
use tracing::warn;

use vrover_common::now_us;
use vrover_vr::ControllerState;

use crate::types::TrackingEvent;

pub fn normalize_gamepad_deadzone(deadzone: f32) -> f32 {
    deadzone.clamp(0.0, 0.95)
}

pub fn apply_gamepad_deadzone(value: f32, deadzone: f32) -> f32 {
    let deadzone = normalize_gamepad_deadzone(deadzone);
    let abs = value.abs();
    if abs <= deadzone {
        0.0
    } else {
        let scaled = (abs - deadzone) / (1.0 - deadzone);
        scaled.copysign(value).clamp(-1.0, 1.0)
    }
}

/// Capture gamepad input on a dedicated thread and forward complete
/// controller snapshots into the control loop.
///
/// Stick Y axes drive the motors; the face buttons map to the tracked
/// remotes' digital buttons (South/East to the right hand, West/North to
/// the left).
pub fn spawn_gamepad_thread(tx: mpsc::Sender<TrackingEvent>, deadzone: f32) -> Result<()> {
    let deadzone = normalize_gamepad_deadzone(deadzone);
    thread::spawn(move || {
        let mut gilrs = match Gilrs::new() {
            Ok(g) => g,
            Err(e) => {
                warn!("gilrs init failed: {}", e);
                return;
            }
        };
        let mut state = ControllerState::default();
        loop {
            let mut dirty = false;
            while let Some(Event { event, .. }) = gilrs.next_event() {
                match event {
                    GilrsEventType::AxisChanged(axis, value, _) => {
                        let value = apply_gamepad_deadzone(value, deadzone);
                        dirty |= set_axis(&mut state, axis, value);
                    }
                    GilrsEventType::ButtonPressed(button, _) => {
                        dirty |= set_button(&mut state, button, true);
                    }
                    GilrsEventType::ButtonReleased(button, _) => {
                        dirty |= set_button(&mut state, button, false);
                    }
                    _ => {}
                }
            }
            if dirty
                && tx
                    .blocking_send(TrackingEvent::Controllers(state, now_us()))
                    .is_err()
            {
                return;
            }
            thread::sleep(Duration::from_millis(8));
        }
    });
    Ok(())
}

fn set_axis(state: &mut ControllerState, axis: Axis, value: f32) -> bool {
    match axis {
        Axis::LeftStickX => state.left.joystick.x = value,
        Axis::LeftStickY => state.left.joystick.y = value,
        Axis::RightStickX => state.right.joystick.x = value,
        Axis::RightStickY => state.right.joystick.y = value,
        _ => return false,
    }
    true
}

fn set_button(state: &mut ControllerState, button: Button, pressed: bool) -> bool {
    match button {
        Button::South => state.right.buttons.primary = pressed,
        Button::East => state.right.buttons.secondary = pressed,
        Button::West => state.left.buttons.primary = pressed,
        Button::North => state.left.buttons.secondary = pressed,
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadzone_zeroes_small_deflections() {
        assert_eq!(apply_gamepad_deadzone(0.05, 0.1), 0.0);
        assert_eq!(apply_gamepad_deadzone(-0.1, 0.1), 0.0);
    }

    #[test]
    fn deadzone_rescales_to_full_range() {
        assert!((apply_gamepad_deadzone(1.0, 0.1) - 1.0).abs() < 1e-6);
        assert!((apply_gamepad_deadzone(-1.0, 0.1) + 1.0).abs() < 1e-6);
        assert!((apply_gamepad_deadzone(0.55, 0.1) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn overshooting_axes_clamp() {
        assert_eq!(apply_gamepad_deadzone(1.8, 0.1), 1.0);
        assert_eq!(apply_gamepad_deadzone(-1.8, 0.1), -1.0);
    }

    #[test]
    fn deadzone_parameter_is_normalized() {
        assert_eq!(normalize_gamepad_deadzone(2.0), 0.95);
        assert_eq!(normalize_gamepad_deadzone(-1.0), 0.0);
    }

    #[test]
    fn stick_axes_map_to_hands() {
        let mut state = ControllerState::default();
        assert!(set_axis(&mut state, Axis::LeftStickY, 0.7));
        assert_eq!(state.left.joystick.y, 0.7);
        assert!(set_axis(&mut state, Axis::RightStickX, -0.2));
        assert_eq!(state.right.joystick.x, -0.2);
        assert!(!set_axis(&mut state, Axis::LeftZ, 0.7));
    }

    #[test]
    fn face_buttons_map_to_remote_buttons() {
        let mut state = ControllerState::default();
        assert!(set_button(&mut state, Button::South, true));
        assert!(state.right.buttons.primary);
        assert!(set_button(&mut state, Button::South, false));
        assert!(!state.right.buttons.primary);
        assert!(!set_button(&mut state, Button::Start, true));
    }
}
