//! Mapping from head angles and joystick axes to actuator commands.

use std::f32::consts::FRAC_PI_2;

use crate::pose::RelativeAngles;
use crate::{ControlFrame, MotorCommand, MOTOR_MAX_MAGNITUDE};

/// Full stick deflection commands this motor magnitude.
pub const MOTOR_SPEED_SCALE: f32 = 1000.0;

/// Joystick deflection for one hand, both axes nominally in [-1, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StickAxes {
    pub x: f32,
    pub y: f32,
}

/// Drive input for both hands. The motors follow the Y axes; X is carried
/// for symmetry with the tracked-remote layout.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DriveSticks {
    pub left: StickAxes,
    pub right: StickAxes,
}

/// Map relative head angles plus drive sticks to a control frame.
///
/// Pure and idempotent. In order:
/// 1. `vertical` clamps to [-pi/2, 0].
/// 2. `horizontal` clamps to [-pi/2, pi/2]; at either bound the tilt is
///    forced to neutral (hard pan stop interlock).
/// 3. Tilt servo degrees = |vertical / (pi/2) * 180|.
/// 4. Pan servo degrees = |(1 + horizontal / (pi/2)) * 90|.
/// 5. Motor magnitude = |y * 1000|, direction bit 1 iff y >= 0.
///
/// Axis values are clamped to [-1, 1] first; a non-finite axis reads as
/// zero deflection.
pub fn map_to_actuators(angles: RelativeAngles, sticks: DriveSticks) -> ControlFrame {
    let mut vertical = angles.vertical.clamp(-FRAC_PI_2, 0.0);
    let horizontal = angles.horizontal.clamp(-FRAC_PI_2, FRAC_PI_2);

    // Hard pan stop interlock: a full left or right turn parks the tilt
    // servo at neutral.
    if horizontal <= -FRAC_PI_2 || horizontal >= FRAC_PI_2 {
        vertical = 0.0;
    }

    let tilt = (vertical / FRAC_PI_2 * 180.0).abs() as u16;
    let pan = ((1.0 + horizontal / FRAC_PI_2) * 90.0).abs() as u16;

    ControlFrame {
        tilt,
        pan,
        left: motor_from_axis(sticks.left.y),
        right: motor_from_axis(sticks.right.y),
    }
}

fn motor_from_axis(axis: f32) -> MotorCommand {
    let axis = if axis.is_finite() {
        axis.clamp(-1.0, 1.0)
    } else {
        0.0
    };
    MotorCommand {
        magnitude: (axis * MOTOR_SPEED_SCALE).abs() as u16,
        forward: axis >= 0.0,
    }
}

/// Scale both motor magnitudes by the session speed multiplier, saturating
/// at the wire maximum. Servo fields pass through untouched.
pub fn scale_motors(frame: ControlFrame, multiplier: f32) -> ControlFrame {
    let multiplier = if multiplier.is_finite() {
        multiplier.max(0.0)
    } else {
        1.0
    };
    let scale = |motor: MotorCommand| MotorCommand {
        magnitude: (motor.magnitude as f32 * multiplier).min(MOTOR_MAX_MAGNITUDE as f32) as u16,
        forward: motor.forward,
    };
    ControlFrame {
        left: scale(frame.left),
        right: scale(frame.right),
        ..frame
    }
}
