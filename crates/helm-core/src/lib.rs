//! Core HELM control-link types, mapping, and framing.
//!
//! This crate provides:
//! - Relative head-orientation extraction against a session zero pose
//! - Mapping from head angles and joystick axes to servo/motor commands
//! - The ASCII wire frame sent to the robot once per tick
//!
//! Everything here is pure computation; the transport lives with the caller.

#![forbid(unsafe_code)]

pub mod mapper;
pub mod pose;

pub use mapper::{map_to_actuators, scale_motors, DriveSticks, StickAxes};
pub use pose::{relative_angles, PoseError, RelativeAngles, ZeroReference};

use bytes::Bytes;

/// Upper bound for either servo field, in degrees.
pub const SERVO_MAX_DEGREES: u16 = 180;
/// Upper bound for either motor magnitude field.
pub const MOTOR_MAX_MAGNITUDE: u16 = 9999;

/// Encoded frames are fixed-width:
/// `s0:000,s1:000,m0:0000,0,m1:0000,0\n`
pub const ENCODED_FRAME_LEN: usize = 34;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame too short: {0}")]
    TooShort(usize),
    #[error("frame is not ascii text")]
    NotAscii,
    #[error("missing newline terminator")]
    MissingTerminator,
    #[error("missing or mistagged field: {0}")]
    MissingField(&'static str),
    #[error("non-numeric digits in field: {0}")]
    BadDigits(&'static str),
    #[error("direction bit must be 0 or 1 for {0}")]
    BadDirection(&'static str),
    #[error("value out of range in field: {0}")]
    OutOfRange(&'static str),
    #[error("trailing data after frame")]
    TrailingData,
}

/// One drive motor command: magnitude plus a direction bit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotorCommand {
    /// 0..=9999 on the wire; larger values are clamped at encode time.
    pub magnitude: u16,
    /// Wire direction bit: 1 = forward, 0 = reverse.
    pub forward: bool,
}

impl MotorCommand {
    pub fn direction_bit(&self) -> u8 {
        if self.forward {
            1
        } else {
            0
        }
    }
}

/// The per-tick actuator instruction for the robot: two servo angles and
/// two motor commands. Constructed fresh every tick and serialized into a
/// single UDP datagram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlFrame {
    /// Tilt servo (`s0`), degrees 0..=180.
    pub tilt: u16,
    /// Pan servo (`s1`), degrees 0..=180.
    pub pan: u16,
    /// Left drive motor (`m0`).
    pub left: MotorCommand,
    /// Right drive motor (`m1`).
    pub right: MotorCommand,
}

impl ControlFrame {
    /// The all-zeros parked frame: servos at 0, motors stopped, both
    /// direction bits 0.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Serialize to the wire line, newline-terminated.
    ///
    /// The line format is a byte-for-byte contract with the robot-side
    /// receiver. Values are clamped to their declared field widths first,
    /// so a frame can never widen a field.
    pub fn encode(&self) -> Bytes {
        let tilt = self.tilt.min(SERVO_MAX_DEGREES);
        let pan = self.pan.min(SERVO_MAX_DEGREES);
        let left = self.left.magnitude.min(MOTOR_MAX_MAGNITUDE);
        let right = self.right.magnitude.min(MOTOR_MAX_MAGNITUDE);

        let line = format!(
            "s0:{:03},s1:{:03},m0:{:04},{:01},m1:{:04},{:01}\n",
            tilt,
            pan,
            left,
            self.left.direction_bit(),
            right,
            self.right.direction_bit(),
        );
        Bytes::from(line)
    }

    /// Parse a wire line back into a frame.
    ///
    /// Used by tests and by robot-side listeners; the sender never needs it.
    pub fn decode(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() < ENCODED_FRAME_LEN {
            return Err(FrameError::TooShort(bytes.len()));
        }
        let line = std::str::from_utf8(bytes).map_err(|_| FrameError::NotAscii)?;
        let line = line
            .strip_suffix('\n')
            .ok_or(FrameError::MissingTerminator)?;

        let mut fields = line.split(',');

        let tilt = tagged_value(fields.next(), "s0")?;
        let pan = tagged_value(fields.next(), "s1")?;
        let left_magnitude = tagged_value(fields.next(), "m0")?;
        let left_forward = direction_bit(fields.next(), "m0")?;
        let right_magnitude = tagged_value(fields.next(), "m1")?;
        let right_forward = direction_bit(fields.next(), "m1")?;

        if fields.next().is_some() {
            return Err(FrameError::TrailingData);
        }

        if tilt > SERVO_MAX_DEGREES {
            return Err(FrameError::OutOfRange("s0"));
        }
        if pan > SERVO_MAX_DEGREES {
            return Err(FrameError::OutOfRange("s1"));
        }
        if left_magnitude > MOTOR_MAX_MAGNITUDE {
            return Err(FrameError::OutOfRange("m0"));
        }
        if right_magnitude > MOTOR_MAX_MAGNITUDE {
            return Err(FrameError::OutOfRange("m1"));
        }

        Ok(Self {
            tilt,
            pan,
            left: MotorCommand {
                magnitude: left_magnitude,
                forward: left_forward,
            },
            right: MotorCommand {
                magnitude: right_magnitude,
                forward: right_forward,
            },
        })
    }
}

fn tagged_value(field: Option<&str>, tag: &'static str) -> Result<u16, FrameError> {
    let field = field.ok_or(FrameError::MissingField(tag))?;
    let digits = field
        .strip_prefix(tag)
        .and_then(|rest| rest.strip_prefix(':'))
        .ok_or(FrameError::MissingField(tag))?;
    digits.parse::<u16>().map_err(|_| FrameError::BadDigits(tag))
}

fn direction_bit(field: Option<&str>, tag: &'static str) -> Result<bool, FrameError> {
    match field {
        Some("1") => Ok(true),
        Some("0") => Ok(false),
        _ => Err(FrameError::BadDirection(tag)),
    }
}
