//! Relative head-orientation extraction.
//!
//! All angles are measured against the session zero pose, never against the
//! previous frame, so drift cannot accumulate tick-to-tick.

use glam::{EulerRot, Quat};
use thiserror::Error;

/// Camera-relative yaw and pitch, in radians.
///
/// Sign convention, pinned by tests: positive `horizontal` is a head turn
/// to the right, positive `vertical` is a tilt up. The mapper's clamp
/// ranges assume exactly this convention.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RelativeAngles {
    pub horizontal: f32,
    pub vertical: f32,
}

const UNIT_NORM_TOLERANCE: f32 = 1e-3;

#[derive(Debug, Error, PartialEq)]
pub enum PoseError {
    #[error("orientation has a non-finite component")]
    NonFinite,
    #[error("orientation is not unit length (norm {0})")]
    NotNormalized(f32),
}

fn validate_unit(q: Quat) -> Result<(), PoseError> {
    if !q.is_finite() {
        return Err(PoseError::NonFinite);
    }
    let norm = q.length();
    if (norm - 1.0).abs() > UNIT_NORM_TOLERANCE {
        return Err(PoseError::NotNormalized(norm));
    }
    Ok(())
}

/// Relative yaw/pitch of `current` measured against `zero`.
///
/// Computes `current * zero.conjugate()` and extracts Euler angles with a
/// fixed YXZ convention. Both inputs must be unit quaternions; malformed
/// input fails fast instead of producing a garbage angle.
pub fn relative_angles(zero: Quat, current: Quat) -> Result<RelativeAngles, PoseError> {
    validate_unit(zero)?;
    validate_unit(current)?;

    let delta = current * zero.conjugate();
    let (yaw, pitch, _roll) = delta.to_euler(EulerRot::YXZ);

    // Yaw is left-positive in the runtime's right-handed Y-up frame; the
    // control link wants right-positive.
    Ok(RelativeAngles {
        horizontal: -yaw,
        vertical: pitch,
    })
}

/// The session zero orientation.
///
/// Captured once at the first valid tracking sample; `capture` overwrites,
/// which is the recenter operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroReference {
    zero: Option<Quat>,
}

impl ZeroReference {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_captured(&self) -> bool {
        self.zero.is_some()
    }

    /// Capture `orientation` as the session reference, replacing any
    /// previous one.
    pub fn capture(&mut self, orientation: Quat) -> Result<(), PoseError> {
        validate_unit(orientation)?;
        self.zero = Some(orientation);
        Ok(())
    }

    /// Relative angles of `current` against the captured reference, or
    /// `None` while nothing has been captured yet.
    pub fn relative(&self, current: Quat) -> Result<Option<RelativeAngles>, PoseError> {
        match self.zero {
            Some(zero) => relative_angles(zero, current).map(Some),
            None => {
                validate_unit(current)?;
                Ok(None)
            }
        }
    }
}
