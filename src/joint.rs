//! Joint signal model.
//!
//! Maps a commanded joint angle plus its calibration to the PCA9685
//! off-tick that positions the servo.  Pure and deterministic; the leg
//! decides where the value is written.
//!
//! ```text
//!   commanded ──▶ invert? ──▶ + offset ──▶ bounds check ──▶ [103, 511]
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::error::{Error, Result};

/// Joint rotation in degrees.
pub type Angle = f32;

/// PCA9685 off-tick (pulse width in 1/4096 of the period).
pub type Signal = u16;

pub const SERVO_ANGLE_MIN: Angle = -90.0;
pub const SERVO_ANGLE_DEFAULT: Angle = 0.0;
pub const SERVO_ANGLE_MAX: Angle = 90.0;

pub const SERVO_SIG_MIN: f32 = 103.0;
pub const SERVO_SIG_DEFAULT: Signal = 307;
pub const SERVO_SIG_MAX: f32 = 511.0;

/// Per-joint calibration, set during an out-of-band calibration step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JointCalibration {
    /// Added to the (possibly inverted) commanded angle.
    pub offset: Angle,
    /// Servo is mounted mirrored; the commanded angle is negated first.
    pub inverted: bool,
}

impl JointCalibration {
    pub const fn new(offset: Angle, inverted: bool) -> Self {
        Self { offset, inverted }
    }

    /// Offsets must be finite and within the servo's travel.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if (SERVO_ANGLE_MIN..=SERVO_ANGLE_MAX).contains(&self.offset) {
            Ok(())
        } else {
            Err(ConfigError::ValidationFailed("calibration offset outside -90..=90"))
        }
    }

    /// Angle the servo is actually driven to for `commanded`.
    pub fn effective(&self, commanded: Angle) -> Angle {
        let angle = if self.inverted { -commanded } else { commanded };
        angle + self.offset
    }
}

/// Compute the signal for `commanded` on joint `servo_id`.
///
/// Fails with [`Error::OutOfRange`] when the effective angle leaves
/// [-90°, 90°]; the value is never clamped.  NaN is rejected the same way.
pub fn signal_for(servo_id: u8, commanded: Angle, calibration: &JointCalibration) -> Result<Signal> {
    let angle = calibration.effective(commanded);

    if !(SERVO_ANGLE_MIN..=SERVO_ANGLE_MAX).contains(&angle) {
        return Err(Error::OutOfRange {
            servo_id,
            angle,
            offset: calibration.offset,
        });
    }

    let span = (angle - SERVO_ANGLE_MIN) / (SERVO_ANGLE_MAX - SERVO_ANGLE_MIN);
    Ok((span * (SERVO_SIG_MAX - SERVO_SIG_MIN) + SERVO_SIG_MIN).round() as Signal)
}
