//! A single leg of the Spyder.
//!
//! Owns three joint angles, their calibration, and the rigid segment
//! geometry.  The PWM chip the leg is wired to is passed in at each call,
//! so several legs can share one chip without shared ownership.
//!
//! ## Write ordering
//!
//! Every joint command is validated and converted to a signal first,
//! written to the chip second, and recorded in the stored angles last.
//! The stored state therefore never claims a pose that was not actually
//! sent to hardware.

use log::{debug, info, warn};
use nalgebra::Vector3;

use crate::app::ports::PwmPort;
use crate::error::{Error, Result};
use crate::joint::{signal_for, Angle, JointCalibration, Signal, SERVO_ANGLE_DEFAULT};
use crate::kinematics;
use crate::wiring::{LegSlot, LEG_SERVO_COUNT};

/// All three joints centred.
pub const DEFAULT_POSITION: [Angle; LEG_SERVO_COUNT] = [SERVO_ANGLE_DEFAULT; LEG_SERVO_COUNT];
/// Leg folded up under the body.
pub const NICKED_POSITION: [Angle; LEG_SERVO_COUNT] = [0.0, 45.0, -90.0];

/// Named joint configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    Default,
    Nicked,
}

impl Pose {
    pub const fn angles(self) -> [Angle; LEG_SERVO_COUNT] {
        match self {
            Self::Default => DEFAULT_POSITION,
            Self::Nicked => NICKED_POSITION,
        }
    }
}

pub struct Leg {
    id: u8,
    slot: LegSlot,
    segments: [Vector3<f32>; LEG_SERVO_COUNT],
    angles: [Angle; LEG_SERVO_COUNT],
    calibration: [JointCalibration; LEG_SERVO_COUNT],
}

impl Leg {
    pub fn new(id: u8, slot: LegSlot, segments: [Vector3<f32>; LEG_SERVO_COUNT]) -> Self {
        Self {
            id,
            slot,
            segments,
            angles: DEFAULT_POSITION,
            calibration: [JointCalibration::default(); LEG_SERVO_COUNT],
        }
    }

    /// Start from a stored calibration table instead of the neutral one.
    #[must_use]
    pub fn with_calibration(mut self, calibration: [JointCalibration; LEG_SERVO_COUNT]) -> Self {
        self.calibration = calibration;
        self
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn slot(&self) -> LegSlot {
        self.slot
    }

    pub fn segments(&self) -> &[Vector3<f32>; LEG_SERVO_COUNT] {
        &self.segments
    }

    // ── Angles ────────────────────────────────────────────────

    pub fn angles(&self) -> [Angle; LEG_SERVO_COUNT] {
        self.angles
    }

    pub fn angle_of(&self, servo_id: u8) -> Result<Angle> {
        Ok(self.angles[check_joint(servo_id)?])
    }

    /// Drive one joint.  Nothing is written if the joint id or the
    /// calibrated angle is invalid.
    pub fn set_angle(&mut self, pwm: &mut impl PwmPort, servo_id: u8, angle: Angle) -> Result<()> {
        let joint = check_joint(servo_id)?;
        let signal = self.signal(servo_id, angle)?;
        self.commit(pwm, joint, angle, signal)
    }

    /// Drive all three joints in order 0, 1, 2.
    ///
    /// All three angles are validated before the first write, so an
    /// out-of-range command leaves the leg untouched.  A transport
    /// failure on joint `k` stops the sequence: joints before `k` have
    /// already moved and are recorded as such.
    pub fn set_angles(&mut self, pwm: &mut impl PwmPort, angles: [Angle; LEG_SERVO_COUNT]) -> Result<()> {
        let mut signals: [Signal; LEG_SERVO_COUNT] = [0; LEG_SERVO_COUNT];
        for (joint, (&angle, signal)) in angles.iter().zip(signals.iter_mut()).enumerate() {
            *signal = self.signal(joint as u8, angle)?;
        }

        for (joint, (&angle, &signal)) in angles.iter().zip(signals.iter()).enumerate() {
            self.commit(pwm, joint, angle, signal)?;
        }
        Ok(())
    }

    // ── Calibration ───────────────────────────────────────────

    pub fn calibration_of(&self, servo_id: u8) -> Result<JointCalibration> {
        Ok(self.calibration[check_joint(servo_id)?])
    }

    /// Replace one joint's calibration.  Takes effect on the next write;
    /// the servo is not moved.  Offsets are held to the same bounds as
    /// a loaded config.
    pub fn set_calibration(&mut self, servo_id: u8, calibration: JointCalibration) -> Result<()> {
        let joint = check_joint(servo_id)?;
        calibration.validate().inspect_err(|e| {
            warn!("leg {}: servo {} calibration rejected: {}", self.id, servo_id, e);
        })?;
        info!(
            "leg {}: servo {} calibration offset={:.2} inverted={}",
            self.id, servo_id, calibration.offset, calibration.inverted
        );
        self.calibration[joint] = calibration;
        Ok(())
    }

    // ── Forward kinematics ────────────────────────────────────

    /// Tip position in the leg's local frame for the stored angles.
    pub fn endpoint(&self) -> Vector3<f32> {
        kinematics::chain_endpoint(&self.angles, &self.segments)
    }

    // ── Positions ─────────────────────────────────────────────

    pub fn goto_position(&mut self, pwm: &mut impl PwmPort, pose: Pose) -> Result<()> {
        debug!("leg {}: goto {:?}", self.id, pose);
        self.set_angles(pwm, pose.angles())
    }

    pub fn goto_default_position(&mut self, pwm: &mut impl PwmPort) -> Result<()> {
        self.goto_position(pwm, Pose::Default)
    }

    pub fn goto_nicked_position(&mut self, pwm: &mut impl PwmPort) -> Result<()> {
        self.goto_position(pwm, Pose::Nicked)
    }

    // ── Internal ──────────────────────────────────────────────

    fn signal(&self, servo_id: u8, angle: Angle) -> Result<Signal> {
        signal_for(servo_id, angle, &self.calibration[servo_id as usize]).inspect_err(|e| {
            warn!("leg {}: rejected command: {}", self.id, e);
        })
    }

    fn commit(&mut self, pwm: &mut impl PwmPort, joint: usize, angle: Angle, signal: Signal) -> Result<()> {
        let channel = self.slot.channel(joint as u8);
        debug!(
            "leg {}: servo {} -> {:.1} deg (ch {}, signal {})",
            self.id, joint, angle, channel, signal
        );
        pwm.set_pwm(channel, 0, signal)?;
        self.angles[joint] = angle;
        Ok(())
    }
}

fn check_joint(servo_id: u8) -> Result<usize> {
    let joint = servo_id as usize;
    if joint < LEG_SERVO_COUNT {
        Ok(joint)
    } else {
        Err(Error::InvalidJoint(servo_id))
    }
}
