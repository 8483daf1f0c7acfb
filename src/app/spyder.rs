//! The assembled walker: six legs on two PWM chips.
//!
//! [`Spyder`] owns both chip ports and all six legs.  Each leg is bound
//! to a chip and a channel block through the wiring table in the
//! configuration; the assembly hands the right chip to the leg on every
//! command.
//!
//! ```text
//!            ┌──────────── Spyder ────────────┐
//!  chip 0 ◀──│ leg 0 · leg 1 · leg 2          │
//!  chip 1 ◀──│ leg 3 · leg 4 · leg 5          │
//!            │ anchor + i·60° azimuth → body  │
//!            └────────────────────────────────┘
//! ```

use log::info;
use nalgebra::Vector3;

use crate::config::SpyderConfig;
use crate::error::{Error, Result};
use crate::joint::{Angle, JointCalibration};
use crate::kinematics;
use crate::leg::{Leg, Pose};
use crate::wiring::{CHIP_COUNT, LEG_COUNT, LEG_SERVO_COUNT, LEG_SPACING_DEG};

use super::ports::PwmPort;

// ───────────────────────────────────────────────────────────────
// Spyder
// ───────────────────────────────────────────────────────────────

pub struct Spyder<P: PwmPort> {
    chips: [P; CHIP_COUNT],
    legs: [Leg; LEG_COUNT],
    /// Body-to-leg-root offset, shared by every leg before azimuthal placement.
    anchor: Vector3<f32>,
}

impl<P: PwmPort> Spyder<P> {
    /// Validate `config`, set every chip to the control frequency, and
    /// build the six legs from the configured geometry, wiring, and
    /// calibration.
    pub fn new(mut chips: [P; CHIP_COUNT], config: &SpyderConfig) -> Result<Self> {
        config.validate()?;

        for chip in &mut chips {
            chip.set_pwm_frequency(config.pwm_freq_hz)?;
        }

        let legs: [Leg; LEG_COUNT] = core::array::from_fn(|i| {
            let leg_cfg = &config.legs[i];
            Leg::new(i as u8, leg_cfg.slot, leg_cfg.segment_vectors())
                .with_calibration(leg_cfg.calibration)
        });

        info!(
            "Spyder assembled: {} legs on {} chips at {} Hz",
            LEG_COUNT, CHIP_COUNT, config.pwm_freq_hz
        );

        Ok(Self {
            chips,
            legs,
            anchor: Vector3::from(config.anchor),
        })
    }

    // ── Legs ──────────────────────────────────────────────────

    pub fn leg(&self, leg_id: u8) -> Result<&Leg> {
        self.legs.get(leg_id as usize).ok_or(Error::InvalidLeg(leg_id))
    }

    pub fn legs(&self) -> &[Leg; LEG_COUNT] {
        &self.legs
    }

    /// Chip port by index, for inspection.
    pub fn chip(&self, index: usize) -> Option<&P> {
        self.chips.get(index)
    }

    pub fn anchor(&self) -> Vector3<f32> {
        self.anchor
    }

    pub fn set_leg_angle(&mut self, leg_id: u8, servo_id: u8, angle: Angle) -> Result<()> {
        let (leg, chip) = self.leg_and_chip(leg_id)?;
        leg.set_angle(chip, servo_id, angle)
    }

    pub fn set_leg_angles(&mut self, leg_id: u8, angles: [Angle; LEG_SERVO_COUNT]) -> Result<()> {
        let (leg, chip) = self.leg_and_chip(leg_id)?;
        leg.set_angles(chip, angles)
    }

    pub fn set_calibration(&mut self, leg_id: u8, servo_id: u8, calibration: JointCalibration) -> Result<()> {
        self.legs
            .get_mut(leg_id as usize)
            .ok_or(Error::InvalidLeg(leg_id))?
            .set_calibration(servo_id, calibration)
    }

    // ── Forward kinematics ────────────────────────────────────

    /// Tip of leg `leg_id` in the body frame.
    pub fn endpoint_of(&self, leg_id: u8) -> Result<Vector3<f32>> {
        let leg = self.leg(leg_id)?;
        Ok(kinematics::to_body_frame(
            &leg.endpoint(),
            &self.anchor,
            azimuth_of(leg_id),
        ))
    }

    /// Body-frame tips of all six legs, in leg order.
    pub fn endpoints(&self) -> [Vector3<f32>; LEG_COUNT] {
        core::array::from_fn(|i| {
            kinematics::to_body_frame(&self.legs[i].endpoint(), &self.anchor, azimuth_of(i as u8))
        })
    }

    // ── Positions ─────────────────────────────────────────────

    /// Move every leg, in leg order, to `pose`.  Stops at the first leg
    /// that fails; earlier legs stay where they were moved.
    pub fn goto_position(&mut self, pose: Pose) -> Result<()> {
        info!("Spyder: goto {:?}", pose);
        for leg in &mut self.legs {
            let chip = &mut self.chips[leg.slot().chip];
            leg.goto_position(chip, pose)?;
        }
        Ok(())
    }

    pub fn goto_default_position(&mut self) -> Result<()> {
        self.goto_position(Pose::Default)
    }

    // ── Internal ──────────────────────────────────────────────

    fn leg_and_chip(&mut self, leg_id: u8) -> Result<(&mut Leg, &mut P)> {
        let leg = self
            .legs
            .get_mut(leg_id as usize)
            .ok_or(Error::InvalidLeg(leg_id))?;
        let chip = &mut self.chips[leg.slot().chip];
        Ok((leg, chip))
    }
}

/// Mounting angle of leg `leg_id` around the body's vertical axis.
pub fn azimuth_of(leg_id: u8) -> Angle {
    f32::from(leg_id) * LEG_SPACING_DEG
}
