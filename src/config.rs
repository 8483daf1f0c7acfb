//! System configuration parameters
//!
//! Geometry, wiring, and calibration for the Spyder.  The defaults match
//! the factory build; a JSON file can override any of it.

use core::fmt;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::joint::JointCalibration;
use crate::wiring::{
    CHIP_BLOCKS, CHIP_COUNT, DEFAULT_WIRING, I2C_ADDR_1, I2C_ADDR_2, I2C_DEVICE, LEG_COUNT,
    LEG_SERVO_COUNT, LegSlot, PWM_FREQ_HZ,
};

/// Lowest output frequency the PCA9685 prescaler can produce.
pub const MIN_PWM_FREQ_HZ: u32 = 24;
/// Highest output frequency the PCA9685 prescaler can produce.
pub const MAX_PWM_FREQ_HZ: u32 = 1526;

/// Default body anchor: leg roots sit 50 mm out along +Y.
pub const LEG_ANCHOR: f32 = 50.0;
/// Default segment lengths, coxa → femur → tibia.
pub const LEG_SEGMENT_LENGTHS: [f32; LEG_SERVO_COUNT] = [50.0, 80.0, 50.0];

/// Geometry, wiring and calibration of one leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegConfig {
    /// Rigid segment offsets in the leg's local frame.
    pub segments: [[f32; 3]; LEG_SERVO_COUNT],
    /// Chip and channel block the leg's servos are plugged into.
    pub slot: LegSlot,
    #[serde(default)]
    pub calibration: [JointCalibration; LEG_SERVO_COUNT],
}

impl LegConfig {
    pub fn segment_vectors(&self) -> [Vector3<f32>; LEG_SERVO_COUNT] {
        self.segments.map(Vector3::from)
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpyderConfig {
    // --- Bus ---
    /// I²C device both chips sit on
    pub i2c_device: String,
    /// 7-bit chip addresses, indexed by `LegSlot::chip`
    pub chip_addresses: [u8; CHIP_COUNT],
    /// Servo PWM frequency (Hz)
    pub pwm_freq_hz: u32,

    // --- Body ---
    /// Body-to-leg-root offset, before azimuthal placement
    pub anchor: [f32; 3],
    /// Per-leg geometry, wiring and calibration, indexed by leg id
    pub legs: [LegConfig; LEG_COUNT],
}

impl Default for SpyderConfig {
    fn default() -> Self {
        let [l1, l2, l3] = LEG_SEGMENT_LENGTHS;
        Self {
            // Bus
            i2c_device: I2C_DEVICE.to_owned(),
            chip_addresses: [I2C_ADDR_1, I2C_ADDR_2],
            pwm_freq_hz: PWM_FREQ_HZ,

            // Body
            anchor: [0.0, LEG_ANCHOR, 0.0],
            legs: DEFAULT_WIRING.map(|slot| LegConfig {
                segments: [[0.0, l1, 0.0], [0.0, l2, 0.0], [0.0, l3, 0.0]],
                slot,
                calibration: [JointCalibration::default(); LEG_SERVO_COUNT],
            }),
        }
    }
}

impl SpyderConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would mis-address hardware or drive a servo
    /// past its stops.  Nothing is clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PWM_FREQ_HZ..=MAX_PWM_FREQ_HZ).contains(&self.pwm_freq_hz) {
            return Err(ConfigError::ValidationFailed("pwm_freq_hz outside 24..=1526"));
        }

        if self.chip_addresses.iter().any(|&a| a > 0x7f) {
            return Err(ConfigError::ValidationFailed("chip address is not 7-bit"));
        }
        if self.chip_addresses[0] == self.chip_addresses[1] {
            return Err(ConfigError::ValidationFailed("chip addresses must differ"));
        }

        for (i, leg) in self.legs.iter().enumerate() {
            if leg.slot.chip >= CHIP_COUNT {
                return Err(ConfigError::ValidationFailed("leg slot chip out of range"));
            }
            if leg.slot.block >= CHIP_BLOCKS {
                return Err(ConfigError::ValidationFailed("leg slot block out of range"));
            }
            if self.legs[..i].iter().any(|other| other.slot == leg.slot) {
                return Err(ConfigError::ValidationFailed("two legs share a channel block"));
            }
            leg.calibration.iter().try_for_each(JointCalibration::validate)?;
            if leg.segments.iter().flatten().any(|v| !v.is_finite()) {
                return Err(ConfigError::ValidationFailed("segment vector is not finite"));
            }
        }

        if self.anchor.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::ValidationFailed("anchor is not finite"));
        }
        Ok(())
    }
}

/// Errors from loading or validating a [`SpyderConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The document is not valid JSON for this schema.
    Malformed,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "config malformed"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
