//! Unified error types for the Spyder controller.
//!
//! A single `Error` enum that every subsystem converts into, so the
//! leg, assembly, and driver layers all surface failures the same way.
//! All variants are `Copy` so they can be passed up through the assembly
//! without allocation.

use core::fmt;

use embedded_hal::i2c::ErrorKind;

use crate::config::ConfigError;
use crate::joint::Angle;

// ---------------------------------------------------------------------------
// Top-level controller error
// ---------------------------------------------------------------------------

/// Every fallible operation in the controller funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// The effective (calibrated) joint angle left [-90°, 90°].
    OutOfRange {
        servo_id: u8,
        /// Effective angle after inversion and offset.
        angle: Angle,
        /// Calibration offset that was applied.
        offset: Angle,
    },
    /// A joint index outside {0, 1, 2} was referenced.
    InvalidJoint(u8),
    /// A leg index outside 0..6 was referenced.
    InvalidLeg(u8),
    /// The PWM chip write did not complete.
    Transport(TransportError),
    /// Configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange {
                servo_id,
                angle,
                offset,
            } => write!(
                f,
                "servo {servo_id}: effective angle {angle:.2} out of range (offset {offset:.2})"
            ),
            Self::InvalidJoint(id) => write!(f, "invalid joint id {id}"),
            Self::InvalidLeg(id) => write!(f, "invalid leg id {id}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Failures reported by the PWM chip boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The I²C transaction with the chip at `address` failed.
    Bus { address: u8, kind: ErrorKind },
    /// Channel index above 15.
    InvalidChannel(u8),
    /// Tick value above the 12-bit counter range.
    InvalidTicks(u16),
    /// Frequency outside what the prescaler can produce.
    InvalidFrequency(u32),
    /// The driver refused the chip address.
    InvalidAddress(u8),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus { address, kind } => write!(f, "I2C 0x{address:02x}: {kind}"),
            Self::InvalidChannel(ch) => write!(f, "invalid PWM channel {ch}"),
            Self::InvalidTicks(t) => write!(f, "tick value {t} exceeds 4095"),
            Self::InvalidFrequency(hz) => write!(f, "unsupported PWM frequency {hz} Hz"),
            Self::InvalidAddress(addr) => write!(f, "invalid PCA9685 address 0x{addr:02x}"),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Controller-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
