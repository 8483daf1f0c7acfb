//! Port traits: the boundary between the leg model and PWM hardware.
//!
//! ```text
//!   Leg / Spyder ──▶ PwmPort ──▶ Pca9685 (I²C) | mock
//! ```
//!
//! The [`Spyder`](super::spyder::Spyder) owns one port per driver chip
//! and hands the right one to each leg at call sites, so the domain
//! never touches the bus directly.

use crate::error::TransportError;

// ───────────────────────────────────────────────────────────────
// PWM port (driven adapter: domain → PWM chip)
// ───────────────────────────────────────────────────────────────

/// One PWM driver chip as seen by the leg model.
///
/// Failures are returned unchanged; the caller decides on retry.
pub trait PwmPort {
    /// Configure the chip's output frequency for all channels.
    fn set_pwm_frequency(&mut self, hz: u32) -> Result<(), TransportError>;

    /// Write one channel's pulse timing.  `on` and `off` are ticks in
    /// the 12-bit period counter.
    fn set_pwm(&mut self, channel: u8, on: u16, off: u16) -> Result<(), TransportError>;
}
