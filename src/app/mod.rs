//! Application core: the assembled walker and its hardware boundary.
//!
//! The [`spyder`] module composes six legs into the body frame.  All
//! interaction with PWM hardware happens through the port trait in
//! [`ports`], keeping this layer fully testable without real chips.

pub mod ports;
pub mod spyder;
