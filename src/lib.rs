//! Spyder hexapod controller library.
//!
//! Leg kinematics and calibration, the six-leg assembly, and the PCA9685
//! PWM chips behind a port trait.  Everything except the Linux bus
//! adapter builds and tests on any host.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod joint;
pub mod kinematics;
pub mod leg;
pub mod wiring;

pub mod adapters;

pub use app::ports::PwmPort;
pub use app::spyder::Spyder;
pub use config::SpyderConfig;
pub use error::{Error, Result, TransportError};
pub use leg::{Leg, Pose};
