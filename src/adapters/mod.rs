//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter    | Implements | Connects to                  |
//! |------------|------------|------------------------------|
//! | `hardware` | PwmPort    | PCA9685 over a shared I²C bus|

pub mod hardware;
