//! Fuzz target: `joint::signal_for`
//!
//! Interprets the input as `(servo_id, commanded, offset, inverted)` and
//! checks that the signal model never panics and never returns a value
//! outside the servo's pulse range.
//!
//! Invariants checked:
//! - `Ok` only when the effective angle is within [-90, 90]
//! - every `Ok` signal lies in [103, 511]
//! - every `Err` is `OutOfRange` carrying the applied offset
//!
//! cargo fuzz run fuzz_signal

#![no_main]

use libfuzzer_sys::fuzz_target;
use spyder::error::Error;
use spyder::joint::{signal_for, JointCalibration};

fuzz_target!(|data: &[u8]| {
    if data.len() < 10 {
        return;
    }

    let servo_id = data[0] % 3;
    let commanded = f32::from_le_bytes(data[1..5].try_into().unwrap());
    let offset = f32::from_le_bytes(data[5..9].try_into().unwrap());
    let cal = JointCalibration::new(offset, data[9] & 1 == 1);

    let effective = cal.effective(commanded);
    match signal_for(servo_id, commanded, &cal) {
        Ok(signal) => {
            assert!((-90.0..=90.0).contains(&effective));
            assert!((103..=511).contains(&signal), "signal {signal} escaped range");
        }
        Err(Error::OutOfRange { servo_id: id, offset: off, .. }) => {
            assert_eq!(id, servo_id);
            assert!(off.to_bits() == offset.to_bits());
            assert!(!(-90.0..=90.0).contains(&effective));
        }
        Err(other) => panic!("unexpected error {other:?}"),
    }
});
