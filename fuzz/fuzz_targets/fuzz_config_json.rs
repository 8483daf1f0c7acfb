//! Fuzz target: `SpyderConfig::from_json`
//!
//! Feeds arbitrary bytes to the config loader.  Anything it accepts must
//! be safe to build an assembly from.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - An accepted config has every leg on a real chip and block
//! - An accepted config re-validates after a serialise/parse round trip
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use libfuzzer_sys::fuzz_target;
use spyder::config::SpyderConfig;
use spyder::wiring::{CHIP_BLOCKS, CHIP_COUNT};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = SpyderConfig::from_json(text) else {
        return;
    };

    for leg in &config.legs {
        assert!(leg.slot.chip < CHIP_COUNT);
        assert!(leg.slot.block < CHIP_BLOCKS);
    }

    let json = serde_json::to_string(&config).unwrap();
    assert!(SpyderConfig::from_json(&json).is_ok());
});
