//! Bus and channel assignments for the Spyder main board.
//!
//! Single source of truth: the assembly and the binary reference this
//! module rather than hard-coding addresses or channel arithmetic.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Body layout
// ---------------------------------------------------------------------------

/// Number of legs on the body.
pub const LEG_COUNT: usize = 6;
/// Servos (joints) per leg.
pub const LEG_SERVO_COUNT: usize = 3;
/// Angle between two neighbouring leg roots around the vertical axis.
pub const LEG_SPACING_DEG: f32 = 360.0 / LEG_COUNT as f32;

// ---------------------------------------------------------------------------
// PCA9685 PWM chips
// ---------------------------------------------------------------------------

/// Number of PWM driver chips on the board.
pub const CHIP_COUNT: usize = 2;
/// Output channels per chip.
pub const CHIP_CHANNELS: u8 = 16;
/// Channels reserved per leg block.  Only three are driven; the fourth
/// is a spare.
pub const LEG_CHANNELS: u8 = 4;
/// Leg blocks that fit on one chip.
pub const CHIP_BLOCKS: u8 = CHIP_CHANNELS / LEG_CHANNELS;

/// I²C bus device shared by both chips.
pub const I2C_DEVICE: &str = "/dev/i2c-1";
/// 7-bit address of the chip driving legs 0–2.
pub const I2C_ADDR_1: u8 = 0x40;
/// 7-bit address of the chip driving legs 3–5.
pub const I2C_ADDR_2: u8 = 0x41;

/// Servo control frequency (standard hobby-servo 20 ms period).
pub const PWM_FREQ_HZ: u32 = 50;

// ---------------------------------------------------------------------------
// Leg → chip wiring
// ---------------------------------------------------------------------------

/// Where a leg's servos are plugged in: which chip, and which 4-channel
/// block on that chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegSlot {
    /// Index into the assembly's chip array.
    pub chip: usize,
    /// Block index on the chip; the leg owns channels `block*4 .. block*4+4`.
    pub block: u8,
}

impl LegSlot {
    pub const fn new(chip: usize, block: u8) -> Self {
        Self { chip, block }
    }

    /// Hardware channel for joint `servo_id` of this leg.
    pub const fn channel(self, servo_id: u8) -> u8 {
        self.block * LEG_CHANNELS + servo_id
    }
}

/// Factory wiring: legs 0–2 on the first chip, legs 3–5 on the second,
/// blocks 0, 1, 2 on each.
pub const DEFAULT_WIRING: [LegSlot; LEG_COUNT] = [
    LegSlot::new(0, 0),
    LegSlot::new(0, 1),
    LegSlot::new(0, 2),
    LegSlot::new(1, 0),
    LegSlot::new(1, 1),
    LegSlot::new(1, 2),
];
