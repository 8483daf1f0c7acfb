//! Hardware adapter: bridges the `pwm-pca9685` driver to the [`PwmPort`] trait.
//!
//! Both chips sit on one I²C bus.  The bus is wrapped in a `RefCell` and
//! each chip gets its own `RefCellDevice` handle, so the two drivers
//! share the transport without either owning it.  Everything runs on a
//! single thread, which is what `RefCell` sharing requires.

use core::cell::RefCell;

use embedded_hal::i2c::{Error as _, I2c};
use embedded_hal_bus::i2c::RefCellDevice;
use log::info;
use pwm_pca9685::{Channel, Error as PcaError, Pca9685};

use crate::app::ports::PwmPort;
use crate::error::TransportError;
use crate::wiring::{CHIP_CHANNELS, CHIP_COUNT};

/// Internal oscillator frequency.
const OSC_HZ: f32 = 25_000_000.0;
/// Counter steps per PWM period.
const TICKS_PER_PERIOD: u16 = 4096;

const CHANNELS: [Channel; CHIP_CHANNELS as usize] = [
    Channel::C0,
    Channel::C1,
    Channel::C2,
    Channel::C3,
    Channel::C4,
    Channel::C5,
    Channel::C6,
    Channel::C7,
    Channel::C8,
    Channel::C9,
    Channel::C10,
    Channel::C11,
    Channel::C12,
    Channel::C13,
    Channel::C14,
    Channel::C15,
];

/// Prescale register value for `hz`, or `None` if the chip cannot
/// produce that frequency.
pub fn prescale_for(hz: u32) -> Option<u8> {
    if hz == 0 {
        return None;
    }
    let prescale = (OSC_HZ / (f32::from(TICKS_PER_PERIOD) * hz as f32)).round() - 1.0;
    if (3.0..=255.0).contains(&prescale) {
        Some(prescale as u8)
    } else {
        None
    }
}

// ── Chip port ─────────────────────────────────────────────────

/// One PCA9685 together with the address its bus errors are reported under.
pub struct Pca9685Port<I2C> {
    pwm: Pca9685<I2C>,
    address: u8,
}

/// A PCA9685 reached through a shared bus.
pub type SharedChip<'a, BUS> = Pca9685Port<RefCellDevice<'a, BUS>>;

impl<I2C: I2c> Pca9685Port<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Result<Self, TransportError> {
        let pwm = Pca9685::new(i2c, address).map_err(|e| match e {
            PcaError::I2C(e) => TransportError::Bus {
                address,
                kind: e.kind(),
            },
            PcaError::InvalidInputData => TransportError::InvalidAddress(address),
        })?;
        Ok(Self { pwm, address })
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Release the bus.
    pub fn release(self) -> I2C {
        self.pwm.destroy()
    }

    fn bus_error(&self, e: PcaError<I2C::Error>, invalid: TransportError) -> TransportError {
        match e {
            PcaError::I2C(e) => TransportError::Bus {
                address: self.address,
                kind: e.kind(),
            },
            PcaError::InvalidInputData => invalid,
        }
    }
}

impl<I2C: I2c> PwmPort for Pca9685Port<I2C> {
    fn set_pwm_frequency(&mut self, hz: u32) -> Result<(), TransportError> {
        let invalid = TransportError::InvalidFrequency(hz);
        let prescale = prescale_for(hz).ok_or(invalid)?;
        self.pwm
            .set_prescale(prescale)
            .map_err(|e| self.bus_error(e, invalid))?;
        self.pwm.enable().map_err(|e| self.bus_error(e, invalid))?;
        info!("PCA9685 0x{:02x}: {} Hz (prescale {})", self.address, hz, prescale);
        Ok(())
    }

    fn set_pwm(&mut self, channel: u8, on: u16, off: u16) -> Result<(), TransportError> {
        let ch = *CHANNELS
            .get(channel as usize)
            .ok_or(TransportError::InvalidChannel(channel))?;
        let invalid = TransportError::InvalidTicks(on.max(off));
        if on >= TICKS_PER_PERIOD || off >= TICKS_PER_PERIOD {
            return Err(invalid);
        }
        self.pwm
            .set_channel_on_off(ch, on, off)
            .map_err(|e| self.bus_error(e, invalid))
    }
}

// ── Construction ──────────────────────────────────────────────

/// Bind one chip per address on the shared `bus`, in address order.
pub fn open_chips<BUS: I2c>(
    bus: &RefCell<BUS>,
    addresses: [u8; CHIP_COUNT],
) -> Result<[SharedChip<'_, BUS>; CHIP_COUNT], TransportError> {
    let [addr_1, addr_2] = addresses;
    Ok([
        Pca9685Port::new(RefCellDevice::new(bus), addr_1)?,
        Pca9685Port::new(RefCellDevice::new(bus), addr_2)?,
    ])
}

/// Linux bus access through `/dev/i2c-N`.
#[cfg(all(feature = "linux", target_os = "linux"))]
pub mod linux {
    use core::cell::RefCell;

    use linux_embedded_hal::I2cdev;
    use log::info;

    pub type LinuxChip<'a> = super::SharedChip<'a, I2cdev>;

    /// Open the I²C character device at `path`.
    pub fn open_bus(path: &str) -> anyhow::Result<RefCell<I2cdev>> {
        let dev = I2cdev::new(path)?;
        info!("I2C bus {} opened", path);
        Ok(RefCell::new(dev))
    }
}
