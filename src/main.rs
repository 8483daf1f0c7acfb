//! Spyder Controller Main Entry Point
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  /dev/i2c-1 (RefCell) ──┬── PCA9685 0x40 ── legs 0–2     │
//! │                         └── PCA9685 0x41 ── legs 3–5     │
//! │                                                          │
//! │  ────────────── PwmPort boundary ──────────────          │
//! │                                                          │
//! │  Spyder: legs · calibration · forward kinematics         │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::{Context, Result};
use log::{info, warn};

use spyder::adapters::hardware::{linux, open_chips};
use spyder::config::SpyderConfig;
use spyder::Spyder;

/// Environment variable naming an optional JSON config file.
const CONFIG_ENV: &str = "SPYDER_CONFIG";

fn load_config() -> Result<SpyderConfig> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {path}"))?;
            let config = SpyderConfig::from_json(&json)
                .with_context(|| format!("parsing config {path}"))?;
            info!("Config loaded from {}", path);
            Ok(config)
        }
        Err(_) => {
            warn!("{} not set, using defaults", CONFIG_ENV);
            Ok(SpyderConfig::default())
        }
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("╔══════════════════════════════════════╗");
    info!("║  Spyder v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Config ─────────────────────────────────────────────
    let config = load_config()?;

    // ── 3. Bus + chips ────────────────────────────────────────
    let bus = linux::open_bus(&config.i2c_device)?;
    let chips = open_chips(&bus, config.chip_addresses)
        .context("PCA9685 bind failed")?;

    // ── 4. Assembly + default pose ────────────────────────────
    let mut spyder = Spyder::new(chips, &config)?;
    spyder.goto_default_position()?;

    for (leg_id, tip) in spyder.endpoints().iter().enumerate() {
        info!("leg {} tip: ({:.1}, {:.1}, {:.1})", leg_id, tip.x, tip.y, tip.z);
    }

    // ── 5. Idle ───────────────────────────────────────────────
    // No gait yet: hold the default pose.
    info!("Default pose reached, holding");
    loop {
        std::thread::park();
    }
}
