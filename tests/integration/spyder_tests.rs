//! Integration tests for the six-leg assembly on two mock chips.

use approx::assert_relative_eq;
use nalgebra::Vector3;

use spyder::config::{ConfigError, SpyderConfig};
use spyder::error::{Error, TransportError};
use spyder::joint::{JointCalibration, signal_for};
use spyder::kinematics::rot_z;
use spyder::leg::Pose;
use spyder::wiring::{LEG_CHANNELS, LegSlot};
use spyder::Spyder;

use crate::mock_hw::{MockPwm, PwmCall};

fn make_spyder() -> Spyder<MockPwm> {
    Spyder::new([MockPwm::new(), MockPwm::new()], &SpyderConfig::default()).unwrap()
}

fn total_writes(spyder: &Spyder<MockPwm>) -> Vec<(usize, u8, u16)> {
    (0..2)
        .flat_map(|chip| {
            spyder
                .chip(chip)
                .unwrap()
                .writes()
                .into_iter()
                .map(move |(ch, off)| (chip, ch, off))
        })
        .collect()
}

// ── Construction ──────────────────────────────────────────────

#[test]
fn construction_sets_servo_frequency_on_both_chips() {
    let spyder = make_spyder();
    for chip in 0..2 {
        assert_eq!(spyder.chip(chip).unwrap().calls, vec![PwmCall::Frequency(50)]);
    }
    assert!(spyder.chip(2).is_none());
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = SpyderConfig::default();
    config.legs[5].slot = LegSlot::new(0, 0);
    let result = Spyder::new([MockPwm::new(), MockPwm::new()], &config);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::ValidationFailed(_)))
    ));
}

#[test]
fn per_leg_geometry_is_kept() {
    let mut config = SpyderConfig::default();
    config.legs[3].segments = [[0.0, 10.0, 0.0], [0.0, 20.0, 0.0], [0.0, 30.0, 0.0]];
    let spyder = Spyder::new([MockPwm::new(), MockPwm::new()], &config).unwrap();

    assert_eq!(spyder.leg(3).unwrap().endpoint(), Vector3::new(0.0, 60.0, 0.0));
    assert_eq!(spyder.leg(2).unwrap().endpoint(), Vector3::new(0.0, 180.0, 0.0));
}

// ── Addressing ────────────────────────────────────────────────

#[test]
fn every_joint_lands_on_its_own_channel() {
    let mut spyder = make_spyder();
    let mut seen = std::collections::HashSet::new();

    for leg_id in 0..6u8 {
        for joint in 0..3u8 {
            spyder.set_leg_angle(leg_id, joint, 10.0).unwrap();

            let chip = usize::from(leg_id / 3);
            let channel = (leg_id % 3) * LEG_CHANNELS + joint;
            let (ch, _) = spyder.chip(chip).unwrap().last_write().unwrap();
            assert_eq!(ch, channel, "leg {leg_id} joint {joint}");
            assert!(seen.insert((chip, channel)));
        }
        assert_eq!(spyder.leg(leg_id).unwrap().slot().chip, usize::from(leg_id / 3));
    }
    assert_eq!(seen.len(), 18);
}

#[test]
fn invalid_leg_writes_nothing() {
    let mut spyder = make_spyder();
    assert_eq!(spyder.set_leg_angles(6, [0.0; 3]), Err(Error::InvalidLeg(6)));
    assert_eq!(spyder.set_leg_angle(9, 0, 0.0), Err(Error::InvalidLeg(9)));
    assert_eq!(spyder.endpoint_of(6), Err(Error::InvalidLeg(6)));
    assert!(spyder.leg(6).is_err());
    assert!(total_writes(&spyder).is_empty());
}

#[test]
fn invalid_joint_through_assembly() {
    let mut spyder = make_spyder();
    assert_eq!(spyder.set_leg_angle(1, 3, 0.0), Err(Error::InvalidJoint(3)));
    assert!(total_writes(&spyder).is_empty());
}

// ── Positions ─────────────────────────────────────────────────

#[test]
fn default_position_writes_eighteen_centre_signals() {
    let mut spyder = make_spyder();
    spyder.goto_default_position().unwrap();

    let writes = total_writes(&spyder);
    assert_eq!(writes.len(), 18);
    assert!(writes.iter().all(|&(_, _, off)| off == 307));

    for chip in 0..2 {
        let on_ticks_zero = spyder.chip(chip).unwrap().calls.iter().all(|c| match c {
            PwmCall::Pwm { on, .. } => *on == 0,
            PwmCall::Frequency(_) => true,
        });
        assert!(on_ticks_zero);
    }
}

#[test]
fn default_position_follows_leg_order() {
    let mut spyder = make_spyder();
    spyder.goto_default_position().unwrap();

    // each chip sees its three legs in order, three joints each
    for chip in 0..2 {
        let channels: Vec<u8> = spyder.chip(chip).unwrap().writes().iter().map(|w| w.0).collect();
        assert_eq!(channels, vec![0, 1, 2, 4, 5, 6, 8, 9, 10]);
    }
}

#[test]
fn named_pose_moves_every_leg() {
    let mut spyder = make_spyder();
    spyder.goto_position(Pose::Nicked).unwrap();
    for leg in spyder.legs() {
        assert_eq!(leg.angles(), Pose::Nicked.angles());
    }
    assert_eq!(total_writes(&spyder).len(), 18);
}

#[test]
fn configured_calibration_is_applied() {
    let mut config = SpyderConfig::default();
    config.legs[0].calibration[0] = JointCalibration::new(10.0, false);
    let mut spyder = Spyder::new([MockPwm::new(), MockPwm::new()], &config).unwrap();

    spyder.goto_default_position().unwrap();

    let expected = signal_for(0, 10.0, &JointCalibration::default()).unwrap();
    assert_eq!(spyder.chip(0).unwrap().writes()[0], (0, expected));
}

#[test]
fn calibration_failure_stops_at_offending_leg() {
    let mut spyder = make_spyder();
    spyder
        .set_calibration(4, 2, JointCalibration::new(-10.0, false))
        .unwrap();

    let err = spyder.goto_position(Pose::Nicked).unwrap_err();

    assert_eq!(
        err,
        Error::OutOfRange {
            servo_id: 2,
            angle: -100.0,
            offset: -10.0
        }
    );
    // legs 0..=3 moved, leg 4 validated and refused, leg 5 untouched
    assert_eq!(total_writes(&spyder).len(), 12);
    assert_eq!(spyder.leg(4).unwrap().angles(), [0.0; 3]);
}

#[test]
fn runtime_calibration_obeys_config_bounds() {
    let mut spyder = make_spyder();

    let err = spyder
        .set_calibration(3, 1, JointCalibration::new(f32::NAN, false))
        .unwrap_err();
    assert_eq!(
        err,
        Error::Config(ConfigError::ValidationFailed(
            "calibration offset outside -90..=90"
        ))
    );
    assert_eq!(
        spyder.leg(3).unwrap().calibration_of(1),
        Ok(JointCalibration::default())
    );

    // a rejected calibration never poisons later moves
    spyder.goto_default_position().unwrap();
    assert_eq!(total_writes(&spyder).len(), 18);
}

#[test]
fn transport_failure_surfaces_from_assembly() {
    let mut spyder = Spyder::new(
        [MockPwm::new(), MockPwm::failing_on(5)],
        &SpyderConfig::default(),
    )
    .unwrap();

    let err = spyder.goto_default_position().unwrap_err();

    assert!(matches!(err, Error::Transport(TransportError::Bus { .. })));
    // legs 0–3 plus leg 4 joint 0
    assert_eq!(total_writes(&spyder).len(), 13);
    assert_eq!(spyder.leg(4).unwrap().angles(), [0.0; 3]);
}

// ── Body-frame kinematics ─────────────────────────────────────

#[test]
fn default_pose_endpoints_in_body_frame() {
    let mut spyder = make_spyder();
    spyder.goto_default_position().unwrap();

    let tip_0 = spyder.endpoint_of(0).unwrap();
    assert_relative_eq!(tip_0, Vector3::new(0.0, 230.0, 0.0), epsilon = 1e-4);

    let tip_1 = spyder.endpoint_of(1).unwrap();
    assert_relative_eq!(tip_1, rot_z(60.0) * Vector3::new(0.0, 230.0, 0.0), epsilon = 1e-4);
    let (s, c) = 60f32.to_radians().sin_cos();
    assert_relative_eq!(tip_1, Vector3::new(-230.0 * s, 230.0 * c, 0.0), epsilon = 1e-3);
}

#[test]
fn endpoints_ring_the_body() {
    let spyder = make_spyder();
    let tips = spyder.endpoints();
    for (i, tip) in tips.iter().enumerate() {
        assert_relative_eq!(tip.norm(), 230.0, epsilon = 1e-3);
        assert_relative_eq!(*tip, spyder.endpoint_of(i as u8).unwrap());
    }
    // opposite legs point opposite ways
    assert_relative_eq!(tips[0], -tips[3], epsilon = 1e-3);
    assert_eq!(spyder.anchor(), Vector3::new(0.0, 50.0, 0.0));
}
