// Host-side tests for the otter's steering and fade.

use std::time::Duration;

use glam::Vec3;
use otter_core::avatar::{AvatarController, AvatarPhase, TickOutcome};
use otter_core::error::AvatarError;
use otter_core::geometry::Pose;

const FRAME: Duration = Duration::from_micros(16_667);

fn placed_at_origin(speed: f32) -> AvatarController {
    let mut avatar = AvatarController::new(speed);
    avatar.place(&Pose::new(Vec3::ZERO)).unwrap();
    avatar
}

#[test]
fn approach_is_monotone_and_arrives_once() {
    let mut avatar = placed_at_origin(0.3);
    let target = Vec3::new(0.0, 0.0, -5.0);
    avatar.command_target(target).unwrap();

    let mut last = avatar.position().distance(target);
    let mut arrivals = 0;
    let mut frames = 0;
    while frames < 2000 {
        let outcome = avatar.tick(FRAME, false);
        frames += 1;
        let d = avatar.position().distance(target);
        assert!(d <= last + 1e-5, "distance grew from {} to {}", last, d);
        last = d;
        if outcome == TickOutcome::Arrived {
            arrivals += 1;
            break;
        }
    }
    assert_eq!(arrivals, 1);

    // 5 units at 0.3 u/s is about 16.7 s of frames
    let secs = frames as f32 * FRAME.as_secs_f32();
    assert!((secs - 16.6).abs() < 0.3, "took {} s", secs);

    // Nothing more happens after arrival
    for _ in 0..10 {
        assert_eq!(avatar.tick(FRAME, false), TickOutcome::Rest);
    }
    assert_eq!(avatar.phase(), AvatarPhase::Idle);
    assert!(avatar.target().is_none());
}

#[test]
fn never_overshoots_on_a_long_frame() {
    let mut avatar = placed_at_origin(10.0);
    let target = Vec3::new(1.0, 0.0, 0.0);
    avatar.command_target(target).unwrap();

    assert_eq!(avatar.tick(Duration::from_secs(1), false), TickOutcome::Arrived);
    assert!(avatar.position().distance(target) < 1e-5);
}

#[test]
fn faces_the_direction_of_travel() {
    let mut avatar = placed_at_origin(0.3);
    avatar.command_target(Vec3::new(2.0, 0.0, 0.0)).unwrap();
    avatar.tick(FRAME, false);

    // +X is a quarter turn from +Z
    let yaw = avatar.transform().yaw;
    assert!((yaw - std::f32::consts::FRAC_PI_2).abs() < 1e-4);
}

#[test]
fn blocked_avatar_holds_position_and_target() {
    let mut avatar = placed_at_origin(0.3);
    let target = Vec3::new(0.0, 0.0, -1.0);
    avatar.command_target(target).unwrap();
    avatar.tick(FRAME, false);
    let held = avatar.position();

    for _ in 0..30 {
        assert_eq!(avatar.tick(FRAME, true), TickOutcome::Blocked);
    }
    assert_eq!(avatar.position(), held);
    assert_eq!(avatar.target(), Some(target));
    assert!(avatar.is_moving());

    // Unblocked, it carries on
    assert!(matches!(avatar.tick(FRAME, false), TickOutcome::Moved { .. }));
}

#[test]
fn retarget_replaces_previous_target() {
    let mut avatar = placed_at_origin(0.3);
    avatar.command_target(Vec3::new(0.0, 0.0, -1.0)).unwrap();
    avatar.tick(FRAME, false);
    let second = Vec3::new(1.0, 0.0, 0.0);
    avatar.command_target(second).unwrap();
    assert_eq!(avatar.target(), Some(second));
}

#[test]
fn cannot_place_twice_or_command_before_placement() {
    let mut avatar = AvatarController::new(0.3);
    assert_eq!(
        avatar.command_target(Vec3::ONE),
        Err(AvatarError::NotCommandable(AvatarPhase::Unplaced))
    );

    avatar.place(&Pose::new(Vec3::ZERO)).unwrap();
    assert_eq!(avatar.place(&Pose::new(Vec3::ONE)), Err(AvatarError::AlreadyPlaced));
    assert_eq!(avatar.position(), Vec3::ZERO);
}

#[test]
fn fade_out_reaches_zero_and_despawns_once() {
    let mut avatar = placed_at_origin(0.3);
    avatar.command_target(Vec3::new(0.0, 0.0, -1.0)).unwrap();
    avatar
        .fade_out_and_despawn(Duration::from_millis(1200))
        .unwrap();
    assert!(avatar.target().is_none());
    assert!(avatar.is_fading());

    match avatar.tick(Duration::from_millis(600), false) {
        TickOutcome::Fading { opacity } => assert!((opacity - 0.5).abs() < 1e-3),
        other => panic!("expected fading, got {:?}", other),
    }
    assert_eq!(avatar.tick(Duration::from_millis(600), false), TickOutcome::Despawned);
    assert_eq!(avatar.opacity(), 0.0);
    assert_eq!(avatar.phase(), AvatarPhase::Despawned);
    assert_eq!(avatar.tick(FRAME, false), TickOutcome::Rest);

    // A despawned otter ignores further commands
    assert!(avatar.command_target(Vec3::ONE).is_err());
    assert!(avatar.fade_out_and_despawn(Duration::from_millis(10)).is_err());
}

#[test]
fn reposition_drops_the_target() {
    let mut avatar = placed_at_origin(0.3);
    avatar.command_target(Vec3::new(0.0, 0.0, -1.0)).unwrap();
    avatar.tick(FRAME, false);

    let home = Vec3::new(0.5, 0.0, 0.5);
    avatar.reposition(&Pose::new(home));
    assert_eq!(avatar.position(), home);
    assert!(avatar.target().is_none());
    assert_eq!(avatar.phase(), AvatarPhase::Idle);
}

#[test]
fn stop_holds_the_avatar_where_it_is() {
    let mut avatar = placed_at_origin(1.0);
    avatar.command_target(Vec3::new(0.0, 0.0, -2.0)).unwrap();
    for _ in 0..30 {
        avatar.tick(FRAME, false);
    }
    let here = avatar.position();
    avatar.stop();
    assert_eq!(avatar.phase(), AvatarPhase::Idle);
    assert!(avatar.target().is_none());
    assert_eq!(avatar.tick(FRAME, false), TickOutcome::Rest);
    assert_eq!(avatar.position(), here);
}
