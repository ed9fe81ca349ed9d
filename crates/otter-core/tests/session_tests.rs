// End-to-end node sessions driven the way the web front-end drives them:
// frames with XR data, a select to place, asset outcomes fed back from the
// spawn commands, and taps cast straight down onto the scene.

use std::time::Duration;

use glam::{Vec2, Vec3};
use otter_core::constants::MAP_PAGE;
use otter_core::entity::{EntityKey, EntityRole, PathChoice, SceneCommand};
use otter_core::error::{PuzzleError, SessionError};
use otter_core::geometry::{Pose, Ray};
use otter_core::rules::{PathStage, RuleState};
use otter_core::scene::{FrameInput, XrFrameData};
use otter_core::session::{AudioCue, NodePhase, NodeSession, SessionEvent};
use otter_core::ui::{NavButton, UiAction};
use otter_core::zones::ZoneKind;
use otter_core::{node, GateChange};

const DT: Duration = Duration::from_millis(16);
const VIEWER: Vec3 = Vec3::new(0.0, 1.5, 1.0);

fn xr_frame(hit: Option<Vec3>, viewer: Vec3) -> FrameInput {
    FrameInput::new(
        DT,
        Some(XrFrameData {
            hit: hit.map(Pose::new),
            viewer_position: Some(viewer),
            viewer_forward: Some(Vec3::NEG_Z),
        }),
    )
}

fn tick(s: &mut NodeSession) {
    s.frame(&xr_frame(None, VIEWER));
}

fn run(s: &mut NodeSession, frames: usize) {
    for _ in 0..frames {
        tick(s);
    }
}

fn run_until(s: &mut NodeSession, max_frames: usize, mut done: impl FnMut(&NodeSession) -> bool) -> bool {
    for _ in 0..max_frames {
        if done(s) {
            return true;
        }
        tick(s);
    }
    done(s)
}

/// A session with the hit-test source up and the scene placed at the origin.
fn placed(id: u8) -> NodeSession {
    placed_seeded(id, 7)
}

fn placed_seeded(id: u8, seed: u64) -> NodeSession {
    let mut s = NodeSession::new(node(id).unwrap(), seed);
    assert!(s.reticle_mut().needs_source_request(true));
    s.reticle_mut().source_ready();
    s.frame(&xr_frame(Some(Vec3::ZERO), VIEWER));
    assert_eq!(s.phase(), NodePhase::AwaitingPlacement);
    s.place().unwrap();
    s
}

/// Keys of the spawns queued since the last drain that start a load.
fn pending_loads(s: &mut NodeSession) -> Vec<EntityKey> {
    s.drain_commands()
        .into_iter()
        .filter_map(|c| match c {
            SceneCommand::Spawn { key, visual, .. } if visual.needs_load() => Some(key),
            _ => None,
        })
        .collect()
}

/// Report every pending load as finished. Returns how many were reported.
fn settle_loads(s: &mut NodeSession, ok: bool) -> usize {
    let keys = pending_loads(s);
    for key in &keys {
        s.asset_settled(*key, ok);
    }
    keys.len()
}

/// Settle every pending load, failing the ones whose role matches.
fn settle_loads_failing(s: &mut NodeSession, fails: impl Fn(EntityRole) -> bool) {
    for key in pending_loads(s) {
        let role = s.context().entities.get(key).map(|e| e.role);
        s.asset_settled(key, !role.is_some_and(&fails));
    }
}

/// XZ distance from `p` to the segment `a`..`b`.
fn xz_segment_distance(p: Vec3, a: Vec3, b: Vec3) -> f32 {
    let (p, a, b) = (Vec2::new(p.x, p.z), Vec2::new(a.x, a.z), Vec2::new(b.x, b.z));
    let ab = b - a;
    let t = ((p - a).dot(ab) / ab.length_squared()).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

fn hazard_centers(s: &NodeSession) -> Vec<Vec3> {
    s.context()
        .zones
        .centers_where(|z| matches!(z.kind, ZoneKind::Hazard { .. }))
}

fn exit_center(s: &NodeSession) -> Vec3 {
    s.context().zones.centers_where(|z| z.kind == ZoneKind::Exit)[0]
}

fn live(id: u8) -> NodeSession {
    let mut s = placed(id);
    settle_loads(&mut s, true);
    assert!(s.phase().is_running(), "node {} stuck in {:?}", id, s.phase());
    s
}

fn down_at(p: Vec3) -> Ray {
    Ray::new(p + Vec3::Y * 2.0, Vec3::NEG_Y)
}

fn position_of(s: &NodeSession, role: EntityRole) -> Vec3 {
    let entities = &s.context().entities;
    let key = entities.find(role).unwrap();
    entities.get(key).unwrap().transform.position
}

#[test]
fn placement_waits_for_a_surface() {
    let mut s = NodeSession::new(node(1).unwrap(), 1);
    assert_eq!(s.place(), Err(SessionError::InvalidPhase(NodePhase::AwaitingSurface)));
    assert!(s.tap(&down_at(Vec3::ZERO)).is_err());

    s.reticle_mut().needs_source_request(true);
    s.reticle_mut().source_ready();
    tick(&mut s);
    assert_eq!(s.phase(), NodePhase::AwaitingSurface);
    assert!(s.view().reticle.is_none());

    s.frame(&xr_frame(Some(Vec3::new(0.0, 0.0, -1.0)), VIEWER));
    assert_eq!(s.phase(), NodePhase::AwaitingPlacement);
    assert_eq!(s.view().reticle.map(|p| p.position), Some(Vec3::new(0.0, 0.0, -1.0)));

    // Surface lost again
    tick(&mut s);
    assert_eq!(s.phase(), NodePhase::AwaitingSurface);
}

#[test]
fn populating_holds_until_assets_settle() {
    let mut s = placed(5);
    assert_eq!(s.phase(), NodePhase::Populating);
    assert!(s.view().reticle.is_none());
    assert!(s.reticle().is_frozen());

    run(&mut s, 30);
    assert_eq!(s.phase(), NodePhase::Populating);

    // Failed loads still let the node go live
    assert!(settle_loads(&mut s, false) > 0);
    assert!(s.phase().is_running());
}

#[test]
fn back_to_map_waits_for_placement() {
    let mut s = NodeSession::new(node(6).unwrap(), 7);
    assert!(s.view().back.is_none());

    s.reticle_mut().needs_source_request(true);
    s.reticle_mut().source_ready();
    s.frame(&xr_frame(Some(Vec3::ZERO), VIEWER));
    assert_eq!(s.phase(), NodePhase::AwaitingPlacement);
    assert!(s.view().back.is_none());

    s.place().unwrap();
    assert_eq!(s.view().back.map(|b| b.href), Some(MAP_PAGE));
}

#[test]
fn failed_litter_is_taken_out_of_play() {
    let mut s = placed(6);
    settle_loads_failing(&mut s, |r| matches!(r, EntityRole::Trash(_)));
    assert_eq!(s.phase(), NodePhase::Active);

    let ctx = s.context();
    assert!(ctx.entities.keys_where(|r| matches!(r, EntityRole::Trash(_))).is_empty());
    assert!(hazard_centers(&s).is_empty());
    assert_eq!(s.context().zones.len(), 1);
    let despawned = s
        .drain_commands()
        .iter()
        .filter(|c| matches!(c, SceneCommand::Despawn { .. }))
        .count();
    assert_eq!(despawned, 8);
}

#[test]
fn failed_food_no_longer_counts() {
    let mut s = placed(3);
    settle_loads_failing(&mut s, |r| r == EntityRole::Food(0));
    assert_eq!(s.phase(), NodePhase::Active);

    assert!(s.context().entities.find(EntityRole::Food(0)).is_none());
    assert_eq!(s.context().zones.len(), 4);
    assert_eq!(s.view().progress.map(|p| (p.current, p.total)), Some((0, 4)));
    match s.rules() {
        RuleState::Feeding(f) => {
            assert_eq!(f.remaining(), 4);
            assert!(f.food_position(0).is_none());
        }
        _ => unreachable!(),
    }
}

#[test]
fn failed_piece_takes_its_slot_along() {
    let mut s = placed(8);
    settle_loads_failing(&mut s, |r| r == EntityRole::PuzzlePiece(1));
    assert_eq!(s.phase(), NodePhase::Active);

    assert!(s.context().entities.find(EntityRole::PuzzlePiece(1)).is_none());
    assert!(s.context().entities.find(EntityRole::PuzzleTarget(1)).is_none());
    let slots = s
        .context()
        .zones
        .ids_where(|z| matches!(z.kind, ZoneKind::PuzzleTarget { .. }));
    assert_eq!(slots.len(), 2);

    let pieces = match s.rules() {
        RuleState::Rebuild(r) => r.puzzle().pieces().to_vec(),
        _ => unreachable!(),
    };
    for i in [0, 2] {
        let at = position_of(&s, EntityRole::PuzzlePiece(i));
        assert!(s.pointer_down(&down_at(at)).unwrap());
        s.pointer_move(&down_at(pieces[i].target));
        s.pointer_up();
    }
    assert!(s.context().progress.puzzle_solved);
}

#[test]
fn holt_release_then_walk_to_the_continue_ring() {
    let mut s = placed(1);
    let events = s.drain_events();
    assert!(events.contains(&SessionEvent::PlayVideo("/assets/videos/node1_bg.mp4")));
    assert!(events.contains(&SessionEvent::PhaseChanged(NodePhase::Populating)));

    settle_loads(&mut s, true);
    assert_eq!(s.phase(), NodePhase::Active);
    let view = s.view();
    assert_eq!(view.prompt, Some("Tap the holt to release the otter."));
    assert!(!view.info_box);
    assert!(!s.context().avatar.is_placed());
    assert_eq!(s.select(None), Err(SessionError::InvalidPhase(NodePhase::Active)));

    // A tap that misses the holt does nothing
    s.tap(&down_at(Vec3::new(-2.0, 0.0, -2.0))).unwrap();
    assert!(!s.context().avatar.is_placed());

    let holt = position_of(&s, EntityRole::Holt);
    s.select(Some(down_at(holt))).unwrap();
    assert!(s.context().avatar.is_placed());
    assert_eq!(s.context().avatar.position(), holt);
    let view = s.view();
    assert_eq!(view.prompt, Some("Tap on the image to guide the otter forward."));
    assert!(view.info_box);

    let events = s.drain_events();
    assert!(events.contains(&SessionEvent::Audio(AudioCue::Element("bgm"))));
    assert!(events.contains(&SessionEvent::Audio(AudioCue::Narration)));

    let exit = position_of(&s, EntityRole::ExitMarker);
    s.tap(&down_at(exit)).unwrap();
    // Music starts on the first tap only
    assert!(!s
        .drain_events()
        .contains(&SessionEvent::Audio(AudioCue::Element("bgm"))));

    assert!(run_until(&mut s, 1500, |s| s.phase() == NodePhase::Completed));
    assert_eq!(
        s.view().next,
        Some(NavButton {
            label: "→ Enter Node 2",
            href: "/node2.html",
        })
    );
    assert!(s
        .drain_events()
        .contains(&SessionEvent::GateChanged(GateChange::Shown)));
}

#[test]
fn path_choice_retry_keeps_the_otter() {
    let mut s = live(2);
    s.narration_audio_ended();

    let stage = |s: &NodeSession| match s.rules() {
        RuleState::PathChoice(p) => p.stage(),
        _ => unreachable!(),
    };
    assert_eq!(stage(&s), PathStage::Approaching);
    assert!(run_until(&mut s, 6000, |s| stage(s) == PathStage::Choosing));
    assert!(s.view().prompt.unwrap().starts_with("Which path will you take?"));
    let start = Vec3::ZERO;
    assert!(s.context().avatar.position().distance(start - Vec3::Z * 0.4) < 0.05);

    let polluted = position_of(&s, EntityRole::Choice(PathChoice::Polluted));
    s.tap(&down_at(polluted)).unwrap();
    assert_eq!(stage(&s), PathStage::Chosen(PathChoice::Polluted));
    assert_eq!(s.phase(), NodePhase::Active);
    let view = s.view();
    assert!(view.narration.starts_with("You chose the fast path"));
    assert_eq!(view.retry.map(|b| b.label), Some("Try the other path"));
    assert!(s.context().entities.find(EntityRole::Pollution).is_some());
    assert!(s
        .drain_events()
        .contains(&SessionEvent::Audio(AudioCue::Clip("/assets/audio/polluted_path.mp3"))));

    s.ui(UiAction::Retry).unwrap();
    assert_eq!(s.phase(), NodePhase::Populating);
    settle_loads(&mut s, true);
    assert_eq!(s.phase(), NodePhase::Active);
    assert_eq!(stage(&s), PathStage::Choosing);
    assert!(s.context().entities.find(EntityRole::Pollution).is_none());
    assert!(s.context().entities.find(EntityRole::Bottle(0)).is_none());
    assert_eq!(s.context().avatar.position(), start);
    assert!(s.view().retry.is_none());

    let natural = position_of(&s, EntityRole::Choice(PathChoice::Natural));
    s.tap(&down_at(natural)).unwrap();
    assert_eq!(s.phase(), NodePhase::Completed);
    assert_eq!(s.view().next.map(|n| n.href), Some("/node3.html"));
    assert!(s.context().avatar.is_moving());
}

#[test]
fn feeding_collects_every_item() {
    let mut s = live(3);
    assert_eq!(s.view().progress.map(|p| (p.current, p.total)), Some((0, 5)));

    s.narration_audio_ended();
    s.narration_audio_ended();
    let music = s
        .drain_events()
        .into_iter()
        .filter(|e| *e == SessionEvent::Audio(AudioCue::Element("bgmAudio")))
        .count();
    assert_eq!(music, 1);

    let next_food = |s: &NodeSession| match s.rules() {
        RuleState::Feeding(f) => (0..5).find_map(|i| f.food_position(i)),
        _ => unreachable!(),
    };
    let remaining = |s: &NodeSession| match s.rules() {
        RuleState::Feeding(f) => f.remaining(),
        _ => unreachable!(),
    };

    while let Some(food) = next_food(&s) {
        let before = remaining(&s);
        s.tap(&down_at(food)).unwrap();
        assert!(run_until(&mut s, 3000, |s| remaining(s) < before));
        assert!(s.view().popup.is_some());
    }

    assert_eq!(s.phase(), NodePhase::Completed);
    let view = s.view();
    assert_eq!(view.progress.map(|p| p.current), Some(5));
    assert_eq!(view.toast, Some("🎉 Congrats! You found all the food!"));
    assert!(view.prompt.is_none());
    assert!(!view.info_box);
    let finds = s
        .drain_events()
        .into_iter()
        .filter(|e| *e == SessionEvent::Audio(AudioCue::Element("findSound")))
        .count();
    assert_eq!(finds, 5);

    // Toast times out
    run(&mut s, 200);
    assert!(s.view().toast.is_none());
}

#[test]
fn trust_follows_viewer_distance() {
    let mut s = live(4);
    // The next button is available straight away
    assert_eq!(s.phase(), NodePhase::Completed);
    assert!(s.view().next.is_some());

    s.frame(&xr_frame(None, Vec3::new(0.0, 0.4, 0.2)));
    let popup = s.view().popup.unwrap();
    assert_eq!(popup.title, "Otter’s Thought");
    assert_eq!(popup.anchor, Some(Vec3::new(0.0, 0.5, 0.0)));
    assert!(s.view().prompt.is_none());
    assert!(s
        .drain_events()
        .contains(&SessionEvent::Audio(AudioCue::Element("trustAudio"))));
    let entities = &s.context().entities;
    let alt = entities.find(EntityRole::AvatarAlt).unwrap();
    let otter = entities.find(EntityRole::Avatar).unwrap();
    assert!(entities.get(alt).unwrap().visible);
    assert!(!entities.get(otter).unwrap().visible);

    // Between the thresholds nothing changes
    s.frame(&xr_frame(None, Vec3::new(0.0, 0.0, 1.2)));
    assert!(s.view().popup.is_some());

    s.frame(&xr_frame(None, Vec3::new(0.0, 1.5, 2.0)));
    assert!(s.view().popup.is_none());
    let entities = &s.context().entities;
    assert!(!entities.get(alt).unwrap().visible);
    assert!(entities.get(otter).unwrap().visible);
}

#[test]
fn obstacle_falls_after_three_taps() {
    let mut s = live(5);
    // The otter steps back towards the viewer; the wall stands ahead of it
    assert!(s.context().avatar.position().distance(Vec3::new(0.0, 0.0, 0.3)) < 1e-5);
    let wall = match s.rules() {
        RuleState::Obstacle(o) => o.wall_position().unwrap(),
        _ => unreachable!(),
    };
    assert!(wall.distance(Vec3::new(0.0, 0.01, -1.2)) < 1e-5);

    s.tap(&down_at(Vec3::new(2.5, 0.0, 2.5))).unwrap();
    assert_eq!(s.context().progress.obstacle_health, Some(3));

    s.tap(&down_at(wall)).unwrap();
    s.tap(&down_at(wall)).unwrap();
    assert_eq!(s.context().progress.obstacle_health, Some(1));
    assert_eq!(s.phase(), NodePhase::Active);

    s.tap(&down_at(wall)).unwrap();
    assert_eq!(s.phase(), NodePhase::Completed);
    assert_eq!(s.view().popup.map(|p| p.title), Some("Urban Obstacles".to_string()));
    assert!(s.context().entities.find(EntityRole::Obstacle).is_none());
    assert_eq!(s.context().avatar.target(), Some(wall + Vec3::new(0.0, 0.0, 0.5)));
}

#[test]
fn trash_traps_the_otter_and_restart_goes_back_to_the_reticle() {
    let mut s = live(6);
    // The scene was pulled back towards the viewer
    let origin = s.context().origin.unwrap().position;
    assert!(origin.distance(Vec3::new(0.0, 0.0, 0.8)) < 1e-5);
    assert!(s.view().prompt.is_some());
    assert_eq!(s.ui(UiAction::Retry), Err(SessionError::InvalidPhase(NodePhase::Active)));

    run(&mut s, 400);
    assert!(s.view().prompt.is_none());

    let trash = s
        .context()
        .zones
        .centers_where(|z| matches!(z.kind, ZoneKind::Hazard { .. }));
    assert_eq!(trash.len(), 8);
    s.tap(&down_at(trash[0])).unwrap();
    assert!(run_until(&mut s, 3000, |s| s.view().retry.is_some()));

    let view = s.view();
    assert_eq!(view.warning, Some("Too much trash here... Try another way."));
    assert_eq!(view.retry.map(|b| b.label), Some("Restart"));
    // Stuck: the otter keeps its target but does not move
    let held = s.context().avatar.position();
    run(&mut s, 20);
    assert_eq!(s.context().avatar.position(), held);
    assert!(s.context().avatar.target().is_some());

    s.drain_commands();
    s.ui(UiAction::Retry).unwrap();
    assert_eq!(s.phase(), NodePhase::AwaitingPlacement);
    assert!(s.context().entities.is_empty());
    assert!(s
        .drain_commands()
        .iter()
        .all(|c| matches!(c, SceneCommand::Despawn { .. })));
    let view = s.view();
    assert!(view.retry.is_none());
    assert!(view.warning.is_none());
    assert!(view.narration.is_empty());

    tick(&mut s);
    assert_eq!(s.phase(), NodePhase::AwaitingSurface);
    s.frame(&xr_frame(Some(Vec3::ZERO), VIEWER));
    s.place().unwrap();
    assert_eq!(s.phase(), NodePhase::Populating);
}

#[test]
fn trash_exit_ends_the_run() {
    // A layout whose litter leaves a clear line from the otter to the exit
    let mut s = (0..64)
        .map(|seed| {
            let mut s = placed_seeded(6, seed);
            settle_loads(&mut s, true);
            s
        })
        .find(|s| {
            let start = s.context().avatar.position();
            let exit = exit_center(s);
            hazard_centers(s)
                .iter()
                .all(|t| xz_segment_distance(*t, start, exit) > 0.45)
        })
        .expect("no seed with a clear route");

    s.tap(&down_at(exit_center(&s))).unwrap();
    assert!(run_until(&mut s, 3000, |s| s.phase() == NodePhase::Completed));
    assert!(!s.context().avatar.is_moving());

    // Walking into litter now does nothing
    let at = s.context().avatar.position();
    s.tap(&down_at(hazard_centers(&s)[0])).unwrap();
    run(&mut s, 300);
    assert_eq!(s.context().avatar.position(), at);
    let view = s.view();
    assert!(view.retry.is_none());
    assert!(view.warning.is_none());
    assert!(view.next.is_some());
    assert_eq!(s.ui(UiAction::Retry), Err(SessionError::InvalidPhase(NodePhase::Completed)));
}

#[test]
fn noise_zones_warn_and_the_exit_quiets_them() {
    let mut s = live(7);
    run(&mut s, 150);
    let scale = s.view().ripple_scale.unwrap();
    assert!((1.0..=2.0).contains(&scale));

    let noise = s
        .context()
        .zones
        .centers_where(|z| matches!(z.kind, ZoneKind::Hazard { .. }));
    assert_eq!(noise.len(), 4);
    s.tap(&down_at(noise[0])).unwrap();
    assert!(run_until(&mut s, 3000, |s| s.view().warning.is_some()));
    assert_eq!(s.view().warning, Some("Too noisy here... Try another way."));
    let loop_start = SessionEvent::Audio(AudioCue::LoopStart("/assets/audio/city_noise.mp3"));
    assert!(s.drain_events().contains(&loop_start));

    let exit = s.context().zones.centers_where(|z| z.kind == ZoneKind::Exit)[0];
    s.tap(&down_at(exit)).unwrap();
    assert!(run_until(&mut s, 4000, |s| s.phase() == NodePhase::Completed));
    let loop_stop = SessionEvent::Audio(AudioCue::LoopStop("/assets/audio/city_noise.mp3"));
    assert!(s.drain_events().contains(&loop_stop));

    // Past the exit the otter stays put
    let at = s.context().avatar.position();
    s.tap(&down_at(noise[0])).unwrap();
    run(&mut s, 300);
    assert_eq!(s.context().avatar.position(), at);
    assert!(s.view().warning.is_none());
    assert!(!s.drain_events().contains(&loop_start));
}

#[test]
fn puzzle_pieces_lock_and_the_otter_leaves() {
    let mut s = live(8);
    let pieces = match s.rules() {
        RuleState::Rebuild(r) => r.puzzle().pieces().to_vec(),
        _ => unreachable!(),
    };
    assert_eq!(pieces.len(), 3);

    // Nothing under the pointer
    assert_eq!(s.pointer_down(&down_at(Vec3::new(0.0, 0.0, -2.9))), Ok(false));

    for (i, piece) in pieces.iter().enumerate() {
        let at = position_of(&s, EntityRole::PuzzlePiece(i));
        assert!(s.pointer_down(&down_at(at)).unwrap());
        s.pointer_move(&down_at(piece.target));
        s.pointer_up();
        let moved = position_of(&s, EntityRole::PuzzlePiece(i));
        assert!(moved.distance(piece.target) < 1e-5);

        if i == 0 {
            assert_eq!(
                s.pointer_down(&down_at(piece.target)),
                Err(SessionError::Puzzle(PuzzleError::PieceLocked(0)))
            );
        }
    }

    assert!(s.context().progress.puzzle_solved);
    assert!(s.view().prompt.is_none());
    let exit = match s.rules() {
        RuleState::Rebuild(r) => r.exit_position(),
        _ => unreachable!(),
    };
    assert_eq!(s.context().avatar.target(), Some(exit));
    assert!(run_until(&mut s, 1500, |s| s.phase() == NodePhase::Completed));
}

#[test]
fn balance_gate_tracks_trees_and_buildings() {
    let mut s = placed(9);
    assert_eq!(s.ui(UiAction::AddTree), Err(SessionError::InvalidPhase(NodePhase::Populating)));
    settle_loads(&mut s, true);

    let view = s.view();
    assert_eq!(view.balance_fill, Some(0.0));
    let labels: Vec<_> = view.actions.iter().map(|a| a.label).collect();
    assert_eq!(labels, ["Add Tree", "Add Building"]);

    for _ in 0..3 {
        s.ui(UiAction::AddTree).unwrap();
    }
    assert_eq!(s.phase(), NodePhase::Completed);
    assert_eq!(s.view().balance_fill, Some(1.0));
    assert_eq!(s.view().next.map(|n| n.label), Some("→ Finish"));

    s.ui(UiAction::AddBuilding).unwrap();
    assert_eq!(s.phase(), NodePhase::Active);
    assert!(s.view().next.is_none());
    assert!((s.view().balance_fill.unwrap() - 2.0 / 3.0).abs() < 1e-6);

    let events = s.drain_events();
    assert!(events.contains(&SessionEvent::GateChanged(GateChange::Shown)));
    assert!(events.contains(&SessionEvent::GateChanged(GateChange::Hidden)));

    let entities = &s.context().entities;
    let trees = entities.keys_where(|r| matches!(r, EntityRole::Tree(_)));
    let buildings = entities.keys_where(|r| matches!(r, EntityRole::Building(_)));
    assert_eq!(trees.len(), 3);
    assert_eq!(buildings.len(), 1);
    for key in trees {
        let x = entities.get(key).unwrap().transform.position.x;
        assert!((-2.7..0.0).contains(&x));
    }
    for key in buildings {
        let x = entities.get(key).unwrap().transform.position.x;
        assert!(x > 0.0 && x <= 2.7);
    }

    // Loads after population settle without piling up in the barrier
    let added = pending_loads(&mut s);
    assert_eq!(added.len(), 4);
    for key in &added {
        s.asset_settled(*key, true);
    }
    assert!(added.iter().all(|k| !s.context().barrier.is_tracking(*k)));
    assert!(added.iter().all(|k| s.context().entities.get(*k).unwrap().loaded));
}

#[test]
fn fact_buttons_appear_after_narration() {
    let mut s = live(9);
    assert!(s.view().facts.is_empty());
    s.ui(UiAction::ShowFact(0)).unwrap();
    assert!(s.view().popup.is_none());

    s.narration_audio_ended();
    assert!(run_until(&mut s, 2000, |s| !s.view().facts.is_empty()));
    let view = s.view();
    assert_eq!(view.facts[0].label, "Why Balance?");
    assert_eq!(view.narration, node(9).unwrap().narration);

    s.ui(UiAction::ShowFact(0)).unwrap();
    let popup = s.view().popup.unwrap();
    assert_eq!(popup.title, "Why Balance Matters?");
    assert_eq!(popup.paragraphs.len(), 2);
    s.ui(UiAction::ClosePopup).unwrap();
    assert!(s.view().popup.is_none());

    // Out of range is ignored
    s.ui(UiAction::ShowFact(5)).unwrap();
    assert!(s.view().popup.is_none());
}

#[test]
fn return_home_fades_the_otter_out() {
    let mut s = live(10);
    assert_eq!(
        s.view().prompt,
        Some("Tap on the ground to guide the otter back to its holt.")
    );

    let holt = position_of(&s, EntityRole::Holt);
    s.tap(&down_at(holt)).unwrap();
    assert!(run_until(&mut s, 1500, |s| s.context().avatar.is_fading()));
    assert!(s.view().prompt.is_none());
    assert_eq!(s.phase(), NodePhase::Active);

    // Taps during the fade are harmless
    s.tap(&down_at(Vec3::ZERO)).unwrap();

    assert!(run_until(&mut s, 200, |s| s.phase() == NodePhase::Completed));
    assert!(s.context().avatar_key.is_none());
    assert!(s.context().entities.find(EntityRole::Avatar).is_none());
    assert_eq!(s.view().next.map(|n| n.href), Some(MAP_PAGE));
    assert_eq!(s.view().back.map(|b| b.href), Some(MAP_PAGE));
}
