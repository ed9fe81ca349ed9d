//! One node page from reticle to completion.
//!
//! [`NodeSession`] owns everything a node needs: the reticle, the placed
//! entities, the trigger zones, the otter, narration and progress. The
//! front-end drives it with one [`NodeSession::frame`] per animation frame
//! plus user input, and reads back [`SceneCommand`]s, [`SessionEvent`]s and
//! a [`ViewState`].

use std::time::Duration;

use glam::Vec3;

use crate::assets::{AssetKind, LoadBarrier};
use crate::avatar::{AvatarController, TickOutcome};
use crate::constants::{TOAST_DURATION_SEC, WARNING_DURATION_SEC};
use crate::entity::{EntityKey, EntityRole, EntityStore, SceneCommand, Visual};
use crate::error::{Result, SessionError};
use crate::geometry::{ray_plane_y, GroundSurface, Pose, Ray, Transform};
use crate::narration::NarrationSequencer;
use crate::nodes::{MusicStart, NodeConfig, PlacementShift, BACK_TO_MAP};
use crate::progress::{balance_fill, AffordanceGate, GateChange, ProgressState, WinCondition};
use crate::reticle::SurfaceReticle;
use crate::rules::RuleState;
use crate::scene::FrameInput;
use crate::ui::{ActionButton, Popup, ProgressBar, UiAction, ViewState};
use crate::zones::{PlacementSampler, TriggerZoneRegistry};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodePhase {
    /// No surface under the reticle yet.
    AwaitingSurface,
    /// Reticle is showing; a select will place the scene.
    AwaitingPlacement,
    /// Content spawned, waiting on required assets.
    Populating,
    Active,
    /// The next-node affordance is showing.
    Completed,
}

impl NodePhase {
    pub fn is_placing(self) -> bool {
        matches!(self, NodePhase::AwaitingSurface | NodePhase::AwaitingPlacement)
    }

    pub fn is_running(self) -> bool {
        matches!(self, NodePhase::Active | NodePhase::Completed)
    }
}

/// Sound the front-end should make.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioCue {
    /// The page's voice-over element for the narration.
    Narration,
    /// One-shot clip by URL.
    Clip(&'static str),
    /// A page `<audio>` element by id.
    Element(&'static str),
    LoopStart(&'static str),
    LoopStop(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SessionEvent {
    PhaseChanged(NodePhase),
    Audio(AudioCue),
    /// Start a ground video texture; placement happens inside a user gesture.
    PlayVideo(&'static str),
    GateChanged(GateChange),
}

/// How a retry clears the node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetKind {
    /// Tear everything down and go back to the reticle.
    Full,
    /// Keep the ground and the otter, repopulate the node's own content.
    Repopulate,
}

/// Text shown for a while or until replaced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timed {
    pub text: &'static str,
    pub remaining: Option<f32>,
}

impl Timed {
    pub fn sticky(text: &'static str) -> Self {
        Self {
            text,
            remaining: None,
        }
    }

    pub fn for_secs(text: &'static str, secs: f32) -> Self {
        Self {
            text,
            remaining: Some(secs),
        }
    }

    /// Count down; `false` once expired.
    fn tick(&mut self, dt: f32) -> bool {
        match self.remaining.as_mut() {
            Some(r) => {
                *r -= dt;
                *r > 0.0
            }
            None => true,
        }
    }
}

/// Shared state the per-node rules operate on.
pub struct NodeContext {
    pub config: &'static NodeConfig,
    pub entities: EntityStore,
    pub zones: TriggerZoneRegistry,
    pub avatar: AvatarController,
    pub avatar_key: Option<EntityKey>,
    pub narration: NarrationSequencer,
    pub progress: ProgressState,
    pub gate: AffordanceGate,
    pub barrier: LoadBarrier<EntityKey>,
    pub sampler: PlacementSampler,
    /// Committed placement pose, after any shift.
    pub origin: Option<Pose>,
    pub ground: Option<GroundSurface>,
    /// Seconds since the session started.
    pub elapsed: f32,
    pub viewer: Option<Vec3>,
    pub viewer_forward: Option<Vec3>,
    pub prompt: Option<Timed>,
    pub warning: Option<Timed>,
    pub toast: Option<Timed>,
    pub popup: Option<Popup>,
    /// Replaces the narration text once the user has made a choice.
    pub response: Option<&'static str>,
    pub retry: Option<&'static str>,
    pub facts_visible: bool,
    pub info_box: bool,
    music_started: bool,
    events: Vec<SessionEvent>,
}

impl NodeContext {
    fn new(config: &'static NodeConfig, seed: u64) -> Self {
        Self {
            config,
            entities: EntityStore::new(),
            zones: TriggerZoneRegistry::new(),
            avatar: avatar_for(config),
            avatar_key: None,
            narration: NarrationSequencer::new(Duration::from_millis(config.char_delay_ms)),
            progress: ProgressState::default(),
            gate: AffordanceGate::new(config.win),
            barrier: LoadBarrier::new(),
            sampler: PlacementSampler::new(seed),
            origin: None,
            ground: None,
            elapsed: 0.0,
            viewer: None,
            viewer_forward: None,
            prompt: None,
            warning: None,
            toast: None,
            popup: None,
            response: None,
            retry: None,
            facts_visible: false,
            info_box: false,
            music_started: false,
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    pub fn play(&mut self, cue: AudioCue) {
        self.emit(SessionEvent::Audio(cue));
    }

    /// Placement origin, or the world origin before placement.
    pub fn origin_point(&self) -> Vec3 {
        self.origin.map(|p| p.position).unwrap_or(Vec3::ZERO)
    }

    /// Spawn an entity. Loaded visuals hold the barrier until they settle;
    /// the session forgets loads that settle outside population.
    pub fn spawn(
        &mut self,
        role: EntityRole,
        visual: Visual,
        transform: Transform,
        pick_radius: Option<f32>,
        visible: bool,
    ) -> EntityKey {
        let needs_load = visual.needs_load();
        let key = self
            .entities
            .spawn_with(role, visual, transform, pick_radius, visible);
        if needs_load {
            self.barrier.expect(key, true);
        }
        key
    }

    /// Place the otter at `position` and spawn its model.
    pub fn spawn_avatar(&mut self, position: Vec3) -> Result<EntityKey> {
        self.avatar.place(&Pose::new(position))?;
        let key = self.spawn(
            EntityRole::Avatar,
            Visual::Model(self.config.avatar.model),
            self.avatar.transform(),
            None,
            true,
        );
        self.avatar_key = Some(key);
        Ok(key)
    }

    /// Push the controller's transform and opacity to the avatar entity.
    pub fn sync_avatar(&mut self) {
        if let Some(key) = self.avatar_key {
            self.entities.set_transform(key, self.avatar.transform());
            self.entities.set_opacity(key, self.avatar.opacity());
        }
    }

    pub fn start_narration(&mut self) {
        if self.narration.is_started() {
            return;
        }
        self.narration.play(self.config.narration, true);
        self.info_box = true;
        self.play(AudioCue::Narration);
    }

    pub fn set_prompt(&mut self, text: &'static str, duration: Option<f32>) {
        self.prompt = Some(Timed {
            text,
            remaining: duration,
        });
    }

    pub fn show_warning(&mut self, text: &'static str) {
        self.warning = Some(Timed::for_secs(text, WARNING_DURATION_SEC));
    }

    pub fn show_toast(&mut self, text: &'static str) {
        self.toast = Some(Timed::for_secs(text, TOAST_DURATION_SEC));
    }

    /// Where a ray meets the ground sheet, or the placement plane when the
    /// node has no ground.
    pub fn ground_point(&self, ray: &Ray) -> Option<Vec3> {
        match &self.ground {
            Some(g) => g.raycast(ray),
            None => {
                let y = self.origin?.position.y;
                ray_plane_y(ray, y).map(|t| ray.at(t))
            }
        }
    }

    /// Send the otter to wherever the ray meets the ground.
    pub fn steer(&mut self, ray: &Ray) -> bool {
        let Some(point) = self.ground_point(ray) else {
            return false;
        };
        match self.avatar.command_target(point) {
            Ok(()) => {
                log::debug!("[session] steer to {:?}", point);
                true
            }
            Err(e) => {
                log::debug!("[session] steer ignored: {}", e);
                false
            }
        }
    }

    /// Horizontal unit view direction, or -Z when the viewer is unknown.
    pub fn flat_forward(&self) -> Vec3 {
        self.viewer_forward
            .map(|f| Vec3::new(f.x, 0.0, f.z).normalize_or_zero())
            .filter(|f| *f != Vec3::ZERO)
            .unwrap_or(Vec3::NEG_Z)
    }

    fn clear_transients(&mut self) {
        self.prompt = None;
        self.warning = None;
        self.toast = None;
        self.popup = None;
        self.response = None;
        self.retry = None;
    }
}

fn avatar_for(config: &NodeConfig) -> AvatarController {
    AvatarController::new(config.avatar.speed)
        .with_arrival_epsilon(config.avatar.arrival_epsilon)
        .with_facing(config.avatar.facing)
        .with_scale(config.avatar.scale)
}

pub struct NodeSession {
    phase: NodePhase,
    reticle: SurfaceReticle,
    ctx: NodeContext,
    rules: RuleState,
}

impl NodeSession {
    pub fn new(config: &'static NodeConfig, seed: u64) -> Self {
        log::info!("[session] node {} ({})", config.id, config.title);
        Self {
            phase: NodePhase::AwaitingSurface,
            reticle: SurfaceReticle::new(),
            ctx: NodeContext::new(config, seed),
            rules: RuleState::for_config(config),
        }
    }

    pub fn config(&self) -> &'static NodeConfig {
        self.ctx.config
    }

    pub fn phase(&self) -> NodePhase {
        self.phase
    }

    pub fn reticle(&self) -> &SurfaceReticle {
        &self.reticle
    }

    pub fn reticle_mut(&mut self) -> &mut SurfaceReticle {
        &mut self.reticle
    }

    pub fn context(&self) -> &NodeContext {
        &self.ctx
    }

    pub fn rules(&self) -> &RuleState {
        &self.rules
    }

    fn set_phase(&mut self, phase: NodePhase) {
        if self.phase != phase {
            log::info!("[session] {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
            self.ctx.emit(SessionEvent::PhaseChanged(phase));
        }
    }

    /// The XR select gesture: places the scene while the reticle is up,
    /// otherwise acts as a tap along `ray`.
    pub fn select(&mut self, ray: Option<Ray>) -> Result<()> {
        if self.phase.is_placing() {
            return self.place();
        }
        match ray {
            Some(ray) => self.tap(&ray),
            None => Err(SessionError::InvalidPhase(self.phase)),
        }
    }

    /// Commit the reticle pose and populate the node.
    pub fn place(&mut self) -> Result<()> {
        if self.phase != NodePhase::AwaitingPlacement {
            return Err(SessionError::InvalidPhase(self.phase));
        }
        let pose = self
            .reticle
            .current_pose()
            .ok_or(SessionError::NoPlacementPose)?;
        self.reticle.freeze();

        let config = self.ctx.config;
        let mut origin = pose;
        let mut avatar_at = pose.position;
        match config.shift {
            PlacementShift::None => {}
            PlacementShift::SceneTowardViewer(d) => {
                if let Some(viewer) = self.ctx.viewer {
                    let away = (pose.position - viewer) * Vec3::new(1.0, 0.0, 1.0);
                    origin.position -= away.normalize_or_zero() * d;
                }
                avatar_at = origin.position;
            }
            PlacementShift::AvatarTowardViewer(d) => {
                avatar_at = pose.position - self.ctx.flat_forward() * d;
            }
        }
        self.ctx.origin = Some(origin);
        log::info!("[session] placed at {:?}", origin.position);

        if let Some(spec) = config.ground {
            let mut surface = GroundSurface::at_pose(&origin, spec.bend);
            surface.segments = spec.segments;
            self.ctx.ground = Some(surface);
            self.ctx.spawn(
                EntityRole::Ground,
                Visual::Ground {
                    surface,
                    texture: Some(spec.texture),
                },
                Transform::at(surface.center),
                None,
                true,
            );
            if spec.texture.kind == AssetKind::Video {
                self.ctx.emit(SessionEvent::PlayVideo(spec.texture.path));
            }
        }

        if self.rules.places_avatar() {
            self.ctx.spawn_avatar(avatar_at)?;
        }
        self.rules.populate(&mut self.ctx);
        self.set_phase(NodePhase::Populating);
        self.try_activate();
        Ok(())
    }

    /// A screen tap once the node is running.
    pub fn tap(&mut self, ray: &Ray) -> Result<()> {
        if !self.phase.is_running() {
            return Err(SessionError::InvalidPhase(self.phase));
        }
        if let Some(music) = self.ctx.config.music {
            if music.start == MusicStart::FirstTap && !self.ctx.music_started {
                self.ctx.music_started = true;
                self.ctx.play(AudioCue::Element(music.element_id));
            }
        }
        self.rules.on_tap(&mut self.ctx, ray);
        self.settle_gate();
        Ok(())
    }

    pub fn pointer_down(&mut self, ray: &Ray) -> Result<bool> {
        if !self.phase.is_running() {
            return Err(SessionError::InvalidPhase(self.phase));
        }
        Ok(self.rules.on_pointer_down(&mut self.ctx, ray)?)
    }

    pub fn pointer_move(&mut self, ray: &Ray) {
        if self.phase.is_running() {
            self.rules.on_pointer_move(&mut self.ctx, ray);
        }
    }

    pub fn pointer_up(&mut self) {
        if self.phase.is_running() {
            self.rules.on_pointer_up(&mut self.ctx);
            self.settle_gate();
        }
    }

    pub fn ui(&mut self, action: UiAction) -> Result<()> {
        match action {
            UiAction::ShowFact(i) => {
                if let Some(card) = self.ctx.config.facts.get(i).filter(|_| self.ctx.facts_visible) {
                    self.ctx.popup = Some(Popup::from_card(card));
                }
            }
            UiAction::ClosePopup => self.ctx.popup = None,
            UiAction::Retry => {
                if self.ctx.retry.is_none() {
                    return Err(SessionError::InvalidPhase(self.phase));
                }
                match self.rules.reset_kind() {
                    ResetKind::Full => self.reset(),
                    ResetKind::Repopulate => self.repopulate(),
                }
            }
            UiAction::AddTree | UiAction::AddBuilding => {
                if !self.phase.is_running() {
                    return Err(SessionError::InvalidPhase(self.phase));
                }
                self.rules.on_ui(&mut self.ctx, action);
                self.settle_gate();
            }
        }
        Ok(())
    }

    /// Report a load started by a `Spawn` command. A failed model takes its
    /// entity out of play; a failed ground texture leaves the ground bare.
    pub fn asset_settled(&mut self, key: EntityKey, ok: bool) {
        if ok {
            self.ctx.entities.mark_loaded(key);
        } else {
            self.drop_failed(key);
        }
        if self.phase != NodePhase::Populating {
            self.ctx.barrier.forget(key);
            if self.phase.is_running() {
                self.settle_gate();
            }
        } else if self.ctx.barrier.settle(key, ok) {
            self.try_activate();
        }
    }

    fn drop_failed(&mut self, key: EntityKey) {
        let Some(role) = self.ctx.entities.get(key).map(|e| e.role) else {
            return;
        };
        if role == EntityRole::Ground {
            log::warn!("[session] ground texture failed, continuing untextured");
            return;
        }
        log::warn!("[session] asset for {:?} ({:?}) failed, dropping it", key, role);
        self.ctx.entities.despawn(key);
        if self.ctx.avatar_key == Some(key) {
            self.ctx.avatar_key = None;
            self.ctx.avatar.unplace();
        }
        self.rules.on_asset_failed(&mut self.ctx, key);
    }

    pub fn narration_audio_started(&mut self) {
        self.ctx.narration.audio_started();
    }

    pub fn narration_audio_ended(&mut self) {
        self.ctx.narration.audio_ended();
        if let Some(music) = self.ctx.config.music {
            if music.start == MusicStart::AfterNarration && !self.ctx.music_started {
                self.ctx.music_started = true;
                self.ctx.play(AudioCue::Element(music.element_id));
            }
        }
    }

    pub fn narration_audio_failed(&mut self) {
        self.ctx.narration.audio_failed();
    }

    fn try_activate(&mut self) {
        if self.phase != NodePhase::Populating || !self.ctx.barrier.is_open() {
            return;
        }
        if self.ctx.barrier.failed_required() > 0 {
            log::warn!(
                "[session] activating with {} failed asset(s)",
                self.ctx.barrier.failed_required()
            );
        }
        self.ctx.barrier.clear();
        self.set_phase(NodePhase::Active);
        if !self.ctx.narration.is_started() {
            if let Some(p) = self.ctx.config.prompt {
                self.ctx.set_prompt(p.text, p.duration);
            }
            if self.ctx.avatar.is_placed() {
                self.ctx.start_narration();
            }
        }
        self.rules.on_activate(&mut self.ctx);
        self.settle_gate();
    }

    fn settle_gate(&mut self) {
        let change = self.ctx.gate.update(&self.ctx.progress);
        match change {
            GateChange::Unchanged => return,
            GateChange::Shown => {
                log::info!("[session] node {} complete", self.ctx.config.id);
                if self.phase == NodePhase::Active {
                    self.set_phase(NodePhase::Completed);
                }
            }
            GateChange::Hidden => {
                if self.phase == NodePhase::Completed {
                    self.set_phase(NodePhase::Active);
                }
            }
        }
        self.ctx.emit(SessionEvent::GateChanged(change));
    }

    pub fn frame(&mut self, input: &FrameInput) {
        self.ctx.elapsed += input.dt_sec();

        let hit = match input.xr {
            Some(xr) => {
                self.ctx.viewer = xr.viewer_position.or(self.ctx.viewer);
                self.ctx.viewer_forward = xr.viewer_forward.or(self.ctx.viewer_forward);
                xr.hit
            }
            None => None,
        };

        match self.phase {
            NodePhase::Populating => self.try_activate(),
            NodePhase::Active | NodePhase::Completed => self.step(input.dt),
            _ => {}
        }

        self.reticle.update(hit);
        if self.phase.is_placing() {
            let next = if self.reticle.is_visible() {
                NodePhase::AwaitingPlacement
            } else {
                NodePhase::AwaitingSurface
            };
            self.set_phase(next);
        }
    }

    /// One running frame: animation, avatar, zones, node rules, narration.
    fn step(&mut self, delta: Duration) {
        let dt = delta.as_secs_f32();
        self.rules.animate(&mut self.ctx, dt);

        let avatar_pos = self.ctx.avatar.position();
        let blocked = self.ctx.zones.blocking_hazard_at(avatar_pos);
        match self.ctx.avatar.tick(delta, blocked) {
            TickOutcome::Arrived => {
                self.ctx.sync_avatar();
                self.rules.on_arrived(&mut self.ctx);
            }
            TickOutcome::Despawned => {
                if let Some(key) = self.ctx.avatar_key.take() {
                    self.ctx.entities.despawn(key);
                }
                self.rules.on_despawned(&mut self.ctx);
            }
            TickOutcome::Rest => {}
            _ => self.ctx.sync_avatar(),
        }

        if self.ctx.avatar.is_placed() {
            let fired = self.ctx.zones.evaluate(self.ctx.avatar.position());
            for effect in fired {
                self.rules.on_zone(&mut self.ctx, effect);
            }
        }

        self.rules.update(&mut self.ctx, dt);

        let step = self.ctx.narration.tick(delta);
        if step.completed {
            self.ctx.facts_visible = true;
            self.rules.on_narration_done(&mut self.ctx);
        }

        for slot in [&mut self.ctx.prompt, &mut self.ctx.warning, &mut self.ctx.toast] {
            if let Some(t) = slot.as_mut() {
                if !t.tick(dt) {
                    *slot = None;
                }
            }
        }

        self.settle_gate();
    }

    /// Full teardown back to the reticle.
    pub fn reset(&mut self) {
        log::info!("[session] reset node {}", self.ctx.config.id);
        let ctx = &mut self.ctx;
        ctx.entities.clear();
        ctx.zones.clear();
        ctx.barrier.clear();
        ctx.avatar = avatar_for(ctx.config);
        ctx.avatar_key = None;
        ctx.narration.stop();
        ctx.progress = ProgressState::default();
        ctx.gate.reset();
        ctx.origin = None;
        ctx.ground = None;
        ctx.facts_visible = false;
        ctx.info_box = false;
        ctx.clear_transients();
        self.rules = RuleState::for_config(ctx.config);
        self.reticle.unfreeze();
        self.set_phase(NodePhase::AwaitingPlacement);
    }

    /// Keep the ground and the otter; let the rules rebuild their content.
    fn repopulate(&mut self) {
        log::info!("[session] repopulate node {}", self.ctx.config.id);
        self.ctx.clear_transients();
        self.ctx.progress = ProgressState::default();
        self.ctx.barrier.clear();
        self.rules.repopulate(&mut self.ctx);
        self.ctx.sync_avatar();
        self.set_phase(NodePhase::Populating);
        if self.ctx.gate.is_shown() {
            self.ctx.gate.reset();
            self.ctx.emit(SessionEvent::GateChanged(GateChange::Hidden));
        }
        self.try_activate();
    }

    pub fn drain_commands(&mut self) -> Vec<SceneCommand> {
        self.ctx.entities.drain_commands()
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.ctx.events)
    }

    pub fn view(&self) -> ViewState {
        let ctx = &self.ctx;
        let config = ctx.config;
        let mut view = ViewState {
            reticle: self
                .phase
                .is_placing()
                .then(|| self.reticle.current_pose())
                .flatten(),
            prompt: ctx.prompt.map(|t| t.text),
            info_box: ctx.info_box,
            narration: match ctx.response {
                Some(text) => text.to_string(),
                None => ctx.narration.revealed_text(),
            },
            popup: ctx.popup.clone(),
            warning: ctx.warning.map(|t| t.text),
            toast: ctx.toast.map(|t| t.text),
            retry: ctx.retry.map(|label| ActionButton {
                label,
                action: UiAction::Retry,
            }),
            next: if ctx.gate.is_shown() { config.next } else { None },
            back: (!self.phase.is_placing()).then_some(BACK_TO_MAP),
            ..ViewState::default()
        };
        if ctx.facts_visible {
            view.facts = config
                .facts
                .iter()
                .enumerate()
                .map(|(i, card)| ActionButton {
                    label: card.label,
                    action: UiAction::ShowFact(i),
                })
                .collect();
        }
        if ctx.progress.total_items > 0 {
            view.progress = Some(ProgressBar {
                current: ctx.progress.collected,
                total: ctx.progress.total_items,
            });
        }
        if let WinCondition::Balance { threshold } = config.win {
            if self.phase.is_running() {
                view.balance_fill = Some(balance_fill(ctx.progress.trees, ctx.progress.buildings, threshold));
            }
        }
        if self.phase.is_running() {
            view.actions = self.rules.actions();
            view.ripple_scale = self.rules.ripple_scale();
        }
        view
    }
}
