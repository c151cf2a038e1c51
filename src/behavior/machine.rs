use glam::Vec2;

use super::context::{BehaviorContext, PetState};
use crate::config::PetConfig;
use crate::hit_region::{HitRegion, HitRegionPublisher};
use crate::movement::{self, Viewport};
use crate::pet::animation::{AnimationCue, Clip};
use crate::pet::direction::Direction;
use crate::pet::{self, Footprint};

/// Decides, frame by frame, what the pet is doing and where it is.
///
/// All entry points must be called from the same thread, never concurrently.
/// The host drives `tick` once per frame and forwards pointer and resize events.
pub struct BehaviorStateMachine<P: HitRegionPublisher> {
    ctx: BehaviorContext,
    config: PetConfig,
    footprint: Footprint,
    viewport: Viewport,
    rng: fastrand::Rng,
    publisher: P,
}

impl<P: HitRegionPublisher> BehaviorStateMachine<P> {
    /// Place the pet at the centre of `viewport`, idle, and publish its hit region.
    pub fn new(
        config: PetConfig,
        footprint: Footprint,
        viewport: Viewport,
        mut rng: fastrand::Rng,
        publisher: P,
    ) -> Self {
        let spawn = movement::clamp(pet::spawn_position(viewport), viewport, footprint.margin());
        let dwell = config.idle_dwell.sample(&mut rng);
        let machine = Self {
            ctx: BehaviorContext::new(spawn.pos, dwell),
            config,
            footprint,
            viewport,
            rng,
            publisher,
        };
        log::info!(
            "Pet placed at ({:.0}, {:.0}), idle for {:.0}ms",
            spawn.pos.x,
            spawn.pos.y,
            dwell
        );
        machine.publish();
        machine
    }

    #[cfg(test)]
    pub fn context(&self) -> &BehaviorContext {
        &self.ctx
    }

    pub fn state(&self) -> PetState {
        self.ctx.state
    }

    #[cfg(test)]
    pub fn facing(&self) -> Direction {
        self.ctx.facing
    }

    pub fn position(&self) -> Vec2 {
        self.ctx.position
    }

    #[cfg(test)]
    pub fn dwell_remaining_ms(&self) -> f32 {
        self.ctx.dwell_remaining_ms
    }

    #[cfg(test)]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn footprint(&self) -> Footprint {
        self.footprint
    }

    /// Current clickable rectangle.
    pub fn hit_region(&self) -> HitRegion {
        HitRegion::centered(self.ctx.position, self.footprint.hit)
    }

    /// Animation the renderer should show for the current state.
    pub fn animation(&self) -> AnimationCue {
        let (clip, playing) = match self.ctx.state {
            PetState::Idle => (Clip::Idle, true),
            PetState::Walk => (Clip::Walk, true),
            PetState::Dragging => (Clip::Idle, false),
        };
        AnimationCue {
            clip,
            facing: self.ctx.facing,
            playing,
        }
    }

    /// Advance by `delta_ms`. Negative or non-finite deltas count as zero.
    pub fn tick(&mut self, delta_ms: f32) {
        if self.ctx.state == PetState::Dragging {
            return;
        }
        let delta_ms = if delta_ms.is_finite() { delta_ms.max(0.0) } else { 0.0 };

        // A drop or a deferred resize can leave the pet outside the bounds.
        self.settle();

        self.ctx.dwell_remaining_ms -= delta_ms;

        match self.ctx.state {
            PetState::Idle if self.ctx.dwell_remaining_ms <= 0.0 => self.enter_walk(),
            PetState::Walk if self.ctx.dwell_remaining_ms <= 0.0 => self.enter_idle(),
            // Only a pet that was already walking moves; a fresh walk starts next tick.
            PetState::Walk => self.walk(delta_ms),
            _ => {}
        }
    }

    fn walk(&mut self, delta_ms: f32) {
        let delta = movement::step(self.ctx.facing.vector(), self.config.walk_speed, delta_ms);
        let clamped = movement::clamp(
            self.ctx.position + delta,
            self.viewport,
            self.footprint.margin(),
        );
        self.ctx.position = clamped.pos;
        self.publish();

        if clamped.hit {
            log::debug!(
                "Hit the edge at ({:.0}, {:.0}) with {:.0}ms of walk left",
                clamped.pos.x,
                clamped.pos.y,
                self.ctx.dwell_remaining_ms
            );
            self.enter_idle();
        }
    }

    /// Start a drag if `pointer` is inside the hit region. Returns true if it did.
    pub fn on_pointer_down(&mut self, pointer: Vec2) -> bool {
        if self.ctx.state == PetState::Dragging || !self.hit_region().contains(pointer) {
            return false;
        }
        let from = self.ctx.state;
        self.ctx.drag_offset = Some(pointer - self.ctx.position);
        self.ctx.state = PetState::Dragging;
        log::debug!("{} -> Dragging", from.label());
        true
    }

    /// Follow the pointer while dragging. No clamping here.
    pub fn on_pointer_move(&mut self, pointer: Vec2) {
        if self.ctx.state != PetState::Dragging {
            return;
        }
        let offset = self.ctx.drag_offset.unwrap_or(Vec2::ZERO);
        self.ctx.position = pointer - offset;
        self.publish();
    }

    /// Drop the pet.
    pub fn on_pointer_up(&mut self) {
        if self.ctx.state != PetState::Dragging {
            return;
        }
        self.ctx.drag_offset = None;
        self.enter_idle();
        self.publish();
    }

    /// Adopt new bounds and reclamp. While dragging the reclamp waits for the next tick.
    pub fn on_viewport_resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if self.ctx.state == PetState::Dragging {
            log::debug!(
                "Resize to {}x{} during drag, reclamp deferred",
                viewport.width,
                viewport.height
            );
            return;
        }
        self.ctx.position =
            movement::clamp(self.ctx.position, self.viewport, self.footprint.margin()).pos;
        self.publish();
    }

    /// New display scale: resize the footprint, then reclamp like a resize.
    pub fn on_footprint_changed(&mut self, footprint: Footprint) {
        self.footprint = footprint;
        self.on_viewport_resize(self.viewport);
    }

    fn enter_walk(&mut self) {
        let dir = Direction::random(&mut self.rng);
        self.ctx.facing = dir;
        self.ctx.dwell_remaining_ms = self.config.walk_dwell.sample(&mut self.rng);
        self.ctx.state = PetState::Walk;
        log::debug!(
            "Idle -> Walk facing {:?}, {:.0}ms",
            dir,
            self.ctx.dwell_remaining_ms
        );
    }

    fn enter_idle(&mut self) {
        let from = self.ctx.state;
        self.ctx.dwell_remaining_ms = self.config.idle_dwell.sample(&mut self.rng);
        self.ctx.state = PetState::Idle;
        log::debug!(
            "{} -> Idle facing {:?}, {:.0}ms",
            from.label(),
            self.ctx.facing,
            self.ctx.dwell_remaining_ms
        );
    }

    /// Pull the pet back inside the bounds without changing state.
    fn settle(&mut self) {
        let clamped = movement::clamp(self.ctx.position, self.viewport, self.footprint.margin());
        if clamped.hit {
            self.ctx.position = clamped.pos;
            self.publish();
        }
    }

    fn publish(&self) {
        self.publisher.publish(self.hit_region());
    }

    #[cfg(test)]
    pub(crate) fn context_mut(&mut self) -> &mut BehaviorContext {
        &mut self.ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hit_region::testing::RecordingPublisher;

    const VIEW: Viewport = Viewport::new(800.0, 600.0);

    fn machine(seed: u64) -> (BehaviorStateMachine<RecordingPublisher>, RecordingPublisher) {
        let config = PetConfig::default();
        let footprint = Footprint::from_config(&config, 1.0);
        let publisher = RecordingPublisher::default();
        let m = BehaviorStateMachine::new(
            config,
            footprint,
            VIEW,
            fastrand::Rng::with_seed(seed),
            publisher.clone(),
        );
        (m, publisher)
    }

    fn in_bounds(m: &BehaviorStateMachine<RecordingPublisher>) -> bool {
        let margin = m.footprint().margin();
        let p = m.position();
        let v = m.viewport();
        p.x >= margin.x
            && p.x <= v.width - margin.x
            && p.y >= margin.y
            && p.y <= v.height - margin.y
    }

    #[test]
    fn starts_idle_in_the_middle_and_publishes_once() {
        let (m, publisher) = machine(1);
        assert_eq!(m.state(), PetState::Idle);
        assert_eq!(m.position(), Vec2::new(400.0, 300.0));
        assert!(PetConfig::default().idle_dwell.contains(m.dwell_remaining_ms()));
        assert_eq!(publisher.count(), 1);
        assert_eq!(publisher.last(), Some(m.hit_region()));
    }

    #[test]
    fn idle_expiry_starts_walking() {
        let (mut m, _) = machine(2);
        m.context_mut().dwell_remaining_ms = 500.0;
        m.tick(500.0);
        assert_eq!(m.state(), PetState::Walk);
        assert!(PetConfig::default().walk_dwell.contains(m.dwell_remaining_ms()));
        assert!((1..=8).contains(&m.facing().index()));
        assert_eq!(m.animation().key(), format!("walk_{}", m.facing().index()));
    }

    #[test]
    fn idle_expiry_at_edge_still_walks() {
        for seed in 0..16 {
            let (mut m, _) = machine(seed);
            let start = Vec2::new(VIEW.width - m.footprint().margin().x, 300.0);
            {
                let ctx = m.context_mut();
                ctx.position = start;
                ctx.dwell_remaining_ms = 500.0;
            }
            m.tick(500.0);
            assert_eq!(m.state(), PetState::Walk, "seed {seed} facing {:?}", m.facing());
            assert!(PetConfig::default().walk_dwell.contains(m.dwell_remaining_ms()));
            assert_eq!(m.position(), start);
        }
    }

    #[test]
    fn fresh_walk_moves_on_the_next_tick() {
        let (mut m, publisher) = machine(20);
        m.context_mut().dwell_remaining_ms = 16.0;
        m.tick(16.0);
        assert_eq!(m.state(), PetState::Walk);
        assert_eq!(m.position(), Vec2::new(400.0, 300.0));
        assert_eq!(publisher.count(), 1);

        let dwell = m.dwell_remaining_ms();
        m.tick(100.0);
        assert_eq!(m.state(), PetState::Walk);
        assert_ne!(m.position(), Vec2::new(400.0, 300.0));
        assert_eq!(m.dwell_remaining_ms(), dwell - 100.0);
        assert_eq!(publisher.count(), 2);
    }

    #[test]
    fn walk_expiry_goes_idle_without_moving() {
        let (mut m, _) = machine(3);
        {
            let ctx = m.context_mut();
            ctx.state = PetState::Walk;
            ctx.facing = Direction::North;
            ctx.dwell_remaining_ms = 10.0;
        }
        let before = m.position();
        m.tick(16.0);
        assert_eq!(m.state(), PetState::Idle);
        assert_eq!(m.position(), before);
        assert_eq!(m.facing(), Direction::North);
        assert!(PetConfig::default().idle_dwell.contains(m.dwell_remaining_ms()));
        assert_eq!(m.animation().key(), "idle_4");
    }

    #[test]
    fn walking_moves_along_facing_and_publishes() {
        let (mut m, publisher) = machine(4);
        {
            let ctx = m.context_mut();
            ctx.state = PetState::Walk;
            ctx.facing = Direction::East;
            ctx.dwell_remaining_ms = 5000.0;
        }
        m.tick(500.0);
        assert_eq!(m.state(), PetState::Walk);
        assert_eq!(m.position(), Vec2::new(430.0, 300.0));
        assert_eq!(m.dwell_remaining_ms(), 4500.0);
        assert_eq!(publisher.count(), 2);
    }

    #[test]
    fn edge_collision_preempts_dwell() {
        let (mut m, _) = machine(5);
        let margin = m.footprint().margin().x;
        {
            let ctx = m.context_mut();
            ctx.state = PetState::Walk;
            ctx.facing = Direction::from_index(6);
            ctx.dwell_remaining_ms = 10_000.0;
            ctx.position = Vec2::new(VIEW.width - margin - 1.0, 300.0);
        }
        m.tick(34.0);
        assert_eq!(m.position().x, VIEW.width - margin);
        assert_eq!(m.state(), PetState::Idle);
        assert!(PetConfig::default().idle_dwell.contains(m.dwell_remaining_ms()));
    }

    #[test]
    fn negative_delta_counts_as_zero() {
        let (mut m, _) = machine(6);
        let before = m.dwell_remaining_ms();
        m.tick(-250.0);
        m.tick(f32::NAN);
        assert_eq!(m.dwell_remaining_ms(), before);
        assert_eq!(m.state(), PetState::Idle);
    }

    #[test]
    fn dwell_never_increases_within_a_phase() {
        let (mut m, _) = machine(7);
        let mut last = m.dwell_remaining_ms();
        for _ in 0..50 {
            m.tick(16.0);
            assert!(m.dwell_remaining_ms() <= last);
            last = m.dwell_remaining_ms();
        }
    }

    #[test]
    fn stays_in_bounds_over_long_runs() {
        let (mut m, _) = machine(8);
        let mut deltas = fastrand::Rng::with_seed(99);
        let mut saw_walk = false;
        for _ in 0..20_000 {
            m.tick(deltas.f32() * 100.0);
            saw_walk |= m.state() == PetState::Walk;
            assert!(in_bounds(&m), "out of bounds at {:?}", m.position());
        }
        assert!(saw_walk);
    }

    #[test]
    fn pointer_down_outside_is_ignored() {
        let (mut m, _) = machine(9);
        assert!(!m.on_pointer_down(Vec2::new(10.0, 10.0)));
        assert_eq!(m.state(), PetState::Idle);
        assert_eq!(m.context().drag_offset, None);
    }

    #[test]
    fn pointer_down_on_the_region_edge_grabs() {
        let (mut m, _) = machine(21);
        let r = m.hit_region();
        let corner = Vec2::new(r.x + r.width * 0.5, r.y - r.height * 0.5);
        assert!(m.on_pointer_down(corner));
        assert_eq!(m.state(), PetState::Dragging);
        assert_eq!(m.context().drag_offset, Some(corner - m.position()));
    }

    #[test]
    fn dragging_freezes_dwell_and_stops_animation() {
        let (mut m, _) = machine(10);
        let dwell = m.dwell_remaining_ms();
        assert!(m.on_pointer_down(m.position()));
        for _ in 0..100 {
            m.tick(1000.0);
        }
        assert_eq!(m.state(), PetState::Dragging);
        assert_eq!(m.dwell_remaining_ms(), dwell);
        let cue = m.animation();
        assert!(!cue.playing);
        assert_eq!(cue.clip, Clip::Idle);
    }

    #[test]
    fn drag_round_trip() {
        let (mut m, publisher) = machine(11);
        let grab = m.position() + Vec2::new(5.0, 3.0);
        assert!(m.on_pointer_down(grab));
        assert_eq!(m.context().drag_offset, Some(Vec2::new(5.0, 3.0)));

        m.on_pointer_move(Vec2::new(200.0, 150.0));
        m.on_pointer_move(Vec2::new(300.0, 200.0));
        assert_eq!(publisher.count(), 3);

        m.on_pointer_up();
        assert_eq!(m.position(), Vec2::new(295.0, 197.0));
        assert_eq!(m.state(), PetState::Idle);
        assert_eq!(m.context().drag_offset, None);
        assert!(PetConfig::default().idle_dwell.contains(m.dwell_remaining_ms()));
        assert_eq!(publisher.count(), 4);
    }

    #[test]
    fn walking_pet_can_be_grabbed() {
        let (mut m, _) = machine(12);
        m.context_mut().state = PetState::Walk;
        assert!(m.on_pointer_down(m.position()));
        assert_eq!(m.state(), PetState::Dragging);
        assert!(!m.on_pointer_down(m.position()));
    }

    #[test]
    fn drag_ignores_bounds_until_next_tick() {
        let (mut m, publisher) = machine(13);
        assert!(m.on_pointer_down(m.position()));
        m.on_pointer_move(Vec2::new(-50.0, 900.0));
        assert_eq!(m.position(), Vec2::new(-50.0, 900.0));
        m.on_pointer_up();
        assert_eq!(m.position(), Vec2::new(-50.0, 900.0));

        let published = publisher.count();
        m.tick(1.0);
        assert!(in_bounds(&m));
        assert_eq!(m.state(), PetState::Idle);
        assert_eq!(publisher.count(), published + 1);
    }

    #[test]
    fn pointer_move_and_up_need_a_drag() {
        let (mut m, publisher) = machine(14);
        let before = *m.context();
        m.on_pointer_move(Vec2::new(1.0, 1.0));
        m.on_pointer_up();
        assert_eq!(*m.context(), before);
        assert_eq!(publisher.count(), 1);
    }

    #[test]
    fn resize_only_moves_when_needed() {
        let (mut m, publisher) = machine(15);
        m.context_mut().state = PetState::Walk;
        m.context_mut().dwell_remaining_ms = 1234.0;

        m.on_viewport_resize(Viewport::new(1920.0, 1080.0));
        assert_eq!(m.position(), Vec2::new(400.0, 300.0));

        m.on_viewport_resize(Viewport::new(300.0, 200.0));
        assert_eq!(m.position(), Vec2::new(236.0, 136.0));
        assert_eq!(m.state(), PetState::Walk);
        assert_eq!(m.dwell_remaining_ms(), 1234.0);
        assert_eq!(publisher.count(), 3);
    }

    #[test]
    fn resize_is_idempotent() {
        let (mut m, _) = machine(16);
        m.context_mut().position = Vec2::new(700.0, 500.0);
        let small = Viewport::new(500.0, 400.0);
        m.on_viewport_resize(small);
        let once = m.position();
        m.on_viewport_resize(small);
        assert_eq!(m.position(), once);
    }

    #[test]
    fn resize_during_drag_is_deferred() {
        let (mut m, publisher) = machine(17);
        assert!(m.on_pointer_down(m.position()));
        let published = publisher.count();
        m.on_viewport_resize(Viewport::new(200.0, 200.0));
        assert_eq!(m.position(), Vec2::new(400.0, 300.0));
        assert_eq!(publisher.count(), published);

        m.on_pointer_up();
        m.tick(0.0);
        assert_eq!(m.position(), Vec2::new(136.0, 136.0));
    }

    #[test]
    fn footprint_change_republishes() {
        let (mut m, publisher) = machine(18);
        let bigger = Footprint::from_config(&PetConfig::default(), 2.0);
        m.on_footprint_changed(bigger);
        assert_eq!(publisher.count(), 2);
        assert_eq!(publisher.last().map(|r| r.width), Some(bigger.hit.x));
    }

    #[test]
    fn same_seed_same_wandering() {
        let (mut a, _) = machine(19);
        let (mut b, _) = machine(19);
        for _ in 0..2000 {
            a.tick(16.0);
            b.tick(16.0);
        }
        assert_eq!(a.context(), b.context());
    }
}
