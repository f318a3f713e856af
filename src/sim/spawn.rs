//! Enemy population: edge spawning, caps, escalation, culling and wrap
//!
//! Two classes are scheduled independently. Mobs wrap forward once they fall
//! behind the player; dashers are culled once they leave the screen for good.
//! Both decisions use two-tier bounds so an enemy skimming the viewport edge
//! is not removed or relocated on a single frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::enemy::{Enemy, EnemyKind};
use super::player::Player;
use super::rng::RandomSource;
use super::state::GameEvent;
use crate::config::{ClassPowerupConfig, EnemiesConfig, SpawnConfig, Trim};

/// Tight bound around the viewport; entering it arms culling and wrapping (px)
pub const STRICT_MARGIN_PX: f32 = 24.0;
/// Loose bound a dasher must leave before it can be culled (px)
pub const CULL_MARGIN_PX: f32 = 96.0;
/// Distance outside the viewport where new enemies appear (px)
pub const SPAWN_MARGIN_PX: f32 = 32.0;
/// Wrap placement bound (px)
pub const WRAP_MARGIN_PX: f32 = 64.0;
/// Keeps wrapped enemies away from the viewport corners (px)
pub const WRAP_EDGE_PAD_PX: f32 = 32.0;
/// Continuous time outside the loose bound before a dasher is culled
pub const CULL_DELAY_MS: f32 = 300.0;
/// Continuous time outside the strict bound before a mob wraps
pub const WRAP_DELAY_MS: f32 = 800.0;

/// Rectangle in world pixels, inclusive on every side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl ViewBounds {
    /// The viewport grown by `margin` on every side
    pub fn around(camera: &Camera, margin: f32) -> Self {
        let offset = camera.offset_px();
        let view = camera.view_size();
        Self {
            left: offset.x - margin,
            top: offset.y - margin,
            right: offset.x + view.x + margin,
            bottom: offset.y + view.y + margin,
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    pub fn outside(&self, p: Vec2) -> bool {
        !self.contains(p)
    }
}

/// Per-enemy off-screen hysteresis state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OffscreenTracker {
    /// Set once the enemy has been inside the strict bound
    pub entered: bool,
    /// Current continuous off-screen streak (ms)
    pub offscreen_ms: f32,
}

impl OffscreenTracker {
    /// Cull rule; returns true when the enemy should be removed
    ///
    /// Only a streak spent outside `large` counts, and the streak restarts
    /// whenever the enemy is back inside it.
    pub fn observe_cull(
        &mut self,
        pos: Vec2,
        strict: &ViewBounds,
        large: &ViewBounds,
        dt: f32,
        delay_ms: f32,
    ) -> bool {
        if strict.contains(pos) {
            self.entered = true;
            self.offscreen_ms = 0.0;
            return false;
        }
        if !self.entered {
            return false;
        }
        if large.outside(pos) {
            self.offscreen_ms += dt;
            self.offscreen_ms >= delay_ms
        } else {
            self.offscreen_ms = 0.0;
            false
        }
    }

    /// Wrap rule; returns true when the enemy should be relocated
    pub fn observe_wrap(&mut self, pos: Vec2, strict: &ViewBounds, dt: f32, delay_ms: f32) -> bool {
        if strict.contains(pos) {
            self.entered = true;
            self.offscreen_ms = 0.0;
            return false;
        }
        if !self.entered {
            return false;
        }
        self.offscreen_ms += dt;
        self.offscreen_ms >= delay_ms
    }
}

/// Where a wrapped enemy reappears (px)
///
/// The enemy lands beyond the wrap bound on the side the player is heading
/// toward, keeping its coordinate along the other axis plus jitter.
pub fn wrap_position(pos: Vec2, wrap: &ViewBounds, heading: Vec2, jitter_unit: f32) -> Vec2 {
    let pad = WRAP_EDGE_PAD_PX;
    let jitter = (jitter_unit - 0.5) * pad * 2.0;
    if heading.y.abs() >= heading.x.abs() {
        let x = (pos.x + jitter).max(wrap.left + pad).min(wrap.right - pad);
        let y = if heading.y < 0.0 {
            wrap.top - WRAP_MARGIN_PX
        } else {
            wrap.bottom + WRAP_MARGIN_PX
        };
        Vec2::new(x, y)
    } else {
        let y = (pos.y + jitter).max(wrap.top + pad).min(wrap.bottom - pad);
        let x = if heading.x > 0.0 {
            wrap.right + WRAP_MARGIN_PX
        } else {
            wrap.left - WRAP_MARGIN_PX
        };
        Vec2::new(x, y)
    }
}

/// Evolving parameters of one enemy class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassTuning {
    /// Base speed for new spawns (m/s)
    pub speed_mps: f32,
    pub max_count: u32,
    pub interval_ms: f32,
    /// Per-tick (mob) or per-hit (dash) damage for new spawns
    pub damage: f32,
}

impl ClassTuning {
    fn new(speed_mps: f32, spawn: &SpawnConfig, damage: f32) -> Self {
        Self {
            speed_mps,
            max_count: spawn.max_count,
            interval_ms: spawn.interval_ms,
            damage,
        }
    }

    fn escalate(&mut self, powerup: &ClassPowerupConfig, speed_delta: f32, interval_min_ms: f32) {
        self.speed_mps += speed_delta;
        self.max_count = self.max_count.saturating_add(powerup.max_count_delta);
        self.interval_ms = (self.interval_ms - powerup.interval_delta_ms).max(interval_min_ms);
        self.damage += powerup.damage_delta;
    }
}

/// Run-owned difficulty, raised on every power-up step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub mob: ClassTuning,
    pub dash: ClassTuning,
    /// Power-up steps applied so far
    pub steps: u32,
}

impl Difficulty {
    pub fn new(config: &EnemiesConfig) -> Self {
        Self {
            mob: ClassTuning::new(
                config.mob.move_speed_mps,
                &config.mob.spawn,
                config.mob.damage_per_tick,
            ),
            dash: ClassTuning::new(
                config.dash.move_speed_mps,
                &config.dash.spawn,
                config.dash.damage_per_hit,
            ),
            steps: 0,
        }
    }

    pub fn class(&self, kind: EnemyKind) -> &ClassTuning {
        match kind {
            EnemyKind::Mob => &self.mob,
            EnemyKind::Dash => &self.dash,
        }
    }

    /// Speed increment for a class on each power-up step (m/s)
    pub fn speed_delta(config: &EnemiesConfig, kind: EnemyKind) -> f32 {
        let class = match kind {
            EnemyKind::Mob => &config.mob.powerup,
            EnemyKind::Dash => &config.dash.powerup,
        };
        class
            .speed_delta_mps
            .unwrap_or(config.powerup.speed_delta_mps)
    }

    fn damage_delta(config: &EnemiesConfig, kind: EnemyKind) -> f32 {
        match kind {
            EnemyKind::Mob => config.mob.powerup.damage_delta,
            EnemyKind::Dash => config.dash.powerup.damage_delta,
        }
    }

    /// Raise both class baselines by one step
    pub fn escalate(&mut self, config: &EnemiesConfig) {
        let floor = config.powerup.interval_min_ms;
        self.mob.escalate(
            &config.mob.powerup,
            Self::speed_delta(config, EnemyKind::Mob),
            floor,
        );
        self.dash.escalate(
            &config.dash.powerup,
            Self::speed_delta(config, EnemyKind::Dash),
            floor,
        );
        self.steps += 1;
    }
}

/// Per-update inputs the scheduler only reads
pub struct SpawnContext<'a> {
    pub config: &'a EnemiesConfig,
    pub camera: &'a Camera,
    pub player_trim: &'a Trim,
    /// Player's last non-zero movement direction
    pub heading: Vec2,
}

/// Owns the live enemy list and every enemy timer
#[derive(Debug, Clone, Default)]
pub struct SpawnScheduler {
    /// Live enemies in spawn order
    pub enemies: Vec<Enemy>,
    mob_timer_ms: f32,
    dash_timer_ms: f32,
    powerup_timer_ms: f32,
    dash_enabled: bool,
    next_id: u32,
}

impl SpawnScheduler {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    pub fn count(&self, kind: EnemyKind) -> usize {
        self.enemies.iter().filter(|e| e.kind == kind).count()
    }

    pub fn dash_enabled(&self) -> bool {
        self.dash_enabled
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Uniform point on one viewport edge, pushed out by the spawn margin (px)
    fn edge_point(camera: &Camera, rng: &mut dyn RandomSource) -> Vec2 {
        let offset = camera.offset_px();
        let view = camera.view_size();
        let edge = rng.index(4);
        let mut p = offset + Vec2::new(rng.unit() * view.x, rng.unit() * view.y);
        match edge {
            0 => p.y = offset.y - SPAWN_MARGIN_PX,
            1 => p.x = offset.x + view.x + SPAWN_MARGIN_PX,
            2 => p.y = offset.y + view.y + SPAWN_MARGIN_PX,
            _ => p.x = offset.x - SPAWN_MARGIN_PX,
        }
        p
    }

    pub fn spawn_mob(
        &mut self,
        ctx: &SpawnContext,
        difficulty: &Difficulty,
        rng: &mut dyn RandomSource,
    ) {
        let pos = crate::to_meters(Self::edge_point(ctx.camera, rng));
        let id = self.next_id();
        let tuning = &difficulty.mob;
        self.enemies.push(Enemy::mob(
            id,
            pos,
            &ctx.config.mob,
            tuning.speed_mps,
            tuning.damage,
        ));
        log::debug!("Spawned mob {} at ({:.1}, {:.1})m", id, pos.x, pos.y);
    }

    pub fn spawn_dash(
        &mut self,
        ctx: &SpawnContext,
        difficulty: &Difficulty,
        rng: &mut dyn RandomSource,
    ) {
        let pos = crate::to_meters(Self::edge_point(ctx.camera, rng));
        let variants = &ctx.config.dash.variants;
        let variant = (!variants.is_empty()).then(|| variants[rng.index(variants.len())].clone());
        let id = self.next_id();
        let tuning = &difficulty.dash;
        self.enemies.push(Enemy::dash(
            id,
            pos,
            &ctx.config.dash,
            tuning.speed_mps,
            tuning.damage,
            variant,
        ));
        log::debug!("Spawned dash {} at ({:.1}, {:.1})m", id, pos.x, pos.y);
    }

    /// Top up the mob class to its initial count
    pub fn ensure_initial(
        &mut self,
        ctx: &SpawnContext,
        difficulty: &Difficulty,
        rng: &mut dyn RandomSource,
    ) {
        let initial = ctx.config.mob.spawn.initial_count as usize;
        for _ in self.count(EnemyKind::Mob)..initial {
            self.spawn_mob(ctx, difficulty, rng);
        }
    }

    /// Advance all timers, spawn, escalate, update enemies, cull and wrap
    pub fn update(
        &mut self,
        dt: f32,
        ctx: &SpawnContext,
        difficulty: &mut Difficulty,
        player: &mut Player,
        rng: &mut dyn RandomSource,
        events: &mut Vec<GameEvent>,
    ) {
        self.mob_timer_ms += dt;
        self.dash_timer_ms += dt;
        self.powerup_timer_ms += dt;

        // The interval is consumed even at the cap, so freed capacity does
        // not release a burst of queued spawns
        if self.mob_timer_ms >= difficulty.mob.interval_ms {
            self.mob_timer_ms -= difficulty.mob.interval_ms;
            if self.count(EnemyKind::Mob) < difficulty.mob.max_count as usize {
                self.spawn_mob(ctx, difficulty, rng);
            }
        }

        if !self.dash_enabled && difficulty.dash.max_count > 0 {
            self.dash_enabled = true;
            let count = ctx.config.dash.spawn.initial_count;
            for _ in 0..count {
                self.spawn_dash(ctx, difficulty, rng);
            }
            self.dash_timer_ms = 0.0;
            log::info!("Dash class activated with {} initial spawns", count);
            events.push(GameEvent::DashClassActivated { count });
        }
        if self.dash_enabled && self.dash_timer_ms >= difficulty.dash.interval_ms {
            self.dash_timer_ms -= difficulty.dash.interval_ms;
            if self.count(EnemyKind::Dash) < difficulty.dash.max_count as usize {
                self.spawn_dash(ctx, difficulty, rng);
            }
        }

        let powerup_ms = ctx.config.powerup.interval_sec * 1000.0;
        if powerup_ms > 0.0 && self.powerup_timer_ms >= powerup_ms {
            self.powerup_timer_ms -= powerup_ms;
            self.power_up(ctx.config, difficulty, events);
        }

        let strict = ViewBounds::around(ctx.camera, STRICT_MARGIN_PX);
        let large = ViewBounds::around(ctx.camera, CULL_MARGIN_PX);
        self.enemies.retain_mut(|e| {
            e.update(dt, player, ctx.player_trim, events);
            if e.is_expired() {
                log::debug!("Enemy {} expired", e.id);
                return false;
            }
            if e.kind == EnemyKind::Dash
                && e.offscreen
                    .observe_cull(e.pos_px(), &strict, &large, dt, CULL_DELAY_MS)
            {
                log::debug!("Enemy {} culled off-screen", e.id);
                return false;
            }
            true
        });

        let wrap = ViewBounds::around(ctx.camera, WRAP_MARGIN_PX);
        for e in self.enemies.iter_mut().filter(|e| e.kind == EnemyKind::Mob) {
            let pos = e.pos_px();
            if e.offscreen.observe_wrap(pos, &strict, dt, WRAP_DELAY_MS) {
                let target = wrap_position(pos, &wrap, ctx.heading, rng.unit());
                e.relocate(target);
            }
        }
    }

    /// One difficulty escalation step: live enemies and class baselines
    fn power_up(&mut self, config: &EnemiesConfig, difficulty: &mut Difficulty, events: &mut Vec<GameEvent>) {
        for e in &mut self.enemies {
            e.speed_mps += Difficulty::speed_delta(config, e.kind);
            e.add_damage(Difficulty::damage_delta(config, e.kind));
        }
        difficulty.escalate(config);
        log::info!(
            "Power-up step {}: mob cap {} every {:.0}ms, dash cap {} every {:.0}ms",
            difficulty.steps,
            difficulty.mob.max_count,
            difficulty.mob.interval_ms,
            difficulty.dash.max_count,
            difficulty.dash.interval_ms
        );
        events.push(GameEvent::PowerUp {
            step: difficulty.steps,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CameraConfig, PlayerConfig};
    use crate::sim::rng::ScriptedRng;

    fn camera() -> Camera {
        // Viewport (0,0)-(1000,500) px
        let mut cam = Camera::new(&CameraConfig::default());
        cam.set_view_size(1000.0, 500.0);
        cam.pos = Vec2::ZERO;
        cam
    }

    fn bounds(margin: f32) -> ViewBounds {
        ViewBounds::around(&camera(), margin)
    }

    #[test]
    fn test_view_bounds_inclusive() {
        let b = bounds(STRICT_MARGIN_PX);
        assert!(b.contains(Vec2::new(-24.0, -24.0)));
        assert!(b.contains(Vec2::new(1024.0, 524.0)));
        assert!(b.outside(Vec2::new(1024.1, 0.0)));
    }

    #[test]
    fn test_wrap_requires_entry_first() {
        let strict = bounds(STRICT_MARGIN_PX);
        let mut t = OffscreenTracker::default();
        let far = Vec2::new(-500.0, 0.0);
        for _ in 0..100 {
            assert!(!t.observe_wrap(far, &strict, 100.0, WRAP_DELAY_MS));
        }
    }

    #[test]
    fn test_wrap_after_continuous_streak() {
        let strict = bounds(STRICT_MARGIN_PX);
        let mut t = OffscreenTracker::default();
        let inside = Vec2::new(500.0, 250.0);
        let outside = Vec2::new(-100.0, 250.0);

        assert!(!t.observe_wrap(inside, &strict, 10.0, WRAP_DELAY_MS));
        for _ in 0..79 {
            assert!(!t.observe_wrap(outside, &strict, 10.0, WRAP_DELAY_MS));
        }
        // Re-entering restarts the count
        assert!(!t.observe_wrap(inside, &strict, 10.0, WRAP_DELAY_MS));
        for _ in 0..79 {
            assert!(!t.observe_wrap(outside, &strict, 10.0, WRAP_DELAY_MS));
        }
        assert!(t.observe_wrap(outside, &strict, 10.0, WRAP_DELAY_MS));
    }

    #[test]
    fn test_cull_only_counts_outside_large_bound() {
        let strict = bounds(STRICT_MARGIN_PX);
        let large = bounds(CULL_MARGIN_PX);
        let mut t = OffscreenTracker::default();
        assert!(!t.observe_cull(Vec2::new(10.0, 10.0), &strict, &large, 10.0, CULL_DELAY_MS));

        // Between the bounds: never culled
        let between = Vec2::new(-50.0, 10.0);
        for _ in 0..100 {
            assert!(!t.observe_cull(between, &strict, &large, 10.0, CULL_DELAY_MS));
        }

        let far = Vec2::new(-200.0, 10.0);
        for _ in 0..29 {
            assert!(!t.observe_cull(far, &strict, &large, 10.0, CULL_DELAY_MS));
        }
        assert!(t.observe_cull(far, &strict, &large, 10.0, CULL_DELAY_MS));
    }

    #[test]
    fn test_wrap_position_moving_up_lands_above() {
        let wrap = bounds(WRAP_MARGIN_PX);
        let p = wrap_position(Vec2::new(500.0, 900.0), &wrap, Vec2::NEG_Y, 0.5);
        assert_eq!(p, Vec2::new(500.0, -64.0 - 64.0));
    }

    #[test]
    fn test_wrap_position_clamps_jitter_inside_extent() {
        let wrap = bounds(WRAP_MARGIN_PX);
        let p = wrap_position(Vec2::new(-2000.0, 100.0), &wrap, Vec2::Y, 0.0);
        assert_eq!(p.x, wrap.left + WRAP_EDGE_PAD_PX);
        assert_eq!(p.y, wrap.bottom + WRAP_MARGIN_PX);

        let p = wrap_position(Vec2::new(100.0, 100.0), &wrap, Vec2::NEG_X, 0.5);
        assert_eq!(p, Vec2::new(wrap.left - WRAP_MARGIN_PX, 100.0));
    }

    #[test]
    fn test_escalation_floors_interval() {
        let config = EnemiesConfig::default();
        let mut d = Difficulty::new(&config);
        for _ in 0..50 {
            d.escalate(&config);
        }
        assert_eq!(d.mob.interval_ms, config.powerup.interval_min_ms);
        assert_eq!(d.dash.interval_ms, config.powerup.interval_min_ms);
        assert_eq!(d.mob.max_count, 8 + 50 * 3);
        assert_eq!(d.dash.speed_mps, 10.0 + 50.0 * 10.0);
        assert_eq!(d.dash.damage, 15.0 + 50.0 * 2.0);
    }

    #[test]
    fn test_global_speed_delta_without_override() {
        let mut config = EnemiesConfig::default();
        config.mob.powerup.speed_delta_mps = None;
        assert_eq!(Difficulty::speed_delta(&config, EnemyKind::Mob), 2.0);
        assert_eq!(Difficulty::speed_delta(&config, EnemyKind::Dash), 10.0);
    }

    struct Fixture {
        config: EnemiesConfig,
        camera: Camera,
        trim: Trim,
        player: Player,
        difficulty: Difficulty,
        rng: ScriptedRng,
        events: Vec<GameEvent>,
        heading: Vec2,
    }

    impl Fixture {
        fn new(config: EnemiesConfig) -> Self {
            let difficulty = Difficulty::new(&config);
            Self {
                config,
                camera: camera(),
                trim: PlayerConfig::default().collider,
                // Well inside the viewport so nothing reaches it quickly
                player: Player::new(&PlayerConfig::default(), Vec2::new(50.0, 25.0)),
                difficulty,
                rng: ScriptedRng::new(&[0.0, 0.5, 0.5]),
                events: Vec::new(),
                heading: Vec2::Y,
            }
        }

        fn update(&mut self, spawns: &mut SpawnScheduler, dt: f32) {
            let ctx = SpawnContext {
                config: &self.config,
                camera: &self.camera,
                player_trim: &self.trim,
                heading: self.heading,
            };
            spawns.update(
                dt,
                &ctx,
                &mut self.difficulty,
                &mut self.player,
                &mut self.rng,
                &mut self.events,
            );
        }
    }

    /// Fixture with class spawning and power-ups switched off
    fn quiet() -> Fixture {
        let mut config = EnemiesConfig::default();
        config.mob.spawn.max_count = 0;
        config.mob.lifetime_sec = 1.0;
        config.powerup.interval_sec = 0.0;
        Fixture::new(config)
    }

    #[test]
    fn test_update_removes_expired_enemy() {
        let mut f = quiet();
        let mut spawns = SpawnScheduler::new();
        spawns
            .enemies
            .push(Enemy::mob(1, Vec2::new(10.0, 10.0), &f.config.mob, 0.0, 5.0));

        for _ in 0..99 {
            f.update(&mut spawns, 10.0);
        }
        assert_eq!(spawns.enemies.len(), 1);
        f.update(&mut spawns, 10.0);
        assert!(spawns.enemies.is_empty());
    }

    #[test]
    fn test_update_culls_dash_beyond_large_bound() {
        let mut f = quiet();
        let mut spawns = SpawnScheduler::new();
        // (-200, 10) px: outside the cull bound on the left
        let mut dash = Enemy::dash(1, Vec2::new(-20.0, 1.0), &f.config.dash, 0.0, 5.0, None);
        dash.offscreen.entered = true;
        spawns.enemies.push(dash);

        for _ in 0..29 {
            f.update(&mut spawns, 10.0);
        }
        assert_eq!(spawns.count(EnemyKind::Dash), 1);
        f.update(&mut spawns, 10.0);
        assert_eq!(spawns.count(EnemyKind::Dash), 0);
    }

    #[test]
    fn test_update_wraps_mob_ahead_of_player() {
        let mut f = quiet();
        f.config.mob.lifetime_sec = 0.0;
        f.heading = Vec2::NEG_Y;
        f.rng = ScriptedRng::constant(0.5);
        let mut spawns = SpawnScheduler::new();
        // (500, 900) px: below the viewport
        let mut mob = Enemy::mob(1, Vec2::new(50.0, 90.0), &f.config.mob, 0.0, 5.0);
        mob.offscreen.entered = true;
        spawns.enemies.push(mob);

        for _ in 0..79 {
            f.update(&mut spawns, 10.0);
        }
        assert_eq!(spawns.enemies[0].pos, Vec2::new(50.0, 90.0));
        f.update(&mut spawns, 10.0);

        let e = &spawns.enemies[0];
        assert!(e.pos_px().abs_diff_eq(Vec2::new(500.0, -128.0), 1e-3));
        assert_eq!(e.offscreen.offscreen_ms, 0.0);
        assert!(e.offscreen.entered);
    }

    #[test]
    fn test_edge_spawn_lies_outside_viewport() {
        let f = Fixture::new(EnemiesConfig::default());
        let mut spawns = SpawnScheduler::new();
        let ctx = SpawnContext {
            config: &f.config,
            camera: &f.camera,
            player_trim: &f.trim,
            heading: Vec2::Y,
        };
        // Edge 0 (top), x at half width
        let mut rng = ScriptedRng::new(&[0.0, 0.5, 0.5]);
        spawns.spawn_mob(&ctx, &f.difficulty, &mut rng);
        let pos = spawns.enemies[0].pos_px();
        assert_eq!(pos, Vec2::new(500.0, -SPAWN_MARGIN_PX));
    }

    #[test]
    fn test_ensure_initial_tops_up_mobs() {
        let f = Fixture::new(EnemiesConfig::default());
        let mut spawns = SpawnScheduler::new();
        let ctx = SpawnContext {
            config: &f.config,
            camera: &f.camera,
            player_trim: &f.trim,
            heading: Vec2::Y,
        };
        let mut rng = ScriptedRng::constant(0.3);
        spawns.ensure_initial(&ctx, &f.difficulty, &mut rng);
        spawns.ensure_initial(&ctx, &f.difficulty, &mut rng);
        assert_eq!(spawns.count(EnemyKind::Mob), 2);
    }

    #[test]
    fn test_mob_spawning_respects_cap() {
        let mut config = EnemiesConfig::default();
        config.mob.spawn.max_count = 3;
        config.mob.spawn.interval_ms = 100.0;
        config.mob.lifetime_sec = 0.0;
        config.mob.move_speed_mps = 0.0;
        config.powerup.interval_sec = 0.0;
        let mut f = Fixture::new(config);
        let mut spawns = SpawnScheduler::new();

        for _ in 0..100 {
            f.update(&mut spawns, 10.0);
        }
        assert_eq!(spawns.count(EnemyKind::Mob), 3);
    }

    #[test]
    fn test_dash_activation_edge_fires_once() {
        let mut config = EnemiesConfig::default();
        config.mob.spawn.max_count = 0;
        config.powerup.interval_sec = 0.0;
        let mut f = Fixture::new(config);
        let mut spawns = SpawnScheduler::new();

        f.update(&mut spawns, 10.0);
        assert!(!spawns.dash_enabled());
        assert_eq!(spawns.count(EnemyKind::Dash), 0);

        f.difficulty.dash.max_count = 1;
        f.update(&mut spawns, 10.0);
        assert!(spawns.dash_enabled());
        assert_eq!(spawns.count(EnemyKind::Dash), 1);
        f.update(&mut spawns, 10.0);
        let activations = f
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::DashClassActivated { .. }))
            .count();
        assert_eq!(activations, 1);
    }

    #[test]
    fn test_power_up_speeds_up_live_enemies() {
        let mut config = EnemiesConfig::default();
        config.mob.spawn.interval_ms = 1_000_000.0;
        config.powerup.interval_sec = 1.0;
        let mut f = Fixture::new(config);
        let mut spawns = SpawnScheduler::new();
        {
            let ctx = SpawnContext {
                config: &f.config,
                camera: &f.camera,
                player_trim: &f.trim,
                heading: Vec2::Y,
            };
            spawns.ensure_initial(&ctx, &f.difficulty, &mut f.rng);
        }

        for _ in 0..100 {
            f.update(&mut spawns, 10.0);
        }
        assert_eq!(f.difficulty.steps, 1);
        assert_eq!(f.difficulty.mob.speed_mps, 4.0);
        assert!(spawns
            .enemies
            .iter()
            .filter(|e| e.kind == EnemyKind::Mob)
            .all(|e| e.speed_mps == 4.0));
        // The raised dash cap is picked up by the next update
        assert!(!spawns.dash_enabled());
        f.update(&mut spawns, 10.0);
        assert!(spawns.dash_enabled());
    }
}
