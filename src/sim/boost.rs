//! Time-limited pickups and their effects

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::anim::FrameTimer;
use super::collision::Aabb;
use super::player::{Player, PlayerStats};
use super::rng::RandomSource;
use super::state::{FloatText, GameEvent};
use crate::config::BoostsConfig;
use crate::consts::*;
use crate::{polar_to_cartesian, to_px};

/// Pickup kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoostKind {
    Coin,
    Clock,
    Energy,
}

/// Effect carried by a boost, fixed when it spawns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BoostPayload {
    /// Random whole number of coins in [min, max]
    Coin { min: u32, max: u32 },
    /// Seconds added to the countdown
    Clock { seconds: f32 },
    /// Temporary speed multiplier
    Energy { multiplier: f32, duration_ms: f32 },
}

impl BoostPayload {
    pub fn kind(&self) -> BoostKind {
        match self {
            BoostPayload::Coin { .. } => BoostKind::Coin,
            BoostPayload::Clock { .. } => BoostKind::Clock,
            BoostPayload::Energy { .. } => BoostKind::Energy,
        }
    }
}

/// Boost values that shop upgrades raise during a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostTuning {
    pub coin_min: u32,
    pub coin_max: u32,
    pub clock_seconds: f32,
    pub energy_multiplier: f32,
    pub energy_duration_sec: f32,
}

impl BoostTuning {
    pub fn new(config: &BoostsConfig) -> Self {
        Self {
            coin_min: config.coin.value_min,
            coin_max: config.coin.value_max,
            clock_seconds: config.clock.add_seconds,
            energy_multiplier: config.energy.speed_multiplier,
            energy_duration_sec: config.energy.duration_sec,
        }
    }

    pub fn payload(&self, kind: BoostKind) -> BoostPayload {
        match kind {
            BoostKind::Coin => BoostPayload::Coin {
                min: self.coin_min,
                max: self.coin_max,
            },
            BoostKind::Clock => BoostPayload::Clock {
                seconds: self.clock_seconds,
            },
            BoostKind::Energy => BoostPayload::Energy {
                multiplier: self.energy_multiplier,
                duration_ms: self.energy_duration_sec * 1000.0,
            },
        }
    }
}

/// A pickup lying in the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boost {
    pub id: u32,
    /// Center in world meters
    pub pos: Vec2,
    pub size_m: f32,
    pub collected: bool,
    pub anim: FrameTimer,
    pub payload: BoostPayload,
}

impl Boost {
    pub fn kind(&self) -> BoostKind {
        self.payload.kind()
    }

    pub fn pos_px(&self) -> Vec2 {
        to_px(self.pos)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos_px(), Vec2::splat(self.size_m * SCALE))
    }
}

/// What applying a boost changed outside the player
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoostOutcome {
    /// Countdown extension (ms)
    pub add_time_ms: f32,
}

/// Owns active boosts and the spawn timer
#[derive(Debug, Clone)]
pub struct BoostScheduler {
    pub boosts: Vec<Boost>,
    timer_ms: f32,
    interval_ms: f32,
    next_id: u32,
}

impl BoostScheduler {
    pub fn new(config: &BoostsConfig) -> Self {
        Self {
            boosts: Vec::new(),
            timer_ms: 0.0,
            interval_ms: config.spawn_interval_sec * 1000.0,
            next_id: 1,
        }
    }

    /// Spawn one boost of a random enabled kind near the player
    pub fn spawn_random(
        &mut self,
        config: &BoostsConfig,
        tuning: &BoostTuning,
        player: &Player,
        rng: &mut dyn RandomSource,
    ) -> Option<BoostKind> {
        if config.kinds.is_empty() {
            return None;
        }
        let kind = config.kinds[rng.index(config.kinds.len())];
        let angle = rng.angle();
        let distance = rng.range(config.distance_min_m, config.distance_max_m);
        let pos = player.center_m() + polar_to_cartesian(distance, angle);

        let id = self.next_id;
        self.next_id += 1;
        self.boosts.push(Boost {
            id,
            pos,
            size_m: config.size_m,
            collected: false,
            anim: FrameTimer::default(),
            payload: tuning.payload(kind),
        });
        log::debug!("Spawned {:?} boost {} at ({:.1}, {:.1})m", kind, id, pos.x, pos.y);
        Some(kind)
    }

    /// Spawn on interval, animate, and collect anything the player touches
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        dt: f32,
        config: &BoostsConfig,
        tuning: &BoostTuning,
        player: &mut Player,
        stats: &mut PlayerStats,
        rng: &mut dyn RandomSource,
        events: &mut Vec<GameEvent>,
        texts: &mut Vec<FloatText>,
    ) -> BoostOutcome {
        self.timer_ms += dt;
        if self.interval_ms > 0.0 && self.timer_ms >= self.interval_ms {
            self.timer_ms -= self.interval_ms;
            if let Some(kind) = self.spawn_random(config, tuning, player, rng) {
                events.push(GameEvent::BoostSpawned { kind });
            }
        }

        for b in &mut self.boosts {
            b.anim.tick(dt, config.frame_duration_ms, config.frames);
        }

        let mut outcome = BoostOutcome::default();
        let player_rect = player.rect_px();
        self.boosts.retain_mut(|b| {
            if !b.bounds().intersects(&player_rect) {
                return !b.collected;
            }
            b.collected = true;
            outcome.add_time_ms += apply(b.payload, player, stats, rng, texts);
            events.push(GameEvent::BoostCollected { kind: b.kind() });
            false
        });
        outcome
    }

    /// Active boost closest to `from` (meters)
    pub fn nearest(&self, from: Vec2) -> Option<&Boost> {
        self.boosts.iter().min_by(|a, b| {
            a.pos
                .distance_squared(from)
                .total_cmp(&b.pos.distance_squared(from))
        })
    }

    pub fn clear(&mut self) {
        self.boosts.clear();
        self.timer_ms = 0.0;
    }
}

/// Apply a payload; returns the countdown extension in ms
fn apply(
    payload: BoostPayload,
    player: &mut Player,
    stats: &mut PlayerStats,
    rng: &mut dyn RandomSource,
    texts: &mut Vec<FloatText>,
) -> f32 {
    match payload {
        BoostPayload::Coin { min, max } => {
            let amount = rng.int_inclusive(min, max);
            player.coins = player.coins.saturating_add(amount);
            texts.push(FloatText::new(format!("+{amount} coins"), FloatText::GOLD));
            0.0
        }
        BoostPayload::Clock { seconds } => {
            texts.push(FloatText::new(format!("+{seconds}s"), FloatText::BLUE));
            seconds * 1000.0
        }
        BoostPayload::Energy {
            multiplier,
            duration_ms,
        } => {
            stats.apply_speed_buff(multiplier, duration_ms);
            texts.push(FloatText::new(format!("x{multiplier} speed"), FloatText::GREEN));
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerConfig;
    use crate::sim::rng::ScriptedRng;

    struct Fixture {
        config: BoostsConfig,
        tuning: BoostTuning,
        player: Player,
        stats: PlayerStats,
        events: Vec<GameEvent>,
        texts: Vec<FloatText>,
    }

    impl Fixture {
        fn new() -> Self {
            let config = BoostsConfig::default();
            let tuning = BoostTuning::new(&config);
            Self {
                config,
                tuning,
                player: Player::new(&PlayerConfig::default(), Vec2::ZERO),
                stats: PlayerStats::new(&PlayerConfig::default()),
                events: Vec::new(),
                texts: Vec::new(),
            }
        }

        fn place(&self, kind: BoostKind, pos: Vec2) -> Boost {
            Boost {
                id: 99,
                pos,
                size_m: self.config.size_m,
                collected: false,
                anim: FrameTimer::default(),
                payload: self.tuning.payload(kind),
            }
        }

        fn update(&mut self, boosts: &mut BoostScheduler, rng: &mut dyn RandomSource) -> BoostOutcome {
            boosts.update(
                10.0,
                &self.config,
                &self.tuning,
                &mut self.player,
                &mut self.stats,
                rng,
                &mut self.events,
                &mut self.texts,
            )
        }
    }

    #[test]
    fn test_spawn_ring_around_player_center() {
        let f = Fixture::new();
        let mut boosts = BoostScheduler::new(&f.config);
        // kind index 0 (coin), bearing 0, distance at the minimum
        let mut rng = ScriptedRng::new(&[0.0, 0.0, 0.0]);
        let kind = boosts.spawn_random(&f.config, &f.tuning, &f.player, &mut rng);
        assert_eq!(kind, Some(BoostKind::Coin));
        let expected = f.player.center_m() + Vec2::new(50.0, 0.0);
        assert!(boosts.boosts[0].pos.distance(expected) < 1e-4);
    }

    #[test]
    fn test_pickup_removed_in_same_update() {
        let mut f = Fixture::new();
        let mut boosts = BoostScheduler::new(&f.config);
        boosts.boosts.push(f.place(BoostKind::Coin, f.player.center_m()));
        let mut rng = ScriptedRng::constant(0.0);

        f.update(&mut boosts, &mut rng);
        assert!(boosts.boosts.is_empty());
        assert_eq!(f.player.coins, 100 + 10);

        // Nothing left to apply a second time
        f.update(&mut boosts, &mut rng);
        assert_eq!(f.player.coins, 110);
        let collected = f
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::BoostCollected { .. }))
            .count();
        assert_eq!(collected, 1);
    }

    #[test]
    fn test_clock_boost_extends_countdown() {
        let mut f = Fixture::new();
        let mut boosts = BoostScheduler::new(&f.config);
        boosts.boosts.push(f.place(BoostKind::Clock, f.player.center_m()));
        let outcome = f.update(&mut boosts, &mut ScriptedRng::constant(0.0));
        assert_eq!(outcome.add_time_ms, 30_000.0);
        assert_eq!(f.texts[0].text, "+30s");
    }

    #[test]
    fn test_energy_boost_buffs_speed() {
        let mut f = Fixture::new();
        let mut boosts = BoostScheduler::new(&f.config);
        boosts.boosts.push(f.place(BoostKind::Energy, f.player.center_m()));
        f.update(&mut boosts, &mut ScriptedRng::constant(0.0));
        assert_eq!(f.stats.move_speed_mps, 20.0);
        f.stats.tick(10_000.0);
        assert_eq!(f.stats.move_speed_mps, 10.0);
    }

    #[test]
    fn test_far_boost_persists() {
        let mut f = Fixture::new();
        let mut boosts = BoostScheduler::new(&f.config);
        boosts.boosts.push(f.place(BoostKind::Coin, Vec2::new(500.0, 500.0)));
        for _ in 0..1000 {
            f.update(&mut boosts, &mut ScriptedRng::constant(0.5));
        }
        assert!(boosts.boosts.iter().any(|b| b.id == 99));
    }

    #[test]
    fn test_interval_spawns_and_reports() {
        let mut f = Fixture::new();
        f.config.spawn_interval_sec = 0.05;
        let mut boosts = BoostScheduler::new(&f.config);
        // Far ring so the new boost is not picked up immediately
        let mut rng = ScriptedRng::constant(0.5);
        for _ in 0..5 {
            f.update(&mut boosts, &mut rng);
        }
        assert_eq!(boosts.boosts.len(), 1);
        assert!(matches!(f.events[0], GameEvent::BoostSpawned { kind: BoostKind::Clock }));
    }

    #[test]
    fn test_nearest() {
        let f = Fixture::new();
        let mut boosts = BoostScheduler::new(&f.config);
        boosts.boosts.push(f.place(BoostKind::Coin, Vec2::new(100.0, 0.0)));
        let mut near = f.place(BoostKind::Clock, Vec2::new(10.0, 0.0));
        near.id = 7;
        boosts.boosts.push(near);
        assert_eq!(boosts.nearest(Vec2::ZERO).map(|b| b.id), Some(7));
    }
}
