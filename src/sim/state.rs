//! Run state and the simulation orchestrator
//!
//! `Game` owns every entity collection, the run-scoped difficulty and the
//! single random source. The per-step pipeline lives in `tick.rs`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::boost::{BoostKind, BoostScheduler, BoostTuning};
use super::camera::Camera;
use super::clock::{Clock, FixedStepper};
use super::enemy::EnemyKind;
use super::player::{Player, PlayerStats};
use super::rng::{RandomSource, seeded};
use super::shop::{Shop, ShopError, ShopItem, ShopOffer};
use super::snapshot::FrameSnapshot;
use super::spawn::{Difficulty, SpawnContext, SpawnScheduler};
use super::target::Objective;
use super::tick::InputAxis;
use crate::config::GameConfig;
use crate::consts::*;
use crate::to_meters;

/// Frame-loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Stopped,
    Running,
    Paused,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    TimeUp,
    Defeated,
}

/// Things the platform may want to react to (audio, HUD)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    RunStarted,
    PlayerDamaged { amount: f32, source: EnemyKind },
    DashClassActivated { count: u32 },
    PowerUp { step: u32 },
    BoostSpawned { kind: BoostKind },
    BoostCollected { kind: BoostKind },
    Delivered { deliveries: u32 },
    GameOver { reason: GameOverReason },
}

/// Short-lived HUD notification, aged in simulation time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloatText {
    pub text: String,
    pub color: &'static str,
    pub age_ms: f32,
    pub duration_ms: f32,
}

impl FloatText {
    pub const GOLD: &'static str = "#ffd54f";
    pub const BLUE: &'static str = "#90caf9";
    pub const GREEN: &'static str = "#66bb6a";
    pub const RED: &'static str = "#ef9a9a";

    pub fn new(text: String, color: &'static str) -> Self {
        Self {
            text,
            color,
            age_ms: 0.0,
            duration_ms: FLOAT_TEXT_MS,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.age_ms >= self.duration_ms
    }

    /// 0 when fresh, 1 when expired
    pub fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            1.0
        } else {
            (self.age_ms / self.duration_ms).clamp(0.0, 1.0)
        }
    }
}

/// The simulation orchestrator
pub struct Game {
    pub config: GameConfig,
    pub(super) rng: Box<dyn RandomSource>,
    pub run_state: RunState,
    /// Set once per run, never cleared until the next `start`
    pub game_over: Option<GameOverReason>,
    pub clock: Clock,
    pub stepper: FixedStepper,
    pub timer_total_ms: f32,
    pub timer_remaining_ms: f32,
    elapsed_at_game_over_ms: Option<f32>,
    pub deliveries: u32,
    pub player: Player,
    pub stats: PlayerStats,
    pub camera: Camera,
    pub objective: Objective,
    pub spawns: SpawnScheduler,
    pub boosts: BoostScheduler,
    pub difficulty: Difficulty,
    pub boost_tuning: BoostTuning,
    pub shop: Shop,
    pub float_texts: Vec<FloatText>,
    pub(super) input: InputAxis,
    pub(super) events: Vec<GameEvent>,
}

impl Game {
    /// New stopped game with a seeded generator
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, Box::new(seeded(seed)))
    }

    /// New stopped game drawing from `rng`
    pub fn with_rng(config: GameConfig, rng: Box<dyn RandomSource>) -> Self {
        let timing = &config.timing;
        Self {
            rng,
            run_state: RunState::Stopped,
            game_over: None,
            clock: Clock::new(timing.max_frame_delta_ms),
            stepper: FixedStepper::new(timing.fixed_step_ms, timing.max_substeps),
            timer_total_ms: timing.round_duration_ms,
            timer_remaining_ms: timing.round_duration_ms,
            elapsed_at_game_over_ms: None,
            deliveries: 0,
            player: Player::new(&config.player, Vec2::ZERO),
            stats: PlayerStats::new(&config.player),
            camera: Camera::new(&config.camera),
            objective: Objective::default(),
            spawns: SpawnScheduler::new(),
            boosts: BoostScheduler::new(&config.boosts),
            difficulty: Difficulty::new(&config.enemies),
            boost_tuning: BoostTuning::new(&config.boosts),
            shop: Shop::default(),
            float_texts: Vec::new(),
            input: InputAxis::default(),
            events: Vec::new(),
            config,
        }
    }

    /// Begin a fresh run; every entity and timer is rebuilt
    pub fn start(&mut self) {
        if self.run_state == RunState::Running {
            return;
        }

        let view = self.camera.view_size();
        self.camera = Camera::new(&self.config.camera);
        self.camera.set_view_size(view.x, view.y);

        self.stats = PlayerStats::new(&self.config.player);
        let size = Vec2::new(self.config.player.width_px, self.config.player.height_px);
        let spawn_px = ((view - size) / 2.0).floor();
        self.player = Player::new(&self.config.player, to_meters(spawn_px));
        self.player.hp = self.stats.max_hp;
        self.input = InputAxis::default();

        let target = &self.config.target;
        self.objective.spawn_around(
            self.player.pos,
            target.distance_min_m,
            target.distance_max_m,
            target.size_m,
            self.rng.as_mut(),
        );
        self.camera.set_center(self.player.center_m());

        self.clock.reset();
        self.stepper.reset();
        self.timer_total_ms = self.config.timing.round_duration_ms;
        self.timer_remaining_ms = self.timer_total_ms;
        self.game_over = None;
        self.elapsed_at_game_over_ms = None;
        self.deliveries = 0;

        self.difficulty = Difficulty::new(&self.config.enemies);
        self.spawns = SpawnScheduler::new();
        let ctx = SpawnContext {
            config: &self.config.enemies,
            camera: &self.camera,
            player_trim: &self.config.player.collider,
            heading: self.player.last_move_dir,
        };
        self.spawns
            .ensure_initial(&ctx, &self.difficulty, self.rng.as_mut());

        self.boosts = BoostScheduler::new(&self.config.boosts);
        self.boost_tuning = BoostTuning::new(&self.config.boosts);
        self.shop = Shop::default();
        self.float_texts.clear();

        self.run_state = RunState::Running;
        self.events.push(GameEvent::RunStarted);
        log::info!("Game started");
    }

    pub fn stop(&mut self) {
        if self.run_state == RunState::Stopped {
            return;
        }
        self.run_state = RunState::Stopped;
        self.spawns.enemies.clear();
        self.boosts.clear();
        self.objective.clear();
        self.float_texts.clear();
        log::info!("Game stopped");
    }

    pub fn pause(&mut self) {
        if self.run_state != RunState::Running {
            return;
        }
        self.run_state = RunState::Paused;
        log::info!("Game paused");
    }

    /// Continue a paused run; a finished run stays paused
    pub fn resume(&mut self) {
        if self.run_state != RunState::Paused || self.game_over.is_some() {
            return;
        }
        self.run_state = RunState::Running;
        log::info!("Game resumed");
    }

    pub fn toggle_pause(&mut self) {
        match self.run_state {
            RunState::Stopped => {}
            RunState::Paused => self.resume(),
            RunState::Running => self.pause(),
        }
    }

    pub fn is_over(&self) -> bool {
        self.game_over.is_some()
    }

    pub fn set_input(&mut self, axis: InputAxis) {
        self.input = axis;
    }

    /// Match a new viewport and recenter on the player
    pub fn resize(&mut self, width: f32, height: f32) {
        self.camera.set_view_size(width, height);
        if self.run_state != RunState::Stopped {
            self.camera.set_center(self.player.center_m());
        }
    }

    /// Elapsed run time, frozen at the game-over instant
    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_at_game_over_ms
            .unwrap_or(self.clock.elapsed_ms as f32)
    }

    /// Events raised since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::capture(self)
    }

    pub fn shop_offers(&self) -> Vec<ShopOffer> {
        self.shop.offers(&self.config.shop, self.player.coins)
    }

    /// Buy an upgrade; only while paused mid-run
    pub fn purchase(&mut self, item: ShopItem) -> Result<(), ShopError> {
        if self.game_over.is_some() {
            return Err(ShopError::GameOver);
        }
        if self.run_state != RunState::Paused {
            return Err(ShopError::Closed);
        }
        self.shop.purchase(
            item,
            &self.config.shop,
            &mut self.player,
            &mut self.stats,
            &mut self.boost_tuning,
        )
    }

    /// Transition to game-over on the first loss condition; countdown first
    pub(super) fn check_loss(&mut self) {
        if self.game_over.is_some() {
            return;
        }
        let reason = if self.timer_remaining_ms <= 0.0 {
            GameOverReason::TimeUp
        } else if self.player.hp <= 0.0 {
            GameOverReason::Defeated
        } else {
            return;
        };

        let elapsed = self.clock.elapsed_ms as f32;
        self.game_over = Some(reason);
        self.elapsed_at_game_over_ms = Some(elapsed);
        self.run_state = RunState::Paused;
        self.events.push(GameEvent::GameOver { reason });
        log::info!(
            "Game over ({:?}) after {:.1}s with {} deliveries",
            reason,
            elapsed / 1000.0,
            self.deliveries
        );
    }

    /// Objective reached: rewards, then a new objective around the player
    pub(super) fn deliver(&mut self) {
        self.deliveries += 1;
        let rewards = &self.config.rewards;

        if rewards.add_time_seconds > 0.0 {
            self.timer_remaining_ms += rewards.add_time_seconds * 1000.0;
            self.float_texts.push(FloatText::new(
                format!("+{}s", rewards.add_time_seconds),
                FloatText::BLUE,
            ));
        }
        if rewards.add_coins > 0 {
            self.player.coins = self.player.coins.saturating_add(rewards.add_coins);
            self.float_texts.push(FloatText::new(
                format!("+{} coins", rewards.add_coins),
                FloatText::GOLD,
            ));
        }
        if rewards.heal_full {
            self.player.hp = self.stats.max_hp;
            self.float_texts
                .push(FloatText::new("HP full".to_string(), FloatText::RED));
        } else if rewards.heal_amount > 0.0 {
            self.player.heal(rewards.heal_amount, self.stats.max_hp);
            self.float_texts.push(FloatText::new(
                format!("+{} HP", rewards.heal_amount),
                FloatText::RED,
            ));
        }

        self.events.push(GameEvent::Delivered {
            deliveries: self.deliveries,
        });
        log::debug!("Delivery {}", self.deliveries);

        let target = &self.config.target;
        self.objective.spawn_around(
            self.player.pos,
            target.distance_min_m,
            target.distance_max_m,
            target.size_m,
            self.rng.as_mut(),
        );
    }
}
