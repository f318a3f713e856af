//! Fixed timestep simulation tick
//!
//! `Game::advance` turns one raw frame delta into zero or more fixed steps.
//! Within a step the order is fixed: player, camera, objective, enemies,
//! boosts, notifications, loss check. Later systems see the player position
//! written earlier in the same step.

use glam::Vec2;

use super::spawn::SpawnContext;
use super::state::{Game, RunState};

/// Movement intent from the input collaborator, diagonal-normalized
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputAxis {
    pub x: f32,
    pub y: f32,
}

impl InputAxis {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Axis from four direction keys; opposite keys cancel
    pub fn from_keys(left: bool, right: bool, up: bool, down: bool) -> Self {
        let x = (right as i8 - left as i8) as f32;
        let y = (down as i8 - up as i8) as f32;
        if x != 0.0 && y != 0.0 {
            let k = std::f32::consts::FRAC_1_SQRT_2;
            Self::new(x * k, y * k)
        } else {
            Self::new(x, y)
        }
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Game {
    /// Feed one raw frame delta; returns the number of fixed steps run
    ///
    /// The countdown runs on the clamped frame delta, so it reaches zero after
    /// exactly the round length of unpaused time.
    pub fn advance(&mut self, frame_delta_ms: f32) -> u32 {
        if self.run_state != RunState::Running {
            return 0;
        }

        let clamped = self.clock.update(frame_delta_ms);
        self.timer_remaining_ms = (self.timer_remaining_ms - clamped).max(0.0);
        self.check_loss();
        if self.run_state != RunState::Running {
            return 0;
        }

        let steps = self.stepper.advance(clamped);
        let dt = self.stepper.step_ms;
        for i in 0..steps {
            self.step(dt);
            if self.run_state != RunState::Running {
                return i + 1;
            }
        }
        steps
    }

    /// One fixed step of `dt` ms
    pub fn step(&mut self, dt: f32) {
        self.stats.tick(dt);

        self.player
            .apply_input(self.input, self.stats.move_speed_mps, dt);
        self.player.tick_timers(dt);

        self.camera.follow(self.player.center_m(), dt);

        if self.objective.try_collect(&self.player.rect_px()).is_some() {
            self.deliver();
        }

        let ctx = SpawnContext {
            config: &self.config.enemies,
            camera: &self.camera,
            player_trim: &self.config.player.collider,
            heading: self.player.last_move_dir,
        };
        self.spawns.update(
            dt,
            &ctx,
            &mut self.difficulty,
            &mut self.player,
            self.rng.as_mut(),
            &mut self.events,
        );

        let outcome = self.boosts.update(
            dt,
            &self.config.boosts,
            &self.boost_tuning,
            &mut self.player,
            &mut self.stats,
            self.rng.as_mut(),
            &mut self.events,
            &mut self.float_texts,
        );
        self.timer_remaining_ms += outcome.add_time_ms;

        for t in &mut self.float_texts {
            t.age_ms += dt;
        }
        self.float_texts.retain(|t| !t.is_expired());

        self.check_loss();
    }
}
