//! The player character and its run-scoped stats

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::anim::{Facing, FrameTimer};
use super::collision::{Aabb, player_damage_box};
use super::tick::InputAxis;
use crate::config::{PlayerConfig, Trim};
use crate::consts::*;
use crate::to_px;

/// Player animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimState {
    #[default]
    Idle,
    Walk,
}

impl AnimState {
    fn frame_ms(self) -> f32 {
        match self {
            AnimState::Idle => 300.0,
            AnimState::Walk => 120.0,
        }
    }

    fn frame_count(self) -> u32 {
        match self {
            AnimState::Idle => 2,
            AnimState::Walk => 4,
        }
    }
}

/// Temporary multiplicative speed buff, counted down in simulation time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedBuff {
    pub multiplier: f32,
    pub remaining_ms: f32,
}

/// Upgradable player stats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStats {
    pub max_hp: f32,
    /// Current speed including any active buff (m/s)
    pub move_speed_mps: f32,
    /// Unbuffed speed, captured the first time a buff or upgrade touches it
    base_move_speed_mps: Option<f32>,
    speed_buff: Option<SpeedBuff>,
}

impl PlayerStats {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            max_hp: config.max_hp,
            move_speed_mps: config.move_speed_mps,
            base_move_speed_mps: None,
            speed_buff: None,
        }
    }

    /// Unbuffed speed (m/s)
    pub fn baseline_move_speed(&self) -> f32 {
        self.base_move_speed_mps.unwrap_or(self.move_speed_mps)
    }

    pub fn speed_buff(&self) -> Option<SpeedBuff> {
        self.speed_buff
    }

    /// Multiply the baseline speed for `duration_ms`
    ///
    /// Re-applying while active replaces the countdown; the multiplier is
    /// always taken against the baseline so buffs never compound.
    pub fn apply_speed_buff(&mut self, multiplier: f32, duration_ms: f32) {
        let base = *self
            .base_move_speed_mps
            .get_or_insert(self.move_speed_mps);
        self.move_speed_mps = base * multiplier;
        self.speed_buff = Some(SpeedBuff {
            multiplier,
            remaining_ms: duration_ms,
        });
    }

    /// Permanent speed upgrade; applies to both baseline and current speed
    pub fn raise_move_speed(&mut self, add_mps: f32) {
        let base = self.baseline_move_speed() + add_mps;
        self.base_move_speed_mps = Some(base);
        self.move_speed_mps += add_mps;
    }

    /// Count the active buff down and revert when it expires
    pub fn tick(&mut self, dt: f32) {
        let Some(buff) = self.speed_buff.as_mut() else {
            return;
        };
        buff.remaining_ms -= dt;
        if buff.remaining_ms <= 0.0 {
            self.speed_buff = None;
            self.move_speed_mps = self.baseline_move_speed();
            log::debug!("Speed buff expired ({} m/s)", self.move_speed_mps);
        }
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner in world meters
    pub pos: Vec2,
    /// Sprite size (px)
    pub size: Vec2,
    pub hp: f32,
    pub coins: u32,
    /// Remaining damage flash (ms)
    pub hit_flash_ms: f32,
    pub facing: Facing,
    pub facing_left: bool,
    pub anim_state: AnimState,
    pub anim: FrameTimer,
    /// Last non-zero movement direction (unit vector)
    pub last_move_dir: Vec2,
}

impl Player {
    pub fn new(config: &PlayerConfig, pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::new(config.width_px, config.height_px),
            hp: config.max_hp,
            coins: config.start_coins,
            hit_flash_ms: 0.0,
            facing: Facing::Down,
            facing_left: false,
            anim_state: AnimState::Idle,
            anim: FrameTimer::default(),
            last_move_dir: Vec2::Y,
        }
    }

    /// Sprite center in world meters
    pub fn center_m(&self) -> Vec2 {
        self.pos + self.size / 2.0 / SCALE
    }

    /// Full sprite rectangle (px)
    pub fn rect_px(&self) -> Aabb {
        Aabb::from_min_size(to_px(self.pos), self.size)
    }

    /// Hit box used for enemy damage (px)
    pub fn damage_box(&self, trim: &Trim) -> Aabb {
        player_damage_box(&self.rect_px(), trim)
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    /// Subtract HP (floored at 0) and start the hit flash; returns HP lost
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let before = self.hp;
        self.hp = (self.hp - amount.max(0.0)).max(0.0);
        self.hit_flash_ms = self.hit_flash_ms.max(HIT_FLASH_MS);
        before - self.hp
    }

    /// Add HP up to `max_hp`; returns HP gained
    pub fn heal(&mut self, amount: f32, max_hp: f32) -> f32 {
        let before = self.hp;
        self.hp = (self.hp + amount.max(0.0)).min(max_hp);
        (self.hp - before).max(0.0)
    }

    /// Move by the input axis and update facing/animation
    pub fn apply_input(&mut self, axis: InputAxis, speed_mps: f32, dt: f32) {
        let dir = axis.as_vec2();
        self.pos += dir * speed_mps * (dt / 1000.0);

        if dir != Vec2::ZERO {
            self.last_move_dir = dir.normalize_or(Vec2::Y);
        }

        if dir.x.abs() > dir.y.abs() {
            self.set_facing(Facing::Side);
            self.facing_left = dir.x < 0.0;
        } else if dir.y != 0.0 {
            self.set_facing(if dir.y > 0.0 { Facing::Down } else { Facing::Up });
        }

        self.set_anim_state(if dir == Vec2::ZERO {
            AnimState::Idle
        } else {
            AnimState::Walk
        });
    }

    fn set_facing(&mut self, facing: Facing) {
        if facing != self.facing {
            self.facing = facing;
            self.anim.reset();
        }
    }

    fn set_anim_state(&mut self, state: AnimState) {
        if state != self.anim_state {
            self.anim_state = state;
            self.anim.reset();
        }
    }

    /// Advance animation and the hit flash
    pub fn tick_timers(&mut self, dt: f32) {
        self.anim
            .tick(dt, self.anim_state.frame_ms(), self.anim_state.frame_count());
        if self.hit_flash_ms > 0.0 {
            self.hit_flash_ms = (self.hit_flash_ms - dt).max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn player() -> Player {
        Player::new(&PlayerConfig::default(), Vec2::ZERO)
    }

    #[test]
    fn test_move_right_faces_side() {
        let mut p = player();
        p.apply_input(InputAxis::new(1.0, 0.0), 10.0, 1000.0);
        assert!((p.pos.x - 10.0).abs() < 1e-5);
        assert_eq!(p.facing, Facing::Side);
        assert!(!p.facing_left);
        assert_eq!(p.anim_state, AnimState::Walk);
        assert_eq!(p.last_move_dir, Vec2::X);
    }

    #[test]
    fn test_stopping_keeps_facing_and_last_dir() {
        let mut p = player();
        p.apply_input(InputAxis::new(0.0, -1.0), 10.0, 100.0);
        p.apply_input(InputAxis::default(), 10.0, 100.0);
        assert_eq!(p.facing, Facing::Up);
        assert_eq!(p.anim_state, AnimState::Idle);
        assert_eq!(p.last_move_dir, Vec2::NEG_Y);
    }

    #[test]
    fn test_damage_flash_does_not_shorten() {
        let mut p = player();
        p.hit_flash_ms = 500.0;
        p.take_damage(5.0);
        assert_eq!(p.hit_flash_ms, 500.0);
        p.hit_flash_ms = 50.0;
        p.take_damage(5.0);
        assert_eq!(p.hit_flash_ms, HIT_FLASH_MS);
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut p = player();
        p.hp = 90.0;
        assert_eq!(p.heal(20.0, 100.0), 10.0);
        assert_eq!(p.hp, 100.0);
    }

    #[test]
    fn test_speed_buff_replaces_instead_of_compounding() {
        let mut stats = PlayerStats::new(&PlayerConfig::default());
        stats.apply_speed_buff(2.0, 10_000.0);
        stats.tick(4_000.0);
        stats.apply_speed_buff(2.0, 10_000.0);
        assert_eq!(stats.move_speed_mps, 20.0);
        stats.tick(9_999.0);
        assert_eq!(stats.move_speed_mps, 20.0);
        stats.tick(1.0);
        assert_eq!(stats.move_speed_mps, 10.0);
        assert!(stats.speed_buff().is_none());
    }

    #[test]
    fn test_upgrade_during_buff_survives_revert() {
        let mut stats = PlayerStats::new(&PlayerConfig::default());
        stats.apply_speed_buff(2.0, 1_000.0);
        stats.raise_move_speed(1.0);
        assert_eq!(stats.move_speed_mps, 21.0);
        stats.tick(1_000.0);
        assert_eq!(stats.move_speed_mps, 11.0);
    }

    proptest! {
        #[test]
        fn hp_never_negative(ticks in 0usize..200, dmg in 0.0f32..1000.0) {
            let mut p = player();
            for _ in 0..ticks {
                p.take_damage(dmg);
            }
            prop_assert!(p.hp >= 0.0);
            prop_assert!(p.hp <= 100.0);
        }
    }
}
