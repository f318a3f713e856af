//! Hostile entities and their per-tick behavior

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::anim::{Facing, FrameTimer};
use super::collision::{EnemyCollider, enemy_collider};
use super::player::Player;
use super::spawn::OffscreenTracker;
use super::state::GameEvent;
use crate::config::{ColliderConfig, DashConfig, MobConfig, Trim};
use crate::consts::*;
use crate::to_px;

/// Behavior class of an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    /// Homes toward the player every tick
    Mob,
    /// Locks a direction after a wind-up, then travels straight
    Dash,
}

/// How contact with the player turns into damage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum DamageModel {
    /// Immediate tick on contact, then one tick per interval while contact lasts
    PerTick { amount: f32, interval_ms: f32 },
    /// A single hit over the enemy's whole lifetime
    PerHitOnce { amount: f32 },
}

/// Dash wind-up state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct DashState {
    delay_ms: f32,
    timer_ms: f32,
    /// Captured on the first wind-up tick and never changed afterwards
    dir: Option<Vec2>,
}

/// Overlap bookkeeping for damage edges
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ContactState {
    was_overlapping: bool,
    damage_timer_ms: f32,
    has_hit_once: bool,
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    /// Center in world meters
    pub pos: Vec2,
    pub size_m: f32,
    pub speed_mps: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub damage: DamageModel,
    collider: ColliderConfig,
    pub age_ms: f32,
    /// 0 = immortal
    pub lifetime_ms: f32,
    /// Heading for rendering (radians)
    pub rotation: f32,
    pub facing: Facing,
    pub facing_left: bool,
    /// Opaque sprite variant (dash class)
    pub variant: Option<String>,
    pub anim: FrameTimer,
    frame_ms: f32,
    frame_count: u32,
    dash: DashState,
    contact: ContactState,
    pub offscreen: OffscreenTracker,
}

impl Enemy {
    /// Homing enemy at `pos` (center, meters)
    pub fn mob(id: u32, pos: Vec2, config: &MobConfig, speed_mps: f32, damage: f32) -> Self {
        Self {
            id,
            kind: EnemyKind::Mob,
            pos,
            size_m: config.size_m,
            speed_mps,
            hp: config.max_hp,
            max_hp: config.max_hp,
            damage: DamageModel::PerTick {
                amount: damage,
                interval_ms: config.damage_interval_ms,
            },
            collider: config.collider.clone(),
            age_ms: 0.0,
            lifetime_ms: config.lifetime_sec.max(0.0) * 1000.0,
            rotation: 0.0,
            facing: Facing::Down,
            facing_left: false,
            variant: None,
            anim: FrameTimer::default(),
            frame_ms: config.frame_duration_ms,
            frame_count: config.walk_frames,
            dash: DashState::default(),
            contact: ContactState::default(),
            offscreen: OffscreenTracker::default(),
        }
    }

    /// Dashing enemy at `pos` (center, meters)
    pub fn dash(
        id: u32,
        pos: Vec2,
        config: &DashConfig,
        speed_mps: f32,
        damage: f32,
        variant: Option<String>,
    ) -> Self {
        Self {
            id,
            kind: EnemyKind::Dash,
            pos,
            size_m: config.size_m,
            speed_mps,
            hp: config.max_hp,
            max_hp: config.max_hp,
            damage: DamageModel::PerHitOnce { amount: damage },
            collider: config.collider.clone(),
            age_ms: 0.0,
            lifetime_ms: config.lifetime_sec.max(0.0) * 1000.0,
            rotation: 0.0,
            facing: Facing::Side,
            facing_left: false,
            variant,
            anim: FrameTimer::default(),
            frame_ms: config.frame_duration_ms,
            frame_count: 2,
            dash: DashState {
                delay_ms: config.dash_delay_ms.max(0.0),
                ..DashState::default()
            },
            contact: ContactState::default(),
            offscreen: OffscreenTracker::default(),
        }
    }

    /// Center in world pixels
    pub fn pos_px(&self) -> Vec2 {
        to_px(self.pos)
    }

    pub fn size_px(&self) -> f32 {
        self.size_m * SCALE
    }

    pub fn collider(&self) -> EnemyCollider {
        enemy_collider(&self.collider, self.pos_px(), self.size_px(), self.facing)
    }

    pub fn is_expired(&self) -> bool {
        self.lifetime_ms > 0.0 && self.age_ms >= self.lifetime_ms
    }

    /// Raise damage output (power-up step)
    pub fn add_damage(&mut self, delta: f32) {
        match &mut self.damage {
            DamageModel::PerTick { amount, .. } | DamageModel::PerHitOnce { amount } => {
                *amount += delta;
            }
        }
    }

    /// Move to `pos_px` and forget any ongoing contact
    pub fn relocate(&mut self, pos_px: Vec2) {
        self.pos = pos_px / SCALE;
        self.contact.was_overlapping = false;
        self.contact.damage_timer_ms = 0.0;
        self.offscreen.offscreen_ms = 0.0;
    }

    /// Advance movement, animation and contact damage by `dt` ms
    pub fn update(
        &mut self,
        dt: f32,
        player: &mut Player,
        player_trim: &Trim,
        events: &mut Vec<GameEvent>,
    ) {
        self.age_ms += dt;

        let delta = player.center_m() - self.pos;
        let dist = match delta.length() {
            d if d > 0.0 => d,
            _ => 1e-6,
        };
        let toward = delta / dist;
        let step = self.speed_mps * (dt / 1000.0);

        match self.kind {
            EnemyKind::Mob => {
                self.pos += toward * step;
                self.rotation = toward.y.atan2(toward.x);
            }
            EnemyKind::Dash => {
                let dir = *self.dash.dir.get_or_insert(toward);
                if self.dash.timer_ms < self.dash.delay_ms {
                    self.dash.timer_ms += dt;
                } else {
                    self.pos += dir * step;
                }
                self.rotation = dir.y.atan2(dir.x);
                self.facing_left = dir.x < 0.0;
            }
        }

        self.animate(dt, delta);
        self.resolve_contact(dt, player, player_trim, events);
    }

    fn animate(&mut self, dt: f32, delta: Vec2) {
        if self.kind == EnemyKind::Mob {
            // Unnormalized delta with a slight bias toward the side reading
            let (ax, ay) = (delta.x.abs(), delta.y.abs());
            if ax >= ay + 0.01 {
                self.facing = Facing::Side;
                self.facing_left = delta.x < 0.0;
            } else {
                self.facing = if delta.y > 0.0 { Facing::Down } else { Facing::Up };
            }
        }
        self.anim.tick(dt, self.frame_ms, self.frame_count);
    }

    fn resolve_contact(
        &mut self,
        dt: f32,
        player: &mut Player,
        player_trim: &Trim,
        events: &mut Vec<GameEvent>,
    ) {
        let overlapping = self.collider().overlaps(&player.damage_box(player_trim));
        if !overlapping {
            self.contact.damage_timer_ms = 0.0;
            self.contact.was_overlapping = false;
            return;
        }

        match self.damage {
            DamageModel::PerHitOnce { amount } => {
                if !self.contact.has_hit_once {
                    self.contact.has_hit_once = true;
                    self.hit(player, amount, events);
                }
            }
            DamageModel::PerTick {
                amount,
                interval_ms,
            } => {
                if !self.contact.was_overlapping {
                    self.contact.was_overlapping = true;
                    self.contact.damage_timer_ms = 0.0;
                    self.hit(player, amount, events);
                } else {
                    self.contact.damage_timer_ms += dt;
                    if self.contact.damage_timer_ms >= interval_ms {
                        self.contact.damage_timer_ms -= interval_ms;
                        self.hit(player, amount, events);
                    }
                }
            }
        }
    }

    fn hit(&self, player: &mut Player, amount: f32, events: &mut Vec<GameEvent>) {
        let dealt = player.take_damage(amount);
        events.push(GameEvent::PlayerDamaged {
            amount: dealt,
            source: self.kind,
        });
    }
}
