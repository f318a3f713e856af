//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - One pluggable random source, owned by `Game`
//! - Stable iteration order (entities stay in spawn order)
//! - No rendering or platform dependencies

pub mod anim;
pub mod boost;
pub mod camera;
pub mod clock;
pub mod collision;
pub mod enemy;
pub mod player;
pub mod rng;
pub mod shop;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod target;
pub mod tick;

pub use anim::{Facing, FrameTimer};
pub use boost::{Boost, BoostKind, BoostPayload, BoostScheduler, BoostTuning};
pub use camera::{Camera, follow_factor};
pub use clock::{Clock, FixedStepper};
pub use collision::{Aabb, EnemyCollider, enemy_collider, player_damage_box};
pub use enemy::{DamageModel, Enemy, EnemyKind};
pub use player::{AnimState, Player, PlayerStats};
pub use rng::{RandomSource, seeded};
pub use shop::{Shop, ShopError, ShopItem, ShopOffer};
pub use snapshot::FrameSnapshot;
pub use spawn::{ClassTuning, Difficulty, OffscreenTracker, SpawnScheduler, ViewBounds};
pub use state::{FloatText, Game, GameEvent, GameOverReason, RunState};
pub use target::{Objective, Target};
pub use tick::InputAxis;
