//! Read-only view of a frame for renderers and the HUD

use glam::Vec2;
use serde::Serialize;

use super::anim::Facing;
use super::boost::{Boost, BoostKind};
use super::collision::Aabb;
use super::enemy::{Enemy, EnemyKind};
use super::player::AnimState;
use super::state::{FloatText, Game, GameOverReason, RunState};
use crate::to_px;

#[derive(Debug, Clone, Serialize)]
pub struct CameraView {
    /// World pixel at the screen's top-left corner
    pub offset_px: Vec2,
    pub view_px: Vec2,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    /// Sprite rectangle in world pixels
    pub rect: Aabb,
    pub damage_box: Aabb,
    pub facing: Facing,
    pub facing_left: bool,
    pub anim_state: AnimState,
    pub frame: u32,
    pub hp: f32,
    pub max_hp: f32,
    pub coins: u32,
    pub hit_flash_ms: f32,
    pub move_speed_mps: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnemyView {
    pub id: u32,
    pub kind: EnemyKind,
    pub center_px: Vec2,
    pub size_px: f32,
    pub rotation: f32,
    pub facing: Facing,
    pub facing_left: bool,
    pub frame: u32,
    pub variant: Option<String>,
}

impl From<&Enemy> for EnemyView {
    fn from(e: &Enemy) -> Self {
        Self {
            id: e.id,
            kind: e.kind,
            center_px: e.pos_px(),
            size_px: e.size_px(),
            rotation: e.rotation,
            facing: e.facing,
            facing_left: e.facing_left,
            frame: e.anim.frame,
            variant: e.variant.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BoostView {
    pub id: u32,
    pub kind: BoostKind,
    pub center_px: Vec2,
    pub size_px: f32,
    pub frame: u32,
}

impl From<&Boost> for BoostView {
    fn from(b: &Boost) -> Self {
        Self {
            id: b.id,
            kind: b.kind(),
            center_px: b.pos_px(),
            size_px: b.bounds().size().x,
            frame: b.anim.frame,
        }
    }
}

/// Current escalation of one enemy class
#[derive(Debug, Clone, Serialize)]
pub struct ClassView {
    pub kind: EnemyKind,
    pub alive: usize,
    pub max_count: u32,
    pub speed_mps: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObjectiveView {
    pub center_px: Vec2,
    pub size_px: f32,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub run_state: RunState,
    pub game_over: Option<GameOverReason>,
    pub timer_remaining_ms: f32,
    /// Frozen at the game-over instant
    pub elapsed_ms: f32,
    pub deliveries: u32,
    pub camera: CameraView,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub boosts: Vec<BoostView>,
    pub objective: Option<ObjectiveView>,
    /// Angle from the player to the objective (radians, screen space)
    pub objective_bearing: Option<f32>,
    pub nearest_boost_bearing: Option<f32>,
    pub float_texts: Vec<FloatText>,
    pub difficulty_step: u32,
    pub classes: Vec<ClassView>,
}

fn bearing(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

impl FrameSnapshot {
    pub fn capture(game: &Game) -> Self {
        let player = &game.player;
        let player_center_px = to_px(player.center_m());
        let objective = game.objective.get();

        Self {
            run_state: game.run_state,
            game_over: game.game_over,
            timer_remaining_ms: game.timer_remaining_ms,
            elapsed_ms: game.elapsed_ms(),
            deliveries: game.deliveries,
            camera: CameraView {
                offset_px: game.camera.offset_px(),
                view_px: game.camera.view_size(),
            },
            player: PlayerView {
                rect: player.rect_px(),
                damage_box: player.damage_box(&game.config.player.collider),
                facing: player.facing,
                facing_left: player.facing_left,
                anim_state: player.anim_state,
                frame: player.anim.frame,
                hp: player.hp,
                max_hp: game.stats.max_hp,
                coins: player.coins,
                hit_flash_ms: player.hit_flash_ms,
                move_speed_mps: game.stats.move_speed_mps,
            },
            enemies: game.spawns.enemies.iter().map(EnemyView::from).collect(),
            boosts: game.boosts.boosts.iter().map(BoostView::from).collect(),
            objective: objective.map(|t| ObjectiveView {
                center_px: t.pos_px(),
                size_px: t.size_px,
            }),
            objective_bearing: objective.map(|t| bearing(player_center_px, t.pos_px())),
            nearest_boost_bearing: game
                .boosts
                .nearest(player.center_m())
                .map(|b| bearing(player_center_px, b.pos_px())),
            float_texts: game.float_texts.clone(),
            difficulty_step: game.difficulty.steps,
            classes: [EnemyKind::Mob, EnemyKind::Dash]
                .into_iter()
                .map(|kind| {
                    let tuning = game.difficulty.class(kind);
                    ClassView {
                        kind,
                        alive: game.spawns.count(kind),
                        max_count: tuning.max_count,
                        speed_mps: tuning.speed_mps,
                    }
                })
                .collect(),
        }
    }

    /// JSON for script-side renderers
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::rng::ScriptedRng;

    fn started() -> Game {
        let mut g = Game::with_rng(GameConfig::default(), Box::new(ScriptedRng::constant(0.0)));
        g.start();
        g
    }

    #[test]
    fn test_snapshot_mirrors_game() {
        let g = started();
        let snap = g.snapshot();
        assert_eq!(snap.run_state, RunState::Running);
        assert_eq!(snap.enemies.len(), g.spawns.enemies.len());
        assert_eq!(snap.player.coins, 100);
        assert_eq!(snap.camera.view_px, Vec2::new(1280.0, 720.0));
        assert!(snap.objective.is_some());
        assert!(snap.nearest_boost_bearing.is_none());
        assert_eq!(snap.difficulty_step, 0);
        assert_eq!(snap.classes[0].alive, g.spawns.count(EnemyKind::Mob));
        assert_eq!(snap.classes[0].max_count, 8);
    }

    #[test]
    fn test_objective_bearing_points_at_target() {
        let g = started();
        let snap = g.snapshot();
        // Target sits 100m along +x from the player's top-left corner
        let b = snap.objective_bearing.unwrap_or(f32::NAN);
        assert!(b.abs() < 0.05);
    }

    #[test]
    fn test_snapshot_serializes() {
        let json = started().snapshot().to_json().unwrap();
        assert!(json.contains("\"run_state\":\"running\""));
        assert!(json.contains("\"kind\":\"mob\""));
    }
}
