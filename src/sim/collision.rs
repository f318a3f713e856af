//! Collision primitives shared by every gameplay system
//!
//! All shapes here are in world pixels. Sprites carry cosmetic overdraw
//! (hats, shadows, exhaust), so damage shapes are derived by trimming the
//! visual rectangle rather than using it directly.

use glam::Vec2;
use serde::Serialize;

use super::anim::Facing;
use crate::config::{ColliderConfig, Trim};

/// Axis-aligned box, `min` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self::new(min, min + size)
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self::new(center - half, center + half)
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    /// Strict overlap; boxes that only share an edge do not intersect
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Point of this box closest to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }

    /// Shrink each side by its trim ratio of the full size
    ///
    /// Left/top edges round down and right/bottom edges round up, so the
    /// trimmed box never loses a partially covered pixel column.
    pub fn trimmed(&self, trim: &Trim) -> Aabb {
        let t = trim.clamped();
        let size = self.size();
        Aabb::new(
            Vec2::new(
                self.min.x + (size.x * t.left).floor(),
                self.min.y + (size.y * t.top).floor(),
            ),
            Vec2::new(
                self.min.x + (size.x * (1.0 - t.right)).ceil(),
                self.min.y + (size.y * (1.0 - t.bottom)).ceil(),
            ),
        )
    }
}

/// Player hit box: the sprite rectangle minus cosmetic overdraw
pub fn player_damage_box(sprite: &Aabb, trim: &Trim) -> Aabb {
    sprite.trimmed(trim)
}

/// Damage shape of an enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum EnemyCollider {
    Circle { center: Vec2, radius: f32 },
    Box(Aabb),
}

impl EnemyCollider {
    /// Overlap test against the player's damage box
    pub fn overlaps(&self, player_box: &Aabb) -> bool {
        match self {
            EnemyCollider::Circle { center, radius } => {
                let q = player_box.closest_point(*center);
                center.distance_squared(q) <= radius * radius
            }
            EnemyCollider::Box(aabb) => aabb.intersects(player_box),
        }
    }
}

/// Build the collider for an enemy centered at `center` with a square sprite
pub fn enemy_collider(
    config: &ColliderConfig,
    center: Vec2,
    size: f32,
    facing: Facing,
) -> EnemyCollider {
    match config {
        ColliderConfig::Circle => EnemyCollider::Circle {
            center,
            radius: size / 2.0,
        },
        ColliderConfig::Aabb {
            trim,
            up,
            down,
            side,
        } => {
            let per_facing = match facing {
                Facing::Up => up,
                Facing::Down => down,
                Facing::Side => side,
            };
            let trim = per_facing.as_ref().unwrap_or(trim);
            let sprite = Aabb::from_center(center, Vec2::splat(size));
            EnemyCollider::Box(sprite.trimmed(trim))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn square(x: f32, y: f32, s: f32) -> Aabb {
        Aabb::from_min_size(Vec2::new(x, y), Vec2::splat(s))
    }

    #[test]
    fn test_aabb_overlap_and_touching() {
        let a = square(0.0, 0.0, 10.0);
        assert!(a.intersects(&square(5.0, 5.0, 10.0)));
        // Shared edge only
        assert!(!a.intersects(&square(10.0, 0.0, 10.0)));
        assert!(!a.intersects(&square(0.0, 10.0, 10.0)));
        assert!(!a.intersects(&square(20.0, 20.0, 5.0)));
    }

    #[test]
    fn test_player_damage_box_default_trims() {
        let sprite = square(100.0, 200.0, 46.0);
        let trim = Trim::new(0.25, 0.25, 0.10, 0.03);
        let hit = player_damage_box(&sprite, &trim);
        assert_eq!(hit.min, Vec2::new(100.0 + 11.0, 200.0 + 4.0));
        assert_eq!(hit.max, Vec2::new(100.0 + 35.0, 200.0 + 45.0));
    }

    #[test]
    fn test_trim_clamp_prevents_inversion() {
        let sprite = square(0.0, 0.0, 100.0);
        let hit = sprite.trimmed(&Trim::new(0.9, 0.9, 0.9, 0.9));
        assert!(hit.min.x < hit.max.x);
        assert!(hit.min.y < hit.max.y);
    }

    #[test]
    fn test_circle_collider_uses_closest_point() {
        let player = square(0.0, 0.0, 20.0);
        let near = EnemyCollider::Circle {
            center: Vec2::new(25.0, 10.0),
            radius: 6.0,
        };
        let far = EnemyCollider::Circle {
            center: Vec2::new(30.0, 30.0),
            radius: 6.0,
        };
        assert!(near.overlaps(&player));
        // Diagonal distance to the corner is ~14.1
        assert!(!far.overlaps(&player));
    }

    #[test]
    fn test_enemy_collider_picks_facing_trim() {
        let config = ColliderConfig::Aabb {
            trim: Trim::default(),
            up: None,
            down: None,
            side: Some(Trim::new(0.25, 0.25, 0.0, 0.0)),
        };
        let side = enemy_collider(&config, Vec2::ZERO, 32.0, Facing::Side);
        let down = enemy_collider(&config, Vec2::ZERO, 32.0, Facing::Down);
        match (side, down) {
            (EnemyCollider::Box(s), EnemyCollider::Box(d)) => {
                assert_eq!(s.size().x, 16.0);
                // No override for down: falls back to the base trim
                assert_eq!(d.size().x, 32.0);
            }
            _ => panic!("expected box colliders"),
        }
    }

    #[test]
    fn test_circle_collider_radius_is_half_size() {
        let c = enemy_collider(&ColliderConfig::Circle, Vec2::new(5.0, 5.0), 32.0, Facing::Up);
        assert_eq!(
            c,
            EnemyCollider::Circle {
                center: Vec2::new(5.0, 5.0),
                radius: 16.0
            }
        );
    }

    proptest! {
        #[test]
        fn intersects_is_symmetric(
            ax in -100.0f32..100.0, ay in -100.0f32..100.0, aw in 1.0f32..50.0,
            bx in -100.0f32..100.0, by in -100.0f32..100.0, bw in 1.0f32..50.0,
        ) {
            let a = square(ax, ay, aw);
            let b = square(bx, by, bw);
            prop_assert_eq!(a.intersects(&b), b.intersects(&a));
        }
    }
}
