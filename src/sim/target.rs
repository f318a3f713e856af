//! Delivery objective

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::rng::RandomSource;
use crate::consts::*;
use crate::{polar_to_cartesian, to_px};

/// A delivery point; `pos` is its center in world meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub pos: Vec2,
    /// Side length (px)
    pub size_px: f32,
}

impl Target {
    pub fn new(pos: Vec2, size_m: f32) -> Self {
        Self {
            pos,
            size_px: (size_m * SCALE).round(),
        }
    }

    /// Random bearing and distance in [min, max) meters from `origin`
    ///
    /// Draws distance first, then bearing.
    pub fn spawn_around(
        origin: Vec2,
        min_m: f32,
        max_m: f32,
        size_m: f32,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let distance = rng.range(min_m, max_m);
        let angle = rng.angle();
        Self::new(origin + polar_to_cartesian(distance, angle), size_m)
    }

    pub fn pos_px(&self) -> Vec2 {
        to_px(self.pos)
    }

    /// Pickup box (px), centered on the target
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos_px(), Vec2::splat(self.size_px))
    }
}

/// The single live objective, if any
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Objective {
    current: Option<Target>,
}

impl Objective {
    pub fn get(&self) -> Option<&Target> {
        self.current.as_ref()
    }

    /// Replace the live objective with a new one around `origin`
    pub fn spawn_around(
        &mut self,
        origin: Vec2,
        min_m: f32,
        max_m: f32,
        size_m: f32,
        rng: &mut dyn RandomSource,
    ) -> &Target {
        self.current
            .insert(Target::spawn_around(origin, min_m, max_m, size_m, rng))
    }

    /// Remove and return the live objective
    pub fn take(&mut self) -> Option<Target> {
        self.current.take()
    }

    /// Take the objective if `player_rect` touches it
    pub fn try_collect(&mut self, player_rect: &Aabb) -> Option<Target> {
        if self.current?.bounds().intersects(player_rect) {
            self.take()
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::ScriptedRng;

    #[test]
    fn test_spawn_at_bearing_zero() {
        let mut rng = ScriptedRng::constant(0.0);
        let t = Target::spawn_around(Vec2::ZERO, 100.0, 100.0, 3.2, &mut rng);
        assert_eq!(t.pos_px(), Vec2::new(1000.0, 0.0));
        assert_eq!(t.size_px, 32.0);
    }

    #[test]
    fn test_spawn_distance_within_band() {
        let mut rng = crate::sim::rng::seeded(9);
        for _ in 0..100 {
            let t = Target::spawn_around(Vec2::new(5.0, 5.0), 100.0, 500.0, 3.2, &mut rng);
            let d = t.pos.distance(Vec2::new(5.0, 5.0));
            assert!((100.0 - 1e-3..=500.0 + 1e-3).contains(&d));
        }
    }

    #[test]
    fn test_objective_is_single_instance() {
        let mut obj = Objective::default();
        let mut rng = ScriptedRng::constant(0.0);
        obj.spawn_around(Vec2::ZERO, 10.0, 10.0, 2.0, &mut rng);
        obj.spawn_around(Vec2::ZERO, 20.0, 20.0, 2.0, &mut rng);
        assert_eq!(obj.get().map(|t| t.pos), Some(Vec2::new(20.0, 0.0)));
    }

    #[test]
    fn test_collect_on_overlap_only() {
        let mut obj = Objective::default();
        let mut rng = ScriptedRng::constant(0.0);
        obj.spawn_around(Vec2::ZERO, 100.0, 100.0, 3.2, &mut rng);

        let miss = Aabb::from_min_size(Vec2::new(0.0, 0.0), Vec2::splat(46.0));
        assert!(obj.try_collect(&miss).is_none());
        assert!(obj.get().is_some());

        let hit = Aabb::from_min_size(Vec2::new(970.0, -20.0), Vec2::splat(46.0));
        assert!(obj.try_collect(&hit).is_some());
        assert!(obj.get().is_none());
    }
}
