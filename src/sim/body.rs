//! Kinematic body shared by every simulated object
//!
//! Position, velocity, friction decay and optional clip region. Motion is
//! per-step: `move_step` adds the whole velocity once, regardless of frame time.

use glam::Vec2;

/// What happens to a coordinate that leaves the clip region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipMode {
    /// Teleport to the opposite edge (single step, not modulo)
    Wrap,
    /// Pin to the nearest edge
    Clamp,
}

/// Axis-aligned clip region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRegion {
    pub min: Vec2,
    pub max: Vec2,
    pub mode: ClipMode,
    /// Inactive regions are remembered but not enforced
    pub active: bool,
}

impl ClipRegion {
    pub fn wrap(min: Vec2, max: Vec2) -> Self {
        Self {
            min,
            max,
            mode: ClipMode::Wrap,
            active: true,
        }
    }

    pub fn clamp(min: Vec2, max: Vec2) -> Self {
        Self {
            min,
            max,
            mode: ClipMode::Clamp,
            active: true,
        }
    }

    /// Apply the region to a candidate position
    pub fn apply(&self, pos: Vec2) -> Vec2 {
        if !self.active {
            return pos;
        }
        match self.mode {
            ClipMode::Wrap => Vec2::new(
                wrap_axis(pos.x, self.min.x, self.max.x),
                wrap_axis(pos.y, self.min.y, self.max.y),
            ),
            ClipMode::Clamp => Vec2::new(
                pos.x.clamp(self.min.x, self.max.x),
                pos.y.clamp(self.min.y, self.max.y),
            ),
        }
    }
}

#[inline]
fn wrap_axis(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        max
    } else if value > max {
        min
    } else {
        value
    }
}

/// Render-space bounding box, relative to the body position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Square box of half-extent `r`
    pub fn square(r: f32) -> Self {
        Self::new(Vec2::splat(-r), Vec2::splat(r))
    }
}

/// Visible area in world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub top_left: Vec2,
    pub bottom_right: Vec2,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            top_left: Vec2::ZERO,
            bottom_right: Vec2::new(width, height),
        }
    }
}

/// Kinematic state of a simulated object
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Per-step velocity decay factor in (0, 1]
    pub friction: f32,
    pub clip: Option<ClipRegion>,
    /// `None` means always drawn
    pub render_bounds: Option<Bounds>,
    /// Removal is deferred until after every entity has thought this tick
    pub remove: bool,
}

impl Body {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            friction: 1.0,
            clip: None,
            render_bounds: Some(Bounds::square(1.0)),
            remove: false,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_clip(mut self, clip: ClipRegion) -> Self {
        self.clip = Some(clip);
        self
    }

    pub fn with_render_bounds(mut self, bounds: Option<Bounds>) -> Self {
        self.render_bounds = bounds;
        self
    }

    /// Advance one step: translate, clip, then decay velocity
    pub fn move_step(&mut self) {
        let next = self.pos + self.vel;
        self.pos = match self.clip {
            Some(clip) => clip.apply(next),
            None => next,
        };
        self.vel *= self.friction;
    }

    /// Push along a heading
    pub fn accelerate(&mut self, bearing: f32, amplitude: f32) {
        self.vel += Vec2::new(bearing.cos(), bearing.sin()) * amplitude;
    }

    /// Whether the render box intersects the viewport
    pub fn on_screen(&self, view: &Viewport) -> bool {
        let Some(bounds) = self.render_bounds else {
            return true;
        };
        let lo = self.pos + bounds.min;
        let hi = self.pos + bounds.max;
        lo.x <= view.bottom_right.x
            && hi.x >= view.top_left.x
            && lo.y <= view.bottom_right.y
            && hi.y >= view.top_left.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn screen_wrap() -> ClipRegion {
        ClipRegion::wrap(Vec2::ZERO, Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_move_without_clip_is_unconstrained() {
        let mut body = Body::new(Vec2::new(10.0, 10.0)).with_velocity(Vec2::new(-50.0, 3.0));
        body.move_step();
        assert_eq!(body.pos, Vec2::new(-40.0, 13.0));
    }

    #[test]
    fn test_wrap_goes_to_opposite_edge() {
        let mut body = Body::new(Vec2::new(799.0, 300.0))
            .with_velocity(Vec2::new(5.0, 0.0))
            .with_clip(screen_wrap());
        body.move_step();
        assert_eq!(body.pos.x, 0.0);
        assert_eq!(body.pos.y, 300.0);

        let mut body = Body::new(Vec2::new(400.0, 1.0))
            .with_velocity(Vec2::new(0.0, -3.0))
            .with_clip(screen_wrap());
        body.move_step();
        assert_eq!(body.pos.y, 600.0);
    }

    #[test]
    fn test_wrap_is_not_modulo() {
        // Far outside still lands exactly on the opposite bound
        let mut body = Body::new(Vec2::new(-4000.0, 5000.0)).with_clip(screen_wrap());
        body.move_step();
        assert_eq!(body.pos, Vec2::new(800.0, 0.0));
    }

    #[test]
    fn test_clamp_pins_to_edge() {
        let mut body = Body::new(Vec2::new(790.0, 10.0))
            .with_velocity(Vec2::new(20.0, -20.0))
            .with_clip(ClipRegion::clamp(Vec2::ZERO, Vec2::new(800.0, 600.0)));
        body.move_step();
        assert_eq!(body.pos, Vec2::new(800.0, 0.0));
    }

    #[test]
    fn test_inactive_clip_is_ignored() {
        let mut clip = screen_wrap();
        clip.active = false;
        let mut body = Body::new(Vec2::new(799.0, 0.0))
            .with_velocity(Vec2::new(5.0, 0.0))
            .with_clip(clip);
        body.move_step();
        assert_eq!(body.pos.x, 804.0);
    }

    #[test]
    fn test_friction_decays_velocity_after_move() {
        let mut body = Body::new(Vec2::ZERO)
            .with_velocity(Vec2::new(10.0, 0.0))
            .with_friction(0.5);
        body.move_step();
        assert_eq!(body.pos.x, 10.0);
        assert_eq!(body.vel.x, 5.0);
        body.move_step();
        assert_eq!(body.pos.x, 15.0);
    }

    #[test]
    fn test_on_screen_culling() {
        let view = Viewport::new(800.0, 600.0);
        let body = Body::new(Vec2::new(-10.0, 300.0)).with_render_bounds(Some(Bounds::square(16.0)));
        assert!(body.on_screen(&view));
        let body = Body::new(Vec2::new(-40.0, 300.0)).with_render_bounds(Some(Bounds::square(16.0)));
        assert!(!body.on_screen(&view));
        let body = Body::new(Vec2::new(-4000.0, 0.0)).with_render_bounds(None);
        assert!(body.on_screen(&view));
    }

    proptest! {
        #[test]
        fn prop_wrap_lands_on_opposite_bound(
            x in 0.0f32..800.0,
            y in 0.0f32..600.0,
            vx in -50.0f32..50.0,
            vy in -50.0f32..50.0,
        ) {
            let mut body = Body::new(Vec2::new(x, y))
                .with_velocity(Vec2::new(vx, vy))
                .with_clip(screen_wrap());
            let raw = body.pos + body.vel;
            body.move_step();
            if raw.x > 800.0 { prop_assert_eq!(body.pos.x, 0.0); }
            else if raw.x < 0.0 { prop_assert_eq!(body.pos.x, 800.0); }
            else { prop_assert_eq!(body.pos.x, raw.x); }
            if raw.y > 600.0 { prop_assert_eq!(body.pos.y, 0.0); }
            else if raw.y < 0.0 { prop_assert_eq!(body.pos.y, 600.0); }
            else { prop_assert_eq!(body.pos.y, raw.y); }
        }

        #[test]
        fn prop_clip_keeps_body_inside(
            x in -2000.0f32..2000.0,
            y in -2000.0f32..2000.0,
            wrap in any::<bool>(),
        ) {
            let region = if wrap { screen_wrap() } else { ClipRegion::clamp(Vec2::ZERO, Vec2::new(800.0, 600.0)) };
            let mut body = Body::new(Vec2::new(x, y)).with_clip(region);
            body.move_step();
            prop_assert!(body.pos.x >= 0.0 && body.pos.x <= 800.0);
            prop_assert!(body.pos.y >= 0.0 && body.pos.y <= 600.0);
        }
    }
}
