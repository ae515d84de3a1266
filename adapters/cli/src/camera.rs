//! Viewport camera that follows the player across the playfield.

use swarm_survival_core::{Bounds, Position, Rect};

/// Screen-sized window clamped into the world, supplying the viewport
/// rectangle the spawner samples its edges from.
#[derive(Debug)]
pub(crate) struct Camera {
    screen_width: f32,
    screen_height: f32,
    bounds: Bounds,
    view: Rect,
}

impl Camera {
    /// Creates a camera of the given screen size over the provided bounds.
    #[must_use]
    pub(crate) fn new(screen_width: f32, screen_height: f32, bounds: Bounds) -> Self {
        let mut camera = Self {
            screen_width,
            screen_height,
            bounds,
            view: Rect::new(0.0, 0.0, screen_width, screen_height),
        };
        camera.follow(Position::new(bounds.width() / 2.0, bounds.height() / 2.0));
        camera
    }

    /// Re-centers the view on the target, clamped to the world edges.
    pub(crate) fn follow(&mut self, target: Position) {
        let max_x = (self.bounds.width() - self.screen_width).max(0.0);
        let max_y = (self.bounds.height() - self.screen_height).max(0.0);
        let x = (target.x() - self.screen_width / 2.0).clamp(0.0, max_x);
        let y = (target.y() - self.screen_height / 2.0).clamp(0.0, max_y);
        self.view = Rect::new(x, y, self.screen_width, self.screen_height);
    }

    /// Current viewport rectangle.
    #[must_use]
    pub(crate) fn view_rect(&self) -> Rect {
        self.view
    }
}
