/*
 * Camera Module
 *
 * Top-down camera over the flock. World X maps to screen X and world Z maps to
 * screen Y; height is dropped. The view can be panned and zoomed, and reset to
 * frame the bounds box of the active flock.
 */

use nannou::prelude::*;

// Fraction of the window the bounds box takes up after a reset
const FIT_MARGIN: f32 = 0.8;

pub struct Camera {
    pub center: Vec2,
    pub zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    drag_anchor: Option<Vec2>,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            center: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: 0.5,
            max_zoom: 100.0,
            drag_anchor: None,
        }
    }

    /// Centre on the bounds box and pick the zoom that fits its x/z extent.
    pub fn fit(&mut self, bounds_center: glam::Vec3, bounds_size: glam::Vec3, window_rect: Rect) {
        self.center = Self::project(bounds_center);
        let extent = vec2(bounds_size.x, bounds_size.z).max(Vec2::splat(1.0)) * 2.0;
        let zoom = (window_rect.w() / extent.x).min(window_rect.h() / extent.y) * FIT_MARGIN;
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn project(world: glam::Vec3) -> Vec2 {
        vec2(world.x, world.z)
    }

    pub fn world_to_screen(&self, world: glam::Vec3, window_rect: Rect) -> Vec2 {
        (Self::project(world) - self.center) * self.zoom + window_rect.xy()
    }

    pub fn screen_to_plane(&self, point: Vec2, window_rect: Rect) -> Vec2 {
        (point - window_rect.xy()) / self.zoom + self.center
    }

    // Length on screen of a world distance
    pub fn scale(&self, distance: f32) -> f32 {
        distance * self.zoom
    }

    // Zoom around the cursor so the plane point under it stays put
    pub fn zoom_at(&mut self, scroll: f32, cursor: Vec2, window_rect: Rect) {
        let before = self.screen_to_plane(cursor, window_rect);
        self.zoom = (self.zoom * (1.0 + scroll * 0.1)).clamp(self.min_zoom, self.max_zoom);
        let after = self.screen_to_plane(cursor, window_rect);
        self.center += before - after;
    }

    pub fn start_drag(&mut self, cursor: Vec2) {
        self.drag_anchor = Some(cursor);
    }

    pub fn drag(&mut self, cursor: Vec2) {
        if let Some(anchor) = self.drag_anchor {
            self.center -= (cursor - anchor) / self.zoom;
            self.drag_anchor = Some(cursor);
        }
    }

    pub fn end_drag(&mut self) {
        self.drag_anchor = None;
    }
}
