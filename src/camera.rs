//! Smoothed pan/zoom viewport over the plane.

use glam::DVec2;

/// Zoom applied when the view first opens and after a reset
pub const DEFAULT_ZOOM: f64 = 100.0;

// Per-tick easing: keep 0.8 of the current value, pull 0.2 toward the
// destination. Fixed rather than configurable; the interaction feel is
// tuned around it.
const SMOOTHING_KEEP: f64 = 0.8;
const SMOOTHING_PULL: f64 = 0.2;

/// Eased viewport mapping window pixels onto plane coordinates.
///
/// Wheel and drag input only move the destinations; [`Camera::tick`]
/// eases the visible pan and zoom toward them once per frame.
pub struct Camera {
    /// Current pan (plane units)
    pub cam: DVec2,
    pub cam_dest: DVec2,
    /// Current zoom (pixels per plane unit); always positive
    pub zoom: f64,
    pub zoom_dest: f64,
    /// Pixel position of the last wheel event; zoom settles around it
    anchor: DVec2,
    half_size: DVec2,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        let half_size = DVec2::new(width as f64, height as f64) * 0.5;
        Self {
            cam: DVec2::ZERO,
            cam_dest: DVec2::ZERO,
            zoom: DEFAULT_ZOOM,
            zoom_dest: DEFAULT_ZOOM,
            anchor: half_size,
            half_size,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.half_size = DVec2::new(width as f64, height as f64) * 0.5;
    }

    /// Map a window pixel to its point on the plane
    pub fn screen_to_point(&self, pixel: DVec2) -> DVec2 {
        (pixel - self.half_size) / self.zoom - self.cam
    }

    /// Exact inverse of [`Camera::screen_to_point`]
    pub fn point_to_screen(&self, point: DVec2) -> DVec2 {
        (point + self.cam) * self.zoom + self.half_size
    }

    /// Scale the zoom destination around a pixel anchor.
    ///
    /// The plane point under the anchor stays put while easing carries
    /// the zoom there over the following ticks.
    pub fn zoom_around(&mut self, factor: f64, anchor_pixel: DVec2) {
        debug_assert!(factor > 0.0);
        self.anchor = anchor_pixel;
        self.zoom_dest *= factor;
    }

    /// Drag the view by a pixel delta; only the destination moves, the
    /// visible pan follows through easing
    pub fn pan_pixels(&mut self, delta: DVec2) {
        self.cam_dest += delta / self.zoom;
    }

    /// Advance easing one frame: zoom first, then re-pin the wheel
    /// anchor, then pan.
    pub fn tick(&mut self) {
        let before = self.screen_to_point(self.anchor);
        self.zoom = self.zoom * SMOOTHING_KEEP + self.zoom_dest * SMOOTHING_PULL;
        let after = self.screen_to_point(self.anchor);

        // the zoom step moved the anchor's plane point; shift both pans
        // so it stays under the cursor
        let correction = after - before;
        self.cam_dest += correction;
        self.cam += correction;

        self.cam = self.cam * SMOOTHING_KEEP + self.cam_dest * SMOOTHING_PULL;
    }

    /// Snap pan and zoom, current and destination both, back to the
    /// defaults
    pub fn reset(&mut self) {
        self.cam = DVec2::ZERO;
        self.cam_dest = DVec2::ZERO;
        self.zoom = DEFAULT_ZOOM;
        self.zoom_dest = DEFAULT_ZOOM;
    }
}
