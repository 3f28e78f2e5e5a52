//! Pointer and key gestures, kept free of windowing types so the whole
//! state machine is testable headless.
//!
//! The window loop translates winit events into the calls below; this
//! module owns the orbit seed, the pinned Julia parameter, and the
//! trail-overlay visibility those gestures edit.

use glam::DVec2;

use crate::camera::Camera;

/// Wheel zoom step per scroll line
const WHEEL_STEP: f64 = 1.25;

/// Pointer buttons the gesture machine distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

/// Gesture state driving the orbit seed and Julia pin.
pub struct Interaction {
    /// Seed the orbit trail and the synth voices iterate from
    pub orbit_seed: DVec2,

    /// Pinned Julia parameter; `None` renders the parameter-space view
    pub julia: Option<DVec2>,

    /// Trail overlay visibility; the right button toggles it and the
    /// Julia gestures hide it
    pub trail_hidden: bool,

    needs_refresh: bool,
    cursor: DVec2,
    dragging_orbit: bool,
    dragging_pan: bool,
    pinning_julia: bool,
    julia_key_down: bool,
}

impl Interaction {
    pub fn new() -> Self {
        Self {
            orbit_seed: DVec2::ZERO,
            julia: None,
            trail_hidden: false,
            needs_refresh: false,
            cursor: DVec2::ZERO,
            dragging_orbit: false,
            dragging_pan: false,
            pinning_julia: false,
            julia_key_down: false,
        }
    }

    /// Pointer moved to a new window pixel.
    ///
    /// Active drags consume the motion: a pan drag feeds the camera, an
    /// orbit drag re-seeds the trail, a Julia pin re-seeds the pin.
    pub fn cursor_moved(&mut self, pixel: DVec2, camera: &mut Camera) {
        let delta = pixel - self.cursor;
        self.cursor = pixel;

        if self.dragging_pan {
            camera.pan_pixels(delta);
        }
        if self.dragging_orbit {
            self.orbit_seed = camera.screen_to_point(pixel);
        }
        if self.pinning_julia {
            self.julia = Some(camera.screen_to_point(pixel));
        }
    }

    pub fn button(&mut self, button: PointerButton, pressed: bool, camera: &Camera) {
        match button {
            PointerButton::Left => {
                self.dragging_orbit = pressed;
                if pressed {
                    // grabbing the orbit always brings the trail back
                    self.trail_hidden = false;
                    self.orbit_seed = camera.screen_to_point(self.cursor);
                }
            }
            PointerButton::Middle => {
                self.dragging_pan = pressed;
            }
            PointerButton::Right => {
                if pressed {
                    self.trail_hidden = !self.trail_hidden;
                }
            }
        }
    }

    /// Scroll wheel zooms regardless of any drag in progress
    pub fn wheel(&mut self, scroll_lines: f64, camera: &mut Camera) {
        camera.zoom_around(WHEEL_STEP.powf(scroll_lines), self.cursor);
    }

    /// Julia toggle key.
    ///
    /// Press with no seed set: start pinning, the seed follows the
    /// cursor until release, and the trail hides. Release keeps the
    /// seed. Press with a seed already set: clear it (one-shot) and
    /// hide the trail again. Key repeats are ignored.
    pub fn julia_key(&mut self, pressed: bool, camera: &Camera) {
        if pressed {
            if self.julia_key_down {
                return;
            }
            self.julia_key_down = true;
            if self.julia.is_some() {
                self.julia = None;
                self.trail_hidden = true;
            } else {
                self.pinning_julia = true;
                self.trail_hidden = true;
                self.julia = Some(camera.screen_to_point(self.cursor));
            }
        } else {
            self.julia_key_down = false;
            self.pinning_julia = false;
        }
    }

    /// Snap the camera home and ask for an un-eased redraw
    pub fn reset_view(&mut self, camera: &mut Camera) {
        camera.reset();
        self.needs_refresh = true;
    }

    /// Consume the pending refresh request, if any
    pub fn take_refresh(&mut self) -> bool {
        std::mem::take(&mut self.needs_refresh)
    }
}

impl Default for Interaction {
    fn default() -> Self {
        Self::new()
    }
}
