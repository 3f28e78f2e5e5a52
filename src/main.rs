//! Orbitone - explore iterated 2D maps by eye and by ear
//!
//! Eight discrete-time maps render as escape-time fields on the GPU
//! while a phase-distortion synthesizer plays the same maps: every held
//! note iterates an orbit whose behaviour drives the voice's timbre.

use std::sync::Arc;

use clap::Parser;
use glam::DVec2;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use orbitone::audio::AudioEngine;
use orbitone::camera::Camera;
use orbitone::cli::Args;
use orbitone::fractal::wgsl::{assemble_field_shader, JULIA_UNSET};
use orbitone::fractal::{MapKind, OrbitTrail};
use orbitone::interaction::{Interaction, PointerButton};
use orbitone::params::{FractalParams, RecordingConfig, RenderConfig, SynthParams};
use orbitone::rendering::{
    pixel_to_ndc, FieldUniforms, RenderSystem, TrailVertex, FLAG_DRAW_JSET, FLAG_DRAW_MSET,
    FLAG_SHOW_MARKER, FLAG_USE_COLOR,
};

/// Map-select keys; the order matches the map ids
fn map_for_key(code: KeyCode) -> Option<MapKind> {
    let id = match code {
        KeyCode::Digit1 => 0,
        KeyCode::Digit2 => 1,
        KeyCode::Digit3 => 2,
        KeyCode::Digit4 => 3,
        KeyCode::Digit5 => 4,
        KeyCode::Digit6 => 5,
        KeyCode::Digit7 => 6,
        KeyCode::Digit8 => 7,
        _ => return None,
    };
    MapKind::from_id(id)
}

/// One-octave keyboard on the bottom letter row: whites on Z..M plus
/// comma for the upper C, sharps on the home row above them
fn note_for_key(code: KeyCode) -> Option<u8> {
    let note = match code {
        KeyCode::KeyZ => 60,
        KeyCode::KeyS => 61,
        KeyCode::KeyX => 62,
        KeyCode::KeyD => 63,
        KeyCode::KeyC => 64,
        KeyCode::KeyV => 65,
        KeyCode::KeyG => 66,
        KeyCode::KeyB => 67,
        KeyCode::KeyH => 68,
        KeyCode::KeyN => 69,
        KeyCode::KeyK => 70,
        KeyCode::KeyM => 71,
        KeyCode::Comma => 72,
        _ => return None,
    };
    Some(note)
}

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Interaction and audio
    camera: Camera,
    input: Interaction,
    audio: Option<AudioEngine>,

    // Active exploration state
    map_kind: MapKind,
    use_color: bool,
    held_notes: u128,
    trail: OrbitTrail,
    last_uniforms: Option<FieldUniforms>,

    // Configuration
    fractal: FractalParams,
    synth: SynthParams,
    render_config: RenderConfig,
    recording: Option<RecordingConfig>,

    // Frame tracking
    frame_num: usize,
}

impl App {
    fn new(args: &Args) -> Self {
        let fractal = FractalParams::default();
        let synth = SynthParams {
            master_gain: args.volume,
            ..SynthParams::default()
        };
        debug_assert!(fractal.validate().is_ok());
        let render_config = RenderConfig::default();
        let recording = args.create_recording_config();
        let map_kind = args.parse_map();

        if let Some(ref rec) = recording {
            println!(
                "Recording {:.1}s ({} frames) to {}/",
                rec.duration_secs,
                rec.total_frames(),
                rec.output_dir
            );
        }

        Self {
            window: None,
            render_system: None,
            camera: Camera::new(render_config.window_width, render_config.window_height),
            input: Interaction::new(),
            audio: None,
            map_kind,
            use_color: false,
            held_notes: 0,
            trail: OrbitTrail::new(fractal.trail_steps),
            last_uniforms: None,
            fractal,
            synth,
            render_config,
            recording,
            frame_num: 0,
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        // Create window
        let window_attributes = Window::default_attributes()
            .with_title("Orbitone - Fractal Orbit Synthesizer")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());
        let size = window.inner_size();
        self.camera.resize(size.width, size.height);

        // Initialize rendering; the field shader is generated from the
        // map library so CPU and GPU agree on every recurrence
        let shader_source = assemble_field_shader(&self.fractal);
        let render_system = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &shader_source,
            self.fractal.trail_steps as usize + 1,
            self.recording.clone(),
        ))
        .unwrap();

        // Initialize audio; a missing output device degrades to silent
        // exploration instead of aborting
        let audio = match AudioEngine::start(
            self.synth.clone(),
            self.fractal.clone(),
            self.recording.as_ref(),
        ) {
            Ok(engine) => Some(engine),
            Err(e) => {
                warn!("Audio disabled: {:#}", e);
                None
            }
        };

        println!("\nOrbitone is running!");
        println!("Left-drag the orbit, wheel to zoom, 1-8 to switch maps");
        println!("Z row plays notes, J pins a Julia seed, ESC quits\n");

        self.window = Some(window);
        self.render_system = Some(render_system);
        self.audio = audio;
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                self.camera.resize(size.width, size.height);
                if let Some(ref mut render_system) = self.render_system {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input
                    .cursor_moved(DVec2::new(position.x, position.y), &mut self.camera);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    MouseButton::Left => PointerButton::Left,
                    MouseButton::Middle => PointerButton::Middle,
                    MouseButton::Right => PointerButton::Right,
                    _ => return,
                };
                self.input.button(button, state.is_pressed(), &self.camera);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y as f64,
                    MouseScrollDelta::PixelDelta(p) => p.y / 50.0,
                };
                self.input.wheel(lines, &mut self.camera);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_key(event_loop, event);
            }
            WindowEvent::RedrawRequested => {
                self.render_frame(event_loop);
            }
            _ => {}
        }
    }
}

impl App {
    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: KeyEvent) {
        if event.repeat {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let pressed = event.state.is_pressed();

        if let Some(note) = note_for_key(code) {
            if pressed {
                self.held_notes |= 1u128 << note;
            } else {
                self.held_notes &= !(1u128 << note);
            }
            return;
        }

        if pressed {
            if let Some(kind) = map_for_key(code) {
                if kind != self.map_kind {
                    info!(map = kind.name(), "map selected");
                    self.map_kind = kind;
                }
                return;
            }
        }

        match code {
            KeyCode::Escape if pressed => event_loop.exit(),
            KeyCode::KeyJ => self.input.julia_key(pressed, &self.camera),
            KeyCode::KeyR if pressed => self.input.reset_view(&mut self.camera),
            KeyCode::F2 if pressed => self.use_color = !self.use_color,
            _ => {}
        }
    }

    /// Render a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(ref window) = self.window else {
            return;
        };
        let Some(ref mut render_system) = self.render_system else {
            return;
        };
        let size = window.inner_size();

        // Advance camera easing
        self.camera.tick();

        // Re-trace the orbit trail; the marker may only advance as many
        // steps as fit in one frame at the audible step-rate cap
        let marker_budget =
            (self.synth.max_step_rate_hz / self.render_config.target_fps as f32) as u32;
        self.trail.retrace(
            self.map_kind,
            self.input.orbit_seed,
            self.input.julia,
            self.fractal.trail_steps,
            marker_budget,
            self.fractal.escape_radius_sq,
        );

        // Assemble field uniforms
        let julia = self.input.julia;
        let mut flags = if julia.is_some() {
            FLAG_DRAW_JSET
        } else {
            FLAG_DRAW_MSET
        };
        if self.use_color {
            flags |= FLAG_USE_COLOR;
        }
        let trail_visible = !self.input.trail_hidden;
        if trail_visible {
            flags |= FLAG_SHOW_MARKER;
        }

        let mut uniforms = FieldUniforms {
            resolution: [size.width as f32, size.height as f32],
            cam: [self.camera.cam.x as f32, self.camera.cam.y as f32],
            julia: julia.map_or([JULIA_UNSET, JULIA_UNSET], |j| [j.x as f32, j.y as f32]),
            marker: [self.trail.marker.x as f32, self.trail.marker.y as f32],
            zoom: self.camera.zoom as f32,
            map_id: self.map_kind.id(),
            flags,
            frame_age: 0,
        };

        // The frame age feeds the progressive-blend weight: it grows
        // while the view is unchanged and snaps to zero on any change
        let refresh = self.input.take_refresh();
        if let Some(prev) = self.last_uniforms {
            let mut probe = uniforms;
            probe.frame_age = prev.frame_age;
            if probe == prev && !refresh {
                uniforms.frame_age = prev.frame_age.saturating_add(1);
            }
        }
        self.last_uniforms = Some(uniforms);

        render_system.update_field_uniforms(&uniforms);

        if trail_visible {
            let vertices: Vec<TrailVertex> = self
                .trail
                .points
                .iter()
                .map(|p| TrailVertex {
                    position: pixel_to_ndc(
                        self.camera.point_to_screen(*p),
                        size.width,
                        size.height,
                    ),
                })
                .collect();
            render_system.update_trail(&vertices);
        }

        // Render
        match render_system.render(self.frame_num, trail_visible) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_system.resize(size.width, size.height);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => warn!("Render error: {:?}", e),
        }

        // Publish control state to the audio callback
        if let Some(ref audio) = self.audio {
            if let Ok(mut shared) = audio.shared.lock() {
                shared.map_id = self.map_kind.id();
                shared.julia = self.input.julia;
                shared.held_notes = self.held_notes;
                shared.gain = self.synth.master_gain;
            }
        }

        self.frame_num += 1;
        if let Some(ref rec) = self.recording {
            if self.frame_num >= rec.total_frames() {
                info!(frames = self.frame_num, "recording complete");
                event_loop.exit();
            }
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    println!("Orbitone - fractal orbits as image and instrument");

    let mut app = App::new(&args);
    let event_loop = EventLoop::new().unwrap();
    let _ = event_loop.run_app(&mut app);
}
