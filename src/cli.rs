//! Command-line argument parsing.

use clap::Parser;

use crate::fractal::MapKind;
use crate::params::RecordingConfig;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Orbitone")]
#[command(about = "Fractal orbit explorer with a playable synthesizer", long_about = None)]
pub struct Args {
    /// Record the session to frames and audio (duration in seconds)
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,

    /// Starting map: mandelbrot, burning-ship, feather, sfx, henon, duffing, ikeda, chirikov
    #[arg(long, value_name = "MAP", default_value = "mandelbrot")]
    pub map: String,

    /// Master gain (linear)
    #[arg(long, value_name = "GAIN", default_value = "0.3")]
    pub volume: f32,
}

impl Args {
    /// Parse the starting map from command-line arguments
    pub fn parse_map(&self) -> MapKind {
        match MapKind::from_slug(&self.map) {
            Some(kind) => {
                println!("Map: {}", kind.name());
                kind
            }
            None => {
                eprintln!("Warning: Unknown map '{}', using Mandelbrot", self.map);
                MapKind::Mandelbrot
            }
        }
    }

    /// Create recording configuration if recording mode is enabled
    pub fn create_recording_config(&self) -> Option<RecordingConfig> {
        self.record.map(|duration| {
            let config = RecordingConfig::new(duration);

            // Create output directories
            std::fs::create_dir_all(config.frames_dir()).expect("Failed to create frames directory");
            std::fs::create_dir_all(&config.output_dir).expect("Failed to create output directory");

            config
        })
    }
}
