//! cpal output stream wiring the voice pool to the shared control state.

use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use crate::fractal::MapKind;
use crate::params::{FractalParams, RecordingConfig, SynthParams};

use super::voice::VoicePool;
use super::SharedParams;

/// Audio engine owning the output stream and the shared control state.
///
/// The UI thread writes [`SharedParams`] through `shared`; the callback
/// reads them with a try-lock and never blocks. Nothing on the audio
/// path touches the camera or the renderer.
pub struct AudioEngine {
    pub shared: Arc<Mutex<SharedParams>>,

    /// Output stream (kept alive for the engine's lifetime)
    _stream: cpal::Stream,
}

impl AudioEngine {
    /// Open the default output device and start synthesis.
    ///
    /// `fractal` is the same iteration configuration the renderer uses;
    /// sharing it keeps a note's drive consistent with its pixel.
    pub fn start(
        synth: SynthParams,
        fractal: FractalParams,
        recording: Option<&RecordingConfig>,
    ) -> Result<Self> {
        synth
            .validate()
            .map_err(|e| anyhow!("Invalid synth config: {}", e))?;
        fractal
            .validate()
            .map_err(|e| anyhow!("Invalid fractal config: {}", e))?;

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .context("No audio output device found")?;
        let config = device
            .default_output_config()
            .context("Failed to get audio config")?;

        if config.sample_format() != cpal::SampleFormat::F32 {
            return Err(anyhow!(
                "Unsupported output sample format {:?}",
                config.sample_format()
            ));
        }

        let sample_rate = config.sample_rate().0;
        let channels = config.channels() as usize;
        info!(
            device = %device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate,
            channels,
            "audio output ready"
        );

        // WAV capture shares the exact samples the device hears
        let wav_writer = match recording {
            Some(config) => {
                let spec = hound::WavSpec {
                    channels: channels as u16,
                    sample_rate,
                    bits_per_sample: 32,
                    sample_format: hound::SampleFormat::Float,
                };
                let writer = hound::WavWriter::create(config.audio_path(), spec)
                    .context("Failed to create WAV writer")?;
                Some(Arc::new(Mutex::new(writer)))
            }
            None => None,
        };

        let shared = Arc::new(Mutex::new(SharedParams {
            gain: synth.master_gain,
            ..Default::default()
        }));
        let shared_for_callback = Arc::clone(&shared);

        let mut pool = VoicePool::new(sample_rate as f32, &synth);
        let mut local = SharedParams {
            gain: synth.master_gain,
            ..Default::default()
        };

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    // never block the audio thread: on contention keep
                    // the previous copy
                    if let Ok(params) = shared_for_callback.try_lock() {
                        local = *params;
                    }

                    let kind = MapKind::from_id(local.map_id).unwrap_or(MapKind::Mandelbrot);
                    pool.sync_notes(local.held_notes);
                    pool.update_drives(kind, local.julia, &fractal);

                    for frame in data.chunks_mut(channels) {
                        // safety limiter: hard clip to ±0.5
                        let sample = (pool.next_sample() * local.gain).clamp(-0.5, 0.5);
                        for out in frame.iter_mut() {
                            *out = sample;
                        }

                        if let Some(ref writer) = wav_writer {
                            if let Ok(mut w) = writer.lock() {
                                for _ in 0..channels {
                                    let _ = w.write_sample(sample);
                                }
                            }
                        }
                    }
                },
                |err| warn!("Audio stream error: {}", err),
                None,
            )
            .context("Failed to build audio stream")?;

        stream.play().context("Failed to start audio stream")?;

        Ok(Self {
            shared,
            _stream: stream,
        })
    }
}
