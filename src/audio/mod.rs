//! Microphone-driven terrain controls.
//!
//! Captures the default input device with cpal and, on a separate analysis
//! thread, turns each chunk of samples into brightness and band height
//! targets written through [`Controls`].

mod analysis;

pub use analysis::{reduce_bins, BandAnalyzer, BandOutput, BandSmoother};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::controls::Controls;
use crate::error::{Result, TerrainError};
use crate::params::AudioParams;

/// How long the analysis thread sleeps when less than a chunk is buffered
const ANALYSIS_POLL: Duration = Duration::from_millis(5);

/// Running capture stream plus its analysis thread
pub struct AudioDriver {
    /// Input stream (kept alive)
    _stream: cpal::Stream,
    stop: Arc<AtomicBool>,
    analysis: Option<JoinHandle<()>>,
}

impl AudioDriver {
    /// Open the default input device and start feeding `controls`
    pub fn start(params: AudioParams, controls: Controls) -> Result<Self> {
        params.validate()?;

        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| TerrainError::Audio("no audio input device found".to_string()))?;

        let config = device
            .default_input_config()
            .map_err(|e| TerrainError::Audio(format!("failed to get input config: {e}")))?;

        let sample_rate = config.sample_rate().0;
        info!(
            device = %device.name().unwrap_or_else(|_| "unknown".to_string()),
            sample_rate,
            channels = config.channels(),
            "audio capture"
        );
        let params = params.for_sample_rate(sample_rate);
        params.validate()?;
        debug!(
            chunk_size = params.chunk_size,
            band_edges = ?params.band_edges,
            "audio analysis"
        );

        let samples = Arc::new(Mutex::new(Vec::<f32>::new()));
        let channels = usize::from(config.channels().max(1));
        let stream_config: cpal::StreamConfig = config.config();
        let on_error = |err: cpal::StreamError| error!("audio stream error: {}", err);

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                let samples = Arc::clone(&samples);
                device.build_input_stream(
                    &stream_config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        push_first_channel(&samples, data, channels, |s| s)
                    },
                    on_error,
                    None,
                )
            }
            cpal::SampleFormat::I16 => {
                let samples = Arc::clone(&samples);
                device.build_input_stream(
                    &stream_config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        push_first_channel(&samples, data, channels, |s| f32::from(s) / 32768.0)
                    },
                    on_error,
                    None,
                )
            }
            other => {
                return Err(TerrainError::Audio(format!(
                    "unsupported sample format {other:?}"
                )))
            }
        }
        .map_err(|e| TerrainError::Audio(format!("failed to build input stream: {e}")))?;

        stream
            .play()
            .map_err(|e| TerrainError::Audio(format!("failed to start input stream: {e}")))?;

        let stop = Arc::new(AtomicBool::new(false));
        let analysis = spawn_analysis_thread(params, samples, controls, Arc::clone(&stop))?;

        Ok(Self {
            _stream: stream,
            stop,
            analysis: Some(analysis),
        })
    }
}

impl Drop for AudioDriver {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(analysis) = self.analysis.take() {
            if analysis.join().is_err() {
                error!("audio analysis thread panicked");
            }
        }
    }
}

/// Append the first channel of an interleaved buffer
fn push_first_channel<T: Copy>(
    samples: &Mutex<Vec<f32>>,
    data: &[T],
    channels: usize,
    convert: impl Fn(T) -> f32,
) {
    samples
        .lock()
        .extend(data.iter().step_by(channels).map(|&s| convert(s)));
}

fn spawn_analysis_thread(
    params: AudioParams,
    samples: Arc<Mutex<Vec<f32>>>,
    controls: Controls,
    stop: Arc<AtomicBool>,
) -> Result<JoinHandle<()>> {
    let handle = thread::Builder::new()
        .name("audio-analysis".to_string())
        .spawn(move || {
            let mut analyzer = BandAnalyzer::new(&params);
            let mut smoother = BandSmoother::new(&params);
            let chunk_size = analyzer.chunk_size();
            let mut chunk = Vec::with_capacity(chunk_size);

            while !stop.load(Ordering::Acquire) {
                {
                    let mut buffered = samples.lock();
                    if buffered.len() < chunk_size {
                        drop(buffered);
                        thread::sleep(ANALYSIS_POLL);
                        continue;
                    }
                    chunk.clear();
                    chunk.extend(buffered.drain(..chunk_size));
                }

                let output = smoother.update(analyzer.analyze(&chunk));
                debug!(
                    brightness = output.brightness,
                    low = output.targets.low,
                    mid = output.targets.mid,
                    high = output.targets.high,
                    "audio chunk"
                );
                controls.set_brightness(output.brightness);
                controls.set_mountain_height(
                    output.targets.low,
                    output.targets.mid,
                    output.targets.high,
                );
            }
        })?;
    Ok(handle)
}
