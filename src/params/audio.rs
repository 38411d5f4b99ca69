//! Audio analysis parameters for the microphone-driven height controls.

use crate::error::ConfigError;

/// Capture and band-reduction configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AudioParams {
    /// Preferred capture sample rate (Hz)
    pub sample_rate_hz: u32,

    /// Samples per analysis chunk (1764 = 40 ms @ 44.1 kHz)
    pub chunk_size: usize,

    /// Exclusive upper FFT bin of each band (low, mid, high)
    pub band_edges: [usize; 3],

    /// Fraction of the previous smoothed level kept per chunk (low, mid, high)
    pub band_retention: [f32; 3],

    /// Level subtracted from the low band before it becomes a height target
    pub low_floor: f32,

    /// Mid level at which brightness starts to rise
    pub brightness_offset: f32,

    /// Mid level span mapped onto one unit of brightness
    pub brightness_scale: f32,
}

impl Default for AudioParams {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            chunk_size: 1764,
            band_edges: [5, 41, 883], // ~100 Hz, ~1 kHz, everything above
            band_retention: [0.2, 0.7, 0.7],
            low_floor: 1.0,
            brightness_offset: 4.0,
            brightness_scale: 6.0,
        }
    }
}

impl AudioParams {
    /// Reject settings the band analyser cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate_hz == 0 {
            return Err(ConfigError::SampleRate);
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::AudioChunk);
        }
        if self.band_edges[0] == 0 || self.band_edges.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(ConfigError::BandEdges(self.band_edges));
        }
        if !self.band_retention.iter().all(|r| (0.0..1.0).contains(r)) {
            return Err(ConfigError::BandRetention(self.band_retention));
        }
        if self.band_edges[2] > self.chunk_size {
            return Err(ConfigError::BandEdgePastChunk {
                edge: self.band_edges[2],
                chunk_size: self.chunk_size,
            });
        }
        Ok(())
    }

    /// Same analysis for a device running at `sample_rate` Hz.
    ///
    /// The chunk is rescaled to the same duration, so each FFT bin keeps its
    /// width in Hz and the band edges keep their frequencies. Edges above the
    /// Nyquist bin are pulled down to it.
    pub fn for_sample_rate(&self, sample_rate: u32) -> Self {
        let scale = f64::from(sample_rate) / f64::from(self.sample_rate_hz.max(1));
        let chunk_size = ((self.chunk_size as f64 * scale).round() as usize).max(1);
        let nyquist_edge = chunk_size / 2 + 1;

        Self {
            sample_rate_hz: sample_rate,
            chunk_size,
            band_edges: self.band_edges.map(|edge| edge.min(nyquist_edge)),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bands_fit_chunk() {
        assert!(AudioParams::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_unordered_edges() {
        let params = AudioParams {
            band_edges: [41, 5, 883],
            ..Default::default()
        };
        assert_eq!(params.validate(), Err(ConfigError::BandEdges([41, 5, 883])));
    }

    #[test]
    fn test_rejects_empty_low_band() {
        let params = AudioParams {
            band_edges: [0, 41, 883],
            ..Default::default()
        };
        assert_eq!(params.validate(), Err(ConfigError::BandEdges([0, 41, 883])));
    }

    #[test]
    fn test_rejects_edge_past_chunk() {
        let params = AudioParams {
            chunk_size: 512,
            ..Default::default()
        };
        assert_eq!(
            params.validate(),
            Err(ConfigError::BandEdgePastChunk {
                edge: 883,
                chunk_size: 512
            })
        );
    }

    #[test]
    fn test_nominal_rate_is_unchanged() {
        let params = AudioParams::default();
        assert_eq!(params.for_sample_rate(44100), params);
    }

    #[test]
    fn test_48k_keeps_band_frequencies() {
        let nominal = AudioParams::default();
        let params = nominal.for_sample_rate(48000);
        assert_eq!(params.chunk_size, 1920);
        assert_eq!(params.band_edges, [5, 41, 883]);
        assert!(params.validate().is_ok());

        // Low band still ends at 125 Hz
        let edge_hz = |p: &AudioParams| {
            p.band_edges[0] as f64 * f64::from(p.sample_rate_hz) / p.chunk_size as f64
        };
        assert!((edge_hz(&params) - edge_hz(&nominal)).abs() < 1e-9);
        assert!((edge_hz(&params) - 125.0).abs() < 1e-9);
    }

    #[test]
    fn test_low_rate_caps_top_edge_at_nyquist() {
        let params = AudioParams::default().for_sample_rate(22050);
        assert_eq!(params.chunk_size, 882);
        assert_eq!(params.band_edges, [5, 41, 442]);
        assert!(params.validate().is_ok());
    }
}
