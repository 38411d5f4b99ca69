//! Command-line argument parsing.

use clap::Parser;

use crate::controller::BandTargets;
use crate::params::{ColorParams, TerrainParams};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Ridgeline")]
#[command(about = "Endlessly scrolling procedural mountain range", long_about = None)]
pub struct Args {
    /// Noise seed (random when omitted)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u32>,

    /// Low band noise wavelength (cells)
    #[arg(long, value_name = "CELLS", default_value_t = 8.0)]
    pub wavelength: f64,

    /// Perlin layers summed per sample
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub octaves: u32,

    /// Cells per chunk edge
    #[arg(long, value_name = "CELLS", default_value_t = 24)]
    pub tile_side: usize,

    /// Resident chunks
    #[arg(long, value_name = "N", default_value_t = 8)]
    pub chunks: usize,

    /// Forward scroll per frame (cells)
    #[arg(long, value_name = "CELLS", default_value_t = 0.3)]
    pub scroll_rate: f64,

    /// Target frame rate
    #[arg(long, value_name = "HZ", default_value_t = 60.0)]
    pub fps: f32,

    /// Initial surface brightness
    #[arg(long, value_name = "LEVEL", default_value_t = 0.9)]
    pub brightness: f32,

    /// Static low band height (ignored with --audio)
    #[arg(long, value_name = "AMPLITUDE", default_value_t = 1.0)]
    pub low: f64,

    /// Static mid band height (ignored with --audio)
    #[arg(long, value_name = "AMPLITUDE", default_value_t = 1.0)]
    pub mid: f64,

    /// Static high band height (ignored with --audio)
    #[arg(long, value_name = "AMPLITUDE", default_value_t = 1.0)]
    pub high: f64,

    /// Drive heights and brightness from the default audio input device
    #[arg(long)]
    pub audio: bool,
}

impl Args {
    /// Terrain generation parameters from the command line
    pub fn terrain_params(&self) -> TerrainParams {
        TerrainParams {
            tile_side: self.tile_side,
            chunk_count: self.chunks,
            wavelength: self.wavelength,
            octaves: self.octaves,
            seed: self.seed,
            scroll_rate: self.scroll_rate,
            frame_rate_hz: self.fps,
        }
    }

    pub fn color_params(&self) -> ColorParams {
        ColorParams {
            brightness: self.brightness,
            ..Default::default()
        }
    }

    /// Fixed band targets used when audio input is off
    pub fn static_targets(&self) -> BandTargets {
        BandTargets {
            low: self.low,
            mid: self.mid,
            high: self.high,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_params() {
        let args = Args::parse_from(["ridgeline"]);
        let terrain = args.terrain_params();
        let defaults = TerrainParams::default();

        assert_eq!(terrain.tile_side, defaults.tile_side);
        assert_eq!(terrain.chunk_count, defaults.chunk_count);
        assert_eq!(terrain.wavelength, defaults.wavelength);
        assert_eq!(terrain.octaves, defaults.octaves);
        assert_eq!(terrain.scroll_rate, defaults.scroll_rate);
        assert_eq!(terrain.frame_rate_hz, defaults.frame_rate_hz);
        assert_eq!(terrain.seed, None);
        assert_eq!(args.color_params().brightness, ColorParams::default().brightness);
        assert!(!args.audio);
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "ridgeline",
            "--seed",
            "42",
            "--tile-side",
            "16",
            "--chunks",
            "4",
            "--low",
            "2.5",
            "--audio",
        ]);

        let terrain = args.terrain_params();
        assert_eq!(terrain.seed, Some(42));
        assert_eq!(terrain.tile_side, 16);
        assert_eq!(terrain.chunk_count, 4);
        assert_eq!(
            args.static_targets(),
            BandTargets {
                low: 2.5,
                mid: 1.0,
                high: 1.0
            }
        );
        assert!(args.audio);
    }
}
