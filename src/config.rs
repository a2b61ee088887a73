use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::application::SessionConfig;
use crate::domain::{FadePolicy, Topology};

pub type Rgb = [u8; 3];

/// Command line configuration. Invalid values that clap cannot reject
/// on its own are caught by `validate` and are fatal at startup.
#[derive(Parser, Debug, Clone)]
#[command(name = "cgol", about = "Conway's Game of Life", version)]
pub struct Config {
    /// Window width in pixels
    #[arg(long = "res-w", default_value_t = 1280)]
    pub res_width: i32,

    /// Window height in pixels
    #[arg(long = "res-h", default_value_t = 720)]
    pub res_height: i32,

    /// Grid width in cells
    #[arg(long = "grid-w", default_value_t = 160)]
    pub grid_width: i64,

    /// Grid height in cells
    #[arg(long = "grid-h", default_value_t = 90)]
    pub grid_height: i64,

    /// Initial cell size in pixels
    #[arg(long = "cell-size", default_value_t = 8.0)]
    pub cell_size: f32,

    /// Generations per second
    #[arg(long, default_value_t = 30.0)]
    pub tickrate: f32,

    /// RNG seed; -1 draws one from entropy at startup
    #[arg(long, default_value_t = -1, allow_hyphen_values = true)]
    pub seed: i64,

    /// Path of the save file
    #[arg(long = "save-file", default_value = "./cgol.csv")]
    pub save_file: PathBuf,

    /// Load the save file at startup
    #[arg(long)]
    pub load: bool,

    /// Dead edges instead of toroidal wrap
    #[arg(long)]
    pub bounded: bool,

    /// Disable the visual fade effect
    #[arg(long = "no-fade")]
    pub no_fade: bool,

    /// Vitality a dead cell loses per generation
    #[arg(long = "fade-rate", default_value_t = 0.01)]
    pub fade_rate: f32,

    /// Vitality a cell starts with after death
    #[arg(long = "fade-death", default_value_t = 0.5)]
    pub fade_death: f32,

    /// Pause automatically when nothing changes anymore
    #[arg(long = "pause-stalemate")]
    pub pause_stalemate: bool,

    /// Pause automatically when only oscillators remain
    #[arg(long = "pause-oscillators")]
    pub pause_oscillators: bool,

    /// Smallest cell size the zoom can reach
    #[arg(long = "min-cell-size", default_value_t = 1.0)]
    pub min_cell_size: f32,

    /// Largest cell size the zoom can reach
    #[arg(long = "max-cell-size", default_value_t = 64.0)]
    pub max_cell_size: f32,

    /// Color for alive cells as R,G,B
    #[arg(long = "color-alive", default_value = "255,144,0", value_parser = parse_rgb)]
    pub color_alive: Rgb,

    /// Color for dead cells as R,G,B
    #[arg(long = "color-dead", default_value = "0,0,0", value_parser = parse_rgb)]
    pub color_dead: Rgb,

    /// Color fading cells converge to as R,G,B
    #[arg(long = "color-fade", default_value = "0,0,0", value_parser = parse_rgb)]
    pub color_fade: Rgb,

    /// Background color as R,G,B
    #[arg(long = "color-background", default_value = "16,16,16", value_parser = parse_rgb)]
    pub color_background: Rgb,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid dimensions must be positive, got {0}x{1}")]
    BadDimensions(i64, i64),

    #[error("window resolution must be positive, got {0}x{1}")]
    BadResolution(i32, i32),

    #[error("tickrate must be positive, got {0}")]
    BadTickrate(f32),

    #[error("cell size must be positive, got {0}")]
    BadCellSize(f32),

    #[error("zoom bounds must satisfy 0 < min <= max, got {0}..{1}")]
    BadZoomBounds(f32, f32),

    #[error("fade rate must be positive, got {0}")]
    BadFadeRate(f32),

    #[error("fade death value must be in [0, 1), got {0}")]
    BadFadeDeath(f32),
}

fn parse_rgb(s: &str) -> Result<Rgb, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected R,G,B, got {s:?}"));
    }
    let mut rgb = [0u8; 3];
    for (slot, part) in rgb.iter_mut().zip(&parts) {
        *slot = part
            .trim()
            .parse()
            .map_err(|_| format!("invalid color channel {part:?}"))?;
    }
    Ok(rgb)
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width <= 0 || self.grid_height <= 0 {
            return Err(ConfigError::BadDimensions(self.grid_width, self.grid_height));
        }
        if self.res_width <= 0 || self.res_height <= 0 {
            return Err(ConfigError::BadResolution(self.res_width, self.res_height));
        }
        if self.tickrate <= 0.0 {
            return Err(ConfigError::BadTickrate(self.tickrate));
        }
        if self.cell_size <= 0.0 {
            return Err(ConfigError::BadCellSize(self.cell_size));
        }
        if self.min_cell_size <= 0.0 || self.min_cell_size > self.max_cell_size {
            return Err(ConfigError::BadZoomBounds(self.min_cell_size, self.max_cell_size));
        }
        if !self.no_fade {
            if self.fade_rate <= 0.0 {
                return Err(ConfigError::BadFadeRate(self.fade_rate));
            }
            if !(0.0..1.0).contains(&self.fade_death) {
                return Err(ConfigError::BadFadeDeath(self.fade_death));
            }
        }
        Ok(())
    }

    /// The configured seed, or one drawn from entropy for -1. Call once
    /// at startup and hold the result so reset stays reproducible.
    pub fn resolve_seed(&self) -> u64 {
        if self.seed >= 0 {
            self.seed as u64
        } else {
            rand::random::<u64>()
        }
    }

    pub const fn topology(&self) -> Topology {
        if self.bounded { Topology::Bounded } else { Topology::Toroidal }
    }

    pub const fn fade_policy(&self) -> FadePolicy {
        if self.no_fade {
            FadePolicy::off()
        } else {
            FadePolicy { rate: self.fade_rate, dead_vitality: self.fade_death }
        }
    }

    /// Session settings with the resolved seed baked in
    pub fn session_config(&self, seed: u64) -> SessionConfig {
        SessionConfig {
            grid_width: self.grid_width as usize,
            grid_height: self.grid_height as usize,
            topology: self.topology(),
            tickrate: self.tickrate,
            seed,
            fade: self.fade_policy(),
            save_file: self.save_file.clone(),
            pause_on_stalemate: self.pause_stalemate,
            pause_on_oscillators: self.pause_oscillators,
        }
    }
}
