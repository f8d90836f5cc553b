use std::{
    fs,
    path::{Path, PathBuf},
};

use glam::Vec2;
use scarecrow_core::ProgressionMode;
use scarecrow_world::{
    WorldConfig, DEFAULT_HARVEST_PROMPT_DELAY_FRAMES, DEFAULT_STAGE_CLEAR_DELAY_FRAMES,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Frames between two HUD notifications.
pub const DEFAULT_HUD_INTERVAL_FRAMES: u64 = 5;

/// Settings that shape one engine session.
///
/// Every field has a default, so a TOML file only needs to name the values it
/// overrides:
///
/// ```toml
/// seed = 7
/// mode = "harvest"
///
/// [viewport]
/// width = 1280.0
/// height = 720.0
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Seed from which every random stream of the session is derived.
    pub seed: u64,
    /// How crossing the experience threshold rewards the player.
    pub mode: ProgressionMode,
    /// Visible play area used to place spawns just offscreen.
    pub viewport: Viewport,
    /// Frames between two HUD notifications.
    pub hud_interval_frames: u64,
    /// Frames between the boss falling and the stage clearing.
    pub stage_clear_delay_frames: u64,
    /// Frames between a resume and the next queued harvest prompt.
    pub harvest_prompt_delay_frames: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            mode: ProgressionMode::Classic,
            viewport: Viewport::default(),
            hud_interval_frames: DEFAULT_HUD_INTERVAL_FRAMES,
            stage_clear_delay_frames: DEFAULT_STAGE_CLEAR_DELAY_FRAMES,
            harvest_prompt_delay_frames: DEFAULT_HARVEST_PROMPT_DELAY_FRAMES,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the configuration stored at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Rejects values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hud_interval_frames == 0 {
            return Err(ConfigError::ZeroHudInterval);
        }
        if !self.viewport.is_valid() {
            return Err(ConfigError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        Ok(())
    }

    pub(crate) fn world_config(&self) -> WorldConfig {
        WorldConfig {
            mode: self.mode,
            stage_clear_delay_frames: self.stage_clear_delay_frames,
            harvest_prompt_delay_frames: self.harvest_prompt_delay_frames,
        }
    }
}

/// Size of the visible play area in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Viewport {
    /// Width of the visible area.
    pub width: f32,
    /// Height of the visible area.
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Viewport {
    /// Whether both dimensions are finite and positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Dimensions as a vector.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Errors raised while loading an [`EngineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read engine config at {}", path.display())]
    Read {
        /// Location that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The configuration text is not valid TOML for this schema.
    #[error("failed to parse engine config")]
    Parse(#[from] toml::de::Error),
    /// HUD notifications need a cadence of at least one frame.
    #[error("hud_interval_frames must be at least 1")]
    ZeroHudInterval,
    /// The viewport must have a positive, finite size.
    #[error("viewport must be positive and finite, got {width}x{height}")]
    InvalidViewport {
        /// Rejected width.
        width: f32,
        /// Rejected height.
        height: f32,
    },
}
