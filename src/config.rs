// config.rs - Tunables
//
// Defaults reproduce the classic toy feel. Any subset can be overridden from JS
// (a plain object, passed through JSON) or from the replay CLI.

use std::str::FromStr;

use serde::Deserialize;

use crate::error::{FlyupError, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One plane at a time, untinted assets, no rotation.
    Single,
    #[default]
    Multi,
}

impl FromStr for Mode {
    type Err = FlyupError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Ok(Mode::Single),
            "multi" => Ok(Mode::Multi),
            _ => Err(FlyupError::UnknownMode(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub mode: Mode,
    pub plane_size: f64,
    /// Launch speed, px/s
    pub plane_speed: f64,
    /// Added to fall velocity every frame
    pub gravity: f64,
    pub loop_radius: f64,
    /// Loop angle step per frame (radians)
    pub loop_speed: f64,
    /// Loop radius step per frame
    pub expansion_rate: f64,
    pub max_fling_speed: f64,
    pub double_tap_ms: f64,
    /// Upper bound on a single frame's dt (seconds)
    pub max_frame_dt: f64,
    pub asset_base: String,
    pub seed: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Multi,
            plane_size: 50.0,
            plane_speed: 10.0,
            gravity: 5.0,
            loop_radius: 30.0,
            loop_speed: 0.05,
            expansion_rate: 1.0,
            max_fling_speed: 10_000.0,
            double_tap_ms: 300.0,
            max_frame_dt: 0.25,
            asset_base: String::new(),
            seed: None,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Config = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Every tunable finite; sizes, caps and windows non-negative.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("plane_size", self.plane_size),
            ("max_fling_speed", self.max_fling_speed),
            ("double_tap_ms", self.double_tap_ms),
            ("max_frame_dt", self.max_frame_dt),
        ];
        for (field, v) in non_negative {
            if !v.is_finite() || v < 0.0 {
                return Err(FlyupError::InvalidConfig { field, value: v });
            }
        }

        let finite = [
            ("plane_speed", self.plane_speed),
            ("gravity", self.gravity),
            ("loop_radius", self.loop_radius),
            ("loop_speed", self.loop_speed),
            ("expansion_rate", self.expansion_rate),
        ];
        for (field, v) in finite {
            if !v.is_finite() {
                return Err(FlyupError::InvalidConfig { field, value: v });
            }
        }
        Ok(())
    }

    /// Multi mode recolors every plane; single mode loads assets as-is.
    pub fn tinted(&self) -> bool {
        self.mode == Mode::Multi
    }

    pub fn rotates(&self) -> bool {
        self.mode == Mode::Multi
    }

    /// Crumpled planes keep their flight velocity in multi mode.
    pub fn keeps_momentum(&self) -> bool {
        self.mode == Mode::Multi
    }
}
