use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::consts::CAR_THROTTLE_MAX_SPEED;

/// Settings for the low-level orientation and throttle controllers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerSettings {
    /// Gain applied to `angle + rate` before cubing.
    pub steer_gain: f64,
    /// Divisor applied after cubing.
    pub steer_divisor: f64,
    /// Yaw-rate damping for the ground steering output.
    pub steer_damping: f64,
    /// Pitch-rate damping for the air pitch output.
    pub pitch_damping: f64,
    /// Yaw-rate damping for the air yaw output.
    pub yaw_damping: f64,
    /// Roll-rate damping for the air roll output.
    pub roll_damping: f64,
    /// Divisor of the cubed speed error in the throttle law, in (uu/s)³.
    pub throttle_response: f64,
    /// Boost is only used when the requested speed is above this, in uu/s.
    pub boost_min_target_speed: f64,
    /// Boost is only used when the car is at least this much too slow, in uu/s.
    pub boost_min_speed_error: f64,
    /// Boost is never used above this forward speed, in uu/s.
    pub boost_max_speed: f64,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            steer_gain: 35.0,
            steer_divisor: 10.0,
            steer_damping: 0.01,
            pitch_damping: 0.2,
            yaw_damping: 0.15,
            roll_damping: 0.25,
            throttle_response: 30_000.0,
            boost_min_target_speed: 1400.0,
            boost_min_speed_error: 50.0,
            boost_max_speed: 2250.0,
        }
    }
}

/// Settings for the shot search and the reachability models of each shot type.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotSettings {
    /// Share of the ball's sideways velocity that survives the hit.
    pub carry_through: f64,
    /// Distance between the car's center and the ball's center at contact, in uu.
    pub contact_distance: f64,
    /// How far below the ball's center the car's center may be at contact, in uu.
    pub contact_reach: f64,
    /// Highest ball for a grounded shot, in uu.
    pub ground_max_height: f64,
    /// Highest ball for a single jump shot, in uu.
    pub jump_max_height: f64,
    /// Highest ball for a double jump shot, in uu.
    pub double_jump_max_height: f64,
    /// Largest angle between the approach and the shot direction, in radians.
    pub max_approach_angle: f64,
    /// Time spent turning per radian of heading error, in seconds.
    pub turn_time_per_radian: f64,
    /// Lowest ball worth an aerial, in uu.
    pub aerial_min_height: f64,
    /// Boost needed before considering an aerial.
    pub aerial_min_boost: f64,
    /// Share of the boost acceleration an aerial may plan to use.
    pub aerial_accel_margin: f64,
    /// Time needed to turn the car around in the air, in seconds per radian.
    pub aerial_orient_time: f64,
    /// How far a shot may cut across the target, in radians.
    pub target_fit_tolerance: f64,
    /// Shots are given up this long after their slice's time, in seconds.
    pub expiry_grace: f64,
}

impl Default for ShotSettings {
    fn default() -> Self {
        Self {
            carry_through: 0.8,
            contact_distance: 150.0,
            contact_reach: 80.0,
            ground_max_height: 150.0,
            jump_max_height: 300.0,
            double_jump_max_height: 550.0,
            max_approach_angle: 60.0f64.to_radians(),
            turn_time_per_radian: 0.3,
            aerial_min_height: 300.0,
            aerial_min_boost: 20.0,
            aerial_accel_margin: 0.9,
            aerial_orient_time: 0.35,
            target_fit_tolerance: 45.0f64.to_radians(),
            expiry_grace: 0.2,
        }
    }
}

/// Settings for the kickoff.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KickoffSettings {
    /// How far behind the ball (seen from the opponent's goal) to aim, in uu.
    pub aim_offset: f64,
    /// Speed at which the speedflip starts, in uu/s.
    pub speedflip_speed: f64,
    /// Dodge into the ball when this close without having speedflipped, in uu.
    pub dodge_distance: f64,
    /// How long the dodge holds its first jump, in seconds.
    pub dodge_jump_duration: f64,
}

impl Default for KickoffSettings {
    fn default() -> Self {
        Self {
            aim_offset: 170.0,
            speedflip_speed: 600.0,
            dodge_distance: 800.0,
            dodge_jump_duration: 0.18,
        }
    }
}

/// Settings for driving around the field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveSettings {
    /// Target speed when nothing else is requested, in uu/s.
    pub speed: f64,
    /// A drive is done when this close to its destination, in uu.
    pub arrive_radius: f64,
}

impl Default for DriveSettings {
    fn default() -> Self {
        Self {
            speed: CAR_THROTTLE_MAX_SPEED,
            arrive_radius: 100.0,
        }
    }
}

/// All tunable parameters of the bot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotSettings {
    pub controller: ControllerSettings,
    pub shot: ShotSettings,
    pub kickoff: KickoffSettings,
    pub drive: DriveSettings,
}

impl BotSettings {
    /// Load the settings from a JSON file. Missing fields take their default value.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read bot settings from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse bot settings in {}", path.display()))
    }

    /// Load the settings from a file, or store the default settings if the file does not
    /// exist. A file that exists but doesn't parse is left alone and the defaults are used.
    pub fn load_or_insert(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => Ok(settings),
                Err(err) => {
                    log::warn!("Failed to parse bot settings, using defaults: {}", err);
                    Ok(Self::default())
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let settings = Self::default();
                settings.store(path)?;
                log::info!("Wrote default bot settings to {}", path.display());
                Ok(settings)
            }
            Err(err) => Err(err)
                .with_context(|| format!("Failed to read bot settings from {}", path.display())),
        }
    }

    /// Store the settings in the given file.
    pub fn store(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write bot settings to {}", path.display()))
    }
}
