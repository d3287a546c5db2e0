//! Game configuration with documented constants
//!
//! Every tunable the simulation core depends on lives here: grid shape,
//! unit counts, AI priority weights, and the map-generation bounds. Nothing
//! in the core hard-codes these values.

use serde::Deserialize;
use std::path::Path;

use crate::core::error::{Result, SkirmishError};

/// Configuration for the simulation core
///
/// Values have been tuned for an 8x8 board; `validate` catches the
/// combinations that cannot produce a playable map.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === GRID ===
    /// Board width in cells
    pub grid_width: i32,
    /// Board height in cells
    pub grid_height: i32,

    // === UNITS ===
    /// Player units spawned after map generation
    pub player_count: u32,
    /// Enemy units spawned after map generation
    pub enemy_count: u32,
    /// Default movement range (maximum path steps per turn)
    ///
    /// Archetypes may override this, but every unit starts from it.
    pub move_range: u32,
    /// Attempts to find a free spawn cell before giving up
    pub spawn_attempts: u32,

    // === AI PRIORITY WEIGHTS ===
    /// Awarded for a hit that would finish a unit (hp == 1)
    pub kill_priority: i32,
    /// Awarded for a hit on a healthy hostile unit
    pub attack_priority: i32,
    /// Awarded for a hit on an attackable map object
    pub building_priority: i32,
    /// Subtracted for every allied unit caught in the affected group
    pub friendly_fire_penalty: i32,
    /// Subtracted per path step, so nearer opportunities win ties
    ///
    /// Keep this small relative to the priorities above, otherwise a
    /// distant kill loses to an adjacent empty swing.
    pub range_falloff: i32,

    // === MAP GENERATION ===
    /// Walk budget drawn uniformly from `[walk_steps_min, walk_steps_max]`
    ///
    /// The budget counts carved cells, not raw steps; it is also the exact
    /// number of free cells the walk produces.
    pub walk_steps_min: u32,
    pub walk_steps_max: u32,
    /// Building count drawn uniformly from `[buildings_min, buildings_max]`
    pub buildings_min: u32,
    pub buildings_max: u32,
    /// Quadrant occupancy may fall this far (percent) below the mean
    pub quadrant_tolerance_neg: f32,
    /// Quadrant occupancy may rise this far (percent) above the mean
    pub quadrant_tolerance_pos: f32,
    /// Maximum allowed shortest-path step count between any two free tiles
    pub longest_path_bound: u32,
    /// Regeneration attempts before map generation is declared failed
    pub max_generation_attempts: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 8,
            grid_height: 8,

            player_count: 2,
            enemy_count: 2,
            move_range: 2,
            spawn_attempts: 100,

            kill_priority: 100,
            attack_priority: 50,
            building_priority: 30,
            friendly_fire_penalty: 40,
            range_falloff: 1,

            walk_steps_min: 22,
            walk_steps_max: 30,
            buildings_min: 2,
            buildings_max: 4,
            quadrant_tolerance_neg: 50.0,
            quadrant_tolerance_pos: 50.0,
            longest_path_bound: 20,
            max_generation_attempts: 1000,
        }
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file; missing keys fall back to defaults
    pub fn from_toml_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: GameConfig = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(SkirmishError::InvalidConfig(msg));

        if self.grid_width < 2 || self.grid_height < 2 {
            return fail(format!(
                "grid must be at least 2x2, got {}x{}",
                self.grid_width, self.grid_height
            ));
        }

        let cells = (self.grid_width * self.grid_height) as u32;
        if self.walk_steps_min > self.walk_steps_max {
            return fail(format!(
                "walk_steps_min ({}) exceeds walk_steps_max ({})",
                self.walk_steps_min, self.walk_steps_max
            ));
        }
        if self.walk_steps_max >= cells {
            return fail(format!(
                "walk_steps_max ({}) must leave at least one solid cell on a {}-cell grid",
                self.walk_steps_max, cells
            ));
        }
        if self.walk_steps_min == 0 {
            return fail("walk_steps_min must be positive".into());
        }

        if self.buildings_min > self.buildings_max {
            return fail(format!(
                "buildings_min ({}) exceeds buildings_max ({})",
                self.buildings_min, self.buildings_max
            ));
        }

        if self.quadrant_tolerance_neg < 0.0 || self.quadrant_tolerance_pos < 0.0 {
            return fail("quadrant tolerances must be non-negative percentages".into());
        }

        if self.longest_path_bound == 0 {
            return fail("longest_path_bound must be positive".into());
        }
        if self.max_generation_attempts == 0 {
            return fail("max_generation_attempts must be positive".into());
        }

        if self.range_falloff < 0 {
            return fail("range_falloff must be non-negative".into());
        }

        let spawn_total = self.player_count + self.enemy_count;
        if spawn_total > self.walk_steps_min {
            return fail(format!(
                "{} units cannot spawn on at most {} free cells",
                spawn_total, self.walk_steps_min
            ));
        }

        Ok(())
    }
}
