//! Game configuration constants and tunable parameters.

use crate::error::{ErrorSeverity, GameError};
use crate::state::Hex;

/// Problems detected by [`GameConfig::validate`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConfigError {
    #[error("map must be at least {min}x{min} (got {width}x{height})")]
    MapTooSmall { width: u32, height: u32, min: u32 },

    #[error("at least one player nickname is required")]
    NoPlayers,

    #[error("{requested} players configured but the map has only {capitals} capitals")]
    TooManyPlayers { requested: usize, capitals: usize },
}

impl GameError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::MapTooSmall { .. } => "CONFIG_MAP_TOO_SMALL",
            ConfigError::NoPlayers => "CONFIG_NO_PLAYERS",
            ConfigError::TooManyPlayers { .. } => "CONFIG_TOO_MANY_PLAYERS",
        }
    }
}

/// Tunables for world generation and movement.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Number of hex columns (`q` runs over `0..map_width`).
    pub map_width: u32,
    /// Number of hex rows (`r` runs over `0..map_height`).
    pub map_height: u32,

    /// One player is created per nickname, in seat order.
    pub player_nicknames: Vec<String>,

    pub regular_city_count: u32,
    /// Skip regular-city draws that land on an earlier regular city.
    /// Off by default: duplicates are tolerated.
    pub unique_regular_cities: bool,

    /// Seed for regular-city placement. Same seed, same map.
    pub world_seed: u64,

    pub starting_resources: i64,
    pub starting_strength: u32,
    pub army_movement_range: u32,

    pub capital_production_rate: u32,
    pub capital_defenses: u32,
    pub regular_production_rate: u32,
    pub regular_defenses: u32,
}

impl GameConfig {
    // ===== layout constants =====
    /// Capitals sit one hex in from each corner.
    pub const CAPITAL_COUNT: usize = 4;
    /// Smallest map on which the four corner capitals are distinct.
    pub const MIN_MAP_SIZE: u32 = 4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAP_WIDTH: u32 = 11;
    pub const DEFAULT_MAP_HEIGHT: u32 = 22;
    pub const DEFAULT_REGULAR_CITY_COUNT: u32 = 16;
    pub const DEFAULT_STARTING_RESOURCES: i64 = 100;
    pub const DEFAULT_STARTING_STRENGTH: u32 = 100;
    pub const DEFAULT_MOVEMENT_RANGE: u32 = 2;

    pub fn new() -> Self {
        Self {
            map_width: Self::DEFAULT_MAP_WIDTH,
            map_height: Self::DEFAULT_MAP_HEIGHT,
            player_nicknames: (1..=Self::CAPITAL_COUNT)
                .map(|seat| format!("Player{seat}"))
                .collect(),
            regular_city_count: Self::DEFAULT_REGULAR_CITY_COUNT,
            unique_regular_cities: false,
            world_seed: 0,
            starting_resources: Self::DEFAULT_STARTING_RESOURCES,
            starting_strength: Self::DEFAULT_STARTING_STRENGTH,
            army_movement_range: Self::DEFAULT_MOVEMENT_RANGE,
            capital_production_rate: 5,
            capital_defenses: 10,
            regular_production_rate: 3,
            regular_defenses: 5,
        }
    }

    pub fn with_seed(mut self, world_seed: u64) -> Self {
        self.world_seed = world_seed;
        self
    }

    pub fn with_players<I, S>(mut self, nicknames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.player_nicknames = nicknames.into_iter().map(Into::into).collect();
        self
    }

    /// Size of the fixed rotation.
    pub fn player_count(&self) -> u32 {
        self.player_nicknames.len().min(Self::CAPITAL_COUNT) as u32
    }

    /// Capital coordinates in creation order. Seat `n` owns entry `n - 1`.
    pub fn capital_positions(&self) -> [Hex; Self::CAPITAL_COUNT] {
        let far_q = self.map_width as i32 - 2;
        let far_r = self.map_height as i32 - 2;
        [
            Hex::new(1, 1),
            Hex::new(far_q, 1),
            Hex::new(1, far_r),
            Hex::new(far_q, far_r),
        ]
    }

    /// Whether `hex` lies on the generated rectangle.
    pub fn contains(&self, hex: Hex) -> bool {
        (0..self.map_width as i32).contains(&hex.q())
            && (0..self.map_height as i32).contains(&hex.r())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map_width < Self::MIN_MAP_SIZE || self.map_height < Self::MIN_MAP_SIZE {
            return Err(ConfigError::MapTooSmall {
                width: self.map_width,
                height: self.map_height,
                min: Self::MIN_MAP_SIZE,
            });
        }
        if self.player_nicknames.is_empty() {
            return Err(ConfigError::NoPlayers);
        }
        if self.player_nicknames.len() > Self::CAPITAL_COUNT {
            return Err(ConfigError::TooManyPlayers {
                requested: self.player_nicknames.len(),
                capitals: Self::CAPITAL_COUNT,
            });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
