//! One-time world generation.
//!
//! [`generate_world_if_absent`] populates an empty store with the hex grid,
//! the capitals (each with its player and starting army) and a scatter of
//! regular cities. The [`MapInitialized`] marker is written last: a run that
//! aborts half way leaves no marker, and the next call starts over.

mod draft;
mod rng;

use std::collections::BTreeSet;

pub use draft::Draft;
pub use rng::PcgRng;

use crate::config::{ConfigError, GameConfig};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{
    Army, ArmyId, City, CityId, CityKind, ComponentKind, EntityId, Hex, HexTile, MapInitialized,
    Player, PlayerId,
};
use crate::store::{self, ComponentStore, Filter, StoreError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GenerationError {
    #[error("invalid world configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("world generation aborted: {0}")]
    Store(#[from] StoreError),
}

impl GameError for GenerationError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            GenerationError::Config(error) => error.severity(),
            GenerationError::Store(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            GenerationError::Config(error) => error.error_code(),
            GenerationError::Store(error) => error.error_code(),
        }
    }
}

/// Counts of what a generation run created.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationReport {
    pub hexes: usize,
    pub capitals: usize,
    pub players: usize,
    pub armies: usize,
    pub regular_cities: usize,
    /// Regular-city draws dropped because they hit a capital (or, with
    /// `unique_regular_cities`, an earlier regular city).
    pub skipped_draws: usize,
    pub marker: Option<EntityId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GenerationOutcome {
    /// The marker already existed; nothing was touched.
    Skipped,
    Generated(GenerationReport),
}

impl GenerationOutcome {
    pub fn is_generated(&self) -> bool {
        matches!(self, GenerationOutcome::Generated(_))
    }
}

/// Returns true once a previous run has written the marker.
pub fn is_generated<S>(store: &S) -> Result<bool, StoreError>
where
    S: ComponentStore + ?Sized,
{
    Ok(store::find_first(store, Filter::Kind(ComponentKind::MapInitialized))?.is_some())
}

/// Populates the store unless a [`MapInitialized`] marker already exists.
///
/// Any store failure aborts immediately. Records created before the failure
/// stay behind; the missing marker makes the next call regenerate everything.
pub fn generate_world_if_absent<S>(
    store: &mut S,
    config: &GameConfig,
) -> Result<GenerationOutcome, GenerationError>
where
    S: ComponentStore + ?Sized,
{
    config.validate()?;

    if is_generated(store)? {
        return Ok(GenerationOutcome::Skipped);
    }

    let mut report = GenerationReport::default();

    for q in 0..config.map_width as i32 {
        for r in 0..config.map_height as i32 {
            store::create_component(store, HexTile { hex: Hex::new(q, r) })?;
            report.hexes += 1;
        }
    }

    let capitals = config.capital_positions();
    let mut next_city = 1u32;

    for (index, &position) in capitals.iter().enumerate() {
        let city_id = CityId(next_city);
        next_city += 1;

        let capital = City {
            id: city_id,
            kind: CityKind::Capital,
            owner: None,
            production_rate: config.capital_production_rate,
            defenses: config.capital_defenses,
            position,
        };

        match config.player_nicknames.get(index) {
            Some(nickname) => {
                let seat = PlayerId(index as u32 + 1);
                place_capital_with_player(store, config, capital, seat, nickname)?;
                report.players += 1;
                report.armies += 1;
            }
            None => {
                store::create_component(store, capital)?;
            }
        }
        report.capitals += 1;
    }

    let mut rng = PcgRng::seeded(config.world_seed);
    let mut used_regular = BTreeSet::new();

    for _ in 0..config.regular_city_count {
        let position = Hex::new(
            rng.below(config.map_width) as i32,
            rng.below(config.map_height) as i32,
        );

        let on_capital = capitals.contains(&position);
        let repeated = config.unique_regular_cities && !used_regular.insert(position);
        if on_capital || repeated {
            report.skipped_draws += 1;
            continue;
        }

        store::create_component(
            store,
            City {
                id: CityId(next_city),
                kind: CityKind::Regular,
                owner: None,
                production_rate: config.regular_production_rate,
                defenses: config.regular_defenses,
                position,
            },
        )?;
        next_city += 1;
        report.regular_cities += 1;
    }

    report.marker = Some(store::create_component(store, MapInitialized)?);

    Ok(GenerationOutcome::Generated(report))
}

/// Creates the capital, its player and the starting army, then back-fills the
/// ids that only exist once the store has minted them.
fn place_capital_with_player<S>(
    store: &mut S,
    config: &GameConfig,
    capital: City,
    seat: PlayerId,
    nickname: &str,
) -> Result<EntityId, StoreError>
where
    S: ComponentStore + ?Sized,
{
    let city_id = capital.id;
    let position = capital.position;

    let city = Draft::create(store, capital)?;
    let player = Draft::create(
        store,
        Player::new(seat, nickname, city_id).with_resources(config.starting_resources),
    )?;

    let player_entity = player.id();
    player.patch(|p| p.entity = Some(player_entity)).finalize(store)?;
    city.patch(|c| c.owner = Some(player_entity)).finalize(store)?;

    store::create_component(
        store,
        Army {
            id: ArmyId(city_id.0),
            owner: player_entity,
            strength: config.starting_strength,
            position,
            movement_range: config.army_movement_range,
            has_moved: false,
        },
    )?;

    Ok(player_entity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FaultyStore, InMemoryStore, count, load_all};

    fn generated(config: &GameConfig) -> InMemoryStore {
        let mut store = InMemoryStore::new();
        let outcome = generate_world_if_absent(&mut store, config).unwrap();
        assert!(outcome.is_generated());
        store
    }

    #[test]
    fn creates_full_grid_with_valid_cube_coordinates() {
        let config = GameConfig::default();
        let store = generated(&config);

        let tiles: Vec<(EntityId, HexTile)> =
            load_all(&store, Filter::Kind(ComponentKind::Hex)).unwrap();
        assert_eq!(tiles.len(), 11 * 22);
        assert!(tiles
            .iter()
            .all(|(_, tile)| tile.hex.s() == -tile.hex.q() - tile.hex.r()));
    }

    #[test]
    fn each_player_owns_its_capital_and_one_army() {
        let config = GameConfig::default();
        let store = generated(&config);

        let players: Vec<(EntityId, Player)> =
            load_all(&store, Filter::Kind(ComponentKind::Player)).unwrap();
        assert_eq!(players.len(), 4);

        let cities: Vec<(EntityId, City)> =
            load_all(&store, Filter::Kind(ComponentKind::City)).unwrap();

        for (index, (entity, player)) in players.iter().enumerate() {
            assert_eq!(player.seat, PlayerId(index as u32 + 1));
            assert_eq!(player.entity, Some(*entity));
            assert_eq!(player.resources, 100);
            assert!(!player.is_active_turn);

            let owned_capitals: Vec<&City> = cities
                .iter()
                .map(|(_, city)| city)
                .filter(|city| city.kind == CityKind::Capital && city.owner == Some(*entity))
                .collect();
            assert_eq!(owned_capitals.len(), 1);
            assert_eq!(owned_capitals[0].id, player.capital_city);

            let armies: Vec<(EntityId, Army)> =
                load_all(&store, Filter::ArmiesOwnedBy(*entity)).unwrap();
            assert_eq!(armies.len(), 1);
            assert_eq!(armies[0].1.position, owned_capitals[0].position);
            assert_eq!(armies[0].1.strength, 100);
            assert!(!armies[0].1.has_moved);
        }
    }

    #[test]
    fn second_call_is_a_no_op() {
        let config = GameConfig::default();
        let mut store = generated(&config);
        let before = store.clone();

        let outcome = generate_world_if_absent(&mut store, &config).unwrap();
        assert_eq!(outcome, GenerationOutcome::Skipped);
        assert_eq!(store, before);
        assert_eq!(
            count(&store, Filter::Kind(ComponentKind::MapInitialized)).unwrap(),
            1
        );
    }

    #[test]
    fn fewer_nicknames_leave_spare_capitals_unowned() {
        let config = GameConfig::default().with_players(["alice", "bob"]);
        let store = generated(&config);

        let cities: Vec<(EntityId, City)> =
            load_all(&store, Filter::Kind(ComponentKind::City)).unwrap();
        let capitals: Vec<&City> = cities
            .iter()
            .map(|(_, city)| city)
            .filter(|city| city.kind == CityKind::Capital)
            .collect();
        assert_eq!(capitals.len(), 4);
        assert_eq!(capitals.iter().filter(|city| city.owner.is_some()).count(), 2);
        assert_eq!(count(&store, Filter::Kind(ComponentKind::Army)).unwrap(), 2);
    }

    #[test]
    fn regular_cities_avoid_capitals_and_replay_from_seed() {
        let config = GameConfig::default().with_seed(42);
        let a = generated(&config);
        let b = generated(&config);
        assert_eq!(a, b);

        let capitals = config.capital_positions();
        let cities: Vec<(EntityId, City)> =
            load_all(&a, Filter::Kind(ComponentKind::City)).unwrap();
        let regulars: Vec<&City> = cities
            .iter()
            .map(|(_, city)| city)
            .filter(|city| city.kind == CityKind::Regular)
            .collect();

        assert!(regulars.len() <= config.regular_city_count as usize);
        assert!(regulars.iter().all(|city| !capitals.contains(&city.position)));
        assert!(regulars.iter().all(|city| config.contains(city.position)));
    }

    #[test]
    fn unique_mode_never_repeats_a_regular_position() {
        let mut config = GameConfig::default().with_seed(3);
        config.map_width = 4;
        config.map_height = 4;
        config.regular_city_count = 64;
        config.unique_regular_cities = true;
        let store = generated(&config);

        let cities: Vec<(EntityId, City)> =
            load_all(&store, Filter::Kind(ComponentKind::City)).unwrap();
        let positions: Vec<Hex> = cities
            .iter()
            .filter(|(_, city)| city.kind == CityKind::Regular)
            .map(|(_, city)| city.position)
            .collect();
        let distinct: BTreeSet<Hex> = positions.iter().copied().collect();
        assert_eq!(positions.len(), distinct.len());
        // 16 cells minus 4 capitals
        assert!(positions.len() <= 12);
    }

    #[test]
    fn failure_leaves_no_marker_and_rerun_completes() {
        let config = GameConfig::default();
        let mut store = FaultyStore::new(InMemoryStore::new());
        store.fail_after_writes(20);

        let result = generate_world_if_absent(&mut store, &config);
        assert!(matches!(result, Err(GenerationError::Store(StoreError::Unavailable(_)))));
        assert!(!is_generated(&store).unwrap());

        store.heal();
        let outcome = generate_world_if_absent(&mut store, &config).unwrap();
        assert!(outcome.is_generated());
        assert!(is_generated(&store).unwrap());
    }

    #[test]
    fn rejects_invalid_config_before_touching_the_store() {
        let config = GameConfig::default().with_players(Vec::<String>::new());
        let mut store = InMemoryStore::new();
        assert_eq!(
            generate_world_if_absent(&mut store, &config),
            Err(GenerationError::Config(ConfigError::NoPlayers))
        );
        assert!(store.is_empty());
    }
}
