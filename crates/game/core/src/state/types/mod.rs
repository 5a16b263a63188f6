pub mod common;
pub mod entities;
pub mod record;
pub mod turn;

pub use common::{ArmyId, CityId, EntityId, Hex, PlayerId};
pub use entities::{Army, City, CityKind, HexTile, MapInitialized, Player};
pub use record::{Component, ComponentKind, Record};
pub use turn::Turn;
