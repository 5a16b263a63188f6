//! Type-erased store records and the typed [`Component`] view over them.

use super::{Army, City, HexTile, MapInitialized, Player};

/// Discriminant of a [`Record`], used for signature searches and diagnostics.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ComponentKind {
    Hex,
    City,
    Player,
    Army,
    MapInitialized,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 5] = [
        ComponentKind::Hex,
        ComponentKind::City,
        ComponentKind::Player,
        ComponentKind::Army,
        ComponentKind::MapInitialized,
    ];
}

/// One record as held by a component store.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Record {
    Hex(HexTile),
    City(City),
    Player(Player),
    Army(Army),
    MapInitialized(MapInitialized),
}

impl Record {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Record::Hex(_) => ComponentKind::Hex,
            Record::City(_) => ComponentKind::City,
            Record::Player(_) => ComponentKind::Player,
            Record::Army(_) => ComponentKind::Army,
            Record::MapInitialized(_) => ComponentKind::MapInitialized,
        }
    }
}

/// Typed access to one [`Record`] variant.
pub trait Component: Clone + Sized {
    const KIND: ComponentKind;

    fn into_record(self) -> Record;

    /// Returns `None` when the record holds a different component.
    fn from_record(record: Record) -> Option<Self>;
}

macro_rules! impl_component {
    ($ty:ty, $variant:ident) => {
        impl Component for $ty {
            const KIND: ComponentKind = ComponentKind::$variant;

            fn into_record(self) -> Record {
                Record::$variant(self)
            }

            fn from_record(record: Record) -> Option<Self> {
                match record {
                    Record::$variant(value) => Some(value),
                    _ => None,
                }
            }
        }
    };
}

impl_component!(HexTile, Hex);
impl_component!(City, City);
impl_component!(Player, Player);
impl_component!(Army, Army);
impl_component!(MapInitialized, MapInitialized);
