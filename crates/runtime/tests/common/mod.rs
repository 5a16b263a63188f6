#![allow(dead_code)]

use hexwar_core::{ComponentKind, ComponentStore, EntityId, Filter, Player, PlayerId, store};

/// Installs a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Seats whose active flag is set, in entity order.
pub fn active_seats(store: &dyn ComponentStore) -> Vec<PlayerId> {
    let players: Vec<(EntityId, Player)> =
        store::load_all(store, Filter::Kind(ComponentKind::Player)).unwrap();
    players
        .into_iter()
        .filter(|(_, player)| player.is_active_turn)
        .map(|(_, player)| player.seat)
        .collect()
}

/// Entity ids of the armies owned by the player in `seat`.
pub fn armies_of_seat(store: &dyn ComponentStore, seat: PlayerId) -> Vec<EntityId> {
    let (player, _) = store::seated_player(store, seat)
        .unwrap()
        .expect("seat is occupied");
    store::search_ids(store, Filter::ArmiesOwnedBy(player)).unwrap()
}
