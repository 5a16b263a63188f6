mod common;

use common::{active_seats, armies_of_seat, init_tracing};
use hexwar_core::{
    Army, ComponentKind, ComponentStore, EndTurn, EntityId, Evaluation, FaultyStore, Filter,
    GameConfig, Hex, InMemoryStore, MoveArmy, PlayerId, Reply, SimulationState, StoreError, store,
};
use hexwar_runtime::{
    RequestInbox, RuntimeError, Stage, StageError, TickOrchestrator, TickReport, TickSystem,
    TurnChange,
};

struct Game<S> {
    orchestrator: TickOrchestrator,
    state: SimulationState,
    store: S,
    inbox: RequestInbox,
}

impl<S: ComponentStore> Game<S> {
    fn with_store(config: GameConfig, store: S) -> Self {
        init_tracing();
        Self {
            orchestrator: TickOrchestrator::new(config),
            state: SimulationState::new(),
            store,
            inbox: RequestInbox::new(),
        }
    }

    fn tick(&mut self) -> Result<TickReport, RuntimeError> {
        self.orchestrator
            .tick(&mut self.state, &mut self.store, &mut self.inbox)
    }

    fn end_turn(&mut self, seat: u32) {
        self.inbox.push_end_turn(EndTurn::new(PlayerId(seat)));
    }

    /// Queues a one-step move for every army of `seat`.
    fn move_all(&mut self, seat: u32) {
        for army in armies_of_seat(&self.store, PlayerId(seat)) {
            let current: Army = store::get_component(&self.store, army).unwrap();
            let destination = Hex::new(current.position.q() + 1, current.position.r());
            self.inbox.push_move(MoveArmy::new(army, destination));
        }
    }

    fn active(&self) -> Option<PlayerId> {
        self.state.active_player()
    }
}

impl Game<InMemoryStore> {
    fn new(config: GameConfig) -> Self {
        Self::with_store(config, InMemoryStore::new())
    }
}

fn replies(report: &[(hexwar_runtime::Ticket, Reply)]) -> Vec<(bool, &str)> {
    report
        .iter()
        .map(|(_, reply)| (reply.success, reply.message.as_str()))
        .collect()
}

#[test]
fn first_tick_runs_every_stage_in_order() {
    let mut game = Game::new(GameConfig::default());
    let report = game.tick().unwrap();

    assert_eq!(report.tick, 1);
    assert_eq!(report.stages, Stage::ORDER.to_vec());
    assert_eq!(report.stages.first(), Some(&Stage::GenerateWorld));
    assert_eq!(report.stages.last(), Some(&Stage::EndTurn));

    let generation = report.generation.expect("world generated on the first tick");
    assert_eq!(generation.hexes, 11 * 22);
    assert_eq!(generation.players, 4);
    assert!(report.turn_initialized);
    assert_eq!(report.turn_id, Some(1));
    assert_eq!(report.active_player, Some(PlayerId(1)));
    assert_eq!(
        report.evaluation,
        Some(Evaluation::Waiting { moved: 0, total: 1 })
    );
    assert_eq!(active_seats(&game.store), vec![PlayerId(1)]);
}

#[test]
fn later_ticks_keep_a_single_turn_and_active_flag() {
    let mut game = Game::new(GameConfig::default());

    for tick in 1..=12u64 {
        if tick > 1 {
            let seat = game.active().unwrap().0;
            game.end_turn(seat);
        }
        let report = game.tick().unwrap();

        assert_eq!(report.tick, tick);
        assert_eq!(report.generation.is_some(), tick == 1);
        assert_eq!(report.turn_initialized, tick == 1);
        assert_eq!(active_seats(&game.store), vec![game.active().unwrap()]);
        assert_eq!(
            store::count(&game.store, Filter::Kind(ComponentKind::MapInitialized)).unwrap(),
            1
        );
    }

    // 11 hand-overs after the opening turn.
    assert_eq!(game.state.turn.as_ref().map(|turn| turn.turn_id), Some(12));
    assert_eq!(game.active(), Some(PlayerId(4)));
}

#[test]
fn end_turn_from_the_wrong_seat_is_rejected() {
    let mut game = Game::new(GameConfig::default());
    game.tick().unwrap();

    game.end_turn(1);
    let report = game.tick().unwrap();
    assert_eq!(
        replies(&report.end_turn_replies),
        vec![(true, "Turn ended successfully")]
    );
    assert_eq!(
        report.turn_changes,
        vec![TurnChange {
            turn_id: 2,
            active_player: PlayerId(2)
        }]
    );

    game.end_turn(1);
    let report = game.tick().unwrap();
    assert_eq!(
        replies(&report.end_turn_replies),
        vec![(false, "It's not your turn")]
    );
    assert!(report.turn_changes.is_empty());
    assert_eq!(game.active(), Some(PlayerId(2)));
}

#[test]
fn requests_in_one_tick_are_answered_in_submission_order() {
    let mut game = Game::new(GameConfig::default());
    game.tick().unwrap();

    game.end_turn(1);
    game.end_turn(1);
    game.end_turn(2);
    let report = game.tick().unwrap();

    assert_eq!(
        replies(&report.end_turn_replies),
        vec![
            (true, "Turn ended successfully"),
            (false, "It's not your turn"),
            (true, "Turn ended successfully"),
        ]
    );
    let tickets: Vec<_> = report.end_turn_replies.iter().map(|(ticket, _)| *ticket).collect();
    assert!(tickets.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(game.active(), Some(PlayerId(3)));
}

#[test]
fn moving_every_army_passes_the_turn() {
    let mut game = Game::new(GameConfig::default());
    game.tick().unwrap();

    game.move_all(1);
    let report = game.tick().unwrap();
    assert_eq!(replies(&report.move_replies), vec![(true, "Army moved")]);
    assert_eq!(
        report.evaluation,
        Some(Evaluation::Advanced {
            turn_id: 2,
            active_player: PlayerId(2)
        })
    );
    assert_eq!(active_seats(&game.store), vec![PlayerId(2)]);
}

#[test]
fn armies_are_fresh_when_their_owner_comes_back() {
    let mut game = Game::new(GameConfig::default());
    game.tick().unwrap();

    for seat in 1..=4 {
        game.move_all(seat);
        let report = game.tick().unwrap();
        assert!(matches!(report.evaluation, Some(Evaluation::Advanced { .. })));
    }

    assert_eq!(game.active(), Some(PlayerId(1)));
    for army in armies_of_seat(&game.store, PlayerId(1)) {
        let army: Army = store::get_component(&game.store, army).unwrap();
        assert!(!army.has_moved);
        assert_eq!(army.position, Hex::new(2, 1));
    }
}

#[test]
fn move_of_a_waiting_player_is_rejected() {
    let mut game = Game::new(GameConfig::default());
    game.tick().unwrap();

    game.move_all(3);
    let report = game.tick().unwrap();
    assert_eq!(replies(&report.move_replies), vec![(false, "It's not your turn")]);
    assert_eq!(game.active(), Some(PlayerId(1)));
}

#[test]
fn store_outage_aborts_the_tick_and_keeps_requests() {
    let mut game = Game::with_store(
        GameConfig::default(),
        FaultyStore::new(InMemoryStore::new()),
    );
    game.tick().unwrap();

    game.end_turn(1);
    game.store.fail_reads(true);
    let error = game.tick().unwrap_err();
    assert_eq!(error.stage(), Some(Stage::GenerateWorld));
    assert!(matches!(
        error,
        RuntimeError::Stage {
            source: StageError::Generation(_),
            ..
        }
    ));
    assert_eq!(game.state.tick, 1);
    assert_eq!(game.inbox.pending_end_turns(), 1);

    game.store.heal();
    let report = game.tick().unwrap();
    assert_eq!(report.tick, 2);
    assert_eq!(
        replies(&report.end_turn_replies),
        vec![(true, "Turn ended successfully")]
    );
    assert_eq!(game.active(), Some(PlayerId(2)));
}

#[test]
fn interrupted_hand_over_is_rolled_back_and_retried() {
    let mut game = Game::with_store(
        GameConfig::default(),
        FaultyStore::new(InMemoryStore::new()),
    );
    game.tick().unwrap();

    // Raising the flag of seat 2 is the only write that gets through.
    game.end_turn(1);
    game.store.fail_after_writes(1);
    let error = game.tick().unwrap_err();
    assert_eq!(error.stage(), Some(Stage::EndTurn));
    assert_eq!(game.active(), Some(PlayerId(1)));
    assert_eq!(game.inbox.pending_end_turns(), 1);

    game.store.heal();
    let report = game.tick().unwrap();
    assert!(
        report
            .activation
            .is_some_and(|activation| activation.deactivated == 1 && !activation.newly_active)
    );
    assert_eq!(
        replies(&report.end_turn_replies),
        vec![(true, "Turn ended successfully")]
    );
    assert_eq!(
        report.turn_changes,
        vec![TurnChange {
            turn_id: 2,
            active_player: PlayerId(2),
        }]
    );
    assert_eq!(active_seats(game.store.inner()), vec![PlayerId(2)]);
}

#[test]
fn failed_tick_still_reports_earlier_hand_overs() {
    let mut game = Game::with_store(
        GameConfig::default(),
        FaultyStore::new(InMemoryStore::new()),
    );
    game.tick().unwrap();

    // Seat 1 moves its army, evaluation hands over to seat 2, then the end
    // turn of seat 2 fails half way through activating seat 3.
    game.move_all(1);
    game.end_turn(2);
    game.store.fail_after_writes(4);

    let mut report = TickReport::default();
    let error = game
        .orchestrator
        .tick_into(&mut game.state, &mut game.store, &mut game.inbox, &mut report)
        .unwrap_err();
    assert_eq!(error.stage(), Some(Stage::EndTurn));
    assert_eq!(report.tick, 2);
    assert_eq!(replies(&report.move_replies), vec![(true, "Army moved")]);
    assert_eq!(
        report.turn_changes,
        vec![TurnChange {
            turn_id: 2,
            active_player: PlayerId(2),
        }]
    );
    assert_eq!(game.active(), Some(PlayerId(2)));
    assert_eq!(game.state.tick, 1);

    game.store.heal();
    let report = game.tick().unwrap();
    assert_eq!(
        replies(&report.end_turn_replies),
        vec![(true, "Turn ended successfully")]
    );
    assert_eq!(game.active(), Some(PlayerId(3)));
    assert_eq!(active_seats(game.store.inner()), vec![PlayerId(3)]);
}

#[test]
fn generation_failure_is_retried_from_scratch() {
    let mut game = Game::with_store(
        GameConfig::default(),
        FaultyStore::new(InMemoryStore::new()),
    );
    game.store.fail_after_writes(50);

    let error = game.tick().unwrap_err();
    assert_eq!(error.stage(), Some(Stage::GenerateWorld));
    assert!(game.state.turn.is_none());

    game.store.heal();
    let report = game.tick().unwrap();
    assert!(report.generation.is_some());
    assert_eq!(report.active_player, Some(PlayerId(1)));
    assert_eq!(
        store::count(&game.store, Filter::Kind(ComponentKind::MapInitialized)).unwrap(),
        1
    );
}

#[test]
fn duplicate_players_from_a_retried_generation_do_not_break_the_rotation() {
    let mut game = Game::with_store(
        GameConfig::default(),
        FaultyStore::new(InMemoryStore::new()),
    );
    // The hexes, the first capital and the seat 1 draft are written, the
    // write that finalizes the draft fails.
    game.store.fail_after_writes(244);
    assert_eq!(game.tick().unwrap_err().stage(), Some(Stage::GenerateWorld));

    game.store.heal();
    game.tick().unwrap();
    assert_eq!(
        store::count(&game.store, Filter::Kind(ComponentKind::Player)).unwrap(),
        5
    );
    assert_eq!(active_seats(game.store.inner()), vec![PlayerId(1)]);

    let mut seats = Vec::new();
    for _ in 0..3 {
        for seat in 1..=4 {
            // Holding position counts as a move and never leaves the map.
            for army in armies_of_seat(&game.store, PlayerId(seat)) {
                let current: Army = store::get_component(&game.store, army).unwrap();
                game.inbox.push_move(MoveArmy::new(army, current.position));
            }
            let report = game.tick().unwrap();
            assert_eq!(replies(&report.move_replies), vec![(true, "Army moved")]);
            assert!(matches!(report.evaluation, Some(Evaluation::Advanced { .. })));
            seats.push(report.active_player.map(|player| player.0));
            assert_eq!(active_seats(game.store.inner()).len(), 1);
        }
    }
    assert_eq!(seats, [2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 4, 1].map(Some).to_vec());
}

struct FlakyAttack {
    failures_left: u32,
    runs: u32,
}

impl TickSystem for FlakyAttack {
    fn name(&self) -> &'static str {
        "flaky_attack"
    }

    fn run(
        &mut self,
        _state: &SimulationState,
        _store: &mut dyn ComponentStore,
        _config: &GameConfig,
    ) -> Result<(), StoreError> {
        self.runs += 1;
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(StoreError::Unavailable("combat backend offline".into()));
        }
        Ok(())
    }
}

#[test]
fn failing_system_skips_the_remaining_stages() {
    let config = GameConfig::default();
    let mut game = Game::new(config.clone());
    game.orchestrator = TickOrchestrator::new(config).with_attack_system(Box::new(FlakyAttack {
        failures_left: 1,
        runs: 0,
    }));

    let error = game.tick().unwrap_err();
    match &error {
        RuntimeError::Stage {
            stage: Stage::Attack,
            source: StageError::System { system, .. },
        } => assert_eq!(*system, "flaky_attack"),
        other => panic!("unexpected error: {other}"),
    }
    // World generation ran, turn initialization did not.
    assert!(hexwar_core::world::is_generated(&game.store).unwrap());
    assert!(game.state.turn.is_none());

    let report = game.tick().unwrap();
    assert!(report.generation.is_none());
    assert!(report.turn_initialized);
}

#[test]
fn same_seed_and_requests_give_the_same_digest() {
    fn play(seed: u64) -> [u8; 32] {
        let mut game = Game::new(GameConfig::default().with_seed(seed));
        game.tick().unwrap();
        game.move_all(1);
        game.tick().unwrap();
        game.end_turn(2);
        game.tick().unwrap();
        game.store.digest(game.state.turn.as_ref()).unwrap()
    }

    assert_eq!(hex::encode(play(7)), hex::encode(play(7)));
    assert_ne!(play(7), play(8));
}

#[test]
fn tick_report_serializes_to_json() {
    let mut game = Game::new(GameConfig::default());
    game.tick().unwrap();
    game.end_turn(1);
    let report = game.tick().unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["tick"], 2);
    assert_eq!(json["stages"][0], "GenerateWorld");
    assert_eq!(json["end_turn_replies"][0][1]["message"], "Turn ended successfully");

    let back: TickReport = serde_json::from_value(json).unwrap();
    assert_eq!(back, report);
}

#[test]
fn unknown_army_is_rejected_not_fatal() {
    let mut game = Game::new(GameConfig::default());
    game.tick().unwrap();

    game.inbox
        .push_move(MoveArmy::new(EntityId(u64::MAX), Hex::new(1, 1)));
    let report = game.tick().unwrap();
    assert_eq!(replies(&report.move_replies), vec![(false, "Army not found")]);
}
