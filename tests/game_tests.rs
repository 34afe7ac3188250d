use salvo::{
    CellState, FleetError, Game, GameError, GameId, GamePhase, Orientation, Placement, Player,
    PlayerId, Rules, ShipClass, ShotOutcome, ShotResult,
};

fn dinghy_rules() -> Rules {
    Rules::new(5, vec![ShipClass::new("Dinghy", 1)]).unwrap()
}

fn destroyer_rules() -> Rules {
    Rules::new(4, vec![ShipClass::new("Destroyer", 2)]).unwrap()
}

fn ids() -> (PlayerId, PlayerId) {
    (PlayerId::from("alice"), PlayerId::from("bob"))
}

fn lobby(rules: Rules) -> Game {
    let (a, b) = ids();
    let mut game = Game::new(GameId::from("g1"), rules);
    game.add_player(Player::new(a, "Alice")).unwrap();
    game.add_player(Player::new(b, "Bob")).unwrap();
    game
}

fn single_cell_game() -> Game {
    let (a, b) = ids();
    let mut game = lobby(dinghy_rules());
    game.place_ships(&a, &[Placement::new(vec![(0, 0)])]).unwrap();
    game.place_ships(&b, &[Placement::new(vec![(4, 4)])]).unwrap();
    game
}

#[test]
fn test_second_player_moves_game_to_placement() {
    let (a, b) = ids();
    let mut game = Game::new(GameId::from("g1"), Rules::standard());
    assert_eq!(game.phase(), GamePhase::Created);
    game.add_player(Player::new(a.clone(), "Alice")).unwrap();
    assert_eq!(game.phase(), GamePhase::Created);
    assert_eq!(
        game.add_player(Player::new(a, "Alice again")).unwrap_err(),
        GameError::PlayerAlreadyJoined
    );
    game.add_player(Player::new(b, "Bob")).unwrap();
    assert_eq!(game.phase(), GamePhase::PlaceShips);
}

#[test]
fn test_third_player_is_always_rejected() {
    let mut game = lobby(Rules::standard());
    let carol = Player::new("carol", "Carol");
    assert_eq!(game.add_player(carol.clone()).unwrap_err(), GameError::GameFull);

    game.delete_game();
    assert_eq!(game.add_player(carol).unwrap_err(), GameError::GameFull);
    assert_eq!(game.players().len(), 2);
}

#[test]
fn test_adding_players_after_deletion_is_rejected() {
    let mut game = Game::new(GameId::from("g1"), Rules::standard());
    game.delete_game();
    assert_eq!(
        game.add_player(Player::new("alice", "Alice")).unwrap_err(),
        GameError::InvalidPhase
    );
}

#[test]
fn test_start_game_needs_two_players() {
    let mut game = Game::new(GameId::from("g1"), Rules::standard());
    assert!(!game.can_start_game());
    assert_eq!(game.start_game().unwrap_err(), GameError::NotEnoughPlayers);
    game.add_player(Player::new("alice", "Alice")).unwrap();
    assert_eq!(game.start_game().unwrap_err(), GameError::NotEnoughPlayers);
    game.add_player(Player::new("bob", "Bob")).unwrap();
    assert!(game.can_start_game());
    game.start_game().unwrap();
    assert_eq!(game.phase(), GamePhase::PlaceShips);

    let mut shooting = single_cell_game();
    assert_eq!(shooting.start_game().unwrap_err(), GameError::InvalidPhase);
}

#[test]
fn test_place_ships_checks_phase_and_membership() {
    let (a, _) = ids();
    let fleet = [Placement::new(vec![(0, 0)])];

    let mut game = Game::new(GameId::from("g1"), dinghy_rules());
    game.add_player(Player::new(a.clone(), "Alice")).unwrap();
    assert_eq!(game.place_ships(&a, &fleet).unwrap_err(), GameError::InvalidPhase);

    let mut game = lobby(dinghy_rules());
    assert_eq!(
        game.place_ships(&PlayerId::from("mallory"), &fleet).unwrap_err(),
        GameError::PlayerNotPartOfGame
    );
    game.place_ships(&a, &fleet).unwrap();
    assert_eq!(
        game.place_ships(&a, &fleet).unwrap_err(),
        GameError::FleetAlreadyPlaced
    );
    assert_eq!(game.phase(), GamePhase::PlaceShips);
}

#[test]
fn test_invalid_fleet_is_not_stored() {
    let (a, b) = ids();
    let mut game = lobby(dinghy_rules());

    let err = game.place_ships(&a, &[Placement::new(vec![(5, 0)])]).unwrap_err();
    assert_eq!(err, GameError::InvalidFleet(FleetError::OutOfBounds { x: 5, y: 0 }));
    assert!(game.board(&a).is_none());

    let err = game
        .place_ships(&a, &[Placement::new(vec![(0, 0)]), Placement::new(vec![(1, 1)])])
        .unwrap_err();
    assert!(matches!(err, GameError::InvalidFleet(FleetError::Composition { .. })));
    assert!(game.board(&a).is_none());

    let err = game
        .place_ships(&b, &[Placement::line(0, 0, Orientation::Horizontal, 2)])
        .unwrap_err();
    assert!(matches!(err, GameError::InvalidFleet(_)));
    assert_eq!(game.phase(), GamePhase::PlaceShips);
}

#[test]
fn test_overlapping_fleet_is_not_stored() {
    let (a, _) = ids();
    let rules = Rules::new(
        4,
        vec![ShipClass::new("Destroyer", 2), ShipClass::new("Destroyer", 2)],
    )
    .unwrap();
    let mut game = lobby(rules);

    let err = game
        .place_ships(
            &a,
            &[
                Placement::line(0, 1, Orientation::Horizontal, 2),
                Placement::line(1, 0, Orientation::Vertical, 2),
            ],
        )
        .unwrap_err();
    assert_eq!(err, GameError::InvalidFleet(FleetError::Overlap { x: 1, y: 1 }));
    assert!(game.board(&a).is_none());
    assert_eq!(game.phase(), GamePhase::PlaceShips);
}

#[test]
fn test_both_fleets_move_game_to_shoot() {
    let (a, _) = ids();
    let mut game = lobby(dinghy_rules());
    assert_eq!(game.shoot(&a, 0, 0).unwrap_err(), GameError::InvalidPhase);
    game.place_ships(&a, &[Placement::new(vec![(0, 0)])]).unwrap();
    assert_eq!(game.phase(), GamePhase::PlaceShips);

    let game = single_cell_game();
    assert_eq!(game.phase(), GamePhase::Shoot);
    assert!(game.current_round().is_none());
}

#[test]
fn test_single_decisive_round() {
    let (a, b) = ids();
    let mut game = single_cell_game();

    assert_eq!(game.shoot(&a, 4, 4).unwrap(), ShotOutcome::Pending);
    assert_eq!(game.phase(), GamePhase::Shoot);
    assert_eq!(game.winner(), None);

    let outcome = game.shoot(&b, 2, 2).unwrap();
    let ShotOutcome::GameOver { report, winner } = outcome else {
        panic!("expected the round to end the game");
    };
    assert_eq!(winner, Some(a.clone()));
    assert_eq!(report.number, 1);
    assert_eq!(report.shots[0].result, ShotResult::Sunk);
    assert_eq!(report.shots[1].result, ShotResult::Miss);

    assert_eq!(game.phase(), GamePhase::Finished);
    assert_eq!(game.winner(), Some(&a));
    assert_eq!(game.rounds().len(), 1);

    let alice_board = game.board(&a).unwrap();
    assert_eq!(alice_board.cell(2, 2), CellState::Miss);
    assert_eq!(
        alice_board.cells().iter().filter(|c| **c == CellState::Miss).count(),
        1
    );
    assert!(!alice_board.all_sunk());
    assert!(game.board(&b).unwrap().all_sunk());

    assert_eq!(game.shoot(&a, 0, 1).unwrap_err(), GameError::InvalidPhase);
}

#[test]
fn test_shots_resolve_in_join_order() {
    let (a, b) = ids();
    let mut game = single_cell_game();

    // bob submits first, alice joined first
    assert_eq!(game.shoot(&b, 1, 1).unwrap(), ShotOutcome::Pending);
    let ShotOutcome::RoundResolved(report) = game.shoot(&a, 3, 3).unwrap() else {
        panic!("round should resolve without a winner");
    };
    assert_eq!(report.shots.len(), 2);
    assert_eq!(report.shots[0].shooter, a);
    assert_eq!(report.shots[0].target, b);
    assert_eq!((report.shots[0].x, report.shots[0].y), (3, 3));
    assert_eq!(report.shots[1].shooter, b);
    assert_eq!(report.shots[1].target, a);

    assert!(game.current_round().is_none());
    assert_eq!(game.rounds().len(), 1);
    assert!(game.rounds()[0].is_closed());
}

#[test]
fn test_second_shot_in_round_is_rejected() {
    let (a, b) = ids();
    let mut game = single_cell_game();

    game.shoot(&a, 1, 1).unwrap();
    assert!(!game.is_player_allowed_to_shoot(&a));
    assert!(game.is_player_allowed_to_shoot(&b));
    assert_eq!(game.shoot(&a, 2, 2).unwrap_err(), GameError::AlreadyShot);

    game.shoot(&b, 1, 1).unwrap();
    assert!(game.is_player_allowed_to_shoot(&a));
    assert_eq!(game.shoot(&a, 2, 2).unwrap(), ShotOutcome::Pending);
    assert_eq!(game.current_round().unwrap().number(), 2);
}

#[test]
fn test_shot_validation() {
    let (a, _) = ids();
    let mut game = single_cell_game();
    assert_eq!(
        game.shoot(&a, 5, 0).unwrap_err(),
        GameError::InvalidShot { x: 5, y: 0 }
    );
    assert_eq!(
        game.shoot(&PlayerId::from("mallory"), 0, 0).unwrap_err(),
        GameError::PlayerNotPartOfGame
    );
    assert!(game.current_round().is_none());
}

#[test]
fn test_simultaneous_sinking_is_a_draw() {
    let (a, b) = ids();
    let mut game = single_cell_game();
    game.shoot(&a, 4, 4).unwrap();
    let outcome = game.shoot(&b, 0, 0).unwrap();
    assert!(matches!(outcome, ShotOutcome::GameOver { winner: None, .. }));
    assert_eq!(game.phase(), GamePhase::Finished);
    assert_eq!(game.winner(), None);
}

#[test]
fn test_game_runs_until_a_fleet_is_sunk() {
    let (a, b) = ids();
    let mut game = lobby(destroyer_rules());
    let fleet = [Placement::line(0, 0, Orientation::Horizontal, 2)];
    game.place_ships(&a, &fleet).unwrap();
    game.place_ships(&b, &fleet).unwrap();

    game.shoot(&a, 0, 0).unwrap();
    let ShotOutcome::RoundResolved(first) = game.shoot(&b, 3, 3).unwrap() else {
        panic!("round 1 should not end the game");
    };
    assert_eq!(first.shots[0].result, ShotResult::Hit);
    assert!(!first.shots[0].repeated);

    game.shoot(&a, 0, 0).unwrap();
    let ShotOutcome::RoundResolved(second) = game.shoot(&b, 3, 2).unwrap() else {
        panic!("repeating a hit must not sink the ship");
    };
    assert_eq!(second.shots[0].result, ShotResult::Hit);
    assert!(second.shots[0].repeated);

    game.shoot(&b, 3, 1).unwrap();
    let outcome = game.shoot(&a, 1, 0).unwrap();
    let ShotOutcome::GameOver { report, winner } = outcome else {
        panic!("round 3 should sink bob's destroyer");
    };
    assert_eq!(report.number, 3);
    assert_eq!(report.shots[0].result, ShotResult::Sunk);
    assert_eq!(winner, Some(a.clone()));
    assert_eq!(game.rounds().len(), 3);
    assert_eq!(game.winner(), Some(&a));
}

#[test]
fn test_delete_is_terminal_and_idempotent() {
    let (a, _) = ids();
    let mut game = single_cell_game();
    game.shoot(&a, 1, 1).unwrap();

    game.delete_game();
    assert_eq!(game.phase(), GamePhase::Deleted);
    assert_eq!(game.shoot(&a, 2, 2).unwrap_err(), GameError::InvalidPhase);

    game.delete_game();
    assert_eq!(game.phase(), GamePhase::Deleted);
    assert_eq!(game.winner(), None);
    assert!(!game.is_player_allowed_to_shoot(&a));
}

#[test]
fn test_snapshot_hides_ship_positions() {
    let (a, b) = ids();
    let mut game = single_cell_game();
    game.shoot(&a, 3, 3).unwrap();

    let snapshot = game.snapshot();
    assert_eq!(snapshot.phase, GamePhase::Shoot);
    assert_eq!(snapshot.awaiting, vec![b.clone()]);
    assert_eq!(snapshot.boards.len(), 2);
    for view in &snapshot.boards {
        assert!(view.cells.iter().all(|c| *c == CellState::Unknown));
        assert_eq!(view.ships_remaining, 1);
    }

    game.shoot(&b, 0, 0).unwrap();
    let snapshot = game.snapshot();
    let alice = snapshot.board_of(&a).unwrap();
    assert_eq!(alice.cell(0, 0), Some(CellState::Hit));
    assert_eq!(alice.ships_remaining, 0);
    assert_eq!(snapshot.board_of(&b).unwrap().cell(3, 3), Some(CellState::Miss));
    assert_eq!(snapshot.winner, Some(b.clone()));
    assert_eq!(snapshot.rounds_played, 1);
    assert!(snapshot.awaiting.is_empty());

    let view = game.player_view(&a).unwrap();
    assert_eq!(view.fleet.len(), 1);
    assert_eq!(view.fleet[0].cells, vec![(0, 0)]);
    assert!(view.fleet[0].sunk);
    assert_eq!(
        game.player_view(&PlayerId::from("mallory")).unwrap_err(),
        GameError::PlayerNotPartOfGame
    );
}
