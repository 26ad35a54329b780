//! End-to-end tests over the public engine surface.
//!
//! These drive the engine the way a front end would: build a seeded map,
//! query it, issue commands, and watch the reports and events that come
//! back.

use floorcrawl::{Entity, GameEvent, Map, MapKind, Position};

/// Route engine tracing to the test output when RUST_LOG asks for it.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn queries_return_independent_copies() {
    init_tracing();
    let mut map = Map::builder().seed(100).build().unwrap();

    // mutate every copy the engine hands out
    let mut grid = map.grid();
    let player_pos = map.players()[0].position;
    grid.set(player_pos, None);

    let mut players = map.players();
    players[0].stats.hp = -999;
    players[0].position = Position::new(0, 0);

    let mut visibility = map.visibility_grid();
    if let Some(cell) = visibility.get_mut(player_pos) {
        *cell = 0.0;
    }

    // the engine is unmoved
    assert!(matches!(
        map.grid().get(player_pos),
        Some(Some(Entity::Player(_)))
    ));
    assert!(map.players()[0].stats.hp > 0);
    assert_eq!(map.visibility_grid().get(player_pos), Some(&1.0));

    // and commands still work against the real state
    let moves = map.possible_moves(player_pos);
    assert!(moves.contains(&player_pos));
}

#[test]
fn legal_moves_resolve_and_illegal_moves_do_not() {
    let mut map = Map::builder().seed(101).build().unwrap();
    let start = map.players()[0].position;

    let moves = map.possible_moves(start);
    let destination = moves
        .iter()
        .copied()
        .filter(|m| *m != start)
        .filter(|m| matches!(map.grid().get(*m), Some(None)))
        .min()
        .expect("an open floor always offers a legal step");

    let turn = map.process_action(start, destination).expect("legal move");
    assert_eq!(turn.start, start);
    assert_eq!(turn.end, destination);
    assert_eq!(*turn.path.last().unwrap(), destination);
    assert_eq!(map.players()[0].position, destination);

    // a rejected action leaves no trace
    let before = map.grid();
    assert!(map.process_action(destination, destination).is_none());
    assert_eq!(map.grid(), before);
}

#[test]
fn end_turn_reports_at_most_one_turn_per_enemy() {
    let mut map = Map::builder().seed(102).build().unwrap();
    let enemy_count = map.enemies().len();

    let turns = map.end_turn();
    assert!(turns.len() <= enemy_count);

    // stamina is refilled for the whole party
    for player in map.players() {
        assert_eq!(player.stamina, player.stats.spd);
    }
}

#[test]
fn identical_seeds_replay_identically() {
    let mut a = Map::builder().seed(103).party_size(2).build().unwrap();
    let mut b = Map::builder().seed(103).party_size(2).build().unwrap();

    for _ in 0..5 {
        let start = a.players()[0].position;
        assert_eq!(start, b.players()[0].position);

        let step = a
            .possible_moves(start)
            .into_iter()
            .filter(|m| *m != start)
            .min();
        if let Some(step) = step {
            assert_eq!(a.process_action(start, step), b.process_action(start, step));
        }
        assert_eq!(a.end_turn(), b.end_turn());
        assert_eq!(a.grid(), b.grid());
    }
}

#[test]
fn floor_schedule_moves_through_the_families() {
    let mut map = Map::builder().seed(104).build().unwrap();
    assert_eq!(map.kind(), MapKind::Tower);

    while map.floor() < 4 {
        map.next_floor();
    }
    assert_eq!(map.kind(), MapKind::Cave);

    while map.floor() < 7 {
        map.next_floor();
    }
    assert_eq!(map.kind(), MapKind::Dungeon);

    while map.floor() < 10 {
        map.next_floor();
    }
    // the arena floor: one elite, still reported as a dungeon
    assert_eq!(map.kind(), MapKind::Dungeon);
    assert_eq!(map.enemies().len(), 1);
}

#[test]
fn event_log_observes_floor_changes_and_stays_bounded() {
    let mut map = Map::builder().seed(105).build().unwrap();

    let first_events = map.drain_events();
    assert!(first_events
        .iter()
        .any(|e| matches!(e, GameEvent::FloorChanged { floor: 1, .. })));

    // descend far enough to overflow the log many times over
    for _ in 0..30 {
        map.next_floor();
    }
    let events: Vec<GameEvent> = map.events().cloned().collect();
    assert!(events.len() <= 20);
    // the newest entry is the most recent descent
    assert!(matches!(
        events.last(),
        Some(GameEvent::FloorChanged { floor: 31, .. })
    ));

    // draining empties the log
    assert_eq!(map.drain_events().len(), events.len());
    assert_eq!(map.events().count(), 0);
}

#[test]
fn position_on_map_tracks_bounds() {
    let map = Map::builder().seed(106).width(20).height(24).build().unwrap();

    assert!(map.position_on_map(Position::new(0, 0)));
    assert!(map.position_on_map(Position::new(19, 23)));
    assert!(!map.position_on_map(Position::new(20, 0)));
    assert!(!map.position_on_map(Position::new(0, 24)));
    assert!(!map.position_on_map(Position::new(-1, 5)));
}

#[test]
fn stairs_descent_regenerates_the_world() {
    init_tracing();
    // walk a party down a floor through process_action by brute-forcing
    // turns toward the stairs; bounded so a bad layout cannot hang the test
    let mut map = Map::builder().seed(107).build().unwrap();
    let stairs = map.stairs();

    for _ in 0..200 {
        if map.floor() > 1 || map.is_game_over() {
            break;
        }
        let hero = map.players()[0].position;
        let moves = map.possible_moves(hero);

        if moves.contains(&stairs) {
            map.process_action(hero, stairs);
            break;
        }

        // step to the reachable tile closest to the stairs
        let step = moves
            .iter()
            .copied()
            .filter(|m| *m != hero)
            .filter(|m| matches!(map.grid().get(*m), Some(None)))
            .min_by_key(|m| (m.distance_to(stairs), *m));
        match step {
            Some(step) => {
                map.process_action(hero, step);
            }
            None => {
                map.end_turn();
            }
        }
        if !map.is_game_over() && map.players()[0].stamina == 0 {
            map.end_turn();
        }
    }

    if map.floor() == 2 {
        assert!(map
            .events()
            .any(|e| matches!(e, GameEvent::FloorChanged { floor: 2, .. })));
        assert_eq!(map.players().len(), 1);
    }
}
