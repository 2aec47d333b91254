use tactics_core::{
    AiState, BattleEngine, BattleEnv, BattleEvent, BattleState, Character, CombatEvent,
    CommandError, EntityId, GameConfig, Grid, MapDimensions, MomentumError, OpenMap, PcgRng,
    Position, ScriptedRng, Team, TurnEvent, TurnPhase, combat::damage_bounds, pathfinding::Path,
};

const HERO: EntityId = EntityId(1);
const OGRE: EntityId = EntityId(2);

fn open_grid(width: u32, height: u32) -> Grid {
    Grid::from_oracle(&OpenMap::new(width, height))
}

/// Hero at (0,0), ogre at (0,3); the queued initiative rolls put the hero first.
fn duel(ogre: Character, rng: &ScriptedRng, config: &GameConfig) -> BattleState {
    let mut state = BattleState::new(open_grid(6, 6), config).with_seed(7);
    state
        .register_unit(
            Character::new(HERO, "Hero", Team::Player).with_armor_class(10),
            Position::new(0, 0),
        )
        .unwrap();
    state.register_unit(ogre, Position::new(0, 3)).unwrap();
    rng.push([20, 1]);
    state
}

fn combat_events(state: &mut BattleState) -> Vec<CombatEvent> {
    state
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            BattleEvent::Combat(combat) => Some(combat),
            _ => None,
        })
        .collect()
}

#[test]
fn fixed_roll_hits_and_applies_ranged_damage() {
    let rng = ScriptedRng::new([]);
    let config = GameConfig::default();
    let ogre = Character::new(OGRE, "Ogre", Team::Enemy).with_armor_class(10);
    let mut state = duel(ogre, &rng, &config);
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&rng, &config));
    engine.start_combat().unwrap();

    rng.push([15]);
    engine.queue_attack(HERO, Position::new(0, 3), Some(OGRE));
    let outcome = engine.execute_command().unwrap();

    let tactics_core::CommandOutcome::Attacked { result, killed, .. } = outcome else {
        panic!("expected an attack outcome");
    };
    assert_eq!(result.roll, 15);
    assert_eq!(result.total, 19);
    assert!(result.is_hit());
    assert!(!killed);

    let hero = engine.state().units.get(HERO).unwrap();
    let (low, high) = damage_bounds(hero.damage_die, hero.damage_mod);
    let lost = 100 - engine.state().units.get(OGRE).unwrap().hp.current;
    assert!((low..=high).contains(&lost), "lost {lost}");
    assert_eq!(engine.state().momentum.current(HERO), 2);
}

#[test]
fn killing_blow_logs_death_then_battle_end() {
    let rng = ScriptedRng::new([]);
    let config = GameConfig::default();
    let ogre = Character::new(OGRE, "Ogre", Team::Enemy)
        .with_armor_class(10)
        .with_hp(3);
    let mut state = duel(ogre, &rng, &config);
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&rng, &config));
    engine.start_combat().unwrap();

    rng.push([15, 5]);
    engine.queue_attack(HERO, Position::new(0, 3), Some(OGRE));
    engine.execute_command().unwrap();
    engine.action_finished();

    assert_eq!(state.turn.phase, TurnPhase::CombatEnd);
    assert_eq!(state.turn.winner, Some(Team::Player));
    assert!(!state.units.contains(OGRE));
    assert!(!state.grid.is_occupied(Position::new(0, 3)));

    let events = combat_events(&mut state);
    let tail: Vec<_> = events.iter().rev().take(3).rev().collect();
    assert!(matches!(tail[0], CombatEvent::AttackHit { damage: 7, remaining_hp: 0, .. }));
    assert!(matches!(tail[1], CombatEvent::UnitDied { team: Team::Enemy, .. }));
    assert_eq!(tail[2], &CombatEvent::BattleEnded { winner: Some(Team::Player) });
    let endings = events
        .iter()
        .filter(|event| matches!(event, CombatEvent::BattleEnded { .. }))
        .count();
    assert_eq!(endings, 1);
}

#[test]
fn commands_after_battle_end_are_rejected() {
    let rng = ScriptedRng::new([]);
    let config = GameConfig::default();
    let ogre = Character::new(OGRE, "Ogre", Team::Enemy).with_hp(1);
    let mut state = duel(ogre, &rng, &config);
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&rng, &config));
    engine.start_combat().unwrap();

    rng.push([20, 1]);
    engine.queue_attack(HERO, Position::new(0, 3), Some(OGRE));
    engine.execute_command().unwrap();
    engine.action_finished();

    let path = Path::new(Position::new(0, 0), vec![Position::new(1, 0)], 10);
    engine.queue_move(HERO, Position::new(1, 0), path);
    assert_eq!(engine.execute_command(), Err(CommandError::CombatOver));
}

#[test]
fn unaffordable_move_changes_nothing() {
    let rng = ScriptedRng::new([]);
    let config = GameConfig::default().with_costs(6, 2);
    let ogre = Character::new(OGRE, "Ogre", Team::Enemy);
    let mut state = duel(ogre, &rng, &config);
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&rng, &config));
    engine.start_combat().unwrap();

    let path = Path::new(
        Position::new(0, 0),
        vec![Position::new(1, 0), Position::new(2, 0)],
        20,
    );
    engine.queue_move(HERO, Position::new(2, 0), path);
    let err = engine.execute_command().unwrap_err();

    assert_eq!(
        err,
        CommandError::Momentum(MomentumError::Insufficient {
            unit: HERO,
            required: 6,
            available: 4,
        })
    );
    assert_eq!(engine.state().position_of(HERO), Some(Position::new(0, 0)));
    assert_eq!(engine.state().momentum.current(HERO), 4);
    assert!(!engine.state().is_animating());
}

#[test]
fn diagonal_shortcut_outside_movement_area_is_rejected() {
    let rng = ScriptedRng::new([]);
    let config = GameConfig::default();
    let ogre = Character::new(OGRE, "Ogre", Team::Enemy);
    let mut state = duel(ogre, &rng, &config);
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&rng, &config));
    engine.start_combat().unwrap();

    let destination = Position::new(3, 3);
    assert!(!engine.movement_area(HERO).contains(&destination));

    let path = Path::new(
        Position::new(0, 0),
        vec![Position::new(1, 1), Position::new(2, 2), destination],
        42,
    );
    engine.queue_move(HERO, destination, path);
    let err = engine.execute_command().unwrap_err();

    assert_eq!(
        err,
        CommandError::PathDiscontinuous {
            at: Position::new(1, 1)
        }
    );
    assert_eq!(engine.state().position_of(HERO), Some(Position::new(0, 0)));
    assert_eq!(engine.state().momentum.current(HERO), 4);
    assert!(!engine.state().is_animating());
}

#[test]
fn exhaustion_ends_the_turn_exactly_once() {
    let rng = ScriptedRng::new([]);
    let config = GameConfig::default();
    let ogre = Character::new(OGRE, "Ogre", Team::Enemy).with_armor_class(30);
    let mut state = duel(ogre, &rng, &config);
    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&rng, &config));
    engine.start_combat().unwrap();

    for _ in 0..2 {
        engine.queue_attack(HERO, Position::new(0, 3), Some(OGRE));
        engine.execute_command().unwrap();
        if engine.state().momentum.current(HERO) > 0 {
            engine.action_finished();
        }
    }
    assert!(engine.state().turn.ending);
    engine.end_current_turn().unwrap();
    assert_eq!(engine.state().turn.current, Some(HERO));

    engine.action_finished();
    engine.action_finished();
    assert_eq!(engine.state().turn.current, Some(OGRE));

    let ended = state
        .drain_events()
        .into_iter()
        .filter(|event| matches!(event, BattleEvent::Turn(TurnEvent::TurnEnded { unit }) if *unit == HERO))
        .count();
    assert_eq!(ended, 1);
}

#[test]
fn initiative_order_is_non_increasing() {
    let rng = PcgRng;
    let config = GameConfig::default();
    let mut state = BattleState::new(open_grid(8, 8), &config).with_seed(0xfeed);
    for id in 0..8u32 {
        let team = if id % 2 == 0 { Team::Player } else { Team::Enemy };
        let unit = Character::new(EntityId(id), format!("unit {id}"), team)
            .with_initiative_mod(id as i32 % 3);
        state
            .register_unit(unit, Position::new(id as i32, 0))
            .unwrap();
    }
    BattleEngine::new(&mut state, BattleEnv::new(&rng, &config))
        .start_combat()
        .unwrap();

    let rolls: Vec<i32> = state
        .turn
        .order
        .iter()
        .map(|id| state.units.get(*id).unwrap().initiative.unwrap())
        .collect();
    assert_eq!(rolls.len(), 8);
    assert!(rolls.windows(2).all(|pair| pair[0] >= pair[1]), "{rolls:?}");
}

#[test]
fn dead_unit_is_never_dispatched_again() {
    const SQUIRE: EntityId = EntityId(3);
    let rng = ScriptedRng::new([10, 20, 5]);
    let config = GameConfig::default();
    let mut state = BattleState::new(open_grid(6, 6), &config);
    state
        .register_unit(
            Character::new(HERO, "Hero", Team::Player)
                .with_armor_class(10)
                .with_hp(5),
            Position::new(0, 0),
        )
        .unwrap();
    state
        .register_unit(Character::new(OGRE, "Ogre", Team::Enemy), Position::new(0, 2))
        .unwrap();
    state
        .register_unit(Character::new(SQUIRE, "Squire", Team::Player), Position::new(5, 5))
        .unwrap();

    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&rng, &config));
    engine.start_combat().unwrap();
    assert_eq!(engine.state().turn.current, Some(OGRE));

    rng.push([15, 7]);
    engine.queue_attack(OGRE, Position::new(0, 0), Some(HERO));
    engine.execute_command().unwrap();
    engine.action_finished();
    assert!(!engine.state().turn.rosters.player.contains(&HERO));

    for _ in 0..6 {
        engine.end_current_turn().unwrap();
    }

    let started: Vec<EntityId> = state
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            BattleEvent::Combat(CombatEvent::TurnStarted { unit, .. }) => Some(unit.id),
            _ => None,
        })
        .collect();
    let death_turn = started.iter().position(|&id| id == OGRE).unwrap();
    assert!(started[death_turn + 1..].iter().all(|&id| id != HERO));
    assert_eq!(state.turn.order, vec![OGRE, SQUIRE]);
}

#[test]
fn enemy_in_optimal_range_attacks_instead_of_moving() {
    let rng = ScriptedRng::new([]);
    let config = GameConfig::default();
    let mut state = BattleState::new(open_grid(6, 6), &config).with_seed(3);
    state
        .register_unit(Character::new(HERO, "Hero", Team::Player), Position::new(0, 0))
        .unwrap();
    state
        .register_unit(
            Character::new(OGRE, "Ogre", Team::Enemy).with_attack_range(5),
            Position::new(0, 3),
        )
        .unwrap();
    rng.push([1, 20]);

    let mut engine = BattleEngine::new(&mut state, BattleEnv::new(&rng, &config));
    engine.start_combat().unwrap();
    assert_eq!(engine.state().turn.current, Some(OGRE));

    let step = engine.drive_ai();
    assert_eq!(
        step,
        tactics_core::AiStep::Suspended(tactics_core::AiAction::Attacked { target: HERO })
    );
    assert_eq!(engine.state().momentum.current(OGRE), 2);
    assert_eq!(engine.state().position_of(OGRE), Some(Position::new(0, 3)));

    engine.action_finished();
    let trace = engine.state().ai.run().unwrap().trace.clone();
    assert_eq!(
        trace,
        vec![
            AiState::Evaluate,
            AiState::Attacking,
            AiState::Waiting,
            AiState::Evaluate,
        ]
    );
    assert!(!trace.contains(&AiState::Moving));
}

#[test]
fn flood_fill_matches_thirteen_cell_diamond() {
    let grid = Grid::build(MapDimensions::new(5, 5), 1.0, |_| false, |_| 0.0);
    let settings = tactics_core::PathSettings::default().with_max_search_cost(2);
    let reach = tactics_core::Pathfinder::new(&grid).reachable_set(Position::new(2, 2), &settings);

    let expected: Vec<Position> = grid
        .positions()
        .filter(|cell| cell.manhattan_distance(Position::new(2, 2)) <= 2)
        .collect();
    assert_eq!(reach.positions().collect::<Vec<_>>(), expected);
    assert_eq!(expected.len(), 13);
}
