use space_pilot::config::GameConfig;
use space_pilot::constants::{MAX_SHOT_COOLDOWN, SHIP_GLYPH, SHOT_GLYPH};
use space_pilot::error::{CommandError, ConfigError};
use space_pilot::game::{Game, Phase};
use space_pilot::rendering::ScreenBuffer;
use space_pilot::round::Round;
use space_pilot::scheduler::Task;
use space_pilot::types::Position;

fn start(seed: u64) -> (Round, ScreenBuffer) {
    let config = GameConfig::default().with_seed(seed);
    let mut screen = ScreenBuffer::new(config.width, config.height + 6);
    let round = Round::start(config, 0, &mut screen).expect("round starts");
    (round, screen)
}

#[test]
fn moving_right_three_times_on_empty_lane() {
    let (mut round, mut screen) = start(1);
    let h = GameConfig::default().height;
    assert_eq!(round.state().position, Position::new(1, h / 2));

    for _ in 0..3 {
        round.receive(b'd', &mut screen).unwrap();
    }

    assert_eq!(round.state().position, Position::new(4, h / 2));
    assert_eq!(round.state().health, 3);
    assert_eq!(screen.char_at(4, h / 2), SHIP_GLYPH);
    assert_eq!(screen.char_at(1, h / 2), ' ');
}

#[test]
fn fired_shot_advances_one_cell_per_interval() {
    let (mut round, mut screen) = start(2);
    let ship = round.state().position;
    assert_eq!(round.state().shot_cooldown, MAX_SHOT_COOLDOWN);

    round.receive(b' ', &mut screen).unwrap();
    assert_eq!(round.state().shot_cooldown, 3);
    assert_eq!(round.shots().active_count(), 1);
    assert_eq!(
        round.shots().get(0).unwrap().position,
        Position::new(ship.x + 1, ship.y)
    );

    round.run_due(100, &mut screen).unwrap();
    let shot = round.shots().get(0).expect("shot still active");
    assert_eq!(shot.position, Position::new(ship.x + 2, ship.y));
    assert!(round.scheduler().is_scheduled(Task::ShotAdvance(0)));
    assert_eq!(screen.char_at(ship.x + 1, ship.y), ' ');
    assert_eq!(screen.char_at(ship.x + 2, ship.y), SHOT_GLYPH);
}

#[test]
fn counters_stay_bounded_through_a_long_busy_round() {
    let config = GameConfig {
        starting_difficulty: 3,
        ..GameConfig::default().with_seed(99)
    };
    let mut screen = ScreenBuffer::new(config.width, config.height + 6);
    let capacity = config.max_shots;
    let mut round = Round::start(config, 0, &mut screen).unwrap();

    let pattern = b"  w s  d a ";
    let mut now = 0;
    let mut last_score = 0;
    let mut i = 0;
    while !round.is_over() && now < 600_000 {
        now += 50;
        round.run_due(now, &mut screen).unwrap();
        round.receive(pattern[i % pattern.len()], &mut screen).unwrap();
        i += 1;

        let state = round.state();
        assert!(state.health <= 3);
        assert!(state.shot_cooldown <= MAX_SHOT_COOLDOWN);
        assert!(state.score >= last_score);
        last_score = state.score;
        assert!(round.shots().active_count() <= capacity);
        for slot in 0..capacity {
            assert_eq!(
                round.shots().get(slot).is_some(),
                round.scheduler().is_scheduled(Task::ShotAdvance(slot)),
                "slot {slot} and its advance task disagree"
            );
        }
        let pos = state.position;
        assert!(pos.x >= 1 && pos.x <= 57 && pos.y >= 1 && pos.y <= 16);
    }

    assert!(round.is_over(), "a dense lane should end the round");
    assert_eq!(round.state().health, 0);
    assert!(round.scheduler().is_empty());
    assert_eq!(round.shots().active_count(), 0);
    assert!(!round.accepts_input());
}

#[test]
fn host_round_trip_through_game_controller() {
    let config = GameConfig::default().with_seed(8);
    let screen = ScreenBuffer::new(config.width, config.height + 6);
    let mut game = Game::new(config, screen);

    game.command(&["play"], 0).unwrap();
    game.receive(b' ', 0).unwrap();
    game.tick(1_000).unwrap();
    assert_eq!(game.phase(), Phase::Playing);
    assert_eq!(game.round().unwrap().state().shots_fired, 1);

    // The recharge task restores the spent charge and then retires.
    game.tick(750 * 5).unwrap();
    let round = game.round().unwrap();
    assert_eq!(round.state().shot_cooldown, MAX_SHOT_COOLDOWN);
    assert!(!round.scheduler().is_scheduled(Task::Recharge));
}

#[test]
fn host_rejects_degenerate_config_without_starting() {
    let config = GameConfig {
        starting_difficulty: 0,
        ..GameConfig::default()
    };
    let screen = ScreenBuffer::new(60, 24);
    let mut game = Game::new(config, screen);

    assert!(matches!(
        game.command(&["play"], 0),
        Err(CommandError::Config(ConfigError::ZeroValue(_)))
    ));
    assert_eq!(game.phase(), Phase::NotStarted);
    assert_eq!(game.output.char_at(0, 0), ' ');
}
