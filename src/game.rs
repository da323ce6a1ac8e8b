use std::io;

use log::{info, warn};

use crate::config::GameConfig;
use crate::error::CommandError;
use crate::rendering::Renderer;
use crate::round::{Round, RoundReport};

pub const GAME_NAME: &str = "space pilot";

pub const HELP_TEXT: &str = "WASD to move the spaceship\nSPACEBAR to FIRE\n\
Weapon recharges over time. Difficulty increases with score.\n";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Playing,
    RoundOver,
}

/// Round controller and host command surface.
pub struct Game<R: Renderer> {
    pub output: R,
    config: GameConfig,
    round: Option<Round>,
    report_taken: bool,
}

impl<R: Renderer> Game<R> {
    pub fn new(config: GameConfig, output: R) -> Self {
        Game {
            output,
            config,
            round: None,
            report_taken: false,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        match &self.round {
            None => Phase::NotStarted,
            Some(round) if round.is_over() => Phase::RoundOver,
            Some(_) => Phase::Playing,
        }
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn round_mut(&mut self) -> Option<&mut Round> {
        self.round.as_mut()
    }

    /// Score of the current or most recent round.
    pub fn score(&self) -> u32 {
        self.round.as_ref().map_or(0, |r| r.state().score)
    }

    /// Dispatches a host sub-command (`play`, `help`, `reset`). Rejections are
    /// logged and leave all state untouched.
    pub fn command(&mut self, args: &[&str], now: u64) -> Result<(), CommandError> {
        let result = match args.first() {
            None => Err(CommandError::TooFewArgs),
            Some(word) if word.eq_ignore_ascii_case("play") => self.play(now),
            Some(word) if word.eq_ignore_ascii_case("help") => self.help().map_err(Into::into),
            Some(word) if word.eq_ignore_ascii_case("reset") => self.reset_score(),
            Some(word) => Err(CommandError::Unsupported(word.to_string())),
        };
        if let Err(e) = &result {
            warn!("[{}] {}", GAME_NAME, e);
        }
        result
    }

    pub fn play(&mut self, now: u64) -> Result<(), CommandError> {
        if self.phase() == Phase::Playing {
            return Err(CommandError::RoundInProgress);
        }
        self.round = Some(Round::start(self.config.clone(), now, &mut self.output)?);
        self.report_taken = false;
        Ok(())
    }

    pub fn help(&mut self) -> io::Result<()> {
        self.output.print(HELP_TEXT)?;
        self.output.flush()
    }

    /// Zeroes the retained score. Refused while a round is running so the
    /// live score only ever grows.
    pub fn reset_score(&mut self) -> Result<(), CommandError> {
        if self.phase() == Phase::Playing {
            return Err(CommandError::RoundInProgress);
        }
        if let Some(round) = self.round.as_mut() {
            round.reset_score();
        }
        info!("[{}] Scores reset", GAME_NAME);
        Ok(())
    }

    /// Routes one input byte to the round's receiver, after catching the
    /// round up to `now`. Bytes arriving with no registered receiver are dropped.
    pub fn receive(&mut self, byte: u8, now: u64) -> io::Result<()> {
        let Some(round) = self.round.as_mut() else {
            return Ok(());
        };
        round.run_due(now, &mut self.output)?;
        round.receive(byte, &mut self.output)
    }

    /// Advances the round clock to `now`, running every task that falls due.
    pub fn tick(&mut self, now: u64) -> io::Result<()> {
        match self.round.as_mut() {
            Some(round) if !round.is_over() => round.run_due(now, &mut self.output),
            _ => Ok(()),
        }
    }

    /// Hands out the final report the first time it is asked for after a
    /// round ends.
    pub fn take_report(&mut self) -> Option<RoundReport> {
        if self.report_taken {
            return None;
        }
        let report = self.round.as_ref()?.report()?;
        self.report_taken = true;
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::ScreenBuffer;
    use crate::types::{Cell, Position};

    fn game() -> Game<ScreenBuffer> {
        let config = GameConfig::default().with_seed(5);
        let screen = ScreenBuffer::new(config.width, config.height + 6);
        Game::new(config, screen)
    }

    #[test]
    fn phases_follow_round_lifecycle() {
        let mut game = game();
        assert_eq!(game.phase(), Phase::NotStarted);
        game.command(&["PLAY"], 0).unwrap();
        assert_eq!(game.phase(), Phase::Playing);
        assert!(matches!(
            game.command(&["play"], 10),
            Err(CommandError::RoundInProgress)
        ));

        let round = game.round_mut().unwrap();
        for x in 2..=4 {
            round.field_mut().set(Position::new(x, 9), Cell::Large);
        }
        for _ in 0..3 {
            game.receive(b'd', 20).unwrap();
        }
        assert_eq!(game.phase(), Phase::RoundOver);
        assert_eq!(
            game.take_report(),
            Some(RoundReport {
                score: 0,
                shots_fired: 0
            })
        );
        assert_eq!(game.take_report(), None);

        // A fresh round starts from scratch.
        game.command(&["play"], 1000).unwrap();
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.round().unwrap().state().health, 3);
    }

    #[test]
    fn bad_commands_are_rejected_without_state_change() {
        let mut game = game();
        assert!(matches!(game.command(&[], 0), Err(CommandError::TooFewArgs)));
        assert!(matches!(
            game.command(&["highscores"], 0),
            Err(CommandError::Unsupported(word)) if word == "highscores"
        ));
        assert_eq!(game.phase(), Phase::NotStarted);
    }

    #[test]
    fn reset_zeroes_score_only_between_rounds() {
        let mut game = game();
        game.command(&["play"], 0).unwrap();
        game.tick(5000).unwrap();
        assert_eq!(game.score(), 2);
        assert!(matches!(
            game.command(&["reset"], 5000),
            Err(CommandError::RoundInProgress)
        ));
        assert_eq!(game.score(), 2);

        let round = game.round_mut().unwrap();
        round.state_mut().health = 1;
        round.field_mut().set(Position::new(2, 9), Cell::Small);
        game.receive(b'D', 5001).unwrap();
        assert_eq!(game.phase(), Phase::RoundOver);

        game.command(&["Reset"], 6000).unwrap();
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn help_prints_controls() {
        let mut game = game();
        game.command(&["help"], 0).unwrap();
        assert_eq!(game.output.row_text(0), "WASD to move the spaceship");
        assert_eq!(game.output.row_text(1), "SPACEBAR to FIRE");
    }

    #[test]
    fn input_without_round_is_dropped() {
        let mut game = game();
        game.receive(b'd', 0).unwrap();
        game.tick(10_000).unwrap();
        assert_eq!(game.phase(), Phase::NotStarted);
    }
}
