//! One round of play: the shared state every scheduled task mutates.

use std::io;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::GameConfig;
use crate::constants::*;
use crate::difficulty::DifficultyController;
use crate::entities::{GameState, ShotPool};
use crate::error::StartError;
use crate::field::AsteroidField;
use crate::input::{Command, InputDispatcher};
use crate::rendering::Renderer;
use crate::scheduler::{Scheduler, Task};
use crate::types::{Cell, Color, Position};

/// Final tally handed back to the host when a round ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundReport {
    pub score: u32,
    pub shots_fired: u32,
}

pub struct Round {
    config: GameConfig,
    state: GameState,
    field: AsteroidField,
    shots: ShotPool,
    difficulty: DifficultyController,
    scheduler: Scheduler,
    rng: StdRng,
    recharging: bool,
    receiver_registered: bool,
    report: Option<RoundReport>,
}

impl Round {
    /// Resets every entity, draws the playfield and arms the field and score tasks.
    /// A configuration that fails validation is rejected before anything is drawn.
    pub fn start(
        config: GameConfig,
        now: u64,
        out: &mut dyn Renderer,
    ) -> Result<Self, StartError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        info!(
            "Starting round: {}x{} field, seed {}",
            config.width, config.height, seed
        );

        let mut scheduler = Scheduler::new(now);
        scheduler.schedule(
            Task::SpawnShift,
            config.spawn_shift_delay_ms,
            config.spawn_shift_period_ms,
        );
        scheduler.schedule(
            Task::ScoreTick,
            config.score_tick_delay_ms,
            config.score_tick_period_ms,
        );

        let mut round = Round {
            state: GameState::new(Position::new(1, config.height / 2)),
            field: AsteroidField::new(config.width, config.height),
            shots: ShotPool::new(config.max_shots),
            difficulty: DifficultyController::new(
                config.starting_difficulty,
                config.thresholds.clone(),
            ),
            scheduler,
            rng: StdRng::seed_from_u64(seed),
            recharging: false,
            receiver_registered: true,
            report: None,
            config,
        };

        out.clear_screen()?;
        out.draw_rect(0, 0, round.config.width, round.config.height)?;
        round.draw_ship(out)?;
        out.hide_cursor()?;
        round.draw_score(out)?;
        round.draw_health(out)?;
        round.draw_cooldown(out)?;
        round.draw_difficulty(out)?;
        out.flush()?;
        Ok(round)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn field(&self) -> &AsteroidField {
        &self.field
    }

    #[cfg(test)]
    pub(crate) fn field_mut(&mut self) -> &mut AsteroidField {
        &mut self.field
    }

    pub fn shots(&self) -> &ShotPool {
        &self.shots
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn difficulty(&self) -> &DifficultyController {
        &self.difficulty
    }

    pub fn is_recharging(&self) -> bool {
        self.recharging
    }

    pub fn is_over(&self) -> bool {
        self.report.is_some()
    }

    pub fn report(&self) -> Option<RoundReport> {
        self.report
    }

    /// Zeroes the score of a finished round. A live round keeps its score.
    pub fn reset_score(&mut self) -> bool {
        if !self.is_over() {
            return false;
        }
        self.state.score = 0;
        true
    }

    /// Whether the input receiver is registered for this round.
    pub fn accepts_input(&self) -> bool {
        self.receiver_registered
    }

    /// Runs every task due at or before `now`, one at a time, in dispatch order.
    pub fn run_due(&mut self, now: u64, out: &mut dyn Renderer) -> io::Result<()> {
        while let Some(task) = self.scheduler.pop_due(now) {
            self.run(task, out)?;
        }
        self.scheduler.settle(now);
        out.flush()
    }

    fn run(&mut self, task: Task, out: &mut dyn Renderer) -> io::Result<()> {
        match task {
            Task::SpawnShift => self.spawn_and_shift(out),
            Task::ScoreTick => {
                self.award_point();
                Ok(())
            }
            Task::Recharge => {
                self.recharge_tick();
                Ok(())
            }
            Task::ShotAdvance(slot) => self.advance_shot(slot, out),
            Task::ColorReset => self.reset_color(out),
            Task::DrawScore => self.draw_score(out),
            Task::DrawHealth => self.draw_health(out),
            Task::DrawCooldown => self.draw_cooldown(out),
            Task::DrawDifficulty => self.draw_difficulty(out),
        }
    }

    /// Input receiver. Unknown bytes, and any byte after round over, are ignored.
    pub fn receive(&mut self, byte: u8, out: &mut dyn Renderer) -> io::Result<()> {
        if !self.receiver_registered {
            return Ok(());
        }
        match InputDispatcher::command_for(byte) {
            Some(Command::Fire) => {
                self.shoot(out)?;
            }
            Some(direction) => self.move_ship(direction, out)?,
            None => {}
        }
        out.flush()
    }

    pub fn move_ship(&mut self, direction: Command, out: &mut dyn Renderer) -> io::Result<()> {
        let Position { x, y } = self.state.position;
        let target = match direction {
            Command::MoveLeft if x > 1 => Position::new(x - 1, y),
            Command::MoveRight if x < self.config.ship_max_x() => Position::new(x + 1, y),
            Command::MoveUp if y > 1 => Position::new(x, y - 1),
            Command::MoveDown if y + 1 < self.config.bottom_wall() => Position::new(x, y + 1),
            _ => return Ok(()),
        };

        let old = self.state.position;
        if self.shots.occupant(old).is_some() {
            self.draw_shot(old, out)?;
        } else {
            out.put_char(' ', x, y)?;
        }
        self.state.position = target;
        if self.field.get(target).is_obstacle() {
            self.resolve_collision(target, out)
        } else {
            self.draw_ship(out)
        }
    }

    /// Ship/obstacle impact at `pos`: the obstacle is destroyed and the ship
    /// takes one unit of damage. Health reaching zero ends the round here.
    pub fn resolve_collision(&mut self, pos: Position, out: &mut dyn Renderer) -> io::Result<()> {
        if self.is_over() || !self.field.take(pos).is_obstacle() {
            return Ok(());
        }
        out.set_color(Color::BackgroundRed)?;
        out.put_char(IMPACT_GLYPH, pos.x, pos.y)?;
        out.set_color(Color::BackgroundBlack)?;
        out.bell()?;

        let health = self.state.damage();
        debug!("Ship hit at ({}, {}), health {}", pos.x, pos.y, health);
        if health == 0 {
            return self.round_over(out);
        }
        self.scheduler.queue(Task::DrawHealth);
        self.scheduler
            .schedule(Task::ColorReset, self.config.color_reset_delay_ms, 0);
        Ok(())
    }

    /// Fires from the cell ahead of the ship. Returns whether a shot was fired;
    /// an empty weapon or a full pool silently ignores the request.
    pub fn shoot(&mut self, out: &mut dyn Renderer) -> io::Result<bool> {
        if !self.state.can_fire() {
            return Ok(false);
        }
        let origin = self.state.position.right();
        let Some(slot) = self.shots.allocate(origin) else {
            return Ok(false);
        };
        self.state.spend_charge();
        self.state.shots_fired += 1;
        self.scheduler.queue(Task::DrawCooldown);

        if !self.recharging {
            self.recharging = true;
            self.scheduler.schedule(
                Task::Recharge,
                self.config.recharge_rate_ms,
                self.config.recharge_rate_ms,
            );
        }

        if self.field.get(origin).is_obstacle() {
            // Point blank: nothing left to advance.
            self.shot_hit(slot, origin, out)?;
        } else {
            self.draw_shot(origin, out)?;
            self.scheduler.schedule(
                Task::ShotAdvance(slot),
                self.config.fire_speed_ms,
                self.config.fire_speed_ms,
            );
        }
        Ok(true)
    }

    fn advance_shot(&mut self, slot: usize, out: &mut dyn Renderer) -> io::Result<()> {
        let Some(pos) = self.shots.get(slot).map(|s| s.position) else {
            self.scheduler.remove(Task::ShotAdvance(slot));
            return Ok(());
        };
        if pos != self.state.position {
            out.put_char(' ', pos.x, pos.y)?;
        }
        if pos.x >= self.field.trailing_column() {
            self.release_shot(slot);
            return Ok(());
        }

        let next = pos.right();
        if let Some(shot) = self.shots.get_mut(slot) {
            shot.position = next;
        }
        if self.field.get(next).is_obstacle() {
            self.shot_hit(slot, next, out)
        } else if next == self.state.position {
            Ok(())
        } else {
            self.draw_shot(next, out)
        }
    }

    fn shot_hit(&mut self, slot: usize, pos: Position, out: &mut dyn Renderer) -> io::Result<()> {
        self.field.take(pos);
        out.set_color(Color::BackgroundYellow)?;
        out.put_char(IMPACT_GLYPH, pos.x, pos.y)?;
        out.set_color(Color::BackgroundBlack)?;
        out.bell()?;
        debug!("Shot {} destroyed asteroid at ({}, {})", slot, pos.x, pos.y);
        self.release_shot(slot);
        self.award_point();
        Ok(())
    }

    fn release_shot(&mut self, slot: usize) {
        if self.shots.release(slot) {
            self.scheduler.remove(Task::ShotAdvance(slot));
        }
    }

    fn recharge_tick(&mut self) {
        if self.state.recharge() {
            self.scheduler.queue(Task::DrawCooldown);
        } else {
            self.recharging = false;
            self.scheduler.remove(Task::Recharge);
        }
    }

    fn award_point(&mut self) {
        self.state.score += 1;
        self.scheduler.queue(Task::DrawScore);
        if self.difficulty.observe(self.state.score) > 0 {
            self.scheduler.queue(Task::DrawDifficulty);
        }
    }

    fn spawn_and_shift(&mut self, out: &mut dyn Renderer) -> io::Result<()> {
        self.shift_columns(out)?;
        if self.is_over() {
            return Ok(());
        }
        self.spawn_column(out)
    }

    fn shift_columns(&mut self, out: &mut dyn Renderer) -> io::Result<()> {
        for x in self.field.shift_order() {
            self.field.shift_column(x);
            for y in self.field.rows() {
                let pos = Position::new(x, y);
                let cell = self.field.get(pos);
                if !cell.is_obstacle() {
                    if pos != self.state.position && self.shots.occupant(pos).is_none() {
                        out.put_char(' ', x, y)?;
                    }
                } else if pos == self.state.position {
                    self.resolve_collision(pos, out)?;
                    if self.is_over() {
                        return Ok(());
                    }
                } else if let Some(slot) = self.shots.occupant(pos) {
                    self.shot_hit(slot, pos, out)?;
                } else {
                    out.put_char(cell.glyph(), x, y)?;
                }
            }
        }
        Ok(())
    }

    fn spawn_column(&mut self, out: &mut dyn Renderer) -> io::Result<()> {
        let x = self.field.trailing_column();
        let spawned = self
            .field
            .spawn_column(self.difficulty.spawn_probability(), &mut self.rng);
        for (y, cell) in self.field.rows().zip(spawned) {
            let pos = Position::new(x, y);
            match (cell, self.shots.occupant(pos)) {
                (Cell::Empty, Some(_)) => {}
                (Cell::Empty, None) => out.put_char(' ', x, y)?,
                (_, Some(slot)) => self.shot_hit(slot, pos, out)?,
                (_, None) => out.put_char(cell.glyph(), x, y)?,
            }
        }
        Ok(())
    }

    /// Cancels every outstanding task and reports the final tally. Runs once.
    fn round_over(&mut self, out: &mut dyn Renderer) -> io::Result<()> {
        if self.is_over() {
            return Ok(());
        }
        let report = RoundReport {
            score: self.state.score,
            shots_fired: self.state.shots_fired,
        };
        self.report = Some(report);

        self.scheduler.remove(Task::SpawnShift);
        self.scheduler.remove(Task::ScoreTick);
        for slot in self.shots.active_slots() {
            self.release_shot(slot);
        }
        self.scheduler.remove(Task::Recharge);
        self.recharging = false;
        self.scheduler.remove(Task::ColorReset);
        // Drop queued HUD redraws so nothing paints over the final message.
        self.scheduler.clear();

        self.draw_health(out)?;
        out.set_color(Color::ForegroundRed)?;
        out.move_to(0, self.config.hud_row(SCORE_ROW_OFFSET))?;
        out.printf(format_args!(
            "Game Over! Final score: {}, Total shots fired: {}",
            report.score, report.shots_fired
        ))?;
        out.set_color(Color::ForegroundWhite)?;
        self.receiver_registered = false;
        out.move_to(0, self.config.hud_row(CURSOR_PARK_ROW_OFFSET))?;
        out.show_cursor()?;

        info!(
            "Round over: score {}, shots fired {}",
            report.score, report.shots_fired
        );
        Ok(())
    }

    // --- Drawing ---

    fn draw_ship(&self, out: &mut dyn Renderer) -> io::Result<()> {
        let Position { x, y } = self.state.position;
        out.set_color(Color::ForegroundCyan)?;
        out.put_char(self.state.glyph, x, y)?;
        out.set_color(Color::ForegroundWhite)
    }

    fn draw_shot(&self, pos: Position, out: &mut dyn Renderer) -> io::Result<()> {
        out.set_color(Color::ForegroundYellow)?;
        out.put_char(SHOT_GLYPH, pos.x, pos.y)?;
        out.set_color(Color::ForegroundWhite)
    }

    fn reset_color(&self, out: &mut dyn Renderer) -> io::Result<()> {
        out.set_color(Color::BackgroundBlack)?;
        self.draw_ship(out)
    }

    fn draw_score(&self, out: &mut dyn Renderer) -> io::Result<()> {
        out.move_to(0, self.config.hud_row(SCORE_ROW_OFFSET))?;
        out.printf(format_args!("Score: {}", self.state.score))
    }

    fn draw_health(&self, out: &mut dyn Renderer) -> io::Result<()> {
        out.move_to(0, self.config.hud_row(HEALTH_ROW_OFFSET))?;
        out.print("Health: ")?;
        out.set_color(Color::ForegroundRed)?;
        let hearts = match self.state.health {
            0 => ":(",
            1 => "<3",
            2 => "<3 <3",
            _ => "<3 <3 <3",
        };
        out.printf(format_args!("{:<8}", hearts))?;
        out.set_color(Color::ForegroundWhite)
    }

    fn draw_cooldown(&self, out: &mut dyn Renderer) -> io::Result<()> {
        let charge = self.state.shot_cooldown;
        out.move_to(0, self.config.hud_row(CHARGE_ROW_OFFSET))?;
        out.print("Weapon Charge: [")?;
        let color = if charge >= MAX_SHOT_COOLDOWN {
            Color::ForegroundGreen
        } else if charge >= SHOT_COST {
            Color::ForegroundYellow
        } else {
            Color::ForegroundRed
        };
        out.set_color(color)?;
        let bar = "+".repeat(usize::from(charge));
        out.printf(format_args!(
            "{:<width$}",
            bar,
            width = usize::from(MAX_SHOT_COOLDOWN)
        ))?;
        out.set_color(Color::ForegroundWhite)?;
        out.print("]")
    }

    fn draw_difficulty(&self, out: &mut dyn Renderer) -> io::Result<()> {
        out.move_to(0, self.config.hud_row(DIFFICULTY_ROW_OFFSET))?;
        out.printf(format_args!("Difficulty: {}", self.difficulty.level()))
    }
}
