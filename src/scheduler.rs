//! Cooperative timer wheel for round tasks.
//!
//! Tasks are identified by value, not by callback pointer: each [`Task`]
//! variant names one kind of work and carries the payload it needs. The
//! scheduler never runs anything itself. The owner asks for the next due task
//! with [`Scheduler::pop_due`], runs it to completion, and asks again, so a
//! task cancelled by an earlier body is never handed out afterwards.

use log::debug;

/// Identity of a schedulable unit of work.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Task {
    /// Shift the asteroid field one column and spawn a new trailing column.
    SpawnShift,
    /// Survival score tick.
    ScoreTick,
    /// Weapon recharge tick.
    Recharge,
    /// Advance the shot held in the given pool slot.
    ShotAdvance(usize),
    /// Restore normal colors and redraw the ship after an impact.
    ColorReset,
    DrawScore,
    DrawHealth,
    DrawCooldown,
    DrawDifficulty,
}

/// A pending timer entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timer {
    pub task: Task,
    pub due: u64,
    /// Zero for one-shot timers.
    pub period: u64,
    /// Admission order, used to break ties between timers due at the same instant.
    pub seq: u64,
}

/// Tasks in `timers` that are due at `now`, in dispatch order.
///
/// Ordering is by due time, then admission order.
pub fn ready(now: u64, timers: &[Timer]) -> Vec<Task> {
    let mut due: Vec<&Timer> = timers.iter().filter(|t| t.due <= now).collect();
    due.sort_by_key(|t| (t.due, t.seq));
    due.into_iter().map(|t| t.task).collect()
}

#[derive(Debug, Default)]
pub struct Scheduler {
    timers: Vec<Timer>,
    clock: u64,
    next_seq: u64,
}

impl Scheduler {
    pub fn new(now: u64) -> Self {
        Scheduler {
            timers: Vec::new(),
            clock: now,
            next_seq: 0,
        }
    }

    /// Current scheduler time in milliseconds.
    pub fn now(&self) -> u64 {
        self.clock
    }

    /// Schedules `task` to run after `delay` ms, then every `period` ms.
    /// A period of zero makes it one-shot. Scheduling an identity that is
    /// already pending replaces the pending timer.
    pub fn schedule(&mut self, task: Task, delay: u64, period: u64) {
        self.timers.retain(|t| t.task != task);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Timer {
            task,
            due: self.clock + delay,
            period,
            seq,
        });
    }

    /// Runs `task` once, on the next dispatch pass.
    pub fn queue(&mut self, task: Task) {
        self.schedule(task, 0, 0);
    }

    /// Cancels `task`. Returns whether it was pending; cancelling an
    /// unscheduled task is a no-op.
    pub fn remove(&mut self, task: Task) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.task != task);
        let removed = self.timers.len() != before;
        if !removed {
            debug!("remove({:?}): not scheduled", task);
        }
        removed
    }

    pub fn is_scheduled(&self, task: Task) -> bool {
        self.timers.iter().any(|t| t.task == task)
    }

    pub fn timer(&self, task: Task) -> Option<&Timer> {
        self.timers.iter().find(|t| t.task == task)
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Snapshot of tasks due at `now` without consuming them.
    pub fn due_at(&self, now: u64) -> Vec<Task> {
        ready(now, &self.timers)
    }

    /// Takes the earliest task due at or before `now`, moving the clock to its
    /// due time. Periodic timers are re-armed one period later; one-shot
    /// timers are dropped.
    pub fn pop_due(&mut self, now: u64) -> Option<Task> {
        let task = *ready(now, &self.timers).first()?;
        let index = self.timers.iter().position(|t| t.task == task)?;
        let timer = self.timers[index];
        self.clock = self.clock.max(timer.due);
        if timer.period == 0 {
            self.timers.remove(index);
        } else {
            self.timers[index].due = timer.due + timer.period;
        }
        Some(task)
    }

    /// Moves the clock forward to `now` once every due task has been popped.
    pub fn settle(&mut self, now: u64) {
        self.clock = self.clock.max(now);
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(scheduler: &mut Scheduler, now: u64) -> Vec<Task> {
        let mut ran = Vec::new();
        while let Some(task) = scheduler.pop_due(now) {
            ran.push(task);
        }
        scheduler.settle(now);
        ran
    }

    #[test]
    fn ready_orders_by_due_then_admission() {
        let timers = [
            Timer {
                task: Task::ScoreTick,
                due: 10,
                period: 0,
                seq: 3,
            },
            Timer {
                task: Task::SpawnShift,
                due: 10,
                period: 0,
                seq: 1,
            },
            Timer {
                task: Task::Recharge,
                due: 5,
                period: 0,
                seq: 7,
            },
            Timer {
                task: Task::ColorReset,
                due: 11,
                period: 0,
                seq: 0,
            },
        ];
        assert_eq!(
            ready(10, &timers),
            vec![Task::Recharge, Task::SpawnShift, Task::ScoreTick]
        );
        assert!(ready(4, &timers).is_empty());
    }

    #[test]
    fn periodic_tasks_fire_every_period() {
        let mut scheduler = Scheduler::new(0);
        scheduler.schedule(Task::SpawnShift, 500, 1000);
        assert!(drain(&mut scheduler, 499).is_empty());
        assert_eq!(drain(&mut scheduler, 500), vec![Task::SpawnShift]);
        assert_eq!(
            drain(&mut scheduler, 2600),
            vec![Task::SpawnShift, Task::SpawnShift]
        );
        assert!(scheduler.is_scheduled(Task::SpawnShift));
    }

    #[test]
    fn one_shot_tasks_run_once() {
        let mut scheduler = Scheduler::new(0);
        scheduler.schedule(Task::ColorReset, 250, 0);
        assert_eq!(drain(&mut scheduler, 1000), vec![Task::ColorReset]);
        assert!(!scheduler.is_scheduled(Task::ColorReset));
        assert!(drain(&mut scheduler, 5000).is_empty());
    }

    #[test]
    fn queued_tasks_run_on_next_pass_in_admission_order() {
        let mut scheduler = Scheduler::new(100);
        scheduler.queue(Task::DrawHealth);
        scheduler.queue(Task::DrawScore);
        assert_eq!(drain(&mut scheduler, 100), vec![Task::DrawHealth, Task::DrawScore]);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut scheduler = Scheduler::new(0);
        scheduler.schedule(Task::Recharge, 750, 750);
        assert!(scheduler.remove(Task::Recharge));
        assert!(!scheduler.remove(Task::Recharge));
        assert!(!scheduler.remove(Task::ShotAdvance(3)));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn cancelled_task_is_not_dispatched_even_when_already_due() {
        let mut scheduler = Scheduler::new(0);
        scheduler.schedule(Task::ShotAdvance(0), 100, 100);
        scheduler.schedule(Task::ShotAdvance(1), 100, 100);
        assert_eq!(scheduler.due_at(100).len(), 2);

        assert_eq!(scheduler.pop_due(100), Some(Task::ShotAdvance(0)));
        // The first body cancels the second before it runs.
        scheduler.remove(Task::ShotAdvance(1));
        assert_eq!(scheduler.pop_due(100), None);
    }

    #[test]
    fn rescheduling_replaces_pending_timer() {
        let mut scheduler = Scheduler::new(0);
        scheduler.schedule(Task::ColorReset, 250, 0);
        scheduler.settle(100);
        scheduler.schedule(Task::ColorReset, 250, 0);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.timer(Task::ColorReset).map(|t| t.due), Some(350));
    }
}
