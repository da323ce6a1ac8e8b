use crate::constants::*;
use crate::types::Position;

// --- Ship and round counters ---
pub struct GameState {
    pub position: Position,
    pub glyph: char,
    pub health: u8,
    pub shot_cooldown: u8, // Weapon charge, 0..=MAX_SHOT_COOLDOWN
    pub score: u32,
    pub shots_fired: u32,
}

impl GameState {
    pub fn new(position: Position) -> Self {
        GameState {
            position,
            glyph: SHIP_GLYPH,
            health: MAX_HEALTH,
            shot_cooldown: MAX_SHOT_COOLDOWN,
            score: 0,
            shots_fired: 0,
        }
    }

    /// Applies one unit of damage, floored at zero. Returns the new health.
    pub fn damage(&mut self) -> u8 {
        self.health = self.health.saturating_sub(1);
        self.health
    }

    pub fn can_fire(&self) -> bool {
        self.shot_cooldown >= SHOT_COST
    }

    /// Spends one shot's worth of charge. Returns false when there is not enough.
    pub fn spend_charge(&mut self) -> bool {
        if !self.can_fire() {
            return false;
        }
        self.shot_cooldown -= SHOT_COST;
        true
    }

    /// Regains one unit of charge. Returns false once the weapon is full.
    pub fn recharge(&mut self) -> bool {
        if self.shot_cooldown >= MAX_SHOT_COOLDOWN {
            return false;
        }
        self.shot_cooldown += 1;
        true
    }
}

// --- Shots ---
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ShotStatus {
    #[default]
    Idle,
    Active,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Shot {
    pub status: ShotStatus,
    pub position: Position,
}

impl Shot {
    pub fn is_active(&self) -> bool {
        self.status == ShotStatus::Active
    }
}

/// Fixed-capacity projectile slots, allocated first-fit.
pub struct ShotPool {
    slots: Vec<Shot>,
}

impl ShotPool {
    pub fn new(capacity: usize) -> Self {
        ShotPool {
            slots: vec![Shot::default(); capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Activates the first idle slot at `position`, returning its index.
    pub fn allocate(&mut self, position: Position) -> Option<usize> {
        let slot = self.slots.iter().position(|s| !s.is_active())?;
        self.slots[slot] = Shot {
            status: ShotStatus::Active,
            position,
        };
        Some(slot)
    }

    /// Returns the slot to the pool. Returns false if it was already idle.
    pub fn release(&mut self, slot: usize) -> bool {
        match self.slots.get_mut(slot) {
            Some(shot) if shot.is_active() => {
                shot.status = ShotStatus::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, slot: usize) -> Option<&Shot> {
        self.slots.get(slot).filter(|s| s.is_active())
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Shot> {
        self.slots.get_mut(slot).filter(|s| s.is_active())
    }

    /// Slot index of the active shot at `position`, if any.
    pub fn occupant(&self, position: Position) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.is_active() && s.position == position)
    }

    pub fn active_slots(&self) -> Vec<usize> {
        (0..self.slots.len())
            .filter(|&i| self.slots[i].is_active())
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_active()).count()
    }
}
