//! Health Module
//!
//! Hit points for characters and enemies, and the trait combat uses to treat them alike.
use std::cmp;

use serde::{Deserialize, Serialize};

/// Current and maximum hit points. Current hp is always within `0..=max_hp`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthState {
    max_hp: u32,
    current_hp: u32,
}
impl HealthState {
    /// Create a `HealthState` at full health.
    pub fn new_at_max(max_hp: u32) -> HealthState {
        HealthState {
            max_hp,
            current_hp: max_hp,
        }
    }

    /// Create a `HealthState` from stored values, clamping current hp to the maximum.
    pub fn from_parts(current_hp: u32, max_hp: u32) -> HealthState {
        HealthState {
            max_hp,
            current_hp: cmp::min(current_hp, max_hp),
        }
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn current_hp(&self) -> u32 {
        self.current_hp
    }

    /// Hit points missing from full health.
    pub fn missing_hp(&self) -> u32 {
        self.max_hp - self.current_hp
    }

    /// Return whether this entity is alive or dead.
    pub fn life_state(&self) -> LifeState {
        if self.current_hp > 0 {
            LifeState::Alive
        } else {
            LifeState::Dead
        }
    }

    /// Do damage to health. Saturates at zero.
    pub fn damage(&mut self, amount: u32) {
        self.current_hp = self.current_hp.saturating_sub(amount);
    }

    /// Heal by up to `amount`, saturating at max health. Returns hp actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let healed = cmp::min(amount, self.missing_hp());
        self.current_hp += healed;
        healed
    }

    /// Set current hp directly, clamped to max.
    pub fn set_current(&mut self, hp: u32) {
        self.current_hp = cmp::min(hp, self.max_hp);
    }

    /// Refill to max health.
    pub fn restore_full(&mut self) {
        self.current_hp = self.max_hp;
    }

    /// Shift max hp by a signed delta; current hp is pulled down if it would exceed the new max.
    pub fn adjust_max(&mut self, delta: i32) {
        self.max_hp = self.max_hp.saturating_add_signed(delta);
        self.current_hp = cmp::min(self.current_hp, self.max_hp);
    }

    /// Shift current hp by a signed delta, keeping it within `0..=max_hp`.
    pub fn adjust_current(&mut self, delta: i32) {
        self.set_current(self.current_hp.saturating_add_signed(delta));
    }
}

/// Possible life states for living entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeState {
    Alive,
    Dead,
}

/// Anything that can take part in a fight.
pub trait LivingEntity {
    fn name(&self) -> &str;
    fn health(&self) -> &HealthState;
    fn health_mut(&mut self) -> &mut HealthState;
    fn strength(&self) -> u32;

    fn life_state(&self) -> LifeState {
        self.health().life_state()
    }
    fn is_dead(&self) -> bool {
        matches!(self.life_state(), LifeState::Dead)
    }
    fn take_damage(&mut self, amount: u32) {
        self.health_mut().damage(amount);
    }
}
