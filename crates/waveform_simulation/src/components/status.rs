//! Timed status effects.
//!
//! One slot per effect kind: re-applying a kind refreshes its duration and
//! keeps the stronger value instead of stacking instances.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum StatusEffectKind {
    /// Outgoing damage multiplier (strength = multiplier, e.g. 1.25)
    DamageBoost,
    /// Fraction of incoming damage ignored (strength = 0.0..1.0)
    DamageResistance,
    /// Incoming damage multiplier (strength = multiplier, e.g. 1.3)
    DamageVulnerability,
    /// Energy regen multiplier (strength = multiplier)
    EnergyRegenBoost,
    /// Applied when an immune actor is hit (strength = nullified damage)
    CounterTrigger,
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct StatusEffect {
    pub kind: StatusEffectKind,
    pub strength: f32,
    /// seconds
    pub remaining: f32,
}

impl StatusEffect {
    pub fn new(kind: StatusEffectKind, strength: f32, duration: f32) -> Self {
        Self {
            kind,
            strength,
            remaining: duration,
        }
    }
}

#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct StatusEffects {
    effects: Vec<StatusEffect>,
}

impl StatusEffects {
    /// Adds or refreshes the slot of `effect.kind`.
    pub fn add(&mut self, effect: StatusEffect) {
        if effect.remaining <= 0.0 {
            return;
        }

        match self.effects.iter_mut().find(|e| e.kind == effect.kind) {
            Some(existing) => {
                existing.remaining = existing.remaining.max(effect.remaining);
                existing.strength = existing.strength.max(effect.strength);
            }
            None => self.effects.push(effect),
        }
    }

    pub fn get(&self, kind: StatusEffectKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    pub fn has(&self, kind: StatusEffectKind) -> bool {
        self.get(kind).is_some()
    }

    /// Strength of `kind`, or `neutral` if the effect is absent.
    pub fn strength_or(&self, kind: StatusEffectKind, neutral: f32) -> f32 {
        self.get(kind).map_or(neutral, |e| e.strength)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Decrements all timers, drops expired effects and returns their kinds.
    pub fn tick(&mut self, delta: f32) -> Vec<StatusEffectKind> {
        let mut expired = Vec::new();
        self.effects.retain_mut(|effect| {
            effect.remaining -= delta;
            if effect.remaining <= 0.0 {
                expired.push(effect.kind);
                false
            } else {
                true
            }
        });
        expired
    }
}
