//! Базовые компоненты акторов: Actor, Health, Energy, EquippedWaveform, Immunities

use bevy::prelude::*;

use crate::waveform::WaveformKind;

/// Актор (игрок или враг) - базовый компонент для живых существ
///
/// Required Components добавляют весь ресурсный пайплайн: здоровье, энергию,
/// статусы, рамп-стеки, иммунитеты, cooldown атаки.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(
    Health,
    Energy,
    EquippedWaveform,
    Immunities,
    crate::components::StatusEffects,
    crate::components::RampStacks,
    crate::components::HitRampTracker,
    crate::combat::AttackCooldown
)]
pub struct Actor {
    /// Фракция: projectiles/homing/chain бьют только по чужим
    pub faction_id: u64,
}

impl Actor {
    pub fn is_hostile_to(&self, other_faction: u64) -> bool {
        self.faction_id != other_faction
    }
}

/// Marker: the player-controlled actor (owns the CounterSystem).
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Player;

/// Здоровье актора
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Returns the amount actually removed.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let amount = amount.max(0.0);
        let before = self.current;
        self.current = (self.current - amount).clamp(0.0, self.max);
        before - self.current
    }

    /// Returns the amount actually restored. Dead actors are not healed.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if !self.is_alive() {
            return 0.0;
        }
        let amount = amount.max(0.0);
        let before = self.current;
        self.current = (self.current + amount).min(self.max);
        self.current - before
    }
}

/// Энергия для атак
///
/// Инвариант: 0.0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Energy {
    pub current: f32,
    pub max: f32,
    /// units per second at multiplier 1.0
    pub regen_rate: f32,
}

impl Default for Energy {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Energy {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self {
            current: max,
            max,
            regen_rate: 10.0,
        }
    }

    pub fn with_regen_rate(mut self, regen_rate: f32) -> Self {
        self.regen_rate = regen_rate.max(0.0);
        self
    }

    pub fn can_afford(&self, cost: f32) -> bool {
        self.current >= cost
    }

    pub fn consume(&mut self, cost: f32) -> bool {
        if self.can_afford(cost) {
            self.current = (self.current - cost.max(0.0)).max(0.0);
            true
        } else {
            false
        }
    }

    pub fn drain(&mut self) {
        self.current = 0.0;
    }

    pub fn refill(&mut self) {
        self.current = self.max;
    }

    /// Returns the amount gained.
    pub fn regenerate(&mut self, delta_time: f32, multiplier: f32) -> f32 {
        let before = self.current;
        let gain = (self.regen_rate * multiplier.max(0.0) * delta_time).max(0.0);
        self.current = (self.current + gain).min(self.max);
        self.current - before
    }
}

/// Currently equipped waveform. `None` = attacks silently do nothing.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct EquippedWaveform(pub Option<WaveformKind>);

impl EquippedWaveform {
    pub fn new(kind: WaveformKind) -> Self {
        Self(Some(kind))
    }
}

/// Waveforms this actor shrugs off (hits turn into a counter-trigger status).
#[derive(Component, Debug, Clone, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Immunities(pub Vec<WaveformKind>);

impl Immunities {
    pub fn contains(&self, kind: WaveformKind) -> bool {
        self.0.contains(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage() {
        let mut health = Health::new(100.0);
        assert_eq!(health.current, 100.0);

        assert_eq!(health.take_damage(30.0), 30.0);
        assert_eq!(health.current, 70.0);
        assert!(health.is_alive());

        // Clamp на нуле, возвращает реально снятое
        assert_eq!(health.take_damage(100.0), 70.0);
        assert_eq!(health.current, 0.0);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_health_negative_damage_ignored() {
        let mut health = Health::new(100.0);
        health.take_damage(-50.0);
        assert_eq!(health.current, 100.0);
    }

    #[test]
    fn test_health_heal() {
        let mut health = Health::new(100.0);
        health.take_damage(50.0);

        assert_eq!(health.heal(30.0), 30.0);
        assert_eq!(health.current, 80.0);

        assert_eq!(health.heal(100.0), 20.0); // Clamped to max
        assert_eq!(health.current, 100.0);
    }

    #[test]
    fn test_dead_cannot_heal() {
        let mut health = Health::new(100.0);
        health.take_damage(100.0);
        assert_eq!(health.heal(50.0), 0.0);
        assert_eq!(health.current, 0.0);
    }

    #[test]
    fn test_energy_consume() {
        let mut energy = Energy::new(100.0);

        assert!(energy.consume(30.0));
        assert_eq!(energy.current, 70.0);

        assert!(!energy.consume(80.0)); // Недостаточно
        assert_eq!(energy.current, 70.0); // Не изменилась
    }

    #[test]
    fn test_energy_regenerate_with_multiplier() {
        let mut energy = Energy::new(100.0);
        energy.drain();

        energy.regenerate(2.0, 1.0); // 2 sec × 10 units/sec
        assert_eq!(energy.current, 20.0);

        energy.regenerate(1.0, 2.0); // doubled
        assert_eq!(energy.current, 40.0);

        energy.regenerate(100.0, 1.0); // Clamp to max
        assert_eq!(energy.current, 100.0);
    }

    #[test]
    fn test_hostility() {
        let actor = Actor { faction_id: 1 };
        assert!(actor.is_hostile_to(2));
        assert!(!actor.is_hostile_to(1));
    }
}
