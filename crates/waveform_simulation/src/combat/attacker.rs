//! AttackCooldown - пауза между атаками актора
//!
//! Длительность берётся из `WaveformType::attack_cooldown` экипированного
//! waveform в момент атаки, так что смена оружия не сбрасывает таймер.

use bevy::prelude::*;

#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AttackCooldown {
    /// Секунды до следующей атаки (0 = готов)
    pub timer: f32,
}

impl AttackCooldown {
    /// Может ли атаковать (cooldown == 0)
    pub fn is_ready(&self) -> bool {
        self.timer <= 0.0
    }

    /// Начать атаку (перезапустить cooldown)
    pub fn start(&mut self, cooldown: f32) {
        self.timer = cooldown.max(0.0);
    }

    pub fn tick(&mut self, delta: f32) {
        if self.timer > 0.0 {
            self.timer = (self.timer - delta).max(0.0);
        }
    }
}

/// System: обновление attack cooldown таймеров
pub fn tick_attack_cooldowns(mut query: Query<&mut AttackCooldown>, time: Res<Time>) {
    let delta = time.delta_secs();

    for mut cooldown in query.iter_mut() {
        cooldown.tick(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attack_cooldown() {
        let mut cooldown = AttackCooldown::default();
        assert!(cooldown.is_ready());

        cooldown.start(0.5);
        assert!(!cooldown.is_ready());
        assert_eq!(cooldown.timer, 0.5);

        cooldown.tick(0.25);
        assert!(!cooldown.is_ready());

        cooldown.tick(0.5);
        assert!(cooldown.is_ready());
        assert_eq!(cooldown.timer, 0.0);
    }

    #[test]
    fn test_negative_cooldown_is_ready() {
        let mut cooldown = AttackCooldown::default();
        cooldown.start(-1.0);
        assert!(cooldown.is_ready());
    }
}
