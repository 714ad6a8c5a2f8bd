//! Random sound player
//!
//! Выбирает случайный клип из списка с заданным шансом.
//! RNG - детерминистичный (ChaCha8 из `DeterministicRng`), чтобы
//! одинаковый seed давал одинаковую последовательность звуков.

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::{SoundClip, SoundPlayed};
use crate::locomotion::SoundPlayer;

/// Шанс "проиграть всегда"
pub const ALWAYS_PLAY: f32 = 100.0;

/// SoundPlayer поверх любого `Rng`
///
/// Не пишет события напрямую - копит `played`, система потом
/// отправляет их через EventWriter (borrow checker + порядок событий).
pub struct RandomSoundPlayer<'a, R: Rng> {
    rng: &'a mut R,
    source: Entity,
    pub played: Vec<SoundPlayed>,
}

impl<'a, R: Rng> RandomSoundPlayer<'a, R> {
    pub fn new(rng: &'a mut R, source: Entity) -> Self {
        Self {
            rng,
            source,
            played: Vec::new(),
        }
    }
}

impl<R: Rng> SoundPlayer for RandomSoundPlayer<'_, R> {
    fn play(&mut self, clips: &[SoundClip], chance: f32) {
        if clips.is_empty() {
            return;
        }

        // Бросок [0, 100) < chance: 100% проигрывается всегда, 0% никогда
        let roll: f32 = self.rng.gen_range(0.0..ALWAYS_PLAY);
        if roll >= chance {
            return;
        }

        if let Some(clip) = clips.choose(&mut *self.rng) {
            self.played.push(SoundPlayed {
                source: self.source,
                clip: clip.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn clips() -> Vec<SoundClip> {
        vec![SoundClip::new("sfx/jump_a.ogg"), SoundClip::new("sfx/jump_b.ogg")]
    }

    #[test]
    fn test_always_play() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut player = RandomSoundPlayer::new(&mut rng, Entity::PLACEHOLDER);

        for _ in 0..50 {
            player.play_always(&clips());
        }
        assert_eq!(player.played.len(), 50);
    }

    #[test]
    fn test_never_play_with_zero_chance() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut player = RandomSoundPlayer::new(&mut rng, Entity::PLACEHOLDER);

        for _ in 0..50 {
            player.play(&clips(), 0.0);
        }
        assert!(player.played.is_empty());
    }

    #[test]
    fn test_empty_clip_list_is_noop() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut player = RandomSoundPlayer::new(&mut rng, Entity::PLACEHOLDER);

        player.play_always(&[]);
        assert!(player.played.is_empty());
    }

    #[test]
    fn test_partial_chance_plays_sometimes() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut player = RandomSoundPlayer::new(&mut rng, Entity::PLACEHOLDER);

        for _ in 0..1000 {
            player.play(&clips(), 80.0);
        }
        // ~800 ожидаемо, широкие границы
        assert!(player.played.len() > 700 && player.played.len() < 900, "played = {}", player.played.len());
        assert!(player.played.iter().all(|p| clips().contains(&p.clip)));
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let run = |seed: u64| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut player = RandomSoundPlayer::new(&mut rng, Entity::PLACEHOLDER);
            for _ in 0..20 {
                player.play(&clips(), 50.0);
            }
            player.played
        };

        assert_eq!(run(42), run(42));
    }
}
