// Sequence stream - a typed-out run of digits that occasionally spells the marker word

use crate::config::GridConfig;
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;

pub const STREAM_SEED: &str = "1+1=2";
/// Chance a tick types a single marker letter instead of a digit
pub const WORD_CHAR_CHANCE: f64 = 0.05;
/// Chance a tick appends the whole marker word
pub const WORD_APPEND_CHANCE: f64 = 0.02;
pub const DEFAULT_WORD_TARGET: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamTick {
    Grew { len: usize },
    Reset,
}

#[derive(Debug, Clone)]
pub struct SequenceStream {
    text: Vec<char>,
    word: Vec<char>,
    capacity: usize,
    word_target: usize,
    interval: Duration,
    last_tick: Duration,
}

impl SequenceStream {
    pub fn new(config: &GridConfig, word: &str, interval: Duration) -> Self {
        Self {
            text: STREAM_SEED.chars().collect(),
            word: word.chars().collect(),
            capacity: config.cell_count(),
            word_target: DEFAULT_WORD_TARGET,
            interval,
            last_tick: Duration::ZERO,
        }
    }

    pub fn with_word_target(mut self, word_target: usize) -> Self {
        self.word_target = word_target;
        self
    }

    pub fn text(&self) -> &[char] {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Grid was rebuilt; keep typing into the new capacity
    pub fn resize(&mut self, config: &GridConfig) {
        self.capacity = config.cell_count();
        if self.text.len() > self.capacity {
            self.reset();
        }
    }

    pub fn reset(&mut self) {
        self.text = STREAM_SEED.chars().collect();
    }

    /// Complete, non-overlapping occurrences of the word
    pub fn word_count(&self) -> usize {
        let len = self.word.len();
        if len == 0 {
            return 0;
        }
        let mut count = 0;
        let mut i = 0;
        while i + len <= self.text.len() {
            if self.text[i..i + len] == self.word[..] {
                count += 1;
                i += len;
            } else {
                i += 1;
            }
        }
        count
    }

    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> StreamTick {
        let letter = if rng.gen_bool(WORD_CHAR_CHANCE) && self.text.len() < self.capacity {
            self.word.choose(rng).copied()
        } else {
            None
        };
        let ch = letter.unwrap_or_else(|| crate::grid::builder::random_digit(rng));
        self.text.push(ch);

        if self.word_count() < self.word_target && rng.gen_bool(WORD_APPEND_CHANCE) {
            self.text.extend_from_slice(&self.word);
        }

        if self.text.len() > self.capacity {
            self.reset();
            StreamTick::Reset
        } else {
            StreamTick::Grew {
                len: self.text.len(),
            }
        }
    }

    /// Tick once if a full interval has passed since the last tick
    pub fn advance<R: Rng + ?Sized>(&mut self, now: Duration, rng: &mut R) -> Option<StreamTick> {
        if now.saturating_sub(self.last_tick) < self.interval {
            return None;
        }
        self.last_tick = now;
        Some(self.tick(rng))
    }

    /// Row-major grid slot for a sequence position
    pub fn cell_at(position: usize, config: &GridConfig) -> Option<(usize, usize)> {
        if config.cols == 0 || position >= config.cell_count() {
            return None;
        }
        Some(config.position(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_starts_from_seed() {
        let stream = SequenceStream::new(&GridConfig::new(4, 4), "MULTI2", Duration::from_millis(100));
        assert_eq!(stream.text().iter().collect::<String>(), STREAM_SEED);
    }

    #[test]
    fn test_resets_past_capacity() {
        // 2x3 grid holds six characters; the seed already uses five
        let mut stream = SequenceStream::new(&GridConfig::new(2, 3), "AB", Duration::ZERO);
        let mut rng = StdRng::seed_from_u64(10);
        let mut saw_reset = false;
        for _ in 0..10 {
            if stream.tick(&mut rng) == StreamTick::Reset {
                saw_reset = true;
                assert_eq!(stream.len(), STREAM_SEED.len());
            }
            assert!(stream.len() <= stream.capacity());
        }
        assert!(saw_reset);
    }

    #[test]
    fn test_zero_word_target_types_one_char_per_tick() {
        let mut stream = SequenceStream::new(&GridConfig::new(50, 50), "AB", Duration::ZERO)
            .with_word_target(0);
        let mut rng = StdRng::seed_from_u64(3);
        for k in 1..=300 {
            assert_eq!(stream.tick(&mut rng), StreamTick::Grew { len: STREAM_SEED.len() + k });
        }
    }

    #[test]
    fn test_resize_follows_grid_capacity() {
        let mut stream = SequenceStream::new(&GridConfig::new(10, 10), "AB", Duration::ZERO);
        stream.text = "1+1=2345678".chars().collect();
        stream.resize(&GridConfig::new(3, 3));
        assert_eq!(stream.capacity(), 9);
        assert_eq!(stream.len(), STREAM_SEED.len());

        stream.resize(&GridConfig::new(20, 1));
        assert_eq!(stream.capacity(), 20);
        assert_eq!(stream.len(), STREAM_SEED.len());
    }

    #[test]
    fn test_word_count_is_non_overlapping() {
        let mut stream = SequenceStream::new(&GridConfig::new(10, 10), "AA", Duration::ZERO);
        stream.text = "AAA1AA".chars().collect();
        assert_eq!(stream.word_count(), 2);
    }

    #[test]
    fn test_advance_waits_for_interval() {
        let mut stream = SequenceStream::new(&GridConfig::new(10, 10), "MULTI2", Duration::from_millis(100));
        let mut rng = StdRng::seed_from_u64(1);
        assert!(stream.advance(Duration::from_millis(50), &mut rng).is_none());
        assert!(stream.advance(Duration::from_millis(100), &mut rng).is_some());
        assert!(stream.advance(Duration::from_millis(150), &mut rng).is_none());
    }

    #[test]
    fn test_cell_at_is_row_major() {
        let config = GridConfig::new(4, 3);
        assert_eq!(SequenceStream::cell_at(5, &config), Some((1, 1)));
        assert_eq!(SequenceStream::cell_at(12, &config), None);
    }
}
