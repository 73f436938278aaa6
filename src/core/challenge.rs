//! Challenge types and the random challenge pool.
//!
//! A challenge is a small arithmetic puzzle an adult can solve quickly and a
//! young child cannot. The coordinator draws one from a fixed pool each time
//! a gate becomes visible; draws are independent, so the same puzzle may
//! appear twice in a row.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::ChallengeConfig;
use crate::error::{GateError, Result};

/// A single verification puzzle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Challenge {
    /// Human-readable question text.
    pub prompt: String,
    /// Ordered candidate answers, correct one included.
    pub options: Vec<u32>,
    /// The option that must be selected to pass.
    pub answer: u32,
}

impl Challenge {
    /// Create a new challenge, enforcing that the answer is among the options.
    pub fn new(prompt: impl Into<String>, options: Vec<u32>, answer: u32) -> Result<Self> {
        if options.is_empty() {
            return Err(GateError::challenge("challenge has no options"));
        }
        if !options.contains(&answer) {
            return Err(GateError::challenge(format!(
                "answer {} not among options {:?}",
                answer, options
            )));
        }
        Ok(Self {
            prompt: prompt.into(),
            options,
            answer,
        })
    }

    /// Check whether a selected option is the correct answer.
    pub fn is_correct(&self, selected: u32) -> bool {
        selected == self.answer
    }
}

/// Source of challenges for the coordinator.
///
/// The coordinator only needs "give me the next puzzle"; tests substitute a
/// scripted source, production uses [`ChallengePool`].
pub trait ChallengeSource {
    /// Produce the challenge for the gate about to be shown.
    fn draw(&mut self) -> Challenge;
}

/// A fixed, non-empty pool of challenges drawn uniformly at random.
#[derive(Debug)]
pub struct ChallengePool {
    challenges: Vec<Challenge>,
    rng: StdRng,
}

impl ChallengePool {
    /// Create a pool from a fixed set of challenges.
    ///
    /// An empty pool is a configuration error: the coordinator assumes every
    /// draw succeeds, so the mistake must surface here, not mid-presentation.
    pub fn new(challenges: Vec<Challenge>) -> Result<Self> {
        Self::with_rng(challenges, StdRng::from_entropy())
    }

    /// Create a pool with a deterministic draw sequence.
    pub fn with_seed(challenges: Vec<Challenge>, seed: u64) -> Result<Self> {
        Self::with_rng(challenges, StdRng::seed_from_u64(seed))
    }

    fn with_rng(challenges: Vec<Challenge>, rng: StdRng) -> Result<Self> {
        if challenges.is_empty() {
            return Err(GateError::config("challenge pool is empty"));
        }
        Ok(Self { challenges, rng })
    }

    /// Number of challenges in the pool.
    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    /// Whether the pool is empty. Always false for a constructed pool.
    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }
}

impl ChallengeSource for ChallengePool {
    fn draw(&mut self) -> Challenge {
        // Independent uniform draw each time; repeats are allowed.
        let idx = self.rng.gen_range(0..self.challenges.len());
        self.challenges[idx].clone()
    }
}

/// Build the default pool of arithmetic challenges from config.
///
/// Generates one addition and one multiplication puzzle per unordered operand
/// pair in the configured range. Distractor options cluster around the true
/// answer; the correct answer's position varies with the answer value so it
/// is not fixed at one index.
pub fn arithmetic_pool(config: &ChallengeConfig) -> Result<ChallengePool> {
    let challenges = arithmetic_challenges(config)?;
    ChallengePool::new(challenges)
}

/// Generate the arithmetic challenge set without wrapping it in a pool.
pub fn arithmetic_challenges(config: &ChallengeConfig) -> Result<Vec<Challenge>> {
    if !ChallengeConfig::is_valid_range(config.min_operand, config.max_operand) {
        return Err(GateError::config(format!(
            "operand range {}..{} is empty or exceeds the {} bound",
            config.min_operand,
            config.max_operand,
            crate::config::MAX_OPERAND
        )));
    }
    if !ChallengeConfig::is_valid_option_count(config.option_count) {
        return Err(GateError::config(format!(
            "option_count {} out of range",
            config.option_count
        )));
    }

    let mut challenges = Vec::new();
    for a in config.min_operand..=config.max_operand {
        for b in a..=config.max_operand {
            challenges.push(puzzle(
                format!("What is {} + {}?", a, b),
                a + b,
                config.option_count,
            )?);
            challenges.push(puzzle(
                format!("What is {} × {}?", a, b),
                a * b,
                config.option_count,
            )?);
        }
    }
    Ok(challenges)
}

/// Build one puzzle: the answer plus nearby distractors, answer position
/// derived from the answer value.
fn puzzle(prompt: String, answer: u32, option_count: usize) -> Result<Challenge> {
    let mut options = distractors(answer, option_count - 1);
    let slot = answer as usize % option_count;
    options.insert(slot, answer);
    Challenge::new(prompt, options, answer)
}

/// Produce `count` distinct values near `answer`, none equal to it.
fn distractors(answer: u32, count: usize) -> Vec<u32> {
    let mut values = Vec::with_capacity(count);
    let mut offset = 1u32;
    while values.len() < count {
        values.push(answer + offset);
        if values.len() < count {
            if let Some(below) = answer.checked_sub(offset) {
                values.push(below);
            }
        }
        offset += 1;
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Challenge {
        Challenge::new("What is 2 + 3?", vec![4, 5, 6, 7], 5).unwrap()
    }

    #[test]
    fn test_challenge_new() {
        let challenge = sample();
        assert_eq!(challenge.prompt, "What is 2 + 3?");
        assert_eq!(challenge.options.len(), 4);
        assert!(challenge.is_correct(5));
        assert!(!challenge.is_correct(4));
    }

    #[test]
    fn test_challenge_answer_must_be_an_option() {
        let result = Challenge::new("What is 2 + 3?", vec![1, 2, 3], 5);
        assert!(matches!(result, Err(GateError::Challenge { .. })));
    }

    #[test]
    fn test_challenge_rejects_empty_options() {
        let result = Challenge::new("What is 2 + 3?", vec![], 5);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_pool_is_config_error() {
        let result = ChallengePool::new(vec![]);
        assert!(matches!(result, Err(GateError::Config { .. })));
    }

    #[test]
    fn test_pool_draw_returns_pool_member() {
        let challenges = vec![
            sample(),
            Challenge::new("What is 3 × 3?", vec![6, 8, 9, 12], 9).unwrap(),
        ];
        let mut pool = ChallengePool::with_seed(challenges.clone(), 7).unwrap();

        for _ in 0..50 {
            let drawn = pool.draw();
            assert!(challenges.contains(&drawn));
        }
    }

    #[test]
    fn test_pool_seeded_draws_are_deterministic() {
        let challenges = arithmetic_challenges(&ChallengeConfig::default()).unwrap();
        let mut a = ChallengePool::with_seed(challenges.clone(), 42).unwrap();
        let mut b = ChallengePool::with_seed(challenges, 42).unwrap();

        for _ in 0..20 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn test_arithmetic_pool_honors_option_count() {
        let config = ChallengeConfig {
            min_operand: 2,
            max_operand: 5,
            option_count: 3,
        };
        let challenges = arithmetic_challenges(&config).unwrap();
        assert!(!challenges.is_empty());
        for challenge in &challenges {
            assert_eq!(challenge.options.len(), 3);
            assert!(challenge.options.contains(&challenge.answer));
        }
    }

    #[test]
    fn test_arithmetic_pool_options_are_distinct() {
        let challenges = arithmetic_challenges(&ChallengeConfig::default()).unwrap();
        for challenge in &challenges {
            let mut sorted = challenge.options.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(
                sorted.len(),
                challenge.options.len(),
                "duplicate options in {:?}",
                challenge
            );
        }
    }

    #[test]
    fn test_arithmetic_pool_rejects_bad_range() {
        let config = ChallengeConfig {
            min_operand: 9,
            max_operand: 2,
            option_count: 4,
        };
        assert!(arithmetic_pool(&config).is_err());
    }

    #[test]
    fn test_arithmetic_pool_rejects_oversized_operands() {
        // Operands past the bound would overflow u32 products and blow up
        // the pool size; the guard must reject them before generation.
        let config = ChallengeConfig {
            min_operand: 70_000,
            max_operand: 70_001,
            option_count: 4,
        };
        assert!(matches!(
            arithmetic_challenges(&config),
            Err(GateError::Config { .. })
        ));
    }

    #[test]
    fn test_arithmetic_pool_accepts_max_operand_boundary() {
        let config = ChallengeConfig {
            min_operand: crate::config::MAX_OPERAND - 1,
            max_operand: crate::config::MAX_OPERAND,
            option_count: 4,
        };
        let challenges = arithmetic_challenges(&config).unwrap();
        for challenge in &challenges {
            assert!(challenge.options.contains(&challenge.answer));
        }
    }

    #[test]
    fn test_arithmetic_pool_rejects_bad_option_count() {
        let config = ChallengeConfig {
            min_operand: 2,
            max_operand: 9,
            option_count: 1,
        };
        assert!(arithmetic_pool(&config).is_err());
    }

    #[test]
    fn test_distractors_near_zero_answer() {
        // 0 × 0 style answers cannot go below zero; distractors must still
        // be distinct and never equal the answer.
        let values = distractors(0, 3);
        assert_eq!(values.len(), 3);
        assert!(!values.contains(&0));
        let mut sorted = values.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 3);
    }

    #[test]
    fn test_challenge_serialization() {
        let challenge = sample();
        let json = serde_json::to_string(&challenge).unwrap();
        let deserialized: Challenge = serde_json::from_str(&json).unwrap();
        assert_eq!(challenge, deserialized);
    }
}
