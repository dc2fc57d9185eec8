use crate::domain_port::{GeneratorError, RandomTokenGenerator};
use rand::Rng;
use rand::seq::SliceRandom;

// ambiguous characters (0, O, 1, l, I) are excluded from every alphabet
const LOWER_LETTERS: &str = "abcdefghijkmnopqrstuvwxyz";
const UPPER_LETTERS: &str = "ABCDEFGHJKLMNPQRSTUVWXYZ";
const DIGITS: &str = "23456789";
const SYMBOLS: &str = "!@#$%&*";

pub struct RandTokenGenerator;

impl RandTokenGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RandTokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn draw(
    rng: &mut impl Rng,
    alphabet: &mut Vec<char>,
    count: usize,
    allow_repeat: bool,
) -> Result<Vec<char>, GeneratorError> {
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        if alphabet.is_empty() {
            return Err(GeneratorError::CharsetExhausted);
        }
        let idx = rng.random_range(0..alphabet.len());
        if allow_repeat {
            out.push(alphabet[idx]);
        } else {
            out.push(alphabet.swap_remove(idx));
        }
    }
    Ok(out)
}

#[async_trait::async_trait]
impl RandomTokenGenerator for RandTokenGenerator {
    async fn generate(
        &self,
        length: usize,
        num_digits: usize,
        num_symbols: usize,
        no_upper: bool,
        allow_repeat: bool,
    ) -> Result<String, GeneratorError> {
        if num_digits + num_symbols > length {
            return Err(GeneratorError::CompositionTooLong);
        }
        let num_letters = length - num_digits - num_symbols;

        let mut letters: Vec<char> = LOWER_LETTERS.chars().collect();
        if !no_upper {
            letters.extend(UPPER_LETTERS.chars());
        }
        let mut digits: Vec<char> = DIGITS.chars().collect();
        let mut symbols: Vec<char> = SYMBOLS.chars().collect();

        let mut rng = rand::rng();
        let mut chars = draw(&mut rng, &mut letters, num_letters, allow_repeat)?;
        chars.extend(draw(&mut rng, &mut digits, num_digits, allow_repeat)?);
        chars.extend(draw(&mut rng, &mut symbols, num_symbols, allow_repeat)?);
        chars.shuffle(&mut rng);

        Ok(chars.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn respects_requested_composition() {
        let generator = RandTokenGenerator::new();
        let token = generator.generate(20, 5, 2, true, false).await.unwrap();

        assert_eq!(token.chars().count(), 20);
        assert_eq!(token.chars().filter(|c| DIGITS.contains(*c)).count(), 5);
        assert_eq!(token.chars().filter(|c| SYMBOLS.contains(*c)).count(), 2);
        assert!(!token.chars().any(|c| c.is_ascii_uppercase()));
    }

    #[tokio::test]
    async fn excludes_ambiguous_characters() {
        let generator = RandTokenGenerator::new();
        for _ in 0..20 {
            let token = generator.generate(24, 8, 0, false, true).await.unwrap();
            assert!(!token.chars().any(|c| "0O1lI".contains(c)), "{token}");
        }
    }

    #[tokio::test]
    async fn no_repeat_draws_distinct_characters() {
        let generator = RandTokenGenerator::new();
        let token = generator.generate(15, 4, 3, true, false).await.unwrap();

        let mut seen = std::collections::HashSet::new();
        assert!(token.chars().all(|c| seen.insert(c)), "{token}");
    }

    #[tokio::test]
    async fn rejects_impossible_compositions() {
        let generator = RandTokenGenerator::new();

        let err = generator.generate(5, 4, 2, true, true).await.unwrap_err();
        assert!(matches!(err, GeneratorError::CompositionTooLong));

        // only 8 distinct digits exist
        let err = generator.generate(12, 10, 0, true, false).await.unwrap_err();
        assert!(matches!(err, GeneratorError::CharsetExhausted));
    }
}
