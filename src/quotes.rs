//! Rotating inspirational quotes shown at the bottom of the report.

use rand::seq::SliceRandom;

pub const QUOTES: &[&str] = &[
    "The only way to do great work is to love what you do.",
    "Simplicity is the soul of efficiency.",
    "Every line of code is a step towards a better future.",
    "First, solve the problem. Then, write the code.",
    "Talk is cheap. Show me the code.",
    "Programs must be written for people to read, and only incidentally for machines to execute.",
    "Make it work, make it right, make it fast.",
    "The best error message is the one that never shows up.",
    "Free software is a matter of liberty, not price.",
    "Knowledge shared is knowledge multiplied.",
    "Small steps every day lead to big results.",
    "Stay curious, keep learning.",
];

/// Picks a quote uniformly at random.
pub fn random_quote() -> String {
    QUOTES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_from_list() {
        for _ in 0..20 {
            let quote = random_quote();
            assert!(QUOTES.contains(&quote.as_str()));
        }
    }

    #[test]
    fn test_quotes_not_empty() {
        assert!(!QUOTES.is_empty());
        assert!(QUOTES.iter().all(|q| !q.trim().is_empty()));
    }
}
