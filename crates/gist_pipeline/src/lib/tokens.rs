//! Token counting and budget enforcement.
//!
//! Wraps a `tiktoken` encoding resolved from the model name. Truncation
//! happens at the token-sequence level and is decoded back to text, so a
//! budgeted chunk never ends mid-token.

use tiktoken_rs::{cl100k_base, get_bpe_from_model, CoreBPE};

#[derive(Debug, thiserror::Error)]
#[error("failed to load tokenizer for model {model}: {reason}")]
pub struct TokenizerError {
    pub model: String,
    pub reason: String,
}

pub struct TokenBudgeter {
    bpe: CoreBPE,
}

impl TokenBudgeter {
    /// Resolves the encoding for `model`, falling back to `cl100k_base` when
    /// the model is unknown to the tokenizer tables.
    pub fn for_model(model: &str) -> Result<Self, TokenizerError> {
        let bpe = match get_bpe_from_model(model) {
            Ok(bpe) => bpe,
            Err(model_err) => {
                tracing::warn!(
                    model,
                    error = %model_err,
                    "Unknown model for tokenizer; falling back to cl100k_base"
                );
                cl100k_base().map_err(|e| TokenizerError {
                    model: model.to_string(),
                    reason: e.to_string(),
                })?
            }
        };
        Ok(TokenBudgeter { bpe })
    }

    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    /// Returns a prefix of `text` that occupies at most `max_tokens` tokens.
    ///
    /// Identity when the text is already within budget. If the cut lands
    /// inside a multi-byte scalar the prefix is shortened until it decodes
    /// cleanly, so the result is always valid text.
    pub fn truncate(&self, text: &str, max_tokens: usize) -> String {
        let tokens = self.bpe.encode_ordinary(text);
        if tokens.len() <= max_tokens {
            return text.to_string();
        }

        let mut end = max_tokens;
        loop {
            match self.bpe.decode(tokens[..end].to_vec()) {
                Ok(prefix) => return prefix,
                Err(_) if end > 0 => end -= 1,
                Err(_) => return String::new(),
            }
        }
    }
}

impl std::fmt::Debug for TokenBudgeter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenBudgeter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budgeter() -> TokenBudgeter {
        TokenBudgeter::for_model("gpt-4").unwrap()
    }

    #[test]
    fn truncation_respects_the_budget() {
        let b = budgeter();
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(50);
        for max in [0, 1, 10, 100] {
            let truncated = b.truncate(&text, max);
            assert!(b.count(&truncated) <= max, "budget {max} exceeded");
        }
    }

    #[test]
    fn text_within_budget_is_unchanged() {
        let b = budgeter();
        let text = "short text";
        assert_eq!(b.truncate(text, 1_000), text);
    }

    #[test]
    fn truncation_is_a_prefix_and_deterministic() {
        let b = budgeter();
        let text = "one two three four five six seven eight nine ten ".repeat(20);
        let first = b.truncate(&text, 25);
        let second = b.truncate(&text, 25);
        assert_eq!(first, second);
        assert!(text.starts_with(&first));
    }

    #[test]
    fn unknown_model_falls_back_to_default_encoding() {
        let b = TokenBudgeter::for_model("some-local-model").unwrap();
        assert!(b.count("hello world") > 0);
    }
}
