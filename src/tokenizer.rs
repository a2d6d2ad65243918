/// Turns raw post text into an ordered sequence of terms.
///
/// Any normalization, stemming or part-of-speech filtering belongs to the
/// implementation; the engine treats the output as opaque terms.
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Case-folding tokenizer splitting on anything that is not alphanumeric
#[derive(Debug, Clone, Copy)]
pub struct SimpleTokenizer {
    /// shorter tokens (in chars) are dropped
    pub min_len: usize,
}

impl Default for SimpleTokenizer {
    fn default() -> Self {
        Self { min_len: 1 }
    }
}

impl SimpleTokenizer {
    pub fn new(min_len: usize) -> Self {
        Self { min_len }
    }
}

impl Tokenizer for SimpleTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|tok| !tok.is_empty() && tok.chars().count() >= self.min_len)
            .map(|tok| tok.to_lowercase())
            .collect()
    }
}

impl<F> Tokenizer for F
where
    F: Fn(&str) -> Vec<String>,
{
    fn tokenize(&self, text: &str) -> Vec<String> {
        self(text)
    }
}
