//! Engine configuration.
//!
//! Defaults reproduce the production behaviour: a term found in 60% or more
//! of the posts is noise, two shared core terms make a link, and word pairs
//! correlate at r >= 0.4 over the 50 most frequent terms.
//!
//! ```
//! use doc_association::AssociationConfig;
//!
//! let config = AssociationConfig::from_toml_str("exclusion_ratio = 0.75").unwrap();
//! assert_eq!(config.exclusion_ratio, 0.75);
//! assert_eq!(config.min_shared_terms, 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::AssociationError;

/// Share of the corpus at which a term stops being diagnostic.
pub const DEFAULT_EXCLUSION_RATIO: f64 = 0.6;

/// Minimum number of shared core terms for two documents to be related.
pub const DEFAULT_MIN_SHARED_TERMS: usize = 2;

/// Minimum Pearson coefficient for two words to count as correlated.
pub const DEFAULT_CORRELATION_THRESHOLD: f64 = 0.4;

/// Vocabulary cap for word correlation.
pub const DEFAULT_CORRELATION_MAX_TERMS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssociationConfig {
    /// Exclusion threshold as a fraction of `total_documents`, in `(0, 1]`
    pub exclusion_ratio: f64,
    /// Shared core term floor for relatedness
    pub min_shared_terms: usize,
    /// Minimum correlation coefficient reported by `related_words`
    pub correlation_threshold: f64,
    /// How many of the most frequent terms `related_words` looks at
    pub correlation_max_terms: usize,
}

impl Default for AssociationConfig {
    fn default() -> Self {
        Self {
            exclusion_ratio: DEFAULT_EXCLUSION_RATIO,
            min_shared_terms: DEFAULT_MIN_SHARED_TERMS,
            correlation_threshold: DEFAULT_CORRELATION_THRESHOLD,
            correlation_max_terms: DEFAULT_CORRELATION_MAX_TERMS,
        }
    }
}

impl AssociationConfig {
    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(src: &str) -> Result<Self, AssociationError> {
        let config: AssociationConfig = toml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AssociationError> {
        if !(self.exclusion_ratio > 0.0 && self.exclusion_ratio <= 1.0) {
            return Err(AssociationError::InvalidConfig(format!(
                "exclusion_ratio must be in (0, 1], got {}",
                self.exclusion_ratio
            )));
        }
        if self.min_shared_terms == 0 {
            return Err(AssociationError::InvalidConfig(
                "min_shared_terms must be at least 1".to_string(),
            ));
        }
        if !(-1.0..=1.0).contains(&self.correlation_threshold) {
            return Err(AssociationError::InvalidConfig(format!(
                "correlation_threshold must be in [-1, 1], got {}",
                self.correlation_threshold
            )));
        }
        Ok(())
    }
}
