use crate::error::AssociationError;

/// Term-level relevance weight engine
///
/// The weight is advisory metadata stored on every document-term row.
/// Relation scoring does not read it.
pub trait WeightEngine {
    /// Weight of a term occurring `frequency` times in a document.
    /// # Arguments
    /// * `term` - term, used for error reporting
    /// * `frequency` - occurrences inside the document
    /// * `document_count` - documents containing the term, if known
    /// * `total_documents` - corpus size including the current document
    fn weight(
        term: &str,
        frequency: u64,
        document_count: Option<u64>,
        total_documents: u64,
    ) -> Result<f64, AssociationError>;
}

/// Default weight engine
/// `frequency * ln(total_documents / document_count + 1)`
///
/// The `+ 1` keeps the weight strictly positive for a term present in every
/// document.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultWeightEngine;

impl WeightEngine for DefaultWeightEngine {
    fn weight(
        term: &str,
        frequency: u64,
        document_count: Option<u64>,
        total_documents: u64,
    ) -> Result<f64, AssociationError> {
        let document_count = match document_count {
            Some(count) if count > 0 => count,
            _ => {
                return Err(AssociationError::MissingStatistics {
                    term: term.to_string(),
                })
            }
        };
        if total_documents == 0 {
            return Err(AssociationError::MissingStatistics {
                term: term.to_string(),
            });
        }
        let idf = (total_documents as f64 / document_count as f64 + 1.0).ln();
        let weight = frequency as f64 * idf;
        if weight.is_finite() {
            Ok(weight)
        } else {
            Err(AssociationError::MissingStatistics {
                term: term.to_string(),
            })
        }
    }
}
