//! Corpus-wide word correlation.
//!
//! Builds a document-term matrix over the most frequent terms and reports
//! term pairs whose occurrence counts move together across documents.

use std::cmp::Ordering;

use ahash::RandomState;
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::association::index::DocumentTermIndex;

/// Two terms whose per-document counts correlate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCorrelation {
    pub a: String,
    pub b: String,
    /// Pearson coefficient
    pub r: f64,
}

/// Document-term matrix restricted to a vocabulary
#[derive(Debug, Clone)]
pub struct TermMatrix {
    /// column labels
    pub vocabulary: Vec<String>,
    /// one row per ingested document, raw frequencies
    pub rows: Vec<Vec<f64>>,
}

impl TermMatrix {
    /// Build the matrix over the `max_terms` terms with the largest total
    /// occurrence count; ties go to the lexicographically smaller term.
    pub fn build(index: &DocumentTermIndex, max_terms: usize) -> Self {
        let mut totals: IndexMap<&str, u64, RandomState> = IndexMap::default();
        for (_, rows) in index.ingested() {
            for (term, row) in rows {
                *totals.entry(&**term).or_insert(0) += row.frequency;
            }
        }
        let mut ranked: Vec<(&str, u64)> = totals.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(max_terms);
        // columns in term order
        let mut vocabulary: Vec<String> = ranked.into_iter().map(|(t, _)| t.to_string()).collect();
        vocabulary.sort();

        let rows = index
            .ingested()
            .map(|(_, rows)| {
                vocabulary
                    .iter()
                    .map(|term| rows.get(term.as_str()).map_or(0.0, |row| row.frequency as f64))
                    .collect()
            })
            .collect();
        Self { vocabulary, rows }
    }

    fn column(&self, j: usize) -> Vec<f64> {
        self.rows.iter().map(|row| row[j]).collect()
    }

    /// Pearson correlation between columns `i` and `j`.
    /// `None` when either column has zero variance.
    pub fn pearson(&self, i: usize, j: usize) -> Option<f64> {
        let n = self.rows.len();
        if n < 2 {
            return None;
        }
        let x = self.column(i);
        let y = self.column(j);
        let mean_x = x.iter().sum::<f64>() / n as f64;
        let mean_y = y.iter().sum::<f64>() / n as f64;
        let mut cov = 0.0;
        let mut var_x = 0.0;
        let mut var_y = 0.0;
        for (xv, yv) in x.iter().zip(y.iter()) {
            let dx = xv - mean_x;
            let dy = yv - mean_y;
            cov += dx * dy;
            var_x += dx * dx;
            var_y += dy * dy;
        }
        if var_x <= f64::EPSILON || var_y <= f64::EPSILON {
            return None;
        }
        let r = cov / (var_x.sqrt() * var_y.sqrt());
        // rounding can push |r| slightly past 1
        Some(r.clamp(-1.0, 1.0))
    }

    /// `DTMᵀ·DTM` entry for columns `i` and `j`
    pub fn co_occurrence(&self, i: usize, j: usize) -> f64 {
        self.rows.iter().map(|row| row[i] * row[j]).sum()
    }
}

/// Term pairs with correlation at or above `threshold`, strongest first
pub fn related_words(index: &DocumentTermIndex, max_terms: usize, threshold: f64) -> Vec<WordCorrelation> {
    if index.ingested_len() < 2 {
        return Vec::new();
    }
    let matrix = TermMatrix::build(index, max_terms);
    let dim = matrix.vocabulary.len();
    let mut pairs: Vec<WordCorrelation> = (0..dim)
        .into_par_iter()
        .flat_map_iter(|i| {
            let matrix = &matrix;
            ((i + 1)..dim).filter_map(move |j| {
                let r = matrix.pearson(i, j)?;
                (r >= threshold).then(|| WordCorrelation {
                    a: matrix.vocabulary[i].clone(),
                    b: matrix.vocabulary[j].clone(),
                    r,
                })
            })
        })
        .collect();
    pairs.sort_by(|x, y| {
        y.r.partial_cmp(&x.r)
            .unwrap_or(Ordering::Equal)
            .then_with(|| x.a.cmp(&y.a))
            .then_with(|| x.b.cmp(&y.b))
    });
    pairs
}

/// Non-zero co-occurrence counts `(a, b, count)` with `a <= b`
pub fn co_occurrence(index: &DocumentTermIndex, max_terms: usize) -> Vec<(String, String, u64)> {
    if index.ingested_len() < 2 {
        return Vec::new();
    }
    let matrix = TermMatrix::build(index, max_terms);
    let dim = matrix.vocabulary.len();
    let mut out = Vec::new();
    for i in 0..dim {
        for j in i..dim {
            let count = matrix.co_occurrence(i, j);
            if count > 0.0 {
                out.push((
                    matrix.vocabulary[i].clone(),
                    matrix.vocabulary[j].clone(),
                    count as u64,
                ));
            }
        }
    }
    out
}
