//! Score arithmetic
//!
//! Pure functions turning judge verdicts and embeddings into metric scores.
//! `None` means the score is not computable for the sample.

use qaeval_core::cosine_similarity;

/// Weight of factuality in answer correctness; similarity gets the rest.
pub const DEFAULT_FACTUALITY_WEIGHT: f64 = 0.75;

/// Statement classification counts for answer correctness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatementCounts {
    /// Answer statements supported by the ground truth
    pub true_positive: usize,
    /// Answer statements not supported by the ground truth
    pub false_positive: usize,
    /// Ground-truth statements missing from the answer
    pub false_negative: usize,
}

impl StatementCounts {
    pub fn total(&self) -> usize {
        self.true_positive + self.false_positive + self.false_negative
    }

    /// F1 over the classified statements: `TP / (TP + (FP + FN) / 2)`.
    pub fn f1(&self) -> Option<f64> {
        if self.total() == 0 {
            return None;
        }
        let tp = self.true_positive as f64;
        let denominator = tp + 0.5 * (self.false_positive + self.false_negative) as f64;
        if denominator == 0.0 {
            Some(0.0)
        } else {
            Some(tp / denominator)
        }
    }
}

/// Fraction of `true` verdicts.
pub fn verdict_ratio(verdicts: &[bool]) -> Option<f64> {
    if verdicts.is_empty() {
        return None;
    }
    let supported = verdicts.iter().filter(|v| **v).count();
    Some(supported as f64 / verdicts.len() as f64)
}

/// Average precision over ranked usefulness verdicts.
///
/// Precision at each rank is weighted by that rank's verdict; 0.0 when no
/// context is useful.
pub fn average_precision(verdicts: &[bool]) -> Option<f64> {
    if verdicts.is_empty() {
        return None;
    }

    let relevant = verdicts.iter().filter(|v| **v).count();
    if relevant == 0 {
        return Some(0.0);
    }

    let mut hits = 0usize;
    let mut numerator = 0.0;
    for (rank, useful) in verdicts.iter().enumerate() {
        if *useful {
            hits += 1;
            numerator += hits as f64 / (rank + 1) as f64;
        }
    }
    Some(numerator / relevant as f64)
}

/// Answer relevancy from the question embedding and the embeddings of
/// questions generated back from the answer.
pub fn relevancy(question: &[f32], generated: &[Vec<f32>], noncommittal: bool) -> Option<f64> {
    if generated.is_empty() {
        return None;
    }
    if noncommittal {
        return Some(0.0);
    }
    let total: f64 = generated
        .iter()
        .map(|g| cosine_similarity(question, g))
        .sum();
    Some(total / generated.len() as f64)
}

/// Weighted blend of factuality and similarity.
pub fn correctness(
    factuality: Option<f64>,
    similarity: f64,
    factuality_weight: f64,
) -> Option<f64> {
    let weight = factuality_weight.clamp(0.0, 1.0);
    factuality.map(|f| weight * f + (1.0 - weight) * similarity)
}

/// Mean of the computable scores.
pub fn mean(scores: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, count) = scores
        .into_iter()
        .flatten()
        .filter(|s| !s.is_nan())
        .fold((0.0, 0usize), |(sum, count), s| (sum + s, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
