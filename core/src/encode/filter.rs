//! Minor allele frequency filtering.

use std::fmt;

use crate::variant::Variant;

/// Returns the minor allele frequency of a set of haplotype calls.
///
/// Any non-reference allele index counts as an alternate call. An empty set of calls has minor
/// allele frequency zero.
pub fn minor_allele_frequency(calls: &[u8]) -> f64 {
    if calls.is_empty() {
        return 0.0;
    }

    let alternates = calls.iter().filter(|&&call| call > 0).count();
    let alternate = alternates as f64 / calls.len() as f64;

    alternate.min(1.0 - alternate)
}

/// A filter retaining variants with minor allele frequency at or above a threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MafFilter {
    threshold: f64,
}

impl MafFilter {
    /// The default threshold.
    pub const DEFAULT_THRESHOLD: f64 = 0.05;

    /// Creates a new filter.
    ///
    /// # Errors
    ///
    /// If the threshold is not in [0, 0.5].
    pub fn new(threshold: f64) -> Result<Self, ThresholdError> {
        if (0.0..=0.5).contains(&threshold) {
            Ok(Self { threshold })
        } else {
            Err(ThresholdError(threshold))
        }
    }

    /// Returns the threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns `true` if the variant passes the filter.
    pub fn retains(&self, variant: &Variant) -> bool {
        minor_allele_frequency(variant.haplotypes()) >= self.threshold
    }
}

impl Default for MafFilter {
    fn default() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }
}

/// An error associated with an invalid minor allele frequency threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThresholdError(pub f64);

impl fmt::Display for ThresholdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "minor allele frequency threshold must be in [0, 0.5], found {}",
            self.0
        )
    }
}

impl std::error::Error for ThresholdError {}
