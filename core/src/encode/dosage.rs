//! Reduction of haplotype calls to diploid dosages.

use std::fmt;

use crate::variant::Variant;

/// A diploid dosage, coded as the number of alternate alleles.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(u8)]
pub enum Dosage {
    /// Zero alternate alleles.
    Zero = 0,
    /// One alternate allele.
    One = 1,
    /// Two alternate alleles.
    Two = 2,
}

impl Dosage {
    /// Returns a dosage from its raw representation if possible, otherwise `None`.
    pub fn try_from_raw(raw: usize) -> Option<Self> {
        match raw {
            0 => Some(Self::Zero),
            1 => Some(Self::One),
            2 => Some(Self::Two),
            _ => None,
        }
    }

    /// Returns a dosage from its raw representation, clamping values above two.
    pub fn clamped(raw: usize) -> Self {
        Self::try_from_raw(raw).unwrap_or(Self::Two)
    }
}

impl From<Dosage> for u8 {
    fn from(dosage: Dosage) -> Self {
        dosage as u8
    }
}

/// Collapses haplotype calls into per-individual dosages.
///
/// Out-of-range dosages are clamped, and the number of clamped dosages is tracked.
#[derive(Clone, Debug)]
pub struct DosageReducer {
    individuals: usize,
    clamped: usize,
}

impl DosageReducer {
    /// Creates a new reducer for the provided number of diploid individuals.
    pub fn new(individuals: usize) -> Self {
        Self {
            individuals,
            clamped: 0,
        }
    }

    /// Returns the number of dosages clamped so far.
    pub fn clamped(&self) -> usize {
        self.clamped
    }

    /// Returns the number of individuals.
    pub fn individuals(&self) -> usize {
        self.individuals
    }

    /// Returns the dosages of each individual for the provided variant.
    ///
    /// # Errors
    ///
    /// If the number of haplotype calls is not exactly twice the number of individuals.
    pub fn reduce(&mut self, variant: &Variant) -> Result<Vec<Dosage>, PloidyError> {
        let haplotypes = variant.haplotypes();

        if haplotypes.len() != 2 * self.individuals {
            return Err(PloidyError {
                position: variant.position(),
                haplotypes: haplotypes.len(),
                individuals: self.individuals,
            });
        }

        let dosages = haplotypes
            .chunks_exact(2)
            .map(|pair| {
                let raw = usize::from(pair[0]) + usize::from(pair[1]);

                Dosage::try_from_raw(raw).unwrap_or_else(|| {
                    if self.clamped == 0 {
                        log::warn!(
                            "Clamping dosage {raw} to 2 at position {position}. \
                            This warning will be shown only once, with a summary at the end.",
                            position = variant.position(),
                        );
                    }
                    self.clamped += 1;

                    Dosage::clamped(raw)
                })
            })
            .collect();

        Ok(dosages)
    }
}

/// An error associated with a variant whose haplotype calls are not diploid.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PloidyError {
    /// Position of the offending variant.
    pub position: usize,
    /// Number of haplotype calls found.
    pub haplotypes: usize,
    /// Number of individuals expected.
    pub individuals: usize,
}

impl fmt::Display for PloidyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "variant at position {} has {} haplotype calls, expected {} for {} diploid individuals",
            self.position,
            self.haplotypes,
            2 * self.individuals,
            self.individuals,
        )
    }
}

impl std::error::Error for PloidyError {}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::variant::Alleles;

    fn variant(haplotypes: Vec<u8>) -> Variant {
        Variant::new(0, 100, Alleles::placeholder(), haplotypes)
    }

    #[test]
    fn test_reduce() {
        let mut reducer = DosageReducer::new(4);

        assert_eq!(
            reducer.reduce(&variant(vec![0, 0, 1, 1, 0, 0, 1, 1])),
            Ok(vec![Dosage::Zero, Dosage::Two, Dosage::Zero, Dosage::Two])
        );
        assert_eq!(
            reducer.reduce(&variant(vec![0, 1, 1, 0, 1, 1, 0, 0])),
            Ok(vec![Dosage::One, Dosage::One, Dosage::Two, Dosage::Zero])
        );
        assert_eq!(reducer.clamped(), 0);
    }

    #[test]
    fn test_reduce_clamps_out_of_range() {
        let mut reducer = DosageReducer::new(2);

        assert_eq!(
            reducer.reduce(&variant(vec![2, 1, 0, 2])),
            Ok(vec![Dosage::Two, Dosage::Two])
        );
        assert_eq!(reducer.clamped(), 1);
    }

    #[test]
    fn test_reduce_not_diploid() {
        let mut reducer = DosageReducer::new(3);

        assert_eq!(
            reducer.reduce(&variant(vec![0, 1, 1, 0, 1])),
            Err(PloidyError {
                position: 100,
                haplotypes: 5,
                individuals: 3,
            })
        );
    }

    #[test]
    fn test_reduce_no_individuals() {
        assert_eq!(DosageReducer::new(0).reduce(&variant(vec![])), Ok(vec![]));
    }
}
