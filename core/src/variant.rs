//! Simulated variants.

use std::fmt;

pub mod reader;
pub use reader::Reader;

/// The reference allele used when a variant has no usable allele list.
pub const PLACEHOLDER_REFERENCE: &str = "A";

/// The alternate allele used when a variant has no usable allele list.
pub const PLACEHOLDER_ALTERNATE: &str = "G";

/// A single variant site with its per-haplotype calls.
///
/// Haplotype calls are ordered such that calls `2i` and `2i + 1` belong to individual `i`.
#[derive(Clone, Debug, PartialEq)]
pub struct Variant {
    id: usize,
    position: usize,
    alleles: Alleles,
    haplotypes: Vec<u8>,
}

impl Variant {
    /// Creates a new variant.
    pub fn new(id: usize, position: usize, alleles: Alleles, haplotypes: Vec<u8>) -> Self {
        Self {
            id,
            position,
            alleles,
            haplotypes,
        }
    }

    /// Returns the site id.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the genomic position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the reference and alternate alleles.
    pub fn alleles(&self) -> &Alleles {
        &self.alleles
    }

    /// Returns the haplotype calls.
    pub fn haplotypes(&self) -> &[u8] {
        &self.haplotypes
    }
}

/// An ordered pair of reference and alternate allele symbols.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Alleles {
    reference: String,
    alternate: String,
}

impl Alleles {
    /// Creates a new allele pair.
    pub fn new<S, T>(reference: S, alternate: T) -> Self
    where
        S: ToString,
        T: ToString,
    {
        Self {
            reference: reference.to_string(),
            alternate: alternate.to_string(),
        }
    }

    /// Creates an allele pair from an allele list, with the reference first.
    ///
    /// Lists with fewer than two non-empty, non-missing symbols fall back to the placeholder
    /// alleles [`PLACEHOLDER_REFERENCE`] and [`PLACEHOLDER_ALTERNATE`].
    pub fn from_list<I, S>(list: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut usable = list
            .into_iter()
            .filter(|s| !matches!(s.as_ref(), "" | "."))
            .take(2);

        match (usable.next(), usable.next()) {
            (Some(reference), Some(alternate)) => Self::new(reference.as_ref(), alternate.as_ref()),
            _ => Self::placeholder(),
        }
    }

    /// Returns the placeholder allele pair.
    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_REFERENCE, PLACEHOLDER_ALTERNATE)
    }

    /// Returns the reference allele.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Returns the alternate allele.
    pub fn alternate(&self) -> &str {
        &self.alternate
    }
}

impl fmt::Display for Alleles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}>{}", self.reference, self.alternate)
    }
}
