//! Variant readers.

use crate::input::ReadStatus;

use super::Variant;

pub mod builder;
pub use builder::Builder;

pub mod vcf;

/// A boxed variant reader.
pub type DynReader = Box<dyn Reader>;

/// A finite, non-restartable source of variants.
pub trait Reader {
    /// Returns the contig of the most recently read variant.
    fn current_contig(&self) -> &str;

    /// Returns the position of the most recently read variant.
    fn current_position(&self) -> usize;

    /// Reads the next variant.
    fn read_variant(&mut self) -> ReadStatus<Variant>;

    /// Returns the sample names of the source, one per diploid individual.
    fn samples(&self) -> &[String];
}

impl<R> Reader for Box<R>
where
    R: Reader + ?Sized,
{
    fn current_contig(&self) -> &str {
        (**self).current_contig()
    }

    fn current_position(&self) -> usize {
        (**self).current_position()
    }

    fn read_variant(&mut self) -> ReadStatus<Variant> {
        (**self).read_variant()
    }

    fn samples(&self) -> &[String] {
        (**self).samples()
    }
}

/// An in-memory variant source.
///
/// Useful when variants are produced directly by a simulator rather than read from disk.
#[derive(Clone, Debug)]
pub struct Variants<I> {
    iter: I,
    samples: Vec<String>,
    position: usize,
}

impl<I> Variants<I>
where
    I: Iterator<Item = Variant>,
{
    /// Creates a new source from an iterator of variants and the sample names.
    pub fn new<J>(variants: J, samples: Vec<String>) -> Self
    where
        J: IntoIterator<IntoIter = I>,
    {
        Self {
            iter: variants.into_iter(),
            samples,
            position: 0,
        }
    }
}

impl<I> Reader for Variants<I>
where
    I: Iterator<Item = Variant>,
{
    fn current_contig(&self) -> &str {
        "[unknown]"
    }

    fn current_position(&self) -> usize {
        self.position
    }

    fn read_variant(&mut self) -> ReadStatus<Variant> {
        match self.iter.next() {
            Some(variant) => {
                self.position = variant.position();
                ReadStatus::Read(variant)
            }
            None => ReadStatus::Done,
        }
    }

    fn samples(&self) -> &[String] {
        &self.samples
    }
}
