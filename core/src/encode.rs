//! Encoding simulated variants as a binary genotype fileset.
//!
//! Variants are read once from a [`variant::Reader`](crate::variant::Reader), filtered on minor
//! allele frequency, reduced to diploid dosages, and written to the three outputs of a
//! [`plink`](crate::plink) fileset.

use std::{fmt, io};

pub mod dosage;
pub use dosage::{Dosage, DosageReducer, PloidyError};

pub mod filter;
pub use filter::{MafFilter, ThresholdError};

use crate::{
    input::ReadStatus,
    plink::{self, bim, Fileset, Individual},
    variant::{self, Variant},
};

/// A builder for an [`Encoder`].
#[derive(Debug, Default)]
pub struct Builder {
    threshold: Option<f64>,
    chromosome: Option<String>,
}

impl Builder {
    /// Returns a new encoder.
    ///
    /// # Errors
    ///
    /// If the minor allele frequency threshold is invalid.
    pub fn build(self) -> Result<Encoder, ThresholdError> {
        let filter = match self.threshold {
            Some(threshold) => MafFilter::new(threshold)?,
            None => MafFilter::default(),
        };

        let chromosome = self
            .chromosome
            .unwrap_or_else(|| bim::DEFAULT_CHROMOSOME.to_string());

        Ok(Encoder { filter, chromosome })
    }

    /// Sets the chromosome label used in the variant table.
    ///
    /// By default, [`bim::DEFAULT_CHROMOSOME`] is used.
    pub fn set_chromosome<S>(mut self, chromosome: S) -> Self
    where
        S: ToString,
    {
        self.chromosome = Some(chromosome.to_string());
        self
    }

    /// Sets the minor allele frequency threshold.
    ///
    /// By default, [`MafFilter::DEFAULT_THRESHOLD`] is used.
    pub fn set_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }
}

/// An encoder of variants into a binary genotype fileset.
#[derive(Clone, Debug)]
pub struct Encoder {
    filter: MafFilter,
    chromosome: String,
}

impl Encoder {
    /// Encodes all variants in the reader into the provided writer.
    ///
    /// The writer must have been created with one individual per sample of the reader.
    pub fn encode<R, W>(
        &self,
        reader: &mut R,
        writer: &mut plink::Writer<W>,
    ) -> Result<Summary, Error>
    where
        R: variant::Reader + ?Sized,
        W: io::Write,
    {
        self.encode_with(reader, |record, dosages| {
            writer.write_variant(record, dosages)
        })
    }

    /// Encodes all variants in the reader into a fileset on disk.
    ///
    /// The fileset only appears under its final paths if all outputs were completely written.
    pub fn encode_to_fileset<R>(&self, reader: &mut R, fileset: Fileset) -> Result<Summary, Error>
    where
        R: variant::Reader + ?Sized,
    {
        let individuals = Individual::synthesize(reader.samples().len());
        let mut writer = plink::FileWriter::create(fileset, &individuals)?;

        let summary = self.encode_with(reader, |record, dosages| {
            writer.write_variant(record, dosages)
        })?;

        let fileset = writer.finish()?;
        log::debug!(
            "Wrote fileset '{}', '{}', '{}'",
            fileset.fam().display(),
            fileset.bim().display(),
            fileset.bed().display()
        );

        Ok(summary)
    }

    fn encode_with<R, F>(&self, reader: &mut R, mut write: F) -> Result<Summary, Error>
    where
        R: variant::Reader + ?Sized,
        F: FnMut(&bim::Record, &[Dosage]) -> io::Result<()>,
    {
        let mut reducer = DosageReducer::new(reader.samples().len());
        let mut summary = Summary::new(reducer.individuals());

        loop {
            let variant = match reader.read_variant() {
                ReadStatus::Read(variant) => variant,
                ReadStatus::Error(e) => return Err(Error::Io(e)),
                ReadStatus::Done => break,
            };
            summary.read += 1;

            if !self.filter.retains(&variant) {
                log::trace!(
                    "Filtered variant at {}:{}",
                    reader.current_contig(),
                    reader.current_position()
                );
                continue;
            }

            let dosages = reducer.reduce(&variant)?;
            write(&self.record(&variant), &dosages)?;
            summary.retained += 1;
        }

        summary.clamped = reducer.clamped();
        if summary.clamped > 0 {
            log::warn!(
                "Clamped {} out-of-range dosages to 2, input may be corrupt.",
                summary.clamped
            );
        }

        Ok(summary)
    }

    /// Returns the minor allele frequency filter.
    pub fn filter(&self) -> &MafFilter {
        &self.filter
    }

    fn record(&self, variant: &Variant) -> bim::Record {
        bim::Record::from_variant(&self.chromosome, variant)
    }
}

/// A summary of an encoding run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    /// Number of variants read.
    pub read: usize,
    /// Number of variants passing the filter and written.
    pub retained: usize,
    /// Number of individuals.
    pub individuals: usize,
    /// Number of out-of-range dosages clamped.
    pub clamped: usize,
}

impl Summary {
    fn new(individuals: usize) -> Self {
        Self {
            individuals,
            ..Default::default()
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "retained {} of {} variants for {} individuals",
            self.retained, self.read, self.individuals
        )
    }
}

/// An error associated with encoding.
#[derive(Debug)]
pub enum Error {
    /// I/O error.
    Io(io::Error),
    /// A variant was not diploid.
    Ploidy(PloidyError),
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<PloidyError> for Error {
    fn from(e: PloidyError) -> Self {
        Self::Ploidy(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "{e}"),
            Error::Ploidy(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {}
