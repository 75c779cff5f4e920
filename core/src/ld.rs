//! Streaming LD scores.
//!
//! A pairwise LD table is read in bounded chunks, and each pair contributes its squared
//! correlation to both of its variants. The accumulated sums are then joined onto an allele
//! frequency table to give a [`Report`] of minor allele frequency and LD score per variant.

use std::{fmt, io, num::NonZeroUsize};

pub mod accumulator;
pub use accumulator::Accumulator;

pub mod freq;
pub use freq::FrequencyTable;

pub mod pairs;

pub mod report;
pub use report::Report;

pub mod table;

/// A builder for streaming LD score computations.
#[derive(Clone, Copy, Debug)]
pub struct Builder {
    chunk_size: NonZeroUsize,
}

impl Builder {
    /// The default number of pairwise records held in memory at once.
    pub const DEFAULT_CHUNK_SIZE: usize = 1_000_000;

    /// Accumulates LD sums from a pairwise LD table.
    pub fn accumulate<R>(&self, reader: R) -> Result<Accumulator, Error>
    where
        R: io::BufRead,
    {
        let mut reader = pairs::Reader::new(reader, self.chunk_size)?;
        let mut accumulator = Accumulator::default();

        let mut chunks = 0;
        while let Some(chunk) = reader.read_chunk()? {
            accumulator.add_chunk(chunk);
            chunks += 1;

            log::trace!("Accumulated chunk {chunks} of {} pairs", chunk.len());
        }

        log::debug!(
            "Accumulated LD sums for {} variants in {chunks} chunks",
            accumulator.len()
        );

        Ok(accumulator)
    }

    /// Accumulates LD sums from a pairwise LD table and joins them onto a frequency table.
    pub fn report<P, F>(&self, pairs: P, frequencies: F) -> Result<Report, Error>
    where
        P: io::BufRead,
        F: io::BufRead,
    {
        let accumulator = self.accumulate(pairs)?;
        let table = FrequencyTable::read(frequencies)?;

        Ok(Report::join(&table, &accumulator))
    }

    /// Returns the chunk size.
    pub fn chunk_size(&self) -> NonZeroUsize {
        self.chunk_size
    }

    /// Sets the maximum number of pairwise records held in memory at once.
    ///
    /// By default, [`Builder::DEFAULT_CHUNK_SIZE`] is used.
    pub fn set_chunk_size(mut self, chunk_size: NonZeroUsize) -> Self {
        self.chunk_size = chunk_size;
        self
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            chunk_size: NonZeroUsize::new(Self::DEFAULT_CHUNK_SIZE)
                .unwrap_or(NonZeroUsize::MIN),
        }
    }
}

/// An error associated with reading LD and frequency tables.
#[derive(Debug)]
pub enum Error {
    /// I/O error.
    Io(io::Error),
    /// Required columns were not found in the header.
    MissingColumns {
        /// Description of the expected columns.
        expected: String,
        /// Names of the columns found.
        found: Vec<String>,
    },
    /// A row was too short to hold a required column.
    MissingField {
        /// Line number of the row.
        line: usize,
    },
    /// A value could not be parsed.
    ParseValue {
        /// Line number of the row.
        line: usize,
        /// Name of the column.
        column: String,
        /// Raw value.
        value: String,
    },
}

impl Error {
    pub(crate) fn missing_columns(expected: &str, header: &table::Header) -> Self {
        Self::MissingColumns {
            expected: expected.to_string(),
            found: header.columns().to_vec(),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "{e}"),
            Error::MissingColumns { expected, found } => {
                write!(f, "expected {expected}, found columns [{}]", found.join(", "))
            }
            Error::MissingField { line } => write!(f, "too few fields on line {line}"),
            Error::ParseValue {
                line,
                column,
                value,
            } => write!(
                f,
                "failed to parse value '{value}' in column {column} on line {line}"
            ),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    const PAIRS: &str = "\
#CHROM_A\tPOS_A\tID_A\tCHROM_B\tPOS_B\tID_B\tUNPHASED_R2
1\t100\tv1\t1\t200\tv2\t0.4
1\t100\tv1\t1\t300\tv3\t0.2
1\t200\tv2\t1\t300\tv3\t0.1
1\t300\tv3\t1\t400\tv9\t0.3
";

    const FREQUENCIES: &str = "\
#CHROM\tID\tREF\tALT\tALT_FREQS\tOBS_CT
1\tv1\tA\tG\t0.9\t100
1\tv2\tA\tG\t0.2\t100
1\tv3\tA\tG\t0.1,0.2,.\t100
1\tv4\tA\tG\t0.5\t100
";

    #[test]
    fn test_report() -> Result<(), Error> {
        let report = Builder::default().report(PAIRS.as_bytes(), FREQUENCIES.as_bytes())?;

        let rows = report
            .rows()
            .iter()
            .map(|row| (row.id(), row.maf(), row.ld()))
            .collect::<Vec<_>>();

        let expected = [
            ("v1", 0.1, 1.6),
            ("v2", 0.2, 1.5),
            ("v3", 0.1, 1.6),
            ("v4", 0.5, 1.0),
        ];

        assert_eq!(rows.len(), expected.len());
        for ((id, maf, ld), (expected_id, expected_maf, expected_ld)) in rows.into_iter().zip(expected)
        {
            assert_eq!(id, expected_id);
            assert_approx_eq!(maf, expected_maf, epsilon = 1e-12);
            assert_approx_eq!(ld, expected_ld, epsilon = 1e-12);
        }

        Ok(())
    }

    #[test]
    fn test_accumulate_chunk_size_independence() -> Result<(), Error> {
        let all = Builder::default().accumulate(PAIRS.as_bytes())?;

        for chunk_size in [1, 2, 3, 10_000] {
            let chunked = Builder::default()
                .set_chunk_size(NonZeroUsize::new(chunk_size).unwrap())
                .accumulate(PAIRS.as_bytes())?;

            assert_eq!(chunked, all);
        }

        Ok(())
    }

    #[test]
    fn test_missing_columns_display() {
        let header = table::Header::from_line("#CHROM ID REF ALT");
        let e = Error::missing_columns("a frequency column", &header);

        assert_eq!(
            e.to_string(),
            "expected a frequency column, found columns [CHROM, ID, REF, ALT]"
        );
    }

    #[test]
    fn test_empty_pairs_table() -> Result<(), Error> {
        let report = Builder::default().report("ID_A ID_B R2\n".as_bytes(), "ID MAF\nv1 0.3\n".as_bytes())?;

        assert_eq!(report.rows()[0].ld(), 1.0);

        Ok(())
    }
}
