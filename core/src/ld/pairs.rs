//! Chunked reading of pairwise LD tables.

use std::{io, num::NonZeroUsize};

use super::{
    table::{self, Header, Record},
    Error,
};

/// Identifier column pairs, in order of priority.
pub const ID_COLUMNS: [[&str; 2]; 2] = [["ID_A", "ID_B"], ["SNP_A", "SNP_B"]];

/// Squared correlation columns, in order of priority.
pub const R2_COLUMNS: [&str; 3] = ["R2", "UNPHASED_R2", "PHASED_R2"];

/// Correlation columns, in order of priority. These are only used if no squared correlation
/// column is found.
pub const R_COLUMNS: [&str; 3] = ["R", "UNPHASED_R", "PHASED_R"];

/// The kind of LD value in a table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    /// Squared correlation, used as is.
    Squared,
    /// Correlation, squared before use.
    Correlation,
}

impl Kind {
    /// Returns the squared correlation for a value of this kind.
    pub fn to_squared(self, value: f64) -> f64 {
        match self {
            Kind::Squared => value,
            Kind::Correlation => value * value,
        }
    }
}

/// The resolved columns of a pairwise LD table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Columns {
    id_a: usize,
    id_b: usize,
    ld: usize,
    ld_name: &'static str,
    kind: Kind,
}

impl Columns {
    /// Resolves the identifier and LD columns from a header.
    ///
    /// # Errors
    ///
    /// If no identifier pair or no LD column is found.
    pub fn resolve(header: &Header) -> Result<Self, Error> {
        let (id_a, id_b) = ID_COLUMNS
            .iter()
            .find_map(|[a, b]| Some((header.position(a)?, header.position(b)?)))
            .ok_or_else(|| Error::missing_columns("ID_A/ID_B or SNP_A/SNP_B", header))?;

        let (ld_name, ld, kind) = header
            .find(&R2_COLUMNS)
            .map(|(name, i)| (name, i, Kind::Squared))
            .or_else(|| {
                header
                    .find(&R_COLUMNS)
                    .map(|(name, i)| (name, i, Kind::Correlation))
            })
            .ok_or_else(|| {
                Error::missing_columns(
                    "an LD column (R2/UNPHASED_R2/PHASED_R2 or R/UNPHASED_R/PHASED_R)",
                    header,
                )
            })?;

        Ok(Self {
            id_a,
            id_b,
            ld,
            ld_name,
            kind,
        })
    }

    /// Returns the name of the LD column.
    pub fn ld_name(&self) -> &'static str {
        self.ld_name
    }

    /// Returns the kind of LD value.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    fn parse(&self, record: &Record) -> Result<Pair, Error> {
        let [a, b, raw] = record
            .select([self.id_a, self.id_b, self.ld])
            .map_err(|_| Error::MissingField {
                line: record.number(),
            })?;

        let value = table::parse_value(raw).ok_or_else(|| Error::ParseValue {
            line: record.number(),
            column: self.ld_name.to_string(),
            value: raw.to_string(),
        })?;

        Ok(Pair {
            a: a.to_string(),
            b: b.to_string(),
            r2: self.kind.to_squared(value),
        })
    }
}

/// A single pairwise LD record.
#[derive(Clone, Debug, PartialEq)]
pub struct Pair {
    /// First variant id.
    pub a: String,
    /// Second variant id.
    pub b: String,
    /// Squared correlation between the variants.
    pub r2: f64,
}

/// A reader of pairwise LD tables, yielding records in bounded chunks.
pub struct Reader<R> {
    inner: table::Reader<R>,
    columns: Columns,
    chunk_size: NonZeroUsize,
    record: Record,
    chunk: Vec<Pair>,
}

impl<R> Reader<R>
where
    R: io::BufRead,
{
    /// Creates a new reader, reading the header and resolving columns.
    pub fn new(inner: R, chunk_size: NonZeroUsize) -> Result<Self, Error> {
        let inner = table::Reader::new(inner)?;
        let columns = Columns::resolve(inner.header())?;

        log::debug!(
            "Using LD column '{}' ({:?}) from pairwise table",
            columns.ld_name(),
            columns.kind()
        );

        Ok(Self {
            inner,
            columns,
            chunk_size,
            record: Record::default(),
            chunk: Vec::with_capacity(chunk_size.get().min(1 << 16)),
        })
    }

    /// Returns the resolved columns.
    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    /// Reads the next chunk of at most the chunk size records.
    ///
    /// Returns `None` once the input is exhausted.
    pub fn read_chunk(&mut self) -> Result<Option<&[Pair]>, Error> {
        self.chunk.clear();

        while self.chunk.len() < self.chunk_size.get() {
            if !self.inner.read_record(&mut self.record)? {
                break;
            }

            self.chunk.push(self.columns.parse(&self.record)?);
        }

        if self.chunk.is_empty() {
            Ok(None)
        } else {
            Ok(Some(&self.chunk))
        }
    }
}
