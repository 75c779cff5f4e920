//! Allele frequency tables.
//!
//! The schema of a frequency table is not known up front. Schemas are tried in order, and the
//! first one with its column present in the header is used:
//!
//! 1. `MAF`: a precomputed minor allele frequency, used as is.
//! 2. `ALT_FREQS`: a comma-separated list of alternate allele frequencies. The minor allele
//!    frequency is the smallest of these and the implied reference frequency.
//! 3. `ALT_FREQ`: a single alternate allele frequency, folded.
//! 4. `A1_FREQ`: a single allele 1 frequency, folded.

use std::io;

use super::{
    table::{self, Header, Record},
    Error,
};

/// Identifier columns, in order of priority.
pub const ID_COLUMNS: [&str; 2] = ["ID", "SNP"];

/// Returns the folded frequency, `min(f, 1 - f)`.
pub fn fold(frequency: f64) -> f64 {
    frequency.min(1.0 - frequency)
}

/// Returns the minor allele frequency from a comma-separated list of alternate allele
/// frequencies.
///
/// Empty, missing, and non-finite tokens are ignored, and frequencies are clipped to [0, 1].
/// Returns NaN if no frequencies remain, and `None` if a token cannot be parsed.
pub fn maf_from_alt_freqs(s: &str) -> Option<f64> {
    let mut alternates = Vec::new();

    for token in s.split(',').filter(|t| !matches!(*t, "" | "." | "NA")) {
        let frequency = token.parse::<f64>().ok()?;

        if frequency.is_finite() {
            alternates.push(frequency.clamp(0.0, 1.0));
        }
    }

    if alternates.is_empty() {
        return Some(f64::NAN);
    }

    let reference = (1.0 - alternates.iter().sum::<f64>()).max(0.0);

    Some(alternates.into_iter().fold(reference, f64::min))
}

/// A schema of a frequency table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Schema {
    /// Precomputed minor allele frequency.
    Maf,
    /// Multiple alternate allele frequencies.
    AltFreqs,
    /// Single alternate allele frequency.
    AltFreq,
    /// Single allele 1 frequency.
    A1Freq,
}

impl Schema {
    /// All schemas, in order of priority.
    pub const ALL: [Schema; 4] = [Self::Maf, Self::AltFreqs, Self::AltFreq, Self::A1Freq];

    /// Returns the name of the column read by the schema.
    pub fn column(&self) -> &'static str {
        match self {
            Schema::Maf => "MAF",
            Schema::AltFreqs => "ALT_FREQS",
            Schema::AltFreq => "ALT_FREQ",
            Schema::A1Freq => "A1_FREQ",
        }
    }

    /// Returns the first schema with its column present in the header, with the column index.
    pub fn detect(header: &Header) -> Option<(Self, usize)> {
        Self::ALL
            .into_iter()
            .find_map(|schema| header.position(schema.column()).map(|i| (schema, i)))
    }

    /// Returns the minor allele frequency from a field in the schema column.
    pub fn maf(&self, field: &str) -> Option<f64> {
        match self {
            Schema::Maf => table::parse_value(field),
            Schema::AltFreqs => maf_from_alt_freqs(field),
            Schema::AltFreq | Schema::A1Freq => table::parse_value(field).map(fold),
        }
    }
}

/// A table of variant ids and their minor allele frequencies, in input order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrequencyTable {
    ids: Vec<String>,
    mafs: Vec<f64>,
}

impl FrequencyTable {
    /// Reads a frequency table.
    ///
    /// # Errors
    ///
    /// If no identifier column or no frequency column is found, if a field cannot be parsed, or
    /// on I/O errors.
    pub fn read<R>(reader: R) -> Result<Self, Error>
    where
        R: io::BufRead,
    {
        let mut reader = table::Reader::new(reader)?;
        let header = reader.header();

        let (_, id_column) = header
            .find(&ID_COLUMNS)
            .ok_or_else(|| Error::missing_columns("a variant ID column (ID or SNP)", header))?;

        let (schema, frequency_column) = Schema::detect(header).ok_or_else(|| {
            Error::missing_columns("a frequency column (MAF/ALT_FREQS/ALT_FREQ/A1_FREQ)", header)
        })?;

        log::debug!("Reading frequencies from column '{}'", schema.column());

        let mut table = Self::default();
        let mut record = Record::default();

        while reader.read_record(&mut record)? {
            let [id, field] = record
                .select([id_column, frequency_column])
                .map_err(|_| Error::MissingField {
                    line: record.number(),
                })?;

            let maf = schema.maf(field).ok_or_else(|| Error::ParseValue {
                line: record.number(),
                column: schema.column().to_string(),
                value: field.to_string(),
            })?;

            table.push(id, maf);
        }

        Ok(table)
    }

    /// Adds a variant to the end of the table.
    pub fn push<S>(&mut self, id: S, maf: f64)
    where
        S: ToString,
    {
        self.ids.push(id.to_string());
        self.mafs.push(maf);
    }

    /// Returns `true` if the table has no variants.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns an iterator over variant ids and minor allele frequencies.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.ids
            .iter()
            .map(String::as_str)
            .zip(self.mafs.iter().copied())
    }

    /// Returns the number of variants.
    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

impl<S> FromIterator<(S, f64)> for FrequencyTable
where
    S: ToString,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
    {
        let mut table = Self::default();
        iter.into_iter().for_each(|(id, maf)| table.push(id, maf));
        table
    }
}
