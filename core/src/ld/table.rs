//! Whitespace-separated tables with a header row.

use std::{fmt, io, str::SplitAsciiWhitespace};

/// The header row of a table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Header {
    columns: Vec<String>,
}

impl Header {
    /// Creates a header from a line.
    ///
    /// A leading `#` on the first column name is ignored.
    pub fn from_line(line: &str) -> Self {
        let columns = line
            .split_ascii_whitespace()
            .enumerate()
            .map(|(i, name)| match i {
                0 => name.trim_start_matches('#').to_string(),
                _ => name.to_string(),
            })
            .collect();

        Self { columns }
    }

    /// Returns the names of the columns.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns `true` if the header has a column with the provided name.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Returns the index of the column with the provided name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Returns the first of the candidates found in the header, with its index.
    pub fn find<'a>(&self, candidates: &[&'a str]) -> Option<(&'a str, usize)> {
        candidates
            .iter()
            .find_map(|&name| self.position(name).map(|i| (name, i)))
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.columns.join(", "))
    }
}

/// A single data row of a table.
#[derive(Clone, Debug, Default)]
pub struct Record {
    number: usize,
    line: String,
}

impl Record {
    /// Returns the 1-based line number of the row in the input.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Returns an iterator over the fields of the row.
    pub fn fields(&self) -> SplitAsciiWhitespace<'_> {
        self.line.split_ascii_whitespace()
    }

    /// Returns the fields at the provided column indices.
    ///
    /// Returns the first missing index as the error if the row is too short.
    pub fn select<const N: usize>(&self, indices: [usize; N]) -> Result<[&str; N], usize> {
        let max = indices.iter().copied().max().unwrap_or(0);
        let fields = self.fields().take(max + 1).collect::<Vec<_>>();

        let mut selected = [""; N];
        for (dest, index) in selected.iter_mut().zip(indices) {
            *dest = fields.get(index).copied().ok_or(index)?;
        }

        Ok(selected)
    }
}

/// A reader of a table, reading the header on creation.
#[derive(Debug)]
pub struct Reader<R> {
    inner: R,
    header: Header,
    lines: usize,
}

impl<R> Reader<R>
where
    R: io::BufRead,
{
    /// Creates a new reader, reading the header from the first non-blank line.
    pub fn new(mut inner: R) -> io::Result<Self> {
        let mut buf = String::new();
        let mut lines = 0;

        loop {
            buf.clear();
            if inner.read_line(&mut buf)? == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "missing header row",
                ));
            }
            lines += 1;

            if !buf.trim().is_empty() {
                break;
            }
        }

        Ok(Self {
            inner,
            header: Header::from_line(&buf),
            lines,
        })
    }

    /// Returns the header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Reads the next non-blank row into the record.
    ///
    /// Returns `false` once the input is exhausted.
    pub fn read_record(&mut self, record: &mut Record) -> io::Result<bool> {
        loop {
            record.line.clear();
            if self.inner.read_line(&mut record.line)? == 0 {
                return Ok(false);
            }
            self.lines += 1;

            if !record.line.trim().is_empty() {
                record.number = self.lines;
                return Ok(true);
            }
        }
    }
}

/// Parses a numeric field, treating `NA`, `.`, and empty fields as missing.
pub fn parse_value(s: &str) -> Option<f64> {
    match s {
        "" | "." | "NA" => Some(f64::NAN),
        s => s.parse().ok(),
    }
}
