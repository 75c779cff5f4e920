//! The variant table.
//!
//! Each line holds the chromosome, the variant id, a centimorgan placeholder, the position,
//! and then the alternate allele followed by the reference allele. The reference allele takes
//! the second allele column, which downstream tooling reads as the major allele.

use std::{fmt, io};

use crate::variant::{Alleles, Variant};

/// The default chromosome label.
pub const DEFAULT_CHROMOSOME: &str = "1";

const CENTIMORGAN: &str = "0";

/// A single line of the variant table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    chromosome: String,
    position: usize,
    alleles: Alleles,
}

impl Record {
    /// Creates a new record.
    pub fn new<S>(chromosome: S, position: usize, alleles: Alleles) -> Self
    where
        S: ToString,
    {
        Self {
            chromosome: chromosome.to_string(),
            position,
            alleles,
        }
    }

    /// Creates a record for a variant on the provided chromosome.
    pub fn from_variant(chromosome: &str, variant: &Variant) -> Self {
        Self::new(chromosome, variant.position(), variant.alleles().clone())
    }

    /// Returns the variant id, `<chromosome>:<position>`.
    pub fn id(&self) -> String {
        format!("{}:{}", self.chromosome, self.position)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{chrom}\t{chrom}:{pos}\t{CENTIMORGAN}\t{pos}\t{alt}\t{reference}",
            chrom = self.chromosome,
            pos = self.position,
            alt = self.alleles.alternate(),
            reference = self.alleles.reference(),
        )
    }
}

/// Writes the variant table, one record per line.
pub fn write_variants<W>(writer: &mut W, records: &[Record]) -> io::Result<()>
where
    W: io::Write,
{
    for record in records {
        writeln!(writer, "{record}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_alternate_before_reference() {
        let record = Record::new(DEFAULT_CHROMOSOME, 1234, Alleles::new("C", "T"));

        assert_eq!(record.to_string(), "1\t1:1234\t0\t1234\tT\tC");
        assert_eq!(record.id(), "1:1234");
    }

    #[test]
    fn test_write_variants() -> io::Result<()> {
        let records = vec![
            Record::new("1", 10, Alleles::new("A", "G")),
            Record::new("1", 25, Alleles::placeholder()),
        ];

        let mut dest = Vec::new();
        write_variants(&mut dest, &records)?;

        assert_eq!(
            String::from_utf8(dest).unwrap(),
            "1\t1:10\t0\t10\tG\tA\n1\t1:25\t0\t25\tG\tA\n"
        );

        Ok(())
    }
}
