//! The individual table.

use std::{fmt, io};

/// Parental id, sex, and phenotype are fixed for simulated individuals.
const FATHER: &str = "0";
const MOTHER: &str = "0";
const SEX: &str = "0";
const PHENOTYPE: &str = "-9";

/// A simulated individual.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Individual {
    family_id: String,
    individual_id: String,
}

impl Individual {
    /// Creates the individual with the provided 1-based ordinal.
    pub fn from_ordinal(ordinal: usize) -> Self {
        let id = format!("indiv{ordinal}");

        Self {
            family_id: id.clone(),
            individual_id: id,
        }
    }

    /// Creates the provided number of individuals, numbered from one.
    pub fn synthesize(n: usize) -> Vec<Self> {
        (1..=n).map(Self::from_ordinal).collect()
    }

    /// Returns the family id.
    pub fn family_id(&self) -> &str {
        &self.family_id
    }

    /// Returns the individual id.
    pub fn individual_id(&self) -> &str {
        &self.individual_id
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {FATHER} {MOTHER} {SEX} {PHENOTYPE}",
            self.family_id, self.individual_id
        )
    }
}

/// Writes the individual table, one individual per line.
pub fn write_individuals<W>(writer: &mut W, individuals: &[Individual]) -> io::Result<()>
where
    W: io::Write,
{
    for individual in individuals {
        writeln!(writer, "{individual}")?;
    }

    Ok(())
}
