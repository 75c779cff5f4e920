//! The joined MAF and LD score report.

use std::{collections::HashSet, fmt, io};

use super::{
    table::{self, Record},
    Accumulator, Error, FrequencyTable,
};

/// The contribution of a variant's correlation with itself to its LD score.
pub const SELF_TERM: f64 = 1.0;

/// The header row of a report.
pub const HEADER: [&str; 2] = ["MAF", "LD"];

/// A single row of a report.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    id: String,
    maf: f64,
    ld: f64,
}

impl Row {
    /// Returns the variant id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the LD score, including the self-term.
    pub fn ld(&self) -> f64 {
        self.ld
    }

    /// Returns the minor allele frequency.
    pub fn maf(&self) -> f64 {
        self.maf
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", Float(self.maf), Float(self.ld))
    }
}

/// A report of minor allele frequencies and LD scores, one row per frequency table variant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
    rows: Vec<Row>,
}

impl Report {
    /// Joins accumulated LD sums onto a frequency table.
    ///
    /// Rows follow the order of the frequency table. Variants without pairwise records get only
    /// the self-term, and variants absent from the frequency table are dropped.
    pub fn join(table: &FrequencyTable, accumulator: &Accumulator) -> Self {
        let rows = table
            .iter()
            .map(|(id, maf)| Row {
                id: id.to_string(),
                maf,
                ld: accumulator.get_or_zero(id) + SELF_TERM,
            })
            .collect::<Vec<_>>();

        let dropped = count_unmatched(table, accumulator);
        if dropped > 0 {
            log::debug!("Dropped {dropped} variants without frequencies from report");
        }

        Self { rows }
    }

    /// Returns `true` if the report has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns the rows of the report.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Writes the report as a tab-separated table with a header row.
    pub fn write<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        writeln!(writer, "{}", HEADER.join("\t"))?;

        for row in self.rows.iter() {
            writeln!(writer, "{row}")?;
        }

        writer.flush()
    }
}

/// Returns the number of distinct accumulated variants absent from the frequency table.
fn count_unmatched(table: &FrequencyTable, accumulator: &Accumulator) -> usize {
    let ids = table.iter().map(|(id, _)| id).collect::<HashSet<_>>();

    accumulator
        .iter()
        .filter(|(id, _)| !ids.contains(id))
        .count()
}

/// A float formatted in shortest round-trip form, with integral values given one decimal.
struct Float(f64);

impl fmt::Display for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;

        if v.is_nan() {
            f.write_str("nan")
        } else if v.is_finite() && v.fract() == 0.0 {
            write!(f, "{v}.0")
        } else {
            write!(f, "{v}")
        }
    }
}

/// The mean and sample variance of a column of values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Moments {
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample variance, with denominator n - 1.
    pub variance: f64,
}

impl Moments {
    /// Returns the moments of the values.
    ///
    /// The mean of no values and the variance of fewer than two values are NaN.
    pub fn from_values(values: &[f64]) -> Self {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;

        let variance = match values.len() {
            0 | 1 => f64::NAN,
            _ => values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0),
        };

        Self { mean, variance }
    }
}

impl fmt::Display for Moments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Mean: {:.4}, Variance: {:.4}",
            self.mean, self.variance
        )
    }
}

/// Reads a report and returns the moments of each column, in header order.
///
/// # Errors
///
/// If the report has no header, a row is too short, a value cannot be parsed, or on I/O errors.
pub fn summarize<R>(reader: R) -> Result<Vec<(String, Moments)>, Error>
where
    R: io::BufRead,
{
    let mut reader = table::Reader::new(reader)?;
    let names = reader.header().columns().to_vec();

    let mut columns = vec![Vec::new(); names.len()];
    let mut record = Record::default();

    while reader.read_record(&mut record)? {
        let mut fields = record.fields();

        for (name, column) in names.iter().zip(columns.iter_mut()) {
            let field = fields.next().ok_or(Error::MissingField {
                line: record.number(),
            })?;

            let value = table::parse_value(field).ok_or_else(|| Error::ParseValue {
                line: record.number(),
                column: name.clone(),
                value: field.to_string(),
            })?;

            column.push(value);
        }
    }

    Ok(names
        .into_iter()
        .zip(columns.iter().map(|values| Moments::from_values(values)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::ld::pairs::Pair;

    fn accumulator(pairs: &[(&str, &str, f64)]) -> Accumulator {
        let mut accumulator = Accumulator::default();
        for &(a, b, r2) in pairs {
            accumulator.add(&Pair {
                a: a.to_string(),
                b: b.to_string(),
                r2,
            });
        }
        accumulator
    }

    fn render(report: &Report) -> String {
        let mut buf = Vec::new();
        report.write(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_join_symmetric_pair() {
        let table = FrequencyTable::from_iter([("v1", 0.1), ("v2", 0.2)]);
        let report = Report::join(&table, &accumulator(&[("v1", "v2", 0.4)]));

        assert_eq!(report.len(), 2);
        assert_eq!(report.rows()[0].id(), "v1");
        assert_approx_eq!(report.rows()[0].ld(), 1.4, epsilon = 1e-12);
        assert_approx_eq!(report.rows()[1].ld(), 1.4, epsilon = 1e-12);
    }

    #[test]
    fn test_join_follows_frequency_table() {
        let table = FrequencyTable::from_iter([("v3", 0.3), ("v1", 0.1)]);
        let report = Report::join(&table, &accumulator(&[("v1", "v2", 0.5), ("v2", "v4", 0.25)]));

        let ids = report.rows().iter().map(Row::id).collect::<Vec<_>>();
        assert_eq!(ids, ["v3", "v1"]);
        assert_eq!(report.rows()[0].ld(), 1.0);
        assert_eq!(report.rows()[1].ld(), 1.5);
    }

    #[test]
    fn test_count_unmatched_repeated_ids() {
        let table = FrequencyTable::from_iter([("v1", 0.1), ("v1", 0.1), ("v2", 0.2)]);
        let accumulator = accumulator(&[("v1", "v3", 0.5), ("v4", "v5", 0.25)]);

        assert_eq!(count_unmatched(&table, &accumulator), 3);

        let report = Report::join(&table, &accumulator);
        assert_eq!(report.len(), 3);
        assert_eq!(report.rows()[1].ld(), 1.5);
    }

    #[test]
    fn test_write() {
        let table = FrequencyTable::from_iter([("v1", 0.1), ("v2", 0.5), ("v3", f64::NAN)]);
        let report = Report::join(&table, &accumulator(&[("v1", "v2", 0.25)]));

        assert_eq!(
            render(&report),
            "MAF\tLD\n0.1\t1.25\n0.5\t1.25\nnan\t1.0\n"
        );
    }

    #[test]
    fn test_write_empty() {
        let report = Report::join(&FrequencyTable::default(), &Accumulator::default());

        assert!(report.is_empty());
        assert_eq!(render(&report), "MAF\tLD\n");
    }

    #[test]
    fn test_moments() {
        let moments = Moments::from_values(&[1.0, 2.0, 3.0, 4.0]);

        assert_approx_eq!(moments.mean, 2.5, epsilon = 1e-12);
        assert_approx_eq!(moments.variance, 5.0 / 3.0, epsilon = 1e-12);
        assert_eq!(moments.to_string(), "Mean: 2.5000, Variance: 1.6667");
    }

    #[test]
    fn test_moments_single_value() {
        let moments = Moments::from_values(&[0.2]);

        assert_approx_eq!(moments.mean, 0.2, epsilon = 1e-12);
        assert!(moments.variance.is_nan());
    }

    #[test]
    fn test_summarize() -> Result<(), Error> {
        let src = b"MAF\tLD\n0.1\t1.5\n0.3\t2.5\n";
        let summary = summarize(&src[..])?;

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].0, "MAF");
        assert_approx_eq!(summary[0].1.mean, 0.2, epsilon = 1e-12);
        assert_approx_eq!(summary[0].1.variance, 0.02, epsilon = 1e-12);
        assert_eq!(summary[1].0, "LD");
        assert_approx_eq!(summary[1].1.mean, 2.0, epsilon = 1e-12);
        assert_approx_eq!(summary[1].1.variance, 0.5, epsilon = 1e-12);

        Ok(())
    }

    #[test]
    fn test_summarize_short_row() {
        assert!(matches!(
            summarize(&b"MAF\tLD\n0.1\n"[..]),
            Err(Error::MissingField { line: 2 })
        ));
    }
}
