use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter},
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use anyhow::{Context, Error};

use clap::Parser;

use genosim_core::ld;

/// The name of the report written to the output directory.
const REPORT_NAME: &str = "maf_ld.txt";

/// Compute LD scores from pairwise correlations and join them with allele frequencies.
///
/// Writes a tab-separated report with one row of MAF and LD score per variant in the frequency
/// table, in the order of the frequency table.
#[derive(Debug, Parser)]
pub struct LdScore {
    /// Pairwise LD table.
    ///
    /// Must have a header with identifier columns ID_A and ID_B (or SNP_A and SNP_B), and an
    /// R2, UNPHASED_R2, or PHASED_R2 column. If no squared correlation is found, R, UNPHASED_R,
    /// or PHASED_R is used and squared.
    #[arg(long, value_name = "PATH")]
    vcor: PathBuf,

    /// Allele frequency table.
    ///
    /// Must have a header with an ID (or SNP) column and one of MAF, ALT_FREQS, ALT_FREQ, or
    /// A1_FREQ, used in that order of priority.
    #[arg(long, value_name = "PATH")]
    afreq: PathBuf,

    /// Output directory.
    ///
    /// If provided, the report is written to 'maf_ld.txt' in this directory, which is created if
    /// needed. Otherwise, the report is written to stdout.
    #[arg(short = 'o', long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Maximum number of pairwise records held in memory at once.
    #[arg(
        long,
        default_value_t = NonZeroUsize::new(ld::Builder::DEFAULT_CHUNK_SIZE).unwrap(),
        value_name = "INT"
    )]
    chunk_size: NonZeroUsize,
}

fn open(path: &Path) -> Result<BufReader<File>, Error> {
    File::open(path)
        .map(BufReader::new)
        .with_context(|| format!("failed to open '{}'", path.display()))
}

impl LdScore {
    pub fn run(self) -> Result<(), Error> {
        let builder = ld::Builder::default().set_chunk_size(self.chunk_size);

        let accumulator = builder
            .accumulate(open(&self.vcor)?)
            .with_context(|| format!("failed to read LD table '{}'", self.vcor.display()))?;

        log::info!(
            "Accumulated LD sums for {} variants from '{}'",
            accumulator.len(),
            self.vcor.display()
        );

        let table = ld::FrequencyTable::read(open(&self.afreq)?).with_context(|| {
            format!(
                "failed to read frequency table '{}'",
                self.afreq.display()
            )
        })?;

        log::info!(
            "Read frequencies for {} variants from '{}'",
            table.len(),
            self.afreq.display()
        );

        let report = ld::Report::join(&table, &accumulator);

        match self.out {
            Some(dir) => {
                fs::create_dir_all(&dir).with_context(|| {
                    format!("failed to create output directory '{}'", dir.display())
                })?;

                let path = dir.join(REPORT_NAME);
                let mut writer = File::create(&path)
                    .map(BufWriter::new)
                    .with_context(|| format!("failed to create '{}'", path.display()))?;

                report
                    .write(&mut writer)
                    .with_context(|| format!("failed to write '{}'", path.display()))?;

                log::info!("Wrote {} rows to '{}'", report.len(), path.display());
            }
            None => report.write(&mut io::stdout().lock())?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::error::ErrorKind as ClapErrorKind;

    use crate::tests::{parse_subcmd, try_parse_subcmd};

    #[test]
    fn test_defaults() {
        let args = parse_subcmd::<LdScore>("genosim ld-score --vcor pairs.vcor --afreq freq.afreq");

        assert_eq!(args.vcor, PathBuf::from("pairs.vcor"));
        assert_eq!(args.afreq, PathBuf::from("freq.afreq"));
        assert_eq!(args.out, None);
        assert_eq!(args.chunk_size.get(), 1_000_000);
    }

    #[test]
    fn test_zero_chunk_size() {
        let result = try_parse_subcmd::<LdScore>(
            "genosim ld-score --vcor pairs.vcor --afreq freq.afreq --chunk-size 0",
        );

        assert_eq!(result.unwrap_err().kind(), ClapErrorKind::ValueValidation);
    }

    #[test]
    fn test_afreq_required() {
        let result = try_parse_subcmd::<LdScore>("genosim ld-score --vcor pairs.vcor");

        assert_eq!(
            result.unwrap_err().kind(),
            ClapErrorKind::MissingRequiredArgument
        );
    }
}
