use std::{num::NonZeroUsize, path::PathBuf};

use anyhow::{Context, Error};

use clap::Parser;

use genosim_core::{
    encode,
    plink::Fileset,
    variant::{self, Reader as _},
    Input,
};

/// Encode simulated variants from VCF as a binary genotype fileset.
///
/// Writes PREFIX.fam, PREFIX.bim, and PREFIX.bed. The outputs are only moved into place once
/// all three have been completely written.
#[derive(Debug, Parser)]
pub struct Encode {
    /// Input VCF file, optionally BGZF-compressed.
    ///
    /// If no file is provided, stdin will be used.
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output path prefix.
    #[arg(short = 'o', long, value_name = "PREFIX")]
    output: PathBuf,

    /// Minimum minor allele frequency of retained variants.
    ///
    /// Variants with a minor allele frequency at or above this threshold are retained.
    /// Must be in [0, 0.5].
    #[arg(
        short = 'm',
        long,
        default_value_t = encode::MafFilter::DEFAULT_THRESHOLD,
        value_name = "FLOAT"
    )]
    maf: f64,

    /// Chromosome label used in the variant table.
    #[arg(short = 'c', long, default_value = "1", value_name = "LABEL")]
    chromosome: String,

    /// Number of threads to use for decompression.
    #[arg(short = 't', long, default_value_t = NonZeroUsize::new(4).unwrap(), value_name = "INT")]
    threads: NonZeroUsize,
}

impl Encode {
    pub fn run(self) -> Result<(), Error> {
        let encoder = encode::Builder::default()
            .set_threshold(self.maf)
            .set_chromosome(&self.chromosome)
            .build()?;

        let input = Input::new(self.input)?;
        let source = input
            .as_path()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| String::from("stdin"));

        let mut reader = variant::reader::Builder::default()
            .set_input(input)
            .set_threads(self.threads)
            .build()
            .with_context(|| format!("failed to open variants from {source}"))?;

        log::info!(
            "Read header with {} samples from {source}",
            reader.samples().len()
        );

        let fileset = Fileset::from_prefix(&self.output);
        let summary = encoder
            .encode_to_fileset(&mut reader, fileset)
            .with_context(|| {
                format!(
                    "failed to encode variants from {source} to '{}'",
                    self.output.display()
                )
            })?;

        log::info!("Encoding done: {summary}");

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
        let args = parse_subcmd::<Encode>("genosim encode sim.vcf -o out/sim");

        assert_eq!(args.input, Some(PathBuf::from("sim.vcf")));
        assert_eq!(args.output, PathBuf::from("out/sim"));
        assert_eq!(args.maf, 0.05);
        assert_eq!(args.chromosome, "1");
        assert_eq!(args.threads.get(), 4);
    }

    #[test]
    fn test_output_required() {
        let result = try_parse_subcmd::<Encode>("genosim encode sim.vcf");

        assert_eq!(
            result.unwrap_err().kind(),
            ClapErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_parse_options() {
        let args =
            parse_subcmd::<Encode>("genosim encode -o sim --maf 0.1 --chromosome 22 -t 1");

        assert_eq!(args.input, None);
        assert_eq!(args.maf, 0.1);
        assert_eq!(args.chromosome, "22");
        assert_eq!(args.threads.get(), 1);
    }
}
