use std::path::PathBuf;

use anyhow::{Context, Error};

use clap::Parser;

use genosim_core::{input, ld::report, Input};

/// Print the mean and variance of each column of an LD score report.
#[derive(Debug, Parser)]
pub struct Stat {
    /// Input report, as written by 'ld-score'.
    ///
    /// If no file is provided, stdin will be used.
    #[arg(value_name = "PATH")]
    input: Option<PathBuf>,
}

impl Stat {
    pub fn run(self) -> Result<(), Error> {
        let input = Input::new(self.input)?;

        let summary = match input.open().context("failed to open report")? {
            input::Reader::File(reader) => report::summarize(reader),
            input::Reader::Stdin(reader) => report::summarize(reader),
        }
        .with_context(|| match input.as_path() {
            Some(path) => format!("failed to read report '{}'", path.display()),
            None => String::from("failed to read report from stdin"),
        })?;

        for (name, moments) in summary {
            println!("{name} - {moments}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::tests::parse_subcmd;

    #[test]
    fn test_parse_path() {
        let args = parse_subcmd::<Stat>("genosim stat out/maf_ld.txt");

        assert_eq!(args.input, Some(PathBuf::from("out/maf_ld.txt")));
    }
}
