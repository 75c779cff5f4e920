//! Variant reader builder.

use std::{
    io::{self, Read as _},
    num::NonZeroUsize,
};

use flate2::bufread::MultiGzDecoder;

use noodles_bgzf as bgzf;

use crate::{input, Input};

/// A builder for a VCF-backed variant reader.
#[derive(Debug)]
pub struct Builder {
    input: Option<Input>,
    compression_method: Option<Option<CompressionMethod>>,
    threads: NonZeroUsize,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            input: None,
            compression_method: None,
            threads: NonZeroUsize::MIN.saturating_add(3),
        }
    }
}

impl Builder {
    /// Returns a new reader.
    ///
    /// If no input is set, stdin is used. BCF input is detected and rejected.
    pub fn build(self) -> io::Result<super::DynReader> {
        match self.input.as_ref().unwrap_or(&Input::Stdin).open()? {
            input::Reader::File(reader) => self.build_from_reader(reader),
            input::Reader::Stdin(reader) => self.build_from_reader(reader),
        }
    }

    /// Returns a new reader from a buffered reader.
    pub fn build_from_reader<R>(self, mut reader: R) -> io::Result<super::DynReader>
    where
        R: 'static + io::BufRead,
    {
        let compression_method = match self.compression_method {
            Some(compression_method) => compression_method,
            None => CompressionMethod::detect(&mut reader)?,
        };

        if is_bcf(&mut reader, compression_method)? {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "BCF input is not supported, convert to VCF first",
            ));
        }

        let reader: super::DynReader = match compression_method {
            Some(CompressionMethod::Bgzf) => {
                let bgzf_reader = bgzf::reader::Builder::default()
                    .set_worker_count(self.threads)
                    .build_from_reader(reader);

                super::vcf::Reader::new(bgzf_reader).map(Box::new)?
            }
            None => super::vcf::Reader::new(reader).map(Box::new)?,
        };

        Ok(reader)
    }

    /// Sets the compression method.
    ///
    /// By default, the compression method is detected from the input.
    pub fn set_compression_method(mut self, compression_method: Option<CompressionMethod>) -> Self {
        self.compression_method = Some(compression_method);
        self
    }

    /// Sets the input.
    pub fn set_input(mut self, input: Input) -> Self {
        self.input = Some(input);
        self
    }

    /// Sets the number of decompression threads.
    pub fn set_threads(mut self, threads: NonZeroUsize) -> Self {
        self.threads = threads;
        self
    }
}

fn is_bcf<R>(reader: &mut R, compression_method: Option<CompressionMethod>) -> io::Result<bool>
where
    R: io::BufRead,
{
    const BCF_MAGIC_NUMBER: [u8; 3] = *b"BCF";

    let src = reader.fill_buf()?;

    match compression_method {
        Some(CompressionMethod::Bgzf) => {
            let mut decoder = MultiGzDecoder::new(src);
            let mut buf = [0; BCF_MAGIC_NUMBER.len()];

            Ok(decoder.read_exact(&mut buf).is_ok() && buf == BCF_MAGIC_NUMBER)
        }
        None => Ok(src.get(..BCF_MAGIC_NUMBER.len()) == Some(&BCF_MAGIC_NUMBER[..])),
    }
}

/// A compression method for the input.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompressionMethod {
    /// BGZF (block gzip) compression.
    Bgzf,
}

impl CompressionMethod {
    fn detect<R>(reader: &mut R) -> io::Result<Option<Self>>
    where
        R: io::BufRead,
    {
        const GZIP_MAGIC_NUMBER: [u8; 2] = [0x1f, 0x8b];

        let src = reader.fill_buf()?;

        if let Some(buf) = src.get(..GZIP_MAGIC_NUMBER.len()) {
            if buf == GZIP_MAGIC_NUMBER {
                return Ok(Some(CompressionMethod::Bgzf));
            }
        }

        Ok(None)
    }
}
