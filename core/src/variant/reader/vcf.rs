use std::io;

use noodles_vcf as vcf;
use vcf::record::{
    genotypes::sample::value::genotype::Genotype as VcfGenotype, Record as VcfRecord,
};

use crate::{
    input::ReadStatus,
    variant::{Alleles, Variant},
};

/// A variant reader backed by a VCF.
///
/// Each record becomes one variant, with the site id given by its ordinal in the file.
pub struct Reader<R> {
    inner: vcf::Reader<R>,
    header: vcf::Header,
    samples: Vec<String>,
    buf: VcfRecord,
    sites: usize,
}

impl<R> Reader<R>
where
    R: io::BufRead,
{
    /// Creates a new reader, reading the header from the provided reader.
    pub fn new(inner: R) -> io::Result<Self> {
        let mut inner = vcf::Reader::new(inner);

        let header = inner.read_header()?;
        let samples = header.sample_names().iter().cloned().collect();

        Ok(Self {
            inner,
            header,
            samples,
            buf: VcfRecord::default(),
            sites: 0,
        })
    }

    fn read_genotypes(&mut self) -> ReadStatus<Vec<Option<VcfGenotype>>> {
        match self.inner.read_record(&self.header, &mut self.buf) {
            Ok(0) => ReadStatus::Done,
            Ok(_) => {
                let result = self
                    .buf
                    .genotypes()
                    .genotypes()
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e));

                match result {
                    Ok(genotypes) => ReadStatus::Read(genotypes),
                    Err(e) => ReadStatus::Error(e),
                }
            }
            Err(e) => ReadStatus::Error(e),
        }
    }

    fn alleles(&self) -> Alleles {
        let reference = self.buf.reference_bases().to_string();
        let alternates = self.buf.alternate_bases().iter().map(|a| a.to_string());

        Alleles::from_list(std::iter::once(reference).chain(alternates))
    }
}

impl<R> super::Reader for Reader<R>
where
    R: io::BufRead,
{
    fn current_contig(&self) -> &str {
        match self.buf.chromosome() {
            vcf::record::Chromosome::Name(s) | vcf::record::Chromosome::Symbol(s) => s,
        }
    }

    fn current_position(&self) -> usize {
        self.buf.position().into()
    }

    fn read_variant(&mut self) -> ReadStatus<Variant> {
        let genotypes = match self.read_genotypes() {
            ReadStatus::Read(genotypes) => genotypes,
            ReadStatus::Error(e) => return ReadStatus::Error(e),
            ReadStatus::Done => return ReadStatus::Done,
        };

        let position = usize::from(self.buf.position());

        let haplotypes = match haplotype_calls(genotypes) {
            Ok(haplotypes) => haplotypes,
            Err(reason) => {
                return ReadStatus::Error(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("{reason} at position {position}"),
                ))
            }
        };

        let id = self.sites;
        self.sites += 1;

        ReadStatus::Read(Variant::new(id, position, self.alleles(), haplotypes))
    }

    fn samples(&self) -> &[String] {
        &self.samples
    }
}

/// Flattens the genotypes of all samples into haplotype calls, in sample order.
///
/// Allele indices beyond the first alternate are kept as they are. The frequency filter counts
/// them as alternate calls, and dosage reduction clamps them.
fn haplotype_calls<I>(genotypes: I) -> Result<Vec<u8>, &'static str>
where
    I: IntoIterator<Item = Option<VcfGenotype>>,
{
    let mut calls = Vec::new();

    for genotype in genotypes {
        let genotype = genotype.ok_or("missing genotype")?;

        for allele in genotype.iter() {
            let index = allele.position().ok_or("missing genotype allele")?;
            calls.push(u8::try_from(index).unwrap_or(u8::MAX));
        }
    }

    Ok(calls)
}
