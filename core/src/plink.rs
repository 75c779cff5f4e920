//! Writing the binary genotype fileset.
//!
//! A fileset consists of three coordinated files sharing a path prefix: the individual table
//! (`.fam`), the variant table (`.bim`), and the packed binary genotype matrix (`.bed`).
//! Rows of the variant table and the matrix are written in lockstep, so the two always describe
//! the same variants in the same order.

use std::{
    ffi::OsString,
    fs::{self, File},
    io::{self, BufWriter, Write as _},
    path::{Path, PathBuf},
};

pub mod bed;

pub mod bim;

pub mod fam;
pub use fam::Individual;

use crate::encode::Dosage;

/// Paths of a binary genotype fileset.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Fileset {
    fam: PathBuf,
    bim: PathBuf,
    bed: PathBuf,
}

impl Fileset {
    /// Creates a fileset by appending the extensions to the provided prefix.
    pub fn from_prefix<P>(prefix: P) -> Self
    where
        P: AsRef<Path>,
    {
        let with_extension = |extension: &str| {
            let mut path = OsString::from(prefix.as_ref());
            path.push(".");
            path.push(extension);
            PathBuf::from(path)
        };

        Self {
            fam: with_extension("fam"),
            bim: with_extension("bim"),
            bed: with_extension("bed"),
        }
    }

    /// Returns the path of the individual table.
    pub fn fam(&self) -> &Path {
        &self.fam
    }

    /// Returns the path of the variant table.
    pub fn bim(&self) -> &Path {
        &self.bim
    }

    /// Returns the path of the binary genotype matrix.
    pub fn bed(&self) -> &Path {
        &self.bed
    }

    fn paths(&self) -> [&Path; 3] {
        [&self.fam, &self.bim, &self.bed]
    }
}

/// A writer of the three coordinated outputs.
#[derive(Debug)]
pub struct Writer<W>
where
    W: io::Write,
{
    fam: W,
    bim: W,
    bed: bed::Writer<W>,
}

impl<W> Writer<W>
where
    W: io::Write,
{
    /// Creates a new writer, writing the individual table and the matrix magic number.
    pub fn new(mut fam: W, bim: W, matrix: W, individuals: &[Individual]) -> io::Result<Self> {
        fam::write_individuals(&mut fam, individuals)?;
        let bed = bed::Writer::new(matrix, individuals.len())?;

        Ok(Self { fam, bim, bed })
    }

    /// Returns the number of variants written.
    pub fn variants(&self) -> usize {
        self.bed.rows()
    }

    /// Writes a single variant to both the variant table and the matrix.
    ///
    /// The dosage row is checked before anything is written.
    pub fn write_variant(&mut self, record: &bim::Record, dosages: &[Dosage]) -> io::Result<()> {
        self.bed.write_row(dosages)?;
        writeln!(self.bim, "{record}")
    }

    /// Flushes and returns the inner writers, in the order individual table, variant table, and
    /// matrix.
    pub fn finish(mut self) -> io::Result<(W, W, W)> {
        self.fam.flush()?;
        self.bim.flush()?;
        let bed = self.bed.finish()?;

        Ok((self.fam, self.bim, bed))
    }
}

/// A writer of a fileset on disk.
///
/// All output is written to temporary files next to the final paths. These are only moved into
/// place by [`FileWriter::finish`]; if the writer is dropped before that, they are removed.
#[derive(Debug)]
pub struct FileWriter {
    fileset: Fileset,
    staged: Staged,
    inner: Writer<BufWriter<File>>,
}

impl FileWriter {
    /// Creates a new writer for the fileset.
    pub fn create(fileset: Fileset, individuals: &[Individual]) -> io::Result<Self> {
        let staged = Staged::new(&fileset);

        let [fam, bim, bed] = staged.create()?;
        let inner = Writer::new(fam, bim, bed, individuals)?;

        Ok(Self {
            fileset,
            staged,
            inner,
        })
    }

    /// Returns the number of variants written.
    pub fn variants(&self) -> usize {
        self.inner.variants()
    }

    /// Writes a single variant.
    pub fn write_variant(&mut self, record: &bim::Record, dosages: &[Dosage]) -> io::Result<()> {
        self.inner.write_variant(record, dosages)
    }

    /// Flushes and syncs all outputs, then moves them to their final paths.
    pub fn finish(self) -> io::Result<Fileset> {
        let Self {
            fileset,
            mut staged,
            inner,
        } = self;

        let (fam, bim, matrix) = inner.finish()?;
        for writer in [fam, bim, matrix] {
            writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
        }

        staged.commit(&fileset)?;

        Ok(fileset)
    }
}

/// Temporary outputs, removed on drop unless committed.
#[derive(Debug)]
struct Staged {
    paths: [PathBuf; 3],
    committed: bool,
}

impl Staged {
    fn new(fileset: &Fileset) -> Self {
        let staged = |path: &Path| {
            let mut path = OsString::from(path);
            path.push(".tmp");
            PathBuf::from(path)
        };

        Self {
            paths: fileset.paths().map(staged),
            committed: false,
        }
    }

    fn create(&self) -> io::Result<[BufWriter<File>; 3]> {
        let create = |path: &Path| {
            File::create(path).map(BufWriter::new).map_err(|e| {
                io::Error::new(
                    e.kind(),
                    format!("failed to create '{}': {e}", path.display()),
                )
            })
        };

        Ok([
            create(&self.paths[0])?,
            create(&self.paths[1])?,
            create(&self.paths[2])?,
        ])
    }

    fn commit(&mut self, fileset: &Fileset) -> io::Result<()> {
        let targets = fileset.paths();

        for (i, (staged, target)) in self.paths.iter().zip(targets).enumerate() {
            if let Err(e) = fs::rename(staged, target) {
                // Earlier outputs were already moved, and would not match the rest
                for moved in &targets[..i] {
                    let _ = fs::remove_file(moved);
                }

                return Err(io::Error::new(
                    e.kind(),
                    format!("failed to move output to '{}': {e}", target.display()),
                ));
            }
        }

        self.committed = true;

        Ok(())
    }
}

impl Drop for Staged {
    fn drop(&mut self) {
        if !self.committed {
            for path in &self.paths {
                let _ = fs::remove_file(path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::variant::Alleles;

    use Dosage::*;

    #[test]
    fn test_fileset_from_prefix() {
        let fileset = Fileset::from_prefix("out/sim.v1");

        assert_eq!(fileset.fam(), Path::new("out/sim.v1.fam"));
        assert_eq!(fileset.bim(), Path::new("out/sim.v1.bim"));
        assert_eq!(fileset.bed(), Path::new("out/sim.v1.bed"));
    }

    #[test]
    fn test_writer_in_memory() -> io::Result<()> {
        let individuals = Individual::synthesize(2);
        let mut writer = Writer::new(Vec::new(), Vec::new(), Vec::new(), &individuals)?;

        writer.write_variant(&bim::Record::new("1", 5, Alleles::new("A", "C")), &[One, Two])?;
        assert_eq!(writer.variants(), 1);

        let (fam, bim, matrix) = writer.finish()?;

        assert_eq!(fam, b"indiv1 indiv1 0 0 0 -9\nindiv2 indiv2 0 0 0 -9\n");
        assert_eq!(bim, b"1\t1:5\t0\t5\tC\tA\n");
        assert_eq!(matrix, [0x6c, 0x1b, 0x01, 0b01_01_11_10]);

        Ok(())
    }

    #[test]
    fn test_writer_rejects_wrong_row_length_before_writing() -> io::Result<()> {
        let individuals = Individual::synthesize(2);
        let mut writer = Writer::new(Vec::new(), Vec::new(), Vec::new(), &individuals)?;

        let record = bim::Record::new("1", 5, Alleles::placeholder());
        assert!(writer.write_variant(&record, &[One]).is_err());

        let (_, bim, matrix) = writer.finish()?;
        assert!(bim.is_empty());
        assert_eq!(matrix, bed::MAGIC);

        Ok(())
    }

    #[test]
    fn test_file_writer_commits() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let fileset = Fileset::from_prefix(dir.path().join("sim"));

        let mut writer = FileWriter::create(fileset.clone(), &Individual::synthesize(4))?;
        writer.write_variant(
            &bim::Record::new("1", 7, Alleles::placeholder()),
            &[Zero, Two, Zero, Two],
        )?;
        let written = writer.finish()?;

        assert_eq!(written, fileset);
        assert_eq!(fs::read(fileset.bed())?, [0x6c, 0x1b, 0x01, 0b11_00_11_00]);
        assert_eq!(fs::read_to_string(fileset.fam())?.lines().count(), 4);
        assert_eq!(fs::read_to_string(fileset.bim())?, "1\t1:7\t0\t7\tG\tA\n");
        assert_eq!(fs::read_dir(dir.path())?.count(), 3);

        Ok(())
    }

    #[test]
    fn test_file_writer_dropped_leaves_nothing() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let fileset = Fileset::from_prefix(dir.path().join("sim"));

        let mut writer = FileWriter::create(fileset.clone(), &Individual::synthesize(4))?;
        assert!(writer
            .write_variant(&bim::Record::new("1", 7, Alleles::placeholder()), &[Zero])
            .is_err());
        drop(writer);

        assert!(!fileset.bed().exists());
        assert_eq!(fs::read_dir(dir.path())?.count(), 0);

        Ok(())
    }

    #[test]
    fn test_file_writer_uncreatable_path() {
        let fileset = Fileset::from_prefix("/nonexistent/directory/sim");

        assert!(FileWriter::create(fileset, &Individual::synthesize(1)).is_err());
    }
}
