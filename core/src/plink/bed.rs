//! Reading and writing the packed binary genotype matrix.
//!
//! The matrix starts with a three byte magic number, where the last byte signals variant-major
//! packing. Each variant then occupies a fixed number of bytes, with each genotype taking two
//! bits, starting from the least significant bits of each byte. Genotypes are coded as follows:
//!
//! | Dosage  | Bits |
//! |---------|------|
//! | 0       | `00` |
//! | 1       | `10` |
//! | 2       | `11` |
//! | missing | `01` |
//!
//! The last byte of a row is padded with the missing code when the number of individuals is
//! not a multiple of four.

use std::{fmt, io};

use crate::encode::Dosage;

/// The magic number, including the variant-major mode byte.
pub const MAGIC: [u8; 3] = [0x6c, 0x1b, 0x01];

const MISSING: u8 = 0b01;

const MISSING_BYTE: u8 = MISSING | MISSING << 2 | MISSING << 4 | MISSING << 6;

fn code(dosage: Dosage) -> u8 {
    match dosage {
        Dosage::Zero => 0b00,
        Dosage::One => 0b10,
        Dosage::Two => 0b11,
    }
}

fn decode(bits: u8) -> Option<Dosage> {
    match bits & 0b11 {
        0b00 => Some(Dosage::Zero),
        0b10 => Some(Dosage::One),
        0b11 => Some(Dosage::Two),
        _ => None,
    }
}

/// Returns the number of bytes used by each row.
pub fn bytes_per_row(individuals: usize) -> usize {
    (individuals + 3) / 4
}

/// Packs a row of dosages, appending the bytes to the buffer.
pub fn encode_row(dosages: &[Dosage], buf: &mut Vec<u8>) {
    buf.extend(dosages.chunks(4).map(|chunk| {
        chunk
            .iter()
            .enumerate()
            .fold(MISSING_BYTE, |byte, (i, &dosage)| {
                let shift = 2 * i;
                (byte & !(0b11 << shift)) | (code(dosage) << shift)
            })
    }));
}

/// Unpacks a row of the provided number of individuals.
///
/// Missing genotypes are returned as `None`.
///
/// # Panics
///
/// If `bytes` is shorter than [`bytes_per_row`] of `individuals`.
pub fn decode_row(bytes: &[u8], individuals: usize) -> Vec<Option<Dosage>> {
    (0..individuals)
        .map(|i| decode(bytes[i / 4] >> (2 * (i % 4))))
        .collect()
}

/// A writer of the packed binary genotype matrix.
#[derive(Debug)]
pub struct Writer<W> {
    inner: W,
    individuals: usize,
    rows: usize,
    buf: Vec<u8>,
}

impl<W> Writer<W>
where
    W: io::Write,
{
    /// Creates a new writer, writing the magic number.
    pub fn new(mut inner: W, individuals: usize) -> io::Result<Self> {
        inner.write_all(&MAGIC)?;

        Ok(Self {
            inner,
            individuals,
            rows: 0,
            buf: Vec::with_capacity(bytes_per_row(individuals)),
        })
    }

    /// Returns the number of rows written.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Writes a single row.
    ///
    /// # Errors
    ///
    /// If the number of dosages does not match the number of individuals, or on I/O errors.
    pub fn write_row(&mut self, dosages: &[Dosage]) -> io::Result<()> {
        if dosages.len() != self.individuals {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                ShapeError {
                    row: self.rows,
                    expected: self.individuals,
                    found: dosages.len(),
                },
            ));
        }

        self.buf.clear();
        encode_row(dosages, &mut self.buf);
        self.inner.write_all(&self.buf)?;
        self.rows += 1;

        Ok(())
    }

    /// Flushes and returns the inner writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Writes a full matrix of dosage rows.
pub fn write_matrix<W>(writer: W, rows: &[Vec<Dosage>], individuals: usize) -> io::Result<W>
where
    W: io::Write,
{
    let mut writer = Writer::new(writer, individuals)?;

    for row in rows {
        writer.write_row(row)?;
    }

    writer.finish()
}

/// Reads a full matrix of the provided shape.
pub fn read_matrix<R>(
    reader: &mut R,
    variants: usize,
    individuals: usize,
) -> io::Result<Vec<Vec<Option<Dosage>>>>
where
    R: io::Read,
{
    let mut magic = [0; MAGIC.len()];
    reader.read_exact(&mut magic)?;

    if magic != MAGIC {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "invalid binary genotype matrix magic number",
        ));
    }

    let mut buf = vec![0; bytes_per_row(individuals)];

    (0..variants)
        .map(|_| -> io::Result<_> {
            reader.read_exact(&mut buf)?;
            Ok(decode_row(&buf, individuals))
        })
        .collect()
}

/// An error associated with a dosage row of the wrong length.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ShapeError {
    /// Index of the offending row.
    pub row: usize,
    /// Number of individuals expected.
    pub expected: usize,
    /// Number of dosages found.
    pub found: usize,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dosage row {} has {} values, expected one per individual ({})",
            self.row, self.found, self.expected
        )
    }
}

impl std::error::Error for ShapeError {}

#[cfg(test)]
mod tests {
    use super::*;

    use Dosage::*;

    #[test]
    fn test_encode_row() {
        let mut buf = Vec::new();
        encode_row(&[Zero, Two, Zero, Two], &mut buf);

        assert_eq!(buf, [0b11_00_11_00]);
    }

    #[test]
    fn test_encode_row_padding() {
        let mut buf = Vec::new();
        encode_row(&[One, Two, Zero, Zero, One], &mut buf);

        assert_eq!(buf, [0b00_00_11_10, 0b01_01_01_10]);
    }

    #[test]
    fn test_padding_decodes_to_missing() {
        for individuals in [1, 2, 3, 5, 6, 7] {
            let mut buf = Vec::new();
            encode_row(&vec![Two; individuals], &mut buf);

            let padded = bytes_per_row(individuals) * 4;
            let decoded = decode_row(&buf, padded);

            assert!(decoded[..individuals].iter().all(|&d| d == Some(Two)));
            assert!(decoded[individuals..].iter().all(Option::is_none));
        }
    }

    #[test]
    #[should_panic]
    fn test_decode_row_short_slice() {
        decode_row(&[0b11_11_11_11], 5);
    }

    #[test]
    fn test_bytes_per_row() {
        assert_eq!(bytes_per_row(0), 0);
        assert_eq!(bytes_per_row(1), 1);
        assert_eq!(bytes_per_row(4), 1);
        assert_eq!(bytes_per_row(5), 2);
    }

    #[test]
    fn test_write_then_read_matrix() -> io::Result<()> {
        let rows = vec![
            vec![Zero, One, Two, Two, One, Zero, Zero],
            vec![Two, Two, Zero, One, One, One, Two],
            vec![One, Zero, Zero, Zero, Zero, Zero, One],
        ];

        let dest = write_matrix(Vec::new(), &rows, 7)?;

        assert_eq!(&dest[..3], MAGIC);
        assert_eq!(dest.len(), 3 + 3 * 2);

        let decoded = read_matrix(&mut &dest[..], 3, 7)?;
        let expected = rows
            .iter()
            .map(|row| row.iter().copied().map(Some).collect::<Vec<_>>())
            .collect::<Vec<_>>();

        assert_eq!(decoded, expected);

        Ok(())
    }

    #[test]
    fn test_write_row_wrong_length() -> io::Result<()> {
        let mut writer = Writer::new(Vec::new(), 3)?;
        writer.write_row(&[Zero, One, Two])?;

        let result = writer.write_row(&[Zero, One]);
        assert_eq!(
            result.map_err(|e| e.kind()),
            Err(io::ErrorKind::InvalidInput)
        );
        assert_eq!(writer.rows(), 1);

        Ok(())
    }

    #[test]
    fn test_read_matrix_invalid_magic() {
        let src = [0x6c, 0x1b, 0x00, 0b11_00_11_00];

        assert_eq!(
            read_matrix(&mut &src[..], 1, 4).map_err(|e| e.kind()),
            Err(io::ErrorKind::InvalidData)
        );
    }
}
