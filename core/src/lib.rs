#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Tools for building synthetic genotype cohorts.
//!
//! This serves as the core library implementation for the `genosim` CLI, but can also be used
//! as a free-standing library.
//!
//! # Overview
//!
//! There are two independent pipelines:
//!
//! - [`encode`] reads simulated variants from a [`variant::Reader`], filters them on minor allele
//!   frequency, reduces haplotypes to diploid dosages, and writes a binary genotype fileset using
//!   [`plink`].
//! - [`ld`] streams a pairwise LD table in bounded chunks, accumulates a per-variant LD score,
//!   and joins the scores onto an allele frequency table.
//!
//! # Example
//!
//! ```
//! use genosim_core::ld;
//!
//! let pairs = "ID_A\tID_B\tR2\nv1\tv2\t0.4\n";
//! let frequencies = "ID\tMAF\nv1\t0.1\nv2\t0.2\n";
//!
//! let report = ld::Builder::default().report(pairs.as_bytes(), frequencies.as_bytes())?;
//!
//! assert!((report.rows()[0].ld() - 1.4).abs() < 1e-12);
//! # Ok::<(), ld::Error>(())
//! ```

#[cfg(test)]
#[macro_use]
pub(crate) mod approx;

pub mod encode;

pub mod input;
pub use input::Input;

pub mod ld;

pub mod plink;

pub mod variant;
pub use variant::Variant;
