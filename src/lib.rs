//! Autometa: failure taxonomy and detection sites for metagenomic binning.

pub mod error;

pub mod binning;
pub mod checksum;
pub mod cli;
pub mod config;
pub mod external;
pub mod table;
pub mod taxonomy;

pub use error::{Error, ErrorKind, NCBI_RESYNC_INSTRUCTIONS, Result};
