//! Decoder for Intan Technologies RHS2000 recording files.
//!
//! An RHS file is a variable-length header followed by fixed-size blocks of
//! 128 samples. [`decode`] parses both and returns every enabled signal in
//! physical units: amplifier data in μV, stimulation current in μA with its
//! status flags, DC amplifier and board ADC/DAC data in V, and one boolean
//! row per digital channel.

mod block;
pub mod constants;
mod digital;
mod error;
mod header;
mod qstring;
mod reader;
pub mod scale;
pub mod stim;
pub mod types;

use std::io::{Read, Seek};
use std::path::Path;

pub use block::bytes_per_data_block;
pub use error::{Result, RhsError};
pub use stim::StimWord;
pub use types::*;

/// Loads an RHS file and returns the decoded recording.
///
/// # Examples
///
/// ```no_run
/// match intan_rhs::decode("path/to/your/file.rhs") {
///     Ok(rhs) => println!("{:.2} s at {} Hz", rhs.duration(), rhs.sample_rate),
///     Err(e) => println!("Error loading file: {}", e),
/// }
/// ```
pub fn decode<P: AsRef<Path>>(file_path: P) -> Result<RhsFile> {
    reader::load_file(file_path)
}

/// Decodes an RHS recording from any seekable stream.
///
/// The whole stream, from its start, must be one RHS file.
pub fn decode_reader<R: Read + Seek>(reader: R) -> Result<RhsFile> {
    reader::load_reader(reader)
}

/// Reads only the header of an RHS recording.
pub fn read_header<R: Read + Seek>(reader: R) -> Result<RhsHeader> {
    reader::load_header(reader)
}
