//! A library for cutting MPEG-4 files at sync points.
//!
//! A cut discards every sample before the chosen sync point and rewrites the movie header so
//! that the remaining samples stay addressable: sample numbering, chunk layout, decoding
//! timestamps, sync sample numbers and chunk byte offsets are all rebuilt, and the media data
//! heads are resized to match. The media bytes themselves are copied verbatim.
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::BufWriter;
//!
//! fn main() -> mp4cut::Result<()> {
//!     let mut src = File::open("movie.mp4")?;
//!     let mut dst = BufWriter::new(File::create("cut.mp4")?);
//!
//!     println!("sync points: {:?}", mp4cut::get_sync_points(&mut src)?);
//!     mp4cut::split_and_write(&mut src, &mut dst, 42.0)?;
//!
//!     Ok(())
//! }
//! ```

pub use crate::atom::Fourcc;
pub use crate::cut::cut_moov;
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::faststart::move_header_and_write;
pub use crate::split::{
    get_nearest_syncpoint, get_sync_points, split, split_and_write, split_atoms,
};
pub use crate::sync::{find_nearest_syncpoint, find_sync_points};

pub mod atom;
pub mod cut;
mod error;
pub mod faststart;
pub mod sample;
pub mod split;
pub mod sync;
