//! Persistence of the extracted rows: CSV intermediate plus compressed
//! archive.

pub mod archive;
pub mod csv;
