//! Decoding of uploaded cargo files

use serde::Deserialize;
use thiserror::Error;

use super::types::IngestRecord;

/// Whole-file failure: the bytes are not a well-formed JSON array of cargo
/// records.
///
/// One undecodable object anywhere in the array fails the entire file.
/// Files that fail here produce no per-record outcomes at all, which keeps
/// them distinguishable from files whose records decoded but were rejected
/// by business rules.
#[derive(Debug, Error)]
#[error("malformed cargo file: {0}")]
pub struct MalformedInput(#[from] serde_json::Error);

/// Decode one file into typed records.
///
/// The deserializer walks the token stream directly into [`IngestRecord`]
/// values; no intermediate document tree is built. Trailing bytes after
/// the closing bracket fail the file.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<IngestRecord>, MalformedInput> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    let records = Vec::<IngestRecord>::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(records)
}
