use crate::transport::TransportError;
use thiserror::Error;

/// All errors generated in `quotedeck-data`.
///
/// Only transport failures cross the component boundary; malformed frames,
/// failed bars fetches and stale fetch results are absorbed where they occur.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("failed to encode subscribe frame: {0}")]
    Subscribe(String),
}
