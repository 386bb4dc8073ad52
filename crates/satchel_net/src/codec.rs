//! Wire encoding

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::NetResult;

/// Upper bound on a single encoded message
pub const MAX_MESSAGE_BYTES: u64 = 1 << 20;

fn options() -> impl Options {
    bincode::DefaultOptions::new().with_limit(MAX_MESSAGE_BYTES)
}

/// Encode a message for the wire
pub fn encode<T: Serialize>(message: &T) -> NetResult<Vec<u8>> {
    Ok(options().serialize(message)?)
}

/// Decode a message from the wire
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> NetResult<T> {
    Ok(options().deserialize(bytes)?)
}
