/*!
 * Binary Serialization
 * bincode helpers for values crossing the process boundary
 */

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::type_name;
use thiserror::Error;

/// Serialization operation result
pub type BincodeResult<T> = Result<T, BincodeError>;

/// Binary codec errors, tagged with the Rust type involved
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BincodeError {
    #[error("Encoding {context} failed: {source}")]
    Encode {
        context: &'static str,
        #[source]
        source: bincode::Error,
    },

    #[error("Decoding {context} failed: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: bincode::Error,
    },
}

/// Encode a value to its binary wire form
#[inline]
pub fn to_vec<T: Serialize>(value: &T) -> BincodeResult<Vec<u8>> {
    bincode::serialize(value).map_err(|source| BincodeError::Encode {
        context: type_name::<T>(),
        source,
    })
}

/// Decode a value from its binary wire form
#[inline]
pub fn from_slice<T: DeserializeOwned>(bytes: &[u8]) -> BincodeResult<T> {
    bincode::deserialize(bytes).map_err(|source| BincodeError::Decode {
        context: type_name::<T>(),
        source,
    })
}
