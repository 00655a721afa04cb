//! Error types for the lzcomp library.
//!
//! [`ErrorKind`] is the failure taxonomy shared by every layer. The two entry
//! points wrap it in [`Error`] so callers know which direction failed.

/// Result type alias for lzcomp operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Result type used inside the codec, before a direction is attached.
pub type CodecResult<T> = std::result::Result<T, ErrorKind>;

/// What went wrong while compressing or decompressing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    /// The call's arena could not satisfy a buffer request.
    #[error("allocation of {requested} bytes failed ({available} bytes available)")]
    AllocationFailure {
        /// Bytes requested.
        requested: usize,
        /// Bytes left in the arena budget.
        available: usize,
    },

    /// Input is larger than the configured or encodable maximum.
    #[error("input of {len} bytes exceeds maximum of {max} bytes")]
    InputTooLarge {
        /// Input length.
        len: usize,
        /// Maximum accepted length.
        max: usize,
    },

    /// A configured bound was exceeded.
    #[error("{what} of {value} exceeds limit of {max}")]
    LimitExceeded {
        /// Name of the bounded quantity.
        what: &'static str,
        /// Observed value.
        value: usize,
        /// Configured limit.
        max: usize,
    },

    /// A coding model was asked for an alphabet it cannot represent.
    #[error("alphabet of {symbols} symbols is outside 2..=65535")]
    UnsupportedAlphabet {
        /// Requested number of symbols.
        symbols: usize,
    },

    /// The decoder ran out of bits.
    #[error("unexpected end of stream")]
    UnexpectedEndOfStream,

    /// Magic/version mismatch or a self-inconsistent header.
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// A decoded symbol is not valid where it appeared.
    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),

    /// A match points before the start of the output.
    #[error("match distance {distance} exceeds {available} decoded bytes")]
    DistanceTooFar {
        /// Decoded distance.
        distance: usize,
        /// Bytes decoded so far.
        available: usize,
    },

    /// Decoded size disagrees with the header.
    #[error("decoded length mismatch: header declares {expected} bytes, stream produced {actual}")]
    LengthMismatch {
        /// Length declared in the header.
        expected: usize,
        /// Length produced (or reached) by the stream.
        actual: usize,
    },

    /// Checksum of the decoded bytes disagrees with the header.
    #[error("checksum mismatch: expected {expected:08X}, got {actual:08X}")]
    ChecksumMismatch {
        /// Checksum stored in the header.
        expected: u32,
        /// Checksum of the decoded output.
        actual: u32,
    },

    /// Whole bytes follow the end-of-stream symbol.
    #[error("{bytes} trailing bytes after end of stream")]
    TrailingData {
        /// Number of unused whole bytes.
        bytes: usize,
    },
}

impl ErrorKind {
    /// True when the failure is caused by damaged or foreign input.
    pub fn is_corrupt_input(&self) -> bool {
        matches!(
            self,
            ErrorKind::UnexpectedEndOfStream
                | ErrorKind::MalformedHeader(_)
                | ErrorKind::InvalidSymbol(_)
                | ErrorKind::DistanceTooFar { .. }
                | ErrorKind::LengthMismatch { .. }
                | ErrorKind::ChecksumMismatch { .. }
                | ErrorKind::TrailingData { .. }
        )
    }

    /// True when the failure is caused by a size or memory bound.
    pub fn is_resource_exhaustion(&self) -> bool {
        matches!(
            self,
            ErrorKind::AllocationFailure { .. }
                | ErrorKind::InputTooLarge { .. }
                | ErrorKind::LimitExceeded { .. }
        )
    }
}

/// Errors returned by [`crate::compress`] and [`crate::decompress`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// `compress` could not produce an encoded buffer.
    #[error("compression failed: {0}")]
    CompressionFailure(#[source] ErrorKind),

    /// `decompress` rejected its input.
    #[error("decompression failed: {0}")]
    DecompressionFailure(#[source] ErrorKind),
}

impl Error {
    /// The underlying failure.
    pub fn kind(&self) -> &ErrorKind {
        match self {
            Error::CompressionFailure(kind) | Error::DecompressionFailure(kind) => kind,
        }
    }

    /// See [`ErrorKind::is_corrupt_input`].
    pub fn is_corrupt_input(&self) -> bool {
        self.kind().is_corrupt_input()
    }

    /// See [`ErrorKind::is_resource_exhaustion`].
    pub fn is_resource_exhaustion(&self) -> bool {
        self.kind().is_resource_exhaustion()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_direction() {
        let err = Error::DecompressionFailure(ErrorKind::UnexpectedEndOfStream);
        assert_eq!(
            err.to_string(),
            "decompression failed: unexpected end of stream"
        );

        let err = Error::CompressionFailure(ErrorKind::InputTooLarge { len: 10, max: 5 });
        assert_eq!(
            err.to_string(),
            "compression failed: input of 10 bytes exceeds maximum of 5 bytes"
        );
    }

    #[test]
    fn test_error_classification() {
        let corrupt = Error::DecompressionFailure(ErrorKind::ChecksumMismatch {
            expected: 1,
            actual: 2,
        });
        assert!(corrupt.is_corrupt_input());
        assert!(!corrupt.is_resource_exhaustion());

        let oom = Error::CompressionFailure(ErrorKind::AllocationFailure {
            requested: 100,
            available: 10,
        });
        assert!(oom.is_resource_exhaustion());
        assert!(!oom.is_corrupt_input());
        assert_eq!(
            oom.kind(),
            &ErrorKind::AllocationFailure {
                requested: 100,
                available: 10
            }
        );
    }

    #[test]
    fn test_checksum_display_is_hex() {
        let kind = ErrorKind::ChecksumMismatch {
            expected: 0xDEAD_BEEF,
            actual: 0x1,
        };
        assert_eq!(
            kind.to_string(),
            "checksum mismatch: expected DEADBEEF, got 00000001"
        );
    }
}
