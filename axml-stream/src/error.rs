use thiserror::Error;

/// Fatal decode failures. Once a chunk's declared sizes cannot be
/// trusted, the remaining chunk boundaries cannot be either, so both
/// variants abort the decode. Resolution shortfalls (missing strings,
/// unresolvable references, unmapped enum bits) are never errors; they
/// degrade to best-effort text instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AxmlError {
    /// A chunk header that cannot be interpreted: unrecognised type
    /// outside the XML chunk range, sizes that contradict each other,
    /// or element nesting past the depth ceiling.
    #[error("malformed chunk (type {chunk_type:#06x}) at offset {offset:#x}: {reason}")]
    MalformedChunk {
        offset: u64,
        chunk_type: u16,
        reason: &'static str,
    },

    /// The buffer ended mid-field, or a chunk declared more bytes than
    /// the buffer holds.
    #[error("input truncated at offset {offset:#x}")]
    TruncatedInput { offset: u64 },
}
