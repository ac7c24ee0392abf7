//! Error taxonomy shared by every fallible entry point in this crate.

/// Everything that can go wrong calling into a bitmap, an immutable overlay, or the
/// serializer. Mutators validate their inputs against this taxonomy before touching
/// storage, so a returned `Err` never leaves a bitmap partially mutated.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A value fell outside the representable `u32` domain. Not reachable from this
    /// crate's own `u32`-typed API; kept for host bindings that convert from a wider
    /// integer type before calling in.
    #[error("value {value} is out of range for a 32-bit bitmap")]
    OutOfRange { value: i64 },

    /// Reserved for host bindings comparing or combining a bitmap with an unrelated
    /// type; Rust's static typing makes this unreachable from this crate's own API.
    #[error("operand type does not match RoaringBitmap")]
    TypeMismatch,

    /// An otherwise well-typed argument violates a documented precondition: a
    /// non-positive stride, an out-of-range rank/select index, or popping an empty set.
    #[error("invalid value: {reason}")]
    ValueInvalid { reason: &'static str },

    /// A serialized buffer failed a header, ordering, or invariant check on load.
    #[error("corrupt serialized bitmap: {reason}")]
    CorruptFormat { reason: String },

    /// A memory-map or underlying file I/O call failed.
    #[error("resource exhausted: {source}")]
    ResourceExhausted {
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
