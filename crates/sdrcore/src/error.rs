//! Construction-time configuration errors.
//!
//! Per the core's error-handling design, only one class of
//! failure is ever surfaced as a `Result`: configuration errors caught at
//! build/validation time. Everything else — host misuse, recorder
//! backpressure, transport responses — is defined behaviour modelled as a
//! state transition (a dropped-sample latch, a silently-discarded write, a
//! register read returning zero), not an `Err`.

use thiserror::Error;

/// A parameter rejected at model-construction time, naming the offending
/// field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("data width {width} out of range {min}..={max} for {field}")]
    WidthOutOfRange {
        field: &'static str,
        width: u32,
        min: u32,
        max: u32,
    },

    #[error("truncate schedule invalid for {field}: {reason}")]
    InvalidTruncateSchedule { field: &'static str, reason: String },

    #[error("FFT order {order} is not divisible by radix log2 {radix_log2}")]
    FftOrderNotDivisible { order: u32, radix_log2: u32 },

    #[error("DMA base address {address:#x} is not aligned to {alignment:#x}")]
    MisalignedDmaBaseAddress { address: u64, alignment: u64 },

    #[error("ring buffer count {count} is not a power of two")]
    RingBufferCountNotPowerOfTwo { count: u32 },

    #[error("{field} must be non-zero")]
    MustBeNonZero { field: &'static str },

    #[error("{field} = {value} exceeds maximum {max}")]
    ExceedsMaximum {
        field: &'static str,
        value: i64,
        max: i64,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
