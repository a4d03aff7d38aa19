//! # SDR FPGA Core — behavioural model
//!
//! This crate provides a bit-accurate behavioural model of an SDR
//! signal-processing core intended for an FPGA: a pipelined complex-baseband
//! data path that takes a stream of 12-bit IQ samples and produces two
//! concurrent outputs — a time-averaged or peak-held power spectrum, and
//! packed raw IQ recordings — each delivered via a DMA engine to host
//! memory. A programmable digital down-converter (mixer + 3-stage polyphase
//! FIR decimator) optionally precedes both paths.
//!
//! ## Signal flow
//!
//! ```text
//! IQ in (12b) -> CDC FIFO -> DDC(mixer + FIR x3) -> spectrometer front
//!                                            \--> recorder front
//! spectrometer front -> windowed FFT -> integrator (avg/peak) ->
//!     double-buffered bin memory -> DMA (burst writer to host RAM)
//! recorder front -> bit-width packer -> async FIFO -> 64-bit repacker ->
//!     DMA (stream writer to host RAM)
//! ```
//!
//! The crate is organized bottom-up, following the pipeline's own
//! layering: arithmetic primitives, memories, butterflies/twiddles, the FFT
//! engine, the digital down-converter, the spectrum integrator, the
//! packer/recorder datapath, the DMA engines, and finally the register bank
//! that exposes all of the above to a host.
//!
//! This is a behavioural model, not a cycle-accurate RTL simulator: each
//! component exposes a `step`-like method that advances it by one clock of
//! its own domain. Components own their memories; there is no global
//! mutable state (see Design Notes in `SPEC_FULL.md`).

#![forbid(unsafe_code)]

pub mod error;
pub mod fixed;

pub mod primitives;
pub mod memory;

pub mod fft;
pub mod ddc;
pub mod spectrometer;
pub mod packer;
pub mod dma;
pub mod regmap;

pub mod top;

pub use error::ConfigError;
pub use fixed::Complex;
pub use top::SdrCore;

/// Convenience re-exports for downstream crates (`sdrcore-sim`, `sdrcore-cli`).
pub mod prelude {
    pub use crate::ddc::DdcConfig;
    pub use crate::dma::{DmaRingConfig, DmaStreamConfig};
    pub use crate::error::ConfigError;
    pub use crate::fixed::Complex;
    pub use crate::fft::FftConfig;
    pub use crate::packer::RecorderMode;
    pub use crate::spectrometer::SpectrometerConfig;
    pub use crate::top::{SdrCore, SdrCoreConfig};
}
