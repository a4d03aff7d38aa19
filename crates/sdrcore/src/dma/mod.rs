//! DMA engines: the spectrometer's fixed-size ring writer and the
//! recorder's variable-length stream writer.

mod ring;
mod stream;

pub use ring::{DmaRingConfig, RingDma};
pub use stream::{DmaStreamConfig, StreamDma};
