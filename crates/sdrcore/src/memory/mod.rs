//! Memory primitives: sample buffers,
//! coefficient and twiddle memories, and the asynchronous dual-clock FIFO
//! that bridges the sample clock to the DMA clock.

mod async_fifo;
mod coeff_memory;

pub use async_fifo::AsyncFifo;
pub use coeff_memory::CoeffMemory;
