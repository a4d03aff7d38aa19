//! Arithmetic primitives: `Cmult`, `Mult2x`, `CpwrPeak`,
//! `Macc`. These are the leaves of the pipeline — every butterfly, twiddle
//! stage, mixer, FIR tap and spectrum-integrator accumulator bottoms out in
//! one of these four.

mod cmult;
mod cpwr;
mod macc;

pub use cmult::{Cmult, Mult2x};
pub use cpwr::CpwrPeak;
pub use macc::Macc;
