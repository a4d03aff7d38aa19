//! IQ sample packers and the recorder front-end built from them.

mod packer;
mod recorder;

pub use packer::{PackFifoTwice, Packer12, Packer16, Packer8};
pub use recorder::{Recorder, RecorderMode};
