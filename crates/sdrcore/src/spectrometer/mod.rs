//! Spectrum integrator: block-float accumulation across FFT frames into a
//! pingpong-buffered bin memory.

mod bin_memory;
mod block_float;
mod integrator;

pub use bin_memory::BinMemory;
pub use block_float::{to_block_float, BlockFloatSample, PowerBlockFloat, EXPONENT_BITS, MANTISSA_BITS};
pub use integrator::{Integrator, IntegratorMode};

use crate::error::ConfigResult;
use crate::fixed::Complex;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SpectrometerConfig {
    pub use_ddc_out: bool,
    pub num_integrations: u32,
    pub peak_detect: bool,
    /// `log2(N)`; must match the feeding FFT engine's order.
    pub order: u32,
    pub win_bits: u32,
    pub fw_bits: u32,
}

impl SpectrometerConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.order == 0 {
            return Err(crate::error::ConfigError::MustBeNonZero {
                field: "spectrometer.order",
            });
        }
        if self.fw_bits >= self.win_bits {
            return Err(crate::error::ConfigError::WidthOutOfRange {
                field: "spectrometer.fw_bits",
                width: self.fw_bits,
                min: 1,
                max: self.win_bits - 1,
            });
        }
        Ok(())
    }
}

/// The full spectrum integrator: per-bin block-float accumulation into a
/// double-buffered bin memory, with host-controlled abort.
#[derive(Debug, Clone)]
pub struct Spectrometer {
    integrator: Integrator,
    bins: BinMemory,
    abort: bool,
}

impl Spectrometer {
    pub fn new(config: &SpectrometerConfig) -> ConfigResult<Self> {
        config.validate()?;
        let mode = if config.peak_detect {
            IntegratorMode::Peak
        } else {
            IntegratorMode::Average
        };
        Ok(Spectrometer {
            integrator: Integrator::new(mode, config.num_integrations, config.win_bits, config.fw_bits),
            bins: BinMemory::new(config.order),
            abort: false,
        })
    }

    /// Request an abort: the in-progress integration finishes at the end
    /// of the current FFT frame instead of waiting for `n_int` frames.
    pub fn request_abort(&mut self) {
        self.abort = true;
    }

    /// Fold one FFT output sample (bin `bin_index` of the current frame)
    /// into the accumulator. `out_last` must be set on the frame's final
    /// sample; returns `true` exactly on the cycle the integration
    /// completes and the bin memory flips.
    pub fn process_sample(&mut self, bin_index: usize, sample: Complex, out_last: bool) -> bool {
        let current = self.bins.read_write_side(bin_index);
        let updated = self.integrator.accumulate(current, sample);
        self.bins.write(bin_index, updated);

        if !out_last {
            return false;
        }
        let done = self.integrator.on_frame_complete(self.abort);
        if done {
            self.abort = false;
            self.bins.flip_and_clear();
        }
        done
    }

    pub fn read_bin(&self, natural_index: usize) -> PowerBlockFloat {
        self.bins.read(natural_index)
    }

    pub fn last_buffer(&self) -> usize {
        self.bins.pingpong()
    }

    pub fn effective_n_int(&self) -> u32 {
        self.integrator.effective_n_int()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SpectrometerConfig {
        SpectrometerConfig {
            use_ddc_out: false,
            num_integrations: 1,
            peak_detect: false,
            order: 3, // N=8
            win_bits: 18,
            fw_bits: 16,
        }
    }

    #[test]
    fn single_frame_integration_completes_on_out_last() {
        let cfg = config();
        let mut spec = Spectrometer::new(&cfg).unwrap();
        for bin in 0..8 {
            let last = bin == 7;
            let done = spec.process_sample(bin, Complex::new(10, 0), last);
            assert_eq!(done, last);
        }
        assert_eq!(spec.read_bin(0).mantissa, 100);
    }
}
