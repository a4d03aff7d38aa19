//! Digital down-converter: NCO mixer followed by a three-stage polyphase
//! FIR decimator.

mod decimator;
mod fir;
mod mixer;

pub use decimator::DecimatorChain;
pub use fir::{Fir2Dsp, Fir4Dsp};
pub use mixer::Mixer;

use crate::error::{ConfigError, ConfigResult};
use crate::fixed::Complex;

/// Host-programmable DDC parameters — one-to-one with the `ddc_*`
/// registers.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DdcConfig {
    pub frequency: u32,
    pub decimation1: u32,
    pub decimation2: u32,
    pub decimation3: u32,
    pub operations_minus_one1: u32,
    pub odd_operations1: bool,
    pub operations_minus_one2: u32,
    pub operations_minus_one3: u32,
    pub odd_operations3: bool,
    pub bypass2: bool,
    pub bypass3: bool,
    pub enable_input: bool,
    pub twiddle_width: u32,
    pub fir_truncate_bits: u32,
}

impl DdcConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.frequency >= 1 << 28 {
            return Err(ConfigError::ExceedsMaximum {
                field: "ddc.frequency",
                value: self.frequency as i64,
                max: (1i64 << 28) - 1,
            });
        }
        for (field, value) in [
            ("ddc.decimation1", self.decimation1),
            ("ddc.decimation2", self.decimation2),
            ("ddc.decimation3", self.decimation3),
        ] {
            if value == 0 {
                return Err(ConfigError::MustBeNonZero { field });
            }
        }
        if self.twiddle_width < 2 {
            return Err(ConfigError::WidthOutOfRange {
                field: "ddc.twiddle_width",
                width: self.twiddle_width,
                min: 2,
                max: 63,
            });
        }
        Ok(())
    }
}

/// The complete DDC: mixer feeding a three-stage decimator chain.
#[derive(Debug, Clone)]
pub struct Ddc {
    mixer: Mixer,
    chain: DecimatorChain,
    enabled: bool,
}

impl Ddc {
    pub fn new(config: &DdcConfig) -> ConfigResult<Self> {
        config.validate()?;
        let mixer = Mixer::new(config.frequency, config.twiddle_width);
        let stage1 = Fir4Dsp::new(
            config.operations_minus_one1,
            config.odd_operations1,
            config.decimation1,
            config.fir_truncate_bits,
        );
        let stage2 = Fir2Dsp::new(config.operations_minus_one2, config.decimation2, config.fir_truncate_bits);
        let stage3 = Fir4Dsp::new(
            config.operations_minus_one3,
            config.odd_operations3,
            config.decimation3,
            config.fir_truncate_bits,
        );
        let chain = DecimatorChain::new(stage1, stage2, stage3, config.bypass2, config.bypass3);
        Ok(Ddc {
            mixer,
            chain,
            enabled: config.enable_input,
        })
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_frequency(&mut self, frequency: u32) {
        self.mixer.set_frequency(frequency);
    }

    pub fn write_coeff(&mut self, addr: u16, value: i64) {
        self.chain.write_coeff(addr, value);
    }

    /// Consume one mixer-rate input sample; returns a decimator-rate output
    /// whenever the chain produces one. Returns `None` immediately if the
    /// DDC is disabled.
    pub fn step(&mut self, sample: Complex) -> Option<Complex> {
        if !self.enabled {
            return None;
        }
        let mixed = self.mixer.step(sample);
        self.chain.step(mixed)
    }

    pub fn decimator_chain_mut(&mut self) -> &mut DecimatorChain {
        &mut self.chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> DdcConfig {
        DdcConfig {
            frequency: 0,
            decimation1: 5,
            decimation2: 4,
            decimation3: 2,
            operations_minus_one1: 0,
            odd_operations1: false,
            operations_minus_one2: 0,
            operations_minus_one3: 0,
            odd_operations3: false,
            bypass2: false,
            bypass3: false,
            enable_input: true,
            twiddle_width: 18,
            fir_truncate_bits: 0,
        }
    }

    #[test]
    fn zero_frequency_with_unity_taps_decimates_by_stage_product() {
        let cfg = base_config();
        let mut ddc = Ddc::new(&cfg).unwrap();
        ddc.write_coeff(0, 1); // stage 1, tap 0 = 1 (unity, all other taps default to 0)
        let mut outputs = 0;
        for i in 0..400 {
            if ddc.step(Complex::new(i % 7, 0)).is_some() {
                outputs += 1;
            }
        }
        assert_eq!(outputs, 400 / 40);
    }

    #[test]
    fn disabled_ddc_never_produces_output() {
        let cfg = base_config();
        let mut ddc = Ddc::new(&cfg).unwrap();
        ddc.set_enabled(false);
        for i in 0..100 {
            assert!(ddc.step(Complex::new(i, 0)).is_none());
        }
    }

    #[test]
    fn frequency_at_or_above_2_28_is_rejected() {
        let mut cfg = base_config();
        cfg.frequency = 1 << 28;
        assert!(matches!(
            Ddc::new(&cfg),
            Err(ConfigError::ExceedsMaximum { .. })
        ));
    }
}
