use crate::fixed::{round_half_up128, Complex};

const LUT_SIZE: usize = 1024; // 10-bit phase address
const PHASE_BITS: u32 = 28;

/// NCO mixer: a 28-bit phase accumulator advances by a programmable
/// frequency word every valid sample; the top 10 bits address a
/// complex-exponential lookup table, and the input sample is multiplied by
/// the conjugate of the looked-up phasor to shift the programmed frequency
/// down to DC.
///
/// The LUT read is modelled as non-transparent with a one-cycle BRAM output
/// register, so `step`'s return value lags the phase that produced it by
/// one call — matching a read that is not visible until the cycle after
/// the address is presented. The extra least-significant bit left over
/// from the `Cmult` product is rounded half-up rather than truncated.
#[derive(Debug, Clone)]
pub struct Mixer {
    phase_accumulator: u32,
    frequency: u32,
    lut: Vec<Complex>,
    output_reg: Complex,
}

impl Mixer {
    pub fn new(frequency: u32, twiddle_width: u32) -> Self {
        let amplitude = ((1i64 << (twiddle_width - 1)) - 1) as f64;
        let lut = (0..LUT_SIZE)
            .map(|k| {
                let angle = 2.0 * std::f64::consts::PI * (k as f64) / (LUT_SIZE as f64);
                Complex::new(
                    (angle.cos() * amplitude).round() as i64,
                    (angle.sin() * amplitude).round() as i64,
                )
            })
            .collect();
        Mixer {
            phase_accumulator: 0,
            frequency: frequency & ((1u32 << PHASE_BITS) - 1),
            lut,
            output_reg: Complex::ZERO,
        }
    }

    pub fn set_frequency(&mut self, frequency: u32) {
        self.frequency = frequency & ((1u32 << PHASE_BITS) - 1);
    }

    pub fn step(&mut self, sample: Complex) -> Complex {
        let addr = (self.phase_accumulator >> (PHASE_BITS - 10)) as usize;
        let phasor = self.lut[addr % LUT_SIZE];
        // multiply by conj(phasor): (re*pre + im*pim, im*pre - re*pim)
        let re = (sample.re as i128) * (phasor.re as i128) + (sample.im as i128) * (phasor.im as i128);
        let im = (sample.im as i128) * (phasor.re as i128) - (sample.re as i128) * (phasor.im as i128);
        let product = Complex::new(round_half_up128(re, 1) as i64, round_half_up128(im, 1) as i64);

        self.phase_accumulator = self
            .phase_accumulator
            .wrapping_add(self.frequency)
            & ((1u32 << PHASE_BITS) - 1);

        let out = self.output_reg;
        self.output_reg = product;
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_frequency_is_near_identity_after_rounding() {
        let mut m = Mixer::new(0, 18);
        let s = Complex::new(1000, -500);
        let _warmup = m.step(s);
        let out = m.step(s);
        // phasor at address 0 is (amplitude, 0); conj-multiply by it should
        // scale but not rotate the sample.
        assert!(out.re > 0);
    }

    #[test]
    fn phase_accumulator_wraps_at_28_bits() {
        let mut m = Mixer::new((1u32 << 28) - 1, 18);
        for _ in 0..3 {
            m.step(Complex::new(1, 0));
        }
        assert!(m.phase_accumulator < (1u32 << 28));
    }
}
