use crate::fixed::truncate128;
use crate::memory::CoeffMemory;
use std::collections::VecDeque;

/// Shared polyphase FIR core: a tap delay line per IQ channel plus a
/// coefficient table, both sized to `taps`. `shift_in` pushes a new input
/// sample into the delay line every cycle; `compute` evaluates the full
/// MACC sum over the current window and rounds half-up by `2^(Tr-1)`
/// before truncating by `Tr` bits, matching the declared rounding rule for
/// both FIR4DSP and FIR2DSP stages.
#[derive(Debug, Clone)]
struct FirCore {
    coeffs: CoeffMemory<i64>,
    delay_re: VecDeque<i64>,
    delay_im: VecDeque<i64>,
    truncate_bits: u32,
}

impl FirCore {
    fn new(taps: usize, truncate_bits: u32) -> Self {
        FirCore {
            coeffs: CoeffMemory::new(taps),
            delay_re: std::iter::repeat(0).take(taps).collect(),
            delay_im: std::iter::repeat(0).take(taps).collect(),
            truncate_bits,
        }
    }

    fn taps(&self) -> usize {
        self.coeffs.len()
    }

    fn write_coeff(&mut self, idx: usize, value: i64) {
        self.coeffs.write(idx, value);
    }

    fn shift_in(&mut self, re: i64, im: i64) {
        self.delay_re.pop_back();
        self.delay_re.push_front(re);
        self.delay_im.pop_back();
        self.delay_im.push_front(im);
    }

    fn compute(&self) -> (i64, i64) {
        let bias: i128 = if self.truncate_bits > 0 {
            1i128 << (self.truncate_bits - 1)
        } else {
            0
        };
        let mut acc_re = bias;
        let mut acc_im = bias;
        for i in 0..self.taps() {
            let c = self.coeffs.read(i) as i128;
            acc_re += c * (self.delay_re[i] as i128);
            acc_im += c * (self.delay_im[i] as i128);
        }
        (
            truncate128(acc_re, self.truncate_bits) as i64,
            truncate128(acc_im, self.truncate_bits) as i64,
        )
    }
}

/// Two-multiplier-per-output polyphase FIR stage (FIR4DSP), used for
/// stages 1 and 3 of the decimator chain. `operations_minus_one` and
/// `odd_operations` describe how the real hardware packs tap pairs across
/// DSP slices; they do not change the arithmetic result (the tap count is
/// always `(operations_minus_one + 1) * 2`), so this model keeps them only
/// as read-only configuration for parity with host diagnostics.
#[derive(Debug, Clone)]
pub struct Fir4Dsp {
    core: FirCore,
    decimation: u32,
    phase: u32,
    operations_minus_one: u32,
    odd_operations: bool,
}

impl Fir4Dsp {
    pub fn new(operations_minus_one: u32, odd_operations: bool, decimation: u32, truncate_bits: u32) -> Self {
        let taps = (operations_minus_one as usize + 1) * 2;
        Fir4Dsp {
            core: FirCore::new(taps, truncate_bits),
            decimation: decimation.max(1),
            phase: 0,
            operations_minus_one,
            odd_operations,
        }
    }

    pub fn write_coeff(&mut self, idx: usize, value: i64) {
        self.core.write_coeff(idx, value);
    }

    pub fn operations_minus_one(&self) -> u32 {
        self.operations_minus_one
    }

    pub fn odd_operations(&self) -> bool {
        self.odd_operations
    }

    /// Consume one input sample. Returns `Some(output)` every
    /// `decimation`-th call.
    pub fn step(&mut self, re: i64, im: i64) -> Option<(i64, i64)> {
        self.core.shift_in(re, im);
        self.phase += 1;
        if self.phase == self.decimation {
            self.phase = 0;
            Some(self.core.compute())
        } else {
            None
        }
    }
}

/// One-multiplier-per-output polyphase FIR stage (FIR2DSP), used for
/// stage 2 of the decimator chain.
#[derive(Debug, Clone)]
pub struct Fir2Dsp {
    core: FirCore,
    decimation: u32,
    phase: u32,
    operations_minus_one: u32,
}

impl Fir2Dsp {
    pub fn new(operations_minus_one: u32, decimation: u32, truncate_bits: u32) -> Self {
        let taps = operations_minus_one as usize + 1;
        Fir2Dsp {
            core: FirCore::new(taps, truncate_bits),
            decimation: decimation.max(1),
            phase: 0,
            operations_minus_one,
        }
    }

    pub fn write_coeff(&mut self, idx: usize, value: i64) {
        self.core.write_coeff(idx, value);
    }

    pub fn operations_minus_one(&self) -> u32 {
        self.operations_minus_one
    }

    pub fn step(&mut self, re: i64, im: i64) -> Option<(i64, i64)> {
        self.core.shift_in(re, im);
        self.phase += 1;
        if self.phase == self.decimation {
            self.phase = 0;
            Some(self.core.compute())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unity_single_tap_fir4dsp_passes_decimated_samples_through() {
        let mut fir = Fir4Dsp::new(0, false, 2, 0); // 2 taps, decimate by 2
        fir.write_coeff(0, 1);
        fir.write_coeff(1, 0);
        assert_eq!(fir.step(10, -10), None);
        assert_eq!(fir.step(20, -20), Some((20, -20))); // newest tap weighted 1
    }

    #[test]
    fn fir2dsp_averages_two_taps() {
        let mut fir = Fir2Dsp::new(1, 1, 1); // 2 taps, decimate by 1, >>1
        fir.write_coeff(0, 1);
        fir.write_coeff(1, 1);
        let _ = fir.step(4, 0);
        let out = fir.step(6, 0).unwrap();
        assert_eq!(out.0, (4 + 6 + 1) >> 1); // round-half-up average
    }
}
