use crate::fixed::Complex;
use crate::memory::CoeffMemory;
use crate::primitives::Cmult;

/// Twiddle multiplier for one FFT stage.
///
/// Stores the coefficient `W_period^k = exp(-2*pi*i*k/period)` for each
/// index `k` in `[0, period)`, scaled to `twiddle_width`-bit amplitude.
/// Index 0 always maps to the constant `1` rather than a stored value. For
/// radix-2 stages, only the upper half of the period is physically stored:
/// the lower half is recovered from `W^(k+period/2) = -W^k`, halving
/// coefficient memory at the cost of one negation — transparent to the
/// caller, which always goes through [`Twiddle::multiply`].
#[derive(Debug, Clone)]
pub struct Twiddle {
    table: CoeffMemory<Complex>,
    period: usize,
    half_stored: bool,
    unit: Complex,
    cmult: Cmult,
}

impl Twiddle {
    pub fn new(period: usize, twiddle_width: u32, half_stored: bool) -> Self {
        let amplitude = ((1i64 << (twiddle_width - 1)) - 1) as f64;
        let store_len = if half_stored { period / 2 } else { period };
        let mut table = CoeffMemory::new(store_len);
        for k in 0..store_len {
            // When half-stored, row k physically holds W^(k + period/2).
            let idx = if half_stored { k + period / 2 } else { k };
            let angle = -2.0 * std::f64::consts::PI * (idx as f64) / (period as f64);
            let re = (angle.cos() * amplitude).round() as i64;
            let im = (angle.sin() * amplitude).round() as i64;
            table.write(k, Complex::new(re, im));
        }
        Twiddle {
            table,
            period,
            half_stored,
            unit: Complex::new(amplitude.round() as i64, 0),
            cmult: Cmult::new(twiddle_width.saturating_sub(2), 0),
        }
    }

    pub fn lookup(&self, index: usize) -> Complex {
        let k = index % self.period;
        if k == 0 {
            return self.unit;
        }
        if self.half_stored {
            if k < self.period / 2 {
                // W^k = -W^(k + period/2); the latter is row k of the table.
                -self.table.read(k)
            } else {
                self.table.read(k - self.period / 2)
            }
        } else {
            self.table.read(k)
        }
    }

    pub fn multiply(&self, sample: Complex, index: usize) -> Complex {
        self.cmult.multiply(sample, self.lookup(index))
    }
}

/// The trivial twiddle used between the two halves of a radix-2² stage (or
/// at the final stage of a plain radix-2 engine): multiplication by `1` for
/// three out of every four samples and by `-i` for the fourth, which needs
/// no real multiplier at all — just a register swap and negation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwiddleI;

impl TwiddleI {
    pub fn multiply(&self, sample: Complex, index: usize) -> Complex {
        if index % 4 == 3 {
            Complex::new(sample.im, -sample.re)
        } else {
            sample
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_zero_is_unity() {
        let tw = Twiddle::new(8, 16, true);
        let c = tw.lookup(0);
        assert_eq!(c.im, 0);
        assert!(c.re > 0);
    }

    #[test]
    fn half_stored_negation_symmetry_holds() {
        let tw = Twiddle::new(8, 16, true);
        let a = tw.lookup(1);
        let b = tw.lookup(5); // 1 + period/2
        assert_eq!(a.re, -b.re);
        assert_eq!(a.im, -b.im);
    }

    #[test]
    fn twiddle_i_negates_and_swaps_every_fourth_sample() {
        let ti = TwiddleI;
        let s = Complex::new(3, 7);
        assert_eq!(ti.multiply(s, 0), s);
        assert_eq!(ti.multiply(s, 3), Complex::new(7, -3));
    }
}
