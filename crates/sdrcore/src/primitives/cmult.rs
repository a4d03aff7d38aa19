use crate::fixed::{truncate, Complex};

/// Complex multiplier `Cmult(Aw, Bw, T)`.
///
/// `re = (re_a*re_b - im_a*im_b) >> T`, `im = (re_a*im_b + im_a*re_b) >> T`.
/// Output width is `Aw + Bw + 1 - T`; the model does not enforce that width
/// on its own (the caller wraps, if the stage requires it) since several
/// stages rely on wrapping being deferred until after an accumulation.
///
/// `delay` records the declared pipeline latency for documentation and for
/// control-signal alignment in the FFT controller; a behavioural model
/// computes the product combinationally per step, so `delay` does not
/// itself introduce buffering here — callers that need the delay observable
/// (the FFT controller) track it explicitly alongside their own state.
#[derive(Debug, Clone, Copy)]
pub struct Cmult {
    pub truncate_bits: u32,
    pub delay: u32,
}

impl Cmult {
    pub fn new(truncate_bits: u32, delay: u32) -> Self {
        Cmult {
            truncate_bits,
            delay,
        }
    }

    /// Multiply two complex samples and truncate the product.
    pub fn multiply(&self, a: Complex, b: Complex) -> Complex {
        let re = (a.re as i128) * (b.re as i128) - (a.im as i128) * (b.im as i128);
        let im = (a.re as i128) * (b.im as i128) + (a.im as i128) * (b.re as i128);
        Complex::new(
            truncate(re as i64, self.truncate_bits),
            truncate(im as i64, self.truncate_bits),
        )
    }

    /// Multiply by the conjugate of `b` — used by the mixer, which shifts
    /// the programmed frequency to DC by multiplying by `conj(phasor)`.
    pub fn multiply_conj(&self, a: Complex, b: Complex) -> Complex {
        self.multiply(a, b.conj())
    }
}

/// Real-by-complex multiplier `Mult2x`: same contract as
/// [`Cmult`] with `im_b == 0`. Used by the FFT window stage.
#[derive(Debug, Clone, Copy)]
pub struct Mult2x {
    pub truncate_bits: u32,
    pub delay: u32,
}

impl Mult2x {
    pub fn new(truncate_bits: u32, delay: u32) -> Self {
        Mult2x {
            truncate_bits,
            delay,
        }
    }

    /// Multiply a complex sample by a real (unsigned) coefficient.
    pub fn multiply(&self, sample: Complex, coeff: u64) -> Complex {
        let coeff = coeff as i128;
        let re = (sample.re as i128) * coeff;
        let im = (sample.im as i128) * coeff;
        Complex::new(
            truncate(re as i64, self.truncate_bits),
            truncate(im as i64, self.truncate_bits),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Cmult is bit-exact against the closed-form expression evaluated
    // in arbitrary precision.
    #[test]
    fn cmult_matches_closed_form() {
        let m = Cmult::new(4, 3);
        let a = Complex::new(1234, -987);
        let b = Complex::new(-55, 321);
        let got = m.multiply(a, b);

        let re = (a.re as i128 * b.re as i128 - a.im as i128 * b.im as i128) >> 4;
        let im = (a.re as i128 * b.im as i128 + a.im as i128 * b.re as i128) >> 4;
        assert_eq!(got.re, re as i64);
        assert_eq!(got.im, im as i64);
    }

    #[test]
    fn cmult_zero_truncate_is_full_precision() {
        let m = Cmult::new(0, 0);
        let a = Complex::new(3, 4);
        let b = Complex::new(1, 0); // multiply by 1
        assert_eq!(m.multiply(a, b), a);
    }

    #[test]
    fn mult2x_scales_both_components_equally() {
        let m = Mult2x::new(2, 1);
        let s = Complex::new(8, -8);
        let out = m.multiply(s, 3);
        assert_eq!(out.re, (8 * 3) >> 2);
        assert_eq!(out.im, (-8 * 3) >> 2);
    }
}
