use crate::fixed::Complex;
use crate::memory::CoeffMemory;
use crate::primitives::Mult2x;

/// Address-folded window multiplier applied to samples before they enter
/// the FFT engine.
///
/// A symmetric `N`-point window needs only `N/2` unique coefficients; the
/// other half is recovered by mirroring the address around the window's
/// midpoint. `fold_address` implements that mirroring so the host only ever
/// needs to program the left half of the window into [`CoeffMemory`].
#[derive(Debug, Clone)]
pub struct Window {
    coeffs: CoeffMemory<u64>,
    mult: Mult2x,
    index_bits: u32,
}

impl Window {
    pub fn new(size: usize, truncate_bits: u32) -> Self {
        let index_bits = size.trailing_zeros();
        Window {
            coeffs: CoeffMemory::new(size / 2),
            mult: Mult2x::new(truncate_bits, 0),
            index_bits,
        }
    }

    /// Fold an `index_bits`-bit sample index down into the left-half
    /// address range: the top bit selects whether the remaining bits are
    /// taken as-is or bit-inverted, mirroring the index about the window's
    /// center.
    pub fn fold_address(index: usize, index_bits: u32) -> usize {
        let half_bits = index_bits - 1;
        let mask = (1usize << half_bits) - 1;
        let msb = (index >> half_bits) & 1 == 1;
        let lsbs = index & mask;
        if msb {
            (!lsbs) & mask
        } else {
            lsbs
        }
    }

    /// Host write of one left-half coefficient.
    pub fn write_coeff(&mut self, addr: usize, value: u64) {
        self.coeffs.write(addr, value);
    }

    pub fn apply(&self, sample: Complex, index: usize) -> Complex {
        let addr = Self::fold_address(index, self.index_bits);
        let coeff = self.coeffs.read(addr);
        self.mult.multiply(sample, coeff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_address_mirrors_about_center() {
        // 8-point window: indices 0..4 map directly, 4..8 mirror back.
        assert_eq!(Window::fold_address(0, 3), 0);
        assert_eq!(Window::fold_address(3, 3), 3);
        assert_eq!(Window::fold_address(4, 3), 3);
        assert_eq!(Window::fold_address(7, 3), 0);
    }

    #[test]
    fn apply_uses_mirrored_coefficient() {
        let mut w = Window::new(8, 0);
        w.write_coeff(0, 100);
        w.write_coeff(3, 50);
        let s = Complex::new(4, -4);
        assert_eq!(w.apply(s, 0), Complex::new(400, -400));
        assert_eq!(w.apply(s, 7), Complex::new(400, -400)); // mirrors to addr 0
        assert_eq!(w.apply(s, 3), Complex::new(200, -200));
    }
}
