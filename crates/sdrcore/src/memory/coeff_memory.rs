/// Coefficient / twiddle memory: a flat, owned table written by the host
/// before the first sample is processed and read thereafter by the
/// datapath.
///
/// Generic over the stored element so the same shape backs FIR coefficient
/// memories (`i64`, signed, keyed by stage+tap), window coefficient
/// memories (`u64`, unsigned, address-folded), and twiddle tables
/// (`Complex`).
#[derive(Debug, Clone)]
pub struct CoeffMemory<T> {
    data: Vec<T>,
}

impl<T: Clone + Default> CoeffMemory<T> {
    pub fn new(len: usize) -> Self {
        CoeffMemory {
            data: vec![T::default(); len],
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Host write. Out-of-range addresses are silently discarded, matching
    /// the core's treatment of host misuse.
    pub fn write(&mut self, addr: usize, value: T) {
        if let Some(slot) = self.data.get_mut(addr) {
            *slot = value;
        }
    }

    /// Datapath read. Out-of-range addresses return the default value
    /// rather than panicking — the controller is responsible for only ever
    /// generating addresses within range; this is a defensive fallback for
    /// the same reason an unmapped register read returns zero.
    pub fn read(&self, addr: usize) -> T {
        self.data.get(addr).cloned().unwrap_or_default()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_round_trips() {
        let mut mem: CoeffMemory<i64> = CoeffMemory::new(8);
        mem.write(3, 42);
        assert_eq!(mem.read(3), 42);
        assert_eq!(mem.read(4), 0);
    }

    #[test]
    fn out_of_range_write_is_discarded() {
        let mut mem: CoeffMemory<i64> = CoeffMemory::new(4);
        mem.write(100, 7); // no panic
        assert_eq!(mem.read(100), 0);
    }
}
