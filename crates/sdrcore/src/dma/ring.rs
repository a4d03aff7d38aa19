use crate::error::{ConfigError, ConfigResult};

/// Fixed-size ring buffer DMA writer.
///
/// Writes bursts of `beats_per_buffer` data beats into a host-memory ring
/// of `buffer_count` (`= 2^b`) equal-size buffers starting at
/// `base_address`. Once a buffer fills, the burst's target address is
/// produced, the last-buffer counter advances, and the write cursor wraps
/// to the next buffer modulo `buffer_count`.
#[derive(Debug, Clone)]
pub struct RingDma {
    base_address: u64,
    buffer_count: u32,
    beats_per_buffer: u32,
    beat_bytes: u64,
    buffer_index: u32,
    last_buffer: u32,
    pending_beats: u32,
    busy: bool,
}

/// Host-programmable ring DMA parameters.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DmaRingConfig {
    pub base_address: u64,
    pub buffer_count: u32,
    pub beats_per_buffer: u32,
    pub beat_bytes: u64,
}

impl DmaRingConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.buffer_count.is_power_of_two() {
            return Err(ConfigError::RingBufferCountNotPowerOfTwo {
                count: self.buffer_count,
            });
        }
        let buffer_bytes = self.beats_per_buffer as u64 * self.beat_bytes;
        if self.base_address % buffer_bytes != 0 {
            return Err(ConfigError::MisalignedDmaBaseAddress {
                address: self.base_address,
                alignment: buffer_bytes,
            });
        }
        Ok(())
    }
}

impl RingDma {
    pub fn new(config: &DmaRingConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(RingDma {
            base_address: config.base_address,
            buffer_count: config.buffer_count,
            beats_per_buffer: config.beats_per_buffer,
            beat_bytes: config.beat_bytes,
            buffer_index: 0,
            last_buffer: 0,
            pending_beats: 0,
            busy: false,
        })
    }

    pub fn last_buffer(&self) -> u32 {
        self.last_buffer
    }

    pub fn busy(&self) -> bool {
        self.busy
    }

    fn buffer_address(&self, index: u32) -> u64 {
        self.base_address + (index as u64) * (self.beats_per_buffer as u64) * self.beat_bytes
    }

    /// Push one beat into the current buffer. Returns the destination
    /// address once the buffer has filled (one "start" pulse worth of
    /// burst).
    pub fn push_beat(&mut self) -> Option<u64> {
        self.busy = true;
        self.pending_beats += 1;
        if self.pending_beats < self.beats_per_buffer {
            return None;
        }
        let addr = self.buffer_address(self.buffer_index);
        self.pending_beats = 0;
        self.buffer_index = (self.buffer_index + 1) % self.buffer_count;
        self.last_buffer = self.last_buffer.wrapping_add(1) % self.buffer_count;
        self.busy = false;
        Some(addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DmaRingConfig {
        DmaRingConfig {
            base_address: 0,
            buffer_count: 4,
            beats_per_buffer: 16,
            beat_bytes: 8,
        }
    }

    #[test]
    fn fires_once_per_full_buffer_and_wraps() {
        let mut dma = RingDma::new(&config()).unwrap();
        let mut fired = Vec::new();
        for _ in 0..(16 * 5) {
            if let Some(addr) = dma.push_beat() {
                fired.push(addr);
            }
        }
        assert_eq!(fired.len(), 5);
        assert_eq!(fired[0], 0);
        assert_eq!(fired[1], 16 * 8);
        assert_eq!(fired[4], 16 * 8); // buffer 0 again, wrapped after 4 buffers
        assert_eq!(dma.last_buffer(), 1);
    }

    #[test]
    fn rejects_non_power_of_two_buffer_count() {
        let mut cfg = config();
        cfg.buffer_count = 3;
        assert!(matches!(
            RingDma::new(&cfg),
            Err(ConfigError::RingBufferCountNotPowerOfTwo { .. })
        ));
    }
}
