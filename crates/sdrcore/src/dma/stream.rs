use crate::error::{ConfigError, ConfigResult};

/// Host-programmable stream DMA parameters.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DmaStreamConfig {
    pub base_address: u64,
    pub end_address: u64,
    pub beats_per_burst: u32,
    pub beat_bytes: u64,
    pub max_outstanding: u32,
}

impl DmaStreamConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        let burst_bytes = self.beats_per_burst as u64 * self.beat_bytes;
        if self.base_address % burst_bytes != 0 {
            return Err(ConfigError::MisalignedDmaBaseAddress {
                address: self.base_address,
                alignment: burst_bytes,
            });
        }
        if self.max_outstanding == 0 {
            return Err(ConfigError::MustBeNonZero {
                field: "dma_stream.max_outstanding",
            });
        }
        Ok(())
    }
}

/// Variable-length run writer between `base_address` and `end_address`.
///
/// Bursts of `beats_per_burst` beats are written back-to-back; a saturating
/// outstanding-burst counter bounds how far the write side can run ahead of
/// completion acknowledgements (`complete_burst`) — `ready()` goes low
/// while the counter is saturated, modelling the real design's
/// backpressure without needing an actual AXI response channel.
#[derive(Debug, Clone)]
pub struct StreamDma {
    base_address: u64,
    end_address: u64,
    beats_per_burst: u32,
    beat_bytes: u64,
    max_outstanding: u32,
    next_address: u64,
    pending_beats: u32,
    outstanding: u32,
    running: bool,
    stopping: bool,
    finished_pulse: bool,
}

impl StreamDma {
    pub fn new(config: &DmaStreamConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(StreamDma {
            base_address: config.base_address,
            end_address: config.end_address,
            beats_per_burst: config.beats_per_burst,
            beat_bytes: config.beat_bytes,
            max_outstanding: config.max_outstanding,
            next_address: config.base_address,
            pending_beats: 0,
            outstanding: 0,
            running: false,
            stopping: false,
            finished_pulse: false,
        })
    }

    pub fn start(&mut self) {
        self.next_address = self.base_address;
        self.pending_beats = 0;
        self.outstanding = 0;
        self.running = true;
        self.stopping = false;
        self.finished_pulse = false;
    }

    /// Request a stop. The run keeps draining outstanding bursts; once
    /// they have all completed, `finished` pulses once.
    pub fn stop(&mut self) {
        self.stopping = true;
    }

    pub fn ready(&self) -> bool {
        self.running && self.outstanding < self.max_outstanding
    }

    pub fn next_address(&self) -> u64 {
        self.next_address
    }

    /// `true` exactly on the cycle the run finishes (after `stop` or
    /// reaching `end_address`, once all outstanding bursts complete).
    pub fn take_finished_pulse(&mut self) -> bool {
        std::mem::take(&mut self.finished_pulse)
    }

    /// Push one beat. Returns `true` if accepted; the caller must hold the
    /// beat (backpressure) when this returns `false`.
    pub fn push_beat(&mut self) -> bool {
        if !self.ready() {
            return false;
        }
        if self.next_address >= self.end_address {
            self.stopping = true;
            return false;
        }
        self.pending_beats += 1;
        self.next_address += self.beat_bytes;
        if self.pending_beats == self.beats_per_burst {
            self.pending_beats = 0;
            self.outstanding = self.outstanding.saturating_add(1);
        }
        if self.next_address >= self.end_address {
            self.stopping = true;
        }
        true
    }

    /// Acknowledge one burst's write response.
    pub fn complete_burst(&mut self) {
        if self.outstanding > 0 {
            self.outstanding -= 1;
        }
        if self.stopping && self.outstanding == 0 && self.running {
            self.running = false;
            self.finished_pulse = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DmaStreamConfig {
        DmaStreamConfig {
            base_address: 0,
            end_address: 16 * 8 * 4, // 4 bursts worth
            beats_per_burst: 16,
            beat_bytes: 8,
            max_outstanding: 2,
        }
    }

    #[test]
    fn backpressure_asserts_when_outstanding_saturates() {
        let mut dma = StreamDma::new(&config()).unwrap();
        dma.start();
        for _ in 0..(16 * 2) {
            assert!(dma.push_beat());
        }
        // two full bursts outstanding now == max_outstanding
        assert!(!dma.ready());
        dma.complete_burst();
        assert!(dma.ready());
    }

    #[test]
    fn stop_drains_outstanding_then_pulses_finished() {
        let mut dma = StreamDma::new(&config()).unwrap();
        dma.start();
        for _ in 0..16 {
            dma.push_beat();
        }
        dma.stop();
        assert!(!dma.take_finished_pulse());
        dma.complete_burst();
        assert!(dma.take_finished_pulse());
    }
}
