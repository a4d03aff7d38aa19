//! Top-level composition: wires every component of the signal path
//! together behind a single host-facing register map.

use crate::ddc::{Ddc, DdcConfig};
use crate::dma::{DmaRingConfig, DmaStreamConfig, RingDma, StreamDma};
use crate::error::ConfigResult;
use crate::fft::{FftConfig, FftEngine};
use crate::fixed::Complex;
use crate::memory::AsyncFifo;
use crate::packer::{Recorder, RecorderMode};
use crate::regmap::SdrRegisterMap;
use crate::spectrometer::{Spectrometer, SpectrometerConfig};

const INPUT_FIFO_DEPTH: usize = 64;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SdrCoreConfig {
    pub fft: FftConfig,
    pub ddc: DdcConfig,
    pub spectrometer: SpectrometerConfig,
    pub dma_ring: DmaRingConfig,
    pub dma_stream: DmaStreamConfig,
    pub recorder_mode: RecorderMode,
    pub platform: u8,
    /// `log2` of the DMA ring's buffer count — sizes the `last_buffer`
    /// register field.
    pub ring_buffer_count_log2: u32,
}

/// One cycle's observable side effects, reported back to a host-facing
/// simulation loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct SdrCoreStepOutput {
    pub ring_burst_address: Option<u64>,
    pub stream_burst_word: Option<u64>,
}

/// The complete signal-processing core: CDC input FIFO, optional DDC,
/// windowed FFT feeding the spectrum integrator and its ring DMA, and the
/// recorder's packer/FIFO/repacker feeding the stream DMA — all behind one
/// register map.
#[derive(Debug)]
pub struct SdrCore {
    input_fifo: AsyncFifo<Complex>,
    ddc: Ddc,
    fft: FftEngine,
    spectrometer: Spectrometer,
    recorder: Recorder,
    ring_dma: RingDma,
    stream_dma: StreamDma,
    regs: SdrRegisterMap,
    fft_output_counter: usize,
    pending_ring_beats: u32,
}

impl SdrCore {
    pub fn new(config: &SdrCoreConfig) -> ConfigResult<Self> {
        let ddc = Ddc::new(&config.ddc)?;
        config.spectrometer.validate()?;
        let fft = FftEngine::new(&config.fft);
        let spectrometer = Spectrometer::new(&config.spectrometer)?;
        let ring_dma = RingDma::new(&config.dma_ring)?;
        let stream_dma = StreamDma::new(&config.dma_stream)?;
        let mut regs = SdrRegisterMap::new(config.platform, config.ring_buffer_count_log2);
        regs.host_write(0x20, (config.spectrometer.num_integrations) << 1, 0b1111);

        Ok(SdrCore {
            input_fifo: AsyncFifo::new(INPUT_FIFO_DEPTH),
            ddc,
            fft,
            spectrometer,
            recorder: Recorder::new(config.recorder_mode),
            ring_dma,
            stream_dma,
            regs,
            fft_output_counter: 0,
            pending_ring_beats: 0,
        })
    }

    pub fn registers(&self) -> &SdrRegisterMap {
        &self.regs
    }

    pub fn register_write(&mut self, word_offset: u32, data: u32, byte_strobes: u8) -> bool {
        self.regs.host_write(word_offset, data, byte_strobes)
    }

    pub fn register_read(&mut self, word_offset: u32) -> (u32, bool) {
        self.regs.host_read(word_offset)
    }

    /// Apply host register writes that must take effect before the next
    /// sample is processed: coefficient loads, frequency changes,
    /// start/stop pulses, and the abort strobe. Call once per primary
    /// clock before `step`.
    pub fn sync_from_registers(&mut self) {
        if self.regs.take_ddc_coeff_wren_pulse() {
            let addr = self.regs.ddc_coeff_waddr();
            let value = self.regs.ddc_coeff_wdata();
            self.ddc.write_coeff(addr, value);
        }
        self.ddc.set_frequency(self.regs.ddc_frequency());
        self.ddc.set_enabled(self.regs.ddc_enable_input());

        if self.regs.take_recorder_start_pulse() {
            self.recorder.set_mode(RecorderMode::from_field(self.regs.recorder_mode()));
            self.recorder.start();
        }
        if self.regs.take_recorder_stop_pulse() {
            self.recorder.stop();
        }
        self.regs.set_recorder_dropped_samples(self.recorder.dropped());
        if self.recorder.dropped() {
            self.regs.assert_recorder_interrupt();
        }

        if self.regs.take_spectrometer_abort_pulse() {
            self.spectrometer.request_abort();
        }
        self.regs.set_spectrometer_last_buffer(self.spectrometer.last_buffer() as u32);

        self.regs.tick();
    }

    /// Feed one CDC-domain IQ sample through the whole pipeline, producing
    /// whatever DMA activity results.
    pub fn step(&mut self, sample: Complex) -> SdrCoreStepOutput {
        self.input_fifo.write(sample);
        let mut output = SdrCoreStepOutput::default();
        let Some(raw) = self.input_fifo.try_read() else {
            return output;
        };

        let ddc_out = self.ddc.step(raw);

        let spectrometer_input = if self.regs.spectrometer_use_ddc_out() {
            ddc_out
        } else {
            Some(raw)
        };
        if let Some(s) = spectrometer_input {
            let step = self.fft.step(s);
            // `BinMemory::munge_address` already performs the bit-reversal
            // (plus fftshift) that maps this linear emission-order counter
            // to its physical bin address; reordering it here first would
            // cancel that out and leave the write unshifted.
            let frame_size = 1usize << self.fft.order();
            let done = self.spectrometer.process_sample(self.fft_output_counter, step.sample, step.out_last);
            self.fft_output_counter = (self.fft_output_counter + 1) % frame_size;
            if done {
                self.regs.assert_spectrometer_interrupt();
            }
        }

        if let Some(s) = ddc_out {
            self.recorder.push_sample(s);
        }

        if let Some(word) = self.recorder.pull_burst_word() {
            output.stream_burst_word = Some(word);
        }

        output
    }

    /// Drain one beat of ring-DMA traffic from the just-completed bin
    /// memory; call `beats_per_buffer` times per completed integration.
    pub fn pump_ring_dma(&mut self) -> Option<u64> {
        if let Some(addr) = self.ring_dma.push_beat() {
            self.pending_ring_beats = 0;
            return Some(addr);
        }
        self.pending_ring_beats += 1;
        None
    }

    pub fn pump_stream_dma(&mut self, word: u64) -> bool {
        if !self.stream_dma.ready() {
            return false;
        }
        self.stream_dma.push_beat();
        let _ = word;
        true
    }

    pub fn spectrometer(&self) -> &Spectrometer {
        &self.spectrometer
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ddc::DdcConfig;
    use crate::dma::{DmaRingConfig, DmaStreamConfig};
    use crate::fft::{FftConfig, Radix};
    use crate::spectrometer::SpectrometerConfig;

    fn config() -> SdrCoreConfig {
        SdrCoreConfig {
            fft: FftConfig {
                order: 3,
                radix: Radix::Two,
                width: 18,
                twiddle_width: 18,
                truncate_schedule: vec![1, 1, 1],
                windowed: false,
                window_truncate_bits: 0,
            },
            ddc: DdcConfig {
                frequency: 0,
                decimation1: 1,
                decimation2: 1,
                decimation3: 1,
                operations_minus_one1: 0,
                odd_operations1: false,
                operations_minus_one2: 0,
                operations_minus_one3: 0,
                odd_operations3: false,
                bypass2: true,
                bypass3: true,
                enable_input: false,
                twiddle_width: 18,
                fir_truncate_bits: 0,
            },
            spectrometer: SpectrometerConfig {
                use_ddc_out: false,
                num_integrations: 1,
                peak_detect: false,
                order: 3,
                win_bits: 18,
                fw_bits: 16,
            },
            dma_ring: DmaRingConfig {
                base_address: 0,
                buffer_count: 2,
                beats_per_buffer: 8,
                beat_bytes: 8,
            },
            dma_stream: DmaStreamConfig {
                base_address: 0x1000,
                end_address: 0x2000,
                beats_per_burst: 16,
                beat_bytes: 8,
                max_outstanding: 2,
            },
            recorder_mode: RecorderMode::Sixteen,
            platform: 1,
            ring_buffer_count_log2: 1,
        }
    }

    #[test]
    fn constructs_and_steps_a_full_frame_without_panicking() {
        let mut core = SdrCore::new(&config()).unwrap();
        core.sync_from_registers();
        for i in 0..64 {
            core.step(Complex::new(i % 5, 0));
        }
    }

    #[test]
    fn recorder_start_pulse_enables_packing() {
        let mut core = SdrCore::new(&config()).unwrap();
        core.register_write(0x10, 1, 0b1111); // recorder_control.start
        core.sync_from_registers();
        assert!(core.recorder().running());
    }
}
