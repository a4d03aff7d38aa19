use std::collections::VecDeque;

/// Generates the `mux_control`/`twiddle_index`/`out_last` schedule shared
/// by every butterfly and twiddle stage in an engine.
///
/// Every stage in this model consumes exactly one sample and produces
/// exactly one sample per cycle (the block-buffered [`super::R4Sdf`] hides
/// its internal period behind a draining output queue rather than ever
/// stalling its input), so a single free-running counter, advanced once per
/// engine step, is sufficient to derive every stage's local `mux_control`
/// and `twiddle_index` phase: stage `i`, which processes
/// `2^(order-i)`-sample periods, reads off the same counter modulo its own
/// period — this is the same single-counter control scheme the original
/// hardware's per-stage counters reduce to once their relative phase
/// offsets are folded in.
///
/// `out_last` cannot be read off that same raw counter, though: it must
/// mark the last sample of a completed transform *at the engine's output*,
/// and the output lags the input by the pipeline's accumulated latency
/// (the sum of every stage's delay-line length). The controller tracks
/// that latency explicitly and delays the frame-boundary strobe through a
/// FIFO of exactly that length, so `out_last` lines up with the sample it
/// actually describes instead of the input sample that triggered it.
#[derive(Debug, Clone)]
pub struct FftController {
    counter: u64,
    pending_last: VecDeque<bool>,
}

impl FftController {
    /// `output_latency` is the total number of cycles between a sample
    /// entering the engine and the corresponding transformed sample
    /// leaving it (the sum of every stage's own latency).
    pub fn new(output_latency: u64) -> Self {
        FftController {
            counter: 0,
            pending_last: std::iter::repeat(false).take(output_latency as usize).collect(),
        }
    }

    /// `true` during the "computing" half of the `2^stage_order`-sample
    /// period — the second half, where butterflies combine rather than
    /// fill.
    pub fn mux_control(&self, stage_order: u32) -> bool {
        let period = 1u64 << stage_order;
        let half = period / 2;
        (self.counter % period) >= half
    }

    /// The twiddle index for a stage whose local period is
    /// `2^stage_order` samples.
    pub fn twiddle_index(&self, stage_order: u32) -> usize {
        let period = 1u64 << stage_order;
        (self.counter % period) as usize
    }

    /// `true` on the cycle the engine emits the last sample of a completed
    /// `2^full_order`-sample transform — the strobe that tells downstream
    /// consumers (spectrum integrator, bin memory) a full frame is ready.
    ///
    /// Must be called exactly once per [`Self::advance`], in step order:
    /// it threads the frame-boundary flag through the controller's
    /// output-latency delay queue.
    pub fn take_out_last(&mut self, full_order: u32) -> bool {
        let period = 1u64 << full_order;
        let raw = (self.counter % period) == period - 1;
        self.pending_last.push_back(raw);
        self.pending_last.pop_front().unwrap_or(raw)
    }

    pub fn advance(&mut self) {
        self.counter = self.counter.wrapping_add(1);
    }

    pub fn counter(&self) -> u64 {
        self.counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mux_control_splits_period_in_half() {
        let mut c = FftController::new(0);
        let mut seen = Vec::new();
        for _ in 0..8 {
            seen.push(c.mux_control(3)); // period 8
            c.advance();
        }
        assert_eq!(seen, vec![false, false, false, false, true, true, true, true]);
    }

    #[test]
    fn out_last_strobes_once_per_frame() {
        let mut c = FftController::new(0);
        let mut strobes = 0;
        for _ in 0..16 {
            if c.take_out_last(3) {
                strobes += 1;
            }
            c.advance();
        }
        assert_eq!(strobes, 2); // two 8-sample frames in 16 cycles
    }

    #[test]
    fn out_last_is_delayed_by_the_configured_output_latency() {
        // With a 3-cycle output latency, the frame-boundary strobe for the
        // first (period-8) frame should appear 3 cycles later than it
        // would with no latency at all.
        let mut c = FftController::new(3);
        let mut first_strobe_at = None;
        for cycle in 0..16 {
            if c.take_out_last(3) && first_strobe_at.is_none() {
                first_strobe_at = Some(cycle);
            }
            c.advance();
        }
        assert_eq!(first_strobe_at, Some(7 + 3));
    }
}
