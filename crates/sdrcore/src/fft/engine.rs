use super::{
    bit_reverse, controller::FftController, digit_reverse_base4, window::Window, FftConfig, R22Sdf,
    R2Sdf, R4Sdf, Radix, Role, Twiddle, TwiddleI,
};
use crate::fixed::Complex;

/// One sample emitted by an [`FftEngine`] alongside the strobe that marks
/// the last sample of a completed transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FftStepOutput {
    pub sample: Complex,
    pub out_last: bool,
}

#[derive(Debug, Clone)]
struct Radix2Pipeline {
    stages: Vec<R2Sdf>,
    twiddles: Vec<Twiddle>,
    trivial: TwiddleI,
}

#[derive(Debug, Clone)]
struct Radix4Pipeline {
    stages: Vec<R4Sdf>,
    twiddles: Vec<Twiddle>,
}

#[derive(Debug, Clone)]
struct Radix22Pipeline {
    stages: Vec<R22Sdf>,
    twiddles: Vec<Twiddle>,
}

/// Monomorphic tagged union of the three supported FFT architectures, each
/// driven by the same [`FftController`] schedule.
#[derive(Debug, Clone)]
pub enum FftEngine {
    Radix2 {
        order: u32,
        pipeline: Radix2Pipeline,
        window: Option<Window>,
        controller: FftController,
    },
    Radix4 {
        order: u32,
        pipeline: Radix4Pipeline,
        window: Option<Window>,
        controller: FftController,
    },
    Radix22 {
        order: u32,
        pipeline: Radix22Pipeline,
        window: Option<Window>,
        controller: FftController,
    },
}

impl FftEngine {
    pub fn new(config: &FftConfig) -> Self {
        config.validate().expect("FftConfig must be validated before constructing an FftEngine");
        let order = config.order;
        let window = config
            .windowed
            .then(|| Window::new(1usize << order, config.window_truncate_bits));
        match config.radix {
            Radix::Two => {
                let mut stages = Vec::new();
                let mut twiddles = Vec::new();
                for (i, &t) in config.truncate_schedule.iter().enumerate() {
                    let stage_order = order - i as u32;
                    stages.push(R2Sdf::new(stage_order, config.width, t, Role::Normal));
                    if i + 1 < config.truncate_schedule.len() {
                        let period = 1usize << stage_order;
                        twiddles.push(Twiddle::new(period, config.twiddle_width, true));
                    }
                }
                let latency = stages.iter().map(|s| s.latency()).sum();
                FftEngine::Radix2 {
                    order,
                    pipeline: Radix2Pipeline {
                        stages,
                        twiddles,
                        trivial: TwiddleI,
                    },
                    window,
                    controller: FftController::new(latency),
                }
            }
            Radix::Four => {
                let mut stages = Vec::new();
                let mut twiddles = Vec::new();
                let stage_count = config.stage_count();
                for (i, &t) in config.truncate_schedule.iter().enumerate() {
                    let stage_order = (order / 2) - i as u32;
                    stages.push(R4Sdf::new(stage_order, config.width, t));
                    if (i as u32) + 1 < stage_count {
                        let period = 1usize << (2 * stage_order);
                        twiddles.push(Twiddle::new(period, config.twiddle_width, false));
                    }
                }
                let latency = stages.iter().map(|s| s.latency()).sum();
                FftEngine::Radix4 {
                    order,
                    pipeline: Radix4Pipeline { stages, twiddles },
                    window,
                    controller: FftController::new(latency),
                }
            }
            Radix::TwoSquared => {
                let mut stages = Vec::new();
                let mut twiddles = Vec::new();
                let stage_count = config.stage_count();
                for (i, &t) in config.truncate_schedule.iter().enumerate() {
                    let stage_order = order - 2 * i as u32;
                    stages.push(R22Sdf::new(stage_order, config.width, t, 0));
                    if (i as u32) + 1 < stage_count {
                        let period = 1usize << stage_order;
                        twiddles.push(Twiddle::new(period, config.twiddle_width, false));
                    }
                }
                let latency = stages.iter().map(|s| s.latency()).sum();
                FftEngine::Radix22 {
                    order,
                    pipeline: Radix22Pipeline { stages, twiddles },
                    window,
                    controller: FftController::new(latency),
                }
            }
        }
    }

    pub fn order(&self) -> u32 {
        match self {
            FftEngine::Radix2 { order, .. }
            | FftEngine::Radix4 { order, .. }
            | FftEngine::Radix22 { order, .. } => *order,
        }
    }

    /// Total cycles between a sample entering the engine and the
    /// corresponding transformed sample leaving it.
    pub fn latency(&self) -> u64 {
        match self {
            FftEngine::Radix2 { pipeline, .. } => pipeline.stages.iter().map(|s| s.latency()).sum(),
            FftEngine::Radix4 { pipeline, .. } => pipeline.stages.iter().map(|s| s.latency()).sum(),
            FftEngine::Radix22 { pipeline, .. } => pipeline.stages.iter().map(|s| s.latency()).sum(),
        }
    }

    /// Map a pipeline-emission-order index to its natural (DC-first)
    /// position: bit-reversal for radix-2, base-4 digit-reversal otherwise.
    pub fn bin_reorder(&self, index: usize) -> usize {
        match self {
            FftEngine::Radix2 { order, .. } => bit_reverse(index, *order),
            FftEngine::Radix4 { order, .. } | FftEngine::Radix22 { order, .. } => {
                digit_reverse_base4(index, order / 2)
            }
        }
    }

    pub fn step(&mut self, input: Complex) -> FftStepOutput {
        match self {
            FftEngine::Radix2 {
                order,
                pipeline,
                window,
                controller,
            } => {
                let windowed = match window {
                    Some(w) => w.apply(input, controller.twiddle_index(*order)),
                    None => input,
                };
                let mut sample = windowed;
                let last_idx = pipeline.stages.len() - 1;
                for (i, stage) in pipeline.stages.iter_mut().enumerate() {
                    let stage_order = *order - i as u32;
                    let mux = controller.mux_control(stage_order);
                    sample = stage.step(sample, mux, false);
                    if i < last_idx {
                        let idx = controller.twiddle_index(stage_order);
                        sample = pipeline.twiddles[i].multiply(sample, idx);
                    } else {
                        sample = pipeline.trivial.multiply(sample, controller.twiddle_index(stage_order));
                    }
                }
                let out_last = controller.take_out_last(*order);
                controller.advance();
                FftStepOutput { sample, out_last }
            }
            FftEngine::Radix4 {
                order,
                pipeline,
                window,
                controller,
            } => {
                let windowed = match window {
                    Some(w) => w.apply(input, controller.twiddle_index(*order)),
                    None => input,
                };
                let mut sample = windowed;
                let last_idx = pipeline.stages.len() - 1;
                for (i, stage) in pipeline.stages.iter_mut().enumerate() {
                    sample = stage.step(sample);
                    if i < last_idx {
                        let stage_order = stage.order();
                        let period = 1usize << (2 * stage_order);
                        let quarter = period / 4;
                        // This stage emits its four DIF branches
                        // block-contiguous (all of y0, then y1, ...), so
                        // the raw counter position decomposes into
                        // (branch, position-within-branch); the twiddle
                        // angle a branch needs is `branch * position`, not
                        // the raw position itself.
                        let pos = controller.twiddle_index(2 * stage_order);
                        let branch = pos / quarter;
                        let pos_in_branch = pos % quarter;
                        let idx = branch * pos_in_branch;
                        sample = pipeline.twiddles[i].multiply(sample, idx);
                    }
                }
                let out_last = controller.take_out_last(*order);
                controller.advance();
                FftStepOutput { sample, out_last }
            }
            FftEngine::Radix22 {
                order,
                pipeline,
                window,
                controller,
            } => {
                let windowed = match window {
                    Some(w) => w.apply(input, controller.twiddle_index(*order)),
                    None => input,
                };
                let mut sample = windowed;
                let last_idx = pipeline.stages.len() - 1;
                let mut stage_order = *order;
                for (i, stage) in pipeline.stages.iter_mut().enumerate() {
                    let mux_a = controller.mux_control(stage_order);
                    let mux_b = controller.mux_control(stage_order - 1);
                    sample = stage.step(sample, mux_a, mux_b);
                    if i < last_idx {
                        let idx = controller.twiddle_index(stage_order - 2);
                        sample = pipeline.twiddles[i].multiply(sample, idx);
                    }
                    stage_order -= 2;
                }
                let out_last = controller.take_out_last(*order);
                controller.advance();
                FftStepOutput { sample, out_last }
            }
        }
    }
}
