use crate::error::{ConfigError, ConfigResult};

/// Which butterfly family an FFT engine is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Radix {
    Two,
    Four,
    TwoSquared,
}

impl Radix {
    fn log2(self) -> u32 {
        match self {
            Radix::Two => 1,
            Radix::Four | Radix::TwoSquared => 2,
        }
    }
}

/// Host-programmable parameters for one FFT engine instance.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FftConfig {
    /// `log2(N)`, the transform length exponent.
    pub order: u32,
    pub radix: Radix,
    /// Input sample width in bits.
    pub width: u32,
    /// Twiddle coefficient width in bits.
    pub twiddle_width: u32,
    /// Per-stage truncation bit counts, one entry per butterfly stage.
    pub truncate_schedule: Vec<u32>,
    pub windowed: bool,
    pub window_truncate_bits: u32,
}

impl FftConfig {
    pub fn stage_count(&self) -> u32 {
        self.order / self.radix.log2()
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.order == 0 {
            return Err(ConfigError::MustBeNonZero { field: "fft.order" });
        }
        if self.order % self.radix.log2() != 0 {
            return Err(ConfigError::FftOrderNotDivisible {
                order: self.order,
                radix_log2: self.radix.log2(),
            });
        }
        if self.width == 0 || self.width > 63 {
            return Err(ConfigError::WidthOutOfRange {
                field: "fft.width",
                width: self.width,
                min: 1,
                max: 63,
            });
        }
        if self.twiddle_width < 2 {
            return Err(ConfigError::WidthOutOfRange {
                field: "fft.twiddle_width",
                width: self.twiddle_width,
                min: 2,
                max: 63,
            });
        }
        let expected_stages = self.stage_count() as usize;
        if self.truncate_schedule.len() != expected_stages {
            return Err(ConfigError::InvalidTruncateSchedule {
                field: "fft.truncate_schedule",
                reason: format!(
                    "expected {expected_stages} entries for order {} radix {:?}, got {}",
                    self.order,
                    self.radix,
                    self.truncate_schedule.len()
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radix4_requires_even_order() {
        let cfg = FftConfig {
            order: 3,
            radix: Radix::Four,
            width: 18,
            twiddle_width: 18,
            truncate_schedule: vec![1],
            windowed: false,
            window_truncate_bits: 0,
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::FftOrderNotDivisible { .. })
        ));
    }

    #[test]
    fn schedule_length_must_match_stage_count() {
        let cfg = FftConfig {
            order: 4,
            radix: Radix::Two,
            width: 18,
            twiddle_width: 18,
            truncate_schedule: vec![1, 1],
            windowed: false,
            window_truncate_bits: 0,
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidTruncateSchedule { .. })
        ));
    }
}
