//! Two-stage temperature denoiser
//!
//! Stage 1 is a slew limiter: the admitted value moves toward the new
//! sample by at most `limit` per call. Stage 2 is a trailing average
//! weighted `order - 1` to 1 toward history.

/// Denoiser state carried between samples
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Denoiser {
    /// Output of the slew limiter
    slew: f64,
    /// Trailing average (the denoised temperature)
    buffer: f64,
    /// False until the first sample seeds both stages
    primed: bool,
}

impl Denoiser {
    /// Create an unseeded denoiser
    pub const fn new() -> Self {
        Self {
            slew: 0.0,
            buffer: 0.0,
            primed: false,
        }
    }

    /// Forget history; the next sample seeds both stages
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Last denoised value (0 before the first sample)
    pub fn value(&self) -> f64 {
        self.buffer
    }

    /// Feed one sample and return the denoised temperature
    ///
    /// `order` below 1 is treated as 1 (pass-through).
    pub fn denoise(&mut self, sample: f64, order: u8, limit: f64) -> f64 {
        if !self.primed {
            self.slew = sample;
            self.buffer = sample;
            self.primed = true;
            return self.buffer;
        }

        if sample - self.slew > limit {
            self.slew += limit;
        } else if self.slew - sample > limit {
            self.slew -= limit;
        } else {
            self.slew = sample;
        }

        // (slew + buffer * (order - 1)) / order, arranged so a settled
        // buffer stays bit-exact
        let order = f64::from(order.max(1));
        self.buffer += (self.slew - self.buffer) / order;
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_sample_seeds() {
        let mut d = Denoiser::new();
        assert_eq!(d.denoise(42.5, 8, 1.0), 42.5);
        assert_eq!(d.value(), 42.5);
    }

    #[test]
    fn test_order_one_is_pass_through_within_limit() {
        let mut d = Denoiser::new();
        d.denoise(20.0, 1, 5.0);
        assert_eq!(d.denoise(23.0, 1, 5.0), 23.0);
        assert_eq!(d.denoise(19.5, 1, 5.0), 19.5);
    }

    #[test]
    fn test_order_zero_behaves_as_one() {
        let mut d = Denoiser::new();
        d.denoise(20.0, 0, 5.0);
        assert_eq!(d.denoise(22.0, 0, 5.0), 22.0);
    }

    #[test]
    fn test_slew_limits_step_up_and_down() {
        let mut d = Denoiser::new();
        d.denoise(25.0, 1, 1.0);
        assert_eq!(d.denoise(100.0, 1, 1.0), 26.0);
        assert_eq!(d.denoise(100.0, 1, 1.0), 27.0);

        let mut d = Denoiser::new();
        d.denoise(25.0, 1, 1.0);
        assert_eq!(d.denoise(-10.0, 1, 1.0), 24.0);
    }

    #[test]
    fn test_trailing_average_weights_history() {
        let mut d = Denoiser::new();
        d.denoise(20.0, 4, 10.0);
        // (24 + 20*3) / 4
        assert_eq!(d.denoise(24.0, 4, 10.0), 21.0);
    }

    #[test]
    fn test_reset_reseeds() {
        let mut d = Denoiser::new();
        d.denoise(20.0, 4, 1.0);
        d.reset();
        assert_eq!(d.denoise(80.0, 4, 1.0), 80.0);
    }

    proptest! {
        #[test]
        fn prop_constant_stream_is_reproduced(
            sample in -50.0f64..300.0,
            order in 1u8..32,
            limit in 0.01f64..10.0,
        ) {
            let mut d = Denoiser::new();
            let mut out = 0.0;
            for _ in 0..order {
                out = d.denoise(sample, order, limit);
            }
            prop_assert_eq!(out, sample);
        }

        #[test]
        fn prop_single_step_moves_at_most_limit(
            start in -50.0f64..300.0,
            step in -500.0f64..500.0,
            order in 1u8..32,
            limit in 0.01f64..10.0,
        ) {
            let mut d = Denoiser::new();
            let before = d.denoise(start, order, limit);
            let after = d.denoise(start + step, order, limit);
            prop_assert!((after - before).abs() <= limit + 1e-9);
        }
    }
}
