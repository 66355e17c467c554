use ndarray::{Array2, Zip};

use crate::constants::*;
use crate::types::StimData;

/// One stimulation word split into its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StimWord {
    pub compliance_limit: bool,
    pub charge_recovery: bool,
    pub amp_settle: bool,
    /// +1 or -1
    pub polarity: i32,
    /// Current amplitude in stim steps, 0..=255
    pub magnitude: u8,
}

impl From<u16> for StimWord {
    fn from(word: u16) -> Self {
        StimWord {
            compliance_limit: word & STIM_COMPLIANCE_LIMIT_BIT != 0,
            charge_recovery: word & STIM_CHARGE_RECOVERY_BIT != 0,
            amp_settle: word & STIM_AMP_SETTLE_BIT != 0,
            polarity: if word & STIM_POLARITY_BIT != 0 { -1 } else { 1 },
            magnitude: (word & STIM_MAGNITUDE_MASK) as u8,
        }
    }
}

impl StimWord {
    /// Signed stimulation current in μA for a step size given in amps.
    pub fn current(&self, stim_step_size: f32) -> f64 {
        f64::from(self.magnitude) * f64::from(self.polarity) * f64::from(stim_step_size)
            / STIM_CURRENT_UNIT
    }
}

/// Decodes raw stim words of every amplifier channel.
pub(crate) fn extract_stim_data(stim_raw: &Array2<u16>, stim_step_size: f32) -> StimData {
    let dim = stim_raw.raw_dim();
    let mut stim = StimData {
        current: Array2::zeros(dim.clone()),
        compliance_limit: Array2::from_elem(dim.clone(), false),
        charge_recovery: Array2::from_elem(dim.clone(), false),
        amp_settle: Array2::from_elem(dim, false),
    };

    Zip::from(stim_raw)
        .and(&mut stim.current)
        .and(&mut stim.compliance_limit)
        .and(&mut stim.charge_recovery)
        .and(&mut stim.amp_settle)
        .for_each(|&raw, current, compliance, recovery, settle| {
            let word = StimWord::from(raw);
            *current = word.current(stim_step_size);
            *compliance = word.compliance_limit;
            *recovery = word.charge_recovery;
            *settle = word.amp_settle;
        });

    stim
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    const STEP: f32 = 1.0e-6;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-6 * b.abs().max(1.0)
    }

    #[test]
    fn compliance_word_with_negative_full_scale() {
        let word = StimWord::from(0x81ff);
        assert!(word.compliance_limit);
        assert!(!word.charge_recovery);
        assert!(!word.amp_settle);
        assert_eq!(word.polarity, -1);
        assert_eq!(word.magnitude, 255);
        let expected = -255.0 * STEP as f64 / 1e-6;
        assert!(close(word.current(STEP), expected));
    }

    #[test]
    fn status_bits_are_independent() {
        let word = StimWord::from(0x6000 | 12);
        assert!(!word.compliance_limit);
        assert!(word.charge_recovery);
        assert!(word.amp_settle);
        assert_eq!(word.polarity, 1);
        assert_eq!(word.magnitude, 12);
    }

    #[test]
    fn idle_word_is_zero_current() {
        let word = StimWord::from(0);
        assert_eq!(word.current(STEP), 0.0);
        assert_eq!(word.polarity, 1);
    }

    #[test]
    fn decodes_every_channel_and_sample() {
        let raw = array![[0x81ffu16, 0x0005], [0x2000, 0x4103]];
        let stim = extract_stim_data(&raw, 2.0e-6);

        assert!(close(stim.current[[0, 0]], -510.0));
        assert!(close(stim.current[[0, 1]], 10.0));
        assert_eq!(stim.current[[1, 0]], 0.0);
        assert!(close(stim.current[[1, 1]], -6.0));
        assert_eq!(stim.compliance_limit, array![[true, false], [false, false]]);
        assert_eq!(stim.charge_recovery, array![[false, false], [false, true]]);
        assert_eq!(stim.amp_settle, array![[false, false], [true, false]]);
    }
}
