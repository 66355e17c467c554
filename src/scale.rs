//! Conversion of raw sample codes into physical units.

use log::{debug, warn};
use ndarray::{Array1, Array2};

use crate::constants::*;

/// Amplifier codes to microvolts: `(raw - 32768) * 0.195`.
pub fn scale_amplifier_data(raw: &Array2<u16>) -> Array2<f64> {
    raw.mapv(|x| (f64::from(x) - AMPLIFIER_OFFSET) * AMPLIFIER_SCALE_FACTOR)
}

/// DC amplifier codes to volts: `(raw - 512) * -0.01923`.
pub fn scale_dc_amplifier_data(raw: &Array2<u16>) -> Array2<f64> {
    raw.mapv(|x| (f64::from(x) - DC_AMPLIFIER_OFFSET) * DC_AMPLIFIER_SCALE_FACTOR)
}

/// Board ADC or DAC codes to volts: `(raw - 32768) * 312.5e-6`.
pub fn scale_board_analog_data(raw: &Array2<u16>) -> Array2<f64> {
    raw.mapv(|x| (f64::from(x) - ADC_DAC_OFFSET) * ADC_DAC_SCALE_FACTOR)
}

/// Counts consecutive timestamps that do not advance by exactly one.
pub fn count_timestamp_gaps(timestamps: &Array1<i32>) -> usize {
    timestamps
        .windows(2)
        .into_iter()
        .filter(|w| i64::from(w[1]) - i64::from(w[0]) != 1)
        .count()
}

/// Converts timestamps to seconds and reports gaps.
///
/// Gaps are logged but never fatal; the returned count lets callers decide
/// whether a non-uniform time base matters to them.
pub fn scale_timestamps(timestamps: &Array1<i32>, sample_rate: f32) -> (Array1<f64>, usize) {
    let num_gaps = count_timestamp_gaps(timestamps);
    if num_gaps == 0 {
        debug!("No missing timestamps in data.");
    } else {
        warn!(
            "{} gaps in timestamp data found. Time scale will not be uniform!",
            num_gaps
        );
    }

    let sample_rate = f64::from(sample_rate);
    (timestamps.mapv(|t| f64::from(t) / sample_rate), num_gaps)
}
