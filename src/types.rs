use ndarray::{Array1, Array2};
use serde::Serialize;

use crate::error::RhsError;

/// Version information for the RHS file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Version {
    /// Major version number
    pub major: i32,
    /// Minor version number
    pub minor: i32,
}

/// Notes stored in the RHS file.
///
/// Intan recording software allows up to three free-text notes per recording,
/// usually describing experimental conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Notes {
    pub note1: String,
    pub note2: String,
    pub note3: String,
}

/// Sampling rates, DSP and filter settings of the recording.
///
/// Both the values the user requested ("desired_*") and the values the
/// hardware achieved ("actual_*") are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrequencyParameters {
    /// Sample rate for amplifier channels (Hz)
    pub amplifier_sample_rate: f32,
    /// Sample rate for board ADC channels (Hz)
    pub board_adc_sample_rate: f32,
    /// Sample rate for digital input channels (Hz)
    pub board_dig_in_sample_rate: f32,
    /// Whether DSP offset removal was enabled (1) or disabled (0)
    pub dsp_enabled: i32,
    pub desired_dsp_cutoff_frequency: f32,
    pub actual_dsp_cutoff_frequency: f32,
    pub desired_lower_bandwidth: f32,
    pub actual_lower_bandwidth: f32,
    pub desired_lower_settle_bandwidth: f32,
    pub actual_lower_settle_bandwidth: f32,
    pub desired_upper_bandwidth: f32,
    pub actual_upper_bandwidth: f32,
    /// Software notch filter frequency: 0 (off), 50 or 60 Hz
    pub notch_filter_frequency: i32,
    pub desired_impedance_test_frequency: f32,
    pub actual_impedance_test_frequency: f32,
}

/// Stimulation parameters for the recording.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StimParameters {
    /// Stimulation current step size (A)
    pub stim_step_size: f32,
    /// Maximum current used in charge recovery (A)
    pub charge_recovery_current_limit: f32,
    /// Target voltage for charge recovery (V)
    pub charge_recovery_target_voltage: f32,
    /// Amplifier settle mode
    /// - 0: Traditional (switch to ground)
    /// - 1: Limited switches
    pub amp_settle_mode: i32,
    /// Charge recovery mode
    /// - 0: Current-limited charge recovery circuit engaged during stimulation
    /// - 1: Circuit engaged all the time
    pub charge_recovery_mode: i32,
}

/// Information about an individual channel.
///
/// Contains naming, ordering, and hardware configuration for one recording
/// channel of any signal type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChannelInfo {
    /// Name of the port (signal group), e.g. "Port A"
    pub port_name: String,
    /// Prefix for the port, e.g. "A"
    pub port_prefix: String,
    /// 1-based index of the signal group the channel belongs to
    pub port_number: i32,
    /// Default channel name assigned by the system
    pub native_channel_name: String,
    /// User-defined custom name for the channel
    pub custom_channel_name: String,
    /// Original order in the native system. For digital channels this is the
    /// bit index inside the packed 16-bit word.
    pub native_order: i32,
    /// Custom order (often used for display purposes)
    pub custom_order: i32,
    /// Channel on the chip
    pub chip_channel: i32,
    /// Hardware stream on the board
    pub board_stream: i32,
    /// Measured electrode impedance magnitude (Ω)
    pub electrode_impedance_magnitude: f32,
    /// Measured electrode impedance phase (radians)
    pub electrode_impedance_phase: f32,
}

/// Spike trigger configuration of one amplifier channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SpikeTrigger {
    /// - 0: Trigger on digital input
    /// - 1: Trigger on voltage threshold
    pub voltage_trigger_mode: i32,
    /// Voltage threshold for triggering (μV)
    pub voltage_threshold: i32,
    /// Digital input channel to use for triggering
    pub digital_trigger_channel: i32,
    /// - 0: Trigger on falling edge
    /// - 1: Trigger on rising edge
    pub digital_edge_polarity: i32,
}

/// Signal type code of a channel record.
///
/// Codes 1 (auxiliary inputs) and 2 (supply voltage) only exist in RHD files
/// and are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SignalType {
    Amplifier,
    BoardAdc,
    BoardDac,
    BoardDigitalIn,
    BoardDigitalOut,
}

impl TryFrom<i16> for SignalType {
    type Error = RhsError;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(SignalType::Amplifier),
            3 => Ok(SignalType::BoardAdc),
            4 => Ok(SignalType::BoardDac),
            5 => Ok(SignalType::BoardDigitalIn),
            6 => Ok(SignalType::BoardDigitalOut),
            other => Err(RhsError::UnknownChannelType(other)),
        }
    }
}

/// Header information from the RHS file.
///
/// Everything the recording software writes before the first data block:
/// version, sampling and filter settings, stimulation settings, notes and
/// the enabled channels of every signal type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RhsHeader {
    /// File format version
    pub version: Version,
    /// Sample rate shared by every signal type (Hz)
    pub sample_rate: f32,
    pub frequency_parameters: FrequencyParameters,
    pub stim_parameters: StimParameters,
    /// User notes saved with the recording
    pub notes: Notes,
    /// Whether DC amplifier data was saved
    pub dc_amplifier_data_saved: bool,
    /// Evaluation board mode
    /// - 0: Recording Controller
    /// - 1: Recording Controller + Stim
    /// - 2: Recording System
    pub eval_board_mode: i32,
    /// Name of the reference channel used
    pub reference_channel: String,

    pub amplifier_channels: Vec<ChannelInfo>,
    /// One spike trigger per amplifier channel, in the same order
    pub spike_triggers: Vec<SpikeTrigger>,
    pub board_adc_channels: Vec<ChannelInfo>,
    pub board_dac_channels: Vec<ChannelInfo>,
    pub board_dig_in_channels: Vec<ChannelInfo>,
    pub board_dig_out_channels: Vec<ChannelInfo>,
}

impl RhsHeader {
    pub fn num_amplifier_channels(&self) -> usize {
        self.amplifier_channels.len()
    }

    pub fn num_board_adc_channels(&self) -> usize {
        self.board_adc_channels.len()
    }

    pub fn num_board_dac_channels(&self) -> usize {
        self.board_dac_channels.len()
    }

    pub fn num_board_dig_in_channels(&self) -> usize {
        self.board_dig_in_channels.len()
    }

    pub fn num_board_dig_out_channels(&self) -> usize {
        self.board_dig_out_channels.len()
    }

    /// Number of DC amplifier channels stored per block (zero unless saved).
    pub fn num_dc_amplifier_channels(&self) -> usize {
        if self.dc_amplifier_data_saved {
            self.amplifier_channels.len()
        } else {
            0
        }
    }
}

/// Decoded stimulation words of every amplifier channel.
///
/// All arrays have shape `[num_channels, num_samples]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StimData {
    /// Stimulation current (μA)
    pub current: Array2<f64>,
    /// Compliance limit was reached
    pub compliance_limit: Array2<bool>,
    /// Charge recovery was active
    pub charge_recovery: Array2<bool>,
    /// Amplifier settle was active
    pub amp_settle: Array2<bool>,
}

/// Amplifier channels together with everything recorded per amplifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmplifierData {
    pub channels: Vec<ChannelInfo>,
    pub spike_triggers: Vec<SpikeTrigger>,
    /// Neural data (μV), shape `[num_channels, num_samples]`
    pub data: Array2<f64>,
    /// DC amplifier data (V), present only when the header says it was saved
    pub dc_data: Option<Array2<f64>>,
    pub stim: StimData,
}

/// Channel descriptors of one board signal type with their decoded samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelData<T> {
    pub channels: Vec<ChannelInfo>,
    /// Shape `[num_channels, num_samples]`
    pub data: Array2<T>,
}

/// A fully decoded RHS recording.
///
/// Returned by [`decode`](crate::decode). Signal types without enabled
/// channels are `None`.
///
/// # Examples
///
/// ```no_run
/// let rhs = intan_rhs::decode("path/to/your/file.rhs").unwrap();
///
/// if let Some(amplifier) = &rhs.amplifier {
///     if amplifier.data.nrows() > 0 && rhs.num_samples() > 0 {
///         println!("First sample: {} μV", amplifier.data[[0, 0]]);
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RhsFile {
    pub version: Version,
    /// Sample rate shared by every signal type (Hz)
    pub sample_rate: f32,
    pub eval_board_mode: i32,
    pub frequency_parameters: FrequencyParameters,
    pub stim_parameters: StimParameters,
    pub notes: Notes,
    pub reference_channel: String,

    /// False for header-only files
    pub data_present: bool,
    /// Sample times (s)
    pub timestamps: Array1<f64>,
    /// Number of consecutive timestamp pairs that do not differ by exactly one
    pub timestamp_gaps: usize,

    pub amplifier: Option<AmplifierData>,
    /// Board ADC data (V)
    pub board_adc: Option<ChannelData<f64>>,
    /// Board DAC data (V)
    pub board_dac: Option<ChannelData<f64>>,
    pub board_dig_in: Option<ChannelData<bool>>,
    pub board_dig_out: Option<ChannelData<bool>>,
}

impl RhsFile {
    /// Returns the duration of the recording in seconds.
    ///
    /// Header-only files have a duration of 0.0.
    pub fn duration(&self) -> f64 {
        if self.sample_rate > 0.0 {
            self.num_samples() as f64 / self.sample_rate as f64
        } else {
            0.0
        }
    }

    /// Returns the number of samples per channel.
    pub fn num_samples(&self) -> usize {
        self.timestamps.len()
    }
}
