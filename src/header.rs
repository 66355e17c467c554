use std::io::{Read, Seek};

use byteorder::{LittleEndian, ReadBytesExt};
use log::info;

use crate::constants::RHS_MAGIC_NUMBER;
use crate::error::{Result, RhsError};
use crate::qstring::read_qstring;
use crate::types::*;

/// Reads the header from an RHS file.
///
/// The reader must be positioned at the start of the file. On success it is
/// left at the first data block. `stream_len` is the total stream length in
/// bytes and bounds every QString.
pub(crate) fn read_header<R: Read + Seek>(reader: &mut R, stream_len: u64) -> Result<RhsHeader> {
    check_magic_number(reader)?;

    let version = read_version_number(reader)?;
    let sample_rate = reader.read_f32::<LittleEndian>()?;

    let mut frequency_parameters = read_freq_settings(reader, sample_rate)?;
    frequency_parameters.notch_filter_frequency = read_notch_filter_frequency(reader)?;
    frequency_parameters.desired_impedance_test_frequency = reader.read_f32::<LittleEndian>()?;
    frequency_parameters.actual_impedance_test_frequency = reader.read_f32::<LittleEndian>()?;

    let stim_parameters = read_stim_parameters(reader)?;

    let notes = Notes {
        note1: read_qstring(reader, stream_len)?,
        note2: read_qstring(reader, stream_len)?,
        note3: read_qstring(reader, stream_len)?,
    };

    let dc_amplifier_data_saved = reader.read_i16::<LittleEndian>()? != 0;
    let eval_board_mode = reader.read_i16::<LittleEndian>()? as i32;
    let reference_channel = read_qstring(reader, stream_len)?;

    let mut header = RhsHeader {
        version,
        sample_rate,
        frequency_parameters,
        stim_parameters,
        notes,
        dc_amplifier_data_saved,
        eval_board_mode,
        reference_channel,
        amplifier_channels: Vec::new(),
        spike_triggers: Vec::new(),
        board_adc_channels: Vec::new(),
        board_dac_channels: Vec::new(),
        board_dig_in_channels: Vec::new(),
        board_dig_out_channels: Vec::new(),
    };

    read_signal_summary(reader, stream_len, &mut header)?;
    log_header_summary(&header);

    Ok(header)
}

fn check_magic_number<R: Read>(reader: &mut R) -> Result<()> {
    let found = reader.read_u32::<LittleEndian>()?;
    if found != RHS_MAGIC_NUMBER {
        return Err(RhsError::UnrecognizedFormat { found });
    }
    Ok(())
}

fn read_version_number<R: Read>(reader: &mut R) -> Result<Version> {
    let version = Version {
        major: reader.read_i16::<LittleEndian>()? as i32,
        minor: reader.read_i16::<LittleEndian>()? as i32,
    };
    info!(
        "Reading Intan Technologies RHS Data File, Version {}.{}",
        version.major, version.minor
    );
    Ok(version)
}

/// Reads the DSP flag and the eight bandwidth/cutoff values.
///
/// On disk the four "actual" values come first, then the four "desired" ones.
fn read_freq_settings<R: Read>(reader: &mut R, sample_rate: f32) -> Result<FrequencyParameters> {
    let dsp_enabled = reader.read_i16::<LittleEndian>()? as i32;
    let actual_dsp_cutoff_frequency = reader.read_f32::<LittleEndian>()?;
    let actual_lower_bandwidth = reader.read_f32::<LittleEndian>()?;
    let actual_lower_settle_bandwidth = reader.read_f32::<LittleEndian>()?;
    let actual_upper_bandwidth = reader.read_f32::<LittleEndian>()?;
    let desired_dsp_cutoff_frequency = reader.read_f32::<LittleEndian>()?;
    let desired_lower_bandwidth = reader.read_f32::<LittleEndian>()?;
    let desired_lower_settle_bandwidth = reader.read_f32::<LittleEndian>()?;
    let desired_upper_bandwidth = reader.read_f32::<LittleEndian>()?;

    Ok(FrequencyParameters {
        amplifier_sample_rate: sample_rate,
        board_adc_sample_rate: sample_rate,
        board_dig_in_sample_rate: sample_rate,
        dsp_enabled,
        desired_dsp_cutoff_frequency,
        actual_dsp_cutoff_frequency,
        desired_lower_bandwidth,
        actual_lower_bandwidth,
        desired_lower_settle_bandwidth,
        actual_lower_settle_bandwidth,
        desired_upper_bandwidth,
        actual_upper_bandwidth,
        ..FrequencyParameters::default()
    })
}

/// Maps the notch filter mode to a frequency in Hz. Unknown modes mean off.
fn read_notch_filter_frequency<R: Read>(reader: &mut R) -> Result<i32> {
    Ok(match reader.read_i16::<LittleEndian>()? {
        1 => 50,
        2 => 60,
        _ => 0,
    })
}

fn read_stim_parameters<R: Read>(reader: &mut R) -> Result<StimParameters> {
    let amp_settle_mode = reader.read_i16::<LittleEndian>()? as i32;
    let charge_recovery_mode = reader.read_i16::<LittleEndian>()? as i32;

    Ok(StimParameters {
        amp_settle_mode,
        charge_recovery_mode,
        stim_step_size: reader.read_f32::<LittleEndian>()?,
        charge_recovery_current_limit: reader.read_f32::<LittleEndian>()?,
        charge_recovery_target_voltage: reader.read_f32::<LittleEndian>()?,
    })
}

fn read_signal_summary<R: Read + Seek>(
    reader: &mut R,
    stream_len: u64,
    header: &mut RhsHeader,
) -> Result<()> {
    let number_of_signal_groups = reader.read_i16::<LittleEndian>()?;

    for signal_group in 1..=number_of_signal_groups.max(0) as i32 {
        read_signal_group(reader, stream_len, header, signal_group)?;
    }

    Ok(())
}

fn read_signal_group<R: Read + Seek>(
    reader: &mut R,
    stream_len: u64,
    header: &mut RhsHeader,
    signal_group: i32,
) -> Result<()> {
    let name = read_qstring(reader, stream_len)?;
    let prefix = read_qstring(reader, stream_len)?;

    let enabled = reader.read_i16::<LittleEndian>()?;
    let num_channels = reader.read_i16::<LittleEndian>()?;
    let _num_amp_channels = reader.read_i16::<LittleEndian>()?;

    if enabled > 0 && num_channels > 0 {
        for _ in 0..num_channels {
            let record = read_channel(reader, stream_len, &name, &prefix, signal_group)?;
            record.append_to(header)?;
        }
    }

    Ok(())
}

/// One channel record as stored on disk, before filtering by enabled flag.
struct ChannelRecord {
    info: ChannelInfo,
    trigger: SpikeTrigger,
    signal_type: i16,
    enabled: bool,
}

impl ChannelRecord {
    /// Files the channel under its signal type. Disabled channels are dropped.
    fn append_to(self, header: &mut RhsHeader) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        match SignalType::try_from(self.signal_type)? {
            SignalType::Amplifier => {
                header.amplifier_channels.push(self.info);
                header.spike_triggers.push(self.trigger);
            }
            SignalType::BoardAdc => header.board_adc_channels.push(self.info),
            SignalType::BoardDac => header.board_dac_channels.push(self.info),
            SignalType::BoardDigitalIn => header.board_dig_in_channels.push(self.info),
            SignalType::BoardDigitalOut => header.board_dig_out_channels.push(self.info),
        }

        Ok(())
    }
}

fn read_channel<R: Read + Seek>(
    reader: &mut R,
    stream_len: u64,
    port_name: &str,
    port_prefix: &str,
    port_number: i32,
) -> Result<ChannelRecord> {
    let native_channel_name = read_qstring(reader, stream_len)?;
    let custom_channel_name = read_qstring(reader, stream_len)?;

    let native_order = reader.read_i16::<LittleEndian>()? as i32;
    let custom_order = reader.read_i16::<LittleEndian>()? as i32;
    let signal_type = reader.read_i16::<LittleEndian>()?;
    let enabled = reader.read_i16::<LittleEndian>()? != 0;
    let chip_channel = reader.read_i16::<LittleEndian>()? as i32;
    let _command_stream = reader.read_u16::<LittleEndian>()?;
    let board_stream = reader.read_i16::<LittleEndian>()? as i32;

    let trigger = SpikeTrigger {
        voltage_trigger_mode: reader.read_i16::<LittleEndian>()? as i32,
        voltage_threshold: reader.read_i16::<LittleEndian>()? as i32,
        digital_trigger_channel: reader.read_i16::<LittleEndian>()? as i32,
        digital_edge_polarity: reader.read_i16::<LittleEndian>()? as i32,
    };

    let electrode_impedance_magnitude = reader.read_f32::<LittleEndian>()?;
    let electrode_impedance_phase = reader.read_f32::<LittleEndian>()?;

    Ok(ChannelRecord {
        info: ChannelInfo {
            port_name: port_name.to_string(),
            port_prefix: port_prefix.to_string(),
            port_number,
            native_channel_name,
            custom_channel_name,
            native_order,
            custom_order,
            chip_channel,
            board_stream,
            electrode_impedance_magnitude,
            electrode_impedance_phase,
        },
        trigger,
        signal_type,
        enabled,
    })
}

fn log_header_summary(header: &RhsHeader) {
    let amp = header.num_amplifier_channels();
    info!("Found {} amplifier channel{}.", amp, plural(amp));
    if header.dc_amplifier_data_saved {
        info!("Found {} DC amplifier channel{}.", amp, plural(amp));
    }

    let adc = header.num_board_adc_channels();
    info!("Found {} board ADC channel{}.", adc, plural(adc));
    let dac = header.num_board_dac_channels();
    info!("Found {} board DAC channel{}.", dac, plural(dac));
    let dig_in = header.num_board_dig_in_channels();
    info!("Found {} board digital input channel{}.", dig_in, plural(dig_in));
    let dig_out = header.num_board_dig_out_channels();
    info!("Found {} board digital output channel{}.", dig_out, plural(dig_out));
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
