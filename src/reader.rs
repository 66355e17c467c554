use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use std::time::Instant;

use log::info;

use crate::block::{check_end_of_stream, read_data_blocks, DataPlan, RawData};
use crate::constants::READ_BUFFER_CAPACITY;
use crate::digital::extract_digital_data;
use crate::error::Result;
use crate::header::read_header;
use crate::scale::*;
use crate::stim::extract_stim_data;
use crate::types::*;

/// Opens an RHS file with a buffered reader and decodes it.
///
/// The file handle is dropped on every return path.
pub(crate) fn load_file<P: AsRef<Path>>(file_path: P) -> Result<RhsFile> {
    let file = File::open(file_path.as_ref())?;
    load_reader(BufReader::with_capacity(READ_BUFFER_CAPACITY, file))
}

/// Decodes a complete RHS recording from the start of `reader`.
pub(crate) fn load_reader<R: Read + Seek>(mut reader: R) -> Result<RhsFile> {
    let tic = Instant::now();
    let stream_len = stream_len(&mut reader)?;

    let header = read_header(&mut reader, stream_len)?;

    let bytes_remaining = stream_len.saturating_sub(reader.stream_position()?);
    let plan = DataPlan::new(&header, bytes_remaining);

    let raw = read_data_blocks(&mut reader, &header, &plan)?;
    check_end_of_stream(&mut reader, stream_len)?;

    let rhs = assemble(header, raw, plan.data_present)?;

    info!("Done! Elapsed time: {:.1} seconds", tic.elapsed().as_secs_f64());
    Ok(rhs)
}

/// Reads only the header from the start of `reader`.
pub(crate) fn load_header<R: Read + Seek>(mut reader: R) -> Result<RhsHeader> {
    let stream_len = stream_len(&mut reader)?;
    read_header(&mut reader, stream_len)
}

/// Total stream length. Leaves the reader at the start of the stream.
fn stream_len<R: Seek>(reader: &mut R) -> Result<u64> {
    let len = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(0))?;
    Ok(len)
}

/// Scales and decodes the raw buffers and merges them with header metadata.
///
/// Signal types without channels stay `None`.
fn assemble(header: RhsHeader, raw: RawData, data_present: bool) -> Result<RhsFile> {
    info!("Processing data...");

    let (timestamps, timestamp_gaps) = scale_timestamps(&raw.timestamps, header.sample_rate);

    let amplifier = match (raw.amplifier, raw.stim) {
        (Some(amp_raw), Some(stim_raw)) => Some(AmplifierData {
            data: scale_amplifier_data(&amp_raw),
            dc_data: raw.dc_amplifier.as_ref().map(scale_dc_amplifier_data),
            stim: extract_stim_data(&stim_raw, header.stim_parameters.stim_step_size),
            channels: header.amplifier_channels,
            spike_triggers: header.spike_triggers,
        }),
        _ => None,
    };

    let board_adc = raw.board_adc.map(|adc_raw| ChannelData {
        data: scale_board_analog_data(&adc_raw),
        channels: header.board_adc_channels,
    });

    let board_dac = raw.board_dac.map(|dac_raw| ChannelData {
        data: scale_board_analog_data(&dac_raw),
        channels: header.board_dac_channels,
    });

    let board_dig_in = raw
        .board_dig_in
        .map(|packed| -> Result<_> {
            Ok(ChannelData {
                data: extract_digital_data(&packed, &header.board_dig_in_channels)?,
                channels: header.board_dig_in_channels,
            })
        })
        .transpose()?;

    let board_dig_out = raw
        .board_dig_out
        .map(|packed| -> Result<_> {
            Ok(ChannelData {
                data: extract_digital_data(&packed, &header.board_dig_out_channels)?,
                channels: header.board_dig_out_channels,
            })
        })
        .transpose()?;

    Ok(RhsFile {
        version: header.version,
        sample_rate: header.sample_rate,
        eval_board_mode: header.eval_board_mode,
        frequency_parameters: header.frequency_parameters,
        stim_parameters: header.stim_parameters,
        notes: header.notes,
        reference_channel: header.reference_channel,
        data_present,
        timestamps,
        timestamp_gaps,
        amplifier,
        board_adc,
        board_dac,
        board_dig_in,
        board_dig_out,
    })
}
