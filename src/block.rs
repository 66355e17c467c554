use std::io::{Read, Seek};

use byteorder::{LittleEndian, ReadBytesExt};
use log::{debug, info};
use ndarray::{s, Array1, Array2};

use crate::constants::{PROGRESS_STEP_PERCENT, SAMPLES_PER_DATA_BLOCK};
use crate::error::{Result, RhsError};
use crate::types::RhsHeader;

/// Number of bytes in one 128-sample data block.
///
/// Depends only on the channel counts and the DC-amplifier-saved flag of the
/// header, so every block of a file has the same size.
pub fn bytes_per_data_block(header: &RhsHeader) -> usize {
    let amp = header.num_amplifier_channels();

    // Timestamps: one 4-byte value per sample
    let mut bytes = bytes_per_signal_type(1, 4);
    bytes += bytes_per_signal_type(amp, 2);
    bytes += bytes_per_signal_type(header.num_dc_amplifier_channels(), 2);
    // Stimulation words, one per amplifier channel
    bytes += bytes_per_signal_type(amp, 2);
    bytes += bytes_per_signal_type(header.num_board_adc_channels(), 2);
    bytes += bytes_per_signal_type(header.num_board_dac_channels(), 2);
    // Digital channels share one packed word per sample
    bytes += bytes_per_signal_type(packed_words(header.num_board_dig_in_channels()), 2);
    bytes += bytes_per_signal_type(packed_words(header.num_board_dig_out_channels()), 2);
    bytes
}

fn bytes_per_signal_type(num_channels: usize, bytes_per_sample: usize) -> usize {
    SAMPLES_PER_DATA_BLOCK * num_channels * bytes_per_sample
}

fn packed_words(num_digital_channels: usize) -> usize {
    usize::from(num_digital_channels > 0)
}

/// How much sample data follows the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DataPlan {
    pub bytes_per_block: usize,
    pub num_blocks: usize,
    pub num_samples: usize,
    pub data_present: bool,
}

impl DataPlan {
    /// Plans the data section from the bytes left after the header.
    ///
    /// Only whole blocks are counted; any remainder is left for
    /// [`check_end_of_stream`] to report.
    pub fn new(header: &RhsHeader, bytes_remaining: u64) -> Self {
        let bytes_per_block = bytes_per_data_block(header);
        let num_blocks = (bytes_remaining / bytes_per_block as u64) as usize;
        let plan = DataPlan {
            bytes_per_block,
            num_blocks,
            num_samples: num_blocks * SAMPLES_PER_DATA_BLOCK,
            data_present: bytes_remaining > 0,
        };
        debug!(
            "{} bytes per data block, {} blocks, {} samples",
            plan.bytes_per_block, plan.num_blocks, plan.num_samples
        );
        log_record_time_summary(&plan, header.sample_rate);
        plan
    }
}

fn log_record_time_summary(plan: &DataPlan, sample_rate: f32) {
    if plan.data_present {
        info!(
            "File contains {:.3} seconds of data. Amplifiers were sampled at {:.2} kS/s.",
            plan.num_samples as f64 / sample_rate as f64,
            sample_rate / 1000.0
        );
    } else {
        info!(
            "Header file contains no data. Amplifiers were sampled at {:.2} kS/s.",
            sample_rate / 1000.0
        );
    }
}

/// Raw sample buffers, sized for the whole file before any block is read.
///
/// Multi-channel buffers have shape `[num_channels, num_samples]`; signal
/// types without channels are `None`.
#[derive(Debug, Clone)]
pub(crate) struct RawData {
    pub timestamps: Array1<i32>,
    pub amplifier: Option<Array2<u16>>,
    pub dc_amplifier: Option<Array2<u16>>,
    pub stim: Option<Array2<u16>>,
    pub board_adc: Option<Array2<u16>>,
    pub board_dac: Option<Array2<u16>>,
    pub board_dig_in: Option<Array1<u16>>,
    pub board_dig_out: Option<Array1<u16>>,
}

impl RawData {
    pub fn allocate(header: &RhsHeader, num_samples: usize) -> Self {
        let channels = |count: usize| (count > 0).then(|| Array2::zeros((count, num_samples)));
        let packed = |count: usize| (count > 0).then(|| Array1::zeros(num_samples));

        RawData {
            timestamps: Array1::zeros(num_samples),
            amplifier: channels(header.num_amplifier_channels()),
            dc_amplifier: channels(header.num_dc_amplifier_channels()),
            stim: channels(header.num_amplifier_channels()),
            board_adc: channels(header.num_board_adc_channels()),
            board_dac: channels(header.num_board_dac_channels()),
            board_dig_in: packed(header.num_board_dig_in_channels()),
            board_dig_out: packed(header.num_board_dig_out_channels()),
        }
    }
}

/// Reads every planned data block into freshly allocated buffers.
pub(crate) fn read_data_blocks<R: Read>(
    reader: &mut R,
    header: &RhsHeader,
    plan: &DataPlan,
) -> Result<RawData> {
    let mut data = RawData::allocate(header, plan.num_samples);
    let mut block = BlockScratch::default();
    let mut percent_done = PROGRESS_STEP_PERCENT;

    for i in 0..plan.num_blocks {
        read_one_data_block(reader, &mut data, &mut block, i * SAMPLES_PER_DATA_BLOCK)?;

        let progress = 100 * (i + 1) / plan.num_blocks;
        while progress >= percent_done && percent_done <= 100 {
            debug!("{}% done...", percent_done);
            percent_done += PROGRESS_STEP_PERCENT;
        }
    }

    Ok(data)
}

/// Per-block decode buffers reused across blocks.
#[derive(Default)]
struct BlockScratch {
    timestamps: Vec<i32>,
    words: Vec<u16>,
}

/// Reads one block, in on-disk field order, at sample offset `index`.
fn read_one_data_block<R: Read>(
    reader: &mut R,
    data: &mut RawData,
    block: &mut BlockScratch,
    index: usize,
) -> Result<()> {
    let end = index + SAMPLES_PER_DATA_BLOCK;

    block.timestamps.resize(SAMPLES_PER_DATA_BLOCK, 0);
    reader.read_i32_into::<LittleEndian>(&mut block.timestamps)?;
    data.timestamps
        .slice_mut(s![index..end])
        .iter_mut()
        .zip(&block.timestamps)
        .for_each(|(dest, &ts)| *dest = ts);

    for dest in [
        &mut data.amplifier,
        &mut data.dc_amplifier,
        &mut data.stim,
        &mut data.board_adc,
        &mut data.board_dac,
    ]
    .into_iter()
    .flatten()
    {
        read_channel_major(reader, dest, &mut block.words, index)?;
    }

    for dest in [&mut data.board_dig_in, &mut data.board_dig_out]
        .into_iter()
        .flatten()
    {
        block.words.resize(SAMPLES_PER_DATA_BLOCK, 0);
        reader.read_u16_into::<LittleEndian>(&mut block.words)?;
        dest.slice_mut(s![index..end])
            .iter_mut()
            .zip(&block.words)
            .for_each(|(d, &w)| *d = w);
    }

    Ok(())
}

/// Reads one signal type of a block: all 128 samples of the first channel,
/// then the next channel, and so on.
fn read_channel_major<R: Read>(
    reader: &mut R,
    dest: &mut Array2<u16>,
    words: &mut Vec<u16>,
    index: usize,
) -> Result<()> {
    let num_channels = dest.nrows();
    words.resize(num_channels * SAMPLES_PER_DATA_BLOCK, 0);
    reader.read_u16_into::<LittleEndian>(words)?;

    let mut target = dest.slice_mut(s![.., index..index + SAMPLES_PER_DATA_BLOCK]);
    for (mut row, chunk) in target
        .rows_mut()
        .into_iter()
        .zip(words.chunks_exact(SAMPLES_PER_DATA_BLOCK))
    {
        row.iter_mut().zip(chunk).for_each(|(d, &w)| *d = w);
    }

    Ok(())
}

/// Fails unless the reader sits exactly at the end of the stream.
pub(crate) fn check_end_of_stream<R: Seek>(reader: &mut R, stream_len: u64) -> Result<()> {
    let remaining = stream_len.saturating_sub(reader.stream_position()?);
    if remaining != 0 {
        return Err(RhsError::FileSizeMismatch { remaining });
    }
    Ok(())
}
