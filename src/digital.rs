use ndarray::{Array1, Array2};

use crate::constants::MAX_DIGITAL_NATIVE_ORDER;
use crate::error::{Result, RhsError};
use crate::types::ChannelInfo;

/// Expands packed digital words into one boolean row per channel.
///
/// Row `i` holds bit `channels[i].native_order` of every word. Returns
/// `InvalidDigitalOrder` if a channel's native order does not address a bit
/// of a 16-bit word, rather than aliasing another channel.
pub(crate) fn extract_digital_data(
    packed: &Array1<u16>,
    channels: &[ChannelInfo],
) -> Result<Array2<bool>> {
    let mut digital = Array2::from_elem((channels.len(), packed.len()), false);

    for (mut row, channel) in digital.rows_mut().into_iter().zip(channels) {
        let bit = digital_bit(channel)?;
        row.zip_mut_with(packed, |value, &word| *value = (word >> bit) & 1 != 0);
    }

    Ok(digital)
}

fn digital_bit(channel: &ChannelInfo) -> Result<u32> {
    if !(0..=MAX_DIGITAL_NATIVE_ORDER).contains(&channel.native_order) {
        return Err(RhsError::InvalidDigitalOrder {
            channel: channel.native_channel_name.clone(),
            order: channel.native_order,
        });
    }
    Ok(channel.native_order as u32)
}
