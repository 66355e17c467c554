//! Synthetic RHS file builder shared by the integration tests.
#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};

pub const MAGIC: u32 = 0xd69127ac;

/// Byte offset of the first note's length prefix in every built header.
pub const NOTE1_OFFSET: usize = 72;

const STIM_PATTERN: [u16; 5] = [0x0000, 0x81ff, 0x4103, 0x2005, 0x0010];

pub fn amplifier_code(ch: usize, i: usize) -> u16 {
    ((i * 7 + ch * 1000) % 65536) as u16
}

pub fn dc_amplifier_code(ch: usize, i: usize) -> u16 {
    ((i * 3 + ch * 11) % 1024) as u16
}

pub fn stim_word(ch: usize, i: usize) -> u16 {
    STIM_PATTERN[(i + ch) % STIM_PATTERN.len()]
}

pub fn adc_code(ch: usize, i: usize) -> u16 {
    ((32768 + i * 13 + ch * 5) % 65536) as u16
}

pub fn dac_code(ch: usize, i: usize) -> u16 {
    ((i * 17 + ch) % 65536) as u16
}

pub fn dig_in_word(i: usize) -> u16 {
    (i as u16).wrapping_mul(40503)
}

pub fn dig_out_word(i: usize) -> u16 {
    !(i as u16)
}

/// Describes a recording; every sample value comes from the generator
/// functions above so tests can compute what to expect.
#[derive(Debug, Clone)]
pub struct RhsBuilder {
    pub magic: u32,
    pub sample_rate: f32,
    pub stim_step_size: f32,
    pub notch_mode: i16,
    pub dc_saved: bool,
    pub amplifier: usize,
    pub adc: usize,
    pub dac: usize,
    /// Native orders of the digital input channels
    pub dig_in: Vec<i16>,
    /// Native orders of the digital output channels
    pub dig_out: Vec<i16>,
    /// Timestamps jump by two at this sample index
    pub gap_at: Option<usize>,
}

impl Default for RhsBuilder {
    fn default() -> Self {
        RhsBuilder {
            magic: MAGIC,
            sample_rate: 30000.0,
            stim_step_size: 1.0e-6,
            notch_mode: 1,
            dc_saved: false,
            amplifier: 0,
            adc: 0,
            dac: 0,
            dig_in: Vec::new(),
            dig_out: Vec::new(),
            gap_at: None,
        }
    }
}

impl RhsBuilder {
    pub fn timestamp(&self, i: usize) -> i32 {
        match self.gap_at {
            Some(at) if i >= at => i as i32 + 1,
            _ => i as i32,
        }
    }

    /// Block size computed independently of the crate.
    pub fn block_size(&self) -> usize {
        let dc = if self.dc_saved { self.amplifier } else { 0 };
        let words = self.amplifier * 2 + dc + self.adc + self.dac;
        128 * 4
            + 128 * 2 * words
            + if self.dig_in.is_empty() { 0 } else { 256 }
            + if self.dig_out.is_empty() { 0 } else { 256 }
    }

    pub fn header(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.write_u32::<LittleEndian>(self.magic).unwrap();
        buf.write_i16::<LittleEndian>(3).unwrap();
        buf.write_i16::<LittleEndian>(1).unwrap();
        buf.write_f32::<LittleEndian>(self.sample_rate).unwrap();
        buf.write_i16::<LittleEndian>(1).unwrap();
        for value in [1.0f32, 0.1, 1.0, 7500.0, 1.0, 0.1, 1.0, 7500.0] {
            buf.write_f32::<LittleEndian>(value).unwrap();
        }
        buf.write_i16::<LittleEndian>(self.notch_mode).unwrap();
        buf.write_f32::<LittleEndian>(1000.0).unwrap();
        buf.write_f32::<LittleEndian>(1000.0).unwrap();
        buf.write_i16::<LittleEndian>(0).unwrap();
        buf.write_i16::<LittleEndian>(1).unwrap();
        buf.write_f32::<LittleEndian>(self.stim_step_size).unwrap();
        buf.write_f32::<LittleEndian>(1.0e-6).unwrap();
        buf.write_f32::<LittleEndian>(0.0).unwrap();
        assert_eq!(buf.len(), NOTE1_OFFSET);
        write_qstring(&mut buf, "organoid 7");
        write_qstring(&mut buf, "");
        buf.write_u32::<LittleEndian>(0xffffffff).unwrap();
        buf.write_i16::<LittleEndian>(i16::from(self.dc_saved)).unwrap();
        buf.write_i16::<LittleEndian>(1).unwrap();
        write_qstring(&mut buf, "Hardware");

        buf.write_i16::<LittleEndian>(3).unwrap();

        // Amplifier group, with one disabled RHD-only channel that must be skipped.
        write_group_header(&mut buf, "Port A", "A", true, self.amplifier + 1);
        write_channel(&mut buf, "A-AUX", 0, 1, false);
        for ch in 0..self.amplifier {
            write_channel(&mut buf, &format!("A-{ch:03}"), ch as i16, 0, true);
        }

        // Disabled group: channel records are not present on disk.
        write_group_header(&mut buf, "Port B", "B", false, 16);

        let board = self.adc + self.dac + self.dig_in.len() + self.dig_out.len();
        write_group_header(&mut buf, "Board", "BRD", true, board);
        for ch in 0..self.adc {
            write_channel(&mut buf, &format!("ANALOG-IN-{ch}"), ch as i16, 3, true);
        }
        for ch in 0..self.dac {
            write_channel(&mut buf, &format!("ANALOG-OUT-{ch}"), ch as i16, 4, true);
        }
        for &order in &self.dig_in {
            write_channel(&mut buf, &format!("DIGITAL-IN-{order:02}"), order, 5, true);
        }
        for &order in &self.dig_out {
            write_channel(&mut buf, &format!("DIGITAL-OUT-{order:02}"), order, 6, true);
        }
        buf
    }

    pub fn blocks(&self, buf: &mut Vec<u8>, num_blocks: usize) {
        for block in 0..num_blocks {
            let samples = block * 128..(block + 1) * 128;
            for i in samples.clone() {
                buf.write_i32::<LittleEndian>(self.timestamp(i)).unwrap();
            }
            write_channels(buf, self.amplifier, samples.clone(), amplifier_code);
            if self.dc_saved {
                write_channels(buf, self.amplifier, samples.clone(), dc_amplifier_code);
            }
            write_channels(buf, self.amplifier, samples.clone(), stim_word);
            write_channels(buf, self.adc, samples.clone(), adc_code);
            write_channels(buf, self.dac, samples.clone(), dac_code);
            if !self.dig_in.is_empty() {
                for i in samples.clone() {
                    buf.write_u16::<LittleEndian>(dig_in_word(i)).unwrap();
                }
            }
            if !self.dig_out.is_empty() {
                for i in samples.clone() {
                    buf.write_u16::<LittleEndian>(dig_out_word(i)).unwrap();
                }
            }
        }
    }

    pub fn file(&self, num_blocks: usize) -> Vec<u8> {
        let mut buf = self.header();
        self.blocks(&mut buf, num_blocks);
        buf
    }
}

fn write_channels(
    buf: &mut Vec<u8>,
    num_channels: usize,
    samples: std::ops::Range<usize>,
    code: fn(usize, usize) -> u16,
) {
    for ch in 0..num_channels {
        for i in samples.clone() {
            buf.write_u16::<LittleEndian>(code(ch, i)).unwrap();
        }
    }
}

pub fn write_qstring(buf: &mut Vec<u8>, text: &str) {
    let units: Vec<u16> = text.encode_utf16().collect();
    buf.write_u32::<LittleEndian>((units.len() * 2) as u32).unwrap();
    for unit in units {
        buf.write_u16::<LittleEndian>(unit).unwrap();
    }
}

fn write_group_header(buf: &mut Vec<u8>, name: &str, prefix: &str, enabled: bool, num_channels: usize) {
    write_qstring(buf, name);
    write_qstring(buf, prefix);
    buf.write_i16::<LittleEndian>(i16::from(enabled)).unwrap();
    buf.write_i16::<LittleEndian>(num_channels as i16).unwrap();
    buf.write_i16::<LittleEndian>(0).unwrap();
}

fn write_channel(buf: &mut Vec<u8>, name: &str, native_order: i16, signal_type: i16, enabled: bool) {
    write_qstring(buf, name);
    write_qstring(buf, &name.to_lowercase());
    for value in [native_order, native_order, signal_type, i16::from(enabled), native_order, 0, 0] {
        buf.write_i16::<LittleEndian>(value).unwrap();
    }
    for value in [1i16, -60, 0, 1] {
        buf.write_i16::<LittleEndian>(value).unwrap();
    }
    buf.write_f32::<LittleEndian>(2.5e5).unwrap();
    buf.write_f32::<LittleEndian>(-1.0).unwrap();
}
