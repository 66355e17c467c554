//! Format constants for RHS2000 files.

/// Magic number at the start of every RHS2000 file.
pub const RHS_MAGIC_NUMBER: u32 = 0xd69127ac;

/// RHS files always carry 128 samples per data block.
pub const SAMPLES_PER_DATA_BLOCK: usize = 128;

/// Length prefix marking a null QString.
pub const QSTRING_NULL_LENGTH: u32 = 0xffffffff;

// Scaling constants (from Intan RHS data format specification)
pub const AMPLIFIER_SCALE_FACTOR: f64 = 0.195; // μV per bit
pub const AMPLIFIER_OFFSET: f64 = 32768.0;
pub const DC_AMPLIFIER_SCALE_FACTOR: f64 = -0.01923; // V per bit
pub const DC_AMPLIFIER_OFFSET: f64 = 512.0;
pub const ADC_DAC_SCALE_FACTOR: f64 = 312.5e-6; // V per bit
pub const ADC_DAC_OFFSET: f64 = 32768.0;

/// Stim step size is stored in amps; decoded current is reported in μA.
pub const STIM_CURRENT_UNIT: f64 = 1.0e-6;

// Stim word bit layout
pub const STIM_COMPLIANCE_LIMIT_BIT: u16 = 1 << 15;
pub const STIM_CHARGE_RECOVERY_BIT: u16 = 1 << 14;
pub const STIM_AMP_SETTLE_BIT: u16 = 1 << 13;
pub const STIM_POLARITY_BIT: u16 = 1 << 8;
pub const STIM_MAGNITUDE_MASK: u16 = 0x00ff;

/// Highest bit index available in a packed digital word.
pub const MAX_DIGITAL_NATIVE_ORDER: i32 = 15;

pub(crate) const READ_BUFFER_CAPACITY: usize = 65536; // 64KB
pub(crate) const PROGRESS_STEP_PERCENT: usize = 10;
