use ndarray::s;
use std::env;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "data/recording.rhs".to_string());
    let rhs = intan_rhs::decode(&path)?;

    println!("File version: {}.{}", rhs.version.major, rhs.version.minor);
    println!("Sample rate: {} Hz", rhs.sample_rate);
    println!(
        "Notch filter: {}",
        match rhs.frequency_parameters.notch_filter_frequency {
            0 => "off".to_string(),
            hz => format!("{hz} Hz"),
        }
    );

    for note in [&rhs.notes.note1, &rhs.notes.note2, &rhs.notes.note3] {
        if !note.is_empty() {
            println!("Note: {}", note);
        }
    }

    if !rhs.data_present {
        println!("\nNo data present in file (header only).");
        return Ok(());
    }

    println!("\nData summary:");
    println!("  Number of time samples: {}", rhs.num_samples());
    println!("  Duration: {:.3} seconds", rhs.duration());
    if rhs.timestamp_gaps > 0 {
        println!("  Timestamp gaps: {}", rhs.timestamp_gaps);
    }

    if let Some(amplifier) = &rhs.amplifier {
        println!(
            "  Amplifier data: {} channels x {} samples",
            amplifier.data.nrows(),
            amplifier.data.ncols()
        );

        for (i, channel) in amplifier.channels.iter().enumerate().take(5) {
            println!(
                "    {}: {} ({})",
                i, channel.custom_channel_name, channel.native_channel_name
            );
        }
        if amplifier.channels.len() > 5 {
            println!("    ... and {} more", amplifier.channels.len() - 5);
        }

        if amplifier.data.ncols() > 0 {
            let first = amplifier.data.slice(s![0, ..amplifier.data.ncols().min(5)]);
            println!("  First channel data: {:?} μV", first.to_vec());
        }

        let stim_samples = amplifier.stim.current.iter().filter(|&&c| c != 0.0).count();
        println!("  Samples with stimulation current: {}", stim_samples);
    }

    if let Some(adc) = &rhs.board_adc {
        println!("  Board ADC channels: {}", adc.channels.len());
    }
    if let Some(dac) = &rhs.board_dac {
        println!("  Board DAC channels: {}", dac.channels.len());
    }
    if let Some(dig_in) = &rhs.board_dig_in {
        for (channel, row) in dig_in.channels.iter().zip(dig_in.data.rows()) {
            let high = row.iter().filter(|&&v| v).count();
            println!("  {}: high in {} samples", channel.native_channel_name, high);
        }
    }

    Ok(())
}
