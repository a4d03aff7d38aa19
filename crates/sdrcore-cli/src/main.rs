//! SDR core command-line interface.
//!
//! Tools for exercising the behavioural model outside of its own test
//! suite: register read/write against a freshly constructed core, feeding
//! an IQ sample file through the whole pipeline and dumping the resulting
//! spectrum and recorder output, and generating synthetic IQ test tones.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sdrcore::prelude::*;
use sdrcore_sim::{run_feed, Simulation};
use tracing::info;

#[derive(Parser)]
#[command(name = "sdrcore")]
#[command(author, version, about = "SDR core behavioural model CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the register map's product ID, version, and platform byte
    Info {
        /// Core configuration, as JSON (see `SdrCoreConfig`)
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Read one register
    RegRead {
        #[arg(short, long)]
        config: PathBuf,

        /// Word offset, decimal or 0x-prefixed hex
        #[arg(long)]
        offset: String,
    },

    /// Write one register
    RegWrite {
        #[arg(short, long)]
        config: PathBuf,

        #[arg(long)]
        offset: String,

        #[arg(long)]
        data: String,

        /// Byte write-strobes, defaults to all four bytes
        #[arg(long, default_value = "0b1111")]
        strobes: String,
    },

    /// Feed an IQ sample file through the pipeline and dump spectrum bins
    /// and recorder output
    Feed {
        #[arg(short, long)]
        config: PathBuf,

        /// Little-endian interleaved f32 I/Q samples
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the final spectrum bins as JSON
        #[arg(long)]
        spectrum_out: Option<PathBuf>,

        /// Where to write the raw recorder burst words
        #[arg(long)]
        recorder_out: Option<PathBuf>,
    },

    /// Generate a synthetic complex-exponential IQ file for feeding
    /// through `feed`
    GenTone {
        #[arg(short, long)]
        output: PathBuf,

        /// Cycles per sample
        #[arg(long, default_value = "0.01")]
        frequency: f64,

        #[arg(long, default_value = "20000")]
        amplitude: i64,

        #[arg(long, default_value = "4096")]
        count: usize,
    },
}

fn parse_int(text: &str) -> Result<u32> {
    if let Some(hex) = text.strip_prefix("0x") {
        u32::from_str_radix(hex, 16).context("invalid hex integer")
    } else if let Some(bin) = text.strip_prefix("0b") {
        u32::from_str_radix(bin, 2).context("invalid binary integer")
    } else {
        text.parse::<u32>().context("invalid integer")
    }
}

fn load_config(path: &PathBuf) -> Result<SdrCoreConfig> {
    let file = File::open(path).with_context(|| format!("opening config {path:?}"))?;
    serde_json::from_reader(BufReader::new(file)).context("parsing core configuration")
}

fn write_samples_f32(samples: &[Complex], path: &PathBuf) -> Result<()> {
    use byteorder::{LittleEndian, WriteBytesExt};

    let file = File::create(path).context("failed to create output file")?;
    let mut writer = BufWriter::new(file);
    for sample in samples {
        writer.write_f32::<LittleEndian>(sample.re as f32)?;
        writer.write_f32::<LittleEndian>(sample.im as f32)?;
    }
    writer.flush()?;
    Ok(())
}

fn read_samples_f32(path: &PathBuf) -> Result<Vec<Complex>> {
    use byteorder::{LittleEndian, ReadBytesExt};

    let file = File::open(path).context("failed to open input file")?;
    let metadata = file.metadata()?;
    let num_samples = metadata.len() as usize / 8; // 2 x f32 per sample

    let mut reader = BufReader::new(file);
    let mut samples = Vec::with_capacity(num_samples);
    for _ in 0..num_samples {
        let re = reader.read_f32::<LittleEndian>()?;
        let im = reader.read_f32::<LittleEndian>()?;
        samples.push(Complex::new(re.round() as i64, im.round() as i64));
    }
    Ok(samples)
}

fn cmd_info(config: PathBuf) -> Result<()> {
    let cfg = load_config(&config)?;
    let mut core = SdrCore::new(&cfg).context("constructing core")?;
    let platform = core.registers().platform();
    let (product_id, _) = core.register_read(0x00);
    let (version, _) = core.register_read(0x04);
    info!(platform, "core constructed");
    println!("product_id = {product_id:#010x}");
    println!("version    = {version:#010x}");
    println!("platform   = {platform}");
    Ok(())
}

fn cmd_reg_read(config: PathBuf, offset: String) -> Result<()> {
    let cfg = load_config(&config)?;
    let mut core = SdrCore::new(&cfg).context("constructing core")?;
    let offset = parse_int(&offset)?;
    let (data, done) = core.register_read(offset);
    println!("[{offset:#06x}] = {data:#010x} (done={done})");
    Ok(())
}

fn cmd_reg_write(config: PathBuf, offset: String, data: String, strobes: String) -> Result<()> {
    let cfg = load_config(&config)?;
    let mut core = SdrCore::new(&cfg).context("constructing core")?;
    let offset = parse_int(&offset)?;
    let data = parse_int(&data)?;
    let strobes = parse_int(&strobes)? as u8;
    let done = core.register_write(offset, data, strobes);
    println!("[{offset:#06x}] <= {data:#010x} (done={done})");
    Ok(())
}

fn cmd_feed(config: PathBuf, input: PathBuf, spectrum_out: Option<PathBuf>, recorder_out: Option<PathBuf>) -> Result<()> {
    let cfg = load_config(&config)?;
    let samples = read_samples_f32(&input)?;
    info!("loaded {} samples from {:?}", samples.len(), input);

    let mut sim = Simulation::new(&cfg).context("constructing simulation")?;
    let outputs = run_feed(&mut sim, samples);
    info!("processed {} cycles", sim.cycle());

    if let Some(path) = recorder_out {
        let words: Vec<u64> = outputs.iter().filter_map(|o| o.stream_burst_word).collect();
        let mut file = BufWriter::new(File::create(&path)?);
        for word in &words {
            file.write_all(&word.to_le_bytes())?;
        }
        info!("wrote {} recorder burst words to {:?}", words.len(), path);
    }

    if let Some(path) = spectrum_out {
        let n = 1usize << cfg.fft.order;
        let bins: Vec<_> = (0..n).map(|b| sim.core().spectrometer().read_bin(b)).collect();
        let json = serde_json::to_string_pretty(&bins.iter().map(|b| (b.mantissa, b.exponent)).collect::<Vec<_>>())?;
        std::fs::write(&path, json)?;
        info!("wrote {} spectrum bins to {:?}", n, path);
    }

    Ok(())
}

fn cmd_gen_tone(output: PathBuf, frequency: f64, amplitude: i64, count: usize) -> Result<()> {
    let samples: Vec<Complex> = (0..count)
        .map(|k| {
            let angle = 2.0 * std::f64::consts::PI * frequency * (k as f64);
            Complex::new(
                (amplitude as f64 * angle.cos()).round() as i64,
                (amplitude as f64 * angle.sin()).round() as i64,
            )
        })
        .collect();
    write_samples_f32(&samples, &output)?;
    info!("wrote {} samples to {:?}", samples.len(), output);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(log_level).with_target(false).init();

    match cli.command {
        Commands::Info { config } => cmd_info(config),
        Commands::RegRead { config, offset } => cmd_reg_read(config, offset),
        Commands::RegWrite { config, offset, data, strobes } => cmd_reg_write(config, offset, data, strobes),
        Commands::Feed { config, input, spectrum_out, recorder_out } => cmd_feed(config, input, spectrum_out, recorder_out),
        Commands::GenTone { output, frequency, amplitude, count } => cmd_gen_tone(output, frequency, amplitude, count),
    }
}
