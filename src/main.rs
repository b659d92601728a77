use anyhow::{bail, Context};
use chordsweep::audio::{convert_folder, Synthesizer};
use chordsweep::config::{load_config, validate_config, Config};
use chordsweep::export::{file_stem, jams};
use chordsweep::generate::{self, GenerateOptions};
use chordsweep::{logging, repl};
use chordsweep_core::types::time;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

/// Chord progression dataset generator
#[derive(Parser)]
#[command(name = "chordsweep")]
#[command(about = "Generate MIDI, audio and chord annotations for every voicing of a progression")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Custom configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet output
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write one MIDI file per key, octave and inversion combination
    Generate {
        /// Progression, e.g. "ii,7-V,7-I,maj7"
        progression: String,

        /// Short name used for the output folder and file names
        name: String,

        /// Octave range of starting pitches (e.g., "1-6")
        #[arg(long, value_parser = parse_octaves)]
        octaves: Option<(i8, i8)>,

        /// Tempo in BPM
        #[arg(long)]
        tempo: Option<u32>,

        /// Seed for randomized chord lengths
        #[arg(long)]
        seed: Option<u64>,

        /// Randomize chord lengths and write a durations.json sidecar
        #[arg(long)]
        randomize: bool,
    },
    /// Convert every .mid file in a folder to WAV
    Convert {
        /// Folder searched recursively for .mid files
        folder: PathBuf,
    },
    /// Write a JAMS chord annotation for every .mid file in a folder
    Annotate {
        /// Folder searched recursively for .mid files
        folder: PathBuf,

        /// Numerals shared by all files, e.g. "ii,min7-V,7-I,maj7"
        numerals: String,

        /// Key the labels are computed in, e.g. "C" or "Am"
        key: String,

        /// Title stored in the annotations (defaults to the folder name)
        #[arg(long)]
        name: Option<String>,
    },
    /// Print the chord label of a numeral in a key
    Label {
        numeral: String,
        key: String,
    },
    /// Print how many files a progression would generate
    Count {
        progression: String,
    },
    /// Generate every progression of the built-in catalogue
    Batch,
    /// Show the effective configuration
    ShowConfig,
    /// Validate configuration file
    ValidateConfig {
        /// Configuration file to validate
        file: PathBuf,
    },
    /// Start the interactive shell
    Repl,
}

/// Parse `LOW-HIGH` octave ranges
fn parse_octaves(s: &str) -> Result<(i8, i8), String> {
    let (low, high) = s
        .split_once('-')
        .ok_or_else(|| format!("expected LOW-HIGH, got '{}'", s))?;
    let low = low
        .trim()
        .parse()
        .map_err(|_| format!("invalid low octave '{}'", low))?;
    let high = high
        .trim()
        .parse()
        .map_err(|_| format!("invalid high octave '{}'", high))?;
    Ok((low, high))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose && cli.quiet {
        bail!("Cannot specify both --verbose and --quiet");
    }
    logging::init(logging::level_for(cli.verbose, cli.quiet))?;

    // Load configuration
    let mut config = if let Some(config_path) = &cli.config {
        load_config(config_path)?
    } else {
        Config::default()
    };

    match cli.command {
        Commands::Generate {
            progression,
            name,
            octaves,
            tempo,
            seed,
            randomize,
        } => {
            if let Some((low, high)) = octaves {
                config.sweep.low_octave = low;
                config.sweep.high_octave = high;
            }
            if let Some(tempo) = tempo {
                config.midi.tempo = tempo;
            }
            if let Some(seed) = seed {
                config.timing.seed = seed;
            }
            config.timing.randomize |= randomize;
            validate_config(&config)?;

            let options = GenerateOptions::from_config(&config);
            let summary = generate::generate_progression(&progression, &name, &options)
                .with_context(|| format!("failed to generate '{}'", progression))?;

            println!(
                "{} {} files in {}",
                "Generated".bright_green(),
                summary.files,
                summary.output_dir.display()
            );
            if let Some(sidecar) = summary.sidecar {
                println!("Chord durations recorded in {}", sidecar.display());
            }
        }
        Commands::Convert { folder } => {
            let synth = Synthesizer::from_config(&config.audio);
            let report = convert_folder(
                &folder,
                &config.paths.wav_dir,
                &synth,
                config.audio.workers,
            )?;
            println!(
                "{} {} of {} files to {}",
                "Converted".bright_green(),
                report.converted.len(),
                report.total(),
                config.paths.wav_dir.display()
            );
            if !report.failed.is_empty() {
                println!(
                    "{} {} files failed (see warnings above)",
                    "Warning:".yellow().bold(),
                    report.failed.len()
                );
            }
        }
        Commands::Annotate {
            folder,
            numerals,
            key,
            name,
        } => {
            let title = name.unwrap_or_else(|| file_stem(&folder));
            let chord_beats = time::quantize_quarters(config.midi.chord_beats);
            let job = jams::AnnotationJob {
                numerals: &numerals,
                key: &key,
                title: &title,
                jams_dir: &config.paths.jams_dir,
                default_seconds: time::to_seconds(chord_beats, config.midi.tempo),
            };
            let written = jams::annotate_folder(&folder, &job)
                .with_context(|| format!("failed to annotate {}", folder.display()))?;
            println!(
                "{} {} annotations in {}",
                "Wrote".bright_green(),
                written.len(),
                config.paths.jams_dir.display()
            );
        }
        Commands::Label { numeral, key } => {
            println!("{}", chordsweep_core::translate(&numeral, &key)?);
        }
        Commands::Count { progression } => {
            println!("{}", generate::count(&progression, &config.sweep)?);
        }
        Commands::Batch => {
            validate_config(&config)?;
            let options = GenerateOptions::from_config(&config);
            let summaries = generate::generate_catalogue(&options)?;
            for summary in &summaries {
                println!(
                    "  {:<10} {:>6} files  {}",
                    summary.name.green(),
                    summary.files,
                    summary.output_dir.display()
                );
            }
            let total: usize = summaries.iter().map(|s| s.files).sum();
            println!("{} {} files", "Generated".bright_green(), total);
        }
        Commands::ShowConfig => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
        Commands::ValidateConfig { file } => {
            let config = load_config(file)?;
            println!("Configuration is valid");
            if let Ok(json) = serde_json::to_string_pretty(&config) {
                println!("{}", json);
            }
        }
        Commands::Repl => {
            repl::start(config)?;
        }
    }

    Ok(())
}
