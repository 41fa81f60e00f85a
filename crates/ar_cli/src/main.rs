//! Race Runner CLI
//!
//! Builds track geometry and runs headless AI races.

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use std::sync::Arc;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "ar_cli")]
#[command(about = "Build race tracks and run headless AI races", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Build geometry (centerline, boundaries, kerbs, racing lines)
    Build {
        /// Track description JSON
        #[arg(long)]
        track: PathBuf,

        /// Write the computed track here
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Run one AI-only race
    Race {
        #[arg(long)]
        track: PathBuf,

        #[arg(long, default_value_t = 5)]
        opponents: usize,

        #[arg(long, default_value_t = 60.0)]
        seconds: f32,

        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// easy, medium, hard or expert
        #[arg(long, default_value = "medium")]
        difficulty: ar_core::ai::Difficulty,

        /// Forgiving walls and bouncier contact
        #[arg(long)]
        arcade: bool,

        /// Write the race report here
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Run many races in parallel with consecutive seeds
    Batch {
        #[arg(long)]
        track: PathBuf,

        #[arg(long)]
        runs: usize,

        #[arg(long, default_value_t = 5)]
        opponents: usize,

        #[arg(long, default_value_t = 60.0)]
        seconds: f32,

        #[arg(long, default_value_t = 0)]
        seed: u64,

        #[arg(long, default_value = "medium")]
        difficulty: ar_core::ai::Difficulty,

        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the JSON schema of the track description format
    Schema,
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { track, out } => {
            println!("Building track...");
            println!("   Input: {}", track.display());

            let computed = ar_cli::build_track_file(&track, out.as_deref())?;

            println!("\nTrack '{}' built", computed.name);
            println!("   Samples:    {}", computed.path.len());
            println!("   Length:     {:.1}", computed.total_length);
            println!("   Winding:    {:?}", computed.winding);
            println!("   Kerbs:      {}", computed.kerbs.len());
            println!("   DRS zones:  {}", computed.drs_zones.len());
            if let Some(out) = out {
                println!("   Output:     {}", out.display());
            }
        }

        Commands::Race { track, opponents, seconds, seed, difficulty, arcade, out } => {
            if opponents == 0 {
                anyhow::bail!("--opponents must be at least 1");
            }
            let computed = Arc::new(ar_cli::build_track_file(&track, None)?);
            let options = ar_cli::RaceOptions { opponents, seconds, seed, difficulty, arcade };

            println!("Racing {} x {} on '{}' for {:.0}s (seed {})", opponents, difficulty, computed.name, seconds, seed);
            let report = ar_cli::run_race(computed, &options);
            print_report(&report);

            if let Some(out) = out {
                ar_cli::write_json(&out, &report)?;
                println!("\nReport saved to: {}", out.display());
            }
        }

        Commands::Batch { track, runs, opponents, seconds, seed, difficulty, out } => {
            if runs == 0 {
                anyhow::bail!("--runs must be at least 1");
            }
            let computed = Arc::new(ar_cli::build_track_file(&track, None)?);
            let options = ar_cli::RaceOptions { opponents, seconds, seed, difficulty, arcade: false };

            println!("Running {} races on '{}'...", runs, computed.name);
            let reports = ar_cli::run_batch(computed, &options, runs);
            let stats = ar_cli::batch_stats(&reports);

            println!("\nBatch complete");
            println!("   Runs:               {}", stats.runs);
            println!("   Mean collisions:    {:.2}", stats.mean_collisions);
            println!("   Max collisions:     {}", stats.max_collisions);
            println!("   Mean wall contacts: {:.2}", stats.mean_containments);

            if let Some(out) = out {
                ar_cli::write_json(&out, &reports)?;
                println!("\nReports saved to: {}", out.display());
            }
        }

        Commands::Schema => {
            let schema = ar_core::models::TrackDescription::json_schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_report(report: &ar_cli::RaceReport) {
    println!("\nRace finished after {} ticks ({:.1}s)", report.ticks, report.elapsed);
    println!("   Collisions:   {}", report.collisions);
    println!("   Wall contacts: {}", report.containments);
    for v in &report.vehicles {
        println!(
            "   {:<8} progress {:>5.1}%  speed {:>6.1}  at ({:.0}, {:.0})",
            v.id,
            v.progress * 100.0,
            v.state.speed,
            v.state.position.0,
            v.state.position.1
        );
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("ar_cli is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
