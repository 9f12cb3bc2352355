mod layout;
mod simulate;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use keypad_core::{KeyDescriptor, KEYMAP, MATRIX};
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "keypad-cli")]
#[command(about = "Host tools for the matrix keypad firmware")]
struct Cli {
    /// Log pipeline decisions (repeat for per-scan detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the boot-time configuration check and print the key table
    Check,
    /// Render the key map as an HTML page with an inline SVG
    Layout {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Feed a TOML trace of raw scans through the scan pipeline
    Simulate {
        /// Path to the trace file
        trace: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Command::Check => {
            MATRIX.validate().context("matrix wiring")?;
            KEYMAP.validate().context("key map")?;

            println!(
                "{} columns on pins {:?}, {} rows on pins {:?}",
                KEYMAP.columns(),
                MATRIX.column_pins,
                KEYMAP.rows(),
                MATRIX.row_pins
            );
            println!(
                "settle {} ms, debounce {} scans",
                MATRIX.settle_ms, MATRIX.debounce_threshold
            );
            println!();
            for (coord, desc) in KEYMAP.iter() {
                println!("{coord}  {}", describe(desc));
            }
            println!();
            println!("OK: {} keys", KEYMAP.iter().count());
        }
        Command::Layout { output } => {
            let html = layout::generate_html();
            match output {
                Some(path) => fs::write(&path, html)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => print!("{html}"),
            }
        }
        Command::Simulate { trace } => {
            let contents = fs::read_to_string(&trace)
                .with_context(|| format!("reading {}", trace.display()))?;
            let trace = simulate::Trace::parse(&contents).context("parsing trace")?;
            for line in simulate::run(&trace)? {
                println!("{line}");
            }
        }
    }

    Ok(())
}

/// "k + Alt (hold)" style label.
pub fn describe(desc: &KeyDescriptor) -> String {
    let mut label = match desc.modifier {
        Some(modifier) => format!("{} + {}", desc.key, modifier),
        None => desc.key.to_string(),
    };
    if desc.hold {
        label.push_str(" (hold)");
    }
    label
}
