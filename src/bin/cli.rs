//! sg-cli: run an editor command script against a demo machine.
//!
//! Usage:
//!   sg-cli --script edits.sg
//!   printf 'group track\nnote C\nprint\n' | sg-cli --tracks 2
//!
//! Set `RUST_LOG=info` to see every history commit.

use clap::Parser;
use sg_session::{EditSession, EditorConfig};
use stepgrid::demo_machine;
use stepgrid::ui::grid::{render, status};
use stepgrid::ui::input::{parse_script, Command};
use std::io::Read;
use std::path::PathBuf;
use std::{fs, process};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sg-cli", version, about = "Run a pattern editor script and print the result")]
struct Args {
    /// Script file (defaults to stdin)
    #[arg(long)]
    script: Option<PathBuf>,
    /// Rows in the initial pattern and in new patterns
    #[arg(long, default_value_t = 16)]
    rows: u16,
    /// Tracks in the Track group
    #[arg(long, default_value_t = 4)]
    tracks: usize,
    /// Incoming connections
    #[arg(long, default_value_t = 0)]
    connections: usize,
    /// Base octave for note entry
    #[arg(long, default_value_t = 4)]
    octave: u8,
    /// Rows to advance after entering a value
    #[arg(long, default_value_t = 1)]
    step: u8,
    /// Print the grid after every command
    #[arg(long)]
    print: bool,
}

fn read_script(path: Option<&PathBuf>) -> std::io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let text = read_script(args.script.as_ref()).unwrap_or_else(|e| {
        eprintln!("Failed to read script: {}", e);
        process::exit(1);
    });
    let commands = parse_script(&text).unwrap_or_else(|e| {
        eprintln!("{}", e);
        process::exit(1);
    });
    tracing::info!(commands = commands.len(), "script parsed");

    let config = EditorConfig {
        base_octave: args.octave.min(9),
        step: args.step,
        default_rows: args.rows.max(1),
        ..EditorConfig::default()
    };
    let mut session = EditSession::new(demo_machine(args.tracks, args.connections), config);
    if let Err(e) = session.new_pattern("00", None) {
        eprintln!("Failed to create pattern: {}", e);
        process::exit(1);
    }

    let mut printed = false;
    for (line, command) in commands {
        match command {
            Command::Print => {
                print!("{}", render(&session));
                println!("{}", status(&session));
                printed = true;
            }
            Command::Clipboard => match session.clipboard_contents() {
                Ok(Some(data)) => println!("clipboard: {:?}, {} cells", data.mode, data.records.len()),
                Ok(None) => println!("clipboard: empty"),
                Err(e) => println!("clipboard: {}", e),
            },
            Command::Action(action) => {
                if let Err(e) = session.dispatch(action) {
                    eprintln!("line {}: {}", line, e);
                    process::exit(1);
                }
                if args.print {
                    print!("{}", render(&session));
                    printed = true;
                }
            }
        }
    }

    if !printed {
        print!("{}", render(&session));
        println!("{}", status(&session));
    }
}
