use std::path::PathBuf;
use std::process;

use chordstaff::{
    to_musicxml, AccidentalGlyph, Config, KeySignatureTable, Letter, Mode, NotationError,
    NotationEvent, NotationSession, StaffFrame,
};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chordstaff")]
#[command(about = "Spell held MIDI notes on a staff in a major key")]
#[command(version)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out a set of MIDI note numbers
    Layout {
        /// Tonic of the major key (defaults to the configured key)
        #[arg(short, long)]
        key: Option<Letter>,

        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,

        /// MIDI note numbers (0-127), in any order
        #[arg(required = true)]
        notes: Vec<i32>,
    },

    /// List the catalogued key signatures
    Keys,

    /// List MIDI input devices
    #[cfg(feature = "device")]
    Devices,

    /// Bind a MIDI input and print a JSON frame after every change.
    /// Type a tonic letter on stdin to change key, `clear` to release all notes.
    #[cfg(feature = "device")]
    Listen {
        /// Substring of the input port name (defaults to the configured device)
        #[arg(short, long)]
        device: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Musicxml,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// `RUST_LOG` when set, otherwise info
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn run(cli: Cli) -> Result<(), NotationError> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let table = config.key_table()?;

    match cli.command {
        Commands::Layout { key, format, notes } => {
            let tonic = key.unwrap_or(config.key);
            let mut session = NotationSession::new(table, tonic, config.mode)?;
            for note in notes {
                if let Err(e) = session.apply(NotationEvent::NoteOn(note)) {
                    tracing::warn!("Skipping note: {}", e);
                }
            }
            let frame = session.frame();
            match format {
                Format::Text => print!("{}", frame_to_text(&frame)),
                Format::Json => println!("{}", frame_to_json(&frame)?),
                Format::Musicxml => print!("{}", to_musicxml(&frame)),
            }
        }
        Commands::Keys => print_keys(&table),
        #[cfg(feature = "device")]
        Commands::Devices => {
            for name in chordstaff::device::list_input_devices()? {
                println!("{}", name);
            }
        }
        #[cfg(feature = "device")]
        Commands::Listen { device } => {
            let pattern = device
                .or_else(|| config.device.clone())
                .ok_or_else(|| NotationError::Config("no MIDI device given".to_string()))?;
            let session = NotationSession::new(table, config.key, config.mode)?;
            listen(session, &pattern, &config)?;
        }
    }

    Ok(())
}

fn frame_to_json(frame: &StaffFrame) -> Result<String, NotationError> {
    serde_json::to_string(frame).map_err(|e| NotationError::Config(e.to_string()))
}

fn frame_to_text(frame: &StaffFrame) -> String {
    let mut out = format!("{}", frame.key);
    if let Some(chord) = &frame.chord {
        out.push_str(&format!("  [{}]", chord));
    }
    out.push('\n');

    // Highest note first, the way it reads on the staff
    for note in frame.notes.iter().rev() {
        let glyph = match note.rendered_accidental {
            AccidentalGlyph::None => "",
            AccidentalGlyph::Sharp => "#",
            AccidentalGlyph::Flat => "b",
            AccidentalGlyph::Natural => "n",
        };
        out.push_str(&format!(
            "{:>4}  {:<3} {:>2}  octave {:>2}  offset {:>5}{}\n",
            note.midi_note.value(),
            note.name(),
            glyph,
            note.octave,
            note.vertical_offset,
            if note.flip { "  flip" } else { "" }
        ));
    }
    out
}

fn print_keys(table: &KeySignatureTable) {
    for key in table.iter() {
        let scale: Vec<String> = key.scale.iter().map(|p| p.to_string()).collect();
        println!("{:<8} {:+}  {}", key.name(), key.fifths(), scale.join(" "));
    }
}

/// Parse a stdin command from the listen loop
#[cfg_attr(not(feature = "device"), allow(dead_code))]
fn parse_command(line: &str) -> Option<NotationEvent> {
    match line.trim() {
        "clear" => Some(NotationEvent::Clear),
        other => other.parse::<Letter>().ok().map(|tonic| NotationEvent::SelectKey {
            tonic,
            mode: Mode::Major,
        }),
    }
}

#[cfg(feature = "device")]
fn listen(session: NotationSession, pattern: &str, config: &Config) -> Result<(), NotationError> {
    use std::io::BufRead;
    use std::sync::{Arc, Mutex};

    use chordstaff::device::DeviceBinding;
    use tracing::warn;

    let session = Arc::new(Mutex::new(session));
    let filter = config.midi_filter();

    let shared = Arc::clone(&session);
    let _binding = DeviceBinding::bind(
        pattern,
        Box::new(move |data| {
            let Ok(mut session) = shared.lock() else {
                return;
            };
            match session.apply_midi(data, &filter) {
                Ok(true) => print_frame(&session.frame()),
                Ok(false) => {}
                Err(e) => warn!("{}", e),
            }
        }),
    )?;

    for line in std::io::stdin().lock().lines() {
        let line = line.map_err(|source| NotationError::Io {
            path: "<stdin>".to_string(),
            source,
        })?;
        if line.trim() == "quit" {
            break;
        }
        let Some(event) = parse_command(&line) else {
            eprintln!("Unknown command: {}", line.trim());
            continue;
        };
        let Ok(mut session) = session.lock() else {
            break;
        };
        match session.apply(event) {
            Ok(true) => print_frame(&session.frame()),
            Ok(false) => {}
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    Ok(())
}

#[cfg(feature = "device")]
fn print_frame(frame: &StaffFrame) {
    match frame_to_json(frame) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: {}", e),
    }
}
