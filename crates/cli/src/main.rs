//! stubsmith CLI: keep call stubs in sync with a C-family source file.
//!
//! `watch` follows a file on disk; `process` and `inspect` run the pipeline
//! once for a single line.

mod error;
mod session;
mod watch;

use clap::{CommandFactory, Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;
use tracing::{error, info, warn};

use stubsmith_core::infer::{infer_argument_types, scan_variable_types};
use stubsmith_core::parser::extract_calls_with;
use stubsmith_core::{
    config_path_for, load_config, Buffer, CallProcessor, StubAction, StubStyle, StubsmithConfig,
    TextBuffer,
};

use error::HostError;
use session::{read_buffer, write_buffer, FileSession};

/// stubsmith: generate placeholder definitions for functions you call but
/// have not written yet.
#[derive(Parser)]
#[command(name = "stubsmith", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: .stubsmith.toml next to the source file)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch a source file and insert or update stubs as it is edited
    Watch {
        /// Source file to watch
        file: PathBuf,
    },
    /// Run the pipeline once for one line of a file
    Process {
        /// Source file
        file: PathBuf,

        /// Line holding the call (1-indexed)
        #[arg(long)]
        line: usize,

        /// Print the resulting text instead of writing it back
        #[arg(long)]
        dry_run: bool,
    },
    /// Show the calls, declarations and inferred parameters for one line
    Inspect {
        /// Source file
        file: PathBuf,

        /// Line to inspect (1-indexed)
        #[arg(long)]
        line: usize,

        /// Output as JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stubsmith=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), HostError> {
    match cli.command {
        Commands::Watch { file } => {
            let file = file
                .canonicalize()
                .map_err(|source| HostError::Read { path: file.clone(), source })?;
            let config = resolve_config(cli.config.as_deref(), &file);
            watch_file(&file, &config)
        }
        Commands::Process { file, line, dry_run } => {
            let config = resolve_config(cli.config.as_deref(), &file);
            process_line(&file, line, dry_run, &config)
        }
        Commands::Inspect { file, line, json } => inspect_line(&file, line, json),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "stubsmith",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}

fn resolve_config(explicit: Option<&Path>, file: &Path) -> StubsmithConfig {
    let config = match explicit {
        Some(path) => load_config(path),
        None => load_config(&config_path_for(file)),
    };
    let ext = file.extension().and_then(|e| e.to_str()).unwrap_or_default();
    if !config.accepts_extension(ext) {
        warn!(
            path = %file.display(),
            extension = ext,
            "File extension is not in the configured list"
        );
    }
    config
}

/// Map a 1-indexed line from the command line onto the buffer.
fn zero_based(path: &Path, buffer: &TextBuffer, line: usize) -> Result<usize, HostError> {
    let line_count = buffer.line_count();
    match line.checked_sub(1) {
        Some(index) if index < line_count => Ok(index),
        _ => Err(HostError::LineOutOfRange { path: path.to_path_buf(), line, line_count }),
    }
}

fn watch_file(file: &Path, config: &StubsmithConfig) -> Result<(), HostError> {
    let session = FileSession::open(file, config)?;
    let (tx, rx) = mpsc::channel();
    let _watcher = watch::start_watcher(file, tx)?;

    let applied = watch::debounce_loop(rx, session, Duration::from_millis(config.debounce_ms));
    info!(path = %file.display(), edits = applied, "Stopped watching");
    Ok(())
}

fn process_line(
    file: &Path,
    line: usize,
    dry_run: bool,
    config: &StubsmithConfig,
) -> Result<(), HostError> {
    let mut buffer = read_buffer(file)?;
    let index = zero_based(file, &buffer, line)?;

    let style = StubStyle::with_indent_width(config.indent_width);
    let mut processor = CallProcessor::with_style(style);
    let actions = processor.process_change(&mut buffer, index);

    for action in &actions {
        match action {
            StubAction::Inserted { function, line } => {
                eprintln!("inserted {function}() at line {}", line + 1);
            }
            StubAction::Replaced { function, lines } => {
                eprintln!("replaced {function}() at lines {}-{}", lines.start + 1, lines.end);
            }
        }
    }

    if dry_run {
        print!("{}", buffer.to_text());
    } else if !actions.is_empty() {
        write_buffer(file, &buffer)?;
    } else {
        eprintln!("No new calls on line {line}");
    }
    Ok(())
}

fn inspect_line(file: &Path, line: usize, json: bool) -> Result<(), HostError> {
    let buffer = read_buffer(file)?;
    let index = zero_based(file, &buffer, line)?;
    let text = buffer.trimmed(index).to_string();

    let context = scan_variable_types(buffer.lines()[..index].iter().map(String::as_str));
    let calls = extract_calls_with(&text, |var| context.get(var).cloned());
    let parameters: Vec<Vec<String>> =
        calls.iter().map(|call| infer_argument_types(&call.args, &context)).collect();

    if json {
        let items: Vec<serde_json::Value> = calls
            .iter()
            .zip(&parameters)
            .map(|(call, params)| {
                serde_json::json!({
                    "call": call,
                    "parameters": params,
                })
            })
            .collect();
        let sorted: BTreeMap<&String, &String> = context.iter().collect();
        let out = serde_json::json!({
            "line": line,
            "text": text,
            "calls": items,
            "context": sorted,
        });
        println!("{}", serde_json::to_string_pretty(&out).unwrap_or_default());
        return Ok(());
    }

    if calls.is_empty() {
        eprintln!("No calls on line {line}: {text}");
        return Ok(());
    }
    for (call, params) in calls.iter().zip(&parameters) {
        println!("{} {}({})", call.return_type, call.name, params.join(", "));
    }
    if !context.is_empty() {
        println!();
        let sorted: BTreeMap<_, _> = context.iter().collect();
        for (name, ty) in sorted {
            println!("  {name:<20} {ty}");
        }
    }
    Ok(())
}
