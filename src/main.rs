//! wmd - Main Entry Point
//!
//! Applies one formatting command to a Markdown document read from a file or
//! stdin and writes the result back out.

use clap::Parser;
use log::{debug, info};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use wmd::config::{load_config, save_config};
use wmd::{Command, EditingSurface, Editor, EditorState, Error, Result, TextBuffer};

#[derive(Parser, Debug)]
#[command(name = "wmd", version, about, long_about = None)]
struct Cli {
    /// Command to apply: strong, em, link, image, blockquote, code, ol, ul, heading, hr, autoindent
    #[arg(value_name = "COMMAND", required_unless_present_any = ["list", "save"])]
    command: Option<String>,

    /// Markdown file to edit (reads stdin when omitted)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Byte offset where the selection starts (default: end of text)
    #[arg(long, value_name = "N")]
    start: Option<usize>,

    /// Byte offset where the selection ends (default: the start)
    #[arg(long, value_name = "N")]
    end: Option<usize>,

    /// URL for link and image commands; without it they change nothing
    #[arg(long)]
    url: Option<String>,

    /// Wrap width for list and quote text, overriding the config file
    #[arg(long, value_name = "N")]
    line_width: Option<usize>,

    /// Print the resulting text and selection as JSON
    #[arg(long)]
    json: bool,

    /// Write the result back to FILE
    #[arg(long)]
    in_place: bool,

    /// List the available commands and exit
    #[arg(long)]
    list: bool,

    /// Save the effective settings (including --line-width) as the new defaults
    #[arg(long)]
    save: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("wmd: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.list {
        print_commands();
        return Ok(());
    }

    let command = cli.command.as_deref().map(str::parse::<Command>).transpose()?;
    if cli.in_place && cli.file.is_none() {
        return Err(Error::Application("--in-place needs a FILE".to_string()));
    }

    let mut settings = load_config();
    if let Some(width) = cli.line_width {
        settings.line_width = width;
        settings.sanitize();
    }
    debug!("Using line width {}", settings.line_width);

    if cli.save {
        save_config(&settings)?;
        info!("Saved settings as defaults");
    }
    let Some(command) = command else {
        return Ok(());
    };

    let text = read_input(cli.file.as_ref())?;
    let start = cli.start.or(cli.end).unwrap_or(text.len());
    let end = cli.end.unwrap_or(start);

    let editor = Editor::new(settings);
    let mut buffer = TextBuffer::from_state(EditorState::new(text).with_selection(start, end));

    let changed = if command == Command::AutoIndent {
        editor.continue_block(&mut buffer)
    } else {
        let url = cli.url.clone();
        let mut prompt = |_: &str, _: &str| url.clone();
        editor.execute(&mut buffer, command, &mut prompt)
    };
    info!("{} {}", command, if changed { "applied" } else { "made no change" });

    let state = buffer.capture_state();
    if let (true, Some(path)) = (cli.in_place, cli.file.as_ref()) {
        fs::write(path, &state.text).map_err(|source| Error::FileWrite {
            path: path.clone(),
            source,
        })?;
        info!("Wrote {}", path.display());
    }

    let mut stdout = io::stdout().lock();
    if cli.json {
        let json = serde_json::to_string_pretty(&state)?;
        writeln!(stdout, "{}", json)?;
    } else if !cli.in_place {
        stdout.write_all(state.text.as_bytes())?;
    }
    stdout.flush()?;
    Ok(())
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.clone(),
            source,
        }),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn print_commands() {
    for command in Command::ALL {
        let definition = command.definition();
        let shortcut = definition
            .shortcut
            .map(|key| format!("Ctrl+{}", key.to_ascii_uppercase()))
            .unwrap_or_default();
        println!("{:<12} {:<16} {}", definition.name, definition.label, shortcut);
    }
}
