use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use granular_move::model::view::TextView;
use granular_move::{AppConfig, Buffer, Command, Editor, Selection, Unit};

/// Move text around a file the way the editor commands do.
#[derive(Debug, Parser)]
#[command(name = "granular-move", version, about)]
struct Cli {
    /// Config file overlaid on the defaults.
    #[arg(long, env = "GRANULAR_MOVE_CONFIG")]
    config: Option<PathBuf>,

    /// Starting selection: `N` for a caret, `A..B` for a selection. Repeatable.
    #[arg(short, long = "select", value_parser = parse_selection)]
    selections: Vec<Selection>,

    /// Unit for left/right moves (char, subword, word, bigword).
    #[arg(long)]
    by: Option<Unit>,

    /// Repeat count for up/down moves.
    #[arg(long)]
    count: Option<usize>,

    /// Rewrite FILE instead of printing the result.
    #[arg(long)]
    in_place: bool,

    file: PathBuf,

    /// Command name, with or without the `granular_move_text_` prefix.
    command: Command,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    let _guard = init_logging(&config)?;

    tracing::info!("granular-move starting");

    let mut buffer = Buffer::from_file(cli.file.clone())
        .with_context(|| format!("opening {}", cli.file.display()))?;
    let len = buffer.len_chars();
    if let Some(bad) = cli.selections.iter().find(|s| s.end() > len) {
        bail!("selection {}..{} is past the end of the file ({len})", bad.anchor, bad.head);
    }
    if cli.selections.is_empty() {
        buffer.select([Selection::caret(0)]);
    } else {
        buffer.select(cli.selections.iter().copied());
    }

    let mut command = cli.command;
    if let Some(times) = cli.count {
        command = command.with_times(times);
    }
    if let Some(unit) = cli.by {
        command = command.with_unit(unit);
    }

    let mut editor = Editor::new(buffer, config);
    editor.run(command)?;

    if cli.in_place {
        editor.buffer.save_to(None)?;
    } else {
        let mut stdout = io::stdout().lock();
        editor.buffer.rope.write_to(&mut stdout)?;
        stdout.flush()?;
    }

    let mut stderr = io::stderr().lock();
    for selection in &editor.buffer.selections {
        if selection.is_caret() {
            writeln!(stderr, "{}", selection.head)?;
        } else {
            writeln!(stderr, "{}..{}", selection.anchor, selection.head)?;
        }
    }

    Ok(())
}

/// Log to a daily file in the data directory (never stdout, which carries the result).
fn init_logging(config: &AppConfig) -> Result<WorkerGuard> {
    let log_dir = directories::ProjectDirs::from("", "", "granular-move")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(std::env::temp_dir);
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "granular-move.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .context("invalid logging filter")?;

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    Ok(guard)
}

fn parse_selection(raw: &str) -> Result<Selection, String> {
    let number = |s: &str| {
        s.trim()
            .parse::<usize>()
            .map_err(|err| format!("bad offset `{s}`: {err}"))
    };

    match raw.split_once("..") {
        Some((anchor, head)) => Ok(Selection::new(number(anchor)?, number(head)?)),
        None => Ok(Selection::caret(number(raw)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("7"), Ok(Selection::caret(7)));
        assert_eq!(parse_selection("4..9"), Ok(Selection::new(4, 9)));
        assert_eq!(parse_selection(" 9 .. 4"), Ok(Selection::new(9, 4)));
        assert!(parse_selection("x").is_err());
        assert!(parse_selection("3..").is_err());
        assert!(parse_selection("-1").is_err());
    }
}
