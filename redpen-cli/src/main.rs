//! Redpen CLI - Terminal viewer for grammar corrections

mod config;
mod io;
mod ui;

use std::io::stdout;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use redpen_core::{
    diff_html, generate_summary, highlight_corrections_in_html, App, CorrectionRequest, Diff,
    Dialect, Mode, Review, SegmentKind, Tone,
};

use config::Config;

#[derive(Parser)]
#[command(name = "redpen")]
#[command(about = "Review grammar corrections as inline highlights and word diffs")]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open a review in the interactive viewer
    Review(ReviewArgs),
    /// Print a word diff of two HTML files
    Diff {
        original: PathBuf,
        corrected: PathBuf,
        /// Print the segment lists as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the corrected HTML with corrections highlighted
    Highlight(ReviewArgs),
    /// Print a Markdown summary of a review
    Summary(ReviewArgs),
    /// Print the request body for the correction service
    Request {
        input: PathBuf,
        #[arg(long)]
        tone: Option<Tone>,
        #[arg(long)]
        dialect: Option<Dialect>,
    },
}

#[derive(Args)]
struct ReviewArgs {
    /// The text that was submitted
    original: PathBuf,
    /// The service reply (success or error body)
    response: PathBuf,
    /// HTTP status the reply came back with
    #[arg(long, default_value_t = 200)]
    status: u16,
    #[arg(long)]
    tone: Option<Tone>,
    #[arg(long)]
    dialect: Option<Dialect>,
}

impl ReviewArgs {
    fn load(&self, config: &Config) -> Result<Review> {
        io::load_review(
            &self.original,
            &self.response,
            self.status,
            self.tone.unwrap_or(config.tone),
            self.dialect.unwrap_or(config.dialect),
        )
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env().init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Command::Review(args) => {
            let review = args.load(&config)?;
            run_viewer(review, &config)
        }
        Command::Diff {
            original,
            corrected,
            json,
        } => {
            let diff = diff_html(&io::load_html(&original)?, &io::load_html(&corrected)?);
            if json {
                println!("{}", serde_json::to_string_pretty(&diff)?);
            } else {
                print!("{}", render_word_diff(&diff));
            }
            Ok(())
        }
        Command::Highlight(args) => {
            let review = args.load(&config)?;
            println!(
                "{}",
                highlight_corrections_in_html(&review.response.rewritten_text, review.corrections())
            );
            Ok(())
        }
        Command::Summary(args) => {
            let review = args.load(&config)?;
            print!("{}", generate_summary(&review));
            Ok(())
        }
        Command::Request {
            input,
            tone,
            dialect,
        } => {
            let request = CorrectionRequest::new(
                io::load_html(&input)?,
                tone.unwrap_or(config.tone),
                dialect.unwrap_or(config.dialect),
            );
            request.validate()?;
            println!("{}", serde_json::to_string(&request)?);
            Ok(())
        }
    }
}

/// Render both sides of a diff with `[-removed-]` and `{+added+}` markers
fn render_word_diff(diff: &Diff) -> String {
    fn side(out: &mut String, segments: &[redpen_core::DiffSegment]) {
        for segment in segments {
            match segment.kind {
                SegmentKind::Unchanged => out.push_str(&segment.text),
                SegmentKind::Removed => out.push_str(&format!("[-{}-]", segment.text)),
                SegmentKind::Added => out.push_str(&format!("{{+{}+}}", segment.text)),
            }
        }
        out.push('\n');
    }

    let mut out = String::from("--- original\n");
    side(&mut out, &diff.original);
    out.push_str("+++ corrected\n");
    side(&mut out, &diff.corrected);
    out
}

fn run_viewer(review: Review, config: &Config) -> Result<()> {
    let export_dir = config.export_dir();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    let count = review.corrections().len();
    app.load_review(review);
    app.set_status(&format!("Loaded review with {count} corrections"));

    // Main loop
    let res = run_app(&mut terminal, &mut app, export_dir.as_deref());

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, export_dir: Option<&Path>) -> Result<()> {
    while app.running {
        terminal.draw(|f| ui::draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            // Clear status on any key
            app.clear_status();

            match app.mode {
                Mode::Normal => handle_normal_mode(app, key.code, export_dir),
                Mode::Detail | Mode::Help => app.close_popup(),
            }
        }
    }
    Ok(())
}

fn handle_normal_mode(app: &mut App, code: KeyCode, export_dir: Option<&Path>) {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.running = false,
        KeyCode::Char('?') => app.mode = Mode::Help,

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('g') => app.scroll_to_top(),
        KeyCode::Char(']') => app.next_correction(),
        KeyCode::Char('[') => app.prev_correction(),
        KeyCode::Tab => app.toggle_focus(),

        KeyCode::Char('v') => app.toggle_view(),
        KeyCode::Enter => app.open_detail(),

        // Export
        KeyCode::Char('e') => {
            let result = export_dir
                .context("Could not determine export directory")
                .and_then(|dir| {
                    let review = app.review.as_ref().context("No review loaded")?;
                    io::export_review(review, dir)
                });
            match result {
                Ok(path) => app.set_status(&format!("Exported to {}", path.display())),
                Err(e) => app.set_status(&format!("Export failed: {e:#}")),
            }
        }

        _ => {}
    }
}
