//! fontload CLI (made by FontLab https://www.fontlab.com/)

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};
use log::debug;

use fontload_core::output::{write_summaries, FontSummary, JsonStyle};
use fontload_core::resolve::resolve;
use fontload_core::{
    FcMatch, Font, FontCache, FontLoader, FontMatcher, OneShot, ReadFontsParser,
};

/// CLI entrypoint for fontload.
#[derive(Debug, Parser)]
#[command(
    name = "fontload",
    about = "Resolve and load fonts by name (made by FontLab https://www.fontlab.com/)"
)]
pub struct Cli {
    /// Log resolution and cache activity (overrides RUST_LOG's default)
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Executable to use instead of fc-match
    #[arg(long = "matcher", global = true, value_hint = ValueHint::CommandName)]
    matcher: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the file path each font name resolves to
    ///
    /// Trailing whitespace in the matcher's output is not printed.
    Resolve(NameArgs),
    /// Load and parse fonts, printing a summary per name
    Load(LoadArgs),
}

#[derive(Debug, Args)]
struct NameArgs {
    /// Font names or absolute paths
    #[arg(required_unless_present = "stdin_names")]
    names: Vec<String>,

    /// Read newline-delimited names from STDIN
    #[arg(long = "stdin-names", action = ArgAction::SetTrue)]
    stdin_names: bool,
}

#[derive(Debug, Args)]
struct LoadArgs {
    #[command(flatten)]
    names: NameArgs,

    /// Resolve and parse every name afresh instead of sharing one cache
    #[arg(long = "no-cache", action = ArgAction::SetTrue)]
    no_cache: bool,

    /// Report whether each font covers this text sample
    #[arg(short = 't', long = "text")]
    text: Option<String>,

    /// Emit a single JSON array
    #[arg(long = "json", action = ArgAction::SetTrue, conflicts_with = "ndjson")]
    json: bool,

    /// Emit newline-delimited JSON
    #[arg(long = "ndjson", action = ArgAction::SetTrue)]
    ndjson: bool,

    /// Control colorized output (auto|always|never)
    #[arg(long = "color", default_value_t = ColorChoice::Auto, value_enum)]
    color: ColorChoice,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

/// Parse CLI args and execute the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let matcher = build_matcher(cli.matcher.as_ref());
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match cli.command {
        Command::Resolve(args) => {
            let names = gather_names(&args, stdin.lock())?;
            run_resolve(&names, &matcher, &mut handle)
        }
        Command::Load(args) => {
            let names = gather_names(&args.names, stdin.lock())?;
            let use_color = match args.color {
                ColorChoice::Always => true,
                ColorChoice::Never => false,
                ColorChoice::Auto => handle.is_terminal(),
            };
            run_load(&args, &names, matcher, &mut handle, use_color)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(default_filter);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

fn build_matcher(program: Option<&PathBuf>) -> FcMatch {
    match program {
        Some(program) => FcMatch::with_program(program),
        None => FcMatch::new(),
    }
}

fn run_resolve<M: FontMatcher>(names: &[String], matcher: &M, mut w: impl Write) -> Result<()> {
    for name in names {
        let path =
            resolve(name, matcher).with_context(|| format!("could not find font: {name}"))?;
        // The resolved path itself stays untrimmed; only the printed line is.
        writeln!(w, "{}", path.trim_end())?;
    }
    Ok(())
}

fn run_load(
    args: &LoadArgs,
    names: &[String],
    matcher: FcMatch,
    mut w: impl Write,
    color: bool,
) -> Result<()> {
    let mut loader: Box<dyn FontLoader<Font = Font>> = if args.no_cache {
        Box::new(OneShot::new(matcher, ReadFontsParser))
    } else {
        Box::new(FontCache::with_backends(matcher, ReadFontsParser))
    };

    let summaries = load_summaries(loader.as_mut(), names, args.text.as_deref())?;

    let style = if args.ndjson {
        Some(JsonStyle::Lines)
    } else if args.json {
        Some(JsonStyle::Array)
    } else {
        None
    };

    match style {
        Some(style) => write_summaries(&summaries, style, &mut w)?,
        None => write_plain(&summaries, &mut w, color)?,
    }

    Ok(())
}

fn load_summaries(
    loader: &mut dyn FontLoader<Font = Font>,
    names: &[String],
    text: Option<&str>,
) -> Result<Vec<FontSummary>> {
    let mut summaries = Vec::with_capacity(names.len());
    for name in names {
        let (path, font) = loader.load_entry(name)?;
        debug!("{name}: {} face(s) from {path}", font.faces().len());
        summaries.push(FontSummary::new(name, &path, &font).with_sample(&font, text));
    }
    Ok(summaries)
}

fn gather_names(args: &NameArgs, stdin: impl BufRead) -> Result<Vec<String>> {
    let mut names = Vec::new();

    if args.stdin_names {
        names.extend(read_names_from(stdin)?);
    }
    names.extend(args.names.iter().cloned());

    if names.is_empty() {
        return Err(anyhow!("no font names provided"));
    }

    Ok(names)
}

/// One name per line; surrounding whitespace and blank lines are dropped.
fn read_names_from(reader: impl BufRead) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for line in reader.lines() {
        let line = line.context("failed to read font names from stdin")?;
        let name = line.trim();
        if !name.is_empty() {
            names.push(name.to_owned());
        }
    }
    Ok(names)
}

fn write_plain(summaries: &[FontSummary], mut w: impl Write, color: bool) -> Result<()> {
    for summary in summaries {
        let primary = summary.faces.first();
        let family = primary
            .and_then(|face| face.names.first().cloned())
            .unwrap_or_else(|| "(unnamed)".to_string());
        let glyphs = primary
            .and_then(|face| face.glyph_count)
            .map(|n| format!("{n} glyphs"))
            .unwrap_or_else(|| "? glyphs".to_string());

        let mut details = format!("faces:{} {glyphs}", summary.faces.len());
        if primary.map(|face| face.is_variable).unwrap_or(false) {
            details.push_str(" var");
        }
        if let Some(covers) = summary.covers_text {
            details.push_str(if covers { " covers-text" } else { " missing-text" });
        }

        writeln!(
            w,
            "{}  {}  {}  {}",
            Paint::Name.apply(&summary.name, color),
            Paint::Path.apply(&summary.path, color),
            family,
            Paint::Details.apply(&details, color),
        )?;
    }
    Ok(())
}

/// Columns of a plain-text line that get their own color.
#[derive(Copy, Clone, Debug)]
enum Paint {
    Name,
    Path,
    Details,
}

impl Paint {
    fn apply(self, text: &str, enabled: bool) -> String {
        if !enabled {
            return text.to_owned();
        }
        let sgr = match self {
            Paint::Name => 33,
            Paint::Path => 36,
            Paint::Details => 32,
        };
        format!("\u{1b}[{sgr}m{text}\u{1b}[0m")
    }
}
