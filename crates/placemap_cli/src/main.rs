//! CLI replay tool.
//!
//! # Responsibility
//! - Verify `placemap_core` linkage without a browser or map widget.
//! - Replay recorded search responses through `SearchView` and print the
//!   surface calls they produce, in order.

use clap::{Parser, Subcommand};
use log::info;
use placemap_core::{
    core_version, default_log_level, init_logging, GeoRect, MapConfig, RecordingSurface,
    SearchResponse, SearchView, ViewAction,
};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "placemap", version, about = "Map search replay tool")]
struct Cli {
    /// Absolute directory for rolling log files; logging is off when omitted.
    #[arg(long, global = true)]
    log_dir: Option<String>,
    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// JSON map configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the core version.
    Version,
    /// Apply recorded search responses in order and print surface calls.
    Replay {
        /// Initial viewport as `south,west,north,east`.
        #[arg(long, value_parser = parse_rect)]
        viewport: Option<GeoRect>,
        /// Treat every response as an unbounded search (moves the viewport).
        #[arg(long)]
        anywhere: bool,
        /// Search response JSON files.
        #[arg(required = true)]
        responses: Vec<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("placemap: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).map_err(|err| err.to_string())?;
    }

    let config = match cli.config.as_ref() {
        Some(path) => MapConfig::load(path).map_err(|err| err.to_string())?,
        None => MapConfig::default(),
    };

    match cli.command {
        Command::Version => {
            println!("placemap_core version={}", core_version());
            Ok(())
        }
        Command::Replay {
            viewport,
            anywhere,
            responses,
        } => replay(config, viewport, anywhere, &responses, &mut std::io::stdout().lock()),
    }
}

fn replay(
    config: MapConfig,
    viewport: Option<GeoRect>,
    anywhere: bool,
    responses: &[PathBuf],
    out: &mut impl Write,
) -> Result<(), String> {
    let base_url = config.backend_base_url();
    let surface = match viewport {
        Some(rect) => RecordingSurface::with_viewport(rect),
        None => RecordingSurface::new(),
    };
    let mut view = SearchView::new(config, surface);

    for path in responses {
        let body = std::fs::read_to_string(path)
            .map_err(|err| format!("failed to read `{}`: {err}", path.display()))?;
        let response = SearchResponse::from_json(&body)
            .map_err(|err| format!("invalid search response `{}`: {err}", path.display()))?;
        info!(
            "event=replay_step module=cli status=ok file={} hits={}",
            path.display(),
            response.results.len()
        );

        writeln!(out, "# {}", path.display()).map_err(write_failed)?;
        let action = if anywhere {
            view.on_search_anywhere_ok(response)
        } else {
            view.on_search_within_ok(response)
        };
        for op in view.surface_mut().take_ops() {
            writeln!(out, "  {op}").map_err(write_failed)?;
        }

        match action {
            ViewAction::SearchAnywhere(next) => writeln!(
                out,
                "  viewport empty; next: {} {}",
                placemap_core::SearchRequest::METHOD,
                next.url(&base_url)
            )
            .map_err(write_failed)?,
            ViewAction::Displayed { shown, detail } => {
                writeln!(out, "  shown={shown}").map_err(write_failed)?;
                if let Some(detail) = detail {
                    writeln!(out, "  popup id={} title={}", detail.id, detail.title)
                        .map_err(write_failed)?;
                }
            }
        }
    }

    let ids = view
        .markers()
        .sorted_ids()
        .into_iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>();
    writeln!(out, "displayed: [{}]", ids.join(", ")).map_err(write_failed)
}

fn write_failed(err: std::io::Error) -> String {
    format!("failed to write output: {err}")
}

fn parse_rect(value: &str) -> Result<GeoRect, String> {
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| format!("invalid number in `{value}`: {err}"))?;
    let [south, west, north, east] = parts[..] else {
        return Err(format!("expected south,west,north,east, got `{value}`"));
    };
    if south > north || west > east {
        return Err(format!("viewport `{value}` is inverted"));
    }
    Ok(GeoRect {
        south,
        west,
        north,
        east,
    })
}
