use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use formats::{ViewerConfig, load_map_file, load_projects_file};
use layers::presenter::to_plain_text;
use layers::session::MapSession;
use scene::region::RegionRegistry;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Offline companion to the web viewer: inspect a map asset and preview the
/// project list for a selection.
#[derive(Debug, Parser)]
#[command(name = "regionmap", version)]
struct Cli {
    /// Viewer configuration (JSON). Defaults match the web viewer.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List region shapes with their resolved ids and names.
    Regions(RegionsArgs),
    /// Print the project list for a selection and filter set.
    Render(RenderArgs),
}

#[derive(Debug, Args)]
struct RegionsArgs {
    #[arg(long)]
    map: PathBuf,
    /// Emit JSON instead of one line per region.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct RenderArgs {
    #[arg(long)]
    map: Option<PathBuf>,
    #[arg(long)]
    projects: PathBuf,
    /// Region name to select; repeatable.
    #[arg(long = "select", value_name = "NAME")]
    select: Vec<String>,
    /// Select every region found in the map.
    #[arg(long)]
    all: bool,
    /// Funding line to filter on; repeatable.
    #[arg(long = "filter", value_name = "LABEL")]
    filters: Vec<String>,
    /// Print the interaction trace to stderr.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Serialize)]
struct RegionRow<'a> {
    id: &'a str,
    name: &'a str,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(out) => print!("{out}"),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<String, String> {
    let config = load_config(cli.config.as_ref())?;
    match cli.command {
        Command::Regions(args) => cmd_regions(&config, args),
        Command::Render(args) => cmd_render(&config, args),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<ViewerConfig, String> {
    let Some(path) = path else {
        return Ok(ViewerConfig::default());
    };
    let payload = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
    ViewerConfig::from_json_str(&payload).map_err(|e| e.to_string())
}

fn cmd_regions(config: &ViewerConfig, args: RegionsArgs) -> Result<String, String> {
    let mut asset = load_map_file(&args.map, &config.region_tags).map_err(|e| e.to_string())?;
    let registry = RegionRegistry::from_map_asset(&mut asset);
    info!(regions = registry.len(), "resolved map regions");

    if args.json {
        let rows: Vec<RegionRow<'_>> = registry
            .regions()
            .iter()
            .map(|r| RegionRow {
                id: r.id.as_str(),
                name: r.display_name.as_str(),
            })
            .collect();
        let mut out = serde_json::to_string_pretty(&rows).map_err(|e| format!("json: {e}"))?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = String::new();
    for r in registry.regions() {
        out.push_str(&format!("{}\t{}\n", r.id, r.display_name));
    }
    Ok(out)
}

fn cmd_render(config: &ViewerConfig, args: RenderArgs) -> Result<String, String> {
    let mut session = MapSession::new(config);

    // Either source may fail on its own; the other still drives the output.
    if let Some(map) = &args.map {
        match load_map_file(map, &config.region_tags) {
            Ok(mut asset) => session.attach_regions(RegionRegistry::from_map_asset(&mut asset)),
            Err(err) => eprintln!("{}", session.on_map_failed(&err)),
        }
    } else if args.all {
        return Err("--all needs --map".to_string());
    }

    if let Some(groups) = session.on_projects_loaded(load_projects_file(&args.projects)) {
        eprint!("{}", to_plain_text(&groups));
    }

    if args.all {
        session.select_all();
    }
    for name in &args.select {
        if !session.filters().is_region_selected(name) {
            session.toggle_region_by_name(name);
        }
    }
    for label in &args.filters {
        session.set_funding_line(label, true);
    }

    if args.trace {
        for event in session.events() {
            eprintln!("#{} {} {}", event.seq, event.kind, event.message);
        }
    }

    Ok(to_plain_text(&session.render()))
}
