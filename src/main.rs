use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use edgemap::catalog::{CatalogCache, CatalogError, STDIN_SOURCE, dependency_map, load_catalog};
use edgemap::config::{
    ConfigError, EffectiveConfig, ViewOverrides, load_effective_config, parse_category_filter,
    parse_sort_key, parse_statuses,
};
use edgemap::logging::init_logging;
use edgemap::render::{aggregates_to_json, dependency_map_to_json, pretty, view_to_json};
use edgemap::view::{Aggregates, InvalidConfigError, Session, View, ViewConfig, build_view};
use edgemap::watch::{WatchError, interrupt_flag, watch_file};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

const USER_CONFIG_DIR: &str = ".edgemap";
const USER_CONFIG_FILE: &str = "config.yml";

#[derive(Debug)]
struct CliError {
    code: &'static str,
    message: String,
}

impl CliError {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn io(code: &'static str, err: io::Error) -> Self {
        Self::new(code, err.to_string())
    }
}

impl From<CatalogError> for CliError {
    fn from(value: CatalogError) -> Self {
        Self::new("catalog_error", value.to_string())
    }
}

impl From<InvalidConfigError> for CliError {
    fn from(value: InvalidConfigError) -> Self {
        Self::new("invalid_view_config", value.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::new("config_error", value.to_string())
    }
}

impl From<WatchError> for CliError {
    fn from(value: WatchError) -> Self {
        Self::new("watch_error", value.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::new("json_error", value.to_string())
    }
}

#[derive(Parser, Debug)]
#[command(name = "edgemap")]
#[command(about = "Rank a project portfolio by edge, complexity, and payoff ratio")]
struct Cli {
    /// Catalog YAML file, or `-` for stdin.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    /// Extra config file layered over user and project config.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filtered, sorted project cards plus scatter data.
    View(ViewArgs),
    /// Status counts over the whole catalog.
    Stats(OutputArgs),
    /// Every project with dependencies, titles resolved.
    Deps(OutputArgs),
    /// Print the view, then again each time the catalog file changes.
    Watch(ViewArgs),
}

#[derive(Args, Debug)]
struct ViewArgs {
    #[arg(long)]
    category: Option<String>,
    #[arg(long = "status", value_delimiter = ',')]
    statuses: Vec<String>,
    #[arg(long)]
    min_edge: Option<f64>,
    #[arg(long)]
    max_complexity: Option<f64>,
    #[arg(long)]
    sort: Option<String>,
    #[arg(long)]
    pretty: bool,
}

#[derive(Args, Debug)]
struct OutputArgs {
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let payload = json!({
                "error": {
                    "code": err.code,
                    "message": err.message,
                }
            });
            eprintln!("{payload}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let cwd = std::env::current_dir().map_err(|err| CliError::io("io_error", err))?;
    let config = effective_config(&cwd, &cli)?;
    let catalog_path = config.catalog_path(&cwd);
    match cli.command {
        Command::View(args) => cmd_view(&catalog_path, &config, args),
        Command::Stats(args) => cmd_stats(&catalog_path, args),
        Command::Deps(args) => cmd_deps(&catalog_path, args),
        Command::Watch(args) => cmd_watch(&catalog_path, &config, args),
    }
}

fn effective_config(cwd: &Path, cli: &Cli) -> Result<EffectiveConfig, CliError> {
    let home = home_dir();
    let user_config = home
        .as_ref()
        .map(|home| home.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE));
    let mut config = load_effective_config(
        cwd,
        cli.config.as_deref(),
        user_config.as_deref(),
        home.as_deref(),
    )?;
    if let Some(catalog) = &cli.catalog {
        config.catalog = Some(catalog.clone());
    }
    debug!(catalog = ?config.catalog, "resolved config");
    Ok(config)
}

fn view_config(config: &EffectiveConfig, args: &ViewArgs) -> Result<ViewConfig, CliError> {
    let mut overrides = config.view.clone();
    overrides.merge(flag_overrides(args)?);
    Ok(overrides.to_view_config())
}

fn flag_overrides(args: &ViewArgs) -> Result<ViewOverrides, CliError> {
    let category = args
        .category
        .as_deref()
        .map(parse_category_filter)
        .transpose()?;
    let statuses = if args.statuses.is_empty() {
        None
    } else {
        Some(parse_statuses(&args.statuses)?)
    };
    let sort = args.sort.as_deref().map(parse_sort_key).transpose()?;
    Ok(ViewOverrides {
        category,
        statuses,
        min_edge: args.min_edge,
        max_complexity: args.max_complexity,
        sort,
    })
}

fn cmd_view(catalog_path: &Path, config: &EffectiveConfig, args: ViewArgs) -> Result<(), CliError> {
    let view_config = view_config(config, &args)?;
    let catalog = load_catalog(catalog_path)?;
    let view = build_view(&catalog, &view_config)?;
    emit_view(catalog_path, &view, &view_config, args.pretty)
}

fn cmd_stats(catalog_path: &Path, args: OutputArgs) -> Result<(), CliError> {
    let catalog = load_catalog(catalog_path)?;
    let aggregates = Aggregates::from_catalog(&catalog);
    if args.pretty {
        print!("{}", pretty::render_stats(&aggregates));
        return Ok(());
    }
    print_json(&json!({
        "catalog": catalog_path.display().to_string(),
        "summary": aggregates_to_json(&aggregates),
        "generated_at": now_iso8601(),
    }))
}

fn cmd_deps(catalog_path: &Path, args: OutputArgs) -> Result<(), CliError> {
    let catalog = load_catalog(catalog_path)?;
    let entries = dependency_map(&catalog);
    if args.pretty {
        print!("{}", pretty::render_dependency_map(&entries));
        return Ok(());
    }
    let mut payload = dependency_map_to_json(&entries);
    stamp(&mut payload, catalog_path);
    print_json(&payload)
}

fn cmd_watch(catalog_path: &Path, config: &EffectiveConfig, args: ViewArgs) -> Result<(), CliError> {
    if catalog_path == Path::new(STDIN_SOURCE) {
        return Err(CliError::new("watch_error", "cannot watch stdin; pass a catalog file"));
    }
    let view_config = view_config(config, &args)?;
    let mut cache = CatalogCache::new();
    let mut session = Session::new(cache.load(catalog_path)?, view_config)?;
    emit_view(catalog_path, &session.view(), session.config(), args.pretty)?;

    let running = interrupt_flag()?;
    watch_file(catalog_path, &running, || match cache.load(catalog_path) {
        Ok(catalog) => {
            if Arc::ptr_eq(&catalog, session.catalog()) {
                debug!("catalog content unchanged");
                return;
            }
            session.replace_catalog(catalog);
            info!(projects = session.catalog().len(), "catalog reloaded");
            if let Err(err) = emit_view(catalog_path, &session.view(), session.config(), args.pretty) {
                warn!(error = %err.message, "failed to print view");
            }
        }
        Err(err) => warn!(error = %err, "catalog reload failed; keeping previous catalog"),
    })?;
    Ok(())
}

fn emit_view(
    catalog_path: &Path,
    view: &View<'_>,
    config: &ViewConfig,
    pretty_output: bool,
) -> Result<(), CliError> {
    if pretty_output {
        print!("{}", pretty::render_view(view));
        return Ok(());
    }
    let mut payload = view_to_json(view, config);
    stamp(&mut payload, catalog_path);
    print_json(&payload)
}

fn stamp(payload: &mut Value, catalog_path: &Path) {
    if let Value::Object(map) = payload {
        map.insert(
            "catalog".to_string(),
            Value::String(catalog_path.display().to_string()),
        );
        map.insert("generated_at".to_string(), Value::String(now_iso8601()));
    }
}

fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string(value)?;
    println!("{rendered}");
    Ok(())
}
