//! JAPI CLI - Command-line tool for JSON-API document assembly
//!
//! This binary provides command-line interfaces for:
//! - render: turn a JSON object graph into a JSON-API document
//! - request: parse JSON-API query parameters
//! - errors: map validation violations to an error response body
//! - registry: list the resources declared in a configuration file

use clap::{Parser, Subcommand, ValueEnum};
use japi_format::{CollectionCheck, ResourceDescriptor};
use japi_io::{
    error_response, render_reader, AppConfig, ErrorKey, JsonApiRequest, RenderOptions, Violation,
};
use serde_json::{json, Map, Value};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "japi")]
#[command(about = "JSON-API compound document CLI tool")]
#[command(version)]
struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a JSON object graph as a JSON-API document
    ///
    /// Typed objects carry a "$type" member naming a registered type;
    /// paginated collections are written as {"$paginated": {...}}.
    ///
    /// Examples:
    ///   japi render graph.json --config japi.toml
    ///   japi render - --config japi.toml --group Sideload --pretty
    Render {
        /// Input file ("-" for stdin)
        input: PathBuf,
        /// Configuration file declaring resources
        #[arg(short, long)]
        config: PathBuf,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Emit the top-level jsonapi member
        #[arg(long)]
        version_info: bool,
        /// Active serialization group (repeatable)
        #[arg(long = "group")]
        groups: Vec<String>,
        /// Override the configured collection check
        #[arg(long, value_enum)]
        collection_check: Option<CheckArg>,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// Parse a JSON-API query string and print its parameters as JSON
    Request {
        /// Query string, e.g. "include=author&page[limit]=10"
        query: String,
        /// Page limit used when the query names none
        #[arg(long)]
        default_limit: Option<u64>,
        /// Configuration file supplying the default page limit
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Map a JSON array of validation violations to an error response body
    Errors {
        /// Input file ("-" for stdin)
        input: PathBuf,
        /// Put the error list under "data" instead of "errors"
        #[arg(long)]
        legacy_data_key: bool,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// List the resources declared in a configuration file
    Registry {
        /// Configuration file declaring resources
        #[arg(short, long)]
        config: PathBuf,
        /// Output format (table, json)
        #[arg(long, value_enum, default_value_t = RegistryFormat::Table)]
        format: RegistryFormat,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CheckArg {
    #[value(name = "first-element")]
    FirstElement,
    #[value(name = "every-element")]
    EveryElement,
}

impl From<CheckArg> for CollectionCheck {
    fn from(arg: CheckArg) -> Self {
        match arg {
            CheckArg::FirstElement => CollectionCheck::FirstElement,
            CheckArg::EveryElement => CollectionCheck::EveryElement,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum RegistryFormat {
    Table,
    Json,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Render {
            input,
            config,
            output,
            version_info,
            groups,
            collection_check,
            pretty,
        } => {
            handle_render(
                &input,
                &config,
                output.as_deref(),
                version_info,
                groups,
                collection_check,
                pretty,
            )?;
        }
        Commands::Request {
            query,
            default_limit,
            config,
        } => {
            handle_request(&query, default_limit, config.as_deref())?;
        }
        Commands::Errors {
            input,
            legacy_data_key,
            pretty,
        } => {
            handle_errors(&input, legacy_data_key, pretty)?;
        }
        Commands::Registry { config, format } => {
            handle_registry(&config, format)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn handle_render(
    input: &Path,
    config_path: &Path,
    output: Option<&Path>,
    version_info: bool,
    groups: Vec<String>,
    collection_check: Option<CheckArg>,
    pretty: bool,
) -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load(config_path)?;
    let registry = config.registry()?;

    let mut document_config = config.document_config()?;
    if version_info {
        document_config = document_config.with_version_info(true);
    }
    if let Some(check) = collection_check {
        document_config = document_config.with_collection_check(check.into());
    }

    let options = RenderOptions {
        config: document_config,
        groups,
    };
    debug!(input = %input.display(), groups = ?options.groups, "rendering");

    let value = render_reader(&registry, open_input(input)?, &options)?;
    write_json(&value, pretty, output)
}

fn handle_request(
    query: &str,
    default_limit: Option<u64>,
    config_path: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let configured_limit = match config_path {
        Some(path) => AppConfig::load(path)?.default_page_limit,
        None => AppConfig::default().default_page_limit,
    };
    let default_limit = default_limit.unwrap_or(configured_limit);

    let request = JsonApiRequest::parse(query);
    let sort: Vec<Value> = request
        .sort_fields()
        .into_iter()
        .map(|sort| json!({"field": sort.field, "descending": sort.descending}))
        .collect();

    let value = json!({
        "filters": request.filters(),
        "include": request.included_relationships(),
        "sort": sort,
        "fields": request.fields(),
        "page": {
            "limit": request.pagination_limit(default_limit),
            "offset": request.pagination_offset(),
        },
    });
    write_json(&value, true, None)
}

fn handle_errors(input: &Path, legacy_data_key: bool, pretty: bool) -> Result<(), Box<dyn Error>> {
    let violations: Vec<Violation> = serde_json::from_reader(open_input(input)?)?;
    let key = if legacy_data_key {
        ErrorKey::Data
    } else {
        ErrorKey::Errors
    };

    let response = error_response(&violations, key);
    debug!(
        status = response.status,
        violations = violations.len(),
        "built error response"
    );
    write_json(&response.body, pretty, None)
}

fn handle_registry(config_path: &Path, format: RegistryFormat) -> Result<(), Box<dyn Error>> {
    let registry = AppConfig::load(config_path)?.registry()?;
    let entries: Vec<(&str, &ResourceDescriptor)> = registry
        .type_names()
        .into_iter()
        .filter_map(|name| registry.lookup(name).map(|descriptor| (name, descriptor)))
        .collect();

    match format {
        RegistryFormat::Table => print_registry_table(&entries),
        RegistryFormat::Json => {
            let mut map = Map::new();
            for (name, descriptor) in &entries {
                map.insert(name.to_string(), serde_json::to_value(descriptor)?);
            }
            write_json(&Value::Object(map), true, None)?;
        }
    }

    Ok(())
}

fn print_registry_table(entries: &[(&str, &ResourceDescriptor)]) {
    let name_width = entries
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0)
        .max("TYPE".len());
    let type_width = entries
        .iter()
        .map(|(_, d)| d.resource_type.len())
        .max()
        .unwrap_or(0)
        .max("RESOURCE".len());

    println!(
        "{:<name_width$}  {:<type_width$}  {:<8}  RELATIONSHIPS",
        "TYPE", "RESOURCE", "ID"
    );
    for (name, descriptor) in entries {
        let relationships: Vec<String> = descriptor
            .relationships
            .iter()
            .map(|rel| {
                let mut label = rel.name.clone();
                if let Some(target) = &rel.target {
                    label.push_str(&format!(" -> {target}"));
                }
                if rel.included_by_default {
                    label.push_str(" (default)");
                }
                label
            })
            .collect();
        println!(
            "{:<name_width$}  {:<type_width$}  {:<8}  {}",
            name,
            descriptor.resource_type,
            descriptor.id_field,
            if relationships.is_empty() {
                "-".to_string()
            } else {
                relationships.join(", ")
            }
        );
    }
}

fn open_input(path: &Path) -> Result<Box<dyn Read>, Box<dyn Error>> {
    if path.as_os_str() == "-" {
        Ok(Box::new(io::stdin().lock()))
    } else {
        let file = File::open(path)
            .map_err(|e| format!("failed to open {}: {e}", path.display()))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

fn write_json(value: &Value, pretty: bool, output: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
