//! HAL Forms CLI
//!
//! Command-line interface for inspecting form schemas and submitting
//! schema-driven write requests to HAL APIs.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use hal_forms::{
    parse_headers, ClientOptions, DialogOptions, FormDialog, HeaderSource, HttpClient,
};

#[derive(Parser)]
#[command(name = "hal-forms")]
#[command(about = "Schema-driven write requests for HAL APIs")]
#[command(version)]
struct Cli {
    /// HTTP timeout in seconds
    #[arg(long, global = true, default_value_t = 10)]
    timeout: u64,

    /// Header sent with every request, as "Name: Value" (repeatable)
    #[arg(long = "header", short = 'H', global = true, value_parser = parse_header)]
    headers: Vec<(String, String)>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the form schema of a resource (link properties removed)
    Schema {
        /// Resource href; URI template suffixes are ignored
        href: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Build a write request from field values and send it
    Submit {
        /// Resource href; URI template suffixes are ignored
        href: String,

        /// HTTP method
        #[arg(long, short = 'X', default_value = "POST")]
        method: String,

        /// Target URL (defaults to the resource href)
        #[arg(long)]
        url: Option<String>,

        /// Field value as name=value (repeatable)
        #[arg(long = "field", short = 'f', value_parser = parse_field)]
        fields: Vec<(String, String)>,

        /// Send headers from the editable header block instead of a fixed JSON content type
        #[arg(long)]
        editable_headers: bool,

        /// File holding the header block, one "Name: Value" per line
        #[arg(long, requires = "editable_headers")]
        headers_file: Option<PathBuf>,
    },
}

fn parse_field(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{}'", s))
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    parse_headers(s)
        .into_iter()
        .next()
        .ok_or_else(|| format!("expected \"Name: Value\", got '{}'", s))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let defaults: BTreeMap<String, String> = cli.headers.into_iter().collect();
    let options = ClientOptions {
        timeout: Duration::from_secs(cli.timeout),
        default_headers: defaults,
    };

    let result = match cli.command {
        Commands::Schema { href, pretty } => run_schema(options, &href, pretty),
        Commands::Submit {
            href,
            method,
            url,
            fields,
            editable_headers,
            headers_file,
        } => run_submit(SubmitArgs {
            options,
            href,
            method,
            url,
            fields,
            editable_headers,
            headers_file,
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn connect(options: ClientOptions) -> Result<HttpClient, u8> {
    HttpClient::new(options).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })
}

fn run_schema(options: ClientOptions, href: &str, pretty: bool) -> Result<(), u8> {
    let client = connect(options)?;

    let dialog = FormDialog::open(&client, href, DialogOptions::default()).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let form_schema = dialog.form_schema();
    let output = if pretty {
        serde_json::to_string_pretty(&form_schema)
    } else {
        serde_json::to_string(&form_schema)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    println!("{}", output);
    Ok(())
}

struct SubmitArgs {
    options: ClientOptions,
    href: String,
    method: String,
    url: Option<String>,
    fields: Vec<(String, String)>,
    editable_headers: bool,
    headers_file: Option<PathBuf>,
}

fn run_submit(args: SubmitArgs) -> Result<(), u8> {
    let SubmitArgs {
        options,
        href,
        method,
        url,
        fields,
        editable_headers,
        headers_file,
    } = args;

    let header_source = if editable_headers {
        HeaderSource::UserText
    } else {
        HeaderSource::Json
    };
    let dialog_options =
        DialogOptions::new(header_source).default_headers(options.default_headers.clone());

    let client = connect(options)?;
    let dialog = FormDialog::open(&client, &href, dialog_options).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let mut form = dialog.form_state(&method);
    if let Some(url) = url {
        form.url = url;
    }
    if let Some(path) = headers_file {
        form.headers = std::fs::read_to_string(&path).map_err(|e| {
            eprintln!("Error reading {}: {}", path.display(), e);
            3u8
        })?;
    }

    let values: BTreeMap<String, String> = fields.into_iter().collect();
    let submission = dialog.submit(&client, &form, &values);

    for event in submission.events() {
        let line = serde_json::to_string(&event).map_err(|e| {
            eprintln!("Error serializing output: {}", e);
            2u8
        })?;
        println!("{}", line);
    }
    eprintln!("{}", submission.navigation_marker());

    match &submission.outcome {
        Ok(_) => Ok(()),
        Err(failure) => {
            eprintln!("Error: {}", failure);
            Err(1)
        }
    }
}
