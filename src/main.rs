//! n8ncli - command-line client for the n8n workflow-automation API.

use clap::Parser;
use n8ncli::api::{ListWorkflowsOptions, N8nClient};
use n8ncli::cli::{Cli, Commands, ConfigCommands, WorkflowCommands};
use n8ncli::commands::{self, Output};
use n8ncli::config::{CliOverrides, ConfigStore, load_config};
use n8ncli::Error;
use std::process;

/// Exit codes following shell conventions:
/// - 0: success
/// - 1: general error (API failure, connection failure)
/// - 2: misuse (missing configuration, bad key/value, auth failure)
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_MISUSE: i32 = 2;

fn main() {
    // Exit code 130 = 128 + 2 (SIGINT signal number)
    let _ = ctrlc::set_handler(|| process::exit(130));

    let cli = Cli::parse();
    let json = cli.json;

    match run_command(cli) {
        Ok(code) => process::exit(code),
        Err(err) => {
            report_error(&err, json);
            process::exit(exit_code(&err));
        }
    }
}

fn run_command(cli: Cli) -> Result<i32, Error> {
    let overrides = cli_overrides(&cli);
    let json = cli.json;
    let verbose = cli.verbose && !cli.quiet;

    match cli.command {
        Commands::Workflows { command } => match command {
            WorkflowCommands::List {
                active,
                inactive,
                limit,
                tags,
                cursor,
                format,
            } => {
                debug(verbose, "Fetching workflows...");
                let client = connect(&overrides)?;
                let options = ListWorkflowsOptions {
                    active: if active {
                        Some(true)
                    } else if inactive {
                        Some(false)
                    } else {
                        None
                    },
                    limit,
                    tags,
                    cursor,
                };
                let result = commands::workflows_list(&client, &options, format)?;
                debug(
                    verbose,
                    &format!("Found {} workflows", result.workflows.len()),
                );
                output(&result, json);
                Ok(EXIT_SUCCESS)
            }
            WorkflowCommands::Get { id } => {
                debug(verbose, &format!("Fetching workflow {}...", id));
                let client = connect(&overrides)?;
                let result = commands::workflows_get(&client, &id)?;
                output(&result, json);
                Ok(EXIT_SUCCESS)
            }
            WorkflowCommands::Create { name, file } => {
                let client = connect(&overrides)?;
                let result = commands::workflows_create(&client, name, file.as_deref())?;
                output(&result, json);
                Ok(EXIT_SUCCESS)
            }
            WorkflowCommands::Update { id, name, file } => {
                let client = connect(&overrides)?;
                let result = commands::workflows_update(&client, &id, name, file.as_deref())?;
                output(&result, json);
                Ok(EXIT_SUCCESS)
            }
            WorkflowCommands::Delete { id } => {
                let client = connect(&overrides)?;
                let result = commands::workflows_delete(&client, &id)?;
                output(&result, json);
                Ok(EXIT_SUCCESS)
            }
            WorkflowCommands::Activate { id } => {
                let client = connect(&overrides)?;
                let result = commands::workflows_activate(&client, &id)?;
                output(&result, json);
                Ok(EXIT_SUCCESS)
            }
            WorkflowCommands::Deactivate { id } => {
                let client = connect(&overrides)?;
                let result = commands::workflows_deactivate(&client, &id)?;
                output(&result, json);
                Ok(EXIT_SUCCESS)
            }
        },
        Commands::Test => {
            debug(verbose, "Testing connection to n8n API...");
            let client = connect(&overrides)?;
            let result = commands::test_connection(&client);
            output(&result, json);
            Ok(if result.result.success {
                EXIT_SUCCESS
            } else {
                EXIT_ERROR
            })
        }
        Commands::Config { command } => {
            let store = ConfigStore::new();
            match command.unwrap_or(ConfigCommands::Show) {
                ConfigCommands::Show => {
                    let result = commands::config_show(&store, &overrides);
                    output(&result, json);
                }
                ConfigCommands::Get { key } => {
                    let result = commands::config_get(&store, &overrides, &key)?;
                    output(&result, json);
                }
                ConfigCommands::Set { key, value } => {
                    let result = commands::config_set(&store, &key, &value)?;
                    output(&result, json);
                }
                ConfigCommands::Clear => {
                    let result = commands::config_clear(&store)?;
                    output(&result, json);
                }
                ConfigCommands::Path => {
                    let result = commands::config_file_path(&store);
                    output(&result, json);
                }
            }
            Ok(EXIT_SUCCESS)
        }
    }
}

fn cli_overrides(cli: &Cli) -> CliOverrides {
    CliOverrides {
        host: cli.host.clone(),
        api_key: cli.api_key.clone(),
    }
}

/// Resolve connection settings (strict) and construct a client.
fn connect(overrides: &CliOverrides) -> Result<N8nClient, Error> {
    let store = ConfigStore::new();
    let config = load_config(&store, overrides)?;
    Ok(N8nClient::new(&config))
}

fn output<T: Output>(result: &T, json: bool) {
    if json {
        println!("{}", result.to_json());
    } else {
        println!("{}", result.to_human());
    }
}

fn debug(verbose: bool, message: &str) {
    if verbose {
        eprintln!("[debug] {}", message);
    }
}

/// A remediation hint for errors the user can fix themselves.
fn hint(err: &Error) -> Option<&'static str> {
    match err {
        Error::MissingHost => {
            Some("run `n8ncli config set host <url>`, pass --host, or set N8N_HOST")
        }
        Error::MissingApiKey => {
            Some("run `n8ncli config set apikey <key>`, pass --api-key, or set N8N_API_KEY")
        }
        Error::Authentication => {
            Some("check your API key (run `n8ncli config set apikey <key>` or set N8N_API_KEY)")
        }
        Error::Connection { .. } => {
            Some("verify the host is correct (run `n8ncli config set host <url>` or set N8N_HOST)")
        }
        _ => None,
    }
}

fn exit_code(err: &Error) -> i32 {
    match err {
        Error::MissingHost
        | Error::MissingApiKey
        | Error::Authentication
        | Error::InvalidInput(_) => EXIT_MISUSE,
        _ => EXIT_ERROR,
    }
}

fn report_error(err: &Error, json: bool) {
    if json {
        let mut value = serde_json::json!({ "error": err.to_string() });
        if let Some(hint) = hint(err) {
            value["hint"] = serde_json::Value::String(hint.to_string());
        }
        eprintln!("{}", value);
    } else {
        eprintln!("Error: {}", err);
        if let Some(hint) = hint(err) {
            eprintln!("Hint: {}", hint);
        }
    }
}
