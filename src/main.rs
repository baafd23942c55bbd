// src/main.rs

// Modules defined in the crate
mod api;
mod builders;
mod config;
mod constants;
mod error;
mod model;
mod ops;
mod types;

use crate::api::NotionClient;
use crate::config::{Cli, ClientConfig, Command};
use crate::error::AppError;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use serde_json::{json, Value};

/// Sets up logging configuration.
///
/// Diagnostics go to stderr so stdout stays clean JSON for piping.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("notionctl.log");

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stderr_appender = ConsoleAppender::builder()
        .target(log4rs::append::console::Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::debug!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Dispatches a parsed subcommand to its operation.
fn run_command(client: &NotionClient, command: &Command) -> Result<Value, AppError> {
    match command {
        Command::Setup => ops::setup(client),
        Command::Fetch(args) => ops::fetch(client, args),
        Command::Search(args) => ops::search(client, args),
        Command::CreatePage(args) => ops::create_page(client, args),
        Command::UpdatePage(args) => ops::update_page(client, args),
        Command::CreateDatabase(args) => ops::create_database(client, args),
        Command::UpdateDatabase(args) => ops::update_database(client, args),
        Command::QueryDatabase(args) => ops::query_database(client, args),
        Command::QueryMeetingNotes(args) => ops::query_meeting_notes(client, args),
        Command::CreateComment(args) => ops::create_comment(client, args),
        Command::GetComments(args) => ops::get_comments(client, &args.page_id, args.max_results),
        Command::GetUsers(args) => ops::get_users(client, args),
        Command::GetTeams(args) => ops::get_teams(client, args.query.as_deref()),
        Command::MovePage(args) => ops::move_page(client, args),
        Command::DuplicatePage(args) => ops::duplicate_page(
            client,
            &args.page_id,
            args.new_title.as_deref(),
            args.new_parent_id.as_deref(),
        ),
        Command::Blocks(args) => ops::blocks(client, args),
    }
}

/// Reports a typed error as JSON on stderr and picks the exit status.
fn report_error(error: &AppError) -> i32 {
    let report = json!({
        "error": true,
        "code": error.code(),
        "message": error.to_string(),
    });
    eprintln!(
        "{}",
        serde_json::to_string_pretty(&report).unwrap_or_else(|_| error.to_string())
    );
    match error {
        AppError::MissingConfiguration(_) => 2,
        _ => 1,
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = setup_logging(cli.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let result = ClientConfig::resolve()
        .and_then(|config| NotionClient::new(&config.api_key))
        .and_then(|client| run_command(&client, &cli.command));

    match result {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(rendered) => println!("{}", rendered),
            Err(e) => {
                std::process::exit(report_error(&AppError::MalformedResponse(e.to_string())));
            }
        },
        Err(error) => {
            std::process::exit(report_error(&error));
        }
    }
}
