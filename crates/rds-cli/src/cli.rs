use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rds",
    about = "Record Data Store: pluggable formats and destinations",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Store configuration file (.toml or .json); defaults to JSON records in ./records
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List registered formats and destinations
    Formats,
    /// Print a configuration template for a format/destination pair
    Template(TemplateArgs),
    /// Insert a record given as a JSON object
    Insert(InsertArgs),
    /// Show a record by identifier
    Find(FindArgs),
    /// Replace the content of a record
    Update(UpdateArgs),
    /// Delete a record
    Delete(DeleteArgs),
    /// List records matching an equality filter
    Query(QueryArgs),
    /// Run an insert/update/query/delete walkthrough against a scratch directory
    Demo(DemoArgs),
}

#[derive(Args)]
pub struct TemplateArgs {
    pub format: String,
    pub destination: String,
    /// Write the template to this file instead of stdout
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(Args)]
pub struct InsertArgs {
    pub record: String,
    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Args)]
pub struct FindArgs {
    pub id: String,
}

#[derive(Args)]
pub struct UpdateArgs {
    pub id: String,
    pub record: String,
    #[arg(long)]
    pub upsert: bool,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub id: String,
    #[arg(long)]
    pub ignore_missing: bool,
}

#[derive(Args)]
pub struct QueryArgs {
    /// JSON object of field/value pairs; omitted matches everything
    pub filter: Option<String>,
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    pub limit: Option<i64>,
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub offset: i64,
    /// Print only the number of matches
    #[arg(long)]
    pub count: bool,
}

#[derive(Args)]
pub struct DemoArgs {
    /// Directory for the demo records; must not already exist
    #[arg(long)]
    pub path: Option<PathBuf>,
    /// Leave the records on disk afterwards
    #[arg(long)]
    pub keep: bool,
}
