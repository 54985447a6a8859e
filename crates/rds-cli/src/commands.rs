use std::fs;
use std::path::Path;

use anyhow::{bail, ensure, Context};
use colored::Colorize;
use rds_store::{
    generate_configuration, into_record, supported, DataStore, DataStoreConfig, Pagination,
    QueryFilter, Record, RecordId, Value,
};
use serde_json::json;
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let out = cli.output;
    let config = cli.config;
    match cli.command {
        Command::Formats => cmd_formats(&out),
        Command::Template(args) => cmd_template(args, &out),
        Command::Insert(args) => cmd_insert(args, config.as_deref(), &out),
        Command::Find(args) => cmd_find(args, config.as_deref(), &out),
        Command::Update(args) => cmd_update(args, config.as_deref(), &out),
        Command::Delete(args) => cmd_delete(args, config.as_deref(), &out),
        Command::Query(args) => cmd_query(args, config.as_deref(), &out),
        Command::Demo(args) => cmd_demo(args),
    }
}

fn open_store(config: Option<&Path>) -> anyhow::Result<DataStore> {
    let config = match config {
        Some(path) => DataStoreConfig::load(path)?,
        None => DataStoreConfig::default(),
    };
    debug!(
        format = %config.format_name,
        destination = %config.destination_name,
        "opening store"
    );
    Ok(DataStore::from_config(&config)?)
}

fn parse_record(text: &str) -> anyhow::Result<Record> {
    let value: Value = serde_json::from_str(text).context("record must be valid JSON")?;
    Ok(into_record(value)?)
}

fn parse_id(text: &str) -> anyhow::Result<RecordId> {
    Ok(RecordId::new(text)?)
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_formats(out: &OutputFormat) -> anyhow::Result<()> {
    let s = supported();
    match out {
        OutputFormat::Json => print_json(&serde_json::to_value(&s)?),
        OutputFormat::Text => {
            println!("{}", "Formats:".bold());
            for name in &s.formats {
                println!("  {}", name.cyan());
            }
            println!("{}", "Destinations:".bold());
            for name in &s.destinations {
                println!("  {}", name.cyan());
            }
            Ok(())
        }
    }
}

fn cmd_template(args: TemplateArgs, out: &OutputFormat) -> anyhow::Result<()> {
    let config = generate_configuration(&args.format, &args.destination)?;
    if let Some(path) = &args.save {
        config.save(path)?;
        println!("{} Wrote template to {}", "✓".green().bold(), path.display().to_string().bold());
        return Ok(());
    }
    match out {
        OutputFormat::Json => println!("{}", config.to_json()?),
        OutputFormat::Text => print!("{}", config.to_toml()?),
    }
    Ok(())
}

fn cmd_insert(args: InsertArgs, config: Option<&Path>, out: &OutputFormat) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let record = parse_record(&args.record)?;
    let id = store.insert(&record, args.overwrite)?;
    match out {
        OutputFormat::Json => print_json(&json!({ "id": id })),
        OutputFormat::Text => {
            println!("{} Inserted {}", "✓".green().bold(), id.as_str().yellow());
            Ok(())
        }
    }
}

fn cmd_find(args: FindArgs, config: Option<&Path>, out: &OutputFormat) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let id = parse_id(&args.id)?;
    let record = store.find(&id)?;
    match out {
        OutputFormat::Json => print_json(&json!({ "id": id, "record": record })),
        OutputFormat::Text => {
            print_record(&id, &record);
            Ok(())
        }
    }
}

fn cmd_update(args: UpdateArgs, config: Option<&Path>, out: &OutputFormat) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let id = parse_id(&args.id)?;
    let record = parse_record(&args.record)?;
    store.update(&id, &record, args.upsert)?;
    match out {
        OutputFormat::Json => print_json(&json!({ "id": id })),
        OutputFormat::Text => {
            println!("{} Updated {}", "✓".green().bold(), id.as_str().yellow());
            Ok(())
        }
    }
}

fn cmd_delete(args: DeleteArgs, config: Option<&Path>, out: &OutputFormat) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let id = parse_id(&args.id)?;
    store.delete(&id, args.ignore_missing)?;
    match out {
        OutputFormat::Json => print_json(&json!({ "deleted": id })),
        OutputFormat::Text => {
            println!("{} Deleted {}", "✓".green().bold(), id.as_str().yellow());
            Ok(())
        }
    }
}

fn cmd_query(args: QueryArgs, config: Option<&Path>, out: &OutputFormat) -> anyhow::Result<()> {
    let filter = match &args.filter {
        Some(text) => QueryFilter::from(parse_record(text)?),
        None => QueryFilter::new(),
    };
    let page = Pagination::new(args.limit, args.offset)?;
    let store = open_store(config)?;

    if args.count {
        let n = store.count(&filter)?;
        return match out {
            OutputFormat::Json => print_json(&json!({ "count": n })),
            OutputFormat::Text => {
                println!("{n}");
                Ok(())
            }
        };
    }

    let hits = store.query(&filter, page)?;
    match out {
        OutputFormat::Json => {
            let rows: Vec<Value> = hits
                .iter()
                .map(|(id, record)| json!({ "id": id, "record": record }))
                .collect();
            print_json(&Value::Array(rows))
        }
        OutputFormat::Text => {
            if hits.is_empty() {
                println!("No matching records.");
            }
            for (id, record) in &hits {
                print_record(id, record);
            }
            Ok(())
        }
    }
}

fn print_record(id: &RecordId, record: &Record) {
    println!("{}", id.as_str().yellow().bold());
    for (field, value) in record {
        println!("  {}: {}", field.cyan(), value);
    }
}

fn cmd_demo(args: DemoArgs) -> anyhow::Result<()> {
    let root = args
        .path
        .unwrap_or_else(|| std::env::temp_dir().join(format!("rds-demo-{}", std::process::id())));
    if root.exists() {
        bail!("demo directory {} already exists", root.display());
    }

    let result = run_demo(&root);
    if args.keep {
        println!("Records kept in {}", root.display().to_string().bold());
    } else if root.exists() {
        fs::remove_dir_all(&root)
            .with_context(|| format!("could not remove {}", root.display()))?;
    }
    result
}

fn run_demo(root: &Path) -> anyhow::Result<()> {
    let mut config = generate_configuration("json", "localdrive")?;
    config
        .destination_conf
        .insert("path".into(), Value::String(root.display().to_string()));
    let store = DataStore::from_config(&config)?;
    println!("Store: {} records in {}", store.format_name().cyan(), root.display().to_string().bold());

    let first = parse_record(r#"{"1": 1, "2": "Two", "3": 3.0}"#)?;
    let a = store.insert(&first, false)?;
    println!("{} insert  -> {}", "✓".green(), a.as_str().yellow());
    ensure!(store.find(&a)? == first, "find returned different content");
    println!("{} find    -> {}", "✓".green(), Value::Object(first));

    let updated = parse_record(r#"{"1": 1, "2": 2, "3": 3}"#)?;
    store.update(&a, &updated, false)?;
    ensure!(store.find(&a)? == updated, "update was not applied");
    println!("{} update  -> {}", "✓".green(), Value::Object(updated));

    let batch = ["0", "1", "2"]
        .iter()
        .enumerate()
        .map(|(i, key)| into_record(json!({ *key: i })))
        .collect::<Result<Vec<_>, _>>()?;
    let inserted = store.insert_many(batch, false)?;
    println!("{} insert_many -> {} records", "✓".green(), inserted.len());

    let filter = QueryFilter::new().eq("1", 1);
    let hits = store.query(&filter, Pagination::all())?;
    ensure!(hits.len() == 2, "expected 2 matches, got {}", hits.len());
    println!("{} query {{\"1\": 1}} -> {} records", "✓".green(), hits.len());

    let limited = store.query(&filter, Pagination::all().with_limit(1))?;
    ensure!(limited.len() == 1, "limit was not applied");
    println!("{} query {{\"1\": 1}} limit 1 -> {} record", "✓".green(), limited.len());

    let all = store.query(&QueryFilter::new(), Pagination::all())?;
    ensure!(all.len() == 4, "expected 4 records, got {}", all.len());
    println!("{} query {{}} -> {} records", "✓".green(), all.len());

    store.delete(&a, false)?;
    match store.find(&a) {
        Err(e) if e.is_not_found() => {}
        Err(e) => return Err(e.into()),
        Ok(_) => bail!("record {a} survived delete"),
    }
    println!("{} delete  -> {} is gone", "✓".green(), a.short_id().yellow());
    println!("{}", "Demo complete.".green().bold());
    Ok(())
}
