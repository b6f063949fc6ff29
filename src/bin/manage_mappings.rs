//! CLI tool to manage column mappings.
//!
//! Usage:
//!   cargo run --bin manage-mappings -- list
//!   cargo run --bin manage-mappings -- add --source "Order Date" --canonical order_date --type date
//!   cargo run --bin manage-mappings -- deactivate --id 3
//!   cargo run --bin manage-mappings -- activate --id 3

use std::env;

use report_upload_lib::config::Config;
use report_upload_lib::db::DbPool;
use report_upload_lib::models::{FieldType, NewColumnMapping};
use report_upload_lib::services::mapping;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let command = &args[1];

    if matches!(command.as_str(), "help" | "--help" | "-h") {
        print_usage();
        return;
    }

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match DbPool::new(&config).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error connecting to database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = pool.run_migrations().await {
        eprintln!("Error running migrations: {}", e);
        std::process::exit(1);
    }

    match command.as_str() {
        "list" | "ls" => list_mappings(&pool).await,
        "add" => add_mapping(&pool, &args).await,
        "activate" => set_active(&pool, &args, true).await,
        "deactivate" => set_active(&pool, &args, false).await,
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            std::process::exit(1);
        }
    }
}

/// Value following `--name` (or its short form).
fn arg_value<'a>(args: &'a [String], long: &str, short: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == long || a == short)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn require_arg<'a>(args: &'a [String], long: &str, short: &str) -> &'a str {
    match arg_value(args, long, short) {
        Some(v) => v,
        None => {
            eprintln!("Error: {} is required", long);
            std::process::exit(1);
        }
    }
}

async fn list_mappings(pool: &DbPool) {
    let mappings = match mapping::list_mappings(pool).await {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error listing mappings: {}", e);
            std::process::exit(1);
        }
    };

    if mappings.is_empty() {
        println!("No column mappings configured.");
        return;
    }

    println!();
    println!(
        "{:<6} {:<28} {:<24} {:<10} {:<10} {:<8}",
        "ID", "SOURCE COLUMN", "CANONICAL FIELD", "TYPE", "REQUIRED", "STATUS"
    );
    println!("{}", "-".repeat(90));

    for m in mappings {
        let status = if m.active { "active" } else { "inactive" };
        let required = if m.required { "yes" } else { "no" };
        println!(
            "{:<6} {:<28} {:<24} {:<10} {:<10} {:<8}",
            m.id,
            m.source_column,
            m.canonical_field,
            m.field_type.as_str(),
            required,
            status
        );
    }
    println!();
}

async fn add_mapping(pool: &DbPool, args: &[String]) {
    let source_column = require_arg(args, "--source", "-s").to_string();
    let canonical_field = require_arg(args, "--canonical", "-c").to_string();

    let field_type = match arg_value(args, "--type", "-t") {
        Some(raw) => match FieldType::parse(raw) {
            Some(t) => t,
            None => {
                eprintln!(
                    "Error: unknown type '{}' (expected text, integer, number, date, datetime or email)",
                    raw
                );
                std::process::exit(1);
            }
        },
        None => FieldType::Text,
    };

    let new = NewColumnMapping {
        source_column,
        canonical_field,
        field_type,
        required: !args.iter().any(|a| a == "--optional"),
    };

    match mapping::create_mapping(pool, new).await {
        Ok(created) => println!(
            "Mapping {} created: '{}' -> '{}' ({})",
            created.id,
            created.source_column,
            created.canonical_field,
            created.field_type.as_str()
        ),
        Err(e) => {
            eprintln!("Error creating mapping: {}", e);
            std::process::exit(1);
        }
    }
}

async fn set_active(pool: &DbPool, args: &[String], active: bool) {
    let raw = require_arg(args, "--id", "-i");
    let id: i32 = match raw.parse() {
        Ok(id) => id,
        Err(_) => {
            eprintln!("Error: --id must be a number, got '{}'", raw);
            std::process::exit(1);
        }
    };

    match mapping::set_mapping_active(pool, id, active).await {
        Ok(()) => {
            let state = if active { "activated" } else { "deactivated" };
            println!("Mapping {} {}.", id, state);
        }
        Err(e) => {
            eprintln!("Error updating mapping: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!();
    eprintln!("Usage: manage-mappings <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  list, ls                                  List all column mappings");
    eprintln!("  add --source <col> --canonical <field>    Create an active mapping");
    eprintln!("      [--type <type>] [--optional]          Field type (default text); value may be blank");
    eprintln!("  activate --id <id>                        Re-enable a mapping");
    eprintln!("  deactivate --id <id>                      Disable a mapping");
    eprintln!("  help                                      Show this help");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  manage-mappings add --source \"Order Date\" --canonical order_date --type date");
    eprintln!("  manage-mappings deactivate --id 3");
    eprintln!();
}
