use serde::Serialize;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => print_json(items),
    }
}

/// `text` for tables, the serialized value for JSON
pub fn print_item<T: Serialize + ?Sized>(item: &T, text: &str, format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{}", text),
        OutputFormat::Json => print_json(item),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => print_error(&format!("Failed to serialize output: {}", e)),
    }
}

pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

pub fn print_warning(msg: &str) {
    println!("⚠ {}", msg);
}

pub fn print_error(msg: &str) {
    eprintln!("✗ {}", msg);
}

pub fn print_kv(key: &str, value: &str) {
    println!("  {:<16} {}", format!("{}:", key), value);
}
