pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

/// Render a scalar cell; nested values fall back to compact JSON.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "--".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// The first field of `map` holding an array of objects, if any.
pub fn first_record_array(map: &serde_json::Map<String, Value>) -> Option<(&String, &Vec<Value>)> {
    map.iter().find_map(|(key, val)| match val {
        Value::Array(items) if items.iter().all(Value::is_object) && !items.is_empty() => {
            Some((key, items))
        }
        _ => None,
    })
}
