use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{first_record_array, format_value};

/// Format output as tables using the tabled crate.
///
/// A ranking prints as one row per company; a calculator result prints its
/// scalar fields as Field/Value pairs followed by the constituent ranks.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => {
                print_result(result);
                print_envelope_notes(map);
            }
            None => print_fields(map),
        },
        Value::Array(arr) => print_records(arr),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value) {
    match result {
        Value::Array(arr) => print_records(arr),
        Value::Object(map) => {
            print_fields(map);
            if let Some((key, items)) = first_record_array(map) {
                println!("\n{}:", key);
                print_records(items);
            }
        }
        other => println!("{}", format_value(other)),
    }
}

fn print_envelope_notes(envelope: &serde_json::Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Scalar fields only; arrays of records get their own table.
fn print_fields(map: &serde_json::Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        if matches!(val, Value::Array(items) if items.iter().any(Value::is_object)) {
            continue;
        }
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_records(arr: &[Value]) {
    println!("{}", render_records(arr));
}

/// Columns follow the key order of the first record.
fn render_records(arr: &[Value]) -> String {
    let Some(Value::Object(first)) = arr.first() else {
        if arr.is_empty() {
            return "(no data)".to_string();
        }
        return arr.iter().map(format_value).collect::<Vec<_>>().join("\n");
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);

    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }

    Table::from(builder).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_columns_keep_field_order() {
        let rows = vec![json!({
            "rank": 1,
            "company": "Acme",
            "cfs": "0.81",
            "growth": null,
            "returns": "0.7",
            "leverage": "0.6",
            "valuation": "0.4"
        })];
        let rendered = render_records(&rows);
        let header = rendered
            .lines()
            .find(|l| l.contains("company"))
            .unwrap();
        let pos = |name: &str| header.find(name).unwrap();
        assert!(pos("rank") < pos("company"));
        assert!(pos("cfs") < pos("growth"));
        assert!(pos("returns") < pos("leverage"));
        assert!(pos("leverage") < pos("valuation"));
    }

    #[test]
    fn test_empty_records_show_no_data() {
        assert_eq!(render_records(&[]), "(no data)");
    }
}
