use serde_json::Value;

use super::format_value;

/// Print just the key answer.
///
/// Calculator: the composite display string. Percentile: the rank.
/// Ranking: one "company<TAB>cfs" line per row.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = ["display", "percentile", "composite"];

    match result_obj {
        Value::Object(map) => {
            for key in &priority_keys {
                if let Some(val) = map.get(*key) {
                    if !val.is_null() {
                        println!("{}", format_value(val));
                        return;
                    }
                }
            }
            if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, format_value(val));
            }
        }
        Value::Array(rows) => {
            if rows.is_empty() {
                println!("(no data)");
            }
            for row in rows {
                let company = row.get("company").map(format_value).unwrap_or_default();
                let cfs = row.get("cfs").map(format_value).unwrap_or_default();
                println!("{}\t{}", company, cfs);
            }
        }
        other => println!("{}", format_value(other)),
    }
}
