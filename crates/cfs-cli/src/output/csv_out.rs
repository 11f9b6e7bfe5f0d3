use serde_json::Value;
use std::io;

use super::{first_record_array, format_value};

/// Write output as CSV to stdout.
///
/// Rankings and calculator constituents are written one record per line;
/// anything else becomes two-column field,value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let _ = write_csv(value, stdout.lock());
}

fn write_csv<W: io::Write>(value: &Value, out: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Array(arr) => write_records(&mut wtr, arr)?,
        Value::Object(map) => match first_record_array(map) {
            Some((_, items)) => write_records(&mut wtr, items)?,
            None => write_fields(&mut wtr, map)?,
        },
        other => wtr.write_record([format_csv_value(other)])?,
    }

    wtr.flush()?;
    Ok(())
}

fn write_fields<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    map: &serde_json::Map<String, Value>,
) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in map {
        wtr.write_record([key.as_str(), &format_csv_value(val)])?;
    }
    Ok(())
}

/// Headers follow the key order of the first record.
fn write_records<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) -> csv::Result<()> {
    let Some(Value::Object(first)) = arr.first() else {
        if arr.is_empty() {
            wtr.write_record(["(no data)"])?;
        }
        for item in arr {
            wtr.write_record([format_csv_value(item)])?;
        }
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    wtr.write_record(&headers)?;

    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                .collect();
            wtr.write_record(&row)?;
        }
    }
    Ok(())
}

/// Like the table formatter, but nulls are empty fields.
fn format_csv_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => format_value(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut buf = Vec::new();
        write_csv(value, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_ranking_header_keeps_field_order() {
        let out = render(&json!({
            "result": [{
                "rank": 1,
                "company": "Acme",
                "cfs": "0.81",
                "sentiment": "bullish",
                "growth": "0.9",
                "returns": null,
                "leverage": "0.6",
                "valuation": "0.4"
            }]
        }));
        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some("rank,company,cfs,sentiment,growth,returns,leverage,valuation")
        );
        assert_eq!(lines.next(), Some("1,Acme,0.81,bullish,0.9,,0.6,0.4"));
    }

    #[test]
    fn test_empty_ranking_writes_no_data_row() {
        let out = render(&json!({ "result": [], "warnings": ["No data"] }));
        assert_eq!(out.trim_end(), "(no data)");
    }
}
