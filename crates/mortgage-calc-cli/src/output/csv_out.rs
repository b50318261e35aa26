use serde_json::{Map, Value};
use std::io;

/// Write output as CSV to stdout.
///
/// Calculations become `field,value` rows of the result; validation
/// reports become `field,value,error` rows, one per form field.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let written = write_csv(&mut wtr, value).and_then(|_| wtr.flush().map_err(csv::Error::from));
    if let Err(e) = written {
        eprintln!("CSV write error: {}", e);
    }
}

fn write_csv<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) -> Result<(), csv::Error> {
    let map = match value {
        Value::Object(map) => map,
        other => return wtr.write_record([format_csv_value(other)]),
    };

    if let Some(Value::Object(result)) = map.get("result") {
        write_pairs(wtr, result)
    } else if let Some(Value::Object(fields)) = map.get("fields") {
        wtr.write_record(["field", "value", "error"])?;
        for (name, slot) in fields {
            let value = slot.get("value").map(format_csv_value).unwrap_or_default();
            let error = slot.get("error").map(format_csv_value).unwrap_or_default();
            wtr.write_record([name.as_str(), &value, &error])?;
        }
        Ok(())
    } else {
        write_pairs(wtr, map)
    }
}

fn write_pairs<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    map: &Map<String, Value>,
) -> Result<(), csv::Error> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in map {
        wtr.write_record([key.as_str(), &format_csv_value(val)])?;
    }
    Ok(())
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
