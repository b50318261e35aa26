use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::display;

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::Object(result)) = map.get("result") {
                print_result_table(result, map);
            } else if let Some(Value::Object(fields)) = map.get("fields") {
                print_validation_table(fields, map);
            } else {
                print_rows(map);
            }
        }
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    print_rows(result);

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// One row per form field: value and whether it is flagged.
fn print_validation_table(fields: &Map<String, Value>, report: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value", "Error"]);
    for (name, slot) in fields {
        let value = slot.get("value").map(|v| format_value(name, v)).unwrap_or_default();
        let error = slot
            .get("error")
            .and_then(Value::as_bool)
            .map(|e| if e { "This field is required" } else { "" })
            .unwrap_or_default();
        builder.push_record([name.as_str(), &value, error]);
    }
    println!("{}", Table::from(builder));

    if let Some(passed) = report.get("passed").and_then(Value::as_bool) {
        println!("\nPassed: {}", passed);
    }
}

fn print_rows(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_value(key, val)]);
    }
    println!("{}", Table::from(builder));
}

fn format_value(key: &str, value: &Value) -> String {
    if display::is_money_field(key) {
        if let Some(d) = display::money_value(value) {
            return display::format_money(d);
        }
    }
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(|v| format_value("", v)).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
