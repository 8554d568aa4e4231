use serde_json::Value;
use tabled::{builder::Builder, Table};

/// Ordered payment columns for the schedule grid.
const PAYMENT_COLUMNS: [&str; 5] = [
    "segment_number",
    "principal_payment",
    "interest_payment",
    "index_payment",
    "total_payment",
];

const PAYMENT_HEADERS: [&str; 5] = ["Segment", "Principal", "Interest", "Index", "Total"];

/// Format output as tables using the tabled crate. A schedule envelope gets
/// a payments grid followed by a summary; anything else falls back to a
/// field/value table.
pub fn print_table(value: &Value) {
    let envelope = match value {
        Value::Object(map) => map,
        _ => {
            println!("{}", value);
            return;
        }
    };

    match envelope.get("result") {
        Some(Value::Object(result)) => {
            if let Some(Value::Array(payments)) = result.get("payments") {
                print_payments_table(payments);
                print_summary_table(result);
            } else {
                print_field_table(result);
            }
        }
        _ => {
            print_field_table(envelope);
            return;
        }
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for warning in warnings {
                if let Value::String(s) = warning {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(methodology)) = envelope.get("methodology") {
        println!("\nMethodology: {}", methodology);
    }
}

fn print_payments_table(payments: &[Value]) {
    if payments.is_empty() {
        println!("(empty schedule)");
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(PAYMENT_HEADERS);
    for payment in payments {
        if let Value::Object(map) = payment {
            let row: Vec<String> = PAYMENT_COLUMNS
                .iter()
                .map(|column| map.get(*column).map(format_value).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}

fn print_summary_table(result: &serde_json::Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in result {
        if key == "payments" {
            continue;
        }
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("\n{}", Table::from(builder));
}

fn print_field_table(map: &serde_json::Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
