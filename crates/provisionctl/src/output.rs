use anyhow::Result;
use comfy_table::Table;
use serde::Serialize;
use serde_json::Value;

use crate::cli;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Table,
}

impl From<cli::OutputFormat> for OutputFormat {
    fn from(format: cli::OutputFormat) -> Self {
        match format {
            cli::OutputFormat::Json => Self::Json,
            cli::OutputFormat::Yaml => Self::Yaml,
            cli::OutputFormat::Auto | cli::OutputFormat::Table => Self::Table,
        }
    }
}

pub fn print_output<T: Serialize>(data: T, format: impl Into<OutputFormat>) -> Result<()> {
    println!("{}", render(data, format.into())?);
    Ok(())
}

pub fn render<T: Serialize>(data: T, format: OutputFormat) -> Result<String> {
    let json_value = serde_json::to_value(data)?;

    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&json_value)?,
        OutputFormat::Yaml => serde_yaml::to_string(&json_value)?
            .trim_end()
            .to_string(),
        OutputFormat::Table => render_table(&json_value),
    };

    Ok(rendered)
}

fn render_table(value: &Value) -> String {
    match value {
        Value::Array(arr) if !arr.is_empty() => {
            let mut table = Table::new();

            // Headers come from the first object
            if let Value::Object(first) = &arr[0] {
                let headers: Vec<String> = first.keys().cloned().collect();
                table.set_header(&headers);

                for item in arr {
                    if let Value::Object(obj) = item {
                        let row: Vec<String> = headers
                            .iter()
                            .map(|h| format_value(obj.get(h).unwrap_or(&Value::Null)))
                            .collect();
                        table.add_row(row);
                    }
                }
            } else {
                table.set_header(vec!["Value"]);
                for item in arr {
                    table.add_row(vec![format_value(item)]);
                }
            }

            table.to_string()
        }
        Value::Object(obj) => {
            let mut table = Table::new();
            table.set_header(vec!["Key", "Value"]);

            for (key, val) in obj {
                table.add_row(vec![key.clone(), format_value(val)]);
            }

            table.to_string()
        }
        _ => format_value(value),
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_auto_renders_as_table() {
        assert_eq!(
            OutputFormat::from(cli::OutputFormat::Auto),
            OutputFormat::Table
        );
        assert_eq!(
            OutputFormat::from(cli::OutputFormat::Yaml),
            OutputFormat::Yaml
        );
    }

    #[test]
    fn test_render_json_is_pretty() {
        let rendered = render(json!({"name": "MyTestTable"}), OutputFormat::Json).unwrap();
        assert_eq!(rendered, "{\n  \"name\": \"MyTestTable\"\n}");
    }

    #[test]
    fn test_render_yaml() {
        let rendered = render(json!({"status": "ACTIVE"}), OutputFormat::Yaml).unwrap();
        assert_eq!(rendered, "status: ACTIVE");
    }

    #[test]
    fn test_render_table_rows_from_objects() {
        let rendered = render(
            json!([
                {"key": "a.txt", "size": 12},
                {"key": "b.txt", "size": null}
            ]),
            OutputFormat::Table,
        )
        .unwrap();
        assert!(rendered.contains("key"));
        assert!(rendered.contains("a.txt"));
        assert!(rendered.contains("12"));
        assert!(rendered.contains("b.txt"));
    }

    #[test]
    fn test_format_nested_values() {
        assert_eq!(format_value(&json!([1, 2, 3])), "[3 items]");
        assert_eq!(format_value(&json!({"a": 1})), "{1 fields}");
        assert_eq!(format_value(&Value::Null), "-");
    }
}
