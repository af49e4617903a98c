//! Output formatters for CLI commands.
//!
//! Every command renders its result through [`format_output`], so the three
//! output modes behave the same way across commands.

use crate::cli::OutputFormat;
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::fmt::Display;

/// Formats data according to the specified output format.
///
/// `Json` and `Pretty` render the serialized structure. `Text` uses the
/// value's [`Display`] form, which commands keep line-oriented for piping.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Examples
///
/// ```
/// use gistfs_cli::cli::OutputFormat;
/// use gistfs_cli::formatters::format_output;
/// use serde::Serialize;
/// use std::fmt;
///
/// #[derive(Serialize)]
/// struct Entry {
///     name: String,
/// }
///
/// impl fmt::Display for Entry {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         f.write_str(&self.name)
///     }
/// }
///
/// let entry = Entry { name: "a.txt".to_string() };
/// assert!(format_output(&entry, OutputFormat::Json)?.contains("\"name\""));
/// assert_eq!(format_output(&entry, OutputFormat::Text)?, "a.txt");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize + Display>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format(data),
        OutputFormat::Text => Ok(data.to_string()),
        OutputFormat::Pretty => pretty::format(data),
    }
}

/// JSON output formatting.
pub mod json {
    use super::{Result, Serialize};

    /// Formats data as JSON with 2-space indentation.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let json = serde_json::to_string_pretty(data)?;
        Ok(json)
    }

    /// Formats data as compact JSON.
    pub fn format_compact<T: Serialize>(data: &T) -> Result<String> {
        let json = serde_json::to_string(data)?;
        Ok(json)
    }
}

/// Pretty (human-readable) output formatting.
pub mod pretty {
    use super::{Colorize, Result, Serialize};
    use std::fmt::Write;

    /// Formats data as colorized, indented output.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let mut out = String::new();
        format_value(&value, 0, &mut out);
        Ok(out)
    }

    fn format_value(value: &serde_json::Value, indent: usize, out: &mut String) {
        use serde_json::Value;

        let indent_str = "  ".repeat(indent);
        let next_indent_str = "  ".repeat(indent + 1);

        match value {
            Value::Null => out.push_str(&"null".dimmed().to_string()),
            Value::Bool(b) => out.push_str(&b.to_string().yellow().to_string()),
            Value::Number(n) => out.push_str(&n.to_string().cyan().to_string()),
            Value::String(s) => {
                let _ = write!(out, "\"{}\"", s.green());
            }
            Value::Array(arr) if arr.is_empty() => out.push_str("[]"),
            Value::Array(arr) => {
                out.push_str("[\n");
                for (i, item) in arr.iter().enumerate() {
                    out.push_str(&next_indent_str);
                    format_value(item, indent + 1, out);
                    if i + 1 < arr.len() {
                        out.push(',');
                    }
                    out.push('\n');
                }
                out.push_str(&indent_str);
                out.push(']');
            }
            Value::Object(obj) if obj.is_empty() => out.push_str("{}"),
            Value::Object(obj) => {
                out.push_str("{\n");
                for (i, (key, val)) in obj.iter().enumerate() {
                    let _ = write!(out, "{next_indent_str}\"{}\": ", key.blue().bold());
                    format_value(val, indent + 1, out);
                    if i + 1 < obj.len() {
                        out.push(',');
                    }
                    out.push('\n');
                }
                out.push_str(&indent_str);
                out.push('}');
            }
        }
    }
}
