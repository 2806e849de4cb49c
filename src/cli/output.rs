//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cli::args::{BoolSearchArgs, OutputFormat};
use crate::error::Result;

/// Statistics of a searcher tree, as printed by `inspect`.
#[derive(Debug, Serialize, Deserialize)]
pub struct PlanStats {
    /// Number of documents in the index.
    pub doc_count: u64,
    /// Upper bound on the number of matches.
    pub max_matches: u64,
    /// Sum of squared weights of the tree.
    pub weight: f64,
    /// Number of pooled matches the tree may hold at once.
    pub pool_size: usize,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &BoolSearchArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &BoolSearchArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    match value.get("hits").and_then(|h| h.as_array()) {
        Some(hits) => output_hits_human(&value, hits, args),
        None => output_generic_human(&value),
    }
    Ok(())
}

/// Output search hits in human format.
fn output_hits_human(value: &Value, hits: &[Value], args: &BoolSearchArgs) {
    let total = value.get("total_hits").and_then(|t| t.as_u64()).unwrap_or(0);
    println!("Matched {total} documents, showing {}", hits.len());

    for (i, hit) in hits.iter().enumerate() {
        let id = hit.get("id").map(display_value).unwrap_or_default();
        let score = hit.get("score").and_then(|s| s.as_f64()).unwrap_or(0.0);
        println!("{:>4}. doc {id} (score: {score:.4})", i + 1);

        if let Some(explanation) = hit.get("explanation") {
            let rendered = if args.pretty {
                serde_json::to_string_pretty(explanation)
            } else {
                serde_json::to_string(explanation)
            };
            if let Ok(text) = rendered {
                println!("      {text}");
            }
        }
    }
}

/// Output a flat object as key/value lines.
fn output_generic_human(value: &Value) {
    match value.as_object() {
        Some(obj) => {
            for (key, field) in obj {
                println!("{key}: {}", display_value(field));
            }
        }
        None => println!("{}", display_value(value)),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &BoolSearchArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}
