//! Shared output helpers for human and JSON modes.
//!
//! Human mode prints primary data to stdout and notices to stderr.
//! JSON mode wraps responses in `{ data, meta?, warnings? }` and respects
//! `--pretty` and `--quiet`.

use std::io::Write;

use anyhow::Result;
use mcpt_registry::{Origin, RegistryConfig};
use serde_json::{Map, Value, json};

use crate::opts::GlobalOpts;

pub fn print_success(
    opts: &GlobalOpts,
    data: Value,
    meta: Option<Value>,
    mut warnings: Vec<String>,
) -> Result<()> {
    if opts.quiet {
        warnings.clear();
    }
    if opts.wants_json() {
        print_json(opts, data, meta, warnings)
    } else {
        print_human(data, warnings)
    }
}

fn print_json(
    opts: &GlobalOpts,
    data: Value,
    meta: Option<Value>,
    warnings: Vec<String>,
) -> Result<()> {
    let mut root = Map::new();
    root.insert("data".into(), data);
    if let Some(m) = meta {
        root.insert("meta".into(), m);
    }
    if !warnings.is_empty() {
        root.insert(
            "warnings".into(),
            warnings.into_iter().map(Value::String).collect(),
        );
    }
    let root = Value::Object(root);
    if opts.pretty {
        println!("{}", serde_json::to_string_pretty(&root)?);
    } else {
        println!("{}", serde_json::to_string(&root)?);
    }
    Ok(())
}

fn print_human(data: Value, warnings: Vec<String>) -> Result<()> {
    let mut stderr = std::io::stderr();
    for w in warnings {
        writeln!(stderr, "notice: {w}")?;
    }
    match data {
        Value::String(s) => println!("{s}"),
        other => println!("{}", serde_json::to_string_pretty(&other)?),
    }
    Ok(())
}

/// Hint on stderr; dropped under `--quiet` and in JSON mode.
pub fn print_notice(opts: &GlobalOpts, msg: &str) {
    if !opts.quiet && !opts.wants_json() {
        eprintln!("{msg}");
    }
}

/// Provenance block attached to every registry-backed response.
pub fn registry_meta(cfg: &RegistryConfig, origin: Origin) -> Value {
    json!({
        "source": cfg.source,
        "ref": cfg.git_ref,
        "origin": origin,
    })
}

/// Warnings implied by how the registry was obtained.
pub fn origin_warnings(origin: Origin) -> Vec<String> {
    match origin {
        Origin::StaleCache => vec![
            "registry fetch failed; showing cached data which may be out of date".into(),
        ],
        _ => Vec::new(),
    }
}

/// Left-aligned text table with a dashed rule under the header.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(headers.iter().copied(), &widths));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    lines.push(format_row(rule.iter().map(String::as_str), &widths));
    for row in rows {
        lines.push(format_row(row.iter().map(String::as_str), &widths));
    }
    lines.join("\n")
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect();
    padded.join("  ").trim_end().to_string()
}

/// Cut `text` to at most `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}
