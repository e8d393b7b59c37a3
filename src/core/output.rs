use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};

use crate::core::types::{OutputFormat, ProbeResult};

const FOUND_TAG: &str = "[FOUND]";
const NOT_TAG: &str = "[NOT]";
const CSV_HEADER: &str = "Site,URL,Found";

pub fn write_results(results: &[ProbeResult], format: OutputFormat, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let body = match format {
        OutputFormat::Json => render_json(results)?,
        OutputFormat::Txt => render_txt(results),
        OutputFormat::Csv => render_csv(results),
    };
    fs::write(path, body).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!("{} results written to {}", results.len(), path.display());
    Ok(())
}

pub fn read_results(format: OutputFormat, path: &Path) -> Result<Vec<ProbeResult>> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    match format {
        OutputFormat::Json => Ok(serde_json::from_str(&data)?),
        OutputFormat::Txt => parse_txt(&data),
        OutputFormat::Csv => parse_csv(&data),
    }
}

fn render_json(results: &[ProbeResult]) -> Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}

fn render_txt(results: &[ProbeResult]) -> String {
    let mut out = String::new();
    for r in results {
        let tag = if r.found { FOUND_TAG } else { NOT_TAG };
        out.push_str(&format!("{} {}: {}\n", tag, r.platform, r.url));
    }
    out
}

fn parse_txt(data: &str) -> Result<Vec<ProbeResult>> {
    let mut results = Vec::new();
    for (lineno, line) in data.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let (found, rest) = if let Some(rest) = line.strip_prefix(FOUND_TAG) {
            (true, rest)
        } else if let Some(rest) = line.strip_prefix(NOT_TAG) {
            (false, rest)
        } else {
            bail!("line {}: missing status tag", lineno + 1);
        };
        let (platform, url) = rest
            .strip_prefix(' ')
            .and_then(|r| r.rsplit_once(": "))
            .ok_or_else(|| anyhow!("line {}: expected '<site>: <url>'", lineno + 1))?;
        results.push(ProbeResult::new(platform, url, found));
    }
    Ok(results)
}

fn render_csv(results: &[ProbeResult]) -> String {
    let mut out = String::new();
    out.push_str(CSV_HEADER);
    out.push('\n');
    for r in results {
        out.push_str(&format!(
            "{},{},{}\n",
            csv_field(&r.platform),
            csv_field(&r.url),
            r.found
        ));
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn parse_csv(data: &str) -> Result<Vec<ProbeResult>> {
    let mut rows = split_csv_rows(data)?.into_iter();
    match rows.next() {
        Some(header) if header.join(",") == CSV_HEADER => {}
        _ => bail!("missing csv header"),
    }
    rows.enumerate()
        .map(|(idx, row)| -> Result<ProbeResult> {
            match row.as_slice() {
                [platform, url, found] => {
                    let found = found
                        .trim()
                        .to_ascii_lowercase()
                        .parse::<bool>()
                        .map_err(|_| anyhow!("row {}: invalid found value '{}'", idx + 2, found))?;
                    Ok(ProbeResult::new(platform.as_str(), url.as_str(), found))
                }
                _ => Err(anyhow!("row {}: expected 3 fields, got {}", idx + 2, row.len())),
            }
        })
        .collect()
}

fn split_csv_rows(data: &str) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = data.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, quoted) {
            ('"', true) if chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            ('"', true) => quoted = false,
            ('"', false) if field.is_empty() => quoted = true,
            (',', false) => row.push(std::mem::take(&mut field)),
            ('\r', false) => {}
            ('\n', false) => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            (c, _) => field.push(c),
        }
    }
    if quoted {
        bail!("unterminated quoted field");
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    Ok(rows)
}
