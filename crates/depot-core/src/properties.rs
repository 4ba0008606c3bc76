use std::collections::BTreeMap;
use std::path::Path;

/// Loads a `.depot.env` file (shell-style `KEY=value` format).
///
/// `.depot.env` holds repository credentials kept out of `config.toml`.
/// Lines may be prefixed with `export`, and values may be wrapped in single
/// or double quotes. A missing file yields an empty map.
pub fn load_env_file(path: &Path) -> miette::Result<BTreeMap<String, String>> {
    if !path.is_file() {
        return Ok(BTreeMap::new());
    }
    let content = std::fs::read_to_string(path).map_err(depot_util::errors::DepotError::Io)?;
    Ok(parse_env(&content))
}

/// Parse `.depot.env` content.
pub fn parse_env(content: &str) -> BTreeMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            Some((key.trim().to_string(), unquote(value.trim()).to_string()))
        })
        .collect()
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Interpolate `${env:VAR}` references in a string.
///
/// Values come from `env_overrides` first, then the process environment;
/// unknown variables expand to the empty string. An unterminated reference
/// is copied through verbatim.
pub fn interpolate(input: &str, env_overrides: &BTreeMap<String, String>) -> String {
    const OPEN: &str = "${env:";

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find(OPEN) {
        let after = &rest[start + OPEN.len()..];
        let Some(end) = after.find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let key = &after[..end];
        match env_overrides.get(key) {
            Some(value) => out.push_str(value),
            None => {
                if let Ok(value) = std::env::var(key) {
                    out.push_str(&value);
                }
            }
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}
