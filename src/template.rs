//! Typed configuration-template rendering.
//!
//! A template is UTF-8 text with `${KEY}` placeholders. Rendering applies a
//! key/value mapping and fails on the first pass if any referenced key is
//! absent; nothing is written on failure. `$${` produces a literal `${`.
use anyhow::{anyhow, Context, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

fn token_pattern() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"\$\$\{|\$\{([A-Z][A-Z0-9_]*)\}").expect("token regex"))
}

/// Substitute placeholders in `template`, failing if any key is missing.
pub fn render(template: &str, vars: &BTreeMap<String, String>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut missing: Vec<&str> = Vec::new();
    let mut last = 0;

    for caps in token_pattern().captures_iter(template) {
        let matched = caps.get(0).ok_or_else(|| anyhow!("empty token match"))?;
        out.push_str(&template[last..matched.start()]);
        last = matched.end();

        match caps.get(1) {
            None => out.push_str("${"),
            Some(key) => match vars.get(key.as_str()) {
                Some(value) => out.push_str(value),
                None => {
                    if !missing.contains(&key.as_str()) {
                        missing.push(key.as_str());
                    }
                }
            },
        }
    }
    out.push_str(&template[last..]);

    if !missing.is_empty() {
        return Err(anyhow!("missing template keys: {}", missing.join(", ")));
    }
    Ok(out)
}

/// Render `template_path` into `out_path`, overwriting any previous output.
///
/// The output file is only touched after rendering succeeds, so a missing
/// template or key never leaves a partial artifact behind.
pub fn render_file(
    template_path: &Path,
    out_path: &Path,
    vars: &BTreeMap<String, String>,
) -> Result<()> {
    let template = fs::read_to_string(template_path)
        .with_context(|| format!("read template {}", template_path.display()))?;
    let rendered = render(&template, vars)
        .with_context(|| format!("render template {}", template_path.display()))?;
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(out_path, rendered).with_context(|| format!("write {}", out_path.display()))?;
    tracing::info!(
        template = %template_path.display(),
        output = %out_path.display(),
        "rendered config"
    );
    Ok(())
}
