//! Environment file rendering.
//!
//! One `KEY=value` line per variable, keys in sorted order. Spaces in keys
//! become underscores. A value is double-quoted when it is empty or contains
//! whitespace, `#`, a quote, a backslash or `$`; inside the quotes `\`, `"`
//! and `$` are backslash-escaped. A value with `$` and neither `'` nor `\` is
//! single-quoted instead, which both dotenvy and compose read literally.
//! Output depends only on the manifest, so regenerating from the same
//! manifest yields byte-identical files.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::Result;
use crate::manifest::ConfigManifest;
use crate::resolve::EnvMap;

pub fn render(env: &EnvMap) -> String {
    let mut out = String::new();
    for (key, value) in env {
        out.push_str(&key.replace(' ', "_"));
        out.push('=');
        out.push_str(&quote(value));
        out.push('\n');
    }
    out
}

fn quote(value: &str) -> Cow<'_, str> {
    if value.contains('$') && !value.contains(['\'', '\\']) {
        return Cow::Owned(format!("'{}'", value));
    }
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '#' | '"' | '\'' | '\\' | '$'));
    if !needs_quotes {
        return Cow::Borrowed(value);
    }
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('$', "\\$");
    Cow::Owned(format!("\"{}\"", escaped))
}

/// Write every env file the manifest describes under `root`.
///
/// `main` goes to `{path}.env`; each service writes `{path}.dev.env` for its
/// development bucket and `{path}.env` for its production bucket. Returns the
/// written paths in order.
pub fn write_all(root: &Path, manifest: &ConfigManifest) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if let Some(main) = &manifest.main {
        if let Some(env) = &main.main {
            written.push(write_file(root, &format!("{}.env", main.path()), env)?);
        }
    }

    for entry in &manifest.services {
        if let Some(dev) = &entry.dev {
            written.push(write_file(root, &format!("{}.dev.env", entry.path()), dev)?);
        }
        if let Some(prod) = &entry.prod {
            written.push(write_file(root, &format!("{}.env", entry.path()), prod)?);
        }
    }
    Ok(written)
}

fn write_file(root: &Path, relative: &str, env: &EnvMap) -> Result<PathBuf> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    debug!("Writing {}", path.display());
    fs::write(&path, render(env))?;
    Ok(path)
}
