//! # Legacy `.mrconfig` Import
//!
//! Users coming from myrepos have a `~/.mrconfig` file. This module reads it
//! into a [`LegacyDocument`] and converts that into a [`Registry`] so the first
//! run of `mg` can migrate without manual work.
//!
//! ## Grammar
//!
//! The file is line oriented. Each line is trimmed and then, in order:
//!
//! 1.  Blank lines and lines starting with `#` are skipped.
//! 2.  `[DEFAULT]` switches to the global section.
//! 3.  Any other `[...]` line opens a repository block. The bracketed text is
//!     the repository path, relative to the home directory unless absolute.
//! 4.  Everything else must be `key = value` (split on the first `" = "`).
//!     Inside a repository block only `checkout` is understood. In the global
//!     section only `unregister` and `git_gc` are, and they become the
//!     `unregister` and `gc` aliases.
//!
//! Parsing stops at the first line that does not fit; the error carries the
//! 0-based line number.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use regex::Regex;

use crate::defaults::LEGACY_FILENAME;
use crate::error::{Error, Result};
use crate::registry::Registry;

/// One `[path]` block of a legacy file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyRepo {
    pub path: String,
    /// The raw `checkout` command, empty if the block had none.
    pub checkout: String,
}

/// A parsed legacy file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyDocument {
    pub repos: Vec<LegacyRepo>,
    pub aliases: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Default,
    Repo,
}

/// Parses legacy text. Relative block paths are resolved against `home`.
pub fn parse(text: &str, home: &Path) -> Result<LegacyDocument> {
    let mut doc = LegacyDocument::default();
    let mut mode = Mode::Default;

    for (n, raw) in text.split('\n').enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line == "[DEFAULT]" {
            mode = Mode::Default;
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            let path = line.trim_matches(|c| c == '[' || c == ']');
            let path = if Path::new(path).is_absolute() {
                path.to_string()
            } else {
                home.join(path).to_string_lossy().into_owned()
            };
            doc.repos.push(LegacyRepo {
                path,
                checkout: String::new(),
            });
            mode = Mode::Repo;
            continue;
        }

        let syntax_error = || Error::LegacySyntax {
            line: n,
            content: line.to_string(),
        };
        let (key, value) = line.split_once(" = ").ok_or_else(syntax_error)?;

        match mode {
            Mode::Repo => {
                if key != "checkout" {
                    return Err(syntax_error());
                }
                // Repo mode is only entered after a block has been pushed
                let current = doc.repos.last_mut().ok_or_else(syntax_error)?;
                current.checkout = value.to_string();
            }
            Mode::Default => {
                let alias = match key {
                    "unregister" => "unregister",
                    "git_gc" => "gc",
                    _ => return Err(syntax_error()),
                };
                doc.aliases.insert(alias.to_string(), value.to_string());
            }
        }
    }

    Ok(doc)
}

/// Reads and parses `<home>/.mrconfig`.
pub fn load_from(home: &Path) -> Result<LegacyDocument> {
    let path = home.join(LEGACY_FILENAME);
    let metadata = fs::metadata(&path)?;
    if metadata.is_dir() {
        return Err(Error::Config {
            message: format!(
                "expected mrconfig file but got a directory: {}",
                path.display()
            ),
        });
    }
    let text = fs::read_to_string(&path)?;
    parse(&text, home)
}

impl LegacyDocument {
    /// Converts the document into a registry.
    ///
    /// A checkout command of the exact form `git clone '<url>' '<dir>'` is
    /// reduced to `<url>`. Any other command is kept verbatim as the remote, so
    /// the result may hold remotes that are not URLs. If two blocks name the
    /// same path the first one wins.
    pub fn into_registry(self) -> Result<Registry> {
        let clone_command = clone_command_regex()?;
        let mut registry = Registry::new();
        for repo in self.repos {
            let remote = extract_clone_url(&clone_command, &repo.checkout)
                .unwrap_or(&repo.checkout)
                .to_string();
            match registry.add_repo(&repo.path, &remote) {
                Ok(()) | Err(Error::Duplicate { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        for (name, command) in self.aliases {
            registry.set_alias(name, command);
        }
        Ok(registry)
    }
}

fn clone_command_regex() -> Result<Regex> {
    Ok(Regex::new(r"^git clone '([^']*)' '([^']*)'$")?)
}

fn extract_clone_url<'a>(pattern: &Regex, checkout: &'a str) -> Option<&'a str> {
    pattern
        .captures(checkout)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}
