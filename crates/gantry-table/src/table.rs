//! Parsing and resolution for the `<name> <relative-path>` definitions file.

use std::collections::BTreeMap;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use gantry_config::InstallLayout;

use crate::errors::TableError;

/// Immutable mapping from symbolic command names to executable paths.
///
/// Relative definition paths are resolved against the installation root at
/// parse time, so lookups hand back ready-to-invoke paths.
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    entries: BTreeMap<String, Utf8PathBuf>,
}

impl CommandTable {
    /// Loads the table from the layout's definitions file.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::ReadDefinitions`] when the file cannot be read.
    /// Malformed lines are collected as diagnostics, never errors.
    pub fn load(layout: &InstallLayout) -> Result<ParsedDefinitions, TableError> {
        let path = layout.commands_file();
        let source = fs::read_to_string(path.as_std_path())
            .map_err(|error| TableError::read_definitions(path, error))?;
        Ok(Self::parse(&source, layout))
    }

    /// Parses definitions text against the given layout.
    ///
    /// Blank lines and lines starting with `#` are skipped silently. Lines
    /// with a field count other than two, and entries whose name repeats an
    /// earlier one, are reported as [`InvalidLine`] diagnostics; the first
    /// occurrence of a duplicated name wins.
    #[must_use]
    pub fn parse(source: &str, layout: &InstallLayout) -> ParsedDefinitions {
        let mut entries = BTreeMap::new();
        let mut invalid = Vec::new();

        for (index, line) in source.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = trimmed.split_whitespace().collect();
            let [name, relative] = fields.as_slice() else {
                invalid.push(InvalidLine {
                    number: index + 1,
                    text: line.to_owned(),
                    reason: InvalidReason::FieldCount { found: fields.len() },
                });
                continue;
            };

            if entries.contains_key(*name) {
                invalid.push(InvalidLine {
                    number: index + 1,
                    text: line.to_owned(),
                    reason: InvalidReason::DuplicateName,
                });
                continue;
            }

            let resolved = layout.resolve(Utf8Path::new(relative));
            entries.insert((*name).to_owned(), resolved);
        }

        ParsedDefinitions {
            table: Self { entries },
            invalid,
        }
    }

    /// Resolves a symbolic name to its executable path.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownCommand`] when no entry exists.
    pub fn resolve(&self, name: &str) -> Result<&Utf8Path, TableError> {
        self.entries
            .get(name)
            .map(Utf8PathBuf::as_path)
            .ok_or_else(|| TableError::unknown_command(name))
    }

    /// Number of entries in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, resolved path)` entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Utf8Path)> {
        self.entries
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }
}

/// Result of parsing a definitions source.
#[derive(Debug, Clone)]
pub struct ParsedDefinitions {
    /// The usable command table.
    pub table: CommandTable,
    /// Lines that produced no entry, in file order.
    pub invalid: Vec<InvalidLine>,
}

/// A definitions line that could not become a table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidLine {
    /// One-based line number in the definitions source.
    pub number: usize,
    /// The offending line, verbatim.
    pub text: String,
    /// Why the line was rejected.
    pub reason: InvalidReason,
}

/// Rejection reasons for definitions lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// The line did not split into exactly two fields.
    FieldCount {
        /// Observed field count.
        found: usize,
    },
    /// The name repeats an earlier entry.
    DuplicateName,
}
