//! Materialises the command table as a directory of symbolic links.
//!
//! Operators and pad-side scripts invoke commands through
//! `<root>/links/<name>` without knowing where each executable actually
//! lives. This crate turns the parsed definitions into that directory; the
//! dispatch daemon itself consumes the in-memory table and never reads the
//! links back.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

use gantry_config::InstallLayout;
use gantry_table::CommandTable;

const LINKS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::links");

/// Summary of a materialisation run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LinkReport {
    /// Links created fresh.
    pub created: usize,
    /// Existing links replaced with a new target.
    pub replaced: usize,
}

/// Errors surfaced while materialising links.
#[derive(Debug, Error)]
pub enum LinksError {
    /// The links directory could not be created.
    #[error("failed to create links directory '{path}': {source}")]
    CreateDirectory {
        /// Directory path.
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    /// A destination exists and is not a symbolic link.
    #[error("refusing to replace non-link '{path}'")]
    NotALink {
        /// The conflicting path.
        path: Utf8PathBuf,
    },
    /// Creating or replacing one link failed.
    #[error("failed to link '{path}': {source}")]
    CreateLink {
        /// Link path.
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    /// Symbolic links are unsupported on this platform.
    #[error("symbolic links are not supported on this platform")]
    Unsupported,
}

/// Creates one symlink per table entry inside the layout's links directory.
///
/// Re-running is idempotent: existing links are re-pointed at the current
/// target. A destination that exists but is not a symlink aborts the run —
/// it means something other than this tool owns the path.
///
/// # Errors
///
/// Returns a [`LinksError`] naming the path that failed.
#[cfg(unix)]
pub fn materialise_links(
    layout: &InstallLayout,
    table: &CommandTable,
) -> Result<LinkReport, LinksError> {
    use std::fs;
    use std::os::unix::fs::symlink;

    let links_dir = layout.links_dir();
    fs::create_dir_all(links_dir.as_std_path()).map_err(|source| LinksError::CreateDirectory {
        path: links_dir.clone(),
        source,
    })?;

    let mut report = LinkReport::default();
    for (name, target) in table.iter() {
        let destination = links_dir.join(name);
        match fs::symlink_metadata(destination.as_std_path()) {
            Ok(metadata) if metadata.file_type().is_symlink() => {
                fs::remove_file(destination.as_std_path()).map_err(|source| {
                    LinksError::CreateLink {
                        path: destination.clone(),
                        source,
                    }
                })?;
                report.replaced += 1;
            }
            Ok(_) => {
                return Err(LinksError::NotALink { path: destination });
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                report.created += 1;
            }
            Err(source) => {
                return Err(LinksError::CreateLink {
                    path: destination,
                    source,
                });
            }
        }

        symlink(target.as_std_path(), destination.as_std_path()).map_err(|source| {
            LinksError::CreateLink {
                path: destination.clone(),
                source,
            }
        })?;
        tracing::debug!(
            target: LINKS_TARGET,
            name,
            link_target = %target,
            "materialised command link"
        );
    }

    Ok(report)
}

/// Non-Unix placeholder; the ground-support hosts are all Unix.
#[cfg(not(unix))]
pub fn materialise_links(
    _layout: &InstallLayout,
    _table: &CommandTable,
) -> Result<LinkReport, LinksError> {
    Err(LinksError::Unsupported)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;

    fn temp_layout() -> (tempfile::TempDir, InstallLayout) {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = dir.path().to_str().expect("utf8 path").to_owned();
        (dir, InstallLayout::new(root))
    }

    fn table(layout: &InstallLayout, definitions: &str) -> CommandTable {
        CommandTable::parse(definitions, layout).table
    }

    #[test]
    fn creates_links_for_each_entry() {
        let (_dir, layout) = temp_layout();
        let parsed = table(&layout, "tea /usr/bin/tea\nkettle /usr/bin/kettle\n");

        let report = materialise_links(&layout, &parsed).expect("materialise");
        assert_eq!(
            report,
            LinkReport {
                created: 2,
                replaced: 0
            }
        );

        let link = layout.links_dir().join("tea");
        let pointed = fs::read_link(link.as_std_path()).expect("read link");
        assert_eq!(pointed, std::path::Path::new("/usr/bin/tea"));
    }

    #[test]
    fn rerun_replaces_existing_links() {
        let (_dir, layout) = temp_layout();

        materialise_links(&layout, &table(&layout, "tea /usr/bin/tea\n")).expect("first run");
        let report = materialise_links(&layout, &table(&layout, "tea /usr/bin/chai\n"))
            .expect("second run");
        assert_eq!(
            report,
            LinkReport {
                created: 0,
                replaced: 1
            }
        );

        let link = layout.links_dir().join("tea");
        let pointed = fs::read_link(link.as_std_path()).expect("read link");
        assert_eq!(pointed, std::path::Path::new("/usr/bin/chai"));
    }

    #[test]
    fn refuses_to_replace_regular_files() {
        let (_dir, layout) = temp_layout();
        fs::create_dir_all(layout.links_dir().as_std_path()).expect("make links dir");
        fs::write(layout.links_dir().join("tea").as_std_path(), b"not a link")
            .expect("write file");

        let error = materialise_links(&layout, &table(&layout, "tea /usr/bin/tea\n"))
            .expect_err("should refuse");
        assert!(matches!(error, LinksError::NotALink { .. }));
    }
}
