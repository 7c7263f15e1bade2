//! Installation layout shared by the daemon and the setup tooling.
//!
//! Both binaries derive every path from the single `GANTRY_HOME` root so the
//! link-setup tool writes exactly where the daemon and the pad-side scripts
//! expect to read.

use std::env;
use std::ffi::OsString;

use camino::{Utf8Path, Utf8PathBuf};

use crate::ConfigError;

/// Canonical paths inside a gantry installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    root: Utf8PathBuf,
}

impl InstallLayout {
    /// Builds a layout rooted at the given directory.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Builds a layout from the `GANTRY_HOME` environment variable.
    ///
    /// # Errors
    ///
    /// See [`InstallLayout::from_home`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_home(env::var_os(crate::HOME_ENV))
    }

    /// Builds a layout from an optional `GANTRY_HOME` value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingHome`] when the value is absent and
    /// [`ConfigError::NonUtf8Home`] when it cannot be represented as UTF-8.
    pub fn from_home(home: Option<OsString>) -> Result<Self, ConfigError> {
        let Some(raw) = home else {
            return Err(ConfigError::MissingHome);
        };
        match raw.into_string() {
            Ok(root) => Ok(Self::new(root)),
            Err(raw_value) => Err(ConfigError::NonUtf8Home {
                value: raw_value.to_string_lossy().into_owned(),
            }),
        }
    }

    /// Installation root directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        self.root.as_path()
    }

    /// Definitions file listing `<name> <relative-path>` command entries.
    #[must_use]
    pub fn commands_file(&self) -> Utf8PathBuf {
        self.root.join("commands")
    }

    /// Directory of materialised command links.
    #[must_use]
    pub fn links_dir(&self) -> Utf8PathBuf {
        self.root.join("links")
    }

    /// Directory of named program files served by the dual form.
    #[must_use]
    pub fn programs_dir(&self) -> Utf8PathBuf {
        self.root.join("programs")
    }

    /// Resolves a definitions-file relative path against the root.
    ///
    /// Absolute entries are kept as written, matching how the original
    /// definitions mixed installation-relative and system paths.
    #[must_use]
    pub fn resolve(&self, relative: &Utf8Path) -> Utf8PathBuf {
        self.root.join(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_paths_from_root() {
        let layout = InstallLayout::new("/srv/gantry");
        assert_eq!(layout.commands_file(), "/srv/gantry/commands");
        assert_eq!(layout.links_dir(), "/srv/gantry/links");
        assert_eq!(layout.programs_dir(), "/srv/gantry/programs");
    }

    #[test]
    fn resolve_keeps_absolute_entries() {
        let layout = InstallLayout::new("/srv/gantry");
        assert_eq!(layout.resolve(Utf8Path::new("/bin/true")), "/bin/true");
        assert_eq!(
            layout.resolve(Utf8Path::new("bin/ec_cmd")),
            "/srv/gantry/bin/ec_cmd"
        );
    }

    #[test]
    fn missing_home_reports_missing() {
        let error = InstallLayout::from_home(None).expect_err("should fail");
        assert!(matches!(error, ConfigError::MissingHome));
    }
}
