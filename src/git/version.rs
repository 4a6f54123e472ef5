use crate::error::{GitError, GitResult};
use std::path::Path;
use std::process::Command;

/// Minimum required git version
const MIN_GIT_VERSION: (u32, u32) = (2, 20);

/// Represents a git version
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct GitVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl GitVersion {
    /// Detect the version of `git` found on PATH
    pub fn detect() -> GitResult<Self> {
        Self::detect_with("git")
    }

    /// Detect the version of a specific git executable
    pub fn detect_with<P: AsRef<Path>>(executable: P) -> GitResult<Self> {
        let executable = executable.as_ref();
        let output = Command::new(executable)
            .arg("--version")
            .output()
            .map_err(|e| {
                GitError::GitVersionDetectionFailed(format!(
                    "Failed to execute {}: {}",
                    executable.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            return Err(GitError::GitVersionDetectionFailed(format!(
                "{} --version command failed",
                executable.display()
            )));
        }

        let version_string = String::from_utf8_lossy(&output.stdout);
        Self::parse(&version_string)
    }

    /// Parse `git --version` output such as "git version 2.39.2"
    ///
    /// Vendor suffixes ("2.39.2.windows.1", "2.39.3 (Apple Git-145)") are
    /// ignored and a missing patch level reads as 0.
    pub fn parse(version_str: &str) -> GitResult<Self> {
        let number = version_str
            .trim()
            .strip_prefix("git version ")
            .and_then(|rest| rest.split_whitespace().next())
            .ok_or_else(|| {
                GitError::ParseError(format!("Unexpected git version format: {}", version_str))
            })?;

        let mut fields = number.split('.');
        let mut component = |label: &str| -> GitResult<u32> {
            let field = fields.next().unwrap_or_default();
            field.parse::<u32>().map_err(|_| {
                GitError::ParseError(format!("Invalid {} version: '{}'", label, field))
            })
        };

        let major = component("major")?;
        let minor = component("minor")?;
        let patch = component("patch").unwrap_or(0);

        Ok(GitVersion {
            major,
            minor,
            patch,
        })
    }

    /// Check if this version meets minimum requirements
    pub fn is_supported(&self) -> bool {
        self.major > MIN_GIT_VERSION.0
            || (self.major == MIN_GIT_VERSION.0 && self.minor >= MIN_GIT_VERSION.1)
    }

    /// Validate that the git on PATH is recent enough
    pub fn validate() -> GitResult<Self> {
        Self::validate_with("git")
    }

    /// Validate that a specific git executable is recent enough
    pub fn validate_with<P: AsRef<Path>>(executable: P) -> GitResult<Self> {
        let version = Self::detect_with(executable)?;

        if !version.is_supported() {
            return Err(GitError::GitVersionTooOld(format!(
                "{}.{}.{}; upgrade git to version {}.{} or higher",
                version.major,
                version.minor,
                version.patch,
                MIN_GIT_VERSION.0,
                MIN_GIT_VERSION.1
            )));
        }

        Ok(version)
    }
}

impl std::fmt::Display for GitVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
