//! Removal of the `com.apple.provenance` extended attribute through the
//! system `xattr` tool.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use log::{debug, error, warn};

pub const PROVENANCE_ATTRIBUTE: &str = "com.apple.provenance";

const DEFAULT_PROGRAM: &str = "xattr";

/// How a successful [`remove_provenance`] call got there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// `xattr -d` exited 0.
    Removed,
    /// `xattr -d` failed, `xattr -c` exited 0.
    Cleared,
    /// `xattr -d` failed and `xattr -c` ran but did not exit 0.
    ClearFailed { code: Option<i32> },
}

impl Removal {
    pub fn is_strict_success(&self) -> bool {
        !matches!(self, Removal::ClearFailed { .. })
    }
}

pub struct XattrTool {
    program: PathBuf,
}

impl Default for XattrTool {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl XattrTool {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Runs `xattr -d <name> <path>`.
    pub fn delete<P: AsRef<Path>>(&self, path: P, name: &str) -> std::io::Result<ExitStatus> {
        let path = path.as_ref();
        self.run(&[OsStr::new("-d"), OsStr::new(name), path.as_os_str()])
    }

    /// Runs `xattr -c <path>`.
    pub fn clear<P: AsRef<Path>>(&self, path: P) -> std::io::Result<ExitStatus> {
        let path = path.as_ref();
        self.run(&[OsStr::new("-c"), path.as_os_str()])
    }

    fn run(&self, args: &[&OsStr]) -> std::io::Result<ExitStatus> {
        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!(
                "'{}' {:?} exited with {}: {}",
                self.program.display(),
                args,
                output.status,
                stderr.trim_end()
            );
        }
        Ok(output.status)
    }
}

/// Deletes the provenance attribute from `path`, clearing every attribute
/// when the targeted delete fails.
///
/// The clear-all fallback counts as success whatever its exit status;
/// a failed clear is reported as [`Removal::ClearFailed`].
pub fn remove_provenance<P: AsRef<Path>>(tool: &XattrTool, path: P) -> Result<Removal, ()> {
    let path = path.as_ref();
    let report = |e: std::io::Error| {
        error!("Error removing provenance from {}: {}", path.display(), e);
    };

    let status = tool.delete(path, PROVENANCE_ATTRIBUTE).map_err(report)?;
    if status.success() {
        return Ok(Removal::Removed);
    }
    debug!(
        "targeted delete on '{}' failed ({}), clearing all attributes",
        path.display(),
        status
    );

    let status = tool.clear(path).map_err(report)?;
    if status.success() {
        return Ok(Removal::Cleared);
    }
    warn!(
        "clearing attributes of '{}' exited with {}",
        path.display(),
        status
    );
    Ok(Removal::ClearFailed {
        code: status.code(),
    })
}
