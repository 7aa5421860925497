use std::ffi::OsStr;
use std::process::{Command, Stdio};

use crate::error::{Result, TocError};

/// Runs `bin` to completion and returns its standard output.
///
/// A spawn failure or a non-zero exit is reported as a conversion error
/// carrying the tool's stderr.
pub(crate) fn run_capture<I, S>(bin: &str, args: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(bin);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    tracing::debug!(bin, "spawn external tool");
    let output = cmd
        .output()
        .map_err(|err| TocError::Conversion(format!("spawn {bin}: {err}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(TocError::Conversion(format!(
            "{bin} failed ({}): {}",
            output.status,
            stderr.trim()
        )));
    }

    String::from_utf8(output.stdout)
        .map_err(|err| TocError::Conversion(format!("{bin} output is not UTF-8: {err}")))
}
