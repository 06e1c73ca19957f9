//! Command execution helpers for probing.

use std::process::Command;

use skipgate_core::ProbeError;

/// Run `cmd` with `args` and return its trimmed stdout.
///
/// A non-zero exit is an error carrying the last non-empty stderr line,
/// which is where Python puts the exception message.
pub fn run_command(cmd: &str, args: &[&str]) -> Result<String, ProbeError> {
    let output = Command::new(cmd)
        .args(args)
        .output()
        .map_err(|e| ProbeError::CommandFailed(format!("{cmd}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = last_line(&stderr).unwrap_or("no error output");
        return Err(ProbeError::CommandFailed(format!(
            "{cmd} exited with {}: {detail}",
            output.status
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Run a one-line Python snippet; `args` land in `sys.argv[1..]`.
pub fn run_python(python: &str, snippet: &str, args: &[&str]) -> Result<String, ProbeError> {
    let mut full = vec!["-c", snippet];
    full.extend_from_slice(args);
    run_command(python, &full)
}

fn last_line(text: &str) -> Option<&str> {
    text.lines().rev().map(str::trim).find(|l| !l.is_empty())
}
