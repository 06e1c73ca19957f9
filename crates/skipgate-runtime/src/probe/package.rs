//! Package metadata and quantized-engine queries.

use std::collections::BTreeSet;

use skipgate_core::{ProbeError, Version};

/// Prints the installed distribution version of `sys.argv[1]`.
pub const VERSION_SNIPPET: &str =
    "import sys, importlib.metadata as m; print(m.version(sys.argv[1]))";

/// Prints the quantized engines `sys.argv[1]` can select, comma separated.
pub const ENGINES_SNIPPET: &str = "import sys, importlib; \
     q = importlib.import_module(sys.argv[1]).backends.quantized; \
     print(','.join(q.supported_engines))";

/// Parse the version a probe reported for `package`.
pub fn parse_reported_version(package: &str, reported: &str) -> Result<Version, ProbeError> {
    Version::parse_installed(reported).map_err(|source| ProbeError::VersionParseFailed {
        package: package.to_string(),
        source,
    })
}

/// Split a comma- or whitespace-separated engine list.
pub fn parse_engine_list(value: &str) -> BTreeSet<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|engine| !engine.is_empty())
        .map(str::to_string)
        .collect()
}
