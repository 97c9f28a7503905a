/// Platform gate for the restricted command subset.
use std::panic;
use std::path::Path;

use once_cell::sync::Lazy;

/// Tool whose presence marks a usable macOS userland.
const SYSTEM_VERSION_TOOL: &str = "/usr/bin/sw_vers";

static RESTRICTED_PLATFORM: Lazy<bool> = Lazy::new(|| {
    let available = panic::catch_unwind(|| {
        detect(std::env::consts::OS, Path::new(SYSTEM_VERSION_TOOL))
    })
    .unwrap_or(false);
    tracing::debug!(available, "platform gate evaluated");
    available
});

/// Whether the platform-restricted commands can run on this host.
///
/// Evaluated on first call and cached for the rest of the process.
#[must_use]
pub fn restricted_platform_available() -> bool {
    *RESTRICTED_PLATFORM
}

/// Gate predicate. Any doubt about the host answers `false`.
fn detect(os: &str, tool: &Path) -> bool {
    os == "macos" && tool.metadata().is_ok_and(|meta| meta.is_file())
}
