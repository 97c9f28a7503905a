/// Built-in command units and the capability tables they are registered from.
pub mod about;
pub mod help;
pub mod list;
pub mod reveal;
pub mod sysinfo;
pub mod version;

use crate::dispatch::{CliError, CommandRegistry, UnitCtor};

/// Units available on every platform, in listing order.
pub const ALWAYS_AVAILABLE: &[UnitCtor] = &[about::unit, list::unit, help::unit, version::unit];

/// Units that need macOS userland tools, in listing order.
pub const PLATFORM_RESTRICTED: &[UnitCtor] = &[reveal::unit, sysinfo::unit];

/// Build the registry for this process.
///
/// # Errors
///
/// Returns `CliError::DuplicateCommand` if two built-ins share a name.
pub fn build_registry(gate: bool) -> Result<CommandRegistry, CliError> {
    CommandRegistry::populate(ALWAYS_AVAILABLE, PLATFORM_RESTRICTED, gate)
}

/// Whether `name` belongs to the platform-restricted table.
#[must_use]
pub fn is_restricted(name: &str) -> bool {
    PLATFORM_RESTRICTED.iter().any(|ctor| ctor().name() == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let registry = build_registry(true).unwrap();
        assert_eq!(
            registry.names(),
            vec!["about", "commands", "help", "version", "reveal", "sysinfo"]
        );
    }

    #[test]
    fn test_gate_toggle_keeps_always_available() {
        let open = build_registry(true).unwrap();
        let closed = build_registry(false).unwrap();
        assert_eq!(closed.names(), vec!["about", "commands", "help", "version"]);
        assert_eq!(&open.names()[..closed.len()], closed.names().as_slice());
        assert!(is_restricted("sysinfo"));
        assert!(!is_restricted("help"));
    }

    #[test]
    fn verify_unit_commands() {
        let registry = build_registry(true).unwrap();
        for unit in registry.all() {
            unit.command().debug_assert();
        }
    }
}
