/// Ordered command registry.
use super::errors::CliError;
use super::unit::CommandUnit;

/// Constructor for a command unit, used in capability tables.
pub type UnitCtor = fn() -> Box<dyn CommandUnit>;

/// Ordered collection of command units, looked up by exact name.
///
/// Registration order is listing order in generated help.
#[derive(Default)]
pub struct CommandRegistry {
    units: Vec<Box<dyn CommandUnit>>,
}

impl CommandRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from the always-available table, then the
    /// platform-restricted table when `gate` is true.
    ///
    /// # Errors
    ///
    /// Returns `CliError::DuplicateCommand` if two constructors yield the same name.
    pub fn populate(
        always: &[UnitCtor],
        restricted: &[UnitCtor],
        gate: bool,
    ) -> Result<Self, CliError> {
        let mut registry = Self::new();
        for ctor in always {
            registry.register(ctor())?;
        }
        if gate {
            for ctor in restricted {
                registry.register(ctor())?;
            }
        }
        tracing::debug!(
            commands = registry.len(),
            restricted = gate,
            "command registry populated"
        );
        Ok(registry)
    }

    /// Append a unit.
    ///
    /// # Errors
    ///
    /// Returns `CliError::DuplicateCommand` if the name is already present.
    pub fn register(&mut self, unit: Box<dyn CommandUnit>) -> Result<(), CliError> {
        if self.get(unit.name()).is_some() {
            return Err(CliError::DuplicateCommand {
                name: unit.name().to_owned(),
            });
        }
        self.units.push(unit);
        Ok(())
    }

    /// All units in registration order.
    pub fn all(&self) -> impl Iterator<Item = &dyn CommandUnit> {
        self.units.iter().map(|unit| unit.as_ref() as &dyn CommandUnit)
    }

    /// Look up a unit by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn CommandUnit> {
        self.all().find(|unit| unit.name() == name)
    }

    /// Registered names in order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.all().map(CommandUnit::name).collect()
    }

    /// Number of registered units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
