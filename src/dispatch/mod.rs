/// Command registration and dispatch: registry, platform gate, root dispatcher, exit hooks.
pub mod errors;
pub mod gate;
pub mod hooks;
pub mod registry;
pub mod root;
pub mod suggest;
pub mod unit;

pub use errors::CliError;
pub use gate::restricted_platform_available;
pub use hooks::ExitHooks;
pub use registry::{CommandRegistry, UnitCtor};
pub use root::Dispatcher;
pub use suggest::suggest;
pub use unit::{CommandUnit, InvocationContext};
