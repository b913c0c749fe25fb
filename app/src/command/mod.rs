//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy with its own input type, dispatched
//! statically from `main`. The pipeline is synchronous end to end, so the
//! strategies are too.

mod convert;
mod init;
mod template;
mod version;

pub use convert::{ConvertInput, ConvertStrategy};
pub use init::InitStrategy;
pub use template::TemplateStrategy;
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
pub trait CommandStrategy {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}
