use caselog_config::Config;

/// Strategy for initializing the configuration file.
///
/// Creates the default configuration at `~/caselog/config.json`.
#[derive(Debug, Clone, Copy)]
pub struct InitStrategy;

impl super::CommandStrategy for InitStrategy {
    type Input = ();

    fn execute(&self, (): Self::Input) -> anyhow::Result<()> {
        let path = Config::create_config()?;
        println!("Created config file at: {}", path.display());
        println!("Edit it to override column names or engine thresholds.");
        Ok(())
    }
}
