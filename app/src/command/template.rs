use std::path::PathBuf;

use caselog_io::generate_import_template;

/// Strategy for writing a template of the form-client JSON format.
#[derive(Debug, Clone, Copy)]
pub struct TemplateStrategy;

impl super::CommandStrategy for TemplateStrategy {
    type Input = PathBuf;

    fn execute(&self, output: Self::Input) -> anyhow::Result<()> {
        generate_import_template(&output)?;
        println!("Template written to {}", output.display());
        Ok(())
    }
}
