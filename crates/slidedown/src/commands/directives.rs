//! `slidedown directives` command implementation.

use clap::Args;
use slidedown_renderer::{DirectiveCategory, DirectiveRegistry};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the directives command.
#[derive(Args)]
pub(crate) struct DirectivesArgs {
    /// Show usage examples.
    #[arg(short, long)]
    examples: bool,
}

impl DirectivesArgs {
    /// List the built-in directives grouped by category.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let registry = DirectiveRegistry::global();

        for category in DirectiveCategory::ALL {
            let specs: Vec<_> = registry.specs_in(category).collect();
            if specs.is_empty() {
                continue;
            }
            output.result_heading(category.label())?;
            for spec in specs {
                output.result(&format!(
                    "  .{:<12} {}",
                    spec.pattern().to_string(),
                    spec.description()
                ))?;
                if self.examples {
                    for example in spec.examples() {
                        output.result_dim(&format!("      {example}"))?;
                    }
                }
            }
        }
        Ok(())
    }
}
