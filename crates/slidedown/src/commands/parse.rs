//! `slidedown parse` command implementation.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use slidedown_renderer::{Content, Node, Parser, ParserOptions, Segment};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the parse command.
#[derive(Args)]
pub(crate) struct ParseArgs {
    /// Source deck to parse.
    input: PathBuf,

    /// Print the tree as JSON.
    #[arg(long)]
    json: bool,

    /// Treat any `.name{` as a directive, registered or not.
    #[arg(long)]
    no_validate: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ParseArgs {
    /// Execute the parse command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let source = fs::read_to_string(&self.input).map_err(|source| CliError::Read {
            path: self.input.clone(),
            source,
        })?;

        let document = Parser::new()
            .with_options(ParserOptions {
                validate_directives: !self.no_validate,
            })
            .parse(&source)?;

        if self.json {
            output.result(&serde_json::to_string_pretty(&document)?)?;
            return Ok(());
        }

        let mut lines = Vec::new();
        for node in document.nodes() {
            outline(node, 0, &mut lines);
        }
        for line in lines {
            output.result(&line)?;
        }
        Ok(())
    }
}

/// Indented outline of a node and its subtree.
fn outline(node: &Node, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    lines.push(format!("{indent}.{} (line {})", node.directive(), node.line()));
    for (name, value) in node.modifiers() {
        lines.push(format!("{indent}  {name}: {value:?}"));
    }
    if !node.content().is_empty() {
        lines.push(format!("{indent}  content: {:?}", describe(node.content())));
    }
    for child in node.children() {
        outline(child, depth + 1, lines);
    }
}

/// Content with placeholders spelled out.
fn describe(content: &Content) -> String {
    content
        .segments()
        .iter()
        .map(|segment| match segment {
            Segment::Text(text) => text.clone(),
            Segment::Child(index) => format!("[child {index}]"),
            Segment::RawBlock(id) => format!("[code {id}]"),
            Segment::Escape(id) => format!("[escape {id}]"),
            Segment::LineBreak => "[br]".to_owned(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_outline() {
        let document = Parser::new()
            .parse(".slide{.style{color: red} Hi .bf{there}\\\\}")
            .unwrap();
        let mut lines = Vec::new();
        outline(&document.nodes()[0], 0, &mut lines);

        assert_eq!(
            lines,
            [
                ".slide (line 1)",
                "  style: \"color: red\"",
                "  content: \"Hi [child 0][br]\"",
                "  .bf (line 1)",
                "    content: \"there\"",
            ]
        );
    }

    #[test]
    fn test_describe_placeholders() {
        let document = Parser::new()
            .parse(r".tt{\.bf{x} .code{.syntax{c} y}}")
            .unwrap();
        let tt = &document.nodes()[0];

        assert_eq!(describe(tt.content()), "[escape 0] [child 0]");
        assert_eq!(describe(tt.children()[0].content()), "[code 0]");
    }
}
