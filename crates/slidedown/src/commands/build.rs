//! `slidedown build` command implementation.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use slidedown_config::{CliSettings, Config};
use slidedown_renderer::{
    CompileOutput, Compiler, HtmlDocument, HtmlTemplates, Parser, ParserOptions,
};

use crate::error::CliError;
use crate::output::Output;

/// Asset subdirectories copied next to the generated page.
const ASSET_DIRS: [&str; 4] = ["css", "js", "images", "logos"];

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Source deck (overrides config).
    input: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover slidedown.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Assets directory with html/ templates and runtime files (overrides config).
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Fail the build if compilation produced warnings.
    #[arg(long)]
    strict: bool,

    /// Treat any `.name{` as a directive, registered or not.
    #[arg(long)]
    no_validate: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, parsing or writing output fails,
    /// or if strict mode is on and compilation produced warnings.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source: self.input,
            output_dir: self.output_dir,
            assets_dir: self.assets,
            validate_directives: self.no_validate.then_some(false),
            strict: self.strict.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!(
            "Source: {}",
            config.build_resolved.source.display()
        ));
        output.info(&format!(
            "Output: {}",
            config.build_resolved.output_dir.display()
        ));

        let report = build_deck(&config)?;

        for warning in &report.warnings {
            output.warning(&format!("Warning: {warning}"));
        }
        if config.compile.strict && !report.warnings.is_empty() {
            return Err(CliError::Strict(format!(
                "Build failed: {} warning(s) in strict mode",
                report.warnings.len()
            )));
        }

        output.success(&format!(
            "Built {} slide(s) to {}",
            report.slide_count,
            config.build_resolved.output_file().display()
        ));
        Ok(())
    }
}

/// Parse, compile and write one deck as configured.
///
/// In strict mode nothing is written when compilation produced warnings.
fn build_deck(config: &Config) -> Result<CompileOutput, CliError> {
    let build = &config.build_resolved;
    let source = fs::read_to_string(&build.source).map_err(|source| CliError::Read {
        path: build.source.clone(),
        source,
    })?;

    let document = Parser::new()
        .with_options(ParserOptions {
            validate_directives: config.parser.validate_directives,
        })
        .parse(&source)?;
    let compiled = Compiler::new().compile(&document);

    tracing::info!(
        slides = compiled.slide_count,
        warnings = compiled.warnings.len(),
        "Compiled deck"
    );

    if config.compile.strict && !compiled.warnings.is_empty() {
        return Ok(compiled);
    }

    fs::create_dir_all(&build.output_dir)?;
    let page = HtmlDocument::new(&compiled.html, compiled.slide_count)
        .with_templates(HtmlTemplates::load(&build.assets_dir))
        .render();
    fs::write(build.output_file(), page)?;

    for name in ASSET_DIRS {
        let src = build.assets_dir.join(name);
        if src.is_dir() {
            copy_dir(&src, &build.output_dir.join(name))?;
            tracing::debug!(dir = name, "Copied assets");
        }
    }

    Ok(compiled)
}

/// Recursively copy a directory, overwriting existing files.
fn copy_dir(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(dir: &Path, deck: &str, extra: &str) -> Config {
        fs::write(dir.join("slides.sd"), deck).unwrap();
        fs::write(dir.join("slidedown.toml"), extra).unwrap();
        Config::load(Some(&dir.join("slidedown.toml")), None).unwrap()
    }

    #[test]
    fn test_build_writes_page_and_assets() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("assets/html")).unwrap();
        fs::create_dir_all(dir.path().join("assets/js/vendor")).unwrap();
        fs::write(dir.path().join("assets/html/head.html"), "<head>deck</head>").unwrap();
        fs::write(dir.path().join("assets/js/slidedown.js"), "// runtime").unwrap();
        fs::write(dir.path().join("assets/js/vendor/lib.js"), "// lib").unwrap();
        let config = project(dir.path(), ".slide{.title{A}} .slide{.title{B}}", "");

        let compiled = build_deck(&config).unwrap();

        assert_eq!(compiled.slide_count, 2);
        let page = fs::read_to_string(dir.path().join("html/index.html")).unwrap();
        assert!(page.contains("<head>deck</head>"));
        assert!(page.contains(r#"id="numberOfSlides" style="display: none;">2</div>"#));
        assert!(dir.path().join("html/js/slidedown.js").exists());
        assert!(dir.path().join("html/js/vendor/lib.js").exists());
    }

    #[test]
    fn test_build_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("slidedown.toml"), "").unwrap();
        let config = Config::load(Some(&dir.path().join("slidedown.toml")), None).unwrap();

        let err = build_deck(&config).unwrap_err();

        assert!(matches!(err, CliError::Read { .. }));
        assert!(err.to_string().contains("slides.sd"));
    }

    #[test]
    fn test_build_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = project(dir.path(), ".slide{unclosed", "");

        let err = build_deck(&config).unwrap_err();

        assert!(matches!(err, CliError::Parse(_)));
        assert!(!dir.path().join("html/index.html").exists());
    }

    #[test]
    fn test_strict_build_writes_nothing_on_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let config = project(
            dir.path(),
            ".code{.syntax{bad\"lang}\nx\n}",
            "[compile]\nstrict = true\n",
        );

        let compiled = build_deck(&config).unwrap();

        assert_eq!(compiled.warnings.len(), 1);
        assert!(!dir.path().join("html/index.html").exists());
    }

    #[test]
    fn test_non_strict_build_keeps_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let config = project(dir.path(), ".code{.syntax{bad\"lang}\nx\n}", "");

        let compiled = build_deck(&config).unwrap();

        assert_eq!(compiled.warnings.len(), 1);
        assert!(dir.path().join("html/index.html").exists());
    }
}
