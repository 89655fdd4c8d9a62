pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::io::BufRead;

#[cfg(feature = "cli")]
use clap::Parser;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "require-bundler"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Inline require ‘<id>’ directives across a directory tree")
)]
pub struct CliConfig {
    /// Root directory; read from stdin when omitted
    #[cfg_attr(feature = "cli", arg(value_name = "ROOT"))]
    pub root: Option<String>,

    /// Write bundled files into this directory instead of overwriting in place
    #[cfg_attr(feature = "cli", arg(long))]
    pub out_dir: Option<String>,

    /// Run every check and substitution without writing anything
    #[cfg_attr(feature = "cli", arg(long))]
    pub dry_run: bool,

    /// Print the build report as JSON on stdout
    #[cfg_attr(feature = "cli", arg(long))]
    pub json: bool,

    #[cfg_attr(feature = "cli", arg(short, long, help = "Enable verbose output"))]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[cfg_attr(feature = "cli", arg(long))]
    pub log_json: bool,

    /// Log CPU and memory usage after each phase
    #[cfg_attr(feature = "cli", arg(long))]
    pub monitor: bool,
}

impl CliConfig {
    /// Fills `root` from the first line of `input` when it was not given as an argument.
    pub fn resolve_root<R: BufRead>(&mut self, mut input: R) -> Result<&str> {
        if self.root.is_none() {
            let mut line = String::new();
            input.read_line(&mut line)?;
            self.root = Some(line.trim_end_matches(['\r', '\n']).to_string());
        }
        validation::validate_required_field("root", &self.root).map(String::as_str)
    }
}

impl ConfigProvider for CliConfig {
    fn root(&self) -> &str {
        self.root.as_deref().unwrap_or_default()
    }

    fn out_dir(&self) -> Option<&str> {
        self.out_dir.as_deref()
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }

    fn monitor(&self) -> bool {
        self.monitor
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        let root = validation::validate_required_field("root", &self.root)?;
        validation::validate_path("root", root)?;
        if let Some(out_dir) = &self.out_dir {
            validation::validate_path("out_dir", out_dir)?;
            validation::validate_distinct_paths("out_dir", root, out_dir)?;
        }
        Ok(())
    }
}
