//! # Import Command Implementation
//!
//! Merges another mgconfig document into the registry. The document is read
//! from a file, or from stdin when the argument is `-`. `$HOME` in its paths is
//! expanded before merging so they compare equal to the registry's own paths.
//!
//! Repositories already tracked are skipped and counted. The outcome is printed
//! and the registry saved.

use anyhow::Result;
use clap::Args;
use std::fs;
use std::io::{self, Read};

use mg::config::ConfigEnv;
use mg::registry::Registry;

/// Merge another mgconfig document into the registry
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// The document to import, or `-` to read from stdin.
    #[arg(value_name = "FILE")]
    pub source: String,
}

/// Execute the `import` command.
pub fn execute(args: ImportArgs) -> Result<()> {
    let env = ConfigEnv::from_process();
    let mut registry = super::load_registry(&env)?;

    let bytes = read_source(&args.source)?;
    let mut incoming = Registry::from_json(&bytes)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", describe(&args.source), e))?;
    if let Some(home) = &env.home {
        incoming.expand_paths_with(home);
    }

    let outcome = registry.merge(incoming)?;
    println!("{}", outcome);

    super::save_registry(&registry, &env)?;
    Ok(())
}

fn read_source(source: &str) -> Result<Vec<u8>> {
    if source == "-" {
        let mut bytes = Vec::new();
        io::stdin()
            .read_to_end(&mut bytes)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        Ok(bytes)
    } else {
        fs::read(source).map_err(|e| anyhow::anyhow!("Failed to read {}: {}", source, e))
    }
}

fn describe(source: &str) -> &str {
    if source == "-" {
        "stdin"
    } else {
        source
    }
}
