use std::path::Path;

use anyhow::Result;

use crate::commands::util::load_constants;

/// Handle `frag config`: print the effective constants.
pub fn handle(config: Option<&Path>) -> Result<()> {
    let constants = load_constants(config)?;
    print!("{}", constants.to_toml()?);
    Ok(())
}
