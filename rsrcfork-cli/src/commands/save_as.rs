use std::path::Path;

use anyhow::Context;
use rsrcfork::RegistryConfig;

use crate::commands::common::open_file;

pub fn run(path: &Path, output: &Path) -> anyhow::Result<()> {
    let (mut registry, ref_num) = open_file(path, RegistryConfig::strict())?;

    registry
        .redirect(ref_num, output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    registry
        .update(ref_num)
        .with_context(|| format!("failed to write {}", output.display()))?;
    registry.close(ref_num)?;

    println!("{} -> {}", path.display(), output.display());
    Ok(())
}
