use std::path::Path;

use anyhow::Context;
use rsrcfork::RegistryConfig;

use crate::commands::common::{file_display_name, open_file};

pub fn run(path: &Path, in_place: bool) -> anyhow::Result<()> {
    let config = RegistryConfig {
        atomic_update: !in_place,
        ..RegistryConfig::strict()
    };
    let (mut registry, ref_num) = open_file(path, config)?;

    registry
        .update(ref_num)
        .with_context(|| format!("failed to rewrite {}", path.display()))?;
    let resources = registry.resource_map(ref_num)?.resource_count();
    registry.close(ref_num)?;

    println!("rewrote {} ({resources} resources)", file_display_name(path));
    Ok(())
}
