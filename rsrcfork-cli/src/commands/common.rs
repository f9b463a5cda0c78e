use std::path::Path;

use anyhow::Context;
use rsrcfork::{RefNum, RegistryConfig, ResType, ResourceAttributes, ResourceFileRegistry};

/// Opens `path` in a fresh registry built from `config`.
pub fn open_file(
    path: &Path,
    config: RegistryConfig,
) -> anyhow::Result<(ResourceFileRegistry, RefNum)> {
    let mut registry = ResourceFileRegistry::with_config(config);
    let ref_num = registry
        .open(path)
        .with_context(|| format!("failed to open resource file: {}", path.display()))?;
    Ok((registry, ref_num))
}

/// Parses a four-character type code given on the command line.
pub fn parse_type(code: &str) -> anyhow::Result<ResType> {
    code.parse()
        .with_context(|| format!("invalid resource type '{code}', expected four characters"))
}

/// Names the set attribute flags; bits without a name are shown in hex.
pub fn attribute_names(attributes: ResourceAttributes) -> Vec<String> {
    let mut names = Vec::new();
    let mut known = 0_u8;
    for (name, flag) in attributes.iter_names() {
        names.push(name.to_lowercase());
        known |= flag.bits();
    }

    let unknown = attributes.bits() & !known;
    if unknown != 0 {
        names.push(format!("{unknown:#04x}"));
    }
    names
}

/// Extract a display-friendly filename from a path.
pub fn file_display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    )
}
