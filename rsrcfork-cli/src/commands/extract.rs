use std::{io::Write, path::Path};

use anyhow::{bail, Context};
use rsrcfork::RegistryConfig;

use crate::commands::common::{open_file, parse_type};

/// Which resource of the type to extract.
pub enum Selector {
    Id(i16),
    Name(String),
}

impl Selector {
    pub fn new(id: Option<i16>, name: Option<&str>) -> anyhow::Result<Self> {
        match (id, name) {
            (Some(id), None) => Ok(Selector::Id(id)),
            (None, Some(name)) => Ok(Selector::Name(name.to_string())),
            _ => bail!("exactly one of --id or --name is required"),
        }
    }
}

pub fn run(
    path: &Path,
    type_code: &str,
    selector: Selector,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let res_type = parse_type(type_code)?;
    let (registry, ref_num) = open_file(path, RegistryConfig::read_only())?;

    let payload = match &selector {
        Selector::Id(id) => registry.get_resource_in(ref_num, res_type, *id)?,
        Selector::Name(name) => registry.get_named_resource_in(ref_num, res_type, name)?,
    };
    let data = registry.payload(payload)?;

    match output {
        Some(dest) => {
            std::fs::write(dest, data)
                .with_context(|| format!("failed to write resource to {}", dest.display()))?;
            eprintln!("extracted {} bytes -> {}", data.len(), dest.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(data)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
