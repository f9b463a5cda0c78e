use std::path::Path;

use rsrcfork::{FileAttributes, RegistryConfig};
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::{file_display_name, open_file},
    output::{print_output, quoted_type, Align, TabWriter},
};

#[derive(Debug, Serialize)]
pub struct FileInfo {
    pub file: String,
    pub size: u64,
    pub attributes: Vec<String>,
    pub type_count: usize,
    pub resource_count: usize,
    pub types: Vec<TypeSummary>,
}

#[derive(Debug, Serialize)]
pub struct TypeSummary {
    pub res_type: String,
    pub count: usize,
    pub bytes: usize,
}

pub fn run(path: &Path, opts: &GlobalOptions) -> anyhow::Result<()> {
    let (registry, ref_num) = open_file(path, RegistryConfig::read_only())?;
    let map = registry.resource_map(ref_num)?;

    let mut types = Vec::with_capacity(map.count_types());
    for entry in &map.types {
        let mut bytes = 0;
        for resource in &entry.entries {
            bytes += registry.store().size_of(resource.payload)?;
        }
        types.push(TypeSummary {
            res_type: entry.res_type.to_string(),
            count: entry.entries.len(),
            bytes,
        });
    }

    let info = FileInfo {
        file: file_display_name(path),
        size: std::fs::metadata(path)?.len(),
        attributes: file_attribute_names(map.attributes),
        type_count: map.count_types(),
        resource_count: map.resource_count(),
        types,
    };

    print_output(&info, opts, |info| {
        println!("File:        {}", info.file);
        println!("Size:        {} bytes", info.size);
        if !info.attributes.is_empty() {
            println!("Attributes:  {}", info.attributes.join(", "));
        }
        println!("Types:       {}", info.type_count);
        println!("Resources:   {}", info.resource_count);

        if !info.types.is_empty() {
            println!();
            let mut tw = TabWriter::new(&[
                ("Type", Align::Left),
                ("Count", Align::Right),
                ("Bytes", Align::Right),
            ])
            .indent("  ");
            for t in &info.types {
                tw.row(vec![
                    quoted_type(&t.res_type),
                    t.count.to_string(),
                    t.bytes.to_string(),
                ]);
            }
            tw.print();
        }
    })
}

fn file_attribute_names(attributes: FileAttributes) -> Vec<String> {
    attributes
        .iter_names()
        .map(|(name, _)| name.to_lowercase())
        .collect()
}
