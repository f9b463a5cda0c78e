use std::path::Path;

use rsrcfork::RegistryConfig;
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::{attribute_names, open_file, parse_type},
    output::{print_output, quoted_type, Align, TabWriter},
};

#[derive(Debug, Serialize)]
struct ResourceRow {
    res_type: String,
    id: i16,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    attributes: Vec<String>,
    size: usize,
}

#[derive(Debug, Serialize)]
struct ListOutput {
    resources: Vec<ResourceRow>,
    count: usize,
}

pub fn run(path: &Path, type_filter: Option<&str>, opts: &GlobalOptions) -> anyhow::Result<()> {
    let filter = type_filter.map(parse_type).transpose()?;
    let (registry, ref_num) = open_file(path, RegistryConfig::read_only())?;
    let map = registry.resource_map(ref_num)?;

    let mut resources = Vec::new();
    for (res_type, entry) in map.entries() {
        if filter.is_some_and(|wanted| wanted != res_type) {
            continue;
        }

        resources.push(ResourceRow {
            res_type: res_type.to_string(),
            id: entry.id,
            name: entry.name.as_ref().map(ToString::to_string),
            attributes: attribute_names(entry.attributes),
            size: registry.store().size_of(entry.payload)?,
        });
    }

    let output = ListOutput {
        count: resources.len(),
        resources,
    };

    print_output(&output, opts, |out| {
        let mut tw = TabWriter::new(&[
            ("Type", Align::Left),
            ("ID", Align::Right),
            ("Name", Align::Left),
            ("Attributes", Align::Left),
            ("Size", Align::Right),
        ]);
        for r in &out.resources {
            tw.row(vec![
                quoted_type(&r.res_type),
                r.id.to_string(),
                r.name.clone().unwrap_or_default(),
                r.attributes.join(","),
                r.size.to_string(),
            ]);
        }
        tw.print();
        println!("\n{} resource(s) listed.", out.count);
    })
}
