//! Hand-assembled resource fork fixtures.
//!
//! [`ForkBuilder`] lays out bytes without going through the encoder and deliberately uses a
//! different arrangement: payloads are stored in reverse order behind two bytes of padding,
//! the name list sits between the type list and the reference lists, and the map's header
//! copy is left zeroed. [`ForkBuilder::data_after_map`] additionally moves the data segment
//! behind the map. Decoding these fixtures only works if every offset is followed.

use crate::resources::ResType;

struct Fixture {
    id: i16,
    name: Option<Vec<u8>>,
    attributes: u8,
    payload: Vec<u8>,
}

struct Group {
    res_type: ResType,
    resources: Vec<Fixture>,
}

/// Builder for crafted resource fork images.
pub struct ForkBuilder {
    groups: Vec<Group>,
    app_data: [u8; 128],
    file_attributes: u16,
    data_after_map: bool,
}

impl ForkBuilder {
    pub fn new() -> Self {
        ForkBuilder {
            groups: Vec::new(),
            app_data: [0; 128],
            file_attributes: 0,
            data_after_map: false,
        }
    }

    /// Adds a resource to the last type group for `res_type`, creating one if needed.
    pub fn resource(
        mut self,
        res_type: ResType,
        id: i16,
        name: Option<&[u8]>,
        attributes: u8,
        payload: &[u8],
    ) -> Self {
        let fixture = Fixture {
            id,
            name: name.map(<[u8]>::to_vec),
            attributes,
            payload: payload.to_vec(),
        };

        match self.groups.iter().rposition(|g| g.res_type == res_type) {
            Some(position) => self.groups[position].resources.push(fixture),
            None => self.groups.push(Group {
                res_type,
                resources: vec![fixture],
            }),
        }
        self
    }

    /// Adds a type list entry with a stored count of 0xFFFF.
    pub fn empty_type(self, res_type: ResType) -> Self {
        self.split_type(res_type)
    }

    /// Starts a new type list entry for `res_type`, even if one exists already.
    pub fn split_type(mut self, res_type: ResType) -> Self {
        self.groups.push(Group {
            res_type,
            resources: Vec::new(),
        });
        self
    }

    pub fn app_data(mut self, app_data: &[u8]) -> Self {
        self.app_data[..app_data.len()].copy_from_slice(app_data);
        self
    }

    pub fn file_attributes(mut self, attributes: u16) -> Self {
        self.file_attributes = attributes;
        self
    }

    /// Places the map directly after the header and the data segment after the map.
    pub fn data_after_map(mut self) -> Self {
        self.data_after_map = true;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let resources: Vec<&Fixture> = self
            .groups
            .iter()
            .flat_map(|g| g.resources.iter())
            .collect();

        let mut data = vec![0xEE, 0xEE];
        let mut data_offsets = vec![0u32; resources.len()];
        for (index, fixture) in resources.iter().enumerate().rev() {
            data_offsets[index] = data.len() as u32;
            data.extend_from_slice(&(fixture.payload.len() as u32).to_be_bytes());
            data.extend_from_slice(&fixture.payload);
        }

        let mut names = Vec::new();
        let mut name_offsets = vec![0xFFFF_u16; resources.len()];
        for (index, fixture) in resources.iter().enumerate() {
            if let Some(name) = &fixture.name {
                name_offsets[index] = names.len() as u16;
                names.push(name.len() as u8);
                names.extend_from_slice(name);
            }
        }

        let type_list_len = 2 + 8 * self.groups.len();
        let name_list_offset = 28 + type_list_len;

        let mut map = vec![0u8; 22];
        map.extend_from_slice(&self.file_attributes.to_be_bytes());
        map.extend_from_slice(&28_u16.to_be_bytes());
        map.extend_from_slice(&(name_list_offset as u16).to_be_bytes());

        map.extend_from_slice(&(self.groups.len() as u16).wrapping_sub(1).to_be_bytes());
        let mut ref_list_offset = type_list_len + names.len();
        for group in &self.groups {
            map.extend_from_slice(&group.res_type.as_u32().to_be_bytes());
            map.extend_from_slice(&(group.resources.len() as u16).wrapping_sub(1).to_be_bytes());
            map.extend_from_slice(&(ref_list_offset as u16).to_be_bytes());
            ref_list_offset += 12 * group.resources.len();
        }

        map.extend_from_slice(&names);

        for (index, fixture) in resources.iter().enumerate() {
            let word = (u32::from(fixture.attributes) << 24) | data_offsets[index];
            map.extend_from_slice(&fixture.id.to_be_bytes());
            map.extend_from_slice(&name_offsets[index].to_be_bytes());
            map.extend_from_slice(&word.to_be_bytes());
            map.extend_from_slice(&0_u32.to_be_bytes());
        }

        let (data_offset, map_offset) = if self.data_after_map {
            (256 + map.len() as u32, 256)
        } else {
            (256, 256 + data.len() as u32)
        };

        let mut output = vec![0u8; 256];
        output[0..4].copy_from_slice(&data_offset.to_be_bytes());
        output[4..8].copy_from_slice(&map_offset.to_be_bytes());
        output[8..12].copy_from_slice(&(data.len() as u32).to_be_bytes());
        output[12..16].copy_from_slice(&(map.len() as u32).to_be_bytes());
        output[128..].copy_from_slice(&self.app_data);

        if self.data_after_map {
            output.extend_from_slice(&map);
            output.extend_from_slice(&data);
        } else {
            output.extend_from_slice(&data);
            output.extend_from_slice(&map);
        }
        output
    }
}
