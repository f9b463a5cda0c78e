use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Per-resource attribute byte, stored in the top byte of the reference-list word.
    ///
    /// Bits without a name (0x01, 0x80) are kept as read and written back unchanged.
    pub struct ResourceAttributes : u8 {
        /// Load into the system heap instead of the application heap
        const SYS_HEAP = 0x40;
        /// May be purged from memory when space is needed
        const PURGEABLE = 0x20;
        /// Must not be moved in memory
        const LOCKED = 0x10;
        /// Must not be changed or removed
        const PROTECTED = 0x08;
        /// Read in when the file is opened
        const PRELOAD = 0x04;
        /// Modified since the file was opened or last updated
        const CHANGED = 0x02;

        const _ = !0;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Attributes of a whole resource map, stored after the map's reserved prefix.
    pub struct FileAttributes : u16 {
        /// The map must not be written back
        const READ_ONLY = 0x0080;
        /// Compaction is needed on update
        const COMPACT = 0x0040;
        /// Some entry or the map itself changed
        const CHANGED = 0x0020;

        const _ = !0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_bits_retained() {
        let attrs = ResourceAttributes::from_bits_retain(0x81 | 0x20);
        assert!(attrs.contains(ResourceAttributes::PURGEABLE));
        assert_eq!(attrs.bits(), 0xA1);

        let cleared = attrs - ResourceAttributes::CHANGED;
        assert_eq!(cleared.bits(), 0xA1);

        let file = FileAttributes::from_bits_retain(0x0101);
        assert!(!file.contains(FileAttributes::READ_ONLY));
        assert_eq!((file | FileAttributes::CHANGED).bits(), 0x0121);
    }
}
