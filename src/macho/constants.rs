//! Mach-O constants shared by the record decoders.

/// Category under which all Mach-O and dyld cache structures are grouped.
pub const DATA_TYPE_CATEGORY: &str = "/MachO";
