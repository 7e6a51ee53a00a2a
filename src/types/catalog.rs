//! An explicitly owned catalog of struct descriptors.

use std::collections::HashMap;

use tracing::{debug, trace};

use super::{CategoryPath, Describe, StructDescriptor};
use crate::error::{Error, Result};

/// Stores descriptors keyed by (category, name), in registration order.
///
/// The catalog belongs to whoever created it. Registering a descriptor whose
/// key already exists is a no-op when the shapes match and an error when they
/// don't.
#[derive(Debug, Default)]
pub struct TypeCatalog {
    types: Vec<StructDescriptor>,
    index: HashMap<(CategoryPath, String), usize>,
}

impl TypeCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `desc`, or returns the equivalent entry that is already present.
    ///
    /// Fails with [`Error::DuplicateName`] if a descriptor with the same
    /// category and name but a different shape exists. The catalog is not
    /// modified in that case.
    pub fn register(&mut self, desc: StructDescriptor) -> Result<&StructDescriptor> {
        let key = (desc.category().clone(), desc.name().to_owned());

        let idx = match self.index.get(&key) {
            Some(&idx) => {
                if !self.types[idx].same_shape(&desc) {
                    return Err(Error::duplicate_name(desc.name(), desc.category()));
                }
                trace!("type {} in {} already registered", key.1, key.0);
                idx
            }
            None => {
                debug!(
                    "registering type {} in {} ({} fields, {:#x} bytes)",
                    key.1,
                    key.0,
                    desc.fields().len(),
                    desc.size()
                );
                let idx = self.types.len();
                self.types.push(desc);
                self.index.insert(key, idx);
                idx
            }
        };

        Ok(&self.types[idx])
    }

    /// Registers the descriptor of `T`.
    pub fn register_type<T: Describe>(&mut self) -> Result<&StructDescriptor> {
        self.register(T::describe())
    }

    /// Looks up a descriptor by category and name.
    pub fn get(&self, category: &CategoryPath, name: &str) -> Option<&StructDescriptor> {
        self.index
            .get(&(category.clone(), name.to_owned()))
            .map(|&idx| &self.types[idx])
    }

    /// Returns true if a descriptor with this category and name is present.
    pub fn contains(&self, category: &CategoryPath, name: &str) -> bool {
        self.get(category, name).is_some()
    }

    /// Number of registered descriptors.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterates over all descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &StructDescriptor> {
        self.types.iter()
    }

    /// Iterates over descriptors in `category` or any category below it.
    pub fn in_category<'a>(
        &'a self,
        category: &'a CategoryPath,
    ) -> impl Iterator<Item = &'a StructDescriptor> {
        self.types
            .iter()
            .filter(move |desc| desc.category().is_within(category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrimitiveKind;

    fn pair(name: &str, second: PrimitiveKind) -> StructDescriptor {
        StructDescriptor::new(name)
            .add(PrimitiveKind::QWord, "address", "")
            .add(second, "size", "")
            .with_category("/MachO")
    }

    #[test]
    fn test_register_and_lookup() {
        let mut catalog = TypeCatalog::new();
        assert!(catalog.is_empty());

        catalog.register(pair("range", PrimitiveKind::QWord)).unwrap();
        let macho = CategoryPath::new("/MachO");
        assert!(catalog.contains(&macho, "range"));
        assert!(!catalog.contains(&CategoryPath::ROOT, "range"));
        assert_eq!(catalog.get(&macho, "range").unwrap().size(), 16);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_register_deduplicates_same_shape() {
        let mut catalog = TypeCatalog::new();
        catalog.register(pair("range", PrimitiveKind::QWord)).unwrap();
        catalog.register(pair("range", PrimitiveKind::QWord)).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_register_conflicting_shape() {
        let mut catalog = TypeCatalog::new();
        catalog.register(pair("range", PrimitiveKind::QWord)).unwrap();

        let err = catalog
            .register(pair("range", PrimitiveKind::DWord))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateName { ref name, ref category }
            if name == "range" && category == "/MachO"));

        // Original entry is untouched
        let macho = CategoryPath::new("/MachO");
        assert_eq!(catalog.get(&macho, "range").unwrap().size(), 16);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_same_name_in_other_category() {
        let mut catalog = TypeCatalog::new();
        catalog.register(pair("range", PrimitiveKind::QWord)).unwrap();
        catalog
            .register(pair("range", PrimitiveKind::DWord).with_category("/ELF"))
            .unwrap();
        assert_eq!(catalog.len(), 2);

        let macho = CategoryPath::new("/MachO");
        let names: Vec<&str> = catalog.in_category(&macho).map(|d| d.name()).collect();
        assert_eq!(names, vec!["range"]);
        assert_eq!(catalog.in_category(&CategoryPath::ROOT).count(), 2);
    }

    #[test]
    fn test_iteration_order() {
        let mut catalog = TypeCatalog::new();
        for name in ["c", "a", "b"] {
            catalog.register(pair(name, PrimitiveKind::DWord)).unwrap();
        }
        let names: Vec<&str> = catalog.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }
}
