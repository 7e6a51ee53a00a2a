//! Category paths for grouping type descriptors.

use std::fmt;

/// An absolute, `/`-separated namespace under which descriptors are grouped.
///
/// Paths are normalized on construction: repeated and trailing separators are
/// dropped, so `"//MachO/"` and `"/MachO"` are the same path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct CategoryPath {
    components: Vec<String>,
}

impl CategoryPath {
    /// The root category (`/`).
    pub const ROOT: CategoryPath = CategoryPath {
        components: Vec::new(),
    };

    /// Parses a path such as `/MachO` or `/MachO/dyld`.
    pub fn new(path: &str) -> Self {
        Self {
            components: path
                .split('/')
                .filter(|c| !c.is_empty())
                .map(str::to_owned)
                .collect(),
        }
    }

    /// Path components from the root down.
    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Returns true for the root category.
    pub fn is_root(&self) -> bool {
        self.components.is_empty()
    }

    /// Last component, or `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.components.last().map(String::as_str)
    }

    /// Enclosing category, or `None` for the root.
    pub fn parent(&self) -> Option<CategoryPath> {
        let (_, head) = self.components.split_last()?;
        Some(Self {
            components: head.to_vec(),
        })
    }

    /// Returns a child category one level below this one.
    pub fn join(&self, name: &str) -> CategoryPath {
        let mut components = self.components.clone();
        components.extend(
            name.split('/')
                .filter(|c| !c.is_empty())
                .map(str::to_owned),
        );
        Self { components }
    }

    /// Returns true if `self` is `other` or nested somewhere under it.
    pub fn is_within(&self, other: &CategoryPath) -> bool {
        self.components.starts_with(&other.components)
    }
}

impl From<&str> for CategoryPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return f.write_str("/");
        }
        for component in &self.components {
            write!(f, "/{}", component)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        assert_eq!(CategoryPath::new("//MachO/"), CategoryPath::new("/MachO"));
        assert_eq!(CategoryPath::new("MachO").to_string(), "/MachO");
        assert_eq!(CategoryPath::new("").to_string(), "/");
        assert!(CategoryPath::new("/").is_root());
    }

    #[test]
    fn test_parent_and_name() {
        let path = CategoryPath::new("/MachO/dyld");
        assert_eq!(path.name(), Some("dyld"));
        assert_eq!(path.parent(), Some(CategoryPath::new("/MachO")));
        assert_eq!(CategoryPath::ROOT.parent(), None);
        assert_eq!(CategoryPath::ROOT.name(), None);
    }

    #[test]
    fn test_join_and_within() {
        let macho = CategoryPath::new("/MachO");
        let dyld = macho.join("dyld");
        assert_eq!(dyld.to_string(), "/MachO/dyld");
        assert!(dyld.is_within(&macho));
        assert!(macho.is_within(&macho));
        assert!(!macho.is_within(&dyld));
        assert!(macho.is_within(&CategoryPath::ROOT));
    }
}
