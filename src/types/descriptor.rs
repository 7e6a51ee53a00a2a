//! Struct descriptors and the [`Describe`] trait.

use std::fmt;

use super::CategoryPath;

/// Primitive field kinds, named the way reverse-engineering tools name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// 1 byte
    Byte,
    /// 2 bytes
    Word,
    /// 4 bytes
    DWord,
    /// 8 bytes
    QWord,
}

impl PrimitiveKind {
    /// Width in bytes.
    #[inline]
    pub const fn size(self) -> usize {
        match self {
            PrimitiveKind::Byte => 1,
            PrimitiveKind::Word => 2,
            PrimitiveKind::DWord => 4,
            PrimitiveKind::QWord => 8,
        }
    }

    /// Catalog display name.
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Word => "word",
            PrimitiveKind::DWord => "dword",
            PrimitiveKind::QWord => "qword",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// One field of a [`StructDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name, unique within its struct
    pub name: String,
    /// Primitive kind (determines the width)
    pub kind: PrimitiveKind,
    /// Byte offset from the start of the struct
    pub offset: usize,
    /// Free-form comment, often empty
    pub comment: String,
}

impl FieldDescriptor {
    /// Width in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.kind.size()
    }

    /// Offset one past the last byte of this field.
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.size()
    }
}

/// A named, ordered, packed struct layout.
///
/// Fields are laid out back to back in the order they are added; there is no
/// alignment padding. Descriptors start in the root category until
/// [`with_category`](Self::with_category) is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDescriptor {
    name: String,
    category: CategoryPath,
    fields: Vec<FieldDescriptor>,
}

impl StructDescriptor {
    /// Creates an empty struct descriptor.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: CategoryPath::ROOT,
            fields: Vec::new(),
        }
    }

    /// Appends a field at the current end of the struct.
    ///
    /// Field names must be unique; adding a name twice is a programming error.
    pub fn add(mut self, kind: PrimitiveKind, name: impl Into<String>, comment: &str) -> Self {
        let name = name.into();
        debug_assert!(
            self.field(&name).is_none(),
            "duplicate field '{}' in '{}'",
            name,
            self.name
        );
        let offset = self.size();
        self.fields.push(FieldDescriptor {
            name,
            kind,
            offset,
            comment: comment.to_owned(),
        });
        self
    }

    /// Places the descriptor under `category`.
    pub fn with_category(mut self, category: impl Into<CategoryPath>) -> Self {
        self.category = category.into();
        self
    }

    /// Struct name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Category the struct is grouped under.
    pub fn category(&self) -> &CategoryPath {
        &self.category
    }

    /// Fields in on-disk order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Total size in bytes (sum of field widths).
    pub fn size(&self) -> usize {
        self.fields.last().map_or(0, FieldDescriptor::end)
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the field covering byte `offset`, if any.
    pub fn field_at_offset(&self, offset: usize) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|f| offset >= f.offset && offset < f.end())
    }

    /// Returns true if both descriptors have the same field names, kinds and
    /// order. Struct names, categories and comments are not compared.
    pub fn same_shape(&self, other: &StructDescriptor) -> bool {
        self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .zip(&other.fields)
                .all(|(a, b)| a.name == b.name && a.kind == b.kind)
    }
}

impl fmt::Display for StructDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "struct {} {{ // {}, {:#x} bytes",
            self.name,
            self.category,
            self.size()
        )?;
        for field in &self.fields {
            write!(f, "    /* {:#04x} */ {:<5} {};", field.offset, field.kind, field.name)?;
            if !field.comment.is_empty() {
                write!(f, " // {}", field.comment)?;
            }
            writeln!(f)?;
        }
        write!(f, "}}")
    }
}

/// Types that can describe their own on-disk layout.
///
/// Every call builds a fresh descriptor; callers that want deduplication
/// register the result in a [`TypeCatalog`](super::TypeCatalog).
pub trait Describe {
    /// Builds the structural descriptor for this type.
    fn describe() -> StructDescriptor;
}
