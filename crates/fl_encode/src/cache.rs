//! Per-type field metadata, computed once and shared for the process
//! lifetime.

use fl_reflect::info::NamedField;
use fl_reflect::{LogKind, Struct};
use fl_utils::TypeIdMap;
use parking_lot::RwLock;

use crate::tag::{FieldOptions, parse_field_options};

// -----------------------------------------------------------------------------
// FieldInfo

/// One emitted field of a struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    index: usize,
    declared_name: &'static str,
    options: FieldOptions,
}

impl FieldInfo {
    /// Position in declaration order, as passed to [`Struct::field_at`].
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn declared_name(&self) -> &'static str {
        self.declared_name
    }

    #[inline]
    pub fn options(&self) -> &FieldOptions {
        &self.options
    }
}

// -----------------------------------------------------------------------------
// StructInfo

/// How a struct type is emitted.
///
/// A struct uses tag mode as soon as one field carries a `#[log]`
/// annotation, even `-`; then only annotated fields are emitted. Otherwise
/// the fields annotated with `#[json]` form the fallback list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructInfo {
    uses_tag_mode: bool,
    fields: Box<[FieldInfo]>,
    fallback_fields: Box<[FieldInfo]>,
}

impl StructInfo {
    /// Builds the metadata from static field descriptors.
    pub fn from_fields(descriptors: &[NamedField]) -> Self {
        let mut uses_tag_mode = false;
        let mut fields = Vec::new();
        let mut fallback_fields = Vec::new();

        for (index, field) in descriptors.iter().enumerate() {
            if let Some(tag) = field.log_tag() {
                uses_tag_mode = true;
                let is_struct = field.kind() == LogKind::Struct;
                if let Some(options) = parse_field_options(tag, field.name(), is_struct) {
                    fields.push(FieldInfo {
                        index,
                        declared_name: field.name(),
                        options,
                    });
                }
            } else if let Some(tag) = field.json_tag()
                && let Some(options) = parse_field_options(tag, field.name(), false)
            {
                fallback_fields.push(FieldInfo {
                    index,
                    declared_name: field.name(),
                    options,
                });
            }
        }

        Self {
            uses_tag_mode,
            fields: fields.into_boxed_slice(),
            fallback_fields: fallback_fields.into_boxed_slice(),
        }
    }

    #[inline]
    pub fn uses_tag_mode(&self) -> bool {
        self.uses_tag_mode
    }

    /// Annotated fields, in declaration order. Excluded fields are absent.
    #[inline]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    /// Fields emitted through the generic path.
    #[inline]
    pub fn fallback_fields(&self) -> &[FieldInfo] {
        &self.fallback_fields
    }
}

// -----------------------------------------------------------------------------
// StructInfoCache

/// `TypeId` to [`StructInfo`] cache.
///
/// Reads take a shared lock. A miss re-checks under the exclusive lock, so
/// concurrent first encounters of one type build a single `StructInfo`.
/// Entries are leaked: they live as long as the process.
pub struct StructInfoCache(RwLock<TypeIdMap<&'static StructInfo>>);

impl StructInfoCache {
    #[inline]
    pub const fn new() -> Self {
        Self(parking_lot::const_rwlock(TypeIdMap::new()))
    }

    /// The process-wide cache.
    #[inline]
    pub fn global() -> &'static Self {
        static CACHE: StructInfoCache = StructInfoCache::new();
        &CACHE
    }

    /// Returns the metadata of `value`'s type, building it on first use.
    pub fn get(&self, value: &dyn Struct) -> &'static StructInfo {
        let type_id = value.ty_id();

        if let Some(info) = self.0.read().get(&type_id) {
            return info;
        }

        let mut map = self.0.write();
        *map.get_or_insert(type_id, || {
            log::trace!("caching field metadata for {}", value.type_name());
            Box::leak(Box::new(StructInfo::from_fields(value.fields())))
        })
    }

    /// Number of cached types.
    pub fn len(&self) -> usize {
        self.0.read().len()
    }
}

impl Default for StructInfoCache {
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// Tests
