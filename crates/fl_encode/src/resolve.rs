//! Turns a [`Loggable`] value into a [`Node`] tree.
//!
//! Whole values go through, in order: conditional suppression, the
//! `MarshalLog` capability, pointer indirection with cycle detection, and
//! then the shape of the value. Annotated struct fields go through their
//! own chain: conditional suppression, `omitempty`, named serializer,
//! `MarshalLog`, `inline`, and the general path followed by
//! post-processing.

use fl_reflect::{BoxError, List, LogRef, Loggable, Map, Pointer, Struct, short_type_name};
use fl_utils::hash::FixedHashState;

use crate::cache::{FieldInfo, StructInfo, StructInfoCache};
use crate::empty::is_empty;
use crate::error::{EncodeError, MarshalError};
use crate::guard::VisitedSet;
use crate::node::{Node, Object};
use crate::options::Options;
use crate::post::post_process;
use crate::registry::Registry;
use crate::render::field_error_string;

type Step<'a> = fn(&mut Resolver<'a>, &dyn Loggable) -> Result<Node, EncodeError>;

// -----------------------------------------------------------------------------
// Resolver

/// State of one encode call.
pub(crate) struct Resolver<'a> {
    options: &'a Options,
    registry: &'a Registry,
    cache: &'a StructInfoCache,
    visited: &'a mut VisitedSet,
}

impl<'a> Resolver<'a> {
    pub fn new(
        options: &'a Options,
        registry: &'a Registry,
        cache: &'a StructInfoCache,
        visited: &'a mut VisitedSet,
    ) -> Self {
        Self {
            options,
            registry,
            cache,
            visited,
        }
    }

    /// Resolves a top-level value.
    ///
    /// A failing `MarshalLog` here is returned as is.
    pub fn resolve(&mut self, value: &dyn Loggable) -> Result<Node, EncodeError> {
        if value.reflect_should_log() == Some(false) {
            return Ok(Node::Null);
        }
        if !self.options.disable_marshal_log
            && let Some(result) = value.reflect_marshal_log()
        {
            return raw(result);
        }
        self.resolve_value(value)
    }

    fn resolve_value(&mut self, value: &dyn Loggable) -> Result<Node, EncodeError> {
        match value.log_ref() {
            LogRef::Null => Ok(Node::Null),
            LogRef::Bool(v) => Ok(Node::Bool(v)),
            LogRef::Int(v) => Ok(Node::Int(v)),
            LogRef::Uint(v) => Ok(Node::Uint(v)),
            LogRef::Float32(v) => Ok(Node::Float32(v)),
            LogRef::Float64(v) => Ok(Node::Float64(v)),
            LogRef::Str(s) => Ok(Node::String(s.to_owned())),
            LogRef::Pointer(ptr) => self.resolve_pointer(ptr, Self::resolve_value),
            LogRef::Struct(s) => self.resolve_struct(s),
            LogRef::List(list) => self.resolve_list(list),
            LogRef::Map(map) => self.resolve_map(map),
            LogRef::Opaque => self.resolve_opaque(value),
        }
    }

    /// Applies `next` to the target of `ptr`; nil resolves to null.
    fn resolve_pointer(&mut self, ptr: &dyn Pointer, next: Step<'a>) -> Result<Node, EncodeError> {
        let identity = ptr.identity();
        if let Some(id) = identity
            && !self.visited.enter(id)
        {
            let type_name = short_type_name(ptr.type_name());
            return Err(MarshalError::new(type_name, None, EncodeError::CyclicReference).into());
        }

        let mut result = Ok(Node::Null);
        ptr.with_target(&mut |target| {
            if let Some(target) = target {
                result = next(self, target);
            }
        });

        if let Some(id) = identity {
            self.visited.leave(id);
        }
        result
    }

    fn resolve_struct(&mut self, s: &dyn Struct) -> Result<Node, EncodeError> {
        if !self.options.disable_marshal_log
            && let Some(result) = s.reflect_marshal_log()
        {
            return raw(result).map_err(|err| struct_error(s, None, err));
        }

        let info = self.cache.get(s);
        if !info.uses_tag_mode() {
            return self.resolve_untagged(s, info);
        }

        let mut object = object_with_capacity(info.fields().len());
        for field in info.fields() {
            self.resolve_field(s, field, &mut object)
                .map_err(|err| struct_error(s, Some(field.declared_name()), err))?;
        }
        Ok(Node::Object(object))
    }

    /// The generic path of a struct: `MarshalJson`, then the `#[json]`
    /// fields.
    fn resolve_untagged(&mut self, s: &dyn Struct, info: &StructInfo) -> Result<Node, EncodeError> {
        if self.options.disable_json_fallback {
            return Ok(Node::Null);
        }
        if let Some(result) = s.reflect_marshal_json() {
            return raw(result).map_err(|err| struct_error(s, None, err));
        }

        let mut object = object_with_capacity(info.fallback_fields().len());
        for field in info.fallback_fields() {
            let Some(value) = s.field_at(field.index()) else {
                continue;
            };
            let options = field.options();
            if options.omit_empty && is_empty(value) {
                continue;
            }
            let node = self
                .resolve_value(value)
                .map_err(|err| struct_error(s, Some(field.declared_name()), err))?;
            if !node.is_null() {
                object.insert(options.name.clone(), node);
            }
        }
        Ok(Node::Object(object))
    }

    fn resolve_list(&mut self, list: &dyn List) -> Result<Node, EncodeError> {
        if list.is_empty() && self.options.omit_empty_by_default {
            return Ok(Node::Null);
        }
        let mut items = Vec::with_capacity(list.len());
        for item in list.iter() {
            let node = self.resolve_value(item)?;
            if !node.is_null() {
                items.push(node);
            }
        }
        Ok(Node::Array(items))
    }

    /// Entries with string keys, in ascending key order.
    fn resolve_map(&mut self, map: &dyn Map) -> Result<Node, EncodeError> {
        if map.is_empty() && self.options.omit_empty_by_default {
            return Ok(Node::Null);
        }
        let mut entries: Vec<(&str, &dyn Loggable)> = map
            .iter()
            .filter_map(|(key, value)| match key.log_ref() {
                LogRef::Str(key) => Some((key, value)),
                _ => None,
            })
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let mut object = object_with_capacity(entries.len());
        for (key, value) in entries {
            let node = self.resolve_value(value)?;
            if !node.is_null() {
                object.insert(key.to_owned(), node);
            }
        }
        Ok(Node::Object(object))
    }

    fn resolve_opaque(&mut self, value: &dyn Loggable) -> Result<Node, EncodeError> {
        let wrap = |err: EncodeError| -> EncodeError {
            MarshalError::new(value.short_type_name(), None, err).into()
        };
        if !self.options.disable_marshal_log
            && let Some(result) = value.reflect_marshal_log()
        {
            return raw(result).map_err(wrap);
        }
        if !self.options.disable_json_fallback
            && let Some(result) = value.reflect_marshal_json()
        {
            return raw(result).map_err(wrap);
        }
        Ok(Node::Null)
    }

    /// A value that opted back in through `ConditionalLog`: structs take the
    /// generic path whatever their annotations.
    fn resolve_exposed(&mut self, value: &dyn Loggable) -> Result<Node, EncodeError> {
        match value.log_ref() {
            LogRef::Struct(s) => {
                let info = self.cache.get(s);
                self.resolve_untagged(s, info)
            }
            LogRef::Pointer(ptr) => self.resolve_pointer(ptr, Self::resolve_exposed),
            _ => self.resolve_value(value),
        }
    }

    // -------------------------------------------------------------------------
    // Fields

    fn resolve_field(
        &mut self,
        parent: &dyn Struct,
        field: &FieldInfo,
        object: &mut Object,
    ) -> Result<(), EncodeError> {
        let Some(value) = parent.field_at(field.index()) else {
            return Ok(());
        };
        let options = field.options();

        if let Some(should_log) = value.reflect_should_log() {
            if !should_log {
                return Ok(());
            }
            let node = match self.resolve_exposed(value) {
                Ok(node) => node,
                Err(err) => self.field_failure(field, value, err, false)?,
            };
            insert(object, &options.name, node);
            return Ok(());
        }

        if (options.omit_empty || self.options.omit_empty_by_default) && is_empty(value) {
            return Ok(());
        }

        if let Some(name) = &options.serializer {
            let result = match self.registry.serializer(name) {
                Some(serializer) => raw(serializer(value)),
                None => Err(EncodeError::SerializerNotFound(name.clone())),
            };
            let node = match result {
                Ok(node) => node,
                Err(err) => self.field_failure(field, value, err, true)?,
            };
            insert(object, &options.name, node);
            return Ok(());
        }

        if !self.options.disable_marshal_log
            && let Some(result) = value.reflect_marshal_log()
        {
            let node = match raw(result) {
                Ok(node) => node,
                Err(err) => self.field_failure(field, value, err, false)?,
            };
            insert(object, &options.name, node);
            return Ok(());
        }

        if options.inline
            && let LogRef::Struct(inner) = value.log_ref()
        {
            match self.resolve_struct(inner) {
                Ok(Node::Object(entries)) => object.extend(entries),
                // Only objects can be spliced into the parent.
                Ok(_) => {}
                Err(err) => {
                    let node = self.field_failure(field, value, err, false)?;
                    insert(object, &options.name, node);
                }
            }
            return Ok(());
        }

        let node = match self.resolve_value(value) {
            Ok(node) if node.is_null() => return Ok(()),
            Ok(node) => post_process(node, options, self.options, self.registry),
            Err(err) => self.field_failure(field, value, err, false)?,
        };
        insert(object, &options.name, node);
        Ok(())
    }

    /// With error fallback on, replaces the field by its error text.
    /// Otherwise returns the error, first attributed to the field's own
    /// type when `own_type` is set.
    fn field_failure(
        &self,
        field: &FieldInfo,
        value: &dyn Loggable,
        err: EncodeError,
        own_type: bool,
    ) -> Result<Node, EncodeError> {
        let name = field.declared_name();
        if self.options.enable_error_fallback {
            log::debug!("field {name} replaced by its error text: {err}");
            return Ok(Node::String(field_error_string(name, value, &err)));
        }
        if own_type {
            return Err(MarshalError::new(value.short_type_name(), Some(name), err).into());
        }
        Err(err)
    }
}

// -----------------------------------------------------------------------------
// Helpers

fn raw(result: Result<Vec<u8>, BoxError>) -> Result<Node, EncodeError> {
    Node::raw(result.map_err(EncodeError::Custom)?)
}

fn struct_error(s: &dyn Struct, field: Option<&'static str>, err: EncodeError) -> EncodeError {
    MarshalError::new(short_type_name(s.type_name()), field, err).into()
}

#[inline]
fn object_with_capacity(capacity: usize) -> Object {
    Object::with_capacity_and_hasher(capacity, FixedHashState)
}

#[inline]
fn insert(object: &mut Object, name: &str, node: Node) {
    if !node.is_null() {
        object.insert(name.to_owned(), node);
    }
}

// -----------------------------------------------------------------------------
// Tests
