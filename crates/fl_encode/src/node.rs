use core::fmt;

use fl_utils::index::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::value::RawValue;

use crate::error::EncodeError;

/// Insertion-ordered object of a [`Node`] tree.
pub type Object = IndexMap<String, Node>;

// -----------------------------------------------------------------------------
// Node

/// The intermediate tree built by the resolver and written by the driver.
///
/// Objects keep insertion order. `Raw` holds JSON produced by a capability
/// or a serializer and is written verbatim.
#[derive(Debug, Clone, Default)]
pub enum Node {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float32(f32),
    Float64(f64),
    String(String),
    Array(Vec<Node>),
    Object(Object),
    Raw(Box<RawValue>),
}

impl Node {
    /// Validates `bytes` as a single JSON value and wraps it.
    pub fn raw(bytes: Vec<u8>) -> Result<Self, EncodeError> {
        let text = String::from_utf8(bytes).map_err(|err| {
            EncodeError::InvalidRaw(<serde_json::Error as serde::de::Error>::custom(err))
        })?;
        RawValue::from_string(text)
            .map(Self::Raw)
            .map_err(EncodeError::InvalidRaw)
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Compact JSON text of the tree.
    pub fn to_json_string(&self) -> String {
        // Writing to a `String` cannot fail and `Node` has no fallible parts.
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::Uint(v) => serializer.serialize_u64(*v),
            Self::Float32(v) => serializer.serialize_f32(*v),
            Self::Float64(v) => serializer.serialize_f64(*v),
            Self::String(v) => serializer.serialize_str(v),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Self::Raw(raw) => raw.serialize(serializer),
        }
    }
}

/// Display rendering used by the `string` option: strings verbatim, scalars
/// in display form, composites as compact JSON.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("<nil>"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
            Self::Float32(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::String(v) => f.write_str(v),
            Self::Raw(raw) => f.write_str(raw.get()),
            Self::Array(_) | Self::Object(_) => f.write_str(&self.to_json_string()),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Node, Object};

    #[test]
    fn object_keeps_insertion_order() {
        let mut obj = Object::default();
        obj.insert("z".into(), Node::Int(1));
        obj.insert("a".into(), Node::Bool(true));
        obj.insert("m".into(), Node::Null);
        assert_eq!(
            Node::Object(obj).to_json_string(),
            r#"{"z":1,"a":true,"m":null}"#
        );
    }

    #[test]
    fn raw_is_verbatim() {
        let node = Node::raw(br#"{"k":[1,2]}"#.to_vec()).unwrap();
        let arr = Node::Array(vec![node, Node::String("s".into())]);
        assert_eq!(arr.to_json_string(), r#"[{"k":[1,2]},"s"]"#);
    }

    #[test]
    fn raw_rejects_invalid_json() {
        assert!(Node::raw(b"{not json".to_vec()).is_err());
        assert!(Node::raw(vec![0xff, 0xfe]).is_err());
    }

    #[test]
    fn display_forms() {
        assert_eq!(Node::Int(42).to_string(), "42");
        assert_eq!(Node::Float64(123.46).to_string(), "123.46");
        assert_eq!(Node::String("x".into()).to_string(), "x");
        assert_eq!(Node::Null.to_string(), "<nil>");
        assert_eq!(Node::Array(vec![Node::Uint(1)]).to_string(), "[1]");
    }
}
