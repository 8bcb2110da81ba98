#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Modules

mod empty;
mod encoder;
mod error;
mod guard;
mod node;
mod options;
mod post;
mod render;
mod resolve;
mod sensitive;

pub mod cache;
pub mod registry;
pub mod tag;

// -----------------------------------------------------------------------------
// Exports

pub use encoder::{Encoder, marshal, marshal_to, marshal_with, marshal_with_context};
pub use error::{EncodeError, MarshalError};
pub use node::{Node, Object};
pub use options::{Context, Level, Options, ParseLevelError};
pub use registry::{
    MaskFn, Registry, SerializerFn, register_lazy_serializer, register_mask, register_serializer,
};
