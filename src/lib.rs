#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use fl_encode as encode;
pub use fl_reflect as reflect;
pub use fl_utils as utils;

pub use fl_encode::{
    Context, EncodeError, Encoder, Options, Registry, marshal, marshal_to, marshal_with,
    marshal_with_context,
};
pub use fl_reflect::Loggable;
pub use fl_reflect::derive::Loggable;
