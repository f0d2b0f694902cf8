#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use weft_introspect as introspect;
pub use weft_read as read;
pub use weft_utils as utils;
