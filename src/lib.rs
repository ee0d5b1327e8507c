#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use dsv_codec as codec;
pub use dsv_schema as schema;

pub use dsv_codec::{Decoder, Encoder, Error};
pub use dsv_codec::{from_reader, from_str, to_string, to_vec, to_writer};
pub use dsv_schema::{Cell, ColumnMap, ConvertError, Record, RecordInfo, SchemaError};
