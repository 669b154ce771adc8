#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use iom_element as element;
pub use iom_mapper as mapper;
pub use iom_utils as utils;

pub use iom_mapper::{IonMapper, MapError, SerializationOptions, TypeRegistry, Value};
