#![cfg_attr(docsrs, doc = include_str!("../README.md"))]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[doc(inline)]
pub use self::{
    capability::{find_capability, Capability, CapabilityId, CapabilityType},
    config::{ConfigSpace, Snapshot},
    decode::Decoded,
    device::Device,
    field::{extract_field, mask_shape, MaskShape},
    property::Property,
    text::TextBuf,
};
pub mod capability;
pub mod config;
pub mod decode;
pub mod device;
pub mod error;
pub mod express;
pub mod field;
pub mod power;
pub mod property;
pub mod text;
