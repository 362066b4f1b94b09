//! Dynamic record entity for slicekit.
//!
//! [`Record`] is a JSON object that stores its index-assigned key in the field
//! named by [`Config::guid_key`](slicekit_types::Config). It suits callers that
//! do not want to define a dedicated entity struct.

mod record;

pub use record::Record;
