//! Serialization of trees back into XML text.
//!
//! A [`Transformer`] carries the [`OutputProperties`] that control the
//! output: method, declaration, document type declaration, encoding and
//! indentation.
mod pretty;
mod properties;
mod serializer;
mod transformer;
mod xml_serializer;

pub use properties::{Method, OutputProperties};
pub use transformer::Transformer;
