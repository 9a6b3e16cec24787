//! # Delos Core
//!
//! Core types shared by every Delos crate.
//!
//! Delos decides, at build time, how a raw textual endpoint parameter (path,
//! query, header or form field) becomes a typed value. This crate holds the
//! vocabulary for that decision:
//!
//! - [`TypedValue`] - The result of a conversion
//! - [`PrimitiveKind`] - Built-in primitive wrappers and their string parsers
//! - [`ConversionStrategy`] - How a declared parameter type is converted
//! - [`ParameterConverter`] - A live converter (`convert(raw) -> TypedValue`)
//! - [`ConversionError`] - Malformed client input at request time
//!
//! ## Example
//!
//! ```rust
//! use delos_core::{ParameterConverter, PrimitiveConverter, PrimitiveKind, TypedValue};
//!
//! let converter = PrimitiveConverter::new(PrimitiveKind::Int);
//! assert_eq!(converter.convert("42").unwrap(), TypedValue::Int(42));
//! assert!(converter.convert("abc").is_err());
//! ```

#![doc(html_root_url = "https://docs.rs/delos-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod converter;
mod error;
mod primitive;
mod strategy;
mod value;

pub use converter::{
    ConvertFn, FnConverter, NoopConverter, ParameterConverter, PrimitiveConverter, SharedConverter,
};
pub use error::{ConversionError, ConversionResult};
pub use primitive::{is_string_type, PrimitiveKind, STRING_TYPE};
pub use strategy::{ArtifactId, ConversionStrategy, MemberKind, MemberRef};
pub use value::{ObjectValue, TypedValue};
