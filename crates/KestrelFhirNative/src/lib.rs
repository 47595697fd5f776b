//! Runtime half of the native FHIR deserialization pipeline.
//!
//! An external native parser turns wire bytes into flat, offset-addressed
//! records inside an arena. This crate owns everything that happens after
//! that: the arena/byte-view abstraction ([`arena`]), the closed set of
//! nullable wrapper shapes the parser emits ([`layout`]), the hand-authored
//! schema tables describing each record layout ([`schema`]), the generated
//! per-type decoding routines ([`generated`]), extension side-channel
//! plumbing ([`ext`]), and the pooled parser binding ([`binding`]).

pub mod arena;
pub mod binding;
pub mod error;
pub mod ext;
pub mod generated;
pub mod layout;
pub mod schema;

pub use arena::{NativeArena, NativeRef, StructView};
pub use binding::{NativeDeserializer, NativeParser, ParseContext};
pub use error::{DecodeError, ParseError};
pub use generated::r4::decode_resource;
