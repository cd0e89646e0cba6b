//! Implement Direct2D callback interfaces in Rust.
//!
//! Each callback interface Direct2D calls back into (tessellation and geometry
//! sinks, command sinks, effect transforms, custom effects) is a trait here.
//! A [`Shadow`] presents an implementation to native code as a COM object.

pub mod abi;
mod command;
mod config;
#[cfg(windows)]
pub mod d2d;
mod effect;
pub mod error;
mod image;
mod path;
mod property;
mod shadow;
mod shape;
mod tessellation;
#[cfg(test)]
mod testing;
mod text;
mod transform;
mod unknown;
mod utility;

pub use abi::{HResult, GUID};
pub use command::*;
pub use config::*;
pub use effect::*;
pub use error::{Error, ErrorKind};
pub use image::*;
pub use path::*;
pub use property::*;
pub use shadow::{Interface, Shadow, ShadowState};
pub use shape::*;
pub use tessellation::*;
pub use text::*;
pub use transform::*;
pub use unknown::Unknown;

pub type Result<T> = core::result::Result<T, Error>;
