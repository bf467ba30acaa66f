//! Configuration structures for build-and-publish runs.
//!
//! [`Settings`] carries the project identity (game and organization names)
//! and the filesystem layout every stage shares. It is constructed through
//! [`SettingsBuilder`].

mod builder;
mod core;

pub use builder::SettingsBuilder;
pub use core::{Settings, slugify};
