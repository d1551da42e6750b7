//! Extension declaration and command surface.
//!
//! This module declares the archive extension to the host (manifest) and
//! gates its commands by the archived-ness of the targeted items. Rendering
//! menus and prompts stays with the host UI.

pub mod commands;
pub mod manifest;
