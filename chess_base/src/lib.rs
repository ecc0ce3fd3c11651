//! # Base types for stakechess
//!
//! This is an auxiliary crate for `stakechess`, which contains the board-independent
//! vocabulary: colors, piece kinds, piece instances with identity, square coordinates,
//! board geometry, and the game outcome taxonomy.
//!
//! Normally you don't want to use this crate directly. Use `stakechess` instead.

pub mod geometry;
pub mod types;
