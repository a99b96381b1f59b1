//! Baudetail Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Baudetail overlay
//! engine. It includes:
//!
//! - **Identifiers**: String-interned identifiers for parts, categories and scenarios ([`identifier::Id`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Points, sizes, bounds and the viewport transform ([`geometry`] module)
//! - **Diagram**: The immutable diagram model ([`diagram`] module)
//! - **Tone**: Procedural audio cue descriptors ([`tone`] module)

pub mod color;
pub mod diagram;
pub mod geometry;
pub mod identifier;
pub mod tone;
