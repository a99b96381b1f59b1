//! Baudetail - an interactive overlay engine for construction-detail diagrams.
//!
//! A generated construction detail arrives as raw SVG markup plus a
//! structured description of its named parts. This crate validates that
//! payload, binds each part to its markup node and keeps an explorable view
//! on top: category filtering, failure-scenario highlighting, zoom and pan,
//! short audio cues and a detail inspector. Everything runs locally and
//! synchronously; the markup itself is never rewritten.
//!
//! The entry point is [`Viewer`]:
//!
//! ```
//! use baudetail::{Viewer, audio::NullBackend, config::AppConfig, event::ViewerEvent};
//! use baudetail::identifier::Id;
//!
//! let payload = r#"{
//!     "components": { "vaporBarrier": { "name": "Dampfbremse", "category": "moisture" } },
//!     "failureScenarios": [
//!         { "id": "moisture-ingress", "name": "Feuchteeintrag", "severity": "high",
//!           "affectedComponents": ["vaporBarrier"] }
//!     ],
//!     "svgContent": "<svg viewBox=\"0 0 500 400\"><rect id=\"vaporBarrier\"/></svg>"
//! }"#;
//!
//! let mut viewer = Viewer::mount_str(payload, &AppConfig::default(), Box::new(NullBackend))?;
//! viewer.set_failure_scenario(Id::new("moisture-ingress"));
//! viewer.dispatch(ViewerEvent::PartClick(Id::new("vaporBarrier")));
//!
//! assert!(viewer.snapshot().contains("#vaporBarrier { stroke"));
//! assert!(viewer.info_panel().to_string().starts_with("Dampfbremse"));
//! # Ok::<(), baudetail::ViewerError>(())
//! ```

pub mod audio;
pub mod binder;
pub mod config;
pub mod event;
pub mod markup;
pub mod panel;
pub mod surface;
pub mod validate;
pub mod view;

mod error;
mod payload;
mod viewer;

pub use baudetail_core::{color, diagram, geometry, identifier, tone};

pub use error::ViewerError;
pub use viewer::Viewer;
