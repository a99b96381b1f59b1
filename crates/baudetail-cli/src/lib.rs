//! CLI logic for the Baudetail snapshot tool.
//!
//! Mounts a diagram payload, replays the interactions given on the command
//! line, writes the annotated SVG snapshot and prints the panels.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{fmt::Write, fs};

use log::{info, warn};

use baudetail::{
    Viewer, ViewerError,
    audio::NullBackend,
    geometry::{Bounds, Point},
    identifier::Id,
    view::DEFAULT_ZOOM,
};

/// Run the Baudetail CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `ViewerError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed diagram payloads
pub fn run(args: &Args) -> Result<(), ViewerError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing diagram"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let payload = fs::read_to_string(&args.input)?;

    let mut viewer = Viewer::mount_str(&payload, &app_config, Box::new(NullBackend))?;
    replay(&mut viewer, args);

    fs::write(&args.output, viewer.snapshot())?;
    info!(output_file = args.output; "SVG exported successfully");

    print!("{}", render_panels(&viewer));

    Ok(())
}

/// Applies the interactions requested on the command line.
fn replay(viewer: &mut Viewer, args: &Args) {
    if let Some(category) = args.category.as_deref() {
        let id = Id::new(category);
        viewer.set_category(id);
        if viewer.state().active_category() != id {
            warn!(category; "Unknown category, showing all parts");
        }
    }

    if let Some(scenario) = args.scenario.as_deref() {
        if viewer.set_failure_scenario(Id::new(scenario)).is_none() {
            warn!(scenario; "Unknown failure scenario, nothing highlighted");
        }
    }

    if let Some(zoom) = args.zoom {
        viewer.zoom_by(zoom - DEFAULT_ZOOM);
    }

    if let Some((dx, dy)) = args.pan {
        viewer.pan_by(dx, dy);
    }

    if let Some(part) = args.select.as_deref() {
        if !viewer.select(Id::new(part)) {
            warn!(part; "Unknown part, nothing selected");
        }
    }

    if let Some(part) = args.hover.as_deref() {
        let size = viewer.diagram().size();
        let viewport = Bounds::new_from_top_left(Point::default(), size);
        viewer.pointer_move(
            Point::new(size.width() / 2.0, size.height() / 2.0),
            viewport,
        );
        if !viewer.hover(Some(Id::new(part))) {
            warn!(part; "Unknown part, nothing hovered");
        }
    }
}

/// Renders the layer panel, the info panel and the tooltip as text.
pub fn render_panels(viewer: &Viewer) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "{}", viewer.layer_panel());
    let _ = write!(out, "{}", viewer.info_panel());
    if let Some(tooltip) = viewer.tooltip() {
        let _ = writeln!(out, "\nTooltip: {tooltip}");
    }
    out
}
