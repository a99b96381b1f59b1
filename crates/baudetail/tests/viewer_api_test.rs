//! Integration tests for the Viewer API
//!
//! These tests drive a mounted viewer through the public API the way a host
//! would: mount a payload, forward events, rebind and read the panels.

use baudetail::{
    Viewer, ViewerError,
    audio::{NullBackend, RecordingBackend},
    binder::{DIMMED_OPACITY, FULL_OPACITY},
    config::AppConfig,
    event::ViewerEvent,
    identifier::Id,
    panel::{ErrorPanel, InfoPanel, LayerAction},
    surface::SnapshotSurface,
    tone::Cue,
    validate::ContentValidator,
};
use float_cmp::assert_approx_eq;
use serde_json::{Value, json};

fn wall_payload() -> Value {
    json!({
        "components": {
            "wallStud": {
                "name": "Ständer CW 50",
                "shortName": "CW50",
                "din": "DIN 18182",
                "category": ["load-bearing"]
            },
            "insulation": {
                "name": "Mineralwolle",
                "category": ["acoustic"],
                "acoustic": { "rating": "Rw 52 dB" }
            },
            "vaporBarrier": {
                "name": "Dampfbremse",
                "category": ["moisture"],
                "failureModes": [
                    { "type": "Leckage", "severity": "high", "description": "Undichte Stöße" }
                ]
            }
        },
        "failureScenarios": [
            {
                "id": "moisture-ingress",
                "name": "Feuchteeintrag",
                "description": "Tauwasser in der Dämmebene",
                "affectedComponents": ["vaporBarrier", "notInDiagram"],
                "severity": "high",
                "indicator": "Schimmel an der Innenseite"
            }
        ],
        "svgContent": concat!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 500 400\">",
            "<g id=\"wallStud\"><rect x=\"10\" y=\"10\" width=\"20\" height=\"300\"/></g>",
            "<g id=\"insulation\"><path d=\"M 40 10 L 60 300\"/></g>",
            "<rect id=\"vaporBarrier\" x=\"70\" y=\"10\" width=\"2\" height=\"300\"/>",
            "</svg>"
        ),
        "dimensions": { "width": 500, "height": 400 }
    })
}

fn mount() -> (Viewer, RecordingBackend) {
    let backend = RecordingBackend::new();
    let viewer = Viewer::mount(
        &wall_payload(),
        &AppConfig::default(),
        Box::new(backend.clone()),
    )
    .expect("Failed to mount wall payload");
    (viewer, backend)
}

fn bound(viewer: &Viewer) -> SnapshotSurface {
    let mut surface = SnapshotSurface::new();
    viewer.bind(&mut surface);
    surface
}

#[test]
fn test_category_filter_scenario() {
    let (mut viewer, _) = mount();
    assert!(viewer.set_category(Id::new("acoustic")));

    let surface = bound(&viewer);
    assert_approx_eq!(
        f32,
        surface.opacity(Id::new("wallStud")).unwrap(),
        DIMMED_OPACITY
    );
    assert_approx_eq!(
        f32,
        surface.opacity(Id::new("insulation")).unwrap(),
        FULL_OPACITY
    );
}

#[test]
fn test_opacity_law_over_all_categories() {
    let (mut viewer, _) = mount();
    let categories: Vec<Id> = viewer
        .diagram()
        .categories()
        .iter()
        .map(|category| category.id())
        .collect();

    for category in categories {
        viewer.set_category(category);
        let surface = bound(&viewer);
        for part in viewer.diagram().parts() {
            let expected = if category == "all" || part.belongs_to(category) {
                FULL_OPACITY
            } else {
                DIMMED_OPACITY
            };
            assert_approx_eq!(f32, surface.opacity(part.id()).unwrap(), expected);
        }
    }
}

#[test]
fn test_moisture_ingress_scenario() {
    let (mut viewer, _) = mount();
    assert_eq!(
        viewer.set_failure_scenario(Id::new("moisture-ingress")),
        Some(Id::new("moisture-ingress"))
    );

    let surface = bound(&viewer);
    let highlight = surface
        .highlight(Id::new("vaporBarrier"))
        .expect("vaporBarrier should be highlighted");
    assert_eq!(highlight.color(), viewer.palette().high());
    assert!(surface.highlight(Id::new("wallStud")).is_none());
    assert!(surface.highlight(Id::new("insulation")).is_none());
}

#[test]
fn test_scenario_toggle_law() {
    let (mut viewer, _) = mount();
    let scenario = Id::new("moisture-ingress");
    viewer.set_failure_scenario(scenario);
    assert_eq!(viewer.set_failure_scenario(scenario), None);
    assert_eq!(viewer.state().active_scenario(), None);
}

#[test]
fn test_zoom_clamps_and_reset_is_idempotent() {
    let (mut viewer, _) = mount();
    for _ in 0..50 {
        viewer.zoom_in();
    }
    assert_approx_eq!(f32, viewer.state().zoom(), 3.0);
    viewer.zoom_by(-100.0);
    assert_approx_eq!(f32, viewer.state().zoom(), 0.5);

    viewer.pan_by(25.0, -10.0);
    viewer.reset_view();
    let once = viewer.state().clone();
    viewer.reset_view();
    assert_eq!(viewer.state(), &once);
    assert_approx_eq!(f32, once.zoom(), 1.0);
    assert!(once.pan().is_zero());
}

#[test]
fn test_repeated_hover_emits_one_cue() {
    let (mut viewer, backend) = mount();
    for _ in 0..5 {
        viewer.dispatch(ViewerEvent::PartEnter(Id::new("wallStud")));
    }
    assert_eq!(backend.played(), [Cue::Hover]);
}

#[test]
fn test_index_selection_keeps_hover() {
    let (mut viewer, backend) = mount();
    viewer.toggle_info_panel();
    viewer.dispatch(ViewerEvent::PartEnter(Id::new("insulation")));

    viewer.dispatch(ViewerEvent::Layer(LayerAction::SelectPart(Id::new(
        "vaporBarrier",
    ))));

    assert_eq!(viewer.state().selected(), Some(Id::new("vaporBarrier")));
    assert!(viewer.state().info_panel_visible());
    assert_eq!(viewer.state().hovered(), Some(Id::new("insulation")));
    assert_eq!(backend.played(), [Cue::Hover, Cue::Click, Cue::Select]);

    let info = viewer.info_panel();
    let record = info.record().expect("info panel should show a record");
    assert_eq!(record.name(), "Dampfbremse");
}

#[test]
fn test_close_info_keeps_view() {
    let (mut viewer, _) = mount();
    viewer.set_category(Id::new("moisture"));
    viewer.zoom_in();
    viewer.dispatch(ViewerEvent::PartClick(Id::new("wallStud")));
    viewer.dispatch(ViewerEvent::CloseInfo);

    assert_eq!(viewer.state().selected(), None);
    assert_eq!(viewer.info_panel(), InfoPanel::Placeholder);
    assert_eq!(viewer.state().active_category(), Id::new("moisture"));
    assert_approx_eq!(f32, viewer.state().zoom(), 1.25);
}

#[test]
fn test_default_categories_back_filled() {
    let diagram = ContentValidator::default()
        .validate(&wall_payload())
        .expect("Failed to validate");
    let ids: Vec<String> = diagram
        .categories()
        .iter()
        .map(|category| category.id().as_string())
        .collect();
    assert_eq!(
        ids,
        [
            "all",
            "load-bearing",
            "finishing",
            "acoustic",
            "fire-protection",
            "moisture"
        ]
    );
}

#[test]
fn test_missing_svg_content_blocks_mounting() {
    let mut payload = wall_payload();
    payload
        .as_object_mut()
        .expect("payload is an object")
        .remove("svgContent");

    let err = Viewer::mount(&payload, &AppConfig::default(), Box::new(NullBackend))
        .expect_err("mounting should fail");
    assert!(matches!(err, ViewerError::MalformedDiagram { .. }));

    let panel = ErrorPanel::from_error(&err).expect("malformed diagrams have an error panel");
    assert!(panel.reason().contains("svgContent"));
    assert!(panel.payload().contains("wallStud"));
}

#[test]
fn test_binding_twice_is_idempotent() {
    let (mut viewer, _) = mount();
    viewer.set_failure_scenario(Id::new("moisture-ingress"));

    let mut surface = SnapshotSurface::new();
    viewer.bind(&mut surface);
    let once = surface.clone();
    viewer.bind(&mut surface);

    assert_eq!(surface, once);
    assert_eq!(surface.handlers(Id::new("vaporBarrier")).len(), 3);
}

#[test]
fn test_snapshot_document() {
    let (mut viewer, _) = mount();
    viewer.set_category(Id::new("load-bearing"));
    let svg = viewer.snapshot();

    assert!(svg.contains("<svg"), "Output should contain SVG tag");
    assert!(svg.contains("</svg>"), "Output should be complete SVG");
    assert!(svg.contains("#insulation { opacity: 0.15;"));
    assert!(svg.contains(r#"<g id="wallStud">"#));
}

#[test]
fn test_layer_panel_text() {
    let (mut viewer, _) = mount();
    viewer.set_failure_scenario(Id::new("moisture-ingress"));
    let text = viewer.layer_panel().to_string();

    assert!(text.contains("[x] Alle (3)"));
    assert!(text.contains("[x] Feuchteeintrag <high> (1)"));
    assert!(text.contains("Ständer CW 50 [CW50] DIN 18182"));
}
