//! Viewport transform composition and screen/workspace round-trips

use glam::{dvec2, DVec2};
use pathview_core::Units;
use pathview_visualizer::ViewportController;
use proptest::prelude::*;

#[test]
fn test_round_trip_after_center_and_zoom() {
    let mut viewport = ViewportController::new();
    viewport.center_view(800.0, 600.0);
    viewport.zoom_in_at(dvec2(200.0, 150.0));
    viewport.zoom_out_key();
    viewport.zoom_in_key();
    viewport.zoom_in_key();

    let point = dvec2(37.5, -12.2);
    let screen = viewport.workspace_to_screen(point, Units::Mm);
    let back = viewport.screen_to_workspace(screen, Units::Mm);
    assert!((back - point).length() < 1e-9);
}

#[test]
fn test_round_trip_in_inches() {
    let mut viewport = ViewportController::new();
    viewport.center_view(1024.0, 768.0);
    viewport.zoom_out_at(dvec2(512.0, 384.0));

    let point = dvec2(3.25, 1.5);
    let screen = viewport.workspace_to_screen(point, Units::Inches);
    let back = viewport.screen_to_workspace(screen, Units::Inches);
    assert!((back - point).length() < 1e-9);
}

#[test]
fn test_recenter_resets_composed_transform() {
    let mut viewport = ViewportController::new();
    viewport.center_view(800.0, 600.0);
    let reference = viewport.transform();

    viewport.zoom_in_at(dvec2(10.0, 20.0));
    viewport.zoom_in_key();
    viewport.center_view(800.0, 600.0);

    assert_eq!(viewport.transform(), reference);
}

fn apply_gesture(viewport: &mut ViewportController, gesture: u8, anchor: DVec2) {
    match gesture % 5 {
        0 => viewport.zoom_in_key(),
        1 => viewport.zoom_out_key(),
        2 => viewport.zoom_in_at(anchor),
        3 => viewport.zoom_out_at(anchor),
        _ => viewport.center_view(800.0, 600.0),
    }
}

proptest! {
    #[test]
    fn prop_round_trip_under_composed_gestures(
        gestures in proptest::collection::vec(0u8..5, 0..12),
        anchor_x in -500.0..500.0f64,
        anchor_y in -500.0..500.0f64,
        point_x in -1000.0..1000.0f64,
        point_y in -1000.0..1000.0f64,
    ) {
        let mut viewport = ViewportController::new();
        viewport.center_view(800.0, 600.0);
        for gesture in gestures {
            apply_gesture(&mut viewport, gesture, dvec2(anchor_x, anchor_y));
        }

        for units in [Units::Mm, Units::Inches] {
            let point = dvec2(point_x, point_y);
            let screen = viewport.workspace_to_screen(point, units);
            let back = viewport.screen_to_workspace(screen, units);
            prop_assert!((back - point).length() < 1e-6);
        }
    }
}
