//! End-to-end canvas behavior: reload, batching, truncation, and the
//! collaborator-facing outputs.

use glam::dvec2;
use pathview_core::MessageLevel;
use pathview_visualizer::{
    BatchStatus, CanvasSettings, Color, GcodeCanvas, Group, LineStyle, RenderPrimitive,
};
use std::io::Write;

const SAMPLE_PROGRAM: &str = "\
G21\n\
G00 X10 Y10\n\
G01 X20 Y10\n\
G01 X20 Y20 Z-1\n\
G02 X10 Y20 I-5 J0\n\
G01 Z2\n\
G00 X0 Y0\n";

fn canvas() -> GcodeCanvas {
    GcodeCanvas::new(CanvasSettings::default())
}

#[test]
fn test_reload_is_idempotent() {
    let mut canvas = canvas();

    let generation = canvas.reload_from_str(SAMPLE_PROGRAM);
    assert_eq!(canvas.render_all(generation), BatchStatus::Complete);
    let first = canvas.scene().clone();

    let generation = canvas.reload_from_str(SAMPLE_PROGRAM);
    assert_eq!(canvas.render_all(generation), BatchStatus::Complete);

    assert_eq!(&first, canvas.scene());
}

#[test]
fn test_batches_yield_between_turns() {
    let mut canvas = canvas();
    let program = "G01 X1 Y1\n".repeat(1199);

    let generation = canvas.reload_from_str(&program);
    // 1199 command lines plus the trailing blank line
    assert_eq!(
        canvas.advance(generation),
        BatchStatus::InProgress {
            lines_rendered: 500
        }
    );
    assert_eq!(
        canvas.advance(generation),
        BatchStatus::InProgress {
            lines_rendered: 1000
        }
    );
    assert_eq!(canvas.advance(generation), BatchStatus::Complete);
    assert_eq!(canvas.advance(generation), BatchStatus::Complete);
    assert_eq!(canvas.lines_rendered(), 1200);
}

#[test]
fn test_new_generation_invalidates_old_run() {
    let mut canvas = canvas();
    let program = "G01 X1 Y1\n".repeat(2000);

    let old = canvas.reload_from_str(&program);
    assert!(matches!(
        canvas.advance(old),
        BatchStatus::InProgress { .. }
    ));

    let new = canvas.reload_from_str(&program);
    assert_eq!(canvas.advance(old), BatchStatus::Stale);
    assert!(matches!(
        canvas.advance(new),
        BatchStatus::InProgress { .. }
    ));
}

#[test]
fn test_oversize_program_renders_prefix_with_one_warning() {
    let mut canvas = canvas();
    let program = "G01 X1 Y1\n".repeat(70_000);

    let generation = canvas.reload_from_str(&program);
    assert_eq!(canvas.render_all(generation), BatchStatus::Complete);

    assert_eq!(canvas.lines_rendered(), 60_000);
    let messages = canvas.messages().drain();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].level, MessageLevel::Warning);
    assert!(messages[0].text.contains("60000"));
}

#[test]
fn test_depth_markers_through_pipeline() {
    let mut canvas = canvas();
    let generation = canvas.reload_from_str("G01 X1 Y1\nG01 Z2\nG01 Z-2\nG01 Z-1.99\n");
    canvas.render_all(generation);

    let markers: Vec<_> = canvas
        .scene()
        .group(Group::Program)
        .filter_map(|primitive| match primitive {
            RenderPrimitive::MarkerCircle { radius, color, .. } => Some((*radius, *color)),
            _ => None,
        })
        .collect();
    assert_eq!(markers, vec![(1.0, Color::GREEN), (2.0, Color::RED)]);
}

#[test]
fn test_z_move_index_exposed_for_navigation() {
    let mut canvas = canvas();
    canvas.reload_from_str("G01 X1 Y1\nG01 Z2\nG01 Z-2\nG01 Z-1.99\n");
    assert_eq!(canvas.z_moves(), &[0, 1, 1]);
}

#[test]
fn test_workspace_geometry_survives_reload() {
    let mut canvas = canvas();
    assert_eq!(canvas.scene().group_len(Group::Workspace), 6);

    let generation = canvas.reload_from_str(SAMPLE_PROGRAM);
    canvas.render_all(generation);
    let program_primitives = canvas.scene().group_len(Group::Program);
    assert!(program_primitives > 0);

    let generation = canvas.reload_from_str(SAMPLE_PROGRAM);
    canvas.render_all(generation);
    assert_eq!(canvas.scene().group_len(Group::Workspace), 6);
    assert_eq!(canvas.scene().group_len(Group::Program), program_primitives);
}

#[test]
fn test_float_truncation_setting() {
    let mut canvas = GcodeCanvas::new(CanvasSettings {
        truncate_floats: true,
        float_digits: 2,
        ..CanvasSettings::default()
    });

    canvas.reload_from_str("G01 X1.23456\nG01 X1.2\n");
    assert_eq!(canvas.program().line(0), Some("G01 X1.23 "));
    assert_eq!(canvas.program().line(1), Some("G01 X1.2 "));
}

#[test]
fn test_shift_offsets_program_geometry() {
    let mut canvas = GcodeCanvas::new(CanvasSettings {
        shift: dvec2(10.0, 5.0),
        ..CanvasSettings::default()
    });

    let generation = canvas.reload_from_str("G01 X1 Y1\n");
    canvas.render_all(generation);

    assert_eq!(canvas.program().line(0), Some("G01 X11 Y6 "));
    assert_eq!(canvas.interpreter_state().position.x, 11.0);
    assert_eq!(canvas.interpreter_state().position.y, 6.0);
}

#[test]
fn test_file_load_and_recoverable_file_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "G01 X5 Y5\n").unwrap();

    let mut canvas = canvas();
    let generation = canvas.set_gcode_file(file.path().to_string_lossy());
    canvas.render_all(generation);
    assert_eq!(canvas.interpreter_state().position.x, 5.0);
    assert!(canvas.messages().is_empty());

    // A vanished file is recoverable: user message, file reference cleared
    let missing = file.path().with_extension("gone");
    let generation = canvas.set_gcode_file(missing.to_string_lossy());
    assert_eq!(canvas.render_all(generation), BatchStatus::Complete);

    let messages = canvas.messages().drain();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].level, MessageLevel::Error);
    assert!(canvas.settings().gcode_file.is_empty());
    assert!(canvas.program().is_empty());
}

#[test]
fn test_settings_round_trip_through_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("canvas.json");

    let settings = CanvasSettings {
        gcode_file: "bracket.nc".into(),
        shift: dvec2(12.0, -3.5),
        units: pathview_core::Units::Mm,
        depth_tolerance: 0.1,
        truncate_floats: true,
        float_digits: 3,
        bed_width: 1200.0,
        bed_height: 900.0,
    };
    settings.save(&path).unwrap();
    let loaded = CanvasSettings::load(&path).unwrap();
    assert_eq!(loaded, settings);
}

#[test]
fn test_move_to_point_queues_command() {
    let mut canvas = canvas();
    canvas.move_to_point(dvec2(3.0, 4.0));
    assert_eq!(canvas.commands().drain(), vec!["G0 X3.000 Y4.000 "]);
}

#[test]
fn test_move_to_point_respects_units() {
    let mut canvas = canvas();
    let generation = canvas.reload_from_str("G20\n");
    canvas.render_all(generation);

    canvas.move_to_point(dvec2(25.4, 50.8));
    assert_eq!(canvas.commands().drain(), vec!["G0 X1.000 Y2.000 "]);
}

#[test]
fn test_return_to_center_sequence() {
    let mut canvas = canvas();
    canvas.return_to_center();
    assert_eq!(
        canvas.commands().drain(),
        vec!["G90  ", "G00 Z5.0 ", "G00 X0.0 Y0.0 "]
    );

    let generation = canvas.reload_from_str("G20\n");
    canvas.render_all(generation);
    canvas.return_to_center();
    assert_eq!(
        canvas.commands().drain(),
        vec!["G90  ", "G00 Z.25 ", "G00 X0.0 Y0.0 "]
    );
}

#[test]
fn test_mark_point_survives_reload() {
    let mut canvas = canvas();
    let workspace = canvas.mark_point(dvec2(7.0, 8.0));
    assert_eq!(workspace, dvec2(7.0, 8.0));
    assert_eq!(canvas.scene().group_len(Group::Marker), 1);

    let generation = canvas.reload_from_str(SAMPLE_PROGRAM);
    canvas.render_all(generation);
    assert_eq!(canvas.scene().group_len(Group::Marker), 1);
}

#[test]
fn test_highlight_follows_line_endpoints() {
    let mut canvas = canvas();
    let generation = canvas.reload_from_str("G00 X1 Y1\nG01 X2 Y2\n");
    canvas.render_all(generation);

    canvas.highlight_line(0);
    let highlights: Vec<_> = canvas.scene().group(Group::Highlight).collect();
    assert_eq!(highlights.len(), 1);
    assert_eq!(
        highlights[0],
        &RenderPrimitive::Segment {
            start: dvec2(1.0, 1.0),
            end: dvec2(2.0, 2.0),
            style: LineStyle::Solid,
            color: Color::GREEN,
        }
    );

    // Highlighting another line replaces the previous highlight
    canvas.highlight_line(1);
    assert_eq!(canvas.scene().group_len(Group::Highlight), 1);

    // Out-of-range indices just clear the highlight
    canvas.highlight_line(99);
    assert_eq!(canvas.scene().group_len(Group::Highlight), 0);
}

#[test]
fn test_arc_polyline_stays_on_circle() {
    let mut canvas = canvas();
    let generation = canvas.reload_from_str("G00 X10 Y0\nG03 X0 Y10 I-10 J0\n");
    canvas.render_all(generation);

    let polyline = canvas
        .scene()
        .group(Group::Program)
        .find_map(|primitive| match primitive {
            RenderPrimitive::Polyline { points, .. } => Some(points),
            _ => None,
        })
        .expect("arc should produce a polyline");

    assert_eq!(polyline.first().copied(), Some(dvec2(10.0, 0.0)));
    assert_eq!(polyline.last().copied(), Some(dvec2(0.0, 10.0)));
    for point in polyline {
        assert!((point.length() - 10.0).abs() < 1e-9);
    }
}
