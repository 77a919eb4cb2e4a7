//! Path geometry construction
//!
//! Turns interpreted motion commands into renderable primitives: dashed
//! segments for rapid moves, a continuous solid polyline for cutting
//! moves (arcs are tessellated into it), and circle markers where the
//! depth changes by more than the tolerance.

use glam::DVec2;
use pathview_core::Point3;
use std::f64::consts::TAU;
use tracing::trace;

use super::primitives::{Color, Group, LineStyle, RenderPrimitive, Scene};
use crate::gcode::interpreter::MotionCommand;

/// Swept-angle step between tessellated arc vertices, in radians
const ARC_STEP_RADIANS: f64 = 0.1;
/// Marker radius for retracts (depth increases)
pub const RETRACT_MARKER_RADIUS: f64 = 1.0;
/// Marker radius for plunges (depth decreases)
pub const PLUNGE_MARKER_RADIUS: f64 = 2.0;

/// Builds program geometry from interpreted motion commands
#[derive(Debug, Clone)]
pub struct PathGeometryBuilder {
    depth_tolerance: f64,
    draw_color: Color,
    open_polyline: Vec<DVec2>,
    line_endpoints: Vec<Point3>,
}

impl PathGeometryBuilder {
    /// Create a builder with the given depth-change tolerance
    pub fn new(depth_tolerance: f64) -> Self {
        Self {
            depth_tolerance,
            draw_color: Color::DRAW,
            open_polyline: Vec::new(),
            line_endpoints: Vec::new(),
        }
    }

    /// Discard any open polyline and recorded endpoints
    pub fn reset(&mut self, depth_tolerance: f64) {
        self.depth_tolerance = depth_tolerance;
        self.open_polyline.clear();
        self.line_endpoints.clear();
    }

    /// Apply one motion command to the scene
    pub fn apply(&mut self, scene: &mut Scene, command: &MotionCommand) {
        match command {
            MotionCommand::Rapid { from, target } => {
                // A rapid breaks the continuous cut path
                self.commit_polyline(scene);
                scene.push(
                    Group::Program,
                    RenderPrimitive::Segment {
                        start: from.xy(),
                        end: target.xy(),
                        style: LineStyle::Dashed,
                        color: self.draw_color,
                    },
                );
                self.open_polyline.push(target.xy());
                self.depth_marker(scene, from, target);
            }
            MotionCommand::Linear { from, target } => {
                if self.open_polyline.is_empty() {
                    self.open_polyline.push(from.xy());
                }
                self.open_polyline.push(target.xy());
                self.depth_marker(scene, from, target);
            }
            MotionCommand::ArcCw {
                from,
                target,
                center_offset,
            } => {
                self.tessellate_arc(from, target, *center_offset, true);
                self.depth_marker(scene, from, target);
            }
            MotionCommand::ArcCcw {
                from,
                target,
                center_offset,
            } => {
                self.tessellate_arc(from, target, *center_offset, false);
                self.depth_marker(scene, from, target);
            }
            MotionCommand::UnitChange(_)
            | MotionCommand::ModeChange(_)
            | MotionCommand::NoOp
            | MotionCommand::Unrecognized => {}
        }
    }

    /// Record the interpreter position after a program line, for
    /// current-line highlighting.
    pub fn record_endpoint(&mut self, position: Point3) {
        self.line_endpoints.push(position);
    }

    /// Interpreter position after each processed program line
    pub fn line_endpoints(&self) -> &[Point3] {
        &self.line_endpoints
    }

    /// Commit any open polyline to the scene. Called when a rapid breaks
    /// the path and when the render run finishes.
    pub fn finish(&mut self, scene: &mut Scene) {
        self.commit_polyline(scene);
    }

    fn commit_polyline(&mut self, scene: &mut Scene) {
        if self.open_polyline.len() > 1 {
            scene.push(
                Group::Program,
                RenderPrimitive::Polyline {
                    points: std::mem::take(&mut self.open_polyline),
                    color: self.draw_color,
                },
            );
        } else {
            self.open_polyline.clear();
        }
    }

    /// Append the tessellated arc to the open cut path.
    ///
    /// The swept angle is stepped in fixed increments from the start
    /// angle; the exact target is always the final vertex so tessellation
    /// undershoot cannot detach the path from the next move.
    fn tessellate_arc(&mut self, from: &Point3, target: &Point3, center_offset: DVec2, clockwise: bool) {
        let center = from.xy() + center_offset;
        let radius = center_offset.length();

        let mut start_angle = angle_from(center, from.xy());
        let mut end_angle = angle_from(center, target.xy());
        if clockwise {
            if end_angle >= start_angle {
                start_angle += TAU;
            }
        } else if end_angle < start_angle {
            end_angle += TAU;
        }

        let sweep = (start_angle - end_angle).abs();
        let direction = if clockwise { -1.0 } else { 1.0 };
        trace!(
            from = %from,
            target = %target,
            radius,
            sweep,
            clockwise,
            "tessellating arc"
        );

        let mut step = 0.0_f64;
        while step.abs() < sweep {
            let angle = start_angle + step;
            self.open_polyline
                .push(center + radius * DVec2::new(angle.cos(), angle.sin()));
            step += ARC_STEP_RADIANS * direction;
        }
        self.open_polyline.push(target.xy());
    }

    fn depth_marker(&self, scene: &mut Scene, from: &Point3, target: &Point3) {
        let delta = target.z - from.z;
        if delta.abs() >= self.depth_tolerance {
            let (color, radius) = if delta > 0.0 {
                (Color::GREEN, RETRACT_MARKER_RADIUS)
            } else {
                (Color::RED, PLUNGE_MARKER_RADIUS)
            };
            scene.push(
                Group::Program,
                RenderPrimitive::MarkerCircle {
                    center: from.xy(),
                    radius,
                    color,
                },
            );
        }
    }
}

/// Angle of `point` around `center`, normalized into `[0, 2π)`
fn angle_from(center: DVec2, point: DVec2) -> f64 {
    let angle = (point.y - center.y).atan2(point.x - center.x);
    if angle < 0.0 {
        angle + TAU
    } else {
        angle
    }
}
