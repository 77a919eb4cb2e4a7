//! Render primitives and the grouped drawing surface

use glam::DVec2;

/// RGB color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red component
    pub r: f32,
    /// Green component
    pub g: f32,
    /// Blue component
    pub b: f32,
}

impl Color {
    /// Default toolpath drawing color
    pub const DRAW: Color = Color::rgb(0.47, 0.47, 0.47);
    /// Retract markers and highlights
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    /// Plunge markers
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);

    /// Create a color from RGB components
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Segment stroke style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// Continuous stroke (cutting moves, workspace bounds)
    Solid,
    /// Dashed stroke (rapid moves, axis lines)
    Dashed,
}

/// Scene group a primitive belongs to; clears are group-selective
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    /// Workspace boundary and axis lines, preserved across reloads
    Workspace,
    /// Program geometry, cleared and regenerated on reload
    Program,
    /// Current-line highlight, cleared on every highlight change
    Highlight,
    /// User-placed marks
    Marker,
}

/// One drawable primitive
#[derive(Debug, Clone, PartialEq)]
pub enum RenderPrimitive {
    /// Straight segment between two points
    Segment {
        /// Start point
        start: DVec2,
        /// End point
        end: DVec2,
        /// Stroke style
        style: LineStyle,
        /// Stroke color
        color: Color,
    },
    /// Connected point sequence (cut paths, tessellated arcs)
    Polyline {
        /// Ordered vertices
        points: Vec<DVec2>,
        /// Stroke color
        color: Color,
    },
    /// Circle marker (depth changes, user marks)
    MarkerCircle {
        /// Center point
        center: DVec2,
        /// Radius
        radius: f64,
        /// Fill color
        color: Color,
    },
}

/// The drawing surface: an ordered list of grouped primitives.
///
/// Primitives are owned by the scene until a group-selective clear
/// discards them; a program reload clears `Group::Program` while the
/// workspace geometry stays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    items: Vec<(Group, RenderPrimitive)>,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a primitive to a group
    pub fn push(&mut self, group: Group, primitive: RenderPrimitive) {
        self.items.push((group, primitive));
    }

    /// Discard every primitive in `group`, preserving the others
    pub fn clear_group(&mut self, group: Group) {
        self.items.retain(|(g, _)| *g != group);
    }

    /// All primitives in draw order
    pub fn iter(&self) -> impl Iterator<Item = &(Group, RenderPrimitive)> {
        self.items.iter()
    }

    /// Primitives belonging to `group`, in draw order
    pub fn group(&self, group: Group) -> impl Iterator<Item = &RenderPrimitive> {
        self.items
            .iter()
            .filter(move |(g, _)| *g == group)
            .map(|(_, p)| p)
    }

    /// Number of primitives in `group`
    pub fn group_len(&self, group: Group) -> usize {
        self.group(group).count()
    }

    /// Total number of primitives
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether the scene is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
