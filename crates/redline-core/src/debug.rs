use serde::{Deserialize, Serialize};

use crate::{Rotation3, Vector3};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebugColor {
    #[default]
    White,
    Red,
    Green,
    Blue,
    Orange,
    Purple,
}

/// A single item of the debug overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum DebugShape {
    /// Screen-space text. `(0, 0)` is the top left of the screen
    Text2D {
        text: String,
        position: Vector3,
        scale: u32,
        color: DebugColor,
    },
    /// World-space text that always faces the camera
    Text3D {
        text: String,
        position: Vector3,
        scale: u32,
        color: DebugColor,
    },
    Line2D {
        start: Vector3,
        end: Vector3,
        color: DebugColor,
    },
    Line3D {
        start: Vector3,
        end: Vector3,
        color: DebugColor,
    },
    Polyline3D {
        points: Vec<Vector3>,
        color: DebugColor,
    },
    Rect3D {
        center: Vector3,
        width: u32,
        height: u32,
        fill: bool,
        color: DebugColor,
    },
}

/// Buffer for the debug overlay.
///
/// Drawing is purely observational: the buffer is cleared at the start of every tick and
/// nothing in the bot ever reads it back. Whatever renders the overlay picks up
/// [`DebugDraw::shapes`] after the tick.
#[derive(Debug, Clone, Default)]
pub struct DebugDraw {
    shapes: Vec<DebugShape>,
}

impl DebugDraw {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn shapes(&self) -> &[DebugShape] {
        &self.shapes
    }

    pub fn text_2d(
        &mut self,
        text: impl Into<String>,
        position: Vector3,
        scale: u32,
        color: DebugColor,
    ) {
        self.shapes.push(DebugShape::Text2D {
            text: text.into(),
            position,
            scale,
            color,
        });
    }

    pub fn text_3d(
        &mut self,
        text: impl Into<String>,
        position: Vector3,
        scale: u32,
        color: DebugColor,
    ) {
        self.shapes.push(DebugShape::Text3D {
            text: text.into(),
            position,
            scale,
            color,
        });
    }

    pub fn line_2d(&mut self, start: Vector3, end: Vector3, color: DebugColor) {
        self.shapes.push(DebugShape::Line2D { start, end, color });
    }

    pub fn line_3d(&mut self, start: Vector3, end: Vector3, color: DebugColor) {
        self.shapes.push(DebugShape::Line3D { start, end, color });
    }

    pub fn polyline_3d(&mut self, points: Vec<Vector3>, color: DebugColor) {
        if points.len() >= 2 {
            self.shapes.push(DebugShape::Polyline3D { points, color });
        }
    }

    pub fn rect_3d(
        &mut self,
        center: Vector3,
        width: u32,
        height: u32,
        fill: bool,
        color: DebugColor,
    ) {
        self.shapes.push(DebugShape::Rect3D {
            center,
            width,
            height,
            fill,
            color,
        });
    }

    /// A circle around `center` in the plane perpendicular to `normal`.
    pub fn circle(&mut self, center: Vector3, normal: Vector3, radius: f64, color: DebugColor) {
        let Some(axis) = nalgebra::Unit::try_new(normal, 1e-9) else {
            return;
        };
        // Any vector that isn't parallel to the normal gives a valid starting arm
        let helper = if axis.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };
        let arm = axis.cross(&helper).normalize() * radius;
        let pieces = radius.max(0.0).powf(0.7) as usize + 5;
        let step = Rotation3::from_axis_angle(&axis, std::f64::consts::TAU / pieces as f64);

        let mut points = Vec::with_capacity(pieces + 1);
        let mut current = arm;
        for _ in 0..=pieces {
            points.push(center + current);
            current = step * current;
        }
        self.polyline_3d(points, color);
    }

    /// Three axis-aligned lines through `center`.
    pub fn cross(&mut self, center: Vector3, size: f64, color: DebugColor) {
        for axis in [Vector3::x(), Vector3::y(), Vector3::z()] {
            self.line_3d(center + axis * size, center - axis * size, color);
        }
    }

    /// The edges of an axis-aligned box.
    pub fn cube(&mut self, center: Vector3, size: Vector3, color: DebugColor) {
        self.rotated_cube(center, Rotation3::identity(), size, color);
    }

    /// The edges of a rotated box.
    pub fn rotated_cube(
        &mut self,
        center: Vector3,
        rotation: Rotation3,
        size: Vector3,
        color: DebugColor,
    ) {
        let half = size / 2.0;
        let corner = |sx: f64, sy: f64, sz: f64| {
            center + rotation * Vector3::new(sx * half.x, sy * half.y, sz * half.z)
        };
        for (a, b) in [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)] {
            // Edges along z, y and x
            self.line_3d(corner(a, b, -1.0), corner(a, b, 1.0), color);
            self.line_3d(corner(a, -1.0, b), corner(a, 1.0, b), color);
            self.line_3d(corner(-1.0, a, b), corner(1.0, a, b), color);
        }
    }

    pub fn octahedron(&mut self, center: Vector3, size: f64, color: DebugColor) {
        let half = size / 2.0;
        let ring = [
            Vector3::new(half, 0.0, 0.0),
            Vector3::new(0.0, half, 0.0),
            Vector3::new(-half, 0.0, 0.0),
            Vector3::new(0.0, -half, 0.0),
        ];
        let top = Vector3::new(0.0, 0.0, half);
        for (i, point) in ring.iter().enumerate() {
            let next = ring[(i + 1) % ring.len()];
            self.line_3d(center + point, center + next, color);
            self.line_3d(center + point, center + top, color);
            self.line_3d(center + point, center - top, color);
        }
    }
}
