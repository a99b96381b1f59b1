//! Geometric primitives for the diagram viewport.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate (pointer positions, pan offsets)
//! - [`Size`] - Width and height dimensions (nominal diagram size)
//! - [`Bounds`] - A rectangular bounding box (the viewer's client rectangle)
//! - [`ViewTransform`] - The combined scale + translate applied to the markup root
//!
//! # Coordinate System
//!
//! Coordinates follow SVG and screen conventions:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     ▼
//!    +Y
//! ```

/// A 2D point.
///
/// # Examples
///
/// ```
/// # use baudetail_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Returns true if both coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Adds another point to this point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

/// Width and height of a diagram.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns true if either dimension is zero or negative (or not a number)
    pub fn is_degenerate(self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the top-left corner
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns true if the point lies inside or on the edge of the bounds
    pub fn contains(self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Converts an absolute point into coordinates relative to the top-left corner
    pub fn to_local(self, point: Point) -> Point {
        point.sub_point(self.min_point())
    }
}

/// Combined scale + translate applied to the root of the diagram markup.
///
/// Individual parts are never transformed; the whole drawing moves as one.
///
/// ```
/// # use baudetail_core::geometry::{Point, ViewTransform};
/// let transform = ViewTransform::new(1.5, Point::new(10.0, -4.0));
/// assert_eq!(transform.to_svg_value(), "scale(1.5) translate(10 -4)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    scale: f32,
    translate: Point,
}

impl ViewTransform {
    pub fn new(scale: f32, translate: Point) -> Self {
        Self { scale, translate }
    }

    pub fn scale(self) -> f32 {
        self.scale
    }

    pub fn translate(self) -> Point {
        self.translate
    }

    /// Returns true if the transform leaves the markup untouched
    pub fn is_identity(self) -> bool {
        self.scale == 1.0 && self.translate.is_zero()
    }

    /// Returns the SVG `transform` attribute value
    pub fn to_svg_value(self) -> String {
        format!(
            "scale({}) translate({} {})",
            self.scale, self.translate.x, self.translate.y
        )
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new(1.0, Point::default())
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_point_arithmetic() {
        let p = Point::new(3.0, 4.0).add_point(Point::new(1.0, -1.0));
        assert_eq!(p, Point::new(4.0, 3.0));
        assert_eq!(p.sub_point(Point::new(4.0, 3.0)), Point::default());
        assert!(Point::default().is_zero());
    }

    #[test]
    fn test_bounds_contains_and_local() {
        let bounds = Bounds::new_from_top_left(Point::new(100.0, 50.0), Size::new(500.0, 400.0));
        assert!(bounds.contains(Point::new(100.0, 50.0)));
        assert!(bounds.contains(Point::new(600.0, 450.0)));
        assert!(!bounds.contains(Point::new(99.0, 60.0)));

        let local = bounds.to_local(Point::new(150.0, 75.0));
        assert_approx_eq!(f32, local.x(), 50.0);
        assert_approx_eq!(f32, local.y(), 25.0);
        assert_approx_eq!(f32, bounds.width(), 500.0);
        assert_approx_eq!(f32, bounds.height(), 400.0);
    }

    #[test]
    fn test_size_degenerate() {
        assert!(Size::new(0.0, 400.0).is_degenerate());
        assert!(Size::new(500.0, -1.0).is_degenerate());
        assert!(Size::new(f32::NAN, 1.0).is_degenerate());
        assert!(!Size::new(500.0, 400.0).is_degenerate());
    }

    #[test]
    fn test_view_transform() {
        assert!(ViewTransform::default().is_identity());
        assert_eq!(
            ViewTransform::default().to_svg_value(),
            "scale(1) translate(0 0)"
        );
        assert!(!ViewTransform::new(2.0, Point::default()).is_identity());
    }
}
