//! # Splitting Line for 2D BSP Operations
//!
//! Planar analog of a BSP splitting plane: a directed line with point
//! classification.

use glam::DVec2;

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Classification of a point or segment relative to a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// In front of the line (positive side, outside the solid).
    Front,
    /// Behind the line (negative side, inside the solid).
    Back,
    /// On the line.
    Coplanar,
    /// Segment crosses the line (endpoints on both sides).
    Spanning,
}

// =============================================================================
// LINE
// =============================================================================

/// A directed line defined by unit normal and offset from origin.
///
/// For a boundary edge of a counter-clockwise ring, the normal points to
/// the right of the edge direction, away from the enclosed solid: front is
/// outside, back is inside.
#[derive(Debug, Clone, Copy)]
pub struct Line {
    /// Normal vector (unit length), pointing outside.
    normal: DVec2,
    /// Distance from origin along normal.
    w: f64,
}

impl Line {
    /// Create line from normal and distance.
    pub fn new(normal: DVec2, w: f64) -> Self {
        Self { normal, w }
    }

    /// Create the line through a directed edge `a -> b`.
    ///
    /// Returns None for degenerate (near zero-length) edges.
    pub fn from_points(a: DVec2, b: DVec2) -> Option<Self> {
        let direction = b - a;
        let length = direction.length();
        if length < 1e-12 {
            return None;
        }
        // Right-hand normal of the direction: outside of a CCW ring.
        let normal = DVec2::new(direction.y, -direction.x) / length;
        Some(Self {
            normal,
            w: normal.dot(a),
        })
    }

    /// Get the line normal.
    pub fn normal(&self) -> DVec2 {
        self.normal
    }

    /// Get the line offset.
    pub fn w(&self) -> f64 {
        self.w
    }

    /// Flip the line (reverse normal).
    pub fn flip(&self) -> Line {
        Line {
            normal: -self.normal,
            w: -self.w,
        }
    }

    /// Signed distance from point to line.
    ///
    /// Positive = front, negative = back, zero = on the line.
    pub fn signed_distance(&self, point: DVec2) -> f64 {
        self.normal.dot(point) - self.w
    }

    /// Classify a point relative to this line with tolerance `epsilon`.
    pub fn classify_point(&self, point: DVec2, epsilon: f64) -> Classification {
        let dist = self.signed_distance(point);
        if dist > epsilon {
            Classification::Front
        } else if dist < -epsilon {
            Classification::Back
        } else {
            Classification::Coplanar
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_line_from_points_normal_points_right() {
        // Edge along +x: right-hand normal points -y.
        let line = Line::from_points(DVec2::ZERO, DVec2::new(2.0, 0.0)).unwrap();
        assert!((line.normal() - DVec2::new(0.0, -1.0)).length() < EPS);
    }

    #[test]
    fn test_line_from_points_degenerate() {
        assert!(Line::from_points(DVec2::ZERO, DVec2::ZERO).is_none());
    }

    #[test]
    fn test_line_classify_point() {
        let line = Line::from_points(DVec2::ZERO, DVec2::new(1.0, 0.0)).unwrap();
        // Solid of a CCW ring lies above this bottom edge: +y is back.
        assert_eq!(
            line.classify_point(DVec2::new(0.5, 1.0), EPS),
            Classification::Back
        );
        assert_eq!(
            line.classify_point(DVec2::new(0.5, -1.0), EPS),
            Classification::Front
        );
        assert_eq!(
            line.classify_point(DVec2::new(0.5, 0.0), EPS),
            Classification::Coplanar
        );
    }

    #[test]
    fn test_line_flip() {
        let line = Line::new(DVec2::new(0.0, 1.0), 5.0);
        let flipped = line.flip();
        assert!((flipped.normal() + DVec2::new(0.0, 1.0)).length() < EPS);
        assert!((flipped.w() + 5.0).abs() < EPS);
    }
}
