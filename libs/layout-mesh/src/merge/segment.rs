//! # Boundary Segment for 2D BSP Operations
//!
//! A directed boundary edge with line and splitting support. The enclosed
//! solid lies on the segment's left; its outward normal points right.

use glam::DVec2;

use super::line::{Classification, Line};

// =============================================================================
// SEGMENT
// =============================================================================

/// A directed boundary edge `a -> b` with its carrier line.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    /// Start point.
    pub a: DVec2,
    /// End point.
    pub b: DVec2,
    /// Line through the segment, normal pointing outside the solid.
    line: Line,
}

impl Segment {
    /// Create a segment from two points.
    ///
    /// Returns None if the points are too close to carry a line.
    pub fn from_points(a: DVec2, b: DVec2) -> Option<Self> {
        let line = Line::from_points(a, b)?;
        Some(Self { a, b, line })
    }

    /// Get the carrier line.
    pub fn line(&self) -> Line {
        self.line
    }

    /// Flip the segment (reverse direction and line).
    pub fn flip(&self) -> Segment {
        Segment {
            a: self.b,
            b: self.a,
            line: self.line.flip(),
        }
    }

    /// Classify this segment relative to a line.
    pub fn classify(&self, line: &Line, epsilon: f64) -> Classification {
        let ca = line.classify_point(self.a, epsilon);
        let cb = line.classify_point(self.b, epsilon);

        match (ca, cb) {
            (Classification::Coplanar, Classification::Coplanar) => Classification::Coplanar,
            (Classification::Front, Classification::Back)
            | (Classification::Back, Classification::Front) => Classification::Spanning,
            (Classification::Front, _) | (_, Classification::Front) => Classification::Front,
            (Classification::Back, _) | (_, Classification::Back) => Classification::Back,
            _ => Classification::Coplanar,
        }
    }

    /// Split this segment by a line.
    ///
    /// ## Parameters
    ///
    /// - `line`: Splitting line
    /// - `epsilon`: Coplanarity tolerance
    /// - `coplanar_front`: Output for coincident segments facing the same way
    /// - `coplanar_back`: Output for coincident segments facing the opposite way
    /// - `front`: Output for segments in front of the line
    /// - `back`: Output for segments behind the line
    pub fn split(
        &self,
        line: &Line,
        epsilon: f64,
        coplanar_front: &mut Vec<Segment>,
        coplanar_back: &mut Vec<Segment>,
        front: &mut Vec<Segment>,
        back: &mut Vec<Segment>,
    ) {
        match self.classify(line, epsilon) {
            Classification::Coplanar => {
                if self.line.normal().dot(line.normal()) > 0.0 {
                    coplanar_front.push(*self);
                } else {
                    coplanar_back.push(*self);
                }
            }
            Classification::Front => front.push(*self),
            Classification::Back => back.push(*self),
            Classification::Spanning => {
                let da = line.signed_distance(self.a);
                let db = line.signed_distance(self.b);
                let t = da / (da - db);
                let mid = self.a.lerp(self.b, t);

                let (first, second) = if da > 0.0 {
                    (
                        Segment::from_points(self.a, mid),
                        Segment::from_points(mid, self.b),
                    )
                } else {
                    (
                        Segment::from_points(mid, self.b),
                        Segment::from_points(self.a, mid),
                    )
                };
                if let Some(seg) = first {
                    front.push(seg);
                }
                if let Some(seg) = second {
                    back.push(seg);
                }
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
