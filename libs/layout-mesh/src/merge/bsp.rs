//! # 2D BSP Tree
//!
//! Binary Space Partitioning tree over boundary segments, for planar
//! boolean operations. Planar transcription of the csg.js algorithm:
//!
//! - `clip_to`: Remove segments from this tree that are inside another tree
//! - `invert`: Flip all segments and swap front/back subtrees
//! - `all_segments`: Collect all segments from the tree
//!
//! ## Stack Safety
//!
//! All operations use iterative algorithms with explicit work stacks, so
//! deeply unbalanced trees from pathological layouts cannot overflow the
//! call stack.

use super::line::Line;
use super::segment::Segment;

/// A node in the 2D BSP tree.
///
/// Each node partitions the plane by a line and stores the segments
/// coincident with that line.
#[derive(Debug, Clone, Default)]
pub struct BspNode {
    /// Splitting line, fixed at build time. Kept separately from the
    /// segment list: clipping may empty `segments`, but the node must
    /// still partition space for later clip passes.
    line: Option<Line>,
    /// Segments coincident with this node's line.
    segments: Vec<Segment>,
    /// Front subtree (outside the solid boundary).
    front: Option<Box<BspNode>>,
    /// Back subtree (inside the solid boundary).
    back: Option<Box<BspNode>>,
}

impl BspNode {
    /// Creates a new BSP tree from segments.
    ///
    /// # Arguments
    ///
    /// * `segments` - Boundary segments to build the tree from
    /// * `epsilon` - Coplanarity tolerance for classification
    pub fn new(segments: Vec<Segment>, epsilon: f64) -> Self {
        let mut root = Self::default();

        if segments.is_empty() {
            return root;
        }

        // Build iteratively using a work stack of (node, segments to add).
        type WorkItem = (*mut BspNode, Vec<Segment>);
        let mut stack: Vec<WorkItem> = vec![(&mut root as *mut BspNode, segments)];

        while let Some((node_ptr, segs)) = stack.pop() {
            if segs.is_empty() {
                continue;
            }

            // Safety: every pointer on the stack refers to a node owned by
            // `root`, and each node is processed exactly once.
            let node = unsafe { &mut *node_ptr };

            let mut segs = segs;
            let splitter = segs.swap_remove(0);
            let line = splitter.line();
            node.line = Some(line);
            node.segments.push(splitter);

            let estimated = segs.len() / 2 + 1;
            let mut front_segs = Vec::with_capacity(estimated);
            let mut back_segs = Vec::with_capacity(estimated);
            // Coplanar segments stay in this node, whichever way they face.
            let mut coplanar_front = Vec::new();
            let mut coplanar_back = Vec::new();

            for seg in segs {
                seg.split(
                    &line,
                    epsilon,
                    &mut coplanar_front,
                    &mut coplanar_back,
                    &mut front_segs,
                    &mut back_segs,
                );
            }
            node.segments.extend(coplanar_front);
            node.segments.extend(coplanar_back);

            if !front_segs.is_empty() {
                let front = node.front.get_or_insert_with(Default::default);
                stack.push((front.as_mut() as *mut BspNode, front_segs));
            }
            if !back_segs.is_empty() {
                let back = node.back.get_or_insert_with(Default::default);
                stack.push((back.as_mut() as *mut BspNode, back_segs));
            }
        }

        root
    }

    /// Inverts this tree (flips all segments and swaps subtrees).
    pub fn invert(&mut self) {
        let mut stack: Vec<*mut BspNode> = vec![self as *mut BspNode];

        while let Some(node_ptr) = stack.pop() {
            // Safety: pointers cover disjoint subtrees of `self`.
            let node = unsafe { &mut *node_ptr };

            if let Some(line) = node.line.as_mut() {
                *line = line.flip();
            }
            for seg in &mut node.segments {
                *seg = seg.flip();
            }
            std::mem::swap(&mut node.front, &mut node.back);

            if let Some(ref mut front) = node.front {
                stack.push(front.as_mut() as *mut BspNode);
            }
            if let Some(ref mut back) = node.back {
                stack.push(back.as_mut() as *mut BspNode);
            }
        }
    }

    /// Clips segments to this tree, keeping what lies outside the solid.
    pub fn clip_segments(&self, segments: Vec<Segment>, epsilon: f64) -> Vec<Segment> {
        if self.line.is_none() {
            return segments;
        }

        let mut result = Vec::new();
        let mut stack: Vec<(&BspNode, Vec<Segment>)> = vec![(self, segments)];

        while let Some((node, segs)) = stack.pop() {
            if segs.is_empty() {
                continue;
            }
            let Some(line) = node.line else {
                result.extend(segs);
                continue;
            };

            let mut front_segs = Vec::new();
            let mut back_segs = Vec::new();
            let mut coplanar_front = Vec::new();
            let mut coplanar_back = Vec::new();

            for seg in segs {
                seg.split(
                    &line,
                    epsilon,
                    &mut coplanar_front,
                    &mut coplanar_back,
                    &mut front_segs,
                    &mut back_segs,
                );
            }
            // Coincident segments go with the side they face.
            front_segs.append(&mut coplanar_front);
            back_segs.append(&mut coplanar_back);

            if let Some(ref front) = node.front {
                stack.push((front.as_ref(), front_segs));
            } else {
                result.extend(front_segs);
            }

            if let Some(ref back) = node.back {
                stack.push((back.as_ref(), back_segs));
            }
            // No back subtree: back segments are inside the solid, dropped.
        }

        result
    }

    /// Clips this tree's segments to another tree.
    pub fn clip_to(&mut self, other: &BspNode, epsilon: f64) {
        let mut stack: Vec<*mut BspNode> = vec![self as *mut BspNode];

        while let Some(node_ptr) = stack.pop() {
            // Safety: pointers cover disjoint subtrees of `self`.
            let node = unsafe { &mut *node_ptr };

            node.segments = other.clip_segments(std::mem::take(&mut node.segments), epsilon);

            if let Some(ref mut front) = node.front {
                stack.push(front.as_mut() as *mut BspNode);
            }
            if let Some(ref mut back) = node.back {
                stack.push(back.as_mut() as *mut BspNode);
            }
        }
    }

    /// Collects all segments from this tree.
    pub fn all_segments(&self) -> Vec<Segment> {
        let mut result = Vec::new();
        let mut stack: Vec<&BspNode> = vec![self];

        while let Some(node) = stack.pop() {
            result.extend(node.segments.iter().copied());

            if let Some(ref front) = node.front {
                stack.push(front.as_ref());
            }
            if let Some(ref back) = node.back {
                stack.push(back.as_ref());
            }
        }

        result
    }
}

impl Drop for BspNode {
    fn drop(&mut self) {
        // Iterative drop to avoid stack overflow on degenerate trees.
        let mut stack = Vec::new();

        if let Some(front) = self.front.take() {
            stack.push(front);
        }
        if let Some(back) = self.back.take() {
            stack.push(back);
        }

        while let Some(mut node) = stack.pop() {
            if let Some(front) = node.front.take() {
                stack.push(front);
            }
            if let Some(back) = node.back.take() {
                stack.push(back);
            }
        }
    }
}
