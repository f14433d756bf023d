//! Table boundary walls
//!
//! Each wall is an axis-aligned box guarding one edge of the table. Which
//! axis it guards, on which side, and whether it bounces the ball is looked
//! up from the edge tag rather than branched on at every call site.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Table edge a wall guards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallEdge {
    /// Far end (+z)
    Front,
    /// Near end (-z), open: the cue ball leaves the table through it
    Back,
    /// +x side
    Right,
    /// -x side
    Left,
}

/// Table-plane axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Z,
}

impl Axis {
    /// Component of a planar (x, z) vector along this axis
    #[inline]
    pub fn of(self, v: Vec2) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Z => v.y,
        }
    }

    /// Negate the component along this axis, keep the other
    #[inline]
    pub fn flip(self, v: Vec2) -> Vec2 {
        match self {
            Axis::X => Vec2::new(-v.x, v.y),
            Axis::Z => Vec2::new(v.x, -v.y),
        }
    }
}

/// How a ball reacts on reaching a wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Response {
    Bounce,
    Pass,
}

/// Lookup entry for an edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRule {
    pub axis: Axis,
    /// +1 if the wall bounds the positive side of the axis, -1 otherwise
    pub sign: f32,
    pub response: Response,
}

impl WallEdge {
    pub const ALL: [WallEdge; 4] = [
        WallEdge::Front,
        WallEdge::Back,
        WallEdge::Right,
        WallEdge::Left,
    ];

    pub const fn rule(self) -> EdgeRule {
        match self {
            WallEdge::Front => EdgeRule {
                axis: Axis::Z,
                sign: 1.0,
                response: Response::Bounce,
            },
            WallEdge::Back => EdgeRule {
                axis: Axis::Z,
                sign: -1.0,
                response: Response::Pass,
            },
            WallEdge::Right => EdgeRule {
                axis: Axis::X,
                sign: 1.0,
                response: Response::Bounce,
            },
            WallEdge::Left => EdgeRule {
                axis: Axis::X,
                sign: -1.0,
                response: Response::Bounce,
            },
        }
    }

    #[inline]
    pub fn is_open(self) -> bool {
        self.rule().response == Response::Pass
    }
}

/// A wall entity (immutable after setup)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub edge: WallEdge,
    pub pos: Vec3,
    /// Extent along x
    pub width: f32,
    pub height: f32,
    /// Extent along z
    pub depth: f32,
}

impl Wall {
    pub fn new(edge: WallEdge, pos: Vec3, width: f32, height: f32, depth: f32) -> Self {
        Self {
            edge,
            pos,
            width,
            height,
            depth,
        }
    }

    #[inline]
    pub fn rule(&self) -> EdgeRule {
        self.edge.rule()
    }

    /// Half the wall's extent along the axis it guards
    pub fn half_thickness(&self) -> f32 {
        match self.rule().axis {
            Axis::X => self.width / 2.0,
            Axis::Z => self.depth / 2.0,
        }
    }

    /// Coordinate of the face the ball hits, along the guarded axis
    pub fn inner_face(&self) -> f32 {
        let rule = self.rule();
        rule.axis.of(crate::planar(self.pos)) - rule.sign * self.half_thickness()
    }
}
