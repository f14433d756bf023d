//! Collision detection and response
//!
//! Everything is checked on the table plane (x, z). Overlaps are undone with a
//! cheap two-stage retraction toward each ball's previous position: first to
//! the midpoint, then all the way back if the midpoint still overlaps.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::{Ball, BallRole};
use super::wall::{Response, Wall};

/// How far an overlapping pair had to be pulled back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Correction {
    /// Not overlapping, nothing moved
    None,
    /// Moved to the midpoint of current and previous position
    Retracted,
    /// Moved all the way back to the previous position
    RolledBack,
}

/// Result of a ball-ball contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub correction: Correction,
    /// Struck ball was taken off the table
    pub potted: bool,
    /// Mover velocity after the contact
    pub velocity: Vec2,
}

/// Check whether two balls overlap on the table plane
///
/// Balls that are out of play never overlap anything.
pub fn intersects(a: &Ball, b: &Ball) -> bool {
    if !a.exists || !b.exists {
        return false;
    }
    a.center().distance(b.center()) < a.radius + b.radius
}

/// Pull an overlapping pair apart
///
/// A separated pair is left untouched, so calling this repeatedly is safe.
pub fn correct(a: &mut Ball, b: &mut Ball) -> Correction {
    if !intersects(a, b) {
        return Correction::None;
    }

    a.retract_halfway();
    b.retract_halfway();
    if !intersects(a, b) {
        return Correction::Retracted;
    }

    a.roll_back();
    b.roll_back();
    Correction::RolledBack
}

/// Resolve a hit of `mover` into `struck`
///
/// The mover leaves along the line of centers, away from the struck ball,
/// keeping its speed. The struck ball's velocity is left alone; a target is
/// potted. Returns `None` if the pair does not overlap.
pub fn resolve(struck: &mut Ball, mover: &mut Ball) -> Option<Contact> {
    if !intersects(struck, mover) {
        return None;
    }

    let correction = correct(struck, mover);

    let offset = mover.center() - struck.center();
    let distance = offset.length();
    if distance > f32::EPSILON {
        let speed = mover.vel.length();
        mover.vel = offset * (speed / distance);
    } else {
        log::warn!(
            "balls {} and {} share a center, keeping ball {} on its course",
            struck.id,
            mover.id,
            mover.id
        );
    }

    let potted = match struck.role {
        BallRole::Target => {
            struck.pot();
            true
        }
        BallRole::Cue | BallRole::Marker => false,
    };

    log::debug!(
        "ball {} hit ball {} ({:?}), outgoing velocity {:?}",
        mover.id,
        struck.id,
        correction,
        mover.vel
    );

    Some(Contact {
        correction,
        potted,
        velocity: mover.vel,
    })
}

/// Check whether a ball has crossed a wall's face
///
/// Open walls never report a crossing: the ball has to be able to leave
/// through them.
pub fn wall_intersects(wall: &Wall, ball: &Ball) -> bool {
    if !ball.exists {
        return false;
    }
    let rule = wall.rule();
    if rule.response == Response::Pass {
        return false;
    }
    let c = rule.axis.of(ball.center());
    rule.sign * c + ball.radius > rule.sign * wall.inner_face()
}

/// Pull a ball back out of a wall (the wall never moves)
pub fn correct_wall(wall: &Wall, ball: &mut Ball) -> Correction {
    if !wall_intersects(wall, ball) {
        return Correction::None;
    }

    ball.retract_halfway();
    if !wall_intersects(wall, ball) {
        return Correction::Retracted;
    }

    ball.roll_back();
    Correction::RolledBack
}

/// Resolve a ball reaching a wall
///
/// The velocity component across the wall is negated, the component along
/// it is kept. Returns `None` if the ball has not crossed the wall.
pub fn resolve_wall(wall: &Wall, ball: &mut Ball) -> Option<Correction> {
    if !wall_intersects(wall, ball) {
        return None;
    }

    let correction = correct_wall(wall, ball);
    ball.vel = reflect(wall, ball.vel);

    log::debug!(
        "ball {} bounced off {:?} wall ({:?})",
        ball.id,
        wall.edge,
        correction
    );
    Some(correction)
}

/// Mirror a velocity off a wall
#[inline]
pub fn reflect(wall: &Wall, velocity: Vec2) -> Vec2 {
    wall.rule().axis.flip(velocity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::wall::WallEdge;
    use glam::Vec3;
    use proptest::prelude::*;

    fn ball(id: u32, role: BallRole, x: f32, z: f32) -> Ball {
        Ball::new(id, role, Vec3::new(x, BALL_RADIUS, z), BALL_RADIUS)
    }

    fn front_wall() -> Wall {
        Wall::new(
            WallEdge::Front,
            Vec3::new(0.0, WALL_Y, 4.5),
            TABLE_WIDTH,
            WALL_HEIGHT,
            WALL_THICKNESS,
        )
    }

    fn side_wall(edge: WallEdge, x: f32) -> Wall {
        Wall::new(
            edge,
            Vec3::new(x, WALL_Y, 0.0),
            WALL_THICKNESS,
            WALL_HEIGHT,
            TABLE_DEPTH,
        )
    }

    #[test]
    fn test_intersects_by_distance() {
        let a = ball(1, BallRole::Target, 0.0, 0.0);
        let mut b = ball(2, BallRole::Cue, 0.3, 0.0);
        assert!(intersects(&a, &b));
        assert!(intersects(&b, &a));

        b.set_center(Vec2::new(0.5, 0.0));
        assert!(!intersects(&a, &b));
    }

    #[test]
    fn test_intersects_ignores_height() {
        let a = ball(1, BallRole::Target, 0.0, 0.0);
        let mut b = ball(2, BallRole::Cue, 0.0, 0.3);
        b.pos.y = 50.0;
        assert!(intersects(&a, &b));
    }

    #[test]
    fn test_potted_ball_never_intersects() {
        let mut a = ball(1, BallRole::Target, 0.0, 0.0);
        let b = ball(2, BallRole::Cue, 0.0, 0.0);
        a.exists = false;
        assert!(!intersects(&a, &b));
    }

    #[test]
    fn test_correct_retracts_to_midpoint() {
        let mut target = ball(1, BallRole::Target, 0.0, 0.0);
        let mut cue = ball(2, BallRole::Cue, 0.0, -1.0);
        // Cue came from z=-1.0 and jumped to z=-0.3
        cue.set_center(Vec2::new(0.0, -0.3));

        let correction = correct(&mut target, &mut cue);
        assert_eq!(correction, Correction::Retracted);
        assert!((cue.pos.z - -0.65).abs() < 1e-6);
        assert_eq!(target.center(), Vec2::ZERO);
        assert!(!intersects(&target, &cue));
    }

    #[test]
    fn test_correct_rolls_back_when_midpoint_overlaps() {
        let mut target = ball(1, BallRole::Target, 0.0, 0.0);
        let mut cue = ball(2, BallRole::Cue, 0.0, -0.5);
        cue.set_center(Vec2::new(0.0, -0.1));

        // Midpoint is z=-0.3, still within 0.42
        let correction = correct(&mut target, &mut cue);
        assert_eq!(correction, Correction::RolledBack);
        assert_eq!(cue.center(), Vec2::new(0.0, -0.5));
        assert_eq!(target.center(), Vec2::ZERO);
    }

    #[test]
    fn test_resolve_pots_target_and_deflects_cue() {
        let mut target = ball(1, BallRole::Target, 0.0, 0.0);
        let mut cue = ball(2, BallRole::Cue, 0.3, -1.0);
        cue.set_center(Vec2::new(0.3, -0.2));
        cue.vel = Vec2::new(0.0, 2.0);

        let contact = resolve(&mut target, &mut cue).expect("balls overlap");
        assert!(contact.potted);
        assert!(!target.exists);
        assert_eq!(target.pos, OFF_TABLE);

        // Speed kept, direction along the line of centers away from target
        assert!((cue.vel.length() - 2.0).abs() < 1e-5);
        assert!(cue.vel.x > 0.0);
        assert!(cue.vel.y < 0.0);
        assert_eq!(contact.velocity, cue.vel);
    }

    #[test]
    fn test_resolve_marker_survives() {
        let mut marker = ball(1, BallRole::Marker, 0.0, AIM_Z);
        let mut cue = ball(2, BallRole::Cue, 0.0, AIM_Z + 0.6);
        cue.set_center(Vec2::new(0.0, AIM_Z + 0.3));
        cue.vel = Vec2::new(0.0, -2.0);

        let contact = resolve(&mut marker, &mut cue).expect("balls overlap");
        assert!(!contact.potted);
        assert!(marker.exists);
        // Bounced straight back up the table
        assert!(cue.vel.y > 1.99);
        assert!(cue.vel.x.abs() < 1e-5);
    }

    #[test]
    fn test_resolve_separated_is_noop() {
        let mut target = ball(1, BallRole::Target, 0.0, 0.0);
        let mut cue = ball(2, BallRole::Cue, 1.0, 1.0);
        cue.vel = Vec2::new(1.0, 0.0);

        assert!(resolve(&mut target, &mut cue).is_none());
        assert!(target.exists);
        assert_eq!(cue.vel, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_resolve_coincident_centers_keeps_course() {
        let mut target = ball(1, BallRole::Target, 0.0, 0.0);
        let mut cue = ball(2, BallRole::Cue, 0.0, 0.0);
        cue.vel = Vec2::new(0.0, 2.0);

        let contact = resolve(&mut target, &mut cue).expect("balls overlap");
        assert_eq!(contact.correction, Correction::RolledBack);
        assert_eq!(cue.vel, Vec2::new(0.0, 2.0));
        assert!(contact.potted);
    }

    #[test]
    fn test_resolve_stationary_mover_stays_still() {
        let mut target = ball(1, BallRole::Target, 0.0, 0.0);
        let mut cue = ball(2, BallRole::Cue, 0.3, 0.0);

        let contact = resolve(&mut target, &mut cue).expect("balls overlap");
        assert_eq!(contact.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_front_wall_bounce() {
        let wall = front_wall();
        let mut cue = ball(1, BallRole::Cue, 0.0, 4.4);
        cue.vel = Vec2::new(0.5, 2.0);

        assert!(wall_intersects(&wall, &cue));
        let correction = resolve_wall(&wall, &mut cue).expect("ball crossed wall");
        assert_eq!(correction, Correction::RolledBack);
        assert_eq!(cue.vel, Vec2::new(0.5, -2.0));
    }

    #[test]
    fn test_front_wall_retract_clears() {
        let wall = front_wall();
        let mut cue = ball(1, BallRole::Cue, 0.0, 3.9);
        cue.set_center(Vec2::new(0.0, 4.3));
        cue.vel = Vec2::new(0.0, 2.0);

        // Midpoint z=4.1, 4.31 < 4.44
        let correction = resolve_wall(&wall, &mut cue).expect("ball crossed wall");
        assert_eq!(correction, Correction::Retracted);
        assert!((cue.pos.z - 4.1).abs() < 1e-5);
        assert_eq!(cue.vel, Vec2::new(0.0, -2.0));
    }

    #[test]
    fn test_side_walls() {
        let right = side_wall(WallEdge::Right, SIDE_WALL_X);
        let left = side_wall(WallEdge::Left, -SIDE_WALL_X);

        let mut cue = ball(1, BallRole::Cue, 3.0, 0.0);
        cue.vel = Vec2::new(1.0, 1.0);
        assert!(wall_intersects(&right, &cue));
        assert!(!wall_intersects(&left, &cue));
        resolve_wall(&right, &mut cue);
        assert_eq!(cue.vel, Vec2::new(-1.0, 1.0));

        let mut cue = ball(2, BallRole::Cue, -3.0, 0.0);
        cue.vel = Vec2::new(-1.0, 1.0);
        assert!(wall_intersects(&left, &cue));
        resolve_wall(&left, &mut cue);
        assert_eq!(cue.vel, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_open_wall_lets_ball_through() {
        let back = Wall::new(
            WallEdge::Back,
            Vec3::new(0.0, WALL_Y, -4.5),
            TABLE_WIDTH,
            WALL_HEIGHT,
            WALL_THICKNESS,
        );
        let mut cue = ball(1, BallRole::Cue, 0.0, -4.6);
        cue.vel = Vec2::new(0.0, -2.0);

        assert!(!wall_intersects(&back, &cue));
        assert!(resolve_wall(&back, &mut cue).is_none());
        assert_eq!(cue.vel, Vec2::new(0.0, -2.0));
    }

    fn arb_ball(id: u32) -> impl Strategy<Value = Ball> {
        (-3.0f32..3.0, -4.0f32..4.0, -3.0f32..3.0, -4.0f32..4.0).prop_map(
            move |(x, z, px, pz)| {
                let mut b = ball(id, BallRole::Target, px, pz);
                b.set_center(Vec2::new(x, z));
                b
            },
        )
    }

    proptest! {
        #[test]
        fn prop_intersects_symmetric(a in arb_ball(1), b in arb_ball(2)) {
            prop_assert_eq!(intersects(&a, &b), intersects(&b, &a));
        }

        #[test]
        fn prop_correct_separates_or_rolls_back(a in arb_ball(1), b in arb_ball(2)) {
            let (mut a, mut b) = (a, b);
            match correct(&mut a, &mut b) {
                Correction::None | Correction::Retracted => {
                    prop_assert!(!intersects(&a, &b));
                }
                Correction::RolledBack => {
                    prop_assert_eq!(a.center(), a.prev);
                    prop_assert_eq!(b.center(), b.prev);
                }
            }
        }

        #[test]
        fn prop_resolve_separates_or_rolls_back(a in arb_ball(1), b in arb_ball(2)) {
            let (mut marker, mut cue) = (a, b);
            marker.role = BallRole::Marker;
            cue.role = BallRole::Cue;
            cue.vel = Vec2::new(0.0, 2.0);

            if resolve(&mut marker, &mut cue).is_some() {
                let rolled_back = marker.center() == marker.prev && cue.center() == cue.prev;
                prop_assert!(!intersects(&marker, &cue) || rolled_back);
            }
        }

        #[test]
        fn prop_correct_idempotent_on_separated(a in arb_ball(1), b in arb_ball(2)) {
            prop_assume!(!intersects(&a, &b));
            let (mut a2, mut b2) = (a.clone(), b.clone());
            prop_assert_eq!(correct(&mut a2, &mut b2), Correction::None);
            prop_assert_eq!(correct(&mut a2, &mut b2), Correction::None);
            prop_assert_eq!(a2.pos, a.pos);
            prop_assert_eq!(b2.pos, b.pos);
        }

        #[test]
        fn prop_reflect_involutive(vx in -5.0f32..5.0, vz in -5.0f32..5.0) {
            let v = Vec2::new(vx, vz);
            for wall in [front_wall(), side_wall(WallEdge::Right, SIDE_WALL_X)] {
                let once = reflect(&wall, v);
                prop_assert_eq!(reflect(&wall, once), v);
                prop_assert_eq!(once.length(), v.length());
            }
        }
    }
}
