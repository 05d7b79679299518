//! Collision response between the ball and the paddle or a brick
//!
//! Both responses push the ball's velocity toward a side normal with
//! [`reflect_off_side`], the same rule the arena walls use.

use glam::Vec2;

use super::aabb::{Aabb, is_intersecting};
use super::components::{Physics, reflect_off_side};
use crate::ecs::{EcsError, EntityId, Manager};

/// Side of the brick the ball is sent back toward
///
/// Picks the shallower penetration per axis, then the shallower of the two
/// axes. Comparisons are strict: equal left/right depths count as coming
/// from the right, equal top/bottom as coming from below, and equal
/// horizontal/vertical depths reflect horizontally.
pub fn brick_side(ball: &Aabb, brick: &Aabb) -> Vec2 {
    let overlap_left = ball.right() - brick.left();
    let overlap_right = brick.right() - ball.left();
    let overlap_top = ball.bottom() - brick.top();
    let overlap_bottom = brick.bottom() - ball.top();

    let from_left = overlap_left.abs() < overlap_right.abs();
    let from_top = overlap_top.abs() < overlap_bottom.abs();

    let min_x = if from_left { overlap_left } else { overlap_right };
    let min_y = if from_top { overlap_top } else { overlap_bottom };

    if min_y.abs() < min_x.abs() {
        if from_top { Vec2::NEG_Y } else { Vec2::Y }
    } else if from_left {
        Vec2::NEG_X
    } else {
        Vec2::X
    }
}

/// Direction the paddle sends the ball: always up, and left or right of the
/// paddle center (a dead-center hit goes right)
pub fn paddle_side(ball: &Aabb, paddle: &Aabb) -> Vec2 {
    if ball.center.x < paddle.center.x {
        Vec2::new(-1.0, -1.0)
    } else {
        Vec2::new(1.0, -1.0)
    }
}

/// Bounce the ball off the paddle if they touch
///
/// Returns whether a hit was resolved.
pub fn paddle_ball(manager: &mut Manager, paddle: EntityId, ball: EntityId) -> Result<bool, EcsError> {
    let paddle_box = {
        let entity = manager.entity(paddle).ok_or(EcsError::DeadEntity(paddle))?;
        Physics::bounds_of(entity)?
    };

    let entity = manager.entity_mut(ball).ok_or(EcsError::DeadEntity(ball))?;
    let ball_box = Physics::bounds_of(entity)?;
    if !is_intersecting(&paddle_box, &ball_box) {
        return Ok(false);
    }

    let physics = entity.component_mut::<Physics>()?;
    reflect_off_side(paddle_side(&ball_box, &paddle_box), &mut physics.velocity);
    log::trace!("paddle hit, ball velocity now {}", physics.velocity);
    Ok(true)
}

/// Destroy the brick and bounce the ball if they touch
///
/// Bricks already destroyed this step are skipped. Returns the side the ball
/// was sent toward.
pub fn brick_ball(manager: &mut Manager, brick: EntityId, ball: EntityId) -> Result<Option<Vec2>, EcsError> {
    let brick_box = {
        let entity = manager.entity(brick).ok_or(EcsError::DeadEntity(brick))?;
        if !entity.is_alive() {
            return Ok(None);
        }
        Physics::bounds_of(entity)?
    };

    let entity = manager.entity_mut(ball).ok_or(EcsError::DeadEntity(ball))?;
    let ball_box = Physics::bounds_of(entity)?;
    if !is_intersecting(&brick_box, &ball_box) {
        return Ok(None);
    }

    let side = brick_side(&ball_box, &brick_box);
    let physics = entity.component_mut::<Physics>()?;
    reflect_off_side(side, &mut physics.velocity);

    if let Some(entity) = manager.entity_mut(brick) {
        entity.destroy();
    }
    log::debug!("brick {brick:?} destroyed, ball sent toward {side}");
    Ok(Some(side))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Group;
    use crate::sim::components::Position;

    const BRICKS: Group = Group::new(1);

    fn body(manager: &mut Manager, center: Vec2, size: Vec2, velocity: Vec2) -> EntityId {
        let mut entity = manager.add_entity();
        entity.add_component(Position(center)).unwrap();
        entity
            .add_component(Physics::new(size).with_velocity(velocity))
            .unwrap();
        entity.id()
    }

    fn velocity(manager: &Manager, id: EntityId) -> Vec2 {
        manager.entity(id).unwrap().component::<Physics>().unwrap().velocity
    }

    fn boxed(x: f32, y: f32, w: f32, h: f32) -> Aabb {
        Aabb::new(Vec2::new(x, y), Vec2::new(w, h) / 2.0)
    }

    #[test]
    fn test_brick_side_picks_shallow_axis() {
        let brick = boxed(100.0, 100.0, 60.0, 20.0);
        // Slightly into the left edge, well inside vertically
        assert_eq!(brick_side(&boxed(62.0, 100.0, 20.0, 20.0), &brick), Vec2::NEG_X);
        // Slightly into the right edge
        assert_eq!(brick_side(&boxed(138.0, 100.0, 20.0, 20.0), &brick), Vec2::X);
        // Slightly into the bottom edge, well inside horizontally
        assert_eq!(brick_side(&boxed(100.0, 118.0, 20.0, 20.0), &brick), Vec2::Y);
        // Slightly into the top edge
        assert_eq!(brick_side(&boxed(100.0, 82.0, 20.0, 20.0), &brick), Vec2::NEG_Y);
    }

    #[test]
    fn test_brick_side_tie_prefers_horizontal() {
        let brick = boxed(100.0, 100.0, 60.0, 20.0);
        // Top-left corner overlap of 2 on both axes
        let ball = boxed(62.0, 82.0, 20.0, 20.0);
        assert_eq!(ball.right() - brick.left(), 2.0);
        assert_eq!(ball.bottom() - brick.top(), 2.0);
        assert_eq!(brick_side(&ball, &brick), Vec2::NEG_X);
    }

    #[test]
    fn test_paddle_side_tie_goes_right() {
        let paddle = boxed(400.0, 550.0, 60.0, 20.0);
        assert_eq!(paddle_side(&boxed(399.0, 535.0, 20.0, 20.0), &paddle), Vec2::new(-1.0, -1.0));
        assert_eq!(paddle_side(&boxed(400.0, 535.0, 20.0, 20.0), &paddle), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_paddle_bounces_ball_up() {
        let mut manager = Manager::new();
        let paddle = body(&mut manager, Vec2::new(400.0, 550.0), Vec2::new(60.0, 20.0), Vec2::ZERO);
        let ball = body(&mut manager, Vec2::new(380.0, 535.0), Vec2::splat(20.0), Vec2::new(8.0, 8.0));

        assert!(paddle_ball(&mut manager, paddle, ball).unwrap());
        assert_eq!(velocity(&manager, ball), Vec2::new(-8.0, -8.0));
    }

    #[test]
    fn test_paddle_ignores_distant_ball() {
        let mut manager = Manager::new();
        let paddle = body(&mut manager, Vec2::new(400.0, 550.0), Vec2::new(60.0, 20.0), Vec2::ZERO);
        let ball = body(&mut manager, Vec2::new(400.0, 300.0), Vec2::splat(20.0), Vec2::new(-8.0, -8.0));

        assert!(!paddle_ball(&mut manager, paddle, ball).unwrap());
        assert_eq!(velocity(&manager, ball), Vec2::new(-8.0, -8.0));
    }

    #[test]
    fn test_brick_hit_flips_one_axis_and_destroys_brick() {
        let mut manager = Manager::new();
        let brick = {
            let id = body(&mut manager, Vec2::new(100.0, 100.0), Vec2::new(60.0, 20.0), Vec2::ZERO);
            manager.add_to_group(id, BRICKS).unwrap();
            id
        };
        // Coming up into the brick's bottom edge
        let ball = body(&mut manager, Vec2::new(100.0, 118.0), Vec2::splat(20.0), Vec2::new(8.0, -8.0));

        let side = brick_ball(&mut manager, brick, ball).unwrap();
        assert_eq!(side, Some(Vec2::Y));
        assert_eq!(velocity(&manager, ball), Vec2::new(8.0, 8.0));
        assert!(!manager.entity(brick).unwrap().is_alive());

        // Still indexed until refresh, gone afterwards
        assert_eq!(manager.entities_by_group(BRICKS), &[brick]);
        manager.refresh();
        assert!(manager.entities_by_group(BRICKS).is_empty());
        assert!(manager.entity(brick).is_none());
    }

    #[test]
    fn test_touching_left_edge_destroys_brick() {
        let mut manager = Manager::new();
        let brick = body(&mut manager, Vec2::new(100.0, 100.0), Vec2::new(60.0, 20.0), Vec2::ZERO);
        // Ball right edge == brick left edge == 70
        let ball = body(&mut manager, Vec2::new(60.0, 100.0), Vec2::splat(20.0), Vec2::new(8.0, 8.0));

        let side = brick_ball(&mut manager, brick, ball).unwrap();
        assert_eq!(side, Some(Vec2::NEG_X));
        assert_eq!(velocity(&manager, ball), Vec2::new(-8.0, 8.0));
        assert!(!manager.entity(brick).unwrap().is_alive());
    }

    #[test]
    fn test_destroyed_brick_is_skipped() {
        let mut manager = Manager::new();
        let brick = body(&mut manager, Vec2::new(100.0, 100.0), Vec2::new(60.0, 20.0), Vec2::ZERO);
        let ball = body(&mut manager, Vec2::new(100.0, 118.0), Vec2::splat(20.0), Vec2::new(8.0, -8.0));

        manager.entity_mut(brick).unwrap().destroy();
        assert_eq!(brick_ball(&mut manager, brick, ball).unwrap(), None);
        assert_eq!(velocity(&manager, ball), Vec2::new(8.0, -8.0));
    }

    #[test]
    fn test_missing_physics_is_reported() {
        let mut manager = Manager::new();
        let brick = {
            let mut entity = manager.add_entity();
            entity.add_component(Position::new(100.0, 100.0)).unwrap();
            entity.id()
        };
        let ball = body(&mut manager, Vec2::new(100.0, 118.0), Vec2::splat(20.0), Vec2::ZERO);

        let err = brick_ball(&mut manager, brick, ball).unwrap_err();
        assert!(matches!(err, EcsError::MissingComponent { .. }));
    }
}
