//! Concrete components: position, physics, shape and paddle control

use glam::{BVec2, Vec2};

use super::aabb::Aabb;
use crate::ecs::{Component, ComponentId, EcsError, Entity, Frame, Registered};
use crate::platform::{Color, Drawable, Key, RenderSurface};

/// Registered component ids
pub mod ids {
    use crate::ecs::ComponentId;

    pub const POSITION: ComponentId = ComponentId::new(0);
    pub const PHYSICS: ComponentId = ComponentId::new(1);
    pub const SHAPE: ComponentId = ComponentId::new(2);
    pub const PADDLE_CONTROL: ComponentId = ComponentId::new(3);
}

/// Center of the entity's shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec2);

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    #[inline]
    pub fn get(&self) -> Vec2 {
        self.0
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.0 += delta;
    }
}

impl Component for Position {}

impl Registered for Position {
    const ID: ComponentId = ids::POSITION;
}

/// Called with the unit normal of the arena side that was crossed, pointing
/// back into the arena, and the body's velocity
pub type OutOfBounds = Box<dyn Fn(Vec2, &mut Vec2)>;

/// Velocity and box extent; moves the entity's [`Position`]
///
/// The out-of-bounds callback fires once per crossing: an axis that is still
/// outside the arena on the next step is not reported again until the box
/// has come back in.
pub struct Physics {
    pub velocity: Vec2,
    half_extent: Vec2,
    on_out_of_bounds: Option<OutOfBounds>,
    outside: BVec2,
}

impl Physics {
    /// Body with the given full size
    pub fn new(size: Vec2) -> Self {
        Self {
            velocity: Vec2::ZERO,
            half_extent: size / 2.0,
            on_out_of_bounds: None,
            outside: BVec2::FALSE,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_out_of_bounds(mut self, callback: impl Fn(Vec2, &mut Vec2) + 'static) -> Self {
        self.on_out_of_bounds = Some(Box::new(callback));
        self
    }

    #[inline]
    pub fn half_extent(&self) -> Vec2 {
        self.half_extent
    }

    /// Box of this body if its center sits at `position`
    #[inline]
    pub fn aabb(&self, position: Vec2) -> Aabb {
        Aabb::new(position, self.half_extent)
    }

    /// Current box of an entity carrying Position and Physics
    pub fn bounds_of(entity: &Entity) -> Result<Aabb, EcsError> {
        let position = entity.component::<Position>()?.get();
        Ok(entity.component::<Physics>()?.aabb(position))
    }
}

impl Component for Physics {
    fn init(&mut self, entity: &mut Entity) -> Result<(), EcsError> {
        entity.component::<Position>()?;
        Ok(())
    }

    fn update(&mut self, entity: &mut Entity, frame: &Frame<'_>, ft: f32) -> Result<(), EcsError> {
        let position = entity.component_mut::<Position>()?;
        position.translate(self.velocity * ft);
        let bounds = self.aabb(position.get());

        // One side per axis at most
        let side_x = if bounds.left() < 0.0 {
            Some(Vec2::X)
        } else if bounds.right() > frame.arena.x {
            Some(Vec2::NEG_X)
        } else {
            None
        };
        let side_y = if bounds.top() < 0.0 {
            Some(Vec2::Y)
        } else if bounds.bottom() > frame.arena.y {
            Some(Vec2::NEG_Y)
        } else {
            None
        };

        let crossed = [
            side_x.filter(|_| !self.outside.x),
            side_y.filter(|_| !self.outside.y),
        ];
        self.outside = BVec2::new(side_x.is_some(), side_y.is_some());

        if let Some(callback) = &self.on_out_of_bounds {
            for side in crossed.into_iter().flatten() {
                callback(side, &mut self.velocity);
            }
        }

        Ok(())
    }
}

impl Registered for Physics {
    const ID: ComponentId = ids::PHYSICS;
}

/// Bounce off a crossed side: force each reported axis to point along `side`
pub fn reflect_off_side(side: Vec2, velocity: &mut Vec2) {
    if side.x != 0.0 {
        velocity.x = velocity.x.abs() * side.x;
    }
    if side.y != 0.0 {
        velocity.y = velocity.y.abs() * side.y;
    }
}

/// Visual representation, kept in sync with [`Position`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    drawable: Drawable,
}

impl Shape {
    pub fn circle(radius: f32, color: Color) -> Self {
        Self {
            drawable: Drawable::Circle {
                center: Vec2::ZERO,
                radius,
                color,
            },
        }
    }

    pub fn rectangle(size: Vec2, color: Color) -> Self {
        Self {
            drawable: Drawable::Rectangle {
                center: Vec2::ZERO,
                size,
                color,
            },
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.drawable.set_color(color);
        self
    }

    pub fn drawable(&self) -> &Drawable {
        &self.drawable
    }
}

impl Component for Shape {
    fn init(&mut self, entity: &mut Entity) -> Result<(), EcsError> {
        self.drawable.set_center(entity.component::<Position>()?.get());
        Ok(())
    }

    fn update(&mut self, entity: &mut Entity, _frame: &Frame<'_>, _ft: f32) -> Result<(), EcsError> {
        self.drawable.set_center(entity.component::<Position>()?.get());
        Ok(())
    }

    fn draw(&self, _entity: &Entity, surface: &mut dyn RenderSurface) {
        surface.draw(&self.drawable);
    }
}

impl Registered for Shape {
    const ID: ComponentId = ids::SHAPE;
}

/// Steers the paddle from the Left/Right keys, stopping at the arena edges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddleControl {
    pub speed: f32,
}

impl PaddleControl {
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }
}

impl Component for PaddleControl {
    fn init(&mut self, entity: &mut Entity) -> Result<(), EcsError> {
        entity.component::<Physics>()?;
        Ok(())
    }

    fn update(&mut self, entity: &mut Entity, frame: &Frame<'_>, ft: f32) -> Result<(), EcsError> {
        let position = entity.component::<Position>()?.get();
        let physics = entity.component_mut::<Physics>()?;
        let bounds = physics.aabb(position);

        // The next step may cover at most the room left before the edge
        physics.velocity.x = if frame.keys.is_key_pressed(Key::Left) && bounds.left() > 0.0 {
            -self.speed.min(bounds.left() / ft)
        } else if frame.keys.is_key_pressed(Key::Right) && bounds.right() < frame.arena.x {
            self.speed.min((frame.arena.x - bounds.right()) / ft)
        } else {
            0.0
        };
        Ok(())
    }
}

impl Registered for PaddleControl {
    const ID: ComponentId = ids::PADDLE_CONTROL;
}
