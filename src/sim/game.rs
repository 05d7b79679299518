//! Game world wiring and the fixed-timestep loop
//!
//! Each rendered frame runs three phases:
//! - input: drain window events, stop on close or Escape
//! - update: add the last frame time to the accumulator and run one fixed
//!   step per `ft_slice` it holds (refresh, update, collisions)
//! - draw: render the final entity state once

use glam::Vec2;

use super::collision;
use super::components::{PaddleControl, Physics, Position, Shape, reflect_off_side};
use crate::ecs::{EcsError, EntityId, Frame, Group, Manager};
use crate::platform::{Clock, Color, Event, Key, RenderSurface};
use crate::settings::Settings;

/// Group tags used by the collision pass
pub mod groups {
    use crate::ecs::Group;

    pub const PADDLE: Group = Group::new(0);
    pub const BRICK: Group = Group::new(1);
    pub const BALL: Group = Group::new(2);
}

/// Something that happened during a simulation step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    PaddleHit { ball: EntityId },
    BrickDestroyed { brick: EntityId, side: Vec2 },
    /// Every brick of the level is destroyed (sent once)
    LevelCleared,
}

pub struct Game<S: RenderSurface, C: Clock> {
    settings: Settings,
    manager: Manager,
    surface: S,
    clock: C,
    /// Duration of the previous rendered frame (ms)
    last_ft: f32,
    /// Accumulated real time not yet simulated (ms)
    current_slice: f32,
    running: bool,
    /// Stop once this many steps have run in total
    step_budget: Option<u64>,
    steps: u64,
    frames: u64,
    events: Vec<GameEvent>,
    level_cleared: bool,
}

impl<S: RenderSurface, C: Clock> Game<S, C> {
    /// Build the level: one paddle, one ball and the brick grid
    pub fn new(settings: Settings, surface: S, clock: C) -> Result<Self, EcsError> {
        let mut game = Self {
            settings,
            manager: Manager::new(),
            surface,
            clock,
            last_ft: 0.0,
            current_slice: 0.0,
            running: false,
            step_budget: None,
            steps: 0,
            frames: 0,
            events: Vec::new(),
            level_cleared: false,
        };

        // Too slow a frame rate lets the ball skip through bricks
        game.surface.set_framerate_limit(game.settings.framerate_limit);

        game.create_paddle()?;
        game.create_ball()?;
        for column in 0..game.settings.brick_columns {
            for row in 0..game.settings.brick_rows {
                let center = game.settings.brick_center(column, row);
                game.create_brick(center)?;
            }
        }

        let bricks = game.bricks_remaining();
        // An empty level has nothing to clear
        game.level_cleared = bricks == 0;
        log::info!("Level ready: {} entities, {bricks} bricks", game.manager.len());
        Ok(game)
    }

    pub fn create_ball(&mut self) -> Result<EntityId, EcsError> {
        let s = &self.settings;
        let center = s.arena() / 2.0;
        let velocity = Vec2::new(-s.ball_speed, -s.ball_speed);
        let (radius, size) = (s.ball_radius, Vec2::splat(s.ball_radius * 2.0));

        let mut entity = self.manager.add_entity();
        entity.add_component(Position(center))?;
        entity.add_component(Shape::circle(radius, Color::WHITE))?;
        entity.add_component(
            Physics::new(size)
                .with_velocity(velocity)
                .with_out_of_bounds(reflect_off_side),
        )?;
        entity.add_group(groups::BALL)?;
        Ok(entity.id())
    }

    pub fn create_brick(&mut self, center: Vec2) -> Result<EntityId, EcsError> {
        let size = Vec2::new(self.settings.brick_width, self.settings.brick_height);

        let mut entity = self.manager.add_entity();
        entity.add_component(Position(center))?;
        entity.add_component(Physics::new(size))?;
        entity.add_component(Shape::rectangle(size, Color::YELLOW))?;
        entity.add_group(groups::BRICK)?;
        Ok(entity.id())
    }

    pub fn create_paddle(&mut self) -> Result<EntityId, EcsError> {
        let s = &self.settings;
        let center = Vec2::new(s.arena_width / 2.0, s.arena_height - s.paddle_offset);
        let size = Vec2::new(s.paddle_width, s.paddle_height);
        let speed = s.paddle_speed;

        let mut entity = self.manager.add_entity();
        entity.add_component(Position(center))?;
        entity.add_component(Physics::new(size))?;
        entity.add_component(Shape::rectangle(size, Color::RED))?;
        entity.add_component(PaddleControl::new(speed))?;
        entity.add_group(groups::PADDLE)?;
        Ok(entity.id())
    }

    /// Run frames until stopped by the window, Escape or [`Game::stop`]
    pub fn run(&mut self) -> Result<(), EcsError> {
        self.start();
        log::info!("Game loop started");
        while self.running {
            self.frame()?;
        }
        log::info!("Game loop stopped after {} steps, {} frames", self.steps, self.frames);
        Ok(())
    }

    /// Run until `steps` more simulation steps have executed, or the game is
    /// stopped earlier. Returns the number of steps run.
    pub fn run_for(&mut self, steps: u64) -> Result<u64, EcsError> {
        let start = self.steps;
        self.step_budget = Some(start + steps);
        let result = self.run();
        self.step_budget = None;
        result.map(|()| self.steps - start)
    }

    /// Stop stepping once `total` steps have run; `None` removes the limit
    pub fn set_step_budget(&mut self, total: Option<u64>) {
        self.step_budget = total;
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// One rendered frame: input, update, draw, then timing and title
    pub fn frame(&mut self) -> Result<(), EcsError> {
        let frame_start = self.clock.now();
        self.surface.clear(Color::BLACK);

        self.input_phase();
        self.update_phase()?;
        self.draw_phase();

        let elapsed = self.clock.now().saturating_sub(frame_start);
        let ft = elapsed.as_micros() as f32 / 1000.0;
        self.last_ft = ft;
        self.frames += 1;

        if ft > 0.0 {
            let fps = 1000.0 / ft;
            self.surface.set_title(&format!("FT: {ft:.3}\tFPS: {fps:.1}"));
        }
        Ok(())
    }

    /// Drain window events; only closing or Escape affects the loop
    pub fn input_phase(&mut self) {
        while let Some(event) = self.surface.poll_event() {
            if event == Event::Closed {
                log::info!("Window closed");
                self.surface.close();
                self.running = false;
                break;
            }
        }

        if self.surface.is_key_pressed(Key::Escape) {
            self.running = false;
        }
    }

    /// Consume the accumulated frame time in fixed slices
    ///
    /// Returns the number of steps run.
    pub fn update_phase(&mut self) -> Result<u32, EcsError> {
        self.current_slice += self.last_ft;

        let slice = self.settings.ft_slice;
        let mut substeps = 0;
        while self.current_slice >= slice {
            if let Some(budget) = self.step_budget {
                if self.steps >= budget {
                    self.running = false;
                    break;
                }
            }
            if let Some(max) = self.settings.max_substeps {
                if substeps >= max {
                    log::warn!(
                        "Frame needed more than {max} steps, {:.1} ms carried over",
                        self.current_slice
                    );
                    break;
                }
            }

            self.step()?;
            self.current_slice -= slice;
            substeps += 1;
        }

        log::trace!("{substeps} steps, {:.3} ms accumulated", self.current_slice);
        Ok(substeps)
    }

    /// One fixed simulation step
    pub fn step(&mut self) -> Result<(), EcsError> {
        self.manager.refresh();

        let frame = Frame {
            keys: &self.surface,
            arena: self.settings.arena(),
        };
        self.manager.update(&frame, self.settings.ft_step)?;

        self.resolve_collisions()?;
        self.steps += 1;
        Ok(())
    }

    fn resolve_collisions(&mut self) -> Result<(), EcsError> {
        // Destroyed bricks stay indexed until the next refresh, so these
        // snapshots match what the groups hold for the whole pass
        let paddles = self.manager.entities_by_group(groups::PADDLE).to_vec();
        let bricks = self.manager.entities_by_group(groups::BRICK).to_vec();
        let balls = self.manager.entities_by_group(groups::BALL).to_vec();

        for &ball in &balls {
            for &paddle in &paddles {
                if collision::paddle_ball(&mut self.manager, paddle, ball)? {
                    self.events.push(GameEvent::PaddleHit { ball });
                }
            }

            for &brick in &bricks {
                if let Some(side) = collision::brick_ball(&mut self.manager, brick, ball)? {
                    self.events.push(GameEvent::BrickDestroyed { brick, side });
                }
            }
        }

        if !self.level_cleared && self.live_in_group(groups::BRICK) == 0 {
            self.level_cleared = true;
            self.events.push(GameEvent::LevelCleared);
            log::info!("Level cleared after {} steps", self.steps + 1);
        }
        Ok(())
    }

    pub fn draw_phase(&mut self) {
        self.manager.draw(&mut self.surface);
        self.surface.display();
    }

    fn live_in_group(&self, group: Group) -> usize {
        self.manager
            .entities_by_group(group)
            .iter()
            .filter(|&&id| self.manager.entity(id).is_some_and(|e| e.is_alive()))
            .count()
    }

    /// Bricks not yet destroyed
    pub fn bricks_remaining(&self) -> usize {
        self.live_in_group(groups::BRICK)
    }

    /// Center of the first entity in `group`
    pub fn position_of(&self, group: Group) -> Option<Vec2> {
        let id = *self.manager.entities_by_group(group).first()?;
        let position = self.manager.entity(id)?.component::<Position>().ok()?;
        Some(position.get())
    }

    /// Take the events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn manager(&self) -> &Manager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut Manager {
        &mut self.manager
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
