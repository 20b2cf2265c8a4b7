use geo::Point;
use log::info;

use crate::aabb::Aabb;
use crate::body::PhysicsBody;
use crate::constants::{ControllerConfig, TetherConfig};
use crate::controller::{Controller, MoveIntent};
use crate::tether::{Tether, TetherStatus};
use crate::utility::p;
use crate::world::{BodyId, World};

const PLAYER_WIDTH: f64 = 24.0;
const PLAYER_HEIGHT: f64 = 30.0;

#[derive(Clone, Debug)]
pub struct Player {
    body: BodyId,
    pub controller: Controller,
    pub tether: Tether,
}

impl Player {
    pub fn spawn(world: &mut World, x: f64, y: f64) -> Player {
        let bounds = Aabb::new(-PLAYER_WIDTH / 2.0, -PLAYER_HEIGHT, PLAYER_WIDTH, PLAYER_HEIGHT);
        let body = world.add_body(PhysicsBody::new(x, y, bounds));
        let tether_config = TetherConfig::default();
        let anchor = p(x + tether_config.offset_x, y + tether_config.offset_y);
        info!("player spawned at {:?} as {}", (x, y), body);
        Player {
            body,
            controller: Controller::new(ControllerConfig::default()),
            tether: Tether::new(anchor, tether_config),
        }
    }

    pub fn body_id(&self) -> BodyId {
        self.body
    }

    pub fn position(&self, world: &World) -> Option<Point<f64>> {
        world.body(self.body).map(|body| body.position)
    }

    // Tether wrapping, movement input, then the tether pull. Must run before
    // the body simulates so the pull goes through collision resolution.
    pub fn update(&mut self, dt: f64, intent: MoveIntent, world: &mut World) -> TetherStatus {
        let (body, segments) = match world.body_and_segments(self.body) {
            Some(pair) => pair,
            None => return TetherStatus::Slack,
        };
        body.friction_enabled = true;
        let attach = self.tether.attach_point(body);
        self.tether.rewrap(attach, segments);
        self.controller.apply_movement(body, intent, dt);
        self.tether.constrain(body, dt, segments)
    }

    pub fn step(&mut self, dt: f64, intent: MoveIntent, world: &mut World) -> (TetherStatus, bool) {
        let status = self.update(dt, intent, world);
        let fallen = world.step(dt).contains(&self.body);
        (status, fallen)
    }

    pub fn jump(&self, world: &mut World) -> bool {
        match world.body_and_segments(self.body) {
            Some((body, segments)) => self.controller.jump(body, segments),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MOVE_SPEED_MAX;
    use approx::assert_abs_diff_eq;
    use assert2::assert;
    use ntest::timeout;

    fn flat_world() -> World {
        let mut world = World::new();
        world.segments.add(1000.0, 100.0, -1000.0, 100.0).unwrap();
        world
    }

    #[test]
    fn test_spawned_player_stands_on_the_floor() {
        let mut world = flat_world();
        let player = Player::spawn(&mut world, 0.0, 100.0);
        world.step(0.005);
        let body = world.body(player.body_id()).unwrap();
        assert!(body.is_grounded());
        assert!(body.position == p(0.0, 100.0));
        assert!(player.tether.points().len() == 1);
    }

    #[test]
    fn test_walking_moves_the_player() {
        let mut world = flat_world();
        let mut player = Player::spawn(&mut world, 0.0, 100.0);
        for _ in 0..10 {
            player.step(0.005, MoveIntent::right(), &mut world);
        }
        let body = world.body(player.body_id()).unwrap();
        // floor friction eats part of the walking speed within the step
        assert!(body.velocity.x() > 0.0);
        assert!(body.velocity.x() < MOVE_SPEED_MAX);
        // the first step starts airborne, the other nine walk at full speed
        assert!(body.position.x() > 9.0 * MOVE_SPEED_MAX * 0.005);
        assert!(player.controller.facing_right);
    }

    #[test]
    #[timeout(2000)]
    fn test_tether_stops_the_player_walking_away() {
        let mut world = flat_world();
        let mut player = Player::spawn(&mut world, 0.0, 100.0);
        let mut pulled = false;
        for _ in 0..1000 {
            let (status, fallen) = player.step(0.005, MoveIntent::right(), &mut world);
            assert!(status != TetherStatus::Snapped);
            assert!(!fallen);
            pulled |= status == TetherStatus::Taut;
        }
        assert!(pulled);
        // rope is anchored right above the spawn point; at most one step of
        // walking past the limit before the next pull
        let x = player.position(&world).unwrap().x();
        assert!(x > 490.0);
        assert!(x <= 500.0 + MOVE_SPEED_MAX * 0.005 + 1e-9);
    }

    #[test]
    fn test_tether_pull_is_resolved_against_walls() {
        let mut world = flat_world();
        // solid to its left, ends far from the rope's height
        world.segments.add(497.0, 130.0, 497.0, -200.0).unwrap();
        let mut player = Player::spawn(&mut world, 0.0, 100.0);
        world.body_mut(player.body_id()).unwrap().position = p(511.0, 100.0);

        let (status, _) = player.step(0.005, MoveIntent::default(), &mut world);
        assert!(status == TetherStatus::Taut);
        assert!(player.tether.points().len() == 1);
        // pulled 5 toward the anchor, which sinks the box 3 into the wall,
        // then pushed back out in the same step
        let body = world.body(player.body_id()).unwrap();
        assert_abs_diff_eq!(body.aabb().left, 497.0, epsilon = 1e-9);
        assert_abs_diff_eq!(body.position.x(), 509.0, epsilon = 1e-9);
    }

    #[test]
    fn test_jump_only_from_the_ground() {
        let mut world = flat_world();
        let player = Player::spawn(&mut world, 0.0, 50.0);
        assert!(!player.jump(&mut world));
        for _ in 0..100 {
            world.step(0.005);
        }
        assert!(player.jump(&mut world));
        let body = world.body(player.body_id()).unwrap();
        assert!(body.velocity.y() < 0.0);
    }
}
