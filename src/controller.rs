use log::debug;

use crate::body::PhysicsBody;
use crate::constants::ControllerConfig;
use crate::segment_set::SegmentSet;
use crate::utility::{p, PointExt};

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct MoveIntent {
    pub left: bool,
    pub right: bool,
}

impl MoveIntent {
    pub fn left() -> MoveIntent {
        MoveIntent {
            left: true,
            right: false,
        }
    }
    pub fn right() -> MoveIntent {
        MoveIntent {
            left: false,
            right: true,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Controller {
    config: ControllerConfig,
    pub facing_right: bool,
}

impl Controller {
    pub fn new(config: ControllerConfig) -> Controller {
        Controller {
            config,
            facing_right: false,
        }
    }

    pub fn apply_movement(&mut self, body: &mut PhysicsBody, intent: MoveIntent, dt: f64) {
        let max = self.config.move_speed_max;
        let accel = self.config.air_move_acceleration * dt;
        let vx = body.velocity.x();
        let new_vx = match (intent.left, intent.right) {
            (true, false) => {
                self.facing_right = false;
                if body.is_grounded() {
                    -max
                } else {
                    (vx - accel).max(vx.min(-max))
                }
            }
            (false, true) => {
                self.facing_right = true;
                if body.is_grounded() {
                    max
                } else {
                    (vx + accel).min(vx.max(max))
                }
            }
            _ => vx,
        };
        body.velocity = p(new_vx, body.velocity.y());
    }

    pub fn jump(&self, body: &mut PhysicsBody, segments: &SegmentSet) -> bool {
        let floor = match body.floor() {
            Some(floor) => *floor,
            None => return false,
        };
        let frame_velocity = segments
            .get(floor.segment)
            .map(|segment| segment.point_velocity(body.position.x(), body.position.y()))
            .unwrap_or_else(|| p(0.0, 0.0));
        body.velocity.sub_assign(frame_velocity);
        body.velocity = p(body.velocity.x(), -self.config.jump_velocity);
        body.velocity.add_assign(frame_velocity);
        debug!("jumped off {} with {:?}", floor.segment, body.velocity.x_y());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aabb::Aabb;
    use crate::constants::{AIR_MOVE_ACCELERATION, JUMP_VELOCITY, MOVE_SPEED_MAX};
    use crate::segment::Segment;
    use assert2::assert;

    fn grounded_body(set: &SegmentSet) -> PhysicsBody {
        let mut body = PhysicsBody::new(40.0, 90.0, Aabb::new(0.0, 0.0, 10.0, 10.0));
        body.simulate(1.0 / 256.0, set);
        assert!(body.is_grounded());
        body
    }

    fn floor_set() -> SegmentSet {
        let mut set = SegmentSet::new();
        set.add(100.0, 100.0, 0.0, 100.0).unwrap();
        set
    }

    #[test]
    fn test_ground_movement_sets_speed() {
        let set = floor_set();
        let mut body = grounded_body(&set);
        let mut controller = Controller::default();
        controller.apply_movement(&mut body, MoveIntent::right(), 0.005);
        assert!(body.velocity.x() == MOVE_SPEED_MAX);
        assert!(controller.facing_right);
        controller.apply_movement(&mut body, MoveIntent::left(), 0.005);
        assert!(body.velocity.x() == -MOVE_SPEED_MAX);
        assert!(!controller.facing_right);
    }

    #[test]
    fn test_opposing_intents_cancel() {
        let set = floor_set();
        let mut body = grounded_body(&set).with_velocity(12.0, 0.0);
        let mut controller = Controller::default();
        let both = MoveIntent {
            left: true,
            right: true,
        };
        controller.apply_movement(&mut body, both, 0.005);
        assert!(body.velocity.x() == 12.0);
    }

    #[test]
    fn test_air_control_accelerates_up_to_max() {
        let mut body = PhysicsBody::new(0.0, 0.0, Aabb::new(0.0, 0.0, 10.0, 10.0));
        let mut controller = Controller::default();
        controller.apply_movement(&mut body, MoveIntent::right(), 0.01);
        assert!(body.velocity.x() == AIR_MOVE_ACCELERATION * 0.01);
        for _ in 0..100 {
            controller.apply_movement(&mut body, MoveIntent::right(), 0.01);
        }
        assert!(body.velocity.x() == MOVE_SPEED_MAX);
    }

    #[test]
    fn test_air_control_keeps_faster_speed() {
        let mut body = PhysicsBody::new(0.0, 0.0, Aabb::new(0.0, 0.0, 10.0, 10.0)).with_velocity(-500.0, 0.0);
        let mut controller = Controller::default();
        controller.apply_movement(&mut body, MoveIntent::left(), 0.01);
        assert!(body.velocity.x() == -500.0);
        // pushing the other way still slows it
        controller.apply_movement(&mut body, MoveIntent::right(), 0.01);
        assert!(body.velocity.x() == -480.0);
    }

    #[test]
    fn test_jump_needs_a_floor() {
        let set = floor_set();
        let controller = Controller::default();
        let mut airborne = PhysicsBody::new(0.0, 0.0, Aabb::new(0.0, 0.0, 10.0, 10.0));
        assert!(!controller.jump(&mut airborne, &set));
        assert!(airborne.velocity.y() == 0.0);

        let mut body = grounded_body(&set);
        assert!(controller.jump(&mut body, &set));
        assert!(body.velocity.y() == -JUMP_VELOCITY);
    }

    #[test]
    fn test_jump_inherits_platform_velocity() {
        let mut set = SegmentSet::new();
        let lift = p(30.0, -100.0);
        set.push(
            Segment::new(100.0, 100.0, 0.0, 100.0)
                .unwrap()
                .with_velocities(lift, lift)
                .unwrap(),
        );
        let mut body = grounded_body(&set);
        let controller = Controller::default();
        assert!(controller.jump(&mut body, &set));
        assert!(body.velocity.y() == -JUMP_VELOCITY + lift.y());
    }
}
