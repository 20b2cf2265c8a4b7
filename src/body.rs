use std::cmp::Reverse;

use enum_as_inner::EnumAsInner;
use geo::Point;
use log::{debug, trace};
use ordered_float::OrderedFloat;
use strum::IntoEnumIterator;

use crate::aabb::{Aabb, Corner};
use crate::constants::PhysicsConfig;
use crate::segment::Segment;
use crate::segment_set::{SegmentId, SegmentSet};
use crate::utility::{magnitude, p, project, PointExt};

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct FloorContact {
    pub segment: SegmentId,
    // where the foot was snapped onto the segment
    pub point: Point<f64>,
}

#[derive(Copy, Clone, PartialEq, Debug, EnumAsInner)]
pub enum Contact {
    Airborne,
    Grounded(FloorContact),
}

impl Default for Contact {
    fn default() -> Self {
        Contact::Airborne
    }
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct WallContact {
    pub segment: SegmentId,
    pub penetration: f64,
}

#[derive(Clone, Debug)]
pub struct PhysicsBody {
    pub position: Point<f64>,
    pub velocity: Point<f64>,
    // box relative to position
    pub bounds: Aabb,
    // cleared by mechanics that want one frictionless step; set again by them
    pub friction_enabled: bool,
    contact: Contact,
    config: PhysicsConfig,
}

impl PhysicsBody {
    pub fn new(x: f64, y: f64, bounds: Aabb) -> PhysicsBody {
        PhysicsBody {
            position: p(x, y),
            velocity: p(0.0, 0.0),
            bounds,
            friction_enabled: true,
            contact: Contact::Airborne,
            config: PhysicsConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PhysicsConfig) -> PhysicsBody {
        self.config = config;
        self
    }

    pub fn with_velocity(mut self, vx: f64, vy: f64) -> PhysicsBody {
        self.velocity = p(vx, vy);
        self
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(
            self.position.x() + self.bounds.left,
            self.position.y() + self.bounds.top,
            self.bounds.width(),
            self.bounds.height(),
        )
    }

    pub fn contact(&self) -> &Contact {
        &self.contact
    }

    pub fn floor(&self) -> Option<&FloorContact> {
        self.contact.as_grounded()
    }

    pub fn is_grounded(&self) -> bool {
        self.floor().is_some()
    }

    pub fn has_fallen(&self, kill_y: f64) -> bool {
        self.position.y() > kill_y
    }

    pub fn simulate(&mut self, dt: f64, segments: &SegmentSet) {
        let was_grounded = self.is_grounded();

        self.integrate(dt);
        let normal_impulse = self.resolve_floor(segments);
        self.apply_floor_friction(segments, normal_impulse);
        for wall in self.wall_contacts(segments) {
            if let Some(segment) = segments.get(wall.segment) {
                self.resolve_wall(segment);
            }
        }

        match (was_grounded, self.floor()) {
            (false, Some(floor)) => debug!("landed on {} at {:?}", floor.segment, floor.point.x_y()),
            (true, None) => debug!("left the floor at {:?}", self.position.x_y()),
            _ => {}
        }
        trace!(
            "step dt={} pos={:?} vel={:?} contact={:?}",
            dt,
            self.position.x_y(),
            self.velocity.x_y(),
            self.contact
        );
    }

    fn integrate(&mut self, dt: f64) {
        let gravity = self.config.gravity;
        self.position.add_assign(p(
            self.velocity.x() * dt,
            self.velocity.y() * dt + 0.5 * gravity * dt * dt,
        ));
        self.velocity.add_assign(p(0.0, gravity * dt));
    }

    // Returns how hard the body was pressed into the floor this step.
    fn resolve_floor(&mut self, segments: &SegmentSet) -> f64 {
        self.contact = Contact::Airborne;
        let mut normal_impulse = 0.0;
        // every qualifying segment adjusts the body, the last one wins the contact
        for (id, segment) in segments.iter() {
            let (start, end) = (segment.start(), segment.end());
            // floors run right to left
            if start.x() <= end.x() {
                continue;
            }
            let slope = (start.y() - end.y()) / (start.x() - end.x());
            if slope.abs() > self.config.max_walkable_slope {
                continue;
            }
            let aabb = self.aabb();
            if end.x() >= aabb.right || start.x() <= aabb.left {
                continue;
            }
            // downhill-leading corner
            let foot = if slope < 0.0 {
                aabb.corner(Corner::BottomRight)
            } else {
                aabb.corner(Corner::BottomLeft)
            };
            let top = start.y().min(end.y());
            let mut floor_y = slope * (foot.x() - end.x()) + end.y();
            let mut is_top = false;
            if floor_y <= top {
                floor_y = top;
                is_top = true;
            }
            if foot.y() < floor_y || foot.y() > floor_y + self.config.step_height {
                continue;
            }

            let contact_point = p(foot.x(), floor_y);
            self.contact = Contact::Grounded(FloorContact {
                segment: id,
                point: contact_point,
            });
            self.position.add_assign(p(0.0, floor_y - foot.y()));

            let frame_velocity = segment.point_velocity(contact_point.x(), contact_point.y());
            let mut relative = self.velocity - frame_velocity;
            if is_top {
                normal_impulse = relative.y().abs();
                relative = p(relative.x(), 0.0);
            } else {
                let along_slope = project(relative, start - end);
                normal_impulse += magnitude(along_slope - relative);
                relative = along_slope;
            }
            self.velocity = relative + frame_velocity;
        }
        normal_impulse
    }

    fn apply_floor_friction(&mut self, segments: &SegmentSet, normal_impulse: f64) {
        if !self.friction_enabled {
            return;
        }
        let floor = match self.contact.as_grounded() {
            Some(floor) => *floor,
            None => return,
        };
        let frame_velocity = segments
            .get(floor.segment)
            .map(|segment| segment.point_velocity(floor.point.x(), floor.point.y()))
            .unwrap_or_else(|| p(0.0, 0.0));
        let relative = self.velocity - frame_velocity;
        let speed = magnitude(relative);
        // Zero speed is tested in the floor's frame, not the world frame. A body
        // resting on a platform that slides sideways has zero world velocity at
        // this point, and a world-frame test would never pick it up.
        if speed == 0.0 {
            return;
        }
        let factor = 1.0 - (normal_impulse * self.config.floor_friction_coeff / speed).min(1.0);
        self.velocity = relative * factor + frame_velocity;
    }

    // shallowest first, ties keep segment-set order
    pub fn wall_contacts(&self, segments: &SegmentSet) -> Vec<WallContact> {
        let mut contacts: Vec<WallContact> = segments
            .iter()
            .filter_map(|(id, segment)| {
                self.deepest_corner(segment).map(|(_, penetration)| WallContact {
                    segment: id,
                    penetration,
                })
            })
            .collect();
        contacts.sort_by_key(|contact| OrderedFloat(contact.penetration));
        contacts
    }

    // First corner with the largest non-negative penetration, if the segment
    // overlaps the box and that penetration is within the wall depth.
    fn deepest_corner(&self, segment: &Segment) -> Option<(Point<f64>, f64)> {
        let aabb = self.aabb();
        if !segment.overlaps(&aabb) {
            return None;
        }
        Corner::iter()
            .map(|corner| {
                let point = aabb.corner(corner);
                (point, segment.penetration(point))
            })
            .filter(|(_, penetration)| *penetration >= 0.0)
            .min_by_key(|(_, penetration)| Reverse(OrderedFloat(*penetration)))
            .filter(|(_, penetration)| *penetration <= self.config.wall_depth)
    }

    fn resolve_wall(&mut self, segment: &Segment) {
        // the box may have moved since the contact was found
        let (corner, penetration) = match self.deepest_corner(segment) {
            Some(deepest) => deepest,
            None => return,
        };
        let normal = segment.normal();
        let frame_velocity = segment.point_velocity(corner.x(), corner.y());
        let relative = self.velocity - frame_velocity;
        self.position.add_assign(normal * penetration);
        let relative = relative - normal * relative.dot(normal);
        self.velocity = relative + frame_velocity;
    }
}
