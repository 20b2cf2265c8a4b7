use geo::Point;
use log::{debug, warn};
use strum_macros::Display;

use crate::body::PhysicsBody;
use crate::constants::TetherConfig;
use crate::segment_set::{SegmentId, SegmentSet};
use crate::utility::{cross, magnitude, manhattan_distance, p, PointExt};

// keeps a leg from re-wrapping on the corner it starts or ends at
const RAY_MARGIN: f64 = 0.01;
const MIN_LEFTNESS: f64 = 0.5;
const MIN_CORNER_GAP: f64 = 1.0;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SegmentEnd {
    Start,
    End,
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum TetherPoint {
    Anchor(Point<f64>),
    Wrap {
        segment: SegmentId,
        end: SegmentEnd,
        // which side of the rope the corner was on when it wrapped
        left: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Display)]
pub enum TetherStatus {
    Slack,
    Taut,
    // stretched far past the limit; the owner should respawn
    Snapped,
}

#[derive(Copy, Clone, PartialEq, Debug)]
struct Measure {
    total: f64,
    before_last: f64,
    last_len: f64,
    last_dir: Point<f64>,
    last_start: Point<f64>,
}

#[derive(Clone, Debug)]
pub struct Tether {
    config: TetherConfig,
    points: Vec<TetherPoint>,
    length: f64,
    // length up to the last leg and the last leg's start, from the previous step
    last_before_len: Option<f64>,
    last_end: Point<f64>,
}

impl Tether {
    pub fn new(anchor: Point<f64>, config: TetherConfig) -> Tether {
        Tether {
            config,
            points: vec![TetherPoint::Anchor(anchor)],
            length: 0.0,
            last_before_len: None,
            last_end: anchor,
        }
    }

    pub fn points(&self) -> &[TetherPoint] {
        &self.points
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn attach_point(&self, body: &PhysicsBody) -> Point<f64> {
        body.position + p(self.config.offset_x, self.config.offset_y)
    }

    pub fn path(&self, attach: Point<f64>, segments: &SegmentSet) -> Vec<Point<f64>> {
        let mut path: Vec<Point<f64>> = self
            .points
            .iter()
            .filter_map(|point| coords(point, segments))
            .collect();
        path.push(attach);
        path
    }

    pub fn rewrap(&mut self, attach: Point<f64>, segments: &SegmentSet) {
        let before = self.points.len();
        self.points.retain(|point| coords(point, segments).is_some());
        if self.points.len() != before {
            self.last_before_len = None;
        }

        let mut prev = p(0.0, 0.0);
        let mut i = 0;
        while i < self.points.len() {
            let from = self.point_at(i, attach, segments);
            let to = self.point_at(i + 1, attach, segments);

            if let TetherPoint::Wrap { left, .. } = self.points[i] {
                if i > 0 && (cross(from - prev, to - prev) > 0.0) != left {
                    debug!("tether unwrapped from {:?}", from.x_y());
                    self.points.remove(i);
                    self.last_before_len = None;
                    continue;
                }
            }

            if let Some(wrap) = self.find_wrap(from, to, segments) {
                if self.points.len() > self.config.max_points {
                    warn!("tether has {} points, not wrapping further", self.points.len());
                } else {
                    debug!("tether wrapped around {:?}", wrap);
                    self.points.insert(i + 1, wrap);
                    self.last_before_len = None;
                    // the leg out of the new corner waits for the next step
                    i += 1;
                }
            }
            prev = from;
            i += 1;
        }
    }

    fn find_wrap(&self, from: Point<f64>, to: Point<f64>, segments: &SegmentSet) -> Option<TetherPoint> {
        let leg = to - from;
        let len = magnitude(leg);
        if len == 0.0 {
            return None;
        }
        let dir = leg / len;
        for (id, segment) in segments.iter() {
            let distance = match segment.intersect_ray(from.x(), from.y(), dir.x(), dir.y()) {
                Some(distance) if distance >= RAY_MARGIN && distance <= len - RAY_MARGIN => distance,
                _ => continue,
            };
            let hit = from + dir * distance;
            let to_start = manhattan_distance(hit, segment.start());
            let to_end = manhattan_distance(hit, segment.end());
            let (end, corner) = if to_end < to_start {
                (SegmentEnd::End, segment.end())
            } else {
                (SegmentEnd::Start, segment.start())
            };
            let leftness = cross(corner - from, leg);
            let near_end = to_start < self.config.wrap_radius || to_end < self.config.wrap_radius;
            if near_end
                && leftness.abs() > MIN_LEFTNESS
                && manhattan_distance(corner, from) > MIN_CORNER_GAP
                && manhattan_distance(corner, to) > MIN_CORNER_GAP
            {
                return Some(TetherPoint::Wrap {
                    segment: id,
                    end,
                    left: leftness > 0.0,
                });
            }
        }
        None
    }

    fn point_at(&self, index: usize, attach: Point<f64>, segments: &SegmentSet) -> Point<f64> {
        self.points
            .get(index)
            .and_then(|point| coords(point, segments))
            .unwrap_or(attach)
    }

    fn measure(&self, attach: Point<f64>, segments: &SegmentSet) -> Measure {
        let path = self.path(attach, segments);
        let mut measure = Measure {
            total: 0.0,
            before_last: 0.0,
            last_len: 0.0,
            last_dir: p(0.0, 0.0),
            last_start: path[0],
        };
        for (i, leg) in path.windows(2).enumerate() {
            let delta = leg[1] - leg[0];
            let len = magnitude(delta);
            measure.total += len;
            if i + 2 < path.len() {
                measure.before_last += len;
            }
            measure.last_len = len;
            measure.last_dir = if len > 0.0 { delta / len } else { p(0.0, 0.0) };
            measure.last_start = leg[0];
        }
        measure
    }

    pub fn constrain(&mut self, body: &mut PhysicsBody, dt: f64, segments: &SegmentSet) -> TetherStatus {
        let attach = self.attach_point(body);
        let measure = self.measure(attach, segments);
        self.length = measure.total;

        let excess = measure.total - self.config.limit;
        let mut status = TetherStatus::Slack;
        if excess > 0.0 && dt > 0.0 {
            status = if excess > self.config.snap_slack {
                TetherStatus::Snapped
            } else {
                TetherStatus::Taut
            };
            let pull = excess.min(self.config.max_pull_per_step).min(measure.last_len);
            self.length -= pull;

            let mut velocity_change = -measure.last_dir.dot(body.velocity);
            if let Some(last_before_len) = self.last_before_len {
                velocity_change -= (measure.before_last - last_before_len) / dt;
                let previous_last_len = magnitude(self.last_end - attach);
                velocity_change -= (measure.last_len - previous_last_len) / dt;
            }
            // only ever pull inward
            velocity_change = velocity_change.min(0.0);

            body.position.sub_assign(measure.last_dir * pull);
            body.velocity.add_assign(measure.last_dir * velocity_change);
            body.friction_enabled = false;
        }
        self.last_before_len = Some(measure.before_last);
        self.last_end = measure.last_start;
        status
    }
}

fn coords(point: &TetherPoint, segments: &SegmentSet) -> Option<Point<f64>> {
    match point {
        TetherPoint::Anchor(anchor) => Some(*anchor),
        TetherPoint::Wrap { segment, end, .. } => segments.get(*segment).map(|segment| match end {
            SegmentEnd::Start => segment.start(),
            SegmentEnd::End => segment.end(),
        }),
    }
}
