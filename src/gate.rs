use geo::Point;
use log::{debug, warn};

use crate::segment::{GeometryError, Segment};
use crate::segment_set::{SegmentId, SegmentSet};
use crate::utility::{is_zero, p, SignedExt};

// (x, y) multiples of (width, height); consecutive corners are joined by a
// segment, wound so that the top edge runs right to left
const CORNER_ORDER: [(f64, f64); 4] = [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)];

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct GatePose {
    // from the pivot to the gate's top-left corner, before rotation
    pub offset: Point<f64>,
    // radians, clockwise on screen
    pub rotation: f64,
}

impl GatePose {
    pub fn new(offset_x: f64, offset_y: f64, rotation_degrees: f64) -> GatePose {
        GatePose {
            offset: p(offset_x, offset_y),
            rotation: rotation_degrees.to_radians(),
        }
    }

    fn lerp(&self, other: &GatePose, t: f64) -> GatePose {
        GatePose {
            offset: self.offset * (1.0 - t) + other.offset * t,
            rotation: self.rotation * (1.0 - t) + other.rotation * t,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Gate {
    pivot: Point<f64>,
    width: f64,
    height: f64,
    closed: GatePose,
    open: GatePose,
    // seconds for a full swing; zero snaps
    transition_time: f64,
    // 0 is closed, 1 is open
    state: f64,
    target: f64,
    moving: bool,
    segments: [SegmentId; 4],
}

impl Gate {
    pub fn new(
        set: &mut SegmentSet,
        pivot: Point<f64>,
        width: f64,
        height: f64,
        closed: GatePose,
        open: GatePose,
        transition_time: f64,
    ) -> Result<Gate, GeometryError> {
        let corners = corners(pivot, width, height, &closed);
        let mut edges = Vec::with_capacity(4);
        for i in 0..4 {
            edges.push(Segment::from_points(corners[i], corners[(i + 1) % 4])?);
        }
        let segments = [
            set.push(edges[0]),
            set.push(edges[1]),
            set.push(edges[2]),
            set.push(edges[3]),
        ];
        Ok(Gate {
            pivot,
            width,
            height,
            closed,
            open,
            transition_time,
            state: 0.0,
            target: 0.0,
            moving: false,
            segments,
        })
    }

    pub fn segments(&self) -> &[SegmentId; 4] {
        &self.segments
    }

    pub fn state(&self) -> f64 {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.target == 1.0
    }

    pub fn set_open(&mut self, open: bool, instant: bool, set: &mut SegmentSet) {
        self.target = if open { 1.0 } else { 0.0 };
        if instant {
            self.state = self.target;
            self.moving = false;
            self.write(set, [p(0.0, 0.0); 4]);
        }
    }

    // must run before bodies simulate against the same set
    pub fn update(&mut self, dt: f64, set: &mut SegmentSet) {
        if self.state == self.target || dt <= 0.0 {
            if self.moving {
                self.moving = false;
                self.write(set, [p(0.0, 0.0); 4]);
            }
            return;
        }
        let before = self.current_corners();
        let error = self.target - self.state;
        let rate = if self.transition_time > 0.0 {
            dt / self.transition_time
        } else {
            f64::INFINITY
        };
        self.state += error.abs().min(rate) * error.sign();
        let after = self.current_corners();

        let mut velocities = [p(0.0, 0.0); 4];
        for i in 0..4 {
            velocities[i] = (after[i] - before[i]) / dt;
        }
        self.moving = velocities.iter().any(|v| !is_zero(*v));
        self.write(set, velocities);
        if self.state == self.target {
            debug!("gate at {:?} reached state {}", self.pivot.x_y(), self.state);
        }
    }

    fn current_corners(&self) -> [Point<f64>; 4] {
        corners(
            self.pivot,
            self.width,
            self.height,
            &self.closed.lerp(&self.open, self.state),
        )
    }

    fn write(&self, set: &mut SegmentSet, velocities: [Point<f64>; 4]) {
        let corners = self.current_corners();
        for i in 0..4 {
            let next = (i + 1) % 4;
            let segment = match set.get_mut(self.segments[i]) {
                Some(segment) => segment,
                None => {
                    warn!("gate segment {} is gone", self.segments[i]);
                    continue;
                }
            };
            if let Err(err) = segment.set_endpoints(corners[i], corners[next]) {
                warn!("gate segment {} not moved: {}", self.segments[i], err);
            }
            if let Err(err) = segment.set_velocities(velocities[i], velocities[next]) {
                warn!("gate segment {} velocity not set: {}", self.segments[i], err);
            }
        }
    }
}

fn corners(pivot: Point<f64>, width: f64, height: f64, pose: &GatePose) -> [Point<f64>; 4] {
    let (sin, cos) = pose.rotation.sin_cos();
    let mut out = [p(0.0, 0.0); 4];
    for (i, (cx, cy)) in CORNER_ORDER.iter().enumerate() {
        let local = pose.offset + p(width * cx, height * cy);
        out[i] = pivot + p(local.x() * cos - local.y() * sin, local.x() * sin + local.y() * cos);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use assert2::assert;

    fn swinging_gate(set: &mut SegmentSet) -> Gate {
        Gate::new(
            set,
            p(100.0, 100.0),
            128.0,
            16.0,
            GatePose::new(0.0, 0.0, 0.0),
            GatePose::new(0.0, 0.0, 90.0),
            1.0,
        )
        .unwrap()
    }

    #[test]
    fn test_closed_gate_outline() {
        let mut set = SegmentSet::new();
        let gate = swinging_gate(&mut set);
        assert!(set.len() == 4);
        let left = set.get(gate.segments()[0]).unwrap();
        assert!(left.start() == p(100.0, 100.0));
        assert!(left.end() == p(100.0, 116.0));
        let top = set.get(gate.segments()[3]).unwrap();
        assert!(top.start() == p(228.0, 100.0));
        assert!(top.end() == p(100.0, 100.0));
        // top edge is walkable, and its normal faces up
        assert!(top.start().x() > top.end().x());
        assert!(top.normal() == p(0.0, -1.0));
    }

    #[test]
    fn test_zero_size_gate_is_rejected() {
        let mut set = SegmentSet::new();
        let pose = GatePose::new(0.0, 0.0, 0.0);
        assert!(Gate::new(&mut set, p(0.0, 0.0), 0.0, 0.0, pose, pose, 1.0).is_err());
        assert!(set.is_empty());
    }

    #[test]
    fn test_swing_writes_corner_velocities() {
        let mut set = SegmentSet::new();
        let mut gate = swinging_gate(&mut set);
        gate.set_open(true, false, &mut set);
        gate.update(0.25, &mut set);
        assert!(gate.state() == 0.25);

        let top = set.get(gate.segments()[3]).unwrap();
        // the pivot corner does not move
        assert!(top.end() == p(100.0, 100.0));
        assert!(top.end_velocity() == p(0.0, 0.0));
        // the far corner sweeps down and left
        let far = top.start();
        let rotation = std::f64::consts::FRAC_PI_8;
        assert_abs_diff_eq!(far.x(), 100.0 + 128.0 * rotation.cos(), epsilon = 1e-9);
        assert_abs_diff_eq!(far.y(), 100.0 + 128.0 * rotation.sin(), epsilon = 1e-9);
        assert_abs_diff_eq!(top.start_velocity().x(), (far.x() - 228.0) / 0.25, epsilon = 1e-9);
        assert_abs_diff_eq!(top.start_velocity().y(), (far.y() - 100.0) / 0.25, epsilon = 1e-9);
    }

    #[test]
    fn test_gate_stops_at_target_and_clears_velocity() {
        let mut set = SegmentSet::new();
        let mut gate = swinging_gate(&mut set);
        gate.set_open(true, false, &mut set);
        for _ in 0..5 {
            gate.update(0.25, &mut set);
        }
        assert!(gate.state() == 1.0);
        let top = set.get(gate.segments()[3]).unwrap();
        assert!(top.start_velocity() == p(0.0, 0.0));
        assert_abs_diff_eq!(top.start().x(), 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(top.start().y(), 228.0, epsilon = 1e-9);
    }

    #[test]
    fn test_instant_toggle_snaps_without_velocity() {
        let mut set = SegmentSet::new();
        let mut gate = swinging_gate(&mut set);
        gate.set_open(true, true, &mut set);
        assert!(gate.state() == 1.0);
        assert!(gate.is_open());
        for (_, segment) in set.iter() {
            assert!(segment.start_velocity() == p(0.0, 0.0));
        }
    }

    #[test]
    fn test_zero_transition_time_snaps_on_update() {
        let mut set = SegmentSet::new();
        let pose = GatePose::new(0.0, 0.0, 0.0);
        let mut gate = Gate::new(&mut set, p(0.0, 0.0), 64.0, 16.0, pose, GatePose::new(32.0, 0.0, 0.0), 0.0).unwrap();
        gate.set_open(true, false, &mut set);
        gate.update(0.005, &mut set);
        assert!(gate.state() == 1.0);
        let left = set.get(gate.segments()[0]).unwrap();
        assert!(left.start() == p(32.0, 0.0));
    }

    #[test]
    fn test_sliding_gate_moves_every_corner_alike() {
        let mut set = SegmentSet::new();
        let mut gate = Gate::new(
            &mut set,
            p(0.0, 0.0),
            64.0,
            16.0,
            GatePose::new(0.0, 0.0, 0.0),
            GatePose::new(64.0, 0.0, 0.0),
            1.0,
        )
        .unwrap();
        gate.set_open(true, false, &mut set);
        gate.update(0.125, &mut set);
        for (_, segment) in set.iter() {
            assert!(segment.start_velocity() == p(64.0, 0.0));
            assert!(segment.end_velocity() == p(64.0, 0.0));
        }
    }
}
