use derive_more::{Display, From, Into};
use log::{debug, trace};

use crate::body::PhysicsBody;
use crate::constants::KILL_PLANE_Y;
use crate::gate::Gate;
use crate::segment_set::SegmentSet;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display, From, Into)]
#[display(fmt = "body#{}", _0)]
pub struct BodyId(usize);

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display, From, Into)]
#[display(fmt = "gate#{}", _0)]
pub struct GateId(usize);

#[derive(Clone, Debug)]
pub struct World {
    pub segments: SegmentSet,
    bodies: Vec<PhysicsBody>,
    gates: Vec<Gate>,
    // bodies below this are reported as fallen
    pub kill_y: f64,
}

impl Default for World {
    fn default() -> Self {
        World {
            segments: SegmentSet::new(),
            bodies: Vec::new(),
            gates: Vec::new(),
            kill_y: KILL_PLANE_Y,
        }
    }
}

impl World {
    pub fn new() -> World {
        World::default()
    }

    pub fn add_body(&mut self, body: PhysicsBody) -> BodyId {
        self.bodies.push(body);
        BodyId(self.bodies.len() - 1)
    }

    pub fn body(&self, id: BodyId) -> Option<&PhysicsBody> {
        self.bodies.get(id.0)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut PhysicsBody> {
        self.bodies.get_mut(id.0)
    }

    pub fn body_and_segments(&mut self, id: BodyId) -> Option<(&mut PhysicsBody, &SegmentSet)> {
        let segments = &self.segments;
        self.bodies.get_mut(id.0).map(|body| (body, segments))
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &PhysicsBody)> {
        self.bodies
            .iter()
            .enumerate()
            .map(|(index, body)| (BodyId(index), body))
    }

    pub fn add_gate(&mut self, gate: Gate) -> GateId {
        self.gates.push(gate);
        GateId(self.gates.len() - 1)
    }

    pub fn gate(&self, id: GateId) -> Option<&Gate> {
        self.gates.get(id.0)
    }

    pub fn set_gate_open(&mut self, id: GateId, open: bool, instant: bool) {
        if let Some(gate) = self.gates.get_mut(id.0) {
            debug!("{} {}", id, if open { "opening" } else { "closing" });
            gate.set_open(open, instant, &mut self.segments);
        }
    }

    pub fn toggle_gates(&mut self) {
        for gate in self.gates.iter_mut() {
            let open = !gate.is_open();
            gate.set_open(open, false, &mut self.segments);
        }
    }

    pub fn advance_kinematics(&mut self, dt: f64) {
        for gate in self.gates.iter_mut() {
            gate.update(dt, &mut self.segments);
        }
    }

    // returns the bodies that ended the step below the kill plane
    pub fn simulate_bodies(&mut self, dt: f64) -> Vec<BodyId> {
        let mut fallen = Vec::new();
        for (index, body) in self.bodies.iter_mut().enumerate() {
            body.simulate(dt, &self.segments);
            if body.has_fallen(self.kill_y) {
                fallen.push(BodyId(index));
            }
        }
        fallen
    }

    pub fn step(&mut self, dt: f64) -> Vec<BodyId> {
        trace!("world step dt={}", dt);
        self.advance_kinematics(dt);
        self.simulate_bodies(dt)
    }

    pub fn clear(&mut self) {
        self.segments.clear();
        self.bodies.clear();
        self.gates.clear();
    }
}
