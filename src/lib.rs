// Y grows downward throughout.

pub mod aabb;
pub mod body;
pub mod clock;
pub mod constants;
pub mod controller;
pub mod gate;
pub mod player;
pub mod segment;
pub mod segment_set;
pub mod tether;
pub mod utility;
pub mod world;

pub use aabb::{Aabb, Corner};
pub use body::{Contact, FloorContact, PhysicsBody, WallContact};
pub use clock::FrameClock;
pub use controller::{Controller, MoveIntent};
pub use gate::{Gate, GatePose};
pub use player::Player;
pub use segment::{GeometryError, Segment};
pub use segment_set::{SegmentId, SegmentSet};
pub use tether::{Tether, TetherStatus};
pub use world::{BodyId, GateId, World};
