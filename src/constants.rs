// Units are world units (pixels at zoom 1) and seconds. Y grows downward.

pub const GRAVITY: f64 = 4000.0;
// rise over run; anything steeper is a wall or ceiling
pub const MAX_WALKABLE_SLOPE: f64 = 1.0;
pub const STEP_HEIGHT: f64 = 10.0;
pub const FLOOR_FRICTION_COEFF: f64 = 10.0;
// deepest corner penetration still treated as contact this step
pub const WALL_DEPTH: f64 = 16.0;
pub const KILL_PLANE_Y: f64 = 1000.0;

pub const MOVE_SPEED_MAX: f64 = 290.0;
pub const AIR_MOVE_ACCELERATION: f64 = 2000.0;
pub const JUMP_VELOCITY: f64 = 750.0;

pub const TETHER_LIMIT: f64 = 500.0;
pub const TETHER_SNAP_SLACK: f64 = 64.0;
pub const TETHER_MAX_PULL_PER_STEP: f64 = 5.0;
pub const TETHER_OFFSET_X: f64 = 0.0;
pub const TETHER_OFFSET_Y: f64 = -8.0;
pub const TETHER_MAX_POINTS: usize = 100;
// how close (manhattan) a crossing must be to a segment end to wrap around it
pub const TETHER_WRAP_RADIUS: f64 = 16.0;

pub const MAX_SUBSTEP_MS: f64 = 5.0;
pub const MAX_BACKLOG_MS: f64 = 500.0;

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct PhysicsConfig {
    pub gravity: f64,
    pub max_walkable_slope: f64,
    pub step_height: f64,
    pub floor_friction_coeff: f64,
    pub wall_depth: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            gravity: GRAVITY,
            max_walkable_slope: MAX_WALKABLE_SLOPE,
            step_height: STEP_HEIGHT,
            floor_friction_coeff: FLOOR_FRICTION_COEFF,
            wall_depth: WALL_DEPTH,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ControllerConfig {
    pub move_speed_max: f64,
    pub air_move_acceleration: f64,
    pub jump_velocity: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig {
            move_speed_max: MOVE_SPEED_MAX,
            air_move_acceleration: AIR_MOVE_ACCELERATION,
            jump_velocity: JUMP_VELOCITY,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct TetherConfig {
    pub limit: f64,
    pub snap_slack: f64,
    pub max_pull_per_step: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub max_points: usize,
    pub wrap_radius: f64,
}

impl Default for TetherConfig {
    fn default() -> Self {
        TetherConfig {
            limit: TETHER_LIMIT,
            snap_slack: TETHER_SNAP_SLACK,
            max_pull_per_step: TETHER_MAX_PULL_PER_STEP,
            offset_x: TETHER_OFFSET_X,
            offset_y: TETHER_OFFSET_Y,
            max_points: TETHER_MAX_POINTS,
            wrap_radius: TETHER_WRAP_RADIUS,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ClockConfig {
    pub max_step_ms: f64,
    pub max_backlog_ms: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        ClockConfig {
            max_step_ms: MAX_SUBSTEP_MS,
            max_backlog_ms: MAX_BACKLOG_MS,
        }
    }
}
