use geo::algorithm::euclidean_length::EuclideanLength;
use geo::{Line, Point};
use thiserror::Error;

use crate::aabb::Aabb;
use crate::utility::{cross, p, perpendicular};

#[derive(Copy, Clone, PartialEq, Debug, Error)]
pub enum GeometryError {
    #[error("segment endpoints coincide at ({x}, {y})")]
    Degenerate { x: f64, y: f64 },
    #[error("segment has a non-finite coordinate or velocity")]
    NonFinite,
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Segment {
    start: Point<f64>,
    end: Point<f64>,
    start_velocity: Point<f64>,
    end_velocity: Point<f64>,
}

fn is_finite(point: Point<f64>) -> bool {
    point.x().is_finite() && point.y().is_finite()
}

fn check_endpoints(start: Point<f64>, end: Point<f64>) -> Result<(), GeometryError> {
    if !is_finite(start) || !is_finite(end) {
        return Err(GeometryError::NonFinite);
    }
    if Line::new(start, end).euclidean_length() == 0.0 {
        return Err(GeometryError::Degenerate {
            x: start.x(),
            y: start.y(),
        });
    }
    Ok(())
}

impl Segment {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Segment, GeometryError> {
        Segment::from_points(p(x1, y1), p(x2, y2))
    }

    pub fn from_points(start: Point<f64>, end: Point<f64>) -> Result<Segment, GeometryError> {
        check_endpoints(start, end)?;
        Ok(Segment {
            start,
            end,
            start_velocity: p(0.0, 0.0),
            end_velocity: p(0.0, 0.0),
        })
    }

    pub fn with_velocities(
        mut self,
        start_velocity: Point<f64>,
        end_velocity: Point<f64>,
    ) -> Result<Segment, GeometryError> {
        self.set_velocities(start_velocity, end_velocity)?;
        Ok(self)
    }

    pub fn start(&self) -> Point<f64> {
        self.start
    }
    pub fn end(&self) -> Point<f64> {
        self.end
    }
    pub fn start_velocity(&self) -> Point<f64> {
        self.start_velocity
    }
    pub fn end_velocity(&self) -> Point<f64> {
        self.end_velocity
    }

    pub fn line(&self) -> Line<f64> {
        Line::new(self.start, self.end)
    }

    // on error the segment is left where it was
    pub fn set_endpoints(&mut self, start: Point<f64>, end: Point<f64>) -> Result<(), GeometryError> {
        check_endpoints(start, end)?;
        self.start = start;
        self.end = end;
        Ok(())
    }

    pub fn set_velocities(
        &mut self,
        start_velocity: Point<f64>,
        end_velocity: Point<f64>,
    ) -> Result<(), GeometryError> {
        if !is_finite(start_velocity) || !is_finite(end_velocity) {
            return Err(GeometryError::NonFinite);
        }
        self.start_velocity = start_velocity;
        self.end_velocity = end_velocity;
        Ok(())
    }

    // distance in multiples of (dx, dy); either winding counts
    pub fn intersect_ray(&self, x: f64, y: f64, dx: f64, dy: f64) -> Option<f64> {
        let (d1, d2) = self.ray_sides(x, y, dx, dy);
        let crosses = (d1 <= 0.0 && d2 >= 0.0) || (d1 >= 0.0 && d2 <= 0.0);
        if !crosses || d1 == d2 {
            return None;
        }
        self.ray_distance(x, y, dx, dy, d1, d2)
    }

    pub fn intersect_ray_front_face(&self, x: f64, y: f64, dx: f64, dy: f64) -> Option<f64> {
        let (d1, d2) = self.ray_sides(x, y, dx, dy);
        if !(d2 >= 0.0 && d1 <= 0.0) || d1 == d2 {
            return None;
        }
        self.ray_distance(x, y, dx, dy, d1, d2)
    }

    fn ray_sides(&self, x: f64, y: f64, dx: f64, dy: f64) -> (f64, f64) {
        let dir = p(dx, dy);
        let origin = p(x, y);
        (cross(dir, self.start - origin), cross(dir, self.end - origin))
    }

    fn ray_distance(&self, x: f64, y: f64, dx: f64, dy: f64, d1: f64, d2: f64) -> Option<f64> {
        let dir = p(dx, dy);
        let origin = p(x, y);
        let l1 = dir.dot(self.start - origin);
        let l2 = dir.dot(self.end - origin);
        let along_per_side = (l2 - l1) / (d2 - d1);
        let distance = (-d1 * along_per_side + l1) / dir.dot(dir);
        if distance > 0.0 {
            Some(distance)
        } else {
            None
        }
    }

    // blend is not clamped to the segment
    pub fn point_velocity(&self, x: f64, y: f64) -> Point<f64> {
        let axis = self.end - self.start;
        let t = (p(x, y) - self.start).dot(axis) / axis.dot(axis);
        self.start_velocity + (self.end_velocity - self.start_velocity) * t
    }

    pub fn normal(&self) -> Point<f64> {
        let n = perpendicular(self.start - self.end);
        n / self.line().euclidean_length()
    }

    // negative on the open side
    pub fn penetration(&self, point: Point<f64>) -> f64 {
        -(point - self.start).dot(self.normal())
    }

    pub fn overlaps(&self, aabb: &Aabb) -> bool {
        let min_x = self.start.x().min(self.end.x());
        let max_x = self.start.x().max(self.end.x());
        let min_y = self.start.y().min(self.end.y());
        let max_y = self.start.y().max(self.end.y());
        !(min_x >= aabb.right || max_x <= aabb.left || min_y >= aabb.bottom || max_y <= aabb.top)
    }
}
