use geo::{point, CoordNum, Point};
use num::traits::Pow;

pub fn p<T: 'static>(x: T, y: T) -> Point<T>
where
    T: CoordNum,
{
    return point!(x: x, y: y);
}

pub fn magnitude(vec: Point<f64>) -> f64 {
    return (vec.x().pow(2.0_f64) + vec.y().pow(2.0_f64)).sqrt();
}
pub fn direction(vec: Point<f64>) -> Point<f64> {
    return vec / magnitude(vec);
}

// z component of the 3d cross product
pub fn cross(v1: Point<f64>, v2: Point<f64>) -> f64 {
    return v1.x() * v2.y() - v1.y() * v2.x();
}

// rotated a quarter turn, (x, y) -> (y, -x)
pub fn perpendicular(vec: Point<f64>) -> Point<f64> {
    return p(vec.y(), -vec.x());
}

pub fn manhattan_distance(a: Point<f64>, b: Point<f64>) -> f64 {
    return (a.x() - b.x()).abs() + (a.y() - b.y()).abs();
}

pub fn is_zero(vec: Point<f64>) -> bool {
    return vec.x() == 0.0 && vec.y() == 0.0;
}

pub trait SignedExt: num::Signed {
    fn sign(&self) -> Self;
}

impl<T: num::Signed> SignedExt for T {
    // signum, except zero stays zero
    fn sign(&self) -> T {
        if *self == T::zero() {
            return T::zero();
        } else if self.is_negative() {
            return -T::one();
        } else {
            return T::one();
        }
    }
}

pub fn project(v1: Point<f64>, v2: Point<f64>) -> Point<f64> {
    return direction(v2) * v1.dot(v2) / magnitude(v2);
}

pub trait PointExt {
    fn add_assign(&mut self, rhs: Self);
    fn sub_assign(&mut self, rhs: Self);
}

impl<T: CoordNum> PointExt for Point<T> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}
