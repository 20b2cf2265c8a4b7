use geo::Point;
use strum_macros::{Display, EnumIter};

use crate::utility::p;

#[derive(Copy, Clone, PartialEq, Eq, Debug, Display, EnumIter)]
pub enum Corner {
    TopLeft,
    BottomLeft,
    TopRight,
    BottomRight,
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Aabb {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Aabb {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Aabb {
        Aabb {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn corner(&self, corner: Corner) -> Point<f64> {
        match corner {
            Corner::TopLeft => p(self.left, self.top),
            Corner::TopRight => p(self.right, self.top),
            Corner::BottomLeft => p(self.left, self.bottom),
            Corner::BottomRight => p(self.right, self.bottom),
        }
    }
}
