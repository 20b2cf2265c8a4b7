use derive_more::{Display, From, Into};
use geo::Point;
use log::warn;

use crate::segment::{GeometryError, Segment};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display, From, Into)]
#[display(fmt = "segment#{}", _0)]
pub struct SegmentId(usize);

#[derive(Clone, Debug, Default)]
pub struct SegmentSet {
    segments: Vec<Segment>,
}

impl SegmentSet {
    pub fn new() -> SegmentSet {
        SegmentSet::default()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn push(&mut self, segment: Segment) -> SegmentId {
        self.segments.push(segment);
        SegmentId(self.segments.len() - 1)
    }

    pub fn add(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<SegmentId, GeometryError> {
        Ok(self.push(Segment::new(x1, y1, x2, y2)?))
    }

    // solid polygons are wound so their top edges run right to left
    pub fn add_polygon(&mut self, origin: Point<f64>, points: &[Point<f64>]) -> Vec<SegmentId> {
        let mut ids = Vec::new();
        for i in 0..points.len() {
            let next = (i + 1) % points.len();
            if let Some(id) = self.add_edge(origin + points[i], origin + points[next]) {
                ids.push(id);
            }
        }
        ids
    }

    pub fn add_polyline(&mut self, origin: Point<f64>, points: &[Point<f64>]) -> Vec<SegmentId> {
        points
            .windows(2)
            .filter_map(|pair| self.add_edge(origin + pair[0], origin + pair[1]))
            .collect()
    }

    fn add_edge(&mut self, start: Point<f64>, end: Point<f64>) -> Option<SegmentId> {
        match Segment::from_points(start, end) {
            Ok(segment) => Some(self.push(segment)),
            Err(err) => {
                warn!("skipping edge {:?} -> {:?}: {}", start.x_y(), end.x_y(), err);
                None
            }
        }
    }

    pub fn get(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id.0)
    }

    pub fn get_mut(&mut self, id: SegmentId) -> Option<&mut Segment> {
        self.segments.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SegmentId, &Segment)> {
        self.segments
            .iter()
            .enumerate()
            .map(|(index, segment)| (SegmentId(index), segment))
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utility::p;
    use assert2::assert;

    #[test]
    fn test_handles_follow_insertion_order() {
        let mut set = SegmentSet::new();
        let a = set.add(0.0, 0.0, 1.0, 0.0).unwrap();
        let b = set.add(1.0, 0.0, 2.0, 0.0).unwrap();
        assert!(usize::from(a) == 0);
        assert!(usize::from(b) == 1);
        let ids: Vec<SegmentId> = set.iter().map(|(id, _)| id).collect();
        assert!(ids == vec![a, b]);
        assert!(b.to_string() == "segment#1");
    }

    #[test]
    fn test_degenerate_segment_never_enters_the_set() {
        let mut set = SegmentSet::new();
        assert!(set.add(5.0, 5.0, 5.0, 5.0).is_err());
        assert!(set.is_empty());
    }

    #[test]
    fn test_polygon_is_closed_and_offset() {
        let mut set = SegmentSet::new();
        let ids = set.add_polygon(
            p(10.0, 20.0),
            &[p(100.0, 0.0), p(0.0, 0.0), p(0.0, 50.0), p(100.0, 50.0)],
        );
        assert!(ids.len() == 4);
        let top = set.get(ids[0]).unwrap();
        assert!(top.start() == p(110.0, 20.0));
        assert!(top.end() == p(10.0, 20.0));
        let closing = set.get(ids[3]).unwrap();
        assert!(closing.end() == p(110.0, 20.0));
    }

    #[test]
    fn test_polyline_skips_repeated_points() {
        let mut set = SegmentSet::new();
        let ids = set.add_polyline(
            p(0.0, 0.0),
            &[p(0.0, 0.0), p(10.0, 0.0), p(10.0, 0.0), p(10.0, 10.0)],
        );
        assert!(ids.len() == 2);
        assert!(set.len() == 2);
    }

    #[test]
    fn test_segments_are_mutable_through_their_handle() {
        let mut set = SegmentSet::new();
        let id = set.add(0.0, 0.0, 10.0, 0.0).unwrap();
        set.get_mut(id)
            .unwrap()
            .set_endpoints(p(0.0, 5.0), p(10.0, 5.0))
            .unwrap();
        assert!(set.get(id).unwrap().start() == p(0.0, 5.0));
        set.clear();
        assert!(set.get(id) == None);
    }
}
