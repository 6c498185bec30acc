use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// One gain-automation control point.
///
/// `db` is a level in [-60, +12] dB or `f64::NEG_INFINITY` for full silence.
/// The id is the point's stable identity: drags, hides and deletes always
/// resolve points by id, never by matching coordinates, so duplicate
/// positions stay unambiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopePoint {
    pub id: String,
    pub time: f64, // Seconds, relative to the clip start
    pub db: f64,
}

impl EnvelopePoint {
    pub fn new(time: f64, db: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            time,
            db,
        }
    }
}

/// The gain envelope of one clip: control points kept sorted ascending by
/// time. The sort is stable, so points sharing a time keep their insertion
/// order; that order is also the iteration order seen by snapping and
/// hit-testing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvelopeCurve {
    points: Vec<EnvelopePoint>,
}

impl EnvelopeCurve {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[EnvelopePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&EnvelopePoint> {
        self.points.get(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.points.iter().position(|p| p.id == id)
    }

    pub fn by_id(&self, id: &str) -> Option<&EnvelopePoint> {
        self.points.iter().find(|p| p.id == id)
    }

    /// Add a point and re-sort. Returns the index the point landed on,
    /// resolved by identity.
    pub fn insert(&mut self, point: EnvelopePoint) -> usize {
        let id = point.id.clone();
        self.points.push(point);
        self.sort_points();
        self.index_of(&id).unwrap_or(self.points.len() - 1)
    }

    pub fn remove_at(&mut self, index: usize) -> Option<EnvelopePoint> {
        if index < self.points.len() {
            Some(self.points.remove(index))
        } else {
            None
        }
    }

    pub fn remove_by_id(&mut self, id: &str) -> Option<EnvelopePoint> {
        let index = self.index_of(id)?;
        Some(self.points.remove(index))
    }

    /// Push a previously removed point back in, restoring sorted order.
    pub fn reinsert(&mut self, point: EnvelopePoint) {
        self.points.push(point);
        self.sort_points();
    }

    /// Move the point with the given id and re-sort. Returns its index
    /// after the sort, or None if the id is unknown.
    pub fn set_position(&mut self, id: &str, time: f64, db: f64) -> Option<usize> {
        let index = self.index_of(id)?;
        self.points[index].time = time;
        self.points[index].db = db;
        self.sort_points();
        self.index_of(id)
    }

    /// Points not in the hidden set, in curve order.
    pub fn visible_points<'a>(
        &'a self,
        hidden: &'a HashSet<String>,
    ) -> impl Iterator<Item = &'a EnvelopePoint> {
        self.points.iter().filter(move |p| !hidden.contains(&p.id))
    }

    /// Stable sort: equal times keep insertion order.
    pub fn sort_points(&mut self) {
        self.points.sort_by_key(|p| OrderedFloat(p.time));
    }
}
