use crate::core::{hit_test, snap, Clip, ClipGeometry, EnvelopePoint};
use eframe::egui::Pos2;
use std::collections::HashSet;

/// Pointer displacement below which a gesture counts as a stationary click
/// rather than a drag.
pub const CLICK_TOLERANCE: f32 = 3.0;

/// Everything one in-flight point edit needs to remember. The point and its
/// hidden siblings are referenced by id; indices go stale on every re-sort.
#[derive(Debug, Clone)]
pub struct DragSession {
    pub clip_id: String,
    pub point_id: String,
    /// Position of the point when the gesture started.
    pub original_time: f64,
    pub original_db: f64,
    /// Where the pointer went down, for the stationary-click test.
    pub start_pos: Pos2,
    /// Last pointer position seen, used when the pointer leaves the surface.
    pub last_pos: Pos2,
    /// Siblings the drag has crossed over. Excluded from rendering, hit
    /// testing and snapping, but still in the model until release.
    pub hidden: HashSet<String>,
    /// Whether this gesture created the point it is dragging.
    pub is_new_point: bool,
    /// Clip-body frame captured at pointer-down.
    pub geom: ClipGeometry,
    /// Latest snapped gain, for the live tooltip.
    pub live_db: f64,
}

/// State machine for one point-edit gesture. At most one session exists per
/// interaction surface; the enum makes a second concurrent session
/// unrepresentable.
#[derive(Debug, Clone, Default)]
pub enum EnvelopeDrag {
    #[default]
    Idle,
    Active(DragSession),
}

impl EnvelopeDrag {
    pub fn is_active(&self) -> bool {
        matches!(self, EnvelopeDrag::Active(_))
    }

    pub fn session(&self) -> Option<&DragSession> {
        match self {
            EnvelopeDrag::Active(session) => Some(session),
            EnvelopeDrag::Idle => None,
        }
    }

    /// Try to start a gesture on this clip. Grabs an existing point when one
    /// is under the cursor; otherwise a click close enough to the rendered
    /// curve creates a new point and starts dragging it immediately. Returns
    /// false when neither hits, so the dispatcher can route the pointer-down
    /// elsewhere.
    pub fn pointer_down(&mut self, cursor: Pos2, clip: &mut Clip, geom: ClipGeometry) -> bool {
        if self.is_active() {
            return false;
        }

        if let Some(index) = hit_test::hit_point(cursor, &clip.envelope, &geom) {
            let point = &clip.envelope.points()[index];
            *self = EnvelopeDrag::Active(DragSession {
                clip_id: clip.id.clone(),
                point_id: point.id.clone(),
                original_time: point.time,
                original_db: point.db,
                start_pos: cursor,
                last_pos: cursor,
                hidden: HashSet::new(),
                is_new_point: false,
                geom,
                live_db: point.db,
            });
            return true;
        }

        if hit_test::curve_hit(cursor, &clip.envelope, &geom, clip.duration) {
            let time = geom.x_to_time(cursor.x).clamp(0.0, clip.duration);
            let db = geom.y_to_db(cursor.y);
            let point = EnvelopePoint::new(time, db);
            let point_id = point.id.clone();
            clip.envelope.insert(point);

            *self = EnvelopeDrag::Active(DragSession {
                clip_id: clip.id.clone(),
                point_id,
                original_time: time,
                original_db: db,
                start_pos: cursor,
                last_pos: cursor,
                hidden: HashSet::new(),
                is_new_point: true,
                geom,
                live_db: db,
            });
            return true;
        }

        false
    }

    /// Advance the gesture to a new pointer position: derive the candidate
    /// from the cursor, snap it against visible siblings, refresh the hidden
    /// set from the travelled range, then write the point back through its
    /// id. Returns the snapped gain for live feedback.
    pub fn pointer_move(&mut self, cursor: Pos2, clip: &mut Clip) -> Option<f64> {
        let EnvelopeDrag::Active(session) = self else {
            return None;
        };
        session.last_pos = cursor;

        let geom = session.geom;
        let time = geom.x_to_time(cursor.x).clamp(0.0, clip.duration);
        let db = geom.y_to_db(cursor.y);

        let (time, db) = snap::snap_to_siblings(
            time,
            db,
            clip.envelope
                .visible_points(&session.hidden)
                .filter(|p| p.id != session.point_id),
        );

        let lo = session.original_time.min(time);
        let hi = session.original_time.max(time);
        session.hidden = clip
            .envelope
            .points()
            .iter()
            .filter(|p| p.id != session.point_id && p.time > lo && p.time < hi)
            .map(|p| p.id.clone())
            .collect();

        clip.envelope.set_position(&session.point_id, time, db);
        session.live_db = db;
        Some(db)
    }

    /// Finish the gesture. A stationary click keeps a freshly created point
    /// but deletes a pre-existing one; a real drag commits the crossing by
    /// deleting everything still hidden. Always returns to Idle.
    pub fn pointer_up(&mut self, cursor: Pos2, clip: &mut Clip) {
        let EnvelopeDrag::Active(session) = std::mem::take(self) else {
            return;
        };

        let displacement = session.start_pos.distance(cursor);
        if displacement < CLICK_TOLERANCE {
            if !session.is_new_point {
                clip.envelope.remove_by_id(&session.point_id);
            }
        } else {
            for id in &session.hidden {
                clip.envelope.remove_by_id(id);
            }
        }
    }

    /// The pointer left the surface: treated exactly like releasing at the
    /// last seen position, so no session can dangle.
    pub fn pointer_leave(&mut self, clip: &mut Clip) {
        if let EnvelopeDrag::Active(session) = self {
            let pos = session.last_pos;
            self.pointer_up(pos, clip);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::{MAX_DB, MIN_DB};
    use eframe::egui::pos2;

    fn clip_2s() -> (Clip, ClipGeometry) {
        let clip = Clip::new("Vocals", 0.0, 2.0);
        // 100 px/s, body from y=20 to y=114.
        let geom = ClipGeometry::new(0.0, 20.0, 200.0, 94.0, 100.0);
        (clip, geom)
    }

    fn point_id_at(clip: &Clip, index: usize) -> String {
        clip.envelope.points()[index].id.clone()
    }

    #[test]
    fn click_on_empty_curve_creates_point_and_starts_session() {
        // Scenario A: 2 s clip, click near the 0 dB line at relative 0.4.
        let (mut clip, geom) = clip_2s();
        let cursor = pos2(geom.time_to_x(0.8), geom.db_to_y(0.0) + 5.0);

        let mut drag = EnvelopeDrag::default();
        assert!(drag.pointer_down(cursor, &mut clip, geom));

        let session = drag.session().unwrap();
        assert!(session.is_new_point);
        assert_eq!(clip.envelope.len(), 1);

        let point = &clip.envelope.points()[0];
        assert!((point.time - 0.8).abs() < 1e-6);
        assert!((point.db - geom.y_to_db(cursor.y)).abs() < 1e-6);
    }

    #[test]
    fn pointer_down_away_from_curve_declines() {
        let (mut clip, geom) = clip_2s();
        let cursor = pos2(
            geom.time_to_x(0.8),
            geom.db_to_y(0.0) + hit_test::CURVE_HIT_THRESHOLD + 5.0,
        );

        let mut drag = EnvelopeDrag::default();
        assert!(!drag.pointer_down(cursor, &mut clip, geom));
        assert!(!drag.is_active());
        assert!(clip.envelope.is_empty());
    }

    #[test]
    fn dragging_across_a_sibling_hides_then_deletes_it() {
        // Scenario B: points at (0.5, 0) and (1.5, -6); drag the first past
        // 1.5 and release at 1.8.
        let (mut clip, geom) = clip_2s();
        clip.envelope.insert(EnvelopePoint::new(0.5, 0.0));
        clip.envelope.insert(EnvelopePoint::new(1.5, -6.0));
        let dragged = point_id_at(&clip, 0);
        let crossed = point_id_at(&clip, 1);

        let mut drag = EnvelopeDrag::default();
        let grab = geom.point_pos(0.5, 0.0);
        assert!(drag.pointer_down(grab, &mut clip, geom));

        // Still short of the sibling: nothing hidden.
        drag.pointer_move(pos2(geom.time_to_x(1.2), grab.y), &mut clip);
        assert!(drag.session().unwrap().hidden.is_empty());

        // Past it: the sibling goes into the hidden set but stays in the model.
        drag.pointer_move(pos2(geom.time_to_x(1.8), grab.y), &mut clip);
        assert!(drag.session().unwrap().hidden.contains(&crossed));
        assert_eq!(clip.envelope.len(), 2);

        drag.pointer_up(pos2(geom.time_to_x(1.8), grab.y), &mut clip);
        assert!(!drag.is_active());
        assert_eq!(clip.envelope.len(), 1);
        assert!(clip.envelope.by_id(&crossed).is_none());

        let survivor = clip.envelope.by_id(&dragged).unwrap();
        assert!((survivor.time - 1.8).abs() < 1e-6);
    }

    #[test]
    fn retreating_before_release_restores_crossed_points() {
        let (mut clip, geom) = clip_2s();
        clip.envelope.insert(EnvelopePoint::new(0.5, 0.0));
        clip.envelope.insert(EnvelopePoint::new(1.0, 0.0));
        let crossed = point_id_at(&clip, 1);

        let mut drag = EnvelopeDrag::default();
        let grab = geom.point_pos(0.5, 0.0);
        assert!(drag.pointer_down(grab, &mut clip, geom));

        drag.pointer_move(pos2(geom.time_to_x(1.4), grab.y), &mut clip);
        assert!(drag.session().unwrap().hidden.contains(&crossed));

        // Coming back past the sibling un-hides it.
        drag.pointer_move(pos2(geom.time_to_x(0.7), grab.y), &mut clip);
        assert!(drag.session().unwrap().hidden.is_empty());

        drag.pointer_up(pos2(geom.time_to_x(0.7), grab.y), &mut clip);
        assert_eq!(clip.envelope.len(), 2);
    }

    #[test]
    fn stationary_click_deletes_an_existing_point() {
        // Scenario C.
        let (mut clip, geom) = clip_2s();
        clip.envelope.insert(EnvelopePoint::new(1.0, -6.0));

        let mut drag = EnvelopeDrag::default();
        let grab = geom.point_pos(1.0, -6.0);
        assert!(drag.pointer_down(grab, &mut clip, geom));
        drag.pointer_up(grab + eframe::egui::vec2(1.0, 1.0), &mut clip);

        assert!(clip.envelope.is_empty());
        assert!(!drag.is_active());
    }

    #[test]
    fn stationary_click_keeps_a_newly_created_point() {
        let (mut clip, geom) = clip_2s();
        let cursor = pos2(geom.time_to_x(0.8), geom.db_to_y(0.0));

        let mut drag = EnvelopeDrag::default();
        assert!(drag.pointer_down(cursor, &mut clip, geom));
        drag.pointer_up(cursor, &mut clip);

        assert_eq!(clip.envelope.len(), 1);
    }

    #[test]
    fn moved_release_of_new_point_keeps_it() {
        let (mut clip, geom) = clip_2s();
        let cursor = pos2(geom.time_to_x(0.4), geom.db_to_y(0.0));

        let mut drag = EnvelopeDrag::default();
        assert!(drag.pointer_down(cursor, &mut clip, geom));
        let target = pos2(geom.time_to_x(1.1), geom.db_to_y(-20.0));
        drag.pointer_move(target, &mut clip);
        drag.pointer_up(target, &mut clip);

        assert_eq!(clip.envelope.len(), 1);
        let point = &clip.envelope.points()[0];
        assert!((point.time - 1.1).abs() < 1e-6);
    }

    #[test]
    fn candidate_time_is_clamped_to_clip_bounds() {
        let (mut clip, geom) = clip_2s();
        clip.envelope.insert(EnvelopePoint::new(1.0, 0.0));

        let mut drag = EnvelopeDrag::default();
        let grab = geom.point_pos(1.0, 0.0);
        assert!(drag.pointer_down(grab, &mut clip, geom));

        drag.pointer_move(pos2(geom.time_to_x(5.0), grab.y), &mut clip);
        assert!((clip.envelope.points()[0].time - 2.0).abs() < 1e-6);

        drag.pointer_move(pos2(geom.time_to_x(-3.0), grab.y), &mut clip);
        assert!(clip.envelope.points()[0].time.abs() < 1e-6);
    }

    #[test]
    fn candidate_gain_is_clamped_and_bottom_is_silence() {
        let (mut clip, geom) = clip_2s();
        clip.envelope.insert(EnvelopePoint::new(1.0, 0.0));

        let mut drag = EnvelopeDrag::default();
        let grab = geom.point_pos(1.0, 0.0);
        assert!(drag.pointer_down(grab, &mut clip, geom));

        drag.pointer_move(pos2(grab.x, geom.top - 40.0), &mut clip);
        assert_eq!(clip.envelope.points()[0].db, MAX_DB);

        drag.pointer_move(pos2(grab.x, geom.top + geom.height), &mut clip);
        assert_eq!(clip.envelope.points()[0].db, f64::NEG_INFINITY);
        assert_eq!(drag.session().unwrap().live_db, f64::NEG_INFINITY);

        // Just above the silence zone the value is numeric again.
        drag.pointer_move(pos2(grab.x, geom.top + geom.height - 1.0), &mut clip);
        assert_eq!(clip.envelope.points()[0].db, MIN_DB);
    }

    #[test]
    fn snapping_applies_while_dragging() {
        // Scenario D/E wired through the controller.
        let (mut clip, geom) = clip_2s();
        clip.envelope.insert(EnvelopePoint::new(0.3, -2.0));
        clip.envelope.insert(EnvelopePoint::new(1.0, 0.0));
        let dragged = point_id_at(&clip, 1);

        let mut drag = EnvelopeDrag::default();
        let grab = geom.point_pos(1.0, 0.0);
        assert!(drag.pointer_down(grab, &mut clip, geom));

        let live = drag.pointer_move(
            pos2(geom.time_to_x(1.4), geom.db_to_y(-5.9)),
            &mut clip,
        );
        assert_eq!(live, Some(-2.0));
        let point = clip.envelope.by_id(&dragged).unwrap();
        assert_eq!(point.db, -2.0);

        // Time axis: 1.02 is within 0.05 of the sibling at 1.0... the
        // sibling here sits at 0.3, so move near it instead.
        drag.pointer_move(pos2(geom.time_to_x(0.32), geom.db_to_y(-5.9)), &mut clip);
        let point = clip.envelope.by_id(&dragged).unwrap();
        assert_eq!(point.time, 0.3);
    }

    #[test]
    fn hidden_siblings_do_not_attract_snapping() {
        let (mut clip, geom) = clip_2s();
        clip.envelope.insert(EnvelopePoint::new(0.2, 0.0));
        clip.envelope.insert(EnvelopePoint::new(1.0, -30.0));
        let dragged = point_id_at(&clip, 0);
        let crossed = point_id_at(&clip, 1);

        let mut drag = EnvelopeDrag::default();
        let grab = geom.point_pos(0.2, 0.0);
        assert!(drag.pointer_down(grab, &mut clip, geom));

        // Cross over the sibling at a gain far outside snap range.
        drag.pointer_move(pos2(geom.time_to_x(1.6), geom.db_to_y(-10.0)), &mut clip);
        assert!(drag.session().unwrap().hidden.contains(&crossed));

        // -28 is within 6 dB of the hidden sibling's -30, but hidden points
        // are out of the running, so the candidate keeps its own gain.
        drag.pointer_move(pos2(geom.time_to_x(1.5), geom.db_to_y(-28.0)), &mut clip);
        let point = clip.envelope.by_id(&dragged).unwrap();
        assert!((point.db - geom.y_to_db(geom.db_to_y(-28.0))).abs() < 1e-4);
        assert_ne!(point.db, -30.0);
    }

    #[test]
    fn identity_survives_reordering_past_duplicates() {
        let (mut clip, geom) = clip_2s();
        clip.envelope.insert(EnvelopePoint::new(0.5, -6.0));
        clip.envelope.insert(EnvelopePoint::new(1.0, -6.0));
        let dragged = point_id_at(&clip, 0);

        let mut drag = EnvelopeDrag::default();
        let grab = geom.point_pos(0.5, -6.0);
        assert!(drag.pointer_down(grab, &mut clip, geom));

        // Land exactly on the sibling's coordinates via snap, then keep
        // going; the session must still track the original point.
        drag.pointer_move(pos2(geom.time_to_x(0.98), geom.db_to_y(-6.0)), &mut clip);
        drag.pointer_move(pos2(geom.time_to_x(1.7), geom.db_to_y(-6.0)), &mut clip);

        let point = clip.envelope.by_id(&dragged).unwrap();
        assert!((point.time - 1.7).abs() < 1e-6);
    }

    #[test]
    fn pointer_leave_acts_as_release() {
        let (mut clip, geom) = clip_2s();
        clip.envelope.insert(EnvelopePoint::new(0.5, 0.0));
        clip.envelope.insert(EnvelopePoint::new(1.5, -6.0));
        let crossed = point_id_at(&clip, 1);

        let mut drag = EnvelopeDrag::default();
        let grab = geom.point_pos(0.5, 0.0);
        assert!(drag.pointer_down(grab, &mut clip, geom));
        drag.pointer_move(pos2(geom.time_to_x(1.8), grab.y), &mut clip);

        drag.pointer_leave(&mut clip);
        assert!(!drag.is_active());
        assert!(clip.envelope.by_id(&crossed).is_none());
    }

    #[test]
    fn live_feedback_reports_snapped_gain() {
        let (mut clip, geom) = clip_2s();
        clip.envelope.insert(EnvelopePoint::new(0.3, -2.0));

        let mut drag = EnvelopeDrag::default();
        let cursor = pos2(geom.time_to_x(1.0), geom.db_to_y(0.0));
        assert!(drag.pointer_down(cursor, &mut clip, geom));

        drag.pointer_move(pos2(geom.time_to_x(1.2), geom.db_to_y(-4.0)), &mut clip);
        assert_eq!(drag.session().unwrap().live_db, -2.0);
    }
}
