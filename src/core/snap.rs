use crate::core::EnvelopePoint;

/// Horizontal snap: a dragged point locks onto a sibling's time when closer
/// than this, in seconds.
pub const SNAP_THRESHOLD_TIME: f64 = 0.05;
/// Vertical snap: a dragged point locks onto a sibling's gain when closer
/// than this, in dB.
pub const SNAP_THRESHOLD_DB: f64 = 6.0;

/// Quantize a candidate position against sibling points, each axis on its
/// own. The caller filters the iterator down to eligible siblings (not the
/// dragged point, not hidden). When several siblings qualify on one axis the
/// last one in iteration order wins; a -inf gain never participates since
/// its distance to any value is not finite.
pub fn snap_to_siblings<'a>(
    time: f64,
    db: f64,
    siblings: impl IntoIterator<Item = &'a EnvelopePoint>,
) -> (f64, f64) {
    let mut snapped_time = time;
    let mut snapped_db = db;

    for other in siblings {
        if (db - other.db).abs() < SNAP_THRESHOLD_DB {
            snapped_db = other.db;
        }
        if (time - other.time).abs() < SNAP_THRESHOLD_TIME {
            snapped_time = other.time;
        }
    }

    (snapped_time, snapped_db)
}
