use eframe::egui;

/// Gain range shown inside a clip body. Values below `MIN_DB` collapse into
/// the silence zone at the very bottom of the clip.
pub const MIN_DB: f64 = -60.0;
pub const MAX_DB: f64 = 12.0;

/// The bottom-most pixel row of a clip body is reserved for -inf dB.
pub const INFINITY_ZONE_HEIGHT: f32 = 1.0;

pub fn time_to_x(time: f64, clip_left: f32, pixels_per_second: f32) -> f32 {
    clip_left + (time * pixels_per_second as f64) as f32
}

pub fn x_to_time(x: f32, clip_left: f32, pixels_per_second: f32) -> f64 {
    ((x - clip_left) / pixels_per_second) as f64
}

/// Map a dB value to a vertical pixel position inside `[top, top + height]`.
///
/// The usable band is `height - INFINITY_ZONE_HEIGHT`; -inf (and anything
/// below `MIN_DB`) lands on the very bottom pixel. Higher gain maps to a
/// smaller y.
pub fn db_to_y(db: f64, top: f32, height: f32) -> f32 {
    let usable = height - INFINITY_ZONE_HEIGHT;

    if db == f64::NEG_INFINITY || db < MIN_DB {
        return top + height;
    }

    let normalized = ((db - MIN_DB) / (MAX_DB - MIN_DB)) as f32;
    top + usable - normalized * usable
}

/// Inverse of [`db_to_y`]. Positions inside the reserved bottom zone come
/// back as -inf; numeric results are clamped to `[MIN_DB, MAX_DB]`.
pub fn y_to_db(y: f32, top: f32, height: f32) -> f64 {
    let usable = height - INFINITY_ZONE_HEIGHT;

    if y > top + usable {
        return f64::NEG_INFINITY;
    }

    let normalized = ((top + usable - y) / usable) as f64;
    (MIN_DB + normalized * (MAX_DB - MIN_DB)).clamp(MIN_DB, MAX_DB)
}

/// Pixel-space frame of one clip body, frozen at gesture start so a drag
/// keeps its mapping even while the model underneath changes.
///
/// `width` and `pixels_per_second` must be positive; the mapping is
/// undefined otherwise (callers never build a geometry for a zero-width
/// clip).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipGeometry {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub pixels_per_second: f32,
}

impl ClipGeometry {
    pub fn new(left: f32, top: f32, width: f32, height: f32, pixels_per_second: f32) -> Self {
        debug_assert!(width > 0.0 && height > 0.0 && pixels_per_second > 0.0);
        Self {
            left,
            top,
            width,
            height,
            pixels_per_second,
        }
    }

    pub fn time_to_x(&self, time: f64) -> f32 {
        time_to_x(time, self.left, self.pixels_per_second)
    }

    pub fn x_to_time(&self, x: f32) -> f64 {
        x_to_time(x, self.left, self.pixels_per_second)
    }

    pub fn db_to_y(&self, db: f64) -> f32 {
        db_to_y(db, self.top, self.height)
    }

    pub fn y_to_db(&self, y: f32) -> f64 {
        y_to_db(y, self.top, self.height)
    }

    /// Duration covered by the clip body in seconds.
    pub fn duration(&self) -> f64 {
        (self.width / self.pixels_per_second) as f64
    }

    pub fn point_pos(&self, time: f64, db: f64) -> egui::Pos2 {
        egui::pos2(self.time_to_x(time), self.db_to_y(db))
    }

    pub fn rect(&self) -> egui::Rect {
        egui::Rect::from_min_size(
            egui::pos2(self.left, self.top),
            egui::vec2(self.width, self.height),
        )
    }
}
