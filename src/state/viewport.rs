// Display zoom for the map wrapper. Pure presentation state; the
// coordinate transform never reads it.

pub const ZOOM_MIN: f64 = 0.25;
pub const ZOOM_MAX: f64 = 4.0;
pub const ZOOM_STEP: f64 = 0.25;
pub const ZOOM_WHEEL_STEP: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Zoom {
    pub level: f64,
}

impl Default for Zoom {
    fn default() -> Self {
        Self { level: 1.0 }
    }
}

impl Zoom {
    pub fn zoomed_in(self) -> Self {
        self.with_level(self.level + ZOOM_STEP)
    }

    pub fn zoomed_out(self) -> Self {
        self.with_level(self.level - ZOOM_STEP)
    }

    pub fn with_level(self, level: f64) -> Self {
        Self {
            level: level.clamp(ZOOM_MIN, ZOOM_MAX),
        }
    }

    pub fn percent(&self) -> u32 {
        (self.level * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_stay_within_bounds() {
        let mut z = Zoom::default();
        for _ in 0..40 {
            z = z.zoomed_out();
        }
        assert_eq!(z.level, ZOOM_MIN);
        for _ in 0..40 {
            z = z.zoomed_in();
        }
        assert_eq!(z.level, ZOOM_MAX);
        assert_eq!(z.percent(), 400);
    }
}
