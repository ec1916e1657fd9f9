// Pan/zoom state for one map surface.
use crate::model::{MAX_SCALE, MIN_SCALE, ScreenPoint};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub offset: ScreenPoint,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: ScreenPoint::ORIGIN,
        }
    }
}

/// Clamp a scale into bounds. Non-finite input falls back to 1.
pub fn clamp_scale(scale: f64) -> f64 {
    if scale.is_finite() {
        scale.clamp(MIN_SCALE, MAX_SCALE)
    } else {
        1.0
    }
}

/// Wheel delta to additive scale delta; scrolling up zooms in.
pub fn wheel_delta(delta_y: f64, sensitivity: f64) -> f64 {
    if !delta_y.is_finite() || !sensitivity.is_finite() {
        return 0.0;
    }
    -delta_y * sensitivity
}

impl Viewport {
    /// Scale safe to divide by.
    pub fn effective_scale(&self) -> f64 {
        clamp_scale(self.scale)
    }

    /// Add `delta_scale` to the zoom while keeping the content under `anchor`
    /// at the same screen position. Returns false if nothing moved.
    pub fn zoom_at(&mut self, anchor: ScreenPoint, delta_scale: f64) -> bool {
        if !delta_scale.is_finite() {
            return false;
        }
        self.zoom_to(anchor, self.effective_scale() + delta_scale)
    }

    /// Multiplicative zoom around `anchor`, used by the +/- buttons.
    pub fn zoom_by(&mut self, anchor: ScreenPoint, factor: f64) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        self.zoom_to(anchor, self.effective_scale() * factor)
    }

    fn zoom_to(&mut self, anchor: ScreenPoint, target: f64) -> bool {
        let old = self.effective_scale();
        let new = clamp_scale(target);
        if anchor.x.is_nan() || anchor.y.is_nan() {
            return false;
        }
        if (new - old).abs() < f64::EPSILON && self.scale == old {
            return false;
        }
        let ratio = new / old;
        self.offset = ScreenPoint::new(
            anchor.x - (anchor.x - self.offset.x) * ratio,
            anchor.y - (anchor.y - self.offset.y) * ratio,
        );
        self.scale = new;
        true
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) -> bool {
        if !dx.is_finite() || !dy.is_finite() || (dx == 0.0 && dy == 0.0) {
            return false;
        }
        self.offset.x += dx;
        self.offset.y += dy;
        true
    }

    pub fn set_offset(&mut self, offset: ScreenPoint) -> bool {
        if !offset.x.is_finite() || !offset.y.is_finite() || offset == self.offset {
            return false;
        }
        self.offset = offset;
        true
    }

    pub fn reset(&mut self) -> bool {
        let changed = *self != Viewport::default();
        *self = Viewport::default();
        changed
    }

    /// Zoom as a whole percentage for the controls label.
    pub fn percent(&self) -> u32 {
        (self.effective_scale() * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CELL_SIZE_PX;
    use crate::state::transform::screen_to_grid;
    use proptest::prelude::*;

    #[test]
    fn zoom_keeps_cell_under_cursor() {
        let mut vp = Viewport::default();
        vp.pan_by(-37.0, 12.5);
        let p = ScreenPoint::new(100.0, 100.0);
        let before = screen_to_grid(p, &vp, CELL_SIZE_PX);
        assert!(vp.zoom_at(p, 0.5));
        assert!((vp.scale - 1.5).abs() < 1e-9);
        assert_eq!(screen_to_grid(p, &vp, CELL_SIZE_PX), before);
    }

    #[test]
    fn zoom_is_clamped_to_bounds() {
        let mut vp = Viewport::default();
        vp.zoom_at(ScreenPoint::ORIGIN, 100.0);
        assert_eq!(vp.scale, MAX_SCALE);
        assert!(!vp.zoom_at(ScreenPoint::ORIGIN, 1.0));
        vp.zoom_at(ScreenPoint::ORIGIN, -100.0);
        assert_eq!(vp.scale, MIN_SCALE);
        assert!(!vp.zoom_at(ScreenPoint::ORIGIN, f64::NAN));
        assert_eq!(vp.scale, MIN_SCALE);
    }

    #[test]
    fn zoom_by_uses_factor() {
        let mut vp = Viewport::default();
        vp.zoom_by(ScreenPoint::ORIGIN, 1.2);
        assert!((vp.scale - 1.2).abs() < 1e-9);
        assert!(!vp.zoom_by(ScreenPoint::ORIGIN, 0.0));
    }

    #[test]
    fn wheel_up_zooms_in() {
        assert!(wheel_delta(-120.0, 0.001) > 0.0);
        assert!(wheel_delta(120.0, 0.001) < 0.0);
        assert_eq!(wheel_delta(f64::INFINITY, 0.001), 0.0);
    }

    #[test]
    fn reset_restores_identity() {
        let mut vp = Viewport::default();
        vp.pan_by(300.0, -20.0);
        vp.zoom_at(ScreenPoint::new(50.0, 60.0), 1.3);
        assert!(vp.reset());
        assert_eq!(vp, Viewport::default());
        assert!(!vp.reset());
    }

    #[test]
    fn non_finite_offsets_are_ignored() {
        let mut vp = Viewport::default();
        assert!(!vp.set_offset(ScreenPoint::new(f64::NAN, 0.0)));
        assert!(!vp.pan_by(f64::INFINITY, 0.0));
        assert_eq!(vp.offset, ScreenPoint::ORIGIN);
    }

    proptest! {
        #[test]
        fn zoom_anchor_holds(
            ox in -2000.0f64..2000.0,
            oy in -2000.0f64..2000.0,
            start in MIN_SCALE..MAX_SCALE,
            delta in -3.0f64..3.0,
            px in 0.0f64..1500.0,
            py in 0.0f64..1000.0,
        ) {
            let mut vp = Viewport { scale: start, offset: ScreenPoint::new(ox, oy) };
            let p = ScreenPoint::new(px, py);
            let content_x = (p.x - vp.offset.x) / vp.scale;
            let content_y = (p.y - vp.offset.y) / vp.scale;
            vp.zoom_at(p, delta);
            prop_assert!(vp.scale >= MIN_SCALE && vp.scale <= MAX_SCALE);
            let after_x = (p.x - vp.offset.x) / vp.scale;
            let after_y = (p.y - vp.offset.y) / vp.scale;
            prop_assert!((after_x - content_x).abs() < 1e-6);
            prop_assert!((after_y - content_y).abs() < 1e-6);
        }

        #[test]
        fn reset_after_any_sequence(
            steps in proptest::collection::vec(
                (-500.0f64..500.0, -500.0f64..500.0, -2.0f64..2.0),
                0..20,
            )
        ) {
            let mut vp = Viewport::default();
            for (dx, dy, dz) in steps {
                vp.pan_by(dx, dy);
                vp.zoom_at(ScreenPoint::new(dx.abs(), dy.abs()), dz);
            }
            vp.reset();
            prop_assert_eq!(vp.scale, 1.0);
            prop_assert_eq!(vp.offset, ScreenPoint::ORIGIN);
        }
    }
}
