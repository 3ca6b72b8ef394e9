use emath::{Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Scale factor between natural image pixels and what is on screen.
///
/// The committed selection always lives in natural units, so changing the
/// zoom never touches it; only the rendered size does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomState {
    natural: Vec2,
    current: f32,
}

impl ZoomState {
    pub fn new(natural: Vec2) -> Self {
        Self { natural, current: 1.0 }
    }

    pub fn natural(&self) -> Vec2 {
        self.natural
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    /// On-screen size of the surface at the current zoom.
    pub fn screen_size(&self) -> Vec2 {
        self.natural * self.current
    }

    /// Multiply the current zoom. Non-positive or non-finite factors are
    /// ignored; returns whether the zoom changed.
    pub fn zoom_by(&mut self, factor: f32) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            log::warn!("ignoring zoom factor {factor}");
            return false;
        }
        self.current *= factor;
        true
    }
}

/// Scale a natural-unit rect to screen units.
pub fn to_screen(rect: Rect, zoom: f32) -> Rect {
    Rect::from_min_size((rect.min.to_vec2() * zoom).to_pos2(), rect.size() * zoom)
}

/// Scale a screen-unit rect back to natural units.
pub fn to_natural(rect: Rect, zoom: f32) -> Rect {
    Rect::from_min_size((rect.min.to_vec2() / zoom).to_pos2(), rect.size() / zoom)
}

/// How the initial zoom relates the image to the space it is shown in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum ScaleMode {
    /// Show the image at its natural size.
    #[default]
    None,
    /// Shrink an image that overflows the given container; never enlarge.
    ScaleDown(Vec2),
    /// Scale the image to exactly fit the given container.
    Fit(Vec2),
}

/// The zoom a session starts at under the given mode.
pub fn fit_scale(natural: Vec2, mode: ScaleMode) -> f32 {
    let fit = |container: Vec2| (container.x / natural.x).min(container.y / natural.y);
    match mode {
        ScaleMode::None => 1.0,
        ScaleMode::ScaleDown(container) => fit(container).min(1.0),
        ScaleMode::Fit(container) => fit(container),
    }
}

#[cfg(test)]
mod tests {
    use emath::{pos2, vec2};

    use super::*;

    fn rect(left: f32, top: f32, width: f32, height: f32) -> Rect {
        Rect::from_min_size(pos2(left, top), vec2(width, height))
    }

    #[test]
    fn screen_rect_scales_with_zoom() {
        assert_eq!(to_screen(rect(10.0, 10.0, 50.0, 50.0), 0.5), rect(5.0, 5.0, 25.0, 25.0));
        assert_eq!(to_screen(rect(10.0, 10.0, 50.0, 50.0), 2.0), rect(20.0, 20.0, 100.0, 100.0));
    }

    #[test]
    fn round_trips_within_tolerance() {
        for zoom in [0.05, 0.3, 1.0, 1.7, 8.0] {
            for r in [rect(0.0, 0.0, 1.0, 1.0), rect(13.0, 7.5, 311.0, 190.25)] {
                let back = to_natural(to_screen(r, zoom), zoom);
                assert!((back.min - r.min).length() <= 1e-3, "zoom {zoom}");
                assert!((back.size() - r.size()).length() <= 1e-3, "zoom {zoom}");
            }
        }
    }

    #[test]
    fn invalid_factors_leave_the_zoom_alone() {
        let mut zoom = ZoomState::new(vec2(300.0, 200.0));
        assert!(!zoom.zoom_by(0.0));
        assert!(!zoom.zoom_by(-1.5));
        assert!(!zoom.zoom_by(f32::NAN));
        assert_eq!(zoom.current(), 1.0);
        assert!(zoom.zoom_by(0.5));
        assert_eq!(zoom.current(), 0.5);
        assert_eq!(zoom.screen_size(), vec2(150.0, 100.0));
    }

    #[test]
    fn fit_scale_modes() {
        let natural = vec2(800.0, 600.0);
        assert_eq!(fit_scale(natural, ScaleMode::None), 1.0);
        // overflowing image shrinks either way
        assert_eq!(fit_scale(natural, ScaleMode::ScaleDown(vec2(400.0, 600.0))), 0.5);
        assert_eq!(fit_scale(natural, ScaleMode::Fit(vec2(400.0, 600.0))), 0.5);
        // a small image only grows under Fit
        assert_eq!(fit_scale(natural, ScaleMode::ScaleDown(vec2(1600.0, 1800.0))), 1.0);
        assert_eq!(fit_scale(natural, ScaleMode::Fit(vec2(1600.0, 1800.0))), 2.0);
    }
}
