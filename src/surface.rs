use emath::{Rect, Vec2};

use crate::Handles;

/// The display side of the widget. The engine computes geometry; an
/// implementation of this trait owns whatever is actually on screen and is
/// free to ignore hooks it has no use for.
///
/// Pointer input is not part of the trait: hosts translate their native
/// events into surface-relative screen coordinates and feed them to
/// [`CropSession`](crate::CropSession) directly, so the engine never branches
/// on the event model of the environment it runs in.
pub trait Surface {
    /// Screen-space size of the surface: the natural size times the current
    /// zoom.
    fn bounds(&self) -> Vec2;

    /// Size of the unscaled image.
    fn natural_size(&self) -> Vec2;

    /// Which resize grips the surface exposes. [`Handles::for_constraints`]
    /// is the standard derivation; the session reads this once at
    /// construction.
    fn handles(&self) -> Handles;

    /// Draw or update the selection region, in screen units.
    fn render_selection(&mut self, screen_rect: Rect);

    /// Take a cleared selection off the display.
    fn remove_selection(&mut self);

    /// Position the resize grips for the given selection, in screen units.
    fn render_handles(&mut self, screen_rect: Rect);

    /// The surface has been rescaled to a new on-screen size.
    fn apply_zoom(&mut self, screen_size: Vec2);
}

/// Surface double that records every hook call.
#[cfg(test)]
pub(crate) struct RecordingSurface {
    natural: Vec2,
    handles: Handles,
    pub screen_size: Vec2,
    pub selection: Option<Rect>,
    pub handles_at: Option<Rect>,
    pub removals: usize,
}

#[cfg(test)]
impl RecordingSurface {
    pub fn new(natural: Vec2, handles: Handles) -> Self {
        Self {
            natural,
            handles,
            screen_size: natural,
            selection: None,
            handles_at: None,
            removals: 0,
        }
    }
}

#[cfg(test)]
impl Surface for RecordingSurface {
    fn bounds(&self) -> Vec2 {
        self.screen_size
    }

    fn natural_size(&self) -> Vec2 {
        self.natural
    }

    fn handles(&self) -> Handles {
        self.handles
    }

    fn render_selection(&mut self, screen_rect: Rect) {
        self.selection = Some(screen_rect);
    }

    fn remove_selection(&mut self) {
        self.selection = None;
        self.handles_at = None;
        self.removals += 1;
    }

    fn render_handles(&mut self, screen_rect: Rect) {
        self.handles_at = Some(screen_rect);
    }

    fn apply_zoom(&mut self, screen_size: Vec2) {
        self.screen_size = screen_size;
    }
}
