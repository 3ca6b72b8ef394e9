use emath::{pos2, Pos2, Rect};
use log::{debug, trace};

use crate::{solver, to_screen, Constraints, Handle, Handles, ZoomState};

/// Everything one widget instance owns: the committed selection, the zoom,
/// and the gesture in flight. Mutated only through the handlers below; the
/// session decides what to render and broadcast from the returned [`Outcome`].
pub(crate) struct SessionState {
    pub constraints: Constraints,
    pub handles: Handles,
    pub zoom: ZoomState,
    pub selection: Option<Rect>,
    mode: Mode,
    /// Cleared after a fixed-extent selection is committed: such a selection
    /// is placed once and then only moved or resized on its free axis.
    /// Clearing the selection arms creation again.
    allow_recrop: bool,
}

enum Mode {
    Idle,
    Creating {
        anchor: Pos2,
        prev: Rect,
    },
    Moving {
        press: Pos2,
        origin: Rect,
    },
    Resizing {
        handle: Handle,
        press: Pos2,
        origin: Rect,
        prev: Rect,
    },
}

/// What a handler did with the selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Outcome {
    Unchanged,
    /// Live update mid-gesture, natural units.
    Changing(Rect),
    /// A gesture or command finished; `None` after a clear.
    Committed(Option<Rect>),
}

impl SessionState {
    pub fn new(constraints: Constraints, handles: Handles, zoom: ZoomState) -> Self {
        Self {
            constraints,
            handles,
            zoom,
            selection: None,
            mode: Mode::Idle,
            allow_recrop: true,
        }
    }

    pub fn gesture_active(&self) -> bool {
        !matches!(self.mode, Mode::Idle)
    }

    /// Clamp a screen-space point onto the surface and convert it to natural
    /// units. Pointer positions outside the surface are never extrapolated.
    fn to_natural_point(&self, screen: Pos2) -> Pos2 {
        let size = self.zoom.screen_size();
        let clamped = pos2(screen.x.clamp(0.0, size.x), screen.y.clamp(0.0, size.y));
        (clamped.to_vec2() / self.zoom.current()).to_pos2()
    }

    pub fn pointer_down(&mut self, screen: Pos2) -> Outcome {
        if self.gesture_active() {
            // one gesture at a time
            return Outcome::Unchanged;
        }
        let point = self.to_natural_point(screen);
        if let Some(rect) = self.selection {
            let screen_rect = to_screen(rect, self.zoom.current());
            if let Some(handle) = self.handles.hit(screen, screen_rect) {
                debug!("resize gesture on {handle:?} from {rect:?}");
                self.mode = Mode::Resizing { handle, press: point, origin: rect, prev: rect };
                return Outcome::Unchanged;
            }
            if screen_rect.contains(screen) {
                debug!("move gesture from {rect:?}");
                self.mode = Mode::Moving { press: point, origin: rect };
                return Outcome::Unchanged;
            }
        }
        if !self.allow_recrop {
            return Outcome::Unchanged;
        }
        let seed = solver::create_seed(point, &self.constraints, self.zoom.natural());
        debug!("create gesture at {point:?}");
        self.mode = Mode::Creating { anchor: point, prev: seed };
        self.selection = Some(seed);
        Outcome::Changing(seed)
    }

    pub fn pointer_move(&mut self, screen: Pos2) -> Outcome {
        let point = self.to_natural_point(screen);
        let bounds = self.zoom.natural();
        let next = match &mut self.mode {
            Mode::Idle => return Outcome::Unchanged,
            Mode::Creating { anchor, prev } => {
                let next = solver::propose_create(*anchor, point, *prev, &self.constraints, bounds);
                *prev = next;
                next
            }
            Mode::Moving { press, origin } => solver::propose_move(*origin, point - *press, bounds),
            Mode::Resizing { handle, press, origin, prev } => {
                let next = solver::propose_resize(
                    *origin,
                    *handle,
                    point - *press,
                    *prev,
                    &self.constraints,
                    bounds,
                );
                *prev = next;
                next
            }
        };
        trace!("gesture update: {next:?}");
        self.selection = Some(next);
        Outcome::Changing(next)
    }

    pub fn pointer_up(&mut self) -> Outcome {
        if !self.gesture_active() {
            return Outcome::Unchanged;
        }
        debug!("gesture committed: {:?}", self.selection);
        self.commit(self.selection)
    }

    /// Leaving the surface mid-gesture keeps the gesture alive; the next
    /// clamped move continues it and only a release commits. Outside a
    /// gesture there is no tracking state to drop.
    pub fn pointer_leave(&mut self) -> Outcome {
        Outcome::Unchanged
    }

    pub fn set_selection(&mut self, x: f32, y: f32, width: f32, height: f32) -> Outcome {
        let rect = solver::clamp_manual_rect(x, y, width, height, self.zoom.natural());
        debug!("selection set to {rect:?}");
        self.commit(Some(rect))
    }

    pub fn select_all(&mut self) -> Outcome {
        let rect = Rect::from_min_size(Pos2::ZERO, self.zoom.natural());
        debug!("selecting everything");
        self.commit(Some(rect))
    }

    pub fn clear(&mut self) -> Outcome {
        debug!("selection cleared");
        self.commit(None)
    }

    /// Multiply the zoom; the natural-unit selection is invariant. Returns
    /// the new zoom, or `None` if the factor was ignored.
    pub fn zoom_by(&mut self, factor: f32) -> Option<f32> {
        self.zoom.zoom_by(factor).then(|| self.zoom.current())
    }

    fn commit(&mut self, rect: Option<Rect>) -> Outcome {
        self.mode = Mode::Idle;
        self.selection = rect;
        self.allow_recrop = rect.is_none() || !self.constraints.has_fixed_extent();
        Outcome::Committed(rect)
    }
}
