use emath::{Pos2, Rect, Vec2};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    fit_scale, to_screen,
    gesture::{Outcome, SessionState},
    ConfigError, CropConfig, StartingSelection, Surface, ZoomState,
};

/// A selection as reported to the host: natural-unit coordinates plus the
/// zoom it was made at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub zoom: f32,
}

type ChangeListener = Box<dyn FnMut(&Selection)>;
type CommitListener = Box<dyn FnMut(Option<&Selection>)>;
type ZoomListener = Box<dyn FnMut(f32)>;

/// One crop widget instance: the interaction state machine plus the surface
/// it renders to and the listeners it reports to.
///
/// All methods run synchronously on the caller's thread; feeding events in
/// arrival order is the host's side of the contract.
pub struct CropSession<S: Surface> {
    surface: S,
    state: SessionState,
    on_change: Vec<ChangeListener>,
    on_commit: Vec<CommitListener>,
    on_zoom: Vec<ZoomListener>,
}

impl<S: Surface> CropSession<S> {
    /// Build a session over `surface`. Fails on conflicting constraints or a
    /// surface without a usable area.
    pub fn new(surface: S, config: CropConfig) -> Result<Self, CropError> {
        config.constraints.validate()?;
        let natural = surface.natural_size();
        let bounds = surface.bounds();
        if !natural.is_finite()
            || natural.x <= 0.0
            || natural.y <= 0.0
            || !bounds.is_finite()
            || bounds.x <= 0.0
            || bounds.y <= 0.0
        {
            return Err(CropError::MissingSurface { natural, bounds });
        }
        let handles = surface.handles();
        let mut session = Self {
            state: SessionState::new(config.constraints, handles, ZoomState::new(natural)),
            surface,
            on_change: Vec::new(),
            on_commit: Vec::new(),
            on_zoom: Vec::new(),
        };
        let scale = fit_scale(natural, config.scale_mode);
        if scale != 1.0 {
            session.zoom_by(scale);
        }
        match config.starting_selection {
            StartingSelection::None => {}
            StartingSelection::All => session.select_all(),
            StartingSelection::Rect(rect) => {
                session.set_selection(rect.left(), rect.top(), rect.width(), rect.height())
            }
        }
        Ok(session)
    }

    /// The committed selection, if any.
    pub fn selection(&self) -> Option<Selection> {
        self.state.selection.map(|rect| self.snapshot(rect))
    }

    pub fn zoom(&self) -> f32 {
        self.state.zoom.current()
    }

    pub fn gesture_active(&self) -> bool {
        self.state.gesture_active()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Fires on every accepted update during a gesture.
    pub fn on_change(&mut self, listener: impl FnMut(&Selection) + 'static) {
        self.on_change.push(Box::new(listener));
    }

    /// Fires once per finished gesture or explicit command; `None` after the
    /// selection was cleared.
    pub fn on_commit(&mut self, listener: impl FnMut(Option<&Selection>) + 'static) {
        self.on_commit.push(Box::new(listener));
    }

    /// Fires with the new zoom whenever it changes.
    pub fn on_zoom(&mut self, listener: impl FnMut(f32) + 'static) {
        self.on_zoom.push(Box::new(listener));
    }

    /// Pointer pressed, surface-relative screen units.
    pub fn pointer_down(&mut self, screen: Pos2) {
        let outcome = self.state.pointer_down(screen);
        self.dispatch(outcome);
    }

    /// Pointer moved, surface-relative screen units.
    pub fn pointer_move(&mut self, screen: Pos2) {
        let outcome = self.state.pointer_move(screen);
        self.dispatch(outcome);
    }

    /// Pointer released; commits whatever gesture is in flight.
    pub fn pointer_up(&mut self) {
        let outcome = self.state.pointer_up();
        self.dispatch(outcome);
    }

    /// Pointer left the surface. A gesture in flight stays alive until the
    /// release.
    pub fn pointer_leave(&mut self) {
        let outcome = self.state.pointer_leave();
        self.dispatch(outcome);
    }

    /// Replace the selection outright, natural units, clamped into the
    /// image. Gesture constraints do not apply to explicit commands.
    pub fn set_selection(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let outcome = self.state.set_selection(x, y, width, height);
        self.dispatch(outcome);
    }

    /// Select the entire image.
    pub fn select_all(&mut self) {
        let outcome = self.state.select_all();
        self.dispatch(outcome);
    }

    /// Drop the selection; commit listeners are told with `None`.
    pub fn clear_selection(&mut self) {
        let outcome = self.state.clear();
        self.dispatch(outcome);
    }

    /// Grow the zoom by `pct` percent.
    pub fn zoom_in(&mut self, pct: f32) {
        self.zoom_by(1.0 + pct / 100.0);
    }

    /// Shrink the zoom by `pct` percent.
    pub fn zoom_out(&mut self, pct: f32) {
        self.zoom_by(1.0 - pct / 100.0);
    }

    /// Multiply the zoom. The natural-unit selection is untouched; the
    /// surface is rescaled and a redrawn selection follows the new scale.
    pub fn zoom_by(&mut self, factor: f32) {
        let Some(zoom) = self.state.zoom_by(factor) else {
            return;
        };
        debug!("zoom now {zoom}");
        self.surface.apply_zoom(self.state.zoom.screen_size());
        if let Some(rect) = self.state.selection {
            let screen = to_screen(rect, zoom);
            self.surface.render_selection(screen);
            self.surface.render_handles(screen);
        }
        for listener in &mut self.on_zoom {
            listener(zoom);
        }
    }

    fn snapshot(&self, rect: Rect) -> Selection {
        Selection {
            x: rect.left(),
            y: rect.top(),
            width: rect.width(),
            height: rect.height(),
            zoom: self.state.zoom.current(),
        }
    }

    fn dispatch(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Unchanged => {}
            Outcome::Changing(rect) => {
                let screen = to_screen(rect, self.state.zoom.current());
                self.surface.render_selection(screen);
                self.surface.render_handles(screen);
                let snapshot = self.snapshot(rect);
                for listener in &mut self.on_change {
                    listener(&snapshot);
                }
            }
            Outcome::Committed(Some(rect)) => {
                let screen = to_screen(rect, self.state.zoom.current());
                self.surface.render_selection(screen);
                self.surface.render_handles(screen);
                let snapshot = self.snapshot(rect);
                for listener in &mut self.on_commit {
                    listener(Some(&snapshot));
                }
            }
            Outcome::Committed(None) => {
                self.surface.remove_selection();
                for listener in &mut self.on_commit {
                    listener(None);
                }
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CropError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error("surface reports no usable area (natural {natural:?}, bounds {bounds:?})")]
    MissingSurface { natural: Vec2, bounds: Vec2 },
}
