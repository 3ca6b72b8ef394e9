//! Pure rectangle arithmetic for the crop gestures.
//!
//! Every function here is stateless and works in natural units. Rejection is
//! never an error: a proposal that would leave the surface or break a
//! constraint returns the previous rectangle (or keeps the offending axis at
//! its previous value), so a drag past a limit simply stops following the
//! pointer until it comes back into range.

use emath::{pos2, vec2, Pos2, Rect, Vec2};

use crate::{Constraints, Handle};

/// One solved axis: leading edge plus extent.
#[derive(Debug, Clone, Copy)]
struct Span {
    pos: f32,
    len: f32,
}

impl Span {
    fn of_x(rect: Rect) -> Self {
        Span { pos: rect.left(), len: rect.width() }
    }

    fn of_y(rect: Rect) -> Self {
        Span { pos: rect.top(), len: rect.height() }
    }
}

fn rect_from_spans(x: Span, y: Span) -> Rect {
    Rect::from_min_size(pos2(x.pos, y.pos), vec2(x.len, y.len))
}

fn within(len: f32, min: Option<f32>, max: Option<f32>) -> bool {
    min.map_or(true, |m| len >= m) && max.map_or(true, |m| len <= m)
}

/// Grow a selection from a fixed anchor corner toward the pointer.
///
/// `prev` is the previous frame's rectangle; a fixed-ratio candidate that
/// would violate bounds or a min/max returns it unchanged. Without a ratio
/// each axis is solved independently and clamped instead of rejected.
pub fn propose_create(
    anchor: Pos2,
    pointer: Pos2,
    prev: Rect,
    constraints: &Constraints,
    bounds: Vec2,
) -> Rect {
    if let Some(ratio) = constraints.gesture_ratio() {
        return create_with_ratio(anchor, pointer, prev, ratio, constraints, bounds);
    }
    let x = create_axis(
        anchor.x,
        pointer.x,
        constraints.effective_fixed_width(),
        constraints.min_width,
        constraints.max_width,
        bounds.x,
    );
    let y = create_axis(
        anchor.y,
        pointer.y,
        constraints.effective_fixed_height(),
        constraints.min_height,
        constraints.max_height,
        bounds.y,
    );
    rect_from_spans(x, y)
}

fn create_axis(
    anchor: f32,
    pointer: f32,
    fixed: Option<f32>,
    min: Option<f32>,
    max: Option<f32>,
    bound: f32,
) -> Span {
    let len = match fixed {
        Some(fixed) => fixed.min(bound),
        None => {
            let mut len = (pointer - anchor).abs();
            if let Some(min) = min {
                len = len.max(min);
            }
            if let Some(max) = max {
                len = len.min(max);
            }
            len.min(bound)
        }
    };
    // Grow toward the pointer; a pinned axis always trails from the anchor.
    let pos = if fixed.is_none() && pointer < anchor {
        anchor - len
    } else {
        anchor
    };
    Span { pos: pos.clamp(0.0, bound - len), len }
}

fn create_with_ratio(
    anchor: Pos2,
    pointer: Pos2,
    prev: Rect,
    ratio: f32,
    constraints: &Constraints,
    bounds: Vec2,
) -> Rect {
    let delta = pointer - anchor;
    // The axis with the larger travel drives the other; ties go to X.
    let (w, h) = if delta.x.abs() >= delta.y.abs() {
        (delta.x.abs(), delta.x.abs() / ratio)
    } else {
        (delta.y.abs() * ratio, delta.y.abs())
    };
    let left = if delta.x < 0.0 { anchor.x - w } else { anchor.x };
    let top = if delta.y < 0.0 { anchor.y - h } else { anchor.y };
    let candidate = Rect::from_min_size(pos2(left, top), vec2(w, h));
    if candidate.left() >= 0.0
        && candidate.top() >= 0.0
        && candidate.right() <= bounds.x
        && candidate.bottom() <= bounds.y
        && within(w, constraints.min_width, constraints.max_width)
        && within(h, constraints.min_height, constraints.max_height)
    {
        candidate
    } else {
        prev
    }
}

/// The rectangle a creation gesture starts from, before the pointer moves:
/// zero-sized at the press point unless a min or fixed extent seeds it, in
/// which case the seed is pushed back inside the surface.
pub(crate) fn create_seed(anchor: Pos2, constraints: &Constraints, bounds: Vec2) -> Rect {
    if let Some(ratio) = constraints.gesture_ratio() {
        let w = constraints
            .min_width
            .unwrap_or(0.0)
            .max(constraints.min_height.unwrap_or(0.0) * ratio)
            .min(bounds.x);
        let h = w / ratio;
        let pos = pos2(
            anchor.x.clamp(0.0, bounds.x - w),
            anchor.y.clamp(0.0, (bounds.y - h).max(0.0)),
        );
        return Rect::from_min_size(pos, vec2(w, h));
    }
    propose_create(anchor, anchor, Rect::ZERO, constraints, bounds)
}

/// Resize `origin` (the rect at gesture start) by the pointer travel `delta`,
/// moving only the edges owned by `handle`. A per-axis violation keeps that
/// axis at `prev`, the previous frame's value.
pub fn propose_resize(
    origin: Rect,
    handle: Handle,
    delta: Vec2,
    prev: Rect,
    constraints: &Constraints,
    bounds: Vec2,
) -> Rect {
    if handle.is_corner() {
        if let Some(ratio) = constraints.gesture_ratio() {
            return resize_with_ratio(origin, handle, delta, prev, ratio, constraints, bounds);
        }
    }
    let x = if handle.moves_right() {
        resize_trailing(
            Span::of_x(origin),
            delta.x,
            constraints.min_width,
            constraints.max_width,
            bounds.x,
        )
    } else if handle.moves_left() {
        resize_leading(
            Span::of_x(origin),
            delta.x,
            constraints.min_width,
            constraints.max_width,
        )
    } else {
        None
    };
    let y = if handle.moves_bottom() {
        resize_trailing(
            Span::of_y(origin),
            delta.y,
            constraints.min_height,
            constraints.max_height,
            bounds.y,
        )
    } else if handle.moves_top() {
        resize_leading(
            Span::of_y(origin),
            delta.y,
            constraints.min_height,
            constraints.max_height,
        )
    } else {
        None
    };
    rect_from_spans(x.unwrap_or(Span::of_x(prev)), y.unwrap_or(Span::of_y(prev)))
}

/// Trailing edge follows the pointer, leading edge stays.
fn resize_trailing(
    span: Span,
    delta: f32,
    min: Option<f32>,
    max: Option<f32>,
    bound: f32,
) -> Option<Span> {
    let len = span.len + delta;
    (len >= 0.0 && span.pos + len <= bound && within(len, min, max))
        .then(|| Span { pos: span.pos, len })
}

/// Leading edge follows the pointer, trailing edge stays.
fn resize_leading(span: Span, delta: f32, min: Option<f32>, max: Option<f32>) -> Option<Span> {
    let pos = span.pos + delta;
    let len = span.len - delta;
    (pos >= 0.0 && len >= 0.0 && within(len, min, max)).then(|| Span { pos, len })
}

fn resize_with_ratio(
    origin: Rect,
    handle: Handle,
    delta: Vec2,
    prev: Rect,
    ratio: f32,
    constraints: &Constraints,
    bounds: Vec2,
) -> Rect {
    // The axis with the larger travel is primary; ties go to X.
    let (dw, dh) = if delta.x.abs() >= delta.y.abs() {
        let dw = if handle.moves_left() { -delta.x } else { delta.x };
        (dw, dw / ratio)
    } else {
        let dh = if handle.moves_top() { -delta.y } else { delta.y };
        (dh * ratio, dh)
    };
    let w = origin.width() + dw;
    let h = origin.height() + dh;
    let left = if handle.moves_left() { origin.right() - w } else { origin.left() };
    let top = if handle.moves_top() { origin.bottom() - h } else { origin.top() };

    // Off the surface or collapsed: freeze this frame entirely.
    if w < 0.0 || h < 0.0 || left < 0.0 || top < 0.0 || left + w > bounds.x || top + h > bounds.y {
        return prev;
    }

    // Growing a corner needs both deltas pulling the same way: outward or
    // inward. NW/SE agree on sign, NE/SW oppose.
    let agrees = if matches!(handle, Handle::NW | Handle::SE) {
        (delta.x > 0.0) == (delta.y > 0.0)
    } else {
        (delta.x > 0.0) != (delta.y > 0.0)
    };
    if !agrees
        || !within(w, constraints.min_width, constraints.max_width)
        || !within(h, constraints.min_height, constraints.max_height)
    {
        return rederive_ratio(prev, handle, ratio);
    }
    Rect::from_min_size(pos2(left, top), vec2(w, h))
}

/// Hold the previous frame but re-derive its width from its height, keeping
/// the corner opposite the grip fixed, so repeated rejections cannot let the
/// ratio drift.
fn rederive_ratio(prev: Rect, handle: Handle, ratio: f32) -> Rect {
    let w = prev.height() * ratio;
    let left = if handle.moves_left() { prev.right() - w } else { prev.left() };
    Rect::from_min_size(pos2(left, prev.top()), vec2(w, prev.height()))
}

/// Translate without resizing; the position is clamped so the rect stays on
/// the surface.
pub fn propose_move(origin: Rect, delta: Vec2, bounds: Vec2) -> Rect {
    let target = origin.min + delta;
    let pos = pos2(
        target.x.clamp(0.0, (bounds.x - origin.width()).max(0.0)),
        target.y.clamp(0.0, (bounds.y - origin.height()).max(0.0)),
    );
    Rect::from_min_size(pos, origin.size())
}

/// Clamp a host-supplied rectangle field-by-field into the image. No min,
/// max, or ratio enforcement: explicit commands override gesture constraints.
pub fn clamp_manual_rect(x: f32, y: f32, width: f32, height: f32, natural: Vec2) -> Rect {
    Rect::from_min_size(
        pos2(x.clamp(0.0, natural.x), y.clamp(0.0, natural.y)),
        vec2(width.clamp(0.0, natural.x), height.clamp(0.0, natural.y)),
    )
}
