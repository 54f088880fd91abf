//! One drag model for both pointer styles.
//!
//! A *tracked* drag (touch, or a terminal mouse that reports motion) follows
//! the pointer continuously: the dragged unit is drawn at an offset from its
//! container and the drop slot is found by a spatial search over the
//! rendered unit rectangles. A *direct* drag (classic drag and drop, or the
//! keyboard) is told which index it was dropped on and needs no search.
//!
//! Both styles end in the same [`MoveRequest`], which the session applies
//! with [`crate::engine::reorder::move_item`].

use tracing::{debug, warn};

use crate::error::GestureError;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn minus(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Half-open on the bottom edge so stacked rows never overlap.
    pub fn spans_y(&self, y: f32) -> bool {
        y >= self.y && y < self.bottom()
    }

    pub fn contains(&self, p: Point) -> bool {
        self.spans_y(p.y) && p.x >= self.x && p.x < self.right()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragStyle {
    Tracked,
    Direct,
}

/// Ask the reorder engine to move `from` to `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveRequest {
    pub from: usize,
    pub to: usize,
}

/// Where a drop would land right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropSlot {
    At(usize),
    /// Past the last unit.
    Append,
}

impl DropSlot {
    /// Index to hand to `move_item` for a sequence of `len` units. Appending
    /// inserts at `len - 1`, which after the removal is the last slot.
    pub fn target_index(self, len: usize) -> Option<usize> {
        match self {
            DropSlot::At(idx) if idx < len => Some(idx),
            DropSlot::At(_) => None,
            DropSlot::Append => len.checked_sub(1),
        }
    }
}

/// Finds the drop slot for `pointer` among the rendered `bounds`.
///
/// Only units whose vertical span holds the pointer are candidates; among
/// those the one with the nearest horizontal center wins (lowest index on a
/// tie). With no vertical match, a pointer right of the last unit appends.
pub fn drop_slot(bounds: &[Rect], pointer: Point) -> Option<DropSlot> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, rect) in bounds.iter().enumerate() {
        if !rect.spans_y(pointer.y) {
            continue;
        }
        let dist = (rect.center_x() - pointer.x).abs();
        if best.is_none_or(|(_, d)| dist < d) {
            best = Some((idx, dist));
        }
    }
    if let Some((idx, _)) = best {
        return Some(DropSlot::At(idx));
    }
    match bounds.last() {
        Some(last) if pointer.x > last.right() => Some(DropSlot::Append),
        _ => None,
    }
}

/// Live state of the one drag in progress.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureState {
    pub style: DragStyle,
    pub source_index: usize,
    /// Pointer position inside the grabbed unit.
    pub grab_offset: Point,
    /// Unit origin relative to its container when the drag began.
    pub start_origin: Point,
    pub container_origin: Point,
    pub last_pointer: Point,
    pub slot: Option<DropSlot>,
}

/// What the presentation layer needs to draw mid-drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragFeedback {
    /// Where to draw the floating unit, relative to the container. Only
    /// tracked drags have one.
    pub visual_offset: Option<Point>,
    pub slot: Option<DropSlot>,
}

#[derive(Debug, Default)]
pub struct PointerTracker {
    gesture: Option<GestureState>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn gesture(&self) -> Option<&GestureState> {
        self.gesture.as_ref()
    }

    /// Starts a drag of the unit at `index` (of `len` units), pressed at
    /// `pointer` while it occupies `element` inside a container whose
    /// top-left is `container_origin`.
    pub fn begin(
        &mut self,
        style: DragStyle,
        index: usize,
        len: usize,
        pointer: Point,
        element: Rect,
        container_origin: Point,
    ) -> Result<(), GestureError> {
        if self.gesture.is_some() {
            warn!(index, "drag begin ignored, another drag is active");
            return Err(GestureError::AlreadyActive);
        }
        if index >= len {
            warn!(index, len, "drag begin ignored, index out of range");
            return Err(GestureError::IndexOutOfRange { index, len });
        }
        debug!(index, ?style, "drag begin");
        self.gesture = Some(GestureState {
            style,
            source_index: index,
            grab_offset: pointer.minus(element.origin()),
            start_origin: element.origin().minus(container_origin),
            container_origin,
            last_pointer: pointer,
            slot: Some(DropSlot::At(index)),
        });
        Ok(())
    }

    /// Follows the pointer. `bounds` are the unit rectangles as currently
    /// rendered.
    pub fn update(&mut self, pointer: Point, bounds: &[Rect]) -> Result<DragFeedback, GestureError> {
        let gesture = self.gesture.as_mut().ok_or(GestureError::NotActive)?;
        gesture.last_pointer = pointer;
        gesture.slot = drop_slot(bounds, pointer);
        let visual_offset = match gesture.style {
            DragStyle::Tracked => Some(
                pointer
                    .minus(gesture.container_origin)
                    .minus(gesture.grab_offset),
            ),
            DragStyle::Direct => None,
        };
        Ok(DragFeedback {
            visual_offset,
            slot: gesture.slot,
        })
    }

    /// Marks the unit under the pointer as the drop slot; the direct-style
    /// counterpart of [`PointerTracker::update`].
    pub fn hover(&mut self, index: usize) -> Result<(), GestureError> {
        let gesture = self.gesture.as_mut().ok_or(GestureError::NotActive)?;
        gesture.slot = Some(DropSlot::At(index));
        Ok(())
    }

    /// Releases at `pointer`, resolving the slot the same way `update` does.
    /// The gesture is cleared whatever the outcome.
    pub fn end(&mut self, pointer: Point, bounds: &[Rect]) -> Result<Option<MoveRequest>, GestureError> {
        let gesture = self.gesture.take().ok_or(GestureError::NotActive)?;
        let slot = drop_slot(bounds, pointer);
        Ok(finish(&gesture, slot, bounds.len()))
    }

    /// Releases onto the unit at `target`, as reported by the event source.
    pub fn drop_on(&mut self, target: usize, len: usize) -> Result<Option<MoveRequest>, GestureError> {
        let gesture = self.gesture.take().ok_or(GestureError::NotActive)?;
        Ok(finish(&gesture, Some(DropSlot::At(target)), len))
    }

    /// Releases at the last known position.
    pub fn end_at_last(&mut self, bounds: &[Rect]) -> Result<Option<MoveRequest>, GestureError> {
        let pointer = self
            .gesture
            .as_ref()
            .map(|g| g.last_pointer)
            .ok_or(GestureError::NotActive)?;
        self.end(pointer, bounds)
    }

    /// Drops the gesture without moving anything. Returns whether one was
    /// active.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.gesture.take().is_some();
        if was_active {
            debug!("drag cancelled");
        }
        was_active
    }
}

fn finish(gesture: &GestureState, slot: Option<DropSlot>, len: usize) -> Option<MoveRequest> {
    let from = gesture.source_index;
    let to = slot.and_then(|s| s.target_index(len))?;
    if from >= len || from == to {
        debug!(from, to, "drag ended without a move");
        return None;
    }
    debug!(from, to, "drag ended");
    Some(MoveRequest { from, to })
}
