//! Box selection and click-to-move, independent of any input device.
//!
//! A front end forwards pointer presses, moves and releases here. A left drag
//! selects the units inside the rectangle (shift keeps the existing
//! selection). Releasing with something selected arms a move, and the next
//! left press sends the selection there. A right press cancels everything.

use rand::RngCore;

use crate::battle::Battle;
use crate::Vector2D;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Axis-aligned rectangle normalised from two drag corners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRect {
    pub min: Vector2D,
    pub max: Vector2D,
}

impl SelectionRect {
    pub fn from_corners(a: Vector2D, b: Vector2D) -> Self {
        Self {
            min: Vector2D::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vector2D::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Edges are inclusive; a rectangle with no area contains nothing
    pub fn contains(&self, point: Vector2D) -> bool {
        self.width() > 0.0
            && self.height() > 0.0
            && point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

/// Result of feeding one pointer event to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    Ignored,
    SelectionStarted,
    SelectionUpdated { selected: usize },
    SelectionFinished { selected: usize },
    SelectionCleared,
    Ordered { units: usize },
}

#[derive(Debug, Clone, Default)]
pub struct PointerController {
    drag_start: Option<Vector2D>,
    drag_current: Vector2D,
    awaiting_target: bool,
}

impl PointerController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_down<R: RngCore, const N: usize>(
        &mut self,
        battle: &mut Battle<R, N>,
        position: Vector2D,
        button: PointerButton,
        shift: bool,
    ) -> PointerOutcome {
        if button == PointerButton::Secondary {
            battle.clear_selection();
            self.awaiting_target = false;
            self.drag_start = None;
            return PointerOutcome::SelectionCleared;
        }

        if self.awaiting_target {
            self.awaiting_target = false;
            let units = battle.order_selected(position);
            return PointerOutcome::Ordered { units };
        }

        if !shift {
            battle.clear_selection();
        }
        self.drag_start = Some(position);
        self.drag_current = position;
        PointerOutcome::SelectionStarted
    }

    pub fn pointer_move<R: RngCore, const N: usize>(
        &mut self,
        battle: &mut Battle<R, N>,
        position: Vector2D,
        shift: bool,
    ) -> PointerOutcome {
        let Some(start) = self.drag_start else {
            return PointerOutcome::Ignored;
        };

        self.drag_current = position;
        let rect = SelectionRect::from_corners(start, position);
        let selected = battle.select_in_rect(&rect, shift);
        PointerOutcome::SelectionUpdated { selected }
    }

    pub fn pointer_up<R: RngCore, const N: usize>(
        &mut self,
        battle: &mut Battle<R, N>,
    ) -> PointerOutcome {
        let Some(start) = self.drag_start.take() else {
            return PointerOutcome::Ignored;
        };

        let rect = SelectionRect::from_corners(start, self.drag_current);
        let selected = battle.select_in_rect(&rect, true);
        self.awaiting_target = selected > 0;
        PointerOutcome::SelectionFinished { selected }
    }

    /// The rectangle being dragged, if any
    pub fn selection_rect(&self) -> Option<SelectionRect> {
        self.drag_start
            .map(|start| SelectionRect::from_corners(start, self.drag_current))
    }

    /// True once a selection is made and the next left press will order it
    pub fn awaiting_target(&self) -> bool {
        self.awaiting_target
    }
}
