//! Screen geometry shared by the renderer and the mouse handler.
//!
//! Both sides compute the same rectangles from the same `App` state, so a
//! click lands on exactly the card or column that was drawn there.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::application::{App, BoardLayout, COLUMN_WIDTH, SIDEBAR_WIDTH};
use crate::domain::{Stage, StepDirection};

/// Rows taken by one card: three lines of text and a gap.
pub const CARD_HEIGHT: u16 = 4;
/// Text lines inside a card.
pub const CARD_LINES: u16 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnGeometry {
    pub stage: Stage,
    /// Whole column including its border
    pub area: Rect,
    /// Line showing the number of applications
    pub summary: Rect,
    /// Region cards are drawn into
    pub cards: Rect,
    /// Index of the first card drawn
    pub first_card: usize,
    /// Line with the back/forward step controls, compact layout only
    pub stepper: Option<Rect>,
}

impl ColumnGeometry {
    /// Number of cards that fit in the column at once.
    pub fn capacity(&self) -> usize {
        ((self.cards.height / CARD_HEIGHT) as usize).max(1)
    }

    /// Screen area of the card at `index`, if it is currently drawn.
    pub fn card_rect(&self, index: usize) -> Option<Rect> {
        if index < self.first_card || index >= self.first_card + self.capacity() {
            return None;
        }
        let offset = (index - self.first_card) as u16 * CARD_HEIGHT;
        if offset >= self.cards.height {
            return None;
        }
        let height = CARD_LINES.min(self.cards.height - offset);
        Some(Rect::new(self.cards.x, self.cards.y + offset, self.cards.width, height))
    }

    /// Index of the card slot under the given screen position.
    ///
    /// The slot may be empty; callers check it against the column's cards.
    pub fn card_at(&self, x: u16, y: u16) -> Option<usize> {
        if !contains(self.cards, x, y) {
            return None;
        }
        let slot = ((y - self.cards.y) / CARD_HEIGHT) as usize;
        (slot < self.capacity()).then_some(self.first_card + slot)
    }

    /// Back and forward halves of the stepper line.
    pub fn stepper_controls(&self) -> Option<(Rect, Rect)> {
        let stepper = self.stepper?;
        let half = stepper.width / 2;
        let back = Rect::new(stepper.x, stepper.y, half, stepper.height);
        let forward = Rect::new(stepper.x + half, stepper.y, stepper.width - half, stepper.height);
        Some((back, forward))
    }

    /// Step direction of the stepper control under the given screen position.
    pub fn step_at(&self, x: u16, y: u16) -> Option<StepDirection> {
        let (back, forward) = self.stepper_controls()?;
        if contains(back, x, y) {
            Some(StepDirection::Back)
        } else if contains(forward, x, y) {
            Some(StepDirection::Forward)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenGeometry {
    pub header: Rect,
    pub sidebar: Option<Rect>,
    pub board: Rect,
    pub status: Rect,
    /// Visible stage columns, left to right; empty while the board has no applications
    pub columns: Vec<ColumnGeometry>,
}

impl ScreenGeometry {
    pub fn column_at(&self, x: u16, y: u16) -> Option<&ColumnGeometry> {
        self.columns.iter().find(|column| contains(column.area, x, y))
    }
}

pub fn screen_geometry(app: &App, area: Rect) -> ScreenGeometry {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);
    let (header, body, status) = (chunks[0], chunks[1], chunks[2]);

    let layout = app.layout();
    let (sidebar, board) = match layout {
        BoardLayout::Wide => {
            let parts = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
                .split(body);
            (Some(parts[0]), parts[1])
        }
        BoardLayout::Compact => (None, body),
    };

    let columns = if app.store.is_empty() {
        Vec::new()
    } else {
        column_geometries(app, board, layout)
    };

    ScreenGeometry {
        header,
        sidebar,
        board,
        status,
        columns,
    }
}

fn column_geometries(app: &App, board: Rect, layout: BoardLayout) -> Vec<ColumnGeometry> {
    let visible = app.visible_stages();
    let mut columns = Vec::with_capacity(visible);

    for slot in 0..visible {
        let Some(stage) = Stage::from_ordinal(app.scroll_stage + slot) else {
            break;
        };
        let area = match layout {
            BoardLayout::Compact => board,
            BoardLayout::Wide => {
                let x = board.x + slot as u16 * COLUMN_WIDTH;
                if x >= board.right() {
                    break;
                }
                Rect::new(x, board.y, COLUMN_WIDTH.min(board.right() - x), board.height)
            }
        };

        let inner = Rect::new(
            area.x.saturating_add(1),
            area.y.saturating_add(1),
            area.width.saturating_sub(2),
            area.height.saturating_sub(2),
        );
        let summary = Rect::new(inner.x, inner.y, inner.width, inner.height.min(1));
        let stepper_height = u16::from(layout == BoardLayout::Compact);
        let cards_height = inner.height.saturating_sub(2 + stepper_height);
        let cards = Rect::new(inner.x, inner.y.saturating_add(2), inner.width, cards_height);
        let stepper = (layout == BoardLayout::Compact && inner.height > 0).then(|| {
            Rect::new(inner.x, inner.bottom() - 1, inner.width, 1)
        });

        let mut column = ColumnGeometry {
            stage,
            area,
            summary,
            cards,
            first_card: 0,
            stepper,
        };
        if stage.ordinal() == app.selected_stage {
            let capacity = column.capacity();
            column.first_card = (app.selected_card + 1).saturating_sub(capacity);
        }
        columns.push(column);
    }

    columns
}

fn contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.right() && y >= rect.y && y < rect.bottom()
}
