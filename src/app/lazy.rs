// src/app/lazy.rs
// placeholder grid that materialises cards as they near the viewport
use std::ops::Range;

/// Fixed-footprint grid geometry in content coordinates (y grows downward
/// from the top of the scroll content).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    pub columns: usize,
    pub card_w: f32,
    pub card_h: f32,
    pub gap: f32,
}

impl GridLayout {
    pub fn fit(avail_w: f32, card_w: f32, card_h: f32, gap: f32) -> Self {
        let columns = ((avail_w + gap) / (card_w + gap).max(1.0)).floor().max(1.0) as usize;
        Self {
            columns,
            card_w,
            card_h,
            gap,
        }
    }

    fn stride_y(&self) -> f32 {
        (self.card_h + self.gap).max(1.0)
    }

    pub fn row_of(&self, position: usize) -> usize {
        position / self.columns.max(1)
    }

    /// Vertical extent of the card at `position`.
    pub fn span(&self, position: usize) -> (f32, f32) {
        let top = self.row_of(position) as f32 * self.stride_y();
        (top, top + self.card_h)
    }

    /// Offset of the card's left edge within its row.
    pub fn x_of(&self, position: usize) -> f32 {
        (position % self.columns.max(1)) as f32 * (self.card_w + self.gap)
    }

    pub fn content_height(&self, count: usize) -> f32 {
        if count == 0 {
            return 0.0;
        }
        let rows = count.div_ceil(self.columns.max(1));
        rows as f32 * self.stride_y() - self.gap
    }

    /// Positions whose rows overlap `[top, bottom]`.
    pub fn positions_between(&self, top: f32, bottom: f32, count: usize) -> Range<usize> {
        if count == 0 || bottom < 0.0 || bottom < top {
            return 0..0;
        }
        let stride = self.stride_y();
        let first_row = (top.max(0.0) / stride).floor() as usize;
        let last_row = (bottom / stride).floor() as usize;
        let cols = self.columns.max(1);
        let start = (first_row * cols).min(count);
        let end = ((last_row + 1) * cols).min(count);
        start..end
    }
}

/// Visible band of the scroll area, in content coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub top: f32,
    pub bottom: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Placeholder,
    Materialized,
}

/// Identifies work spawned by a materialised card. Only valid for the pass
/// that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub pass: u64,
    pub position: usize,
}

/// Filtered sets at or below the threshold skip placeholders entirely while a
/// query is active.
pub fn eager_for(has_query: bool, count: usize, threshold: usize) -> bool {
    has_query && count <= threshold
}

/// One render pass of placeholders. Rebuilt wholesale on every filter or
/// sort change; a slot never returns to `Placeholder` within a pass.
#[derive(Debug)]
pub struct LazyGrid {
    pass: u64,
    items: Vec<usize>,
    slots: Vec<Slot>,
    margin: f32,
}

impl LazyGrid {
    pub fn new(margin: f32) -> Self {
        Self {
            pass: 0,
            items: Vec::new(),
            slots: Vec::new(),
            margin: margin.max(0.0),
        }
    }

    pub const fn pass(&self) -> u64 {
        self.pass
    }

    pub const fn margin(&self) -> f32 {
        self.margin
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Catalog index shown at `position`.
    pub fn item(&self, position: usize) -> Option<usize> {
        self.items.get(position).copied()
    }

    pub fn items(&self) -> &[usize] {
        &self.items
    }

    pub fn slot(&self, position: usize) -> Option<Slot> {
        self.slots.get(position).copied()
    }

    pub fn is_materialized(&self, position: usize) -> bool {
        matches!(self.slot(position), Some(Slot::Materialized))
    }

    pub fn placeholder_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Placeholder))
            .count()
    }

    /// Drops every slot of the current pass; outstanding tickets go stale.
    pub fn teardown(&mut self) {
        self.pass = self.pass.wrapping_add(1);
        self.items.clear();
        self.slots.clear();
    }

    /// Tears down the previous pass, then lays out one slot per item.
    /// Returns tickets for cards materialised up front (eager passes).
    pub fn begin_pass(&mut self, items: Vec<usize>, eager: bool) -> Vec<Ticket> {
        self.teardown();
        let fill = if eager {
            Slot::Materialized
        } else {
            Slot::Placeholder
        };
        self.slots = vec![fill; items.len()];
        self.items = items;
        if eager {
            (0..self.items.len())
                .map(|position| Ticket {
                    pass: self.pass,
                    position,
                })
                .collect()
        } else {
            Vec::new()
        }
    }

    /// Materialises placeholders inside the viewport grown by the look-ahead
    /// margin. Each position is reported at most once per pass.
    pub fn observe(&mut self, layout: &GridLayout, viewport: Viewport) -> Vec<Ticket> {
        let zone_top = viewport.top - self.margin;
        let zone_bottom = viewport.bottom + self.margin;
        let mut fresh = Vec::new();
        for position in layout.positions_between(zone_top, zone_bottom, self.slots.len()) {
            if self.slots[position] != Slot::Placeholder {
                continue;
            }
            let (top, bottom) = layout.span(position);
            if bottom >= zone_top && top <= zone_bottom {
                self.slots[position] = Slot::Materialized;
                fresh.push(Ticket {
                    pass: self.pass,
                    position,
                });
            }
        }
        fresh
    }

    /// False for tickets from a torn-down pass.
    pub fn accepts(&self, ticket: Ticket) -> bool {
        ticket.pass == self.pass && self.is_materialized(ticket.position)
    }
}
