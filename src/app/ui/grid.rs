// src/app/ui/grid.rs
use eframe::egui::{self as eg, TextureHandle};

use crate::app::cards::CardText;
use crate::app::lazy::{GridLayout, LazyGrid, Slot, Ticket, Viewport};
use crate::app::prefetch::ArtworkBook;
use crate::app::types::PosterState;

pub const GAP: f32 = 10.0;
/// Past this offset the catalog pages offer a jump back to the top.
pub const SCROLL_TOP_AFTER: f32 = 500.0;

/// How the grid turns an item (an index into the catalog or a child list)
/// into paintable content.
pub struct CardSource<'a> {
    pub text: &'a dyn Fn(usize) -> Option<CardText>,
    pub image: &'a dyn Fn(usize) -> Option<String>,
}

pub struct GridOpts {
    pub id_salt: &'static str,
    pub card_h: f32,
    pub scrolling: bool,
    pub scroll_to_top: bool,
}

#[derive(Default)]
pub struct GridOutput {
    /// Item (not position) of the card clicked this frame.
    pub clicked: Option<usize>,
    /// Screen rects of the cards painted this frame.
    pub card_rects: Vec<eg::Rect>,
    /// Cards materialised this frame; their artwork still has to be requested.
    pub new_tickets: Vec<Ticket>,
    pub offset_y: f32,
}

fn paint_placeholder(p: &eg::Painter, rect: eg::Rect) {
    p.rect_filled(rect, 6.0, eg::Color32::from_gray(32));
}

/// Poster fills the card; the text sits on a dark band over its lower half.
pub fn paint_card(
    p: &eg::Painter,
    rect: eg::Rect,
    text: &CardText,
    tex: Option<&TextureHandle>,
    waiting: bool,
) {
    match tex {
        Some(tex) => {
            p.image(
                tex.id(),
                rect,
                eg::Rect::from_min_max(eg::pos2(0.0, 0.0), eg::pos2(1.0, 1.0)),
                eg::Color32::WHITE,
            );
        }
        None => {
            p.rect_filled(rect, 6.0, eg::Color32::from_gray(40));
            if !waiting {
                p.text(
                    rect.center_top() + eg::vec2(0.0, rect.height() * 0.25),
                    eg::Align2::CENTER_CENTER,
                    "No artwork",
                    eg::FontId::proportional(12.0),
                    eg::Color32::from_gray(120),
                );
            }
        }
    }

    let band = eg::Rect::from_min_max(eg::pos2(rect.left(), rect.center().y), rect.max);
    p.rect_filled(band, 0.0, eg::Color32::from_black_alpha(170));

    let pad = 6.0;
    let mut y = band.top() + pad;
    let fg = eg::Color32::WHITE;
    let dim = eg::Color32::from_gray(190);

    if !text.year.is_empty() {
        p.text(
            eg::pos2(band.left() + pad, y),
            eg::Align2::LEFT_TOP,
            &text.year,
            eg::FontId::monospace(11.0),
            dim,
        );
        y += 14.0;
    }
    let title = p.layout(
        text.title.clone(),
        eg::FontId::proportional(13.0),
        fg,
        band.width() - 2.0 * pad,
    );
    let title_h = title.size().y.min(34.0);
    p.with_clip_rect(band).galley(eg::pos2(band.left() + pad, y), title, fg);
    y += title_h + 2.0;

    for d in &text.details {
        if y + 12.0 > band.bottom() {
            break;
        }
        let line = match d.label {
            Some(label) => format!("{label}: {}", d.value),
            None => d.value.clone(),
        };
        p.with_clip_rect(band).text(
            eg::pos2(band.left() + pad, y),
            eg::Align2::LEFT_TOP,
            line,
            eg::FontId::proportional(10.5),
            dim,
        );
        y += 12.5;
    }

    p.rect_stroke(rect, 6.0, eg::Stroke::new(1.0, eg::Color32::from_gray(70)));
}

/// Scroll area over a lazy grid: paints only visible rows, materialises
/// placeholders near the viewport and uploads artwork within the frame budget.
pub fn show_lazy_grid(
    ui: &mut eg::Ui,
    grid: &mut LazyGrid,
    source: &CardSource<'_>,
    art: &mut ArtworkBook,
    uploads_left: &mut usize,
    opts: GridOpts,
) -> GridOutput {
    let ctx = ui.ctx().clone();
    let card_w = opts.card_h / 1.5;
    let mut out = GridOutput::default();

    let mut area = eg::ScrollArea::vertical()
        .id_source(opts.id_salt)
        .auto_shrink([false; 2])
        .enable_scrolling(opts.scrolling);
    if opts.scroll_to_top {
        area = area.vertical_scroll_offset(0.0);
    }

    let scroll = area.show_viewport(ui, |ui, viewport| {
        let layout = GridLayout::fit(ui.available_width(), card_w, opts.card_h, GAP);
        ui.set_height(layout.content_height(grid.len()));
        let origin = ui.min_rect().min;

        out.new_tickets = grid.observe(
            &layout,
            Viewport {
                top: viewport.min.y,
                bottom: viewport.max.y,
            },
        );

        for pos in layout.positions_between(viewport.min.y, viewport.max.y, grid.len()) {
            let (top, _) = layout.span(pos);
            let rect = eg::Rect::from_min_size(
                origin + eg::vec2(layout.x_of(pos), top),
                eg::vec2(card_w, opts.card_h),
            );
            let Some(item) = grid.item(pos) else {
                continue;
            };

            if grid.slot(pos) != Some(Slot::Materialized) {
                paint_placeholder(ui.painter(), rect);
                continue;
            }
            let Some(text) = (source.text)(item) else {
                paint_placeholder(ui.painter(), rect);
                continue;
            };

            let src = (source.image)(item);
            let tex = src
                .as_deref()
                .and_then(|s| art.texture(&ctx, s, uploads_left));
            let waiting = src.as_deref().is_some_and(|s| {
                matches!(
                    art.state(s),
                    Some(PosterState::Pending | PosterState::Cached) | None
                )
            });
            paint_card(ui.painter(), rect, &text, tex.as_ref(), waiting);

            let id = ui.id().with((opts.id_salt, grid.pass(), pos));
            let resp = ui.interact(rect, id, eg::Sense::click());
            if resp.hovered() {
                ui.painter().rect_stroke(
                    rect.shrink(1.0),
                    6.0,
                    eg::Stroke::new(2.0, ui.visuals().selection.stroke.color),
                );
            }
            if resp.clicked() {
                out.clicked = Some(item);
            }
            out.card_rects.push(rect);
        }
    });

    out.offset_y = scroll.state.offset.y;
    out
}
