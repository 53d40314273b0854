//! Feed card rendering.

use super::styles::CardStyles;
use super::viewport::Viewport;
use crate::model::{CardType, FeedItem, FeedItemKind};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use unicode_width::UnicodeWidthChar;

/// Glyph filling placeholder cards.
const PLACEHOLDER_GLYPH: &str = "░";

/// Widget drawing the visible slice of the feed.
///
/// Cards are drawn at their laid-out position, shifted by the viewport's
/// scroll offset. Cards outside the viewport are skipped.
pub struct FeedView<'a> {
    items: &'a [FeedItem],
    viewport: &'a Viewport,
    styles: &'a CardStyles,
    selected: Option<usize>,
}

impl<'a> FeedView<'a> {
    /// View over `items` as seen through `viewport`.
    pub fn new(items: &'a [FeedItem], viewport: &'a Viewport, styles: &'a CardStyles) -> Self {
        Self {
            items,
            viewport,
            styles,
            selected: None,
        }
    }

    /// Highlight the item at `index`.
    #[must_use]
    pub fn selected(mut self, index: Option<usize>) -> Self {
        self.selected = index;
        self
    }
}

impl Widget for FeedView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (index, item) in self.items.iter().enumerate() {
            if !self.viewport.is_visible(&item.rect) {
                continue;
            }
            let Some(cells) = self.viewport.cell_area(&item.rect, area) else {
                continue;
            };

            if item.is_placeholder() {
                render_placeholder(cells, buf, self.styles);
            } else {
                render_card(item, self.selected == Some(index), cells, buf, self.styles);
            }
        }
    }
}

fn render_placeholder(cells: Rect, buf: &mut Buffer, styles: &CardStyles) {
    let fill = PLACEHOLDER_GLYPH.repeat(usize::from(cells.width));
    for y in cells.top()..cells.bottom() {
        buf.set_string(cells.x, y, &fill, styles.placeholder);
    }
}

fn render_card(item: &FeedItem, selected: bool, cells: Rect, buf: &mut Buffer, styles: &CardStyles) {
    let border_style = if selected {
        styles.selected_border
    } else {
        styles.border
    };
    let title_width = usize::from(cells.width.saturating_sub(2));

    let mut block = Block::bordered()
        .border_style(border_style)
        .title(Line::styled(
            truncate_to_width(&item.author, title_width),
            styles.author,
        ));
    if cells.height >= 3 {
        block = block.title_bottom(
            Line::styled(format!("♥ {}", item.likes), styles.likes).right_aligned(),
        );
    }

    let inner = block.inner(cells);
    block.render(cells, buf);

    let mut lines = Vec::new();
    if item.kind == FeedItemKind::Image {
        lines.push(Line::styled(image_label(item), styles.image_meta));
    }
    if let Some(text) = &item.text {
        lines.push(Line::raw(text.as_str()));
    }
    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .render(inner, buf);
}

/// Card type and pixel size, e.g. `▣ wide 336×160`.
fn image_label(item: &FeedItem) -> String {
    let card = match item.card {
        Some(CardType::Wide) => "wide",
        Some(CardType::Tall) => "tall",
        Some(CardType::Square) | None => "square",
    };
    format!("▣ {card} {}×{}", item.rect.width, item.rect.height)
}

/// Cut `text` to at most `max_cols` display columns, marking the cut with `…`.
pub(crate) fn truncate_to_width(text: &str, max_cols: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_cols {
        return text.to_string();
    }
    if max_cols == 0 {
        return String::new();
    }

    let budget = max_cols - 1;
    let mut result = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let width = ch.width().unwrap_or(0);
        if used + width > budget {
            break;
        }
        result.push(ch);
        used += width;
    }
    result.push('…');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FeedItemId, Rect as PxRect, ReviewId, Span};
    use crate::view::styles::ColorConfig;
    use ratatui::style::Modifier;

    fn buffer_to_string(buffer: &Buffer) -> String {
        let area = buffer.area();
        let mut lines = Vec::new();
        for y in area.top()..area.bottom() {
            let mut line = String::new();
            for x in area.left()..area.right() {
                line.push_str(buffer[(x, y)].symbol());
            }
            lines.push(line.trim_end().to_string());
        }
        lines.join("\n")
    }

    fn card(kind: FeedItemKind, rect: PxRect, span: Span) -> FeedItem {
        let review = ReviewId::new("r1").unwrap();
        FeedItem {
            id: match kind {
                FeedItemKind::Image => FeedItemId::image(&review),
                _ => FeedItemId::text(&review),
            },
            kind,
            card: Some(CardType::Square),
            image_url: None,
            text: Some("great noodles".to_string()),
            author: "0x1234...abcd".to_string(),
            author_avatar: None,
            likes: 7,
            rect,
            span,
            place_id: None,
        }
    }

    fn render(items: &[FeedItem], viewport: &Viewport, selected: Option<usize>) -> Buffer {
        let styles = CardStyles::with_color_config(ColorConfig::from_env_and_args(true));
        let area = Rect::new(0, 0, viewport.width_cells(), viewport.height_cells());
        let mut buf = Buffer::empty(area);
        FeedView::new(items, viewport, &styles)
            .selected(selected)
            .render(area, &mut buf);
        buf
    }

    #[test]
    fn text_card_shows_author_text_and_likes() {
        let viewport = Viewport::new(50, 12);
        let items = [card(
            FeedItemKind::Text,
            PxRect::new(32, 20, 160, 160),
            Span::Left,
        )];

        let output = buffer_to_string(&render(&items, &viewport, None));

        assert!(output.contains("0x1234...abcd"), "{output}");
        assert!(output.contains("great noodles"), "{output}");
        assert!(output.contains("♥ 7"), "{output}");
    }

    #[test]
    fn image_card_shows_card_type_and_size() {
        let viewport = Viewport::new(50, 12);
        let items = [card(
            FeedItemKind::Image,
            PxRect::new(32, 20, 160, 160),
            Span::Left,
        )];

        let output = buffer_to_string(&render(&items, &viewport, None));
        assert!(output.contains("▣ square 160×160"), "{output}");
    }

    #[test]
    fn placeholder_is_shaded() {
        let viewport = Viewport::new(50, 12);
        let items = [FeedItem::placeholder(
            Span::Right,
            PxRect::new(208, 20, 160, 32),
        )];

        let buf = render(&items, &viewport, None);

        assert_eq!(buf[(26, 1)].symbol(), PLACEHOLDER_GLYPH);
        assert_eq!(buf[(45, 2)].symbol(), PLACEHOLDER_GLYPH);
        assert_eq!(buf[(26, 3)].symbol(), " ");
        assert!(buf[(26, 1)].modifier.contains(Modifier::DIM));
    }

    #[test]
    fn selected_card_border_is_bold() {
        let viewport = Viewport::new(50, 12);
        let items = [card(
            FeedItemKind::Text,
            PxRect::new(32, 20, 160, 160),
            Span::Left,
        )];

        let plain = render(&items, &viewport, None);
        let selected = render(&items, &viewport, Some(0));

        assert!(!plain[(4, 1)].modifier.contains(Modifier::BOLD));
        assert!(selected[(4, 1)].modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn scrolled_out_cards_are_not_drawn() {
        let mut viewport = Viewport::new(50, 5);
        viewport.scroll_to(400, 2000);
        let items = [card(
            FeedItemKind::Text,
            PxRect::new(32, 20, 160, 160),
            Span::Left,
        )];

        let output = buffer_to_string(&render(&items, &viewport, None));
        assert!(output.trim().is_empty(), "{output}");
    }

    #[test]
    fn truncate_marks_cut_with_ellipsis() {
        assert_eq!(truncate_to_width("abcdef", 10), "abcdef");
        assert_eq!(truncate_to_width("abcdef", 4), "abc…");
        assert_eq!(truncate_to_width("abcdef", 0), "");
    }

    #[test]
    fn truncate_counts_wide_characters_twice() {
        assert_eq!(truncate_to_width("日本語テキスト", 5), "日本…");
    }
}
