//! Print layout — flows print-variant resume HTML onto A4 pages.
//!
//! Mirrors the print stylesheet: 1in page margins, 11pt body at 1.6 line
//! height, underlined section headings, disc-bulleted list items. Lines are
//! greedy word-wrapped against static Helvetica metrics and broken across
//! pages. All coordinates are PDF points from the bottom-left corner.

// ────────────────────────────────────────────────────────────────────────────
// Page geometry
// ────────────────────────────────────────────────────────────────────────────

/// A4, in points.
pub const PAGE_WIDTH_PT: f32 = 595.28;
pub const PAGE_HEIGHT_PT: f32 = 841.89;
/// `@page { margin: 1in; }`
pub const MARGIN_PT: f32 = 72.0;

const BODY_SIZE_PT: f32 = 11.0;
const BODY_LINE_HEIGHT_PT: f32 = BODY_SIZE_PT * 1.6;
const HEADING_SIZE_PT: f32 = 15.0;
const HEADING_LINE_HEIGHT_PT: f32 = HEADING_SIZE_PT * 1.2;
const HEADING_MARGIN_TOP_PT: f32 = 20.0;
const HEADING_PADDING_BOTTOM_PT: f32 = 5.0;
const PARAGRAPH_MARGIN_PT: f32 = 10.0;
const ITEM_MARGIN_PT: f32 = 8.0;
/// Text indent of list items; the bullet sits inside it.
const ITEM_INDENT_PT: f32 = 18.0;
const BULLET_OFFSET_PT: f32 = 6.0;
pub const BULLET: &str = "\u{2022}";

// ────────────────────────────────────────────────────────────────────────────
// Helvetica metrics
// ────────────────────────────────────────────────────────────────────────────

/// Helvetica advance widths in 1/1000 em for ASCII 0x20..=0x7E.
/// Index = (char as usize) - 32.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // sp ! " # $ % & ' ( ) * + , - . /
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    278, 278, 584, 584, 584, 556, 1015, // : ; < = > ? @
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    278, 278, 278, 469, 556, 333, // [ \ ] ^ _ `
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a-m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n-z
    334, 260, 334, 584, // { | } ~
];
/// Fallback width for characters outside the table.
const AVERAGE_CHAR_WIDTH: u16 = 556;

/// Width of `s` in points at `size_pt`.
pub fn measure(s: &str, size_pt: f32) -> f32 {
    let milli_em: u32 = s
        .chars()
        .map(|c| {
            let code = c as usize;
            if (32..=126).contains(&code) {
                HELVETICA_WIDTHS[code - 32] as u32
            } else {
                AVERAGE_CHAR_WIDTH as u32
            }
        })
        .sum();
    milli_em as f32 * size_pt / 1000.0
}

/// Greedy word-wrap. Always yields at least one line; a single word wider than
/// `max_width_pt` gets a line of its own.
pub fn wrap(text: &str, size_pt: f32, max_width_pt: f32) -> Vec<String> {
    let space_w = measure(" ", size_pt);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in text.split_whitespace() {
        let word_w = measure(word, size_pt);
        if !current.is_empty() && current_width + space_w + word_w > max_width_pt {
            lines.push(std::mem::take(&mut current));
            current_width = 0.0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_width += space_w;
        }
        current.push_str(word);
        current_width += word_w;
    }

    lines.push(current);
    lines
}

// ────────────────────────────────────────────────────────────────────────────
// Blocks
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Heading,
    Paragraph,
    ListItem,
}

/// One `<h2>`, `<p>` or `<li>` element of the print document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub text: String,
}

const BLOCK_TAGS: [(&str, &str, BlockKind); 3] = [
    ("<h2>", "</h2>", BlockKind::Heading),
    ("<li>", "</li>", BlockKind::ListItem),
    ("<p>", "</p>", BlockKind::Paragraph),
];

/// Pulls the body blocks out of a print-variant document, in order.
///
/// Only the bare `<h2>`, `<li>` and `<p>` tags the print formatter emits are
/// recognised. Block text is kept as-is, markup included.
pub fn blocks_from_html(html: &str) -> Vec<Block> {
    let mut rest = match html.find("<body>") {
        Some(start) => &html[start + "<body>".len()..],
        None => html,
    };
    let mut blocks = Vec::new();

    while let Some(start) = rest.find('<') {
        let tail = &rest[start..];
        match BLOCK_TAGS.iter().find(|(open, _, _)| tail.starts_with(open)) {
            Some((open, close, kind)) => {
                let inner = &tail[open.len()..];
                let end = inner.find(close).unwrap_or(inner.len());
                blocks.push(Block {
                    kind: *kind,
                    text: inner[..end].trim().to_string(),
                });
                rest = &inner[(end + close.len()).min(inner.len())..];
            }
            None => rest = &tail[1..],
        }
    }

    blocks
}

// ────────────────────────────────────────────────────────────────────────────
// Page flow
// ────────────────────────────────────────────────────────────────────────────

/// A run of text at a fixed position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub text: String,
    pub x: f32,
    pub baseline: f32,
    pub size: f32,
    pub bold: bool,
}

/// Everything drawn on one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub texts: Vec<PlacedText>,
    /// Heading underlines, as y positions spanning the text width.
    pub rules: Vec<f32>,
}

struct Flow {
    pages: Vec<PageLayout>,
    cursor: f32,
}

impl Flow {
    fn new() -> Self {
        Self {
            pages: vec![PageLayout::default()],
            cursor: PAGE_HEIGHT_PT - MARGIN_PT,
        }
    }

    fn at_page_top(&self) -> bool {
        self.cursor >= PAGE_HEIGHT_PT - MARGIN_PT
    }

    fn page(&mut self) -> &mut PageLayout {
        // `pages` starts non-empty and only grows.
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Starts a new page unless `height` still fits above the bottom margin.
    fn reserve(&mut self, height: f32) {
        if !self.at_page_top() && self.cursor - height < MARGIN_PT {
            self.pages.push(PageLayout::default());
            self.cursor = PAGE_HEIGHT_PT - MARGIN_PT;
        }
    }

    /// Vertical margin before a block; dropped at the top of a page.
    fn gap(&mut self, height: f32) {
        if !self.at_page_top() {
            self.cursor -= height;
        }
    }

    fn line(&mut self, text: String, x: f32, size: f32, line_height: f32, bold: bool) {
        self.reserve(line_height);
        // Baseline sits one font size below the top of the line box.
        let baseline = self.cursor - size;
        self.page().texts.push(PlacedText {
            text,
            x,
            baseline,
            size,
            bold,
        });
        self.cursor -= line_height;
    }
}

/// Lays the blocks out onto as many pages as they need (at least one).
pub fn layout_blocks(blocks: &[Block]) -> Vec<PageLayout> {
    let text_width = PAGE_WIDTH_PT - 2.0 * MARGIN_PT;
    let mut flow = Flow::new();

    for block in blocks {
        match block.kind {
            BlockKind::Heading => {
                flow.gap(HEADING_MARGIN_TOP_PT);
                // Keep the heading, its rule and the first body line together.
                flow.reserve(HEADING_LINE_HEIGHT_PT + HEADING_PADDING_BOTTOM_PT + BODY_LINE_HEIGHT_PT);
                for line in wrap(&block.text, HEADING_SIZE_PT, text_width) {
                    flow.line(line, MARGIN_PT, HEADING_SIZE_PT, HEADING_LINE_HEIGHT_PT, true);
                }
                flow.cursor -= HEADING_PADDING_BOTTOM_PT;
                let rule_y = flow.cursor;
                flow.page().rules.push(rule_y);
            }
            BlockKind::Paragraph => {
                flow.gap(PARAGRAPH_MARGIN_PT);
                for line in wrap(&block.text, BODY_SIZE_PT, text_width) {
                    flow.line(line, MARGIN_PT, BODY_SIZE_PT, BODY_LINE_HEIGHT_PT, false);
                }
            }
            BlockKind::ListItem => {
                flow.gap(ITEM_MARGIN_PT);
                let lines = wrap(&block.text, BODY_SIZE_PT, text_width - ITEM_INDENT_PT);
                for (i, line) in lines.into_iter().enumerate() {
                    flow.reserve(BODY_LINE_HEIGHT_PT);
                    if i == 0 {
                        let baseline = flow.cursor - BODY_SIZE_PT;
                        flow.page().texts.push(PlacedText {
                            text: BULLET.to_string(),
                            x: MARGIN_PT + BULLET_OFFSET_PT,
                            baseline,
                            size: BODY_SIZE_PT,
                            bold: false,
                        });
                    }
                    flow.line(
                        line,
                        MARGIN_PT + ITEM_INDENT_PT,
                        BODY_SIZE_PT,
                        BODY_LINE_HEIGHT_PT,
                        false,
                    );
                }
            }
        }
    }

    flow.pages
}
