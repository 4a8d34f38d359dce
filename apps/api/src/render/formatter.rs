//! Section Formatter — turns plain resume text into an HTML document.
//!
//! Each line is classified against a [`LineGrammar`]:
//! - exact heading name → `<h2>`
//! - `N.` marker with `1 <= N <= max_list_item` → `<li>` (marker and one separator stripped)
//! - anything else → `<p>`
//!
//! Blank lines and the grammar's skip lines are dropped. Text is inserted as-is.
//!
//! The same classification feeds both styles; only presentation differs.

use crate::generation::prompts::RESUME_INSTRUCTION;

/// Section names recognised as headings by default.
pub const SECTION_HEADINGS: [&str; 4] = ["SUMMARY", "EXPERIENCE", "SKILLS", "ACHIEVEMENTS"];

const DEFAULT_MAX_LIST_ITEM: u32 = 5;

const SCREEN_HEAD: &str = "<html>\
<body style='font-family: Arial, sans-serif; max-width: 800px; margin: 20px auto; padding: 20px;'>";

const PRINT_HEAD: &str = "<html>
<head>
    <style>
        @page {
            margin: 1in;
        }
        body {
            font-family: Arial, sans-serif;
            line-height: 1.6;
            margin: 0;
            padding: 0;
        }
        h2 {
            color: #2c3e50;
            border-bottom: 2px solid #3498db;
            padding-bottom: 5px;
            margin-top: 20px;
        }
        li {
            margin: 8px 0;
            list-style-type: disc;
        }
        p {
            margin: 10px 0;
        }
    </style>
</head>
<body>";

const TAIL: &str = "</body></html>";

/// Presentation variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Inline-styled body for display in the browser.
    Screen,
    /// Full document with a paginated print stylesheet, fed to the PDF renderer.
    Print,
}

/// A classified, trimmed resume line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Heading(&'a str),
    ListItem(&'a str),
    Paragraph(&'a str),
}

/// Classification table for resume lines.
#[derive(Debug, Clone)]
pub struct LineGrammar {
    pub headings: Vec<String>,
    /// Lines dropped entirely (exact match after trimming).
    pub skip_lines: Vec<String>,
    /// Highest `N.` marker treated as a list item. Larger numbers fall through to paragraphs.
    pub max_list_item: u32,
}

impl Default for LineGrammar {
    fn default() -> Self {
        Self {
            headings: SECTION_HEADINGS.iter().map(|h| h.to_string()).collect(),
            skip_lines: vec![RESUME_INSTRUCTION.to_string()],
            max_list_item: DEFAULT_MAX_LIST_ITEM,
        }
    }
}

impl LineGrammar {
    pub fn with_max_list_item(mut self, max_list_item: u32) -> Self {
        self.max_list_item = max_list_item;
        self
    }

    /// Classifies one raw line. Returns `None` for lines that produce no output.
    pub fn classify<'a>(&self, raw: &'a str) -> Option<Line<'a>> {
        let line = raw.trim();
        if line.is_empty() || self.skip_lines.iter().any(|s| s == line) {
            return None;
        }

        if self.headings.iter().any(|h| h == line) {
            return Some(Line::Heading(line));
        }

        match self.list_item_body(line) {
            Some(body) => Some(Line::ListItem(body)),
            None => Some(Line::Paragraph(line)),
        }
    }

    /// Returns the item text if `line` opens with an accepted `N.` marker.
    ///
    /// Only ASCII digits count, and a multi-digit number may not start with `0`.
    fn list_item_body<'a>(&self, line: &'a str) -> Option<&'a str> {
        let digits = line.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 || line.as_bytes().get(digits) != Some(&b'.') {
            return None;
        }
        if digits > 1 && line.starts_with('0') {
            return None;
        }

        // Overflowing numbers fail to parse and are not list items.
        let number: u32 = line[..digits].parse().ok()?;
        if number == 0 || number > self.max_list_item {
            return None;
        }

        // Skip the marker plus the single separator character after it.
        let mut rest = line[digits + 1..].chars();
        rest.next();
        Some(rest.as_str())
    }
}

/// Renders resume text as an HTML document in the requested style.
pub fn render_html(text: &str, style: Style, grammar: &LineGrammar) -> String {
    let mut html = String::from(match style {
        Style::Screen => SCREEN_HEAD,
        Style::Print => PRINT_HEAD,
    });

    for line in text.lines().filter_map(|l| grammar.classify(l)) {
        html.push_str(&render_line(line, style));
    }

    html.push_str(TAIL);
    html
}

fn render_line(line: Line<'_>, style: Style) -> String {
    match (line, style) {
        (Line::Heading(text), Style::Screen) => format!(
            "<h2 style='color: #2c3e50; border-bottom: 2px solid #3498db;'>{text}</h2>"
        ),
        (Line::ListItem(text), Style::Screen) => {
            format!("<li style='margin: 10px 0;'>{text}</li>")
        }
        (Line::Paragraph(text), Style::Screen) => {
            format!("<p style='margin: 10px 0;'>{text}</p>")
        }
        (Line::Heading(text), Style::Print) => format!("<h2>{text}</h2>"),
        (Line::ListItem(text), Style::Print) => format!("<li>{text}</li>"),
        (Line::Paragraph(text), Style::Print) => format!("<p>{text}</p>"),
    }
}
