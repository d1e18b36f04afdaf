// Copyright (c) The dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{SerializeError, serialize::serialize_document};
use std::{fmt, io};

/// The root of a paginated report document.
///
/// Documents are append-only. Content is always added to the last page, and
/// [`new_page`](Self::new_page) closes the current page.
#[derive(Clone, Debug)]
pub struct Document {
    /// The title of this document, used as the XHTML `<title>`.
    pub title: String,

    /// The language of this document, e.g. `"en"`.
    pub language: Option<String>,

    // Invariant: never empty. The last page is the one being written to.
    pages: Vec<Page>,
}

impl Document {
    /// Creates a new, empty `Document` with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            language: None,
            pages: vec![Page::default()],
        }
    }

    /// Sets the language of the document.
    pub fn set_language(&mut self, language: impl Into<String>) -> &mut Self {
        self.language = Some(language.into());
        self
    }

    /// Appends a block to the current page.
    pub fn add_block(&mut self, block: impl Into<Block>) -> &mut Self {
        self.current_page_mut().blocks.push(block.into());
        self
    }

    /// Forces a page break.
    ///
    /// Breaking on a page that has no content yet is a no-op, so consecutive
    /// calls never produce blank pages.
    pub fn new_page(&mut self) -> &mut Self {
        if !self.current_page_mut().is_empty() {
            self.pages.push(Page::default());
        }
        self
    }

    /// Returns the pages of this document.
    ///
    /// A trailing empty page (left over from a final [`new_page`](Self::new_page)) is not
    /// included, unless the document is completely empty.
    pub fn pages(&self) -> &[Page] {
        match self.pages.split_last() {
            Some((last, rest)) if last.is_empty() && !rest.is_empty() => rest,
            _ => &self.pages,
        }
    }

    /// Returns the number of pages in this document.
    pub fn page_count(&self) -> usize {
        self.pages().len()
    }

    /// Serialize this document to the given writer.
    pub fn serialize(&self, writer: impl io::Write) -> Result<(), SerializeError> {
        serialize_document(self, writer)?;
        Ok(())
    }

    /// Serialize this document to a string.
    pub fn to_string(&self) -> Result<String, SerializeError> {
        let mut buf: Vec<u8> = vec![];
        self.serialize(&mut buf)?;
        String::from_utf8(buf)
            .map_err(|utf8_err| io::Error::new(io::ErrorKind::InvalidData, utf8_err).into())
    }

    fn current_page_mut(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.pages.push(Page::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }
}

/// A single page of a [`Document`].
#[derive(Clone, Debug, Default)]
pub struct Page {
    blocks: Vec<Block>,
}

impl Page {
    /// Returns the blocks on this page, in the order they were added.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Returns true if nothing has been added to this page.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Returns all the text on this page, in document order.
    ///
    /// This is mostly useful for searching through rendered content.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            block.collect_text(&mut out);
        }
        out
    }
}

/// A unit of layout.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum Block {
    /// A heading.
    Heading(Heading),

    /// A paragraph of styled text.
    Paragraph(Paragraph),

    /// A bulleted list.
    List(BulletList),

    /// A table, possibly nested inside another table's cell.
    Table(Table),

    /// A line's worth of vertical space.
    Spacer,
}

impl Block {
    fn collect_text(&self, out: &mut String) {
        match self {
            Block::Heading(heading) => {
                out.push_str(&heading.text);
                out.push('\n');
            }
            Block::Paragraph(paragraph) => {
                for span in &paragraph.spans {
                    out.push_str(&span.text);
                }
                out.push('\n');
            }
            Block::List(list) => {
                for item in &list.items {
                    out.push_str(&list.marker);
                    out.push(' ');
                    out.push_str(item);
                    out.push('\n');
                }
            }
            Block::Table(table) => {
                for cell in &table.cells {
                    for block in &cell.blocks {
                        block.collect_text(out);
                    }
                }
            }
            Block::Spacer => {}
        }
    }
}

impl From<Heading> for Block {
    fn from(heading: Heading) -> Self {
        Block::Heading(heading)
    }
}

impl From<Paragraph> for Block {
    fn from(paragraph: Paragraph) -> Self {
        Block::Paragraph(paragraph)
    }
}

impl From<BulletList> for Block {
    fn from(list: BulletList) -> Self {
        Block::List(list)
    }
}

impl From<Table> for Block {
    fn from(table: Table) -> Self {
        Block::Table(table)
    }
}

/// The level of a [`Heading`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum HeadingLevel {
    /// A top-level section heading. Serialized as `h1`.
    Section,

    /// A subsection heading. Serialized as `h2`.
    Subsection,
}

/// A heading.
#[derive(Clone, Debug)]
pub struct Heading {
    /// The level of this heading.
    pub level: HeadingLevel,

    /// The heading text.
    pub text: String,

    /// The style the heading text is rendered with.
    pub style: TextStyle,
}

impl Heading {
    /// Creates a new heading with the default style.
    pub fn new(level: HeadingLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
            style: TextStyle::default(),
        }
    }

    /// Sets the style of this heading, consuming and returning it.
    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }
}

/// A paragraph, made out of styled spans.
///
/// Newlines inside span text are rendered as line breaks.
#[derive(Clone, Debug, Default)]
pub struct Paragraph {
    /// The spans forming this paragraph.
    pub spans: Vec<Span>,

    /// The horizontal alignment of this paragraph.
    pub alignment: Alignment,
}

impl Paragraph {
    /// Creates a new, empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a paragraph containing a single span.
    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        let mut paragraph = Self::new();
        paragraph.add_span(Span::new(text, style));
        paragraph
    }

    /// Appends a span.
    pub fn add_span(&mut self, span: Span) -> &mut Self {
        self.spans.push(span);
        self
    }

    /// Sets the alignment of this paragraph, consuming and returning it.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }
}

/// A run of text sharing a single style.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Span {
    /// The text of this span.
    pub text: String,

    /// The style of this span.
    pub style: TextStyle,
}

impl Span {
    /// Creates a new span.
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// A bulleted list of plain-text items.
#[derive(Clone, Debug)]
pub struct BulletList {
    /// The marker rendered in front of each item, e.g. `"-"` or `"•"`.
    pub marker: String,

    /// The items of this list.
    pub items: Vec<String>,

    /// The style items are rendered with.
    pub style: TextStyle,
}

impl BulletList {
    /// Creates a new, empty list with the given marker.
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            items: vec![],
            style: TextStyle::default(),
        }
    }

    /// Appends an item.
    pub fn add_item(&mut self, item: impl Into<String>) -> &mut Self {
        self.items.push(item.into());
        self
    }

    /// Appends several items.
    pub fn add_items(&mut self, items: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        for item in items {
            self.add_item(item);
        }
        self
    }
}

/// A table with a fixed number of columns.
///
/// Cells are laid out left to right, wrapping onto a new row once every
/// column of the current row is filled.
#[derive(Clone, Debug)]
pub struct Table {
    /// Relative widths of the columns, in percent. The length is the number of columns.
    pub column_widths: Vec<u8>,

    /// The cells of this table, in row-major order.
    pub cells: Vec<Cell>,
}

impl Table {
    /// Creates a table with the given relative column widths.
    pub fn new(column_widths: impl IntoIterator<Item = u8>) -> Self {
        let mut column_widths: Vec<_> = column_widths.into_iter().collect();
        if column_widths.is_empty() {
            column_widths.push(100);
        }
        Self {
            column_widths,
            cells: vec![],
        }
    }

    /// Creates a table with a single, full-width column.
    pub fn single_column() -> Self {
        Self::new([100])
    }

    /// Returns the number of columns of this table.
    pub fn column_count(&self) -> usize {
        self.column_widths.len()
    }

    /// Appends a cell.
    pub fn add_cell(&mut self, cell: Cell) -> &mut Self {
        self.cells.push(cell);
        self
    }

    /// Returns the rows of this table. The last row may be incomplete.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.column_count())
    }
}

/// A table cell, holding arbitrary blocks.
#[derive(Clone, Debug, Default)]
pub struct Cell {
    /// The contents of this cell.
    pub blocks: Vec<Block>,

    /// The horizontal alignment of this cell's contents.
    pub alignment: Alignment,

    /// Whether a border is drawn around this cell.
    pub bordered: bool,
}

impl Cell {
    /// Creates a new, empty cell without a border.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new, empty cell with a border.
    pub fn bordered() -> Self {
        Self {
            bordered: true,
            ..Self::default()
        }
    }

    /// Appends a block to this cell.
    pub fn add_block(&mut self, block: impl Into<Block>) -> &mut Self {
        self.blocks.push(block.into());
        self
    }

    /// Sets the alignment of this cell.
    pub fn set_alignment(&mut self, alignment: Alignment) -> &mut Self {
        self.alignment = alignment;
        self
    }
}

/// Horizontal alignment.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Alignment {
    /// Left-aligned (the default).
    #[default]
    Left,

    /// Centered.
    Center,

    /// Right-aligned.
    Right,
}

impl Alignment {
    pub(crate) fn as_css(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// The font family text is rendered with.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum FontFamily {
    /// Helvetica, falling back to any sans-serif font.
    #[default]
    Helvetica,

    /// Courier, falling back to any monospace font.
    Courier,
}

impl FontFamily {
    pub(crate) fn as_css(self) -> &'static str {
        match self {
            FontFamily::Helvetica => "Helvetica, Arial, sans-serif",
            FontFamily::Courier => "Courier, 'Courier New', monospace",
        }
    }
}

/// An RGB color.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// How a run of text looks.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TextStyle {
    /// The font family.
    pub family: FontFamily,

    /// The font size, in points.
    pub size: u8,

    /// Whether the text is bold.
    pub bold: bool,

    /// The text color. `None` uses the document default (black).
    pub color: Option<Rgb>,
}

impl TextStyle {
    /// The font size used when none is specified.
    pub const DEFAULT_SIZE: u8 = 12;

    /// Creates a regular, uncolored style of the given family and size.
    pub const fn new(family: FontFamily, size: u8) -> Self {
        Self {
            family,
            size,
            bold: false,
            color: None,
        }
    }

    /// Returns a bold version of this style.
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Returns a version of this style with the given color.
    pub const fn colored(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(FontFamily::Helvetica, Self::DEFAULT_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_page_on_empty_page_is_noop() {
        let mut document = Document::new("doc");
        document.new_page().new_page();
        assert_eq!(document.page_count(), 1);
        assert!(document.pages()[0].is_empty());

        document.add_block(Paragraph::styled("a", TextStyle::default()));
        document.new_page().new_page();
        document.add_block(Paragraph::styled("b", TextStyle::default()));
        document.new_page();

        let pages = document.pages();
        assert_eq!(pages.len(), 2, "trailing empty page is not reported");
        assert_eq!(pages[0].text(), "a\n");
        assert_eq!(pages[1].text(), "b\n");
    }

    #[test]
    fn table_rows_wrap() {
        let mut table = Table::new([85, 15]);
        for _ in 0..3 {
            table.add_cell(Cell::new());
        }
        let row_lengths: Vec<_> = table.rows().map(<[Cell]>::len).collect();
        assert_eq!(row_lengths, vec![2, 1]);

        let table = Table::new([]);
        assert_eq!(table.column_count(), 1, "tables always have a column");
    }

    #[test]
    fn rgb_display() {
        assert_eq!(Rgb(8, 73, 117).to_string(), "#084975");
    }
}
