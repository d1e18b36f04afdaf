// Copyright (c) The dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialize a `Document` as XHTML.
//!
//! Each page becomes a `<section class="page">`, and the embedded print stylesheet breaks pages
//! after every section.

use crate::{
    Alignment, Block, BulletList, Cell, Document, Heading, HeadingLevel, Page, Paragraph, Span,
    Table, TextStyle,
};
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use std::{borrow::Cow, io};
use swrite::{SWrite, swrite};

static HTML_TAG: &str = "html";
static HEAD_TAG: &str = "head";
static META_TAG: &str = "meta";
static TITLE_TAG: &str = "title";
static STYLE_TAG: &str = "style";
static BODY_TAG: &str = "body";
static SECTION_TAG: &str = "section";
static PARAGRAPH_TAG: &str = "p";
static SPAN_TAG: &str = "span";
static LINE_BREAK_TAG: &str = "br";
static LIST_TAG: &str = "ul";
static LIST_ITEM_TAG: &str = "li";
static TABLE_TAG: &str = "table";
static COLGROUP_TAG: &str = "colgroup";
static COL_TAG: &str = "col";
static TBODY_TAG: &str = "tbody";
static ROW_TAG: &str = "tr";
static CELL_TAG: &str = "td";
static SPACER_TAG: &str = "div";

static XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

static PAGE_STYLESHEET: &str = "\
@page { size: A4; margin: 2cm; }
body { font-family: Helvetica, Arial, sans-serif; font-size: 12pt; color: #000000; }
section.page { page-break-after: always; break-after: page; }
table { width: 100%; border-collapse: collapse; }
td { vertical-align: top; padding: 2pt 4pt; }
td.bordered { border: 1px solid #000000; }
ul.bullets { list-style: none; padding-left: 0; margin: 0; }
div.spacer { height: 1em; }
";

pub(crate) fn serialize_document(document: &Document, writer: impl io::Write) -> io::Result<()> {
    let mut writer = Writer::new_with_indent(writer, b' ', 4);

    let decl = BytesDecl::new("1.0", Some("UTF-8"), None);
    writer.write_event(Event::Decl(decl))?;
    writer.write_event(Event::DocType(BytesText::from_escaped("html")))?;

    serialize_document_impl(document, &mut writer)?;

    // Add a trailing newline.
    writer.write_indent()
}

fn serialize_document_impl(
    document: &Document,
    writer: &mut Writer<impl io::Write>,
) -> io::Result<()> {
    let mut html_tag = BytesStart::new(HTML_TAG);
    html_tag.push_attribute(("xmlns", XHTML_NAMESPACE));
    if let Some(language) = &document.language {
        html_tag.push_attribute(("lang", xml_text(language).as_ref()));
    }
    writer.write_event(Event::Start(html_tag))?;

    serialize_empty_start_tag(HEAD_TAG, writer)?;
    let mut meta_tag = BytesStart::new(META_TAG);
    meta_tag.push_attribute(("charset", "UTF-8"));
    writer.write_event(Event::Empty(meta_tag))?;
    serialize_text_element(TITLE_TAG, &document.title, writer)?;
    serialize_text_element(STYLE_TAG, PAGE_STYLESHEET, writer)?;
    serialize_end_tag(HEAD_TAG, writer)?;

    serialize_empty_start_tag(BODY_TAG, writer)?;
    for page in document.pages() {
        serialize_page(page, writer)?;
    }
    serialize_end_tag(BODY_TAG, writer)?;

    serialize_end_tag(HTML_TAG, writer)?;
    writer.write_event(Event::Eof)
}

fn serialize_page(page: &Page, writer: &mut Writer<impl io::Write>) -> io::Result<()> {
    let mut section_tag = BytesStart::new(SECTION_TAG);
    section_tag.push_attribute(("class", "page"));
    writer.write_event(Event::Start(section_tag))?;

    for block in page.blocks() {
        serialize_block(block, writer)?;
    }

    serialize_end_tag(SECTION_TAG, writer)
}

fn serialize_block(block: &Block, writer: &mut Writer<impl io::Write>) -> io::Result<()> {
    match block {
        Block::Heading(heading) => serialize_heading(heading, writer),
        Block::Paragraph(paragraph) => serialize_paragraph(paragraph, writer),
        Block::List(list) => serialize_list(list, writer),
        Block::Table(table) => serialize_table(table, writer),
        Block::Spacer => {
            let mut spacer_tag = BytesStart::new(SPACER_TAG);
            spacer_tag.push_attribute(("class", "spacer"));
            writer.write_event(Event::Empty(spacer_tag))
        }
    }
}

fn serialize_heading(heading: &Heading, writer: &mut Writer<impl io::Write>) -> io::Result<()> {
    // Use the destructuring syntax to ensure that all fields are handled.
    let Heading { level, text, style } = heading;

    let tag_name = match level {
        HeadingLevel::Section => "h1",
        HeadingLevel::Subsection => "h2",
    };
    let mut heading_tag = BytesStart::new(tag_name);
    heading_tag.push_attribute(("style", style_attribute(style).as_str()));
    writer.write_event(Event::Start(heading_tag))?;
    serialize_multiline_text(text, writer)?;
    serialize_end_tag(tag_name, writer)
}

fn serialize_paragraph(
    paragraph: &Paragraph,
    writer: &mut Writer<impl io::Write>,
) -> io::Result<()> {
    let Paragraph { spans, alignment } = paragraph;

    let mut paragraph_tag = BytesStart::new(PARAGRAPH_TAG);
    if *alignment != Alignment::Left {
        paragraph_tag.push_attribute(("style", alignment_attribute(*alignment).as_str()));
    }
    writer.write_event(Event::Start(paragraph_tag))?;

    for span in spans {
        serialize_span(span, writer)?;
    }

    serialize_end_tag(PARAGRAPH_TAG, writer)
}

fn serialize_span(span: &Span, writer: &mut Writer<impl io::Write>) -> io::Result<()> {
    let Span { text, style } = span;

    let mut span_tag = BytesStart::new(SPAN_TAG);
    span_tag.push_attribute(("style", style_attribute(style).as_str()));
    writer.write_event(Event::Start(span_tag))?;
    serialize_multiline_text(text, writer)?;
    serialize_end_tag(SPAN_TAG, writer)
}

fn serialize_list(list: &BulletList, writer: &mut Writer<impl io::Write>) -> io::Result<()> {
    let BulletList {
        marker,
        items,
        style,
    } = list;

    let mut list_tag = BytesStart::new(LIST_TAG);
    list_tag.push_attribute(("class", "bullets"));
    list_tag.push_attribute(("style", style_attribute(style).as_str()));
    if items.is_empty() {
        return writer.write_event(Event::Empty(list_tag));
    }
    writer.write_event(Event::Start(list_tag))?;

    for item in items {
        serialize_text_element(LIST_ITEM_TAG, &format!("{marker} {item}"), writer)?;
    }

    serialize_end_tag(LIST_TAG, writer)
}

fn serialize_table(table: &Table, writer: &mut Writer<impl io::Write>) -> io::Result<()> {
    serialize_empty_start_tag(TABLE_TAG, writer)?;

    serialize_empty_start_tag(COLGROUP_TAG, writer)?;
    for width in &table.column_widths {
        let mut col_tag = BytesStart::new(COL_TAG);
        col_tag.push_attribute(("style", format!("width: {width}%").as_str()));
        writer.write_event(Event::Empty(col_tag))?;
    }
    serialize_end_tag(COLGROUP_TAG, writer)?;

    serialize_empty_start_tag(TBODY_TAG, writer)?;
    for row in table.rows() {
        serialize_empty_start_tag(ROW_TAG, writer)?;
        for cell in row {
            serialize_cell(cell, writer)?;
        }
        serialize_end_tag(ROW_TAG, writer)?;
    }
    serialize_end_tag(TBODY_TAG, writer)?;

    serialize_end_tag(TABLE_TAG, writer)
}

fn serialize_cell(cell: &Cell, writer: &mut Writer<impl io::Write>) -> io::Result<()> {
    let Cell {
        blocks,
        alignment,
        bordered,
    } = cell;

    let mut cell_tag = BytesStart::new(CELL_TAG);
    if *bordered {
        cell_tag.push_attribute(("class", "bordered"));
    }
    if *alignment != Alignment::Left {
        cell_tag.push_attribute(("style", alignment_attribute(*alignment).as_str()));
    }

    if blocks.is_empty() {
        return writer.write_event(Event::Empty(cell_tag));
    }
    writer.write_event(Event::Start(cell_tag))?;
    for block in blocks {
        serialize_block(block, writer)?;
    }
    serialize_end_tag(CELL_TAG, writer)
}

// Newlines become <br/> elements so that line structure survives HTML whitespace folding.
fn serialize_multiline_text(text: &str, writer: &mut Writer<impl io::Write>) -> io::Result<()> {
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            writer.write_event(Event::Empty(BytesStart::new(LINE_BREAK_TAG)))?;
        }
        if !line.is_empty() {
            writer.write_event(Event::Text(BytesText::new(&xml_text(line))))?;
        }
    }
    Ok(())
}

fn serialize_text_element(
    tag_name: &'static str,
    text: &str,
    writer: &mut Writer<impl io::Write>,
) -> io::Result<()> {
    serialize_empty_start_tag(tag_name, writer)?;
    writer.write_event(Event::Text(BytesText::new(&xml_text(text))))?;
    serialize_end_tag(tag_name, writer)
}

/// Replaces characters that XML 1.0 does not allow, such as most C0 controls, with U+FFFD.
///
/// Markup characters are escaped separately by quick-xml.
fn xml_text(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(
            text.chars()
                .map(|c| {
                    if is_xml_char(c) {
                        c
                    } else {
                        char::REPLACEMENT_CHARACTER
                    }
                })
                .collect(),
        )
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..
    )
}

fn serialize_empty_start_tag(
    tag_name: &'static str,
    writer: &mut Writer<impl io::Write>,
) -> io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag_name)))
}

fn serialize_end_tag(tag_name: &'static str, writer: &mut Writer<impl io::Write>) -> io::Result<()> {
    writer.write_event(Event::End(BytesEnd::new(tag_name)))
}

fn style_attribute(style: &TextStyle) -> String {
    let TextStyle {
        family,
        size,
        bold,
        color,
    } = style;

    let mut attribute = format!("font-family: {}; font-size: {size}pt", family.as_css());
    if *bold {
        attribute.push_str("; font-weight: bold");
    }
    if let Some(color) = color {
        swrite!(attribute, "; color: {color}");
    }
    attribute
}

fn alignment_attribute(alignment: Alignment) -> String {
    format!("text-align: {}", alignment.as_css())
}
