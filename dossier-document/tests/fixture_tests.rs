// Copyright (c) The dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use dossier_document::{
    Alignment, BulletList, Cell, Document, FontFamily, Heading, HeadingLevel, Paragraph, Rgb,
    Table, TextStyle,
};
use indoc::indoc;
use pretty_assertions::assert_eq;

#[test]
fn serialize_basic_document() {
    let document = basic_document();
    let output = document
        .to_string()
        .expect("serializing basic_document succeeds");

    assert!(
        output.starts_with(indoc! {r#"
            <?xml version="1.0" encoding="UTF-8"?>
            <!DOCTYPE html>
            <html xmlns="http://www.w3.org/1999/xhtml" lang="en">
        "#}),
        "unexpected prelude:\n{output}"
    );
    assert!(output.contains("<title>basic &lt;document&gt;</title>"));
    assert_eq!(
        output.matches(r#"<section class="page">"#).count(),
        2,
        "two pages are serialized"
    );

    // Line breaks in span text become <br/> elements.
    assert!(output.contains("Unit test report<br/>DOSSIER 1.0</span>"));
    assert!(output.contains(r#"<p style="text-align: center">"#));

    // Text is escaped.
    assert!(output.contains("R&amp;D"));

    // Table layout: two columns with the given widths, one bordered cell.
    assert!(output.contains(r#"<col style="width: 85%"/>"#));
    assert!(output.contains(r#"<col style="width: 15%"/>"#));
    assert!(output.contains(r#"<td class="bordered">"#));
    assert!(output.contains(r#"<td style="text-align: right">"#));
    assert!(output.contains("color: #05a300"));

    assert!(output.contains("<li>- R1</li>"));
    assert!(output.ends_with("</html>\n"), "trailing newline is written");
}

#[test]
fn serialize_empty_document() {
    let document = Document::new("empty");
    let output = document.to_string().expect("serializing succeeds");

    assert_eq!(document.page_count(), 1);
    assert_eq!(output.matches(r#"<section class="page">"#).count(), 1);
    assert!(!output.contains("lang="), "no language attribute by default");
}

#[test]
fn page_text_follows_document_order() {
    let document = basic_document();
    let pages = document.pages();

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].text(), "Unit test report\nDOSSIER 1.0\n");
    assert_eq!(
        pages[1].text(),
        indoc! {"
            Rules
            - R1
            - R&D
            Test: adds numbers
            Passed
        "}
    );
}

fn basic_document() -> Document {
    let mut document = Document::new("basic <document>");
    document.set_language("en");

    let cover = Paragraph::styled(
        "Unit test report\nDOSSIER 1.0",
        TextStyle::new(FontFamily::Helvetica, 24).bold(),
    )
    .with_alignment(Alignment::Center);
    document.add_block(cover).new_page();

    let mut rules = BulletList::new("-");
    rules.add_items(["R1", "R&D"]);
    document
        .add_block(Heading::new(HeadingLevel::Section, "Rules"))
        .add_block(rules);

    let mut table = Table::new([85, 15]);
    let mut title_cell = Cell::bordered();
    title_cell.add_block(Paragraph::styled(
        "Test: adds numbers",
        TextStyle::default().bold(),
    ));
    let mut status_cell = Cell::new();
    status_cell
        .add_block(Paragraph::styled(
            "Passed",
            TextStyle::default().bold().colored(Rgb(5, 163, 0)),
        ))
        .set_alignment(Alignment::Right);
    table.add_cell(title_cell).add_cell(status_cell);
    document.add_block(table).new_page();

    document
}
