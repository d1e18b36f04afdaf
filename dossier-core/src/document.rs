// Copyright (c) The dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Building the report document from aggregated results.
//!
//! A report has three parts, each starting on a new page:
//!
//! 1. a cover page with the project name, version and execution date,
//! 2. an index of every business rule covered by the run,
//! 3. the results themselves, one section per group and one card per test.

use crate::{
    outcome::{NO_TAGS, OutcomeRecord},
    reporter::{AggregatedResults, ResultGroup},
};
use chrono::{Local, NaiveDate};
use dossier_document::{
    Alignment, Block, BulletList, Cell, Document, FontFamily, Heading, HeadingLevel, Paragraph,
    Rgb, Table, TextStyle,
};
use std::collections::BTreeSet;

/// Builds a report for the given results, dated today.
pub fn build_report(results: &AggregatedResults, project_name: &str, version: &str) -> Document {
    DossierBuilder::new(project_name, version).build(results)
}

/// Returns the index of business rules covered by `results`: every tag, deduplicated and sorted,
/// except for [`NO_TAGS`].
pub fn tag_index(results: &AggregatedResults) -> Vec<&str> {
    let tags: BTreeSet<&str> = results
        .records()
        .flat_map(OutcomeRecord::tags)
        .map(String::as_str)
        .filter(|&tag| tag != NO_TAGS)
        .collect();
    tags.into_iter().collect()
}

/// The text styles used in a report.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DossierStyles {
    /// The cover page.
    pub cover: TextStyle,

    /// The heading of the business rule index.
    pub index_title: TextStyle,

    /// Entries of the business rule index.
    pub index_item: TextStyle,

    /// Group headings.
    pub group: TextStyle,

    /// Sub-group headings.
    pub sub_group: TextStyle,

    /// The title of a result card.
    pub card_title: TextStyle,

    /// The method name shown under a card title.
    pub caption: TextStyle,

    /// The duration of a passed test.
    pub duration: TextStyle,

    /// The status label of a passed test.
    pub good_status: TextStyle,

    /// The status label of any test that did not pass.
    pub bad_status: TextStyle,

    /// Test descriptions.
    pub description: TextStyle,

    /// The "Rules tested:" heading of a card.
    pub rules_heading: TextStyle,

    /// The business rules listed on a card.
    pub rule_item: TextStyle,
}

impl DossierStyles {
    /// The default look: Helvetica throughout, with blue headings.
    pub const fn classic() -> Self {
        const BODY: TextStyle = TextStyle::new(FontFamily::Helvetica, TextStyle::DEFAULT_SIZE);
        const SUBTITLE: Rgb = Rgb(182, 187, 219);

        Self {
            cover: TextStyle::new(FontFamily::Helvetica, 24).bold(),
            index_title: TextStyle::new(FontFamily::Helvetica, 15).bold(),
            index_item: BODY,
            group: TextStyle::new(FontFamily::Helvetica, 20)
                .bold()
                .colored(Rgb(8, 73, 117)),
            sub_group: TextStyle::new(FontFamily::Helvetica, 14).colored(Rgb(17, 121, 191)),
            card_title: BODY.bold(),
            caption: TextStyle::new(FontFamily::Helvetica, 8).colored(SUBTITLE),
            duration: TextStyle::new(FontFamily::Helvetica, 8).colored(SUBTITLE),
            good_status: BODY.bold().colored(Rgb(5, 163, 0)),
            bad_status: BODY.bold().colored(Rgb(163, 16, 0)),
            description: BODY,
            rules_heading: BODY.bold(),
            rule_item: BODY,
        }
    }
}

impl Default for DossierStyles {
    fn default() -> Self {
        Self::classic()
    }
}

/// Builds report [`Document`]s.
#[derive(Clone, Debug)]
pub struct DossierBuilder {
    project_name: String,
    version: String,
    date: NaiveDate,
    styles: DossierStyles,
}

impl DossierBuilder {
    /// The heading of the business rule index.
    pub const INDEX_HEADING: &'static str = "Business rules covered in this report:";

    /// Creates a new builder for a report dated today.
    pub fn new(project_name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            version: version.into(),
            date: Local::now().date_naive(),
            styles: DossierStyles::default(),
        }
    }

    /// Sets the execution date shown on the cover page.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Sets the styles used by the report.
    pub fn with_styles(mut self, styles: DossierStyles) -> Self {
        self.styles = styles;
        self
    }

    /// Builds the report.
    pub fn build(&self, results: &AggregatedResults) -> Document {
        let mut document = Document::new(format!(
            "Unit test report: {} {}",
            self.project_name, self.version
        ));
        document.set_language("en");

        self.add_cover(&mut document);
        document.new_page();
        self.add_index(&mut document, results);
        document.new_page();
        for group in results.groups() {
            self.add_group(&mut document, group);
        }
        document.new_page();

        document
    }

    fn add_cover(&self, document: &mut Document) {
        let text = format!(
            "Unit test report\n{} {}\nExecuted on {}",
            self.project_name.to_uppercase(),
            self.version,
            self.date.format("%d/%m/%Y"),
        );
        document
            .add_block(Paragraph::styled(text, self.styles.cover).with_alignment(Alignment::Center));
    }

    fn add_index(&self, document: &mut Document, results: &AggregatedResults) {
        document.add_block(
            Heading::new(HeadingLevel::Section, Self::INDEX_HEADING)
                .with_style(self.styles.index_title),
        );

        let tags = tag_index(results);
        if !tags.is_empty() {
            let mut list = BulletList::new("-");
            list.style = self.styles.index_item;
            list.add_items(tags);
            document.add_block(list);
        }
    }

    fn add_group(&self, document: &mut Document, group: &ResultGroup) {
        document.add_block(
            Heading::new(HeadingLevel::Section, group.id()).with_style(self.styles.group),
        );
        for sub_group in group.sub_groups() {
            document
                .add_block(
                    Heading::new(HeadingLevel::Subsection, sub_group.id())
                        .with_style(self.styles.sub_group),
                )
                .add_block(Block::Spacer);
            for record in sub_group.records() {
                document
                    .add_block(self.result_card(record))
                    .add_block(Block::Spacer);
            }
        }
    }

    fn result_card(&self, record: &OutcomeRecord) -> Table {
        let styles = &self.styles;

        let mut title_row = Table::new([85, 15]);
        let mut title = Cell::new();
        title.add_block(Paragraph::styled(
            format!("Test: {}", record.title().unwrap_or("(untitled)")),
            styles.card_title,
        ));
        let status_style = if record.status().is_success() {
            styles.good_status
        } else {
            styles.bad_status
        };
        let mut status = Cell::new();
        status
            .add_block(Paragraph::styled(record.status().label(), status_style))
            .set_alignment(Alignment::Right);
        title_row.add_cell(title).add_cell(status);

        let mut caption_row = Table::new([85, 15]);
        let mut caption = Cell::new();
        caption.add_block(Paragraph::styled(
            format!("[{}]", record.method_name()),
            styles.caption,
        ));
        let mut duration = Cell::new();
        if record.status().is_success() {
            duration
                .add_block(Paragraph::styled(
                    format!("{}ms", record.duration_millis()),
                    styles.duration,
                ))
                .set_alignment(Alignment::Center);
        }
        caption_row.add_cell(caption).add_cell(duration);

        let mut rules = BulletList::new("•");
        rules.style = styles.rule_item;
        rules.add_items(record.tags());
        let mut body = Cell::bordered();
        body.add_block(Paragraph::styled(
            record.description().unwrap_or("(no description)"),
            styles.description,
        ))
        .add_block(Paragraph::styled("Rules tested:", styles.rules_heading))
        .add_block(rules);

        let mut header = Cell::bordered();
        header.add_block(title_row).add_block(caption_row);

        let mut card = Table::single_column();
        card.add_cell(header).add_cell(body);
        card
    }
}
