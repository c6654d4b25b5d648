//! Narrative quality report (`.docx`).
//!
//! The report is first laid out as a list of [`Block`]s, which is what the
//! tests inspect, and then packed into a Word document.

use super::{partition_tests, rank_coverage, Headline, ReportInputs, TestBreakdown};
use crate::error::{QualityError, Result};
use crate::numeric::format_float;
use crate::table::Table;
use chrono::NaiveDateTime;
use docx_rs::{Docx, Paragraph, Run, Style, StyleType, TableCell, TableRow};

pub const NO_DATA: &str = "(no data)";

const RAW_SUMMARY_ROWS: usize = 50;
const STATUS_TABLE_ROWS: usize = 20;
const GENERIC_TABLE_ROWS: usize = 30;
const RANKED_FILES: usize = 5;
const LINT_RULE_ROWS: usize = 10;

const CONCLUSION: &str = "This report aggregates test (JUnit), coverage (Cobertura) and static \
analysis (lint) results into CSV tables and renders them as a workbook and a document. \
It gives a consistent view of quality metrics in CI and a shareable report format.";

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { level: usize, text: String },
    Paragraph(String),
    Table(Table),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    fn heading(&mut self, level: usize, text: impl Into<String>) {
        self.blocks.push(Block::Heading {
            level,
            text: text.into(),
        });
    }

    fn paragraph(&mut self, text: impl Into<String>) {
        self.blocks.push(Block::Paragraph(text.into()));
    }

    /// Titled table showing at most `max_rows` rows, with a footer when cut.
    fn table_section(&mut self, level: usize, title: &str, table: &Table, max_rows: usize) {
        self.heading(level, title);
        if table.is_empty() {
            self.paragraph(NO_DATA);
            return;
        }
        self.blocks.push(Block::Table(table.head(max_rows)));
        if table.len() > max_rows {
            self.paragraph(format!(
                "(showing first {max_rows} of {} rows)",
                table.len()
            ));
        }
    }

    pub fn headings(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Heading { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Paragraph(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Pack as a `.docx` file image.
    pub fn to_docx(&self) -> Result<Vec<u8>> {
        let mut docx = Docx::new()
            .default_size(20)
            .add_style(heading_style(1, 32))
            .add_style(heading_style(2, 26))
            .add_style(heading_style(3, 22));

        for block in &self.blocks {
            docx = match block {
                Block::Heading { level, text } => docx.add_paragraph(
                    Paragraph::new()
                        .add_run(Run::new().add_text(text.as_str()))
                        .style(&format!("Heading{level}")),
                ),
                Block::Paragraph(text) => {
                    docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(text.as_str())))
                }
                Block::Table(table) => docx.add_table(grid_table(table)),
            };
        }

        let mut buf = std::io::Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buf)
            .map_err(|e| QualityError::render("document", e))?;
        Ok(buf.into_inner())
    }
}

fn heading_style(level: usize, half_points: usize) -> Style {
    Style::new(format!("Heading{level}"), StyleType::Paragraph)
        .name(format!("Heading {level}"))
        .size(half_points)
        .bold()
}

fn grid_table(table: &Table) -> docx_rs::Table {
    let cell = |text: &str, bold: bool| {
        let mut run = Run::new().add_text(text);
        if bold {
            run = run.bold();
        }
        TableCell::new().add_paragraph(Paragraph::new().add_run(run))
    };
    let mut rows = vec![TableRow::new(
        table.headers.iter().map(|h| cell(h, true)).collect(),
    )];
    rows.extend(
        table
            .rows
            .iter()
            .map(|r| TableRow::new(r.iter().map(|c| cell(c, false)).collect())),
    );
    docx_rs::Table::new(rows)
}

/// Lay out the six report sections.
pub fn build(
    inputs: &ReportInputs,
    headline: &Headline,
    title: &str,
    generated_at: NaiveDateTime,
) -> Document {
    let mut doc = Document::default();
    doc.heading(1, title);
    doc.paragraph(format!(
        "Generated at: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));

    doc.heading(2, "1. Executive Summary");
    doc.paragraph(format!("- Total tests: {}", headline.tests_total));
    doc.paragraph(format!(
        "- Passed: {}, Failed: {}, Skipped: {}",
        headline.tests_passed, headline.tests_failed, headline.tests_skipped
    ));
    doc.paragraph(format!("- Pass rate (%): {}", format_float(headline.pass_rate())));
    doc.paragraph(format!(
        "- Test time (sec): {}",
        format_float(headline.tests_time_sec)
    ));
    doc.paragraph(format!(
        "- Coverage (%): {}",
        format_float(headline.coverage_percent)
    ));
    doc.paragraph(format!("- Lint issues: {}", headline.lint_issues));

    doc.table_section(
        2,
        "2. Raw Summary (summary.csv)",
        &inputs.summary,
        RAW_SUMMARY_ROWS,
    );

    test_section(&mut doc, &inputs.tests);
    coverage_section(&mut doc, &inputs.coverage_files);
    lint_section(&mut doc, inputs);

    doc.heading(2, "6. Conclusion");
    doc.paragraph(CONCLUSION);
    doc
}

fn test_section(doc: &mut Document, tests: &Table) {
    doc.heading(2, "3. Test Results (tests.csv)");
    if tests.is_empty() {
        doc.paragraph("(no test data)");
        return;
    }
    doc.paragraph(format!("Total testcases: {}", tests.len()));
    match partition_tests(tests) {
        TestBreakdown::ByStatus {
            failed, skipped, ..
        } => {
            for (title, part) in [
                ("3.1 Failed Testcases", failed),
                ("3.2 Skipped Testcases", skipped),
            ] {
                if part.is_empty() {
                    doc.paragraph(format!("{title}: (none)"));
                } else {
                    doc.table_section(
                        3,
                        &format!("{title} (top {STATUS_TABLE_ROWS})"),
                        &part,
                        STATUS_TABLE_ROWS,
                    );
                }
            }
        }
        TestBreakdown::Unclassified(all) => doc.table_section(
            3,
            &format!("3.1 Testcases (top {GENERIC_TABLE_ROWS})"),
            &all,
            GENERIC_TABLE_ROWS,
        ),
    }
}

fn coverage_section(doc: &mut Document, coverage: &Table) {
    doc.heading(2, "4. Coverage (coverage_files.csv)");
    if coverage.is_empty() {
        doc.paragraph("(no coverage data)");
        return;
    }
    match rank_coverage(coverage, RANKED_FILES) {
        Some(ranking) => {
            doc.table_section(3, "4.1 Top 5 Coverage Files", &ranking.top, RANKED_FILES);
            doc.table_section(
                3,
                "4.2 Bottom 5 Coverage Files",
                &ranking.bottom,
                RANKED_FILES,
            );
        }
        None => doc.table_section(
            3,
            &format!("4.1 Coverage Files (top {GENERIC_TABLE_ROWS})"),
            coverage,
            GENERIC_TABLE_ROWS,
        ),
    }
}

fn lint_section(doc: &mut Document, inputs: &ReportInputs) {
    doc.heading(2, "5. Lint Results");
    if inputs.lint_top5.is_empty() {
        doc.paragraph("(no lint_top5 data)");
    } else {
        doc.table_section(3, "5.1 Top 5 Lint Rules", &inputs.lint_top5, LINT_RULE_ROWS);
    }
    if inputs.lint.is_empty() {
        doc.paragraph("5.2 Lint details: (none)");
    } else {
        doc.table_section(
            3,
            &format!("5.2 Lint details (top {GENERIC_TABLE_ROWS})"),
            &inputs.lint,
            GENERIC_TABLE_ROWS,
        );
    }
}
