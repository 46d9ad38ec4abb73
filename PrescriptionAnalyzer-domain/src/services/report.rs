//! Printable report of an analysis result.
//!
//! Building the layout is separate from rendering it: the layout holds every
//! string that ends up on the page, already defaulted and sanitized, and the
//! renderer only places it on A4 pages with `printpdf`.

use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rgb,
};
use thiserror::Error;
use tracing::{error, info, instrument};

use prescription_analyzer_data::models::prescription::{AnalysisResult, Medication};

use crate::entities::prescription::display_or_na;

/// File name of the exported report
pub const REPORT_FILE_NAME: &str = "prescription_report.pdf";

pub const REPORT_TITLE: &str = "Prescription Analysis Report";

pub const PRICE_DISCLAIMER: &str =
    "Note: Estimated prices are general ranges based on AI knowledge and may vary.";

/// Report errors
#[derive(Debug, Error)]
pub enum ReportError {
    /// Nothing to put in the medications table
    #[error("No medication data available to generate a report.")]
    NoMedications,

    /// The document could not be produced or written; the detail is only logged
    #[error("An error occurred while generating the PDF report.")]
    Render(String),
}

/// Keep printable 7-bit ASCII and line breaks; drop everything else
pub fn sanitize_text(text: &str) -> String {
    text.chars()
        .filter(|c| *c == '\n' || (c.is_ascii() && !c.is_ascii_control()))
        .collect()
}

/// A labelled block of `Label: value` lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    pub heading: String,
    pub lines: Vec<String>,
}

/// The medications table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    pub heading: String,
    pub columns: [String; 3],
    pub rows: Vec<[String; 3]>,
}

/// Everything printed in a report, in page order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLayout {
    pub title: String,
    pub sections: Vec<ReportSection>,
    pub table: ReportTable,
    pub disclaimer: String,
}

fn field(label: &str, value: &Option<String>) -> String {
    sanitize_text(&format!("{}: {}", label, display_or_na(value.as_deref())))
}

/// One printed line per `Label: value`, with line breaks inside a value
/// continuing on lines of their own
fn field_lines(fields: &[(&str, &Option<String>)]) -> Vec<String> {
    fields
        .iter()
        .flat_map(|(label, value)| {
            field(label, value)
                .split('\n')
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

fn medication_row(medication: &Medication) -> [String; 3] {
    let instructions = &medication.instructions;
    let cell = format!(
        "Dosage: {}\nFreq: {}\nDur: {}\nTime: {}",
        display_or_na(instructions.dosage.as_deref()),
        display_or_na(instructions.frequency.as_deref()),
        display_or_na(instructions.duration.as_deref()),
        display_or_na(instructions.timing.as_deref()),
    );

    [
        sanitize_text(&display_or_na(medication.tablet_name.as_deref())),
        sanitize_text(&cell),
        sanitize_text(&display_or_na(medication.estimated_price_range_inr.as_deref())),
    ]
}

/// Lay out a report for `result`. Refused when there are no medications.
pub fn build_report_layout(result: &AnalysisResult) -> Result<ReportLayout, ReportError> {
    if result.medications.is_empty() {
        return Err(ReportError::NoMedications);
    }

    let hospital = &result.hospital_details;
    let info = &result.prescription_info;

    let sections = vec![
        ReportSection {
            heading: "Hospital Details:".to_string(),
            lines: field_lines(&[
                ("Name", &hospital.name),
                ("Address", &hospital.address),
                ("Contact", &hospital.phone),
            ]),
        },
        ReportSection {
            heading: "Doctor Details:".to_string(),
            lines: field_lines(&[
                ("Name", &info.doctor_name),
                ("Reg. No", &info.doctor_reg_no),
                ("Contact", &info.doctor_contact),
            ]),
        },
        ReportSection {
            heading: "Patient Details:".to_string(),
            lines: field_lines(&[
                ("Name", &info.patient_name),
                ("Age", &info.patient_age),
                ("Gender", &info.patient_gender),
                ("Prescription Date", &info.date),
            ]),
        },
    ];

    Ok(ReportLayout {
        title: REPORT_TITLE.to_string(),
        sections,
        table: ReportTable {
            heading: "Medications:".to_string(),
            columns: [
                "Medication".to_string(),
                "Instructions".to_string(),
                "Est. Price (INR)".to_string(),
            ],
            rows: result.medications.iter().map(medication_row).collect(),
        },
        disclaimer: PRICE_DISCLAIMER.to_string(),
    })
}

// Page geometry, in millimetres measured from the top-left corner
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const LEFT_MARGIN: f32 = 14.0;
const BOTTOM_LIMIT: f32 = 282.0;
const TABLE_TOP: f32 = 135.0;
const COLUMN_X: [f32; 3] = [14.0, 74.0, 139.0];
const COLUMN_WIDTH: [f32; 3] = [60.0, 65.0, 55.0];
const CELL_PADDING: f32 = 2.0;
const TABLE_LINE_HEIGHT: f32 = 4.0;
const FIELD_LINE_HEIGHT: f32 = 7.0;

/// Rough Helvetica capacity at 9pt
fn column_chars(width: f32) -> usize {
    ((width - 2.0 * CELL_PADDING) / 1.8) as usize
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    // Words wider than a line are broken into line-sized pieces
    let pieces = text.split_whitespace().flat_map(|word| {
        let chars: Vec<char> = word.chars().collect();
        chars
            .chunks(max_chars.max(1))
            .map(|chunk| chunk.iter().collect::<String>())
            .collect::<Vec<_>>()
    });

    for word in pieces {
        if current.len() + word.len() + 1 > max_chars && !current.is_empty() {
            lines.push(current.clone());
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn wrap_cell(text: &str, width: f32) -> Vec<String> {
    text.split('\n')
        .flat_map(|line| wrap_text(line, column_chars(width)))
        .collect()
}

fn render_error<E: std::fmt::Display>(context: &'static str) -> impl Fn(E) -> ReportError {
    move |e| ReportError::Render(format!("{context}: {e}"))
}

struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    pages: usize,
    y: f32,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self, ReportError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(render_error("PDF font error"))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(render_error("PDF font error"))?;

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            pages: 1,
            y: 20.0,
        })
    }

    fn text(&self, text: &str, size: f32, x: f32, y: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(text, size, Mm(x), Mm(PAGE_HEIGHT - y), font);
    }

    fn rule(&self, y: f32) {
        let from = COLUMN_X[0];
        let to = COLUMN_X[2] + COLUMN_WIDTH[2];
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(from), Mm(PAGE_HEIGHT - y)), false),
                (Point::new(Mm(to), Mm(PAGE_HEIGHT - y)), false),
            ],
            is_closed: false,
        });
    }

    fn new_page(&mut self) {
        self.pages += 1;
        let (page, layer) = self.doc.add_page(
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            format!("Layer {}", self.pages),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = 20.0;
    }

    fn table_header(&mut self, columns: &[String; 3]) {
        let height = TABLE_LINE_HEIGHT + 2.0 * CELL_PADDING;
        self.layer
            .set_fill_color(Color::Rgb(Rgb::new(20.0 / 255.0, 20.0 / 255.0, 100.0 / 255.0, None)));
        for (column, label) in columns.iter().enumerate() {
            self.text(
                label,
                9.0,
                COLUMN_X[column] + CELL_PADDING,
                self.y + CELL_PADDING + 3.0,
                true,
            );
        }
        self.layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        self.y += height;
        self.rule(self.y);
    }

    fn table_row(&mut self, row: &[String; 3], columns: &[String; 3]) {
        let cells: Vec<Vec<String>> = row
            .iter()
            .zip(COLUMN_WIDTH)
            .map(|(text, width)| wrap_cell(text, width))
            .collect();
        let line_count = cells.iter().map(Vec::len).max().unwrap_or(1);
        let height = line_count as f32 * TABLE_LINE_HEIGHT + 2.0 * CELL_PADDING;

        if self.y + height > BOTTOM_LIMIT {
            self.new_page();
            self.table_header(columns);
        }

        for (column, lines) in cells.iter().enumerate() {
            for (index, line) in lines.iter().enumerate() {
                let baseline = self.y + CELL_PADDING + 3.0 + index as f32 * TABLE_LINE_HEIGHT;
                self.text(line, 9.0, COLUMN_X[column] + CELL_PADDING, baseline, false);
            }
        }
        self.y += height;
        self.rule(self.y);
    }

    fn finish(self) -> Result<Vec<u8>, ReportError> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(render_error("PDF save error"))?;
        buf.into_inner().map_err(render_error("PDF buffer error"))
    }
}

/// Render a layout as PDF bytes
pub fn render_report_pdf(layout: &ReportLayout) -> Result<Vec<u8>, ReportError> {
    let mut page = PageWriter::new(&layout.title)?;
    page.text(&layout.title, 22.0, LEFT_MARGIN, 20.0, false);

    let mut y = 30.0;
    for section in &layout.sections {
        page.text(&section.heading, 14.0, LEFT_MARGIN, y, false);
        y += FIELD_LINE_HEIGHT;
        for line in &section.lines {
            page.text(line, 12.0, LEFT_MARGIN, y, false);
            y += FIELD_LINE_HEIGHT;
        }
        y += 3.0;
    }
    page.text(&layout.table.heading, 14.0, LEFT_MARGIN, y, false);

    page.y = TABLE_TOP.max(y + 5.0);
    page.rule(page.y);
    page.table_header(&layout.table.columns);
    for row in &layout.table.rows {
        page.table_row(row, &layout.table.columns);
    }

    let disclaimer = wrap_text(&layout.disclaimer, 100);
    if page.y + 10.0 + disclaimer.len() as f32 * 5.0 > BOTTOM_LIMIT {
        page.new_page();
    }
    let mut y = page.y + 10.0;
    for line in &disclaimer {
        page.text(line, 10.0, LEFT_MARGIN, y, false);
        y += 5.0;
    }

    page.finish()
}

/// Write the report for `result` into `dir` and return the file path
#[instrument(skip(result), fields(medications = result.medications.len()))]
pub fn export_report(result: &AnalysisResult, dir: &Path) -> Result<PathBuf, ReportError> {
    let layout = build_report_layout(result)?;

    let bytes = render_report_pdf(&layout).map_err(|e| {
        if let ReportError::Render(detail) = &e {
            error!("Failed to generate PDF: {}", detail);
        }
        e
    })?;

    let path = dir.join(REPORT_FILE_NAME);
    fs::create_dir_all(dir)
        .and_then(|_| fs::write(&path, &bytes))
        .map_err(|e| {
            error!("Failed to write {}: {}", path.display(), e);
            ReportError::Render(e.to_string())
        })?;

    info!(path = %path.display(), bytes = bytes.len(), "Report written");
    Ok(path)
}
