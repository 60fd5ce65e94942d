//! PDF report assembly
//!
//! A4 portrait pages. The first page opens with the report title and the
//! creation timestamp, optionally followed by a free-text description.
//! Each chart is placed as a titled block: heading, the bar chart image
//! scaled to a fixed width, and a legend listing every label with its
//! value. Heading and image are kept together on one page; a long legend
//! continues line by line onto the following pages.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use chrono::NaiveDateTime;
use log::{debug, info};
use printpdf::{BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use crate::error::{AnalystError, AnalystResult};
use super::chartable::BarChartValue;

pub const DEFAULT_REPORT_TITLE: &str = "Harbor Analytics Report";
pub const CREATION_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const IMAGE_WIDTH_MM: f32 = 180.0;
const TITLE_SIZE: f32 = 20.0;
const HEADING_SIZE: f32 = 13.0;
const BODY_SIZE: f32 = 10.0;
const LINE_MM: f32 = 5.0;
const HEADING_MM: f32 = 8.0;
const BLOCK_GAP_MM: f32 = 8.0;
const LEGEND_CHARS_PER_LINE: usize = 95;
const MM_PER_INCH: f32 = 25.4;

/// Header block of the first page
#[derive(Debug, Clone)]
pub struct ReportHeader {
    pub title: String,
    pub created: NaiveDateTime,
    pub description: Option<String>,
}

/// A rendered chart waiting to be placed in the report
#[derive(Debug, Clone)]
pub struct ChartArtifact {
    pub title: String,
    pub image_path: PathBuf,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub values: Vec<BarChartValue>,
}

impl ChartArtifact {
    /// Resolution that maps the image onto the fixed chart width
    fn dpi(&self) -> f32 {
        self.pixel_width.max(1) as f32 * MM_PER_INCH / IMAGE_WIDTH_MM
    }

    fn image_height_mm(&self) -> f32 {
        self.pixel_height as f32 * MM_PER_INCH / self.dpi()
    }

    fn legend_lines(&self) -> Vec<String> {
        if self.values.is_empty() {
            return vec!["No data for the selected period".to_string()];
        }
        let entries: Vec<String> = self
            .values
            .iter()
            .map(|v| format!("{}: {}", v.label, v.value))
            .collect();
        wrap_words(&entries.join(", "), LEGEND_CHARS_PER_LINE)
    }

    /// Heading, image and the first legend line, which must share a page
    fn leading_height_mm(&self) -> f32 {
        HEADING_MM + self.image_height_mm() + LINE_MM
    }
}

/// Greedy word wrap on character count
pub fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Vertical position on the current page, measured from the bottom edge
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cursor {
    page: usize,
    y: f32,
}

impl Cursor {
    fn top(page: usize) -> Self {
        Self {
            page,
            y: PAGE_HEIGHT_MM - MARGIN_MM,
        }
    }

    /// Move down by `height`, starting a new page when the block would cross the margin.
    /// Returns the y coordinate of the block's top edge.
    fn reserve(&mut self, height: f32) -> f32 {
        let fresh_page = self.y >= PAGE_HEIGHT_MM - MARGIN_MM;
        if self.y - height < MARGIN_MM && !fresh_page {
            *self = Cursor::top(self.page + 1);
        }
        let top = self.y;
        self.y -= height;
        top
    }
}

struct ReportWriter {
    doc: PdfDocumentReference,
    layers: Vec<PdfLayerReference>,
    font: IndirectFontRef,
    bold: IndirectFontRef,
}

impl ReportWriter {
    fn new(title: &str) -> AnalystResult<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| AnalystError::output(format!("Failed to load font: {:?}", e)))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| AnalystError::output(format!("Failed to load font: {:?}", e)))?;
        let first = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layers: vec![first],
            font,
            bold,
        })
    }

    fn layer(&mut self, page: usize) -> PdfLayerReference {
        while self.layers.len() <= page {
            let (page, layer) = self.doc.add_page(
                Mm(PAGE_WIDTH_MM),
                Mm(PAGE_HEIGHT_MM),
                format!("Page {}", self.layers.len() + 1),
            );
            self.layers.push(self.doc.get_page(page).get_layer(layer));
        }
        self.layers[page].clone()
    }

    fn text(&mut self, cursor: &mut Cursor, text: &str, size: f32, height: f32, bold: bool) {
        let top = cursor.reserve(height);
        let font = if bold { self.bold.clone() } else { self.font.clone() };
        self.layer(cursor.page)
            .use_text(text, size, Mm(MARGIN_MM), Mm(top - height * 0.7), &font);
    }

    fn header(&mut self, cursor: &mut Cursor, header: &ReportHeader) {
        self.text(cursor, &header.title, TITLE_SIZE, 12.0, true);
        let created = format!(
            "Date of Document Creation: {}",
            header.created.format(CREATION_DATE_FORMAT)
        );
        self.text(cursor, &created, BODY_SIZE, LINE_MM, false);
        if let Some(description) = header.description.as_deref() {
            cursor.reserve(LINE_MM);
            for line in description.lines().flat_map(|l| wrap_words(l, LEGEND_CHARS_PER_LINE)) {
                self.text(cursor, &line, BODY_SIZE, LINE_MM, false);
            }
        }
        cursor.reserve(BLOCK_GAP_MM);
    }

    fn chart(&mut self, cursor: &mut Cursor, chart: &ChartArtifact) -> AnalystResult<()> {
        let image = image::open(&chart.image_path).map_err(|e| {
            AnalystError::output(format!("Failed to read chart {}: {}", chart.image_path.display(), e))
        })?;

        let block_top = cursor.reserve(chart.leading_height_mm());
        let mut block = Cursor {
            page: cursor.page,
            y: block_top,
        };

        self.text(&mut block, &chart.title, HEADING_SIZE, HEADING_MM, true);
        let image_height = chart.image_height_mm();
        let image_top = block.reserve(image_height);
        Image::from_dynamic_image(&image).add_to_layer(
            self.layer(block.page),
            ImageTransform {
                translate_x: Some(Mm(MARGIN_MM)),
                translate_y: Some(Mm(image_top - image_height)),
                dpi: Some(chart.dpi()),
                ..Default::default()
            },
        );

        *cursor = block;
        for line in chart.legend_lines() {
            self.text(cursor, &line, BODY_SIZE, LINE_MM, false);
        }

        cursor.reserve(BLOCK_GAP_MM);
        debug!("Placed chart '{}' on page {}", chart.title, cursor.page + 1);
        Ok(())
    }

    fn save(self, path: &Path) -> AnalystResult<usize> {
        let pages = self.layers.len();
        let file = File::create(path)
            .map_err(|e| AnalystError::output(format!("Failed to create {}: {}", path.display(), e)))?;
        self.doc
            .save(&mut BufWriter::new(file))
            .map_err(|e| AnalystError::output(format!("Failed to write {}: {:?}", path.display(), e)))?;
        Ok(pages)
    }
}

/// Write the report with one block per chart, in order
pub fn write_report(path: &Path, header: &ReportHeader, charts: &[ChartArtifact]) -> AnalystResult<()> {
    let mut writer = ReportWriter::new(&header.title)?;
    let mut cursor = Cursor::top(0);

    writer.header(&mut cursor, header);
    for chart in charts {
        writer.chart(&mut cursor, chart)?;
    }

    let pages = writer.save(path)?;
    info!("Wrote report with {} charts on {} pages to {}", charts.len(), pages, path.display());
    Ok(())
}
