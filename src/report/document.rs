//! PDF report generation
//!
//! Rows are first laid out onto pages by `layout_pages`, a pure function
//! with fixed page geometry (points, origin bottom-left):
//! - first line at y = 800, x = 30
//! - each following line 20 below the previous one
//! - a new page starts once y would fall below 40
//!
//! `render_document` then draws every line at its placed position, one
//! layout page per PDF page. Lines are never wrapped or reflowed.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use genpdf::fonts::{self, Builtin};
use genpdf::render::Area;
use genpdf::style::Style;
use genpdf::{Context, Document, Element, Mm, PaperSize, Position, RenderResult};
use std::path::PathBuf;

use crate::model::ReportRow;
use crate::Result;

pub const PAGE_TOP: f64 = 800.0;
pub const LEFT_MARGIN: f64 = 30.0;
pub const LINE_STEP: f64 = 20.0;
pub const BOTTOM_LIMIT: f64 = 40.0;

const MM_PER_POINT: f64 = 25.4 / 72.0;

/// File name offered when the report is downloaded
pub const REPORT_FILE_NAME: &str = "internship_report.pdf";

/// One text line at its position on a page
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

/// Font and styling used when rendering the PDF.
#[derive(Debug, Clone)]
pub struct DocumentSettings {
    /// Directory holding `<family>-Regular.ttf` and friends
    pub fonts_dir: PathBuf,
    pub font_family: String,
    pub title: String,
    pub font_size: u8,
}

impl DocumentSettings {
    /// Regular face of the configured family
    pub fn regular_font_path(&self) -> PathBuf {
        self.fonts_dir.join(format!("{}-Regular.ttf", self.font_family))
    }
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            fonts_dir: PathBuf::from("./fonts"),
            font_family: "LiberationSans".to_string(),
            title: "Internship Report".to_string(),
            font_size: 8,
        }
    }
}

/// Place one line per row, breaking pages when vertical space runs out.
pub fn layout_pages(rows: &[ReportRow]) -> Vec<Page> {
    let mut pages = Vec::new();
    let mut current = Page::default();
    let mut y = PAGE_TOP;

    for row in rows {
        current.lines.push(PlacedLine {
            x: LEFT_MARGIN,
            y,
            text: row.report_line(),
        });
        y -= LINE_STEP;
        if y < BOTTOM_LIMIT {
            pages.push(std::mem::take(&mut current));
            y = PAGE_TOP;
        }
    }

    if !current.lines.is_empty() {
        pages.push(current);
    }
    pages
}

/// Render report rows to PDF bytes.
///
/// Returns `Ok(None)` for an empty row set; fonts are only loaded when
/// there is something to draw.
pub fn render_document(rows: &[ReportRow], settings: &DocumentSettings) -> Result<Option<Vec<u8>>> {
    if rows.is_empty() {
        return Ok(None);
    }

    let pages = layout_pages(rows);
    let page_count = pages.len();
    let mut doc = configure_document(settings)?;
    doc.push(PlacedPages::new(pages));

    let mut bytes = Vec::new();
    doc.render(&mut bytes)?;
    tracing::debug!(pages = page_count, bytes = bytes.len(), "Rendered report");
    Ok(Some(bytes))
}

/// Draws each laid-out page onto its own PDF page.
struct PlacedPages {
    pages: std::vec::IntoIter<Page>,
}

impl PlacedPages {
    fn new(pages: Vec<Page>) -> Self {
        Self {
            pages: pages.into_iter(),
        }
    }
}

impl Element for PlacedPages {
    fn render(
        &mut self,
        context: &Context,
        area: Area<'_>,
        style: Style,
    ) -> std::result::Result<RenderResult, genpdf::error::Error> {
        let Some(page) = self.pages.next() else {
            return Ok(RenderResult::default());
        };

        let size = area.size();
        let ascent = style.font(&context.font_cache).glyph_height(style.font_size());
        for line in &page.lines {
            // Layout y is the baseline measured up from the bottom edge.
            let top = size.height - to_mm(line.y) - ascent;
            area.print_str(&context.font_cache, Position::new(to_mm(line.x), top), style, &line.text)?;
        }

        Ok(RenderResult {
            size,
            has_more: self.pages.len() > 0,
        })
    }
}

fn to_mm(points: f64) -> Mm {
    Mm::from(points * MM_PER_POINT)
}

/// Inline `data:` URI for downloading rendered report bytes
pub fn download_data_uri(pdf: &[u8]) -> String {
    format!("data:application/octet-stream;base64,{}", BASE64.encode(pdf))
}

/// HTML anchor that downloads the report under `REPORT_FILE_NAME`
pub fn download_link(pdf: &[u8]) -> String {
    format!(
        r#"<a href="{}" download="{}">Download Report</a>"#,
        download_data_uri(pdf),
        REPORT_FILE_NAME
    )
}

fn configure_document(settings: &DocumentSettings) -> Result<Document> {
    let font_family = fonts::from_files(&settings.fonts_dir, &settings.font_family, Some(Builtin::Helvetica))?;
    let mut doc = Document::new(font_family);
    doc.set_title(settings.title.clone());
    doc.set_paper_size(PaperSize::A4);
    doc.set_font_size(settings.font_size);
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_settings() -> DocumentSettings {
        DocumentSettings {
            fonts_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fonts")),
            font_family: "DejaVuSans".to_string(),
            ..DocumentSettings::default()
        }
    }

    /// Number of `/Type/Page` objects, excluding the `/Type/Pages` tree node
    fn pdf_page_count(pdf: &[u8]) -> usize {
        let needle = b"/Type/Page";
        pdf.windows(needle.len() + 1)
            .filter(|w| w.starts_with(needle) && w[needle.len()] != b's')
            .count()
    }

    fn long_rows(n: usize) -> Vec<ReportRow> {
        (0..n)
            .map(|i| ReportRow {
                name: format!("Student Number {} With A Fairly Long Name", i),
                email: format!("student.number.{}@university.example.edu", i),
                company_name: "Acme Digital Transformation Services".to_string(),
                duration: "6 months".to_string(),
                feedback: Some("Learned a great deal".to_string()),
                msme_digitalized: i as u32,
            })
            .collect()
    }

    fn rows(n: usize) -> Vec<ReportRow> {
        (0..n)
            .map(|i| ReportRow {
                name: format!("Student {}", i),
                email: format!("s{}@x.com", i),
                company_name: "Acme".to_string(),
                duration: "3 months".to_string(),
                feedback: Some("ok".to_string()),
                msme_digitalized: i as u32,
            })
            .collect()
    }

    #[test]
    fn test_empty_rows_render_nothing() {
        assert!(layout_pages(&[]).is_empty());
        // Empty input returns before any font lookup, so a bogus directory is fine.
        let settings = DocumentSettings {
            fonts_dir: PathBuf::from("/nonexistent/fonts"),
            ..DocumentSettings::default()
        };
        assert!(render_document(&[], &settings).unwrap().is_none());
    }

    #[test]
    fn test_lines_step_down_from_top() {
        let pages = layout_pages(&rows(3));
        assert_eq!(pages.len(), 1);
        let ys: Vec<f64> = pages[0].lines.iter().map(|l| l.y).collect();
        assert_eq!(ys, vec![800.0, 780.0, 760.0]);
        assert!(pages[0].lines.iter().all(|l| l.x == LEFT_MARGIN));
        assert!(pages[0].lines[0].text.starts_with("Name: Student 0, Email: s0@x.com"));
    }

    #[test]
    fn test_page_break_after_39_lines() {
        let full = layout_pages(&rows(39));
        assert_eq!(full.len(), 1);
        assert_eq!(full[0].lines.last().unwrap().y, 40.0);

        let spill = layout_pages(&rows(40));
        assert_eq!(spill.len(), 2);
        assert_eq!(spill[1].lines.len(), 1);
        assert_eq!(spill[1].lines[0].y, PAGE_TOP);
        assert!(spill[1].lines[0].text.contains("Student 39"));
    }

    #[test]
    fn test_layout_is_deterministic() {
        let input = rows(85);
        assert_eq!(layout_pages(&input), layout_pages(&input));
        assert_eq!(layout_pages(&input).len(), 3);
    }

    #[test]
    fn test_missing_fonts_is_an_error() {
        let settings = DocumentSettings {
            fonts_dir: PathBuf::from("/nonexistent/fonts"),
            ..DocumentSettings::default()
        };
        assert!(render_document(&rows(1), &settings).is_err());
    }

    #[test]
    fn test_pdf_pages_follow_layout() {
        let settings = fixture_settings();
        for n in [1, 39, 40, 85] {
            let input = long_rows(n);
            assert!(input[0].report_line().len() > 150);

            let pdf = render_document(&input, &settings).unwrap().unwrap();
            assert!(pdf.starts_with(b"%PDF"));
            assert_eq!(pdf_page_count(&pdf), layout_pages(&input).len(), "{} rows", n);
        }
    }

    #[test]
    fn test_regular_font_path() {
        let settings = fixture_settings();
        assert!(settings.regular_font_path().ends_with("tests/fonts/DejaVuSans-Regular.ttf"));
        assert!(settings.regular_font_path().is_file());
    }

    #[test]
    fn test_download_link() {
        let link = download_link(b"%PDF");
        assert!(link.contains("data:application/octet-stream;base64,JVBERg=="));
        assert!(link.contains(r#"download="internship_report.pdf""#));
    }
}
