//! Progress chart rendering
//!
//! Draws a grouped bar chart of digitalized counts, one slot per
//! internship in insertion order. Within a slot the bar is dodged into the
//! lane of its company and filled with that company's colour, so the same
//! company keeps the same lane and colour across slots. A legend of colour
//! swatches sits in the top-right corner of the plot.
//!
//! With a `ChartFont` the chart also carries its title, axis labels, tick
//! values and company names in the legend.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::{Rgb, RgbImage};
use png::{BitDepth as PngBitDepth, ColorType as PngColorType, Encoder as PngEncoder};
use rusttype::{point, Font, Scale};
use std::path::Path;

use crate::model::InternshipSummary;
use crate::{Error, Result};

pub const WIDTH: u32 = 600;
pub const HEIGHT: u32 = 400;

pub const TITLE: &str = "MSMEs Digitalized per Internship";
pub const X_LABEL: &str = "Internship";
pub const Y_LABEL: &str = "MSMEs Digitalized";

const PLOT_LEFT: u32 = 70;
const PLOT_RIGHT: u32 = 20;
const PLOT_TOP: u32 = 30;
const PLOT_BOTTOM: u32 = 40;
/// Share of a slot taken by its bar group
const GROUP_FILL: f64 = 0.8;
const SWATCH: u32 = 12;

const TITLE_PX: f32 = 16.0;
const LABEL_PX: f32 = 12.0;
const TICK_PX: f32 = 10.0;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const GRID: Rgb<u8> = Rgb([221, 221, 221]);
const AXIS: Rgb<u8> = Rgb([128, 128, 128]);
const TEXT: Rgb<u8> = Rgb([51, 51, 51]);

/// Company colours, assigned in order of first appearance
pub const PALETTE: [Rgb<u8>; 10] = [
    Rgb([76, 114, 176]),
    Rgb([221, 132, 82]),
    Rgb([85, 168, 104]),
    Rgb([196, 78, 82]),
    Rgb([129, 114, 179]),
    Rgb([147, 120, 96]),
    Rgb([218, 139, 195]),
    Rgb([140, 140, 140]),
    Rgb([204, 185, 116]),
    Rgb([100, 181, 205]),
];

/// An encoded chart image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImage {
    pub width: u32,
    pub height: u32,
    /// PNG bytes
    pub png: Vec<u8>,
}

impl ChartImage {
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.png)
    }

    /// Self-contained form for inline embedding
    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", self.to_base64())
    }
}

/// TrueType face used for chart text
pub struct ChartFont {
    font: Font<'static>,
}

impl ChartFont {
    pub fn open(path: &Path) -> Result<Self> {
        Self::from_bytes(std::fs::read(path)?)
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if data.len() < 4 {
            return Err(Error::Chart("unreadable font: too short".to_string()));
        }
        let font = Font::from_bytes(data).map_err(|e| Error::Chart(format!("unreadable font: {}", e)))?;
        Ok(Self { font })
    }

    fn width(&self, text: &str, px: f32) -> u32 {
        self.font
            .layout(text, Scale::uniform(px), point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
            .ceil() as u32
    }

    /// Draw `text` with its top-left corner at (`x`, `y`).
    fn draw(&self, img: &mut RgbImage, text: &str, px: f32, x: i32, y: i32) {
        self.draw_with(text, px, |tx, ty, coverage| blend(img, x + tx, y + ty, coverage));
    }

    /// Draw `text` turned a quarter anticlockwise, reading bottom to top from (`x`, `y_bottom`).
    fn draw_upright(&self, img: &mut RgbImage, text: &str, px: f32, x: i32, y_bottom: i32) {
        self.draw_with(text, px, |tx, ty, coverage| blend(img, x + ty, y_bottom - tx, coverage));
    }

    fn draw_with(&self, text: &str, px: f32, mut plot: impl FnMut(i32, i32, f32)) {
        let scale = Scale::uniform(px);
        let ascent = self.font.v_metrics(scale).ascent;
        for glyph in self.font.layout(text, scale, point(0.0, ascent)) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, coverage| plot(bb.min.x + gx as i32, bb.min.y + gy as i32, coverage));
            }
        }
    }
}

/// Render a student's internships as a grouped bar chart.
///
/// Returns `Ok(None)` when there is nothing to plot.
pub fn render_chart(internships: &[InternshipSummary]) -> Result<Option<ChartImage>> {
    draw_chart(internships, None)
}

/// Same chart as `render_chart`, with title, axis labels and legend names.
pub fn render_labelled_chart(internships: &[InternshipSummary], font: &ChartFont) -> Result<Option<ChartImage>> {
    draw_chart(internships, Some(font))
}

fn draw_chart(internships: &[InternshipSummary], font: Option<&ChartFont>) -> Result<Option<ChartImage>> {
    if internships.is_empty() {
        return Ok(None);
    }

    let companies = company_lanes(internships);
    let max = internships.iter().map(|i| i.msme_digitalized).max().unwrap_or(0);
    let (axis_max, step) = nice_axis(max);

    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);
    let plot_w = WIDTH - PLOT_LEFT - PLOT_RIGHT;
    let plot_h = HEIGHT - PLOT_TOP - PLOT_BOTTOM;
    let baseline = PLOT_TOP + plot_h;

    // Horizontal grid at every tick.
    let mut tick = 0u64;
    while tick <= axis_max {
        let y = baseline - scale(tick, axis_max, plot_h);
        fill_rect(&mut img, PLOT_LEFT, y, plot_w, 1, GRID);
        if let Some(font) = font {
            let label = tick.to_string();
            let x = PLOT_LEFT as i32 - 4 - font.width(&label, TICK_PX) as i32;
            font.draw(&mut img, &label, TICK_PX, x, y as i32 - TICK_PX as i32 / 2);
        }
        tick += step;
    }

    let slot_w = f64::from(plot_w) / internships.len() as f64;
    let group_w = slot_w * GROUP_FILL;
    let bar_w = group_w / companies.len() as f64;

    for (i, internship) in internships.iter().enumerate() {
        let lane = companies
            .iter()
            .position(|c| *c == internship.company_name)
            .unwrap_or(0);
        let left = f64::from(PLOT_LEFT) + slot_w * i as f64 + (slot_w - group_w) / 2.0 + bar_w * lane as f64;
        let x = left.round() as u32;
        let w = (bar_w.round() as u32).max(1);
        let h = scale(u64::from(internship.msme_digitalized), axis_max, plot_h);
        if h > 0 {
            fill_rect(&mut img, x, baseline - h, w, h, lane_color(lane));
        }
    }

    // Axes
    fill_rect(&mut img, PLOT_LEFT, PLOT_TOP, 1, plot_h + 1, AXIS);
    fill_rect(&mut img, PLOT_LEFT, baseline, plot_w, 1, AXIS);

    // Legend swatches, one row per company.
    let legend_x = WIDTH - PLOT_RIGHT - SWATCH - 8;
    for (lane, company) in companies.iter().enumerate() {
        let y = PLOT_TOP + 8 + lane as u32 * (SWATCH + 4);
        if y + SWATCH >= baseline {
            break;
        }
        fill_rect(&mut img, legend_x - 1, y - 1, SWATCH + 2, SWATCH + 2, AXIS);
        fill_rect(&mut img, legend_x, y, SWATCH, SWATCH, lane_color(lane));
        if let Some(font) = font {
            let x = legend_x as i32 - 6 - font.width(company, TICK_PX) as i32;
            font.draw(&mut img, company, TICK_PX, x, y as i32);
        }
    }

    if let Some(font) = font {
        let centre = (PLOT_LEFT + plot_w / 2) as i32;
        font.draw(&mut img, TITLE, TITLE_PX, centre - font.width(TITLE, TITLE_PX) as i32 / 2, 6);
        font.draw(&mut img, X_LABEL, LABEL_PX, centre - font.width(X_LABEL, LABEL_PX) as i32 / 2, baseline as i32 + 16);
        let middle = (PLOT_TOP + plot_h / 2) as i32;
        font.draw_upright(&mut img, Y_LABEL, LABEL_PX, 4, middle + font.width(Y_LABEL, LABEL_PX) as i32 / 2);
    }

    let png = encode_png(&img)?;
    tracing::debug!(
        bars = internships.len(),
        companies = companies.len(),
        labelled = font.is_some(),
        bytes = png.len(),
        "Rendered chart"
    );
    Ok(Some(ChartImage {
        width: WIDTH,
        height: HEIGHT,
        png,
    }))
}

/// Distinct company names in order of first appearance
pub fn company_lanes(internships: &[InternshipSummary]) -> Vec<&str> {
    let mut lanes: Vec<&str> = Vec::new();
    for internship in internships {
        if !lanes.contains(&internship.company_name.as_str()) {
            lanes.push(&internship.company_name);
        }
    }
    lanes
}

/// Axis top and tick step for counts up to `max`.
///
/// Steps are 1, 2 or 5 times a power of ten, chosen so the axis has at
/// most five intervals. Computed in `u64` so the rounded-up top of any
/// `u32` count fits.
pub fn nice_axis(max: u32) -> (u64, u64) {
    if max == 0 {
        return (1, 1);
    }
    let max = u64::from(max);
    let raw = max as f64 / 5.0;
    let mut magnitude = 1u64;
    loop {
        for factor in [1, 2, 5] {
            let step = factor * magnitude;
            if step as f64 >= raw {
                return (max.div_ceil(step) * step, step);
            }
        }
        magnitude *= 10;
    }
}

fn lane_color(lane: usize) -> Rgb<u8> {
    PALETTE[lane % PALETTE.len()]
}

/// Pixel height for `value` on an axis topping out at `axis_max`, never above `span`.
fn scale(value: u64, axis_max: u64, span: u32) -> u32 {
    let h = (value as f64 / axis_max as f64 * f64::from(span)).round() as u32;
    h.min(span)
}

fn fill_rect(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    let x_end = (x + w).min(img.width());
    let y_end = (y + h).min(img.height());
    for py in y..y_end {
        for px in x..x_end {
            img.put_pixel(px, py, color);
        }
    }
}

/// Mix `TEXT` into the pixel at (`x`, `y`) by glyph coverage; off-canvas points are dropped.
fn blend(img: &mut RgbImage, x: i32, y: i32, coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= img.width() || y as u32 >= img.height() || coverage <= 0.0 {
        return;
    }
    let pixel = img.get_pixel_mut(x as u32, y as u32);
    let a = coverage.min(1.0);
    for (channel, ink) in pixel.0.iter_mut().zip(TEXT.0) {
        *channel = (f32::from(*channel) * (1.0 - a) + f32::from(ink) * a).round() as u8;
    }
}

fn encode_png(img: &RgbImage) -> Result<Vec<u8>> {
    let (w, h) = img.dimensions();
    let mut bytes = Vec::new();
    {
        let mut encoder = PngEncoder::new(&mut bytes, w, h);
        encoder.set_color(PngColorType::Rgb);
        encoder.set_depth(PngBitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(img.as_raw())?;
        writer.finish()?;
    }
    if bytes.is_empty() {
        return Err(Error::Chart("encoder produced no data".to_string()));
    }
    Ok(bytes)
}
