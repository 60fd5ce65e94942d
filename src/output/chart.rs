//! Bar chart images
//!
//! Charts are plain RGB PNGs: a frame, a baseline, light horizontal grid
//! lines and one bar per value. Bar colour follows a cool-to-warm gradient
//! scaled by the bar's share of the largest value. Labels and numbers are
//! laid out by the report next to the image.

use std::path::{Path, PathBuf};
use image::{Rgb, RgbImage};
use log::debug;
use palette::{FromColor, Lch, LinSrgb, Srgb};
use crate::error::{AnalystError, AnalystResult};
use super::chartable::BarChartValue;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([60, 60, 60]);
const GRID: Rgb<u8> = Rgb([225, 225, 225]);
const GRID_LINES: u32 = 4;

/// Pixel size and margins of a rendered chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    /// Fraction of each slot left empty between bars
    pub gap_ratio: f32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
            margin: 40,
            gap_ratio: 0.25,
        }
    }
}

/// Horizontal extent of one bar
#[derive(Debug, Clone, Copy, PartialEq)]
struct BarSlot {
    x_start: u32,
    x_end: u32,
    height: u32,
}

fn layout(values: &[BarChartValue], style: &ChartStyle) -> Vec<BarSlot> {
    let plot_width = style.width.saturating_sub(2 * style.margin);
    let plot_height = style.height.saturating_sub(2 * style.margin);
    if values.is_empty() || plot_width == 0 || plot_height == 0 {
        return Vec::new();
    }

    let max_value = values.iter().map(|v| v.value).max().unwrap_or(0).max(1);
    let slot_width = plot_width as f32 / values.len() as f32;
    let gap = slot_width * style.gap_ratio.clamp(0.0, 0.9) / 2.0;

    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let slot_start = style.margin as f32 + i as f32 * slot_width;
            let x_start = (slot_start + gap).round() as u32;
            let x_end = ((slot_start + slot_width - gap).round() as u32).max(x_start + 1);
            let height = ((v.value as f32 / max_value as f32) * plot_height as f32).round() as u32;
            BarSlot { x_start, x_end, height }
        })
        .collect()
}

/// Cool-to-warm gradient for a share in 0..=1
fn bar_color(share: f32) -> Rgb<u8> {
    let stops: Vec<LinSrgb<f32>> = [
        Lch::new(45.0f32, 45.0f32, 250.0f32), // Blue
        Lch::new(60.0f32, 50.0f32, 200.0f32), // Teal
        Lch::new(75.0f32, 80.0f32, 50.0f32),  // Orange
    ]
    .into_iter()
    .map(LinSrgb::from_color)
    .collect();

    let position = share.clamp(0.0, 1.0) * (stops.len() - 1) as f32;
    let idx1 = position.floor() as usize;
    let idx2 = (idx1 + 1).min(stops.len() - 1);
    let t = position.fract();

    let c1 = stops[idx1];
    let c2 = stops[idx2];
    let mixed = LinSrgb::new(
        c1.red + (c2.red - c1.red) * t,
        c1.green + (c2.green - c1.green) * t,
        c1.blue + (c2.blue - c1.blue) * t,
    );

    let srgb: Srgb<f32> = Srgb::from_linear(mixed);
    let (r, g, b) = srgb.into_components();
    Rgb([
        (r.clamp(0.0, 1.0) * 255.0) as u8,
        (g.clamp(0.0, 1.0) * 255.0) as u8,
        (b.clamp(0.0, 1.0) * 255.0) as u8,
    ])
}

fn fill(image: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    let x1 = x1.min(image.width());
    let y1 = y1.min(image.height());
    for y in y0..y1 {
        for x in x0..x1 {
            image.put_pixel(x, y, color);
        }
    }
}

/// Draw a bar chart into a new image
pub fn render_bar_chart(values: &[BarChartValue], style: &ChartStyle) -> RgbImage {
    let mut image = RgbImage::from_pixel(style.width, style.height, BACKGROUND);
    let baseline = style.height.saturating_sub(style.margin);
    let plot_height = style.height.saturating_sub(2 * style.margin);
    let right = style.width.saturating_sub(style.margin);

    for line in 1..=GRID_LINES {
        let y = baseline.saturating_sub(plot_height * line / GRID_LINES);
        fill(&mut image, style.margin, y, right, y + 1, GRID);
    }

    let max_value = values.iter().map(|v| v.value).max().unwrap_or(0).max(1);
    for (slot, value) in layout(values, style).iter().zip(values) {
        let color = bar_color(value.value as f32 / max_value as f32);
        fill(&mut image, slot.x_start, baseline - slot.height, slot.x_end, baseline, color);
    }

    // axes last so bars never cover them
    fill(&mut image, style.margin, baseline, right, baseline + 2, AXIS);
    fill(&mut image, style.margin.saturating_sub(2), style.margin, style.margin, baseline + 2, AXIS);
    image
}

/// Render a chart and save it as `<directory>/chart_<index>.png`
pub fn write_bar_chart(
    values: &[BarChartValue],
    style: &ChartStyle,
    directory: &Path,
    index: usize,
) -> AnalystResult<PathBuf> {
    let path = directory.join(format!("chart_{}.png", index));
    let image = render_bar_chart(values, style);
    image
        .save(&path)
        .map_err(|e| AnalystError::output(format!("Failed to save chart {}: {}", path.display(), e)))?;
    debug!("Wrote chart with {} bars to {}", values.len(), path.display());
    Ok(path)
}
