// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Chart rendering.
//!
//! Charts are rendered to in-memory images and embedded in the page as
//! `data:` URIs, so concurrent requests never share an artifact.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use plotters::prelude::*;
use std::ops::Range;

use crate::models::activity::format_number;
use crate::models::MetricSeries;

/// A line chart of `y` against `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x: MetricSeries,
    pub y: MetricSeries,
}

impl LineChart {
    /// Paired points, truncated to the shorter series. Non-finite samples
    /// are skipped.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.x
            .values()
            .iter()
            .zip(self.y.values())
            .map(|(&x, &y)| (x, y))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect()
    }
}

/// An encoded image held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImage {
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl ChartImage {
    /// `data:` URI suitable for an `<img src>`.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

/// Pluggable chart backend.
pub trait ChartRenderer: Send + Sync {
    fn render(&self, chart: &LineChart) -> anyhow::Result<ChartImage>;
}

/// Renders charts as standalone SVG documents with `plotters`.
#[derive(Debug, Clone, Copy)]
pub struct SvgChartRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for SvgChartRenderer {
    fn default() -> Self {
        Self {
            width: 640,
            height: 400,
        }
    }
}

const LINE_COLOR: RGBColor = RGBColor(0xfc, 0x4c, 0x02);
const FONT: &str = "sans-serif";

impl ChartRenderer for SvgChartRenderer {
    fn render(&self, chart: &LineChart) -> anyhow::Result<ChartImage> {
        let points = chart.points();
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (self.width, self.height))
                .into_drawing_area();
            root.fill(&WHITE)?;

            let x_range = axis_range(points.iter().map(|p| p.0));
            let y_range = axis_range(points.iter().map(|p| p.1));
            let mut ctx = ChartBuilder::on(&root)
                .caption(chart.title.as_str(), (FONT, 18))
                .margin(12)
                .x_label_area_size(40)
                .y_label_area_size(56)
                .build_cartesian_2d(x_range, y_range)?;

            ctx.configure_mesh()
                .x_desc(chart.x_label.as_str())
                .y_desc(chart.y_label.as_str())
                .x_label_formatter(&|x| format_number(*x))
                .y_label_formatter(&|y| format_number(*y))
                .draw()?;

            if points.is_empty() {
                let center = (self.width as i32 / 2, self.height as i32 / 2);
                root.draw(&Text::new("No data", center, (FONT, 14).into_font()))?;
            } else {
                ctx.draw_series(LineSeries::new(points, LINE_COLOR.stroke_width(2)))?;
            }
            root.present()?;
        }

        Ok(ChartImage {
            mime: "image/svg+xml",
            bytes: svg.into_bytes(),
        })
    }
}

/// Axis extent covering `values`, widened when empty or degenerate.
fn axis_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        0.0..1.0
    } else if max > min {
        min..max
    } else {
        min - 1.0..max + 1.0
    }
}
