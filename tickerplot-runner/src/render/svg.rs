//! Standalone SVG line and bar charts for an OHLC series.

use std::fmt::Write as _;

use tickerplot_core::domain::{PriceField, PriceSeries};

use super::ChartKind;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 500.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 110.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 90.0;
const Y_TICKS: usize = 5;
/// Above this many bars only every n-th date label is drawn.
const MAX_X_LABELS: usize = 40;
const LABEL_ROTATION_DEG: f64 = 20.0;

const PALETTE: [&str; 4] = ["#F44336", "#3F51B5", "#009688", "#FFC107"];

/// Chart layout for one series.
pub struct SvgChart<'a> {
    series: &'a PriceSeries,
    kind: ChartKind,
    title: String,
    y_title: &'static str,
}

impl<'a> SvgChart<'a> {
    pub fn new(series: &'a PriceSeries, kind: ChartKind) -> Self {
        Self {
            series,
            kind,
            title: format!("Stock Data for {}", series.symbol),
            y_title: "Price (USD)",
        }
    }

    fn plot_width() -> f64 {
        WIDTH - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn plot_height() -> f64 {
        HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
    }

    /// Padded (min, max) over all finite prices; `(0, 1)` for an empty series.
    fn value_range(&self) -> (f64, f64) {
        let values = self
            .series
            .bars
            .iter()
            .flat_map(|b| PriceField::ALL.map(|f| f.value(b)))
            .filter(|v| v.is_finite());

        let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if !lo.is_finite() {
            return (0.0, 1.0);
        }
        if (hi - lo).abs() < f64::EPSILON {
            return (lo - 1.0, hi + 1.0);
        }
        let pad = (hi - lo) * 0.05;
        (lo - pad, hi + pad)
    }

    fn y_of(value: f64, (lo, hi): (f64, f64)) -> f64 {
        MARGIN_TOP + Self::plot_height() * (1.0 - (value - lo) / (hi - lo))
    }

    /// Horizontal center of slot `i` out of `n`.
    fn x_of(i: usize, n: usize) -> f64 {
        MARGIN_LEFT + Self::plot_width() * (i as f64 + 0.5) / n as f64
    }

    pub fn render(&self) -> String {
        let range = self.value_range();
        let mut svg = String::new();

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif">"#
        );
        let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
        let _ = writeln!(
            svg,
            r#"<text class="title" x="{:.1}" y="28" text-anchor="middle" font-size="18">{}</text>"#,
            WIDTH / 2.0,
            escape(&self.title)
        );

        self.render_axes(&mut svg, range);

        if self.series.is_empty() {
            let _ = writeln!(
                svg,
                r##"<text class="no-data" x="{:.1}" y="{:.1}" text-anchor="middle" font-size="16" fill="#999">No data</text>"##,
                MARGIN_LEFT + Self::plot_width() / 2.0,
                MARGIN_TOP + Self::plot_height() / 2.0
            );
        } else {
            match self.kind {
                ChartKind::Line => self.render_lines(&mut svg, range),
                ChartKind::Bar => self.render_bars(&mut svg, range),
            }
        }

        self.render_legend(&mut svg);
        svg.push_str("</svg>\n");
        svg
    }

    fn render_axes(&self, svg: &mut String, range: (f64, f64)) {
        let x0 = MARGIN_LEFT;
        let x1 = MARGIN_LEFT + Self::plot_width();
        let y_bottom = MARGIN_TOP + Self::plot_height();

        // Y grid + tick labels
        for t in 0..=Y_TICKS {
            let value = range.0 + (range.1 - range.0) * t as f64 / Y_TICKS as f64;
            let y = Self::y_of(value, range);
            let _ = writeln!(
                svg,
                r##"<line x1="{x0:.1}" y1="{y:.1}" x2="{x1:.1}" y2="{y:.1}" stroke="#e0e0e0"/>"##
            );
            let _ = writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" text-anchor="end" font-size="11">{value:.2}</text>"#,
                x0 - 6.0,
                y + 4.0
            );
        }

        let _ = writeln!(
            svg,
            r#"<line x1="{x0:.1}" y1="{MARGIN_TOP:.1}" x2="{x0:.1}" y2="{y_bottom:.1}" stroke="black"/>"#
        );
        let _ = writeln!(
            svg,
            r#"<line x1="{x0:.1}" y1="{y_bottom:.1}" x2="{x1:.1}" y2="{y_bottom:.1}" stroke="black"/>"#
        );

        let y_mid = MARGIN_TOP + Self::plot_height() / 2.0;
        let _ = writeln!(
            svg,
            r#"<text class="y-title" x="18" y="{y_mid:.1}" transform="rotate(-90 18 {y_mid:.1})" text-anchor="middle" font-size="13">{}</text>"#,
            self.y_title
        );

        // X labels, thinned for long series
        let labels = self.series.date_labels();
        let n = labels.len();
        let step = n.div_ceil(MAX_X_LABELS).max(1);
        for (i, label) in labels.iter().enumerate().step_by(step) {
            let x = Self::x_of(i, n);
            let y = y_bottom + 14.0;
            let _ = writeln!(
                svg,
                r#"<text class="x-label" x="{x:.1}" y="{y:.1}" transform="rotate({LABEL_ROTATION_DEG} {x:.1} {y:.1})" font-size="10">{label}</text>"#
            );
        }
    }

    fn render_lines(&self, svg: &mut String, range: (f64, f64)) {
        let n = self.series.len();
        for (field, color) in PriceField::ALL.iter().zip(PALETTE) {
            let points: Vec<String> = self
                .series
                .column(*field)
                .iter()
                .enumerate()
                .filter(|(_, v)| v.is_finite())
                .map(|(i, v)| format!("{:.1},{:.1}", Self::x_of(i, n), Self::y_of(*v, range)))
                .collect();
            let _ = writeln!(
                svg,
                r#"<polyline class="series" data-series="{}" fill="none" stroke="{color}" stroke-width="1.5" points="{}"/>"#,
                field.label(),
                points.join(" ")
            );
        }
    }

    fn render_bars(&self, svg: &mut String, range: (f64, f64)) {
        let n = self.series.len();
        let slot = Self::plot_width() / n as f64;
        let bar_w = slot * 0.8 / PriceField::ALL.len() as f64;
        let baseline = MARGIN_TOP + Self::plot_height();

        for (k, (field, color)) in PriceField::ALL.iter().zip(PALETTE).enumerate() {
            let _ = writeln!(svg, r#"<g class="series" data-series="{}" fill="{color}">"#, field.label());
            for (i, v) in self.series.column(*field).iter().enumerate() {
                if !v.is_finite() {
                    continue;
                }
                let x = MARGIN_LEFT + slot * i as f64 + slot * 0.1 + bar_w * k as f64;
                let y = Self::y_of(*v, range);
                let _ = writeln!(
                    svg,
                    r#"<rect x="{x:.2}" y="{y:.2}" width="{bar_w:.2}" height="{:.2}"/>"#,
                    (baseline - y).max(0.0)
                );
            }
            svg.push_str("</g>\n");
        }
    }

    fn render_legend(&self, svg: &mut String) {
        let x = WIDTH - MARGIN_RIGHT + 16.0;
        for (k, (field, color)) in PriceField::ALL.iter().zip(PALETTE).enumerate() {
            let y = MARGIN_TOP + 20.0 * k as f64;
            let _ = writeln!(
                svg,
                r#"<rect x="{x:.1}" y="{y:.1}" width="12" height="12" fill="{color}"/>"#
            );
            let _ = writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" font-size="12">{}</text>"#,
                x + 18.0,
                y + 10.0,
                field.label()
            );
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
