// src/visualisation.rs

use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::{LtemError, Result};
use crate::kde::gray_level;
use crate::pipeline::{FigureSink, LtemFigure};
use crate::vec2::{angle, norm, perp};

/// Pixel size of one panel; the combined figure puts two side by side.
const PANEL_PX: u32 = 700;

/// Shaft width as a fraction of the panel width.
const ARROW_WIDTH: f64 = 0.004;

/// Map a density to grey, clipped to [vmin, vmax] (black = vmin).
fn density_to_gray(v: f64, vmin: f64, vmax: f64) -> RGBColor {
    let g = (255.0 * gray_level(v, vmin, vmax)).round() as u8;
    RGBColor(g, g, g)
}

/// Hue for an in-plane direction. The full circle [-pi, pi] is always
/// mapped onto [0, 1] so every texture shares one colour wheel.
pub fn direction_to_hue(theta: f64) -> HSLColor {
    let h = ((theta + std::f64::consts::PI) / std::f64::consts::TAU).clamp(0.0, 1.0);
    HSLColor(h, 1.0, 0.5)
}

/// Outline of a mid-pivoted arrow for vector `v` anchored at `pos`.
///
/// `length_per_unit` converts moment magnitude to data units; `width` is the
/// shaft width in data units. Returns `None` for zero or non-finite vectors.
pub fn arrow_polygon(
    pos: (f64, f64),
    v: [f64; 2],
    length_per_unit: f64,
    width: f64,
) -> Option<Vec<(f64, f64)>> {
    let m = norm(v);
    if !(m.is_finite() && m > 0.0) {
        return None;
    }
    let u = [v[0] / m, v[1] / m];
    let n = perp(u);
    let len = m * length_per_unit;

    // Head shrinks with the arrow once the arrow is shorter than the head.
    let head_len = (5.0 * width).min(len);
    let shrink = head_len / (5.0 * width);
    let shaft = 0.5 * width * shrink;
    let head = 1.5 * width * shrink;

    let at = |along: f64, across: f64| {
        (
            pos.0 + u[0] * along + n[0] * across,
            pos.1 + u[1] * along + n[1] * across,
        )
    };
    let tail = -0.5 * len;
    let tip = 0.5 * len;
    let neck = tip - head_len;

    Some(vec![
        at(tail, shaft),
        at(neck, shaft),
        at(neck, head),
        at(tip, 0.0),
        at(neck, -head),
        at(neck, -shaft),
        at(tail, -shaft),
    ])
}

/// Whether an arrow anchored at `pos` can reach the square `[-d, d]^2`.
/// Arrows extend half their length either side of the anchor.
fn reaches_view(pos: (f64, f64), v: [f64; 2], length_per_unit: f64, d: f64) -> bool {
    let reach = d + 0.5 * norm(v) * length_per_unit;
    pos.0.abs() <= reach && pos.1.abs() <= reach
}

/// Clip a polygon to the square `[-d, d]^2` (Sutherland-Hodgman, one edge
/// of the square at a time). Returns `None` when nothing is left.
pub fn clip_to_view(poly: Vec<(f64, f64)>, d: f64) -> Option<Vec<(f64, f64)>> {
    // (axis, sign): keep points with sign * p[axis] <= d
    const EDGES: [(usize, f64); 4] = [(0, 1.0), (0, -1.0), (1, 1.0), (1, -1.0)];
    let coord = |p: (f64, f64), axis: usize| if axis == 0 { p.0 } else { p.1 };

    let mut out = poly;
    for (axis, sign) in EDGES {
        if out.is_empty() {
            break;
        }
        let inside = |p: (f64, f64)| sign * coord(p, axis) <= d;
        let cross = |a: (f64, f64), b: (f64, f64)| {
            let t = (sign * d - coord(a, axis)) / (coord(b, axis) - coord(a, axis));
            (a.0 + t * (b.0 - a.0), a.1 + t * (b.1 - a.1))
        };

        let input = std::mem::take(&mut out);
        let mut prev = input[input.len() - 1];
        for &cur in &input {
            match (inside(prev), inside(cur)) {
                (true, true) => out.push(cur),
                (true, false) => out.push(cross(prev, cur)),
                (false, true) => {
                    out.push(cross(prev, cur));
                    out.push(cur);
                }
                (false, false) => {}
            }
            prev = cur;
        }
    }
    (out.len() >= 3).then_some(out)
}

/// Grey-scale LTEM contrast: one filled cell per density-mesh node.
pub fn draw_contrast_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    figure: &LtemFigure,
) -> std::result::Result<(), Box<dyn std::error::Error>>
where
    DB::ErrorType: 'static,
{
    let c = figure.params.contrast;
    let d = c.view;
    area.fill(&BLACK)?;

    let mut chart = ChartBuilder::on(area)
        .margin(0)
        .build_cartesian_2d(-d..d, -d..d)?;

    let map = &figure.density;
    let (dx, dy) = map.grid.spacing();
    let (hx, hy) = (0.5 * dx, 0.5 * dy);

    chart.draw_series((0..map.grid.ny).flat_map(|j| {
        (0..map.grid.nx).filter_map(move |i| {
            let (x, y) = map.grid.coord(i, j);
            if x + hx < -d || x - hx > d || y + hy < -d || y - hy > d {
                return None;
            }
            let color = density_to_gray(map.value(i, j), c.vmin, c.vmax);
            Some(Rectangle::new(
                [
                    ((x - hx).max(-d), (y - hy).max(-d)),
                    ((x + hx).min(d), (y + hy).min(d)),
                ],
                color.filled(),
            ))
        })
    }))?;

    Ok(())
}

/// HSV-coloured arrows on black, every `skip`-th node. Arrows that stick
/// out of the view are cut at its edge, not dropped.
pub fn draw_quiver_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    figure: &LtemFigure,
) -> std::result::Result<(), Box<dyn std::error::Error>>
where
    DB::ErrorType: 'static,
{
    let q = figure.params.quiver;
    let d = q.view;
    area.fill(&BLACK)?;

    let mut chart = ChartBuilder::on(area)
        .margin(0)
        .build_cartesian_2d(-d..d, -d..d)?;

    let panel_width = 2.0 * d;
    let length_per_unit = panel_width / q.scale;
    let width = ARROW_WIDTH * panel_width;

    let samples = figure.field.subsample(q.skip);
    chart.draw_series(
        samples
            .positions
            .iter()
            .zip(&samples.vectors)
            .filter(|&(&pos, &v)| reaches_view(pos, v, length_per_unit, d))
            .filter_map(|(&pos, &v)| {
                let outline = arrow_polygon(pos, v, length_per_unit, width)?;
                let outline = clip_to_view(outline, d)?;
                Some(Polygon::new(outline, direction_to_hue(angle(v)).filled()))
            }),
    )?;

    Ok(())
}

/// Contrast (left) and moment map (right) in one PNG.
pub fn save_ltem_figure(
    figure: &LtemFigure,
    filename: &Path,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(filename, (2 * PANEL_PX, PANEL_PX)).into_drawing_area();
    root.fill(&BLACK)?;

    let (left, right) = root.split_horizontally(PANEL_PX);
    draw_contrast_panel(&left, figure)?;
    draw_quiver_panel(&right, figure)?;

    root.present()?;
    Ok(())
}

/// Contrast panel on its own.
pub fn save_contrast_plot(
    figure: &LtemFigure,
    filename: &Path,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(filename, (PANEL_PX, PANEL_PX)).into_drawing_area();
    draw_contrast_panel(&root, figure)?;
    root.present()?;
    Ok(())
}

/// Moment-map panel on its own.
pub fn save_quiver_plot(
    figure: &LtemFigure,
    filename: &Path,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(filename, (PANEL_PX, PANEL_PX)).into_drawing_area();
    draw_quiver_panel(&root, figure)?;
    root.present()?;
    Ok(())
}

/// Writes the combined figure to a fixed path.
#[derive(Debug, Clone)]
pub struct PngSink {
    pub path: PathBuf,
    /// Also write the two panels as `<stem>_contrast.png` / `<stem>_quiver.png`.
    pub split_panels: bool,
}

impl PngSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            split_panels: false,
        }
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("figure");
        self.path.with_file_name(format!("{stem}_{suffix}.png"))
    }
}

impl FigureSink for PngSink {
    fn render(&mut self, figure: &LtemFigure) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let render_err = |e: Box<dyn std::error::Error>| LtemError::Render(e.to_string());

        save_ltem_figure(figure, &self.path).map_err(render_err)?;
        if self.split_panels {
            save_contrast_plot(figure, &self.sibling("contrast")).map_err(render_err)?;
            save_quiver_plot(figure, &self.sibling("quiver")).map_err(render_err)?;
        }
        tracing::info!(path = %self.path.display(), "wrote figure");
        Ok(())
    }
}
