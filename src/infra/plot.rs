// ============================================================
// Layer 6 — Confusion Matrix Plot
// ============================================================
// Renders the confusion matrix as a labelled PNG heatmap.
//
// Layout (figsize 8×8 inches → 800×800 px at 100 px/inch):
//
//   ┌─────────────────────────────────────┐
//   │     LogisticRegression Confusion    │  title band
//   │  True label                         │
//   │             ┌─────────┬─────────┐   │
//   │     NORMAL  │   TN    │   FP    │   │  rows    = true label
//   │             ├─────────┼─────────┤   │  columns = predicted label
//   │  SARCASTIC  │   FN    │   TP    │   │
//   │             └─────────┴─────────┘   │
//   │               NORMAL   SARCASTIC    │
//   │                Predicted label      │
//   └─────────────────────────────────────┘
//
// Cell colour runs from white (0) to deep blue (max count); each
// cell carries its count. Text needs a system sans-serif font:
// if none can be loaded the heatmap is still written and the
// missing labels are reported as a warning.
//
// Reference: plotters crate documentation (DrawingArea, Text)

use std::ops::Range;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::domain::error::{Result, TrainerError};
use crate::domain::sample::Label;
use crate::domain::traits::{ConfusionPlot, ConfusionPlotter};
use crate::infra::metrics::ConfusionMatrix;

/// Pixels per figure inch
const DPI: u32 = 100;

/// Fractions of the figure reserved around the grid
const TOP_BAND:    f64 = 0.12;
const BOTTOM_BAND: f64 = 0.14;
const LEFT_BAND:   f64 = 0.18;
const RIGHT_BAND:  f64 = 0.04;

/// Darkest cell colour
const FULL: (u8, u8, u8) = (8, 48, 107);

const FONT: &str = "sans-serif";

pub struct PlottersConfusionPlotter;

impl PlottersConfusionPlotter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlottersConfusionPlotter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfusionPlotter for PlottersConfusionPlotter {
    fn plot_confusion_matrix(&self, plot: &ConfusionPlot<'_>) -> Result<()> {
        let cm = ConfusionMatrix::from_labels(plot.y_true, plot.y_pred);
        tracing::debug!("{}:\n{}", plot.title, cm);

        if let Some(parent) = plot.output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| TrainerError::io(parent, e))?;
        }

        draw_heatmap(&cm, plot).map_err(|e| {
            TrainerError::Plot(format!("'{}': {e}", plot.output_path.display()))
        })?;

        tracing::info!("Saved confusion matrix to '{}'", plot.output_path.display());
        Ok(())
    }
}

type Area<'b> = DrawingArea<BitMapBackend<'b>, plotters::coord::Shift>;

fn draw_heatmap(cm: &ConfusionMatrix, plot: &ConfusionPlot<'_>) -> std::result::Result<(), String> {
    let width  = plot.figsize.0.max(1) * DPI;
    let height = plot.figsize.1.max(1) * DPI;

    let root = BitMapBackend::new(plot.output_path, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| e.to_string())?;

    let band = |size: u32, fraction: f64| (size as f64 * fraction) as i32;
    let grid = root.margin(
        band(height, TOP_BAND),
        band(height, BOTTOM_BAND),
        band(width, LEFT_BAND),
        band(width, RIGHT_BAND),
    );
    let (grid_x, grid_y) = grid.get_pixel_range();

    let classes = Label::ALL;
    let n       = classes.len();
    let cells   = grid.split_evenly((n, n));
    let max     = cm.max_count().max(1) as f64;
    let font_px = (height / 32).max(10);

    let mut counts = Vec::with_capacity(cells.len());
    for (i, cell) in cells.iter().enumerate() {
        let count     = cm.get(classes[i / n], classes[i % n]);
        let intensity = count as f64 / max;

        cell.fill(&shade(intensity)).map_err(|e| e.to_string())?;

        let (w, h) = cell.dim_in_pixel();
        cell.draw(&Rectangle::new(
            [(0, 0), (w as i32 - 1, h as i32 - 1)],
            BLACK.stroke_width(2),
        ))
        .map_err(|e| e.to_string())?;

        counts.push((cell, count, intensity));
    }

    let labels = draw_counts(&counts, font_px)
        .and_then(|_| draw_axes(&root, plot, (grid_x, grid_y), font_px, height));
    if let Err(e) = labels {
        tracing::warn!(
            "Confusion matrix '{}' written without text labels: {}",
            plot.title,
            e
        );
    }

    root.present().map_err(|e| e.to_string())?;
    Ok(())
}

/// Count in the middle of each cell; white ink on dark cells.
fn draw_counts(cells: &[(&Area<'_>, usize, f64)], font_px: u32) -> std::result::Result<(), String> {
    for (cell, count, intensity) in cells {
        let ink = if *intensity > 0.5 { WHITE } else { BLACK };
        let (w, h) = cell.dim_in_pixel();
        cell.draw(&Text::new(
            count.to_string(),
            (w as i32 / 2, h as i32 / 2),
            centered(font_px * 2, &ink),
        ))
        .map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Title, class names along both axes, and the axis captions.
fn draw_axes(
    root:    &Area<'_>,
    plot:    &ConfusionPlot<'_>,
    grid:    (Range<i32>, Range<i32>),
    font_px: u32,
    height:  u32,
) -> std::result::Result<(), String> {
    let (gx, gy) = grid;
    let classes  = Label::ALL;
    let n        = classes.len() as i32;
    let cell_w   = (gx.end - gx.start) / n;
    let cell_h   = (gy.end - gy.start) / n;
    let px       = font_px as i32;

    let mut texts: Vec<(String, (i32, i32), u32)> = vec![
        (plot.title.clone(), ((gx.start + gx.end) / 2, (height as f64 * TOP_BAND / 3.0) as i32), font_px * 3 / 2),
        ("True label".to_string(), (gx.start / 2, gy.start - px), font_px),
        ("Predicted label".to_string(), ((gx.start + gx.end) / 2, gy.end + 3 * px), font_px),
    ];
    for (k, label) in classes.iter().enumerate() {
        let name = plot
            .class_names
            .get(k)
            .cloned()
            .unwrap_or_else(|| label.name().to_string());
        let offset = k as i32;
        texts.push((name.clone(), (gx.start + cell_w * offset + cell_w / 2, gy.end + px), font_px));
        texts.push((name, (gx.start / 2, gy.start + cell_h * offset + cell_h / 2), font_px));
    }

    for (text, at, size) in texts {
        root.draw(&Text::new(text, at, centered(size, &BLACK)))
            .map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn centered(px: u32, color: &RGBColor) -> TextStyle<'static> {
    (FONT, px as f64)
        .into_font()
        .color(color)
        .pos(Pos::new(HPos::Center, VPos::Center))
}

/// Linear blend from white to FULL
fn shade(intensity: f64) -> RGBColor {
    let t = intensity.clamp(0.0, 1.0);
    let mix = |c: u8| (255.0 - (255.0 - c as f64) * t).round() as u8;
    RGBColor(mix(FULL.0), mix(FULL.1), mix(FULL.2))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sample::Label;
    use tempfile::TempDir;

    #[test]
    fn test_shade_endpoints() {
        assert_eq!(shade(0.0), RGBColor(255, 255, 255));
        assert_eq!(shade(1.0), RGBColor(FULL.0, FULL.1, FULL.2));
    }

    #[test]
    fn test_writes_png() {
        let tmp  = TempDir::new().unwrap();
        let path = tmp.path().join("cm.png");
        let y_true = [Label::Normal, Label::Sarcastic, Label::Sarcastic];
        let y_pred = [Label::Normal, Label::Normal, Label::Sarcastic];

        PlottersConfusionPlotter::new()
            .plot_confusion_matrix(&ConfusionPlot {
                y_true:      &y_true,
                y_pred:      &y_pred,
                class_names: Label::class_names(),
                figsize:     (2, 2),
                title:       "test".to_string(),
                output_path: &path,
            })
            .unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_full_size_figure_with_long_title() {
        let tmp  = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("cm.png");
        let y_true = [Label::Sarcastic; 4];
        let y_pred = [Label::Sarcastic, Label::Sarcastic, Label::Normal, Label::Sarcastic];

        PlottersConfusionPlotter::new()
            .plot_confusion_matrix(&ConfusionPlot {
                y_true:      &y_true,
                y_pred:      &y_pred,
                class_names: Label::class_names(),
                figsize:     (8, 8),
                title:       "LogisticRegression Confusion Matrix".to_string(),
                output_path: &path,
            })
            .unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        // IHDR width and height
        assert_eq!(&bytes[16..24], &[0, 0, 3, 32, 0, 0, 3, 32]);
    }
}
