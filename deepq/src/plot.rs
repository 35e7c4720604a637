//! Plots of training progress and feature embeddings.
use anyhow::{anyhow, Result};
use log::info;
use plotters::prelude::*;
use std::{ops::Range, path::Path};

const SIZE: (u32, u32) = (800, 600);

fn padded(min: f32, max: f32) -> Range<f32> {
    let pad = if max > min { (max - min) * 0.05 } else { 1.0 };
    (min - pad)..(max + pad)
}

/// Ranges of the axes covering all points with a small margin.
pub fn axis_ranges(points: &[(f32, f32)]) -> (Range<f32>, Range<f32>) {
    let (mut x0, mut x1, mut y0, mut y1) = (f32::MAX, f32::MIN, f32::MAX, f32::MIN);
    for (x, y) in points.iter() {
        x0 = x0.min(*x);
        x1 = x1.max(*x);
        y0 = y0.min(*y);
        y1 = y1.max(*y);
    }
    if points.is_empty() {
        return (0.0..1.0, 0.0..1.0);
    }
    (padded(x0, x1), padded(y0, y1))
}

/// Maps `v` in `[min, max]` to a color from blue (low) to red (high).
pub fn heat_color(v: f32, min: f32, max: f32) -> HSLColor {
    let t = if max > min {
        ((v - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        0.5
    };
    HSLColor(0.66 * (1.0 - t as f64), 0.9, 0.5)
}

/// Draws the mean reward of the last episodes against the episode.
pub fn plot_rewards(points: &[(usize, f32)], path: impl AsRef<Path>) -> Result<()> {
    let points = points
        .iter()
        .map(|(e, r)| (*e as f32, *r))
        .collect::<Vec<_>>();
    let (xs, ys) = axis_ranges(&points);
    let root = BitMapBackend::new(path.as_ref(), SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Mean reward", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(xs, ys)
        .map_err(|e| anyhow!("{:?}", e))?;
    chart
        .configure_mesh()
        .x_desc("Episode")
        .y_desc("Reward")
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;
    chart
        .draw_series(LineSeries::new(points.iter().cloned(), &BLUE))
        .map_err(|e| anyhow!("{:?}", e))?;
    chart
        .draw_series(points.iter().map(|p| Circle::new(*p, 3, BLUE.filled())))
        .map_err(|e| anyhow!("{:?}", e))?;

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    info!("Saved reward plot to {:?}", path.as_ref());
    Ok(())
}

/// Draws 2D points colored by value.
pub fn plot_scatter(points: &[(f32, f32)], values: &[f32], path: impl AsRef<Path>) -> Result<()> {
    let (xs, ys) = axis_ranges(points);
    let (vmin, vmax) = values
        .iter()
        .fold((f32::MAX, f32::MIN), |(a, b), v| (a.min(*v), b.max(*v)));
    let root = BitMapBackend::new(path.as_ref(), SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Features colored by max Q", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(xs, ys)
        .map_err(|e| anyhow!("{:?}", e))?;
    chart
        .configure_mesh()
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;
    chart
        .draw_series(
            points
                .iter()
                .zip(values.iter())
                .map(|(p, v)| Circle::new(*p, 3, heat_color(*v, vmin, vmax).filled())),
        )
        .map_err(|e| anyhow!("{:?}", e))?;

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    info!("Saved scatter plot to {:?}", path.as_ref());
    Ok(())
}
