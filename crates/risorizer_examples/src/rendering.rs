//! Rasterizing outlines to PNG for the examples.
use std::path::Path;

use glam::DVec2;
use image::{Rgb, RgbImage};
use risorizer::geometry::{Bounds, Outline};
use tracing::info;

/// Route `tracing` records through `env_logger`, defaulting to `info`.
pub fn init_tracing() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// How outlines map onto an image.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    /// Domain area shown in the image.
    pub bounds: Bounds,
    pub background: [u8; 3],
    pub ink: [u8; 3],
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32), bounds: Bounds) -> Self {
        Self {
            image_size,
            bounds,
            background: [245, 240, 228],
            ink: [32, 64, 160],
        }
    }

    /// Fit `bounds` with a margin around it.
    pub fn fit(image_size: (u32, u32), bounds: Bounds, margin: f64) -> Self {
        Self::new(
            image_size,
            Bounds::new(
                bounds.left - margin,
                bounds.bottom - margin,
                bounds.width + 2.0 * margin,
                bounds.height + 2.0 * margin,
            ),
        )
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn with_ink(mut self, ink: [u8; 3]) -> Self {
        self.ink = ink;
        self
    }

    fn scale(&self) -> f64 {
        let sx = self.image_size.0 as f64 / self.bounds.width.max(f64::EPSILON);
        let sy = self.image_size.1 as f64 / self.bounds.height.max(f64::EPSILON);
        sx.min(sy)
    }

    /// Domain position of the center of pixel `(px, py)`. Font y points up, image y down.
    fn pixel_to_domain(&self, px: f64, py: f64) -> DVec2 {
        let s = self.scale();
        DVec2::new(
            self.bounds.left + (px + 0.5) / s,
            self.bounds.top() - (py + 0.5) / s,
        )
    }

    fn domain_to_pixel(&self, p: DVec2) -> (i64, i64) {
        let s = self.scale();
        (
            ((p.x - self.bounds.left) * s).floor() as i64,
            ((self.bounds.top() - p.y) * s).floor() as i64,
        )
    }
}

/// Fill `outline` with the nonzero rule using one scanline per pixel row.
pub fn render_outline(outline: &Outline, rc: &RenderConfig) -> RgbImage {
    let (w, h) = rc.image_size;
    let mut img = RgbImage::from_pixel(w, h, Rgb(rc.background));
    let edges: Vec<(DVec2, DVec2)> = outline.contours.iter().flat_map(|c| c.edges()).collect();

    let mut crossings: Vec<(f64, i32)> = Vec::new();
    for py in 0..h {
        let y = rc.pixel_to_domain(0.0, py as f64).y;
        crossings.clear();
        for &(a, b) in &edges {
            let (dir, lo, hi) = if a.y <= b.y { (1, a, b) } else { (-1, b, a) };
            if y < lo.y || y >= hi.y || lo.y == hi.y {
                continue;
            }
            let t = (y - lo.y) / (hi.y - lo.y);
            crossings.push((lo.x + (hi.x - lo.x) * t, dir));
        }
        crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut winding = 0;
        for pair in crossings.windows(2) {
            winding += pair[0].1;
            if winding == 0 {
                continue;
            }
            let (x0, _) = rc.domain_to_pixel(DVec2::new(pair[0].0, y));
            let (x1, _) = rc.domain_to_pixel(DVec2::new(pair[1].0, y));
            for px in x0.max(0)..x1.min(w as i64) {
                img.put_pixel(px as u32, py, Rgb(rc.ink));
            }
        }
    }
    img
}

/// Draw a filled disk marker at domain position `p`.
pub fn mark_point(img: &mut RgbImage, rc: &RenderConfig, p: DVec2, radius: i64, color: [u8; 3]) {
    let (cx, cy) = rc.domain_to_pixel(p);
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy > radius * radius {
                continue;
            }
            let (x, y) = (cx + dx, cy + dy);
            if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
                img.put_pixel(x as u32, y as u32, Rgb(color));
            }
        }
    }
}

pub fn render_outline_to_png(
    outline: &Outline,
    rc: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let path = path.as_ref();
    render_outline(outline, rc).save(path)?;
    info!("Wrote {}.", path.display());
    Ok(())
}
