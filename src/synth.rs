//! Procedural synthesis of the base icon raster.
//!
//! The icon is drawn entirely from geometry: a rounded-rectangle canvas
//! filled with a diagonal gradient, a white hub-and-spoke graph motif, and
//! a translucent eight-point star on top. No vector assets are involved;
//! every shape is rasterized pixel by pixel so the output is deterministic
//! for a given size and palette.

use crate::error::IconError;
use image::{Rgba, RgbaImage};

/// Reference edge length the geometric constants were designed against.
pub const DESIGN_SIZE: u32 = 1024;

/// The eight spoke directions, in degrees.
pub const SPOKE_ANGLES: [f32; 8] = [0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0];

/// Colors used by the compositor and the motif renderer.
///
/// Carried as a value rather than module globals so that canvases for
/// several sizes can be generated concurrently without shared state.
#[derive(Debug, Clone)]
pub struct Palette {
    /// Gradient color at the top-left corner.
    pub gradient_start: Rgba<u8>,
    /// Gradient color at the bottom-right corner.
    pub gradient_end: Rgba<u8>,
    /// Hub, spoke and node color.
    pub foreground: Rgba<u8>,
    /// Translucent tint of the star overlay.
    pub star_tint: Rgba<u8>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            gradient_start: Rgba([99, 102, 241, 255]),
            gradient_end: Rgba([79, 70, 229, 255]),
            foreground: Rgba([255, 255, 255, 255]),
            star_tint: Rgba([99, 102, 241, 200]),
        }
    }
}

impl Palette {
    /// Linearly interpolate the gradient endpoints at `progress` in [0, 1).
    /// Interpolation happens per channel in display space; alpha is opaque.
    fn gradient_at(&self, progress: f32) -> Rgba<u8> {
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * progress) as u8;
        Rgba([
            mix(self.gradient_start[0], self.gradient_end[0]),
            mix(self.gradient_start[1], self.gradient_end[1]),
            mix(self.gradient_start[2], self.gradient_end[2]),
            255,
        ])
    }
}

/// Motif dimensions for a given canvas edge length.
///
/// Every field scales linearly with `size`, so the rendered motif keeps the
/// same proportions at any requested resolution.
#[derive(Debug, Clone, Copy)]
pub struct Geometry {
    pub hub_radius: f32,
    pub node_radius: f32,
    pub line_width: f32,
    pub connection_distance: f32,
    pub star_outer_radius: f32,
    pub star_inner_radius: f32,
}

impl Geometry {
    pub fn for_size(size: u32) -> Self {
        let scale = size as f32 / DESIGN_SIZE as f32;
        let star_outer_radius = 20.0 * scale;
        Self {
            hub_radius: 45.0 * scale,
            node_radius: 30.0 * scale,
            line_width: 8.0 * scale,
            connection_distance: 160.0 * scale,
            star_outer_radius,
            star_inner_radius: star_outer_radius * 0.3,
        }
    }
}

/// Build the rounded-rectangle gradient canvas for the given edge length.
///
/// Pixels in one of the four corner squares that fall outside the inscribed
/// corner circle stay fully transparent; everything else gets the diagonal
/// gradient. Pixels exactly on a corner circle count as inside and are
/// painted.
pub fn compose(size: u32, palette: &Palette) -> Result<RgbaImage, IconError> {
    if size == 0 {
        return Err(IconError::InvalidDimension(size as i64));
    }

    let corner = (0.18 * size as f64) as i64;
    // RgbaImage::new zeroes the buffer, so the canvas starts transparent.
    let mut canvas = RgbaImage::new(size, size);

    for y in 0..size {
        for x in 0..size {
            if outside_rounded_rect(x as i64, y as i64, size as i64, corner) {
                continue;
            }
            let progress = (x + y) as f32 / (2 * size) as f32;
            canvas.put_pixel(x, y, palette.gradient_at(progress));
        }
    }

    Ok(canvas)
}

/// True when `(x, y)` lies in a corner square but outside its rounded arc.
fn outside_rounded_rect(x: i64, y: i64, edge: i64, corner: i64) -> bool {
    let sq = |v: i64| v * v;
    let r2 = corner * corner;

    if x < corner && y < corner {
        sq(x - corner) + sq(y - corner) > r2
    } else if x > edge - corner && y < corner {
        sq(x - (edge - corner)) + sq(y - corner) > r2
    } else if x < corner && y > edge - corner {
        sq(x - corner) + sq(y - (edge - corner)) > r2
    } else if x > edge - corner && y > edge - corner {
        sq(x - (edge - corner)) + sq(y - (edge - corner)) > r2
    } else {
        false
    }
}

/// Draw the hub, the eight trimmed spokes with their node discs, and the
/// translucent star onto an already-composed canvas.
///
/// Z-order matters: hub first, then per angle the connector line followed by
/// the node disc, and the star last so it blends over everything beneath it.
pub fn render_motif(canvas: &mut RgbaImage, geometry: &Geometry, palette: &Palette) {
    let center = (canvas.width() / 2) as f32;

    fill_disc(canvas, center, center, geometry.hub_radius, palette.foreground);

    for angle in SPOKE_ANGLES {
        let rad = angle.to_radians();
        let (dx, dy) = (rad.cos(), rad.sin());
        let node_x = center + geometry.connection_distance * dx;
        let node_y = center + geometry.connection_distance * dy;

        // Trim the connector so it touches both discs without crossing them.
        draw_line(
            canvas,
            (center + geometry.hub_radius * dx, center + geometry.hub_radius * dy),
            (node_x - geometry.node_radius * dx, node_y - geometry.node_radius * dy),
            geometry.line_width,
            palette.foreground,
        );
        fill_disc(canvas, node_x, node_y, geometry.node_radius, palette.foreground);
    }

    let star = star_vertices(
        center,
        center,
        geometry.star_outer_radius,
        geometry.star_inner_radius,
    );
    fill_polygon(canvas, &star, palette.star_tint);
}

/// Vertices of the eight-point star, alternating between the outer and inner
/// radius. Vertex 0 points straight up.
pub fn star_vertices(cx: f32, cy: f32, outer: f32, inner: f32) -> [(f32, f32); 8] {
    let mut points = [(0.0f32, 0.0f32); 8];
    for (i, point) in points.iter_mut().enumerate() {
        let radius = if i % 2 == 0 { outer } else { inner };
        let rad = (i as f32 * 45.0 - 90.0).to_radians();
        *point = (cx + radius * rad.cos(), cy + radius * rad.sin());
    }
    points
}

fn clamped_bbox(canvas: &RgbaImage, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> (u32, u32, u32, u32) {
    let clamp = |v: f32, hi: u32| (v as i64).clamp(0, hi as i64 - 1) as u32;
    (
        clamp(min_x.floor(), canvas.width()),
        clamp(min_y.floor(), canvas.height()),
        clamp(max_x.ceil(), canvas.width()),
        clamp(max_y.ceil(), canvas.height()),
    )
}

/// Opaque filled disc; pixels on the boundary circle are included.
fn fill_disc(canvas: &mut RgbaImage, cx: f32, cy: f32, radius: f32, color: Rgba<u8>) {
    let (x0, y0, x1, y1) = clamped_bbox(canvas, cx - radius, cy - radius, cx + radius, cy + radius);
    let r2 = radius * radius;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            if dx * dx + dy * dy <= r2 {
                canvas.put_pixel(x, y, color);
            }
        }
    }
}

/// Opaque line segment of the given stroke width, drawn as the set of pixels
/// within half a stroke of the segment.
fn draw_line(canvas: &mut RgbaImage, from: (f32, f32), to: (f32, f32), width: f32, color: Rgba<u8>) {
    let half = width / 2.0;
    let (x0, y0, x1, y1) = clamped_bbox(
        canvas,
        from.0.min(to.0) - half,
        from.1.min(to.1) - half,
        from.0.max(to.0) + half,
        from.1.max(to.1) + half,
    );
    let (vx, vy) = (to.0 - from.0, to.1 - from.1);
    let len2 = vx * vx + vy * vy;

    for y in y0..=y1 {
        for x in x0..=x1 {
            let (px, py) = (x as f32 - from.0, y as f32 - from.1);
            let t = if len2 > 0.0 {
                ((px * vx + py * vy) / len2).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let dx = px - t * vx;
            let dy = py - t * vy;
            if dx * dx + dy * dy <= half * half {
                canvas.put_pixel(x, y, color);
            }
        }
    }
}

/// Fill a polygon with a translucent color, source-over blended onto the
/// existing pixels. This is the only translucent step in the pipeline.
fn fill_polygon(canvas: &mut RgbaImage, points: &[(f32, f32)], color: Rgba<u8>) {
    let min_x = points.iter().map(|p| p.0).fold(f32::INFINITY, f32::min);
    let min_y = points.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
    let max_x = points.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max);
    let max_y = points.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
    let (x0, y0, x1, y1) = clamped_bbox(canvas, min_x, min_y, max_x, max_y);

    for y in y0..=y1 {
        for x in x0..=x1 {
            if point_in_polygon(x as f32, y as f32, points) {
                blend_pixel(canvas, x, y, color);
            }
        }
    }
}

/// Even-odd crossing test.
fn point_in_polygon(px: f32, py: f32, points: &[(f32, f32)]) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (xi, yi) = points[i];
        let (xj, yj) = points[j];
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Source-over composite of `src` onto the pixel at `(x, y)`.
fn blend_pixel(canvas: &mut RgbaImage, x: u32, y: u32, src: Rgba<u8>) {
    let dst = *canvas.get_pixel(x, y);
    let alpha = src[3] as f32 / 255.0;
    let mix = |s: u8, d: u8| (s as f32 * alpha + d as f32 * (1.0 - alpha)) as u8;
    canvas.put_pixel(
        x,
        y,
        Rgba([
            mix(src[0], dst[0]),
            mix(src[1], dst[1]),
            mix(src[2], dst[2]),
            (src[3] as f32 + dst[3] as f32 * (1.0 - alpha)) as u8,
        ]),
    );
}

/// Compose the canvas and render the motif in one call.
pub fn synthesize(size: u32, palette: &Palette) -> Result<RgbaImage, IconError> {
    let mut canvas = compose(size, palette)?;
    render_motif(&mut canvas, &Geometry::for_size(size), palette);
    Ok(canvas)
}
