use std::path::Path;

use glam::Vec2;
use gradientfield_core::{Canvas, Color, Ellipse, Rgba8, BACKGROUND};
use gradientfield_platform::Result;
use tracing::debug;

/// CPU-side RGBA8 surface.
pub struct PixelCanvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![BACKGROUND.to_rgba8(); (width as usize) * (height as usize)],
        }
    }

    /// Reallocate for a new size. Like a browser canvas, this clears the contents.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        debug!(width, height, "pixel canvas resized");
        *self = Self::new(width, height);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[self.index(x, y)])
    }

    pub fn to_image(&self) -> Result<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.as_bytes().to_vec())
            .ok_or_else(|| "pixel buffer does not match canvas size".into())
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.to_image()?.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn blend(&mut self, x: u32, y: u32, color: Color, coverage: f32) {
        if coverage <= 0.0 {
            return;
        }
        let i = self.index(x, y);
        let src = color.with_alpha(color.a * coverage.min(1.0));
        self.pixels[i] = src.over(self.pixels[i].to_color()).to_rgba8();
    }

    /// Pixel-center bounds covering `center ± reach`, clipped to the canvas.
    fn clip(&self, center: Vec2, reach: Vec2) -> Option<(u32, u32, u32, u32)> {
        let lo = (center - reach).floor().max(Vec2::ZERO);
        let hi = (center + reach).ceil().min(Vec2::new(self.width as f32, self.height as f32));
        if lo.x >= hi.x || lo.y >= hi.y {
            return None;
        }
        Some((lo.x as u32, lo.y as u32, hi.x as u32, hi.y as u32))
    }

    fn for_each_in(&mut self, center: Vec2, reach: Vec2, mut paint: impl FnMut(Vec2) -> Option<(Color, f32)>) {
        let Some((x0, y0, x1, y1)) = self.clip(center, reach) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let sample = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if let Some((color, coverage)) = paint(sample) {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }
}

impl Canvas for PixelCanvas {
    fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    fn fill(&mut self, color: Color) {
        for px in &mut self.pixels {
            *px = color.over(px.to_color()).to_rgba8();
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if radius <= 0.0 || color.a <= 0.0 {
            return;
        }
        self.for_each_in(center, Vec2::splat(radius + 1.0), |p| {
            let coverage = (radius + 0.5 - p.distance(center)).clamp(0.0, 1.0);
            Some((color, coverage))
        });
    }

    fn radial_glow(&mut self, center: Vec2, radius: f32, inner: Color) {
        if radius <= 0.0 || inner.a <= 0.0 {
            return;
        }
        self.for_each_in(center, Vec2::splat(radius), |p| {
            let t = p.distance(center) / radius;
            (t < 1.0).then_some((inner, 1.0 - t))
        });
    }

    fn stroke_ellipse(&mut self, ellipse: Ellipse, color: Color, width: f32) {
        let Ellipse {
            center,
            radii,
            rotation,
        } = ellipse;
        if radii.min_element() <= 0.0 || color.a <= 0.0 {
            return;
        }
        let half = width.max(0.0) / 2.0;
        // Inverse rotation takes samples into the ellipse's own frame.
        let (sin, cos) = (-rotation).sin_cos();
        let reach = Vec2::splat(radii.max_element() + half + 1.0);
        self.for_each_in(center, reach, |p| {
            let d = p - center;
            let local = Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos);
            let scaled = local / radii;
            let k = scaled.length();
            if k <= f32::EPSILON {
                return None;
            }
            let gradient = (local / (radii * radii)).length() / k;
            let distance = (k - 1.0).abs() / gradient.max(f32::EPSILON);
            let coverage = (half + 0.5 - distance).clamp(0.0, 1.0);
            (coverage > 0.0).then_some((color, coverage))
        });
    }
}

impl std::fmt::Debug for PixelCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelCanvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    #[test]
    fn starts_as_opaque_background() {
        let canvas = PixelCanvas::new(8, 4);
        assert_eq!(canvas.as_bytes().len(), 8 * 4 * 4);
        assert!(canvas.pixels().iter().all(|px| *px == Rgba8 { r: 3, g: 0, b: 20, a: 255 }));
        assert_eq!(canvas.pixel(8, 0), None);
    }

    #[test]
    fn circle_covers_its_center_only() {
        let mut canvas = PixelCanvas::new(32, 32);
        canvas.fill_circle(Vec2::new(16.0, 16.0), 3.0, WHITE);
        assert_eq!(canvas.pixel(16, 16).unwrap(), Rgba8 { r: 255, g: 255, b: 255, a: 255 });
        assert_eq!(canvas.pixel(16, 24).unwrap(), BACKGROUND.to_rgba8());
        assert_eq!(canvas.pixel(0, 0).unwrap(), BACKGROUND.to_rgba8());
    }

    #[test]
    fn glow_fades_outward() {
        let mut canvas = PixelCanvas::new(64, 64);
        canvas.radial_glow(Vec2::new(32.0, 32.0), 20.0, Color::new(1.0, 0.0, 1.0, 1.0));
        let near = canvas.pixel(32, 32).unwrap().r;
        let mid = canvas.pixel(42, 32).unwrap().r;
        let outside = canvas.pixel(55, 32).unwrap();
        assert!(near > mid);
        assert!(mid > BACKGROUND.to_rgba8().r);
        assert_eq!(outside, BACKGROUND.to_rgba8());
    }

    #[test]
    fn ellipse_stroke_hits_the_rim() {
        let mut canvas = PixelCanvas::new(100, 100);
        let ellipse = Ellipse {
            center: Vec2::new(50.0, 50.0),
            radii: Vec2::new(40.0, 20.0),
            rotation: 0.0,
        };
        canvas.stroke_ellipse(ellipse, WHITE, 2.0);
        assert_eq!(canvas.pixel(89, 49).unwrap().g, 255);
        assert_eq!(canvas.pixel(50, 29).unwrap().g, 255);
        assert_eq!(canvas.pixel(50, 50).unwrap(), BACKGROUND.to_rgba8());

        let mut turned = PixelCanvas::new(100, 100);
        turned.stroke_ellipse(
            Ellipse {
                rotation: std::f32::consts::FRAC_PI_2,
                ..ellipse
            },
            WHITE,
            2.0,
        );
        assert_eq!(turned.pixel(49, 89).unwrap().g, 255);
        assert_eq!(turned.pixel(89, 49).unwrap(), BACKGROUND.to_rgba8());
    }

    #[test]
    fn trail_fill_fades_old_pixels() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.fill_circle(Vec2::new(2.0, 2.0), 4.0, WHITE);
        let lit = canvas.pixel(2, 2).unwrap().g;
        canvas.fill(BACKGROUND.with_alpha(0.12));
        let faded = canvas.pixel(2, 2).unwrap().g;
        assert!(faded < lit);
        assert!(faded > 200);
    }

    #[test]
    fn off_canvas_draws_are_clipped() {
        let mut canvas = PixelCanvas::new(10, 10);
        canvas.fill_circle(Vec2::new(-50.0, -50.0), 5.0, WHITE);
        canvas.radial_glow(Vec2::new(500.0, 5.0), 10.0, WHITE);
        canvas.fill_circle(Vec2::new(0.0, 0.0), 2.0, WHITE);
        assert_eq!(canvas.pixel(0, 0).unwrap().g, 255);
        assert_eq!(canvas.pixel(9, 9).unwrap(), BACKGROUND.to_rgba8());
    }

    #[test]
    fn resize_clears() {
        let mut canvas = PixelCanvas::new(10, 10);
        canvas.fill(WHITE);
        canvas.resize(10, 10);
        assert_eq!(canvas.pixel(5, 5).unwrap().g, 255);
        canvas.resize(20, 5);
        assert_eq!((canvas.width(), canvas.height()), (20, 5));
        assert_eq!(canvas.pixel(5, 4).unwrap(), BACKGROUND.to_rgba8());
    }

    #[test]
    fn writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let mut canvas = PixelCanvas::new(16, 8);
        canvas.fill_circle(Vec2::new(8.0, 4.0), 2.0, WHITE);
        canvas.save_png(&path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (16, 8));
        assert_eq!(decoded.get_pixel(8, 4).0, [255, 255, 255, 255]);
    }
}
