//! Logical RGB raster buffer and compositing operations.
//!
//! A `Canvas` is cheap: renderers regenerate them per content refresh and
//! the scheduler samples them once per tick. All operations mutate in
//! place; only [`Canvas::sample_window`] allocates a new backing buffer.
//!
//! The canvas also implements `embedded_graphics::DrawTarget`, so the mono
//! font and primitive drawing code targets it directly.

use crate::Color;
use crate::text::TextRenderer;
use embedded_graphics::Pixel;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Size};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Canvas {
    /// Create a canvas filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Write one pixel. Out-of-bounds writes are a no-op, never undefined.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = color;
        }
    }

    /// Read one pixel, `None` outside the canvas.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Block-copy `other` with its top-left corner at (x, y), overwriting
    /// everything underneath. Clipped at the edges.
    pub fn paste(&mut self, x: u32, y: u32, other: &Canvas) {
        for sy in 0..other.height {
            for sx in 0..other.width {
                self.set_pixel(
                    x.saturating_add(sx),
                    y.saturating_add(sy),
                    other.pixels[(sy * other.width + sx) as usize],
                );
            }
        }
    }

    /// Copy only non-black pixels of a same-sized canvas onto this one.
    ///
    /// Black is the transparency key: the firework background stays visible
    /// beneath scrolled text.
    pub fn overlay(&mut self, other: &Canvas) {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        for (dst, src) in self.pixels.iter_mut().zip(&other.pixels) {
            if !src.is_black() {
                *dst = *src;
            }
        }
    }

    /// Stamp text at (x, y), writing only glyph pixels. Rasterization is the
    /// text collaborator's job.
    pub fn stamp_text(&mut self, x: u32, y: u32, text: &str, renderer: &dyn TextRenderer, color: Color) {
        renderer.draw(self, x, y, text, color);
    }

    /// Return a new canvas holding columns `[offset, offset + width)` of a
    /// conceptually infinite horizontal repetition of this one:
    /// `src_x = (offset + i) mod self.width`. This is the seamless-wrap
    /// primitive behind scrolling.
    pub fn sample_window(&self, offset: u32, width: u32) -> Canvas {
        let mut out = Canvas::new(width, self.height);
        for i in 0..width {
            let src_x = (offset + i) % self.width;
            for y in 0..self.height {
                out.pixels[(y * width + i) as usize] =
                    self.pixels[(y * self.width + src_x) as usize];
            }
        }
        out
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Rgb888>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 {
                self.set_pixel(point.x as u32, point.y as u32, color.into());
            }
        }
        Ok(())
    }
}
