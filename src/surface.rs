//! Drawing surfaces the renderer paints into.

use bytemuck::{Pod, Zeroable};

use crate::colour::Colour;
use crate::screen;

/// A raster target that can fill axis-aligned rectangles.
///
/// Coordinates are in pixels with the origin at the top left. Rectangles that
/// overhang the edge are clipped.
pub trait Surface {
    fn size(&self) -> screen::Size;

    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, colour: Colour);
}

/// One `Rgba8` texel, laid out for upload to the display texture.
#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Texel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Texel {
    pub const BLACK: Self = Texel {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };
}

impl From<Colour> for Texel {
    fn from(colour: Colour) -> Self {
        Self {
            r: colour.r,
            g: colour.g,
            b: colour.b,
            a: 255,
        }
    }
}

/// A CPU-side canvas. Tracks whether it changed since the last upload.
pub struct Framebuffer {
    size: screen::Size,
    texels: Vec<Texel>,
    dirty: bool,
}

impl Framebuffer {
    pub fn new(size: screen::Size) -> Self {
        Self {
            size,
            texels: vec![Texel::BLACK; size.area()],
            dirty: true,
        }
    }

    /// Resizes and clears to black.
    pub fn resize(&mut self, size: screen::Size) {
        self.size = size;
        self.texels.clear();
        self.texels.resize(size.area(), Texel::BLACK);
        self.dirty = true;
    }

    pub fn texels(&self) -> &[Texel] {
        &self.texels
    }

    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Texel> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        Some(self.texels[y as usize * self.size.width as usize + x as usize])
    }

    /// Returns whether anything was painted since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

impl Surface for Framebuffer {
    fn size(&self) -> screen::Size {
        self.size
    }

    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, colour: Colour) {
        let right = x.saturating_add(width).min(self.size.width);
        let bottom = y.saturating_add(height).min(self.size.height);
        if x >= right || y >= bottom {
            return;
        }

        let texel = Texel::from(colour);
        let stride = self.size.width as usize;
        for row in y..bottom {
            let start = row as usize * stride;
            self.texels[start + x as usize..start + right as usize].fill(texel);
        }
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_black_and_dirty() {
        let mut framebuffer = Framebuffer::new(screen::Size::new(3, 2));
        assert_eq!(framebuffer.texels().len(), 6);
        assert!(framebuffer.texels().iter().all(|&t| t == Texel::BLACK));
        assert!(framebuffer.take_dirty());
        assert!(!framebuffer.take_dirty());
    }

    #[test]
    fn fills_only_the_rectangle() {
        let mut framebuffer = Framebuffer::new(screen::Size::new(4, 4));
        framebuffer.take_dirty();
        framebuffer.fill_rect(1, 2, 2, 1, Colour::gray(9));

        assert!(framebuffer.take_dirty());
        for y in 0..4 {
            for x in 0..4 {
                let expected = if (1..3).contains(&x) && y == 2 {
                    Texel::from(Colour::gray(9))
                } else {
                    Texel::BLACK
                };
                assert_eq!(framebuffer.get(x, y), Some(expected), "({}, {})", x, y);
            }
        }
    }

    #[test]
    fn clips_at_the_edges() {
        let mut framebuffer = Framebuffer::new(screen::Size::new(5, 3));
        framebuffer.fill_rect(4, 2, 8, 8, Colour::gray(200));
        assert_eq!(framebuffer.get(4, 2), Some(Texel::from(Colour::gray(200))));
        assert_eq!(framebuffer.get(3, 2), Some(Texel::BLACK));

        framebuffer.take_dirty();
        framebuffer.fill_rect(5, 0, 1, 1, Colour::gray(1));
        framebuffer.fill_rect(u32::MAX, u32::MAX, u32::MAX, u32::MAX, Colour::gray(1));
        assert!(!framebuffer.take_dirty());
    }

    #[test]
    fn bytes_are_rgba() {
        let mut framebuffer = Framebuffer::new(screen::Size::new(1, 1));
        framebuffer.fill_rect(0, 0, 1, 1, Colour::new(1, 2, 3));
        assert_eq!(framebuffer.bytes(), &[1, 2, 3, 255]);
    }

    #[test]
    fn resize_clears() {
        let mut framebuffer = Framebuffer::new(screen::Size::new(2, 2));
        framebuffer.fill_rect(0, 0, 2, 2, Colour::gray(50));
        framebuffer.resize(screen::Size::new(3, 1));
        assert_eq!(framebuffer.size(), screen::Size::new(3, 1));
        assert!(framebuffer.texels().iter().all(|&t| t == Texel::BLACK));
        assert_eq!(framebuffer.get(0, 1), None);
    }
}
