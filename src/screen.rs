use bytemuck::{Pod, Zeroable};
use winit::dpi::PhysicalSize;

/// Canvas size in pixels. Uploaded as-is to the display shader's uniform.
#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Limits each side to at most `max` pixels.
    pub fn clamped(&self, max: u32) -> Self {
        Self::new(self.width.min(max), self.height.min(max))
    }
}

impl From<PhysicalSize<u32>> for Size {
    fn from(size: PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

impl From<Size> for PhysicalSize<u32> {
    fn from(size: Size) -> Self {
        PhysicalSize::new(size.width, size.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_each_side_independently() {
        let limit = 8192;
        assert_eq!(Size::new(3840, 2160).clamped(limit), Size::new(3840, 2160));
        assert_eq!(Size::new(9000, 2160).clamped(limit), Size::new(8192, 2160));
        assert_eq!(Size::new(3000, 2000).clamped(2048), Size::new(2048, 2000));
        assert_eq!(Size::new(0, 10_000).clamped(limit), Size::new(0, 8192));
    }
}
