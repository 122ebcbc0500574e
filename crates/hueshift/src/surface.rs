//! Pixel-readable surfaces.
//!
//! [`PixelSurface`] mirrors a 2D canvas context: it reports its size and
//! hands out RGBA bytes for a rectangle. [`AvatarSource`] is whatever the
//! host can pull an avatar surface out of (a conversation row in a browser).

use crate::error::SurfaceError;

/// A 2D surface whose pixels can be read back as row-major RGBA.
pub trait PixelSurface {
    /// Width and height in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Returns the RGBA bytes of the given rectangle (4 bytes per pixel).
    ///
    /// # Errors
    /// Returns [`SurfaceError::Read`] if the pixels cannot be read.
    fn image_data(&self, x: u32, y: u32, width: u32, height: u32) -> Result<Vec<u8>, SurfaceError>;

    /// Reads the whole surface.
    ///
    /// # Errors
    /// Propagates [`PixelSurface::image_data`] failures.
    fn read_all(&self) -> Result<Vec<u8>, SurfaceError> {
        let (width, height) = self.dimensions();
        self.image_data(0, 0, width, height)
    }
}

impl<T: PixelSurface + ?Sized> PixelSurface for &T {
    fn dimensions(&self) -> (u32, u32) {
        (**self).dimensions()
    }

    fn image_data(&self, x: u32, y: u32, width: u32, height: u32) -> Result<Vec<u8>, SurfaceError> {
        (**self).image_data(x, y, width, height)
    }
}

/// Something an avatar surface can be obtained from.
pub trait AvatarSource {
    /// # Errors
    /// Returns [`SurfaceError::MissingAvatar`] when there is no avatar, or
    /// [`SurfaceError::Unavailable`] when it cannot be read.
    fn avatar(&self) -> Result<Box<dyn PixelSurface + '_>, SurfaceError>;
}

/// An owned RGBA pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RgbaBuffer {
    /// Returns `None` unless `data` holds exactly `width * height` pixels.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        (data.len() == expected).then_some(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer filled with one RGBA pixel.
    pub fn filled(width: u32, height: u32, pixel: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        Self {
            width,
            height,
            data: pixel.repeat(count),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Overwrites one pixel. Out-of-bounds coordinates are ignored.
    pub fn put(&mut self, x: u32, y: u32, pixel: [u8; 4]) {
        if x < self.width && y < self.height {
            let start = (y as usize * self.width as usize + x as usize) * 4;
            self.data[start..start + 4].copy_from_slice(&pixel);
        }
    }
}

impl PixelSurface for RgbaBuffer {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn image_data(&self, x: u32, y: u32, width: u32, height: u32) -> Result<Vec<u8>, SurfaceError> {
        let in_bounds = x.checked_add(width).is_some_and(|right| right <= self.width)
            && y.checked_add(height).is_some_and(|bottom| bottom <= self.height);
        if !in_bounds {
            return Err(SurfaceError::Read(format!(
                "rectangle {x},{y} {width}x{height} outside {}x{}",
                self.width, self.height
            )));
        }

        let stride = self.width as usize * 4;
        let mut out = Vec::with_capacity(width as usize * height as usize * 4);
        for row in y as usize..(y + height) as usize {
            let start = row * stride + x as usize * 4;
            out.extend_from_slice(&self.data[start..start + width as usize * 4]);
        }
        Ok(out)
    }
}

/// A conversation whose avatar is already decoded in memory.
impl AvatarSource for RgbaBuffer {
    fn avatar(&self) -> Result<Box<dyn PixelSurface + '_>, SurfaceError> {
        Ok(Box::new(self))
    }
}

/// A conversation with no avatar at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAvatar;

impl AvatarSource for NoAvatar {
    fn avatar(&self) -> Result<Box<dyn PixelSurface + '_>, SurfaceError> {
        Err(SurfaceError::MissingAvatar)
    }
}

#[cfg(feature = "image")]
impl PixelSurface for image::RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        image::RgbaImage::dimensions(self)
    }

    fn image_data(&self, x: u32, y: u32, width: u32, height: u32) -> Result<Vec<u8>, SurfaceError> {
        use image::GenericImageView;

        let (w, h) = image::RgbaImage::dimensions(self);
        if x.saturating_add(width) > w || y.saturating_add(height) > h {
            return Err(SurfaceError::Read(format!(
                "rectangle {x},{y} {width}x{height} outside {w}x{h}"
            )));
        }
        Ok(self.view(x, y, width, height).to_image().into_raw())
    }
}
