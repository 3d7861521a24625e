//! The raster behind the visible drawing area.
//!
//! The surface keeps two sizes: a logical size in layout pixels (egui points) and a
//! physical size in device pixels. Draw calls are expressed in logical units; the
//! installed transform maps them onto the physical raster.

use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};

use crate::error::SketchError;

/// Largest raster dimension accepted on either axis
pub const MAX_DIMENSION: u32 = 32767;

/// Logical and physical dimensions of the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    pub logical: [u32; 2],
    pub physical: [u32; 2],
    pub scale: f32,
}

impl SurfaceSize {
    /// Clamp a layout area to the minimum size and derive the physical size.
    ///
    /// A non-finite or non-positive scale is treated as 1.0.
    pub fn for_layout(width: f32, height: f32, scale: f32, min_logical: u32) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        let logical = [
            floor_to_u32(width).max(min_logical),
            floor_to_u32(height).max(min_logical),
        ];
        let physical = [
            floor_to_u32(logical[0] as f32 * scale).max(1),
            floor_to_u32(logical[1] as f32 * scale).max(1),
        ];
        Self {
            logical,
            physical,
            scale,
        }
    }
}

fn floor_to_u32(value: f32) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.floor().min(u32::MAX as f32) as u32
    } else {
        0
    }
}

/// An immutable copy of the raster taken before a resize
#[derive(Debug, Clone)]
pub struct Snapshot {
    pixmap: Pixmap,
}

impl Snapshot {
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

/// Owns the raster and performs resize-with-content-preservation
#[derive(Debug)]
pub struct Surface {
    pixmap: Pixmap,
    size: SurfaceSize,
    transform: Transform,
    min_logical: u32,
    revision: u64,
}

impl Surface {
    /// Allocates a transparent raster for a layout area
    ///
    /// Args:
    ///     width, height (f32): Layout area in logical pixels, floored and clamped
    ///     scale (f32): Device pixel ratio
    ///     min_logical (u32): Smallest logical size on either axis
    ///
    /// Returns:
    ///     Result<Self, SketchError>: `InvalidDimensions` if the physical raster is too large
    pub fn new(
        width: f32,
        height: f32,
        scale: f32,
        min_logical: u32,
    ) -> Result<Self, SketchError> {
        let size = SurfaceSize::for_layout(width, height, scale, min_logical);
        let pixmap = allocate(size)?;
        Ok(Self {
            pixmap,
            size,
            transform: Transform::from_scale(size.scale, size.scale),
            min_logical,
            revision: 0,
        })
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn logical_size(&self) -> [u32; 2] {
        self.size.logical
    }

    pub fn physical_size(&self) -> [u32; 2] {
        self.size.physical
    }

    pub fn scale(&self) -> f32 {
        self.size.scale
    }

    /// Maps logical coordinates onto the physical raster
    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Mutable access to the raster; bumps the revision.
    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        self.revision += 1;
        &mut self.pixmap
    }

    /// Changes every time the raster content may have changed
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn needs_resize(&self, width: f32, height: f32, scale: f32) -> bool {
        SurfaceSize::for_layout(width, height, scale, self.min_logical) != self.size
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pixmap: self.pixmap.clone(),
        }
    }

    /// Reallocate the raster for a new layout area and stretch the old content over it.
    ///
    /// The previous content is resampled, so repeated resizes accumulate blur.
    pub fn resize(&mut self, width: f32, height: f32, scale: f32) -> Result<(), SketchError> {
        let snapshot = self.snapshot();
        let size = SurfaceSize::for_layout(width, height, scale, self.min_logical);
        let mut pixmap = allocate(size)?;

        let sx = size.physical[0] as f32 / snapshot.width() as f32;
        let sy = size.physical[1] as f32 / snapshot.height() as f32;
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..Default::default()
        };
        pixmap.draw_pixmap(
            0,
            0,
            snapshot.pixmap().as_ref(),
            &paint,
            Transform::from_scale(sx, sy),
            None,
        );

        log::debug!(
            "Resized surface {:?} -> {:?} (scale {})",
            self.size.physical,
            size.physical,
            size.scale
        );
        self.pixmap = pixmap;
        self.size = size;
        self.transform = Transform::from_scale(size.scale, size.scale);
        self.revision += 1;
        Ok(())
    }

    /// Wipe the raster to fully transparent
    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
        self.revision += 1;
    }

    /// Straight-alpha copy of the raster
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let [width, height] = self.size.physical;
        let mut data = Vec::with_capacity(self.pixmap.data().len());
        for pixel in self.pixmap.pixels() {
            let c = pixel.demultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        image::RgbaImage::from_raw(width, height, data)
            .unwrap_or_else(|| image::RgbaImage::new(width, height))
    }

    /// Texture upload for egui, which also expects premultiplied alpha
    pub fn to_color_image(&self) -> egui::ColorImage {
        let [width, height] = self.size.physical;
        egui::ColorImage::from_rgba_premultiplied(
            [width as usize, height as usize],
            self.pixmap.data(),
        )
    }
}

fn allocate(size: SurfaceSize) -> Result<Pixmap, SketchError> {
    let [width, height] = size.physical;
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(SketchError::InvalidDimensions { width, height });
    }
    Pixmap::new(width, height).ok_or(SketchError::InvalidDimensions { width, height })
}
