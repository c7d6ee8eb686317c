pub(crate) mod ppm;


use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use bytemuck::{Pod, Zeroable};

use crate::error::{Error, Result};

/// One RGB pixel, three independent 8-bit channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Pixel {
    pub const BLACK: Pixel = Pixel::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(v: u8) -> Self {
        Self { r: v, g: v, b: v }
    }
}

#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub struct ImageDesc {
    pub width: usize,
    pub height: usize,
}

impl ImageDesc {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}

impl std::fmt::Display for ImageDesc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{} rgb8", self.width, self.height)
    }
}

/// Row-major RGB image, tightly packed (no stride padding).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    desc: ImageDesc,
    pixels: Vec<Pixel>,
}

impl Image {
    /// Returns the image descriptor.
    pub fn desc(&self) -> &ImageDesc {
        &self.desc
    }

    pub fn width(&self) -> usize {
        self.desc.width
    }

    pub fn height(&self) -> usize {
        self.desc.height
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    /// Returns the pixel data viewed as raw `r g b` bytes.
    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: usize, y: usize) -> Pixel {
        self.pixels[y * self.desc.width + x]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: Pixel) {
        self.pixels[y * self.desc.width + x] = pixel;
    }

    pub fn row(&self, y: usize) -> &[Pixel] {
        let start = y * self.desc.width;
        &self.pixels[start..start + self.desc.width]
    }

    pub fn new_black(desc: ImageDesc) -> Image {
        Self::new_filled(desc, Pixel::BLACK)
    }

    pub fn new_filled(desc: ImageDesc, pixel: Pixel) -> Image {
        Image {
            desc,
            pixels: vec![pixel; desc.pixel_count()],
        }
    }

    pub fn new_with_pixels(desc: ImageDesc, pixels: Vec<Pixel>) -> Result<Image> {
        if pixels.len() != desc.pixel_count() {
            return Err(Error::Size(format!(
                "pixel count {} does not match {}",
                pixels.len(),
                desc
            )));
        }

        Ok(Image { desc, pixels })
    }

    /// Reads a binary `P6` image with a max channel value of 255.
    ///
    /// Truncated pixel data is not an error: the missing pixels stay black.
    /// Dimensions needing far more bytes than the file holds are a `Size` error.
    pub fn read_file<P: AsRef<Path>>(filename: P) -> Result<Image> {
        let filename = filename.as_ref();
        let file = File::open(filename).map_err(|e| Error::io(filename, e))?;
        let len = file.metadata().map_err(|e| Error::io(filename, e))?.len();

        ppm::decode_bounded(BufReader::new(file), Some(len)).map_err(|e| match e {
            Error::Io { source, .. } => Error::io(filename, source),
            other => other,
        })
    }

    /// Writes the image as binary `P6`.
    pub fn save_file<P: AsRef<Path>>(&self, filename: P) -> Result<()> {
        let filename = filename.as_ref();
        let file = File::create(filename).map_err(|e| Error::io(filename, e))?;

        let mut writer = BufWriter::new(file);
        ppm::encode(self, &mut writer)
            .and_then(|_| writer.flush())
            .map_err(|e| Error::io(filename, e))
    }
}
