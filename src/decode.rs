//! Pull boundary to an external JPEG/PNG decoder.
//!
//! The driver never decodes images itself; it pulls one scanline at a time
//! from a [`ScanlineSource`] into its scratch ring buffer and streams the
//! converted bytes straight into the open panel window, so peak memory is
//! one scanline regardless of image height.

/// Pixel layout of the scanlines a source yields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    /// Packed RGB565, big-endian, two bytes per pixel
    Rgb565Be,
    /// 8-bit RGB triples, three bytes per pixel
    Rgb888,
    /// One palette index per pixel; the source must expose a palette
    Indexed8,
}

impl SourceFormat {
    /// Source bytes per pixel.
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            SourceFormat::Rgb565Be => 2,
            SourceFormat::Rgb888 => 3,
            SourceFormat::Indexed8 => 1,
        }
    }
}

/// Decoder-side failure while producing a scanline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// The stream ended before the declared image height was produced
    UnexpectedEof,
    /// The compressed data is not a valid image
    Malformed,
    /// The underlying byte source failed
    Source,
}

/// Result of one scanline pull.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scanline {
    /// A row was written into the caller's buffer
    Row,
    /// The image is exhausted
    End,
}

/// A pull-based image decoder yielding one scanline per call.
pub trait ScanlineSource {
    /// Image width and height in pixels.
    fn dimensions(&self) -> (u16, u16);

    /// Layout of the bytes written by [`read_scanline`](Self::read_scanline).
    fn format(&self) -> SourceFormat;

    /// RGB888 palette for indexed formats, three bytes per entry.
    fn palette(&self) -> Option<&[u8]> {
        None
    }

    /// Per-index alpha values (255 = opaque) for indexed formats.
    fn trans_palette(&self) -> Option<&[u8]> {
        None
    }

    /// 256-entry gamma correction table, applied per channel.
    fn gamma_table(&self) -> Option<&[u8]> {
        None
    }

    /// Decode the next scanline into `out`, which holds exactly
    /// `width * format().bytes_per_pixel()` bytes.
    fn read_scanline(&mut self, out: &mut [u8]) -> Result<Scanline, DecodeError>;
}
