//! Pixel formats and the logical-to-wire color conversion layer.
//!
//! This is the only place pixel values are reinterpreted: every draw call
//! funnels its colors through here to produce the exact byte sequence the
//! negotiated COLMOD mode expects.

use crate::Error;

/// RGB interface gamut, upper nibble of the COLMOD byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ColorGamut {
    /// 65K colors
    Colors65k = 0x50,
    /// 262K colors
    Colors262k = 0x60,
}

/// Control interface depth, lower nibble of the COLMOD byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ColorDepth {
    /// 12 bit/pixel, two pixels packed into three bytes
    Bits12 = 0x03,
    /// 16 bit/pixel RGB565, two bytes big-endian
    Bits16 = 0x05,
    /// 18 bit/pixel, one byte per channel with the low two bits ignored
    Bits18 = 0x06,
    /// 16M truncated, one full byte per channel
    Bits16M = 0x07,
}

/// Negotiated pixel format: gamut plus control-interface depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorMode {
    /// RGB interface gamut
    pub gamut: ColorGamut,
    /// Control interface depth
    pub depth: ColorDepth,
}

impl ColorMode {
    /// 65K colors at 16 bit/pixel, the common ST7789 default (COLMOD 0x55).
    pub const RGB565: ColorMode = ColorMode {
        gamut: ColorGamut::Colors65k,
        depth: ColorDepth::Bits16,
    };

    /// Value written with [`Command::PixelFormatSet`](crate::cmd::Command).
    pub const fn colmod_byte(self) -> u8 {
        self.gamut as u8 | self.depth as u8
    }

    /// Exact number of wire bytes needed for `pixels` pixels.
    ///
    /// A 12-bit run that ends on an odd pixel is padded out to the next
    /// byte boundary, matching how the controller latches nibbles.
    pub const fn bytes_for(self, pixels: u32) -> u32 {
        match self.depth {
            ColorDepth::Bits12 => (pixels * 3).div_ceil(2),
            ColorDepth::Bits16 => pixels * 2,
            ColorDepth::Bits18 | ColorDepth::Bits16M => pixels * 3,
        }
    }
}

/// Channel order expected by the panel, folded into MADCTL.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ColorOrder {
    /// Red first
    #[default]
    Rgb,
    /// Blue first
    Bgr,
}

impl ColorOrder {
    /// MADCTL contribution of this order.
    pub const fn madctl_bits(self) -> u8 {
        match self {
            ColorOrder::Rgb => crate::flag::Madctl::RGB,
            ColorOrder::Bgr => crate::flag::Madctl::BGR,
        }
    }
}

/// A packed 16-bit RGB565 color, the logical pixel type of the draw facade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb565(u16);

impl Rgb565 {
    /// Black
    pub const BLACK: Rgb565 = Rgb565(0x0000);
    /// Blue
    pub const BLUE: Rgb565 = Rgb565(0x001F);
    /// Red
    pub const RED: Rgb565 = Rgb565(0xF800);
    /// Green
    pub const GREEN: Rgb565 = Rgb565(0x07E0);
    /// Cyan
    pub const CYAN: Rgb565 = Rgb565(0x07FF);
    /// Magenta
    pub const MAGENTA: Rgb565 = Rgb565(0xF81F);
    /// Yellow
    pub const YELLOW: Rgb565 = Rgb565(0xFFE0);
    /// White
    pub const WHITE: Rgb565 = Rgb565(0xFFFF);

    /// Pack 8-bit channels into RGB565.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb565(((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3))
    }

    /// Wrap a raw packed value.
    pub const fn from_raw(raw: u16) -> Self {
        Rgb565(raw)
    }

    /// Raw packed value.
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Expand to 8-bit channels, replicating the high bits into the low ones.
    pub const fn to_rgb888(self) -> (u8, u8, u8) {
        let r5 = (self.0 >> 11) as u8;
        let g6 = ((self.0 >> 5) & 0x3F) as u8;
        let b5 = (self.0 & 0x1F) as u8;
        ((r5 << 3) | (r5 >> 2), (g6 << 2) | (g6 >> 4), (b5 << 3) | (b5 >> 2))
    }
}

fn ordered(r: u8, g: u8, b: u8, order: ColorOrder) -> (u8, u8, u8) {
    match order {
        ColorOrder::Rgb => (r, g, b),
        ColorOrder::Bgr => (b, g, r),
    }
}

/// Repeating wire pattern for a solid run of `color`.
///
/// Returns the pattern bytes, the pattern length and how many pixels one
/// pattern covers (two for 12-bit modes, otherwise one).
pub(crate) fn solid_pattern(color: Rgb565, mode: ColorMode, order: ColorOrder) -> ([u8; 4], usize, u32) {
    let (r, g, b) = color.to_rgb888();
    let (r, g, b) = ordered(r, g, b, order);
    let mut out = [0u8; 4];
    match mode.depth {
        ColorDepth::Bits16 => {
            let packed = Rgb565::new(r, g, b).raw();
            out[0] = (packed >> 8) as u8;
            out[1] = packed as u8;
            (out, 2, 1)
        }
        ColorDepth::Bits18 => {
            out[0] = r & 0xFC;
            out[1] = g & 0xFC;
            out[2] = b & 0xFC;
            (out, 3, 1)
        }
        ColorDepth::Bits16M => {
            out[0] = r;
            out[1] = g;
            out[2] = b;
            (out, 3, 1)
        }
        ColorDepth::Bits12 => {
            let (r4, g4, b4) = (r >> 4, g >> 4, b >> 4);
            out[0] = (r4 << 4) | g4;
            out[1] = (b4 << 4) | r4;
            out[2] = (g4 << 4) | b4;
            (out, 3, 2)
        }
    }
}

/// Wire bytes for a single pixel, padding the trailing nibble in 12-bit mode.
pub(crate) fn encode_single(color: Rgb565, mode: ColorMode, order: ColorOrder) -> ([u8; 4], usize) {
    let (pattern, len, pixels) = solid_pattern(color, mode, order);
    if pixels == 1 {
        (pattern, len)
    } else {
        // 12-bit: a lone pixel is the first half of the pattern, low nibble padded
        ([pattern[0], pattern[1] & 0xF0, 0, 0], 2)
    }
}

/// Encode a scanline of 8-bit RGB triples into `out`, returning the number
/// of bytes written. `out` must hold at least `mode.bytes_for(n)` bytes.
pub(crate) fn encode_rgb888_iter<I>(pixels: I, mode: ColorMode, order: ColorOrder, out: &mut [u8]) -> usize
where
    I: Iterator<Item = (u8, u8, u8)>,
{
    let mut n = 0;
    // carry for the half-written byte pair in 12-bit mode
    let mut pending: Option<(u8, u8, u8)> = None;
    for (r, g, b) in pixels {
        let (r, g, b) = ordered(r, g, b, order);
        match mode.depth {
            ColorDepth::Bits16 => {
                let packed = Rgb565::new(r, g, b).raw();
                out[n] = (packed >> 8) as u8;
                out[n + 1] = packed as u8;
                n += 2;
            }
            ColorDepth::Bits18 => {
                out[n] = r & 0xFC;
                out[n + 1] = g & 0xFC;
                out[n + 2] = b & 0xFC;
                n += 3;
            }
            ColorDepth::Bits16M => {
                out[n] = r;
                out[n + 1] = g;
                out[n + 2] = b;
                n += 3;
            }
            ColorDepth::Bits12 => match pending.take() {
                None => pending = Some((r >> 4, g >> 4, b >> 4)),
                Some((r1, g1, b1)) => {
                    let (r2, g2, b2) = (r >> 4, g >> 4, b >> 4);
                    out[n] = (r1 << 4) | g1;
                    out[n + 1] = (b1 << 4) | r2;
                    out[n + 2] = (g2 << 4) | b2;
                    n += 3;
                }
            },
        }
    }
    if let Some((r1, g1, b1)) = pending {
        out[n] = (r1 << 4) | g1;
        out[n + 1] = b1 << 4;
        n += 2;
    }
    n
}

/// Recover an RGB565 color from its two 16-bit-mode wire bytes.
pub fn decode_rgb565(hi: u8, lo: u8, order: ColorOrder) -> Rgb565 {
    let packed = ((hi as u16) << 8) | lo as u16;
    match order {
        ColorOrder::Rgb => Rgb565::from_raw(packed),
        ColorOrder::Bgr => {
            let r5 = packed >> 11;
            let b5 = packed & 0x1F;
            Rgb565::from_raw((b5 << 11) | (packed & 0x07E0) | r5)
        }
    }
}

/// Bounds-checked lookup into an RGB888 palette. Never clamps.
pub(crate) fn palette_lookup(palette: &[u8], index: usize) -> Result<(u8, u8, u8), Error> {
    let base = index * 3;
    if base + 3 > palette.len() {
        return Err(Error::PaletteIndexOutOfRange);
    }
    Ok((palette[base], palette[base + 1], palette[base + 2]))
}

/// Alpha blend `fg` over `bg` with an 8-bit alpha (255 = opaque).
pub(crate) fn blend(fg: (u8, u8, u8), bg: (u8, u8, u8), alpha: u8) -> (u8, u8, u8) {
    let mix = |f: u8, b: u8| -> u8 {
        ((f as u16 * alpha as u16 + b as u16 * (255 - alpha) as u16) / 255) as u8
    };
    (mix(fg.0, bg.0), mix(fg.1, bg.1), mix(fg.2, bg.2))
}

/// Run each channel through a 256-entry gamma table.
pub(crate) fn apply_gamma(px: (u8, u8, u8), table: &[u8]) -> (u8, u8, u8) {
    if table.len() < 256 {
        return px;
    }
    (table[px.0 as usize], table[px.1 as usize], table[px.2 as usize])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colmod_bytes() {
        assert_eq!(ColorMode::RGB565.colmod_byte(), 0x55);
        let m = ColorMode {
            gamut: ColorGamut::Colors262k,
            depth: ColorDepth::Bits18,
        };
        assert_eq!(m.colmod_byte(), 0x66);
        let m = ColorMode {
            gamut: ColorGamut::Colors65k,
            depth: ColorDepth::Bits12,
        };
        assert_eq!(m.colmod_byte(), 0x53);
    }

    #[test]
    fn bytes_for_rounds_odd_12bit_runs_up() {
        let m12 = ColorMode {
            gamut: ColorGamut::Colors65k,
            depth: ColorDepth::Bits12,
        };
        assert_eq!(m12.bytes_for(2), 3);
        assert_eq!(m12.bytes_for(3), 5);
        assert_eq!(ColorMode::RGB565.bytes_for(10), 20);
        let m18 = ColorMode {
            gamut: ColorGamut::Colors262k,
            depth: ColorDepth::Bits18,
        };
        assert_eq!(m18.bytes_for(10), 30);
    }

    #[test]
    fn rgb565_round_trips_through_16bit_wire_format() {
        for color in [
            Rgb565::BLACK,
            Rgb565::RED,
            Rgb565::GREEN,
            Rgb565::BLUE,
            Rgb565::WHITE,
            Rgb565::from_raw(0x1234),
        ] {
            let (pattern, len, _) = solid_pattern(color, ColorMode::RGB565, ColorOrder::Rgb);
            assert_eq!(len, 2);
            assert_eq!(decode_rgb565(pattern[0], pattern[1], ColorOrder::Rgb), color);
        }
    }

    #[test]
    fn bgr_order_swaps_channels() {
        let (pattern, _, _) = solid_pattern(Rgb565::RED, ColorMode::RGB565, ColorOrder::Bgr);
        // pure red in BGR order lands in the blue field
        assert_eq!(decode_rgb565(pattern[0], pattern[1], ColorOrder::Bgr), Rgb565::RED);
        assert_eq!(Rgb565::from_raw(((pattern[0] as u16) << 8) | pattern[1] as u16), Rgb565::BLUE);
    }

    #[test]
    fn twelve_bit_packs_two_pixels_into_three_bytes() {
        let m12 = ColorMode {
            gamut: ColorGamut::Colors65k,
            depth: ColorDepth::Bits12,
        };
        let mut out = [0u8; 8];
        // white then black: nibbles F,F,F then 0,0,0
        let n = encode_rgb888_iter(
            [(0xFF, 0xFF, 0xFF), (0x00, 0x00, 0x00)].into_iter(),
            m12,
            ColorOrder::Rgb,
            &mut out,
        );
        assert_eq!(n, 3);
        assert_eq!(&out[..3], &[0xFF, 0xF0, 0x00]);

        // a lone pixel pads its trailing nibble
        let n = encode_rgb888_iter([(0xFF, 0xFF, 0xFF)].into_iter(), m12, ColorOrder::Rgb, &mut out);
        assert_eq!(n, 2);
        assert_eq!(&out[..2], &[0xFF, 0xF0]);
        assert_eq!(n as u32, m12.bytes_for(1));
    }

    #[test]
    fn eighteen_bit_masks_low_channel_bits() {
        let m18 = ColorMode {
            gamut: ColorGamut::Colors262k,
            depth: ColorDepth::Bits18,
        };
        let (pattern, len, _) = solid_pattern(Rgb565::WHITE, m18, ColorOrder::Rgb);
        assert_eq!(len, 3);
        assert_eq!(&pattern[..3], &[0xFC, 0xFC, 0xFC]);
    }

    #[test]
    fn palette_lookup_rejects_out_of_range_indices() {
        let palette = [1, 2, 3, 4, 5, 6]; // two entries
        assert_eq!(palette_lookup(&palette, 1), Ok((4, 5, 6)));
        assert_eq!(palette_lookup(&palette, 2), Err(Error::PaletteIndexOutOfRange));
    }

    #[test]
    fn single_12bit_pixel_is_the_pattern_prefix() {
        let m12 = ColorMode {
            gamut: ColorGamut::Colors65k,
            depth: ColorDepth::Bits12,
        };
        let color = Rgb565::from_raw(0x1234);
        let (pattern, _, pixels) = solid_pattern(color, m12, ColorOrder::Rgb);
        assert_eq!(pixels, 2);
        let (single, len) = encode_single(color, m12, ColorOrder::Rgb);
        assert_eq!(len, 2);
        assert_eq!(&single[..2], &[pattern[0], pattern[1] & 0xF0]);
    }

    #[test]
    fn gamma_table_remaps_each_channel() {
        let mut inverse = [0u8; 256];
        for (i, v) in inverse.iter_mut().enumerate() {
            *v = 255 - i as u8;
        }
        assert_eq!(apply_gamma((0, 128, 255), &inverse), (255, 127, 0));
        // undersized tables are ignored
        assert_eq!(apply_gamma((1, 2, 3), &[0u8; 16]), (1, 2, 3));
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend((10, 20, 30), (200, 200, 200), 255), (10, 20, 30));
        assert_eq!(blend((10, 20, 30), (200, 200, 200), 0), (200, 200, 200));
    }
}
