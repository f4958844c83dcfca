//! Device object and draw facade for ST7789-family controllers.

use alloc::vec::Vec;

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::cmd::Command;
use crate::color::{self, ColorMode, ColorOrder, Rgb565};
use crate::decode::{DecodeError, Scanline, ScanlineSource, SourceFormat};
use crate::dirty::DirtyRegion;
use crate::geometry::{Point, Rect, RotationTable};
use crate::interface::Interface;
use crate::protocol::Sequencer;
use crate::scratch::ScratchSet;
use crate::Error;

/// Immutable panel description, validated at construction.
#[derive(Clone, Copy, Debug)]
pub struct PanelConfig {
    /// Physical panel width in pixels
    pub display_width: u16,
    /// Physical panel height in pixels
    pub display_height: u16,
    /// Channel order the panel expects
    pub color_order: ColorOrder,
    /// Whether the panel needs display inversion enabled
    pub inversion: bool,
    /// Negotiated pixel format
    pub color_mode: ColorMode,
    /// Brightness levels are inverted (panels with reversed backlight drive)
    pub reversed_backlight: bool,
}

impl PanelConfig {
    /// Config with the common defaults: RGB order, RGB565, no inversion.
    pub const fn new(display_width: u16, display_height: u16) -> Self {
        PanelConfig {
            display_width,
            display_height,
            color_order: ColorOrder::Rgb,
            inversion: false,
            color_mode: ColorMode::RGB565,
            reversed_backlight: false,
        }
    }

    /// Set the channel order.
    pub const fn with_color_order(mut self, order: ColorOrder) -> Self {
        self.color_order = order;
        self
    }

    /// Enable or disable display inversion at init.
    pub const fn with_inversion(mut self, inversion: bool) -> Self {
        self.inversion = inversion;
        self
    }

    /// Set the pixel format negotiated at init.
    pub const fn with_color_mode(mut self, mode: ColorMode) -> Self {
        self.color_mode = mode;
        self
    }

    /// Invert brightness levels written to the panel.
    pub const fn with_reversed_backlight(mut self, reversed: bool) -> Self {
        self.reversed_backlight = reversed;
        self
    }

    fn validate(&self) -> Result<(), Error> {
        if self.display_width == 0 || self.display_height == 0 {
            return Err(Error::InvalidConfig);
        }
        Ok(())
    }
}

/// Steps a panel-specific init sequence can contain.
/// Keep variants minimal and serializable as static arrays in display modules.
#[derive(Clone, Copy, Debug)]
pub enum InitStep {
    /// Software reset
    SwReset,
    /// Wait the given number of milliseconds
    DelayMs(u16),
    /// Send a bare command
    Cmd(Command),
    /// Send a command with a static data slice
    CmdData(Command, &'static [u8]),
    /// Send PixelFormatSet with the configured COLMOD byte
    ColorMode,
    /// Send MemoryAccessCtrl for the active rotation and color order
    MemoryAccessCtrl,
    /// Send InversionOn/InversionOff per the panel config
    Inversion,
}

/// Default init sequence for ST7789 panels without quirks.
pub const DEFAULT_INIT_SEQUENCE: &[InitStep] = &[
    InitStep::SwReset,
    InitStep::DelayMs(150),
    InitStep::Cmd(Command::SleepOut),
    InitStep::DelayMs(10),
    InitStep::ColorMode,
    InitStep::MemoryAccessCtrl,
    InitStep::Inversion,
    InitStep::Cmd(Command::NormalModeOn),
    InitStep::DelayMs(10),
    InitStep::Cmd(Command::DisplayOn),
    InitStep::DelayMs(10),
];

/// A configured panel with a transport interface.
///
/// All drawing is expressed in the logical frame of the active rotation.
/// Draw calls clip silently, update the dirty region, convert colors to
/// the wire format and run one window/stream cycle on the sequencer.
pub struct St7789<DI> {
    di: DI,
    config: PanelConfig,
    rotations: RotationTable,
    rotation: u8,
    madctl: u8,
    // logical frame of the active rotation
    width: u16,
    height: u16,
    colstart: u16,
    rowstart: u16,
    sequencer: Sequencer,
    dirty: DirtyRegion,
    draw_buf: Option<Vec<u8>>,
    scratch: ScratchSet,
}

impl<DI: Interface> St7789<DI> {
    /// Create the driver from a transport, a validated panel config and a
    /// rotation table. Rotation 0 is active initially; its MADCTL byte is
    /// flagged for emission before the first window write.
    pub fn new(di: DI, config: PanelConfig, rotations: RotationTable) -> Result<Self, Error> {
        config.validate()?;
        let entry = rotations.get(0)?;
        if entry.width == 0 || entry.height == 0 {
            return Err(Error::InvalidConfig);
        }
        let madctl = entry.madctl | config.color_order.madctl_bits();
        let mut sequencer = Sequencer::new();
        sequencer.set_pending_madctl(madctl);
        Ok(St7789 {
            di,
            config,
            rotations,
            rotation: 0,
            madctl,
            width: entry.width,
            height: entry.height,
            colstart: entry.colstart,
            rowstart: entry.rowstart,
            sequencer,
            dirty: DirtyRegion::new(),
            draw_buf: None,
            scratch: ScratchSet::new(),
        })
    }

    /// Attach a resident draw buffer of `pixels` pixels for batched solid
    /// fills. Sized once here and reused across draws; `pixels` must be
    /// nonzero.
    pub fn with_draw_buffer(mut self, pixels: usize) -> Result<Self, Error> {
        if pixels == 0 {
            return Err(Error::InvalidConfig);
        }
        // three bytes per pixel covers every supported depth
        let bytes = pixels * 3;
        let mut buf = Vec::new();
        buf.try_reserve_exact(bytes).map_err(|_| Error::OutOfMemory)?;
        buf.resize(bytes, 0);
        self.draw_buf = Some(buf);
        Ok(self)
    }

    /// Run a table-driven init sequence against the panel.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D, sequence: &[InitStep]) -> Result<(), Error> {
        debug!("initializing panel ({} steps)", sequence.len());
        for step in sequence {
            debug!("init step: {:?}", step);
            match *step {
                InitStep::SwReset => {
                    self.sequencer.ancillary(&mut self.di, Command::SwReset, &[])?;
                }
                InitStep::DelayMs(ms) => delay.delay_ms(u32::from(ms)),
                InitStep::Cmd(c) => self.sequencer.ancillary(&mut self.di, c, &[])?,
                InitStep::CmdData(c, d) => self.sequencer.ancillary(&mut self.di, c, d)?,
                InitStep::ColorMode => {
                    let colmod = self.config.color_mode.colmod_byte();
                    self.sequencer
                        .ancillary(&mut self.di, Command::PixelFormatSet, &[colmod])?;
                }
                InitStep::MemoryAccessCtrl => {
                    let madctl = self.madctl;
                    self.sequencer
                        .ancillary(&mut self.di, Command::MemoryAccessCtrl, &[madctl])?;
                }
                InitStep::Inversion => {
                    let cmd = if self.config.inversion {
                        Command::InversionOn
                    } else {
                        Command::InversionOff
                    };
                    self.sequencer.ancillary(&mut self.di, cmd, &[])?;
                }
            }
        }
        Ok(())
    }

    /// Logical width of the active rotation.
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Logical height of the active rotation.
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Index of the active rotation.
    pub const fn rotation(&self) -> u8 {
        self.rotation
    }

    /// The panel configuration.
    pub const fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Select a rotation by index.
    ///
    /// Atomically swaps the logical frame and window offsets and flags the
    /// new MADCTL byte for emission before the next window write. Fails
    /// with [`Error::InvalidRotation`] on out-of-range indices, leaving the
    /// device untouched.
    pub fn set_rotation(&mut self, index: u8) -> Result<(), Error> {
        let entry = self.rotations.get(index)?;
        self.rotation = index;
        self.width = entry.width;
        self.height = entry.height;
        self.colstart = entry.colstart;
        self.rowstart = entry.rowstart;
        self.madctl = entry.madctl | self.config.color_order.madctl_bits();
        self.sequencer.set_pending_madctl(self.madctl);
        // the old bounding box is meaningless in the new logical frame
        self.dirty.clear();
        debug!("rotation {} -> {}x{}", index, self.width, self.height);
        Ok(())
    }

    /// Renegotiate the pixel format (COLMOD).
    pub fn set_color_mode(&mut self, mode: ColorMode) -> Result<(), Error> {
        self.sequencer
            .ancillary(&mut self.di, Command::PixelFormatSet, &[mode.colmod_byte()])?;
        self.config.color_mode = mode;
        Ok(())
    }

    /// Enter sleep mode.
    pub fn sleep_in(&mut self) -> Result<(), Error> {
        self.sequencer.ancillary(&mut self.di, Command::SleepIn, &[])
    }

    /// Exit sleep mode.
    pub fn sleep_out(&mut self) -> Result<(), Error> {
        self.sequencer.ancillary(&mut self.di, Command::SleepOut, &[])
    }

    /// Enable frame buffer output.
    pub fn display_on(&mut self) -> Result<(), Error> {
        self.sequencer.ancillary(&mut self.di, Command::DisplayOn, &[])
    }

    /// Disable frame buffer output.
    pub fn display_off(&mut self) -> Result<(), Error> {
        self.sequencer.ancillary(&mut self.di, Command::DisplayOff, &[])
    }

    /// Switch display inversion on or off.
    pub fn invert(&mut self, on: bool) -> Result<(), Error> {
        let cmd = if on { Command::InversionOn } else { Command::InversionOff };
        self.sequencer.ancillary(&mut self.di, cmd, &[])?;
        self.config.inversion = on;
        Ok(())
    }

    /// Write the display brightness (RM67162). Honors the reversed
    /// backlight flag by inverting the level.
    pub fn brightness(&mut self, level: u8) -> Result<(), Error> {
        let level = if self.config.reversed_backlight { 255 - level } else { level };
        self.sequencer
            .ancillary(&mut self.di, Command::WriteBrightness, &[level])
    }

    /// Read back the display brightness (RM67162).
    pub fn read_brightness(&mut self) -> Result<u8, Error> {
        let mut buf = [0u8; 1];
        self.sequencer.read(&mut self.di, Command::ReadBrightness, &mut buf)?;
        Ok(buf[0])
    }

    /// Read the 24-bit display ID.
    pub fn read_display_id(&mut self) -> Result<[u8; 3], Error> {
        let mut buf = [0u8; 3];
        self.sequencer.read(&mut self.di, Command::ReadDisplayId, &mut buf)?;
        Ok(buf)
    }

    /// Define the vertical scrolling areas (fixed top, scrolling, fixed bottom).
    pub fn vertical_scroll_definition(&mut self, tfa: u16, vsa: u16, bfa: u16) -> Result<(), Error> {
        self.sequencer.ancillary(
            &mut self.di,
            Command::VerticalScrollDefinition,
            &[
                (tfa >> 8) as u8,
                tfa as u8,
                (vsa >> 8) as u8,
                vsa as u8,
                (bfa >> 8) as u8,
                bfa as u8,
            ],
        )
    }

    /// Set the vertical scroll start line.
    pub fn vertical_scroll_start(&mut self, line: u16) -> Result<(), Error> {
        self.sequencer.ancillary(
            &mut self.di,
            Command::VerticalScrollStartAddress,
            &[(line >> 8) as u8, line as u8],
        )
    }

    /// Define the partial display area (inclusive start/end rows).
    pub fn partial_area(&mut self, start: u16, end: u16) -> Result<(), Error> {
        self.sequencer.ancillary(
            &mut self.di,
            Command::PartialArea,
            &[(start >> 8) as u8, start as u8, (end >> 8) as u8, end as u8],
        )
    }

    /// Enter partial display mode.
    pub fn partial_mode_on(&mut self) -> Result<(), Error> {
        self.sequencer.ancillary(&mut self.di, Command::PartialModeOn, &[])
    }

    /// Return to normal display mode.
    pub fn normal_mode(&mut self) -> Result<(), Error> {
        self.sequencer.ancillary(&mut self.di, Command::NormalModeOn, &[])
    }

    /// Draw one pixel.
    pub fn pixel(&mut self, x: i32, y: i32, color: Rgb565) -> Result<(), Error> {
        let Some(rect) = Rect::clip(x, y, 1, 1, self.width, self.height) else {
            return Ok(());
        };
        let (bytes, len) = color::encode_single(color, self.config.color_mode, self.config.color_order);
        self.sequencer
            .begin_window(&mut self.di, rect, self.colstart, self.rowstart, len as u32)?;
        self.sequencer.stream(&mut self.di, &bytes[..len])?;
        self.dirty.mark(rect);
        Ok(())
    }

    /// Draw a horizontal run of `w` pixels starting at `(x, y)`.
    pub fn hline(&mut self, x: i32, y: i32, w: u32, color: Rgb565) -> Result<(), Error> {
        let Some(rect) = Rect::clip(x, y, w, 1, self.width, self.height) else {
            return Ok(());
        };
        self.fill_clipped(rect, color)
    }

    /// Draw a vertical run of `h` pixels starting at `(x, y)`.
    pub fn vline(&mut self, x: i32, y: i32, h: u32, color: Rgb565) -> Result<(), Error> {
        let Some(rect) = Rect::clip(x, y, 1, h, self.width, self.height) else {
            return Ok(());
        };
        self.fill_clipped(rect, color)
    }

    /// Fill a rectangle.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgb565) -> Result<(), Error> {
        let Some(rect) = Rect::clip(x, y, w, h, self.width, self.height) else {
            return Ok(());
        };
        self.fill_clipped(rect, color)
    }

    /// Fill the whole logical frame.
    pub fn fill(&mut self, color: Rgb565) -> Result<(), Error> {
        self.fill_rect(0, 0, u32::from(self.width), u32::from(self.height), color)
    }

    /// Fill a closed polygon using the even-odd scanline rule: a pixel is
    /// inside when a ray to the left crosses an odd number of edges. One
    /// horizontal span is emitted per crossing pair.
    pub fn polygon_fill(&mut self, points: &[Point], color: Rgb565) -> Result<(), Error> {
        if points.len() < 3 {
            return Ok(());
        }
        let mut y_min = i32::MAX;
        let mut y_max = i32::MIN;
        for p in points {
            y_min = y_min.min(p.y);
            y_max = y_max.max(p.y);
        }
        let y_min = y_min.max(0);
        let y_max = y_max.min(i32::from(self.height) - 1);

        let mut xs: Vec<i32> = Vec::new();
        xs.try_reserve(points.len()).map_err(|_| Error::OutOfMemory)?;
        for y in y_min..=y_max {
            xs.clear();
            for i in 0..points.len() {
                let p1 = points[i];
                let p2 = points[(i + 1) % points.len()];
                // half-open edge test so shared vertices count once
                if (p1.y <= y && p2.y > y) || (p2.y <= y && p1.y > y) {
                    xs.push(p1.x + (y - p1.y) * (p2.x - p1.x) / (p2.y - p1.y));
                }
            }
            xs.sort_unstable();
            for pair in xs.chunks_exact(2) {
                if pair[1] > pair[0] {
                    self.hline(pair[0], y, (pair[1] - pair[0]) as u32, color)?;
                }
            }
        }
        Ok(())
    }

    /// Stream a decoded image into the panel at `(x, y)`.
    ///
    /// Pulls one scanline at a time from `source` into the scratch ring
    /// buffer, converts it to the wire format and streams it into the
    /// window, so peak scratch use is one scanline regardless of image
    /// height. Indexed pixels are palette-expanded with optional gamma
    /// correction and alpha blending against black; each scanline is
    /// validated before any of its bytes are sent.
    pub fn blit_image<S: ScanlineSource>(&mut self, source: &mut S, x: i32, y: i32) -> Result<(), Error> {
        let (img_w, img_h) = source.dimensions();
        let Some(dest) = Rect::clip(x, y, u32::from(img_w), u32::from(img_h), self.width, self.height)
        else {
            return Ok(());
        };
        let fmt = source.format();
        let mode = self.config.color_mode;
        let order = self.config.color_order;
        let palette_len = source.palette().map_or(0, <[u8]>::len);
        if fmt == SourceFormat::Indexed8 && palette_len == 0 {
            return Err(Error::Decode(DecodeError::Malformed));
        }
        let trans_len = source.trans_palette().map_or(0, <[u8]>::len);
        let gamma_len = source.gamma_table().map_or(0, <[u8]>::len);
        let src_line = img_w as usize * fmt.bytes_per_pixel();
        let wire_line = mode.bytes_for(u32::from(dest.w)) as usize;

        // acquire everything before the window opens: an allocation failure
        // must not leave a half-issued window command
        let bufs = self
            .scratch
            .image_buffers(src_line, wire_line, palette_len, trans_len, gamma_len)?;
        let palette: Option<&[u8]> = match (bufs.palette, source.palette()) {
            (Some(dst), Some(src)) => {
                dst.copy_from_slice(src);
                Some(&*dst)
            }
            _ => None,
        };
        let trans: Option<&[u8]> = match (bufs.trans_palette, source.trans_palette()) {
            (Some(dst), Some(src)) => {
                dst.copy_from_slice(src);
                Some(&*dst)
            }
            _ => None,
        };
        let gamma: Option<&[u8]> = match (bufs.gamma, source.gamma_table()) {
            (Some(dst), Some(src)) => {
                dst.copy_from_slice(src);
                Some(&*dst)
            }
            _ => None,
        };
        let ring = bufs.ring;
        let work = bufs.work;

        let skip_top = (i64::from(dest.y) - i64::from(y)) as u32;
        let skip_left = (i64::from(dest.x) - i64::from(x)) as usize;
        let expected = wire_line as u32 * u32::from(dest.h);
        self.sequencer
            .begin_window(&mut self.di, dest, self.colstart, self.rowstart, expected)?;
        for row in 0..(skip_top + u32::from(dest.h)) {
            match source.read_scanline(ring) {
                Ok(Scanline::Row) => {}
                Ok(Scanline::End) => {
                    self.sequencer.abort();
                    return Err(Error::Decode(DecodeError::UnexpectedEof));
                }
                Err(e) => {
                    self.sequencer.abort();
                    return Err(Error::Decode(e));
                }
            }
            if row < skip_top {
                continue;
            }
            let n = match convert_scanline(
                ring,
                fmt,
                skip_left,
                dest.w as usize,
                palette,
                trans,
                gamma,
                mode,
                order,
                work,
            ) {
                Ok(n) => n,
                Err(e) => {
                    self.sequencer.abort();
                    return Err(e);
                }
            };
            self.sequencer.stream(&mut self.di, &work[..n])?;
        }
        self.dirty.mark(dest);
        Ok(())
    }

    /// Return the bounding box of everything drawn since the last flush and
    /// reset the tracker. `None` means nothing to flush.
    pub fn flush_dirty(&mut self) -> Option<Rect> {
        self.dirty.flush()
    }

    /// The accumulated dirty box without resetting it.
    pub fn dirty_region(&self) -> Option<Rect> {
        self.dirty.peek()
    }

    /// Free all decode-time scratch buffers. They will be reallocated on
    /// the next image draw; call this to give memory back between bursts
    /// of image work, not after every image.
    pub fn release_scratch(&mut self) {
        self.scratch.release_all();
    }

    /// Tear down the driver and hand the transport back.
    pub fn release(self) -> DI {
        self.di
    }

    fn fill_clipped(&mut self, rect: Rect, color: Rgb565) -> Result<(), Error> {
        let mode = self.config.color_mode;
        let order = self.config.color_order;
        let px = rect.pixels();
        let expected = mode.bytes_for(px);
        self.sequencer
            .begin_window(&mut self.di, rect, self.colstart, self.rowstart, expected)?;
        let (pattern, len, per) = color::solid_pattern(color, mode, order);
        let full = px / per;
        if let Some(buf) = self.draw_buf.as_mut() {
            let per_buf = ((buf.len() / len).max(1)) as u32;
            let prime = per_buf.min(full) as usize * len;
            for (i, byte) in buf[..prime].iter_mut().enumerate() {
                *byte = pattern[i % len];
            }
            let mut remaining = full;
            while remaining > 0 {
                let take = remaining.min(per_buf) as usize;
                self.sequencer.stream(&mut self.di, &buf[..take * len])?;
                remaining -= take as u32;
            }
        } else {
            self.sequencer.stream_repeated(&mut self.di, &pattern[..len], full)?;
        }
        if px % per != 0 {
            // 12-bit fills with an odd pixel count pad the final nibble
            let (tail, tail_len) = color::encode_single(color, mode, order);
            self.sequencer.stream(&mut self.di, &tail[..tail_len])?;
        }
        self.dirty.mark(rect);
        Ok(())
    }
}

#[allow(clippy::too_many_arguments)]
fn convert_scanline(
    src: &[u8],
    fmt: SourceFormat,
    skip: usize,
    count: usize,
    palette: Option<&[u8]>,
    trans: Option<&[u8]>,
    gamma: Option<&[u8]>,
    mode: ColorMode,
    order: ColorOrder,
    out: &mut [u8],
) -> Result<usize, Error> {
    match fmt {
        SourceFormat::Rgb565Be => {
            let it = src
                .chunks_exact(2)
                .skip(skip)
                .take(count)
                .map(|px| Rgb565::from_raw((u16::from(px[0]) << 8) | u16::from(px[1])).to_rgb888());
            Ok(color::encode_rgb888_iter(it, mode, order, out))
        }
        SourceFormat::Rgb888 => {
            let it = src
                .chunks_exact(3)
                .skip(skip)
                .take(count)
                .map(|px| (px[0], px[1], px[2]));
            Ok(color::encode_rgb888_iter(it, mode, order, out))
        }
        SourceFormat::Indexed8 => {
            let palette = palette.unwrap_or(&[]);
            let indices = &src[skip..skip + count];
            // validate the whole row before emitting any of it
            for &idx in indices {
                color::palette_lookup(palette, idx as usize)?;
            }
            let bg = Rgb565::BLACK.to_rgb888();
            let it = indices.iter().map(|&idx| {
                let base = idx as usize * 3;
                let mut px = (palette[base], palette[base + 1], palette[base + 2]);
                if let Some(table) = gamma {
                    px = color::apply_gamma(px, table);
                }
                if let Some(alpha) = trans.and_then(|t| t.get(idx as usize).copied()) {
                    px = color::blend(px, bg, alpha);
                }
                px
            });
            Ok(color::encode_rgb888_iter(it, mode, order, out))
        }
    }
}
