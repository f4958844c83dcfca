//! Decode-time scratch buffers.
//!
//! The device owns one optional slot per buffer kind. Slots are allocated
//! lazily on the first image draw that needs them and kept alive so
//! repeated draws of the same format pay the allocation once;
//! [`ScratchSet::release_all`] frees everything on teardown or reset.

use alloc::vec::Vec;

use crate::Error;

/// The scratch buffer kinds an image draw can need.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScratchKind {
    /// Generic decoder workspace
    Work,
    /// One decoded scanline in source format
    ScanlineRing,
    /// RGB888 palette for indexed formats
    Palette,
    /// Per-index alpha palette
    TransPalette,
    /// 256-entry gamma correction table
    Gamma,
}

/// Borrowed views over the buffers one blit needs, split so the scanline
/// ring, the wire-format workspace and the lookup tables can be used at
/// the same time.
pub(crate) struct ImageBuffers<'a> {
    /// Scanline ring buffer, source format
    pub ring: &'a mut [u8],
    /// Wire-format conversion workspace
    pub work: &'a mut [u8],
    /// RGB888 palette, when requested
    pub palette: Option<&'a mut [u8]>,
    /// Alpha palette, when requested
    pub trans_palette: Option<&'a mut [u8]>,
    /// Gamma table, when requested
    pub gamma: Option<&'a mut [u8]>,
}

/// Lazily allocated scratch buffer slots, exclusively owned by one device.
#[derive(Debug, Default)]
pub struct ScratchSet {
    work: Option<Vec<u8>>,
    ring: Option<Vec<u8>>,
    palette: Option<Vec<u8>>,
    trans_palette: Option<Vec<u8>>,
    gamma: Option<Vec<u8>>,
}

impl ScratchSet {
    /// An empty set; nothing is allocated until first use.
    pub const fn new() -> Self {
        ScratchSet {
            work: None,
            ring: None,
            palette: None,
            trans_palette: None,
            gamma: None,
        }
    }

    /// True when the slot for `kind` currently holds an allocation.
    pub fn is_allocated(&self, kind: ScratchKind) -> bool {
        match kind {
            ScratchKind::Work => self.work.is_some(),
            ScratchKind::ScanlineRing => self.ring.is_some(),
            ScratchKind::Palette => self.palette.is_some(),
            ScratchKind::TransPalette => self.trans_palette.is_some(),
            ScratchKind::Gamma => self.gamma.is_some(),
        }
    }

    /// Capacity currently held by the slot for `kind`.
    pub fn allocated_len(&self, kind: ScratchKind) -> usize {
        let slot = match kind {
            ScratchKind::Work => &self.work,
            ScratchKind::ScanlineRing => &self.ring,
            ScratchKind::Palette => &self.palette,
            ScratchKind::TransPalette => &self.trans_palette,
            ScratchKind::Gamma => &self.gamma,
        };
        slot.as_ref().map_or(0, |buf| buf.len())
    }

    /// Return the buffer for `kind` with at least `len` bytes, allocating
    /// or growing it on demand. Allocation failure surfaces as
    /// [`Error::OutOfMemory`] without touching the other slots.
    pub fn acquire(&mut self, kind: ScratchKind, len: usize) -> Result<&mut [u8], Error> {
        let slot = match kind {
            ScratchKind::Work => &mut self.work,
            ScratchKind::ScanlineRing => &mut self.ring,
            ScratchKind::Palette => &mut self.palette,
            ScratchKind::TransPalette => &mut self.trans_palette,
            ScratchKind::Gamma => &mut self.gamma,
        };
        Self::ensure(slot, len)?;
        match slot.as_mut() {
            Some(buf) => Ok(&mut buf[..len]),
            None => Err(Error::OutOfMemory),
        }
    }

    /// Free every allocated slot.
    pub fn release_all(&mut self) {
        self.work = None;
        self.ring = None;
        self.palette = None;
        self.trans_palette = None;
        self.gamma = None;
    }

    /// Acquire all buffers one image draw needs in a single borrow.
    /// A length of zero leaves the corresponding lookup table unallocated.
    pub(crate) fn image_buffers(
        &mut self,
        ring_len: usize,
        work_len: usize,
        palette_len: usize,
        trans_len: usize,
        gamma_len: usize,
    ) -> Result<ImageBuffers<'_>, Error> {
        Self::ensure(&mut self.ring, ring_len)?;
        Self::ensure(&mut self.work, work_len)?;
        if palette_len > 0 {
            Self::ensure(&mut self.palette, palette_len)?;
        }
        if trans_len > 0 {
            Self::ensure(&mut self.trans_palette, trans_len)?;
        }
        if gamma_len > 0 {
            Self::ensure(&mut self.gamma, gamma_len)?;
        }
        let ScratchSet {
            work,
            ring,
            palette,
            trans_palette,
            gamma,
        } = self;
        let (Some(ring), Some(work)) = (ring.as_mut(), work.as_mut()) else {
            return Err(Error::OutOfMemory);
        };
        Ok(ImageBuffers {
            ring: &mut ring[..ring_len],
            work: &mut work[..work_len],
            palette: Self::view(palette, palette_len),
            trans_palette: Self::view(trans_palette, trans_len),
            gamma: Self::view(gamma, gamma_len),
        })
    }

    fn ensure(slot: &mut Option<Vec<u8>>, len: usize) -> Result<(), Error> {
        let buf = slot.get_or_insert_with(Vec::new);
        if buf.len() < len {
            let additional = len - buf.len();
            buf.try_reserve_exact(additional).map_err(|_| Error::OutOfMemory)?;
            buf.resize(len, 0);
        }
        Ok(())
    }

    fn view(slot: &mut Option<Vec<u8>>, len: usize) -> Option<&mut [u8]> {
        if len == 0 {
            return None;
        }
        slot.as_mut().map(|buf| &mut buf[..len])
    }
}
