//! Offset-addressed arena and record views.
//!
//! The native parser lays records out in one contiguous allocation and links
//! them by 32-bit offsets instead of pointers. [`NativeRef`] is such an
//! offset (`0` is the null reference; the first four arena bytes are
//! reserved so no record can ever sit there), and [`StructView`] is a typed
//! cursor over one record. All reads are little-endian and bounds-checked;
//! an out-of-range read decodes as zero/absent, since malformed-input
//! reporting is the parser's job, not ours.

/// A 32-bit arena offset acting as a nullable record pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NativeRef(pub u32);

impl NativeRef {
    /// The null reference.
    pub const NULL: NativeRef = NativeRef(0);

    #[inline]
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// One contiguous allocation holding every record of a parse.
#[derive(Debug, Clone)]
pub struct NativeArena {
    bytes: Vec<u8>,
}

impl Default for NativeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeArena {
    /// Creates an empty arena with the null slot reserved.
    pub fn new() -> Self {
        NativeArena { bytes: vec![0; 4] }
    }

    /// Drops all records but keeps the allocation for reuse.
    pub fn clear(&mut self) {
        self.bytes.clear();
        self.bytes.resize(4, 0);
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.len() <= 4
    }

    /// Reserves a zeroed, 4-byte-aligned region and returns its reference.
    pub fn alloc(&mut self, size: u32) -> NativeRef {
        let misalign = self.bytes.len() % 4;
        if misalign != 0 {
            self.bytes.resize(self.bytes.len() + (4 - misalign), 0);
        }
        let at = self.bytes.len() as u32;
        self.bytes.resize(self.bytes.len() + size as usize, 0);
        NativeRef(at)
    }

    /// Copies raw bytes into the arena at an absolute offset.
    pub fn write(&mut self, offset: u32, data: &[u8]) {
        let start = offset as usize;
        let end = start + data.len();
        if end <= self.bytes.len() {
            self.bytes[start..end].copy_from_slice(data);
        }
    }

    /// Appends raw bytes (e.g. string data) and returns their offset.
    pub fn push_bytes(&mut self, data: &[u8]) -> u32 {
        let at = self.bytes.len() as u32;
        self.bytes.extend_from_slice(data);
        at
    }

    #[inline]
    pub(crate) fn get(&self, offset: u32, len: u32) -> Option<&[u8]> {
        let start = offset as usize;
        let end = start.checked_add(len as usize)?;
        self.bytes.get(start..end)
    }

    /// Reads a little-endian `u32`, folding out-of-range to zero.
    #[inline]
    pub fn u32_at(&self, offset: u32) -> u32 {
        match self.get(offset, 4) {
            Some(b) => u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            None => 0,
        }
    }

    /// Opens a record view, or `None` for the null reference.
    pub fn view(&self, at: NativeRef) -> Option<StructView<'_>> {
        if at.is_null() {
            return None;
        }
        Some(StructView { arena: self, base: at.0 })
    }
}

/// A typed cursor over one record at a fixed arena base offset.
///
/// All accessors take offsets relative to the record base, so the generated
/// decoding routines can use the compile-time offsets from the schema tables
/// directly.
#[derive(Debug, Clone, Copy)]
pub struct StructView<'a> {
    arena: &'a NativeArena,
    base: u32,
}

impl<'a> StructView<'a> {
    pub fn arena(&self) -> &'a NativeArena {
        self.arena
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    /// The record's native type tag (always at record offset 0).
    #[inline]
    pub fn tag(&self) -> u32 {
        self.u32_at(0)
    }

    #[inline]
    pub fn u8_at(&self, offset: u32) -> u8 {
        self.arena
            .get(self.base + offset, 1)
            .map(|b| b[0])
            .unwrap_or(0)
    }

    #[inline]
    pub fn i8_at(&self, offset: u32) -> i8 {
        self.u8_at(offset) as i8
    }

    #[inline]
    pub fn u16_at(&self, offset: u32) -> u16 {
        match self.arena.get(self.base + offset, 2) {
            Some(b) => u16::from_le_bytes([b[0], b[1]]),
            None => 0,
        }
    }

    #[inline]
    pub fn u32_at(&self, offset: u32) -> u32 {
        self.arena.u32_at(self.base + offset)
    }

    #[inline]
    pub fn i32_at(&self, offset: u32) -> i32 {
        self.u32_at(offset) as i32
    }

    /// Reads a reference-valued field.
    #[inline]
    pub fn reference(&self, offset: u32) -> NativeRef {
        NativeRef(self.u32_at(offset))
    }

    /// Reads an array count field.
    #[inline]
    pub fn count(&self, offset: u32) -> u32 {
        self.u32_at(offset)
    }

    /// Follows a reference-valued field into a view over the pointed-to area.
    pub fn array(&self, offset: u32) -> Option<StructView<'a>> {
        self.arena.view(self.reference(offset))
    }

    /// Reads a `{offset, len}` text span whose span header sits at `offset`.
    ///
    /// Returns `None` for the zero span and for non-UTF-8 payloads.
    pub fn str_span(&self, offset: u32) -> Option<&'a str> {
        let span_offset = self.u32_at(offset);
        let span_len = self.u32_at(offset + 4);
        if span_offset == 0 {
            return None;
        }
        let bytes = self.arena.get(span_offset, span_len)?;
        std::str::from_utf8(bytes).ok()
    }
}
