use crate::abi::*;
use crate::unknown::borrowed;
use crate::utility::{copy_buffer, native_enum, wide_cstr};
use crate::*;

native_enum! {
    pub enum MeasuringMode {
        Natural = 0,
        GdiClassic = 1,
        GdiNatural = 2,
    }
}

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct GlyphOffset {
    pub advance: f32,
    pub ascender: f32,
}

impl From<DWRITE_GLYPH_OFFSET> for GlyphOffset {
    #[inline]
    fn from(src: DWRITE_GLYPH_OFFSET) -> Self {
        Self {
            advance: src.advanceOffset,
            ascender: src.ascenderOffset,
        }
    }
}

/// An owned copy of a `DWRITE_GLYPH_RUN`.
///
/// `advances` and `offsets` are empty when the native run omits them.
#[derive(Clone, Debug)]
pub struct GlyphRun {
    pub font_face: Option<Unknown>,
    pub font_em_size: f32,
    pub indices: Vec<u16>,
    pub advances: Vec<f32>,
    pub offsets: Vec<GlyphOffset>,
    pub is_sideways: bool,
    pub bidi_level: u32,
}

impl GlyphRun {
    pub(crate) unsafe fn from_native(src: &DWRITE_GLYPH_RUN) -> Result<Self> {
        let count = src.glyphCount;
        Ok(Self {
            font_face: borrowed(src.fontFace),
            font_em_size: src.fontEmSize,
            indices: copy_buffer(src.glyphIndices, count, |i| *i)?,
            advances: copy_optional(src.glyphAdvances, count, |a| *a)?,
            offsets: copy_optional(src.glyphOffsets, count, |o| GlyphOffset::from(*o))?,
            is_sideways: src.isSideways != 0,
            bidi_level: src.bidiLevel,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct GlyphRunDescription {
    pub locale_name: Option<String>,
    pub text: String,
    pub cluster_map: Vec<u16>,
    pub text_position: u32,
}

impl GlyphRunDescription {
    pub(crate) unsafe fn from_native(src: &DWRITE_GLYPH_RUN_DESCRIPTION) -> Result<Self> {
        let text = copy_buffer(src.string, src.stringLength, |c| *c)?;
        Ok(Self {
            locale_name: wide_cstr(src.localeName),
            text: String::from_utf16_lossy(&text),
            cluster_map: copy_optional(src.clusterMap, src.stringLength, |c| *c)?,
            text_position: src.textPosition,
        })
    }
}

// Optional per-glyph arrays may be null whatever the count.
unsafe fn copy_optional<T: Copy, U>(
    ptr: *const T,
    count: u32,
    f: impl FnMut(&T) -> U,
) -> Result<Vec<U>> {
    if ptr.is_null() {
        Ok(Vec::new())
    } else {
        copy_buffer(ptr, count, f)
    }
}
