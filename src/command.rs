//! `ID2D1CommandSink`: receives the drawing commands recorded in a command list.

use crate::abi::*;
use crate::shadow::*;
use crate::unknown::{borrowed, required};
use crate::utility::{native_enum, read_optional, read_required};
use crate::*;
use std::ffi::c_void;

native_enum! {
    pub enum AntialiasMode {
        PerPrimitive = 0,
        Aliased = 1,
    }
}

native_enum! {
    pub enum TextAntialiasMode {
        Default = 0,
        ClearType = 1,
        Grayscale = 2,
        Aliased = 3,
    }
}

native_enum! {
    pub enum PrimitiveBlend {
        SourceOver = 0,
        Copy = 1,
        Min = 2,
        Add = 3,
        Max = 4,
    }
}

native_enum! {
    pub enum UnitMode {
        Dips = 0,
        Pixels = 1,
    }
}

bitflags::bitflags! {
    /// `D2D1_LAYER_OPTIONS1`
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
    pub struct LayerOptions1: u32 {
        const INITIALIZE_FROM_BACKGROUND = 0x1;
        const IGNORE_ALPHA = 0x2;
    }
}

/// An owned copy of `D2D1_LAYER_PARAMETERS1`.
#[derive(Clone, Debug)]
pub struct LayerParameters {
    pub content_bounds: RectF,
    pub geometric_mask: Option<Unknown>,
    pub mask_antialias_mode: AntialiasMode,
    pub mask_transform: Matrix3x2,
    pub opacity: f32,
    pub opacity_brush: Option<Unknown>,
    pub layer_options: LayerOptions1,
}

impl LayerParameters {
    unsafe fn from_native(src: &D2D1_LAYER_PARAMETERS1) -> Result<Self> {
        let layer_options = LayerOptions1::from_bits(src.layerOptions).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidArg,
                format!("{:#x} is not a valid LayerOptions1", src.layerOptions),
            )
        })?;
        Ok(Self {
            content_bounds: src.contentBounds.into(),
            geometric_mask: borrowed(src.geometricMask),
            mask_antialias_mode: src.maskAntialiasMode.try_into()?,
            mask_transform: src.maskTransform.into(),
            opacity: src.opacity,
            opacity_brush: borrowed(src.opacityBrush),
            layer_options,
        })
    }
}

/// One method per command a command list can hold, in recording order.
///
/// Every method defaults to accepting the command and doing nothing, so a sink
/// only implements what it cares about. Interface arguments (brushes, stroke
/// styles, geometries, bitmaps...) arrive as [`Unknown`]; clone one to keep it
/// past the call.
#[allow(unused_variables)]
pub trait CommandSink: Send + Sync {
    fn begin_draw(&self) -> Result<()> {
        Ok(())
    }

    fn end_draw(&self) -> Result<()> {
        Ok(())
    }

    fn set_antialias_mode(&self, mode: AntialiasMode) -> Result<()> {
        Ok(())
    }

    fn set_tags(&self, tag1: u64, tag2: u64) -> Result<()> {
        Ok(())
    }

    fn set_text_antialias_mode(&self, mode: TextAntialiasMode) -> Result<()> {
        Ok(())
    }

    fn set_text_rendering_params(&self, params: Option<&Unknown>) -> Result<()> {
        Ok(())
    }

    fn set_transform(&self, transform: &Matrix3x2) -> Result<()> {
        Ok(())
    }

    fn set_primitive_blend(&self, blend: PrimitiveBlend) -> Result<()> {
        Ok(())
    }

    fn set_unit_mode(&self, mode: UnitMode) -> Result<()> {
        Ok(())
    }

    fn clear(&self, color: Option<Rgba>) -> Result<()> {
        Ok(())
    }

    fn draw_glyph_run(
        &self,
        baseline_origin: Point,
        glyph_run: &GlyphRun,
        description: Option<&GlyphRunDescription>,
        brush: &Unknown,
        measuring_mode: MeasuringMode,
    ) -> Result<()> {
        Ok(())
    }

    fn draw_line(
        &self,
        p0: Point,
        p1: Point,
        brush: &Unknown,
        stroke_width: f32,
        stroke_style: Option<&Unknown>,
    ) -> Result<()> {
        Ok(())
    }

    fn draw_geometry(
        &self,
        geometry: &Unknown,
        brush: &Unknown,
        stroke_width: f32,
        stroke_style: Option<&Unknown>,
    ) -> Result<()> {
        Ok(())
    }

    fn draw_rectangle(
        &self,
        rect: &RectF,
        brush: &Unknown,
        stroke_width: f32,
        stroke_style: Option<&Unknown>,
    ) -> Result<()> {
        Ok(())
    }

    fn draw_bitmap(
        &self,
        bitmap: &Unknown,
        dest: Option<RectF>,
        opacity: f32,
        interpolation: Interpolation,
        src: Option<RectF>,
        perspective: Option<&Matrix4x4>,
    ) -> Result<()> {
        Ok(())
    }

    fn draw_image(
        &self,
        image: &Unknown,
        target_offset: Option<Point>,
        image_rect: Option<RectF>,
        interpolation: Interpolation,
        composite_mode: CompositeMode,
    ) -> Result<()> {
        Ok(())
    }

    fn draw_gdi_metafile(&self, metafile: &Unknown, target_offset: Option<Point>) -> Result<()> {
        Ok(())
    }

    fn fill_mesh(&self, mesh: &Unknown, brush: &Unknown) -> Result<()> {
        Ok(())
    }

    fn fill_opacity_mask(
        &self,
        mask: &Unknown,
        brush: &Unknown,
        dest: Option<RectF>,
        src: Option<RectF>,
    ) -> Result<()> {
        Ok(())
    }

    fn fill_geometry(
        &self,
        geometry: &Unknown,
        brush: &Unknown,
        opacity_brush: Option<&Unknown>,
    ) -> Result<()> {
        Ok(())
    }

    fn fill_rectangle(&self, rect: &RectF, brush: &Unknown) -> Result<()> {
        Ok(())
    }

    fn push_axis_aligned_clip(&self, rect: &RectF, mode: AntialiasMode) -> Result<()> {
        Ok(())
    }

    fn push_layer(&self, params: &LayerParameters, layer: Option<&Unknown>) -> Result<()> {
        Ok(())
    }

    fn pop_axis_aligned_clip(&self) -> Result<()> {
        Ok(())
    }

    fn pop_layer(&self) -> Result<()> {
        Ok(())
    }
}

pub trait CommandSink1: CommandSink {
    fn set_primitive_blend1(&self, blend: PrimitiveBlend) -> Result<()> {
        self.set_primitive_blend(blend)
    }
}

type Status0 = unsafe extern "system" fn(this: *mut c_void) -> HResult;
type StatusU32 = unsafe extern "system" fn(this: *mut c_void, value: u32) -> HResult;

#[allow(non_snake_case)]
#[repr(C)]
pub struct CommandSinkVtbl {
    pub base: IUnknownVtbl,
    pub BeginDraw: Status0,
    pub EndDraw: Status0,
    pub SetAntialiasMode: StatusU32,
    pub SetTags: unsafe extern "system" fn(this: *mut c_void, tag1: u64, tag2: u64) -> HResult,
    pub SetTextAntialiasMode: StatusU32,
    pub SetTextRenderingParams:
        unsafe extern "system" fn(this: *mut c_void, params: *mut c_void) -> HResult,
    pub SetTransform:
        unsafe extern "system" fn(this: *mut c_void, transform: *const D2D_MATRIX_3X2_F) -> HResult,
    pub SetPrimitiveBlend: StatusU32,
    pub SetUnitMode: StatusU32,
    pub Clear: unsafe extern "system" fn(this: *mut c_void, color: *const D2D1_COLOR_F) -> HResult,
    pub DrawGlyphRun: unsafe extern "system" fn(
        this: *mut c_void,
        baseline_origin: D2D_POINT_2F,
        glyph_run: *const DWRITE_GLYPH_RUN,
        description: *const DWRITE_GLYPH_RUN_DESCRIPTION,
        brush: *mut c_void,
        measuring_mode: u32,
    ) -> HResult,
    pub DrawLine: unsafe extern "system" fn(
        this: *mut c_void,
        p0: D2D_POINT_2F,
        p1: D2D_POINT_2F,
        brush: *mut c_void,
        stroke_width: f32,
        stroke_style: *mut c_void,
    ) -> HResult,
    pub DrawGeometry: unsafe extern "system" fn(
        this: *mut c_void,
        geometry: *mut c_void,
        brush: *mut c_void,
        stroke_width: f32,
        stroke_style: *mut c_void,
    ) -> HResult,
    pub DrawRectangle: unsafe extern "system" fn(
        this: *mut c_void,
        rect: *const D2D_RECT_F,
        brush: *mut c_void,
        stroke_width: f32,
        stroke_style: *mut c_void,
    ) -> HResult,
    pub DrawBitmap: unsafe extern "system" fn(
        this: *mut c_void,
        bitmap: *mut c_void,
        dest: *const D2D_RECT_F,
        opacity: f32,
        interpolation: u32,
        src: *const D2D_RECT_F,
        perspective: *const D2D_MATRIX_4X4_F,
    ) -> HResult,
    pub DrawImage: unsafe extern "system" fn(
        this: *mut c_void,
        image: *mut c_void,
        target_offset: *const D2D_POINT_2F,
        image_rect: *const D2D_RECT_F,
        interpolation: u32,
        composite_mode: u32,
    ) -> HResult,
    pub DrawGdiMetafile: unsafe extern "system" fn(
        this: *mut c_void,
        metafile: *mut c_void,
        target_offset: *const D2D_POINT_2F,
    ) -> HResult,
    pub FillMesh:
        unsafe extern "system" fn(this: *mut c_void, mesh: *mut c_void, brush: *mut c_void) -> HResult,
    pub FillOpacityMask: unsafe extern "system" fn(
        this: *mut c_void,
        mask: *mut c_void,
        brush: *mut c_void,
        dest: *const D2D_RECT_F,
        src: *const D2D_RECT_F,
    ) -> HResult,
    pub FillGeometry: unsafe extern "system" fn(
        this: *mut c_void,
        geometry: *mut c_void,
        brush: *mut c_void,
        opacity_brush: *mut c_void,
    ) -> HResult,
    pub FillRectangle: unsafe extern "system" fn(
        this: *mut c_void,
        rect: *const D2D_RECT_F,
        brush: *mut c_void,
    ) -> HResult,
    pub PushAxisAlignedClip: unsafe extern "system" fn(
        this: *mut c_void,
        rect: *const D2D_RECT_F,
        mode: u32,
    ) -> HResult,
    pub PushLayer: unsafe extern "system" fn(
        this: *mut c_void,
        params: *const D2D1_LAYER_PARAMETERS1,
        layer: *mut c_void,
    ) -> HResult,
    pub PopAxisAlignedClip: Status0,
    pub PopLayer: Status0,
}

impl CommandSinkVtbl {
    pub const fn new<I>() -> Self
    where
        I: Interface,
        I::Callback: CommandSink,
    {
        Self {
            base: IUnknownVtbl::new::<I>(),
            BeginDraw: begin_draw::<I::Callback>,
            EndDraw: end_draw::<I::Callback>,
            SetAntialiasMode: set_antialias_mode::<I::Callback>,
            SetTags: set_tags::<I::Callback>,
            SetTextAntialiasMode: set_text_antialias_mode::<I::Callback>,
            SetTextRenderingParams: set_text_rendering_params::<I::Callback>,
            SetTransform: set_transform::<I::Callback>,
            SetPrimitiveBlend: set_primitive_blend::<I::Callback>,
            SetUnitMode: set_unit_mode::<I::Callback>,
            Clear: clear::<I::Callback>,
            DrawGlyphRun: draw_glyph_run::<I::Callback>,
            DrawLine: draw_line::<I::Callback>,
            DrawGeometry: draw_geometry::<I::Callback>,
            DrawRectangle: draw_rectangle::<I::Callback>,
            DrawBitmap: draw_bitmap::<I::Callback>,
            DrawImage: draw_image::<I::Callback>,
            DrawGdiMetafile: draw_gdi_metafile::<I::Callback>,
            FillMesh: fill_mesh::<I::Callback>,
            FillOpacityMask: fill_opacity_mask::<I::Callback>,
            FillGeometry: fill_geometry::<I::Callback>,
            FillRectangle: fill_rectangle::<I::Callback>,
            PushAxisAlignedClip: push_axis_aligned_clip::<I::Callback>,
            PushLayer: push_layer::<I::Callback>,
            PopAxisAlignedClip: pop_axis_aligned_clip::<I::Callback>,
            PopLayer: pop_layer::<I::Callback>,
        }
    }
}

static VTBL: CommandSinkVtbl = CommandSinkVtbl::new::<CommandSinkVtbl>();

unsafe impl Interface for CommandSinkVtbl {
    type Callback = dyn CommandSink;

    const NAME: &'static str = "ID2D1CommandSink";
    const IIDS: &'static [GUID] = &[IID_ID2D1CommandSink];

    #[inline]
    fn vtable() -> &'static Self {
        &VTBL
    }
}

pub type CommandSinkShadow = Shadow<CommandSinkVtbl>;

#[allow(non_snake_case)]
#[repr(C)]
pub struct CommandSink1Vtbl {
    pub base: CommandSinkVtbl,
    pub SetPrimitiveBlend1: StatusU32,
}

static VTBL1: CommandSink1Vtbl = CommandSink1Vtbl {
    base: CommandSinkVtbl::new::<CommandSink1Vtbl>(),
    SetPrimitiveBlend1: set_primitive_blend1,
};

unsafe impl Interface for CommandSink1Vtbl {
    type Callback = dyn CommandSink1;

    const NAME: &'static str = "ID2D1CommandSink1";
    const IIDS: &'static [GUID] = &[IID_ID2D1CommandSink, IID_ID2D1CommandSink1];

    #[inline]
    fn vtable() -> &'static Self {
        &VTBL1
    }
}

pub type CommandSink1Shadow = Shadow<CommandSink1Vtbl>;

unsafe extern "system" fn begin_draw<T: CommandSink + ?Sized>(this: *mut c_void) -> HResult {
    dispatch::<T>(this, "BeginDraw", |sink| sink.begin_draw())
}

unsafe extern "system" fn end_draw<T: CommandSink + ?Sized>(this: *mut c_void) -> HResult {
    dispatch::<T>(this, "EndDraw", |sink| sink.end_draw())
}

unsafe extern "system" fn set_antialias_mode<T: CommandSink + ?Sized>(
    this: *mut c_void,
    mode: u32,
) -> HResult {
    dispatch::<T>(this, "SetAntialiasMode", |sink| {
        sink.set_antialias_mode(mode.try_into()?)
    })
}

unsafe extern "system" fn set_tags<T: CommandSink + ?Sized>(
    this: *mut c_void,
    tag1: u64,
    tag2: u64,
) -> HResult {
    dispatch::<T>(this, "SetTags", |sink| sink.set_tags(tag1, tag2))
}

unsafe extern "system" fn set_text_antialias_mode<T: CommandSink + ?Sized>(
    this: *mut c_void,
    mode: u32,
) -> HResult {
    dispatch::<T>(this, "SetTextAntialiasMode", |sink| {
        sink.set_text_antialias_mode(mode.try_into()?)
    })
}

unsafe extern "system" fn set_text_rendering_params<T: CommandSink + ?Sized>(
    this: *mut c_void,
    params: *mut c_void,
) -> HResult {
    dispatch::<T>(this, "SetTextRenderingParams", |sink| {
        sink.set_text_rendering_params(borrowed(params).as_ref())
    })
}

unsafe extern "system" fn set_transform<T: CommandSink + ?Sized>(
    this: *mut c_void,
    transform: *const D2D_MATRIX_3X2_F,
) -> HResult {
    dispatch::<T>(this, "SetTransform", |sink| {
        sink.set_transform(&read_required(transform)?.into())
    })
}

unsafe extern "system" fn set_primitive_blend<T: CommandSink + ?Sized>(
    this: *mut c_void,
    blend: u32,
) -> HResult {
    dispatch::<T>(this, "SetPrimitiveBlend", |sink| {
        sink.set_primitive_blend(blend.try_into()?)
    })
}

unsafe extern "system" fn set_unit_mode<T: CommandSink + ?Sized>(
    this: *mut c_void,
    mode: u32,
) -> HResult {
    dispatch::<T>(this, "SetUnitMode", |sink| sink.set_unit_mode(mode.try_into()?))
}

unsafe extern "system" fn clear<T: CommandSink + ?Sized>(
    this: *mut c_void,
    color: *const D2D1_COLOR_F,
) -> HResult {
    dispatch::<T>(this, "Clear", |sink| {
        sink.clear(read_optional(color).map(Rgba::from))
    })
}

unsafe extern "system" fn draw_glyph_run<T: CommandSink + ?Sized>(
    this: *mut c_void,
    baseline_origin: D2D_POINT_2F,
    glyph_run: *const DWRITE_GLYPH_RUN,
    description: *const DWRITE_GLYPH_RUN_DESCRIPTION,
    brush: *mut c_void,
    measuring_mode: u32,
) -> HResult {
    dispatch::<T>(this, "DrawGlyphRun", |sink| {
        let glyph_run = GlyphRun::from_native(&read_required(glyph_run)?)?;
        let description = read_optional(description)
            .map(|desc| GlyphRunDescription::from_native(&desc))
            .transpose()?;
        sink.draw_glyph_run(
            baseline_origin.into(),
            &glyph_run,
            description.as_ref(),
            &required(brush)?,
            measuring_mode.try_into()?,
        )
    })
}

unsafe extern "system" fn draw_line<T: CommandSink + ?Sized>(
    this: *mut c_void,
    p0: D2D_POINT_2F,
    p1: D2D_POINT_2F,
    brush: *mut c_void,
    stroke_width: f32,
    stroke_style: *mut c_void,
) -> HResult {
    dispatch::<T>(this, "DrawLine", |sink| {
        sink.draw_line(
            p0.into(),
            p1.into(),
            &required(brush)?,
            stroke_width,
            borrowed(stroke_style).as_ref(),
        )
    })
}

unsafe extern "system" fn draw_geometry<T: CommandSink + ?Sized>(
    this: *mut c_void,
    geometry: *mut c_void,
    brush: *mut c_void,
    stroke_width: f32,
    stroke_style: *mut c_void,
) -> HResult {
    dispatch::<T>(this, "DrawGeometry", |sink| {
        sink.draw_geometry(
            &required(geometry)?,
            &required(brush)?,
            stroke_width,
            borrowed(stroke_style).as_ref(),
        )
    })
}

unsafe extern "system" fn draw_rectangle<T: CommandSink + ?Sized>(
    this: *mut c_void,
    rect: *const D2D_RECT_F,
    brush: *mut c_void,
    stroke_width: f32,
    stroke_style: *mut c_void,
) -> HResult {
    dispatch::<T>(this, "DrawRectangle", |sink| {
        sink.draw_rectangle(
            &read_required(rect)?.into(),
            &required(brush)?,
            stroke_width,
            borrowed(stroke_style).as_ref(),
        )
    })
}

unsafe extern "system" fn draw_bitmap<T: CommandSink + ?Sized>(
    this: *mut c_void,
    bitmap: *mut c_void,
    dest: *const D2D_RECT_F,
    opacity: f32,
    interpolation: u32,
    src: *const D2D_RECT_F,
    perspective: *const D2D_MATRIX_4X4_F,
) -> HResult {
    dispatch::<T>(this, "DrawBitmap", |sink| {
        let perspective = read_optional(perspective).map(Matrix4x4::from);
        sink.draw_bitmap(
            &required(bitmap)?,
            read_optional(dest).map(RectF::from),
            opacity,
            interpolation.try_into()?,
            read_optional(src).map(RectF::from),
            perspective.as_ref(),
        )
    })
}

unsafe extern "system" fn draw_image<T: CommandSink + ?Sized>(
    this: *mut c_void,
    image: *mut c_void,
    target_offset: *const D2D_POINT_2F,
    image_rect: *const D2D_RECT_F,
    interpolation: u32,
    composite_mode: u32,
) -> HResult {
    dispatch::<T>(this, "DrawImage", |sink| {
        sink.draw_image(
            &required(image)?,
            read_optional(target_offset).map(Point::from),
            read_optional(image_rect).map(RectF::from),
            interpolation.try_into()?,
            composite_mode.try_into()?,
        )
    })
}

unsafe extern "system" fn draw_gdi_metafile<T: CommandSink + ?Sized>(
    this: *mut c_void,
    metafile: *mut c_void,
    target_offset: *const D2D_POINT_2F,
) -> HResult {
    dispatch::<T>(this, "DrawGdiMetafile", |sink| {
        sink.draw_gdi_metafile(
            &required(metafile)?,
            read_optional(target_offset).map(Point::from),
        )
    })
}

unsafe extern "system" fn fill_mesh<T: CommandSink + ?Sized>(
    this: *mut c_void,
    mesh: *mut c_void,
    brush: *mut c_void,
) -> HResult {
    dispatch::<T>(this, "FillMesh", |sink| {
        sink.fill_mesh(&required(mesh)?, &required(brush)?)
    })
}

unsafe extern "system" fn fill_opacity_mask<T: CommandSink + ?Sized>(
    this: *mut c_void,
    mask: *mut c_void,
    brush: *mut c_void,
    dest: *const D2D_RECT_F,
    src: *const D2D_RECT_F,
) -> HResult {
    dispatch::<T>(this, "FillOpacityMask", |sink| {
        sink.fill_opacity_mask(
            &required(mask)?,
            &required(brush)?,
            read_optional(dest).map(RectF::from),
            read_optional(src).map(RectF::from),
        )
    })
}

unsafe extern "system" fn fill_geometry<T: CommandSink + ?Sized>(
    this: *mut c_void,
    geometry: *mut c_void,
    brush: *mut c_void,
    opacity_brush: *mut c_void,
) -> HResult {
    dispatch::<T>(this, "FillGeometry", |sink| {
        sink.fill_geometry(
            &required(geometry)?,
            &required(brush)?,
            borrowed(opacity_brush).as_ref(),
        )
    })
}

unsafe extern "system" fn fill_rectangle<T: CommandSink + ?Sized>(
    this: *mut c_void,
    rect: *const D2D_RECT_F,
    brush: *mut c_void,
) -> HResult {
    dispatch::<T>(this, "FillRectangle", |sink| {
        sink.fill_rectangle(&read_required(rect)?.into(), &required(brush)?)
    })
}

unsafe extern "system" fn push_axis_aligned_clip<T: CommandSink + ?Sized>(
    this: *mut c_void,
    rect: *const D2D_RECT_F,
    mode: u32,
) -> HResult {
    dispatch::<T>(this, "PushAxisAlignedClip", |sink| {
        sink.push_axis_aligned_clip(&read_required(rect)?.into(), mode.try_into()?)
    })
}

unsafe extern "system" fn push_layer<T: CommandSink + ?Sized>(
    this: *mut c_void,
    params: *const D2D1_LAYER_PARAMETERS1,
    layer: *mut c_void,
) -> HResult {
    dispatch::<T>(this, "PushLayer", |sink| {
        let params = LayerParameters::from_native(&read_required(params)?)?;
        sink.push_layer(&params, borrowed(layer).as_ref())
    })
}

unsafe extern "system" fn pop_axis_aligned_clip<T: CommandSink + ?Sized>(
    this: *mut c_void,
) -> HResult {
    dispatch::<T>(this, "PopAxisAlignedClip", |sink| sink.pop_axis_aligned_clip())
}

unsafe extern "system" fn pop_layer<T: CommandSink + ?Sized>(this: *mut c_void) -> HResult {
    dispatch::<T>(this, "PopLayer", |sink| sink.pop_layer())
}

unsafe extern "system" fn set_primitive_blend1(this: *mut c_void, blend: u32) -> HResult {
    dispatch::<dyn CommandSink1>(this, "SetPrimitiveBlend1", |sink| {
        sink.set_primitive_blend1(blend.try_into()?)
    })
}
