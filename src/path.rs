use crate::abi::*;
use crate::shadow::*;
use crate::utility::{copy_buffer, native_enum, read_required};
use crate::*;
use std::ffi::c_void;

native_enum! {
    pub enum FillMode {
        Alternate = 0,
        Winding = 1,
    }
}

native_enum! {
    pub enum FigureBegin {
        Filled = 0,
        Hollow = 1,
    }
}

native_enum! {
    pub enum FigureEnd {
        Open = 0,
        Closed = 1,
    }
}

native_enum! {
    pub enum SweepDirection {
        CounterClockwise = 0,
        Clockwise = 1,
    }
}

native_enum! {
    pub enum ArcSize {
        Small = 0,
        Large = 1,
    }
}

bitflags::bitflags! {
    /// `D2D1_PATH_SEGMENT`
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
    pub struct PathSegment: u32 {
        const FORCE_UNSTROKED = 0x1;
        const FORCE_ROUND_LINE_JOIN = 0x2;
    }
}

impl TryFrom<u32> for PathSegment {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        Self::from_bits(value).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidArg,
                format!("{:#x} is not a valid PathSegment", value),
            )
        })
    }
}

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct QuadraticBezierSegment {
    pub ctrl: Point,
    pub to: Point,
}

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct CubicBezierSegment {
    pub c0: Point,
    pub c1: Point,
    pub to: Point,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ArcSegment {
    pub to: Point,
    pub size: Size<f32>,
    pub rotation_angle: f32,
    pub sweep_direction: SweepDirection,
    pub arc_size: ArcSize,
}

impl From<D2D1_QUADRATIC_BEZIER_SEGMENT> for QuadraticBezierSegment {
    #[inline]
    fn from(src: D2D1_QUADRATIC_BEZIER_SEGMENT) -> Self {
        Self {
            ctrl: src.point1.into(),
            to: src.point2.into(),
        }
    }
}

impl From<D2D1_BEZIER_SEGMENT> for CubicBezierSegment {
    #[inline]
    fn from(src: D2D1_BEZIER_SEGMENT) -> Self {
        Self {
            c0: src.point1.into(),
            c1: src.point2.into(),
            to: src.point3.into(),
        }
    }
}

impl TryFrom<D2D1_ARC_SEGMENT> for ArcSegment {
    type Error = Error;

    fn try_from(src: D2D1_ARC_SEGMENT) -> Result<Self> {
        Ok(Self {
            to: src.point.into(),
            size: src.size.into(),
            rotation_angle: src.rotationAngle,
            sweep_direction: src.sweepDirection.try_into()?,
            arc_size: src.arcSize.try_into()?,
        })
    }
}

/// Receives a geometry flattened to lines and cubic beziers, as produced by
/// `ID2D1Geometry::Simplify` and friends.
///
/// None of these methods but `close` can report a status to Direct2D. A failure
/// is handled by the shadow's [`FaultPolicy`].
pub trait SimplifiedGeometrySink: Send + Sync {
    fn set_fill_mode(&self, _mode: FillMode) -> Result<()> {
        Ok(())
    }

    fn set_segment_flags(&self, _flags: PathSegment) -> Result<()> {
        Ok(())
    }

    fn begin_figure(&self, start: Point, begin: FigureBegin) -> Result<()>;
    fn add_lines(&self, points: &[Point]) -> Result<()>;
    fn add_beziers(&self, segments: &[CubicBezierSegment]) -> Result<()>;
    fn end_figure(&self, end: FigureEnd) -> Result<()>;
    fn close(&self) -> Result<()>;
}

/// Receives the full set of path segments, as produced by `ID2D1PathGeometry::Stream`.
pub trait GeometrySink: SimplifiedGeometrySink {
    fn add_line(&self, point: Point) -> Result<()> {
        self.add_lines(std::slice::from_ref(&point))
    }

    fn add_bezier(&self, segment: &CubicBezierSegment) -> Result<()> {
        self.add_beziers(std::slice::from_ref(segment))
    }

    fn add_quadratic_bezier(&self, segment: &QuadraticBezierSegment) -> Result<()>;

    fn add_quadratic_beziers(&self, segments: &[QuadraticBezierSegment]) -> Result<()> {
        segments
            .iter()
            .try_for_each(|segment| self.add_quadratic_bezier(segment))
    }

    fn add_arc(&self, segment: &ArcSegment) -> Result<()>;
}

#[allow(non_snake_case)]
#[repr(C)]
pub struct SimplifiedGeometrySinkVtbl {
    pub base: IUnknownVtbl,
    pub SetFillMode: unsafe extern "system" fn(this: *mut c_void, mode: u32),
    pub SetSegmentFlags: unsafe extern "system" fn(this: *mut c_void, flags: u32),
    pub BeginFigure:
        unsafe extern "system" fn(this: *mut c_void, start: D2D_POINT_2F, begin: u32),
    pub AddLines:
        unsafe extern "system" fn(this: *mut c_void, points: *const D2D_POINT_2F, count: u32),
    pub AddBeziers: unsafe extern "system" fn(
        this: *mut c_void,
        beziers: *const D2D1_BEZIER_SEGMENT,
        count: u32,
    ),
    pub EndFigure: unsafe extern "system" fn(this: *mut c_void, end: u32),
    pub Close: unsafe extern "system" fn(this: *mut c_void) -> HResult,
}

impl SimplifiedGeometrySinkVtbl {
    pub const fn new<I>() -> Self
    where
        I: Interface,
        I::Callback: SimplifiedGeometrySink,
    {
        Self {
            base: IUnknownVtbl::new::<I>(),
            SetFillMode: set_fill_mode::<I::Callback>,
            SetSegmentFlags: set_segment_flags::<I::Callback>,
            BeginFigure: begin_figure::<I::Callback>,
            AddLines: add_lines::<I::Callback>,
            AddBeziers: add_beziers::<I::Callback>,
            EndFigure: end_figure::<I::Callback>,
            Close: close::<I::Callback>,
        }
    }
}

static SIMPLIFIED_VTBL: SimplifiedGeometrySinkVtbl =
    SimplifiedGeometrySinkVtbl::new::<SimplifiedGeometrySinkVtbl>();

unsafe impl Interface for SimplifiedGeometrySinkVtbl {
    type Callback = dyn SimplifiedGeometrySink;

    const NAME: &'static str = "ID2D1SimplifiedGeometrySink";
    const IIDS: &'static [GUID] = &[IID_ID2D1SimplifiedGeometrySink];

    #[inline]
    fn vtable() -> &'static Self {
        &SIMPLIFIED_VTBL
    }
}

pub type SimplifiedGeometrySinkShadow = Shadow<SimplifiedGeometrySinkVtbl>;

#[allow(non_snake_case)]
#[repr(C)]
pub struct GeometrySinkVtbl {
    pub base: SimplifiedGeometrySinkVtbl,
    pub AddLine: unsafe extern "system" fn(this: *mut c_void, point: D2D_POINT_2F),
    pub AddBezier: unsafe extern "system" fn(this: *mut c_void, bezier: *const D2D1_BEZIER_SEGMENT),
    pub AddQuadraticBezier:
        unsafe extern "system" fn(this: *mut c_void, bezier: *const D2D1_QUADRATIC_BEZIER_SEGMENT),
    pub AddQuadraticBeziers: unsafe extern "system" fn(
        this: *mut c_void,
        beziers: *const D2D1_QUADRATIC_BEZIER_SEGMENT,
        count: u32,
    ),
    pub AddArc: unsafe extern "system" fn(this: *mut c_void, arc: *const D2D1_ARC_SEGMENT),
}

impl GeometrySinkVtbl {
    const fn new() -> Self {
        Self {
            base: SimplifiedGeometrySinkVtbl::new::<Self>(),
            AddLine: add_line,
            AddBezier: add_bezier,
            AddQuadraticBezier: add_quadratic_bezier,
            AddQuadraticBeziers: add_quadratic_beziers,
            AddArc: add_arc,
        }
    }
}

static GEOMETRY_VTBL: GeometrySinkVtbl = GeometrySinkVtbl::new();

unsafe impl Interface for GeometrySinkVtbl {
    type Callback = dyn GeometrySink;

    const NAME: &'static str = "ID2D1GeometrySink";
    const IIDS: &'static [GUID] = &[IID_ID2D1SimplifiedGeometrySink, IID_ID2D1GeometrySink];

    #[inline]
    fn vtable() -> &'static Self {
        &GEOMETRY_VTBL
    }
}

pub type GeometrySinkShadow = Shadow<GeometrySinkVtbl>;

unsafe extern "system" fn set_fill_mode<T>(this: *mut c_void, mode: u32)
where
    T: SimplifiedGeometrySink + ?Sized,
{
    dispatch_void::<T>(this, "SetFillMode", |sink| sink.set_fill_mode(mode.try_into()?))
}

unsafe extern "system" fn set_segment_flags<T>(this: *mut c_void, flags: u32)
where
    T: SimplifiedGeometrySink + ?Sized,
{
    dispatch_void::<T>(this, "SetSegmentFlags", |sink| {
        sink.set_segment_flags(flags.try_into()?)
    })
}

unsafe extern "system" fn begin_figure<T>(this: *mut c_void, start: D2D_POINT_2F, begin: u32)
where
    T: SimplifiedGeometrySink + ?Sized,
{
    dispatch_void::<T>(this, "BeginFigure", |sink| {
        sink.begin_figure(start.into(), begin.try_into()?)
    })
}

unsafe extern "system" fn add_lines<T>(this: *mut c_void, points: *const D2D_POINT_2F, count: u32)
where
    T: SimplifiedGeometrySink + ?Sized,
{
    dispatch_void::<T>(this, "AddLines", |sink| {
        let points = copy_buffer(points, count, |p| Point::from(*p))?;
        sink.add_lines(&points)
    })
}

unsafe extern "system" fn add_beziers<T>(
    this: *mut c_void,
    beziers: *const D2D1_BEZIER_SEGMENT,
    count: u32,
) where
    T: SimplifiedGeometrySink + ?Sized,
{
    dispatch_void::<T>(this, "AddBeziers", |sink| {
        let segments = copy_buffer(beziers, count, |s| CubicBezierSegment::from(*s))?;
        sink.add_beziers(&segments)
    })
}

unsafe extern "system" fn end_figure<T>(this: *mut c_void, end: u32)
where
    T: SimplifiedGeometrySink + ?Sized,
{
    dispatch_void::<T>(this, "EndFigure", |sink| sink.end_figure(end.try_into()?))
}

unsafe extern "system" fn close<T>(this: *mut c_void) -> HResult
where
    T: SimplifiedGeometrySink + ?Sized,
{
    dispatch_close::<T>(this, "Close", |sink| sink.close())
}

unsafe extern "system" fn add_line(this: *mut c_void, point: D2D_POINT_2F) {
    dispatch_void::<dyn GeometrySink>(this, "AddLine", |sink| sink.add_line(point.into()))
}

unsafe extern "system" fn add_bezier(this: *mut c_void, bezier: *const D2D1_BEZIER_SEGMENT) {
    dispatch_void::<dyn GeometrySink>(this, "AddBezier", |sink| {
        sink.add_bezier(&read_required(bezier)?.into())
    })
}

unsafe extern "system" fn add_quadratic_bezier(
    this: *mut c_void,
    bezier: *const D2D1_QUADRATIC_BEZIER_SEGMENT,
) {
    dispatch_void::<dyn GeometrySink>(this, "AddQuadraticBezier", |sink| {
        sink.add_quadratic_bezier(&read_required(bezier)?.into())
    })
}

unsafe extern "system" fn add_quadratic_beziers(
    this: *mut c_void,
    beziers: *const D2D1_QUADRATIC_BEZIER_SEGMENT,
    count: u32,
) {
    dispatch_void::<dyn GeometrySink>(this, "AddQuadraticBeziers", |sink| {
        let segments = copy_buffer(beziers, count, |s| QuadraticBezierSegment::from(*s))?;
        sink.add_quadratic_beziers(&segments)
    })
}

unsafe extern "system" fn add_arc(this: *mut c_void, arc: *const D2D1_ARC_SEGMENT) {
    dispatch_void::<dyn GeometrySink>(this, "AddArc", |sink| {
        sink.add_arc(&read_required(arc)?.try_into()?)
    })
}
