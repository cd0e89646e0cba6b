//! Transform nodes of a custom effect's graph.

use crate::abi::*;
use crate::shadow::*;
use crate::unknown::required;
use crate::utility::{copy_buffer, read_required};
use crate::*;
use std::ffi::c_void;

pub trait TransformNode: Send + Sync {
    fn input_count(&self) -> u32;
}

pub trait Transform: TransformNode {
    /// Fills `input_rects` (one per input) with the input areas needed to
    /// produce `output_rect`.
    fn map_output_rect_to_input_rects(
        &self,
        output_rect: &RectL,
        input_rects: &mut [RectL],
    ) -> Result<()>;

    /// Returns the output rectangle and the opaque part of it.
    fn map_input_rects_to_output_rect(
        &self,
        input_rects: &[RectL],
        input_opaque_sub_rects: &[RectL],
    ) -> Result<(RectL, RectL)>;

    fn map_invalid_rect(&self, input_index: u32, invalid_input_rect: RectL) -> Result<RectL>;
}

pub trait DrawTransform: Transform {
    fn set_draw_info(&self, info: &Unknown) -> Result<()>;
}

pub trait ComputeTransform: Transform {
    fn set_compute_info(&self, info: &Unknown) -> Result<()>;
    fn calculate_threadgroups(&self, output_rect: &RectL) -> Result<[u32; 3]>;
}

pub trait SourceTransform: Transform {
    fn set_render_info(&self, info: &Unknown) -> Result<()>;
    fn draw(&self, target: &Unknown, draw_rect: &RectL, target_origin: PointU) -> Result<()>;
}

pub trait AnalysisTransform: Send + Sync {
    fn process_analysis_results(&self, data: &[u8]) -> Result<()>;
}

#[allow(non_snake_case)]
#[repr(C)]
pub struct TransformNodeVtbl {
    pub base: IUnknownVtbl,
    pub GetInputCount: unsafe extern "system" fn(this: *mut c_void) -> u32,
}

impl TransformNodeVtbl {
    pub const fn new<I>() -> Self
    where
        I: Interface,
        I::Callback: TransformNode,
    {
        Self {
            base: IUnknownVtbl::new::<I>(),
            GetInputCount: get_input_count::<I::Callback>,
        }
    }
}

#[allow(non_snake_case)]
#[repr(C)]
pub struct TransformVtbl {
    pub base: TransformNodeVtbl,
    pub MapOutputRectToInputRects: unsafe extern "system" fn(
        this: *mut c_void,
        output_rect: *const D2D_RECT_L,
        input_rects: *mut D2D_RECT_L,
        input_rects_count: u32,
    ) -> HResult,
    pub MapInputRectsToOutputRect: unsafe extern "system" fn(
        this: *mut c_void,
        input_rects: *const D2D_RECT_L,
        input_opaque_sub_rects: *const D2D_RECT_L,
        input_rect_count: u32,
        output_rect: *mut D2D_RECT_L,
        output_opaque_sub_rect: *mut D2D_RECT_L,
    ) -> HResult,
    pub MapInvalidRect: unsafe extern "system" fn(
        this: *mut c_void,
        input_index: u32,
        invalid_input_rect: D2D_RECT_L,
        invalid_output_rect: *mut D2D_RECT_L,
    ) -> HResult,
}

impl TransformVtbl {
    pub const fn new<I>() -> Self
    where
        I: Interface,
        I::Callback: Transform,
    {
        Self {
            base: TransformNodeVtbl::new::<I>(),
            MapOutputRectToInputRects: map_output_rect_to_input_rects::<I::Callback>,
            MapInputRectsToOutputRect: map_input_rects_to_output_rect::<I::Callback>,
            MapInvalidRect: map_invalid_rect::<I::Callback>,
        }
    }
}

#[allow(non_snake_case)]
#[repr(C)]
pub struct DrawTransformVtbl {
    pub base: TransformVtbl,
    pub SetDrawInfo: unsafe extern "system" fn(this: *mut c_void, info: *mut c_void) -> HResult,
}

#[allow(non_snake_case)]
#[repr(C)]
pub struct ComputeTransformVtbl {
    pub base: TransformVtbl,
    pub SetComputeInfo: unsafe extern "system" fn(this: *mut c_void, info: *mut c_void) -> HResult,
    pub CalculateThreadgroups: unsafe extern "system" fn(
        this: *mut c_void,
        output_rect: *const D2D_RECT_L,
        dimension_x: *mut u32,
        dimension_y: *mut u32,
        dimension_z: *mut u32,
    ) -> HResult,
}

#[allow(non_snake_case)]
#[repr(C)]
pub struct SourceTransformVtbl {
    pub base: TransformVtbl,
    pub SetRenderInfo: unsafe extern "system" fn(this: *mut c_void, info: *mut c_void) -> HResult,
    pub Draw: unsafe extern "system" fn(
        this: *mut c_void,
        target: *mut c_void,
        draw_rect: *const D2D_RECT_L,
        target_origin: D2D_POINT_2U,
    ) -> HResult,
}

#[allow(non_snake_case)]
#[repr(C)]
pub struct AnalysisTransformVtbl {
    pub base: IUnknownVtbl,
    pub ProcessAnalysisResults:
        unsafe extern "system" fn(this: *mut c_void, data: *const u8, count: u32) -> HResult,
}

static NODE_VTBL: TransformNodeVtbl = TransformNodeVtbl::new::<TransformNodeVtbl>();
static TRANSFORM_VTBL: TransformVtbl = TransformVtbl::new::<TransformVtbl>();

static DRAW_VTBL: DrawTransformVtbl = DrawTransformVtbl {
    base: TransformVtbl::new::<DrawTransformVtbl>(),
    SetDrawInfo: set_draw_info,
};

static COMPUTE_VTBL: ComputeTransformVtbl = ComputeTransformVtbl {
    base: TransformVtbl::new::<ComputeTransformVtbl>(),
    SetComputeInfo: set_compute_info,
    CalculateThreadgroups: calculate_threadgroups,
};

static SOURCE_VTBL: SourceTransformVtbl = SourceTransformVtbl {
    base: TransformVtbl::new::<SourceTransformVtbl>(),
    SetRenderInfo: set_render_info,
    Draw: draw,
};

static ANALYSIS_VTBL: AnalysisTransformVtbl = AnalysisTransformVtbl {
    base: IUnknownVtbl::new::<AnalysisTransformVtbl>(),
    ProcessAnalysisResults: process_analysis_results,
};

unsafe impl Interface for TransformNodeVtbl {
    type Callback = dyn TransformNode;

    const NAME: &'static str = "ID2D1TransformNode";
    const IIDS: &'static [GUID] = &[IID_ID2D1TransformNode];

    #[inline]
    fn vtable() -> &'static Self {
        &NODE_VTBL
    }
}

unsafe impl Interface for TransformVtbl {
    type Callback = dyn Transform;

    const NAME: &'static str = "ID2D1Transform";
    const IIDS: &'static [GUID] = &[IID_ID2D1TransformNode, IID_ID2D1Transform];

    #[inline]
    fn vtable() -> &'static Self {
        &TRANSFORM_VTBL
    }
}

unsafe impl Interface for DrawTransformVtbl {
    type Callback = dyn DrawTransform;

    const NAME: &'static str = "ID2D1DrawTransform";
    const IIDS: &'static [GUID] = &[
        IID_ID2D1TransformNode,
        IID_ID2D1Transform,
        IID_ID2D1DrawTransform,
    ];

    #[inline]
    fn vtable() -> &'static Self {
        &DRAW_VTBL
    }
}

unsafe impl Interface for ComputeTransformVtbl {
    type Callback = dyn ComputeTransform;

    const NAME: &'static str = "ID2D1ComputeTransform";
    const IIDS: &'static [GUID] = &[
        IID_ID2D1TransformNode,
        IID_ID2D1Transform,
        IID_ID2D1ComputeTransform,
    ];

    #[inline]
    fn vtable() -> &'static Self {
        &COMPUTE_VTBL
    }
}

unsafe impl Interface for SourceTransformVtbl {
    type Callback = dyn SourceTransform;

    const NAME: &'static str = "ID2D1SourceTransform";
    const IIDS: &'static [GUID] = &[
        IID_ID2D1TransformNode,
        IID_ID2D1Transform,
        IID_ID2D1SourceTransform,
    ];

    #[inline]
    fn vtable() -> &'static Self {
        &SOURCE_VTBL
    }
}

unsafe impl Interface for AnalysisTransformVtbl {
    type Callback = dyn AnalysisTransform;

    const NAME: &'static str = "ID2D1AnalysisTransform";
    const IIDS: &'static [GUID] = &[IID_ID2D1AnalysisTransform];

    #[inline]
    fn vtable() -> &'static Self {
        &ANALYSIS_VTBL
    }
}

pub type TransformNodeShadow = Shadow<TransformNodeVtbl>;
pub type TransformShadow = Shadow<TransformVtbl>;
pub type DrawTransformShadow = Shadow<DrawTransformVtbl>;
pub type ComputeTransformShadow = Shadow<ComputeTransformVtbl>;
pub type SourceTransformShadow = Shadow<SourceTransformVtbl>;
pub type AnalysisTransformShadow = Shadow<AnalysisTransformVtbl>;

unsafe extern "system" fn get_input_count<T>(this: *mut c_void) -> u32
where
    T: TransformNode + ?Sized,
{
    dispatch_value::<T, _>(this, "GetInputCount", 0, |node| Ok(node.input_count()))
}

unsafe extern "system" fn map_output_rect_to_input_rects<T>(
    this: *mut c_void,
    output_rect: *const D2D_RECT_L,
    input_rects: *mut D2D_RECT_L,
    input_rects_count: u32,
) -> HResult
where
    T: Transform + ?Sized,
{
    dispatch::<T>(this, "MapOutputRectToInputRects", |transform| {
        let output_rect = RectL::from(read_required(output_rect)?);
        if input_rects.is_null() && input_rects_count > 0 {
            return Err(ErrorKind::Pointer.into());
        }
        // `input_rects` is write-only
        let mut scratch = vec![RectL::default(); input_rects_count as usize];
        transform.map_output_rect_to_input_rects(&output_rect, &mut scratch)?;
        for (i, rect) in scratch.into_iter().enumerate() {
            *input_rects.add(i) = rect.into();
        }
        Ok(())
    })
}

unsafe extern "system" fn map_input_rects_to_output_rect<T>(
    this: *mut c_void,
    input_rects: *const D2D_RECT_L,
    input_opaque_sub_rects: *const D2D_RECT_L,
    input_rect_count: u32,
    output_rect: *mut D2D_RECT_L,
    output_opaque_sub_rect: *mut D2D_RECT_L,
) -> HResult
where
    T: Transform + ?Sized,
{
    dispatch::<T>(this, "MapInputRectsToOutputRect", |transform| {
        if output_rect.is_null() || output_opaque_sub_rect.is_null() {
            return Err(ErrorKind::Pointer.into());
        }
        let inputs = copy_buffer(input_rects, input_rect_count, |r| RectL::from(*r))?;
        let opaques = copy_buffer(input_opaque_sub_rects, input_rect_count, |r| RectL::from(*r))?;
        let (output, opaque) = transform.map_input_rects_to_output_rect(&inputs, &opaques)?;
        *output_rect = output.into();
        *output_opaque_sub_rect = opaque.into();
        Ok(())
    })
}

unsafe extern "system" fn map_invalid_rect<T>(
    this: *mut c_void,
    input_index: u32,
    invalid_input_rect: D2D_RECT_L,
    invalid_output_rect: *mut D2D_RECT_L,
) -> HResult
where
    T: Transform + ?Sized,
{
    dispatch::<T>(this, "MapInvalidRect", |transform| {
        if invalid_output_rect.is_null() {
            return Err(ErrorKind::Pointer.into());
        }
        let rect = transform.map_invalid_rect(input_index, invalid_input_rect.into())?;
        *invalid_output_rect = rect.into();
        Ok(())
    })
}

unsafe extern "system" fn set_draw_info(this: *mut c_void, info: *mut c_void) -> HResult {
    dispatch::<dyn DrawTransform>(this, "SetDrawInfo", |transform| {
        transform.set_draw_info(&required(info)?)
    })
}

unsafe extern "system" fn set_compute_info(this: *mut c_void, info: *mut c_void) -> HResult {
    dispatch::<dyn ComputeTransform>(this, "SetComputeInfo", |transform| {
        transform.set_compute_info(&required(info)?)
    })
}

unsafe extern "system" fn calculate_threadgroups(
    this: *mut c_void,
    output_rect: *const D2D_RECT_L,
    dimension_x: *mut u32,
    dimension_y: *mut u32,
    dimension_z: *mut u32,
) -> HResult {
    dispatch::<dyn ComputeTransform>(this, "CalculateThreadgroups", |transform| {
        if dimension_x.is_null() || dimension_y.is_null() || dimension_z.is_null() {
            return Err(ErrorKind::Pointer.into());
        }
        let [x, y, z] = transform.calculate_threadgroups(&read_required(output_rect)?.into())?;
        *dimension_x = x;
        *dimension_y = y;
        *dimension_z = z;
        Ok(())
    })
}

unsafe extern "system" fn set_render_info(this: *mut c_void, info: *mut c_void) -> HResult {
    dispatch::<dyn SourceTransform>(this, "SetRenderInfo", |transform| {
        transform.set_render_info(&required(info)?)
    })
}

unsafe extern "system" fn draw(
    this: *mut c_void,
    target: *mut c_void,
    draw_rect: *const D2D_RECT_L,
    target_origin: D2D_POINT_2U,
) -> HResult {
    dispatch::<dyn SourceTransform>(this, "Draw", |transform| {
        transform.draw(
            &required(target)?,
            &read_required(draw_rect)?.into(),
            target_origin.into(),
        )
    })
}

unsafe extern "system" fn process_analysis_results(
    this: *mut c_void,
    data: *const u8,
    count: u32,
) -> HResult {
    dispatch::<dyn AnalysisTransform>(this, "ProcessAnalysisResults", |transform| {
        let data = copy_buffer(data, count, |b| *b)?;
        transform.process_analysis_results(&data)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use parking_lot::Mutex;
    use std::mem::{offset_of, size_of};
    use std::sync::Arc;

    /// Grows every rectangle by `radius`, like a blur.
    struct Inflate {
        radius: i32,
        infos: Mutex<Vec<*mut c_void>>,
    }

    unsafe impl Send for Inflate {}
    unsafe impl Sync for Inflate {}

    impl Inflate {
        fn new(radius: i32) -> Arc<Self> {
            Arc::new(Self {
                radius,
                infos: Mutex::new(Vec::new()),
            })
        }

        fn inflate(&self, r: RectL) -> RectL {
            RectL::new(
                r.left - self.radius,
                r.top - self.radius,
                r.right + self.radius,
                r.bottom + self.radius,
            )
        }
    }

    impl TransformNode for Inflate {
        fn input_count(&self) -> u32 {
            1
        }
    }

    impl Transform for Inflate {
        fn map_output_rect_to_input_rects(
            &self,
            output_rect: &RectL,
            input_rects: &mut [RectL],
        ) -> Result<()> {
            if input_rects.len() != 1 {
                return Err(ErrorKind::InvalidArg.into());
            }
            input_rects[0] = self.inflate(*output_rect);
            Ok(())
        }

        fn map_input_rects_to_output_rect(
            &self,
            input_rects: &[RectL],
            _: &[RectL],
        ) -> Result<(RectL, RectL)> {
            let rect = input_rects.first().ok_or(ErrorKind::InvalidArg)?;
            Ok((self.inflate(*rect), RectL::default()))
        }

        fn map_invalid_rect(&self, _: u32, invalid_input_rect: RectL) -> Result<RectL> {
            Ok(self.inflate(invalid_input_rect))
        }
    }

    impl DrawTransform for Inflate {
        fn set_draw_info(&self, info: &Unknown) -> Result<()> {
            self.infos.lock().push(info.as_raw());
            Ok(())
        }
    }

    impl ComputeTransform for Inflate {
        fn set_compute_info(&self, info: &Unknown) -> Result<()> {
            self.infos.lock().push(info.as_raw());
            Ok(())
        }

        fn calculate_threadgroups(&self, output_rect: &RectL) -> Result<[u32; 3]> {
            let size = output_rect.size();
            if size.width < 0 || size.height < 0 {
                return Err(ErrorKind::InvalidArg.into());
            }
            Ok([(size.width as u32 + 7) / 8, (size.height as u32 + 7) / 8, 1])
        }
    }

    impl SourceTransform for Inflate {
        fn set_render_info(&self, info: &Unknown) -> Result<()> {
            self.infos.lock().push(info.as_raw());
            Ok(())
        }

        fn draw(&self, _: &Unknown, draw_rect: &RectL, target_origin: PointU) -> Result<()> {
            if target_origin != PointU::new(3, 4) || draw_rect.size().width != 10 {
                return Err(ErrorKind::InvalidArg.into());
            }
            Ok(())
        }
    }

    struct PanickingNode;

    impl TransformNode for PanickingNode {
        fn input_count(&self) -> u32 {
            panic!("input_count")
        }
    }

    #[derive(Default)]
    struct Analysis(Mutex<Vec<u8>>);

    impl AnalysisTransform for Analysis {
        fn process_analysis_results(&self, data: &[u8]) -> Result<()> {
            self.0.lock().extend_from_slice(data);
            Ok(())
        }
    }

    fn rect(l: i32, t: i32, r: i32, b: i32) -> D2D_RECT_L {
        D2D_RECT_L {
            left: l,
            top: t,
            right: r,
            bottom: b,
        }
    }

    fn entries<V>() -> usize {
        size_of::<V>() / size_of::<usize>()
    }

    #[test]
    fn vtable_layout_test() {
        assert_eq!(entries::<TransformNodeVtbl>(), 4);
        assert_eq!(entries::<TransformVtbl>(), 7);
        assert_eq!(entries::<DrawTransformVtbl>(), 8);
        assert_eq!(entries::<ComputeTransformVtbl>(), 9);
        assert_eq!(entries::<SourceTransformVtbl>(), 9);
        assert_eq!(entries::<AnalysisTransformVtbl>(), 4);
        assert_eq!(offset_of!(TransformVtbl, MapInvalidRect) / size_of::<usize>(), 6);
        assert_eq!(
            offset_of!(ComputeTransformVtbl, CalculateThreadgroups) / size_of::<usize>(),
            8
        );
        assert_eq!(offset_of!(SourceTransformVtbl, Draw) / size_of::<usize>(), 8);
    }

    #[test]
    fn map_rects_test() {
        let shadow = DrawTransformShadow::new(Inflate::new(2));
        let raw = shadow.as_raw();
        unsafe {
            let vtbl = vtbl::<DrawTransformVtbl>(raw);
            let transform = &vtbl.base;
            assert_eq!((transform.base.GetInputCount)(raw), 1);

            let mut inputs = [rect(0, 0, 0, 0)];
            assert_eq!(
                (transform.MapOutputRectToInputRects)(raw, &rect(0, 0, 10, 10), inputs.as_mut_ptr(), 1),
                S_OK
            );
            assert_eq!(inputs[0], rect(-2, -2, 12, 12));

            let mut output = rect(0, 0, 0, 0);
            let mut opaque = rect(1, 1, 1, 1);
            let opaques = [rect(0, 0, 0, 0)];
            assert_eq!(
                (transform.MapInputRectsToOutputRect)(
                    raw,
                    inputs.as_ptr(),
                    opaques.as_ptr(),
                    1,
                    &mut output,
                    &mut opaque
                ),
                S_OK
            );
            assert_eq!(output, rect(-4, -4, 14, 14));
            assert_eq!(opaque, rect(0, 0, 0, 0));

            let mut invalid = rect(0, 0, 0, 0);
            assert_eq!(
                (transform.MapInvalidRect)(raw, 0, rect(5, 5, 6, 6), &mut invalid),
                S_OK
            );
            assert_eq!(invalid, rect(3, 3, 8, 8));
        }
    }

    #[test]
    fn input_rects_start_empty_test() {
        struct Observer(Mutex<Vec<RectL>>);

        impl TransformNode for Observer {
            fn input_count(&self) -> u32 {
                2
            }
        }

        impl Transform for Observer {
            fn map_output_rect_to_input_rects(
                &self,
                output_rect: &RectL,
                input_rects: &mut [RectL],
            ) -> Result<()> {
                self.0.lock().extend_from_slice(input_rects);
                input_rects.fill(*output_rect);
                Ok(())
            }

            fn map_input_rects_to_output_rect(
                &self,
                _: &[RectL],
                _: &[RectL],
            ) -> Result<(RectL, RectL)> {
                Err(ErrorKind::NotImpl.into())
            }

            fn map_invalid_rect(&self, _: u32, _: RectL) -> Result<RectL> {
                Err(ErrorKind::NotImpl.into())
            }
        }

        let observer = Arc::new(Observer(Mutex::new(Vec::new())));
        let shadow = TransformShadow::new(observer.clone());
        let raw = shadow.as_raw();
        unsafe {
            let vtbl = vtbl::<TransformVtbl>(raw);
            let garbage = 0x5a5a5a5a;
            let mut inputs = [rect(garbage, garbage, garbage, garbage); 2];
            assert_eq!(
                (vtbl.MapOutputRectToInputRects)(raw, &rect(1, 2, 3, 4), inputs.as_mut_ptr(), 2),
                S_OK
            );
            assert_eq!(inputs, [rect(1, 2, 3, 4); 2]);
            assert_eq!(
                (vtbl.MapOutputRectToInputRects)(raw, &rect(1, 2, 3, 4), std::ptr::null_mut(), 2),
                E_POINTER
            );
        }
        assert_eq!(*observer.0.lock(), vec![RectL::default(); 2]);
    }

    #[test]
    fn failure_leaves_outputs_test() {
        let shadow = TransformShadow::new(Inflate::new(2));
        let raw = shadow.as_raw();
        unsafe {
            let vtbl = vtbl::<TransformVtbl>(raw);
            let mut inputs = [rect(9, 9, 9, 9), rect(9, 9, 9, 9)];
            assert_eq!(
                (vtbl.MapOutputRectToInputRects)(raw, &rect(0, 0, 1, 1), inputs.as_mut_ptr(), 2),
                E_INVALIDARG
            );
            assert_eq!(inputs, [rect(9, 9, 9, 9), rect(9, 9, 9, 9)]);

            let mut output = rect(7, 7, 7, 7);
            let mut opaque = rect(7, 7, 7, 7);
            assert_eq!(
                (vtbl.MapInputRectsToOutputRect)(
                    raw,
                    std::ptr::null(),
                    std::ptr::null(),
                    0,
                    &mut output,
                    &mut opaque
                ),
                E_INVALIDARG
            );
            assert_eq!(output, rect(7, 7, 7, 7));
            assert_eq!(opaque, rect(7, 7, 7, 7));

            assert_eq!(
                (vtbl.MapInvalidRect)(raw, 0, rect(0, 0, 1, 1), std::ptr::null_mut()),
                E_POINTER
            );
        }
    }

    #[test]
    fn compute_test() {
        let inflate = Inflate::new(0);
        let shadow = ComputeTransformShadow::new(inflate.clone());
        let raw = shadow.as_raw();
        let info = FakeUnknown::new();
        unsafe {
            let vtbl = vtbl::<ComputeTransformVtbl>(raw);
            assert_eq!((vtbl.SetComputeInfo)(raw, info.as_raw()), S_OK);
            assert_eq!((vtbl.SetComputeInfo)(raw, std::ptr::null_mut()), E_POINTER);
            let (mut x, mut y, mut z) = (0, 0, 0);
            assert_eq!(
                (vtbl.CalculateThreadgroups)(raw, &rect(0, 0, 17, 8), &mut x, &mut y, &mut z),
                S_OK
            );
            assert_eq!((x, y, z), (3, 1, 1));
            let (mut x, mut y, mut z) = (0, 0, 0);
            assert_eq!(
                (vtbl.CalculateThreadgroups)(raw, &rect(8, 0, 0, 8), &mut x, &mut y, &mut z),
                E_INVALIDARG
            );
            assert_eq!((x, y, z), (0, 0, 0));
        }
        assert_eq!(*inflate.infos.lock(), vec![info.as_raw()]);
        assert_eq!(info.ref_count(), 1);
    }

    #[test]
    fn source_test() {
        let shadow = SourceTransformShadow::new(Inflate::new(0));
        let raw = shadow.as_raw();
        let target = FakeUnknown::new();
        unsafe {
            let vtbl = vtbl::<SourceTransformVtbl>(raw);
            assert_eq!(
                (vtbl.Draw)(
                    raw,
                    target.as_raw(),
                    &rect(0, 0, 10, 10),
                    D2D_POINT_2U { x: 3, y: 4 }
                ),
                S_OK
            );
            assert_eq!(
                (vtbl.Draw)(
                    raw,
                    target.as_raw(),
                    &rect(0, 0, 10, 10),
                    D2D_POINT_2U { x: 0, y: 0 }
                ),
                E_INVALIDARG
            );
            let mut object = std::ptr::null_mut();
            assert_eq!(
                (vtbl.base.base.base.QueryInterface)(raw, &IID_ID2D1DrawTransform, &mut object),
                E_NOINTERFACE
            );
            assert_eq!(
                (vtbl.base.base.base.QueryInterface)(raw, &IID_ID2D1Transform, &mut object),
                S_OK
            );
            (vtbl.base.base.base.Release)(raw);
        }
    }

    #[test]
    fn input_count_fallback_test() {
        init_logger();
        let shadow = TransformNodeShadow::with_config(
            Arc::new(PanickingNode),
            ShadowConfig::default().fault_policy(FaultPolicy::Defer),
        );
        let raw = shadow.as_raw();
        unsafe {
            let vtbl = vtbl::<TransformNodeVtbl>(raw);
            assert_eq!((vtbl.GetInputCount)(raw), 0);
        }
        assert_eq!(shadow.take_fault().unwrap(), ErrorKind::Fail);

        shadow.unregister();
        unsafe {
            let vtbl = vtbl::<TransformNodeVtbl>(raw);
            assert_eq!((vtbl.GetInputCount)(raw), 0);
        }
    }

    #[test]
    fn analysis_test() {
        let analysis = Arc::new(Analysis::default());
        let shadow = AnalysisTransformShadow::new(analysis.clone());
        let raw = shadow.as_raw();
        let data = [1u8, 2, 3, 4];
        unsafe {
            let vtbl = vtbl::<AnalysisTransformVtbl>(raw);
            assert_eq!((vtbl.ProcessAnalysisResults)(raw, data.as_ptr(), 4), S_OK);
            assert_eq!((vtbl.ProcessAnalysisResults)(raw, std::ptr::null(), 0), S_OK);
            assert_eq!(
                (vtbl.ProcessAnalysisResults)(raw, std::ptr::null(), 4),
                E_POINTER
            );
        }
        assert_eq!(*analysis.0.lock(), vec![1, 2, 3, 4]);
    }
}
