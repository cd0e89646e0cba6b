use crate::abi::*;
use crate::shadow::*;
use crate::utility::copy_buffer;
use crate::*;
use std::ffi::c_void;

/// Receives the triangles produced by `ID2D1Geometry::Tessellate` or `ID2D1Mesh::Open`.
pub trait TessellationSink: Send + Sync {
    /// Called once per batch. The batch is an owned copy of the native buffer.
    fn add_triangles(&self, triangles: &[Triangle]) -> Result<()>;

    fn close(&self) -> Result<()>;
}

#[allow(non_snake_case)]
#[repr(C)]
pub struct TessellationSinkVtbl {
    pub base: IUnknownVtbl,
    pub AddTriangles:
        unsafe extern "system" fn(this: *mut c_void, triangles: *const D2D1_TRIANGLE, count: u32),
    pub Close: unsafe extern "system" fn(this: *mut c_void) -> HResult,
}

impl TessellationSinkVtbl {
    const fn new() -> Self {
        Self {
            base: IUnknownVtbl::new::<Self>(),
            AddTriangles: add_triangles,
            Close: close,
        }
    }
}

static VTBL: TessellationSinkVtbl = TessellationSinkVtbl::new();

unsafe impl Interface for TessellationSinkVtbl {
    type Callback = dyn TessellationSink;

    const NAME: &'static str = "ID2D1TessellationSink";
    const IIDS: &'static [GUID] = &[IID_ID2D1TessellationSink];

    #[inline]
    fn vtable() -> &'static Self {
        &VTBL
    }
}

pub type TessellationSinkShadow = Shadow<TessellationSinkVtbl>;

unsafe extern "system" fn add_triangles(
    this: *mut c_void,
    triangles: *const D2D1_TRIANGLE,
    count: u32,
) {
    dispatch_void::<dyn TessellationSink>(this, "AddTriangles", |sink| {
        let triangles = copy_buffer(triangles, count, |t| Triangle::from(*t))?;
        sink.add_triangles(&triangles)
    })
}

unsafe extern "system" fn close(this: *mut c_void) -> HResult {
    dispatch_close::<dyn TessellationSink>(this, "Close", |sink| sink.close())
}
