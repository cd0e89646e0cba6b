//! Helpers for tests that play the native caller.

use crate::abi::*;
use crate::*;
use parking_lot::Mutex;
use std::ffi::c_void;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The dispatch table of a shadow, the way native code sees it.
pub unsafe fn vtbl<V>(raw: *mut c_void) -> &'static V {
    &**(raw as *const *const V)
}

pub fn triangle(v: f32) -> D2D1_TRIANGLE {
    D2D1_TRIANGLE {
        point1: D2D_POINT_2F { x: v, y: 0.0 },
        point2: D2D_POINT_2F { x: v + 1.0, y: 0.0 },
        point3: D2D_POINT_2F { x: v, y: v + 1.0 },
    }
}

#[derive(Default)]
pub struct RecordingTessellationSink {
    triangles: Mutex<Vec<Triangle>>,
    closes: AtomicUsize,
}

impl RecordingTessellationSink {
    pub fn triangles(&self) -> Vec<Triangle> {
        self.triangles.lock().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.close_count() > 0
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl TessellationSink for RecordingTessellationSink {
    fn add_triangles(&self, triangles: &[Triangle]) -> Result<()> {
        self.triangles.lock().extend_from_slice(triangles);
        Ok(())
    }

    fn close(&self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn recording_tessellation_sink() -> (TessellationSinkShadow, Arc<RecordingTessellationSink>) {
    let sink = Arc::new(RecordingTessellationSink::default());
    (TessellationSinkShadow::new(sink.clone()), sink)
}

/// Rejects every batch with `D2DERR_BAD_NUMBER`.
#[derive(Default)]
pub struct FailingTessellationSink {
    closes: AtomicUsize,
}

impl FailingTessellationSink {
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl TessellationSink for FailingTessellationSink {
    fn add_triangles(&self, _: &[Triangle]) -> Result<()> {
        Err(Error::new(ErrorKind::BadNumber, "NaN vertex"))
    }

    fn close(&self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct PanickingTessellationSink;

impl TessellationSink for PanickingTessellationSink {
    fn add_triangles(&self, _: &[Triangle]) -> Result<()> {
        panic!("add_triangles")
    }

    fn close(&self) -> Result<()> {
        panic!("close")
    }
}

/// A minimal native COM object standing in for a brush, geometry or effect
/// context passed as an argument.
#[repr(C)]
pub struct FakeUnknown {
    vtbl: *const IUnknownVtbl,
    refs: AtomicUsize,
}

static FAKE_VTBL: IUnknownVtbl = IUnknownVtbl {
    QueryInterface: fake_query_interface,
    AddRef: fake_add_ref,
    Release: fake_release,
};

unsafe extern "system" fn fake_query_interface(
    this: *mut c_void,
    riid: *const GUID,
    object: *mut *mut c_void,
) -> HResult {
    if *riid == IID_IUnknown {
        fake_add_ref(this);
        *object = this;
        S_OK
    } else {
        *object = std::ptr::null_mut();
        E_NOINTERFACE
    }
}

unsafe extern "system" fn fake_add_ref(this: *mut c_void) -> u32 {
    let object = &*(this as *const FakeUnknown);
    (object.refs.fetch_add(1, Ordering::SeqCst) + 1) as u32
}

// The test owns the memory; the count only records what the crate did.
unsafe extern "system" fn fake_release(this: *mut c_void) -> u32 {
    let object = &*(this as *const FakeUnknown);
    (object.refs.fetch_sub(1, Ordering::SeqCst) - 1) as u32
}

impl FakeUnknown {
    pub fn new() -> Box<Self> {
        Box::new(Self {
            vtbl: &FAKE_VTBL,
            refs: AtomicUsize::new(1),
        })
    }

    pub fn as_raw(&self) -> *mut c_void {
        self as *const Self as *mut c_void
    }

    pub fn ref_count(&self) -> usize {
        self.refs.load(Ordering::SeqCst)
    }
}

unsafe impl Send for FakeUnknown {}
unsafe impl Sync for FakeUnknown {}
