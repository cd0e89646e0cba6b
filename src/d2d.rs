//! Bridging to the `windows` crate.

use crate::abi;
use crate::utility::native_enum;
use crate::*;
use std::sync::Arc;
use windows::core::{Interface as _, HRESULT, PCWSTR};
use windows::Foundation::Numerics::Matrix3x2 as NativeMatrix3x2;
use windows::Win32::Graphics::Direct2D::*;

impl From<HResult> for HRESULT {
    #[inline]
    fn from(src: HResult) -> Self {
        HRESULT(src.0)
    }
}

impl From<HRESULT> for HResult {
    #[inline]
    fn from(src: HRESULT) -> Self {
        HResult(src.0)
    }
}

impl From<Error> for windows::core::Error {
    #[inline]
    fn from(src: Error) -> Self {
        windows::core::Error::new(src.status().into(), src.message().unwrap_or_default())
    }
}

impl From<windows::core::Error> for Error {
    #[inline]
    fn from(src: windows::core::Error) -> Self {
        let message = src.message();
        let code = HResult::from(src.code());
        if message.is_empty() {
            code.into()
        } else {
            Error::new(code, message)
        }
    }
}

#[inline]
fn native_guid(src: &abi::GUID) -> windows::core::GUID {
    windows::core::GUID::from_u128(src.to_u128())
}

/// Associates a dispatch table with the `windows` interface type it implements.
pub trait NativeInterface: crate::Interface {
    type Native: windows::core::Interface;
}

macro_rules! native_interface {
    ($($vtbl:ty => $native:ty,)*) => {
        $(
            impl NativeInterface for $vtbl {
                type Native = $native;
            }
        )*
    };
}

native_interface! {
    TessellationSinkVtbl => ID2D1TessellationSink,
    SimplifiedGeometrySinkVtbl => ID2D1SimplifiedGeometrySink,
    GeometrySinkVtbl => ID2D1GeometrySink,
    CommandSinkVtbl => ID2D1CommandSink,
    CommandSink1Vtbl => ID2D1CommandSink1,
    TransformNodeVtbl => ID2D1TransformNode,
    TransformVtbl => ID2D1Transform,
    DrawTransformVtbl => ID2D1DrawTransform,
    ComputeTransformVtbl => ID2D1ComputeTransform,
    SourceTransformVtbl => ID2D1SourceTransform,
    AnalysisTransformVtbl => ID2D1AnalysisTransform,
    EffectImplVtbl => ID2D1EffectImpl,
}

impl<I: NativeInterface> Shadow<I> {
    /// A new native reference to this shadow.
    #[inline]
    pub fn to_native(&self) -> I::Native {
        unsafe { I::Native::from_raw(self.clone().into_raw()) }
    }
}

impl Unknown {
    /// `QueryInterface` for a `windows` interface type.
    pub fn cast<T: windows::core::Interface>(&self) -> Result<T> {
        let unknown = self.query(&abi::GUID::from_u128(T::IID.to_u128()))?;
        Ok(unsafe { T::from_raw(unknown.into_raw()) })
    }
}

/// Registers `E` so that `ID2D1DeviceContext::CreateEffect(&E::CLSID)` creates it.
pub fn register_effect<E: CustomEffect>(factory: &ID2D1Factory1) -> Result<()> {
    let registration = EffectRegistration::new::<E>();
    let bindings = registration.bindings();
    log::debug!(
        "registering {} with {} properties",
        registration.clsid(),
        bindings.len()
    );
    unsafe {
        let bindings = std::slice::from_raw_parts(
            bindings.as_ptr() as *const D2D1_PROPERTY_BINDING,
            bindings.len(),
        );
        factory.RegisterEffectFromString(
            &native_guid(registration.clsid()),
            PCWSTR(registration.wide_xml().as_ptr()),
            (!bindings.is_empty()).then_some(bindings),
            Some(std::mem::transmute(registration.factory())),
        )?;
    }
    Ok(())
}

pub fn unregister_effect<E: CustomEffect>(factory: &ID2D1Factory1) -> Result<()> {
    unsafe {
        factory.UnregisterEffect(&native_guid(&E::CLSID))?;
    }
    Ok(())
}

native_enum! {
    /// `D2D1_GEOMETRY_SIMPLIFICATION_OPTION`
    pub enum SimplificationOption {
        CubicsAndLines = 0,
        Lines = 1,
    }
}

#[inline]
fn native_matrix(m: &Matrix3x2) -> NativeMatrix3x2 {
    let m = abi::D2D_MATRIX_3X2_F::from(*m);
    NativeMatrix3x2 {
        M11: m.M11,
        M12: m.M12,
        M21: m.M21,
        M22: m.M22,
        M31: m.M31,
        M32: m.M32,
    }
}

// The sink is detached once the native call returns, so a reference Direct2D
// keeps past the call never reaches `sink` again.
fn finish<I: crate::Interface>(shadow: Shadow<I>, ret: windows::core::Result<()>) -> Result<()> {
    shadow.unregister();
    if let Some(fault) = shadow.take_fault() {
        return Err(fault);
    }
    ret.map_err(Error::from)
}

/// `ID2D1Geometry::Tessellate` into a Rust sink.
pub fn tessellate(
    geometry: &ID2D1Geometry,
    transform: Option<&Matrix3x2>,
    tolerance: f32,
    sink: Arc<dyn TessellationSink>,
) -> Result<()> {
    let shadow = TessellationSinkShadow::new(sink);
    let native = shadow.to_native();
    let transform = transform.map(native_matrix);
    let ret = unsafe {
        geometry.Tessellate(
            transform.as_ref().map(|m| m as *const _),
            tolerance,
            &native,
        )
    };
    drop(native);
    finish(shadow, ret)
}

/// `ID2D1Geometry::Simplify` into a Rust sink.
pub fn simplify(
    geometry: &ID2D1Geometry,
    option: SimplificationOption,
    transform: Option<&Matrix3x2>,
    tolerance: f32,
    sink: Arc<dyn SimplifiedGeometrySink>,
) -> Result<()> {
    let shadow = SimplifiedGeometrySinkShadow::new(sink);
    let native = shadow.to_native();
    let transform = transform.map(native_matrix);
    let ret = unsafe {
        geometry.Simplify(
            D2D1_GEOMETRY_SIMPLIFICATION_OPTION(u32::from(option) as _),
            transform.as_ref().map(|m| m as *const _),
            tolerance,
            &native,
        )
    };
    drop(native);
    finish(shadow, ret)
}

/// `ID2D1PathGeometry::Stream` into a Rust sink.
pub fn stream_path(path: &ID2D1PathGeometry, sink: Arc<dyn GeometrySink>) -> Result<()> {
    let shadow = GeometrySinkShadow::new(sink);
    let native = shadow.to_native();
    let ret = unsafe { path.Stream(&native) };
    drop(native);
    finish(shadow, ret)
}

/// `ID2D1CommandList::Stream` into a Rust sink.
pub fn stream_command_list(list: &ID2D1CommandList, sink: Arc<dyn CommandSink>) -> Result<()> {
    let shadow = CommandSinkShadow::new(sink);
    let native = shadow.to_native();
    let ret = unsafe { list.Stream(&native) };
    drop(native);
    finish(shadow, ret)
}
