//! Custom effect properties and the native binding thunks that read and write them.

use crate::abi::*;
use crate::effect::{CustomEffect, EffectImpl};
use crate::shadow::ShadowObject;
use crate::utility::copy_buffer;
use crate::*;
use bytemuck::Pod;
use std::ffi::c_void;
use std::marker::PhantomData;

/// A value type Direct2D can store in an effect property.
pub trait PropertyValue: Copy + Send + Sync + 'static {
    /// The `type` attribute of the property in the effect XML.
    const TYPE_NAME: &'static str;

    /// The in-memory layout Direct2D hands to the binding functions.
    type Native: Pod;

    fn to_native(self) -> Self::Native;
    fn from_native(native: Self::Native) -> Result<Self>;

    /// The `value` attribute of a `Default` element.
    fn to_xml(&self) -> String;

    fn encode(self) -> Vec<u8> {
        bytemuck::bytes_of(&self.to_native()).to_vec()
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        let expected = std::mem::size_of::<Self::Native>();
        if bytes.len() != expected {
            return Err(Error::new(
                ErrorKind::InvalidArg,
                format!(
                    "{} property takes {} bytes, got {}",
                    Self::TYPE_NAME,
                    expected,
                    bytes.len()
                ),
            ));
        }
        Self::from_native(bytemuck::pod_read_unaligned(bytes))
    }
}

fn float_list(values: &[f32]) -> String {
    let values = values.iter().map(|v| format!("{:?}", v)).collect::<Vec<_>>();
    format!("({})", values.join(", "))
}

impl PropertyValue for f32 {
    const TYPE_NAME: &'static str = "float";
    type Native = f32;

    #[inline]
    fn to_native(self) -> f32 {
        self
    }

    #[inline]
    fn from_native(native: f32) -> Result<Self> {
        Ok(native)
    }

    fn to_xml(&self) -> String {
        format!("{:?}", self)
    }
}

impl PropertyValue for u32 {
    const TYPE_NAME: &'static str = "uint32";
    type Native = u32;

    #[inline]
    fn to_native(self) -> u32 {
        self
    }

    #[inline]
    fn from_native(native: u32) -> Result<Self> {
        Ok(native)
    }

    fn to_xml(&self) -> String {
        self.to_string()
    }
}

impl PropertyValue for i32 {
    const TYPE_NAME: &'static str = "int32";
    type Native = i32;

    #[inline]
    fn to_native(self) -> i32 {
        self
    }

    #[inline]
    fn from_native(native: i32) -> Result<Self> {
        Ok(native)
    }

    fn to_xml(&self) -> String {
        self.to_string()
    }
}

impl PropertyValue for bool {
    const TYPE_NAME: &'static str = "bool";
    type Native = BOOL;

    #[inline]
    fn to_native(self) -> BOOL {
        self as BOOL
    }

    #[inline]
    fn from_native(native: BOOL) -> Result<Self> {
        Ok(native != 0)
    }

    fn to_xml(&self) -> String {
        self.to_string()
    }
}

impl PropertyValue for glam::Vec2 {
    const TYPE_NAME: &'static str = "vector2";
    type Native = [f32; 2];

    #[inline]
    fn to_native(self) -> [f32; 2] {
        self.to_array()
    }

    #[inline]
    fn from_native(native: [f32; 2]) -> Result<Self> {
        Ok(Self::from_array(native))
    }

    fn to_xml(&self) -> String {
        float_list(&self.to_array())
    }
}

impl PropertyValue for glam::Vec3 {
    const TYPE_NAME: &'static str = "vector3";
    type Native = [f32; 3];

    #[inline]
    fn to_native(self) -> [f32; 3] {
        self.to_array()
    }

    #[inline]
    fn from_native(native: [f32; 3]) -> Result<Self> {
        Ok(Self::from_array(native))
    }

    fn to_xml(&self) -> String {
        float_list(&self.to_array())
    }
}

impl PropertyValue for glam::Vec4 {
    const TYPE_NAME: &'static str = "vector4";
    type Native = [f32; 4];

    #[inline]
    fn to_native(self) -> [f32; 4] {
        self.to_array()
    }

    #[inline]
    fn from_native(native: [f32; 4]) -> Result<Self> {
        Ok(Self::from_array(native))
    }

    fn to_xml(&self) -> String {
        float_list(&self.to_array())
    }
}

impl PropertyValue for Matrix3x2 {
    const TYPE_NAME: &'static str = "matrix3x2";
    type Native = D2D_MATRIX_3X2_F;

    #[inline]
    fn to_native(self) -> D2D_MATRIX_3X2_F {
        self.into()
    }

    #[inline]
    fn from_native(native: D2D_MATRIX_3X2_F) -> Result<Self> {
        Ok(native.into())
    }

    fn to_xml(&self) -> String {
        float_list(&self.to_cols_array())
    }
}

impl PropertyValue for Matrix4x4 {
    const TYPE_NAME: &'static str = "matrix4x4";
    type Native = D2D_MATRIX_4X4_F;

    #[inline]
    fn to_native(self) -> D2D_MATRIX_4X4_F {
        self.into()
    }

    #[inline]
    fn from_native(native: D2D_MATRIX_4X4_F) -> Result<Self> {
        Ok(native.into())
    }

    fn to_xml(&self) -> String {
        float_list(&self.to_cols_array())
    }
}

/// One property of the custom effect `E`.
///
/// Implemented by a zero-sized marker type per property:
///
/// ```ignore
/// struct Frequency;
///
/// impl Property<Ripple> for Frequency {
///     const NAME: &'static str = "Frequency";
///     type Value = f32;
///
///     fn get(effect: &Ripple) -> f32 {
///         *effect.frequency.lock()
///     }
///
///     fn set(effect: &Ripple, value: f32) -> Result<()> {
///         *effect.frequency.lock() = value;
///         Ok(())
///     }
/// }
/// ```
pub trait Property<E>: 'static {
    const NAME: &'static str;
    type Value: PropertyValue;

    fn get(effect: &E) -> Self::Value;
    fn set(effect: &E, value: Self::Value) -> Result<()>;

    fn default_value() -> Option<Self::Value> {
        None
    }
}

/// A property of `E` ready to be handed to `RegisterEffectFromString`.
pub struct PropertyBinding<E> {
    name: &'static str,
    type_name: &'static str,
    default_xml: Option<String>,
    set: PD2D1_PROPERTY_SET_FUNCTION,
    get: PD2D1_PROPERTY_GET_FUNCTION,
    _effect: PhantomData<fn() -> E>,
}

impl<E: CustomEffect> PropertyBinding<E> {
    pub fn of<P: Property<E>>() -> Self {
        Self {
            name: P::NAME,
            type_name: <P::Value as PropertyValue>::TYPE_NAME,
            default_xml: P::default_value().map(|v| v.to_xml()),
            set: set_property::<E, P>,
            get: get_property::<E, P>,
            _effect: PhantomData,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn default_xml(&self) -> Option<&str> {
        self.default_xml.as_deref()
    }

    #[inline]
    pub fn set_function(&self) -> PD2D1_PROPERTY_SET_FUNCTION {
        self.set
    }

    #[inline]
    pub fn get_function(&self) -> PD2D1_PROPERTY_GET_FUNCTION {
        self.get
    }
}

impl<E> std::fmt::Debug for PropertyBinding<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("PropertyBinding")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("default_xml", &self.default_xml)
            .finish()
    }
}

unsafe fn effect_object<'a>(effect: *const c_void) -> Option<&'a ShadowObject<dyn EffectImpl>> {
    ShadowObject::<dyn EffectImpl>::from_this(effect)
}

unsafe extern "system" fn set_property<E, P>(
    effect: *const c_void,
    data: *const u8,
    data_size: u32,
) -> HResult
where
    E: CustomEffect,
    P: Property<E>,
{
    let Some(object) = effect_object(effect) else {
        return E_POINTER;
    };
    let ret = object.invoke_concrete::<E, _>(P::NAME, |effect| {
        let bytes = copy_buffer(data, data_size, |b| *b)?;
        P::set(effect, <P::Value as PropertyValue>::decode(&bytes)?)
    });
    match ret {
        Ok(()) => S_OK,
        Err(e) => e.status(),
    }
}

unsafe extern "system" fn get_property<E, P>(
    effect: *const c_void,
    data: *mut u8,
    data_size: u32,
    actual_size: *mut u32,
) -> HResult
where
    E: CustomEffect,
    P: Property<E>,
{
    let Some(object) = effect_object(effect) else {
        return E_POINTER;
    };
    let ret = object.invoke_concrete::<E, _>(P::NAME, |effect| {
        let bytes = P::get(effect).encode();
        let len = bytes.len() as u32;
        if !actual_size.is_null() {
            *actual_size = len;
        }
        if data.is_null() || data_size < len {
            return Err(Error::new(
                ErrorKind::InsufficientBuffer,
                format!("{} needs {} bytes, got {}", P::NAME, len, data_size),
            ));
        }
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), data, bytes.len());
        Ok(())
    });
    match ret {
        Ok(()) => S_OK,
        Err(e) => e.status(),
    }
}
