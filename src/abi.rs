//! Native layouts shared with Direct2D.
//!
//! Every item in this module mirrors a declaration of `d2d1.h`, `d2d1_1.h`,
//! `d2d1effectauthor.h` or `dwrite.h` bit for bit. Nothing here may be
//! reordered or resized.
#![allow(non_camel_case_types, non_snake_case, non_upper_case_globals)]

use bytemuck::{Pod, Zeroable};
use std::ffi::c_void;

pub type BOOL = i32;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[repr(transparent)]
pub struct HResult(pub i32);

impl HResult {
    /// `HRESULT_FROM_WIN32`
    #[inline]
    pub const fn from_win32(code: u32) -> Self {
        if code as i32 <= 0 {
            Self(code as i32)
        } else {
            Self(((code & 0x0000ffff) | (7 << 16) | 0x80000000) as i32)
        }
    }

    #[inline]
    pub const fn is_ok(self) -> bool {
        self.0 >= 0
    }

    #[inline]
    pub const fn is_err(self) -> bool {
        self.0 < 0
    }
}

impl std::fmt::Debug for HResult {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "HResult({:#010x})", self.0 as u32)
    }
}

impl std::fmt::Display for HResult {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:#010x}", self.0 as u32)
    }
}

const fn hr(code: u32) -> HResult {
    HResult(code as i32)
}

pub const S_OK: HResult = hr(0x00000000);
pub const S_FALSE: HResult = hr(0x00000001);
pub const E_NOTIMPL: HResult = hr(0x80004001);
pub const E_NOINTERFACE: HResult = hr(0x80004002);
pub const E_POINTER: HResult = hr(0x80004003);
pub const E_ABORT: HResult = hr(0x80004004);
pub const E_FAIL: HResult = hr(0x80004005);
pub const E_UNEXPECTED: HResult = hr(0x8000ffff);
pub const E_ACCESSDENIED: HResult = hr(0x80070005);
pub const E_OUTOFMEMORY: HResult = hr(0x8007000e);
pub const E_INVALIDARG: HResult = hr(0x80070057);
pub const RO_E_CLOSED: HResult = hr(0x80000013);
pub const ERROR_INSUFFICIENT_BUFFER: u32 = 122;
pub const E_NOT_SUFFICIENT_BUFFER: HResult = HResult::from_win32(ERROR_INSUFFICIENT_BUFFER);

pub const D2DERR_WRONG_STATE: HResult = hr(0x88990001);
pub const D2DERR_NOT_INITIALIZED: HResult = hr(0x88990002);
pub const D2DERR_UNSUPPORTED_OPERATION: HResult = hr(0x88990003);
pub const D2DERR_SCANNER_FAILED: HResult = hr(0x88990004);
pub const D2DERR_SCREEN_ACCESS_DENIED: HResult = hr(0x88990005);
pub const D2DERR_DISPLAY_STATE_INVALID: HResult = hr(0x88990006);
pub const D2DERR_ZERO_VECTOR: HResult = hr(0x88990007);
pub const D2DERR_INTERNAL_ERROR: HResult = hr(0x88990008);
pub const D2DERR_DISPLAY_FORMAT_NOT_SUPPORTED: HResult = hr(0x88990009);
pub const D2DERR_INVALID_CALL: HResult = hr(0x8899000a);
pub const D2DERR_NO_HARDWARE_DEVICE: HResult = hr(0x8899000b);
pub const D2DERR_RECREATE_TARGET: HResult = hr(0x8899000c);
pub const D2DERR_TOO_MANY_SHADER_ELEMENTS: HResult = hr(0x8899000d);
pub const D2DERR_SHADER_COMPILE_FAILED: HResult = hr(0x8899000e);
pub const D2DERR_MAX_TEXTURE_SIZE_EXCEEDED: HResult = hr(0x8899000f);
pub const D2DERR_UNSUPPORTED_VERSION: HResult = hr(0x88990010);
pub const D2DERR_BAD_NUMBER: HResult = hr(0x88990011);
pub const D2DERR_WRONG_FACTORY: HResult = hr(0x88990012);
pub const D2DERR_LAYER_ALREADY_IN_USE: HResult = hr(0x88990013);
pub const D2DERR_POP_CALL_DID_NOT_MATCH_PUSH: HResult = hr(0x88990014);
pub const D2DERR_WRONG_RESOURCE_DOMAIN: HResult = hr(0x88990015);
pub const D2DERR_PUSH_POP_UNBALANCED: HResult = hr(0x88990016);
pub const D2DERR_RENDER_TARGET_HAS_LAYER_OR_CLIPRECT: HResult = hr(0x88990017);
pub const D2DERR_INCOMPATIBLE_BRUSH_TYPES: HResult = hr(0x88990018);
pub const D2DERR_WIN32_ERROR: HResult = hr(0x88990019);
pub const D2DERR_TARGET_NOT_GDI_COMPATIBLE: HResult = hr(0x8899001a);
pub const D2DERR_TEXT_EFFECT_IS_WRONG_TYPE: HResult = hr(0x8899001b);
pub const D2DERR_TEXT_RENDERER_NOT_RELEASED: HResult = hr(0x8899001c);
pub const D2DERR_EXCEEDS_MAX_BITMAP_SIZE: HResult = hr(0x8899001d);
pub const D2DERR_INVALID_GRAPH_CONFIGURATION: HResult = hr(0x8899001e);
pub const D2DERR_INVALID_INTERNAL_GRAPH_CONFIGURATION: HResult = hr(0x8899001f);
pub const D2DERR_CYCLIC_GRAPH: HResult = hr(0x88990020);
pub const D2DERR_BITMAP_CANNOT_DRAW: HResult = hr(0x88990021);
pub const D2DERR_OUTSTANDING_BITMAP_REFERENCES: HResult = hr(0x88990022);
pub const D2DERR_ORIGINAL_TARGET_NOT_BOUND: HResult = hr(0x88990023);
pub const D2DERR_INVALID_TARGET: HResult = hr(0x88990024);
pub const D2DERR_BITMAP_BOUND_AS_TARGET: HResult = hr(0x88990025);
pub const D2DERR_INSUFFICIENT_DEVICE_CAPABILITIES: HResult = hr(0x88990026);
pub const D2DERR_INTERMEDIATE_TOO_LARGE: HResult = hr(0x88990027);
pub const D2DERR_EFFECT_IS_NOT_REGISTERED: HResult = hr(0x88990028);
pub const D2DERR_INVALID_PROPERTY: HResult = hr(0x88990029);
pub const D2DERR_NO_SUBPROPERTIES: HResult = hr(0x8899002a);
pub const D2DERR_PRINT_JOB_CLOSED: HResult = hr(0x8899002b);
pub const D2DERR_PRINT_FORMAT_NOT_SUPPORTED: HResult = hr(0x8899002c);
pub const D2DERR_TOO_MANY_TRANSFORM_INPUTS: HResult = hr(0x8899002d);
pub const D2DERR_INVALID_GLYPH_IMAGE: HResult = hr(0x8899002e);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
#[repr(C)]
pub struct GUID {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

impl GUID {
    #[inline]
    pub const fn from_u128(uuid: u128) -> Self {
        Self {
            data1: (uuid >> 96) as u32,
            data2: ((uuid >> 80) & 0xffff) as u16,
            data3: ((uuid >> 64) & 0xffff) as u16,
            data4: (uuid as u64).to_be_bytes(),
        }
    }

    #[inline]
    pub const fn to_u128(&self) -> u128 {
        ((self.data1 as u128) << 96)
            | ((self.data2 as u128) << 80)
            | ((self.data3 as u128) << 64)
            | u64::from_be_bytes(self.data4) as u128
    }
}

impl std::fmt::Display for GUID {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{{{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}}}",
            self.data1,
            self.data2,
            self.data3,
            self.data4[0],
            self.data4[1],
            self.data4[2],
            self.data4[3],
            self.data4[4],
            self.data4[5],
            self.data4[6],
            self.data4[7],
        )
    }
}

impl std::fmt::Debug for GUID {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

pub const IID_IUnknown: GUID = GUID::from_u128(0x00000000_0000_0000_c000_000000000046);
pub const IID_ID2D1SimplifiedGeometrySink: GUID =
    GUID::from_u128(0x2cd9069e_12e2_11dc_9fed_001143a055f9);
pub const IID_ID2D1GeometrySink: GUID = GUID::from_u128(0x2cd9069f_12e2_11dc_9fed_001143a055f9);
pub const IID_ID2D1TessellationSink: GUID =
    GUID::from_u128(0x2cd906c1_12e2_11dc_9fed_001143a055f9);
pub const IID_ID2D1CommandSink: GUID = GUID::from_u128(0x54d7898a_a061_40a7_bec7_e465bcba2c4f);
pub const IID_ID2D1CommandSink1: GUID = GUID::from_u128(0x9eb767fd_4269_4467_b8c2_eb30cb305743);
pub const IID_ID2D1TransformNode: GUID = GUID::from_u128(0xb2efe1e7_729f_4102_949f_505fa21bf666);
pub const IID_ID2D1Transform: GUID = GUID::from_u128(0xef1a287d_342a_4f76_8fdb_da0d6ea9f92b);
pub const IID_ID2D1DrawTransform: GUID = GUID::from_u128(0x36bfdcb6_9739_435d_a30d_a653beff6a6f);
pub const IID_ID2D1ComputeTransform: GUID =
    GUID::from_u128(0x0d85573c_01e3_4f7d_bfd9_0d60608bf3c3);
pub const IID_ID2D1AnalysisTransform: GUID =
    GUID::from_u128(0x0359dc30_95e6_4568_9055_27720d130e93);
pub const IID_ID2D1SourceTransform: GUID =
    GUID::from_u128(0xdb1800dd_0c34_4cf9_be90_31cc0a5653e1);
pub const IID_ID2D1EffectImpl: GUID = GUID::from_u128(0xa248fd3f_3e6c_4e63_9f03_7f68ecc91db9);

#[repr(C)]
pub struct IUnknownVtbl {
    pub QueryInterface: unsafe extern "system" fn(
        this: *mut c_void,
        riid: *const GUID,
        object: *mut *mut c_void,
    ) -> HResult,
    pub AddRef: unsafe extern "system" fn(this: *mut c_void) -> u32,
    pub Release: unsafe extern "system" fn(this: *mut c_void) -> u32,
}

#[derive(Clone, Copy, PartialEq, Debug, Default, Pod, Zeroable)]
#[repr(C)]
pub struct D2D_POINT_2F {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Pod, Zeroable)]
#[repr(C)]
pub struct D2D_POINT_2U {
    pub x: u32,
    pub y: u32,
}

#[derive(Clone, Copy, PartialEq, Debug, Default, Pod, Zeroable)]
#[repr(C)]
pub struct D2D_SIZE_F {
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Copy, PartialEq, Debug, Default, Pod, Zeroable)]
#[repr(C)]
pub struct D2D_RECT_F {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Pod, Zeroable)]
#[repr(C)]
pub struct D2D_RECT_L {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

#[derive(Clone, Copy, PartialEq, Debug, Default, Pod, Zeroable)]
#[repr(C)]
pub struct D2D1_COLOR_F {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

#[derive(Clone, Copy, PartialEq, Debug, Default, Pod, Zeroable)]
#[repr(C)]
pub struct D2D_MATRIX_3X2_F {
    pub M11: f32,
    pub M12: f32,
    pub M21: f32,
    pub M22: f32,
    pub M31: f32,
    pub M32: f32,
}

#[derive(Clone, Copy, PartialEq, Debug, Default, Pod, Zeroable)]
#[repr(C)]
pub struct D2D_MATRIX_4X4_F {
    pub m: [[f32; 4]; 4],
}

#[derive(Clone, Copy, PartialEq, Debug, Default, Pod, Zeroable)]
#[repr(C)]
pub struct D2D1_TRIANGLE {
    pub point1: D2D_POINT_2F,
    pub point2: D2D_POINT_2F,
    pub point3: D2D_POINT_2F,
}

#[derive(Clone, Copy, PartialEq, Debug, Default, Pod, Zeroable)]
#[repr(C)]
pub struct D2D1_BEZIER_SEGMENT {
    pub point1: D2D_POINT_2F,
    pub point2: D2D_POINT_2F,
    pub point3: D2D_POINT_2F,
}

#[derive(Clone, Copy, PartialEq, Debug, Default, Pod, Zeroable)]
#[repr(C)]
pub struct D2D1_QUADRATIC_BEZIER_SEGMENT {
    pub point1: D2D_POINT_2F,
    pub point2: D2D_POINT_2F,
}

#[derive(Clone, Copy, PartialEq, Debug, Default, Pod, Zeroable)]
#[repr(C)]
pub struct D2D1_ARC_SEGMENT {
    pub point: D2D_POINT_2F,
    pub size: D2D_SIZE_F,
    pub rotationAngle: f32,
    pub sweepDirection: u32,
    pub arcSize: u32,
}

#[derive(Clone, Copy, Debug)]
#[repr(C)]
pub struct D2D1_LAYER_PARAMETERS1 {
    pub contentBounds: D2D_RECT_F,
    pub geometricMask: *mut c_void,
    pub maskAntialiasMode: u32,
    pub maskTransform: D2D_MATRIX_3X2_F,
    pub opacity: f32,
    pub opacityBrush: *mut c_void,
    pub layerOptions: u32,
}

#[derive(Clone, Copy, PartialEq, Debug, Default, Pod, Zeroable)]
#[repr(C)]
pub struct DWRITE_GLYPH_OFFSET {
    pub advanceOffset: f32,
    pub ascenderOffset: f32,
}

#[derive(Clone, Copy, Debug)]
#[repr(C)]
pub struct DWRITE_GLYPH_RUN {
    pub fontFace: *mut c_void,
    pub fontEmSize: f32,
    pub glyphCount: u32,
    pub glyphIndices: *const u16,
    pub glyphAdvances: *const f32,
    pub glyphOffsets: *const DWRITE_GLYPH_OFFSET,
    pub isSideways: BOOL,
    pub bidiLevel: u32,
}

#[derive(Clone, Copy, Debug)]
#[repr(C)]
pub struct DWRITE_GLYPH_RUN_DESCRIPTION {
    pub localeName: *const u16,
    pub string: *const u16,
    pub stringLength: u32,
    pub clusterMap: *const u16,
    pub textPosition: u32,
}

pub type PD2D1_PROPERTY_SET_FUNCTION =
    unsafe extern "system" fn(effect: *const c_void, data: *const u8, dataSize: u32) -> HResult;

pub type PD2D1_PROPERTY_GET_FUNCTION = unsafe extern "system" fn(
    effect: *const c_void,
    data: *mut u8,
    dataSize: u32,
    actualSize: *mut u32,
) -> HResult;

pub type PD2D1_EFFECT_FACTORY = unsafe extern "system" fn(effectImpl: *mut *mut c_void) -> HResult;

#[derive(Clone, Copy, Debug)]
#[repr(C)]
pub struct D2D1_PROPERTY_BINDING {
    pub propertyName: *const u16,
    pub setFunction: Option<PD2D1_PROPERTY_SET_FUNCTION>,
    pub getFunction: Option<PD2D1_PROPERTY_GET_FUNCTION>,
}
