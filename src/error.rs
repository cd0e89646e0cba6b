use crate::abi::*;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(i32)]
pub enum ErrorKind {
    Ok = S_OK.0,
    False = S_FALSE.0,
    Fail = E_FAIL.0,
    Abort = E_ABORT.0,
    AccessDenied = E_ACCESSDENIED.0,
    InvalidArg = E_INVALIDARG.0,
    NoInterface = E_NOINTERFACE.0,
    NotImpl = E_NOTIMPL.0,
    OutOfMemory = E_OUTOFMEMORY.0,
    Pointer = E_POINTER.0,
    Unexpected = E_UNEXPECTED.0,
    Closed = RO_E_CLOSED.0,
    InsufficientBuffer = E_NOT_SUFFICIENT_BUFFER.0,
    BadNumber = D2DERR_BAD_NUMBER.0,
    WrongState = D2DERR_WRONG_STATE.0,
    ZeroVector = D2DERR_ZERO_VECTOR.0,
    CyclicGraph = D2DERR_CYCLIC_GRAPH.0,
    InvalidCall = D2DERR_INVALID_CALL.0,
    Win32Error = D2DERR_WIN32_ERROR.0,
    WrongFactory = D2DERR_WRONG_FACTORY.0,
    InternalError = D2DERR_INTERNAL_ERROR.0,
    InvalidTarget = D2DERR_INVALID_TARGET.0,
    ScannerFailed = D2DERR_SCANNER_FAILED.0,
    NotInitialized = D2DERR_NOT_INITIALIZED.0,
    RecreateTarget = D2DERR_RECREATE_TARGET.0,
    InvalidProperty = D2DERR_INVALID_PROPERTY.0,
    NoSubproperties = D2DERR_NO_SUBPROPERTIES.0,
    PrintJobClosed = D2DERR_PRINT_JOB_CLOSED.0,
    BitmapCannotDraw = D2DERR_BITMAP_CANNOT_DRAW.0,
    NoHardwareDevice = D2DERR_NO_HARDWARE_DEVICE.0,
    InvalidGlyphImage = D2DERR_INVALID_GLYPH_IMAGE.0,
    PushPopUnbalanced = D2DERR_PUSH_POP_UNBALANCED.0,
    UnsupportedVersion = D2DERR_UNSUPPORTED_VERSION.0,
    LayerAlreadyInUse = D2DERR_LAYER_ALREADY_IN_USE.0,
    ScreenAccessDenied = D2DERR_SCREEN_ACCESS_DENIED.0,
    DisplayStateInvalid = D2DERR_DISPLAY_STATE_INVALID.0,
    ShaderCompileFailed = D2DERR_SHADER_COMPILE_FAILED.0,
    UnsupportedOperation = D2DERR_UNSUPPORTED_OPERATION.0,
    WrongResourceDomain = D2DERR_WRONG_RESOURCE_DOMAIN.0,
    BitmapBoundAsTarget = D2DERR_BITMAP_BOUND_AS_TARGET.0,
    IntermediateTooLarge = D2DERR_INTERMEDIATE_TOO_LARGE.0,
    ExceedsMaxBitmapSize = D2DERR_EXCEEDS_MAX_BITMAP_SIZE.0,
    EffectIsNotRegistered = D2DERR_EFFECT_IS_NOT_REGISTERED.0,
    IncompatibleBrushTypes = D2DERR_INCOMPATIBLE_BRUSH_TYPES.0,
    TooManyShaderElements = D2DERR_TOO_MANY_SHADER_ELEMENTS.0,
    MaxTextureSizeExceeded = D2DERR_MAX_TEXTURE_SIZE_EXCEEDED.0,
    OriginalTargetNotBound = D2DERR_ORIGINAL_TARGET_NOT_BOUND.0,
    TargetNotGdiCompatible = D2DERR_TARGET_NOT_GDI_COMPATIBLE.0,
    TextEffectIsWrongType = D2DERR_TEXT_EFFECT_IS_WRONG_TYPE.0,
    TooManyTransformInputs = D2DERR_TOO_MANY_TRANSFORM_INPUTS.0,
    PrintFormatNotSupported = D2DERR_PRINT_FORMAT_NOT_SUPPORTED.0,
    TextRendererNotReleased = D2DERR_TEXT_RENDERER_NOT_RELEASED.0,
    InvalidGraphConfiguration = D2DERR_INVALID_GRAPH_CONFIGURATION.0,
    PopCallDidNotMatchPush = D2DERR_POP_CALL_DID_NOT_MATCH_PUSH.0,
    DisplayFormatNotSupported = D2DERR_DISPLAY_FORMAT_NOT_SUPPORTED.0,
    OutstandingBitmapReferences = D2DERR_OUTSTANDING_BITMAP_REFERENCES.0,
    InsufficientDeviceCapabilities = D2DERR_INSUFFICIENT_DEVICE_CAPABILITIES.0,
    RenderTargetHasLayerOrClipRect = D2DERR_RENDER_TARGET_HAS_LAYER_OR_CLIPRECT.0,
    InvalidInternalGraphConfiguration = D2DERR_INVALID_INTERNAL_GRAPH_CONFIGURATION.0,
}

impl ErrorKind {
    const ALL: [ErrorKind; 59] = [
        Self::Ok,
        Self::False,
        Self::Fail,
        Self::Abort,
        Self::AccessDenied,
        Self::InvalidArg,
        Self::NoInterface,
        Self::NotImpl,
        Self::OutOfMemory,
        Self::Pointer,
        Self::Unexpected,
        Self::Closed,
        Self::InsufficientBuffer,
        Self::BadNumber,
        Self::WrongState,
        Self::ZeroVector,
        Self::CyclicGraph,
        Self::InvalidCall,
        Self::Win32Error,
        Self::WrongFactory,
        Self::InternalError,
        Self::InvalidTarget,
        Self::ScannerFailed,
        Self::NotInitialized,
        Self::RecreateTarget,
        Self::InvalidProperty,
        Self::NoSubproperties,
        Self::PrintJobClosed,
        Self::BitmapCannotDraw,
        Self::NoHardwareDevice,
        Self::InvalidGlyphImage,
        Self::PushPopUnbalanced,
        Self::UnsupportedVersion,
        Self::LayerAlreadyInUse,
        Self::ScreenAccessDenied,
        Self::DisplayStateInvalid,
        Self::ShaderCompileFailed,
        Self::UnsupportedOperation,
        Self::WrongResourceDomain,
        Self::BitmapBoundAsTarget,
        Self::IntermediateTooLarge,
        Self::ExceedsMaxBitmapSize,
        Self::EffectIsNotRegistered,
        Self::IncompatibleBrushTypes,
        Self::TooManyShaderElements,
        Self::MaxTextureSizeExceeded,
        Self::OriginalTargetNotBound,
        Self::TargetNotGdiCompatible,
        Self::TextEffectIsWrongType,
        Self::TooManyTransformInputs,
        Self::PrintFormatNotSupported,
        Self::TextRendererNotReleased,
        Self::InvalidGraphConfiguration,
        Self::PopCallDidNotMatchPush,
        Self::DisplayFormatNotSupported,
        Self::OutstandingBitmapReferences,
        Self::InsufficientDeviceCapabilities,
        Self::RenderTargetHasLayerOrClipRect,
        Self::InvalidInternalGraphConfiguration,
    ];

    #[inline]
    pub fn from_code(code: HResult) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| *kind as i32 == code.0)
    }

    #[inline]
    pub fn code(self) -> HResult {
        HResult(self as i32)
    }
}

impl From<ErrorKind> for HResult {
    #[inline]
    fn from(src: ErrorKind) -> Self {
        src.code()
    }
}

/// A failure raised by a callback implementation or by argument translation.
///
/// The status code is what the native caller receives. A code that does not
/// denote a failure is reported as `E_FAIL`.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
#[error("{}", describe(.code, .message))]
pub struct Error {
    code: HResult,
    message: Option<String>,
}

fn describe(code: &HResult, message: &Option<String>) -> String {
    let name = match ErrorKind::from_code(*code) {
        Some(kind) => format!("{:?} ({})", kind, code),
        None => code.to_string(),
    };
    match message {
        Some(message) => format!("{}: {}", name, message),
        None => name,
    }
}

impl Error {
    #[inline]
    pub fn new(code: impl Into<HResult>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: Some(message.into()),
        }
    }

    /// A generic failure (`E_FAIL`) carrying a message.
    #[inline]
    pub fn fail(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Fail, message)
    }

    #[inline]
    pub fn code(&self) -> HResult {
        self.code
    }

    #[inline]
    pub fn kind(&self) -> Option<ErrorKind> {
        ErrorKind::from_code(self.code)
    }

    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The status handed back across the native boundary.
    #[inline]
    pub fn status(&self) -> HResult {
        if self.code.is_err() {
            self.code
        } else {
            E_FAIL
        }
    }
}

impl From<ErrorKind> for Error {
    #[inline]
    fn from(src: ErrorKind) -> Self {
        Self {
            code: src.code(),
            message: None,
        }
    }
}

impl From<HResult> for Error {
    #[inline]
    fn from(src: HResult) -> Self {
        Self {
            code: src,
            message: None,
        }
    }
}

impl PartialEq<ErrorKind> for Error {
    fn eq(&self, rhs: &ErrorKind) -> bool {
        self.code.0 == *rhs as i32
    }
}

impl PartialEq<Error> for ErrorKind {
    fn eq(&self, rhs: &Error) -> bool {
        rhs == self
    }
}

/// Converts an `HRESULT` returned by a native call into a `Result`.
#[inline]
pub(crate) fn check(hr: HResult) -> crate::Result<()> {
    if hr.is_ok() {
        Ok(())
    } else {
        Err(hr.into())
    }
}
