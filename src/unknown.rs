use crate::abi::*;
use crate::error::check;
use crate::*;
use std::ffi::c_void;
use std::ptr::NonNull;

/// A counted reference to a native COM object received as a callback argument
/// (a brush, a geometry, an effect context...).
///
/// Creating one takes a reference of its own, so it may outlive the call that
/// delivered it. Dropping it releases that reference.
#[derive(PartialEq, Eq, Hash)]
pub struct Unknown(NonNull<c_void>);

impl Unknown {
    /// Wraps a pointer the caller does not own, taking a new reference.
    ///
    /// # Safety
    ///
    /// `raw` must be null or point to a live COM object.
    #[inline]
    pub unsafe fn from_borrowed(raw: *mut c_void) -> Option<Self> {
        let ptr = NonNull::new(raw)?;
        (vtbl(ptr).AddRef)(ptr.as_ptr());
        Some(Self(ptr))
    }

    /// Takes over a reference the caller owns.
    ///
    /// # Safety
    ///
    /// `raw` must be null or point to a live COM object whose reference is
    /// transferred to the returned value.
    #[inline]
    pub unsafe fn from_raw(raw: *mut c_void) -> Option<Self> {
        NonNull::new(raw).map(Self)
    }

    #[inline]
    pub fn as_raw(&self) -> *mut c_void {
        self.0.as_ptr()
    }

    /// Gives up ownership of the reference held by `self`.
    #[inline]
    pub fn into_raw(self) -> *mut c_void {
        let raw = self.as_raw();
        std::mem::forget(self);
        raw
    }

    /// `IUnknown::QueryInterface`
    pub fn query(&self, iid: &GUID) -> Result<Unknown> {
        let mut object = std::ptr::null_mut();
        unsafe {
            check((vtbl(self.0).QueryInterface)(self.as_raw(), iid, &mut object))?;
            Unknown::from_raw(object).ok_or_else(|| ErrorKind::NoInterface.into())
        }
    }
}

#[inline]
unsafe fn vtbl<'a>(ptr: NonNull<c_void>) -> &'a IUnknownVtbl {
    &**(ptr.as_ptr() as *const *const IUnknownVtbl)
}

impl Clone for Unknown {
    #[inline]
    fn clone(&self) -> Self {
        unsafe {
            (vtbl(self.0).AddRef)(self.as_raw());
        }
        Self(self.0)
    }
}

impl Drop for Unknown {
    #[inline]
    fn drop(&mut self) {
        unsafe {
            (vtbl(self.0).Release)(self.as_raw());
        }
    }
}

impl std::fmt::Debug for Unknown {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Unknown({:p})", self.0)
    }
}

unsafe impl Send for Unknown {}
unsafe impl Sync for Unknown {}

/// Wraps an optional interface argument of a callback.
#[inline]
pub(crate) unsafe fn borrowed(raw: *mut c_void) -> Option<Unknown> {
    Unknown::from_borrowed(raw)
}

/// Wraps an interface argument the native contract requires to be non-null.
#[inline]
pub(crate) unsafe fn required(raw: *mut c_void) -> Result<Unknown> {
    Unknown::from_borrowed(raw).ok_or_else(|| ErrorKind::Pointer.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;

    #[test]
    fn ref_count_test() {
        let (shadow, _) = recording_tessellation_sink();
        assert_eq!(shadow.ref_count(), 1);
        let unknown = unsafe { Unknown::from_borrowed(shadow.as_raw()) }.unwrap();
        assert_eq!(shadow.ref_count(), 2);
        let cloned = unknown.clone();
        assert_eq!(shadow.ref_count(), 3);
        assert_eq!(cloned, unknown);
        drop(unknown);
        drop(cloned);
        assert_eq!(shadow.ref_count(), 1);
        assert!(unsafe { Unknown::from_borrowed(std::ptr::null_mut()) }.is_none());
    }

    #[test]
    fn query_test() -> anyhow::Result<()> {
        let (shadow, _) = recording_tessellation_sink();
        let unknown = unsafe { Unknown::from_borrowed(shadow.as_raw()) }
            .ok_or_else(|| anyhow::anyhow!("null shadow"))?;
        let sink = unknown.query(&IID_ID2D1TessellationSink)?;
        assert_eq!(sink.as_raw(), shadow.as_raw());
        assert_eq!(shadow.ref_count(), 3);
        assert_eq!(
            unknown.query(&IID_ID2D1CommandSink).unwrap_err(),
            ErrorKind::NoInterface
        );
        drop(sink);
        drop(unknown);
        assert_eq!(shadow.ref_count(), 1);
        Ok(())
    }

    #[test]
    fn into_raw_test() {
        let (shadow, _) = recording_tessellation_sink();
        let raw = unsafe { Unknown::from_borrowed(shadow.as_raw()) }
            .unwrap()
            .into_raw();
        assert_eq!(shadow.ref_count(), 2);
        drop(unsafe { Unknown::from_raw(raw) });
        assert_eq!(shadow.ref_count(), 1);
    }
}
