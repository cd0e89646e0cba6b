//! Adapter objects presenting Rust callbacks to native Direct2D.
//!
//! A shadow is a heap object whose first field points at a static dispatch
//! table laid out like the native vtable. Native code holds `*mut c_void`
//! pointers to it and calls through the table; each entry (a trampoline)
//! resolves the live callback, translates the arguments, runs the callback
//! with panics caught and returns an `HRESULT`.

use crate::abi::*;
use crate::config::*;
use crate::utility::panic_message;
use crate::*;
use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::ffi::c_void;
use std::marker::PhantomData;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr::NonNull;
use std::sync::atomic::{fence, AtomicU32, Ordering};
use std::sync::Arc;

/// A native callback interface a [`Shadow`] can present.
///
/// Implemented by the dispatch table types of this crate.
///
/// # Safety
///
/// `vtable` must return a table laid out exactly like the native interface,
/// starting with `IUnknownVtbl::new::<Self>()`, and every other entry must
/// treat `this` as a pointer to a shadow of `Self::Callback`.
pub unsafe trait Interface: Sized + 'static {
    type Callback: ?Sized + Send + Sync + 'static;

    const NAME: &'static str;

    /// The interfaces answered by `QueryInterface` besides IUnknown, base first.
    const IIDS: &'static [GUID];

    fn vtable() -> &'static Self;
}

impl IUnknownVtbl {
    pub const fn new<I: Interface>() -> Self {
        Self {
            QueryInterface: query_interface::<I>,
            AddRef: add_ref::<I>,
            Release: release::<I>,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ShadowState {
    /// Native calls are forwarded to the callback.
    Live,
    /// The callback was detached; native calls fail with `RO_E_CLOSED`.
    Released,
}

struct Slot<T: ?Sized> {
    callback: Arc<T>,
    concrete: Option<Arc<dyn Any + Send + Sync>>,
}

#[repr(C)]
pub(crate) struct ShadowObject<T: ?Sized> {
    vtbl: *const c_void,
    refs: AtomicU32,
    slot: RwLock<Option<Slot<T>>>,
    fault: Mutex<Option<Error>>,
    config: ShadowConfig,
    name: &'static str,
}

impl<T: ?Sized> ShadowObject<T> {
    #[inline]
    pub(crate) unsafe fn from_this<'a>(this: *const c_void) -> Option<&'a Self> {
        (this as *const Self).as_ref()
    }

    #[inline]
    fn callback(&self) -> Option<Arc<T>> {
        self.slot.read().as_ref().map(|slot| slot.callback.clone())
    }

    #[inline]
    fn concrete(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        self.slot.read().as_ref().and_then(|slot| slot.concrete.clone())
    }

    fn guarded<R>(&self, method: &'static str, f: impl FnOnce() -> Result<R>) -> Result<R> {
        log::trace!("{}::{}", self.name, method);
        match catch_unwind(AssertUnwindSafe(f)) {
            Ok(Ok(ret)) => Ok(ret),
            Ok(Err(e)) => {
                log::warn!("{}::{} failed: {}", self.name, method, e);
                Err(e)
            }
            Err(payload) => {
                let message = panic_message(&*payload);
                log::error!("{}::{} panicked: {}", self.name, method, message);
                Err(Error::fail(format!("{} panicked: {}", method, message)))
            }
        }
    }

    fn closed(&self, method: &'static str) -> Error {
        log::debug!("{}::{} called on a released shadow", self.name, method);
        Error::new(ErrorKind::Closed, format!("{} is released", self.name))
    }

    /// Runs `f` against the live callback.
    ///
    /// The slot lock is held only to clone the callback, so a concurrent
    /// `unregister` either wins (the call fails with `RO_E_CLOSED`) or waits
    /// for nothing and the running call finishes on its own reference.
    pub(crate) fn invoke<R>(&self, method: &'static str, f: impl FnOnce(&T) -> Result<R>) -> Result<R> {
        let callback = self.live(method)?;
        self.guarded(method, || f(&*callback))
    }

    #[inline]
    fn live(&self, method: &'static str) -> Result<Arc<T>> {
        self.callback().ok_or_else(|| self.closed(method))
    }

    /// Runs `f` against the concrete implementation behind the callback.
    pub(crate) fn invoke_concrete<C, R>(
        &self,
        method: &'static str,
        f: impl FnOnce(&C) -> Result<R>,
    ) -> Result<R>
    where
        C: Any + Send + Sync,
    {
        let Some(concrete) = self.concrete() else {
            if self.callback().is_none() {
                return Err(self.closed(method));
            }
            return Err(Error::new(
                ErrorKind::InvalidArg,
                format!("{} has no typed implementation", self.name),
            ));
        };
        let Ok(concrete) = concrete.downcast::<C>() else {
            return Err(Error::new(
                ErrorKind::InvalidArg,
                format!("{} is not a {}", self.name, std::any::type_name::<C>()),
            ));
        };
        self.guarded(method, || f(&*concrete))
    }

    fn report_fault(&self, method: &'static str, e: Error) {
        match self.config.fault_policy {
            FaultPolicy::LogAndDrop => {
                log::debug!("{}::{} has no status channel, dropped: {}", self.name, method, e);
            }
            FaultPolicy::Defer => {
                let mut fault = self.fault.lock();
                if fault.is_none() {
                    log::debug!("{}::{} failure deferred to Close", self.name, method);
                    *fault = Some(e);
                }
            }
        }
    }

    #[inline]
    fn take_fault(&self) -> Option<Error> {
        self.fault.lock().take()
    }
}

/// Entry for a method returning `HRESULT`.
pub(crate) unsafe fn dispatch<T: ?Sized>(
    this: *mut c_void,
    method: &'static str,
    f: impl FnOnce(&T) -> Result<()>,
) -> HResult {
    let Some(object) = ShadowObject::<T>::from_this(this) else {
        return E_POINTER;
    };
    match object.invoke(method, f) {
        Ok(()) => S_OK,
        Err(e) => e.status(),
    }
}

/// Entry for a method returning `void`. Failures go through the fault policy.
pub(crate) unsafe fn dispatch_void<T: ?Sized>(
    this: *mut c_void,
    method: &'static str,
    f: impl FnOnce(&T) -> Result<()>,
) {
    let Some(object) = ShadowObject::<T>::from_this(this) else {
        return;
    };
    // a released shadow is not a fault of the callback
    let Ok(callback) = object.live(method) else {
        return;
    };
    if let Err(e) = object.guarded(method, || f(&*callback)) {
        object.report_fault(method, e);
    }
}

/// Entry for a method returning a plain value. `fallback` is returned on failure.
pub(crate) unsafe fn dispatch_value<T: ?Sized, R>(
    this: *mut c_void,
    method: &'static str,
    fallback: R,
    f: impl FnOnce(&T) -> Result<R>,
) -> R {
    let Some(object) = ShadowObject::<T>::from_this(this) else {
        return fallback;
    };
    let Ok(callback) = object.live(method) else {
        return fallback;
    };
    match object.guarded(method, || f(&*callback)) {
        Ok(ret) => ret,
        Err(e) => {
            object.report_fault(method, e);
            fallback
        }
    }
}

/// Entry for `Close` of a sink: the callback always runs, then a deferred
/// fault takes precedence over its result. A released shadow reports
/// `RO_E_CLOSED` and leaves the deferred fault for `Shadow::take_fault`.
pub(crate) unsafe fn dispatch_close<T: ?Sized>(
    this: *mut c_void,
    method: &'static str,
    f: impl FnOnce(&T) -> Result<()>,
) -> HResult {
    let Some(object) = ShadowObject::<T>::from_this(this) else {
        return E_POINTER;
    };
    let callback = match object.live(method) {
        Ok(callback) => callback,
        Err(e) => return e.status(),
    };
    let ret = object.guarded(method, || f(&*callback));
    if let Some(fault) = object.take_fault() {
        log::warn!("{}::{} reports deferred failure: {}", object.name, method, fault);
        return fault.status();
    }
    match ret {
        Ok(()) => S_OK,
        Err(e) => e.status(),
    }
}

unsafe extern "system" fn query_interface<I: Interface>(
    this: *mut c_void,
    riid: *const GUID,
    object: *mut *mut c_void,
) -> HResult {
    if object.is_null() {
        return E_POINTER;
    }
    *object = std::ptr::null_mut();
    if this.is_null() || riid.is_null() {
        return E_POINTER;
    }
    let riid = &*riid;
    if *riid == IID_IUnknown || I::IIDS.contains(riid) {
        add_ref::<I>(this);
        *object = this;
        S_OK
    } else {
        log::trace!("{}::QueryInterface rejected {}", I::NAME, riid);
        E_NOINTERFACE
    }
}

unsafe extern "system" fn add_ref<I: Interface>(this: *mut c_void) -> u32 {
    let object = &*(this as *const ShadowObject<I::Callback>);
    object.refs.fetch_add(1, Ordering::Relaxed) + 1
}

unsafe extern "system" fn release<I: Interface>(this: *mut c_void) -> u32 {
    let object = this as *mut ShadowObject<I::Callback>;
    let Some(remaining) = (*object).refs.fetch_sub(1, Ordering::Release).checked_sub(1) else {
        (*object).refs.store(0, Ordering::Relaxed);
        log::error!("{} shadow released more often than referenced", I::NAME);
        return 0;
    };
    if remaining == 0 {
        fence(Ordering::Acquire);
        log::trace!("{} shadow destroyed", I::NAME);
        drop(Box::from_raw(object));
    }
    remaining
}

/// An owned reference to a shadow presenting `I`.
///
/// `Clone` adds a native reference and `Drop` releases one; the shadow is
/// destroyed when native code and Rust have released all of theirs.
pub struct Shadow<I: Interface> {
    ptr: NonNull<ShadowObject<I::Callback>>,
    _interface: PhantomData<I>,
}

impl<I: Interface> Shadow<I> {
    #[inline]
    pub fn new(callback: Arc<I::Callback>) -> Self {
        Self::with_config(callback, ShadowConfig::default())
    }

    #[inline]
    pub fn with_config(callback: Arc<I::Callback>, config: ShadowConfig) -> Self {
        Self::build(
            Slot {
                callback,
                concrete: None,
            },
            config,
        )
    }

    /// Keeps a typed view of the implementation next to the callback, for
    /// entry points that only receive the shadow pointer (property bindings).
    pub(crate) fn with_concrete(
        callback: Arc<I::Callback>,
        concrete: Arc<dyn Any + Send + Sync>,
        config: ShadowConfig,
    ) -> Self {
        Self::build(
            Slot {
                callback,
                concrete: Some(concrete),
            },
            config,
        )
    }

    fn build(slot: Slot<I::Callback>, config: ShadowConfig) -> Self {
        let object = Box::new(ShadowObject {
            vtbl: I::vtable() as *const I as *const c_void,
            refs: AtomicU32::new(1),
            slot: RwLock::new(Some(slot)),
            fault: Mutex::new(None),
            config,
            name: I::NAME,
        });
        log::trace!("{} shadow created", I::NAME);
        Self {
            ptr: NonNull::from(Box::leak(object)),
            _interface: PhantomData,
        }
    }

    /// Takes over a reference to a shadow owned by the caller.
    ///
    /// # Safety
    ///
    /// `raw` must be a non-null pointer obtained from a `Shadow<I>` of the
    /// same interface, and the caller must own one of its references.
    #[inline]
    pub unsafe fn from_raw(raw: *mut c_void) -> Self {
        Self {
            ptr: NonNull::new_unchecked(raw as *mut ShadowObject<I::Callback>),
            _interface: PhantomData,
        }
    }

    #[inline]
    fn object(&self) -> &ShadowObject<I::Callback> {
        unsafe { self.ptr.as_ref() }
    }

    /// The interface pointer, without adding a reference.
    #[inline]
    pub fn as_raw(&self) -> *mut c_void {
        self.ptr.as_ptr() as *mut c_void
    }

    /// Hands this reference to native code.
    #[inline]
    pub fn into_raw(self) -> *mut c_void {
        let raw = self.as_raw();
        std::mem::forget(self);
        raw
    }

    #[inline]
    pub fn state(&self) -> ShadowState {
        if self.object().slot.read().is_some() {
            ShadowState::Live
        } else {
            ShadowState::Released
        }
    }

    /// Detaches the callback. Native references stay valid but no call is
    /// forwarded anymore. Returns `false` if it was already released.
    pub fn unregister(&self) -> bool {
        let slot = self.object().slot.write().take();
        if slot.is_some() {
            log::debug!("{} shadow unregistered", I::NAME);
        }
        slot.is_some()
    }

    #[inline]
    pub fn callback(&self) -> Option<Arc<I::Callback>> {
        self.object().callback()
    }

    /// The first deferred failure of a method without a status channel, if
    /// it was not already reported by `Close`.
    #[inline]
    pub fn take_fault(&self) -> Option<Error> {
        self.object().take_fault()
    }

    #[inline]
    pub fn config(&self) -> ShadowConfig {
        self.object().config
    }

    #[inline]
    pub fn ref_count(&self) -> u32 {
        self.object().refs.load(Ordering::Acquire)
    }
}

impl<I: Interface> Clone for Shadow<I> {
    #[inline]
    fn clone(&self) -> Self {
        unsafe {
            add_ref::<I>(self.as_raw());
        }
        Self {
            ptr: self.ptr,
            _interface: PhantomData,
        }
    }
}

impl<I: Interface> Drop for Shadow<I> {
    #[inline]
    fn drop(&mut self) {
        unsafe {
            release::<I>(self.as_raw());
        }
    }
}

impl<I: Interface> PartialEq for Shadow<I> {
    #[inline]
    fn eq(&self, rhs: &Self) -> bool {
        self.ptr == rhs.ptr
    }
}

impl<I: Interface> Eq for Shadow<I> {}

impl<I: Interface> std::fmt::Debug for Shadow<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Shadow")
            .field("interface", &I::NAME)
            .field("ptr", &self.ptr)
            .field("state", &self.state())
            .finish()
    }
}

unsafe impl<I: Interface> Send for Shadow<I> {}
unsafe impl<I: Interface> Sync for Shadow<I> {}
