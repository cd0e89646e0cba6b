use crate::*;
use std::any::Any;

/// Declares a `#[repr(u32)]` enum mirroring a native enumeration together with
/// the checked conversion from its raw value.
macro_rules! native_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:expr,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        #[repr(u32)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value,)*
        }

        impl TryFrom<u32> for $name {
            type Error = crate::Error;

            fn try_from(value: u32) -> crate::Result<Self> {
                $(
                    if value == $value {
                        return Ok(Self::$variant);
                    }
                )*
                Err(crate::Error::new(
                    crate::ErrorKind::InvalidArg,
                    format!("{} is not a valid {}", value, stringify!($name)),
                ))
            }
        }

        impl From<$name> for u32 {
            #[inline]
            fn from(src: $name) -> u32 {
                src as u32
            }
        }
    };
}

pub(crate) use native_enum;

/// Reads a pointer the native contract requires to be non-null.
#[inline]
pub(crate) unsafe fn read_required<T: Copy>(ptr: *const T) -> Result<T> {
    if ptr.is_null() {
        return Err(ErrorKind::Pointer.into());
    }
    Ok(*ptr)
}

#[inline]
pub(crate) unsafe fn read_optional<T: Copy>(ptr: *const T) -> Option<T> {
    if ptr.is_null() {
        None
    } else {
        Some(*ptr)
    }
}

/// Copies a pointer + count buffer out of native memory.
///
/// The native buffer is only valid for the duration of the call, so nothing
/// returned here borrows from it.
pub(crate) unsafe fn copy_buffer<T: Copy, U>(
    ptr: *const T,
    count: u32,
    f: impl FnMut(&T) -> U,
) -> Result<Vec<U>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    if ptr.is_null() {
        return Err(Error::new(
            ErrorKind::Pointer,
            format!("null buffer with {} elements", count),
        ));
    }
    Ok(std::slice::from_raw_parts(ptr, count as usize)
        .iter()
        .map(f)
        .collect())
}

/// Reads a NUL-terminated UTF-16 string.
pub(crate) unsafe fn wide_cstr(ptr: *const u16) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    let mut len = 0;
    while *ptr.add(len) != 0 {
        len += 1;
    }
    Some(String::from_utf16_lossy(std::slice::from_raw_parts(ptr, len)))
}

/// Encodes `s` as a NUL-terminated UTF-16 string.
#[inline]
pub(crate) fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    native_enum! {
        pub enum Sample {
            Zero = 0,
            Two = 2,
        }
    }

    #[test]
    fn native_enum_test() {
        assert_eq!(Sample::try_from(2).unwrap(), Sample::Two);
        assert_eq!(u32::from(Sample::Zero), 0);
        assert_eq!(Sample::try_from(1).unwrap_err(), ErrorKind::InvalidArg);
    }

    #[test]
    fn copy_buffer_test() {
        let src = [1u32, 2, 3];
        let copied = unsafe { copy_buffer(src.as_ptr(), 3, |v| *v * 10) }.unwrap();
        assert_eq!(copied, vec![10, 20, 30]);
        let empty = unsafe { copy_buffer(std::ptr::null::<u32>(), 0, |v| *v) }.unwrap();
        assert!(empty.is_empty());
        let e = unsafe { copy_buffer(std::ptr::null::<u32>(), 2, |v| *v) }.unwrap_err();
        assert_eq!(e, ErrorKind::Pointer);
    }

    #[test]
    fn wide_test() {
        let wide = to_wide("en-us");
        assert_eq!(wide.last(), Some(&0));
        assert_eq!(unsafe { wide_cstr(wide.as_ptr()) }.as_deref(), Some("en-us"));
        assert_eq!(unsafe { wide_cstr(std::ptr::null()) }, None);
    }

    #[test]
    fn panic_message_test() {
        let payload = std::panic::catch_unwind(|| panic!("sink exploded")).unwrap_err();
        assert_eq!(panic_message(&*payload), "sink exploded");
    }
}
