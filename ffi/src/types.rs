//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! tagged enums with explicit discriminants. Optional numbers travel as a
//! value plus a `has_*` flag. Conversion functions live here to keep `lib.rs`
//! focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use hal_sync_core::{ApiError, HttpMethod, User};

/// Opaque handle to a `CollectionClient`. C callers receive a pointer to
/// this and pass it back into every FFI function.
pub struct FfiHalClient {
    pub(crate) inner: hal_sync_core::CollectionClient,
}

/// Copy `s` into a heap C string. Interior NULs are dropped rather than
/// failing the whole conversion.
pub(crate) fn c_string(s: impl Into<String>) -> *mut c_char {
    let s: String = s.into();
    let s = if s.contains('\0') { s.replace('\0', "") } else { s };
    CString::new(s).unwrap_or_default().into_raw()
}

/// Length of a Rust slice as the `u32` the C structs carry, or `None` when
/// it does not fit.
pub(crate) fn c_len(len: usize) -> Option<u32> {
    u32::try_from(len).ok()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Delete = 2,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `hal_build_*` functions. The C caller executes the request
/// and passes the response back through `hal_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    /// `None` when the header count does not fit `headers_len`.
    pub(crate) fn from_core(req: hal_sync_core::HttpRequest) -> Option<*mut Self> {
        let headers_len = c_len(req.headers.len())?;
        let path = c_string(req.path);
        let body = match req.body {
            Some(b) => c_string(b),
            None => std::ptr::null_mut(),
        };

        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Some(Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path,
            headers,
            headers_len,
            body,
        })))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing an HTTP request,
/// then passes a pointer to a `hal_parse_*` function. The FFI layer reads
/// but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiHalResult`.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    NotFound = 1,
    Http = 2,
    Transport = 3,
    Deserialization = 4,
    Serialization = 5,
    MissingLink = 6,
    InvalidLink = 7,
    Panic = 8,
    NullArg = 9,
    /// A count exceeded what a `u32` length field can describe.
    TooLarge = 10,
}

/// Tag that tells `hal_free_result` what `FfiHalResult::data` points to.
#[repr(C)]
pub enum FfiDataTag {
    None = 0,
    UserList = 1,
}

/// A single user exposed to C. `self_href` is null when the server sent no
/// self link.
#[repr(C)]
pub struct FfiUser {
    pub self_href: *mut c_char,
    pub id: i64,
    pub has_id: bool,
    pub username: *mut c_char,
    pub gender: *mut c_char,
    pub name: *mut c_char,
    pub age: i32,
    pub has_age: bool,
    pub status: i32,
    pub has_status: bool,
}

impl FfiUser {
    fn from_core(user: User) -> Self {
        let self_href = match user.self_href() {
            Some(href) => c_string(href),
            None => std::ptr::null_mut(),
        };
        FfiUser {
            self_href,
            id: user.id.unwrap_or_default(),
            has_id: user.id.is_some(),
            username: c_string(user.username),
            gender: c_string(user.gender),
            name: c_string(user.name),
            age: user.age.unwrap_or_default(),
            has_age: user.age.is_some(),
            status: user.status.unwrap_or_default(),
            has_status: user.status.is_some(),
        }
    }
}

/// A list of users exposed to C. `total_elements` is the server's paging
/// total, or `len` when the body carried no page block.
#[repr(C)]
pub struct FfiUserList {
    pub items: *mut FfiUser,
    pub len: u32,
    pub total_elements: u64,
}

/// Result envelope for all parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the parsed payload (tagged by `data_tag`).
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, and `data` is null.
#[repr(C)]
pub struct FfiHalResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut std::ffi::c_void,
}

impl FfiHalResult {
    /// Build a success result carrying a `FfiUserList`, or a `TooLarge`
    /// error when the page holds more than `u32::MAX` users.
    pub(crate) fn ok_user_list(collection: hal_sync_core::HalCollection<User>) -> *mut Self {
        let Some(len) = c_len(collection.items.len()) else {
            return Self::too_large("users", collection.items.len());
        };
        let total_elements = collection
            .page
            .map(|p| p.total_elements)
            .unwrap_or(len as u64);

        let items = if collection.items.is_empty() {
            std::ptr::null_mut()
        } else {
            let users: Box<[FfiUser]> = collection
                .items
                .into_iter()
                .map(FfiUser::from_core)
                .collect();
            Box::into_raw(users) as *mut FfiUser
        };

        let list = Box::new(FfiUserList {
            items,
            len,
            total_elements,
        });
        Box::into_raw(Box::new(FfiHalResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            data_tag: FfiDataTag::UserList,
            data: Box::into_raw(list) as *mut std::ffi::c_void,
        }))
    }

    /// Build a success result with no data payload (create, delete).
    pub(crate) fn ok_empty() -> *mut Self {
        Box::into_raw(Box::new(FfiHalResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }))
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let error_code = match &err {
            ApiError::NotFound => FfiErrorCode::NotFound,
            ApiError::Status { .. } => FfiErrorCode::Http,
            ApiError::Transport(_) => FfiErrorCode::Transport,
            ApiError::Deserialization(_) => FfiErrorCode::Deserialization,
            ApiError::Serialization(_) => FfiErrorCode::Serialization,
            ApiError::MissingLink => FfiErrorCode::MissingLink,
            ApiError::InvalidLink(_) => FfiErrorCode::InvalidLink,
        };
        Self::error(error_code, err.status().unwrap_or(0), &err.to_string())
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::error(FfiErrorCode::NullArg, 0, &format!("null argument: {name}"))
    }

    /// Build an error result for a collection too long for a `u32` length.
    pub(crate) fn too_large(what: &str, len: usize) -> *mut Self {
        Self::error(
            FfiErrorCode::TooLarge,
            0,
            &format!("too many {what} for the C interface: {len}"),
        )
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::error(FfiErrorCode::Panic, 0, msg)
    }

    fn error(error_code: FfiErrorCode, http_status: u16, msg: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiHalResult {
            error_code,
            error_message: c_string(msg),
            http_status,
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }))
    }
}
