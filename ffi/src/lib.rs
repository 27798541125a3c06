//! C-ABI wrapper around `hal-sync-core`.
//!
//! # Overview
//! Exposes the user collection client through `extern "C"` functions so any
//! language with a C FFI can build requests and parse responses without
//! linking to serde directly. The host performs the HTTP round trip.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Per-operation `build_*` / `parse_*` mirrors the core API 1:1.
//! - A single `FfiHalResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - Builders return null on failure; create and delete also take an
//!   optional `out_error` slot that receives an `FfiHalResult` saying why.
//! - Deletes take the user's `self_href` as handed out in `FfiUser`, never
//!   a path assembled on the C side.
//! - The C caller owns all returned pointers and must call the matching
//!   `hal_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use hal_sync_core::{ClientConfig, CollectionClient, HttpRequest, HttpResponse, NewUser};

use types::*;

/// Read a nullable C string. Null and invalid UTF-8 both yield `None`.
fn opt_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client for the collection at `base_url` + `collection_path`.
///
/// `collection_path` and `embedded_rel` may be null to use `/be/users` and
/// `users`. Returns null if `base_url` is null or an internal panic occurs.
/// The caller must free the returned pointer with `hal_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn hal_client_new(
    base_url: *const c_char,
    collection_path: *const c_char,
    embedded_rel: *const c_char,
) -> *mut FfiHalClient {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let defaults = ClientConfig::default();
        let config = ClientConfig {
            base_url: opt_str(base_url).unwrap_or("").to_string(),
            collection_path: opt_str(collection_path)
                .map(str::to_string)
                .unwrap_or(defaults.collection_path),
            embedded_rel: opt_str(embedded_rel)
                .map(str::to_string)
                .unwrap_or(defaults.embedded_rel),
            policy: defaults.policy,
        };
        let client = CollectionClient::from_config(&config);
        Box::into_raw(Box::new(FfiHalClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `hal_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn hal_client_free(client: *mut FfiHalClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build an HTTP request for fetching the collection.
///
/// Returns null if `client` is null.
/// The caller must free the returned pointer with `hal_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn hal_build_list_users(client: *const FfiHalClient) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_list_users()).unwrap_or(std::ptr::null_mut())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Hand a built request to C. On failure the request is null and, if the
/// caller passed `out_error`, the reason is stored there; otherwise it is
/// freed. On success `*out_error` is set to null.
fn finish_build(
    built: Result<HttpRequest, *mut FfiHalResult>,
    out_error: *mut *mut FfiHalResult,
) -> *mut FfiHttpRequest {
    let error = match built {
        Ok(req) => {
            let headers = req.headers.len();
            match FfiHttpRequest::from_core(req) {
                Some(ptr) => return store_error(out_error, std::ptr::null_mut(), ptr),
                None => FfiHalResult::too_large("headers", headers),
            }
        }
        Err(error) => error,
    };
    store_error(out_error, error, std::ptr::null_mut())
}

fn store_error(
    out_error: *mut *mut FfiHalResult,
    error: *mut FfiHalResult,
    req: *mut FfiHttpRequest,
) -> *mut FfiHttpRequest {
    if out_error.is_null() {
        hal_free_result(error);
    } else {
        unsafe { *out_error = error };
    }
    req
}

/// Build an HTTP request for creating a user.
///
/// Null string arguments are sent as empty strings, matching an untouched
/// form field. Returns null if `client` is null or serialization fails.
/// `out_error` may be null; otherwise it receives null on success or an
/// error result the caller frees with `hal_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn hal_build_create_user(
    client: *const FfiHalClient,
    username: *const c_char,
    gender: *const c_char,
    name: *const c_char,
    age: i32,
    status: i32,
    out_error: *mut *mut FfiHalResult,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return finish_build(Err(FfiHalResult::null_arg("client")), out_error);
        }
        let client = unsafe { &*client };
        let draft = NewUser {
            username: opt_str(username).unwrap_or("").to_string(),
            gender: opt_str(gender).unwrap_or("").to_string(),
            name: opt_str(name).unwrap_or("").to_string(),
            age,
            status,
        };
        let built = client
            .inner
            .build_create_user(&draft)
            .map_err(FfiHalResult::from_error);
        finish_build(built, out_error)
    })
    .unwrap_or_else(|_| {
        let error = FfiHalResult::panic("panic in hal_build_create_user");
        store_error(out_error, error, std::ptr::null_mut())
    })
}

/// Build an HTTP request deleting the user behind `self_href`.
///
/// The link's origin is replaced by the client's base URL. Returns null if
/// `client` or `self_href` is null, or if the link cannot be resolved; in
/// that case a non-null `out_error` receives the reason (`NullArg`,
/// `InvalidLink`), to be freed with `hal_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn hal_build_delete_user(
    client: *const FfiHalClient,
    self_href: *const c_char,
    out_error: *mut *mut FfiHalResult,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return finish_build(Err(FfiHalResult::null_arg("client")), out_error);
        }
        let client = unsafe { &*client };
        let Some(href) = opt_str(self_href) else {
            return finish_build(Err(FfiHalResult::null_arg("self_href")), out_error);
        };
        let built = client
            .inner
            .build_delete_link(href)
            .map_err(FfiHalResult::from_error);
        finish_build(built, out_error)
    })
    .unwrap_or_else(|_| {
        let error = FfiHalResult::panic("panic in hal_build_delete_user");
        store_error(out_error, error, std::ptr::null_mut())
    })
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`. A null body is
/// treated as empty.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    HttpResponse::new(resp.status, opt_str(resp.body).unwrap_or(""))
}

/// Run `parse` on the caller's response after the shared null checks.
fn parse_with(
    client: *const FfiHalClient,
    response: *const FfiHttpResponse,
    parse: impl FnOnce(&CollectionClient, HttpResponse) -> *mut FfiHalResult,
) -> *mut FfiHalResult {
    if client.is_null() {
        return FfiHalResult::null_arg("client");
    }
    if response.is_null() {
        return FfiHalResult::null_arg("response");
    }
    let client = unsafe { &*client };
    let resp = unsafe { &*response };
    parse(&client.inner, ffi_response_to_core(resp))
}

/// Parse an HTTP response from a list request.
///
/// Returns a result with `data_tag = UserList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn hal_parse_list_users(
    client: *const FfiHalClient,
    response: *const FfiHttpResponse,
) -> *mut FfiHalResult {
    catch_unwind(|| {
        parse_with(client, response, |c, r| match c.parse_list_users(r) {
            Ok(users) => FfiHalResult::ok_user_list(users),
            Err(e) => FfiHalResult::from_error(e),
        })
    })
    .unwrap_or_else(|_| FfiHalResult::panic("panic in hal_parse_list_users"))
}

/// Parse an HTTP response from a create request (200 or 201).
///
/// The body is not interpreted; refetch the collection to see the new user.
#[unsafe(no_mangle)]
pub extern "C" fn hal_parse_create_user(
    client: *const FfiHalClient,
    response: *const FfiHttpResponse,
) -> *mut FfiHalResult {
    catch_unwind(|| {
        parse_with(client, response, |c, r| match c.parse_create_user(r) {
            Ok(()) => FfiHalResult::ok_empty(),
            Err(e) => FfiHalResult::from_error(e),
        })
    })
    .unwrap_or_else(|_| FfiHalResult::panic("panic in hal_parse_create_user"))
}

/// Parse an HTTP response from a delete request (200 or 204).
#[unsafe(no_mangle)]
pub extern "C" fn hal_parse_delete_user(
    client: *const FfiHalClient,
    response: *const FfiHttpResponse,
) -> *mut FfiHalResult {
    catch_unwind(|| {
        parse_with(client, response, |c, r| match c.parse_delete_user(r) {
            Ok(()) => FfiHalResult::ok_empty(),
            Err(e) => FfiHalResult::from_error(e),
        })
    })
    .unwrap_or_else(|_| FfiHalResult::panic("panic in hal_parse_delete_user"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `hal_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn hal_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.path);
        free_c_string(req.body);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    });
}

/// Free an `FfiHalResult` returned by any `hal_parse_*` function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn hal_free_result(result: *mut FfiHalResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::UserList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiUserList) };
                if !list.items.is_null() && list.len > 0 {
                    let items = unsafe {
                        Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                            list.items,
                            list.len as usize,
                        ))
                    };
                    for user in items.iter() {
                        free_ffi_user_fields(user);
                    }
                }
            }
            FfiDataTag::None => {}
        }
    });
}

/// Free the C-string fields of an `FfiUser` (but not the struct itself).
fn free_ffi_user_fields(user: &FfiUser) {
    free_c_string(user.self_href);
    free_c_string(user.username);
    free_c_string(user.gender);
    free_c_string(user.name);
}

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn hal_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| free_c_string(s));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
