//! Drive the C surface against the live mock server, the way a C host would:
//! build a request, execute it, hand the raw status and body back.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use hal_sync_ffi::types::{FfiErrorCode, FfiHttpMethod, FfiHttpRequest, FfiHttpResponse, FfiUserList};
use hal_sync_ffi::*;

fn c_str<'a>(ptr: *const c_char) -> &'a str {
    unsafe { CStr::from_ptr(ptr) }.to_str().unwrap()
}

/// Execute an `FfiHttpRequest` with ureq and return (status, body).
fn execute(req: *mut FfiHttpRequest) -> (u16, CString) {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();
    let req_ref = unsafe { &*req };
    let path = c_str(req_ref.path).to_string();

    let mut response = match req_ref.method {
        FfiHttpMethod::Get => agent.get(&path).call(),
        FfiHttpMethod::Delete => agent.delete(&path).call(),
        FfiHttpMethod::Post => agent
            .post(&path)
            .content_type("application/json")
            .send(c_str(req_ref.body).as_bytes()),
    }
    .expect("HTTP transport error");
    hal_free_request(req);

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();
    (status, CString::new(body).unwrap())
}

fn start_server() -> std::net::SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, "http://elsewhere:8080").await
        })
        .unwrap();
    });
    addr
}

/// List users and return their self links.
fn list_links(client: *const types::FfiHalClient) -> Vec<String> {
    let (status, body) = execute(hal_build_list_users(client));
    let resp = FfiHttpResponse {
        status,
        body: body.as_ptr(),
    };
    let result = hal_parse_list_users(client, &resp);
    let r = unsafe { &*result };
    assert_eq!(r.error_code, FfiErrorCode::Ok);
    let list = unsafe { &*(r.data as *const FfiUserList) };
    let links = if list.len == 0 {
        Vec::new()
    } else {
        unsafe { std::slice::from_raw_parts(list.items, list.len as usize) }
            .iter()
            .map(|u| c_str(u.self_href).to_string())
            .collect()
    };
    hal_free_result(result);
    links
}

#[test]
fn create_list_delete_over_c_abi() {
    let addr = start_server();
    let url = CString::new(format!("http://{addr}")).unwrap();
    let client = hal_client_new(url.as_ptr(), std::ptr::null(), std::ptr::null());
    assert!(!client.is_null());

    assert!(list_links(client).is_empty());

    let name = CString::new("A").unwrap();
    let (status, body) = execute(hal_build_create_user(
        client,
        std::ptr::null(),
        std::ptr::null(),
        name.as_ptr(),
        20,
        1,
        std::ptr::null_mut(),
    ));
    let resp = FfiHttpResponse {
        status,
        body: body.as_ptr(),
    };
    let result = hal_parse_create_user(client, &resp);
    assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::Ok);
    hal_free_result(result);

    let links = list_links(client);
    assert_eq!(links, vec!["http://elsewhere:8080/be/users/1"]);

    let href = CString::new(links[0].clone()).unwrap();
    let (status, body) = execute(hal_build_delete_user(client, href.as_ptr(), std::ptr::null_mut()));
    let resp = FfiHttpResponse {
        status,
        body: body.as_ptr(),
    };
    let result = hal_parse_delete_user(client, &resp);
    assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::Ok);
    hal_free_result(result);

    assert!(list_links(client).is_empty());
    hal_client_free(client);
}
