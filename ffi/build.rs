//! Generates `include/hal_sync.h` from the `extern "C"` surface.

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");

    let crate_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let config = cbindgen::Config {
        language: cbindgen::Language::C,
        include_guard: Some("HAL_SYNC_H".to_string()),
        cpp_compat: true,
        ..Default::default()
    };

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(format!("{crate_dir}/include/hal_sync.h"));
        }
        Err(e) => println!("cargo:warning=cbindgen failed, header not regenerated: {e}"),
    }
}
