use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=THNKR_DECODER_LIB_DIR");

    if env::var_os("CARGO_FEATURE_NATIVE_DECODER").is_none() {
        return;
    }

    // libThnkrEegDecoder is usually installed next to the binary rather than in a system path
    if let Some(dir) = env::var_os("THNKR_DECODER_LIB_DIR") {
        println!("cargo:rustc-link-search=native={}", dir.to_string_lossy());
    }
}
