//! Generates the Kotlin and Swift bindings, e.g.
//! `cargo run -p uniffi-bindgen -- generate --library target/release/libpatas.so --language kotlin --out-dir kotlin`.

fn main() {
    uniffi::uniffi_bindgen_main();
}
