fn main() {
    // No rerun-if-changed: the stamp refreshes on every rebuild of the crate.
    let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    println!("cargo:rustc-env=FIRMWARE_BUILD_TIME={stamp}");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
