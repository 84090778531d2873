fn main() {
    println!("cargo:rerun-if-env-changed=WIFI_SSID");
    println!("cargo:rerun-if-env-changed=WIFI_PASSWORD");
    println!("cargo:rerun-if-env-changed=BROKER_IP");
    println!("cargo:rerun-if-env-changed=BROKER_PORT");
    println!("cargo:rerun-if-env-changed=BROKER_USR");
    println!("cargo:rerun-if-env-changed=BROKER_PASSWD");

    // Host builds (tests, simulation) have no ESP-IDF toolchain to export.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
