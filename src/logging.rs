//! Logger initialisation.
//!
//! On Android log records go to logcat through `android_logger`; on every
//! other target `env_logger` writes to stderr and honours `RUST_LOG`.

/// Install the platform logger. Safe to call more than once.
pub fn init() {
    #[cfg(target_os = "android")]
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Debug)
            .with_tag("wayguide"),
    );

    #[cfg(not(target_os = "android"))]
    {
        // try_init fails when a logger is already installed, which is fine
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .try_init();
    }
}
