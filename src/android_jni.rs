//! JNI bindings for the Android app.
//!
//! Each public function here corresponds to an `external fun` declaration
//! in RustBridge.kt. The function names follow JNI naming conventions:
//! Java_<package>_<class>_<method> with dots replaced by underscores.
//!
//! The Kotlin side holds a `Long` handle from `nativeCreate` and must pass
//! it to `nativeDestroy` exactly once. Commands and replies are JSON; see
//! `host.rs` for the protocol.

use std::sync::Mutex;

use jni::JNIEnv;
use jni::objects::{JClass, JString};
use jni::sys::{jdouble, jlong, jstring};
use log::error;

use crate::host::HostSession;
use crate::smoother::RawSample;

type Handle = Mutex<HostSession>;

/// Returns the library version.
/// Maps to: RustBridge.version() -> String
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_wayguide_app_RustBridge_version(
    env: JNIEnv,
    _class: JClass,
) -> jstring {
    new_jstring(&env, crate::VERSION)
}

/// Create a guidance session from a JSON config (empty for defaults).
/// Maps to: RustBridge.nativeCreate(config: String) -> Long
///
/// Returns 0 if the config is rejected.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_wayguide_app_RustBridge_nativeCreate(
    mut env: JNIEnv,
    _class: JClass,
    config: JString,
) -> jlong {
    crate::logging::init();

    let config: String = match env.get_string(&config) {
        Ok(s) => s.into(),
        Err(e) => {
            error!("nativeCreate: failed to read config: {e}");
            return 0;
        }
    };

    match HostSession::from_config_json(&config) {
        Ok(session) => Box::into_raw(Box::new(Mutex::new(session))) as jlong,
        Err(e) => {
            error!("nativeCreate: {e}");
            0
        }
    }
}

/// Release a session created by `nativeCreate`.
/// Maps to: RustBridge.nativeDestroy(handle: Long)
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_wayguide_app_RustBridge_nativeDestroy(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) {
    if handle != 0 {
        // SAFETY: the handle came from Box::into_raw in nativeCreate and
        // the Kotlin side destroys it only once.
        drop(unsafe { Box::from_raw(handle as *mut Handle) });
    }
}

/// Feed one raw GPS fix.
/// Maps to: RustBridge.nativeObserve(handle: Long, lat: Double, lon: Double, timeMs: Long)
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_wayguide_app_RustBridge_nativeObserve(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
    lat: jdouble,
    lon: jdouble,
    time_ms: jlong,
) {
    let Some(host) = session(handle) else {
        error!("nativeObserve: null handle");
        return;
    };
    let mut host = host.lock().unwrap_or_else(|e| e.into_inner());
    host.observe(RawSample {
        lat,
        lon,
        timestamp_ms: time_ms.max(0) as u64,
    });
}

/// Run one JSON command and return the JSON reply.
/// Maps to: RustBridge.nativeCommand(handle: Long, command: String) -> String?
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_wayguide_app_RustBridge_nativeCommand(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    command: JString,
) -> jstring {
    let Some(host) = session(handle) else {
        error!("nativeCommand: null handle");
        return std::ptr::null_mut();
    };

    let command: String = match env.get_string(&command) {
        Ok(s) => s.into(),
        Err(e) => {
            error!("nativeCommand: failed to read command: {e}");
            return std::ptr::null_mut();
        }
    };

    let reply = host
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .handle_json(&command);
    new_jstring(&env, &reply)
}

fn session<'a>(handle: jlong) -> Option<&'a Handle> {
    // SAFETY: non-zero handles are live boxes from nativeCreate.
    unsafe { (handle as *const Handle).as_ref() }
}

fn new_jstring(env: &JNIEnv, value: &str) -> jstring {
    match env.new_string(value) {
        Ok(s) => s.into_raw(),
        Err(e) => {
            error!("failed to create Java string: {e}");
            std::ptr::null_mut()
        }
    }
}
