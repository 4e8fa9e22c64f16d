use marketplace::config::{ConfigError, ConfigLoader};
use std::{
    env, fs,
    path::PathBuf,
    sync::{Mutex, MutexGuard, OnceLock},
};
use tempfile::TempDir;

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

fn env_guard() -> MutexGuard<'static, ()> {
    env_lock()
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
}

fn clear_env() {
    unsafe {
        env::remove_var("MARKETPLACE_PROFILE");
        env::remove_var("MARKETPLACE_API_BIND_ADDR");
        env::remove_var("MARKETPLACE_LOG_LEVEL");
        env::remove_var("MARKETPLACE_USER_SERVICE_API");
        env::remove_var("MARKETPLACE_USER_SERVICE_TIMEOUT_SECS");
        env::remove_var("MARKETPLACE_SEED_OPERATOR_EMAIL");
        env::remove_var("USER_SERVICE_API");
    }
}

fn write_env_file(dir: &TempDir, name: &str, contents: &str) {
    let path = dir.path().join(name);
    fs::write(path, contents).unwrap();
}

#[test]
fn loads_defaults_when_no_env_present() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads with defaults");

    assert_eq!(cfg.profile, "local");
    assert_eq!(cfg.api_bind_addr, "0.0.0.0:8080");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.user_service_api, None);
    assert_eq!(cfg.user_service_timeout_secs, 10);
    assert_eq!(cfg.seed_operator_email, "ccrowder@capsuleio.com");
    cfg.bind_addr().expect("default bind addr parses");
    clear_env();
}

#[test]
fn layered_env_files_apply_in_order() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(
        &temp_dir,
        ".env",
        "MARKETPLACE_API_BIND_ADDR=127.0.0.1:3000\nMARKETPLACE_USER_SERVICE_API=http://users.local/api/\n",
    );
    write_env_file(
        &temp_dir,
        ".env.test",
        "MARKETPLACE_API_BIND_ADDR=192.168.0.10:5000\n",
    );
    write_env_file(
        &temp_dir,
        ".env.test.local",
        "MARKETPLACE_API_BIND_ADDR=10.0.0.5:6000\n",
    );

    // Select profile via .env.local before profile-specific files load.
    write_env_file(
        &temp_dir,
        ".env.local",
        "MARKETPLACE_PROFILE=test\nMARKETPLACE_API_BIND_ADDR=127.0.0.1:4000\n",
    );

    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads with layered env files");

    assert_eq!(cfg.profile, "test");
    assert_eq!(cfg.api_bind_addr, "10.0.0.5:6000");
    assert_eq!(
        cfg.user_service_api.as_deref(),
        Some("http://users.local/api/")
    );
    clear_env();
}

#[test]
fn os_environment_has_highest_precedence() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(
        &temp_dir,
        ".env",
        "MARKETPLACE_API_BIND_ADDR=127.0.0.1:3000\nMARKETPLACE_SEED_OPERATOR_EMAIL=file@example.com\n",
    );

    unsafe {
        env::set_var("MARKETPLACE_API_BIND_ADDR", "0.0.0.0:9090");
        env::set_var("MARKETPLACE_SEED_OPERATOR_EMAIL", "ops@example.com");
    }

    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads with env override");
    assert_eq!(cfg.api_bind_addr, "0.0.0.0:9090");
    assert_eq!(cfg.seed_operator_email, "ops@example.com");

    clear_env();
}

#[test]
fn unprefixed_user_service_api_is_a_fallback() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    unsafe {
        env::set_var("USER_SERVICE_API", "http://legacy.local/");
    }

    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads with legacy variable");
    assert_eq!(cfg.user_service_api.as_deref(), Some("http://legacy.local/"));

    unsafe {
        env::set_var("MARKETPLACE_USER_SERVICE_API", "http://users.local/");
    }
    let cfg = loader.load().expect("config loads with both variables");
    assert_eq!(cfg.user_service_api.as_deref(), Some("http://users.local/"));

    clear_env();
}

#[test]
fn invalid_bind_addr_returns_error() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    unsafe {
        env::set_var("MARKETPLACE_API_BIND_ADDR", "not-an-addr");
    }
    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let err = loader.load().expect_err("invalid bind addr should fail");
    assert!(format!("{}", err).contains("invalid api bind address"));

    clear_env();
}

#[test]
fn out_of_range_timeout_returns_error() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    unsafe {
        env::set_var("MARKETPLACE_USER_SERVICE_TIMEOUT_SECS", "0");
    }
    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let err = loader.load().expect_err("zero timeout should fail");
    assert!(matches!(err, ConfigError::InvalidUserServiceTimeout { value: 0 }));

    clear_env();
}
