//! 配置管理模块
//!
//! 从环境变量构建进程级配置快照，缺失或格式错误的值回退到默认值。
//!
//! 进程启动时调用一次 [`initialize`]，之后通过 [`current`] 或派生访问器
//! （[`server_address`]、[`is_production`]、[`is_development`]）读取。
//! 需要隔离配置的组件可直接持有 [`AppConfig`]，或用 [`ConfigLoader`] 自行构建。

pub mod config;
pub mod loader;

pub use config::{
    AppConfig, ApplicationConfig, CloudinaryConfig, DatabaseConfig, GoogleOAuthConfig, JwtConfig,
    RedisConfig, SecurityConfig, ServerConfig, SmtpConfig, StripeConfig, UploadCategory,
    UploadPolicy, DEFAULT_RATE_LIMIT_DURATION,
};
pub use loader::ConfigLoader;

use crate::error::ConfigError;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

/// 全局配置快照，仅在替换时加写锁
static SNAPSHOT: Lazy<RwLock<Option<Arc<AppConfig>>>> = Lazy::new(|| RwLock::new(None));

/// 从环境变量加载配置并安装为全局快照
///
/// 不会失败。重复调用会整体替换之前的快照。
pub fn initialize() -> Arc<AppConfig> {
    let snapshot = install(ConfigLoader::from_env().load());
    println!("✅ Global configuration load complete");
    snapshot
}

/// 安装给定配置为全局快照，返回其共享句柄
pub fn install(config: AppConfig) -> Arc<AppConfig> {
    let snapshot = Arc::new(config);
    *SNAPSHOT.write() = Some(Arc::clone(&snapshot));
    info!(
        environment = %snapshot.app.environment,
        address = %snapshot.server_address(),
        "Configuration snapshot installed"
    );
    snapshot
}

/// 当前快照；未初始化时返回错误
pub fn try_current() -> Result<Arc<AppConfig>, ConfigError> {
    SNAPSHOT.read().clone().ok_or(ConfigError::NotInitialized)
}

/// 当前快照
///
/// # Panics
///
/// 在 [`initialize`] 之前调用会 panic，初始化顺序由调用方保证。
pub fn current() -> Arc<AppConfig> {
    try_current().unwrap_or_else(|e| panic!("{e}"))
}

/// 服务监听地址 `host:port`
pub fn server_address() -> String {
    current().server_address()
}

pub fn is_production() -> bool {
    current().is_production()
}

pub fn is_development() -> bool {
    current().is_development()
}
