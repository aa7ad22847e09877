//! 错误处理模块
//!
//! 配置加载本身不会失败，这里只覆盖访问未初始化快照的情况。

use thiserror::Error;

/// 配置访问错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// 尚未调用 `config::initialize`
    #[error("配置尚未初始化，请先调用 config::initialize()")]
    NotInitialized,
}
