//! Asset Management System - 全局配置
//!
//! 从进程环境变量构建只读配置快照，并为服务器、认证中间件、存储、邮件、
//! 支付回调等下游组件提供类型化的访问方式。

pub mod config;
pub mod error;
