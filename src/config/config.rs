use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// 生产环境标识
pub const ENV_PRODUCTION: &str = "production";
/// 开发环境标识
pub const ENV_DEVELOPMENT: &str = "development";

/// 默认限流窗口
pub const DEFAULT_RATE_LIMIT_DURATION: &str = "60s";

/// 脱敏后的占位值
const REDACTED: &str = "***";

/// 服务器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口，保留为文本以支持服务名
    pub port: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: "8080".into(),
        }
    }
}

/// 安全配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityConfig {
    /// API 密钥
    pub api_key: String,
    /// 允许的 CORS 来源
    pub allowed_origins: Vec<String>,
    /// 限流窗口内允许的请求次数
    pub rate_limit_attempts: i32,
    /// 限流窗口
    #[serde(serialize_with = "serialize_duration")]
    pub rate_limit_duration: Duration,
    /// 各类上传文件的大小上限（字节），键为 "images" / "videos" / "documents"
    pub max_upload_sizes: BTreeMap<String, i64>,
    /// 跳过 API 密钥校验的端点
    pub skipped_api_endpoints: Vec<String>,
    /// 受信任的反向代理
    pub trusted_proxies: Vec<String>,
    /// Cookie 域
    pub cookie_domain: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            api_key: "your-api-keys".into(),
            allowed_origins: vec!["http://localhost:3000".into()],
            rate_limit_attempts: 100,
            rate_limit_duration: humantime::parse_duration(DEFAULT_RATE_LIMIT_DURATION)
                .unwrap_or_default(),
            max_upload_sizes: UploadCategory::ALL
                .iter()
                .map(|c| (c.key().to_string(), c.default_max_size()))
                .collect(),
            skipped_api_endpoints: vec!["/health".into()],
            trusted_proxies: vec!["localhost".into()],
            cookie_domain: "localhost".into(),
        }
    }
}

/// 数据库配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseConfig {
    /// 数据库根地址
    pub root_url: String,
    /// 数据库名称
    pub name: String,
    /// 完整连接地址
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            root_url: "your-db-root-url".into(),
            name: "your-db-name".into(),
            url: "your-db-url".into(),
        }
    }
}

/// Redis 配置（缓存与会话存储）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedisConfig {
    pub address: String,
    pub password: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            address: "localhost:6379".into(),
            password: String::new(),
        }
    }
}

/// JWT 签名配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JwtConfig {
    pub access_token_secret: String,
    pub refresh_token_secret: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            access_token_secret: "your-secret-key".into(),
            refresh_token_secret: "your-refresh-token-secret".into(),
        }
    }
}

/// 邮件发送配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: i32,
    /// 发件人地址
    pub email: String,
    pub password: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 587,
            email: String::new(),
            password: String::new(),
        }
    }
}

/// 应用信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationConfig {
    /// 应用名称
    pub name: String,
    /// 运行环境："development"、"production" 或其他自定义值
    pub environment: String,
    /// 前端地址
    pub frontend_url: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: "Asset Management System".into(),
            environment: ENV_DEVELOPMENT.into(),
            frontend_url: "http://localhost:5173".into(),
        }
    }
}

/// Cloudinary 媒体存储配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_secret: String,
    pub api_key: String,
    /// 上传目录
    pub folder: String,
}

impl Default for CloudinaryConfig {
    fn default() -> Self {
        Self {
            cloud_name: "your-cloudinary-cloud-name".into(),
            api_secret: "your-cloudinary-api-secret".into(),
            api_key: "your-cloudinary-api-key".into(),
            folder: "asset_management_app".into(),
        }
    }
}

/// Google OAuth 配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    /// OAuth 回调地址
    pub redirect_url: String,
    /// 登录完成后跳转的前端地址
    pub frontend_redirect_url: String,
}

impl Default for GoogleOAuthConfig {
    fn default() -> Self {
        Self {
            client_id: "your-google-client-id".into(),
            client_secret: "your-google-client-secret".into(),
            redirect_url: "http://localhost:5005/api/v1/users/google/callback".into(),
            frontend_redirect_url: "http://localhost:5173".into(),
        }
    }
}

/// Stripe 支付配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StripeConfig {
    pub webhook_secret: String,
    pub cancel_url_dev: String,
    pub success_url_dev: String,
    pub cancel_url_prod: String,
    pub success_url_prod: String,
    pub secret_key: String,
    pub publishable_key: String,
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self {
            webhook_secret: "your-stripe-webhook-secret".into(),
            cancel_url_dev: "http://localhost:5173/checkout/cancel".into(),
            success_url_dev: "http://localhost:5173/checkout/success".into(),
            cancel_url_prod: "https://your-production-url/checkout/cancel".into(),
            success_url_prod: "https://your-production-url/checkout/success".into(),
            secret_key: "your-stripe-secret-key".into(),
            publishable_key: "your-stripe-publishable-key".into(),
        }
    }
}

/// 上传内容策略：各类文件允许的 MIME 类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadPolicy {
    pub allowed_image_types: Vec<String>,
    pub allowed_video_types: Vec<String>,
    pub allowed_document_types: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            allowed_image_types: vec!["image/jpeg".into(), "image/png".into()],
            allowed_video_types: vec!["video/mp4".into()],
            allowed_document_types: vec!["application/pdf".into()],
        }
    }
}

/// 上传文件类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadCategory {
    Images,
    Videos,
    Documents,
}

impl UploadCategory {
    pub const ALL: [UploadCategory; 3] = [Self::Images, Self::Videos, Self::Documents];

    /// 在 `max_upload_sizes` 中使用的键
    pub fn key(self) -> &'static str {
        match self {
            Self::Images => "images",
            Self::Videos => "videos",
            Self::Documents => "documents",
        }
    }

    /// 默认大小上限：图片 2 MiB，视频 100 MiB，文档 10 MiB
    pub fn default_max_size(self) -> i64 {
        match self {
            Self::Images => 2 << 20,
            Self::Videos => 100 << 20,
            Self::Documents => 10 << 20,
        }
    }
}

impl fmt::Display for UploadCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// 应用配置快照
///
/// 由 [`ConfigLoader`](super::loader::ConfigLoader) 构建，加载后只读。
/// `Default` 即所有环境变量均未设置时的配置。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppConfig {
    /// 服务器配置
    pub server: ServerConfig,
    /// 安全配置
    pub security: SecurityConfig,
    /// 数据库配置
    pub database: DatabaseConfig,
    /// Redis 配置
    pub redis: RedisConfig,
    /// JWT 配置
    pub jwt: JwtConfig,
    /// 邮件配置
    pub smtp: SmtpConfig,
    /// 应用信息
    pub app: ApplicationConfig,
    /// 媒体存储配置
    pub cloudinary: CloudinaryConfig,
    /// Google OAuth 配置
    pub google: GoogleOAuthConfig,
    /// 支付配置
    pub stripe: StripeConfig,
    /// 上传策略
    pub uploads: UploadPolicy,
}

impl AppConfig {
    /// 服务监听地址，格式为 `host:port`
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 是否为生产环境（区分大小写）
    pub fn is_production(&self) -> bool {
        self.app.environment == ENV_PRODUCTION
    }

    /// 是否为开发环境（区分大小写）
    pub fn is_development(&self) -> bool {
        self.app.environment == ENV_DEVELOPMENT
    }

    /// 某类上传文件的大小上限（字节）
    pub fn max_upload_size(&self, category: UploadCategory) -> i64 {
        self.security
            .max_upload_sizes
            .get(category.key())
            .copied()
            .unwrap_or_else(|| category.default_max_size())
    }

    /// 某类上传文件允许的 MIME 类型
    pub fn allowed_mime_types(&self, category: UploadCategory) -> &[String] {
        match category {
            UploadCategory::Images => &self.uploads.allowed_image_types,
            UploadCategory::Videos => &self.uploads.allowed_video_types,
            UploadCategory::Documents => &self.uploads.allowed_document_types,
        }
    }

    pub fn is_mime_allowed(&self, category: UploadCategory, mime: &str) -> bool {
        self.allowed_mime_types(category).iter().any(|m| m == mime)
    }

    /// 支付成功后的跳转地址，生产环境使用 prod 地址
    pub fn stripe_success_url(&self) -> &str {
        if self.is_production() {
            &self.stripe.success_url_prod
        } else {
            &self.stripe.success_url_dev
        }
    }

    /// 支付取消后的跳转地址，生产环境使用 prod 地址
    pub fn stripe_cancel_url(&self) -> &str {
        if self.is_production() {
            &self.stripe.cancel_url_prod
        } else {
            &self.stripe.cancel_url_dev
        }
    }

    /// 返回隐藏所有密钥后的副本，用于日志输出
    ///
    /// 空密钥保持为空，便于看出哪些值未配置。
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        for secret in [
            &mut config.security.api_key,
            &mut config.redis.password,
            &mut config.jwt.access_token_secret,
            &mut config.jwt.refresh_token_secret,
            &mut config.smtp.password,
            &mut config.cloudinary.api_secret,
            &mut config.cloudinary.api_key,
            &mut config.google.client_secret,
            &mut config.stripe.webhook_secret,
            &mut config.stripe.secret_key,
        ] {
            if !secret.is_empty() {
                *secret = REDACTED.to_string();
            }
        }
        config
    }
}

fn serialize_duration<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&humantime::format_duration(*duration))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_address() {
        let mut config = AppConfig::default();
        assert_eq!(config.server_address(), "localhost:8080");

        config.server.host = "0.0.0.0".into();
        config.server.port = "http".into();
        assert_eq!(config.server_address(), "0.0.0.0:http");
    }

    #[test]
    fn test_environment_checks() {
        let mut config = AppConfig::default();
        assert!(config.is_development());
        assert!(!config.is_production());

        config.app.environment = "production".into();
        assert!(config.is_production());
        assert!(!config.is_development());

        // 区分大小写
        config.app.environment = "Production".into();
        assert!(!config.is_production());
        assert!(!config.is_development());
    }

    #[test]
    fn test_default_upload_limits() {
        let config = AppConfig::default();
        assert_eq!(config.max_upload_size(UploadCategory::Images), 2 * 1024 * 1024);
        assert_eq!(config.max_upload_size(UploadCategory::Videos), 100 * 1024 * 1024);
        assert_eq!(config.max_upload_size(UploadCategory::Documents), 10 * 1024 * 1024);
        assert_eq!(config.security.max_upload_sizes.len(), 3);
    }

    #[test]
    fn test_mime_policy() {
        let config = AppConfig::default();
        assert!(config.is_mime_allowed(UploadCategory::Images, "image/png"));
        assert!(!config.is_mime_allowed(UploadCategory::Images, "image/gif"));
        assert!(config.is_mime_allowed(UploadCategory::Documents, "application/pdf"));
        assert_eq!(config.allowed_mime_types(UploadCategory::Videos), ["video/mp4"]);
    }

    #[test]
    fn test_stripe_urls_follow_environment() {
        let mut config = AppConfig::default();
        assert_eq!(config.stripe_success_url(), "http://localhost:5173/checkout/success");
        assert_eq!(config.stripe_cancel_url(), "http://localhost:5173/checkout/cancel");

        config.app.environment = ENV_PRODUCTION.into();
        assert_eq!(
            config.stripe_success_url(),
            "https://your-production-url/checkout/success"
        );
        assert_eq!(
            config.stripe_cancel_url(),
            "https://your-production-url/checkout/cancel"
        );
    }

    #[test]
    fn test_redacted_hides_secrets() {
        let config = AppConfig::default();
        let redacted = config.redacted();

        assert_eq!(redacted.security.api_key, "***");
        assert_eq!(redacted.jwt.access_token_secret, "***");
        assert_eq!(redacted.stripe.secret_key, "***");
        // 未配置的密钥保持为空
        assert_eq!(redacted.redis.password, "");
        assert_eq!(redacted.smtp.password, "");
        // 非密钥字段不受影响
        assert_eq!(redacted.server, config.server);
        assert_eq!(redacted.stripe.publishable_key, config.stripe.publishable_key);
    }

    #[test]
    fn test_default_rate_limit_window() {
        let config = AppConfig::default();
        assert_eq!(config.security.rate_limit_duration, Duration::from_secs(60));
        assert_eq!(
            humantime::parse_duration(DEFAULT_RATE_LIMIT_DURATION).unwrap(),
            config.security.rate_limit_duration
        );
    }

    #[test]
    fn test_serialize_duration_as_text() {
        let json = serde_json::to_value(AppConfig::default()).unwrap();
        assert_eq!(json["security"]["rate_limit_duration"], "1m");
        assert_eq!(json["security"]["max_upload_sizes"]["images"], 2097152);
    }
}
