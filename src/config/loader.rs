use crate::config::config::{
    AppConfig, ApplicationConfig, CloudinaryConfig, DatabaseConfig, GoogleOAuthConfig, JwtConfig,
    RedisConfig, SecurityConfig, ServerConfig, SmtpConfig, StripeConfig, UploadCategory,
    DEFAULT_RATE_LIMIT_DURATION,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// 配置加载器
///
/// 按变量名从查找函数读取原始值，并按类型解析。空值与未设置等价，
/// 解析失败时静默使用默认值，加载过程不会失败。
pub struct ConfigLoader<L> {
    lookup: L,
}

impl ConfigLoader<fn(&str) -> Option<String>> {
    /// 从进程环境变量读取
    pub fn from_env() -> Self {
        Self {
            lookup: env_lookup,
        }
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

impl<L> ConfigLoader<L>
where
    L: Fn(&str) -> Option<String>,
{
    /// 从任意查找函数读取，测试中可用内存中的变量表代替环境变量
    pub fn from_lookup(lookup: L) -> Self {
        Self { lookup }
    }

    /// 构建完整的配置快照
    pub fn load(&self) -> AppConfig {
        let d = AppConfig::default();

        let mut config = AppConfig {
            server: ServerConfig {
                host: self.string("HOST", &d.server.host),
                port: self.string("PORT", &d.server.port),
            },
            security: SecurityConfig {
                api_key: self.string("API_KEY", &d.security.api_key),
                allowed_origins: self.string_list("ALLOWED_ORIGINS", &d.security.allowed_origins),
                rate_limit_attempts: self
                    .int("RATE_LIMIT_ATTEMPTS", d.security.rate_limit_attempts),
                rate_limit_duration: self
                    .duration("RATE_LIMIT_DURATION", DEFAULT_RATE_LIMIT_DURATION),
                max_upload_sizes: Default::default(),
                skipped_api_endpoints: self
                    .string_list("SKIPPED_API_ENDPOINTS", &d.security.skipped_api_endpoints),
                trusted_proxies: self.string_list("TRUSTED_PROXIES", &d.security.trusted_proxies),
                cookie_domain: self.string("COOKIE_DOMAIN", &d.security.cookie_domain),
            },
            database: DatabaseConfig {
                root_url: self.string("DB_ROOT_URL", &d.database.root_url),
                name: self.string("DB_NAME", &d.database.name),
                url: self.string("DB_URL", &d.database.url),
            },
            redis: RedisConfig {
                address: self.string("REDIS_ADDRESS", &d.redis.address),
                password: self.string("REDIS_PASSWORD", &d.redis.password),
            },
            jwt: JwtConfig {
                access_token_secret: self
                    .string("ACCESS_TOKEN_SECRET", &d.jwt.access_token_secret),
                refresh_token_secret: self
                    .string("REFRESH_TOKEN_SECRET", &d.jwt.refresh_token_secret),
            },
            smtp: SmtpConfig {
                host: self.string("SMTP_HOST", &d.smtp.host),
                port: self.int("SMTP_PORT", d.smtp.port),
                email: self.string("SMTP_EMAIL", &d.smtp.email),
                password: self.string("SMTP_PASSWORD", &d.smtp.password),
            },
            app: ApplicationConfig {
                name: self.string("APP_NAME", &d.app.name),
                environment: self.string("APP_ENV", &d.app.environment),
                frontend_url: self.string("FRONTEND_URL", &d.app.frontend_url),
            },
            cloudinary: CloudinaryConfig {
                cloud_name: self.string("CLOUDINARY_CLOUD_NAME", &d.cloudinary.cloud_name),
                api_secret: self.string("CLOUDINARY_API_SECRET", &d.cloudinary.api_secret),
                api_key: self.string("CLOUDINARY_API_KEY", &d.cloudinary.api_key),
                folder: self.string("CLOUDINARY_FOLDER", &d.cloudinary.folder),
            },
            google: GoogleOAuthConfig {
                client_id: self.string("GOOGLE_CLIENT_ID", &d.google.client_id),
                client_secret: self.string("GOOGLE_CLIENT_SECRET", &d.google.client_secret),
                redirect_url: self.string("GOOGLE_REDIRECT_URL", &d.google.redirect_url),
                frontend_redirect_url: self
                    .string("FRONTEND_REDIRECT_URL", &d.google.frontend_redirect_url),
            },
            stripe: StripeConfig {
                webhook_secret: self.string("STRIPE_WEBHOOK_SECRET", &d.stripe.webhook_secret),
                cancel_url_dev: self.string("STRIPE_CANCEL_URL_DEV", &d.stripe.cancel_url_dev),
                success_url_dev: self.string("STRIPE_SUCCESS_URL_DEV", &d.stripe.success_url_dev),
                cancel_url_prod: self.string("STRIPE_CANCEL_URL_PROD", &d.stripe.cancel_url_prod),
                success_url_prod: self
                    .string("STRIPE_SUCCESS_URL_PROD", &d.stripe.success_url_prod),
                secret_key: self.string("STRIPE_SECRET_KEY", &d.stripe.secret_key),
                publishable_key: self
                    .string("STRIPE_PUBLISHABLE_KEY", &d.stripe.publishable_key),
            },
            uploads: Default::default(),
        };

        // 上传策略按类别加载
        config.uploads.allowed_image_types =
            self.string_list("ALLOWED_IMAGE_TYPES", &d.uploads.allowed_image_types);
        config.uploads.allowed_video_types =
            self.string_list("ALLOWED_VIDEO_TYPES", &d.uploads.allowed_video_types);
        config.uploads.allowed_document_types =
            self.string_list("ALLOWED_DOCUMENT_TYPES", &d.uploads.allowed_document_types);

        config.security.max_upload_sizes = UploadCategory::ALL
            .iter()
            .map(|&category| {
                let size = self.long(max_size_var(category), category.default_max_size());
                (category.key().to_string(), size)
            })
            .collect();

        config
    }

    /// 非空原始值
    fn raw(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|value| !value.is_empty())
    }

    /// 字符串：非空时返回原值，否则返回默认值
    pub fn string(&self, key: &str, default: &str) -> String {
        self.raw(key).unwrap_or_else(|| default.to_string())
    }

    /// 32 位整数
    pub fn int(&self, key: &str, default: i32) -> i32 {
        self.number(key, default)
    }

    /// 64 位整数
    pub fn long(&self, key: &str, default: i64) -> i64 {
        self.number(key, default)
    }

    fn number<T: FromStr>(&self, key: &str, default: T) -> T {
        let Some(value) = self.raw(key) else {
            return default;
        };
        match value.parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                debug!(key, value = %value, "Unparseable integer, using default");
                default
            }
        }
    }

    /// 时长，如 "60s"、"2h30m"
    ///
    /// 未设置时解析 `default`；`default` 也无法解析时返回零时长。
    pub fn duration(&self, key: &str, default: &str) -> Duration {
        let value = self.raw(key);
        let text = value.as_deref().unwrap_or(default);

        if let Ok(duration) = humantime::parse_duration(text) {
            return duration;
        }
        if value.is_some() {
            debug!(key, value = text, "Unparseable duration, using default");
        }
        humantime::parse_duration(default).unwrap_or(Duration::ZERO)
    }

    /// 逗号分隔的字符串列表
    ///
    /// 每项去除首尾空白，空项丢弃。未设置或为空时整体使用默认列表，不做合并。
    pub fn string_list(&self, key: &str, default: &[String]) -> Vec<String> {
        match self.raw(key) {
            Some(value) => value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
            None => default.to_vec(),
        }
    }
}

fn max_size_var(category: UploadCategory) -> &'static str {
    match category {
        UploadCategory::Images => "MAX_IMAGE_SIZE",
        UploadCategory::Videos => "MAX_VIDEO_SIZE",
        UploadCategory::Documents => "MAX_DOCUMENT_SIZE",
    }
}
