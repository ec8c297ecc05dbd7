use chrono_tz::Tz;
use std::path::PathBuf;

/// 服务器配置 - 预订节点的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/mesa/edge | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | SLOT_MINUTES | 30 | 时段粒度(分钟) |
/// | MAX_PARTY_SIZE | 20 | 单次预订人数上限 |
/// | AUTO_CONFIRM | false | 新预订跳过人工确认直接 confirmed |
/// | BUSINESS_TIMEZONE | Europe/Madrid | 餐厅未配置时区时的回退时区 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/mesa HTTP_PORT=8080 AUTO_CONFIRM=true cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库和日志文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 时段粒度 (分钟)
    pub slot_minutes: u16,
    /// 单次预订人数上限 (合理性上限，不是业务规则)
    pub max_party_size: u32,
    /// 初始状态策略: true 时新预订直接进入 confirmed
    pub auto_confirm: bool,
    /// 业务时区 (餐厅未配置时区时的回退)
    pub business_timezone: Tz,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/mesa/edge".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            slot_minutes: std::env::var("SLOT_MINUTES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30),
            max_party_size: std::env::var("MAX_PARTY_SIZE")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(20),
            auto_confirm: std::env::var("AUTO_CONFIRM")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            business_timezone: std::env::var("BUSINESS_TIMEZONE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(chrono_tz::Europe::Madrid),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// 目录与文件路径
    pub fn catalog_db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("catalog.db")
    }

    pub fn reservations_db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("reservations.redb")
    }

    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
