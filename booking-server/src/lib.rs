//! Mesa Booking Server - 餐厅预订边缘节点
//!
//! # 架构概述
//!
//! 本模块是预订节点的主入口，提供以下核心功能：
//!
//! - **营业时间解析** (`scheduling`): 周时间表 + 特殊营业日的日期解析
//! - **可订性解析** (`availability`): 时段枚举与桌台匹配排序
//! - **预订台账** (`reservations`): redb 事务存储、原子占位、CAS 状态机
//! - **预订向导** (`workflow`): 四步预订流程的显式状态机
//! - **目录数据库** (`db`): 嵌入式 SurrealDB 存储餐厅/桌台/排班
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! booking-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 目录数据库层
//! ├── scheduling/    # 营业时间解析
//! ├── availability/  # 可订时段与桌台匹配
//! ├── reservations/  # 预订台账与生命周期
//! ├── workflow/      # 预订向导状态机
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod availability;
pub mod core;
pub mod db;
pub mod reservations;
pub mod scheduling;
pub mod utils;
pub mod workflow;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use reservations::{BookingPolicy, ReservationEvent, ReservationStore, ReservationsManager};
pub use scheduling::ScheduleService;
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use workflow::{BookingStep, BookingWizard};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    __  ___
   /  |/  /__  _________ _
  / /|_/ / _ \/ ___/ __ `/
 / /  / /  __(__  ) /_/ /
/_/  /_/\___/____/\__,_/
    Booking Server
    "#
    );
}

/// 设置运行环境 (dotenv, 工作目录, 日志)
pub fn setup_environment() -> anyhow::Result<Config> {
    dotenv::dotenv().ok();
    let config = Config::from_env();
    std::fs::create_dir_all(config.log_dir())?;
    init_logger_with_file(
        std::env::var("RUST_LOG").ok().as_deref(),
        config.log_dir().to_str(),
    );
    Ok(config)
}
