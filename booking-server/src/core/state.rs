use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::availability::AvailabilityService;
use crate::core::Config;
use crate::db;
use crate::db::repository::{DiningTableRepository, RestaurantRepository, ScheduleRepository};
use crate::reservations::{BookingPolicy, ReservationStore, ReservationsManager};
use crate::scheduling::ScheduleService;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是预订节点的核心数据结构，持有所有服务的共享引用。
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式目录数据库 (餐厅/桌台/营业时间) |
/// | reservations | Arc<ReservationsManager> | 预订台账 (redb) |
/// | schedule | Arc<ScheduleService> | 营业时间解析 |
/// | availability | Arc<AvailabilityService> | 可订时段/桌台查询 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式目录数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// 预订台账与生命周期管理
    pub reservations: Arc<ReservationsManager>,
    /// 营业时间解析服务
    pub schedule: Arc<ScheduleService>,
    /// 可订性查询服务
    pub availability: Arc<AvailabilityService>,
}

impl ServerState {
    /// 初始化所有服务 (磁盘存储)
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;

        let db = db::connect(&config.catalog_db_path().to_string_lossy()).await?;
        let store = ReservationStore::open(config.reservations_db_path())?;
        Ok(Self::assemble(config.clone(), db, store))
    }

    /// 初始化所有服务 (内存存储，测试用)
    pub async fn initialize_in_memory(config: &Config) -> anyhow::Result<Self> {
        let db = db::connect_in_memory().await?;
        let store = ReservationStore::open_in_memory()?;
        Ok(Self::assemble(config.clone(), db, store))
    }

    fn assemble(config: Config, db: Surreal<Db>, store: ReservationStore) -> Self {
        let reservations = Arc::new(ReservationsManager::new(
            store,
            BookingPolicy {
                auto_confirm: config.auto_confirm,
                max_party_size: config.max_party_size,
            },
        ));
        let schedule = Arc::new(ScheduleService::new(ScheduleRepository::new(db.clone())));
        let availability = Arc::new(AvailabilityService::new(
            schedule.clone(),
            DiningTableRepository::new(db.clone()),
            reservations.clone(),
            config.slot_minutes,
        ));

        Self {
            config,
            db,
            reservations,
            schedule,
            availability,
        }
    }

    /// 目录仓库的便捷构造
    pub fn restaurants(&self) -> RestaurantRepository {
        RestaurantRepository::new(self.db.clone())
    }

    pub fn tables(&self) -> DiningTableRepository {
        DiningTableRepository::new(self.db.clone())
    }
}
