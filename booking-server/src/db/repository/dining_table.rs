//! Dining Table Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{DiningTable, DiningTableCreate, DiningTableUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "dining_table";

#[derive(Clone)]
pub struct DiningTableRepository {
    base: BaseRepository,
}

impl DiningTableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active tables of a restaurant
    pub async fn find_by_restaurant(&self, restaurant_id: &str) -> RepoResult<Vec<DiningTable>> {
        let restaurant: RecordId = restaurant_id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid restaurant ID: {}", restaurant_id)))?;
        let tables: Vec<DiningTable> = self
            .base
            .db()
            .query(
                "SELECT * FROM dining_table WHERE restaurant = $restaurant AND is_active = true ORDER BY name",
            )
            .bind(("restaurant", restaurant))
            .await?
            .take(0)?;
        Ok(tables)
    }

    /// Find table by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<DiningTable>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let table: Option<DiningTable> = self.base.db().select(thing).await?;
        Ok(table)
    }

    /// Find table by name within a restaurant
    pub async fn find_by_name(
        &self,
        restaurant: &RecordId,
        name: &str,
    ) -> RepoResult<Option<DiningTable>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM dining_table WHERE restaurant = $restaurant AND name = $name LIMIT 1",
            )
            .bind(("restaurant", restaurant.clone()))
            .bind(("name", name.to_string()))
            .await?;
        let tables: Vec<DiningTable> = result.take(0)?;
        Ok(tables.into_iter().next())
    }

    /// Create a new dining table
    pub async fn create(&self, data: DiningTableCreate) -> RepoResult<DiningTable> {
        if data.capacity == 0 {
            return Err(RepoError::Validation(
                "Table capacity must be at least 1".into(),
            ));
        }
        let min_seats = data.min_seats.unwrap_or(1);
        if min_seats > data.capacity {
            return Err(RepoError::Validation(format!(
                "min_seats ({}) must not exceed capacity ({})",
                min_seats, data.capacity
            )));
        }
        // Check duplicate name in same restaurant
        if self
            .find_by_name(&data.restaurant, &data.name)
            .await?
            .is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Table '{}' already exists in this restaurant",
                data.name
            )));
        }

        let table = DiningTable {
            id: None,
            restaurant: data.restaurant,
            name: data.name,
            capacity: data.capacity,
            min_seats,
            location: data.location.unwrap_or_default(),
            pos_x: data.pos_x.unwrap_or(0.0),
            pos_y: data.pos_y.unwrap_or(0.0),
            is_active: true,
        };

        let created: Option<DiningTable> = self.base.db().create(TABLE).content(table).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create dining table".to_string()))
    }

    /// Update a dining table
    pub async fn update(&self, id: &str, data: DiningTableUpdate) -> RepoResult<DiningTable> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Dining table {} not found", id)))?;

        // Check duplicate name in restaurant if renaming
        if let Some(new_name) = data.name.as_ref()
            && new_name != &existing.name
            && let Some(found) = self.find_by_name(&existing.restaurant, new_name).await?
            && found.id != existing.id
        {
            return Err(RepoError::Duplicate(format!(
                "Table '{}' already exists in this restaurant",
                new_name
            )));
        }

        let capacity = data.capacity.unwrap_or(existing.capacity);
        let min_seats = data.min_seats.unwrap_or(existing.min_seats);
        if capacity == 0 {
            return Err(RepoError::Validation(
                "Table capacity must be at least 1".into(),
            ));
        }
        if min_seats > capacity {
            return Err(RepoError::Validation(format!(
                "min_seats ({}) must not exceed capacity ({})",
                min_seats, capacity
            )));
        }

        // 手动构建 UPDATE 语句，避免 restaurant 被序列化为字符串
        let name = data.name.unwrap_or(existing.name);
        let location = data.location.unwrap_or(existing.location);
        let pos_x = data.pos_x.unwrap_or(existing.pos_x);
        let pos_y = data.pos_y.unwrap_or(existing.pos_y);
        let is_active = data.is_active.unwrap_or(existing.is_active);

        self.base
            .db()
            .query(
                "UPDATE $thing SET name = $name, capacity = $capacity, min_seats = $min_seats, \
                 location = $location, pos_x = $pos_x, pos_y = $pos_y, is_active = $is_active",
            )
            .bind(("thing", thing))
            .bind(("name", name))
            .bind(("capacity", capacity))
            .bind(("min_seats", min_seats))
            .bind(("location", location))
            .bind(("pos_x", pos_x))
            .bind(("pos_y", pos_y))
            .bind(("is_active", is_active))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Dining table {} not found", id)))
    }

    /// Soft delete a dining table (history keeps referencing it)
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        self.base
            .db()
            .query("UPDATE $thing SET is_active = false")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
