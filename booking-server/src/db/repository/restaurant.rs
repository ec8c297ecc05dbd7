//! Restaurant Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::restaurant::default_timezone;
use crate::db::models::{Restaurant, RestaurantCreate, RestaurantUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "restaurant";

#[derive(Clone)]
pub struct RestaurantRepository {
    base: BaseRepository,
}

impl RestaurantRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active restaurants
    pub async fn find_all(&self) -> RepoResult<Vec<Restaurant>> {
        let restaurants: Vec<Restaurant> = self
            .base
            .db()
            .query("SELECT * FROM restaurant WHERE is_active = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(restaurants)
    }

    /// Find restaurant by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Restaurant>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let restaurant: Option<Restaurant> = self.base.db().select(thing).await?;
        Ok(restaurant)
    }

    /// Find restaurant by name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Restaurant>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM restaurant WHERE name = $name LIMIT 1")
            .bind(("name", name.to_string()))
            .await?;
        let restaurants: Vec<Restaurant> = result.take(0)?;
        Ok(restaurants.into_iter().next())
    }

    /// Create a new restaurant
    pub async fn create(&self, data: RestaurantCreate) -> RepoResult<Restaurant> {
        if data.name.trim().is_empty() {
            return Err(RepoError::Validation("Restaurant name is required".into()));
        }
        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Restaurant '{}' already exists",
                data.name
            )));
        }

        let restaurant = Restaurant {
            id: None,
            name: data.name,
            cuisine: data.cuisine,
            address: data.address,
            description: data.description,
            phone: data.phone,
            email: data.email,
            timezone: data.timezone.unwrap_or_else(default_timezone),
            is_active: true,
        };

        let created: Option<Restaurant> =
            self.base.db().create(TABLE).content(restaurant).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create restaurant".to_string()))
    }

    /// Update a restaurant
    pub async fn update(&self, id: &str, data: RestaurantUpdate) -> RepoResult<Restaurant> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Restaurant {} not found", id)))?;

        if let Some(new_name) = data.name.as_ref()
            && new_name != &existing.name
            && let Some(found) = self.find_by_name(new_name).await?
            && found.id != existing.id
        {
            return Err(RepoError::Duplicate(format!(
                "Restaurant '{}' already exists",
                new_name
            )));
        }

        // 手动构建 UPDATE 语句，避免 id 字段被覆盖
        let name = data.name.unwrap_or(existing.name);
        let cuisine = data.cuisine.or(existing.cuisine);
        let address = data.address.or(existing.address);
        let description = data.description.or(existing.description);
        let phone = data.phone.or(existing.phone);
        let email = data.email.or(existing.email);
        let timezone = data.timezone.unwrap_or(existing.timezone);
        let is_active = data.is_active.unwrap_or(existing.is_active);

        self.base
            .db()
            .query(
                "UPDATE $thing SET name = $name, cuisine = $cuisine, address = $address, \
                 description = $description, phone = $phone, email = $email, \
                 timezone = $timezone, is_active = $is_active",
            )
            .bind(("thing", thing))
            .bind(("name", name))
            .bind(("cuisine", cuisine))
            .bind(("address", address))
            .bind(("description", description))
            .bind(("phone", phone))
            .bind(("email", email))
            .bind(("timezone", timezone))
            .bind(("is_active", is_active))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Restaurant {} not found", id)))
    }

    /// Soft delete a restaurant (keeps reservations history valid)
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
