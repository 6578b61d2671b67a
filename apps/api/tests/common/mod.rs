//! In-memory storage and router setup shared by the HTTP tests

#![allow(dead_code)]

use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::util::ServiceExt;

use classifieds_api::api::{self, AppState};
use classifieds_api::domain::ad::{Ad, NewAd};
use classifieds_api::domain::category::{Category, NewCategory};
use classifieds_api::domain::pagination::Paginator;
use classifieds_api::domain::repositories::{
    AdRepository, CategoryRepository, RepositoryError, RepositoryResult, UserRepository,
};
use classifieds_api::domain::user::{Location, NewUser, User, UserSummary, UserWithLocations};
use classifieds_api::infrastructure::media::MediaStorage;

#[derive(Default)]
struct Tables {
    next_id: i64,
    categories: Vec<Category>,
    users: Vec<User>,
    locations: Vec<Location>,
    user_locations: Vec<(i64, i64)>,
    ads: Vec<StoredAd>,
}

#[derive(Clone)]
struct StoredAd {
    id: i64,
    ad: NewAd,
    image: Option<String>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn project(&self, stored: &StoredAd) -> RepositoryResult<Ad> {
        let author = self
            .users
            .iter()
            .find(|u| u.id == stored.ad.author_id())
            .ok_or_else(|| RepositoryError::MissingReference("author".to_string()))?;
        let category = self
            .categories
            .iter()
            .find(|c| c.id == stored.ad.category_id())
            .ok_or_else(|| RepositoryError::MissingReference("category".to_string()))?;

        Ok(Ad {
            id: stored.id,
            name: stored.ad.name().to_string(),
            author_id: author.id,
            author_username: author.username.clone(),
            price: stored.ad.price(),
            description: stored.ad.description().to_string(),
            is_published: stored.ad.is_published(),
            image: stored.image.clone(),
            category_id: category.id,
            category_name: category.name.clone(),
        })
    }

    fn check_references(&self, ad: &NewAd) -> RepositoryResult<()> {
        if !self.users.iter().any(|u| u.id == ad.author_id()) {
            return Err(RepositoryError::MissingReference("author".to_string()));
        }
        if !self.categories.iter().any(|c| c.id == ad.category_id()) {
            return Err(RepositoryError::MissingReference("category".to_string()));
        }
        Ok(())
    }

    fn get_or_create_location(&mut self, name: &str) -> Location {
        if let Some(location) = self.locations.iter().find(|l| l.name == name) {
            return location.clone();
        }
        let location = Location {
            id: self.next_id(),
            name: name.to_string(),
        };
        self.locations.push(location.clone());
        location
    }

    fn replace_locations(&mut self, user_id: i64, names: &[String]) -> Vec<String> {
        self.user_locations.retain(|(uid, _)| *uid != user_id);
        let mut resolved = Vec::new();
        for name in names {
            let location = self.get_or_create_location(name);
            if !self.user_locations.contains(&(user_id, location.id)) {
                self.user_locations.push((user_id, location.id));
            }
            resolved.push(location.name);
        }
        resolved
    }
}

fn user_from(id: i64, user: &NewUser) -> User {
    User {
        id,
        username: user.username().to_string(),
        first_name: user.first_name().to_string(),
        last_name: user.last_name().to_string(),
        password: user.password().to_string(),
        role: user.role(),
        age: user.age(),
    }
}

/// Storage adapter keeping all tables behind one mutex
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    fail_image_updates: AtomicBool,
}

impl InMemoryStore {
    /// Makes every following `set_image` fail like a lost connection
    pub fn fail_image_updates(&self) {
        self.fail_image_updates.store(true, Ordering::SeqCst);
    }

    pub fn location_count(&self, name: &str) -> usize {
        let tables = self.tables.lock().unwrap();
        tables.locations.iter().filter(|l| l.name == name).count()
    }

    pub fn associations_of(&self, user_id: i64) -> usize {
        let tables = self.tables.lock().unwrap();
        tables
            .user_locations
            .iter()
            .filter(|(uid, _)| *uid == user_id)
            .count()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn list(&self) -> RepositoryResult<Vec<Category>> {
        let tables = self.tables.lock().unwrap();
        let mut categories = tables.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(categories)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Category>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn create(&self, category: NewCategory) -> RepositoryResult<Category> {
        let mut tables = self.tables.lock().unwrap();
        let created = Category {
            id: tables.next_id(),
            name: category.name().to_string(),
        };
        tables.categories.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, category: NewCategory) -> RepositoryResult<Category> {
        let mut tables = self.tables.lock().unwrap();
        let existing = tables
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| RepositoryError::not_found("Category", id))?;
        existing.name = category.name().to_string();
        Ok(existing.clone())
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.categories.len();
        tables.categories.retain(|c| c.id != id);
        if tables.categories.len() == before {
            return Err(RepositoryError::not_found("Category", id));
        }
        tables.ads.retain(|a| a.ad.category_id() != id);
        Ok(())
    }
}

#[async_trait]
impl AdRepository for InMemoryStore {
    async fn count(&self) -> RepositoryResult<i64> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.ads.len() as i64)
    }

    async fn list_page(&self, offset: i64, limit: i64) -> RepositoryResult<Vec<Ad>> {
        let tables = self.tables.lock().unwrap();
        let mut ads = tables.ads.clone();
        ads.sort_by(|a, b| b.ad.price().cmp(&a.ad.price()).then(a.id.cmp(&b.id)));
        ads.iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|stored| tables.project(stored))
            .collect()
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Ad>> {
        let tables = self.tables.lock().unwrap();
        tables
            .ads
            .iter()
            .find(|a| a.id == id)
            .map(|stored| tables.project(stored))
            .transpose()
    }

    async fn create(&self, ad: NewAd) -> RepositoryResult<Ad> {
        let mut tables = self.tables.lock().unwrap();
        tables.check_references(&ad)?;
        let stored = StoredAd {
            id: tables.next_id(),
            ad,
            image: None,
        };
        tables.ads.push(stored.clone());
        tables.project(&stored)
    }

    async fn update(&self, id: i64, ad: NewAd) -> RepositoryResult<Ad> {
        let mut tables = self.tables.lock().unwrap();
        tables.check_references(&ad)?;
        let stored = tables
            .ads
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| RepositoryError::not_found("Ad", id))?;
        stored.ad = ad;
        let stored = stored.clone();
        tables.project(&stored)
    }

    async fn set_image(&self, id: i64, image: &str) -> RepositoryResult<Ad> {
        if self.fail_image_updates.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut tables = self.tables.lock().unwrap();
        let stored = tables
            .ads
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| RepositoryError::not_found("Ad", id))?;
        stored.image = Some(image.to_string());
        let stored = stored.clone();
        tables.project(&stored)
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.ads.len();
        tables.ads.retain(|a| a.id != id);
        if tables.ads.len() == before {
            return Err(RepositoryError::not_found("Ad", id));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn list(&self) -> RepositoryResult<Vec<UserSummary>> {
        let tables = self.tables.lock().unwrap();
        let mut users: Vec<UserSummary> = tables
            .users
            .iter()
            .map(|user| UserSummary {
                user: user.clone(),
                total_ads: tables
                    .ads
                    .iter()
                    .filter(|a| a.ad.author_id() == user.id)
                    .count() as i64,
            })
            .collect();
        users.sort_by(|a, b| {
            a.user
                .username
                .cmp(&b.user.username)
                .then(a.user.id.cmp(&b.user.id))
        });
        Ok(users)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, user: NewUser) -> RepositoryResult<UserWithLocations> {
        let mut tables = self.tables.lock().unwrap();
        let created = user_from(tables.next_id(), &user);
        tables.users.push(created.clone());
        let locations = tables.replace_locations(created.id, user.locations());
        Ok(UserWithLocations {
            user: created,
            locations,
        })
    }

    async fn update(&self, id: i64, user: NewUser) -> RepositoryResult<UserWithLocations> {
        let mut tables = self.tables.lock().unwrap();
        let existing = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| RepositoryError::not_found("User", id))?;
        *existing = user_from(id, &user);
        let updated = existing.clone();
        let locations = tables.replace_locations(id, user.locations());
        Ok(UserWithLocations {
            user: updated,
            locations,
        })
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Err(RepositoryError::not_found("User", id));
        }
        tables.user_locations.retain(|(uid, _)| *uid != id);
        tables.ads.retain(|a| a.ad.author_id() != id);
        Ok(())
    }
}

/// Router wired to a fresh in-memory store
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub media_root: PathBuf,
}

impl TestApp {
    pub fn new(page_size: u32) -> Self {
        let store = Arc::new(InMemoryStore::default());
        let media_root =
            std::env::temp_dir().join(format!("classifieds-media-{}", uuid::Uuid::new_v4()));

        let state = AppState {
            ads: store.clone(),
            categories: store.clone(),
            users: store.clone(),
            media: MediaStorage::new(&media_root, "/media/"),
            paginator: Paginator::new(NonZeroU32::new(page_size).unwrap()),
        };

        Self {
            router: api::router(state, 1024 * 1024),
            store,
            media_root,
        }
    }

    /// Sends a request and returns the status with the JSON body
    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    /// Sends a raw request and returns the status with the JSON body
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request("PATCH", uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request("DELETE", uri, None).await
    }
}

impl TestApp {
    /// Number of files stored under the ad image directory
    pub fn stored_images(&self) -> usize {
        std::fs::read_dir(self.media_root.join("ad_images"))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.media_root);
    }
}
