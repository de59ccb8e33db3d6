use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::User;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("New User must not include id or it must be set to zero")]
    IdAssigned,
    #[error("User with ID '{0}' not found")]
    NotFound(i64),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence behind the user endpoints. Handlers hold it as `Arc<dyn UserStore>`.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_users(&self) -> Result<Vec<User>, StoreError>;

    async fn get_user_by_id(&self, id: i64) -> Result<User, StoreError>;

    /// Stores a new user and assigns its id. The incoming id must be zero.
    async fn add_user(&self, user: User) -> Result<User, StoreError>;

    /// Replaces the user whose id matches `user.id`.
    async fn update_user(&self, user: User) -> Result<User, StoreError>;

    async fn remove_user_by_id(&self, id: i64) -> Result<(), StoreError>;
}

pub struct MemoryStore {
    inner: RwLock<Inner>,
}

struct Inner {
    users: Vec<User>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                users: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.inner.read().await.users.clone())
    }

    async fn get_user_by_id(&self, id: i64) -> Result<User, StoreError> {
        self.inner
            .read()
            .await
            .users
            .iter()
            .find(|user| user.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn add_user(&self, mut user: User) -> Result<User, StoreError> {
        if user.id != 0 {
            return Err(StoreError::IdAssigned);
        }

        let mut inner = self.inner.write().await;
        user.id = inner.next_id;
        inner.next_id += 1;
        inner.users.push(user.clone());

        Ok(user)
    }

    async fn update_user(&self, user: User) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        let slot = inner
            .users
            .iter_mut()
            .find(|existing| existing.id == user.id)
            .ok_or(StoreError::NotFound(user.id))?;
        *slot = user.clone();

        Ok(user)
    }

    async fn remove_user_by_id(&self, id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let index = inner
            .users
            .iter()
            .position(|user| user.id == id)
            .ok_or(StoreError::NotFound(id))?;
        inner.users.remove(index);

        Ok(())
    }
}
