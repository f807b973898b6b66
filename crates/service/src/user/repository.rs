use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::domain::User;
use crate::errors::ServiceError;

/// Persistence contract for users: exactly the operations the service
/// needs, injected at construction so tests can substitute a fake.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_all(&self) -> Result<Vec<User>, ServiceError>;
    async fn get_by_id(&self, id: i32) -> Result<User, ServiceError>;
    async fn create(&self, name: &str, email: &str) -> Result<User, ServiceError>;
    async fn update(&self, id: i32, name: &str, email: &str) -> Result<User, ServiceError>;
    async fn delete(&self, id: i32) -> Result<(), ServiceError>;
}

fn to_domain(m: models::user::Model) -> User {
    User {
        id: m.id.to_string(),
        name: m.name,
        email: m.email,
    }
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn get_all(&self) -> Result<Vec<User>, ServiceError> {
        let rows = models::user::Entity::find()
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(rows.into_iter().map(to_domain).collect())
    }

    async fn get_by_id(&self, id: i32) -> Result<User, ServiceError> {
        models::user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .map(to_domain)
            .ok_or_else(|| ServiceError::Db(format!("user {id} not found")))
    }

    async fn create(&self, name: &str, email: &str) -> Result<User, ServiceError> {
        let am = models::user::ActiveModel {
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            ..Default::default()
        };
        let m = am
            .insert(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(to_domain(m))
    }

    async fn update(&self, id: i32, name: &str, email: &str) -> Result<User, ServiceError> {
        // Full overwrite of the named fields.
        let am = models::user::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            email: Set(email.to_string()),
        };
        let m = am
            .update(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(to_domain(m))
    }

    async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let res = models::user::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        if res.rows_affected == 0 {
            return Err(ServiceError::Db(format!("user {id} not found")));
        }
        Ok(())
    }
}

/// In-memory fake with call accounting, usable as a store spy in unit
/// tests and as the backing store for HTTP-level tests.
pub mod memory {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct InMemoryUserRepository {
        rows: Mutex<BTreeMap<i32, User>>,
        next_id: AtomicI32,
        calls: AtomicUsize,
    }

    impl InMemoryUserRepository {
        /// Number of repository operations invoked so far.
        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UserRepository for InMemoryUserRepository {
        async fn get_all(&self) -> Result<Vec<User>, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.rows.lock().unwrap().values().cloned().collect())
        }

        async fn get_by_id(&self, id: i32) -> Result<User, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.rows
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or_else(|| ServiceError::Db(format!("user {id} not found")))
        }

        async fn create(&self, name: &str, email: &str) -> Result<User, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let user = User {
                id: id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
            };
            self.rows.lock().unwrap().insert(id, user.clone());
            Ok(user)
        }

        async fn update(&self, id: i32, name: &str, email: &str) -> Result<User, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut rows = self.rows.lock().unwrap();
            match rows.get_mut(&id) {
                Some(user) => {
                    user.name = name.to_string();
                    user.email = email.to_string();
                    Ok(user.clone())
                }
                None => Err(ServiceError::Db(format!("user {id} not found"))),
            }
        }

        async fn delete(&self, id: i32) -> Result<(), ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.rows
                .lock()
                .unwrap()
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| ServiceError::Db(format!("user {id} not found")))
        }
    }
}
