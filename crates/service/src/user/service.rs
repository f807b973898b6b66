use std::sync::Arc;

use tracing::instrument;

use crate::domain::User;
use crate::errors::ServiceError;
use crate::user::repository::UserRepository;

/// User service: coerces the wire-side string id into the store-side
/// integer id, everything else is pass-through to the repository.
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_users(&self) -> Result<Vec<User>, ServiceError> {
        self.repo.get_all().await
    }

    pub async fn get_user(&self, id: &str) -> Result<User, ServiceError> {
        let id = id.parse::<i32>().map_err(|e| ServiceError::Parse(e.to_string()))?;
        self.repo.get_by_id(id).await
    }

    #[instrument(skip(self))]
    pub async fn create_user(&self, name: &str, email: &str) -> Result<User, ServiceError> {
        self.repo.create(name, email).await
    }

    pub async fn update_user(&self, id: &str, name: &str, email: &str) -> Result<User, ServiceError> {
        let id = id.parse::<i32>().map_err(|e| ServiceError::Parse(e.to_string()))?;
        self.repo.update(id, name, email).await
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), ServiceError> {
        let id = id.parse::<i32>().map_err(|e| ServiceError::Parse(e.to_string()))?;
        self.repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::user::repository::memory::InMemoryUserRepository;

    fn svc() -> (Arc<InMemoryUserRepository>, UserService) {
        let repo = Arc::new(InMemoryUserRepository::default());
        let service = UserService::new(repo.clone());
        (repo, service)
    }

    #[tokio::test]
    async fn non_numeric_id_fails_before_store() {
        let (repo, service) = svc();

        assert!(matches!(
            service.get_user("abc").await.unwrap_err(),
            ServiceError::Parse(_)
        ));
        assert!(matches!(
            service.update_user("1.5", "a", "a@b.c").await.unwrap_err(),
            ServiceError::Parse(_)
        ));
        assert!(matches!(
            service.delete_user("").await.unwrap_err(),
            ServiceError::Parse(_)
        ));

        // The store spy must have seen nothing.
        assert_eq!(repo.call_count(), 0);
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let (_, service) = svc();

        let created = service.create_user("John Doe", "john@example.com").await.unwrap();
        assert_eq!(created.id, "1");
        assert_eq!(created.name, "John Doe");
        assert_eq!(created.email, "john@example.com");

        let got = service.get_user(&created.id).await.unwrap();
        assert_eq!(got, created);
    }

    #[tokio::test]
    async fn store_errors_propagate_verbatim() {
        let (_, service) = svc();
        let err = service.get_user("999").await.unwrap_err();
        assert!(matches!(err, ServiceError::Db(_)));
        assert_eq!(err.to_string(), "database error: user 999 not found");
    }

    #[tokio::test]
    async fn update_overwrites_every_field() {
        let (_, service) = svc();
        let created = service.create_user("John Doe", "john@example.com").await.unwrap();

        let updated = service
            .update_user(&created.id, "Jane Doe", "jane@example.com")
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Jane Doe");
        assert_eq!(updated.email, "jane@example.com");
    }

    #[tokio::test]
    async fn delete_twice_fails_the_second_time() {
        let (_, service) = svc();
        let created = service.create_user("John Doe", "john@example.com").await.unwrap();

        service.delete_user(&created.id).await.unwrap();
        assert!(matches!(
            service.delete_user(&created.id).await.unwrap_err(),
            ServiceError::Db(_)
        ));
    }
}
