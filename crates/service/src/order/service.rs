use std::sync::Arc;

use tracing::instrument;

use crate::domain::Order;
use crate::errors::ServiceError;
use crate::order::repository::OrderRepository;

/// Order service. Besides id coercion this layer owns the one default
/// rule in the pipeline: an empty status becomes `"pending"`.
pub struct OrderService {
    repo: Arc<dyn OrderRepository>,
}

impl OrderService {
    pub fn new(repo: Arc<dyn OrderRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_orders(&self) -> Result<Vec<Order>, ServiceError> {
        self.repo.get_all().await
    }

    pub async fn get_order(&self, id: &str) -> Result<Order, ServiceError> {
        let id = id.parse::<i32>().map_err(|e| ServiceError::Parse(e.to_string()))?;
        self.repo.get_by_id(id).await
    }

    #[instrument(skip(self))]
    pub async fn create_order(
        &self,
        user_id: i32,
        product_id: i32,
        quantity: i32,
        total_price: f64,
        status: &str,
    ) -> Result<Order, ServiceError> {
        let status = if status.is_empty() { "pending" } else { status };
        self.repo
            .create(user_id, product_id, quantity, total_price, status)
            .await
    }

    /// `user_id` and `product_id` are part of the wire contract for
    /// symmetry with create, but orders are not reassignable: only
    /// quantity, total price and status reach the store.
    pub async fn update_order(
        &self,
        id: &str,
        _user_id: i32,
        _product_id: i32,
        quantity: i32,
        total_price: f64,
        status: &str,
    ) -> Result<Order, ServiceError> {
        let id = id.parse::<i32>().map_err(|e| ServiceError::Parse(e.to_string()))?;
        self.repo.update(id, quantity, total_price, status).await
    }

    pub async fn delete_order(&self, id: &str) -> Result<(), ServiceError> {
        let id = id.parse::<i32>().map_err(|e| ServiceError::Parse(e.to_string()))?;
        self.repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::order::repository::memory::InMemoryOrderRepository;

    fn svc() -> (Arc<InMemoryOrderRepository>, OrderService) {
        let repo = Arc::new(InMemoryOrderRepository::default());
        let service = OrderService::new(repo.clone());
        (repo, service)
    }

    #[tokio::test]
    async fn empty_status_defaults_to_pending() {
        let (_, service) = svc();
        let defaulted = service.create_order(1, 100, 5, 499.99, "").await.unwrap();
        assert_eq!(defaulted.status, "pending");

        // Observationally equivalent to passing "pending" explicitly.
        let explicit = service.create_order(1, 100, 5, 499.99, "pending").await.unwrap();
        assert_eq!(explicit.status, defaulted.status);
    }

    #[tokio::test]
    async fn explicit_status_is_kept() {
        let (_, service) = svc();
        let order = service.create_order(1, 100, 5, 499.99, "shipped").await.unwrap();
        assert_eq!(order.status, "shipped");
    }

    #[tokio::test]
    async fn update_does_not_reassign_user_or_product() {
        let (_, service) = svc();
        let created = service.create_order(1, 1, 2, 50000.00, "").await.unwrap();

        let updated = service
            .update_order(&created.id, 9, 9, 3, 75000.00, "completed")
            .await
            .unwrap();
        assert_eq!(updated.quantity, 3);
        assert_eq!(updated.total_price, 75000.00);
        assert_eq!(updated.status, "completed");
        // The stored references win over the request's.
        assert_eq!(updated.user_id, 1);
        assert_eq!(updated.product_id, 1);
    }

    #[tokio::test]
    async fn non_numeric_id_never_reaches_the_store() {
        let (repo, service) = svc();
        assert!(matches!(
            service.get_order("xyz").await.unwrap_err(),
            ServiceError::Parse(_)
        ));
        assert!(matches!(
            service.update_order("xyz", 1, 1, 1, 1.0, "pending").await.unwrap_err(),
            ServiceError::Parse(_)
        ));
        assert!(matches!(
            service.delete_order("xyz").await.unwrap_err(),
            ServiceError::Parse(_)
        ));
        assert_eq!(repo.call_count(), 0);
    }

    #[tokio::test]
    async fn delete_is_not_idempotent_at_the_store() {
        let (_, service) = svc();
        let created = service.create_order(1, 1, 1, 10.0, "").await.unwrap();
        service.delete_order(&created.id).await.unwrap();
        assert!(matches!(
            service.delete_order(&created.id).await.unwrap_err(),
            ServiceError::Db(_)
        ));
    }
}
