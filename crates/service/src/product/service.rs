use std::sync::Arc;

use tracing::instrument;

use crate::domain::Product;
use crate::errors::ServiceError;
use crate::product::repository::ProductRepository;

pub struct ProductService {
    repo: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_products(&self) -> Result<Vec<Product>, ServiceError> {
        self.repo.get_all().await
    }

    pub async fn get_product(&self, id: &str) -> Result<Product, ServiceError> {
        let id = id.parse::<i32>().map_err(|e| ServiceError::Parse(e.to_string()))?;
        self.repo.get_by_id(id).await
    }

    #[instrument(skip(self))]
    pub async fn create_product(
        &self,
        name: &str,
        description: &str,
        price: f64,
        stock: i32,
    ) -> Result<Product, ServiceError> {
        self.repo.create(name, description, price, stock).await
    }

    pub async fn update_product(
        &self,
        id: &str,
        name: &str,
        description: &str,
        price: f64,
        stock: i32,
    ) -> Result<Product, ServiceError> {
        let id = id.parse::<i32>().map_err(|e| ServiceError::Parse(e.to_string()))?;
        self.repo.update(id, name, description, price, stock).await
    }

    pub async fn delete_product(&self, id: &str) -> Result<(), ServiceError> {
        let id = id.parse::<i32>().map_err(|e| ServiceError::Parse(e.to_string()))?;
        self.repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::product::repository::memory::InMemoryProductRepository;

    fn svc() -> (Arc<InMemoryProductRepository>, ProductService) {
        let repo = Arc::new(InMemoryProductRepository::default());
        let service = ProductService::new(repo.clone());
        (repo, service)
    }

    #[tokio::test]
    async fn created_fields_echo_the_request_except_id() {
        let (_, service) = svc();
        let created = service
            .create_product("Laptop", "Gaming laptop", 25000.50, 10)
            .await
            .unwrap();
        assert_eq!(created.id, "1");
        assert_eq!(created.name, "Laptop");
        assert_eq!(created.description, "Gaming laptop");
        assert_eq!(created.price, 25000.50);
        assert_eq!(created.stock, 10);

        let got = service.get_product(&created.id).await.unwrap();
        assert_eq!(got, created);
    }

    #[tokio::test]
    async fn non_numeric_id_never_reaches_the_store() {
        let (repo, service) = svc();
        assert!(matches!(
            service.get_product("laptop").await.unwrap_err(),
            ServiceError::Parse(_)
        ));
        assert!(matches!(
            service.delete_product("1e3").await.unwrap_err(),
            ServiceError::Parse(_)
        ));
        assert_eq!(repo.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_product_surfaces_opaque_store_error() {
        let (_, service) = svc();
        assert!(matches!(
            service.get_product("999").await.unwrap_err(),
            ServiceError::Db(_)
        ));
    }
}
