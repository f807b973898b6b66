use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::domain::Product;
use crate::errors::ServiceError;

/// Persistence contract for products.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn get_all(&self) -> Result<Vec<Product>, ServiceError>;
    async fn get_by_id(&self, id: i32) -> Result<Product, ServiceError>;
    async fn create(
        &self,
        name: &str,
        description: &str,
        price: f64,
        stock: i32,
    ) -> Result<Product, ServiceError>;
    async fn update(
        &self,
        id: i32,
        name: &str,
        description: &str,
        price: f64,
        stock: i32,
    ) -> Result<Product, ServiceError>;
    async fn delete(&self, id: i32) -> Result<(), ServiceError>;
}

fn to_domain(m: models::product::Model) -> Product {
    Product {
        id: m.id.to_string(),
        name: m.name,
        description: m.description,
        price: m.price,
        stock: m.stock,
    }
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmProductRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn get_all(&self) -> Result<Vec<Product>, ServiceError> {
        let rows = models::product::Entity::find()
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(rows.into_iter().map(to_domain).collect())
    }

    async fn get_by_id(&self, id: i32) -> Result<Product, ServiceError> {
        models::product::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .map(to_domain)
            .ok_or_else(|| ServiceError::Db(format!("product {id} not found")))
    }

    async fn create(
        &self,
        name: &str,
        description: &str,
        price: f64,
        stock: i32,
    ) -> Result<Product, ServiceError> {
        let am = models::product::ActiveModel {
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            price: Set(price),
            stock: Set(stock),
            ..Default::default()
        };
        let m = am
            .insert(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(to_domain(m))
    }

    async fn update(
        &self,
        id: i32,
        name: &str,
        description: &str,
        price: f64,
        stock: i32,
    ) -> Result<Product, ServiceError> {
        let am = models::product::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            price: Set(price),
            stock: Set(stock),
        };
        let m = am
            .update(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(to_domain(m))
    }

    async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let res = models::product::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        if res.rows_affected == 0 {
            return Err(ServiceError::Db(format!("product {id} not found")));
        }
        Ok(())
    }
}

/// In-memory fake with call accounting.
pub mod memory {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct InMemoryProductRepository {
        rows: Mutex<BTreeMap<i32, Product>>,
        next_id: AtomicI32,
        calls: AtomicUsize,
    }

    impl InMemoryProductRepository {
        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProductRepository for InMemoryProductRepository {
        async fn get_all(&self) -> Result<Vec<Product>, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.rows.lock().unwrap().values().cloned().collect())
        }

        async fn get_by_id(&self, id: i32) -> Result<Product, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.rows
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or_else(|| ServiceError::Db(format!("product {id} not found")))
        }

        async fn create(
            &self,
            name: &str,
            description: &str,
            price: f64,
            stock: i32,
        ) -> Result<Product, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let product = Product {
                id: id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                price,
                stock,
            };
            self.rows.lock().unwrap().insert(id, product.clone());
            Ok(product)
        }

        async fn update(
            &self,
            id: i32,
            name: &str,
            description: &str,
            price: f64,
            stock: i32,
        ) -> Result<Product, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut rows = self.rows.lock().unwrap();
            match rows.get_mut(&id) {
                Some(product) => {
                    product.name = name.to_string();
                    product.description = description.to_string();
                    product.price = price;
                    product.stock = stock;
                    Ok(product.clone())
                }
                None => Err(ServiceError::Db(format!("product {id} not found"))),
            }
        }

        async fn delete(&self, id: i32) -> Result<(), ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.rows
                .lock()
                .unwrap()
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| ServiceError::Db(format!("product {id} not found")))
        }
    }
}
