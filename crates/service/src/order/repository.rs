use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::domain::Order;
use crate::errors::ServiceError;

/// Persistence contract for orders. Update deliberately omits
/// `user_id`/`product_id`: an order cannot be reassigned after creation.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn get_all(&self) -> Result<Vec<Order>, ServiceError>;
    async fn get_by_id(&self, id: i32) -> Result<Order, ServiceError>;
    async fn create(
        &self,
        user_id: i32,
        product_id: i32,
        quantity: i32,
        total_price: f64,
        status: &str,
    ) -> Result<Order, ServiceError>;
    async fn update(
        &self,
        id: i32,
        quantity: i32,
        total_price: f64,
        status: &str,
    ) -> Result<Order, ServiceError>;
    async fn delete(&self, id: i32) -> Result<(), ServiceError>;
}

fn to_domain(m: models::order::Model) -> Order {
    Order {
        id: m.id.to_string(),
        user_id: m.user_id,
        product_id: m.product_id,
        quantity: m.quantity,
        total_price: m.total_price,
        status: m.status,
    }
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmOrderRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl OrderRepository for SeaOrmOrderRepository {
    async fn get_all(&self) -> Result<Vec<Order>, ServiceError> {
        let rows = models::order::Entity::find()
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(rows.into_iter().map(to_domain).collect())
    }

    async fn get_by_id(&self, id: i32) -> Result<Order, ServiceError> {
        models::order::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .map(to_domain)
            .ok_or_else(|| ServiceError::Db(format!("order {id} not found")))
    }

    async fn create(
        &self,
        user_id: i32,
        product_id: i32,
        quantity: i32,
        total_price: f64,
        status: &str,
    ) -> Result<Order, ServiceError> {
        let am = models::order::ActiveModel {
            user_id: Set(user_id),
            product_id: Set(product_id),
            quantity: Set(quantity),
            total_price: Set(total_price),
            status: Set(status.to_string()),
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
        quantity: i32,
        total_price: f64,
        status: &str,
    ) -> Result<Order, ServiceError> {
        // user_id/product_id stay NotSet; the stored values survive.
        let am = models::order::ActiveModel {
            id: Set(id),
            quantity: Set(quantity),
            total_price: Set(total_price),
            status: Set(status.to_string()),
            ..Default::default()
        };
        let m = am
            .update(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(to_domain(m))
    }

    async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let res = models::order::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        if res.rows_affected == 0 {
            return Err(ServiceError::Db(format!("order {id} not found")));
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
    pub struct InMemoryOrderRepository {
        rows: Mutex<BTreeMap<i32, Order>>,
        next_id: AtomicI32,
        calls: AtomicUsize,
    }

    impl InMemoryOrderRepository {
        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl OrderRepository for InMemoryOrderRepository {
        async fn get_all(&self) -> Result<Vec<Order>, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.rows.lock().unwrap().values().cloned().collect())
        }

        async fn get_by_id(&self, id: i32) -> Result<Order, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.rows
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or_else(|| ServiceError::Db(format!("order {id} not found")))
        }

        async fn create(
            &self,
            user_id: i32,
            product_id: i32,
            quantity: i32,
            total_price: f64,
            status: &str,
        ) -> Result<Order, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let order = Order {
                id: id.to_string(),
                user_id,
                product_id,
                quantity,
                total_price,
                status: status.to_string(),
            };
            self.rows.lock().unwrap().insert(id, order.clone());
            Ok(order)
        }

        async fn update(
            &self,
            id: i32,
            quantity: i32,
            total_price: f64,
            status: &str,
        ) -> Result<Order, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut rows = self.rows.lock().unwrap();
            match rows.get_mut(&id) {
                Some(order) => {
                    order.quantity = quantity;
                    order.total_price = total_price;
                    order.status = status.to_string();
                    Ok(order.clone())
                }
                None => Err(ServiceError::Db(format!("order {id} not found"))),
            }
        }

        async fn delete(&self, id: i32) -> Result<(), ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.rows
                .lock()
                .unwrap()
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| ServiceError::Db(format!("order {id} not found")))
        }
    }
}
