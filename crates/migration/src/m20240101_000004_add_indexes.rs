//! Secondary indexes for order lookups by owner and product.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_order_user")
                    .table(Order::Table)
                    .col(Order::UserId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_order_product")
                    .table(Order::Table)
                    .col(Order::ProductId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_order_user").table(Order::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_order_product").table(Order::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Order { Table, UserId, ProductId }
