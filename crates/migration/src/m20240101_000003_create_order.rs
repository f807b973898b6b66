//! Create `order` table with FKs to `user` and `product`.
//!
//! References are stored as raw identifiers; rows are never hydrated
//! into nested aggregates by the API.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Order::Table)
                    .if_not_exists()
                    .col(pk_auto(Order::Id))
                    .col(integer(Order::UserId).not_null())
                    .col(integer(Order::ProductId).not_null())
                    .col(integer(Order::Quantity).not_null())
                    .col(double(Order::TotalPrice).not_null())
                    .col(string_len(Order::Status, 32).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_user")
                            .from(Order::Table, Order::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_product")
                            .from(Order::Table, Order::ProductId)
                            .to(Product::Table, Product::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Order::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Order { Table, Id, UserId, ProductId, Quantity, TotalPrice, Status }

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum Product { Table, Id }
