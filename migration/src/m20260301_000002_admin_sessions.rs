use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdminSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminSessions::Token)
                            .string_len(128)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AdminSessions::Data).text().not_null())
                    .col(ColumnDef::new(AdminSessions::ExpiryDate).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_admin_sessions_expiry_date")
                    .table(AdminSessions::Table)
                    .col(AdminSessions::ExpiryDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminSessions::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AdminSessions {
    Table,
    Token,
    Data,
    ExpiryDate,
}
