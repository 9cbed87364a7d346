use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ========== CLIENTS ==========
        manager
            .create_table(
                Table::create()
                    .table(Clients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Clients::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Clients::Name).string_len(128))
                    .col(ColumnDef::new(Clients::Email).string_len(128))
                    .col(ColumnDef::new(Clients::ManagerName).string_len(128))
                    .col(ColumnDef::new(Clients::ManagerPhone).string_len(32))
                    .col(ColumnDef::new(Clients::FixPhone).string_len(32))
                    .col(ColumnDef::new(Clients::Address).text())
                    .col(ColumnDef::new(Clients::Country).string_len(64))
                    .col(ColumnDef::new(Clients::Status).string_len(32))
                    .col(ColumnDef::new(Clients::MaxHistoryDays).integer())
                    .col(ColumnDef::new(Clients::ReportsEnabled).boolean())
                    .col(ColumnDef::new(Clients::GeofenceEnabled).boolean())
                    .col(ColumnDef::new(Clients::MaxZones).integer())
                    .col(ColumnDef::new(Clients::TechSupport).boolean())
                    .to_owned(),
            )
            .await?;

        // ========== MODULES ==========
        // client_id is checked by the application; no FK so that deleting a
        // client leaves its modules in place.
        manager
            .create_table(
                Table::create()
                    .table(Modules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Modules::Imei)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Modules::Model).string_len(64))
                    .col(ColumnDef::new(Modules::ClientId).string_len(64))
                    .col(ColumnDef::new(Modules::VehicleName).string_len(128))
                    .col(ColumnDef::new(Modules::SimNumber).string_len(32))
                    .col(ColumnDef::new(Modules::ValidatedOn).date())
                    .col(ColumnDef::new(Modules::ExpiresOn).date())
                    .col(ColumnDef::new(Modules::Status).string_len(32))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_modules_client_id")
                    .table(Modules::Table)
                    .col(Modules::ClientId)
                    .to_owned(),
            )
            .await?;

        // ========== DIAGNOSTICS ==========
        manager
            .create_table(
                Table::create()
                    .table(Diagnostics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Diagnostics::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Diagnostics::Imei).string_len(32).not_null())
                    .col(ColumnDef::new(Diagnostics::RecordTime).date_time().not_null())
                    .col(ColumnDef::new(Diagnostics::StatusIcon).string_len(8))
                    .col(ColumnDef::new(Diagnostics::Latitude).double())
                    .col(ColumnDef::new(Diagnostics::Longitude).double())
                    .col(ColumnDef::new(Diagnostics::SpeedKmh).double())
                    .col(ColumnDef::new(Diagnostics::BatteryVoltage).double())
                    .col(ColumnDef::new(Diagnostics::GsmSignal).integer())
                    .col(ColumnDef::new(Diagnostics::Satellites).integer())
                    .col(ColumnDef::new(Diagnostics::Ignition).boolean())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_diagnostics_imei_record_time")
                    .table(Diagnostics::Table)
                    .col(Diagnostics::Imei)
                    .col(Diagnostics::RecordTime)
                    .to_owned(),
            )
            .await?;

        // ========== SIGNALS ==========
        manager
            .create_table(
                Table::create()
                    .table(Signals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Signals::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Signals::Imei).string_len(32).not_null())
                    .col(ColumnDef::new(Signals::NoSignalSince).date_time().not_null())
                    .col(ColumnDef::new(Signals::LastLatitude).double())
                    .col(ColumnDef::new(Signals::LastLongitude).double())
                    .col(ColumnDef::new(Signals::Status).string_len(32))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_signals_imei_since")
                    .table(Signals::Table)
                    .col(Signals::Imei)
                    .col(Signals::NoSignalSince)
                    .to_owned(),
            )
            .await?;

        // ========== ANOMALIES ==========
        manager
            .create_table(
                Table::create()
                    .table(Anomalies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Anomalies::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Anomalies::Imei).string_len(32).not_null())
                    .col(ColumnDef::new(Anomalies::AnomalyType).string_len(64))
                    .col(ColumnDef::new(Anomalies::DataCount).integer())
                    .col(ColumnDef::new(Anomalies::VehicleId).string_len(64))
                    .col(ColumnDef::new(Anomalies::SimNumber).string_len(32))
                    .col(ColumnDef::new(Anomalies::MileageKm).double())
                    .col(ColumnDef::new(Anomalies::FuelLevel).double())
                    .col(ColumnDef::new(Anomalies::ConsumptionRate).double())
                    .col(
                        ColumnDef::new(Anomalies::AlertCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Anomalies::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_anomalies_imei")
                    .table(Anomalies::Table)
                    .col(Anomalies::Imei)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_anomalies_created_at")
                    .table(Anomalies::Table)
                    .col(Anomalies::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ========== RENEWALS ==========
        manager
            .create_table(
                Table::create()
                    .table(Renewals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Renewals::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Renewals::Imei).string_len(32).not_null())
                    .col(ColumnDef::new(Renewals::ClientId).string_len(64).not_null())
                    .col(ColumnDef::new(Renewals::ValidatedOn).date())
                    .col(ColumnDef::new(Renewals::ExpiresOn).date())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_renewals_imei")
                    .table(Renewals::Table)
                    .col(Renewals::Imei)
                    .to_owned(),
            )
            .await?;

        // ========== SMS HISTORY ==========
        manager
            .create_table(
                Table::create()
                    .table(SmsHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SmsHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SmsHistory::SentDate).date_time().not_null())
                    .col(ColumnDef::new(SmsHistory::Recipient).string_len(128).not_null())
                    .col(ColumnDef::new(SmsHistory::PhoneNumber).string_len(32).not_null())
                    .col(ColumnDef::new(SmsHistory::SmsType).string_len(32))
                    .col(ColumnDef::new(SmsHistory::Message).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sms_history_sent_date")
                    .table(SmsHistory::Table)
                    .col(SmsHistory::SentDate)
                    .to_owned(),
            )
            .await?;

        // ========== ADMIN USERS ==========
        manager
            .create_table(
                Table::create()
                    .table(AdminUsers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminUsers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AdminUsers::Username)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(AdminUsers::PasswordHash).string_len(256).not_null())
                    .col(
                        ColumnDef::new(AdminUsers::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminUsers::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SmsHistory::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Renewals::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Anomalies::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Signals::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Diagnostics::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Modules::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clients::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Clients {
    Table,
    Id,
    Name,
    Email,
    ManagerName,
    ManagerPhone,
    FixPhone,
    Address,
    Country,
    Status,
    MaxHistoryDays,
    ReportsEnabled,
    GeofenceEnabled,
    MaxZones,
    TechSupport,
}

#[derive(DeriveIden)]
pub enum Modules {
    Table,
    Imei,
    Model,
    ClientId,
    VehicleName,
    SimNumber,
    ValidatedOn,
    ExpiresOn,
    Status,
}

#[derive(DeriveIden)]
enum Diagnostics {
    Table,
    Id,
    Imei,
    RecordTime,
    StatusIcon,
    Latitude,
    Longitude,
    SpeedKmh,
    BatteryVoltage,
    GsmSignal,
    Satellites,
    Ignition,
}

#[derive(DeriveIden)]
enum Signals {
    Table,
    Id,
    Imei,
    NoSignalSince,
    LastLatitude,
    LastLongitude,
    Status,
}

#[derive(DeriveIden)]
enum Anomalies {
    Table,
    Id,
    Imei,
    AnomalyType,
    DataCount,
    VehicleId,
    SimNumber,
    MileageKm,
    FuelLevel,
    ConsumptionRate,
    AlertCount,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Renewals {
    Table,
    Id,
    Imei,
    ClientId,
    ValidatedOn,
    ExpiresOn,
}

#[derive(DeriveIden)]
enum SmsHistory {
    Table,
    Id,
    SentDate,
    Recipient,
    PhoneNumber,
    SmsType,
    Message,
}

#[derive(DeriveIden)]
enum AdminUsers {
    Table,
    Id,
    Username,
    PasswordHash,
    CreatedAt,
}
