use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};
use tracing::info;

use crate::db::entities::prelude::{Berita, Identitas, Prodi, Visit};

pub mod entities;
pub mod models;
pub mod services;

/// Opens the SeaORM connection pool.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url.to_owned());
    opt.max_connections(10).sqlx_logging(false);
    Database::connect(opt).await
}

/// Creates any missing table from the entity definitions.
pub async fn init_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let statements = [
        schema.create_table_from_entity(Identitas).if_not_exists().to_owned(),
        schema.create_table_from_entity(Prodi).if_not_exists().to_owned(),
        schema.create_table_from_entity(Visit).if_not_exists().to_owned(),
        schema.create_table_from_entity(Berita).if_not_exists().to_owned(),
    ];

    for statement in statements {
        db.execute(backend.build(&statement)).await?;
    }

    info!("Database schema is up to date.");
    Ok(())
}
