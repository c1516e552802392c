use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::db::entities::identitas;
use crate::db::models::IdentityFieldUpdate;

/// Reserved key whose value is the public path of the organizational-structure image.
pub const STRUCTURE_IMAGE_KEY: &str = "Struktur Organisasi";

/// Profile keys that must exist before any bulk update can target them.
pub const DEFAULT_IDENTITY_FIELDS: [&str; 10] = [
    "Nama Fakultas",
    "Banyak Program Studi",
    "Banyak Dosen",
    "Banyak Staf",
    "No Handphone",
    "Email",
    "Instagram",
    "Facebook",
    "Youtube",
    STRUCTURE_IMAGE_KEY,
];

// --- Identity Service Functions ---

/// Retrieves every identity field, ordered by name.
pub async fn get_all_identity_fields(
    db: &DatabaseConnection,
) -> Result<Vec<identitas::Model>, DbErr> {
    identitas::Entity::find()
        .order_by_asc(identitas::Column::Name)
        .all(db)
        .await
}

/// Retrieves a single identity field by its name.
pub async fn get_identity_field(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<identitas::Model>, DbErr> {
    identitas::Entity::find()
        .filter(identitas::Column::Name.eq(name))
        .one(db)
        .await
}

/// Inserts every default key that is not present yet, with an empty value.
/// Returns how many rows were created.
pub async fn seed_identity_fields(db: &DatabaseConnection) -> Result<usize, DbErr> {
    let mut created = 0;
    for name in DEFAULT_IDENTITY_FIELDS {
        if get_identity_field(db, name).await?.is_some() {
            continue;
        }
        identitas::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(name.to_owned()),
            value: Set(String::new()),
        }
        .insert(db)
        .await?;
        created += 1;
    }
    if created > 0 {
        info!(created, "Seeded missing identity fields.");
    }
    Ok(created)
}

/// Applies a batch of `{name, value}` updates in one transaction.
///
/// Keys are never created here. If any name has no matching row the whole
/// batch is rolled back and `DbErr::RecordNotFound` is returned.
pub async fn update_identity_fields(
    db: &DatabaseConnection,
    updates: &[IdentityFieldUpdate],
) -> Result<Vec<identitas::Model>, DbErr> {
    let txn = db.begin().await?;
    let mut updated = Vec::with_capacity(updates.len());

    for update in updates {
        let field = identitas::Entity::find()
            .filter(identitas::Column::Name.eq(update.name.as_str()))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                DbErr::RecordNotFound(format!("Identity field '{}' does not exist", update.name))
            })?;

        let mut active_field = field.into_active_model();
        active_field.value = Set(update.value.clone());
        updated.push(active_field.update(&txn).await?);
    }

    txn.commit().await?;
    Ok(updated)
}
