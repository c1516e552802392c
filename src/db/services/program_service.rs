use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::db::entities::prodi;
use crate::db::models::NewProgram;

// --- Program Catalog Service Functions ---

/// Retrieves every selected study program.
pub async fn get_all_programs(db: &DatabaseConnection) -> Result<Vec<prodi::Model>, DbErr> {
    prodi::Entity::find()
        .order_by_asc(prodi::Column::Nama)
        .all(db)
        .await
}

/// Appends the given programs to the catalog.
///
/// Existing rows are left alone, so calling this twice without
/// [`clear_programs`] in between keeps both sets, duplicates included.
pub async fn insert_programs<C>(db: &C, programs: &[NewProgram]) -> Result<Vec<prodi::Model>, DbErr>
where
    C: ConnectionTrait,
{
    let mut inserted = Vec::with_capacity(programs.len());
    for program in programs {
        let active_program = prodi::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            nama: Set(program.nama.clone()),
            link: Set(program.link.clone()),
            visi: Set(program.visi.clone()),
            misi: Set(program.misi.clone()),
        };
        inserted.push(active_program.insert(db).await?);
    }
    Ok(inserted)
}

/// Deletes every program row. Returns the number of rows removed.
pub async fn clear_programs<C>(db: &C) -> Result<u64, DbErr>
where
    C: ConnectionTrait,
{
    let result = prodi::Entity::delete_many().exec(db).await?;
    Ok(result.rows_affected)
}

/// Clears the catalog and inserts `programs` inside a single transaction.
pub async fn replace_programs(
    db: &DatabaseConnection,
    programs: &[NewProgram],
) -> Result<Vec<prodi::Model>, DbErr> {
    let txn = db.begin().await?;
    clear_programs(&txn).await?;
    let inserted = insert_programs(&txn, programs).await?;
    txn.commit().await?;
    Ok(inserted)
}
