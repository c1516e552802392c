use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "prodi")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    // No uniqueness on `nama`: appends may produce duplicates.
    pub nama: String,
    pub link: String,
    #[sea_orm(column_type = "Text")]
    pub visi: String,
    #[sea_orm(column_type = "Text")]
    pub misi: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
