use bytes::Bytes;
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

pub use crate::db::entities::berita::Model as NewsItem;
pub use crate::db::entities::identitas::Model as IdentityField;
pub use crate::db::entities::prodi::Model as ProgramEntry;

/// One `{name, value}` pair of a profile bulk update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityFieldUpdate {
    pub name: String,
    pub value: String,
}

/// A program row as submitted by the dashboard. Any `id` in the payload is
/// ignored; the store assigns its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProgram {
    pub nama: String,
    pub link: String,
    #[serde(default)]
    pub visi: String,
    #[serde(default)]
    pub misi: String,
}

/// Number of visits recorded on one calendar day (`YYYY-MM-DD`).
#[derive(FromQueryResult, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyVisitCount {
    pub date: String,
    pub count: i64,
}

/// A single file pulled out of a multipart body, or about to be sent as one.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}
