use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QueryOrder};

use crate::db::entities::berita;

/// Retrieves all news items, newest first.
pub async fn get_all_news(db: &DatabaseConnection) -> Result<Vec<berita::Model>, DbErr> {
    berita::Entity::find()
        .order_by_desc(berita::Column::UploadedAt)
        .all(db)
        .await
}

/// Retrieves a single news item by id.
pub async fn get_news_by_id(
    db: &DatabaseConnection,
    id: &str,
) -> Result<Option<berita::Model>, DbErr> {
    berita::Entity::find_by_id(id.to_owned()).one(db).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{insert_news, memory_db};

    #[tokio::test]
    async fn test_news_listed_newest_first() {
        let db = memory_db().await;
        insert_news(&db, "a", 1).await;
        insert_news(&db, "b", 3).await;
        insert_news(&db, "c", 2).await;

        let ids: Vec<String> = get_all_news(&db).await.unwrap().into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[tokio::test]
    async fn test_news_by_id() {
        let db = memory_db().await;
        insert_news(&db, "a", 1).await;

        assert_eq!(get_news_by_id(&db, "a").await.unwrap().unwrap().title, "Berita a");
        assert!(get_news_by_id(&db, "missing").await.unwrap().is_none());
    }
}
