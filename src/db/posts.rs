use rusqlite::{params, OptionalExtension, Row};

use crate::db::models::Post;
use crate::db::{StoreError, StoreResult};
use crate::state::DbPool;

fn row_to_post(row: &Row) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get(0)?,
        created: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        image_url: row.get(4)?,
    })
}

/// All posts, newest id first.
pub fn list_all(pool: &DbPool) -> StoreResult<Vec<Post>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, created, title, content, image_url FROM posts ORDER BY id DESC",
    )?;
    let posts = stmt
        .query_map([], row_to_post)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(posts)
}

pub fn get(pool: &DbPool, id: i64) -> StoreResult<Post> {
    let conn = pool.get()?;
    conn.query_row(
        "SELECT id, created, title, content, image_url FROM posts WHERE id = ?1",
        params![id],
        row_to_post,
    )
    .optional()?
    .ok_or(StoreError::NotFound)
}

/// Insert a post and return its id. `created` is assigned by the database.
pub fn create(
    pool: &DbPool,
    title: &str,
    content: &str,
    image_url: Option<&str>,
) -> StoreResult<i64> {
    let conn = pool.get()?;
    conn.execute(
        "INSERT INTO posts (title, content, image_url) VALUES (?1, ?2, ?3)",
        params![title, content, image_url],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Overwrite title and content; the stored image is replaced only when a
/// new one is given (COALESCE keeps the old reference otherwise).
pub fn update(
    pool: &DbPool,
    id: i64,
    title: &str,
    content: &str,
    new_image: Option<&str>,
) -> StoreResult<()> {
    let conn = pool.get()?;
    let changed = conn.execute(
        "UPDATE posts SET title = ?1, content = ?2, image_url = COALESCE(?3, image_url) \
         WHERE id = ?4",
        params![title, content, new_image, id],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

pub fn delete(pool: &DbPool, id: i64) -> StoreResult<()> {
    let conn = pool.get()?;
    let changed = conn.execute("DELETE FROM posts WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[test]
    fn create_then_get_returns_matching_post() {
        let pool = test_pool();
        let id = create(&pool, "First", "Hello", None).unwrap();

        let post = get(&pool, id).unwrap();
        assert_eq!(post.id, id);
        assert_eq!(post.title, "First");
        assert_eq!(post.content, "Hello");
        assert!(post.image_url.is_none());
        assert!(!post.created.is_empty());
    }

    #[test]
    fn get_missing_post_is_not_found() {
        let pool = test_pool();
        assert!(matches!(get(&pool, 42), Err(StoreError::NotFound)));
    }

    #[test]
    fn list_all_orders_newest_first() {
        let pool = test_pool();
        let first = create(&pool, "a", "1", None).unwrap();
        let second = create(&pool, "b", "2", None).unwrap();
        let third = create(&pool, "c", "3", None).unwrap();

        let ids: Vec<i64> = list_all(&pool).unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![third, second, first]);
    }

    #[test]
    fn update_overwrites_title_and_content() {
        let pool = test_pool();
        let id = create(&pool, "old", "old body", None).unwrap();

        update(&pool, id, "new", "new body", None).unwrap();
        let post = get(&pool, id).unwrap();
        assert_eq!(post.title, "new");
        assert_eq!(post.content, "new body");
    }

    #[test]
    fn update_without_new_image_preserves_existing() {
        let pool = test_pool();
        let id = create(&pool, "t", "c", Some("/uploads/cat.png")).unwrap();

        update(&pool, id, "t2", "c2", None).unwrap();
        let post = get(&pool, id).unwrap();
        assert_eq!(post.image_url.as_deref(), Some("/uploads/cat.png"));
    }

    #[test]
    fn update_with_new_image_replaces_existing() {
        let pool = test_pool();
        let id = create(&pool, "t", "c", Some("/uploads/cat.png")).unwrap();

        update(&pool, id, "t", "c", Some("/uploads/dog.png")).unwrap();
        let post = get(&pool, id).unwrap();
        assert_eq!(post.image_url.as_deref(), Some("/uploads/dog.png"));
    }

    #[test]
    fn update_missing_post_is_not_found() {
        let pool = test_pool();
        assert!(matches!(
            update(&pool, 9, "t", "c", None),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn delete_removes_post_from_listing() {
        let pool = test_pool();
        let id = create(&pool, "bye", "gone", None).unwrap();

        delete(&pool, id).unwrap();
        assert!(matches!(get(&pool, id), Err(StoreError::NotFound)));
        assert!(list_all(&pool).unwrap().iter().all(|p| p.id != id));
    }

    #[test]
    fn delete_missing_post_is_not_found() {
        let pool = test_pool();
        assert!(matches!(delete(&pool, 7), Err(StoreError::NotFound)));
    }
}
