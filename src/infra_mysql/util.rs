use sqlx::mysql::MySqlDatabaseError;

pub fn is_dup_key(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db) = err {
        if let Some(mysql_err) = db.try_downcast_ref::<MySqlDatabaseError>() {
            return mysql_err.number() == 1062; // ER_DUP_ENTRY
        }
    }

    false
}

#[cfg(all(test, feature = "mysql-tests"))]
pub(crate) async fn insert_user(
    pool: &sqlx::MySqlPool,
    username: &str,
    is_active: bool,
) -> crate::domain_model::UserId {
    let user_id = crate::application_impl::fake_user_id(username);
    sqlx::query("INSERT INTO user (user_id, username, is_active) VALUES (?, ?, ?)")
        .bind(user_id)
        .bind(username)
        .bind(is_active)
        .execute(pool)
        .await
        .unwrap();
    user_id
}
