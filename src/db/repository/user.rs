use std::str::FromStr;

use rusqlite::{params, Connection};

use super::{is_unique_violation, OptionalRow};
use crate::crypto::HashedPassword;
use crate::db::DatabaseError;
use crate::models::enums::HashMethod;
use crate::models::User;

/// Insert a user. A taken username surfaces as `DuplicateExists`.
pub fn insert_user(
    conn: &Connection,
    username: &str,
    full_name: &str,
    password: &HashedPassword,
    must_change_password: bool,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO users (username, password_hash, password_hash_method, full_name, must_change_password)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            username,
            password.encoded,
            password.method.as_str(),
            full_name,
            must_change_password as i32,
        ],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            DatabaseError::duplicate("User", username)
        } else {
            e.into()
        }
    })?;
    Ok(conn.last_insert_rowid())
}

pub fn get_user_by_username(conn: &Connection, username: &str) -> Result<Option<User>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, username, password_hash, password_hash_method, full_name, must_change_password
         FROM users WHERE username = ?1",
    )?;

    let row = stmt
        .query_row(params![username], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, i32>(5)?,
            ))
        })
        .optional()?;

    match row {
        Some((id, username, password_hash, method, full_name, must_change)) => Ok(Some(User {
            id,
            username,
            password_hash,
            password_hash_method: HashMethod::from_str(&method)?,
            full_name,
            must_change_password: must_change != 0,
        })),
        None => Ok(None),
    }
}

pub fn user_exists(conn: &Connection, username: &str) -> Result<bool, DatabaseError> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)",
        params![username],
        |row| row.get::<_, bool>(0),
    )?;
    Ok(exists)
}

pub fn count_users(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    Ok(count)
}

/// Rename and/or retitle a user. Renaming onto a taken username surfaces
/// as `DuplicateExists`.
pub fn update_user_identity(
    conn: &Connection,
    id: i64,
    username: &str,
    full_name: &str,
) -> Result<(), DatabaseError> {
    let updated = conn
        .execute(
            "UPDATE users SET username = ?1, full_name = ?2 WHERE id = ?3",
            params![username, full_name, id],
        )
        .map_err(|e| {
            if is_unique_violation(&e) {
                DatabaseError::duplicate("User", username)
            } else {
                e.into()
            }
        })?;
    if updated == 0 {
        return Err(DatabaseError::not_found("User", id));
    }
    Ok(())
}

/// Replace the stored hash; a deliberate password change clears the
/// forced-change flag.
pub fn update_user_password(
    conn: &Connection,
    id: i64,
    password: &HashedPassword,
) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE users SET password_hash = ?1, password_hash_method = ?2, must_change_password = 0
         WHERE id = ?3",
        params![password.encoded, password.method.as_str(), id],
    )?;
    if updated == 0 {
        return Err(DatabaseError::not_found("User", id));
    }
    Ok(())
}

pub fn list_usernames(conn: &Connection) -> Result<Vec<String>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT username FROM users ORDER BY username ASC")?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
