use rusqlite::{params, Connection};

use super::{is_unique_violation, OptionalRow};
use crate::db::DatabaseError;
use crate::models::Condition;

/// Insert a catalog entry. A name already present surfaces as
/// `DuplicateExists`.
pub fn insert_condition(
    conn: &Connection,
    name: &str,
    description: Option<&str>,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO conditions (name, description) VALUES (?1, ?2)",
        params![name, description],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            DatabaseError::duplicate("Condition", name)
        } else {
            e.into()
        }
    })?;
    Ok(conn.last_insert_rowid())
}

/// Look the name up, creating the catalog entry on first use.
pub fn find_or_create_condition(conn: &Connection, name: &str) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT OR IGNORE INTO conditions (name) VALUES (?1)",
        params![name],
    )?;
    get_condition_id(conn, name)?.ok_or_else(|| DatabaseError::not_found("Condition", name))
}

pub fn condition_exists(conn: &Connection, name: &str) -> Result<bool, DatabaseError> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM conditions WHERE name = ?1)",
        params![name],
        |row| row.get::<_, bool>(0),
    )?;
    Ok(exists)
}

pub fn get_condition(conn: &Connection, id: i64) -> Result<Option<Condition>, DatabaseError> {
    let condition = conn
        .query_row(
            "SELECT id, name, description FROM conditions WHERE id = ?1",
            params![id],
            |row| {
                Ok(Condition {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(condition)
}

pub fn get_condition_id(conn: &Connection, name: &str) -> Result<Option<i64>, DatabaseError> {
    let id = conn
        .query_row(
            "SELECT id FROM conditions WHERE name = ?1 LIMIT 1",
            params![name],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(id)
}

pub fn list_condition_names(conn: &Connection) -> Result<Vec<String>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT name FROM conditions ORDER BY name ASC")?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    #[test]
    fn insert_and_lookup_both_ways() {
        let conn = test_db();
        let id = insert_condition(&conn, "Cataract", Some("Clouding of the lens")).unwrap();

        let condition = get_condition(&conn, id).unwrap().unwrap();
        assert_eq!(condition.name, "Cataract");
        assert_eq!(condition.description.as_deref(), Some("Clouding of the lens"));
        assert_eq!(get_condition_id(&conn, "Cataract").unwrap(), Some(id));
    }

    #[test]
    fn duplicate_name_rejected() {
        let conn = test_db();
        insert_condition(&conn, "Cataract", None).unwrap();
        let err = insert_condition(&conn, "Cataract", None).unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(list_condition_names(&conn).unwrap().len(), 1);
    }

    #[test]
    fn find_or_create_is_stable() {
        let conn = test_db();
        let first = find_or_create_condition(&conn, "Diabetes").unwrap();
        let second = find_or_create_condition(&conn, "Diabetes").unwrap();
        assert_eq!(first, second);
        assert_eq!(list_condition_names(&conn).unwrap(), vec!["Diabetes"]);
    }

    #[test]
    fn existence_and_missing_lookups() {
        let conn = test_db();
        assert!(!condition_exists(&conn, "Glaucoma").unwrap());
        insert_condition(&conn, "Glaucoma", None).unwrap();
        assert!(condition_exists(&conn, "Glaucoma").unwrap());
        assert!(get_condition(&conn, 999).unwrap().is_none());
        assert!(get_condition_id(&conn, "Myopia").unwrap().is_none());
    }

    #[test]
    fn names_listed_alphabetically() {
        let conn = test_db();
        for name in ["Myopia", "Astigmatism", "Glaucoma"] {
            insert_condition(&conn, name, None).unwrap();
        }
        assert_eq!(
            list_condition_names(&conn).unwrap(),
            vec!["Astigmatism", "Glaucoma", "Myopia"]
        );
    }
}
