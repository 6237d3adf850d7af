use super::{require, PracticeDb};
use crate::config;
use crate::crypto::{hash_password, verify_password};
use crate::db::{self, DatabaseError};
use crate::models::User;

impl PracticeDb {
    /// Check a logon attempt. Unknown usernames fail closed.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<bool, DatabaseError> {
        let Some(user) = db::get_user_by_username(self.conn(), username)? else {
            tracing::warn!("Logon rejected: unknown user");
            return Ok(false);
        };

        let accepted = verify_password(password, user.password_hash_method, &user.password_hash)?;
        if accepted {
            tracing::info!(user_id = user.id, "Logon accepted");
        } else {
            tracing::warn!(user_id = user.id, "Logon rejected: wrong password");
        }
        Ok(accepted)
    }

    /// Create a staff account. Returns `false` when the username is taken.
    pub fn create_user(
        &self,
        username: &str,
        password: &str,
        full_name: &str,
    ) -> Result<bool, DatabaseError> {
        require("Username", username)?;
        require("Password", password)?;
        require("Full name", full_name)?;

        let hashed = hash_password(password, config::DEFAULT_HASH_METHOD);
        match db::insert_user(self.conn(), username, full_name, &hashed, false) {
            Ok(id) => {
                tracing::info!(user_id = id, "User created");
                Ok(true)
            }
            Err(e) if e.is_duplicate() => {
                tracing::warn!("User not created: username taken");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Edit an account. An empty `password` leaves the stored one unchanged.
    /// Returns `false` when renaming onto another existing username.
    pub fn amend_user(
        &self,
        old_username: &str,
        new_username: &str,
        password: &str,
        full_name: &str,
    ) -> Result<bool, DatabaseError> {
        require("Username", new_username)?;
        require("Full name", full_name)?;

        let tx = self.conn().unchecked_transaction()?;
        let user = db::get_user_by_username(&tx, old_username)?
            .ok_or_else(|| DatabaseError::not_found("User", old_username))?;

        match db::update_user_identity(&tx, user.id, new_username, full_name) {
            Ok(()) => {}
            Err(e) if e.is_duplicate() => {
                tracing::warn!(user_id = user.id, "User not amended: username taken");
                return Ok(false);
            }
            Err(e) => return Err(e),
        }

        if !password.is_empty() {
            let hashed = hash_password(password, config::DEFAULT_HASH_METHOD);
            db::update_user_password(&tx, user.id, &hashed)?;
        }

        tx.commit()?;
        tracing::info!(user_id = user.id, password_changed = !password.is_empty(), "User amended");
        Ok(true)
    }

    pub fn user_exists(&self, username: &str) -> Result<bool, DatabaseError> {
        db::user_exists(self.conn(), username)
    }

    pub fn get_user(&self, username: &str) -> Result<User, DatabaseError> {
        db::get_user_by_username(self.conn(), username)?
            .ok_or_else(|| DatabaseError::not_found("User", username))
    }

    pub fn list_usernames(&self) -> Result<Vec<String>, DatabaseError> {
        db::list_usernames(self.conn())
    }
}

#[cfg(test)]
mod tests {
    use crate::db::DatabaseError;
    use crate::practice::PracticeDb;

    fn practice() -> PracticeDb {
        PracticeDb::open_in_memory().unwrap()
    }

    #[test]
    fn create_then_exists() {
        let db = practice();
        assert!(!db.user_exists("jbloggs").unwrap());
        assert!(db.create_user("jbloggs", "hunter2", "Joe Bloggs").unwrap());
        assert!(db.user_exists("jbloggs").unwrap());
    }

    #[test]
    fn create_existing_fails_and_keeps_record() {
        let db = practice();
        assert!(db.create_user("jbloggs", "hunter2", "Joe Bloggs").unwrap());
        assert!(!db.create_user("jbloggs", "other", "Someone Else").unwrap());

        let user = db.get_user("jbloggs").unwrap();
        assert_eq!(user.full_name, "Joe Bloggs");
        assert!(db.authenticate("jbloggs", "hunter2").unwrap());
        assert!(!db.authenticate("jbloggs", "other").unwrap());
    }

    #[test]
    fn create_rejects_blank_fields() {
        let db = practice();
        assert!(matches!(db.create_user("", "pw", "Name"), Err(DatabaseError::Validation(_))));
        assert!(matches!(db.create_user("u", "", "Name"), Err(DatabaseError::Validation(_))));
        assert!(matches!(db.create_user("u", "pw", " "), Err(DatabaseError::Validation(_))));
        assert!(!db.user_exists("u").unwrap());
    }

    #[test]
    fn authenticate_unknown_user_is_false() {
        let db = practice();
        assert!(!db.authenticate("ghost", "anything").unwrap());
    }

    #[test]
    fn authenticate_checks_password() {
        let db = practice();
        db.create_user("optom", "correct horse", "Optometrist").unwrap();
        assert!(db.authenticate("optom", "correct horse").unwrap());
        assert!(!db.authenticate("optom", "correct horse ").unwrap());
        assert!(!db.authenticate("Optom", "correct horse").unwrap());
    }

    #[test]
    fn amend_with_empty_password_keeps_old_one() {
        let db = practice();
        db.create_user("optom", "original", "Optometrist").unwrap();

        assert!(db.amend_user("optom", "optom", "", "Senior Optometrist").unwrap());

        assert!(db.authenticate("optom", "original").unwrap());
        assert_eq!(db.get_user("optom").unwrap().full_name, "Senior Optometrist");
    }

    #[test]
    fn amend_with_new_password_replaces_it() {
        let db = practice();
        db.create_user("optom", "original", "Optometrist").unwrap();

        assert!(db.amend_user("optom", "optom", "replacement", "Optometrist").unwrap());

        assert!(db.authenticate("optom", "replacement").unwrap());
        assert!(!db.authenticate("optom", "original").unwrap());
    }

    #[test]
    fn amend_rename_moves_account() {
        let db = practice();
        db.create_user("optom", "pw", "Optometrist").unwrap();

        assert!(db.amend_user("optom", "optom2", "", "Optometrist").unwrap());

        assert!(!db.user_exists("optom").unwrap());
        assert!(db.authenticate("optom2", "pw").unwrap());
    }

    #[test]
    fn amend_rename_onto_existing_fails_without_changes() {
        let db = practice();
        db.create_user("a", "pw-a", "User A").unwrap();
        db.create_user("b", "pw-b", "User B").unwrap();

        assert!(!db.amend_user("a", "b", "new-pw", "Renamed").unwrap());

        // Nothing about "a" changed, including the password
        let a = db.get_user("a").unwrap();
        assert_eq!(a.full_name, "User A");
        assert!(db.authenticate("a", "pw-a").unwrap());
        assert_eq!(db.get_user("b").unwrap().full_name, "User B");
    }

    #[test]
    fn amend_missing_user_is_not_found() {
        let db = practice();
        let err = db.amend_user("ghost", "ghost", "", "Ghost").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn password_change_clears_bootstrap_flag() {
        let mut db = practice();
        let admin = db.take_bootstrap_admin().unwrap();
        assert!(db.get_user("admin").unwrap().must_change_password);

        db.amend_user("admin", "admin", "chosen-by-admin", "Practice Manager").unwrap();

        assert!(!db.get_user("admin").unwrap().must_change_password);
        assert!(!db.authenticate("admin", &admin.password).unwrap());
        assert!(db.authenticate("admin", "chosen-by-admin").unwrap());
    }

    #[test]
    fn tampered_iteration_count_fails_logon_quickly() {
        let db = practice();
        db.create_user("optom", "pw", "Optometrist").unwrap();
        db.conn()
            .execute(
                "UPDATE users SET password_hash = ?1 WHERE username = 'optom'",
                [format!("{}$AAAA$AAAA", u32::MAX)],
            )
            .unwrap();

        let err = db.authenticate("optom", "pw").unwrap_err();
        assert!(matches!(err, DatabaseError::Crypto(_)));
    }

    #[test]
    fn get_missing_user_is_not_found() {
        let db = practice();
        assert!(db.get_user("ghost").unwrap_err().is_not_found());
    }

    #[test]
    fn usernames_include_bootstrap_admin() {
        let db = practice();
        db.create_user("reception", "pw", "Reception").unwrap();
        assert_eq!(db.list_usernames().unwrap(), vec!["admin", "reception"]);
    }
}
