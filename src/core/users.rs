use crate::db::adjustments::count_authored;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{delete_user, insert_user, list_users, load_user, search_monitors};
use crate::errors::{AppError, AppResult};
use crate::models::actor::Actor;
use crate::models::role::Role;
use crate::models::user::User;
use bcrypt::DEFAULT_COST;

const MIN_PASSWORD_LEN: usize = 6;

/// Registration and lookup of monitors and directors.
pub struct UserLogic;

/// bcrypt hash of the password; the salt is embedded in the result.
pub fn hash_password(password: &str) -> AppResult<String> {
    Ok(bcrypt::hash(password, DEFAULT_COST)?)
}

/// Checks a password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    Ok(bcrypt::verify(password, hash)?)
}

impl UserLogic {
    /// Public registration: the role is always MONITOR.
    pub fn register_monitor(
        pool: &mut DbPool,
        username: &str,
        name: &str,
        password: &str,
    ) -> AppResult<User> {
        Self::create(pool, username, name, password, Role::Monitor)
    }

    /// Directors are provisioned separately from public registration.
    pub fn provision_director(
        pool: &mut DbPool,
        username: &str,
        name: &str,
        password: &str,
    ) -> AppResult<User> {
        Self::create(pool, username, name, password, Role::Director)
    }

    fn create(
        pool: &mut DbPool,
        username: &str,
        name: &str,
        password: &str,
        role: Role,
    ) -> AppResult<User> {
        let username = username.trim();
        let name = name.trim();

        if username.is_empty() {
            return Err(AppError::InvalidInput("username cannot be empty".into()));
        }
        if name.is_empty() {
            return Err(AppError::InvalidInput("name cannot be empty".into()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::InvalidInput(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let hash = hash_password(password)?;
        let id = insert_user(&pool.conn, username, name, &hash, role)?;

        ttlog(
            &pool.conn,
            "register",
            username,
            &format!("Registered {} #{}", role.label().to_lowercase(), id),
        )?;

        Self::get(pool, id)
    }

    pub fn get(pool: &DbPool, id: i64) -> AppResult<User> {
        load_user(&pool.conn, id)?.ok_or(AppError::UserNotFound(id))
    }

    /// Resolve the externally verified caller into an actor.
    pub fn resolve_actor(pool: &DbPool, id: i64) -> AppResult<Actor> {
        let user = Self::get(pool, id)?;
        if !user.is_active {
            return Err(AppError::Forbidden(format!("user {} is inactive", id)));
        }
        Ok(Actor::new(user.id, user.role))
    }

    /// Load a user that must be a monitor (target of adjustments, reports).
    pub fn require_monitor(pool: &DbPool, id: i64) -> AppResult<User> {
        let user = Self::get(pool, id)?;
        if !user.is_monitor() {
            return Err(AppError::InvalidMonitor(id));
        }
        Ok(user)
    }

    pub fn list(pool: &DbPool, role: Option<Role>) -> AppResult<Vec<User>> {
        list_users(&pool.conn, role)
    }

    pub fn monitors(pool: &DbPool) -> AppResult<Vec<User>> {
        list_users(&pool.conn, Some(Role::Monitor))
    }

    pub fn search_monitors(pool: &DbPool, actor: &Actor, query: &str) -> AppResult<Vec<User>> {
        actor.require_director()?;
        search_monitors(&pool.conn, query)
    }

    /// Admin override: removes the user with slots, attendance and adjustments.
/// Directors who booked adjustments are kept until those are deleted.
    pub fn delete(pool: &mut DbPool, actor: &Actor, id: i64) -> AppResult<()> {
        actor.require_director()?;
        if actor.id == id {
            return Err(AppError::Forbidden("directors cannot delete their own account".into()));
        }

        let user = Self::get(pool, id)?;
        let count = count_authored(&pool.conn, id)?;
        if count > 0 {
            return Err(AppError::HasAuthoredAdjustments { user: id, count });
        }
        delete_user(&pool.conn, id)?;

        crate::db::log::audit(
            &pool.conn,
            actor.id,
            "user_delete",
            &user.username,
            &format!("Deleted user #{}", id),
        )?;
        Ok(())
    }
}
