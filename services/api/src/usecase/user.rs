use playnext_domain::pagination::PageRequest;

use crate::domain::repository::{PasswordHasher, UserRepository};
use crate::domain::types::{
    MIN_PASSWORD_LEN, NewUser, User, UserChanges, validate_email, validate_password,
    validate_username,
};
use crate::error::{ADMIN_REQUIRED, ApiError};

fn check_username(username: &str) -> Result<(), ApiError> {
    if validate_username(username) {
        Ok(())
    } else {
        Err(ApiError::Validation(
            "username must be 1-50 characters without spaces".into(),
        ))
    }
}

fn check_email(email: &str) -> Result<(), ApiError> {
    if validate_email(email) {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "{email:?} is not a valid email address"
        )))
    }
}

fn check_password(password: &str) -> Result<(), ApiError> {
    if validate_password(password) {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )))
    }
}

fn check_age(age: Option<i32>) -> Result<(), ApiError> {
    match age {
        Some(a) if !(0..=150).contains(&a) => {
            Err(ApiError::Validation("user_age must be between 0 and 150".into()))
        }
        _ => Ok(()),
    }
}

/// Self-or-admin guard shared by update and delete.
fn ensure_self_or_admin(actor: &User, target_id: i32, denied: &'static str) -> Result<(), ApiError> {
    if actor.id == target_id || actor.is_admin {
        Ok(())
    } else {
        Err(ApiError::Forbidden(denied))
    }
}

// ── RegisterUser ─────────────────────────────────────────────────────────────

pub struct RegisterUserInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub user_age: Option<i32>,
}

pub struct RegisterUserUseCase<R: UserRepository, H: PasswordHasher> {
    pub users: R,
    pub hasher: H,
}

impl<R: UserRepository, H: PasswordHasher> RegisterUserUseCase<R, H> {
    pub async fn execute(&self, input: RegisterUserInput) -> Result<User, ApiError> {
        check_username(&input.username)?;
        check_email(&input.email)?;
        check_password(&input.password)?;
        check_age(input.user_age)?;

        if self.users.find_by_username(&input.username).await?.is_some() {
            return Err(ApiError::UsernameTaken);
        }
        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(ApiError::EmailTaken);
        }

        let password_hash = self.hasher.hash(&input.password).await?;
        let user = self
            .users
            .create(&NewUser {
                username: input.username,
                email: input.email,
                password_hash,
                user_age: input.user_age,
            })
            .await?;
        tracing::info!(user_id = user.id, "user registered");
        Ok(user)
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, user_id: i32) -> Result<User, ApiError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ListUsersUseCase<R> {
    pub async fn execute(&self, actor: &User, page: PageRequest) -> Result<Vec<User>, ApiError> {
        if !actor.is_admin {
            return Err(ApiError::Forbidden(ADMIN_REQUIRED));
        }
        self.repo.list(page.clamped()).await
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateUserInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub user_age: Option<i32>,
}

pub struct UpdateUserUseCase<R: UserRepository, H: PasswordHasher> {
    pub users: R,
    pub hasher: H,
}

impl<R: UserRepository, H: PasswordHasher> UpdateUserUseCase<R, H> {
    pub async fn execute(
        &self,
        actor: &User,
        target_id: i32,
        input: UpdateUserInput,
    ) -> Result<User, ApiError> {
        let target = self
            .users
            .find_by_id(target_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        ensure_self_or_admin(actor, target.id, "Not authorized to update this user")?;

        if let Some(ref username) = input.username {
            check_username(username)?;
            if *username != target.username
                && self.users.find_by_username(username).await?.is_some()
            {
                return Err(ApiError::UsernameTaken);
            }
        }
        if let Some(ref email) = input.email {
            check_email(email)?;
            if *email != target.email && self.users.find_by_email(email).await?.is_some() {
                return Err(ApiError::EmailTaken);
            }
        }
        check_age(input.user_age)?;

        let password_hash = match input.password {
            Some(ref password) => {
                check_password(password)?;
                Some(self.hasher.hash(password).await?)
            }
            None => None,
        };

        self.users
            .update(
                target.id,
                &UserChanges {
                    username: input.username,
                    email: input.email,
                    password_hash,
                    user_age: input.user_age,
                },
            )
            .await
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

pub struct DeleteUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> DeleteUserUseCase<R> {
    /// Returns the deleted user.
    pub async fn execute(&self, actor: &User, target_id: i32) -> Result<User, ApiError> {
        let target = self
            .repo
            .find_by_id(target_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        ensure_self_or_admin(actor, target.id, "Not authorized to delete this user")?;
        if !self.repo.delete(target.id).await? {
            return Err(ApiError::UserNotFound);
        }
        tracing::info!(user_id = target.id, by = actor.id, "user deleted");
        Ok(target)
    }
}
