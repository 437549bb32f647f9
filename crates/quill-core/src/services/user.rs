//! User registration.

use std::sync::Arc;

use crate::domain::User;
use crate::error::DomainError;
use crate::ports::{PasswordService, UserRepository};

/// Already-validated registration input.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    /// Create an account. Fails with [`DomainError::Duplicate`] when the email is taken.
    pub async fn register(&self, input: RegisterUser) -> Result<User, DomainError> {
        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(DomainError::Duplicate("Email already registered".to_string()));
        }

        let password_hash = self.passwords.hash(&input.password)?;
        let user = self
            .users
            .save(User::new(input.email, input.name, password_hash))
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }
}
