//! Registration and login.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{User, UserRole};
use crate::error::{DomainError, RepoError};
use crate::ports::{
    AuthError, BaseRepository, MIN_PASSWORD_CHARS, PasswordService, TokenService, UserRepository,
};

/// Registration input as received from the client.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
    pub profile: Option<String>,
}

/// A user together with a freshly issued access token.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub access_token: String,
    pub expires_in: i64,
}

pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    pub async fn register(&self, input: Registration) -> Result<Session, DomainError> {
        if input.name.trim().is_empty() {
            return Err(DomainError::validation("お名前は必須です"));
        }
        let email = input.email.trim().to_string();
        if !is_valid_email(&email) {
            return Err(DomainError::validation(
                "有効なメールアドレスを入力してください",
            ));
        }
        if input.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(DomainError::validation(
                "パスワードは6文字以上で入力してください",
            ));
        }
        let role = parse_signup_role(input.role.as_deref())?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(duplicate_email());
        }

        let password_hash = self
            .passwords
            .hash(&input.password)
            .map_err(|e| match e {
                AuthError::WeakPassword { .. } => {
                    DomainError::validation("パスワードは6文字以上で入力してください")
                }
                other => DomainError::Internal(other.to_string()),
            })?;

        let user = User::new(input.name.trim().to_string(), email, password_hash, role)
            .with_profile(input.profile.filter(|p| !p.trim().is_empty()));
        // a concurrent signup can still trip the unique index
        let user = self.users.insert(user).await.map_err(|e| match e {
            RepoError::Constraint(_) => duplicate_email(),
            other => other.into(),
        })?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");

        self.issue(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, DomainError> {
        let user = self
            .users
            .find_by_email(email.trim())
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        if !valid {
            return Err(DomainError::InvalidCredentials);
        }

        self.issue(user)
    }

    /// The account behind an authenticated request.
    pub async fn current_user(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "ユーザー",
                id: user_id,
            })
    }

    fn issue(&self, user: User) -> Result<Session, DomainError> {
        let access_token = self
            .tokens
            .generate_token(&user)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(Session {
            user,
            access_token,
            expires_in: self.tokens.expiration_seconds(),
        })
    }
}

fn duplicate_email() -> DomainError {
    DomainError::Duplicate("このメールアドレスは既に登録されています".to_string())
}

/// Self-service signup may pick USER or MODERATOR; ADMIN is never granted here.
fn parse_signup_role(raw: Option<&str>) -> Result<UserRole, DomainError> {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return Ok(UserRole::User);
    };
    match raw.parse::<UserRole>() {
        Ok(role @ (UserRole::User | UserRole::Moderator)) => Ok(role),
        _ => Err(DomainError::validation("無効なロールです")),
    }
}

pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("tanaka@example.com"));
        assert!(!is_valid_email("tanaka@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("tanaka example@example.com"));
        assert!(!is_valid_email("a@b@example.com"));
        assert!(!is_valid_email("tanaka@.com"));
    }

    #[test]
    fn test_signup_roles() {
        assert_eq!(parse_signup_role(None).unwrap(), UserRole::User);
        assert_eq!(parse_signup_role(Some("")).unwrap(), UserRole::User);
        assert_eq!(
            parse_signup_role(Some("MODERATOR")).unwrap(),
            UserRole::Moderator
        );
        assert!(parse_signup_role(Some("ADMIN")).is_err());
        assert!(parse_signup_role(Some("root")).is_err());
    }
}
