//! Users service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        pagination::Page,
        users::{
            data::{NewUser, UserUpdate},
            errors::UsersServiceError,
            records::{UserRecord, UserUuid},
            repository::PgUsersRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    repository: PgUsersRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgUsersRepository::new(),
        }
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn list_users(&self, page: Page) -> Result<Vec<UserRecord>, UsersServiceError> {
        let mut conn = self.db.acquire().await?;

        let users = self.repository.list_users(&mut conn, page).await?;

        Ok(users)
    }

    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError> {
        let mut conn = self.db.acquire().await?;

        let user = self.repository.get_user(&mut conn, user).await?;

        Ok(user)
    }

    #[tracing::instrument(
        name = "users.service.create_user",
        skip(self, user),
        fields(user_uuid = tracing::field::Empty),
        err
    )]
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError> {
        user.validate()?;

        let uuid = UserUuid::new();

        tracing::Span::current().record("user_uuid", tracing::field::display(uuid));

        let mut conn = self.db.acquire().await?;

        let created = self.repository.create_user(&mut conn, uuid, user).await?;

        info!(user_uuid = %created.uuid, "created user");

        Ok(created)
    }

    async fn update_user(
        &self,
        user: UserUuid,
        update: UserUpdate,
    ) -> Result<UserRecord, UsersServiceError> {
        update.validate()?;

        let mut conn = self.db.acquire().await?;

        let updated = self.repository.update_user(&mut conn, user, update).await?;

        Ok(updated)
    }

    async fn delete_user(&self, user: UserUuid) -> Result<(), UsersServiceError> {
        let mut conn = self.db.acquire().await?;

        let rows_affected = self.repository.delete_user(&mut conn, user).await?;

        if rows_affected == 0 {
            return Err(UsersServiceError::NotFound);
        }

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Retrieve a page of users, newest first.
    async fn list_users(&self, page: Page) -> Result<Vec<UserRecord>, UsersServiceError>;

    /// Retrieve a single user.
    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError>;

    /// Validate and store a new user.
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError>;

    /// Apply the present fields of `update` and refresh the user's update time.
    async fn update_user(
        &self,
        user: UserUuid,
        update: UserUpdate,
    ) -> Result<UserRecord, UsersServiceError>;

    /// Permanently remove a user and, through the store's cascade, their orders.
    async fn delete_user(&self, user: UserUuid) -> Result<(), UsersServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::{TestContext, helpers::new_user};

    use super::*;

    #[tokio::test]
    async fn create_user_returns_stored_fields() -> TestResult {
        let ctx = TestContext::new().await;

        let user = ctx.users.create_user(new_user("alice")).await?;

        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.full_name, "Test alice");
        assert_eq!(user.created_at, user.updated_at);

        Ok(())
    }

    #[tokio::test]
    async fn create_user_rejects_invalid_fields_before_storage() -> TestResult {
        let ctx = TestContext::new().await;

        let result = ctx
            .users
            .create_user(NewUser {
                username: "ab".to_string(),
                email: "nope".to_string(),
                full_name: String::new(),
            })
            .await;

        assert!(
            matches!(&result, Err(UsersServiceError::Invalid(errors)) if errors.errors().len() == 3),
            "expected three field errors, got {result:?}"
        );

        let users = ctx.users.list_users(Page::default()).await?;

        assert!(users.is_empty(), "no row should have been written");

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_username_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.users.create_user(new_user("bob")).await?;

        let result = ctx
            .users
            .create_user(NewUser {
                email: "other@example.com".to_string(),
                ..new_user("bob")
            })
            .await;

        assert!(
            matches!(result, Err(UsersServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.users.create_user(new_user("carol")).await?;

        let result = ctx
            .users
            .create_user(NewUser {
                username: "carol2".to_string(),
                ..new_user("carol")
            })
            .await;

        assert!(
            matches!(result, Err(UsersServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn get_user_returns_created_user() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx.users.create_user(new_user("dave")).await?;
        let fetched = ctx.users.get_user(created.uuid).await?;

        assert_eq!(fetched, created);

        Ok(())
    }

    #[tokio::test]
    async fn get_user_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.users.get_user(UserUuid::new()).await;

        assert!(
            matches!(result, Err(UsersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_users_pages_newest_first() -> TestResult {
        let ctx = TestContext::new().await;

        for i in 0..15 {
            ctx.users.create_user(new_user(&format!("user{i:02}"))).await?;
        }

        let users = ctx.users.list_users(Page::new(Some(10), Some(0))?).await?;

        assert_eq!(users.len(), 10);
        assert_eq!(users.first().map(|u| u.username.as_str()), Some("user14"));
        assert!(
            users
                .windows(2)
                .all(|pair| matches!(pair, [a, b] if a.created_at >= b.created_at)),
            "users should be ordered by creation time descending"
        );

        let rest = ctx.users.list_users(Page::new(Some(10), Some(10))?).await?;

        assert_eq!(rest.len(), 5);
        assert_eq!(rest.last().map(|u| u.username.as_str()), Some("user00"));

        Ok(())
    }

    #[tokio::test]
    async fn update_user_changes_only_present_fields() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx.users.create_user(new_user("erin")).await?;

        let updated = ctx
            .users
            .update_user(
                created.uuid,
                UserUpdate {
                    full_name: Some("Erin Example".to_string()),
                    ..UserUpdate::default()
                },
            )
            .await?;

        assert_eq!(updated.full_name, "Erin Example");
        assert_eq!(updated.username, created.username);
        assert_eq!(updated.email, created.email);

        Ok(())
    }

    #[tokio::test]
    async fn empty_update_refreshes_updated_at_only() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx.users.create_user(new_user("frank")).await?;

        let updated = ctx
            .users
            .update_user(created.uuid, UserUpdate::default())
            .await?;

        assert_eq!(updated.username, created.username);
        assert_eq!(updated.email, created.email);
        assert_eq!(updated.full_name, created.full_name);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);

        Ok(())
    }

    #[tokio::test]
    async fn update_user_rejects_empty_strings() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx.users.create_user(new_user("gina")).await?;

        let result = ctx
            .users
            .update_user(
                created.uuid,
                UserUpdate {
                    username: Some(String::new()),
                    ..UserUpdate::default()
                },
            )
            .await;

        assert!(
            matches!(result, Err(UsersServiceError::Invalid(_))),
            "expected Invalid, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_user_to_taken_email_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.users.create_user(new_user("hank")).await?;
        let ivy = ctx.users.create_user(new_user("ivy")).await?;

        let result = ctx
            .users
            .update_user(
                ivy.uuid,
                UserUpdate {
                    email: Some("hank@example.com".to_string()),
                    ..UserUpdate::default()
                },
            )
            .await;

        assert!(
            matches!(result, Err(UsersServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_user_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .users
            .update_user(UserUuid::new(), UserUpdate::default())
            .await;

        assert!(
            matches!(result, Err(UsersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn deleting_twice_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx.users.create_user(new_user("jack")).await?;

        ctx.users.delete_user(created.uuid).await?;

        let result = ctx.users.delete_user(created.uuid).await;

        assert!(
            matches!(result, Err(UsersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }
}
