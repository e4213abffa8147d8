//! Authorisation guards called at the top of handlers.

use crate::domain::ports::UserDirectory;
use crate::domain::{Capability, Error, User, UserId};

/// Load the signed-in user and check they hold `capability`.
///
/// A session naming a deleted account is treated as signed out.
pub async fn require_capability(
    directory: &dyn UserDirectory,
    user_id: &UserId,
    capability: Capability,
) -> Result<User, Error> {
    let user = directory
        .find_user(user_id)
        .await?
        .ok_or_else(|| Error::unauthorized("login required"))?;
    if !user.has_capability(capability) {
        return Err(Error::forbidden("staff permission required"));
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockUserDirectory;
    use crate::domain::{EmailAddress, ErrorCode, Username};
    use chrono::Utc;
    use rstest::rstest;

    fn user(is_staff: bool) -> User {
        User {
            id: UserId::random(),
            username: Username::new("editor").expect("username"),
            email: EmailAddress::new("editor@example.com").expect("email"),
            is_staff,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[case(true, None)]
    #[case(false, Some(ErrorCode::Forbidden))]
    #[tokio::test]
    async fn capability_follows_staff_flag(
        #[case] is_staff: bool,
        #[case] expected: Option<ErrorCode>,
    ) {
        let user = user(is_staff);
        let id = user.id;
        let mut directory = MockUserDirectory::new();
        directory
            .expect_find_user()
            .returning(move |_| Ok(Some(user.clone())));

        let result = require_capability(&directory, &id, Capability::ManageCatalogue).await;
        assert_eq!(result.err().map(|e| e.code()), expected);
    }

    #[tokio::test]
    async fn unknown_user_must_log_in_again() {
        let mut directory = MockUserDirectory::new();
        directory.expect_find_user().returning(|_| Ok(None));

        let err = require_capability(&directory, &UserId::random(), Capability::ManageCatalogue)
            .await
            .expect_err("unknown user");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
