// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::validate_image_url;

/// Placeholder avatar assigned to every new profile.
pub const DEFAULT_AVATAR: &str =
    "https://www.gravatar.com/avatar/00000000000000000000000000000000?d=mp&f=y";

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,

    /// Unique login email.
    pub email: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    pub name: String,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// The denormalized author/sender shape embedded in posts, comments and notifications.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
}

/// A user joined with their profile.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    pub id: String,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub bio: String,
    pub long_bio: Option<String>,
    pub image_url: Option<String>,
}

/// Row used by user listings (search, followers, followings).
#[derive(Debug, Clone, FromRow)]
pub struct UserCard {
    pub id: String,
    pub name: String,
    pub bio: String,
    pub image_url: Option<String>,
}

/// A user card personalised for the viewer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialUser {
    pub id: String,
    pub name: String,
    pub bio: String,
    pub image_url: String,
    /// Whether the viewer follows this user.
    pub followed_back: bool,
    /// Whether this user is the viewer.
    pub himself: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followers_count: Option<i64>,
}

/// Insert payload for a new user; the profile is created alongside it.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
}

/// Profile fields that may be changed. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub long_bio: Option<String>,
    pub image_url: Option<String>,
}

/// Own profile page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnProfile {
    #[serde(flatten)]
    pub user: UserDetails,
    pub followers: i64,
    pub following: i64,
}

/// Someone else's profile page, seen by the viewer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    #[serde(flatten)]
    pub user: UserDetails,
    pub followers_count: i64,
    pub following_count: i64,
    /// Whether the viewer follows this user.
    pub has_followed: bool,
}

/// DTO for registration.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "A valid email address is required."))]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "Name must not be empty."))]
    pub name: Option<String>,
    #[validate(length(
        min = 5,
        max = 128,
        message = "Password length must be between 5 and 128 characters."
    ))]
    pub password: String,
}

/// DTO for signing in.
#[derive(Debug, Deserialize, Validate)]
pub struct SigninRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 5, max = 128))]
    pub password: String,
}

/// DTO for updating the viewer's profile.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 300))]
    pub bio: Option<String>,
    #[validate(length(max = 5000))]
    pub long_bio: Option<String>,
    #[validate(length(max = 500), custom(function = validate_image_url))]
    pub image_url: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            name: req.name,
            bio: req.bio,
            long_bio: req.long_bio,
            image_url: req.image_url,
        }
    }
}

/// Query parameters for user search.
#[derive(Debug, Deserialize)]
pub struct UserSearchParams {
    pub filter: Option<String>,
    pub page: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_validation() {
        let ok = SignupRequest {
            email: "ada@example.com".into(),
            name: Some("Ada".into()),
            password: "hunter22".into(),
        };
        assert!(ok.validate().is_ok());

        let short = SignupRequest {
            email: "ada@example.com".into(),
            name: None,
            password: "abc".into(),
        };
        assert!(short.validate().is_err());

        let bad_email = SignupRequest {
            email: "not-an-email".into(),
            name: None,
            password: "hunter22".into(),
        };
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn profile_update_rejects_bad_image_url() {
        let req = UpdateProfileRequest {
            name: None,
            bio: None,
            long_bio: None,
            image_url: Some("not a url".into()),
        };
        assert!(req.validate().is_err());
    }
}
