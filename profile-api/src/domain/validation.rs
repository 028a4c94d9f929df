//! Rules a profile update must satisfy before anything is written.
//!
//! Validation is all-or-nothing: every violated rule is collected into a
//! [`FieldErrors`] map and nothing is accepted unless the map is empty.

use validator::{Validate, ValidationError};

use crate::domain::{
    models::{AvatarUpload, ImageKind, ProfileUpdateRequest, UserId, ValidatedProfileUpdate},
    ports::outbound::UsernameLookup,
    FieldErrors, ProfileError,
};

pub const USERNAME_MIN_CHARS: usize = 2;
pub const USERNAME_MAX_CHARS: usize = 20;
pub const BIO_MAX_CHARS: usize = 500;
pub const AVATAR_MAX_KIB: usize = 2048;
pub const AVATAR_MAX_BYTES: usize = AVATAR_MAX_KIB * 1024;

#[derive(Debug, Validate)]
struct ProfileFields {
    #[validate(length(
        min = 2,
        max = 20,
        message = "The username field must be between 2 and 20 characters."
    ))]
    username: String,
    #[validate(length(max = 500, message = "The bio field must not be greater than 500 characters."))]
    bio: Option<String>,
}

/// Checks a profile update submitted by `current_user`.
///
/// The username must be unique among all users except `current_user`, so a
/// user resubmitting their own username is accepted. `lookup` is only
/// consulted once the username is well-formed.
pub async fn validate_profile_update<L>(
    request: ProfileUpdateRequest,
    current_user: UserId,
    lookup: &L,
) -> Result<ValidatedProfileUpdate, ProfileError>
where
    L: UsernameLookup + ?Sized,
{
    let ProfileUpdateRequest {
        username,
        avatar,
        bio,
    } = request;

    let username = normalize(username);
    let bio = normalize(bio);
    let mut errors = FieldErrors::new();

    let fields = ProfileFields {
        username: username.clone().unwrap_or_default(),
        bio: bio.clone(),
    };
    if let Err(failures) = fields.validate() {
        for (field, field_failures) in failures.field_errors() {
            let field = field.to_string();
            if field == "username" && username.is_none() {
                continue;
            }
            for failure in field_failures {
                errors.add(field.clone(), reason(failure));
            }
        }
    }

    match username.as_deref() {
        None => errors.add("username", "The username field is required."),
        Some(name) if !errors.contains("username") => {
            if lookup.is_username_taken(name, current_user).await? {
                errors.add("username", "The username has already been taken.");
            }
        }
        Some(_) => {}
    }

    if let Some(upload) = &avatar {
        for violation in avatar_violations(upload) {
            errors.add("avatar", violation);
        }
    }

    match username {
        Some(username) if errors.is_empty() => Ok(ValidatedProfileUpdate {
            username,
            avatar,
            bio,
        }),
        _ => {
            tracing::debug!(%current_user, %errors, "profile update rejected");
            Err(ProfileError::Validation(errors))
        }
    }
}

/// Trims surrounding whitespace and treats blank values as absent.
fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn reason(failure: &ValidationError) -> String {
    failure
        .message
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| failure.code.to_string())
}

fn avatar_violations(upload: &AvatarUpload) -> Vec<String> {
    let mut violations = Vec::new();

    if !ImageKind::is_image(&upload.bytes) {
        violations.push("The avatar field must be an image.".to_string());
    }

    if ImageKind::sniff(&upload.bytes).is_none() {
        violations.push(format!(
            "The avatar field must be a file of type: {}.",
            ImageKind::ACCEPTED_EXTENSIONS.join(", ")
        ));
    }

    if upload.len() > AVATAR_MAX_BYTES {
        violations.push(format!(
            "The avatar field must not be greater than {AVATAR_MAX_KIB} kilobytes."
        ));
    }

    violations
}
