use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use playnext_auth_types::identity::BearerIdentity;

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::ApiError;
use crate::state::AppState;

/// The account behind a valid bearer token.
///
/// A well-formed token whose subject no longer exists is rejected with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Look up the account a token was issued to.
///
/// Tokens carrying a user id follow that account through renames and never
/// resolve to someone who later registers the old username.
pub async fn resolve_user<U: UserRepository>(
    users: &U,
    identity: &BearerIdentity,
) -> Result<User, ApiError> {
    let user = match identity.user_id {
        Some(id) => users.find_by_id(id).await?,
        None => users.find_by_username(&identity.username).await?,
    };
    user.ok_or(ApiError::Unauthorized("User not found"))
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = BearerIdentity::from_headers(&parts.headers, &state.jwt_secret);
        let users = state.user_repo();

        async move {
            let identity = identity?;
            resolve_user(&users, &identity).await.map(Self)
        }
    }
}
