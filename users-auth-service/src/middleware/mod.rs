pub mod auth;

pub use auth::{
    access_token_from_headers, require_access_token, AuthUser, ACCESS_TOKEN_COOKIE,
    REFRESH_TOKEN_COOKIE,
};
