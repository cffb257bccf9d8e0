use crate::{
    auth::{
        AccessTokenResponse, CurrentUser, LoginRequest, RenewRequest, TokenPairResponse,
        TokenService, BEARER,
    },
    error::AppError,
    store::CredentialStore,
};
use actix_web::{get, post, web, HttpResponse, Responder};

/// Login user
///
/// Checks the credentials and returns an access/refresh token pair.
#[post("/login")]
pub async fn login(
    users: web::Data<dyn CredentialStore>,
    tokens: web::Data<TokenService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let LoginRequest { username, password } = login_data.into_inner();

    // bcrypt is deliberately slow; keep it off the async workers.
    let attempted = username.clone();
    let user = web::block(move || users.authenticate(&username, &password))
        .await
        .map_err(|e| AppError::InternalServerError(format!("Login task failed: {}", e)))??;

    let user = match user {
        Some(user) => user,
        None => {
            log::info!("failed login for {:?}", attempted);
            return Err(AppError::InvalidCredentials);
        }
    };

    let access_token = tokens.issue_access(&user.username)?;
    let refresh_token = tokens.issue_refresh(&user.username)?;
    log::info!("user {} logged in", user.username);

    Ok(HttpResponse::Ok().json(TokenPairResponse {
        access_token,
        refresh_token,
        token_type: BEARER.to_string(),
    }))
}

/// Renew access token
///
/// Exchanges a valid refresh token for a new access token. The refresh token
/// itself is not rotated.
#[post("/renew")]
pub async fn renew(
    tokens: web::Data<TokenService>,
    renew_data: web::Json<RenewRequest>,
) -> Result<impl Responder, AppError> {
    let user = tokens.verify_refresh(&renew_data.refresh_token)?;
    let access_token = tokens.issue_access(&user.username)?;
    log::info!("renewed access token for {}", user.username);

    Ok(HttpResponse::Ok().json(AccessTokenResponse {
        access_token,
        token_type: BEARER.to_string(),
    }))
}

/// Current user
///
/// Returns the username and role behind the access token.
#[get("/me")]
pub async fn me(user: CurrentUser) -> impl Responder {
    HttpResponse::Ok().json(user.0.profile())
}
