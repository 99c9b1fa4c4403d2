use crate::{
    auth::{
        generate_token, hash_password, verify_password, AuthResponse, LoginRequest, SignupRequest,
    },
    config::Config,
    error::AppError,
    models::User,
    storage::Store,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Sign up a new user
///
/// Creates a new account and returns an authentication token. Fails when the
/// email is already taken (case-sensitive exact match).
#[post("/signup")]
pub async fn signup(
    store: web::Data<Store>,
    config: web::Data<Config>,
    signup_data: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    signup_data.validate()?;
    let signup_data = signup_data.into_inner();

    // Hashing is slow on purpose, so it happens outside the store lock. The
    // duplicate check lives inside the critical section with the insert.
    let password_hash = hash_password(&signup_data.password)?;

    let user_id = store.update(|doc| {
        if doc.find_user_by_email(&signup_data.email).is_some() {
            return Err(AppError::Conflict("User already exists".into()));
        }
        let id = doc.allocate_user_id();
        doc.users.push(User::new(
            id.clone(),
            signup_data.email.clone(),
            password_hash.clone(),
        ));
        Ok(id)
    })?;

    let token = generate_token(&user_id, &config.jwt_secret)?;

    Ok(HttpResponse::Created().json(AuthResponse { token, user_id }))
}

/// Login user
///
/// Authenticates a user and returns a fresh authentication token. No rate
/// limiting or lockout: repeated failed attempts are unconstrained.
#[post("/login")]
pub async fn login(
    store: web::Data<Store>,
    config: web::Data<Config>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    login_data.validate()?;

    let doc = store.read()?;

    match doc.find_user_by_email(&login_data.email) {
        Some(user) if verify_password(&login_data.password, &user.password_hash) => {
            let token = generate_token(&user.id, &config.jwt_secret)?;
            Ok(HttpResponse::Ok().json(AuthResponse {
                token,
                user_id: user.id.clone(),
            }))
        }
        _ => Err(AppError::Unauthorized("Invalid credentials".into())),
    }
}
