use rocket::{
    http::{Cookie, CookieJar},
    serde::json::Json,
    Route, State,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::auth::{AdminToken, AUTH_TOKEN_COOKIE};

pub fn routes() -> Vec<Route> {
    routes![login, logout, session]
}

/// Admin credentials as entered in the login form.
#[derive(Debug, Serialize, Deserialize)]
struct AdminCredentials {
    email: String,
    password: String,
}

/// The logged-in admin, as reported to the dashboard.
#[derive(Debug, Serialize, Deserialize)]
struct SessionInfo {
    email: String,
}

#[post("/auth/login", data = "<credentials>", format = "json")]
fn login(
    cookies: &CookieJar<'_>,
    credentials: Json<AdminCredentials>,
    config: &State<Config>,
) -> Result<Json<SessionInfo>> {
    if !config.verify_admin(&credentials.email, &credentials.password) {
        return Err(Error::unauthorized(
            "No admin found with the provided email and password combination.",
        ));
    }

    let token = AdminToken::new(&credentials.email);
    cookies.add(token.into_cookie(config));
    info!("Admin {} logged in", credentials.email);

    Ok(Json(SessionInfo {
        email: credentials.0.email,
    }))
}

#[post("/auth/logout")]
fn logout(cookies: &CookieJar<'_>) {
    cookies.remove(Cookie::named(AUTH_TOKEN_COOKIE));
}

#[get("/auth/session")]
fn session(token: AdminToken) -> Json<SessionInfo> {
    Json(SessionInfo { email: token.email })
}
