use rocket::Route;

mod admin;
mod auth;
mod public;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(public::routes());
    routes.extend(auth::routes());
    routes.extend(admin::routes());
    routes
}
