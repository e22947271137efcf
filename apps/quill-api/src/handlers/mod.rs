//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod health;
mod posts;
mod search;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/search", web::get().to(search::search))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Post routes
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_published))
                    .route("", web::post().to(posts::create))
                    .route("/all", web::get().to(posts::list_all))
                    .route("/{id:\\d+}", web::get().to(posts::detail_by_id))
                    .route("/{id:\\d+}", web::put().to(posts::update))
                    .route("/{id:\\d+}", web::delete().to(posts::delete))
                    .route("/{id:\\d+}/comments", web::get().to(comments::list))
                    .route("/{id:\\d+}/comments", web::post().to(comments::submit))
                    .route(
                        "/{year}/{month}/{day}/{slug}",
                        web::get().to(posts::detail_by_date_slug),
                    ),
            ),
    );
}
