//! HTTP handlers and route configuration.

mod comments;
mod health;
#[cfg(feature = "metrics")]
mod metrics;
mod sessions;
mod users;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/healthcheck", web::get().to(health::healthcheck));

    #[cfg(feature = "metrics")]
    cfg.route("/metrics", web::get().to(metrics::metrics));

    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .route("/users", web::post().to(users::create_user))
            .service(
                web::resource("/sessions")
                    .route(web::post().to(sessions::create_session))
                    .route(web::get().to(sessions::get_sessions))
                    .route(web::delete().to(sessions::delete_session)),
            )
            .route("/comments", web::post().to(comments::create_comment))
            // Listing reads the segment as a post slug, mutations as a comment ID.
            .service(
                web::resource("/comments/{key}")
                    .route(web::get().to(comments::get_comments))
                    .route(web::put().to(comments::update_comment))
                    .route(web::delete().to(comments::delete_comment)),
            ),
    );
}
