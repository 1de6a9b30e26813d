//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::NormalizePath;
use actix_web::{App, HttpServer, web};

use effortee::Trace;
#[cfg(debug_assertions)]
use effortee::doc::ApiDoc;
use effortee::inbound::http::auth::ApiToken;
use effortee::inbound::http::error::{json_error_handler, not_found, query_error_handler};
use effortee::inbound::http::health::{HealthState, health, live, ready};
use effortee::inbound::http::quests::{
    create_quest, delete_quest, get_quest, list_quests, quest_stats, update_quest,
};
use effortee::inbound::http::state::HttpState;
use effortee::inbound::http::users::{get_user, list_users};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    api_token: web::Data<ApiToken>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        api_token,
    } = deps;

    // `/stats` must be registered ahead of `/{id}`.
    let quests = web::scope("/v1/quest")
        .service(create_quest)
        .service(list_quests)
        .service(quest_stats)
        .service(get_quest)
        .service(update_quest)
        .service(delete_quest);

    let users = web::scope("/v1/users")
        .service(list_users)
        .service(get_user);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(api_token)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .wrap(NormalizePath::trim())
        .wrap(Cors::permissive())
        .wrap(Trace)
        .service(quests)
        .service(users)
        .service(health)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.default_service(web::to(not_found))
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is bound.
/// - `config`: pre-built [`ServerConfig`] holding the bearer token, bind
///   address and optional MongoDB handle.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let ServerConfig {
        api_token,
        bind_addr,
        store: _,
    } = config;
    let api_token = web::Data::new(api_token);

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            api_token: api_token.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
