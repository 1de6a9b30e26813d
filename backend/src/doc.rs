//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every quest, user and health handler together with
//! the envelope schemas and the bearer security scheme. The document backs
//! Swagger UI in debug builds and is exported by `openapi-dump`.

use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::health::{HealthReport, StoreStatus};
use crate::inbound::http::quests_dto::{
    DeleteQuestEnvelope, QuestEnvelope, QuestFieldsRequest, QuestListEnvelope,
    QuestMessageEnvelope, QuestResponse, QuestStatsEnvelope, QuestStatsResponse,
};
use crate::inbound::http::schemas::ErrorCodeSchema;
use crate::inbound::http::users::{UserEnvelope, UserListEnvelope, UserResponse};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the bearer security scheme in the generated document.
pub const BEARER_SCHEME: &str = "BearerToken";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        let mut scheme = Http::new(HttpAuthScheme::Bearer);
        scheme.description = Some("Static API token configured via EFFORTEE_API_TOKEN.".into());
        components.add_security_scheme(BEARER_SCHEME, SecurityScheme::Http(scheme));
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Effortee backend API",
        description = "Study quest tracking: quest CRUD, statistics and user lookup."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::quests::create_quest,
        crate::inbound::http::quests::list_quests,
        crate::inbound::http::quests::quest_stats,
        crate::inbound::http::quests::get_quest,
        crate::inbound::http::quests::update_quest,
        crate::inbound::http::quests::delete_quest,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::health::health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorEnvelope,
        ErrorCodeSchema,
        QuestFieldsRequest,
        QuestResponse,
        QuestEnvelope,
        QuestMessageEnvelope,
        QuestListEnvelope,
        QuestStatsResponse,
        QuestStatsEnvelope,
        DeleteQuestEnvelope,
        UserResponse,
        UserEnvelope,
        UserListEnvelope,
        HealthReport,
        StoreStatus,
    )),
    tags(
        (name = "quests", description = "Study quest lifecycle and statistics"),
        (name = "users", description = "Read-only user profiles"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated OpenAPI document.

    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("/v1/quest/")]
    #[case("/v1/quest/stats")]
    #[case("/v1/quest/{id}")]
    #[case("/v1/users/")]
    #[case("/v1/users/{id}")]
    #[case("/health")]
    #[case("/health/ready")]
    fn documents_every_route(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[test]
    fn quest_schema_exposes_storage_identity() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let quest = schemas.get("QuestResponse").expect("QuestResponse schema");
        assert_object_schema_has_field(quest, "_id");
        assert_object_schema_has_field(quest, "suggested_minutes");
    }

    #[test]
    fn error_envelope_uses_camel_case_trace_id() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let envelope = schemas.get("ErrorEnvelope").expect("ErrorEnvelope schema");
        assert_object_schema_has_field(envelope, "traceId");
        assert_object_schema_has_field(envelope, "error");
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key(BEARER_SCHEME));
    }
}
