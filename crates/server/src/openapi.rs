use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ContactFormDoc { pub name: String, pub email: String, pub message: String }

#[derive(ToSchema)]
pub struct ForgotPasswordDoc { pub email: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequestDoc { pub purchase_history: String, pub category: String }

#[derive(ToSchema)]
pub struct SuggestionResponseDoc { pub suggestions: Vec<String> }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::public::services,
        crate::routes::public::contact,
        crate::routes::public::forgot_password,
        crate::routes::public::suggestions,
    ),
    components(
        schemas(
            HealthResponse,
            ContactFormDoc,
            ForgotPasswordDoc,
            SuggestionRequestDoc,
            SuggestionResponseDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "public")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_public_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/health", "/api/services", "/api/contact", "/api/forgot-password", "/api/suggestions"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        // every registered tag is used by at least one path
        let used: Vec<String> = doc
            .paths
            .paths
            .values()
            .flat_map(|item| item.operations.values())
            .flat_map(|op| op.tags.clone().unwrap_or_default())
            .collect();
        for tag in doc.tags.clone().unwrap_or_default() {
            assert!(used.contains(&tag.name), "unused tag {}", tag.name);
        }
        let schemas = doc.components.as_ref().map(|c| c.schemas.len()).unwrap_or_default();
        assert_eq!(schemas, 5);
    }
}
