use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct MessageDoc { pub message: String }

#[derive(ToSchema)]
pub struct ErrorDoc { pub message: String, pub errors: Option<Vec<String>> }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::users::list,
        crate::routes::users::get,
        crate::routes::users::create,
        crate::routes::users::update,
        crate::routes::users::runner,
        crate::routes::users::subscription,
        crate::routes::analytics::latest,
        crate::routes::analytics::history,
        crate::routes::analytics::create,
        crate::routes::analytics::snapshot,
        crate::routes::analytics::job_status,
        crate::routes::analytics::revenue,
        crate::routes::runners::list,
        crate::routes::runners::pending,
        crate::routes::runners::get,
        crate::routes::runners::create,
        crate::routes::runners::update,
        crate::routes::runners::verify,
        crate::routes::jobs::list,
        crate::routes::jobs::recent,
        crate::routes::jobs::get,
        crate::routes::jobs::create,
        crate::routes::jobs::update,
        crate::routes::services::list,
        crate::routes::services::get,
        crate::routes::services::create,
        crate::routes::services::update,
        crate::routes::services::delete,
        crate::routes::subscriptions::list,
        crate::routes::subscriptions::get,
        crate::routes::subscriptions::create,
        crate::routes::subscriptions::update,
        crate::routes::disputes::list,
        crate::routes::disputes::open,
        crate::routes::disputes::get,
        crate::routes::disputes::create,
        crate::routes::disputes::update,
    ),
    components(schemas(HealthResponse, LoginRequest, MessageDoc, ErrorDoc)),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "users"),
        (name = "analytics"),
        (name = "runners"),
        (name = "jobs"),
        (name = "services"),
        (name = "subscriptions"),
        (name = "disputes")
    )
)]
pub struct ApiDoc;
