//! Create user handler

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    domain::{
        communication::{campaigns::CampaignService, email_addresses::EmailAddress},
        users::{NewUser, Role, UserService},
    },
    infrastructure::http::{errors::ApiError, state::AppState},
};

/// Create user request body
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateUserBody {
    /// The new member's email address
    #[schema(example = "email@example.com")]
    email: String,

    /// The new member's display name
    #[schema(example = "Grace Hopper")]
    name: String,

    /// The new member's role: `student`, `alumni`, `donor` or `admin`
    #[schema(example = "alumni")]
    role: String,
}

impl TryFrom<CreateUserBody> for NewUser {
    type Error = ApiError;

    fn try_from(body: CreateUserBody) -> Result<Self, Self::Error> {
        if body.name.trim().is_empty() {
            return Err(ApiError::new_422("Please provide a name"));
        }

        Ok(Self::new(
            Uuid::now_v7(),
            EmailAddress::new(&body.email)?,
            &body.name,
            body.role.parse::<Role>()?,
        ))
    }
}

/// Create user response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateUserResponse {
    id: Uuid,

    #[schema(example = "email@example.com")]
    email: String,
}

/// Create a new member
#[utoipa::path(
    post,
    operation_id = "create_user",
    tag = "Users",
    path = "/api/v1/users",
    request_body = CreateUserBody,
    responses(
        (status = StatusCode::CREATED, description = "User created", body = CreateUserResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Unprocessable entity", body = ErrorResponse),
        (status = StatusCode::CONFLICT, description = "User already exists", body = ErrorResponse, example = json!({"error": "User with email \"email@example.com\" already exists"})),
    )
)]
pub async fn handler<U: UserService, C: CampaignService>(
    State(state): State<AppState<U, C>>,
    request: Result<Json<CreateUserBody>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateUserResponse>), ApiError> {
    let Json(request) = request?;

    let new_user: NewUser = request.try_into()?;

    let id = state.users.create_user(&new_user).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            id,
            email: new_user.email().to_string(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::{
        domain::{
            communication::email_addresses::EmailAddress,
            users::{errors::CreateUserError, tests::MockUserService, Role},
        },
        infrastructure::http::{
            errors::ErrorResponse,
            handlers::v1::users::create_user::{CreateUserBody, CreateUserResponse},
            router,
            state::tests::test_state,
        },
    };

    impl CreateUserBody {
        fn new(email: &str, name: &str, role: &str) -> Self {
            Self {
                email: email.to_string(),
                name: name.to_string(),
                role: role.to_string(),
            }
        }
    }

    #[tokio::test]
    async fn test_create_user_success() -> TestResult {
        let mut user_service = MockUserService::new();
        let user_id = Uuid::now_v7();

        let email = EmailAddress::new("Grad@Example.com")?;

        user_service
            .expect_create_user()
            .withf(move |user| {
                user.email() == &email && user.name() == "Grace Hopper" && user.role() == Role::Alumni
            })
            .returning(move |_| Ok(user_id));

        let state = test_state(Some(user_service), None);

        let response = TestServer::new(router(state)?)?
            .post("/api/v1/users")
            .json(&CreateUserBody::new(
                "Grad@Example.com",
                " Grace Hopper ",
                "Alumni",
            ))
            .await;

        let json = response.json::<CreateUserResponse>();

        assert_eq!(response.status_code(), StatusCode::CREATED);
        assert_eq!(json.id, user_id);
        assert_eq!(json.email, "grad@example.com");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_user_email_error() -> TestResult {
        let state = test_state(None, None);

        let response = TestServer::new(router(state)?)?
            .post("/api/v1/users")
            .json(&CreateUserBody::new("not an email", "Grace Hopper", "alumni"))
            .await;

        let json = response.json::<ErrorResponse>();

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json.error, "Please provide a valid email address");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_user_empty_name() -> TestResult {
        let state = test_state(None, None);

        let response = TestServer::new(router(state)?)?
            .post("/api/v1/users")
            .json(&CreateUserBody::new("email@example.com", "  ", "student"))
            .await;

        let json = response.json::<ErrorResponse>();

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json.error, "Please provide a name");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_user_unknown_role() -> TestResult {
        let state = test_state(None, None);

        let response = TestServer::new(router(state)?)?
            .post("/api/v1/users")
            .json(&CreateUserBody::new("email@example.com", "Ada", "faculty"))
            .await;

        let json = response.json::<ErrorResponse>();

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(json.error.starts_with("Unknown role \"faculty\""));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_user_duplicate_user() -> TestResult {
        let mut users = MockUserService::new();

        users.expect_create_user().returning(|_| {
            Err(CreateUserError::DuplicateUser {
                email: EmailAddress::new("email@example.com").expect("valid email"),
            })
        });

        let state = test_state(Some(users), None);

        let response = TestServer::new(router(state)?)?
            .post("/api/v1/users")
            .json(&CreateUserBody::new("email@example.com", "Ada", "donor"))
            .await;

        let json = response.json::<ErrorResponse>();

        assert_eq!(response.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            json.error,
            "User with email \"email@example.com\" already exists"
        );

        Ok(())
    }
}
