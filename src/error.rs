use std::collections::HashMap;

use rocket::{http::Status, response::Responder, serde::json::Json, Request};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] mongodb::error::Error),
    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("Invalid submission")]
    Validation(#[from] validator::ValidationErrors),
    #[error("{1}")]
    Status(Status, String),
}

impl Error {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Status(Status::BadRequest, message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Status(Status::Unauthorized, message.into())
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::Status(Status::UnprocessableEntity, message.into())
    }
}

/// JSON body of every error response. User-visible failures carry short
/// actionable strings; internal failures never leak details past the log.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<HashMap<String, Vec<String>>>,
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> rocket::response::Result<'o> {
        match self {
            Self::Status(status, message) => {
                warn!("{} {}: {message}", req.uri(), status.code);
                respond_with(
                    req,
                    status,
                    ErrorBody {
                        message,
                        fields: None,
                    },
                )
            }
            Self::Validation(errors) => {
                let fields: HashMap<String, Vec<String>> = errors
                    .field_errors()
                    .into_iter()
                    .map(|(field, errors)| {
                        let messages = errors
                            .iter()
                            .map(|error| match &error.message {
                                Some(message) => message.to_string(),
                                None => format!("Invalid value for {field}"),
                            })
                            .collect();
                        (field.to_string(), messages)
                    })
                    .collect();
                respond_with(
                    req,
                    Status::UnprocessableEntity,
                    ErrorBody {
                        message: "Invalid submission".to_string(),
                        fields: Some(fields),
                    },
                )
            }
            internal => {
                error!("{} internal error: {internal}", req.uri());
                respond_with(
                    req,
                    Status::InternalServerError,
                    ErrorBody {
                        message: "Something went wrong. Please try again.".to_string(),
                        fields: None,
                    },
                )
            }
        }
    }
}

fn respond_with<'r, 'o: 'r>(
    req: &'r Request<'_>,
    status: Status,
    body: ErrorBody,
) -> rocket::response::Result<'o> {
    let mut response = Json(body).respond_to(req)?;
    response.set_status(status);
    Ok(response)
}
