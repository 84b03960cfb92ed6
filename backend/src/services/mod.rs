//! Module for core business logic services.

use validator::Validate;

use crate::errors::{ServiceError, ServiceResult};

pub mod user_service;

/// Formats `validator` failures into a single validation error.
pub(crate) fn validate_request<T: Validate>(request: &T) -> ServiceResult<()> {
    if let Err(validation_errors) = request.validate() {
        let messages: Vec<String> = validation_errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    format!(
                        "{}: {}",
                        field,
                        error.message.as_ref().unwrap_or(&"Invalid value".into())
                    )
                })
            })
            .collect();

        return Err(ServiceError::validation(messages.join(", ")));
    }

    Ok(())
}
