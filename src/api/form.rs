use crate::api::error::AppError;
use crate::models::{ComplaintChanges, NewComplaint, Upload};
use crate::utils::validation::parse_optional_id;
use axum::{
    Form, Json, async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use serde_json::Value;
use std::collections::HashMap;

/// Multipart field name carrying the complaint attachment.
pub const ATTACHMENT_FIELD: &str = "attachment";

/// Complaint payload taken from multipart, JSON or urlencoded bodies.
///
/// Text fields are kept as raw strings until the handler decides which of
/// them it accepts.
#[derive(Debug, Default)]
pub struct ComplaintForm {
    fields: HashMap<String, String>,
    upload: Option<Upload>,
}

#[async_trait]
impl<S> FromRequest<S> for ComplaintForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Self::from_multipart(multipart).await
        } else if content_type.starts_with("application/json") {
            let Json(body) = Json::<serde_json::Map<String, Value>>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(Self::from_json(body))
        } else if content_type.is_empty() {
            Ok(Self::default())
        } else {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(Self {
                fields,
                upload: None,
            })
        }
    }
}

impl ComplaintForm {
    async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();

            match field.file_name().map(str::to_owned) {
                Some(file_name) => {
                    if name != ATTACHMENT_FIELD {
                        tracing::debug!("Ignoring unexpected file field '{}'", name);
                        continue;
                    }
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    // Browsers submit an empty part for an untouched file input
                    if file_name.is_empty() && data.is_empty() {
                        continue;
                    }
                    form.upload = Some(Upload {
                        field_name: name,
                        file_name,
                        data,
                    });
                }
                None => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    fn from_json(body: serde_json::Map<String, Value>) -> Self {
        let fields = body
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::Null => None,
                Value::String(s) => Some((key, s)),
                other => Some((key, other.to_string())),
            })
            .collect();

        Self {
            fields,
            upload: None,
        }
    }

    #[cfg(test)]
    fn with_fields(fields: &[(&str, &str)]) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            upload: None,
        }
    }

    fn take(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    fn required(&mut self, name: &str) -> Result<String, AppError> {
        self.take(name)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::BadRequest(format!("Missing required field: {}", name)))
    }

    pub fn into_new_complaint(mut self) -> Result<(NewComplaint, Option<Upload>), AppError> {
        let complaint = NewComplaint {
            subject: self.required("subject")?,
            description: self.required("description")?,
            status: self.required("status")?,
            complaint_type: self.required("type")?,
            priority: self.take("priority").filter(|v| !v.trim().is_empty()),
            user_id: parse_optional_id("user_id", self.take("user_id"))?,
        };
        Ok((complaint, self.upload))
    }

    /// Fields an admin may edit: priority is not among them.
    pub fn into_admin_changes(self) -> (ComplaintChanges, Option<Upload>) {
        self.into_changes(false)
    }

    pub fn into_owner_changes(self) -> (ComplaintChanges, Option<Upload>) {
        self.into_changes(true)
    }

    fn into_changes(mut self, with_priority: bool) -> (ComplaintChanges, Option<Upload>) {
        let changes = ComplaintChanges {
            subject: self.take("subject"),
            description: self.take("description"),
            status: self.take("status"),
            complaint_type: self.take("type"),
            priority: if with_priority {
                self.take("priority")
            } else {
                None
            },
        };
        (changes, self.upload)
    }
}
