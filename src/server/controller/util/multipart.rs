use std::{collections::HashMap, str::FromStr};

use axum::extract::Multipart;
use serde::de::DeserializeOwned;

use crate::server::{
    error::{domain::DomainError, Error},
    router::MAX_FILES_PER_REQUEST,
    service::media::UploadedFile,
};

/// Content type assumed for file parts sent without one
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A multipart body split into text fields and the file parts of `file_field`
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    pub files: Vec<UploadedFile>,
}

impl MultipartForm {
    /// Reads every part of the body, parts named `file_field` are collected as files.
    ///
    /// # Returns
    /// - `Ok(MultipartForm)` - Text fields by name and files in the order they were sent
    /// - `Err(Error::MultipartError)` - The body is not valid multipart or exceeds the body limit
    /// - `Err(DomainError::Validation)` - More than [`MAX_FILES_PER_REQUEST`] files were sent
    pub async fn read(mut multipart: Multipart, file_field: &str) -> Result<Self, Error> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == file_field {
                if form.files.len() == MAX_FILES_PER_REQUEST {
                    return Err(DomainError::validation(format!(
                        "{}: at most {} files per request",
                        file_field, MAX_FILES_PER_REQUEST
                    ))
                    .into());
                }

                let file_name = field.file_name().map(str::to_string);
                let content_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_CONTENT_TYPE)
                    .to_string();
                let bytes = field.bytes().await?.to_vec();

                form.files.push(UploadedFile {
                    file_name,
                    content_type,
                    bytes,
                });
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    fn required(&self, name: &str) -> Result<&str, Error> {
        self.fields
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| DomainError::validation(format!("{}: field is required", name)).into())
    }

    /// Parses a required text field
    pub fn parse<T>(&self, name: &str) -> Result<T, Error>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.required(name)?.parse::<T>().map_err(|e| {
            DomainError::validation(format!("{}: {}", name, e)).into()
        })
    }

    /// Deserializes a required field holding JSON
    pub fn json<T: DeserializeOwned>(&self, name: &str) -> Result<T, Error> {
        serde_json::from_str(self.required(name)?)
            .map_err(|e| DomainError::validation(format!("{}: {}", name, e)).into())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde::Deserialize;

    use super::MultipartForm;
    use crate::{
        model::media::MediaOwnerType,
        server::error::{domain::DomainError, Error},
    };

    fn form(fields: &[(&str, &str)]) -> MultipartForm {
        MultipartForm {
            fields: fields
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect::<HashMap<_, _>>(),
            files: Vec::new(),
        }
    }

    /// Expect typed values for well formed fields
    #[test]
    fn parses_text_fields() {
        let form = form(&[("owner_type", "booking"), ("owner_id", " 12 ")]);

        assert_eq!(
            form.parse::<MediaOwnerType>("owner_type").unwrap(),
            MediaOwnerType::Booking
        );
        assert_eq!(form.parse::<i32>("owner_id").unwrap(), 12);
    }

    /// Expect Validation naming the field when it is missing or malformed
    #[test]
    fn rejects_missing_and_malformed_fields() {
        let form = form(&[("owner_id", "twelve")]);

        assert!(matches!(
            form.parse::<MediaOwnerType>("owner_type"),
            Err(Error::DomainError(DomainError::Validation(msg))) if msg.starts_with("owner_type")
        ));
        assert!(matches!(
            form.parse::<i32>("owner_id"),
            Err(Error::DomainError(DomainError::Validation(msg))) if msg.starts_with("owner_id")
        ));
    }

    #[test]
    fn deserializes_json_field() {
        #[derive(Deserialize)]
        struct Named {
            name: String,
        }

        let form = form(&[("property", r#"{"name":"Loft"}"#)]);

        assert_eq!(form.json::<Named>("property").unwrap().name, "Loft");
        assert!(form.json::<Named>("missing").is_err());
    }
}
