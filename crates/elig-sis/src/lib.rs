//! Campus records gateway client
//!
//! Implements [`RecordSource`] over the campus gateway: enrollment
//! history from the v3 enrollments API and the profile snapshot from the
//! v2 students API. Responses decode through [`dto`] into the
//! `elig-core` record types.

pub mod dto;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use elig_core::{CoreError, CoreResult, EnrollmentHistory, RecordSource, StudentProfile};

#[derive(Error, Debug)]
pub enum SisError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {code} from {url}")]
    Status { code: u16, url: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type SisResult<T> = Result<T, SisError>;

/// Gateway endpoints and credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SisConfig {
    pub base_url: String,

    /// Credentials for the enrollments API
    pub enrollment_app_id: String,
    pub enrollment_app_key: String,

    /// Credentials for the students API
    pub student_app_id: String,
    pub student_app_key: String,

    /// Request timeout (seconds)
    pub timeout_secs: u64,
}

impl SisConfig {
    /// Read the configuration from the environment. The four credential
    /// variables are required; `SIS_BASE_URL` overrides the production
    /// gateway.
    pub fn from_env() -> SisResult<Self> {
        Ok(Self {
            base_url: std::env::var("SIS_BASE_URL")
                .unwrap_or_else(|_| "https://gateway.api.berkeley.edu".to_string()),
            enrollment_app_id: required("APP_ID_ENROLLMENT")?,
            enrollment_app_key: required("APP_KEY_ENROLLMENT")?,
            student_app_id: required("APP_ID_STUDENT")?,
            student_app_key: required("APP_KEY_STUDENT")?,
            timeout_secs: 30,
        })
    }
}

fn required(name: &str) -> SisResult<String> {
    std::env::var(name).map_err(|_| SisError::Config(format!("{name} is not set")))
}

/// Gateway client, usable wherever a [`RecordSource`] is expected
pub struct SisClient {
    config: SisConfig,
    client: reqwest::Client,
}

impl SisClient {
    pub fn new(config: SisConfig) -> SisResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Enrollment history for one student: attempts grouped by cleaned
    /// course name, capped at the three most recent per course.
    pub async fn enrollments(&self, sid: &str) -> SisResult<EnrollmentHistory> {
        let url = format!(
            "{}/sis/v3/enrollments/students/{sid}?primary-only=true&enrolled-only=true",
            self.config.base_url
        );
        let envelope: dto::EnrollmentEnvelope = self
            .fetch(
                &url,
                &self.config.enrollment_app_id,
                &self.config.enrollment_app_key,
            )
            .await?;
        Ok(envelope.into_history())
    }

    /// Profile snapshot from the student's undergraduate career row
    pub async fn student(&self, sid: &str) -> SisResult<StudentProfile> {
        let url = format!(
            "{}/sis/v2/students/{sid}?id-type=student-id&inc-acad=true&inc-cntc=false\
             &inc-regs=false&inc-attr=false&inc-dmgr=false&inc-work=false&inc-dob=false\
             &inc-gndr=false&affiliation-status=ALL&inc-completed-programs=true\
             &inc-inactive-programs=true",
            self.config.base_url
        );
        let envelope: dto::StudentEnvelope = self
            .fetch(
                &url,
                &self.config.student_app_id,
                &self.config.student_app_key,
            )
            .await?;
        Ok(envelope.into_profile())
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        app_id: &str,
        app_key: &str,
    ) -> SisResult<T> {
        debug!(%url, "fetching from gateway");
        let response = self
            .client
            .get(url)
            .header("accept", "application/json")
            .header("app_id", app_id)
            .header("app_key", app_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SisError::Status {
                code: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|err| SisError::Decode(err.to_string()))
    }
}

#[async_trait]
impl RecordSource for SisClient {
    async fn enrollment_history(&self, sid: &str) -> CoreResult<EnrollmentHistory> {
        self.enrollments(sid)
            .await
            .map_err(|err| CoreError::Lookup(err.to_string()))
    }

    async fn student_profile(&self, sid: &str) -> CoreResult<StudentProfile> {
        self.student(sid)
            .await
            .map_err(|err| CoreError::Lookup(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SisConfig {
        SisConfig {
            base_url: "https://gateway.example.edu".to_string(),
            enrollment_app_id: "id-e".to_string(),
            enrollment_app_key: "key-e".to_string(),
            student_app_id: "id-s".to_string(),
            student_app_key: "key-s".to_string(),
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_client_builds_from_config() {
        let client = SisClient::new(config());
        assert!(client.is_ok());
    }

    #[test]
    fn test_config_from_env() {
        // single test so the credential variables are not raced
        std::env::remove_var("SIS_BASE_URL");
        std::env::remove_var("APP_ID_ENROLLMENT");
        std::env::remove_var("APP_KEY_ENROLLMENT");
        std::env::remove_var("APP_ID_STUDENT");
        std::env::remove_var("APP_KEY_STUDENT");
        let err = SisConfig::from_env().unwrap_err();
        assert!(matches!(err, SisError::Config(_)));

        std::env::set_var("APP_ID_ENROLLMENT", "id-e");
        std::env::set_var("APP_KEY_ENROLLMENT", "key-e");
        std::env::set_var("APP_ID_STUDENT", "id-s");
        std::env::set_var("APP_KEY_STUDENT", "key-s");
        let config = SisConfig::from_env().unwrap();
        assert_eq!(config.base_url, "https://gateway.api.berkeley.edu");
        assert_eq!(config.enrollment_app_id, "id-e");
        assert_eq!(config.student_app_key, "key-s");
        assert_eq!(config.timeout_secs, 30);
    }
}
