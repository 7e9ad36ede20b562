//! Asset ingestion: validate and normalize submitted fields into an `Asset`
//!
//! Checks run in a fixed order and the first failure wins:
//! 1. name, mimetype and a content source (URI or upload) must be present
//! 2. web assets cannot be uploaded
//! 3. URI and upload are mutually exclusive
//! 4. a URI must be http(s) with a host and answer 200
//! 5. an upload is written to the asset folder under its content id
//!
//! Duration and dates are normalized afterwards.

pub mod probe;
pub mod storage;
pub mod uri;

pub use probe::{HttpProbe, ProbeMethod, RemoteProbe};
pub use storage::AssetStorage;
pub use uri::validate_uri;

use signage_common::db::models::{Asset, MimeFlags, DURATION_NOT_APPLICABLE};
use signage_common::fingerprint::{remote_asset_id, upload_asset_id};
use signage_common::time::parse_iso_input;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Why a submission was rejected
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Not enough information provided. Please specify 'name', 'uri', and 'mimetype'.")]
    MissingFields,

    #[error("Invalid combination. Can't upload a web resource.")]
    WebUpload,

    #[error("Invalid combination. Can't select both URI and a file.")]
    ConflictingSources,

    #[error("Invalid URL. Failed to add asset.")]
    InvalidUri,

    #[error("Could not retrieve file. Check the asset URL.")]
    Unreachable,

    #[error("Invalid {field} '{value}'. Expected YYYY-MM-DDTHH:MM:SS.")]
    InvalidDate { field: &'static str, value: String },
}

impl ValidationError {
    /// Stable machine-readable reason
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingFields => "missing_fields",
            ValidationError::WebUpload => "web_upload",
            ValidationError::ConflictingSources => "conflicting_sources",
            ValidationError::InvalidUri => "invalid_uri",
            ValidationError::Unreachable => "unreachable",
            ValidationError::InvalidDate { .. } => "invalid_date",
        }
    }
}

/// Failure of an ingestion step
#[derive(Debug, Error)]
pub enum IngestError {
    /// The submission broke one of the ingestion rules
    #[error(transparent)]
    Rejected(#[from] ValidationError),

    /// The upload could not be written
    #[error(transparent)]
    Store(#[from] signage_common::Error),
}

impl IngestError {
    pub fn code(&self) -> &'static str {
        match self {
            IngestError::Rejected(e) => e.code(),
            IngestError::Store(_) => "store",
        }
    }
}

/// An uploaded file as received from the client
#[derive(Debug, Clone, Default)]
pub struct Upload {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Browsers send an empty, nameless part when no file was chosen
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty() && self.file_name.as_deref().map_or(true, str::is_empty)
    }
}

/// Raw asset fields, trimmed, with empty values treated as absent
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub name: Option<String>,
    pub uri: Option<String>,
    pub mimetype: Option<String>,
    pub duration: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub file: Option<Upload>,
}

impl Submission {
    pub fn from_fields(fields: &HashMap<String, String>, file: Option<Upload>) -> Self {
        Self {
            name: field(fields, "name"),
            uri: field(fields, "uri"),
            mimetype: field(fields, "mimetype"),
            duration: field(fields, "duration"),
            start_date: field(fields, "start_date"),
            end_date: field(fields, "end_date"),
            file: file.filter(|upload| !upload.is_empty()),
        }
    }
}

/// Trimmed, non-empty value of a form field
pub fn field(fields: &HashMap<String, String>, key: &str) -> Option<String> {
    fields
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Where an asset's content lives once its source is accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub asset_id: String,
    pub uri: String,
}

/// Validate the content source and derive the asset id
///
/// Shared by the API and the legacy add form. For a URI the remote
/// resource is checked; for an upload the bytes are written to storage.
pub async fn resolve_source(
    name: &str,
    mimetype: &str,
    uri: Option<&str>,
    file: Option<&Upload>,
    probe: &dyn RemoteProbe,
    storage: &AssetStorage,
) -> Result<ResolvedSource, IngestError> {
    let flags = MimeFlags::of(mimetype);

    if file.is_some() && flags.web {
        return Err(ValidationError::WebUpload.into());
    }

    match (uri, file) {
        (Some(_), Some(_)) => Err(ValidationError::ConflictingSources.into()),
        (Some(uri), None) => {
            if !validate_uri(uri) {
                return Err(ValidationError::InvalidUri.into());
            }

            let method = if flags.image {
                ProbeMethod::Get
            } else {
                ProbeMethod::Head
            };

            match probe.status(uri, method).await {
                Ok(200) => Ok(ResolvedSource {
                    asset_id: remote_asset_id(name, uri),
                    uri: uri.to_string(),
                }),
                Ok(status) => {
                    warn!("Remote asset {} answered {}", uri, status);
                    Err(ValidationError::Unreachable.into())
                }
                Err(e) => {
                    warn!("Remote asset {} could not be fetched: {}", uri, e);
                    Err(ValidationError::Unreachable.into())
                }
            }
        }
        (None, Some(upload)) => {
            let asset_id = upload_asset_id(&upload.bytes);
            let path = storage
                .store(&asset_id, &upload.bytes)
                .await
                .map_err(signage_common::Error::from)?;
            Ok(ResolvedSource {
                asset_id,
                uri: path.to_string_lossy().into_owned(),
            })
        }
        (None, None) => Err(ValidationError::MissingFields.into()),
    }
}

/// Turn a submission into an asset ready for insertion
///
/// The caller persists the returned record.
pub async fn prepare_asset(
    submission: &Submission,
    probe: &dyn RemoteProbe,
    storage: &AssetStorage,
) -> Result<Asset, IngestError> {
    let (Some(name), Some(mimetype)) = (&submission.name, &submission.mimetype) else {
        return Err(ValidationError::MissingFields.into());
    };
    if submission.uri.is_none() && submission.file.is_none() {
        return Err(ValidationError::MissingFields.into());
    }

    let source = resolve_source(
        name,
        mimetype,
        submission.uri.as_deref(),
        submission.file.as_ref(),
        probe,
        storage,
    )
    .await?;

    let mut duration = None;
    if MimeFlags::of(mimetype).video {
        duration = Some(DURATION_NOT_APPLICABLE.to_string());
    }
    // Applied after the video default, so a supplied value replaces "N/A"
    if let Some(supplied) = &submission.duration {
        duration = Some(supplied.clone());
    }

    let start_date = parse_optional_date("start_date", submission.start_date.as_deref())?;
    let end_date = parse_optional_date("end_date", submission.end_date.as_deref())?;

    debug!("Prepared asset {} ({})", source.asset_id, name);

    Ok(Asset {
        asset_id: source.asset_id,
        name: name.clone(),
        uri: source.uri,
        start_date,
        end_date,
        duration,
        mimetype: mimetype.clone(),
    })
}

fn parse_optional_date(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<chrono::NaiveDateTime>, ValidationError> {
    value
        .map(|v| {
            parse_iso_input(v).map_err(|_| ValidationError::InvalidDate {
                field,
                value: v.to_string(),
            })
        })
        .transpose()
}
