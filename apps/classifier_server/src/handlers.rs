//! HTTP request handlers

use actix_multipart::Multipart;
use actix_web::http::{header::ContentType, StatusCode};
use actix_web::{rt::time::timeout, web, HttpResponse};
use classifier::{InferenceError, LoaderStatus};
use futures_util::TryStreamExt;
use runner_core::Runner;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{Result, ServerError};
use crate::page::{self, View, ACCEPTED_EXTENSIONS};
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub backend: String,
    pub input_shape: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Landing page. Resolves the model first so a failed load halts the session.
pub async fn index<R: Runner + 'static>(data: web::Data<AppState<R>>) -> Result<HttpResponse> {
    ensure_model(&data).await?;
    Ok(html(page::render(&View::Prompt)))
}

/// Classify the image posted in the `file` field and render the result.
pub async fn classify<R: Runner + 'static>(
    data: web::Data<AppState<R>>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    ensure_model(&data).await?;

    let bytes = read_upload(&mut payload, data.config.max_upload_bytes).await?;

    let pipeline = data.pipeline.clone();
    let job = web::block(move || pipeline.run(bytes));
    let classification = match timeout(data.config.inference_timeout(), job).await {
        Ok(outcome) => outcome??,
        Err(_) => {
            warn!(
                timeout_secs = data.config.inference_timeout_secs,
                stage = "inference",
                "Inference timed out, abandoning the blocking job"
            );
            return Err(InferenceError::Timeout(data.config.inference_timeout_secs).into());
        }
    };

    Ok(html(page::render(&View::Result(&classification))))
}

pub async fn health<R: Runner + 'static>(data: web::Data<AppState<R>>) -> HttpResponse {
    let pipeline = &data.pipeline;
    let (status, code, error) = match pipeline.loader_status() {
        LoaderStatus::Ready => ("healthy", StatusCode::OK, None),
        LoaderStatus::Unloaded => ("loading", StatusCode::OK, None),
        LoaderStatus::Failed(e) => ("failed", StatusCode::SERVICE_UNAVAILABLE, Some(e)),
    };

    let (model, backend) = match pipeline.model_info() {
        Some(info) => (info.name, info.backend),
        None => (data.config.model_path.clone(), "unavailable".to_string()),
    };

    HttpResponse::build(code).json(HealthResponse {
        status: status.to_string(),
        model,
        backend,
        input_shape: pipeline.runner_config().input_shape.clone(),
        error,
    })
}

/// Replay the session up to `Ready`; a failed load refuses the request.
async fn ensure_model<R: Runner + 'static>(data: &web::Data<AppState<R>>) -> Result<()> {
    let pipeline = data.pipeline.clone();
    let state = web::block(move || pipeline.session_state()).await?;
    if state.accepts_upload() {
        return Ok(());
    }

    match data.pipeline.warm_up() {
        Err(e) => Err(e.into()),
        Ok(_) => Err(ServerError::Internal(format!(
            "session cannot accept uploads in state {state}"
        ))),
    }
}

async fn read_upload(payload: &mut Multipart, limit: usize) -> Result<Vec<u8>> {
    while let Some(mut field) = payload.try_next().await? {
        if field.name() != Some("file") {
            while field.try_next().await?.is_some() {}
            continue;
        }

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or_default()
            .to_string();
        check_extension(&file_name)?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            if bytes.len() + chunk.len() > limit {
                return Err(ServerError::PayloadTooLarge { limit });
            }
            bytes.extend_from_slice(&chunk);
        }

        info!(file = %file_name, bytes = bytes.len(), "Received upload");
        return Ok(bytes);
    }

    Err(ServerError::BadRequest("no file uploaded".to_string()))
}

/// Uploads without a file name are accepted; the decoder sniffs the format.
fn check_extension(file_name: &str) -> Result<()> {
    let Some((_, ext)) = file_name.rsplit_once('.') else {
        return Ok(());
    };
    let ext = ext.to_ascii_lowercase();
    if ACCEPTED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(ServerError::BadRequest(format!(
            "unsupported file type .{ext}; upload a JPG, JPEG or PNG image"
        )))
    }
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok().content_type(ContentType::html()).body(body)
}
