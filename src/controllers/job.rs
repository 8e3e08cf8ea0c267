use axum::{
    body::{Body, Bytes},
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Json,
};
use futures::{future, stream, StreamExt};
use std::sync::Arc;

use crate::{
    domain::{
        document::SourceDocument,
        job::{JobCreationResponse, JobId, JobStatusResponse},
        pipeline::{PipelineService, PipelineServiceApi},
    },
    error::{AppError, AppResult},
    infrastructure::storage::AudioStorage,
};

pub struct JobController {
    pipeline_service: Arc<PipelineService>,
    storage: Arc<AudioStorage>,
}

impl JobController {
    pub fn new(pipeline_service: Arc<PipelineService>, storage: Arc<AudioStorage>) -> Self {
        Self {
            pipeline_service,
            storage,
        }
    }

    /// POST /api/v1/upload - Upload a document and start converting it in the background
    ///
    /// Multipart form with a `file` part and a `voice` text part.
    pub async fn upload(
        State(controller): State<Arc<JobController>>,
        mut multipart: Multipart,
    ) -> AppResult<(StatusCode, Json<JobCreationResponse>)> {
        let mut document: Option<SourceDocument> = None;
        let mut voice: Option<String> = None;

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => {
                    let filename = field
                        .file_name()
                        .map(str::to_string)
                        .unwrap_or_else(|| "upload".to_string());
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await?;
                    document = Some(SourceDocument::new(filename, content_type, bytes.to_vec()));
                }
                "voice" => voice = Some(field.text().await?.trim().to_string()),
                other => tracing::debug!(field = other, "Ignoring unknown upload field"),
            }
        }

        let voice = voice
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::BadRequest("A voice must be selected".to_string()))?;
        let document =
            document.ok_or_else(|| AppError::BadRequest("A document file is required".to_string()))?;

        if document.bytes.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
        }
        if document.kind().is_none() {
            return Err(AppError::BadRequest(
                "Unsupported document format, upload a .pdf, .txt, .md or .html file".to_string(),
            ));
        }

        let job_id = controller.pipeline_service.create_job(&voice).await;
        controller.pipeline_service.spawn_pipeline(job_id, document);

        Ok((StatusCode::ACCEPTED, Json(JobCreationResponse { job_id })))
    }

    /// GET /api/v1/status/:job_id - Current state of a conversion job
    pub async fn get_status(
        State(controller): State<Arc<JobController>>,
        Path(job_id): Path<String>,
    ) -> AppResult<Json<JobStatusResponse>> {
        // A malformed id cannot belong to any job
        let job_id: JobId = job_id
            .parse()
            .map_err(|_| AppError::NotFound("Job not found".to_string()))?;

        let job = controller.pipeline_service.get_status(job_id).await?;

        Ok(Json(JobStatusResponse::from(job)))
    }

    /// GET /api/v1/download/:filename - Serve a finished audiobook, then delete it
    pub async fn download(
        State(controller): State<Arc<JobController>>,
        Path(filename): Path<String>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        if !AudioStorage::is_valid_filename(&filename) {
            return Err(AppError::BadRequest("Invalid filename".to_string()));
        }

        let audio = controller
            .storage
            .read(&filename)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("audio/mpeg"));
        headers.insert(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
                .map_err(|e| AppError::Internal(e.to_string()))?,
        );

        tracing::info!(filename = %filename, audio_size_bytes = audio.len(), "Serving audiobook");

        let body = body_then_remove(controller.storage.clone(), filename, audio);

        Ok((StatusCode::OK, headers, body))
    }
}

/// Response body that deletes the file once the last byte has been handed to the connection.
///
/// If the client goes away first the body is dropped unfinished and the file is left for the
/// retention sweep.
fn body_then_remove(storage: Arc<AudioStorage>, filename: String, audio: Vec<u8>) -> Body {
    let data = stream::once(future::ready(Some(Ok::<_, std::io::Error>(Bytes::from(audio)))));
    let cleanup = stream::once(async move {
        storage.remove(&filename).await;
        None
    });

    Body::from_stream(data.chain(cleanup).filter_map(future::ready))
}
