// Page handlers for HTML rendering with Askama

use std::sync::Arc;

use askama::Template;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::response::{Html, IntoResponse};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::api_server::{AppError, AppState};
use crate::web::pipeline::{process_upload, Upload};
use crate::web::view_models::{ContentCard, PageView};

const PAGE_TITLE: &str = "Cotton Species Detection for Farmers";
const UPLOAD_FIELD: &str = "image";
const NO_IMAGE_MESSAGE: &str = "No image uploaded. Please choose a JPG or PNG photo.";

// ============================================================================
// Home Page
// ============================================================================

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub title: &'static str,
    pub background: Option<Arc<String>>,
    pub page: Option<PageView>,
}

impl HomeTemplate {
    fn new(state: &AppState, page: Option<PageView>) -> Self {
        Self {
            title: PAGE_TITLE,
            background: state.background.clone(),
            page,
        }
    }
}

fn render(template: HomeTemplate) -> Result<Html<String>, AppError> {
    template.render().map(Html).map_err(|e| {
        tracing::error!("Template error: {}", e);
        AppError::Internal(format!("Template error: {}", e))
    })
}

pub async fn home_page(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    render(HomeTemplate::new(&state, None))
}

// ============================================================================
// Detection
// ============================================================================

/// Handle the upload form. Always answers with the page; problems show up as notice cards.
pub async fn detect_page(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, AppError> {
    let upload = match multipart {
        Ok(multipart) => read_upload(multipart).await,
        Err(rejection) => {
            tracing::warn!("Upload was not a multipart form: {}", rejection);
            Err(format!("Could not process image: {}", rejection.body_text()))
        }
    };

    let page = match upload {
        Ok(Some(upload)) => {
            let mut rng = StdRng::from_entropy();
            process_upload(
                state.detector.clone(),
                upload,
                state.config.detection_timeout,
                &mut rng,
            )
            .await
        }
        Ok(None) => PageView::warning(NO_IMAGE_MESSAGE),
        Err(message) => PageView::warning(message),
    };

    render(HomeTemplate::new(&state, Some(page)))
}

/// Pull the `image` field out of the form. Browsers send an empty part when no file was chosen.
async fn read_upload(mut multipart: Multipart) -> Result<Option<Upload>, String> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(e) => {
                tracing::warn!("Malformed upload form: {}", e);
                return Err(format!("Could not process image: {}", e.body_text()));
            }
        };

        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().filter(|n| !n.is_empty()).map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| {
            tracing::warn!("Failed to read upload body: {}", e);
            format!("Could not process image: {}", e.body_text())
        })?;

        if bytes.is_empty() {
            return Ok(None);
        }

        tracing::debug!("Received upload {:?} ({} bytes)", file_name, bytes.len());
        return Ok(Some(Upload { file_name, bytes: bytes.to_vec() }));
    }
}
