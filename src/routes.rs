use std::{path::Path, sync::Arc};

use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose, Engine as _};
use image::ImageFormat;
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::catalog::{Catalog, DiseaseKey, Language};
use crate::error::{Error, Result};
use crate::model::Classifier;
use crate::preprocess::preprocess;
use crate::render::{render_page, Notice, PageView, Preview};

const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

pub struct AppState {
    pub classifier: Arc<dyn Classifier>,
    pub catalog: Catalog,
}

/// Language independent outcome of one upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagnosis {
    pub index: usize,
    pub key: DiseaseKey,
}

pub fn diagnose(
    classifier: &dyn Classifier,
    catalog: &Catalog,
    image_data: &[u8],
) -> Result<Diagnosis> {
    let tensor = preprocess(image_data)?;
    let index = classifier.classify(&tensor)?;
    Ok(Diagnosis {
        index,
        key: catalog.resolve(index),
    })
}

pub fn app(state: Arc<AppState>, body_limit_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/diagnose", post(diagnose_handler))
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .with_state(state)
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Deserialize)]
struct PageParams {
    lang: Option<String>,
}

fn language_from(code: Option<&str>) -> Language {
    code.and_then(Language::from_code).unwrap_or_default()
}

fn is_accepted(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
        .unwrap_or(false)
}

/// MIME type of the decoded bytes, whatever the filename claims.
fn mime_for(image_data: &[u8]) -> &'static str {
    match image::guess_format(image_data) {
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::Jpeg) => "image/jpeg",
        Ok(ImageFormat::Gif) => "image/gif",
        Ok(ImageFormat::WebP) => "image/webp",
        Ok(ImageFormat::Bmp) => "image/bmp",
        Ok(ImageFormat::Tiff) => "image/tiff",
        _ => "application/octet-stream",
    }
}

async fn index_handler(Query(params): Query<PageParams>) -> Html<String> {
    let view = PageView {
        language: language_from(params.lang.as_deref()),
        ..PageView::default()
    };
    Html(render_page(&view))
}

struct Upload {
    language: Language,
    file: Option<(String, Vec<u8>)>,
}

async fn read_upload(multipart: &mut Multipart) -> Result<Upload> {
    let mut lang = None;
    let mut file = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("lang") => lang = Some(field.text().await?),
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                if !bytes.is_empty() {
                    file = Some((filename, bytes.to_vec()));
                }
            }
            _ => {}
        }
    }

    Ok(Upload {
        language: language_from(lang.as_deref()),
        file,
    })
}

fn page_with_notice(
    status: StatusCode,
    language: Language,
    notice: Notice,
) -> (StatusCode, Html<String>) {
    let view = PageView {
        language,
        notice: Some(notice),
        ..PageView::default()
    };
    (status, Html(render_page(&view)))
}

async fn diagnose_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> (StatusCode, Html<String>) {
    let upload = match read_upload(&mut multipart).await {
        Ok(upload) => upload,
        Err(err) => {
            warn!(error = %err, "rejecting malformed upload");
            return page_with_notice(
                StatusCode::BAD_REQUEST,
                Language::default(),
                Notice::BadUpload,
            );
        }
    };
    let language = upload.language;

    // No file is the normal idle state.
    let Some((filename, image_data)) = upload.file else {
        let view = PageView {
            language,
            ..PageView::default()
        };
        return (StatusCode::OK, Html(render_page(&view)));
    };

    if !is_accepted(&filename) {
        info!(filename = %filename, "ignoring upload with unsupported extension");
        return page_with_notice(StatusCode::OK, language, Notice::UnsupportedFile);
    }

    let diagnosis = match diagnose(state.classifier.as_ref(), &state.catalog, &image_data) {
        Ok(diagnosis) => diagnosis,
        Err(Error::Decode(err)) => {
            warn!(filename = %filename, error = %err, "upload is not a valid image");
            return page_with_notice(
                StatusCode::BAD_REQUEST,
                language,
                Notice::UndecodableImage,
            );
        }
        Err(err) => {
            warn!(filename = %filename, error = %err, "classification failed");
            return page_with_notice(
                StatusCode::INTERNAL_SERVER_ERROR,
                language,
                Notice::ModelFailure,
            );
        }
    };

    info!(
        index = diagnosis.index,
        key = ?diagnosis.key,
        language = language.code(),
        "diagnosis complete"
    );

    let encoded = general_purpose::STANDARD.encode(&image_data);
    let view = PageView {
        language,
        notice: None,
        preview: Some(Preview {
            mime: mime_for(&image_data),
            base64: &encoded,
        }),
        report: state.catalog.record(diagnosis.key, language),
    };
    (StatusCode::OK, Html(render_page(&view)))
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "OK" }))
}
