//! 写真のmultipartアップロード

use super::ApiClient;
use crate::error::Result;
use crate::scanner::ImageInfo;
use account_ui_common::csrf::{CSRF_COOKIE, CSRF_HEADER};
use account_ui_common::uploader::UPLOAD_FIELD;
use account_ui_common::UploadOutcome;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::multipart::{Form, Part};
use reqwest::Body;

/// 送信チャンクのサイズ（進捗の更新単位）
pub const CHUNK_SIZE: usize = 64 * 1024;

/// バイト数ベースの進捗バー
pub fn byte_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%)",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> "),
    );
    pb
}

fn chunked_body(data: Vec<u8>, progress: ProgressBar) -> Body {
    let chunks: Vec<Vec<u8>> = data.chunks(CHUNK_SIZE).map(<[u8]>::to_vec).collect();
    let stream = futures::stream::iter(chunks).map(move |chunk| {
        progress.inc(chunk.len() as u64);
        Ok::<_, std::io::Error>(chunk)
    });
    Body::wrap_stream(stream)
}

impl ApiClient {
    /// 写真を1リクエストで送る（フィールド `photos` を枚数分繰り返す）
    pub async fn upload_photos(
        &self,
        endpoint: &str,
        images: &[ImageInfo],
        csrf_token: Option<&str>,
        progress: &ProgressBar,
    ) -> Result<UploadOutcome> {
        let mut form = Form::new();
        for image in images {
            let data = tokio::fs::read(&image.path).await?;
            let len = data.len() as u64;
            let part = Part::stream_with_length(chunked_body(data, progress.clone()), len)
                .file_name(image.file_name.clone())
                .mime_str(image.mime_type())?;
            form = form.part(UPLOAD_FIELD, part);
        }

        let mut request = self.http.post(endpoint).multipart(form);
        if let Some(token) = csrf_token {
            request = request
                .header(CSRF_HEADER, token)
                .header(reqwest::header::COOKIE, format!("{}={}", CSRF_COOKIE, token));
        }

        tracing::info!("POST {} ({}枚)", endpoint, images.len());
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!("upload response {}: {}", status, body);

        Ok(UploadOutcome::from_status(status, &body)?)
    }
}
