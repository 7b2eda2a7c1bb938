//! LaTeX → PDF compilation through a remote service.
//!
//! Compilation is best-effort. The materializer logs a [`CompileError`] as a
//! warning and keeps the `.tex` source as the deliverable.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{header::CONTENT_TYPE, Client};
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::errors::CompileError;
use crate::models::truncate_chars;

pub const DEFAULT_COMPILE_URL: &str = "https://latexonline.cc/compile";
const COMPILE_TIMEOUT: Duration = Duration::from_secs(60);
const COMPILE_ATTEMPTS: u32 = 2;
const RETRY_DELAY: Duration = Duration::from_secs(3);
const ERROR_BODY_CHARS: usize = 500;

#[async_trait]
pub trait LatexCompiler: Send + Sync {
    /// Compiles `tex_path` and returns the path of the written PDF.
    async fn compile(&self, tex_path: &Path) -> Result<PathBuf, CompileError>;
}

/// Client for a LaTeX.Online-compatible endpoint: multipart upload of the
/// `.tex` file, PDF bytes back.
pub struct LatexOnlineCompiler {
    client: Client,
    url: String,
    attempts: u32,
    retry_delay: Duration,
}

impl LatexOnlineCompiler {
    pub fn new(url: String) -> Result<Self, CompileError> {
        Ok(Self {
            client: Client::builder().timeout(COMPILE_TIMEOUT).build()?,
            url,
            attempts: COMPILE_ATTEMPTS,
            retry_delay: RETRY_DELAY,
        })
    }

    async fn compile_once(&self, tex_path: &Path, pdf_path: &Path) -> Result<(), CompileError> {
        let source = tokio::fs::read(tex_path)
            .await
            .map_err(|source| CompileError::Read {
                path: tex_path.to_path_buf(),
                source,
            })?;
        let file_name = tex_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document.tex")
            .to_string();

        info!("Sending {file_name} to {}", self.url);

        let part = Part::bytes(source)
            .file_name(file_name)
            .mime_str("application/x-tex")?;
        let response = self
            .client
            .post(&self.url)
            .multipart(Form::new().part("file", part))
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompileError::Rejected {
                status: status.as_u16(),
                body: truncate_chars(&body, ERROR_BODY_CHARS).to_string(),
            });
        }
        if !is_pdf(&content_type) {
            return Err(CompileError::NotPdf { content_type });
        }

        let pdf: Bytes = response.bytes().await?;
        write_new(pdf_path, &pdf).await?;
        info!(
            "PDF compiled successfully ({} KB) → {}",
            pdf.len() / 1024,
            pdf_path.display()
        );
        Ok(())
    }
}

#[async_trait]
impl LatexCompiler for LatexOnlineCompiler {
    async fn compile(&self, tex_path: &Path) -> Result<PathBuf, CompileError> {
        let pdf_path = tex_path.with_extension("pdf");
        with_retry(self.attempts, self.retry_delay, |_| {
            self.compile_once(tex_path, &pdf_path)
        })
        .await?;
        Ok(pdf_path)
    }
}

/// Runs `op` up to `attempts` times with a fixed pause between tries.
/// The final error is wrapped in [`CompileError::Exhausted`].
pub async fn with_retry<T, F, Fut>(
    attempts: u32,
    delay: Duration,
    mut op: F,
) -> Result<T, CompileError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, CompileError>>,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= attempts => {
                return Err(CompileError::Exhausted {
                    attempts,
                    last: Box::new(e),
                })
            }
            Err(e) => {
                warn!(
                    "Compile attempt {attempt} failed ({e}), retrying in {}s...",
                    delay.as_secs()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

fn is_pdf(content_type: &str) -> bool {
    content_type
        .trim()
        .to_ascii_lowercase()
        .starts_with("application/pdf")
}

async fn write_new(path: &Path, contents: &[u8]) -> Result<(), CompileError> {
    let to_err = |source| CompileError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
        .map_err(to_err)?;
    file.write_all(contents).await.map_err(to_err)?;
    file.flush().await.map_err(to_err)
}
