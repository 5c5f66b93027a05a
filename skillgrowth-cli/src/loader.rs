//! Concurrent document loading from a directory or an HTTP base URL.
use reqwest::{Client, StatusCode};
use skillgrowth_core::{DocumentKind, LoadError, PreloadedSource, RawDocuments, load_all};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Where the four report documents live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataLocation {
    Remote(String),
    Local(PathBuf),
}

impl DataLocation {
    pub fn parse(base: &str) -> Self {
        let base = base.trim();
        if base.starts_with("http://") || base.starts_with("https://") {
            Self::Remote(base.trim_end_matches('/').to_string())
        } else {
            Self::Local(PathBuf::from(base))
        }
    }

    pub fn document_url(&self, kind: DocumentKind) -> String {
        match self {
            Self::Remote(base) => format!("{base}/{}", kind.file_name()),
            Self::Local(dir) => dir.join(kind.file_name()).display().to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered {status}")]
    Status { url: String, status: StatusCode },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub struct Loader {
    location: DataLocation,
    client: Client,
    fallback_dir: Option<PathBuf>,
}

impl Loader {
    pub fn new(
        location: DataLocation,
        timeout: Duration,
        fallback_dir: Option<PathBuf>,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self {
            location,
            client,
            fallback_dir,
        })
    }

    async fn fetch(&self, kind: DocumentKind) -> Result<String, FetchError> {
        let url = self.location.document_url(kind);
        log::debug!("loading {kind} from {url}");
        match &self.location {
            DataLocation::Remote(_) => {
                let response = self
                    .client
                    .get(&url)
                    .send()
                    .await
                    .map_err(|source| FetchError::Http {
                        url: url.clone(),
                        source,
                    })?;
                let status = response.status();
                if !status.is_success() {
                    return Err(FetchError::Status { url, status });
                }
                response
                    .text()
                    .await
                    .map_err(|source| FetchError::Http { url, source })
            }
            DataLocation::Local(dir) => read_file(&dir.join(kind.file_name())).await,
        }
    }

    async fn fetch_document(&self, kind: DocumentKind) -> Result<String, LoadError> {
        self.fetch(kind)
            .await
            .map_err(|err| LoadError::fetch(kind, err))
    }

    /// Fetch all four documents concurrently; the first failure cancels the rest.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Fetch`] for the first document that fails.
    pub async fn fetch_all(&self) -> Result<RawDocuments, LoadError> {
        let (skills, series, values, analysis) = tokio::try_join!(
            self.fetch_document(DocumentKind::Skills),
            self.fetch_document(DocumentKind::Series),
            self.fetch_document(DocumentKind::Values),
            self.fetch_document(DocumentKind::Analysis),
        )?;
        Ok(RawDocuments {
            skills,
            series,
            values,
            analysis,
        })
    }

    /// Fetch every document, falling back to the preload directory when any fetch fails.
    ///
    /// # Errors
    ///
    /// Returns the original fetch error when there is no fallback, or the
    /// fallback's error when it is incomplete as well.
    pub async fn load(&self) -> Result<RawDocuments, LoadError> {
        match self.fetch_all().await {
            Ok(docs) => Ok(docs),
            Err(err) => {
                let Some(dir) = &self.fallback_dir else {
                    return Err(err);
                };
                log::warn!("{err}; using preloaded documents from {}", dir.display());
                load_all(&preload_dir(dir).await)
            }
        }
    }
}

async fn read_file(path: &Path) -> Result<String, FetchError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| FetchError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Collect preloaded documents from `dir`: `<name>.js` global scripts
/// first, then plain `<name>.json` files.
pub async fn preload_dir(dir: &Path) -> PreloadedSource {
    let mut source = PreloadedSource::new();
    for kind in DocumentKind::ALL {
        if let Ok(script) = read_file(&dir.join(kind.script_name())).await
            && source.insert_script(kind, &script)
        {
            continue;
        }
        match read_file(&dir.join(kind.file_name())).await {
            Ok(json) => source.insert(kind, json),
            Err(err) => log::debug!("no preloaded {kind}: {err}"),
        }
    }
    source
}
