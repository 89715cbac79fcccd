//! Fetches both datasets at startup.

use std::path::{Path, PathBuf};

use reqwest::header::{CACHE_CONTROL, PRAGMA};
use shelf_state::{Dataset, Library, Payload};

use crate::error::LoadError;

/// Where a dataset is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Http(String),
    File(PathBuf),
}

impl Source {
    /// Resolves `name` against `base`, which is either an http(s) URL or a directory.
    /// A `name` that is already an absolute URL is used as-is.
    pub fn resolve(base: &str, name: &str) -> Source {
        if is_url(name) {
            return Source::Http(name.to_string());
        }
        if is_url(base) {
            return Source::Http(format!(
                "{}/{}",
                base.trim_end_matches('/'),
                name.trim_start_matches('/')
            ));
        }
        Source::File(Path::new(base).join(name))
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Http(url) => write!(f, "{url}"),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Whether a resource failing should fail the whole load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    Optional,
}

/// The raw result of reaching a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched {
    Body(Vec<u8>),
    /// The resource answered, but not successfully. Missing files are reported as 404.
    Missing(u16),
}

/// A resource after its requirement has been applied.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceOutcome {
    Loaded(Dataset),
    /// An optional resource that could not be used.
    Empty,
}

impl ResourceOutcome {
    pub fn into_dataset(self) -> Dataset {
        match self {
            ResourceOutcome::Loaded(dataset) => dataset,
            ResourceOutcome::Empty => Dataset::default(),
        }
    }
}

pub struct Loader {
    client: reqwest::Client,
    collection: Source,
    wantlist: Source,
}

impl Loader {
    pub fn new(collection: Source, wantlist: Source) -> Self {
        Self::with_client(reqwest::Client::new(), collection, wantlist)
    }

    pub fn with_client(client: reqwest::Client, collection: Source, wantlist: Source) -> Self {
        Self {
            client,
            collection,
            wantlist,
        }
    }

    /// Fetches both datasets concurrently. The collection is required and its failure
    /// ends the load immediately; the wantlist degrades to an empty dataset.
    pub async fn load_data(&self) -> Result<Library, LoadError> {
        let (collection, wantlist) = tokio::try_join!(
            self.fetch_resource(&self.collection, Requirement::Required),
            self.fetch_resource(&self.wantlist, Requirement::Optional),
        )?;

        let library = Library {
            collection: collection.into_dataset(),
            wantlist: wantlist.into_dataset(),
        };
        tracing::info!(
            "loaded {} collection records and {} wantlist records",
            library.collection.len(),
            library.wantlist.len()
        );
        Ok(library)
    }

    pub async fn fetch_resource(
        &self,
        source: &Source,
        requirement: Requirement,
    ) -> Result<ResourceOutcome, LoadError> {
        let result = match self.fetch(source).await {
            Ok(Fetched::Body(bytes)) => parse_dataset(source, &bytes),
            Ok(Fetched::Missing(status)) => Err(LoadError::Status {
                resource: source.to_string(),
                status,
            }),
            Err(e) => Err(e),
        };

        match (result, requirement) {
            (Ok(dataset), _) => Ok(ResourceOutcome::Loaded(dataset)),
            (Err(e), Requirement::Required) => Err(e),
            (Err(e), Requirement::Optional) => {
                tracing::warn!(resource = %source, error = %e, "treating optional resource as empty");
                Ok(ResourceOutcome::Empty)
            }
        }
    }

    pub async fn fetch(&self, source: &Source) -> Result<Fetched, LoadError> {
        tracing::debug!("fetching {source}");
        match source {
            Source::Http(url) => {
                let transport = |source| LoadError::Transport {
                    resource: url.clone(),
                    source,
                };
                let response = self
                    .client
                    .get(url)
                    .header(CACHE_CONTROL, "no-cache")
                    .header(PRAGMA, "no-cache")
                    .send()
                    .await
                    .map_err(transport)?;

                let status = response.status();
                if !status.is_success() {
                    return Ok(Fetched::Missing(status.as_u16()));
                }
                let body = response.bytes().await.map_err(transport)?;
                Ok(Fetched::Body(body.to_vec()))
            }
            Source::File(path) => match tokio::fs::read(path).await {
                Ok(bytes) => Ok(Fetched::Body(bytes)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Fetched::Missing(404)),
                Err(source) => Err(LoadError::Io {
                    resource: path.display().to_string(),
                    source,
                }),
            },
        }
    }
}

fn parse_dataset(source: &Source, bytes: &[u8]) -> Result<Dataset, LoadError> {
    let payload: Payload = serde_json::from_slice(bytes).map_err(|e| LoadError::Json {
        resource: source.to_string(),
        source: e,
    })?;
    Ok(Dataset::from_payload(payload))
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    use shelf_state::{DatasetKind, Field};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    use super::*;
    use crate::{engine::apply_search_and_sort, render::render_table, view::ViewState};

    const COLLECTION: &str = r#"{
        "items": [
            {"artist": "Abba", "album": "Gold", "genre": "Pop", "year": 1992},
            {"artist": "Bowie", "album": "Low", "year": "1977", "label": "RCA"}
        ],
        "updated_at": "2024-05-01T10:00:00+00:00"
    }"#;

    fn file_loader(dir: &Path) -> Loader {
        Loader::new(
            Source::resolve(&dir.display().to_string(), "collection.json"),
            Source::resolve(&dir.display().to_string(), "wantlist.json"),
        )
    }

    #[test]
    fn test_resolve_sources() {
        assert_eq!(
            Source::resolve("https://example.org/records/", "collection.json"),
            Source::Http("https://example.org/records/collection.json".to_string())
        );
        assert_eq!(
            Source::resolve("http://localhost:8000", "/wantlist.json"),
            Source::Http("http://localhost:8000/wantlist.json".to_string())
        );
        assert_eq!(
            Source::resolve("data", "collection.json"),
            Source::File(PathBuf::from("data/collection.json"))
        );
        assert_eq!(
            Source::resolve("data", "https://cdn.example.org/w.json"),
            Source::Http("https://cdn.example.org/w.json".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_wantlist_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("collection.json"), COLLECTION).unwrap();

        let library = file_loader(dir.path()).load_data().await.unwrap();
        assert_eq!(library.collection.len(), 2);
        assert!(library.wantlist.is_empty());
        assert_eq!(library.wantlist.meta, None);

        let bowie = &library.collection.records[1];
        assert_eq!(bowie.field(Field::Genre), Some(""));
        assert_eq!(bowie.extra.get("label"), Some(&serde_json::json!("RCA")));
        assert_eq!(library.collection.records[0].field(Field::Year), Some("1992"));
    }

    #[tokio::test]
    async fn test_malformed_wantlist_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("collection.json"), COLLECTION).unwrap();
        std::fs::write(dir.path().join("wantlist.json"), "{not json").unwrap();

        let library = file_loader(dir.path()).load_data().await.unwrap();
        assert!(library.wantlist.is_empty());
        assert_eq!(library.wantlist.meta, None);
    }

    #[tokio::test]
    async fn test_malformed_collection_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("collection.json"), "[1, 2").unwrap();
        std::fs::write(dir.path().join("wantlist.json"), r#"{"items": []}"#).unwrap();

        let err = file_loader(dir.path()).load_data().await.unwrap_err();
        assert!(matches!(err, LoadError::Json { .. }), "{err}");
    }

    #[tokio::test]
    async fn test_missing_collection_fails_with_status() {
        let dir = tempfile::tempdir().unwrap();
        let err = file_loader(dir.path()).load_data().await.unwrap_err();
        assert!(matches!(err, LoadError::Status { status: 404, .. }), "{err}");
    }

    /// Serves fixed bodies by path over plain HTTP/1.1 and records request headers.
    async fn serve(routes: HashMap<&'static str, &'static str>) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(vec![]));

        let seen = requests.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let mut buf = vec![0u8; 4096];
                let mut len = 0;
                while !buf[..len].windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf[len..]).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => len += n,
                    }
                }
                let request = String::from_utf8_lossy(&buf[..len]).to_string();
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                seen.lock().unwrap().push(request);

                let response = match routes.get(path.as_str()) {
                    Some(body) => format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    ),
                    None => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                        .to_string(),
                };
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        (base, requests)
    }

    fn http_loader(base: &str) -> Loader {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        Loader::with_client(
            client,
            Source::resolve(base, "collection.json"),
            Source::resolve(base, "wantlist.json"),
        )
    }

    #[tokio::test]
    async fn test_http_wantlist_404_still_loads() {
        let (base, requests) = serve(HashMap::from([("/collection.json", COLLECTION)])).await;
        let loader = http_loader(&base);

        let library = loader.load_data().await.unwrap();
        assert_eq!(library.collection.len(), 2);
        assert!(library.wantlist.is_empty());

        let view = ViewState {
            active_view: DatasetKind::Wantlist,
            ..Default::default()
        };
        let table = render_table(&apply_search_and_sort(Some(&library), &view), view.active_view);
        assert_eq!(table.placeholder(), Some("No records found"));
        assert_eq!(table.count_label, "0 records");

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        for request in requests.iter() {
            let lower = request.to_lowercase();
            assert!(lower.contains("cache-control: no-cache"), "{request}");
            assert!(lower.contains("pragma: no-cache"), "{request}");
        }
    }

    #[tokio::test]
    async fn test_http_collection_error_fails() {
        let (base, _) = serve(HashMap::from([("/wantlist.json", r#"{"items": []}"#)])).await;
        let loader = http_loader(&base);

        let err = loader.load_data().await.unwrap_err();
        assert!(matches!(err, LoadError::Status { status: 404, .. }), "{err}");
        assert!(err.to_string().ends_with("HTTP 404"));
    }
}
