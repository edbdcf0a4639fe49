//! Document loading: URL fetches and the local data folder.

use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;

use super::chunker::Document;
use crate::errors::AgentError;

const FETCH_TIMEOUT_SECS: u64 = 30;
const TEXT_EXTENSIONS: [&str; 2] = ["txt", "md"];

/// Fetch a URL and reduce the body to plain text.
pub async fn fetch_url(url: &str) -> Result<String, AgentError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
        .map_err(|e| AgentError::provider("web", e))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AgentError::provider("web", e))?;

    if !response.status().is_success() {
        return Err(AgentError::Provider {
            provider: "web",
            message: format!("fetch of {url} returned {}", response.status()),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| AgentError::provider("web", e))?;
    Ok(strip_html(&body))
}

/// Strip script/style blocks and markup tags, keeping visible text one line
/// per original line.
pub fn strip_html(html: &str) -> String {
    static SCRIPT: OnceLock<Regex> = OnceLock::new();
    static STYLE: OnceLock<Regex> = OnceLock::new();
    static TAG: OnceLock<Regex> = OnceLock::new();

    let script = SCRIPT.get_or_init(|| Regex::new(r"(?is)<script\b.*?</script>").unwrap());
    let style = STYLE.get_or_init(|| Regex::new(r"(?is)<style\b.*?</style>").unwrap());
    let tag = TAG.get_or_init(|| Regex::new(r"(?s)<[^>]*>").unwrap());

    let without_scripts = script.replace_all(html, " ");
    let without_blocks = style.replace_all(&without_scripts, " ");
    let without_tags = tag.replace_all(&without_blocks, " ");

    without_tags
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Read every `.txt`/`.md` file in `dir`. A missing folder yields an empty
/// list, not an error.
pub fn load_folder(dir: &Path) -> Result<Vec<Document>, AgentError> {
    let mut documents = Vec::new();

    if !dir.is_dir() {
        tracing::warn!("data folder {} not found", dir.display());
        return Ok(documents);
    }

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_text = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| TEXT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false);
        if !is_text {
            continue;
        }

        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match std::fs::read_to_string(&path) {
            Ok(content) if !content.trim().is_empty() => {
                documents.push(Document { content, source });
            }
            Ok(_) => tracing::warn!("skipping empty file {source}"),
            Err(err) => tracing::warn!("failed to read {source}: {err}"),
        }
    }

    tracing::info!("loaded {} documents from {}", documents.len(), dir.display());
    Ok(documents)
}

/// Load all configured sources. Individual fetch failures are logged and
/// skipped; only the folder scan itself can fail the load.
pub async fn load_sources(urls: &[String], data_dir: &Path) -> Result<Vec<Document>, AgentError> {
    let mut documents = load_folder(data_dir)?;

    for url in urls {
        match fetch_url(url).await {
            Ok(content) if !content.trim().is_empty() => documents.push(Document {
                content,
                source: url.clone(),
            }),
            Ok(_) => tracing::warn!("no text content at {url}"),
            Err(err) => tracing::warn!("failed to fetch {url}: {err}"),
        }
    }

    Ok(documents)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn strip_html_drops_tags_and_script_bodies() {
        let html = r#"
            <html>
            <head><script>var x = 1;</script><style>body { color: red; }</style></head>
            <body>
                <h1>Hello</h1>
                <p>World</p>
            </body>
            </html>
        "#;

        let text = strip_html(html);
        assert!(text.contains("Hello"));
        assert!(text.contains("World"));
        assert!(!text.contains('<'));
        assert!(!text.contains("var x"));
        assert!(!text.contains("color"));
    }

    #[test]
    fn load_folder_picks_only_text_files() {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in [
            ("a.txt", "alpha content"),
            ("b.md", "beta content"),
            ("c.pdf", "%PDF-not-read"),
        ] {
            let mut file = std::fs::File::create(dir.path().join(name)).unwrap();
            file.write_all(body.as_bytes()).unwrap();
        }

        let mut docs = load_folder(dir.path()).unwrap();
        docs.sort_by(|a, b| a.source.cmp(&b.source));

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].source, "a.txt");
        assert_eq!(docs[1].source, "b.md");
    }

    #[test]
    fn missing_folder_is_not_an_error() {
        let docs = load_folder(Path::new("/definitely/not/here")).unwrap();
        assert!(docs.is_empty());
    }
}
