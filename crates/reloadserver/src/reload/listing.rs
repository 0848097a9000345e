//! HTML directory listings for folders without an `index.html`.

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Characters escaped in listing links.
const HREF: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Fallback for the static file service: list the directory at the request
/// path, or answer 404 when there is nothing to serve.
pub async fn directory_listing(State(root): State<Arc<PathBuf>>, uri: Uri) -> Response {
    let decoded = percent_decode_str(uri.path()).decode_utf8_lossy();

    let Some(dir) = resolve_under(&root, &decoded) else {
        return not_found();
    };

    match read_entries(&dir).await {
        Ok(entries) => {
            let mut display_path = decoded.into_owned();
            if !display_path.ends_with('/') {
                display_path.push('/');
            }
            Html(render_listing(&display_path, &entries)).into_response()
        }
        Err(e) => {
            debug!("No listing for {}: {}", dir.display(), e);
            not_found()
        }
    }
}

/// Map a decoded URL path onto the filesystem without leaving `root`.
fn resolve_under(root: &Path, url_path: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    for segment in url_path.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            s if s.contains('\\') => return None,
            s => path.push(s),
        }
    }
    Some(path)
}

/// Entry names in `dir`, directories suffixed with `/`, sorted
/// case-insensitively.
async fn read_entries(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut read_dir = tokio::fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = read_dir.next_entry().await? {
        let mut name = entry.file_name().to_string_lossy().into_owned();
        // Follows symlinks, so a link to a directory lists as one
        if tokio::fs::metadata(entry.path())
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            name.push('/');
        }
        entries.push(name);
    }

    entries.sort_by_key(|name| name.to_lowercase());
    Ok(entries)
}

fn render_listing(display_path: &str, entries: &[String]) -> String {
    let title = format!("Directory listing for {}", html_escape(display_path));
    let items: String = entries
        .iter()
        .map(|name| {
            format!(
                "<li><a href=\"{}\">{}</a></li>\n",
                utf8_percent_encode(name, HREF),
                html_escape(name)
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE HTML>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<h1>{title}</h1>
<hr>
<ul>
{items}</ul>
<hr>
</body>
</html>
"#
    )
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        "File not found",
    )
        .into_response()
}

/// Escape HTML special characters to prevent XSS.
fn html_escape(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#x27;".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("it's \"x\""), "it&#x27;s &quot;x&quot;");
    }

    #[test]
    fn test_resolve_rejects_parent_segments() {
        let root = Path::new("/srv/site");
        assert_eq!(resolve_under(root, "/docs/"), Some(PathBuf::from("/srv/site/docs")));
        assert_eq!(resolve_under(root, "/"), Some(PathBuf::from("/srv/site")));
        assert_eq!(resolve_under(root, "/../etc/"), None);
        assert_eq!(resolve_under(root, "/docs/../../"), None);
    }

    #[test]
    fn test_render_listing() {
        let html = render_listing(
            "/docs/",
            &["a b.html".to_string(), "<img>".to_string(), "sub/".to_string()],
        );
        assert!(html.contains("<title>Directory listing for /docs/</title>"));
        assert!(html.contains("<a href=\"a%20b.html\">a b.html</a>"));
        assert!(html.contains("<a href=\"%3Cimg%3E\">&lt;img&gt;</a>"));
        assert!(html.contains("<a href=\"sub/\">sub/</a>"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[tokio::test]
    async fn test_read_entries_sorted_with_dir_suffix() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.txt"), "b").unwrap();
        std::fs::write(dir.path().join("A.txt"), "a").unwrap();
        std::fs::create_dir(dir.path().join("css")).unwrap();

        let entries = read_entries(dir.path()).await.unwrap();
        assert_eq!(entries, vec!["A.txt", "b.txt", "css/"]);
    }
}
