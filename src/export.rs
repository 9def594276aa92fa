//! Export of a published article as one copy-pasteable HTML fragment.

use crate::session::Session;
use crate::types::ArticleArtifact;

/// `<h1>` title, optional cover `<img>`, then the content verbatim, joined by newlines.
pub fn export_html(title: &str, artifact: &ArticleArtifact) -> String {
    match artifact.cover_image_url() {
        Some(url) => format!(
            "<h1>{title}</h1>\n<img src=\"{url}\" alt=\"{title}\" />\n{content}",
            title = title,
            url = url,
            content = artifact.content()
        ),
        None => format!("<h1>{}</h1>\n{}", title, artifact.content()),
    }
}

/// Export the session's article, if it has reached the result stage.
pub fn export_session(session: &Session) -> Option<String> {
    let title = session.selected_title()?;
    let artifact = session.artifact()?;
    Some(export_html(title.as_str(), artifact))
}
