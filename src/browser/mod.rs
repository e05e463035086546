use anyhow::{Context, Result};

/// Open a URL in the user's default browser
///
/// # Arguments
/// * `url` - The URL to open (e.g., the ranking methodology document)
///
/// # Errors
/// Returns error if the URL is blank or no browser can be opened
pub fn open_url(url: &str) -> Result<()> {
    let url = url.trim();
    if url.is_empty() {
        anyhow::bail!("No reference URL configured");
    }
    tracing::debug!(url, "opening reference document");
    webbrowser::open(url).with_context(|| format!("Failed to open browser for URL: {}", url))?;
    Ok(())
}
