/// URI the image loaders can fetch for `url`.
///
/// Processed outputs are stored by the worker as plain filesystem paths, so
/// absolute paths become `file://` URIs; anything with a scheme is kept as is.
pub fn preview_uri(url: &str) -> String {
    let url = url.trim();
    if url.contains("://") {
        url.to_string()
    } else if url.starts_with('/') {
        format!("file://{}", url)
    } else {
        url.to_string()
    }
}
