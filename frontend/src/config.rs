use web_sys::window;

pub fn get_api_base_url() -> String {
    // Served behind the backend in production so relative URLs work there;
    // during development trunk hosts the frontend on its own port.
    if let Some(window) = window() {
        if let Ok(host) = window.location().host() {
            if host.contains(":8080") {
                return "http://127.0.0.1:3000".to_string();
            }
        }
    }

    "".to_string()
}

pub fn get_share_url(slug: &str) -> String {
    let origin = window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default();
    format!("{}/shared/{}", origin, slug)
}
