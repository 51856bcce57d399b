//! Development server with live reload

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use percent_encoding::percent_decode_str;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::components::NotFound;
use crate::helpers::is_contained;
use crate::Site;

/// Path of the live reload websocket
const LIVE_RELOAD_PATH: &str = "/__livereload";

/// Live reload script injected into HTML pages
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
    ws.onclose = function() {
        console.log('Live reload disconnected. Attempting to reconnect...');
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
</body>
"#;

/// Server state
struct ServerState {
    public_dir: PathBuf,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
}

/// Start the development server
pub async fn start(site: &Site, ip: &str, port: u16, watch: bool, open: bool) -> Result<()> {
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let state = Arc::new(ServerState {
        public_dir: site.public_dir.clone(),
        reload_tx: reload_tx.clone(),
        live_reload: watch,
    });

    let app = Router::new()
        .route(LIVE_RELOAD_PATH, get(livereload_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    tracing::info!("Server running at {}", url);
    if watch {
        tracing::info!("Live reload enabled. Watching for changes...");
    }
    tracing::info!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    if watch {
        let paths = site.watch_paths()?;
        let site = site.clone();

        tokio::spawn(async move {
            if let Err(e) = watch_and_reload(paths, site, reload_tx).await {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Watch for file changes, rebuild, and tell the browsers to reload
async fn watch_and_reload(
    paths: Vec<PathBuf>,
    site: Site,
    reload_tx: broadcast::Sender<()>,
) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    // Debounce to avoid multiple rapid rebuilds
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    for path in &paths {
        let mode = if path.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        debouncer.watcher().watch(path, mode)?;
        tracing::debug!("Watching: {:?}", path);
    }

    // The debouncer channel is blocking
    tokio::task::spawn_blocking(move || {
        let _debouncer = debouncer;
        loop {
            match rx.recv() {
                Ok(Ok(events)) => {
                    let relevant: Vec<_> = events.iter().filter(|e| is_relevant(&e.path)).collect();
                    if relevant.is_empty() {
                        continue;
                    }

                    for event in &relevant {
                        tracing::info!("File changed: {}", event.path.display());
                    }

                    match crate::commands::build::rebuild(&site) {
                        Ok(()) => {
                            tracing::info!("Rebuilt successfully");
                            let _ = reload_tx.send(());
                        }
                        Err(e) => tracing::error!("Build failed: {:#}", e),
                    }
                }
                Ok(Err(e)) => tracing::error!("Watch error: {:?}", e),
                Err(e) => {
                    tracing::error!("Channel error: {:?}", e);
                    break;
                }
            }
        }
    })
    .await?;

    Ok(())
}

/// Editor and VCS noise never triggers a rebuild
fn is_relevant(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    !path_str.contains(".git")
        && !path_str.contains(".DS_Store")
        && !path_str.ends_with('~')
        && !path_str.ends_with(".swp")
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

/// Handle WebSocket connection for live reload
async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Map a request path onto a file in the public directory
fn resolve_path(public_dir: &Path, request_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(request_path).decode_utf8_lossy();
    let relative = Path::new(decoded.trim_start_matches('/'));
    if relative.as_os_str().is_empty() {
        let index = public_dir.join("index.html");
        return index.is_file().then_some(index);
    }
    if !is_contained(relative) {
        return None;
    }

    let candidate = public_dir.join(relative);
    if candidate.is_dir() {
        let index = candidate.join("index.html");
        return index.is_file().then_some(index);
    }
    if candidate.is_file() {
        return Some(candidate);
    }
    let with_html = public_dir.join(format!("{}.html", relative.display()));
    with_html.is_file().then_some(with_html)
}

/// Fallback handler that serves files and injects live reload script
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let Some(file_path) = resolve_path(&state.public_dir, request.uri().path()) else {
        return not_found(&state).await;
    };

    let is_html = file_path
        .extension()
        .map(|ext| ext == "html" || ext == "htm")
        .unwrap_or(false);

    if is_html && state.live_reload {
        match tokio::fs::read_to_string(&file_path).await {
            Ok(content) => Html(inject_live_reload(&content)).into_response(),
            Err(_) => not_found(&state).await,
        }
    } else {
        // Serve static file using tower-http
        let mut service = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
        match service.try_call(request).await {
            Ok(response) => response.into_response(),
            Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
        }
    }
}

/// The generated 404 page, or plain text when there is none
async fn not_found(state: &ServerState) -> Response {
    match tokio::fs::read_to_string(state.public_dir.join(NotFound::FILE)).await {
        Ok(content) => {
            let content = if state.live_reload {
                inject_live_reload(&content)
            } else {
                content
            };
            (StatusCode::NOT_FOUND, Html(content)).into_response()
        }
        Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

/// Inject live reload script into HTML content
fn inject_live_reload(html: &str) -> String {
    if html.contains("</body>") {
        html.replacen("</body>", LIVE_RELOAD_SCRIPT, 1)
    } else {
        format!("{}{}", html, LIVE_RELOAD_SCRIPT)
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_inject_live_reload() {
        let html = inject_live_reload("<html><body><p>x</p></body></html>");
        assert!(html.contains(LIVE_RELOAD_PATH));
        assert_eq!(html.matches("</body>").count(), 1);
        assert!(html.ends_with("</body>\n</html>"));

        let bare = inject_live_reload("<p>x</p>");
        assert!(bare.starts_with("<p>x</p>"));
        assert!(bare.contains("<script>"));
    }

    #[test]
    fn test_resolve_path() {
        let dir = tempfile::tempdir().unwrap();
        let public = dir.path();
        fs::create_dir_all(public.join("posts/hello")).unwrap();
        fs::write(public.join("index.html"), "home").unwrap();
        fs::write(public.join("posts/hello/index.html"), "post").unwrap();
        fs::write(public.join("404.html"), "nf").unwrap();
        fs::create_dir_all(public.join("static/ab")).unwrap();
        fs::write(public.join("static/ab/my file.pdf"), "pdf").unwrap();

        assert_eq!(resolve_path(public, "/"), Some(public.join("index.html")));
        assert_eq!(
            resolve_path(public, "/posts/hello/"),
            Some(public.join("posts/hello/index.html"))
        );
        assert_eq!(resolve_path(public, "/404"), Some(public.join("404.html")));
        assert_eq!(
            resolve_path(public, "/static/ab/my%20file.pdf"),
            Some(public.join("static/ab/my file.pdf"))
        );
        assert_eq!(resolve_path(public, "/missing/"), None);
        assert_eq!(resolve_path(public, "/../secret"), None);
    }

    #[test]
    fn test_ignored_paths() {
        assert!(is_relevant(Path::new("src/markdown-posts/a.md")));
        assert!(!is_relevant(Path::new("src/.git/index")));
        assert!(!is_relevant(Path::new("src/markdown-posts/a.md~")));
    }
}
