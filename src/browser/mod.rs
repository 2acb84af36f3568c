//! Headless browser session management
//!
//! Launches a Chrome or Chromium process over the DevTools protocol and
//! exposes the small surface the scraper needs: navigation, element text
//! reads, and shutdown. The process starts lazily on first use and is
//! reused until [`BrowserSession::shutdown`] closes it.

use crate::{
    error::{AppError, Result},
    log_debug, log_info, log_warn,
    logging::Logger,
    models::Config,
};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tokio::task::JoinHandle;

/// Viewport applied at launch
const WINDOW_WIDTH: u32 = 1280;
const WINDOW_HEIGHT: u32 = 720;

/// Locate an installed Chrome or Chromium executable.
///
/// Probes the platform's usual install locations and returns the first
/// path that exists, or `None` if no browser could be found.
pub fn detect_browser() -> Option<PathBuf> {
    browser_candidate_paths()
        .into_iter()
        .find(|path| path.exists())
}

/// Candidate executable paths for the current platform, in probe order.
fn browser_candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    #[cfg(target_os = "macos")]
    {
        paths.push(PathBuf::from(
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        ));
        paths.push(PathBuf::from(
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
        ));
        paths.push(PathBuf::from(
            "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
        ));
        if let Ok(home) = std::env::var("HOME") {
            paths.push(PathBuf::from(format!(
                "{}/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
                home
            )));
        }
    }

    #[cfg(target_os = "linux")]
    {
        paths.push(PathBuf::from("/usr/bin/google-chrome"));
        paths.push(PathBuf::from("/usr/bin/google-chrome-stable"));
        paths.push(PathBuf::from("/usr/bin/chromium"));
        paths.push(PathBuf::from("/usr/bin/chromium-browser"));
        paths.push(PathBuf::from("/usr/local/bin/google-chrome"));
        paths.push(PathBuf::from("/usr/local/bin/chromium"));
        paths.push(PathBuf::from("/snap/bin/chromium"));
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(program_files) = std::env::var("ProgramFiles") {
            paths.push(PathBuf::from(format!(
                "{}\\Google\\Chrome\\Application\\chrome.exe",
                program_files
            )));
            paths.push(PathBuf::from(format!(
                "{}\\Chromium\\Application\\chrome.exe",
                program_files
            )));
            paths.push(PathBuf::from(format!(
                "{}\\Microsoft\\Edge\\Application\\msedge.exe",
                program_files
            )));
        }
        if let Ok(program_files_x86) = std::env::var("ProgramFiles(x86)") {
            paths.push(PathBuf::from(format!(
                "{}\\Google\\Chrome\\Application\\chrome.exe",
                program_files_x86
            )));
            paths.push(PathBuf::from(format!(
                "{}\\Chromium\\Application\\chrome.exe",
                program_files_x86
            )));
        }
        if let Ok(local_app_data) = std::env::var("LOCALAPPDATA") {
            paths.push(PathBuf::from(format!(
                "{}\\Google\\Chrome\\Application\\chrome.exe",
                local_app_data
            )));
        }
    }

    paths
}

/// Resolve the executable to launch.
///
/// An explicitly configured path wins and must exist; otherwise the
/// platform's install locations are searched.
pub fn resolve_executable(configured: Option<&str>) -> Result<PathBuf> {
    if let Some(configured) = configured {
        let path = PathBuf::from(configured);
        if path.exists() {
            return Ok(path);
        }
        return Err(AppError::browser(format!(
            "Configured browser executable does not exist: {}",
            path.display()
        )));
    }

    detect_browser().ok_or_else(|| {
        AppError::browser(
            "No Chrome or Chromium installation found. Install a browser, \
             set BROWSER_PATH, or switch to --engine http",
        )
    })
}

/// Live browser process plus the page it drives.
struct BrowserState {
    browser: Browser,
    page: Page,
    handler_handle: JoinHandle<()>,
}

/// Lazily launched headless browser session.
///
/// The Chrome process starts on the first navigation and stays up until
/// [`shutdown`](Self::shutdown), so repeated element reads reuse one page.
pub struct BrowserSession {
    state: Arc<Mutex<Option<BrowserState>>>,
    browser_path: Option<String>,
    logger: Logger,
}

impl BrowserSession {
    /// Create a session. No browser process is started yet.
    pub fn new(config: &Config) -> Self {
        Self {
            state: Arc::new(Mutex::new(None)),
            browser_path: config.browser_path.clone(),
            logger: Logger::with_config("browser".to_string(), config),
        }
    }

    /// Launch the browser if it is not already running.
    async fn ensure_started(&self) -> Result<MutexGuard<'_, Option<BrowserState>>> {
        let mut guard = self.state.lock().await;

        if guard.is_none() {
            let executable = resolve_executable(self.browser_path.as_deref())?;
            log_info!(
                self.logger,
                "Launching headless browser: {}",
                executable.display()
            );

            let browser_config = BrowserConfig::builder()
                .chrome_executable(&executable)
                .no_sandbox()
                .arg("--disable-gpu")
                .arg("--disable-dev-shm-usage")
                .arg("--disable-extensions")
                .window_size(WINDOW_WIDTH, WINDOW_HEIGHT)
                .build()
                .map_err(|e| AppError::browser(format!("Failed to build browser config: {}", e)))?;

            let (browser, mut handler) = Browser::launch(browser_config)
                .await
                .map_err(|e| AppError::browser(format!("Failed to launch browser: {}", e)))?;

            // Pump DevTools protocol messages until the connection drops.
            let handler_handle = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });

            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| AppError::browser(format!("Failed to open a page: {}", e)))?;

            *guard = Some(BrowserState {
                browser,
                page,
                handler_handle,
            });
        }

        Ok(guard)
    }

    /// Navigate the session page to the given URL, launching on first use.
    pub async fn goto(&self, url: &str) -> Result<()> {
        let mut guard = self.ensure_started().await?;
        let state = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Browser state missing after launch"))?;

        log_debug!(self.logger, "Navigating to {}", url);
        state
            .page
            .goto(url)
            .await
            .map_err(|e| AppError::browser(format!("Navigation to '{}' failed: {}", url, e)))?;

        if let Some(title) = page_title(&state.page).await {
            log_debug!(self.logger, "Page loaded: {}", title);
        }

        Ok(())
    }

    /// Read the trimmed inner text of the first element matching `selector`.
    ///
    /// Returns `Ok(None)` while no such element exists or its text is empty;
    /// a page still building its measurement widget is not an error.
    pub async fn element_text(&self, selector: &str) -> Result<Option<String>> {
        let mut guard = self.ensure_started().await?;
        let state = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Browser state missing after launch"))?;

        let element = match state.page.find_element(selector).await {
            Ok(element) => element,
            Err(_) => return Ok(None),
        };

        let text = element.inner_text().await.map_err(|e| {
            AppError::scrape(format!("Failed to read text of '{}': {}", selector, e))
        })?;

        Ok(text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()))
    }

    /// Whether the browser process has been launched.
    pub async fn is_running(&self) -> bool {
        self.state.lock().await.is_some()
    }

    /// Close the browser process and reap it. Safe to call when the
    /// session never launched, and safe to call more than once.
    pub async fn shutdown(&self) {
        let mut guard = self.state.lock().await;
        if let Some(mut state) = guard.take() {
            log_debug!(self.logger, "Closing browser");
            if let Err(e) = state.browser.close().await {
                log_warn!(self.logger, "Error closing browser: {}", e);
            }
            let _ = state.browser.wait().await;
            state.handler_handle.abort();
        }
    }
}

async fn page_title(page: &Page) -> Option<String> {
    page.evaluate("document.title")
        .await
        .ok()
        .and_then(|value| value.into_value::<String>().ok())
        .filter(|title| !title.is_empty())
}
