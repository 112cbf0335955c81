//! Chromium-backed portal page using chromiumoxide.
//!
//! Every command goes through one fixed script that receives the command as
//! a JSON literal. Page loads are detected with a marker property set on the
//! window of each document once it has been seen; a fresh document starts
//! without it.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};

use arsd_sync::{Ack, Command, PortalPage, SyncError, SyncResult};

use crate::config::default_dir;

/// Environment variable naming the browser binary.
pub const CHROMIUM_ENV: &str = "ARSD_CHROMIUM_PATH";

/// Builds unpacked under `~/.arsd-sync/chromium`.
const BUNDLED_BUILDS: &[&str] = &[
    "chrome-linux64/chrome",
    "chrome-mac-arm64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing",
    "chrome-mac-x64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing",
    "chrome",
];

/// Looked up on PATH in this order.
const PATH_BROWSERS: &[&str] = &["google-chrome", "chromium", "chromium-browser"];

const MACOS_CHROME: &str = "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome";

/// Runs one [`Command`] and returns `"done"` or `"not_found"`.
const COMMAND_SCRIPT: &str = r#"(cmd) => {
  if (cmd.op === "navigate") {
    window.location.href = cmd.url;
    return "done";
  }
  const t = cmd.target;
  let el = null;
  if (t.by === "id") el = document.getElementById(t.id);
  else if (t.by === "css") el = document.querySelector(t.selector);
  else if (t.by === "nth") el = document.getElementsByTagName(t.tag)[t.index] || null;
  if (!el) return "not_found";
  if (cmd.op === "fill") el.value = cmd.value;
  else if (cmd.op === "select") el.selectedIndex = cmd.index;
  else if (cmd.op === "click") el.click();
  return "done";
}"#;

/// True exactly once per loaded document.
const LOAD_MARKER: &str = r#"(() => {
  if (window.__arsdSyncSeen || document.readyState !== "complete") return false;
  window.__arsdSyncSeen = true;
  return true;
})()"#;

/// Consecutive marker errors tolerated while a document is swapped out.
const MAX_MARKER_ERRORS: u32 = 20;

#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Show the browser window.
    pub headful: bool,
    /// Explicit browser binary; searched for when unset.
    pub executable: Option<PathBuf>,
    /// Interval between load checks.
    pub poll_interval: Duration,
    /// How long `launch` waits for the login document to finish loading.
    pub first_load_timeout: Duration,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headful: false,
            executable: None,
            poll_interval: Duration::from_millis(250),
            first_load_timeout: Duration::from_secs(30),
        }
    }
}

impl LaunchOptions {
    /// The browser to start: `executable` when set, otherwise the first of
    /// `ARSD_CHROMIUM_PATH`, a bundled build, a browser on PATH, or the stock
    /// macOS install that exists.
    pub fn browser_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.executable {
            return Some(path.clone());
        }

        let from_env = std::env::var_os(CHROMIUM_ENV).map(PathBuf::from);
        let root = default_dir().join("chromium");
        let bundled = BUNDLED_BUILDS.iter().map(|build| root.join(build));
        from_env
            .into_iter()
            .chain(bundled)
            .find(|path| path.is_file())
            .or_else(|| PATH_BROWSERS.iter().find_map(|name| which::which(name).ok()))
            .or_else(|| Some(PathBuf::from(MACOS_CHROME)).filter(|path| path.is_file()))
    }
}

/// One browser with a single page.
pub struct ChromiumPage {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    poll_interval: Duration,
}

impl Drop for ChromiumPage {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}

fn transport(e: impl std::fmt::Display) -> SyncError {
    SyncError::Transport(e.to_string())
}

impl ChromiumPage {
    /// Launch Chromium and open `url`. Returns once the first document has
    /// loaded; that document counts as already seen.
    pub async fn launch(url: &str, options: &LaunchOptions) -> Result<Self> {
        let chrome_path = options
            .browser_path()
            .with_context(|| format!("Chromium not found. Install Chrome or set {CHROMIUM_ENV}."))?;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--no-first-run")
            .arg("--no-default-browser-check");
        builder = if options.headful {
            builder.with_head()
        } else {
            builder.arg("--headless=new")
        };
        let config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch Chromium")?;
        let handler_task = tokio::spawn(async move { while (handler.next().await).is_some() {} });

        let page = browser
            .new_page(url)
            .await
            .with_context(|| format!("failed to open {url}"))?;

        let mut this = Self {
            browser,
            page,
            handler_task,
            poll_interval: options.poll_interval,
        };
        let loaded = this
            .wait_for_load(Some(options.first_load_timeout))
            .await
            .context("failed to mark the first document")?;
        if !loaded {
            bail!(
                "{url} did not finish loading within {}s",
                options.first_load_timeout.as_secs()
            );
        }
        tracing::info!(%url, "browser ready");
        Ok(this)
    }

    pub async fn close(mut self) -> Result<()> {
        self.browser
            .close()
            .await
            .context("failed to close Chromium")?;
        Ok(())
    }

    async fn eval<T: DeserializeOwned>(&self, script: String) -> SyncResult<T> {
        let result = self.page.evaluate(script).await.map_err(transport)?;
        result
            .into_value()
            .map_err(|e| SyncError::Transport(format!("unexpected script result: {e:?}")))
    }
}

#[async_trait]
impl PortalPage for ChromiumPage {
    async fn url(&self) -> SyncResult<String> {
        let url = self
            .page
            .url()
            .await
            .map_err(transport)?
            .map(|u| u.to_string())
            .unwrap_or_default();
        Ok(url)
    }

    async fn content(&self) -> SyncResult<String> {
        self.eval("document.documentElement.outerHTML".to_string())
            .await
    }

    async fn execute(&mut self, command: &Command) -> SyncResult<Ack> {
        let json = serde_json::to_string(command).map_err(transport)?;
        self.eval(format!("({COMMAND_SCRIPT})({json})")).await
    }

    async fn wait_for_load(&mut self, timeout: Option<Duration>) -> SyncResult<bool> {
        let this: &Self = self;
        await_fresh_document(
            move || this.eval::<bool>(LOAD_MARKER.to_string()),
            timeout,
            this.poll_interval,
        )
        .await
    }
}

/// Poll `marker` until it reports an unseen, fully loaded document.
/// `Ok(false)` once `timeout` passes; no timeout polls forever.
async fn await_fresh_document<F, Fut>(
    mut marker: F,
    timeout: Option<Duration>,
    interval: Duration,
) -> SyncResult<bool>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = SyncResult<bool>>,
{
    let deadline = timeout.map(|t| Instant::now() + t);
    let mut errors = 0;
    loop {
        match marker().await {
            Ok(true) => return Ok(true),
            Ok(false) => errors = 0,
            Err(e) => {
                // Evaluation fails while the old document is torn down.
                errors += 1;
                if errors >= MAX_MARKER_ERRORS {
                    return Err(e);
                }
                tracing::debug!("load marker unavailable: {e}");
            }
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            return Ok(false);
        }
        sleep(interval).await;
    }
}
