use anyhow::{Context, Result, anyhow};
use std::process::Stdio;
use tokio::{
  io::BufReader as TokioBufReader,
  io::AsyncBufReadExt,
  process::{Child as TokioChild, Command},
  sync::mpsc,
  task::JoinHandle,
};
use tracing::{info, warn};

/// What the player region should show.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlayerState {
  #[default]
  Idle,
  Playing { slug: String },
  /// Media could not be played. Shown inline in the player region only.
  Failed { slug: String, reason: String },
}

/// Plays a video's `video_url` through an external `mpv` process.
pub struct MediaPlayer {
  current_process: Option<TokioChild>,
  pub state: PlayerState,
  monitor_handle: Option<JoinHandle<()>>,
  status_rx: Option<mpsc::Receiver<String>>,
  last_status: Option<String>,
  ipc_socket_path: Option<String>,
  pub paused: bool,
}

impl MediaPlayer {
  pub fn new() -> Self {
    Self {
      current_process: None,
      state: PlayerState::Idle,
      monitor_handle: None,
      status_rx: None,
      last_status: None,
      ipc_socket_path: None,
      paused: false,
    }
  }

  pub fn is_playing(&self) -> bool {
    self.current_process.is_some()
  }

  /// The player failure for `slug`, if the last attempt on that video failed.
  pub fn failure_for(&self, slug: &str) -> Option<&str> {
    match &self.state {
      PlayerState::Failed { slug: s, reason } if s == slug => Some(reason.as_str()),
      _ => None,
    }
  }

  pub fn last_status(&self) -> Option<&str> {
    self.last_status.as_deref()
  }

  /// Drain status lines and notice when mpv has exited on its own.
  pub fn check_status(&mut self) {
    if let Some(rx) = &mut self.status_rx {
      while let Ok(status) = rx.try_recv() {
        self.last_status = Some(status);
      }
    }

    let Some(child) = self.current_process.as_mut() else { return };
    match child.try_wait() {
      Ok(None) => {}
      Ok(Some(status)) => {
        let slug = match &self.state {
          PlayerState::Playing { slug } => slug.clone(),
          _ => String::new(),
        };
        self.current_process = None;
        self.reset_session();
        if status.success() {
          info!(slug = %slug, "player: playback finished");
          self.state = PlayerState::Idle;
        } else {
          warn!(slug = %slug, status = %status, "player: mpv exited with failure");
          self.state = PlayerState::Failed { slug, reason: format!("mpv exited with {}", status) };
        }
      }
      Err(e) => warn!(err = %e, "player: failed to poll mpv"),
    }
  }

  /// Start playback. A launch failure is recorded in `state` rather than returned,
  /// so it stays local to the player region.
  pub async fn play(&mut self, slug: &str, url: &str) {
    if let Err(e) = self.stop().await {
      warn!(err = %e, "player: failed to stop previous playback");
    }
    match self.spawn(url) {
      Ok(()) => {
        info!(slug = %slug, url = %url, "player: started");
        self.state = PlayerState::Playing { slug: slug.to_string() };
      }
      Err(e) => {
        warn!(slug = %slug, err = %e, "player: launch failed");
        self.state = PlayerState::Failed { slug: slug.to_string(), reason: format!("{:#}", e) };
      }
    }
  }

  fn spawn(&mut self, url: &str) -> Result<()> {
    let socket_path = std::env::temp_dir().join(format!("reel-mpv-{}.sock", std::process::id()));
    let socket_path_str = socket_path.to_str().context("Temp dir path is not valid UTF-8")?.to_string();
    // Remove stale socket if it exists from a previous crash.
    let _ = std::fs::remove_file(&socket_path);

    let mut cmd = Command::new("mpv");
    cmd.args([
      "--force-window=yes",
      "--term-status-msg=Time: ${time-pos/full} / ${duration/full} | ${pause} ${percent-pos}%",
      &format!("--input-ipc-server={}", socket_path_str),
      "--",
      url,
    ]);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    // stderr is never drained; a full pipe would block mpv.
    cmd.stderr(Stdio::null());
    cmd.kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|e| {
      if e.kind() == std::io::ErrorKind::NotFound {
        anyhow!("mpv not found. Install it with: brew install mpv (macOS) or apt install mpv (Linux)")
      } else {
        anyhow!(e).context("Failed to spawn mpv process")
      }
    })?;

    let stdout = child.stdout.take().context("Failed to get mpv stdout")?;
    let (tx, rx) = mpsc::channel::<String>(10);
    self.status_rx = Some(rx);

    let monitor_handle = tokio::spawn(async move {
      let reader = TokioBufReader::new(stdout);
      let mut lines = reader.lines();
      while let Ok(Some(line)) = lines.next_line().await {
        if tx.send(line).await.is_err() {
          break;
        }
      }
    });

    self.current_process = Some(child);
    self.monitor_handle = Some(monitor_handle);
    self.ipc_socket_path = Some(socket_path_str);
    self.paused = false;
    Ok(())
  }

  pub async fn toggle_pause(&mut self) -> Result<()> {
    let Some(ref socket_path) = self.ipc_socket_path else {
      return Ok(());
    };
    let stream = tokio::net::UnixStream::connect(socket_path).await.context("Failed to connect to mpv IPC socket")?;
    stream.writable().await.context("mpv IPC socket not writable")?;
    let cmd = b"{\"command\":[\"cycle\",\"pause\"]}\n";
    let written = stream.try_write(cmd).context("Failed to send pause command to mpv")?;
    if written < cmd.len() {
      return Err(anyhow!("Partial write to mpv IPC socket: wrote {} of {} bytes", written, cmd.len()));
    }
    self.paused = !self.paused;
    Ok(())
  }

  pub async fn stop(&mut self) -> Result<()> {
    if let Some(mut child) = self.current_process.take() {
      child.kill().await.context("Failed to kill mpv process")?;
      let _ = child.wait().await;
    }
    self.reset_session();
    self.state = PlayerState::Idle;
    Ok(())
  }

  fn reset_session(&mut self) {
    if let Some(handle) = self.monitor_handle.take() {
      handle.abort();
    }
    self.status_rx = None;
    self.last_status = None;
    self.paused = false;
    if let Some(path) = self.ipc_socket_path.take() {
      let _ = std::fs::remove_file(&path);
    }
  }
}

impl Default for MediaPlayer {
  fn default() -> Self {
    Self::new()
  }
}
