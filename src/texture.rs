// texture.rs — 后台线程加载全景图，通过通道回报进度/结果

use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread;

use image::io::Reader as ImageReader;
use image::RgbaImage;
use thiserror::Error;

const READ_CHUNK: usize = 256 * 1024;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("texture loader stopped without a result")]
    Abandoned,
}

#[derive(Debug)]
pub enum TextureEvent {
    Progress { loaded: u64, total: Option<u64> },
    Loaded(RgbaImage),
    Failed(TextureError),
}

impl TextureEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TextureEvent::Progress { .. })
    }
}

/// Receiving end of a single texture load.
///
/// At most one terminal event (`Loaded` or `Failed`) is ever handed out; a
/// loader that disappears without one is reported as `Failed(Abandoned)`.
pub struct TextureRequest {
    rx: Receiver<TextureEvent>,
    finished: bool,
}

impl TextureRequest {
    pub fn channel() -> (Sender<TextureEvent>, Self) {
        let (tx, rx) = channel();
        (
            tx,
            Self {
                rx,
                finished: false,
            },
        )
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Drain everything queued so far without blocking.
    pub fn poll(&mut self) -> Vec<TextureEvent> {
        let mut events = Vec::new();
        while !self.is_finished() {
            match self.rx.try_recv() {
                Ok(event) => {
                    self.finished = event.is_terminal();
                    events.push(event);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.finished = true;
                    events.push(TextureEvent::Failed(TextureError::Abandoned));
                }
            }
        }
        events
    }
}

/// Load and decode `path` on a worker thread.
pub fn spawn_load(path: &Path) -> TextureRequest {
    let (tx, request) = TextureRequest::channel();
    let path = path.to_path_buf();

    thread::spawn(move || {
        log::info!("loading panorama image from {}", path.display());
        let event = match load_with_progress(&path, &tx) {
            Ok(img) => {
                log::info!(
                    "panorama image decoded: {}x{}",
                    img.width(),
                    img.height()
                );
                TextureEvent::Loaded(img)
            }
            Err(e) => TextureEvent::Failed(e),
        };
        // 接收端已丢弃时无需处理
        let _ = tx.send(event);
    });

    request
}

fn load_with_progress(path: &Path, tx: &Sender<TextureEvent>) -> Result<RgbaImage, TextureError> {
    let mut file = File::open(path).map_err(|source| TextureError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let total = file.metadata().ok().map(|m| m.len());

    let mut bytes = Vec::with_capacity(total.unwrap_or(0) as usize);
    let mut chunk = vec![0u8; READ_CHUNK];
    loop {
        let n = file.read(&mut chunk).map_err(|source| TextureError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if n == 0 {
            break;
        }
        bytes.extend_from_slice(&chunk[..n]);
        let _ = tx.send(TextureEvent::Progress {
            loaded: bytes.len() as u64,
            total,
        });
    }

    let decode_err = |source: image::ImageError| TextureError::Decode {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?;
    reader.no_limits();
    let img = reader.decode().map_err(decode_err)?;

    Ok(img.to_rgba8())
}
