//! Test doubles shared by the avatar flow integration tests.

#![allow(dead_code)]

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use blockdag_avatar::{
    CameraDevice, DescriptionRequest, DescriptionService, FlowState, Raster, VideoStream,
};
use image::Rgb;
use tokio::sync::{broadcast, Notify};

// ---------------------------------------------------------------------------
// Camera
// ---------------------------------------------------------------------------

/// What the fake camera does when opened / read.
#[derive(Clone, Copy)]
pub enum CameraBehaviour {
    Works,
    FailsToOpen(io::ErrorKind),
    FailsToOpenErrno(i32),
    FailsToRead(i32),
    /// `open` never resolves.
    Hangs,
}

pub struct FakeCamera {
    behaviour: CameraBehaviour,
    pub opens: AtomicUsize,
    pub stops: Arc<AtomicUsize>,
}

impl FakeCamera {
    pub fn new(behaviour: CameraBehaviour) -> Arc<Self> {
        Arc::new(Self {
            behaviour,
            opens: AtomicUsize::new(0),
            stops: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CameraDevice for FakeCamera {
    async fn open(&self) -> io::Result<Box<dyn VideoStream>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        match self.behaviour {
            CameraBehaviour::Hangs => std::future::pending().await,
            CameraBehaviour::FailsToOpen(kind) => {
                Err(io::Error::new(kind, "NotAllowedError: platform said no"))
            }
            CameraBehaviour::FailsToOpenErrno(errno) => Err(io::Error::from_raw_os_error(errno)),
            CameraBehaviour::Works | CameraBehaviour::FailsToRead(_) => Ok(Box::new(FakeStream {
                read_errno: match self.behaviour {
                    CameraBehaviour::FailsToRead(errno) => Some(errno),
                    _ => None,
                },
                stops: Arc::clone(&self.stops),
            })),
        }
    }
}

struct FakeStream {
    read_errno: Option<i32>,
    stops: Arc<AtomicUsize>,
}

impl VideoStream for FakeStream {
    fn resolution(&self) -> (u32, u32) {
        (32, 24)
    }

    fn current_frame(&mut self) -> io::Result<Raster> {
        if let Some(errno) = self.read_errno {
            return Err(io::Error::from_raw_os_error(errno));
        }
        Ok(Raster::from_fn(32, 24, |x, y| Rgb([(x * 8) as u8, (y * 10) as u8, 128])))
    }

    fn stop(&mut self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// Description service
// ---------------------------------------------------------------------------

pub enum Reply {
    Text(&'static str),
    NetworkError,
    /// Never resolves; used to test exit during an in-flight request.
    Hang,
}

/// Fields of a request as seen by the fake service.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub instruction: String,
    pub mime_type: String,
    pub data: String,
}

pub struct FakeDescriber {
    reply: Reply,
    pub seen: Mutex<Vec<SeenRequest>>,
    pub started: Arc<Notify>,
}

impl FakeDescriber {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            seen: Mutex::new(Vec::new()),
            started: Arc::new(Notify::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl DescriptionService for FakeDescriber {
    async fn describe(&self, request: DescriptionRequest) -> anyhow::Result<String> {
        self.seen.lock().unwrap().push(SeenRequest {
            instruction: request.instruction().to_string(),
            mime_type: request.frame().mime_type().to_string(),
            data: request.frame().data().to_string(),
        });
        self.started.notify_one();

        match self.reply {
            Reply::Text(text) => Ok(text.to_string()),
            Reply::NetworkError => Err(anyhow::anyhow!("connection reset by peer")),
            Reply::Hang => std::future::pending().await,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Every transition broadcast so far.
pub fn drain(rx: &mut broadcast::Receiver<FlowState>) -> Vec<FlowState> {
    let mut states = Vec::new();
    while let Ok(state) = rx.try_recv() {
        states.push(state);
    }
    states
}
