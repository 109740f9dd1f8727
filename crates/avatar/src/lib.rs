//! Avatar capture flow for the blockDAG dashboard.
//!
//! Acquires a camera, snapshots one frame, encodes it as JPEG/base64 and
//! asks a description service for a lifelike avatar description:
//!
//! `camera -> capture -> encoding -> describe -> surface`
//!
//! [`flow::AvatarFlow`] drives the whole sequence as a state machine and
//! publishes every transition so a view layer can follow along.

pub mod camera;
pub mod capture;
pub mod config;
pub mod describe;
pub mod encoding;
pub mod flow;
pub mod surface;

pub use camera::{CameraDevice, CameraError, CameraSession, Raster, VideoStream};
pub use describe::{DescriptionRequest, DescriptionService, GeminiDescriber, AVATAR_INSTRUCTION};
pub use encoding::{CapturedFrame, FrameEncoder};
pub use flow::{AvatarFlow, ExitHandle, FlowError, FlowState};
pub use surface::{DescriptionResult, SurfaceView};
