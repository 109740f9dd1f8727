//! `blockdag-avatar` -- terminal host for the avatar capture flow.
//!
//! Walks the dashboard shell from Profile into the avatar screen, starts
//! the camera preview, captures on Enter and prints the generated
//! description. Ctrl-C goes back to Profile from any point, abandoning
//! an in-flight request.
//!
//! # Environment variables
//!
//! | Variable             | Required | Default              | Description                          |
//! |----------------------|----------|----------------------|--------------------------------------|
//! | `GEMINI_API_KEY`     | yes      | --                   | Credential for the description model |
//! | `GEMINI_MODEL`       | no       | `gemini-2.5-flash`   | Pinned model name                    |
//! | `CAMERA_STILL_IMAGE` | no*      | --                   | Image file served as the camera      |
//! | `CAMERA_DEVICE`      | no       | `0`                  | `/dev/video` index (`v4l` feature)   |
//! | `APP_URL`            | no       | --                   | Page URL to render in the QR modal   |
//!
//! *Required unless built with the `v4l` feature.

use std::sync::Arc;

use blockdag_avatar::config::CameraSource;
use blockdag_avatar::surface::GENERATING_MESSAGE;
use blockdag_avatar::{AvatarFlow, ExitHandle, FlowState, GeminiDescriber};
use blockdag_core::panel::{panel, PROFILE_AVATAR_URL};
use blockdag_core::qr::{QR_HINT, QR_TITLE};
use blockdag_core::{Shell, Tab};
use blockdag_gemini::{GeminiApi, GeminiConfig};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blockdag_avatar=info,blockdag_gemini=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let camera = CameraSource::from_env().unwrap_or_else(|| {
        tracing::error!("CAMERA_STILL_IMAGE must be set when built without the v4l feature");
        std::process::exit(1);
    });
    let gemini = GeminiConfig::from_env();
    tracing::info!(?camera, model = %gemini.model, "Loaded avatar configuration");

    let mut shell = Shell::new();
    if let Ok(app_url) = std::env::var("APP_URL") {
        match shell.open_qr_modal(&app_url) {
            Ok(Some(modal)) => tracing::info!(qr = %modal.image_url, hint = QR_HINT, "{QR_TITLE}"),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Could not build QR modal URL"),
        }
        shell.close_qr_modal();
    }

    let nav: Vec<_> = Tab::ALL.iter().map(|t| t.label()).collect();
    tracing::debug!(?nav, "Dashboard navigation");

    shell.select_tab(Tab::Profile);
    let profile = panel(shell.view().tab());
    tracing::info!(panel = profile.title, avatar = PROFILE_AVATAR_URL, "{}", profile.blurb);
    shell.create_avatar()?;

    let describer = Arc::new(GeminiDescriber::new(GeminiApi::new(gemini)));
    let mut flow = AvatarFlow::new(camera.into_device(), describer);
    tracing::info!(flow_id = %flow.id(), "Avatar flow started");

    let exit = flow.exit_handle();
    let ctrl_c = exit.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.exit();
        }
    });

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    run(&mut flow, &exit, &mut stdin).await;

    flow.exit();
    shell.back_to_profile()?;
    println!("{}", flow.surface());
    Ok(())
}

/// Drive the flow until the user exits or closes stdin.
async fn run(flow: &mut AvatarFlow, exit: &ExitHandle, stdin: &mut Lines<BufReader<Stdin>>) {
    if flow.enter().await.is_err() {
        return;
    }

    loop {
        println!("{}", flow.surface());

        let prompt = match flow.state() {
            FlowState::Previewing => "Press Enter to capture, Ctrl-C to go back.",
            state if state.is_terminal() => "Press Enter to try again, Ctrl-C to go back.",
            _ => return,
        };
        println!("{prompt}");

        tokio::select! {
            _ = exit.requested() => return,
            line = stdin.next_line() => {
                if !matches!(line, Ok(Some(_))) {
                    return;
                }
            }
        }

        let step = if flow.state().is_terminal() {
            flow.restart().await
        } else {
            println!("{GENERATING_MESSAGE}");
            flow.capture().await
        };

        if let Err(e) = step {
            tracing::warn!(error = %e, "Avatar flow step rejected");
            return;
        }
        if let Some(frame) = flow.frame() {
            let (width, height) = frame.dimensions();
            tracing::info!(width, height, captured_at = %frame.captured_at(), "Captured frame");
        }
    }
}
