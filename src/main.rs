#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

mod app;
mod domain;
mod infra;
mod ui;
mod util;

use dioxus::prelude::*;

#[cfg(feature = "desktop")]
use dioxus_desktop::{
    tao::dpi::LogicalSize, tao::window::WindowBuilder, Config as DesktopConfig,
};

use crate::util::version::APP_NAME;

fn main() {
    configure_webview_env();

    let builder = LaunchBuilder::new();

    #[cfg(feature = "desktop")]
    let builder = {
        let config = desktop! {
            DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title(APP_NAME)
                    .with_inner_size(LogicalSize::new(1080.0, 760.0))
            )
        };
        builder.with_cfg(config)
    };

    #[cfg(not(feature = "desktop"))]
    let builder = builder;

    builder.launch(app::App);
}

/// Wayland workarounds, applied before the webview spins up.
fn configure_webview_env() {
    if std::env::var("WAYLAND_DISPLAY").is_err() {
        return;
    }

    // Explicit-sync crashes on some drivers; fall back to GL unless the
    // caller opts in.
    if std::env::var("WGPU_BACKEND").is_err() {
        std::env::set_var("WGPU_BACKEND", "gl");
    }

    // WebKit's DMABUF renderer opts into explicit sync; disable it unless
    // the user overrides.
    if std::env::var("WEBKIT_DISABLE_DMABUF_RENDERER").is_err() {
        std::env::set_var("WEBKIT_DISABLE_DMABUF_RENDERER", "1");
    }
}
