// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Triton-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Triton and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Triton CLI entrypoint.
//!
//! By default this serves the editor page and the render API at `http://127.0.0.1:3000/`.
//!
//! Use `render <file>` to push a diagram through a running service and save the SVG.

use std::error::Error;
use std::fs;
use std::io;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;
use triton::client::{Editor, RenderClient, DEFAULT_SERVER_URL};
use triton::config::{RendererKind, ServeConfig, DEFAULT_PORT};
use triton::server::AppState;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [serve] [--host <addr>] [--port <port>] [--theme <name>] [--font-family <stack>]\n      [--css <file>] [--background <color>] [--renderer cli] [--mmdc <path>] [--puppeteer-config <file>]\n  {program} [serve] --renderer remote [--remote-url <url>] [...]\n  {program} render <file|-> [--server <url>] [--output <file>]\n\nserve (default) hosts the editor at `/` and the render API at `/api/mermaid` (port {DEFAULT_PORT} by default).\n--renderer cli runs the Mermaid CLI (`mmdc`, override with --mmdc); --renderer remote posts to a\nKroki-compatible server (--remote-url, default https://kroki.io).\n--theme is one of default, neutral, dark, forest, base. --css injects extra CSS into every diagram.\n\nrender reads Mermaid source from a file (or stdin with `-`), renders it through a running service\n(--server, default {DEFAULT_SERVER_URL}) and writes the SVG to --output (default {}).\n\nLogging is controlled by RUST_LOG (default `triton=info`).",
        Editor::DOWNLOAD_FILE_NAME
    );
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RenderOptions {
    input: String,
    server: Option<String>,
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CliCommand {
    Serve(ServeConfig),
    Render(RenderOptions),
    Help,
}

fn set_once<T>(slot: &mut Option<T>, value: T) -> Result<(), ()> {
    if slot.is_some() {
        return Err(());
    }
    *slot = Some(value);
    Ok(())
}

fn parse_options(args: impl Iterator<Item = String>) -> Result<CliCommand, ()> {
    let mut args = args.peekable();
    match args.peek().map(String::as_str) {
        Some("render") => {
            args.next();
            parse_render_options(args)
        }
        Some("serve") => {
            args.next();
            parse_serve_options(args)
        }
        _ => parse_serve_options(args),
    }
}

fn parse_serve_options(mut args: impl Iterator<Item = String>) -> Result<CliCommand, ()> {
    let mut config = ServeConfig::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(CliCommand::Help),
            "--host" => set_once(&mut config.host, args.next().ok_or(())?)?,
            "--port" => {
                let raw = args.next().ok_or(())?;
                let port: u16 = raw.parse().map_err(|_| ())?;
                set_once(&mut config.port, port)?;
            }
            "--renderer" => {
                let raw = args.next().ok_or(())?;
                let kind: RendererKind = raw.parse().map_err(|_| ())?;
                set_once(&mut config.renderer, kind)?;
            }
            "--mmdc" => set_once(&mut config.mmdc, PathBuf::from(args.next().ok_or(())?))?,
            "--puppeteer-config" => {
                set_once(&mut config.puppeteer_config, PathBuf::from(args.next().ok_or(())?))?
            }
            "--remote-url" => set_once(&mut config.remote_url, args.next().ok_or(())?)?,
            "--theme" => {
                let raw = args.next().ok_or(())?;
                set_once(&mut config.theme, raw.parse().map_err(|_| ())?)?;
            }
            "--font-family" => set_once(&mut config.font_family, args.next().ok_or(())?)?,
            "--css" => set_once(&mut config.css, PathBuf::from(args.next().ok_or(())?))?,
            "--background" => set_once(&mut config.background, args.next().ok_or(())?)?,
            _ => return Err(()),
        }
    }

    match config.renderer_kind() {
        RendererKind::Cli if config.remote_url.is_some() => return Err(()),
        RendererKind::Remote if config.mmdc.is_some() || config.puppeteer_config.is_some() => {
            return Err(())
        }
        _ => {}
    }

    Ok(CliCommand::Serve(config))
}

fn parse_render_options(mut args: impl Iterator<Item = String>) -> Result<CliCommand, ()> {
    let mut input = None;
    let mut server = None;
    let mut output = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(CliCommand::Help),
            "--server" => set_once(&mut server, args.next().ok_or(())?)?,
            "-o" | "--output" => set_once(&mut output, PathBuf::from(args.next().ok_or(())?))?,
            "-" => set_once(&mut input, arg)?,
            _ if arg.starts_with('-') => return Err(()),
            _ => set_once(&mut input, arg)?,
        }
    }

    Ok(CliCommand::Render(RenderOptions { input: input.ok_or(())?, server, output }))
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("triton=info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

fn run_serve(config: ServeConfig) -> Result<(), Box<dyn Error>> {
    let renderer = config.build_renderer()?;
    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind((config.host(), config.port())).await?;
        tracing::info!(
            addr = %listener.local_addr()?,
            renderer = renderer.name(),
            theme = %config.theme.unwrap_or_default(),
            "mermaid renderer listening"
        );
        triton::server::serve(listener, AppState::new(renderer), shutdown_signal()).await?;
        Ok::<(), Box<dyn Error>>(())
    })
}

fn run_render(options: RenderOptions) -> Result<(), Box<dyn Error>> {
    let source = if options.input == "-" {
        io::read_to_string(io::stdin())?
    } else {
        fs::read_to_string(&options.input)
            .map_err(|err| format!("failed to read {}: {err}", options.input))?
    };
    let server = options.server.as_deref().unwrap_or(DEFAULT_SERVER_URL);
    let output = options.output.unwrap_or_else(|| PathBuf::from(Editor::DOWNLOAD_FILE_NAME));

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    runtime.block_on(async {
        let client = RenderClient::new(server)?;
        let mut editor = Editor::new(source);
        editor.render(&client).await?;
        editor.download(&output)?;
        tracing::info!(output = %output.display(), "saved rendered diagram");
        Ok::<(), Box<dyn Error>>(())
    })
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "triton".to_owned());

        let command = match parse_options(args) {
            Ok(command) => command,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_tracing();

        match command {
            CliCommand::Help => {
                print_usage(&program);
                Ok(())
            }
            CliCommand::Serve(config) => run_serve(config),
            CliCommand::Render(options) => run_render(options),
        }
    })();

    if let Err(err) = result {
        eprintln!("triton: {err}");
        std::process::exit(1);
    }
}
