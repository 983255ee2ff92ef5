// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// InkBridge — command-line front end.
//
// Entry point. Initialises logging, loads config and certificate, replays a
// stroke file through the bridge, and prints the transcription and LaTeX.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use inkbridge_core::error::{InkBridgeError, Result};
use inkbridge_core::human_errors::humanize_error;
use inkbridge_core::{BridgeConfig, StrokeInput};
use inkbridge_credentials::CredentialStore;
use inkbridge_engine::{platform_engine, EngineFactory, MockEngineFactory};
use inkbridge_facade::InkBridge;

/// InkBridge - handwriting to text and LaTeX
#[derive(Parser, Debug)]
#[command(name = "inkbridge", version)]
#[command(about = "Recognize handwritten math or text strokes")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recognize a JSON file of strokes
    Recognize {
        /// JSON array of strokes: `[[x, y], ...]` or `{"x": [..], "y": [..], "t": [..]}`
        #[arg(short, long)]
        strokes: PathBuf,

        /// Engine certificate (binary or C source); overrides the config
        #[arg(long)]
        certificate: Option<PathBuf>,

        /// Content type tag, e.g. "Math" or "Text"
        #[arg(short = 't', long)]
        content_type: Option<String>,

        /// Bridge config file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Recognition engine to drive
        #[arg(long, value_enum, default_value_t = EngineKind::Mock)]
        engine: EngineKind,
    },
    /// Validate a certificate file and print its fingerprint
    Certificate {
        /// Certificate file (binary or C source)
        path: PathBuf,

        /// Fail unless the certificate has this SHA-256 (hex)
        #[arg(long)]
        expect_sha256: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum EngineKind {
    /// Deterministic demo engine
    Mock,
    /// The platform SDK, if this build links one
    Platform,
}

impl EngineKind {
    fn factory(self) -> Box<dyn EngineFactory> {
        match self {
            Self::Mock => Box::new(MockEngineFactory::new()),
            Self::Platform => platform_engine(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let outcome = match args.command {
        Command::Recognize {
            strokes,
            certificate,
            content_type,
            config,
            engine,
        } => recognize(&strokes, certificate, content_type, config.as_deref(), engine).await,
        Command::Certificate {
            path,
            expect_sha256,
        } => describe_certificate(&path, expect_sha256.as_deref()),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let human = humanize_error(&e);
            tracing::error!(error = %e, "inkbridge failed");
            eprintln!("{}", human.message);
            eprintln!("  {}", human.suggestion);
            ExitCode::FAILURE
        }
    }
}

async fn recognize(
    strokes_path: &Path,
    certificate: Option<PathBuf>,
    content_type: Option<String>,
    config_path: Option<&Path>,
    engine: EngineKind,
) -> Result<()> {
    let config = match config_path {
        Some(path) => BridgeConfig::load(path)?,
        None => BridgeConfig::default(),
    };

    let certificate_path = certificate
        .or_else(|| config.certificate_path.clone())
        .ok_or_else(|| {
            InkBridgeError::InvalidCertificate(
                "no certificate given; pass --certificate or set certificate_path".into(),
            )
        })?;
    let credentials =
        CredentialStore::load_pinned(&certificate_path, config.certificate_sha256.as_deref())?;

    let inputs: Vec<StrokeInput> = serde_json::from_str(&std::fs::read_to_string(strokes_path)?)?;
    let tag = content_type.unwrap_or_else(|| config.default_content_type.to_string());
    tracing::info!(strokes = inputs.len(), content_type = %tag, "replaying stroke file");

    let bridge = InkBridge::spawn(engine.factory(), &config)?;
    bridge.initialize(credentials.certificate().clone()).await?;
    if let Some(sha256) = bridge.certificate_fingerprint().await? {
        tracing::info!(%sha256, "engine running");
    }

    let session = bridge.create_session(tag).await?;
    for input in inputs {
        bridge.ingest_input(session, input).await?;
    }
    let result = bridge.recognize(session).await?;
    bridge.close(session).await?;
    bridge.dispose().await?;

    println!("text:  {}", result.text);
    println!("latex: {}", result.latex);
    Ok(())
}

fn describe_certificate(path: &Path, expect_sha256: Option<&str>) -> Result<()> {
    let store = CredentialStore::load_pinned(path, expect_sha256)?;
    let certificate = store.certificate();
    println!("path:        {}", path.display());
    println!("bytes:       {}", certificate.len());
    println!("sha256:      {}", certificate.fingerprint());
    if expect_sha256.is_some() {
        println!("pin:         ok");
    }
    Ok(())
}
