use crate::domain::validation::{SyntaxEmailRule, Validator};
use crate::domain::{Navigator, NotificationKind, SessionStore};
use crate::frameworks::config::{self, AppConfig};
use crate::interface_adapters::clients::AuthClient;
use crate::interface_adapters::events::{FormDriver, FormEvent};
use crate::interface_adapters::state::{FileSessionStore, InMemorySessionStore};
use crate::interface_adapters::ui::{RouteHistory, ToastTray};
use crate::use_cases::{LoginForm, SubmitLoginUseCase};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

fn init_tracing() {
    // RUST_LOG wins; otherwise log at info.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // Diagnostics go to stderr; stdout carries the prompts and the outcome.
    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        // Structured output for log shippers.
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .init();
    } else {
        // Human-readable output for local runs.
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    // Route panics through tracing so they land in the same log stream.
    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run() -> ExitCode {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    // Logging comes up before anything that can fail.
    init_tracing();

    // Defaults, then the optional TOML file, then environment overrides.
    let config = match config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    // Base URL joined with the login path.
    let login_url = match config.login_url() {
        Ok(url) => url,
        Err(e) => {
            tracing::error!(error = %e, "invalid login endpoint");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(login_url = %login_url, "auth client configured.");

    // One HTTP client for the life of the process.
    let auth = match AuthClient::new(login_url, config.request_timeout()) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "failed to build http client");
            return ExitCode::FAILURE;
        }
    };

    // Persist the session only when a file is configured.
    match config.session_file.clone() {
        Some(path) => {
            tracing::debug!(path = %path.display(), "persisting session to file.");
            host(config, auth, FileSessionStore::new(path)).await
        }
        None => host(config, auth, InMemorySessionStore::default()).await,
    }
}

async fn host<S>(config: AppConfig, auth: AuthClient, sessions: S) -> ExitCode
where
    S: SessionStore + 'static,
{
    // The host starts on the login screen.
    let routes = RouteHistory::new(config.login_route.clone());

    // A stored session skips the form entirely.
    match sessions.current().await {
        Ok(Some(_)) => {
            routes.navigate_to(&config.home_route);
            println!("already signed in; route: {}", routes.current());
            return ExitCode::SUCCESS;
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "stored session unreadable; ignoring it."),
    }

    // Wire the submit use case to the terminal adapters.
    let toasts = ToastTray::new();
    let use_case = Arc::new(SubmitLoginUseCase {
        auth,
        sessions,
        notifier: toasts.clone(),
        navigator: routes.clone(),
        validator: Validator::new(SyntaxEmailRule),
        policy: config.dispatch_policy(),
    });

    // The driver owns the form and consumes events from stdin.
    let (tx, rx) = mpsc::channel(16);
    let driver = FormDriver {
        form: LoginForm::new(),
        use_case,
        register_route: config.register_route.clone(),
    };
    let handle = tokio::spawn(driver.run(rx));

    // Feed the two inputs and the submit click.
    if let Err(e) = feed_stdin(&tx).await {
        tracing::error!(error = %e, "failed to read credentials");
    }
    // Closing the channel lets the driver finish once the submit resolves.
    drop(tx);

    // Wait for the driver to drain its outstanding submit.
    let results = match handle.await {
        Ok(results) => results,
        Err(e) => {
            tracing::error!(error = %e, "form driver failed");
            return ExitCode::FAILURE;
        }
    };

    // Print every toast that was shown, then where the host ended up.
    for toast in toasts.history() {
        let kind = match toast.kind {
            NotificationKind::Success => "ok",
            NotificationKind::Error => "error",
        };
        println!("[{kind}] {}: {}", toast.title, toast.message);
    }
    println!("route: {}", routes.current());

    // Success only if a session was established.
    if results.iter().any(Result::is_ok) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

// Terminal stand-in for the two inputs and the sign-in button.
async fn feed_stdin(tx: &mpsc::Sender<FormEvent>) -> Result<(), Box<dyn std::error::Error>> {
    // Line-oriented reads; a closed stdin yields empty values.
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    // First line is the email.
    println!("email:");
    let email = lines.next_line().await?.unwrap_or_default();
    tx.send(FormEvent::EmailChanged(email.trim_end_matches('\r').to_string()))
        .await?;

    // Second line is the password.
    println!("password:");
    let password = lines.next_line().await?.unwrap_or_default();
    tx.send(FormEvent::PasswordChanged(
        password.trim_end_matches('\r').to_string(),
    ))
    .await?;

    // Then press sign in.
    tx.send(FormEvent::Submit).await?;
    Ok(())
}
