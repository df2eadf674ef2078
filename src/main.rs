use std::{process, sync::Arc};

use serde_json::Value;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;
use zyborn::{
    application::{
        auth::OAuthService,
        broadcast::BroadcastService,
        chips::ChipVerificationService,
        error::AppError,
        press::PressInquiryService,
        preview::render_page,
        subscribers::{FooterSubscribeService, SubscribeService},
        verification::VerificationService,
    },
    config,
    domain::pages::{PageDocument, PageKind},
    infra::{
        error::InfraError,
        github::GitHubExchanger,
        http::{self, ApiState},
        resend::ResendMailer,
        supabase::SupabaseRest,
        telemetry,
        turnstile::TurnstileVerifier,
    },
};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Render(args) => run_render(args).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let state = build_api_state(&settings);
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.public_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "zyborn::serve",
        addr = %settings.server.public_addr,
        graceful_shutdown_secs = settings.server.graceful_shutdown.as_secs(),
        "listening"
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
    }
}

fn build_api_state(settings: &config::Settings) -> ApiState {
    let client = reqwest::Client::new();

    let supabase = Arc::new(SupabaseRest::from_settings(
        client.clone(),
        &settings.supabase,
    ));
    let mailer = Arc::new(ResendMailer::new(
        client.clone(),
        settings.mail.api_key.clone(),
    ));
    let captcha = Arc::new(TurnstileVerifier::new(
        client.clone(),
        settings.turnstile.secret_key.clone(),
    ));
    let exchanger = Arc::new(GitHubExchanger::new(
        client,
        settings.oauth.github_client_id.clone(),
        settings.oauth.github_client_secret.clone(),
    ));

    let sender = settings.mail.sender();

    ApiState {
        subscribe: Arc::new(SubscribeService::new(
            supabase.clone(),
            mailer.clone(),
            sender.clone(),
        )),
        footer: Arc::new(FooterSubscribeService::new(
            supabase.clone(),
            captcha,
            mailer.clone(),
            sender.clone(),
        )),
        press: Arc::new(PressInquiryService::new(
            supabase.clone(),
            mailer.clone(),
            settings.mail.press_sender(),
            settings.mail.press_address.clone(),
        )),
        verification: Arc::new(VerificationService::new(supabase.clone())),
        broadcast: Arc::new(BroadcastService::new(
            supabase.clone(),
            mailer,
            sender,
            settings.broadcast.secret_key.clone().unwrap_or_default(),
        )),
        chips: Arc::new(ChipVerificationService::new(supabase)),
        oauth: Arc::new(OAuthService::new(
            settings.oauth.github_client_id.clone(),
            settings.server.canonical_host.clone(),
            exchanger,
        )),
    }
}

async fn run_render(args: config::RenderArgs) -> Result<(), AppError> {
    let raw = tokio::fs::read_to_string(&args.file)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    // Parse once to read the front matter, then settle the collection:
    // flag beats front matter beats the custom_pages default.
    let parsed = PageDocument::from_markdown(PageKind::Custom, &raw).map_err(AppError::from)?;
    let collection = args
        .collection
        .clone()
        .or_else(|| {
            parsed
                .data
                .get("collection")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| "custom_pages".to_string());
    let kind = PageKind::from_collection(&collection).map_err(AppError::from)?;

    let doc = PageDocument {
        kind,
        data: parsed.data,
        body: parsed.body,
    };
    let html = render_page(&doc, chrono::Utc::now());

    match args.output {
        Some(path) => {
            tokio::fs::write(&path, html)
                .await
                .map_err(|err| AppError::from(InfraError::from(err)))?;
            info!(
                target = "zyborn::render",
                input = %args.file.display(),
                output = %path.display(),
                collection = %collection,
                "preview written"
            );
        }
        None => println!("{html}"),
    }

    Ok(())
}
