use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use secrecy::Secret;
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use crate::config::Settings;
use crate::email_client::EmailClient;
use crate::ledger::RedisLedger;
use crate::notifier::ChangeNotifier;
use crate::routes::{handle_student_updated, health_check};

/// Shared secret the Record Store presents when it calls the trigger endpoint.
pub struct TriggerToken(pub Secret<String>);

#[derive(thiserror::Error, Debug)]
pub enum StartupError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),
    #[error("Failed to build the mail relay client.")]
    EmailClient(#[from] reqwest::Error),
    #[error("Failed to open the Redis client.")]
    Redis(#[from] redis::RedisError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub struct Application {
    pub port: u16,
    pub server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, StartupError> {
        let sender_email = config
            .get_email_client_sender()
            .map_err(StartupError::Configuration)?;
        let email_client = EmailClient::new(
            config.email_client.base_url.clone(),
            sender_email,
            config.email_client.account.clone(),
            config.email_client.auth_token.clone(),
            Some(config.email_client.get_timeout()),
        )?;

        let mut notifier = ChangeNotifier::new(
            Arc::new(email_client),
            config.email_client.institution_name.clone(),
        );

        if let Some(redis_address) = config.get_redis_address() {
            let redis_client = redis::Client::open(redis_address)?;

            notifier = notifier.with_ledger(Arc::new(RedisLedger::new(redis_client, None)));
        }

        let listener = TcpListener::bind(config.get_address())?;
        let port = listener.local_addr()?.port();
        let server = run(
            listener,
            notifier,
            TriggerToken(config.trigger.token.clone()),
        )?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    notifier: ChangeNotifier,
    trigger_token: TriggerToken,
) -> Result<Server, std::io::Error> {
    let notifier = web::Data::new(notifier);
    let trigger_token = web::Data::new(trigger_token);

    let server = HttpServer::new(move || {
        App::new()
            // 'wrap' method adds a middleware to the App. This specific middleware provide incoming
            // request logger
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route(
                "/triggers/student-updated",
                web::post().to(handle_student_updated),
            )
            .app_data(notifier.clone())
            .app_data(trigger_token.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
