//! Submission alerts by email.
//!
//! The submit handler only composes the text and hands it to [`Notifier`]. A
//! background task owns the SMTP transport and works through the queue, retrying
//! each message a few times with exponential backoff. Delivery problems are logged
//! and dropped; they never reach the HTTP caller.

use crate::models::{Cevap, KontrolConfig, Kayit};
use futures_util::future::LocalBoxFuture;
use std::env;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;
pub const MAX_ATTEMPTS: u32 = 3;
const FIRST_BACKOFF: Duration = Duration::from_secs(2);

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("Email build error: {0}")]
    Build(String),
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub user: String,
    pub pass: String,
}

impl EmailConfig {
    /// `None` unless both `EMAIL_USER` and `EMAIL_PASS` are set.
    pub fn from_env() -> Option<Self> {
        let user = env::var("EMAIL_USER").ok().filter(|v| !v.trim().is_empty())?;
        let pass = env::var("EMAIL_PASS").ok().filter(|v| !v.is_empty())?;
        Some(EmailConfig {
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| DEFAULT_SMTP_HOST.to_string()),
            smtp_port: env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            user,
            pass,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bildirim {
    pub alici: String,
    pub konu: String,
    pub govde: String,
}

pub fn compose_subject(config: &KontrolConfig, kayit: &Kayit) -> String {
    let hayir = kayit.hayir_sayisi();
    let durum = if hayir == 0 {
        "Tamam".to_string()
    } else {
        format!("{} eksik", hayir)
    };
    format!(
        "[{}] {} - {}",
        config.ayarlar.lokanta_adi, kayit.kontrol_tipi_baslik, durum
    )
}

/// Plain-text summary of a submission, used both as the email body and in the submit response.
pub fn compose_text(config: &KontrolConfig, kayit: &Kayit) -> String {
    let personel = if kayit.personel.is_empty() { "-" } else { kayit.personel.as_str() };
    let mut text = format!(
        "{}\n{}\nPersonel: {}\nTarih: {} {}\n\n",
        config.ayarlar.lokanta_adi, kayit.kontrol_tipi_baslik, personel, kayit.tarih, kayit.saat
    );
    for (i, cevap) in kayit.cevaplar.iter().enumerate() {
        let isaret = match cevap.cevap {
            Cevap::Evet => "✅",
            Cevap::Hayir => "❌",
        };
        text.push_str(&format!("{} {}. {}\n", isaret, i + 1, cevap.madde));
    }

    let hayir = kayit.hayir_sayisi();
    if hayir == 0 {
        text.push_str("\nTüm maddeler tamamlandı.\n");
    } else {
        text.push_str(&format!("\n{} madde HAYIR olarak işaretlendi.\n", hayir));
    }
    if !kayit.not.is_empty() {
        text.push_str(&format!("Not: {}\n", kayit.not));
    }
    text
}

/// Anything that can put one message on the wire.
pub trait Mailer: 'static {
    fn send<'a>(&'a self, bildirim: &'a Bildirim) -> LocalBoxFuture<'a, Result<(), EmailError>>;
}

pub struct SmtpMailer {
    config: EmailConfig,
}

impl SmtpMailer {
    pub fn new(config: EmailConfig) -> Self {
        SmtpMailer { config }
    }
}

impl Mailer for SmtpMailer {
    fn send<'a>(&'a self, bildirim: &'a Bildirim) -> LocalBoxFuture<'a, Result<(), EmailError>> {
        Box::pin(async move {
            use lettre::{
                message::header::ContentType, transport::smtp::authentication::Credentials,
                AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
            };

            let email = Message::builder()
                .from(self.config.user.parse()?)
                .to(bildirim.alici.parse()?)
                .subject(bildirim.konu.clone())
                .header(ContentType::TEXT_PLAIN)
                .body(bildirim.govde.clone())
                .map_err(|e| EmailError::Build(e.to_string()))?;

            let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port)
                .credentials(Credentials::new(self.config.user.clone(), self.config.pass.clone()))
                .build();
            mailer.send(email).await?;
            Ok(())
        })
    }
}

/// Cloneable handle to the delivery queue.
#[derive(Clone)]
pub struct Notifier {
    sender: mpsc::UnboundedSender<Bildirim>,
}

impl Notifier {
    /// Spawns the delivery worker on the current actix runtime.
    pub fn start<M: Mailer>(mailer: M) -> Self {
        Self::start_with_backoff(mailer, FIRST_BACKOFF)
    }

    pub fn start_with_backoff<M: Mailer>(mailer: M, first_backoff: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        actix_web::rt::spawn(run_worker(mailer, receiver, first_backoff));
        Notifier { sender }
    }

    /// Queues a message. Returns immediately; never fails the caller.
    pub fn enqueue(&self, bildirim: Bildirim) {
        if self.sender.send(bildirim).is_err() {
            log::error!("Notification worker has stopped; dropping notification.");
        }
    }
}

async fn run_worker<M: Mailer>(
    mailer: M,
    mut receiver: mpsc::UnboundedReceiver<Bildirim>,
    first_backoff: Duration,
) {
    while let Some(bildirim) = receiver.recv().await {
        deliver_with_retry(&mailer, &bildirim, first_backoff).await;
    }
    log::info!("Notification worker shutting down.");
}

/// Returns whether the message was eventually delivered.
pub async fn deliver_with_retry<M: Mailer>(mailer: &M, bildirim: &Bildirim, first_backoff: Duration) -> bool {
    let mut backoff = first_backoff;
    for attempt in 1..=MAX_ATTEMPTS {
        match mailer.send(bildirim).await {
            Ok(()) => {
                log::info!("Notification sent to {} (attempt {})", bildirim.alici, attempt);
                return true;
            }
            Err(e) if attempt < MAX_ATTEMPTS => {
                log::warn!(
                    "Notification to {} failed (attempt {}): {}. Retrying in {:?}.",
                    bildirim.alici, attempt, e, backoff
                );
                actix_web::rt::time::sleep(backoff).await;
                backoff *= 2;
            }
            Err(e) => {
                log::error!(
                    "Giving up on notification to {} after {} attempts: {}",
                    bildirim.alici, attempt, e
                );
            }
        }
    }
    false
}
