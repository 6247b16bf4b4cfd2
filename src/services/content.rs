//! Home page slides, site settings, newsletter and contact messages

use crate::core::error::{StorefrontResult, ValidationError};
use crate::core::validation::ContactForm;
use crate::entities::catalog::{ContactMessage, NewsletterSignup, SiteConfig, Slide};
use crate::storage::Repository;
use chrono::Utc;
use validator::ValidateEmail;

#[derive(Clone)]
pub struct ContentService {
    slides: Repository<Vec<Slide>>,
    site: Repository<SiteConfig>,
    newsletter: Repository<Vec<NewsletterSignup>>,
    contact: Repository<Vec<ContactMessage>>,
}

impl ContentService {
    pub fn new(
        slides: Repository<Vec<Slide>>,
        site: Repository<SiteConfig>,
        newsletter: Repository<Vec<NewsletterSignup>>,
        contact: Repository<Vec<ContactMessage>>,
    ) -> Self {
        Self {
            slides,
            site,
            newsletter,
            contact,
        }
    }

    /// Carousel slides ordered by position
    pub async fn slides(&self) -> Vec<Slide> {
        let mut slides = self.slides.read().await;
        slides.sort_by_key(|s| s.position);
        slides
    }

    /// Insert or replace a slide; returns `true` when it was new
    pub async fn save_slide(&self, slide: Slide) -> StorefrontResult<bool> {
        self.slides.upsert(slide).await
    }

    pub async fn delete_slide(&self, id: &str) -> StorefrontResult<bool> {
        self.slides.remove(id).await
    }

    pub async fn site_config(&self) -> SiteConfig {
        self.site.read().await
    }

    pub async fn save_site_config(&self, config: &SiteConfig) -> StorefrontResult<()> {
        self.site.write(config).await
    }

    /// Add an email to the newsletter; returns `false` if already subscribed
    pub async fn subscribe(&self, email: &str) -> StorefrontResult<bool> {
        let email = email.trim().to_lowercase();
        if !email.validate_email() {
            return Err(ValidationError::FieldError {
                field: "email".to_string(),
                message: "A valid email address is required".to_string(),
            }
            .into());
        }

        self.newsletter
            .update(|signups| {
                if signups.iter().any(|s| s.email.eq_ignore_ascii_case(&email)) {
                    return false;
                }
                signups.push(NewsletterSignup {
                    email,
                    subscribed_at: Utc::now(),
                });
                true
            })
            .await
    }

    pub async fn subscribers(&self) -> Vec<NewsletterSignup> {
        self.newsletter.read().await
    }

    pub async fn submit_contact(&self, form: &ContactForm) -> StorefrontResult<ContactMessage> {
        form.check()?;
        let form = form.trimmed();
        let message = ContactMessage {
            id: crate::new_record_id!(),
            name: form.name,
            email: form.email,
            subject: form.subject,
            message: form.message,
            received_at: Utc::now(),
        };
        self.contact.upsert(message.clone()).await?;
        tracing::info!(message_id = %message.id, "Contact message received");
        Ok(message)
    }

    /// Contact messages, newest first
    pub async fn contact_messages(&self) -> Vec<ContactMessage> {
        let mut messages = self.contact.read().await;
        messages.sort_by(|a, b| b.received_at.cmp(&a.received_at));
        messages
    }
}
