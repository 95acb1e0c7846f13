pub mod article_extractor;
mod bounce;
mod cleaner;
pub mod config;
mod converter;
mod extractor;
mod image;
mod intake;
pub mod mail_gateway;
mod mailer;
mod packager;
pub mod pipeline;

pub use article_extractor::{ArticleExtractor, ExtractError, Extracted, HttpArticleExtractor};
pub use config::PipelineConfig;
pub use intake::IntakeError;
pub use mail_gateway::{
    Attachment, HttpMailGateway, MailError, MailGateway, SendEmailRequest, SendOutcome,
};
pub use pipeline::Pipeline;
