use crate::errors::AppError;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use tracing::{info, warn};
use yansi::Paint;

pub const NAME_TOO_SHORT: &str = "Name must be at least 2 characters";
pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const MESSAGE_TOO_SHORT: &str = "Message must be at least 10 characters";
pub const DELIVERY_FAILED: &str = "Something went wrong. Please try again.";
pub const DELIVERED: &str = "Thank you! Your message has been sent.";

static EMAIL: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@([A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
  pub name: String,
  pub email: String,
  pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  Name,
  Email,
  Message,
}

impl fmt::Display for Field {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.pad(match *self {
      Field::Name => "name",
      Field::Email => "email",
      Field::Message => "message",
    })
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
  pub field: Field,
  pub message: &'static str,
}

pub fn is_valid_email(email: &str) -> bool {
  if email.starts_with('.') || email.contains("..") {
    return false;
  }
  EMAIL.is_match(email)
}

/// Every failing field, in form order. Empty when the message is acceptable.
pub fn validate(message: &ContactMessage) -> Vec<FieldError> {
  let mut errors = Vec::new();
  if message.name.chars().count() < 2 {
    errors.push(FieldError {
      field: Field::Name,
      message: NAME_TOO_SHORT,
    });
  }
  if !is_valid_email(&message.email) {
    errors.push(FieldError {
      field: Field::Email,
      message: INVALID_EMAIL,
    });
  }
  if message.message.chars().count() < 10 {
    errors.push(FieldError {
      field: Field::Message,
      message: MESSAGE_TOO_SHORT,
    });
  }
  errors
}

/// Delivery backend for contact messages.
pub trait Mailer {
  async fn deliver(&self, message: &ContactMessage) -> Result<(), AppError>;
}

/// No mail backend is wired up yet.
pub struct Unwired;

impl Mailer for Unwired {
  async fn deliver(&self, _message: &ContactMessage) -> Result<(), AppError> {
    Err(AppError::NotImplemented("contact delivery is not wired to a mail backend"))
  }
}

pub async fn submit<M: Mailer>(mailer: &M, message: &ContactMessage) -> Result<(), AppError> {
  let errors = validate(message);
  if !errors.is_empty() {
    return Err(AppError::ValidationError(errors));
  }
  mailer.deliver(message).await
}

pub async fn contact(name: &str, email: &str, message: &str) -> Result<(), AppError> {
  let message = ContactMessage {
    name: name.to_owned(),
    email: email.to_owned(),
    message: message.to_owned(),
  };
  match submit(&Unwired, &message).await {
    Ok(()) => {
      info!(email = %message.email, "Contact message delivered");
      println!("{}", Paint::green(DELIVERED));
      Ok(())
    }
    Err(AppError::ValidationError(errors)) => {
      for error in &errors {
        println!("{:<20}: {}", error.field, Paint::red(error.message));
      }
      Err(AppError::ValidationError(errors))
    }
    Err(error) => {
      warn!(error = %error, "Contact delivery failed");
      println!("{}", Paint::red(DELIVERY_FAILED));
      Err(AppError::UserError(DELIVERY_FAILED.to_owned()))
    }
  }
}
