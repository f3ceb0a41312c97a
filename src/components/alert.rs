//! Alert banners for surfacing errors and notices.

use maud::{html, Markup, Render};

/// Alert variant types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertVariant {
    Error,
    Info,
}

impl AlertVariant {
    #[must_use]
    pub const fn class(&self) -> &'static str {
        match self {
            Self::Error => "alert alert-error",
            Self::Info => "alert alert-info",
        }
    }
}

/// An alert banner.
///
/// Used on the listing page to surface a failed load-more fetch as a
/// visible, recoverable state rather than a silent no-op.
#[derive(Debug, Clone)]
pub struct Alert<'a> {
    pub variant: AlertVariant,
    pub message: &'a str,
}

impl<'a> Alert<'a> {
    #[must_use]
    pub const fn new(variant: AlertVariant, message: &'a str) -> Self {
        Self { variant, message }
    }

    /// Create an error alert.
    #[must_use]
    pub const fn error(message: &'a str) -> Self {
        Self::new(AlertVariant::Error, message)
    }

    /// Create an info alert.
    #[must_use]
    pub const fn info(message: &'a str) -> Self {
        Self::new(AlertVariant::Info, message)
    }
}

impl Render for Alert<'_> {
    fn render(&self) -> Markup {
        html! {
            article class=(self.variant.class()) role="alert" {
                (self.message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_alert() {
        let html = Alert::error("Não foi possível carregar mais posts.")
            .render()
            .into_string();
        assert!(html.contains("alert-error"));
        assert!(html.contains(r#"role="alert""#));
        assert!(html.contains("Não foi possível carregar mais posts."));
    }

    #[test]
    fn test_info_alert() {
        let html = Alert::info("Atualizando...").render().into_string();
        assert!(html.contains("alert-info"));
    }
}
