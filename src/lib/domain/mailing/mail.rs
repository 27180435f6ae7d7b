//! Mail content

/// A subject and an HTML template, shared by every recipient of a send
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mail {
    subject: String,
    template: String,
}

impl Mail {
    /// Creates a new mail from template text and a subject
    pub fn new(template: &str, subject: &str) -> Self {
        Self {
            subject: subject.to_string(),
            template: template.to_string(),
        }
    }

    /// The subject line
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The unrendered template text
    pub fn template(&self) -> &str {
        &self.template
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_argument_order() {
        let mail = Mail::new("Hello {{.NAME}}", "Hi");

        assert_eq!(mail.subject(), "Hi");
        assert_eq!(mail.template(), "Hello {{.NAME}}");
    }
}
