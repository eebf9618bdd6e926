//! Contact email composition.
//!
//! Builds the message the site operator receives for each contact-form
//! submission. User-supplied strings are HTML-escaped before they are
//! interpolated into the HTML part.

use crate::models::ContactMessage;
use crate::services::providers::EmailEnvelope;

/// Escape user-supplied text for interpolation into HTML.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Compose the notification email for a contact-form submission. The sender
/// identity shows the submitter; the recipient is always the operator.
pub fn compose_contact_email(contact: &ContactMessage, recipient: &str) -> EmailEnvelope {
    let from_label = contact.sender_type.from_label();
    let subject = format!("New Portfolio Message: {}", contact.message_type);

    // Company line only when a non-empty value was submitted.
    let company = contact
        .company
        .as_deref()
        .filter(|company| !company.is_empty());

    let company_html = match company {
        Some(company) => format!(
            "<p><strong>Company:</strong> {}</p>\n",
            escape_html(company)
        ),
        None => String::new(),
    };

    let body_html = format!(
        "<h2>New Portfolio Message</h2>\n\
         <p><strong>{}:</strong> {} &lt;{}&gt;</p>\n\
         {}\
         <p><strong>Message:</strong></p>\n\
         <p>{}</p>\n",
        from_label,
        escape_html(&contact.name),
        escape_html(&contact.email),
        company_html,
        escape_html(&contact.message),
    );

    let company_text = match company {
        Some(company) => format!("Company: {}\n", company),
        None => String::new(),
    };

    let body_text = format!(
        "{}: {} <{}>\n{}Message:\n{}\n",
        from_label, contact.name, contact.email, company_text, contact.message,
    );

    EmailEnvelope {
        // lettre quotes the display name itself when it needs quoting.
        from: format!("{} <{}>", contact.name, contact.email),
        to: recipient.to_string(),
        subject,
        body_text,
        body_html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SenderType;

    fn contact() -> ContactMessage {
        ContactMessage {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            company: None,
            message: "Hello there".to_string(),
            message_type: "Collaboration".to_string(),
            sender_type: SenderType::Individual,
        }
    }

    #[test]
    fn individual_label_is_used_by_default() {
        let envelope = compose_contact_email(&contact(), "owner@example.com");
        assert!(envelope.body_html.contains("From (Individual)"));
        assert!(!envelope.body_html.contains("From (Organization)"));
    }

    #[test]
    fn organization_label_is_used_for_organizations() {
        let mut contact = contact();
        contact.sender_type = SenderType::Organization;
        let envelope = compose_contact_email(&contact, "owner@example.com");
        assert!(envelope.body_html.contains("From (Organization)"));
    }

    #[test]
    fn company_line_appears_only_when_present() {
        let mut contact = contact();
        let envelope = compose_contact_email(&contact, "owner@example.com");
        assert!(!envelope.body_html.contains("Company:"));

        contact.company = Some(String::new());
        let envelope = compose_contact_email(&contact, "owner@example.com");
        assert!(!envelope.body_html.contains("Company:"));

        contact.company = Some("Acme Corp".to_string());
        let envelope = compose_contact_email(&contact, "owner@example.com");
        assert!(envelope.body_html.contains("Acme Corp"));
        assert!(envelope.body_text.contains("Company: Acme Corp"));
    }

    #[test]
    fn user_fields_are_html_escaped() {
        let mut contact = contact();
        contact.message = "<script>alert('x')</script>".to_string();
        contact.company = Some("Tom & Jerry <Inc>".to_string());
        let envelope = compose_contact_email(&contact, "owner@example.com");

        assert!(!envelope.body_html.contains("<script>"));
        assert!(envelope.body_html.contains("&lt;script&gt;"));
        assert!(envelope.body_html.contains("Tom &amp; Jerry &lt;Inc&gt;"));
    }

    #[test]
    fn subject_carries_the_message_type() {
        let envelope = compose_contact_email(&contact(), "owner@example.com");
        assert_eq!(envelope.subject, "New Portfolio Message: Collaboration");
    }

    #[test]
    fn recipient_is_the_operator_not_the_submitter() {
        let envelope = compose_contact_email(&contact(), "owner@example.com");
        assert_eq!(envelope.to, "owner@example.com");
        assert_eq!(envelope.from, "Jane Doe <jane@example.com>");
    }
}
