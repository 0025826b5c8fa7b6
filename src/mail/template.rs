use super::MailMessage;
use crate::config::Config;

/// Subject line of the contact acknowledgement.
pub const CONTACT_SUBJECT: &str = "Thank you for contacting MediClarity";

/// Build the acknowledgement sent to someone who used the contact form.
pub fn contact_acknowledgement(config: &Config, name: &str, email: &str) -> MailMessage {
    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{CONTACT_SUBJECT}</title>
</head>
<body>
    <div>
        <h1>Thank You for Contacting MediClarity</h1>
        <p>Dear {name},</p>
        <p>Thank you for reaching out to MediClarity. We have received your message and appreciate you taking the time to contact us.</p>
        <p>Our team is reviewing your inquiry and we will get back to you as soon as possible.</p>
        <p>Best regards,</p>
        <p>The MediClarity Team</p>
    </div>
</body>
</html>
"#,
        name = escape_html(name)
    );

    MailMessage {
        from: format!("{} <{}>", config.mail_sender_name, config.mail_sender),
        to: email.to_string(),
        subject: CONTACT_SUBJECT.to_string(),
        html,
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
