//! Transactional email templates.
//!
//! Each template renders a subject, a styled HTML body and a plain-text
//! alternative. Interpolated values are HTML-escaped.

/// A ready-to-send email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Brand color used for buttons and headings.
const ACCENT: &str = "#0f766e";

/// Password reset email carrying the single-use reset link.
pub fn password_reset(reset_url: &str, expires_in_minutes: i64) -> RenderedEmail {
    let url = escape_html(reset_url);
    let body = format!(
        "<p>Recibimos una solicitud para restablecer la contraseña de tu cuenta.</p>\
         <p>Haz clic en el botón para elegir una nueva contraseña. \
         El enlace vence en {expires_in_minutes} minutos.</p>\
         {button}\
         <p style=\"color:#6b7280;font-size:13px\">Si no solicitaste este cambio, \
         puedes ignorar este correo; tu contraseña seguirá siendo la misma.</p>",
        button = button(&url, "Restablecer contraseña"),
    );

    RenderedEmail {
        subject: "Restablece tu contraseña".to_string(),
        html: layout("Restablecer contraseña", &body),
        text: format!(
            "Recibimos una solicitud para restablecer tu contraseña.\n\n\
             Abre este enlace (vence en {expires_in_minutes} minutos):\n{reset_url}\n\n\
             Si no solicitaste este cambio, ignora este correo."
        ),
    }
}

/// Sign-up confirmation email.
pub fn email_confirmation(display_name: &str, confirm_url: &str) -> RenderedEmail {
    let name = escape_html(display_name);
    let url = escape_html(confirm_url);
    let body = format!(
        "<p>Hola {name},</p>\
         <p>Gracias por registrarte. Confirma tu correo electrónico para activar tu cuenta.</p>\
         {button}",
        button = button(&url, "Confirmar correo"),
    );

    RenderedEmail {
        subject: "Confirma tu correo electrónico".to_string(),
        html: layout("Confirma tu correo", &body),
        text: format!(
            "Hola {display_name},\n\nConfirma tu correo electrónico abriendo este enlace:\n{confirm_url}"
        ),
    }
}

fn button(href: &str, label: &str) -> String {
    format!(
        "<p style=\"text-align:center;margin:32px 0\">\
         <a href=\"{href}\" style=\"background:{ACCENT};color:#ffffff;padding:12px 24px;\
         border-radius:6px;text-decoration:none;font-weight:600\">{label}</a></p>"
    )
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title}</title></head>\
         <body style=\"margin:0;background:#f3f4f6;font-family:Arial,sans-serif\">\
         <table width=\"100%\" cellpadding=\"0\" cellspacing=\"0\"><tr><td align=\"center\">\
         <table width=\"560\" cellpadding=\"24\" cellspacing=\"0\" \
         style=\"background:#ffffff;margin:24px 0;border-radius:8px;color:#111827\">\
         <tr><td><h1 style=\"color:{ACCENT};font-size:22px\">{title}</h1>{body}</td></tr>\
         </table></td></tr></table></body></html>"
    )
}

/// Escape the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_email_contains_link_in_both_parts() {
        let url = "https://campus.example.com/reset-password?token=abc&x=1";
        let email = password_reset(url, 60);
        assert!(email.html.contains("token=abc&amp;x=1"));
        assert!(email.text.contains(url));
        assert!(email.text.contains("60 minutos"));
        assert_eq!(email.subject, "Restablece tu contraseña");
    }

    #[test]
    fn display_name_is_escaped() {
        let email = email_confirmation("<script>Ana</script>", "https://x.test/c?token=1");
        assert!(!email.html.contains("<script>"));
        assert!(email.html.contains("&lt;script&gt;Ana"));
    }

    #[test]
    fn escape_handles_quotes() {
        assert_eq!(escape_html(r#"a"b'c"#), "a&quot;b&#39;c");
    }
}
