use crate::models::LeadSubmission;

pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

pub fn lead_notification(brand: &str, lead: &LeadSubmission, reference: &str) -> RenderedEmail {
    let subject = format!("New Lead Magnet Submission - {brand}");

    let name = escape_html(&lead.name);
    let email = escape_html(&lead.email);
    let phone = escape_html(&lead.phone);
    let city = escape_html(&lead.city);
    let industry = escape_html(&lead.industry);
    let business_type = escape_html(&lead.business_type);
    let message = escape_html(&lead.message);
    let brand_html = escape_html(brand);

    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #ef4444; border-bottom: 2px solid #ef4444; padding-bottom: 10px;">New Lead Magnet Submission</h2>
  <div style="background: #f8f9fa; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <h3 style="color: #333; margin-top: 0;">Contact Information</h3>
    <p><strong>Name:</strong> {name}</p>
    <p><strong>Email:</strong> {email}</p>
    <p><strong>Phone:</strong> {phone}</p>
    <p><strong>City:</strong> {city}</p>
  </div>
  <div style="background: #f8f9fa; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <h3 style="color: #333; margin-top: 0;">Business Information</h3>
    <p><strong>Industry:</strong> {industry}</p>
    <p><strong>Business Type:</strong> {business_type}</p>
  </div>
  <div style="background: #f8f9fa; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <h3 style="color: #333; margin-top: 0;">Project Description</h3>
    <p style="white-space: pre-wrap;">{message}</p>
  </div>
  <div style="text-align: center; margin-top: 30px; padding: 20px; background: #e8f5e8; border-radius: 8px;">
    <p style="margin: 0; color: #2d5a2d;"><strong>Action Required:</strong> Please respond to this lead within 24 hours.</p>
  </div>
  <hr style="margin: 30px 0; border: none; border-top: 1px solid #ddd;">
  <p style="text-align: center; color: #666; font-size: 12px;">This message was sent from the {brand_html} website contact form. Reference: {reference}</p>
</div>"#
    );

    let text = format!(
        "New Lead Magnet Submission\n\n\
         Contact Information\n\
         Name: {}\n\
         Email: {}\n\
         Phone: {}\n\
         City: {}\n\n\
         Business Information\n\
         Industry: {}\n\
         Business Type: {}\n\n\
         Project Description\n\
         {}\n\n\
         Action Required: Please respond to this lead within 24 hours.\n\n\
         Sent from the {brand} website contact form. Reference: {reference}\n",
        lead.name, lead.email, lead.phone, lead.city, lead.industry, lead.business_type, lead.message,
    );

    RenderedEmail { subject, html, text }
}

pub fn meeting_confirmation(
    brand: &str,
    invitee_name: &str,
    meeting_time: &str,
    meet_link: &str,
) -> RenderedEmail {
    let subject = "Your Meeting is Confirmed!".to_string();

    let name = escape_html(invitee_name);
    let time = escape_html(meeting_time);
    let brand_html = escape_html(brand);

    // No resolvable link: say so rather than render a dead button.
    let link_html = if meet_link.is_empty() {
        r#"<p style="margin: 0;">Your meeting link will be sent to you separately before the call.</p>"#
            .to_string()
    } else {
        let href = escape_html(meet_link);
        format!(
            r#"<p style="margin: 0 0 8px 0;"><b>Meeting Link:</b></p>
      <a href="{href}" style="display:inline-block; background: #2563eb; color: #fff; font-weight: bold; padding: 14px 32px; border-radius: 12px; text-decoration: none;">Join Google Meet</a>
      <p style="margin: 8px 0 0 0; font-size: 0.9rem;">{href}</p>"#
        )
    };

    let html = format!(
        r#"<div style="font-family: 'Segoe UI', Arial, sans-serif; background: #18181b; color: #fff; padding: 32px; border-radius: 18px; max-width: 480px; margin: 0 auto;">
  <div style="text-align:center; margin-bottom: 24px;">
    <h2 style="color: #38bdf8; font-size: 2rem; margin: 0;">Your Meeting is Confirmed!</h2>
  </div>
  <p style="font-size: 1.1rem;">Hi <b>{name}</b>,</p>
  <p style="margin-bottom: 18px;">Thank you for booking a meeting with us. Here are your meeting details:</p>
  <div style="background: #23232b; border-radius: 12px; padding: 18px 20px; margin-bottom: 18px;">
    <p style="margin: 0 0 8px 0;"><b>Date &amp; Time:</b> {time}</p>
    {link_html}
  </div>
  <p style="margin-bottom: 0.5rem;">You will receive a reminder 30 minutes before the meeting.</p>
  <p style="margin-bottom: 0.5rem;">If you have any questions, just reply to this email.</p>
  <div style="margin-top: 32px; text-align: center;">
    <span style="color: #38bdf8; font-weight: bold; font-size: 1.1rem;">Best regards,<br>{brand_html} Team</span>
  </div>
</div>"#
    );

    let link_text = if meet_link.is_empty() {
        "Meeting Link: will be sent to you separately before the call.".to_string()
    } else {
        format!("Meeting Link: {meet_link}")
    };

    let text = format!(
        "Hi {invitee_name},\n\n\
         Thank you for booking a meeting with us. Here are your meeting details:\n\n\
         Date & Time: {meeting_time}\n\
         {link_text}\n\n\
         You will receive a reminder 30 minutes before the meeting.\n\
         If you have any questions, just reply to this email.\n\n\
         Best regards,\n\
         {brand} Team\n"
    );

    RenderedEmail { subject, html, text }
}
