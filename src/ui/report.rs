use super::render::VerdictView;

/// Standalone HTML page mirroring the verdict panel.
pub fn render_report(view: &VerdictView) -> String {
    let indicators = list_items(&view.indicators);
    let domains = list_items(&view.domains);
    format!(
        "<!DOCTYPE html>\n\
         <html>\n<head><meta charset=\"utf-8\"><title>PhishGuard verdict</title></head>\n<body>\n\
         <section id=\"verdictPanel\">\n\
         <span id=\"statusBadge\">{badge}</span>\n\
         <h1 id=\"verdictTitle\">{title}</h1>\n\
         <p id=\"verdictSubtitle\">{subtitle}</p>\n\
         <p id=\"riskPercent\">{risk}</p>\n\
         <div id=\"progressBar\" style=\"width: {width}\"></div>\n\
         <h2 id=\"previewSubject\">{subject}</h2>\n\
         <div id=\"previewBody\">{body}</div>\n\
         <ul id=\"indicatorsList\">\n{indicators}</ul>\n\
         <ul id=\"domainsList\">\n{domains}</ul>\n\
         </section>\n</body>\n</html>\n",
        badge = escape_html(&view.badge),
        title = escape_html(&view.title),
        subtitle = escape_html(&view.subtitle),
        risk = escape_html(&view.risk_text),
        width = escape_html(&view.bar_width),
        subject = escape_html(&view.preview_subject),
        body = view.preview_body,
    )
}

fn list_items(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("<li>{}</li>\n", escape_html(item)))
        .collect()
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
