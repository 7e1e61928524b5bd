mod admin;
mod pages;
mod trip;

pub use admin::render_admin_page;
pub use pages::{
    render_check_email_page, render_how_it_works_page, render_index_page, render_login_page,
    render_name_resolution_page, render_user_info_page,
};
pub use trip::{
    render_add_recommendation_page, render_confirm_page, render_my_trips_page,
    render_thank_you_page, render_trip_page,
};

use crate::flash::Flash;

/// Per-request bits every page shows around its content.
#[derive(Debug, Clone, Default)]
pub struct Chrome {
    pub flashes: Vec<Flash>,
    pub signed_in: bool,
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn render_flashes(flashes: &[Flash]) -> String {
    flashes
        .iter()
        .map(|f| {
            format!(
                r#"<div class="flash {class}">{message}</div>"#,
                class = f.kind.css_class(),
                message = escape_html(&f.message)
            )
        })
        .collect()
}

pub(crate) fn layout(title: &str, chrome: &Chrome, content: &str) -> String {
    let account_links = if chrome.signed_in {
        r#"<a href="/my-trips">My trips</a> <a href="/auth/logout">Log out</a>"#
    } else {
        r#"<a href="/auth/login">Log in</a>"#
    };
    format!(r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title} - Recs</title>
    <link rel="icon" href="data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'><text y='.9em' font-size='90'>🧭</text></svg>">
    <style>{CSS}</style>
</head>
<body>
    <header class="nav">
        <a href="/" class="nav__brand">Recs</a>
        <nav class="nav__links"><a href="/how-it-works">How it works</a> {account_links}</nav>
    </header>
    <main class="container">
        {flashes}
        {content}
    </main>
</body>
</html>"#,
        title = escape_html(title),
        CSS = CSS,
        account_links = account_links,
        flashes = render_flashes(&chrome.flashes),
        content = content,
    )
}

pub fn render_error_page(message: &str) -> String {
    layout(
        "Error",
        &Chrome::default(),
        &format!(
            r#"<div class="error">
            <p class="error__title">Something went wrong</p>
            <p class="error__message">{message}</p>
            <a href="/" class="button button--danger">Back to start</a>
        </div>"#,
            message = escape_html(message)
        ),
    )
}

const CSS: &str = r#"
:root {
    --base: #faf4ed;
    --surface: #fffaf3;
    --overlay: #f2e9e1;
    --muted: #9893a5;
    --subtle: #797593;
    --text: #575279;
    --love: #b4637a;
    --gold: #ea9d34;
    --pine: #286983;
    --foam: #56949f;
}
* { box-sizing: border-box; margin: 0; padding: 0; }
body {
    font-family: 'Inter', -apple-system, sans-serif;
    background: var(--base);
    color: var(--text);
    min-height: 100vh;
}
a { color: var(--pine); }
.nav { display: flex; justify-content: space-between; align-items: center; max-width: 800px; margin: 0 auto; padding: 1rem 1.5rem; }
.nav__brand { font-weight: 800; font-size: 1.3rem; color: var(--love); text-decoration: none; }
.nav__links a { margin-left: 1rem; color: var(--subtle); text-decoration: none; }
.container { max-width: 800px; margin: 0 auto; padding: 1.5rem; }
.hero { text-align: center; padding: 3rem 0 2rem; }
.hero__title { font-size: clamp(2rem, 5vw, 3rem); color: var(--love); font-weight: 800; margin-bottom: 0.75rem; }
.hero__subtitle { color: var(--subtle); font-size: 1.1rem; max-width: 500px; margin: 0 auto; }
.card {
    background: var(--surface); border: 2px solid var(--overlay);
    border-radius: 12px; padding: 1.5rem; margin: 1.5rem 0;
}
.card__title { color: var(--love); font-size: 1.4rem; margin-bottom: 1rem; padding-bottom: 0.75rem; border-bottom: 2px solid var(--overlay); }
.form { display: flex; flex-direction: column; gap: 1rem; }
.form label { font-weight: 600; }
.form input, .form textarea, .form select {
    padding: 0.75rem 1rem; border: 2px solid var(--overlay); border-radius: 8px;
    background: var(--surface); color: var(--text); font-size: 1rem; width: 100%;
}
.form textarea { min-height: 10rem; }
.form input:focus, .form textarea:focus { outline: none; border-color: var(--pine); }
.button {
    display: inline-block; padding: 0.75rem 1.5rem; background: var(--pine); color: var(--base);
    border: none; border-radius: 8px; font-size: 1rem; font-weight: 600; cursor: pointer; text-decoration: none;
}
.button--love { background: var(--love); }
.button--danger { background: var(--love); padding: 0.4rem 0.8rem; font-size: 0.9rem; }
.recs { list-style: none; }
.recs__item { padding: 1rem 0; border-bottom: 1px solid var(--overlay); }
.recs__name { font-weight: 700; color: var(--pine); }
.recs__meta { color: var(--muted); font-size: 0.9rem; }
.entry { border: 1px dashed var(--overlay); border-radius: 8px; padding: 1rem; }
.flash { border-radius: 8px; padding: 0.75rem 1rem; margin-bottom: 1rem; }
.flash--error { background: #fce8ec; border: 2px solid var(--love); color: #8b3d4d; }
.flash--success { background: #e6f2ef; border: 2px solid var(--foam); }
.flash--info { background: var(--overlay); }
.error { background: #fce8ec; border: 2px solid var(--love); border-radius: 8px; padding: 1.25rem; margin: 2rem 0; }
.error__title { color: var(--love); font-weight: 700; margin-bottom: 0.5rem; }
.error__message { color: #8b3d4d; margin-bottom: 1rem; }
.table { width: 100%; border-collapse: collapse; font-size: 0.9rem; }
.table th, .table td { text-align: left; padding: 0.4rem; border-bottom: 1px solid var(--overlay); }
.muted { color: var(--muted); }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flash::FlashKind;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x")</script> & 'y'"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; &#x27;y&#x27;"
        );
    }

    #[test]
    fn test_layout_renders_escaped_flashes() {
        let chrome = Chrome {
            flashes: vec![Flash {
                kind: FlashKind::Error,
                message: "<b>nope</b>".to_string(),
            }],
            signed_in: false,
        };
        let html = layout("Home", &chrome, "<p>body</p>");
        assert!(html.contains(r#"<div class="flash flash--error">&lt;b&gt;nope&lt;/b&gt;</div>"#));
        assert!(html.contains("<p>body</p>"));
        assert!(html.contains("/auth/login"));
    }

    #[test]
    fn test_signed_in_layout_links_to_trips() {
        let chrome = Chrome {
            flashes: Vec::new(),
            signed_in: true,
        };
        let html = layout("Home", &chrome, "");
        assert!(html.contains("/my-trips"));
        assert!(html.contains("/auth/logout"));
    }
}
