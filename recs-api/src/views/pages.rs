use super::{escape_html, layout, Chrome};

pub fn render_index_page(chrome: &Chrome) -> String {
    layout(
        "Collect travel recommendations",
        chrome,
        r#"<section class="hero">
            <h1 class="hero__title">Where are you going?</h1>
            <p class="hero__subtitle">Create a trip, share the link with friends and collect their favourite places in one list.</p>
        </section>
        <form class="form card" method="post" action="/create-trip">
            <label for="destination">Destination</label>
            <input id="destination" name="destination" type="text" placeholder="Tokyo, Lisbon, Mexico City..." required>
            <button class="button button--love" type="submit">Start collecting</button>
        </form>"#,
    )
}

pub fn render_how_it_works_page(chrome: &Chrome) -> String {
    layout(
        "How it works",
        chrome,
        r#"<div class="card">
            <h2 class="card__title">How it works</h2>
            <ol class="form">
                <li>Tell us where you are going. We create a trip page with a link you can share.</li>
                <li>Friends open the link and write or record their recommendations in their own words.</li>
                <li>We pick out the places they mention and look them up so you get addresses and websites.</li>
                <li>Everything lands on your trip page. Sign in with your email to manage your trips.</li>
            </ol>
        </div>"#,
    )
}

pub fn render_user_info_page(chrome: &Chrome, destination: &str) -> String {
    let destination = escape_html(destination);
    layout(
        "Your details",
        chrome,
        &format!(
            r#"<form class="form card" method="post" action="/complete-trip">
            <h2 class="card__title">Trip to {destination}</h2>
            <input type="hidden" name="destination" value="{destination}">
            <label for="name">Your name</label>
            <input id="name" name="name" type="text" required>
            <label for="email">Your email</label>
            <input id="email" name="email" type="email" required>
            <button class="button button--love" type="submit">Create trip</button>
        </form>"#
        ),
    )
}

pub fn render_name_resolution_page(
    chrome: &Chrome,
    previous_name: &str,
    new_name: &str,
    email: &str,
) -> String {
    let previous_name = escape_html(previous_name);
    let new_name = escape_html(new_name);
    let email = escape_html(email);
    layout(
        "Which name?",
        chrome,
        &format!(
            r#"<form class="form card" method="post" action="/resolve-name">
            <h2 class="card__title">Which name should we use?</h2>
            <p>{email} is registered as <strong>{previous_name}</strong>, but you entered <strong>{new_name}</strong>.</p>
            <label><input type="radio" name="resolved_name" value="{previous_name}" checked> {previous_name}</label>
            <label><input type="radio" name="resolved_name" value="{new_name}"> {new_name}</label>
            <label><input type="radio" name="resolved_name" value="other"> Something else</label>
            <input name="other_name" type="text" placeholder="Other name">
            <button class="button" type="submit">Continue</button>
        </form>"#
        ),
    )
}

pub fn render_check_email_page(
    chrome: &Chrome,
    email: &str,
    message: Option<&str>,
    login_link: Option<&str>,
) -> String {
    let message = message
        .map(|m| format!(r#"<p>{}</p>"#, escape_html(m)))
        .unwrap_or_default();
    let login_link = login_link
        .map(|link| {
            format!(
                r#"<p class="flash flash--info">Email delivery is disabled. <a href="{link}">Use this login link</a>.</p>"#,
                link = escape_html(link)
            )
        })
        .unwrap_or_default();
    layout(
        "Check your email",
        chrome,
        &format!(
            r#"<div class="card">
            <h2 class="card__title">Check your email</h2>
            {message}
            <p>We sent a login link to <strong>{email}</strong>. It is valid for 10 minutes.</p>
            {login_link}
        </div>"#,
            email = escape_html(email),
        ),
    )
}

pub fn render_login_page(chrome: &Chrome, next: Option<&str>) -> String {
    let next = next
        .map(|n| format!(r#"<input type="hidden" name="next" value="{}">"#, escape_html(n)))
        .unwrap_or_default();
    layout(
        "Log in",
        chrome,
        &format!(
            r#"<form class="form card" method="post" action="/auth/login">
            <h2 class="card__title">Log in</h2>
            <p class="muted">We will email you a link that signs you in. No password needed.</p>
            {next}
            <label for="email">Email</label>
            <input id="email" name="email" type="email" required>
            <button class="button" type="submit">Send login link</button>
        </form>"#
        ),
    )
}
