use super::{escape_html, layout, Chrome};
use recs_app::application::DashboardData;

fn opt(value: Option<&str>) -> String {
    escape_html(value.unwrap_or("-"))
}

pub fn render_admin_page(chrome: &Chrome, data: &DashboardData) -> String {
    let trips: String = data
        .trips
        .iter()
        .map(|t| {
            format!(
                r#"<tr><td><a href="/trip/{slug}">{slug}</a></td><td>{destination}</td><td>{traveler}</td><td>{token}</td><td>{created}</td></tr>"#,
                slug = escape_html(&t.slug),
                destination = escape_html(&t.destination),
                traveler = escape_html(&t.traveler_name),
                token = escape_html(&t.share_token),
                created = t.created_at.format("%Y-%m-%d %H:%M"),
            )
        })
        .collect();

    let activities: String = data
        .activities
        .iter()
        .map(|a| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&a.name),
                opt(a.category.as_deref()),
                opt(a.city.as_deref()),
                opt(a.country.as_deref()),
                opt(a.google_place_id.as_deref()),
            )
        })
        .collect();

    let recommendations: String = data
        .recommendations
        .iter()
        .map(|r| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                r.trip_id,
                r.activity_id,
                r.author_id,
                opt(r.description.as_deref()),
            )
        })
        .collect();

    let users: String = data
        .users
        .iter()
        .map(|u| {
            let last_login = u
                .last_login_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "never".to_string());
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&u.email),
                opt(u.name.as_deref()),
                last_login,
            )
        })
        .collect();

    layout(
        "Admin",
        chrome,
        &format!(
            r#"<div class="card">
            <h2 class="card__title">Dashboard</h2>
            <p>{trip_count} trips · {activity_count} activities · {rec_count} recommendations · {user_count} users</p>
        </div>
        <div class="card"><h3>Trips</h3><table class="table">
            <tr><th>Slug</th><th>Destination</th><th>Traveler</th><th>Share token</th><th>Created</th></tr>{trips}</table></div>
        <div class="card"><h3>Activities</h3><table class="table">
            <tr><th>Name</th><th>Category</th><th>City</th><th>Country</th><th>Place ID</th></tr>{activities}</table></div>
        <div class="card"><h3>Recommendations</h3><table class="table">
            <tr><th>Trip</th><th>Activity</th><th>Author</th><th>Description</th></tr>{recommendations}</table></div>
        <div class="card"><h3>Users</h3><table class="table">
            <tr><th>Email</th><th>Name</th><th>Last login</th></tr>{users}</table></div>"#,
            trip_count = data.trips.len(),
            activity_count = data.activities.len(),
            rec_count = data.recommendations.len(),
            user_count = data.users.len(),
        ),
    )
}
