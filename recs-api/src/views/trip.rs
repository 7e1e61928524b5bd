use super::{escape_html, layout, Chrome};
use recs_app::domain::{ExtractedRecommendation, TripRecommendation};
use recs_app::infrastructure::db::entities::trip;

fn trip_title(trip: &trip::Model) -> String {
    format!("{}'s trip to {}", trip.traveler_name, trip_destination(trip))
}

fn trip_destination(trip: &trip::Model) -> &str {
    trip.destination_display_name
        .as_deref()
        .unwrap_or(&trip.destination)
}

fn render_recommendation(rec: &TripRecommendation, delete_action: Option<String>) -> String {
    let name = match &rec.website_url {
        Some(url) => format!(
            r#"<a href="{url}" rel="noopener" target="_blank">{name}</a>"#,
            url = escape_html(url),
            name = escape_html(&rec.activity_name)
        ),
        None => escape_html(&rec.activity_name),
    };
    let category = rec
        .category
        .as_deref()
        .map(|c| format!(" · {}", escape_html(c)))
        .unwrap_or_default();
    let address = rec
        .address
        .as_deref()
        .map(|a| format!(r#"<div class="recs__meta">{}</div>"#, escape_html(a)))
        .unwrap_or_default();
    let description = rec
        .description
        .as_deref()
        .map(|d| format!("<p>{}</p>", escape_html(d)))
        .unwrap_or_default();
    let author = escape_html(rec.author_name.as_deref().unwrap_or("Someone"));
    let delete = delete_action
        .map(|action| {
            format!(
                r#"<form method="post" action="{action}"><button class="button button--danger" type="submit">Remove</button></form>"#
            )
        })
        .unwrap_or_default();

    format!(
        r#"<li class="recs__item">
            <div class="recs__name">{name}<span class="recs__meta">{category}</span></div>
            {address}
            {description}
            <div class="recs__meta">Recommended by {author}</div>
            {delete}
        </li>"#
    )
}

pub fn render_trip_page(
    chrome: &Chrome,
    trip: &trip::Model,
    recommendations: &[TripRecommendation],
    is_owner: bool,
    share_url: &str,
) -> String {
    let slug = escape_html(&trip.slug);
    let list = if recommendations.is_empty() {
        r#"<p class="muted">No recommendations yet. Share the link to get some!</p>"#.to_string()
    } else {
        let items: String = recommendations
            .iter()
            .map(|rec| {
                let delete_action = is_owner
                    .then(|| format!("/trip/{}/recommendations/{}/delete", trip.slug, rec.id));
                render_recommendation(rec, delete_action)
            })
            .collect();
        format!(r#"<ul class="recs">{items}</ul>"#)
    };
    let owner_tools = if is_owner {
        format!(
            r#"<div class="card">
            <p>Share this link with friends: <a href="{share_url}">{share_url}</a></p>
            <form method="post" action="/trip/{slug}/delete" onsubmit="return confirm('Delete this trip?')">
                <button class="button button--danger" type="submit">Delete trip</button>
            </form>
        </div>"#,
            share_url = escape_html(share_url)
        )
    } else {
        String::new()
    };

    layout(
        &trip_title(trip),
        chrome,
        &format!(
            r#"<div class="card">
            <h2 class="card__title">{title}</h2>
            {list}
            <p><a class="button button--love" href="/trip/{slug}/add">Add a recommendation</a></p>
        </div>
        {owner_tools}"#,
            title = escape_html(&trip_title(trip)),
        ),
    )
}

pub fn render_add_recommendation_page(chrome: &Chrome, trip: &trip::Model) -> String {
    let slug = escape_html(&trip.slug);
    layout(
        "Add recommendations",
        chrome,
        &format!(
            r#"<form class="form card" method="post" action="/trip/{slug}/process">
            <h2 class="card__title">What should {traveler} do in {destination}?</h2>
            <label for="recommender_name">Your name</label>
            <input id="recommender_name" name="recommender_name" type="text">
            <label for="unstructured_recommendations">Your recommendations</label>
            <textarea id="unstructured_recommendations" name="unstructured_recommendations" placeholder="Write as much as you like: restaurants, museums, walks, bars..." required></textarea>
            <button class="button button--love" type="submit">Continue</button>
        </form>"#,
            traveler = escape_html(&trip.traveler_name),
            destination = escape_html(trip_destination(trip)),
        ),
    )
}

pub fn render_confirm_page(
    chrome: &Chrome,
    trip: &trip::Model,
    entries: &[ExtractedRecommendation],
    recommender_name: Option<&str>,
) -> String {
    let slug = escape_html(&trip.slug);
    let rows: String = entries
        .iter()
        .map(|entry| {
            format!(
                r#"<div class="entry form">
                <label>Place <input name="recommendations[]" value="{name}"></label>
                <label>Type <input name="place_types[]" value="{category}"></label>
                <label>Website <input name="website_urls[]" value="{website}"></label>
                <label>Notes <textarea name="descriptions[]">{description}</textarea></label>
            </div>"#,
                name = escape_html(&entry.name),
                category = escape_html(entry.category.as_deref().unwrap_or_default()),
                website = escape_html(entry.website_url.as_deref().unwrap_or_default()),
                description = escape_html(entry.description.as_deref().unwrap_or_default()),
            )
        })
        .collect();

    layout(
        "Confirm recommendations",
        chrome,
        &format!(
            r#"<form class="form card" method="post" action="/trip/{slug}/save">
            <h2 class="card__title">Does this look right?</h2>
            <p class="muted">Edit anything we got wrong. Clear a place name to drop it.</p>
            {rows}
            <label for="recommender_name">Your name</label>
            <input id="recommender_name" name="recommender_name" value="{recommender}">
            <button class="button button--love" type="submit">Save recommendations</button>
        </form>"#,
            recommender = escape_html(recommender_name.unwrap_or_default()),
        ),
    )
}

pub fn render_thank_you_page(chrome: &Chrome, trip: &trip::Model) -> String {
    let slug = escape_html(&trip.slug);
    layout(
        "Thank you",
        chrome,
        &format!(
            r#"<div class="card">
            <h2 class="card__title">Thank you!</h2>
            <p>{traveler} will love your tips.</p>
            <form class="form" method="post" action="/trip/{slug}/save-email">
                <label for="email">Want to see what everyone else recommended? Leave your email.</label>
                <input id="email" name="email" type="email" required>
                <button class="button" type="submit">Notify me</button>
            </form>
            <p><a href="/trip/{slug}">Back to the trip</a></p>
        </div>"#,
            traveler = escape_html(&trip.traveler_name),
        ),
    )
}

pub fn render_my_trips_page(chrome: &Chrome, trips: &[trip::Model]) -> String {
    let content = if trips.is_empty() {
        r#"<p class="muted">You have no trips yet. <a href="/">Create one</a>.</p>"#.to_string()
    } else {
        let items: String = trips
            .iter()
            .map(|trip| {
                format!(
                    r#"<li class="recs__item"><a class="recs__name" href="/trip/{slug}">{destination}</a>
                    <div class="recs__meta">Created {created}</div></li>"#,
                    slug = escape_html(&trip.slug),
                    destination = escape_html(trip_destination(trip)),
                    created = trip.created_at.format("%b %-d, %Y"),
                )
            })
            .collect();
        format!(r#"<ul class="recs">{items}</ul>"#)
    };
    layout(
        "My trips",
        chrome,
        &format!(r#"<div class="card"><h2 class="card__title">My trips</h2>{content}</div>"#),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_trip() -> trip::Model {
        trip::Model {
            id: Uuid::new_v4(),
            destination: "Athens".to_string(),
            traveler_name: "Ana".to_string(),
            share_token: "1a2b3c4d".to_string(),
            slug: "athens-apr-2025".to_string(),
            user_id: Uuid::new_v4(),
            destination_id: None,
            destination_display_name: None,
            destination_country: Some("Greece".to_string()),
            destination_info: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample_recommendation() -> TripRecommendation {
        TripRecommendation {
            id: Uuid::new_v4(),
            activity_id: Uuid::new_v4(),
            activity_name: "Ancient Agora".to_string(),
            category: Some("Historical Site".to_string()),
            website_url: None,
            address: None,
            latitude: None,
            longitude: None,
            description: Some("Go early".to_string()),
            author_name: Some("Bo".to_string()),
        }
    }

    #[test]
    fn test_trip_page_hides_owner_tools_from_visitors() {
        let trip = sample_trip();
        let recs = vec![sample_recommendation()];
        let html = render_trip_page(&Chrome::default(), &trip, &recs, false, "http://x/trip/athens-apr-2025");
        assert!(html.contains("Ancient Agora"));
        assert!(html.contains("Recommended by Bo"));
        assert!(!html.contains("/delete"));
    }

    #[test]
    fn test_trip_page_shows_owner_tools() {
        let trip = sample_trip();
        let recs = vec![sample_recommendation()];
        let html = render_trip_page(&Chrome::default(), &trip, &recs, true, "http://x/trip/athens-apr-2025");
        assert!(html.contains("/trip/athens-apr-2025/delete"));
        assert!(html.contains(&format!("/trip/athens-apr-2025/recommendations/{}/delete", recs[0].id)));
    }

    #[test]
    fn test_confirm_page_lists_entries_as_form_arrays() {
        let trip = sample_trip();
        let entries = vec![ExtractedRecommendation {
            name: "Kostas \"Souvlaki\"".to_string(),
            category: Some("Restaurant".to_string()),
            website_url: None,
            description: None,
        }];
        let html = render_confirm_page(&Chrome::default(), &trip, &entries, Some("Bo"));
        assert!(html.contains(r#"name="recommendations[]" value="Kostas &quot;Souvlaki&quot;""#));
        assert!(html.contains(r#"value="Restaurant""#));
        assert!(html.contains(r#"value="Bo""#));
    }
}
