// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Page templates.
//!
//! Each page body is a constant with `{{SLOT}}` placeholders. Slots are
//! filled with [`Markup`], so plain text must go through [`Markup::text`].

use super::fragments::Markup;

/// Every page the dashboard renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Index,
    Error,
    ResourceError,
    Success,
    Stats,
    Updated,
    Activities,
    Health,
    Recents,
    EachActivity,
}

impl Page {
    fn title(self) -> &'static str {
        match self {
            Page::Index => "Strava Dashboard",
            Page::Error => "Authentication error",
            Page::ResourceError => "Resource error",
            Page::Success => "Connected",
            Page::Stats => "Your stats",
            Page::Updated => "Preferences updated",
            Page::Activities => "Activities",
            Page::Health => "Health",
            Page::Recents => "Recents",
            Page::EachActivity => "Activity",
        }
    }

    fn body(self) -> &'static str {
        match self {
            Page::Index => INDEX_BODY,
            Page::Error => ERROR_BODY,
            Page::ResourceError => RESOURCE_ERROR_BODY,
            Page::Success => SUCCESS_BODY,
            Page::Stats => STATS_BODY,
            Page::Updated => UPDATED_BODY,
            Page::Activities => ACTIVITIES_BODY,
            Page::Health => HEALTH_BODY,
            Page::Recents => RECENTS_BODY,
            Page::EachActivity => EACH_ACTIVITY_BODY,
        }
    }
}

/// Render a full page, filling the named slots of its template.
///
/// Slots not supplied are left empty. Slot values are never rescanned for
/// placeholders.
pub fn render_page(page: Page, slots: &[(&str, &Markup)]) -> String {
    let template = page.body();
    let mut body = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        body.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let name = &after[..end];
                if let Some((_, value)) = slots.iter().find(|(slot, _)| *slot == name) {
                    body.push_str(value.as_str());
                }
                rest = &after[end + 2..];
            }
            None => {
                body.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    body.push_str(rest);

    LAYOUT
        .replace("{{TITLE}}", page.title())
        .replace("{{BODY}}", &body)
}

/// Render a simple page with a heading and a message.
pub fn render_message_page(heading: &str, message: &str) -> String {
    LAYOUT.replace("{{TITLE}}", &Markup::text(heading).into_string()).replace(
        "{{BODY}}",
        &format!(
            "<h2>{}</h2>\n<p>{}</p>\n<a class=\"btn btn-warning\" href=\"/\">Home</a>",
            Markup::text(heading).as_str(),
            Markup::text(message).as_str()
        ),
    )
}

const LAYOUT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css" rel="stylesheet" />
</head>
<body class="bg-dark text-light">
  <main class="container py-4">
{{BODY}}
  </main>
</body>
</html>
"#;

const INDEX_BODY: &str = r#"<h1 class="mb-3">Strava Dashboard</h1>
<p>Connect your Strava account to see your activities and health statistics.</p>
<a class="btn btn-warning btn-lg" href="{{AUTH_URL}}">Authenticate</a>"#;

const ERROR_BODY: &str = r#"<h2>Authentication failed</h2>
<p>We could not connect to your Strava account. Please try again.</p>
<a class="btn btn-warning" href="/">Back to login</a>"#;

const RESOURCE_ERROR_BODY: &str = r#"<h2>Data unavailable</h2>
<p>Some of your Strava data could not be fetched. You can choose to ignore missing data or fill it with mock data.</p>
{{FLAGS_FORM}}
<a class="btn btn-outline-light mt-3" href="/stats">Back to stats</a>"#;

const SUCCESS_BODY: &str = r#"<h2>Authentication successful</h2>
<p>Your Strava account is connected.</p>
{{FLAGS_FORM}}
<a class="btn btn-warning mt-3" href="/stats">View your stats</a>"#;

const STATS_BODY: &str = r#"<h2 class="mb-4">What would you like to see?</h2>
<div class="row gap-3">
{{CODE}}
</div>"#;

const UPDATED_BODY: &str = r#"<h2>Preferences updated</h2>
<p>Ignore missing data: {{IGNORE}}. Use mock data: {{MOCK}}.</p>
<a class="btn btn-warning" href="/stats">Back to stats</a>"#;

const ACTIVITIES_BODY: &str = r#"<h2 class="mb-4">Your activities</h2>
<div class="row gap-3">
{{CODE}}
</div>
<a class="btn btn-outline-light" href="/stats">Back</a>"#;

const HEALTH_BODY: &str = r#"<h2 class="mb-4">Health</h2>
{{CODE}}
<a class="btn btn-outline-light" href="/stats">Back</a>"#;

const RECENTS_BODY: &str = r#"<h2 class="mb-4">Recents</h2>
<div class="row row-cols-1 row-cols-md-2 g-3 mb-4">
{{CARDS}}
</div>
<h4>Averages</h4>
<ul class="list-group mb-4">
{{METRICS}}
</ul>
<h4>Recent totals</h4>
<ul class="list-group mb-4">
{{RECENTS}}
</ul>
<a class="btn btn-outline-light" href="/stats">Back</a>"#;

const EACH_ACTIVITY_BODY: &str = r#"<h2 class="mb-4">{{ACTIVITY_NAME}}</h2>
<div class="row gap-3">
{{CODE}}
</div>
<a class="btn btn-outline-light" href="/stats/activities">Back to activities</a>"#;

/// Checkbox form for the display flags, posting to `/updated`.
pub fn flags_form(ignore_missing: bool, use_mock: bool) -> Markup {
    let checked = |on: bool| if on { " checked" } else { "" };
    Markup::trusted(format!(
        r#"<form method="post" action="/updated" class="my-3">
<div class="form-check">
<input class="form-check-input" type="checkbox" name="check" value="ignore" id="check-ignore"{}>
<label class="form-check-label" for="check-ignore">Ignore missing data</label>
</div>
<div class="form-check">
<input class="form-check-input" type="checkbox" name="check" value="mock" id="check-mock"{}>
<label class="form-check-label" for="check-mock">Fill missing data with mock data (testing only)</label>
</div>
<button type="submit" class="btn btn-outline-warning mt-2">Save</button>
</form>"#,
        checked(ignore_missing),
        checked(use_mock)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_page_fills_slots() {
        let name = Markup::text("Evening <Run>");
        let code = Markup::trusted("<p>ok</p>".to_string());
        let html = render_page(
            Page::EachActivity,
            &[("ACTIVITY_NAME", &name), ("CODE", &code)],
        );

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Activity</title>"));
        assert!(html.contains("<h2 class=\"mb-4\">Evening &lt;Run&gt;</h2>"));
        assert!(html.contains("<p>ok</p>"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_slot_values_are_not_rescanned() {
        let name = Markup::text("{{CODE}}");
        let code = Markup::trusted("<p>ok</p>".to_string());
        let html = render_page(
            Page::EachActivity,
            &[("ACTIVITY_NAME", &name), ("CODE", &code)],
        );
        assert!(html.contains("<h2 class=\"mb-4\">{{CODE}}</h2>"));
    }

    #[test]
    fn test_unfilled_slots_are_removed() {
        let html = render_page(Page::Recents, &[]);
        assert!(!html.contains("{{"));
        assert!(!html.contains("}}"));
        assert!(html.contains("Recent totals"));
    }

    #[test]
    fn test_flags_form_reflects_state() {
        let form = flags_form(true, false);
        assert!(form.as_str().contains(r#"value="ignore" id="check-ignore" checked"#));
        assert!(form.as_str().contains(r#"value="mock" id="check-mock">"#));
    }

    #[test]
    fn test_message_page_escapes() {
        let html = render_message_page("Bad request", "id <must> be numeric");
        assert!(html.contains("id &lt;must&gt; be numeric"));
    }
}
