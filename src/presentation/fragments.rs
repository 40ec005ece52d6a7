// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Page fragments: cards, metric lists, charts and placeholders.
//!
//! Fragments are plain data; [`render_fragments`] is the only place that
//! turns them into HTML, and it escapes every interpolated string.

use crate::models::activity::format_number;
use crate::services::charts::ChartImage;

/// Suffix appended to labels whose value was substituted.
pub const MOCK_SUFFIX: &str = " (Mock data)";

/// Text of the missing-data placeholder.
pub const MISSING_TEXT: &str = "Missing data here";

/// Route of the per-activity page.
pub const EACH_ACTIVITY_ROUTE: &str = "/stats/activities/each_activity";

/// Already-escaped HTML.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    /// Escape plain text.
    pub fn text(s: &str) -> Self {
        Self(escape_html(s))
    }

    /// Trusted HTML, produced by this module or a page template.
    pub(crate) fn trusted(html: String) -> Self {
        Self(html)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// One renderable piece of a page.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Menu entry linking to a sub-page.
    Card {
        title: String,
        subtitle: String,
        href: String,
    },
    /// Activity summary in a listing, linking to its detail page.
    StatsCard { name: String, kind: String, id: String },
    /// One field of an activity.
    ActivityCard {
        label: String,
        value: String,
        mock: bool,
    },
    /// Headline metric with a sparkline of the underlying samples.
    ImgCard {
        name: String,
        label: String,
        value: String,
        mock: bool,
        image: Option<ChartImage>,
    },
    /// List item `label: value`.
    Metric {
        label: String,
        value: String,
        mock: bool,
    },
    /// Embedded chart.
    Graph {
        name: String,
        label: String,
        mock: bool,
        image: ChartImage,
    },
    /// Visible "missing data" placeholder.
    Missing,
    /// Headed card containing other fragments.
    Section {
        heading: String,
        children: Vec<Fragment>,
    },
}

/// Friendly label for a raw Strava field name.
///
/// Known names map to fixed labels; anything else gets underscores replaced
/// by spaces, its first letter capitalized and the rest lowercased.
pub fn processed(value: &str) -> String {
    match value {
        "calories" => "Calories burnt".to_string(),
        "has_heartrate" => "Heart rate noted".to_string(),
        "heart" => "Heart rate".to_string(),
        "max_speed" => "Average max speed".to_string(),
        other => {
            let spaced = other.replace('_', " ");
            let mut chars = spaced.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        }
    }
}

fn with_mock(label: String, mock: bool) -> String {
    if mock {
        format!("{}{}", label, MOCK_SUFFIX)
    } else {
        label
    }
}

pub fn card(title: &str, subtitle: &str, href: &str) -> Fragment {
    Fragment::Card {
        title: title.to_string(),
        subtitle: subtitle.to_string(),
        href: href.to_string(),
    }
}

pub fn stats_card(name: &str, kind: &str, id: &str) -> Fragment {
    Fragment::StatsCard {
        name: name.to_string(),
        kind: kind.to_string(),
        id: id.to_string(),
    }
}

pub fn activity_card(field: &str, value: &str, mock: bool) -> Fragment {
    Fragment::ActivityCard {
        label: processed(field),
        value: value.to_string(),
        mock,
    }
}

pub fn img_card(
    name: &str,
    label: &str,
    value: f64,
    mock: bool,
    image: Option<ChartImage>,
) -> Fragment {
    Fragment::ImgCard {
        name: name.to_string(),
        label: label.to_string(),
        value: format_number(value),
        mock,
        image,
    }
}

pub fn list_metrics(metric: &str, value: f64, mock: bool) -> Fragment {
    Fragment::Metric {
        label: processed(metric),
        value: format_number(value),
        mock,
    }
}

pub fn graph_plot(name: &str, mock: bool, image: ChartImage) -> Fragment {
    Fragment::Graph {
        name: name.to_string(),
        label: processed(name),
        mock,
        image,
    }
}

pub fn null_component() -> Fragment {
    Fragment::Missing
}

pub fn section(heading: &str, children: Vec<Fragment>) -> Fragment {
    Fragment::Section {
        heading: heading.to_string(),
        children,
    }
}

/// URL of the detail page for an activity.
pub fn each_activity_href(id: &str, name: &str) -> String {
    format!(
        "{}?id={}&activity_name={}",
        EACH_ACTIVITY_ROUTE,
        urlencoding::encode(id),
        urlencoding::encode(name)
    )
}

/// Render fragments to HTML.
pub fn render_fragments(fragments: &[Fragment]) -> Markup {
    let mut out = String::new();
    for fragment in fragments {
        render_into(&mut out, fragment);
    }
    Markup::trusted(out)
}

fn render_into(out: &mut String, fragment: &Fragment) {
    match fragment {
        Fragment::Card {
            title,
            subtitle,
            href,
        } => {
            out.push_str(&format!(
                r#"<div class="bg-warning text-dark card shadow-lg mb-3 col h-50">
<a class="link-offset-2 link-underline link-underline-opacity-0" href="{}">
<div class="card-body">
<h5 class="card-title">{}</h5>
<h6 class="card-subtitle mb-2 text-body-secondary">{}</h6>
</div>
</a>
</div>
"#,
                escape_html(href),
                escape_html(title),
                escape_html(subtitle)
            ));
        }
        Fragment::StatsCard { name, kind, id } => {
            out.push_str(&format!(
                r#"<div class="bg-warning text-dark card mb-3 col">
<div class="bg-warning text-dark m-2 card-body">
<a class="link-offset-2 link-underline link-underline-opacity-0" href="{}">
<h5 class="card-title">{}</h5>
<h6 class="card-subtitle mb-2 text-body-secondary">Type: {}</h6>
<p class="card-subtitle mb-2 text-body-secondary">ID: {}</p>
</a>
</div>
</div>
"#,
                escape_html(&each_activity_href(id, name)),
                escape_html(name),
                escape_html(kind),
                escape_html(id)
            ));
        }
        Fragment::ActivityCard { label, value, mock } => {
            out.push_str(&format!(
                r#"<div class="card mb-3 col h-50">
<div class="card-body">
<h5 class="card-title">{}</h5>
<p class="card-subtitle mb-2 text-body-secondary">{}</p>
</div>
</div>
"#,
                escape_html(&with_mock(label.clone(), *mock)),
                escape_html(value)
            ));
        }
        Fragment::ImgCard {
            name,
            label,
            value,
            mock,
            image,
        } => {
            let img = image
                .as_ref()
                .map(|image| {
                    format!(
                        r#"<img src="{}" class="card-img-left img-fluid rounded-start m-2 w-25" alt="{}">"#,
                        escape_html(&image.data_uri()),
                        escape_html(name)
                    )
                })
                .unwrap_or_default();
            out.push_str(&format!(
                r#"<div class="col text-start">
<div class="card h-25 d-flex flex-row">
{}
<div class="card-body m-2 text-start">
<h6 class="card-text fw-medium">{}</h6>
<p class="card-text fw-medium">{}</p>
</div>
</div>
</div>
"#,
                img,
                escape_html(&with_mock(label.clone(), *mock)),
                escape_html(value)
            ));
        }
        Fragment::Metric { label, value, mock } => {
            out.push_str(&format!(
                "<li class=\"list-group-item\">{}: {}</li>\n",
                escape_html(&with_mock(label.clone(), *mock)),
                escape_html(value)
            ));
        }
        Fragment::Graph {
            name,
            label,
            mock,
            image,
        } => {
            out.push_str(&format!(
                r#"<div class="card text-center m-5 h-50 w-50 gap-2">
<h5>{}</h5>
<img src="{}" class="rounded float-none w-100" alt="{}">
</div>
"#,
                escape_html(&with_mock(label.clone(), *mock)),
                escape_html(&image.data_uri()),
                escape_html(name)
            ));
        }
        Fragment::Missing => {
            out.push_str(&format!(
                "<div class=\"container m-3 text-danger\">\n<h5>{}</h5>\n</div>\n",
                MISSING_TEXT
            ));
        }
        Fragment::Section { heading, children } => {
            out.push_str(&format!(
                "<h4>{}</h4>\n<div class=\"card mb-3 col h-50\">\n",
                escape_html(heading)
            ));
            for child in children {
                render_into(out, child);
            }
            out.push_str("</div>\n");
        }
    }
}

/// Escape text for HTML element content and quoted attribute values.
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
