// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTML presentation: fragments and page templates.

pub mod fragments;
pub mod pages;

pub use fragments::{
    activity_card, card, graph_plot, img_card, list_metrics, null_component, processed,
    render_fragments, section, stats_card, Fragment, Markup,
};
pub use pages::{render_page, Page};
