// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Triton-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Triton and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The browser editor.
//!
//! Plain HTML plus a small script. The script keeps `{ source, svg, busy, error }` as explicit
//! state, mirroring [`crate::client::Editor`], and builds the SVG download in the browser.

use axum::http::header;
use axum::response::{Html, IntoResponse};

const INDEX_HTML: &str = include_str!("../../assets/index.html");

pub(super) async fn index() -> impl IntoResponse {
    ([(header::CACHE_CONTROL, "no-cache")], Html(INDEX_HTML))
}

#[cfg(test)]
mod tests {
    use super::INDEX_HTML;
    use crate::client::Editor;
    use crate::server::RENDER_ROUTE;

    #[test]
    fn page_posts_to_render_route() {
        assert!(INDEX_HTML.contains(&format!("fetch(\"{RENDER_ROUTE}\"")));
        assert!(INDEX_HTML.contains("JSON.stringify({ code: state.source })"));
    }

    #[test]
    fn page_downloads_svg_blob_with_editor_file_name() {
        assert!(INDEX_HTML.contains("new Blob([state.svg], { type: \"image/svg+xml\" })"));
        assert!(INDEX_HTML.contains(&format!("\"{}\"", Editor::DOWNLOAD_FILE_NAME)));
    }

    #[test]
    fn page_guards_render_with_busy_flag() {
        assert!(INDEX_HTML.contains("if (state.busy) return;"));
        assert!(INDEX_HTML.contains("state.busy = false;"));
    }
}
